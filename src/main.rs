use studysync_backend::{config::Config, middleware::cors::permissive_cors, routes, AppState};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.environment.is_production());

    info!(
        data_dir = %config.data_dir.display(),
        question_bank_dir = %config.question_bank_dir.display(),
        "Starting StudySync backend"
    );

    let app_state = AppState::new(&config)?;

    let app = routes::app(app_state, &config)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.server_address()).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
