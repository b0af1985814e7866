use crate::models::user::Claims;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

impl ProtectedResponse {
    /// `claims` is `None` when the identity gate is not configured.
    pub fn granted(claims: Option<&Claims>) -> Self {
        Self {
            message: "Access granted".to_string(),
            user_id: claims.map(|c| c.sub.clone()),
            email: claims.and_then(|c| c.email.clone()),
        }
    }
}
