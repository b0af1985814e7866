pub mod ai_service;
pub mod identity_service;
pub mod quiz_service;
pub mod upload_service;
