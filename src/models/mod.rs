pub mod question;
pub mod upload;
pub mod user;
