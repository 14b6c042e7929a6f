//! HTTP handlers

mod error_page;
mod health;
mod home;
mod login;

pub use error_page::error_page;
pub use health::health;
pub use home::{home_page, submit_text, TextSubmission};
pub use login::{login, login_page, LoginRequest, LoginResponse};
