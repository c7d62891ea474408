pub mod handlers;
pub mod models;
mod service;

pub use models::Claims;
pub use service::{AuthError, AuthService, CredentialVerifier, StaticCredentialVerifier};
