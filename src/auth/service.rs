use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::models::{AuthenticatedUser, Claims, LoginRequest, LoginResponse};
use crate::config::AuthConfig;
use crate::error::HttpError;
use crate::impl_into_response;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authorization required. Provide a Bearer token.")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Malformed Authorization header")]
    MalformedHeader,

    #[error("Failed to issue token: {0}")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
}

impl HttpError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Self::MalformedHeader => StatusCode::UNAUTHORIZED,
            Self::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCredentials => Some("INVALID_CREDENTIALS"),
            Self::MissingToken => Some("MISSING_TOKEN"),
            Self::InvalidToken(_) | Self::MalformedHeader => Some("INVALID_TOKEN"),
            Self::TokenIssue(_) => Some("TOKEN_ERROR"),
        }
    }
}

impl_into_response!(AuthError);

/// Decides whether an email/password pair belongs to a user
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Option<AuthenticatedUser>;
}

/// Accepts exactly one configured email/password pair.
///
/// Stand-in until a user store exists. Do not treat it as a security model.
pub struct StaticCredentialVerifier {
    email: String,
    password: String,
    user_id: i64,
}

impl StaticCredentialVerifier {
    pub fn new(email: impl Into<String>, password: impl Into<String>, user_id: i64) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_id,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.email, &config.password, config.user_id)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, email: &str, password: &str) -> Option<AuthenticatedUser> {
        (email == self.email && password == self.password).then(|| AuthenticatedUser {
            user_id: self.user_id,
            email: self.email.clone(),
        })
    }
}

/// Login and HS256 token issue/verification
pub struct AuthService {
    verifier: Arc<dyn CredentialVerifier>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, secret: &str, token_ttl_secs: u64) -> Self {
        Self {
            verifier,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            token_ttl_secs: i64::try_from(token_ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let Some(user) = self
            .verifier
            .verify(request.email.trim(), &request.password)
            .await
        else {
            tracing::warn!(email = %request.email, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let access_token = self.issue_token(&user)?;
        tracing::info!(user_id = user.user_id, "User logged in");

        Ok(LoginResponse {
            access_token,
            user_id: user.user_id,
        })
    }

    pub fn issue_token(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            email: user.email.clone(),
            sub: user.user_id,
            iat: now,
            exp: now.saturating_add(self.token_ttl_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::TokenIssue)
    }

    /// Check signature and expiry, returning the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> AuthService {
        let verifier = Arc::new(StaticCredentialVerifier::new("test@test.com", "123456", 1));
        AuthService::new(verifier, secret, 3600)
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let auth = service("unit-test-secret");
        let response = auth.login(&login("test@test.com", "123456")).await.unwrap();

        assert_eq!(response.user_id, 1);
        let claims = auth.verify_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "test@test.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let auth = service("unit-test-secret");
        let result = auth.login(&login("test@test.com", "654321")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_custom_verifier_is_used() {
        struct AnyoneNamedAda;

        #[async_trait]
        impl CredentialVerifier for AnyoneNamedAda {
            async fn verify(&self, email: &str, _password: &str) -> Option<AuthenticatedUser> {
                (email == "ada@example.com").then(|| AuthenticatedUser {
                    user_id: 7,
                    email: email.to_string(),
                })
            }
        }

        let auth = AuthService::new(Arc::new(AnyoneNamedAda), "s", 60);
        let response = auth.login(&login("ada@example.com", "x")).await.unwrap();
        assert_eq!(response.user_id, 7);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");
        let user = AuthenticatedUser {
            user_id: 1,
            email: "test@test.com".to_string(),
        };

        let token = issuer.issue_token(&user).unwrap();
        assert!(matches!(
            verifier.verify_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = service("unit-test-secret");
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            email: "test@test.com".to_string(),
            sub: 1,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(service("s").verify_token("not.a.jwt").is_err());
    }
}
