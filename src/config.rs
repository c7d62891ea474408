use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEV_JWT_SECRET: &str = "secret-key-dev-only";
pub const DEV_LOGIN_EMAIL: &str = "test@test.com";
pub const DEV_LOGIN_PASSWORD: &str = "123456";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// weatherapi.com key. Lookups fail with a configuration error when unset.
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Provider base URL, e.g. "https://api.weatherapi.com/v1/"
    #[serde(default)]
    pub weather_api_base_url: Option<String>,

    /// Language sent to the provider when the caller gives none
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Database URL (SQLite connection string)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Token lifetime in seconds
    #[serde(default = "default_jwt_expires_in_secs")]
    pub jwt_expires_in_secs: u64,

    /// Login accepted by the static credential verifier
    #[serde(default = "default_email")]
    pub email: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expires_in_secs: default_jwt_expires_in_secs(),
            email: default_email(),
            password: default_password(),
            user_id: default_user_id(),
        }
    }
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn uses_dev_credentials(&self) -> bool {
        self.email == DEV_LOGIN_EMAIL && self.password == DEV_LOGIN_PASSWORD
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_lang() -> String {
    "es".to_string()
}

fn default_database_url() -> String {
    "sqlite:data/clima.db".to_string()
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_jwt_expires_in_secs() -> u64 {
    3600
}

fn default_email() -> String {
    DEV_LOGIN_EMAIL.to_string()
}

fn default_password() -> String {
    DEV_LOGIN_PASSWORD.to_string()
}

fn default_user_id() -> i64 {
    1
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_lang", default_lang())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // CLIMA_WEATHER_API_KEY, CLIMA_AUTH__JWT_SECRET, ...
            .add_source(
                Environment::with_prefix("CLIMA")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_source() {
        let config: AppConfig = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.default_lang, "es");
        assert!(config.weather_api_key.is_none());
        assert!(config.weather_api_base_url.is_none());
        assert!(config.auth.uses_dev_secret());
        assert!(config.auth.uses_dev_credentials());
        assert_eq!(config.auth.jwt_expires_in_secs, 3600);
    }

    #[test]
    fn test_nested_auth_overrides() {
        let config: AppConfig = Config::builder()
            .set_override("weather_api_key", "k")
            .unwrap()
            .set_override("auth.jwt_secret", "s3cret")
            .unwrap()
            .set_override("auth.user_id", 42)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.weather_api_key.as_deref(), Some("k"));
        assert!(!config.auth.uses_dev_secret());
        assert_eq!(config.auth.user_id, 42);
    }
}
