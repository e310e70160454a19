use anyhow::{bail, Context, Result};

/// Minimum length accepted for the token-signing secret.
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Absent means AI endpoints answer with a configuration error.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    /// Empty means any origin is mirrored back with credentials allowed.
    pub cors_origins: Vec<String>,
    pub bcrypt_cost: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jwt_secret = check_jwt_secret(require_env("JWT_SECRET")?)?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            cors_origins: optional_env("CORS_ORIGIN")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            bcrypt_cost: match optional_env("BCRYPT_COST") {
                Some(raw) => raw
                    .parse::<u32>()
                    .context("BCRYPT_COST must be an integer")?,
                None => bcrypt::DEFAULT_COST,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_jwt_secret(secret: String) -> Result<String> {
    if secret.len() < MIN_JWT_SECRET_LEN {
        bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters");
    }
    Ok(secret)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins(" http://localhost:5173, https://app.example.com ,,");
        assert_eq!(
            origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }

    #[test]
    fn test_parse_origins_empty_input() {
        assert!(parse_origins("  ").is_empty());
    }

    #[test]
    fn test_jwt_secret_minimum_length() {
        let err = check_jwt_secret("fifteen-chars!!".to_string()).unwrap_err();
        assert!(err.to_string().contains("at least 16"));
        assert_eq!(
            check_jwt_secret("sixteen-chars!!!".to_string()).unwrap(),
            "sixteen-chars!!!"
        );
    }
}
