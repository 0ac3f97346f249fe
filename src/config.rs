use std::env;

/// A signing secret shorter than this offers too little entropy to protect
/// token signatures; startup refuses to proceed with one.
const MIN_SECRET_CHARS: usize = 32;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl Config {
    /// Loads configuration from the environment, aborting startup on a
    /// missing `DATABASE_URL` or `JWT_SECRET`, or on a secret shorter than
    /// 32 characters.
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        if jwt_secret.chars().count() < MIN_SECRET_CHARS {
            panic!(
                "JWT_SECRET must be at least {} characters; generate one with `openssl rand -base64 32`",
                MIN_SECRET_CHARS
            );
        }

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret,
            token_ttl_days: env::var("TOKEN_TTL_DAYS")
                .map(|v| v.parse().expect("TOKEN_TTL_DAYS must be a number"))
                .unwrap_or(DEFAULT_TOKEN_TTL_DAYS),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment mutation is process-global, so every scenario lives in one
    // test to keep the harness from racing itself.
    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("TOKEN_TTL_DAYS");

        let config = Config::from_env();
        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.token_ttl_days, 7);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");

        // Custom values
        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("TOKEN_TTL_DAYS", "1");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.token_ttl_days, 1);

        // A short signing secret must abort startup.
        env::set_var("JWT_SECRET", "too-short");
        let result = std::panic::catch_unwind(Config::from_env);
        assert!(result.is_err(), "short JWT_SECRET should abort startup");

        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("TOKEN_TTL_DAYS");
    }
}
