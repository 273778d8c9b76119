use std::env;
use thiserror::Error;
use url::Url;

/// Errors raised while loading configuration. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub log_filter: String,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

// Credentials never reach debug logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Profile defaults are picked from `APP_ENV`, then required variables are read and
    /// optional overrides applied on top.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let profile = Profile::for_environment(environment);

        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: parse_var("DB_PORT", &required("DB_PORT")?)?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            name: required("DB_NAME")?,
            sslmode: required("DB_SSLMODE")?,
            max_connections: profile.max_connections,
        };

        let security = SecurityConfig {
            jwt_secret: required("JWT_KEY")?,
            bcrypt_cost: profile.bcrypt_cost,
        };

        let api = ApiConfig {
            port: 8080,
            log_filter: profile.log_filter.to_string(),
        };

        Self {
            environment,
            database,
            api,
            security,
        }
        .with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            self.api.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            let cost: u32 = parse_var("BCRYPT_COST", &v)?;
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid { var: "BCRYPT_COST", value: v });
            }
            self.security.bcrypt_cost = cost;
        }
        if let Some(v) = lookup("RUST_LOG") {
            self.api.log_filter = v;
        }

        Ok(self)
    }
}

impl DatabaseConfig {
    /// Postgres connection URL built from the individual settings.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        let base = format!("postgres://{}:{}", self.host, self.port);
        let mut url = Url::parse(&base).map_err(|_| ConfigError::Invalid {
            var: "DB_HOST",
            value: self.host.clone(),
        })?;

        url.set_username(&self.user).map_err(|_| ConfigError::Invalid {
            var: "DB_USER",
            value: self.user.clone(),
        })?;
        url.set_password(Some(&self.password)).map_err(|_| ConfigError::Invalid {
            var: "DB_PASSWORD",
            value: "<redacted>".to_string(),
        })?;
        url.set_path(&format!("/{}", self.name));
        url.query_pairs_mut().append_pair("sslmode", &self.sslmode);

        Ok(url.into())
    }
}

struct Profile {
    max_connections: u32,
    bcrypt_cost: u32,
    log_filter: &'static str,
}

impl Profile {
    fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                max_connections: 5,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                log_filter: "todo_api=debug,tower_http=debug",
            },
            Environment::Staging => Self {
                max_connections: 10,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                log_filter: "todo_api=info,tower_http=info",
            },
            Environment::Production => Self {
                max_connections: 20,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                log_filter: "todo_api=info",
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}
