use sqlx::postgres::PgConnectOptions;

use super::ConfigError;

pub const ENV_USER: &str = "PG_USER";
pub const ENV_PASSWORD: &str = "PG_PASS";
pub const ENV_DBNAME: &str = "PG_DBNAME";
pub const ENV_HOST: &str = "PG_HOST";
pub const ENV_PORT: &str = "PG_PORT";

/// Connection parameters for the target PostGIS database.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("dbname", &self.dbname)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the parameters from any variable source. `from_env` goes through here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).ok_or(ConfigError::MissingEnv(name));

        let port_raw = get(ENV_PORT)?;
        let port = port_raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port_raw.clone(),
            })?;

        Ok(DatabaseConfig {
            user: get(ENV_USER)?,
            password: get(ENV_PASSWORD)?,
            dbname: get(ENV_DBNAME)?,
            host: get(ENV_HOST)?,
            port,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.dbname)
    }

    /// libpq environment for the `psql` client.
    pub fn libpq_env(&self) -> Vec<(&'static str, String)> {
        vec![
            ("PGHOST", self.host.clone()),
            ("PGPORT", self.port.to_string()),
            ("PGUSER", self.user.clone()),
            ("PGPASSWORD", self.password.clone()),
            ("PGDATABASE", self.dbname.clone()),
        ]
    }
}
