//! Runtime configuration
//!
//! Everything is read from the environment once at startup. The service is
//! expected to come up even when no store is configured, so the database
//! settings are optional and only the port carries a default.

/// Default HTTP port when `PORT` is unset or unparseable
pub const DEFAULT_PORT: u16 = 8000;

/// Environment-derived configuration for a single server process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store location, e.g. `rocksdb:///var/lib/aufbau` or `memory://`
    pub database_url: Option<String>,
    /// Logical database name, appended to the store location
    pub database_name: Option<String>,
    /// TCP port the HTTP server binds to
    pub port: u16,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset, matching how operators clear a
    /// variable in container environments.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Config {
            database_url: lookup("DATABASE_URL").filter(|value| !value.is_empty()),
            database_name: lookup("DATABASE_NAME").filter(|value| !value.is_empty()),
            port,
        }
    }

    /// True when both store settings are present
    pub fn store_configured(&self) -> bool {
        self.database_url.is_some() && self.database_name.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            database_name: None,
            port: DEFAULT_PORT,
        }
    }
}
