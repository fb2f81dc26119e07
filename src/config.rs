use std::env;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_PORT: u16 = 3000;
const DATA_FILE_NAME: &str = "locations.json";

/// Process settings, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub data_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Config {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        let environment = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        // production: ephemeral, lost on redeploy
        let data_file = lookup("LOCATION_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                if environment == "production" {
                    env::temp_dir().join(DATA_FILE_NAME)
                } else {
                    PathBuf::from(DATA_FILE_NAME)
                }
            });

        Config {
            host,
            port,
            environment,
            data_file,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
