use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the student registry server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection string of the MongoDB deployment.
    pub mongo_url: String,
    /// Database holding the student collection.
    pub db_name: String,
    /// Collection storing one document per student.
    pub collection_name: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Optional path for the file log layer.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup_non_empty(&lookup, key).ok_or_else(|| ConfigError::MissingVariable(key.into()))
        };

        Ok(Self {
            mongo_url: required("MONGO_URL")?,
            db_name: required("DB_NAME")?,
            collection_name: required("COLLECTION_NAME")?,
            server_port: lookup_non_empty(&lookup, "SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            log_file: lookup_non_empty(&lookup, "STUDENTS_LOG_FILE").map(PathBuf::from),
        })
    }
}

fn lookup_non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Load a dotenv file into the process environment.
///
/// With no explicit path, a `.env` in the working directory is used when present.
pub fn load_dotenv(path: Option<&std::path::Path>) -> Result<(), dotenvy::Error> {
    match path {
        Some(path) => dotenvy::from_path(path).map(|_| ()),
        None => match dotenvy::dotenv() {
            Ok(_) => Ok(()),
            Err(err) if err.not_found() => Ok(()),
            Err(err) => Err(err),
        },
    }
}
