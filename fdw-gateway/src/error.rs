use {
    fdw_gateway_config::ConfigError,
    sqlx::Error as SqlxError,
    std::{
        error::Error,
        fmt::{Debug, Display, Formatter, Result as FmtResult},
    },
};

#[derive(Debug)]
pub enum ProvisionError {
    Config(ConfigError),
    InvalidUserName(String, &'static str),
    Secret(String, String),
    Identity(&'static str, String),
    MissingCallerAccount,
    Database(SqlxError),
}

impl Display for ProvisionError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::InvalidUserName(name, reason) => {
                write!(f, "Invalid user name {:?}: {}", name, reason)
            }
            Self::Secret(id, msg) => write!(f, "Failed to read secret {}: {}", id, msg),
            Self::Identity(operation, msg) => write!(f, "IAM {} failed: {}", operation, msg),
            Self::MissingCallerAccount => {
                write!(f, "GetCallerIdentity response did not include an account id")
            }
            Self::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl Error for ProvisionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(ref e) => Some(e),
            Self::Database(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ProvisionError {
    fn from(e: ConfigError) -> Self {
        ProvisionError::Config(e)
    }
}

impl From<SqlxError> for ProvisionError {
    fn from(e: SqlxError) -> Self {
        ProvisionError::Database(e)
    }
}
