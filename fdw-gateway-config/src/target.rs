use {
    crate::error::ConfigError,
    serde::Deserialize,
    std::{env, fmt::Debug},
};

/// Connection target for provisioning statements: the gateway database and a
/// Secrets Manager reference to its administrative credentials.
#[derive(Clone, Debug, Deserialize)]
pub struct GatewayTarget {
    pub host: String,
    pub database: String,
    pub root_secret_id: String,
}

impl GatewayTarget {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require("RDS_FDW_HOST")?,
            database: require("RDS_FDW_DB")?,
            root_secret_id: require("RDS_FDW_ROOT")?,
        })
    }
}

pub(crate) fn require(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
