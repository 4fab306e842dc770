use {
    crate::{error::ConfigError, target::GatewayTarget},
    serde::Deserialize,
    std::fmt::Debug,
};

/// Configuration for the one-shot gateway initializer.
#[derive(Clone, Debug, Deserialize)]
pub struct BootstrapConfig {
    pub target: GatewayTarget,

    /// Host name of the upstream production database the foreign server
    /// points at.
    pub upstream_host: String,

    /// Secrets Manager id of the read-only upstream credentials used for the
    /// user mapping. Distinct from the root secret.
    pub upstream_secret_id: String,
}

impl BootstrapConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            target: GatewayTarget::from_env()?,
            upstream_host: crate::target::require("BDE_HOST_NAME")?,
            upstream_secret_id: crate::target::require("BDE_ANALYTICS_USER_SECRET")?,
        })
    }
}
