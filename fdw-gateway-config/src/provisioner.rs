use {
    crate::{error::ConfigError, target::GatewayTarget},
    serde::Deserialize,
    std::{env, fmt::Debug},
};

fn get_default_partition() -> String {
    "aws".into()
}

#[inline]
const fn get_default_user_schemas() -> bool {
    true
}

/// Configuration for the per-user provisioner.
#[derive(Clone, Debug, Deserialize)]
pub struct ProvisionerConfig {
    pub target: GatewayTarget,

    /// Opaque resource id of the gateway instance; the `dbuser` ARN is
    /// scoped to it.
    pub db_resource_id: String,

    pub region: String,

    #[serde(default = "get_default_partition")]
    pub partition: String,

    /// Whether each user gets a private schema with usage/CRUD/execute
    /// privileges in addition to the login role.
    #[serde(default = "get_default_user_schemas")]
    pub user_schemas: bool,
}

impl ProvisionerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let partition = match env::var("AWS_PARTITION") {
            Ok(partition) => partition,
            Err(_) => get_default_partition(),
        };

        let user_schemas = match env::var("USER_SCHEMAS") {
            Ok(value) => parse_flag("USER_SCHEMAS", &value)?,
            Err(_) => get_default_user_schemas(),
        };

        Ok(Self {
            target: GatewayTarget::from_env()?,
            db_resource_id: crate::target::require("DB_RESOURCE_ID")?,
            region: crate::target::require("AWS_REGION")?,
            partition,
            user_schemas,
        })
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(name.to_string(), value.to_string())),
    }
}
