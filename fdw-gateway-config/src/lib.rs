mod bootstrap;
mod error;
mod provisioner;
mod target;

pub use self::{
    bootstrap::BootstrapConfig, error::ConfigError, provisioner::ProvisionerConfig,
    target::GatewayTarget,
};
