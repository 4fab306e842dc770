use {
    crate::error::ProvisionError,
    async_trait::async_trait,
    aws_sdk_secretsmanager::{error::DisplayErrorContext, Client as SecretsClient},
    log::debug,
    serde::Deserialize,
    std::fmt::{Debug, Formatter, Result as FmtResult},
};

/// A username/password pair held in the secret store. Lives only for the
/// duration of one invocation and never appears in log output.
#[derive(Clone, Deserialize, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch_credentials(&self, secret_id: &str) -> Result<Credentials, ProvisionError>;
}

/// Secret store backed by AWS Secrets Manager. Secrets are JSON objects with
/// `username` and `password` keys.
pub struct SecretsManagerStore {
    client: SecretsClient,
}

impl SecretsManagerStore {
    pub fn new(client: SecretsClient) -> Self {
        Self {
            client,
        }
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn fetch_credentials(&self, secret_id: &str) -> Result<Credentials, ProvisionError> {
        debug!("Fetching secret {}", secret_id);
        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                ProvisionError::Secret(secret_id.to_string(), DisplayErrorContext(&e).to_string())
            })?;

        let payload = output.secret_string().ok_or_else(|| {
            ProvisionError::Secret(secret_id.to_string(), "secret has no string value".to_string())
        })?;

        serde_json::from_str(payload)
            .map_err(|e| ProvisionError::Secret(secret_id.to_string(), e.to_string()))
    }
}
