use {
    crate::{error::ProvisionError, secrets::Credentials},
    async_trait::async_trait,
    log::{debug, warn},
    sqlx::{postgres::PgConnectOptions, Connection, Executor, PgConnection},
};

/// Applies a provisioning plan as a single transaction: every statement
/// commits, or none do.
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    async fn apply(&self, statements: &[String]) -> Result<(), ProvisionError>;
}

/// Statement executor for the gateway database. Each `apply` opens its own
/// connection and releases it on every path.
pub struct GatewayDatabase {
    options: PgConnectOptions,
}

impl GatewayDatabase {
    pub fn new(host: &str, database: &str, credentials: &Credentials) -> Self {
        let options = PgConnectOptions::new()
            .host(host)
            .database(database)
            .username(&credentials.username)
            .password(&credentials.password);

        Self {
            options,
        }
    }

    async fn run_transaction(
        conn: &mut PgConnection,
        statements: &[String],
    ) -> Result<(), ProvisionError> {
        let mut tx = conn.begin().await?;

        for (i, statement) in statements.iter().enumerate() {
            if let Err(e) = (&mut *tx).execute(statement.as_str()).await {
                // Statements can carry credentials, so only the position is
                // logged, never the text.
                warn!("Statement {} of {} failed; rolling back", i + 1, statements.len());
                if let Err(rollback_error) = tx.rollback().await {
                    warn!("Rollback after failed statement also failed: {}", rollback_error);
                }
                return Err(e.into());
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl StatementExecutor for GatewayDatabase {
    async fn apply(&self, statements: &[String]) -> Result<(), ProvisionError> {
        debug!("Applying {} provisioning statements", statements.len());

        let mut conn = PgConnection::connect_with(&self.options).await?;
        let outcome = Self::run_transaction(&mut conn, statements).await;

        if let Err(close_error) = conn.close().await {
            warn!("Failed to close gateway connection: {}", close_error);
        }

        outcome
    }
}
