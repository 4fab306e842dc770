use {
    aws_config::BehaviorVersion,
    fdw_gateway::{initialize_gateway, GatewayDatabase, SecretStore, SecretsManagerStore},
    fdw_gateway_config::BootstrapConfig,
    lambda_runtime::{run, service_fn, Error, LambdaEvent},
    log::info,
    serde_json::Value,
};

// Triggered once after database creation; the payload is ignored.
async fn handler(_event: LambdaEvent<Value>) -> Result<(), Error> {
    let config = BootstrapConfig::from_env()?;
    info!("Initializing gateway database {} on {}", config.target.database, config.target.host);
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let secrets = SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&aws));

    let root = secrets.fetch_credentials(&config.target.root_secret_id).await?;
    let upstream = secrets.fetch_credentials(&config.upstream_secret_id).await?;
    let database = GatewayDatabase::new(&config.target.host, &config.target.database, &root);

    initialize_gateway(&config, &root, &upstream, &database).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
