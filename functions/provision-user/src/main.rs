use {
    aws_config::BehaviorVersion,
    fdw_gateway::{
        provision_user, AwsIdentityService, GatewayDatabase, SecretStore, SecretsManagerStore,
    },
    fdw_gateway_config::ProvisionerConfig,
    lambda_runtime::{run, service_fn, Error, LambdaEvent},
    log::info,
    serde::Deserialize,
};

#[derive(Debug, Deserialize)]
struct ProvisionRequest {
    username: String,
}

async fn handler(event: LambdaEvent<ProvisionRequest>) -> Result<(), Error> {
    let request = event.payload;
    info!("Provisioning analytics user {}", request.username);

    let config = ProvisionerConfig::from_env()?;
    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let identity =
        AwsIdentityService::new(aws_sdk_iam::Client::new(&aws), aws_sdk_sts::Client::new(&aws));
    let secrets = SecretsManagerStore::new(aws_sdk_secretsmanager::Client::new(&aws));

    let root = secrets.fetch_credentials(&config.target.root_secret_id).await?;
    let database = GatewayDatabase::new(&config.target.host, &config.target.database, &root);

    provision_user(&config, &identity, &database, &request.username).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
