use {
    crate::{
        db::StatementExecutor,
        error::ProvisionError,
        ident::{quote_identifier, quote_literal},
        secrets::Credentials,
    },
    fdw_gateway_config::BootstrapConfig,
    log::info,
};

pub const FOREIGN_SERVER: &str = "bde_processor";

/// Upstream schemas imported into the gateway, one local schema each.
pub const FOREIGN_SCHEMAS: [&str; 5] = ["bde", "table_version", "lds", "bde_ext", "bde_control"];

const UPSTREAM_PORT: &str = "5432";
const UPSTREAM_DATABASE: &str = "bde";
const SERVER_EXTENSIONS: &str = "postgis";
const FETCH_SIZE: &str = "100000";

/// The one-shot initialization plan: extensions, foreign server, user
/// mapping for the local administrative role, then a create + import pair
/// per upstream schema.
pub fn bootstrap_statements(
    upstream_host: &str,
    local_role: &str,
    upstream: &Credentials,
) -> Vec<String> {
    let mut statements = vec![
        "CREATE EXTENSION postgis".to_string(),
        "CREATE EXTENSION postgres_fdw".to_string(),
        format!(
            "CREATE SERVER {} FOREIGN DATA WRAPPER postgres_fdw OPTIONS (host {}, port '{}', dbname '{}', extensions '{}')",
            FOREIGN_SERVER,
            quote_literal(upstream_host),
            UPSTREAM_PORT,
            UPSTREAM_DATABASE,
            SERVER_EXTENSIONS
        ),
        format!("ALTER SERVER {} OPTIONS (SET fetch_size '{}')", FOREIGN_SERVER, FETCH_SIZE),
        format!(
            "CREATE USER MAPPING FOR {} SERVER {} OPTIONS (user {}, password {})",
            quote_identifier(local_role),
            FOREIGN_SERVER,
            quote_literal(&upstream.username),
            quote_literal(&upstream.password)
        ),
    ];

    for schema in FOREIGN_SCHEMAS {
        statements.push(format!("CREATE SCHEMA {}", schema));
        statements.push(format!(
            "IMPORT FOREIGN SCHEMA {} FROM SERVER {} INTO {}",
            schema, FOREIGN_SERVER, schema
        ));
    }

    statements
}

/// Wire a freshly created gateway database to the upstream production
/// database. Runs exactly once, straight after instance creation; a re-run
/// after partial success fails on the already-completed steps.
pub async fn initialize_gateway(
    config: &BootstrapConfig,
    root: &Credentials,
    upstream: &Credentials,
    database: &dyn StatementExecutor,
) -> Result<(), ProvisionError> {
    info!("Initializing FDW gateway against upstream {}", config.upstream_host);

    let statements = bootstrap_statements(&config.upstream_host, &root.username, upstream);
    database.apply(&statements).await?;

    info!("Gateway initialized; {} foreign schemas imported", FOREIGN_SCHEMAS.len());
    Ok(())
}
