use {
    crate::{
        arn::DbUserArn,
        db::StatementExecutor,
        error::ProvisionError,
        iam::IdentityService,
        ident::{quote_identifier, validate_identifier},
        policy::{Action, Policy, Resource},
    },
    fdw_gateway_config::ProvisionerConfig,
    log::{info, warn},
};

/// Marker tag identifying IAM users provisioned by this service.
pub const ANALYTICS_TAG_KEY: &str = "bde-analytics-user";
const ANALYTICS_TAG_VALUE: &str = "true";

const POLICY_PATH: &str = "/bde-analytics/";
const POLICY_DESCRIPTION: &str = "Allows IAM database authentication to the analytics gateway.";

pub fn policy_name(user_name: &str) -> String {
    format!("bde-analytics-connect-{}", user_name)
}

/// Statements creating the login role, its optional private schema with
/// usage/CRUD/execute privileges, and the IAM-authentication grant. Applied
/// as one transaction. `CREATE ROLE` is not idempotent: re-running for an
/// existing role fails the whole plan.
pub fn role_statements(user_name: &str, private_schema: bool) -> Vec<String> {
    let role = quote_identifier(user_name);
    let mut statements = vec![format!("CREATE ROLE {} WITH LOGIN", role)];

    if private_schema {
        statements.push(format!("CREATE SCHEMA {}", role));
        statements.push(format!("GRANT USAGE ON SCHEMA {} TO {}", role, role));
        statements.push(format!(
            "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA {} TO {}",
            role, role
        ));
        statements.push(format!("GRANT EXECUTE ON ALL FUNCTIONS IN SCHEMA {} TO {}", role, role));
    }

    statements.push(format!("GRANT rds_iam TO {}", role));
    statements
}

/// Provision one analytics user: a per-user connect policy, an IAM user
/// (reused when it already exists), and a matching database role. The IAM
/// side and the database side are separate systems; there is no transaction
/// spanning both.
pub async fn provision_user(
    config: &ProvisionerConfig,
    identity: &dyn IdentityService,
    database: &dyn StatementExecutor,
    user_name: &str,
) -> Result<(), ProvisionError> {
    validate_identifier(user_name)?;

    let account_id = identity.caller_account_id().await?;
    let resource = DbUserArn::new(
        &config.partition,
        &config.region,
        account_id,
        &config.db_resource_id,
        user_name,
    );

    // The resource ARN names the specific user, so the policy can never be
    // satisfied by any other identity.
    let document =
        Policy::allow(Action::specific("rds-db", "connect"), Resource::Arn(resource.to_string()));
    let policy_arn = identity
        .create_policy(&policy_name(user_name), POLICY_PATH, POLICY_DESCRIPTION, &document.to_string())
        .await?;
    info!("Created connect policy {}", policy_arn);

    match identity.find_user(user_name).await? {
        Some(arn) => info!("Reusing existing IAM user {}", arn),
        None => {
            identity.create_user(user_name).await?;
            info!("Created IAM user {}", user_name);
        }
    }

    identity.attach_user_policy(user_name, &policy_arn).await?;
    identity.tag_user(user_name, ANALYTICS_TAG_KEY, ANALYTICS_TAG_VALUE).await?;

    let statements = role_statements(user_name, config.user_schemas);
    if let Err(e) = database.apply(&statements).await {
        // The policy, user, and tag above are not compensated. A retry for
        // the same user name fails on CreatePolicy until the leftovers are
        // removed.
        warn!(
            "Database provisioning for {} failed after IAM changes were applied; \
             the IAM user and policy remain in place",
            user_name
        );
        return Err(e);
    }

    info!("Provisioned database role {} with IAM authentication", user_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::{policy_name, provision_user, role_statements},
        crate::{
            db::StatementExecutor, error::ProvisionError, iam::IdentityService,
            policy::Policy,
        },
        async_trait::async_trait,
        fdw_gateway_config::{GatewayTarget, ProvisionerConfig},
        pretty_assertions::assert_eq,
        std::{str::FromStr, sync::Mutex},
    };

    fn test_config(user_schemas: bool) -> ProvisionerConfig {
        ProvisionerConfig {
            target: GatewayTarget {
                host: "gateway.example.internal".to_string(),
                database: "analytics".to_string(),
                root_secret_id: "gateway/root".to_string(),
            },
            db_resource_id: "db-EXAMPLE12345".to_string(),
            region: "ap-southeast-2".to_string(),
            partition: "aws".to_string(),
            user_schemas,
        }
    }

    #[derive(Default)]
    struct FakeIdentity {
        existing_users: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeIdentity {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl IdentityService for FakeIdentity {
        async fn caller_account_id(&self) -> Result<String, ProvisionError> {
            self.calls.lock().unwrap().push("GetCallerIdentity".to_string());
            Ok("123456789012".to_string())
        }

        async fn find_user(&self, user_name: &str) -> Result<Option<String>, ProvisionError> {
            self.calls.lock().unwrap().push(format!("GetUser {}", user_name));
            if self.existing_users.iter().any(|u| u == user_name) {
                Ok(Some(format!("arn:aws:iam::123456789012:user/{}", user_name)))
            } else {
                Ok(None)
            }
        }

        async fn create_user(&self, user_name: &str) -> Result<(), ProvisionError> {
            self.calls.lock().unwrap().push(format!("CreateUser {}", user_name));
            Ok(())
        }

        async fn create_policy(
            &self,
            policy_name: &str,
            path: &str,
            _description: &str,
            document: &str,
        ) -> Result<String, ProvisionError> {
            // The document must be a well-formed policy scoping the named
            // user, not just any string.
            let policy = Policy::from_str(document).unwrap();
            assert_eq!(policy.statement.len(), 1);
            self.calls.lock().unwrap().push(format!("CreatePolicy {}{}", path, policy_name));
            Ok(format!("arn:aws:iam::123456789012:policy{}{}", path, policy_name))
        }

        async fn attach_user_policy(
            &self,
            user_name: &str,
            policy_arn: &str,
        ) -> Result<(), ProvisionError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("AttachUserPolicy {} {}", user_name, policy_arn));
            Ok(())
        }

        async fn tag_user(
            &self,
            user_name: &str,
            key: &str,
            value: &str,
        ) -> Result<(), ProvisionError> {
            self.calls.lock().unwrap().push(format!("TagUser {} {}={}", user_name, key, value));
            Ok(())
        }
    }

    struct RecordingExecutor {
        applied: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl RecordingExecutor {
        fn new(fail: bool) -> Self {
            Self {
                applied: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl StatementExecutor for RecordingExecutor {
        async fn apply(&self, statements: &[String]) -> Result<(), ProvisionError> {
            self.applied.lock().unwrap().push(statements.to_vec());
            if self.fail {
                Err(ProvisionError::Database(sqlx::Error::PoolClosed))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_role_statements_with_schema() {
        let statements = role_statements("alice", true);
        assert_eq!(
            statements,
            vec![
                "CREATE ROLE \"alice\" WITH LOGIN".to_string(),
                "CREATE SCHEMA \"alice\"".to_string(),
                "GRANT USAGE ON SCHEMA \"alice\" TO \"alice\"".to_string(),
                "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA \"alice\" TO \"alice\""
                    .to_string(),
                "GRANT EXECUTE ON ALL FUNCTIONS IN SCHEMA \"alice\" TO \"alice\"".to_string(),
                "GRANT rds_iam TO \"alice\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_role_statements_without_schema() {
        let statements = role_statements("alice", false);
        assert_eq!(
            statements,
            vec![
                "CREATE ROLE \"alice\" WITH LOGIN".to_string(),
                "GRANT rds_iam TO \"alice\"".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_provision_fresh_user() {
        let identity = FakeIdentity::default();
        let database = RecordingExecutor::new(false);

        provision_user(&test_config(true), &identity, &database, "alice").await.unwrap();

        assert_eq!(
            identity.calls(),
            vec![
                "GetCallerIdentity".to_string(),
                format!("CreatePolicy /bde-analytics/{}", policy_name("alice")),
                "GetUser alice".to_string(),
                "CreateUser alice".to_string(),
                format!(
                    "AttachUserPolicy alice arn:aws:iam::123456789012:policy/bde-analytics/{}",
                    policy_name("alice")
                ),
                "TagUser alice bde-analytics-user=true".to_string(),
            ]
        );

        let applied = database.applied.lock().unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0], role_statements("alice", true));
    }

    #[tokio::test]
    async fn test_existing_user_is_not_recreated() {
        let identity = FakeIdentity {
            existing_users: vec!["alice".to_string()],
            calls: Mutex::new(Vec::new()),
        };
        let database = RecordingExecutor::new(false);

        provision_user(&test_config(false), &identity, &database, "alice").await.unwrap();

        let calls = identity.calls();
        assert!(calls.iter().any(|c| c == "GetUser alice"));
        assert!(!calls.iter().any(|c| c.starts_with("CreateUser")));
    }

    #[tokio::test]
    async fn test_invalid_user_name_stops_before_any_call() {
        let identity = FakeIdentity::default();
        let database = RecordingExecutor::new(false);

        let result =
            provision_user(&test_config(true), &identity, &database, "alice\"; DROP ROLE admin")
                .await;

        assert!(matches!(result, Err(ProvisionError::InvalidUserName(_, _))));
        assert!(identity.calls().is_empty());
        assert!(database.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_failure_leaves_iam_state() {
        let identity = FakeIdentity::default();
        let database = RecordingExecutor::new(true);

        let result = provision_user(&test_config(true), &identity, &database, "alice").await;
        assert!(matches!(result, Err(ProvisionError::Database(_))));

        // The IAM side is not rolled back: user, policy, attachment, and tag
        // all happened before the database failure.
        let calls = identity.calls();
        assert!(calls.iter().any(|c| c.starts_with("CreatePolicy")));
        assert!(calls.iter().any(|c| c.starts_with("CreateUser")));
        assert!(calls.iter().any(|c| c.starts_with("AttachUserPolicy")));
        assert!(calls.iter().any(|c| c.starts_with("TagUser")));
    }
}
