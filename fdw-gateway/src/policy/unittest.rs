use {
    crate::policy::{Action, Effect, Policy, Resource},
    pretty_assertions::assert_eq,
    std::str::FromStr,
};

#[test_log::test]
fn test_connect_policy_export() {
    let policy = Policy::allow(
        Action::specific("rds-db", "connect"),
        Resource::Arn(
            "arn:aws:rds-db:ap-southeast-2:123456789012:dbuser:db-EXAMPLE12345/alice".to_string(),
        ),
    );

    assert_eq!(
        policy.to_string(),
        r#"{
    "Version": "2012-10-17",
    "Statement": [
        {
            "Effect": "Allow",
            "Action": "rds-db:connect",
            "Resource": "arn:aws:rds-db:ap-southeast-2:123456789012:dbuser:db-EXAMPLE12345/alice"
        }
    ]
}"#
    );
}

#[test_log::test]
fn test_policy_round_trip() {
    let policy = Policy::allow(
        Action::specific("rds-db", "connect"),
        Resource::Arn("arn:aws:rds-db:ap-southeast-2:123456789012:dbuser:db-X/bob".to_string()),
    );
    let reparsed = Policy::from_str(&policy.to_string()).unwrap();
    assert_eq!(reparsed, policy);

    assert_eq!(reparsed.version, Some("2012-10-17".to_string()));
    assert!(reparsed.id.is_none());
    assert_eq!(reparsed.statement.len(), 1);
    assert_eq!(reparsed.statement[0].effect, Effect::Allow);
}

#[test_log::test]
fn test_wildcards_parse() {
    let policy = Policy::from_str(
        r#"{
    "Version": "2012-10-17",
    "Statement": [
        {
            "Effect": "Deny",
            "Action": "*",
            "Resource": "*"
        }
    ]
}"#,
    )
    .unwrap();

    assert_eq!(policy.statement[0].effect, Effect::Deny);
    assert_eq!(policy.statement[0].action, Action::Any);
    assert_eq!(policy.statement[0].resource, Resource::Any);
}

#[test_log::test]
fn test_invalid_effect_rejected() {
    let result = Policy::from_str(
        r#"{"Statement": [{"Effect": "Maybe", "Action": "rds-db:connect", "Resource": "*"}]}"#,
    );
    assert!(result.is_err());
}

#[test_log::test]
fn test_invalid_action_rejected() {
    for action in ["connect", "rds db:connect", "rds-db:", ":connect", "rds-db:con nect"] {
        let doc = format!(
            r#"{{"Statement": [{{"Effect": "Allow", "Action": "{}", "Resource": "*"}}]}}"#,
            action
        );
        assert!(Policy::from_str(&doc).is_err(), "{:?} should be rejected", action);
    }
}
