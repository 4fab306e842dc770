use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// The `rds-db` resource ARN a connect policy is scoped to. The user name is
/// the final path segment, so no two users ever share an ARN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DbUserArn {
    partition: String,
    region: String,
    account_id: String,
    resource_id: String,
    user_name: String,
}

impl DbUserArn {
    pub fn new<S1, S2, S3, S4, S5>(
        partition: S1,
        region: S2,
        account_id: S3,
        resource_id: S4,
        user_name: S5,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
        S5: Into<String>,
    {
        Self {
            partition: partition.into(),
            region: region.into(),
            account_id: account_id.into(),
            resource_id: resource_id.into(),
            user_name: user_name.into(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }
}

impl Display for DbUserArn {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "arn:{}:rds-db:{}:{}:dbuser:{}/{}",
            self.partition, self.region, self.account_id, self.resource_id, self.user_name
        )
    }
}

#[cfg(test)]
mod tests {
    use {super::DbUserArn, pretty_assertions::assert_eq};

    #[test]
    fn test_format() {
        let arn = DbUserArn::new("aws", "ap-southeast-2", "123456789012", "db-EXAMPLE12345", "alice");
        assert_eq!(
            arn.to_string(),
            "arn:aws:rds-db:ap-southeast-2:123456789012:dbuser:db-EXAMPLE12345/alice"
        );
    }

    #[test]
    fn test_distinct_users_never_collide() {
        let users = ["alice", "alice2", "bob", "bob_analytics", "b"];
        let arns: Vec<String> = users
            .iter()
            .map(|u| {
                DbUserArn::new("aws", "ap-southeast-2", "123456789012", "db-EXAMPLE12345", *u)
                    .to_string()
            })
            .collect();

        for (i, a) in arns.iter().enumerate() {
            for (j, b) in arns.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }
}
