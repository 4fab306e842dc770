use {
    crate::error::ProvisionError,
    async_trait::async_trait,
    aws_sdk_iam::{error::DisplayErrorContext, types::Tag, Client as IamClient},
    aws_sdk_sts::Client as StsClient,
    log::debug,
};

/// The identity-side operations the provisioner needs. Implemented against
/// AWS IAM/STS in production and against a recording fake in tests.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn caller_account_id(&self) -> Result<String, ProvisionError>;

    /// Look up a user by name, returning its ARN. `Ok(None)` means the user
    /// does not exist; any other lookup failure propagates.
    async fn find_user(&self, user_name: &str) -> Result<Option<String>, ProvisionError>;

    async fn create_user(&self, user_name: &str) -> Result<(), ProvisionError>;

    /// Register a managed policy and return its ARN. Not idempotent: a
    /// duplicate invocation for the same name fails here.
    async fn create_policy(
        &self,
        policy_name: &str,
        path: &str,
        description: &str,
        document: &str,
    ) -> Result<String, ProvisionError>;

    async fn attach_user_policy(
        &self,
        user_name: &str,
        policy_arn: &str,
    ) -> Result<(), ProvisionError>;

    async fn tag_user(&self, user_name: &str, key: &str, value: &str)
        -> Result<(), ProvisionError>;
}

pub struct AwsIdentityService {
    iam: IamClient,
    sts: StsClient,
}

impl AwsIdentityService {
    pub fn new(iam: IamClient, sts: StsClient) -> Self {
        Self {
            iam,
            sts,
        }
    }
}

#[async_trait]
impl IdentityService for AwsIdentityService {
    async fn caller_account_id(&self) -> Result<String, ProvisionError> {
        let output = self.sts.get_caller_identity().send().await.map_err(|e| {
            ProvisionError::Identity("GetCallerIdentity", DisplayErrorContext(&e).to_string())
        })?;

        match output.account() {
            Some(account) => Ok(account.to_string()),
            None => Err(ProvisionError::MissingCallerAccount),
        }
    }

    async fn find_user(&self, user_name: &str) -> Result<Option<String>, ProvisionError> {
        match self.iam.get_user().user_name(user_name).send().await {
            Ok(output) => match output.user() {
                Some(user) => Ok(Some(user.arn().to_string())),
                None => Err(ProvisionError::Identity(
                    "GetUser",
                    "response did not include a user".to_string(),
                )),
            },
            Err(e) => {
                let e = e.into_service_error();
                if e.is_no_such_entity_exception() {
                    debug!("IAM user {} does not exist yet", user_name);
                    Ok(None)
                } else {
                    Err(ProvisionError::Identity("GetUser", DisplayErrorContext(&e).to_string()))
                }
            }
        }
    }

    async fn create_user(&self, user_name: &str) -> Result<(), ProvisionError> {
        self.iam.create_user().user_name(user_name).send().await.map_err(|e| {
            ProvisionError::Identity("CreateUser", DisplayErrorContext(&e).to_string())
        })?;
        Ok(())
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        path: &str,
        description: &str,
        document: &str,
    ) -> Result<String, ProvisionError> {
        let output = self
            .iam
            .create_policy()
            .policy_name(policy_name)
            .path(path)
            .description(description)
            .policy_document(document)
            .send()
            .await
            .map_err(|e| {
                ProvisionError::Identity("CreatePolicy", DisplayErrorContext(&e).to_string())
            })?;

        match output.policy().and_then(|policy| policy.arn()) {
            Some(arn) => Ok(arn.to_string()),
            None => Err(ProvisionError::Identity(
                "CreatePolicy",
                "response did not include a policy ARN".to_string(),
            )),
        }
    }

    async fn attach_user_policy(
        &self,
        user_name: &str,
        policy_arn: &str,
    ) -> Result<(), ProvisionError> {
        self.iam
            .attach_user_policy()
            .user_name(user_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| {
                ProvisionError::Identity("AttachUserPolicy", DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }

    async fn tag_user(
        &self,
        user_name: &str,
        key: &str,
        value: &str,
    ) -> Result<(), ProvisionError> {
        let tag = Tag::builder()
            .key(key)
            .value(value)
            .build()
            .map_err(|e| ProvisionError::Identity("TagUser", e.to_string()))?;

        self.iam.tag_user().user_name(user_name).tags(tag).send().await.map_err(|e| {
            ProvisionError::Identity("TagUser", DisplayErrorContext(&e).to_string())
        })?;
        Ok(())
    }
}
