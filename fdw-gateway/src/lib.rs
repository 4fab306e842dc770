#![warn(clippy::all)]

mod arn;
mod bootstrap;
mod db;
mod error;
mod iam;
mod ident;
mod policy;
mod secrets;
mod user;

pub use self::{
    arn::DbUserArn,
    bootstrap::{bootstrap_statements, initialize_gateway, FOREIGN_SCHEMAS, FOREIGN_SERVER},
    db::{GatewayDatabase, StatementExecutor},
    error::ProvisionError,
    iam::{AwsIdentityService, IdentityService},
    ident::{quote_identifier, quote_literal, validate_identifier},
    policy::{Action, Effect, Policy, Resource, Statement},
    secrets::{Credentials, SecretStore, SecretsManagerStore},
    user::{policy_name, provision_user, role_statements, ANALYTICS_TAG_KEY},
};
