use std::{
    error::Error,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
};

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(String),
    InvalidFlag(String, String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MissingVar(name) => write!(f, "Missing environment variable: {}", name),
            Self::InvalidFlag(name, value) => {
                write!(f, "Invalid value for {}: {:?} (expected \"true\" or \"false\")", name, value)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::ConfigError;

    #[test]
    fn test_display() {
        assert_eq!(
            ConfigError::MissingVar("RDS_FDW_HOST".to_string()).to_string(),
            "Missing environment variable: RDS_FDW_HOST"
        );
        assert_eq!(
            ConfigError::InvalidFlag("USER_SCHEMAS".to_string(), "yes".to_string()).to_string(),
            "Invalid value for USER_SCHEMAS: \"yes\" (expected \"true\" or \"false\")"
        );
    }
}
