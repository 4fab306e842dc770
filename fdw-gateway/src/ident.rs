use crate::error::ProvisionError;

// Postgres truncates identifiers beyond this; a truncated role name would no
// longer match the IAM user it was provisioned for.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Check that `name` is usable both as a database identifier and as an IAM
/// user name: an ASCII letter or underscore followed by letters, digits, or
/// underscores. Everything else is rejected before any external call is made.
pub fn validate_identifier(name: &str) -> Result<(), ProvisionError> {
    if name.is_empty() {
        return Err(ProvisionError::InvalidUserName(name.into(), "name is empty"));
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(ProvisionError::InvalidUserName(name.into(), "name is longer than 63 bytes"));
    }

    for (i, c) in name.bytes().enumerate() {
        if i == 0 {
            if !c.is_ascii_alphabetic() && c != b'_' {
                return Err(ProvisionError::InvalidUserName(
                    name.into(),
                    "name must start with a letter or underscore",
                ));
            }
        } else if !c.is_ascii_alphanumeric() && c != b'_' {
            return Err(ProvisionError::InvalidUserName(
                name.into(),
                "name may only contain letters, digits, and underscores",
            ));
        }
    }

    Ok(())
}

/// Quote an identifier for interpolation into a DDL statement. Embedded
/// double quotes are doubled, though `validate_identifier` rejects them
/// before any statement is built.
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Quote a string literal for a statement that cannot take bind parameters
/// (server and user-mapping OPTIONS).
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push('\'');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}
