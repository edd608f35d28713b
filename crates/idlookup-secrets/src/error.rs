//! Secret store errors.

use thiserror::Error;

/// Failure to resolve a secret.
///
/// Variants carry the secret name, never its value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// The backend call failed (network, permissions, missing secret).
    #[error("failed to retrieve secret '{name}': {message}")]
    Fetch { name: String, message: String },

    /// The secret exists but holds no data.
    #[error("secret '{name}' is empty")]
    Empty { name: String },

    /// The secret payload is not the expected JSON shape.
    #[error("secret '{name}' is malformed: {message}")]
    Malformed { name: String, message: String },

    /// The secret decoded but a required field is missing or empty.
    #[error("secret '{name}' is missing field '{field}'")]
    MissingField { name: String, field: &'static str },

    /// The requested backend is not available in this build.
    #[error("secret store backend unavailable: {0}")]
    Unavailable(String),
}

impl SecretError {
    /// Name of the secret involved, when known.
    pub fn secret_name(&self) -> Option<&str> {
        match self {
            Self::Fetch { name, .. }
            | Self::Empty { name }
            | Self::Malformed { name, .. }
            | Self::MissingField { name, .. } => Some(name),
            Self::Unavailable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_secret() {
        let err = SecretError::MissingField {
            name: "prod/mysql/elig".into(),
            field: "password",
        };
        assert_eq!(err.to_string(), "secret 'prod/mysql/elig' is missing field 'password'");
        assert_eq!(err.secret_name(), Some("prod/mysql/elig"));
        assert_eq!(SecretError::Unavailable("aws".into()).secret_name(), None);
    }
}
