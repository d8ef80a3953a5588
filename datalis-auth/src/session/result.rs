/// Outcome of a signup or login attempt.
///
/// A failure always carries a message; a success never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Success {
        requires_email_verification: bool,
        message: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl AuthResult {
    pub fn success() -> Self {
        Self::Success {
            requires_email_verification: false,
            message: None,
        }
    }

    pub fn verification_required(message: impl Into<String>) -> Self {
        Self::Success {
            requires_email_verification: true,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. } => message.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    pub fn requires_email_verification(&self) -> bool {
        matches!(
            self,
            Self::Success {
                requires_email_verification: true,
                ..
            }
        )
    }
}
