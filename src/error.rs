use thiserror::Error;

/// Longest error description echoed back to the user.
pub const MAX_DETAIL_CHARS: usize = 100;

/// Why a generation attempt did not produce a usable reply.
///
/// Each kind maps to the fixed text shown to the user by
/// [`user_message`](Self::user_message).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("response blocked by safety filter")]
    SafetyFiltered,
    #[error("response contained no text")]
    EmptyResponse,
    #[error("credential rejected: {detail}")]
    InvalidCredential {
        detail: String,
        /// Set when the API named the key itself as invalid, rather than
        /// refusing permission for some other reason.
        key_rejected: bool,
    },
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),
    #[error("api error: {0}")]
    OtherApiError(String),
    #[error("unexpected error: {0}")]
    UnexpectedError(String),
}

impl GenerationError {
    /// Reply text recorded in the log and returned to the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::SafetyFiltered => "Filtered".into(),
            Self::EmptyResponse => "Somone tell Vedal there is a problem with my Internet".into(),
            Self::InvalidCredential { .. } => "Somone tell Vedal there is a problem with my API".into(),
            Self::QuotaExceeded(_) => "API quota exceeded. Please try again later.".into(),
            Self::OtherApiError(detail) => {
                format!("API error: {}", truncate_chars(detail, MAX_DETAIL_CHARS))
            }
            Self::UnexpectedError(detail) => format!(
                "Somone tell Vedal there is a problem with my AI: {}",
                truncate_chars(detail, MAX_DETAIL_CHARS)
            ),
        }
    }

    /// Whether the API reported the key itself as invalid.
    pub fn is_key_rejected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential {
                key_rejected: true,
                ..
            }
        )
    }
}

/// Error payload returned by the generation API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiFailure {
    /// HTTP status code.
    pub code: u16,
    /// Symbolic status such as `RESOURCE_EXHAUSTED`.
    pub status: String,
    pub message: String,
    /// Machine readable reasons such as `API_KEY_INVALID`.
    pub reasons: Vec<String>,
}

impl ApiFailure {
    /// Human readable summary, e.g. `429 Resource has been exhausted`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.code, self.message).trim().to_string()
    }

    fn rejects_key(&self) -> bool {
        self.reasons.iter().any(|r| r == "API_KEY_INVALID")
            || self.message.contains("API_KEY_INVALID")
            || self.message.contains("API key not valid")
    }

    /// Sort the failure into credential, quota or generic API trouble.
    pub fn classify(&self) -> GenerationError {
        let haystack = format!(
            "{} {} {}",
            self.status,
            self.message,
            self.reasons.join(" ")
        )
        .to_lowercase();
        let key_rejected = self.rejects_key();
        if key_rejected
            || matches!(self.code, 401 | 403)
            || haystack.contains("invalid api key")
            || haystack.contains("permission denied")
            || haystack.contains("permission_denied")
        {
            GenerationError::InvalidCredential {
                detail: self.describe(),
                key_rejected,
            }
        } else if self.code == 429
            || haystack.contains("quota")
            || haystack.contains("limit")
            || haystack.contains("resource_exhausted")
        {
            GenerationError::QuotaExceeded(self.describe())
        } else {
            GenerationError::OtherApiError(self.describe())
        }
    }
}

/// First `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
