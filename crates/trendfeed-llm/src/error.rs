use std::fmt;

use thiserror::Error;

/// Errors raised while talking to the generation provider or reading its
/// output.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key is configured for this process.
    #[error("OPENAI_API_KEY is not configured")]
    NotConfigured,

    /// The configured base URL could not be parsed.
    #[error("invalid LLM base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Connect failure, timeout, or TLS error.
    #[error("LLM transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("LLM provider returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The provider (or the model) produced text that is not valid JSON.
    #[error("LLM returned malformed JSON: {0}")]
    MalformedJson(String),

    /// Valid JSON that does not satisfy the flow's output contract.
    #[error("LLM output violates contract: {0}")]
    ContractViolation(String),
}

/// Coarse classification of an [`LlmError`], used to look up the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotConfigured,
    Transport,
    UpstreamStatus,
    MalformedJson,
    ContractViolation,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Transport => "transport",
            Self::UpstreamStatus => "upstream_status",
            Self::MalformedJson => "malformed_json",
            Self::ContractViolation => "contract_violation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LlmError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotConfigured | Self::InvalidBaseUrl { .. } => FailureKind::NotConfigured,
            Self::Transport(_) => FailureKind::Transport,
            Self::UpstreamStatus { .. } => FailureKind::UpstreamStatus,
            Self::MalformedJson(_) => FailureKind::MalformedJson,
            Self::ContractViolation(_) => FailureKind::ContractViolation,
        }
    }
}

/// The generation flows, each with its own failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    LongForm,
    BatchItems,
    Classify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Replace the result with the flow's deterministic fallback.
    Fallback,
}

impl Flow {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LongForm => "longform",
            Self::BatchItems => "batch_items",
            Self::Classify => "classify",
        }
    }

    /// Policy table: the long-form flow surfaces every failure, the batch
    /// and classification flows absorb every failure.
    #[must_use]
    pub fn policy(self, kind: FailureKind) -> FailurePolicy {
        match (self, kind) {
            (Self::LongForm, _) => FailurePolicy::Propagate,
            (Self::BatchItems | Self::Classify, _) => FailurePolicy::Fallback,
        }
    }

    /// Apply this flow's policy to an attempt.
    ///
    /// `Ok` passes through. An error whose policy is [`FailurePolicy::Fallback`]
    /// is logged and replaced by `fallback()`; any other error is returned.
    ///
    /// # Errors
    ///
    /// Returns the original [`LlmError`] when the policy is
    /// [`FailurePolicy::Propagate`].
    pub fn settle<T>(
        self,
        attempt: Result<T, LlmError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, LlmError> {
        match attempt {
            Ok(value) => Ok(value),
            Err(error) => match self.policy(error.kind()) {
                FailurePolicy::Fallback => {
                    tracing::warn!(
                        flow = self.as_str(),
                        kind = %error.kind(),
                        error = %error,
                        "generation failed, using fallback"
                    );
                    Ok(fallback())
                }
                FailurePolicy::Propagate => {
                    tracing::warn!(
                        flow = self.as_str(),
                        kind = %error.kind(),
                        error = %error,
                        "generation failed"
                    );
                    Err(error)
                }
            },
        }
    }
}
