//! Error types returned by Cinemate operations.

use url::Url;

/// Failure at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TransportError {
    /// The server answered with a status other than 200.
    #[error("HTTP {status} received from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL (credentials redacted).
        url: String,
    },
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed")]
    Network {
        /// Requested URL (credentials redacted).
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Returns the HTTP status code, if the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }
}

/// Errors returned by the operation pipeline.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CinemateError {
    /// A caller-supplied parameter failed a local precondition.
    /// No request was sent.
    #[error("{operation}: invalid request: {reason}")]
    Validation {
        /// Operation name.
        operation: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The HTTP round trip failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The payload did not match the expected schema.
    #[error("{operation}: XML decoding failed: {preview}")]
    Decode {
        /// Operation name.
        operation: &'static str,
        /// Leading part of the response body.
        preview: String,
        /// Deserializer error.
        #[source]
        source: quick_xml::de::DeError,
    },

    /// The response decoded fine but held no matching record.
    #[error("{operation}: nothing found for {query:?}")]
    NotFound {
        /// Operation name.
        operation: &'static str,
        /// Queried id or term.
        query: String,
    },
}

impl CinemateError {
    pub(crate) fn validation(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(operation: &'static str, query: impl Into<String>) -> Self {
        Self::NotFound {
            operation,
            query: query.into(),
        }
    }

    /// Returns `true` when retrying with different input may help
    /// (`Validation`, `NotFound`), `false` for infrastructure failures.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound { .. })
    }
}

/// Formats a URL for logs and errors with credential values masked.
pub(crate) fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if matches!(name.as_ref(), "apikey" | "passkey" | "password") {
                String::from("***")
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}
