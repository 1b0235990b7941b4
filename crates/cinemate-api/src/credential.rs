//! Credentials and the trust tier each operation requires.

use std::fmt;

/// Which credential an operation must send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTier {
    /// No credential (`account.auth`, `stats.new`).
    Public,
    /// Developer API key (catalog endpoints).
    ApiKey,
    /// Per-account pass-key (account endpoints).
    PassKey,
}

/// An opaque credential string tagged with its tier.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Developer API key, sent as `apikey`.
    ApiKey(String),
    /// Account pass-key, sent as `passkey`.
    PassKey(String),
}

impl Credential {
    /// Returns the tier this credential satisfies.
    #[must_use]
    pub const fn tier(&self) -> CredentialTier {
        match self {
            Self::ApiKey(_) => CredentialTier::ApiKey,
            Self::PassKey(_) => CredentialTier::PassKey,
        }
    }

    /// Query parameter name the server expects.
    #[must_use]
    pub const fn param_name(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "apikey",
            Self::PassKey(_) => "passkey",
        }
    }

    /// Raw secret value.
    #[must_use]
    pub fn secret(&self) -> &str {
        match self {
            Self::ApiKey(s) | Self::PassKey(s) => s,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::PassKey(_) => f.write_str("PassKey(***)"),
        }
    }
}

/// Credentials held by a client handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: Option<Credential>,
    pass_key: Option<Credential>,
}

impl Credentials {
    /// Creates an empty credential set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            api_key: None,
            pass_key: None,
        }
    }

    /// Stores a credential, replacing any previous one of the same tier.
    /// Empty strings are ignored.
    pub fn insert(&mut self, credential: Credential) {
        if credential.secret().is_empty() {
            return;
        }
        match credential {
            Credential::ApiKey(_) => self.api_key = Some(credential),
            Credential::PassKey(_) => self.pass_key = Some(credential),
        }
    }

    /// Looks up the credential for `tier`.
    ///
    /// Returns `Ok(None)` for [`CredentialTier::Public`].
    ///
    /// # Errors
    ///
    /// Returns the missing tier when no credential of that tier is stored.
    pub fn for_tier(&self, tier: CredentialTier) -> Result<Option<&Credential>, CredentialTier> {
        let stored = match tier {
            CredentialTier::Public => return Ok(None),
            CredentialTier::ApiKey => self.api_key.as_ref(),
            CredentialTier::PassKey => self.pass_key.as_ref(),
        };
        stored.map(Some).ok_or(tier)
    }
}
