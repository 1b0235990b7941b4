//! Operation descriptor table.
//!
//! Each logical operation is one row: endpoint path, credential tier,
//! required and optional parameters, whether `format=xml` is sent, and how
//! the result is taken out of the decoded envelope.

use std::fmt;

use crate::credential::CredentialTier;
use crate::error::CinemateError;
use crate::types::Identified;

/// How the result is taken out of a decoded envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// First record of the collection; its key must be set.
    First,
    /// The whole collection; it must be non-empty and its first key set.
    All,
    /// The single root record; its key must be set.
    Record,
    /// The decoded document as-is.
    Unchecked,
}

/// Static description of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Name used in logs and errors.
    pub name: &'static str,
    /// Path segment appended to the base URL.
    pub path: &'static str,
    /// Credential the request carries.
    pub tier: CredentialTier,
    /// Parameters that must be present (credential included).
    pub required: &'static [&'static str],
    /// Parameters sent only when set.
    pub optional: &'static [&'static str],
    /// Whether `format=xml` is appended.
    pub sends_format: bool,
    /// Result extraction rule.
    pub extraction: Extraction,
}

/// Every operation the client supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Exchange username and password for a pass-key.
    Authenticate,
    /// Account summary.
    AccountProfile,
    /// Account update feed.
    AccountUpdates,
    /// Watched objects.
    AccountWatchlist,
    /// One movie by id.
    Movie,
    /// Filtered movie listing.
    MovieList,
    /// Movie title search.
    MovieSearch,
    /// One person by id.
    Person,
    /// A person's filmography.
    PersonMovies,
    /// Person name search.
    PersonSearch,
    /// Site-wide counters.
    SiteStats,
}

const MOVIE_LIST_OPTIONAL: &[&str] = &[
    "type", "state", "mode", "year", "genre", "country", "order_by", "order", "from", "to", "page",
    "per_page", "format",
];

impl Operation {
    /// All operations, in table order.
    pub const ALL: [Self; 11] = [
        Self::Authenticate,
        Self::AccountProfile,
        Self::AccountUpdates,
        Self::AccountWatchlist,
        Self::Movie,
        Self::MovieList,
        Self::MovieSearch,
        Self::Person,
        Self::PersonMovies,
        Self::PersonSearch,
        Self::SiteStats,
    ];

    /// Returns the descriptor row for this operation.
    #[must_use]
    pub const fn descriptor(self) -> OperationDescriptor {
        const FORMAT: &[&str] = &["format"];

        match self {
            Self::Authenticate => OperationDescriptor {
                name: "authenticate",
                path: "account.auth",
                tier: CredentialTier::Public,
                required: &["username", "password"],
                optional: &[],
                sends_format: false,
                extraction: Extraction::Record,
            },
            Self::AccountProfile => OperationDescriptor {
                name: "account_profile",
                path: "account.profile",
                tier: CredentialTier::PassKey,
                required: &["passkey"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::Record,
            },
            Self::AccountUpdates => OperationDescriptor {
                name: "account_updates",
                path: "account.updatelist",
                tier: CredentialTier::PassKey,
                required: &["passkey", "newonly"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::Unchecked,
            },
            Self::AccountWatchlist => OperationDescriptor {
                name: "account_watchlist",
                path: "account.watchlist",
                tier: CredentialTier::PassKey,
                required: &["passkey"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::Unchecked,
            },
            Self::Movie => OperationDescriptor {
                name: "movie",
                path: "movie",
                tier: CredentialTier::ApiKey,
                required: &["apikey", "id"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::First,
            },
            Self::MovieList => OperationDescriptor {
                name: "movie_list",
                path: "movie.list",
                tier: CredentialTier::ApiKey,
                required: &["apikey"],
                optional: MOVIE_LIST_OPTIONAL,
                sends_format: true,
                extraction: Extraction::All,
            },
            Self::MovieSearch => OperationDescriptor {
                name: "movie_search",
                path: "movie.search",
                tier: CredentialTier::ApiKey,
                required: &["apikey", "term"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::All,
            },
            Self::Person => OperationDescriptor {
                name: "person",
                path: "person",
                tier: CredentialTier::ApiKey,
                required: &["apikey", "id"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::First,
            },
            Self::PersonMovies => OperationDescriptor {
                name: "person_movies",
                path: "person.movies",
                tier: CredentialTier::ApiKey,
                required: &["apikey", "id"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::First,
            },
            Self::PersonSearch => OperationDescriptor {
                name: "person_search",
                path: "person.search",
                tier: CredentialTier::ApiKey,
                required: &["apikey", "term"],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::All,
            },
            Self::SiteStats => OperationDescriptor {
                name: "site_stats",
                path: "stats.new",
                tier: CredentialTier::Public,
                required: &[],
                optional: FORMAT,
                sends_format: true,
                extraction: Extraction::Unchecked,
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().name)
    }
}

/// Applies `rule` to decoded records.
///
/// `First` and `Record` keep only the leading record. `subject` names the
/// queried id or term in the `NotFound` error.
pub(crate) fn extract<T: Identified>(
    rule: Extraction,
    operation: &'static str,
    subject: &str,
    items: Vec<T>,
) -> Result<Vec<T>, CinemateError> {
    match rule {
        Extraction::Unchecked => Ok(items),
        Extraction::First | Extraction::Record => items
            .into_iter()
            .next()
            .filter(Identified::has_identity)
            .map(|first| vec![first])
            .ok_or_else(|| CinemateError::not_found(operation, subject)),
        Extraction::All => {
            if items.first().is_some_and(Identified::has_identity) {
                Ok(items)
            } else {
                Err(CinemateError::not_found(operation, subject))
            }
        }
    }
}

/// Like [`extract`], returning the single leading record.
pub(crate) fn extract_one<T: Identified>(
    rule: Extraction,
    operation: &'static str,
    subject: &str,
    items: Vec<T>,
) -> Result<T, CinemateError> {
    extract(rule, operation, subject, items)?
        .into_iter()
        .next()
        .ok_or_else(|| CinemateError::not_found(operation, subject))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use super::*;
    use crate::types::Movie;

    fn movie(id: u64) -> Movie {
        Movie {
            id,
            ..Movie::default()
        }
    }

    #[test]
    fn test_paths_are_unique() {
        // Arrange & Act
        let paths: HashSet<&str> = Operation::ALL
            .iter()
            .map(|op| op.descriptor().path)
            .collect();

        // Assert
        assert_eq!(paths.len(), Operation::ALL.len());
    }

    #[test]
    fn test_person_search_hits_person_endpoint() {
        // Arrange & Act
        let descriptor = Operation::PersonSearch.descriptor();

        // Assert
        assert_eq!(descriptor.path, "person.search");
        assert_eq!(descriptor.required, &["apikey", "term"]);
    }

    #[test]
    fn test_only_authenticate_omits_format() {
        // Arrange & Act
        let without_format: Vec<Operation> = Operation::ALL
            .into_iter()
            .filter(|op| !op.descriptor().sends_format)
            .collect();

        // Assert
        assert_eq!(without_format, vec![Operation::Authenticate]);
    }

    #[test]
    fn test_required_credential_matches_tier() {
        // Arrange & Act & Assert
        for op in Operation::ALL {
            let d = op.descriptor();
            match d.tier {
                CredentialTier::Public => {
                    assert!(!d.required.contains(&"apikey"), "{op}");
                    assert!(!d.required.contains(&"passkey"), "{op}");
                }
                CredentialTier::ApiKey => assert!(d.required.contains(&"apikey"), "{op}"),
                CredentialTier::PassKey => assert!(d.required.contains(&"passkey"), "{op}"),
            }
        }
    }

    #[test]
    fn test_descriptor_table() {
        // Arrange
        let expected = [
            (Operation::Authenticate, "account.auth", CredentialTier::Public, Extraction::Record),
            (Operation::AccountProfile, "account.profile", CredentialTier::PassKey, Extraction::Record),
            (Operation::AccountUpdates, "account.updatelist", CredentialTier::PassKey, Extraction::Unchecked),
            (Operation::AccountWatchlist, "account.watchlist", CredentialTier::PassKey, Extraction::Unchecked),
            (Operation::Movie, "movie", CredentialTier::ApiKey, Extraction::First),
            (Operation::MovieList, "movie.list", CredentialTier::ApiKey, Extraction::All),
            (Operation::MovieSearch, "movie.search", CredentialTier::ApiKey, Extraction::All),
            (Operation::Person, "person", CredentialTier::ApiKey, Extraction::First),
            (Operation::PersonMovies, "person.movies", CredentialTier::ApiKey, Extraction::First),
            (Operation::PersonSearch, "person.search", CredentialTier::ApiKey, Extraction::All),
            (Operation::SiteStats, "stats.new", CredentialTier::Public, Extraction::Unchecked),
        ];

        // Act & Assert
        for (op, path, tier, extraction) in expected {
            let d = op.descriptor();
            assert_eq!(d.path, path, "{op}");
            assert_eq!(d.tier, tier, "{op}");
            assert_eq!(d.extraction, extraction, "{op}");
        }
        assert!(
            Operation::MovieList
                .descriptor()
                .optional
                .contains(&"per_page")
        );
        assert!(
            Operation::AccountUpdates
                .descriptor()
                .required
                .contains(&"newonly")
        );
    }

    #[test]
    fn test_extract_first_takes_leading_record() {
        // Arrange
        let items = vec![movie(7), movie(8)];

        // Act
        let result = extract_one(Extraction::First, "movie", "7", items).unwrap();

        // Assert
        assert_eq!(result.id, 7);
    }

    #[test]
    fn test_extract_empty_is_not_found() {
        // Arrange & Act
        let first = extract_one::<Movie>(Extraction::First, "movie", "7", Vec::new());
        let all = extract::<Movie>(Extraction::All, "movie_search", "x", Vec::new());

        // Assert
        assert!(matches!(first, Err(CinemateError::NotFound { .. })));
        assert!(matches!(all, Err(CinemateError::NotFound { .. })));
    }

    #[test]
    fn test_extract_zero_identity_is_not_found() {
        // Arrange & Act
        let err = extract_one(Extraction::Record, "movie", "9", vec![movie(0)]).unwrap_err();

        // Assert
        assert_eq!(err.to_string(), "movie: nothing found for \"9\"");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_extract_all_and_unchecked_keep_everything() {
        // Arrange & Act
        let all = extract(Extraction::All, "movie_list", "", vec![movie(1), movie(2)]).unwrap();
        let unchecked = extract::<Movie>(Extraction::Unchecked, "x", "", Vec::new()).unwrap();

        // Assert
        assert_eq!(all.len(), 2);
        assert!(unchecked.is_empty());
    }
}
