//! `CinemateApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::CinemateError;
use crate::params::MovieListParams;
use crate::types::{AccountProfile, Movie, Person, SiteStats, UpdateListEntry, Watchlist};

/// Cinemate API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CinemateApi: Send)]
pub trait LocalCinemateApi {
    /// Exchanges a username and password for a pass-key.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty username or password and
    /// `NotFound` when the server issues no pass-key.
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, CinemateError>;

    /// Fetches the account summary for the configured pass-key.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a pass-key and `NotFound` when the
    /// response carries no account.
    async fn account_profile(&self) -> Result<AccountProfile, CinemateError>;

    /// Fetches the account update feed.
    ///
    /// `new_only` defaults to unread entries only; `Some(false)` returns all.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a pass-key, or a transport or decode error.
    async fn account_updates(
        &self,
        new_only: Option<bool>,
    ) -> Result<Vec<UpdateListEntry>, CinemateError>;

    /// Fetches the objects the account watches.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without a pass-key, or a transport or decode error.
    async fn account_watchlist(&self) -> Result<Watchlist, CinemateError>;

    /// Fetches one movie by id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for `id == 0` or a missing API key, and
    /// `NotFound` when the server has no such movie.
    async fn movie(&self, id: u64) -> Result<Movie, CinemateError>;

    /// Lists movies matching `params`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing matches.
    async fn movie_list(&self, params: &MovieListParams) -> Result<Vec<Movie>, CinemateError>;

    /// Searches movies by title.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty term and `NotFound` when nothing
    /// matches.
    async fn movie_search(&self, term: &str) -> Result<Vec<Movie>, CinemateError>;

    /// Fetches one person by id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for `id == 0` and `NotFound` for an unknown id.
    async fn person(&self, id: u64) -> Result<Person, CinemateError>;

    /// Fetches a person together with their filmography.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for `id == 0` and `NotFound` for an unknown id.
    async fn person_movies(&self, id: u64) -> Result<Person, CinemateError>;

    /// Searches persons by name.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty term and `NotFound` when nothing
    /// matches.
    async fn person_search(&self, term: &str) -> Result<Vec<Person>, CinemateError>;

    /// Fetches site-wide counters. Needs no credential.
    ///
    /// # Errors
    ///
    /// Returns a transport or decode error.
    async fn site_stats(&self) -> Result<SiteStats, CinemateError>;
}
