//! `CinemateClient` - Cinemate API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::api::CinemateApi;
use crate::credential::{Credential, CredentialTier, Credentials};
use crate::error::{CinemateError, redact_url};
use crate::operation::{Operation, extract, extract_one};
use crate::pacing::{DEFAULT_CALL_DELAY, Pacing};
use crate::params::MovieListParams;
use crate::query::{QueryParams, build_url};
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    AccountProfile, Identified, Movie, Person, SiteStats, UpdateListEntry, Watchlist,
};
use crate::xml::{
    AuthResponse, CatalogResponse, ProfileResponse, StatsResponse, UpdateListResponse,
    WatchlistResponse, body_preview, decode,
};

/// Default base URL.
pub const DEFAULT_BASE_URL: &str = "http://api.cinemate.cc";

/// Cinemate API client.
///
/// Holds only immutable configuration; clone it or share it by reference
/// across tasks.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct CinemateClient<T = HttpTransport> {
    /// HTTP boundary.
    transport: T,
    /// Base URL.
    base_url: Url,
    /// API key and pass-key.
    credentials: Credentials,
    /// Pre-call delay.
    pacing: Pacing,
}

/// Builder for `CinemateClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CinemateClientBuilder {
    base_url: Option<Url>,
    credentials: Credentials,
    user_agent: Option<String>,
    call_delay: Option<Duration>,
}

impl CinemateClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credentials: Credentials::new(),
            user_agent: None,
            call_delay: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the developer API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials.insert(Credential::ApiKey(key.into()));
        self
    }

    /// Sets the account pass-key.
    #[must_use]
    pub fn pass_key(mut self, key: impl Into<String>) -> Self {
        self.credentials.insert(Credential::PassKey(key.into()));
        self
    }

    /// Sets the User-Agent (required by [`build`](Self::build)).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the delay before each request (default: 1s, zero disables it).
    #[must_use]
    pub const fn call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    /// Builds the client with the reqwest transport.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    /// - The base URL cannot carry a path.
    pub fn build(self) -> Result<CinemateClient> {
        let user_agent = self
            .user_agent
            .as_deref()
            .context("user_agent is required")?;
        let transport = HttpTransport::new(user_agent)?;
        self.build_with_transport(transport)
    }

    /// Builds the client on top of `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<CinemateClient<T>> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        if base_url.cannot_be_a_base() {
            bail!("base URL cannot carry a path: {base_url}");
        }

        let pacing = Pacing::new(self.call_delay.unwrap_or(DEFAULT_CALL_DELAY));

        Ok(CinemateClient {
            transport,
            base_url,
            credentials: self.credentials,
            pacing,
        })
    }
}

impl CinemateClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CinemateClientBuilder {
        CinemateClientBuilder::new()
    }
}

impl<T> CinemateClient<T> {
    /// Configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Configured pacing.
    #[must_use]
    pub const fn pacing(&self) -> Pacing {
        self.pacing
    }
}

/// Rejects a zero id.
fn require_id(operation: &'static str, id: u64) -> Result<(), CinemateError> {
    if id == 0 {
        return Err(CinemateError::validation(
            operation,
            "id must be greater than zero",
        ));
    }
    Ok(())
}

/// Rejects an empty or whitespace-only value.
fn require_text(operation: &'static str, name: &str, value: &str) -> Result<(), CinemateError> {
    if value.trim().is_empty() {
        return Err(CinemateError::validation(
            operation,
            format!("{name} must not be empty"),
        ));
    }
    Ok(())
}

/// Renders the caller's filters for `NotFound` messages.
fn describe(query: &QueryParams) -> String {
    query
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

impl Identified for AuthResponse {
    fn has_identity(&self) -> bool {
        self.passkey.is_some()
    }
}

impl<T: Transport + Sync> CinemateClient<T> {
    /// Runs one operation up to the decoded envelope.
    ///
    /// Resolves the credential, checks required parameters, builds the URL,
    /// waits the pacing delay, fetches and decodes. Nothing is sent when a
    /// check fails.
    async fn execute<E: DeserializeOwned>(
        &self,
        operation: Operation,
        mut query: QueryParams,
    ) -> Result<E, CinemateError> {
        let descriptor = operation.descriptor();

        let credential = self
            .credentials
            .for_tier(descriptor.tier)
            .map_err(|tier| {
                let what = match tier {
                    CredentialTier::PassKey => "pass-key",
                    CredentialTier::ApiKey | CredentialTier::Public => "API key",
                };
                CinemateError::validation(descriptor.name, format!("{what} is not configured"))
            })?;
        if let Some(credential) = credential {
            query.set(credential.param_name(), credential.secret());
        }

        if let Some(missing) = descriptor
            .required
            .iter()
            .copied()
            .find(|name| !query.contains(name))
        {
            return Err(CinemateError::validation(
                descriptor.name,
                format!("missing required parameter `{missing}`"),
            ));
        }
        if descriptor.sends_format {
            query.set("format", "xml");
        }

        let url = build_url(&self.base_url, descriptor.path, &query)
            .map_err(|e| CinemateError::validation(descriptor.name, e.to_string()))?;
        tracing::debug!(
            operation = descriptor.name,
            url = %redact_url(&url),
            "Sending request"
        );

        self.pacing.wait().await;
        let body = Transport::fetch(&self.transport, &url).await?;

        tracing::debug!(
            operation = descriptor.name,
            body_len = body.len(),
            "Response body received"
        );
        tracing::trace!(
            operation = descriptor.name,
            body_preview = %body_preview(&String::from_utf8_lossy(&body)),
            "Response body preview"
        );

        decode(descriptor.name, &body)
    }
}

impl<T: Transport + Sync> CinemateApi for CinemateClient<T> {
    #[instrument(skip_all)]
    async fn authenticate(&self, username: &str, password: &str) -> Result<String, CinemateError> {
        let operation = Operation::Authenticate;
        let descriptor = operation.descriptor();
        require_text(descriptor.name, "username", username)?;
        require_text(descriptor.name, "password", password)?;

        let mut query = QueryParams::new();
        query.set("username", username).set("password", password);

        let response: AuthResponse = self.execute(operation, query).await?;
        extract_one(
            descriptor.extraction,
            descriptor.name,
            username,
            vec![response],
        )?
        .passkey
        .ok_or_else(|| CinemateError::not_found(descriptor.name, username))
    }

    #[instrument(skip_all)]
    async fn account_profile(&self) -> Result<AccountProfile, CinemateError> {
        let operation = Operation::AccountProfile;
        let descriptor = operation.descriptor();

        let response: ProfileResponse = self.execute(operation, QueryParams::new()).await?;
        extract_one(
            descriptor.extraction,
            descriptor.name,
            "account",
            response.account.into_iter().collect(),
        )
    }

    #[instrument(skip_all)]
    async fn account_updates(
        &self,
        new_only: Option<bool>,
    ) -> Result<Vec<UpdateListEntry>, CinemateError> {
        let mut query = QueryParams::new();
        query.set("newonly", if new_only.unwrap_or(true) { "1" } else { "0" });

        let response: UpdateListResponse =
            self.execute(Operation::AccountUpdates, query).await?;
        Ok(response.items)
    }

    #[instrument(skip_all)]
    async fn account_watchlist(&self) -> Result<Watchlist, CinemateError> {
        let response: WatchlistResponse = self
            .execute(Operation::AccountWatchlist, QueryParams::new())
            .await?;
        Ok(response)
    }

    #[instrument(skip_all)]
    async fn movie(&self, id: u64) -> Result<Movie, CinemateError> {
        let operation = Operation::Movie;
        let descriptor = operation.descriptor();
        require_id(descriptor.name, id)?;

        let mut query = QueryParams::new();
        query.set("id", id.to_string());

        let response: CatalogResponse = self.execute(operation, query).await?;
        extract_one(
            descriptor.extraction,
            descriptor.name,
            &id.to_string(),
            response.movies,
        )
    }

    #[instrument(skip_all)]
    async fn movie_list(&self, params: &MovieListParams) -> Result<Vec<Movie>, CinemateError> {
        let operation = Operation::MovieList;
        let descriptor = operation.descriptor();

        let mut query = QueryParams::new();
        params.apply(&mut query);
        let subject = describe(&query);

        let response: CatalogResponse = self.execute(operation, query).await?;
        extract(
            descriptor.extraction,
            descriptor.name,
            &subject,
            response.movies,
        )
    }

    #[instrument(skip_all)]
    async fn movie_search(&self, term: &str) -> Result<Vec<Movie>, CinemateError> {
        let operation = Operation::MovieSearch;
        let descriptor = operation.descriptor();
        require_text(descriptor.name, "term", term)?;

        let mut query = QueryParams::new();
        query.set("term", term);

        let response: CatalogResponse = self.execute(operation, query).await?;
        extract(descriptor.extraction, descriptor.name, term, response.movies)
    }

    #[instrument(skip_all)]
    async fn person(&self, id: u64) -> Result<Person, CinemateError> {
        let operation = Operation::Person;
        let descriptor = operation.descriptor();
        require_id(descriptor.name, id)?;

        let mut query = QueryParams::new();
        query.set("id", id.to_string());

        let response: CatalogResponse = self.execute(operation, query).await?;
        extract_one(
            descriptor.extraction,
            descriptor.name,
            &id.to_string(),
            response.persons,
        )
    }

    #[instrument(skip_all)]
    async fn person_movies(&self, id: u64) -> Result<Person, CinemateError> {
        let operation = Operation::PersonMovies;
        let descriptor = operation.descriptor();
        require_id(descriptor.name, id)?;

        let mut query = QueryParams::new();
        query.set("id", id.to_string());

        let response: CatalogResponse = self.execute(operation, query).await?;
        extract_one(
            descriptor.extraction,
            descriptor.name,
            &id.to_string(),
            response.persons,
        )
    }

    #[instrument(skip_all)]
    async fn person_search(&self, term: &str) -> Result<Vec<Person>, CinemateError> {
        let operation = Operation::PersonSearch;
        let descriptor = operation.descriptor();
        require_text(descriptor.name, "term", term)?;

        let mut query = QueryParams::new();
        query.set("term", term);

        let response: CatalogResponse = self.execute(operation, query).await?;
        extract(descriptor.extraction, descriptor.name, term, response.persons)
    }

    #[instrument(skip_all)]
    async fn site_stats(&self) -> Result<SiteStats, CinemateError> {
        let response: StatsResponse = self
            .execute(Operation::SiteStats, QueryParams::new())
            .await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use super::*;
    use crate::error::TransportError;
    use crate::params::{MovieType, OrderBy, SortOrder};

    /// Transport returning one canned answer and recording requested URLs.
    #[derive(Debug, Clone)]
    struct CannedTransport {
        answer: Result<&'static str, u16>,
        seen: Arc<Mutex<Vec<Url>>>,
    }

    impl CannedTransport {
        fn ok(body: &'static str) -> Self {
            Self {
                answer: Ok(body),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn status(status: u16) -> Self {
            Self {
                answer: Err(status),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn urls(&self) -> Vec<Url> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for CannedTransport {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
            self.seen.lock().unwrap().push(url.clone());
            match self.answer {
                Ok(body) => Ok(body.as_bytes().to_vec()),
                Err(status) => Err(TransportError::Status {
                    status,
                    url: redact_url(url),
                }),
            }
        }
    }

    fn client(transport: &CannedTransport) -> CinemateClient<CannedTransport> {
        CinemateClient::builder()
            .api_key("APIKEY")
            .pass_key("PASSKEY")
            .call_delay(Duration::ZERO)
            .build_with_transport(transport.clone())
            .unwrap()
    }

    fn query_of(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = CinemateClient::builder().build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_defaults() {
        // Arrange & Act
        let client = CinemateClient::builder()
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), "http://api.cinemate.cc/");
        assert_eq!(client.pacing().delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_builder_rejects_cannot_be_a_base_url() {
        // Arrange & Act
        let result = CinemateClient::builder()
            .base_url(Url::parse("mailto:x@example.com").unwrap())
            .build_with_transport(CannedTransport::ok(""));

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_movie_from_fixture() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/movie_68675.xml"));
        let client = client(&transport);

        // Act
        let movie = client.movie(68675).await.unwrap();

        // Assert
        assert_eq!(movie.id, 68675);
        assert!(!movie.title_russian.unwrap().is_empty());
        let urls = transport.urls();
        assert_eq!(urls.len(), 1);
        assert_eq!(
            urls[0].as_str(),
            "http://api.cinemate.cc/movie?apikey=APIKEY&format=xml&id=68675"
        );
    }

    #[tokio::test]
    async fn test_movie_missing_is_not_found() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/empty_response.xml"));
        let client = client(&transport);

        // Act
        let err = client.movie(31).await.unwrap_err();

        // Assert
        assert!(matches!(
            err,
            CinemateError::NotFound {
                operation: "movie",
                ..
            }
        ));
        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn test_decoding_is_repeatable() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/movie_68675.xml"));
        let client = client(&transport);

        // Act
        let first = client.movie(68675).await.unwrap();
        let second = client.movie(68675).await.unwrap();

        // Assert
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_id_is_rejected_without_request() {
        // Arrange
        let transport = CannedTransport::ok("<response/>");
        let client = client(&transport);

        // Act
        let movie = client.movie(0).await.unwrap_err();
        let person = client.person_movies(0).await.unwrap_err();
        let search = client.movie_search("   ").await.unwrap_err();

        // Assert
        assert!(matches!(movie, CinemateError::Validation { .. }));
        assert!(matches!(person, CinemateError::Validation { .. }));
        assert!(matches!(search, CinemateError::Validation { .. }));
        assert!(transport.urls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_is_validation_error() {
        // Arrange
        let transport = CannedTransport::ok("<response/>");
        let client = CinemateClient::builder()
            .call_delay(Duration::ZERO)
            .build_with_transport(transport.clone())
            .unwrap();

        // Act
        let movie = client.movie(31).await.unwrap_err();
        let profile = client.account_profile().await.unwrap_err();

        // Assert
        assert_eq!(
            movie.to_string(),
            "movie: invalid request: API key is not configured"
        );
        assert_eq!(
            profile.to_string(),
            "account_profile: invalid request: pass-key is not configured"
        );
        assert!(transport.urls().is_empty());
    }

    #[tokio::test]
    async fn test_movie_list_sends_only_set_fields() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/movie_list.xml"));
        let client = client(&transport);
        let params = MovieListParams::new()
            .kind(MovieType::Serial)
            .year(2010)
            .order(OrderBy::CreateDate, SortOrder::Asc)
            .date_range(
                NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2010, 6, 30).unwrap(),
            );

        // Act
        let movies = client.movie_list(&params).await.unwrap();

        // Assert
        assert_eq!(movies.len(), 3);
        let query = query_of(&transport.urls()[0]);
        let names: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "apikey", "format", "from", "order", "order_by", "to", "type", "year"
            ]
        );
        assert!(query.contains(&(String::from("from"), String::from("01.01.2010"))));
    }

    #[tokio::test]
    async fn test_movie_list_per_page() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/movie_list.xml"));
        let client = client(&transport);

        // Act
        client.movie_list(&MovieListParams::new()).await.unwrap();
        client
            .movie_list(&MovieListParams {
                per_page: Some(10),
                ..MovieListParams::default()
            })
            .await
            .unwrap();

        // Assert
        let urls = transport.urls();
        assert!(!urls[0].as_str().contains("per_page"));
        assert!(urls[1].as_str().contains("per_page=10"));
        assert_ne!(urls[0].query(), urls[1].query());
    }

    #[tokio::test]
    async fn test_movie_list_empty_is_not_found() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/empty_response.xml"));
        let client = client(&transport);

        // Act
        let err = client
            .movie_list(&MovieListParams::new().genre("sport"))
            .await
            .unwrap_err();

        // Assert
        assert_eq!(
            err.to_string(),
            "movie_list: nothing found for \"genre=sport\""
        );
    }

    #[tokio::test]
    async fn test_movie_search() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/movie_search.xml"));
        let client = client(&transport);

        // Act
        let movies = client.movie_search("Пираты кариб").await.unwrap();

        // Assert
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 3620);
        let url = &transport.urls()[0];
        assert_eq!(url.path(), "/movie.search");
        assert!(query_of(url).contains(&(String::from("term"), String::from("Пираты кариб"))));
    }

    #[tokio::test]
    async fn test_person_and_person_movies() {
        // Arrange
        let person_transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/person_3971.xml"));
        let movies_transport = CannedTransport::ok(include_str!(
            "../../../fixtures/cinemate/person_movies_3971.xml"
        ));

        // Act
        let person = client(&person_transport).person(3971).await.unwrap();
        let filmography = client(&movies_transport).person_movies(3971).await.unwrap();

        // Assert
        assert_eq!(person.id, 3971);
        assert_eq!(person.name_original.as_deref(), Some("Christopher Nolan"));
        assert!(person.movies.is_none());
        assert_eq!(filmography.movies.unwrap().as_director.len(), 2);
        assert_eq!(movies_transport.urls()[0].path(), "/person.movies");
    }

    #[tokio::test]
    async fn test_person_search_uses_person_endpoint() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/person_search.xml"));
        let client = client(&transport);

        // Act
        let persons = client.person_search("Нолан").await.unwrap();

        // Assert
        assert_eq!(persons.len(), 2);
        assert_eq!(transport.urls()[0].path(), "/person.search");
    }

    #[tokio::test]
    async fn test_account_profile() {
        // Arrange
        let transport = CannedTransport::ok(include_str!(
            "../../../fixtures/cinemate/account_profile.xml"
        ));
        let client = client(&transport);

        // Act
        let profile = client.account_profile().await.unwrap();

        // Assert
        assert_eq!(profile.username, "kinoman");
        assert_eq!(profile.reputation, Some(-3));
        assert_eq!(profile.gold_badges, Some(1));
        assert_eq!(profile.unread_updatelist_count, Some(4));
        assert_eq!(
            transport.urls()[0].as_str(),
            "http://api.cinemate.cc/account.profile?format=xml&passkey=PASSKEY"
        );
    }

    #[tokio::test]
    async fn test_account_profile_missing_is_not_found() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/empty_response.xml"));

        // Act
        let err = client(&transport).account_profile().await.unwrap_err();

        // Assert
        assert!(matches!(err, CinemateError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_account_updates_newonly_flag() {
        // Arrange
        let transport = CannedTransport::ok(include_str!(
            "../../../fixtures/cinemate/account_updatelist.xml"
        ));
        let client = client(&transport);

        // Act
        let unread = client.account_updates(None).await.unwrap();
        client.account_updates(Some(false)).await.unwrap();

        // Assert
        assert_eq!(unread.len(), 2);
        assert_eq!(unread[0].new, Some(true));
        let urls = transport.urls();
        assert!(query_of(&urls[0]).contains(&(String::from("newonly"), String::from("1"))));
        assert!(query_of(&urls[1]).contains(&(String::from("newonly"), String::from("0"))));
    }

    #[tokio::test]
    async fn test_account_watchlist() {
        // Arrange
        let transport = CannedTransport::ok(include_str!(
            "../../../fixtures/cinemate/account_watchlist.xml"
        ));

        // Act
        let watchlist = client(&transport).account_watchlist().await.unwrap();

        // Assert
        assert_eq!(watchlist.movies.len(), 2);
        assert_eq!(watchlist.persons.len(), 1);
        assert!(watchlist.comments.is_empty());
        assert_eq!(watchlist.movies[0].id, Some(68675));
    }

    #[tokio::test]
    async fn test_account_watchlist_interleaved_sections() {
        // Arrange
        let transport = CannedTransport::ok(include_str!(
            "../../../fixtures/cinemate/account_watchlist_interleaved.xml"
        ));

        // Act
        let watchlist = client(&transport).account_watchlist().await.unwrap();

        // Assert
        let movie_ids: Vec<_> = watchlist.movies.iter().map(|e| e.id).collect();
        let person_ids: Vec<_> = watchlist.persons.iter().map(|e| e.id).collect();
        assert_eq!(movie_ids, vec![Some(68675), Some(118426)]);
        assert_eq!(person_ids, vec![Some(3971), Some(7437)]);
        assert_eq!(watchlist.comments.len(), 1);
        assert_eq!(watchlist.comments[0].id, None);
    }

    #[tokio::test]
    async fn test_movie_interleaved_with_persons() {
        // Arrange
        let transport = CannedTransport::ok(
            "<response><movie><id>1</id></movie><person><id>2</id></person><movie><id>3</id></movie></response>",
        );

        // Act
        let movie = client(&transport).movie(1).await.unwrap();

        // Assert
        assert_eq!(movie.id, 1);
    }

    #[tokio::test]
    async fn test_site_stats_needs_no_credential() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/stats_new.xml"));
        let client = CinemateClient::builder()
            .call_delay(Duration::ZERO)
            .build_with_transport(transport.clone())
            .unwrap();

        // Act
        let stats = client.site_stats().await.unwrap();

        // Assert
        assert_eq!(stats.users_count, Some(183_562));
        assert_eq!(stats.movies_count, Some(74_013));
        assert_eq!(
            transport.urls()[0].as_str(),
            "http://api.cinemate.cc/stats.new?format=xml"
        );
    }

    #[tokio::test]
    async fn test_authenticate_returns_passkey() {
        // Arrange
        let transport = CannedTransport::ok(include_str!("../../../fixtures/cinemate/auth.xml"));
        let client = client(&transport);

        // Act
        let passkey = client.authenticate("kinoman", "secret").await.unwrap();

        // Assert
        assert_eq!(passkey, "6f2bd6c1e5a04a7d");
        let query = query_of(&transport.urls()[0]);
        assert_eq!(query.len(), 2);
        assert!(!query.iter().any(|(k, _)| k == "format"));
    }

    #[tokio::test]
    async fn test_authenticate_without_passkey_is_not_found() {
        // Arrange
        let transport =
            CannedTransport::ok(include_str!("../../../fixtures/cinemate/auth_failed.xml"));

        // Act
        let err = client(&transport)
            .authenticate("kinoman", "wrong")
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(err, CinemateError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_empty_body_is_not_found() {
        // Arrange
        let transport = CannedTransport::ok("");

        // Act
        let err = client(&transport)
            .authenticate("kinoman", "secret")
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(
            err,
            CinemateError::NotFound {
                operation: "authenticate",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_movie_empty_body_is_not_found() {
        // Arrange
        let transport = CannedTransport::ok("");

        // Act
        let err = client(&transport).movie(31).await.unwrap_err();

        // Assert
        assert!(err.is_caller_error());
        match err {
            CinemateError::NotFound { operation, query } => {
                assert_eq!(operation, "movie");
                assert_eq!(query, "31");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_forbidden_is_transport_error() {
        // Arrange
        let transport = CannedTransport::status(403);

        // Act
        let err = client(&transport)
            .authenticate("kinoman", "wrong")
            .await
            .unwrap_err();

        // Assert
        assert!(!err.is_caller_error());
        match err {
            CinemateError::Transport(inner) => assert_eq!(inner.status(), Some(403)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        // Arrange
        let transport =
            CannedTransport::ok("<response><movie><id>abc</id></movie></response>");

        // Act
        let err = client(&transport).movie(31).await.unwrap_err();

        // Assert
        assert!(matches!(
            err,
            CinemateError::Decode {
                operation: "movie",
                ..
            }
        ));
        assert!(!err.is_caller_error());
    }

    #[tokio::test]
    async fn test_movie_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let xml_body = include_str!("../../../fixtures/cinemate/movie_68675.xml");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/movie"))
            .and(wiremock::matchers::query_param("apikey", "APIKEY"))
            .and(wiremock::matchers::query_param("id", "68675"))
            .and(wiremock::matchers::query_param("format", "xml"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(xml_body))
            .mount(&mock_server)
            .await;

        let client = CinemateClient::builder()
            .base_url(mock_server.uri().parse().unwrap())
            .api_key("APIKEY")
            .user_agent("test/0.0.0")
            .call_delay(Duration::ZERO)
            .build()
            .unwrap();

        // Act
        let movie = client.movie(68675).await.unwrap();

        // Assert
        assert_eq!(movie.id, 68675);
        assert_eq!(movie.title_russian.as_deref(), Some("Начало"));
    }

    #[tokio::test]
    async fn test_authenticate_403_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/account.auth"))
            .respond_with(wiremock::ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = CinemateClient::builder()
            .base_url(mock_server.uri().parse().unwrap())
            .user_agent("test/0.0.0")
            .call_delay(Duration::ZERO)
            .build()
            .unwrap();

        // Act
        let err = client.authenticate("kinoman", "secret").await.unwrap_err();

        // Assert
        assert!(matches!(err, CinemateError::Transport(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
