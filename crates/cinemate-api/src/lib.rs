//! API client library for the Cinemate movie database.
//!
//! Builds query URLs for the `api.cinemate.cc` endpoints, performs one GET
//! per operation and decodes the XML payload into typed records.
//!
//! ```no_run
//! use cinemate_api::{CinemateApi, CinemateClient};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let client = CinemateClient::builder()
//!     .api_key("APIKEY")
//!     .user_agent("cinemate/0.3.0")
//!     .build()?;
//! let movie = client.movie(68675).await?;
//! println!("{}", movie.display_title());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod credential;
mod error;
mod operation;
mod pacing;
mod params;
mod query;
mod transport;
mod types;
mod xml;

#[allow(clippy::module_name_repetitions)]
pub use api::{CinemateApi, LocalCinemateApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CinemateClient, CinemateClientBuilder, DEFAULT_BASE_URL};
pub use credential::{Credential, CredentialTier, Credentials};
pub use error::{CinemateError, TransportError};
pub use operation::{Extraction, Operation, OperationDescriptor};
pub use pacing::{DEFAULT_CALL_DELAY, Pacing};
pub use params::{
    ListMode, MovieListParams, MovieState, MovieType, OrderBy, PER_PAGE_MAX, SortOrder,
    parse_date, to_cinemate_date,
};
pub use query::{QueryParams, build_url};
pub use transport::{HttpTransport, LocalTransport, Transport};
pub use types::{
    AccountProfile, Filmography, ImageSet, Movie, Person, Rating, RatingSource, SiteStats,
    UpdateListEntry, Watchlist, WatchlistEntry,
};
