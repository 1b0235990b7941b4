//! Cinemate API response types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::xml::{
    deserialize_empty_as_none, deserialize_empty_string_as_none, deserialize_first_person,
    deserialize_flag, deserialize_id, deserialize_movie_list, deserialize_name_list,
    deserialize_person_list, deserialize_url_attr,
};

/// Records whose presence is signalled by a key field.
///
/// A decoded record with an unset key is treated as "nothing found".
pub(crate) trait Identified {
    /// Returns `true` if the key field is set.
    fn has_identity(&self) -> bool;
}

/// Poster or photo URLs in three sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageSet {
    /// Small image URL.
    #[serde(deserialize_with = "deserialize_url_attr", default)]
    pub small: Option<String>,
    /// Medium image URL.
    #[serde(deserialize_with = "deserialize_url_attr", default)]
    pub medium: Option<String>,
    /// Big image URL.
    #[serde(deserialize_with = "deserialize_url_attr", default)]
    pub big: Option<String>,
}

/// External rating: score and vote count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Rating {
    /// Average score.
    #[serde(
        rename(deserialize = "@rating"),
        deserialize_with = "deserialize_empty_as_none",
        default
    )]
    pub score: Option<f64>,
    /// Number of votes.
    #[serde(
        rename(deserialize = "@votes"),
        deserialize_with = "deserialize_empty_as_none",
        default
    )]
    pub votes: Option<u64>,
}

/// Origin of a [`Rating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingSource {
    /// IMDb.
    Imdb,
    /// Kinopoisk.
    Kinopoisk,
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Imdb => "imdb",
            Self::Kinopoisk => "kinopoisk",
        })
    }
}

/// A movie, series or short.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Movie {
    /// Cinemate movie ID (`0` when the server returned no record).
    #[serde(deserialize_with = "deserialize_id", default)]
    pub id: u64,
    /// `movie`, `serial` or `short`.
    #[serde(
        rename(deserialize = "type"),
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    pub kind: Option<String>,
    /// Russian title.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub title_russian: Option<String>,
    /// Original title.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub title_original: Option<String>,
    /// English title.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub title_english: Option<String>,
    /// Release year.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub year: Option<u32>,
    /// Runtime in minutes.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub runtime: Option<u32>,
    /// Plot summary.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub description: Option<String>,
    /// Trailer URL.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub trailer: Option<String>,
    /// Page on cinemate.cc.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub url: Option<String>,
    /// Poster images.
    #[serde(default)]
    pub poster: Option<ImageSet>,
    /// World premiere date.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub release_date_world: Option<String>,
    /// Russian premiere date.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub release_date_russia: Option<String>,
    /// IMDb rating.
    #[serde(default)]
    pub imdb: Option<Rating>,
    /// Kinopoisk rating.
    #[serde(default)]
    pub kinopoisk: Option<Rating>,
    /// Production countries.
    #[serde(
        rename(deserialize = "country"),
        deserialize_with = "deserialize_name_list",
        default
    )]
    pub countries: Vec<String>,
    /// Genres.
    #[serde(
        rename(deserialize = "genre"),
        deserialize_with = "deserialize_name_list",
        default
    )]
    pub genres: Vec<String>,
    /// First listed director.
    #[serde(deserialize_with = "deserialize_first_person", default)]
    pub director: Option<Person>,
    /// Cast in billing order.
    #[serde(deserialize_with = "deserialize_person_list", default)]
    pub cast: Vec<Person>,
}

impl Movie {
    /// Returns the ratings that are present, tagged by source.
    pub fn ratings(&self) -> impl Iterator<Item = (RatingSource, Rating)> + '_ {
        [
            (RatingSource::Imdb, self.imdb),
            (RatingSource::Kinopoisk, self.kinopoisk),
        ]
        .into_iter()
        .filter_map(|(source, rating)| rating.map(|r| (source, r)))
    }

    /// Best available title: Russian, then original, then English.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title_russian
            .as_deref()
            .or(self.title_original.as_deref())
            .or(self.title_english.as_deref())
            .unwrap_or_default()
    }
}

impl Identified for Movie {
    fn has_identity(&self) -> bool {
        self.id != 0
    }
}

/// Movies a person directed or acted in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Filmography {
    /// Movies directed.
    #[serde(
        rename(deserialize = "director"),
        deserialize_with = "deserialize_movie_list",
        default
    )]
    pub as_director: Vec<Movie>,
    /// Movies acted in.
    #[serde(
        rename(deserialize = "actor"),
        deserialize_with = "deserialize_movie_list",
        default
    )]
    pub as_actor: Vec<Movie>,
}

/// An actor, director or other crew member.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Person {
    /// Cinemate person ID.
    #[serde(deserialize_with = "deserialize_id", default)]
    pub id: u64,
    /// Russian name.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub name: Option<String>,
    /// Name in the original language.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub name_original: Option<String>,
    /// Photos.
    #[serde(default)]
    pub photo: Option<ImageSet>,
    /// Page on cinemate.cc.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub url: Option<String>,
    /// Filmography (only returned by `person.movies`).
    #[serde(default)]
    pub movies: Option<Filmography>,
}

impl Identified for Person {
    fn has_identity(&self) -> bool {
        self.id != 0
    }
}

/// Account summary returned by `account.profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountProfile {
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Reputation points (may be negative).
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub reputation: Option<i64>,
    /// Number of reviews written.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub review_count: Option<u32>,
    /// Gold badges.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub gold_badges: Option<u32>,
    /// Silver badges.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub silver_badges: Option<u32>,
    /// Bronze badges.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub bronze_badges: Option<u32>,
    /// Unread private messages.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub unread_pm_count: Option<u32>,
    /// Unread forum posts.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub unread_forum_count: Option<u32>,
    /// Unread update-feed entries.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub unread_updatelist_count: Option<u32>,
    /// Active subscriptions.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub subscription_count: Option<u32>,
}

impl Identified for AccountProfile {
    fn has_identity(&self) -> bool {
        !self.username.trim().is_empty()
    }
}

/// One entry of the account update feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdateListEntry {
    /// Event timestamp as sent by the server.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub date: Option<String>,
    /// Subject of the event (movie or person title).
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub for_object: Option<String>,
    /// Event text.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub description: Option<String>,
    /// Link to the event.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub url: Option<String>,
    /// Unread flag.
    #[serde(deserialize_with = "deserialize_flag", default)]
    pub new: Option<bool>,
}

/// A watched movie, person or comment thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WatchlistEntry {
    /// ID of the watched object.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub id: Option<u64>,
    /// Title or name.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub title: Option<String>,
    /// Page on cinemate.cc.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub url: Option<String>,
    /// Date the entry was added.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub date: Option<String>,
}

/// Objects the account is subscribed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Watchlist {
    /// Watched movies.
    #[serde(rename(deserialize = "movie"), default)]
    pub movies: Vec<WatchlistEntry>,
    /// Watched persons.
    #[serde(rename(deserialize = "person"), default)]
    pub persons: Vec<WatchlistEntry>,
    /// Watched comment threads.
    #[serde(rename(deserialize = "comment"), default)]
    pub comments: Vec<WatchlistEntry>,
}

impl Watchlist {
    /// Returns `true` if nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.persons.is_empty() && self.comments.is_empty()
    }
}

/// Site-wide counters from `stats.new`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteStats {
    /// Registered users.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub users_count: Option<u64>,
    /// Published reviews.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub reviews_count: Option<u64>,
    /// Published comments.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub comments_count: Option<u64>,
    /// Movies in the catalog.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub movies_count: Option<u64>,
    /// Persons in the catalog.
    #[serde(deserialize_with = "deserialize_empty_as_none", default)]
    pub persons_count: Option<u64>,
}
