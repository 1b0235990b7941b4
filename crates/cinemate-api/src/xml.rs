//! XML response envelopes and custom deserializers.

use std::fmt::Display;
use std::str::FromStr;

use quick_xml::de::DeError;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

use crate::error::CinemateError;
use crate::types::{AccountProfile, Movie, Person, SiteStats, UpdateListEntry, Watchlist};

/// Maximum number of body bytes quoted in a decode error.
const PREVIEW_LEN: usize = 500;

/// Deserializes empty strings as `None` (for `String` fields).
pub fn deserialize_empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserializes empty strings as `None`, parsing anything else as `T`.
pub fn deserialize_empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|e| {
            D::Error::custom(format!(
                "failed to parse {v:?} as {}: {e}",
                std::any::type_name::<T>()
            ))
        }),
    }
}

/// Deserializes a record id. Empty or missing ids become `0`.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_empty_as_none::<D, u64>(deserializer).map(Option::unwrap_or_default)
}

/// Deserializes `0`/`1` (or `false`/`true`) flags.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Option::deserialize(deserializer);
    let s: Option<String> = result.map_err(D::Error::custom)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("1" | "true") => Ok(Some(true)),
        Some("0" | "false") => Ok(Some(false)),
        Some(other) => Err(D::Error::custom(format!("invalid flag: {other:?}"))),
    }
}

/// `<x url="..."/>` element.
#[derive(Debug, Deserialize)]
struct UrlAttr {
    #[serde(
        rename = "@url",
        deserialize_with = "deserialize_empty_string_as_none",
        default
    )]
    url: Option<String>,
}

/// Takes the `url` attribute of an image element.
pub fn deserialize_url_attr<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let attr: Option<UrlAttr> = Option::deserialize(deserializer)?;
    Ok(attr.and_then(|a| a.url))
}

/// `<country><name>..</name>..</country>` container.
#[derive(Debug, Deserialize)]
struct NameList {
    #[serde(rename = "name", default)]
    names: Vec<String>,
}

/// Flattens a `name` list into its text values.
pub fn deserialize_name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<NameList> = Option::deserialize(deserializer)?;
    Ok(list.map_or_else(Vec::new, |l| {
        l.names
            .into_iter()
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .collect()
    }))
}

/// `<director>`/`<cast>` container of `person` elements.
#[derive(Debug, Deserialize)]
struct PersonList {
    #[serde(rename = "person", default)]
    items: Vec<Person>,
}

/// Flattens `x>person` into a list.
pub fn deserialize_person_list<'de, D>(deserializer: D) -> Result<Vec<Person>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<PersonList> = Option::deserialize(deserializer)?;
    Ok(list.map_or_else(Vec::new, |l| l.items))
}

/// Takes the first person of `x>person`.
pub fn deserialize_first_person<'de, D>(deserializer: D) -> Result<Option<Person>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_person_list(deserializer).map(|items| items.into_iter().next())
}

/// `<director>`/`<actor>` container of `movie` elements.
#[derive(Debug, Deserialize)]
struct MovieList {
    #[serde(rename = "movie", default)]
    items: Vec<Movie>,
}

/// Flattens `x>movie` into a list.
pub fn deserialize_movie_list<'de, D>(deserializer: D) -> Result<Vec<Movie>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<MovieList> = Option::deserialize(deserializer)?;
    Ok(list.map_or_else(Vec::new, |l| l.items))
}

/// Catalog response (`movie*`, `person*` under the root).
#[derive(Debug, Deserialize)]
#[serde(rename = "response")]
pub struct CatalogResponse {
    /// Movie records.
    #[serde(rename = "movie", default)]
    pub movies: Vec<Movie>,
    /// Person records.
    #[serde(rename = "person", default)]
    pub persons: Vec<Person>,
}

/// `account.profile` response.
#[derive(Debug, Deserialize)]
#[serde(rename = "response")]
pub struct ProfileResponse {
    /// Account record (absent for an unknown pass-key).
    #[serde(default)]
    pub account: Option<AccountProfile>,
}

/// `account.updatelist` response.
#[derive(Debug, Deserialize)]
#[serde(rename = "response")]
pub struct UpdateListResponse {
    /// Update feed entries.
    #[serde(rename = "item", default)]
    pub items: Vec<UpdateListEntry>,
}

/// `account.watchlist` response. The document root is the record itself.
pub type WatchlistResponse = Watchlist;

/// `stats.new` response. The document root is the record itself.
pub type StatsResponse = SiteStats;

/// `account.auth` response.
#[derive(Debug, Deserialize)]
#[serde(rename = "response")]
pub struct AuthResponse {
    /// Issued pass-key.
    #[serde(deserialize_with = "deserialize_empty_string_as_none", default)]
    pub passkey: Option<String>,
}

/// Builds a preview of the response body for error messages.
pub fn body_preview(xml: &str) -> String {
    if xml.len() <= PREVIEW_LEN {
        return xml.to_owned();
    }
    let mut end = PREVIEW_LEN;
    while !xml.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    xml.get(..end).unwrap_or_default().to_owned()
}

/// Document a blank body stands for.
const EMPTY_DOCUMENT: &str = "<response/>";

/// Decodes `body` into `T`, tagging failures with `operation`.
///
/// A blank body decodes as an empty `<response/>`, so extraction reports
/// `NotFound` instead of a syntax error. A body that is not UTF-8 is a
/// `Decode` error.
pub fn decode<T>(operation: &'static str, body: &[u8]) -> Result<T, CinemateError>
where
    T: serde::de::DeserializeOwned,
{
    let xml = std::str::from_utf8(body).map_err(|e| CinemateError::Decode {
        operation,
        preview: body_preview(&String::from_utf8_lossy(body)),
        source: DeError::custom(format!("response is not valid UTF-8: {e}")),
    })?;
    let xml = if xml.trim().is_empty() {
        EMPTY_DOCUMENT
    } else {
        xml
    };
    quick_xml::de::from_str(xml).map_err(|source| CinemateError::Decode {
        operation,
        preview: body_preview(xml),
        source,
    })
}
