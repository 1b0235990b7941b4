//! Canonical query URL construction.

use std::collections::BTreeMap;

use url::Url;

/// Query parameters, kept sorted by name so the encoded string is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: BTreeMap<&'static str, String>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pairs: BTreeMap::new(),
        }
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.pairs.insert(name, value.into());
        self
    }

    /// Sets a parameter only when `value` is present and not an empty string.
    pub fn set_opt<V: ToString>(&mut self, name: &'static str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            let v = v.to_string();
            if !v.is_empty() {
                self.pairs.insert(name, v);
            }
        }
        self
    }

    /// Returns the value of `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is set to a non-empty value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates `(name, value)` in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Builds `{base}/{path}?{params}`.
///
/// `path` becomes the last path segment of `base`; parameters are
/// form-urlencoded in lexicographic order.
///
/// # Errors
///
/// Returns an error if `base` cannot carry a path (e.g. `mailto:`).
pub fn build_url(base: &Url, path: &str, params: &QueryParams) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(path);

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
}
