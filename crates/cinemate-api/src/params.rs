//! Request parameter types for `movie.list`.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::query::QueryParams;

/// Server-side cap on `per_page`. Not enforced locally.
pub const PER_PAGE_MAX: u32 = 25;

/// Generates a string-valued parameter enum with `Display` and `FromStr`.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Value sent on the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => bail!(
                        "invalid {}: {other:?} (expected one of: {})",
                        stringify!($name),
                        [$($wire),+].join(", ")
                    ),
                }
            }
        }
    };
}

wire_enum! {
    /// `type` filter.
    MovieType {
        /// Feature film.
        Movie => "movie",
        /// TV series.
        Serial => "serial",
        /// Short film.
        Short => "short",
    }
}

wire_enum! {
    /// `state` filter.
    MovieState {
        /// Coming soon.
        Soon => "soon",
        /// Now in cinemas.
        Cinema => "cinema",
    }
}

wire_enum! {
    /// `mode` filter.
    ListMode {
        /// Best movies ordered by IMDb rating.
        Best => "best",
    }
}

wire_enum! {
    /// `order_by` sort key.
    OrderBy {
        /// Date added to the site.
        CreateDate => "create_date",
        /// World release date.
        ReleaseDate => "release_date",
        /// Russian release date (server default).
        RuReleaseDate => "ru_release_date",
    }
}

wire_enum! {
    /// `order` direction.
    SortOrder {
        /// Descending (server default).
        Desc => "desc",
        /// Ascending.
        Asc => "asc",
    }
}

/// Formats a date the way `from`/`to` expect (`DD.MM.YYYY`).
#[must_use]
pub fn to_cinemate_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Parses `YYYY-MM-DD` or `DD.MM.YYYY`.
///
/// # Errors
///
/// Returns an error if the string matches neither format.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .with_context(|| format!("invalid date format: {s}"))
}

/// Filters for `movie.list`. Every field is optional; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieListParams {
    /// Movie type.
    pub kind: Option<MovieType>,
    /// Release state.
    pub state: Option<MovieState>,
    /// Special listing mode.
    pub mode: Option<ListMode>,
    /// Release year.
    pub year: Option<u32>,
    /// Genre slug (e.g. `"sport"`).
    pub genre: Option<String>,
    /// Country slug (e.g. `"kazakhstan"`).
    pub country: Option<String>,
    /// Sort key.
    pub order_by: Option<OrderBy>,
    /// Sort direction.
    pub order: Option<SortOrder>,
    /// Inclusive lower bound on the `order_by` date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the `order_by` date.
    pub to: Option<NaiveDate>,
    /// Page number (server default 0).
    pub page: Option<u32>,
    /// Page size (server default 10, max [`PER_PAGE_MAX`]).
    pub per_page: Option<u32>,
}

impl MovieListParams {
    /// Creates an empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the movie type.
    #[must_use]
    pub const fn kind(mut self, kind: MovieType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the release state.
    #[must_use]
    pub const fn state(mut self, state: MovieState) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the listing mode.
    #[must_use]
    pub const fn mode(mut self, mode: ListMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the genre slug.
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Sets the country slug.
    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets sort key and direction.
    #[must_use]
    pub const fn order(mut self, order_by: OrderBy, order: SortOrder) -> Self {
        self.order_by = Some(order_by);
        self.order = Some(order);
        self
    }

    /// Sets the inclusive date range.
    #[must_use]
    pub const fn date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Sets page and page size.
    #[must_use]
    pub const fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    /// Writes the set fields into `query`.
    pub(crate) fn apply(&self, query: &mut QueryParams) {
        if let Some(per_page) = self.per_page
            && per_page > PER_PAGE_MAX
        {
            tracing::warn!(
                per_page,
                max = PER_PAGE_MAX,
                "per_page exceeds the server limit; the server may cap it"
            );
        }

        query
            .set_opt("type", self.kind)
            .set_opt("state", self.state)
            .set_opt("mode", self.mode)
            .set_opt("year", self.year)
            .set_opt("genre", self.genre.as_deref())
            .set_opt("country", self.country.as_deref())
            .set_opt("order_by", self.order_by)
            .set_opt("order", self.order)
            .set_opt("from", self.from.map(to_cinemate_date))
            .set_opt("to", self.to.map(to_cinemate_date))
            .set_opt("page", self.page)
            .set_opt("per_page", self.per_page);
    }
}
