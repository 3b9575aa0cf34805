use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upper bound on posts fetched per product.
///
/// The source UI exposes a fixed set of limits plus "no limit"; anything else
/// is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxPosts {
    Limit100,
    Limit500,
    Limit1000,
    Limit2000,
    Limit5000,
    Unlimited,
}

impl MaxPosts {
    /// The numeric cap, or `None` for unlimited.
    #[must_use]
    pub fn as_limit(self) -> Option<u32> {
        match self {
            MaxPosts::Limit100 => Some(100),
            MaxPosts::Limit500 => Some(500),
            MaxPosts::Limit1000 => Some(1000),
            MaxPosts::Limit2000 => Some(2000),
            MaxPosts::Limit5000 => Some(5000),
            MaxPosts::Unlimited => None,
        }
    }
}

impl std::str::FromStr for MaxPosts {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "100" => Ok(MaxPosts::Limit100),
            "500" => Ok(MaxPosts::Limit500),
            "1000" => Ok(MaxPosts::Limit1000),
            "2000" => Ok(MaxPosts::Limit2000),
            "5000" => Ok(MaxPosts::Limit5000),
            "none" | "unlimited" | "0" => Ok(MaxPosts::Unlimited),
            other => Err(CoreError::InvalidMaxPosts(other.to_string())),
        }
    }
}

impl std::fmt::Display for MaxPosts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_limit() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "unlimited"),
        }
    }
}

/// Search parameters for one product's fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostQuery {
    /// Case-folded product name used as the text query.
    pub query: String,
    /// Near-location string, `"<location>, <country>"`.
    pub near: String,
    /// Inclusive lower bound of the date range.
    pub since: NaiveDate,
    /// Exclusive upper bound of the date range.
    pub until: NaiveDate,
    /// BCP-47 language restriction.
    pub lang: String,
    pub max_posts: MaxPosts,
}

impl PostQuery {
    /// Builds a query for one product.
    ///
    /// The product name is case-folded for searching; the near-location string
    /// is assembled from location and country.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidQuery`] if the product name is empty or
    /// `since > until`.
    pub fn new(
        product: &str,
        location: &str,
        country: &str,
        since: NaiveDate,
        until: NaiveDate,
        max_posts: MaxPosts,
    ) -> Result<Self, CoreError> {
        if product.trim().is_empty() {
            return Err(CoreError::InvalidQuery(
                "product name must be non-empty".to_string(),
            ));
        }
        if since > until {
            return Err(CoreError::InvalidQuery(format!(
                "start date {since} is after end date {until}"
            )));
        }
        Ok(Self {
            query: product.to_lowercase(),
            near: format!("{location}, {country}"),
            since,
            until,
            lang: "en".to_string(),
            max_posts,
        })
    }
}

/// Collapses repeated whitespace and trims the ends of a user-entered string.
#[must_use]
pub fn normalize_entry(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a user-entered place name: whitespace collapse plus
/// capitalization of each word, matching how the bundled datasets are cased.
#[must_use]
pub fn normalize_place(raw: &str) -> String {
    normalize_entry(raw)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
