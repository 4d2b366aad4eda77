use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Resource paths supported by the quote service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /quotes/random`
    RandomQuote,
    /// `GET /quotes`, filtered by `character`, `title` or `page`.
    Quotes,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::RandomQuote => "/quotes/random",
            Self::Quotes => "/quotes",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error returned when parsing an unknown endpoint name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown endpoint '{0}'; expected 'quotes' or 'quotes/random'")]
pub struct UnknownEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('/') {
            "quotes" => Ok(Self::Quotes),
            "quotes/random" => Ok(Self::RandomQuote),
            other => Err(UnknownEndpoint(other.to_owned())),
        }
    }
}

/// A single anime quote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub anime: String,
    pub character: String,
    pub quote: String,
}

/// One page of the unfiltered quote listing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuotePage {
    pub quotes: Vec<Quote>,
    /// Top-level envelope fields other than `data`, such as pagination
    /// counters. Empty when the server answered with a bare array.
    pub meta: serde_json::Map<String, serde_json::Value>,
}
