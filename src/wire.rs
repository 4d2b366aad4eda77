use serde::Deserialize;

use serde_json::{Map, Value as JsonValue};

use crate::{Quote, QuotePage};

/// Body shapes accepted from list endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse {
    Bare(Vec<Quote>),
    Envelope { data: Vec<Quote> },
}

impl ListResponse {
    pub fn into_quotes(self) -> Vec<Quote> {
        match self {
            Self::Bare(quotes) | Self::Envelope { data: quotes } => quotes,
        }
    }
}

/// Body shapes accepted from single-quote endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SingleResponse {
    Bare(Quote),
    Envelope { data: Quote },
}

impl SingleResponse {
    pub fn into_quote(self) -> Quote {
        match self {
            Self::Bare(quote) | Self::Envelope { data: quote } => quote,
        }
    }
}

/// Body shapes accepted from the paginated listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageResponse {
    Bare(Vec<Quote>),
    Envelope {
        data: Vec<Quote>,
        #[serde(flatten)]
        meta: Map<String, JsonValue>,
    },
}

impl PageResponse {
    pub fn into_page(self) -> QuotePage {
        match self {
            Self::Bare(quotes) => QuotePage {
                quotes,
                meta: Map::new(),
            },
            Self::Envelope { data, meta } => QuotePage { quotes: data, meta },
        }
    }
}
