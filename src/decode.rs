use serde_json::Value as JsonValue;

use crate::{
    wire::{ListResponse, PageResponse, SingleResponse},
    Quote, QuoteError, QuotePage,
};

pub(crate) fn decode_json(body: &str) -> Result<JsonValue, QuoteError> {
    serde_json::from_str(body)
        .map_err(|err| QuoteError::Decode(format!("invalid JSON response: {err}; body: {body}")))
}

pub(crate) fn decode_quote(payload: JsonValue) -> Result<Quote, QuoteError> {
    serde_json::from_value::<SingleResponse>(payload)
        .map(SingleResponse::into_quote)
        .map_err(|_| QuoteError::Decode("unexpected response format for quote endpoint".to_owned()))
}

pub(crate) fn decode_quote_list(payload: JsonValue) -> Result<Vec<Quote>, QuoteError> {
    serde_json::from_value::<ListResponse>(payload)
        .map(ListResponse::into_quotes)
        .map_err(|_| QuoteError::Decode("unexpected response format for list endpoint".to_owned()))
}

pub(crate) fn decode_quote_page(payload: JsonValue) -> Result<QuotePage, QuoteError> {
    serde_json::from_value::<PageResponse>(payload)
        .map(PageResponse::into_page)
        .map_err(|_| QuoteError::Decode("unexpected response format for list endpoint".to_owned()))
}
