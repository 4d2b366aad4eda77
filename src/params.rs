use std::collections::BTreeMap;

use crate::Value;

/// Query parameter container.
///
/// Keys are kept sorted so that two parameter sets with the same contents
/// always serialize to the same query string and cache signature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    /// Builds an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a parameter only when a value is present.
    pub fn with_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `(key, value)` pairs in key order, stringified for the wire.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{Params, Value};

    #[test]
    fn from_array_sorts_keys() {
        let params: Params = [("limit", Value::integer(5)), ("character", Value::text("Kit"))].into();
        let pairs = params.query_pairs();
        assert_eq!(pairs[0], ("character".to_owned(), "Kit".to_owned()));
        assert_eq!(pairs[1], ("limit".to_owned(), "5".to_owned()));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = Params::new().with("title", "One Piece").with("page", 2);
        let b = Params::new().with("page", 2).with("title", "One Piece");
        assert_eq!(a, b);
        assert_eq!(a.query_pairs(), b.query_pairs());
    }

    #[test]
    fn with_opt_skips_missing_values() {
        let params = Params::new()
            .with("character", "Kit")
            .with_opt("limit", None::<u32>);
        assert_eq!(params.len(), 1);
        assert!(params.get("limit").is_none());

        let params = params.with_opt("limit", Some(3u32));
        assert_eq!(params.get("limit"), Some(&Value::Integer(3)));
    }

    #[test]
    fn unit_converts_to_empty() {
        let params: Params = ().into();
        assert!(params.is_empty());
    }
}
