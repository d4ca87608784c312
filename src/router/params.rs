use smallvec::SmallVec;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RequestError;

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Name/value storage for path and query parameters.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Ordered positional parameters extracted from the URL.
///
/// Actions receive these in the order they appear in the route pattern; each value also
/// keeps the placeholder name it was captured under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional parameters without names, as a router-less caller would supply them.
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self(
            values
                .into_iter()
                .enumerate()
                .map(|(idx, value)| (Arc::from(idx.to_string()), value.to_string()))
                .collect(),
        )
    }

    /// The value at `index`, in pattern order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, v)| v.as_str())
    }

    /// The value captured under `name`.
    ///
    /// Uses "last write wins" semantics when a name repeats in the pattern.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse the value at `index`.
    ///
    /// A missing parameter is a 404, an unparsable one a 400.
    pub fn parse<T: FromStr>(&self, index: usize) -> Result<T, RequestError> {
        let raw = self.get(index).ok_or_else(|| {
            RequestError::not_found().with_message(format!("missing route parameter #{index}"))
        })?;
        raw.parse().map_err(|_| {
            RequestError::bad_request()
                .with_message(format!("route parameter #{index} has an invalid value '{raw}'"))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values in positional order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    /// Name/value pairs in positional order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }
}

impl From<ParamVec> for Params {
    fn from(params: ParamVec) -> Self {
        Self(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_values_keep_order() {
        let params = Params::positional([42, 7]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get(0), Some("42"));
        assert_eq!(params.get(1), Some("7"));
        assert_eq!(params.get(2), None);
        assert_eq!(params.values().collect::<Vec<_>>(), vec!["42", "7"]);
    }

    #[test]
    fn parse_reports_status_carrying_errors() {
        let params = Params::positional(["12", "abc"]);
        assert_eq!(params.parse::<u32>(0), Ok(12));
        assert_eq!(params.parse::<u32>(1).unwrap_err().status(), 400);
        assert_eq!(params.parse::<u32>(5).unwrap_err().status(), 404);
    }

    #[test]
    fn named_lookup_prefers_last() {
        let mut raw = ParamVec::new();
        raw.push((Arc::from("id"), "org".to_string()));
        raw.push((Arc::from("id"), "user".to_string()));
        let params = Params::from(raw);
        assert_eq!(params.named("id"), Some("user"));
        assert_eq!(params.named("nope"), None);
    }
}
