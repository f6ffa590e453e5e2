//! Query parameters and their reserved keys

/// Page size parameter
pub const LIMIT_PARAM: &str = "_limit";
/// 1-based page number parameter
pub const PAGE_PARAM: &str = "_page";
/// Sort field parameter
pub const SORT_PARAM: &str = "_sort";
/// Sort direction parameter (`asc` or `desc`)
pub const ORDER_PARAM: &str = "_order";

/// Keys that are never treated as field predicates
pub const RESERVED_PARAMS: [&str; 4] = [LIMIT_PARAM, PAGE_PARAM, SORT_PARAM, ORDER_PARAM];

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse an `_order` value; only `desc` (any case) is descending
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Ordered multi-map of query string pairs
///
/// Pairs keep the order in which they appeared in the URL, and the same key
/// may appear several times.
///
/// # Example
/// ```rust,ignore
/// // GET /users?name=ann&_sort=age&_order=desc&_limit=10&_page=2
/// let params = QueryParams::from_pairs([("name", "ann"), ("_sort", "age")]);
/// assert_eq!(params.sort_field(), Some("age"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Remove every occurrence of a key
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs that act as field predicates, in URL order
    pub fn filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(key, _)| !RESERVED_PARAMS.contains(key))
    }

    /// Field named by `_sort`, if any
    pub fn sort_field(&self) -> Option<&str> {
        self.get(SORT_PARAM)
            .map(str::trim)
            .filter(|field| !field.is_empty())
    }

    pub fn order(&self) -> SortOrder {
        SortOrder::from_param(self.get(ORDER_PARAM))
    }

    /// `_limit` as a positive integer
    pub fn limit(&self) -> Option<usize> {
        self.get(LIMIT_PARAM).and_then(parse_positive_int)
    }

    /// `_page` as a positive integer
    pub fn page(&self) -> Option<usize> {
        self.get(PAGE_PARAM).and_then(parse_positive_int)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Parse the leading integer of a string, keeping it only if positive
///
/// Leading whitespace and a `+` sign are accepted and trailing garbage is
/// ignored, so `"10abc"` is 10 and `"2.5"` is 2. Zero, negatives, overflow
/// and text without leading digits yield `None`.
pub fn parse_positive_int(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..end].parse::<usize>().ok().filter(|n| *n > 0)
}
