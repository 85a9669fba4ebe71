//! Raw query-string parameters

/// Ordered `(key, value)` pairs exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

/// One logical parameter after bracket parsing and pollution handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamEntry {
    /// Field name without the operator suffix
    pub field: String,
    /// Operator suffix from `field[op]`
    pub operator: Option<String>,
    /// Last value, or every value for multi-value fields
    pub values: Vec<String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Parses an `application/x-www-form-urlencoded` query string
    pub fn parse(query: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(
            query.trim_start_matches('?').as_bytes(),
        ))
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replaces every occurrence of `key` with a single value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Last value given for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Groups pairs by `(field, operator)`.
    ///
    /// Repeated keys keep only their last value unless `allows_multiple`
    /// returns true for the field and no operator suffix is present, in
    /// which case every value is kept in arrival order.
    pub fn entries(&self, allows_multiple: impl Fn(&str) -> bool) -> Vec<ParamEntry> {
        let mut entries: Vec<ParamEntry> = Vec::new();

        for (key, value) in &self.pairs {
            let (field, operator) = split_operator(key);
            let existing = entries
                .iter_mut()
                .find(|entry| entry.field == field && entry.operator == operator);

            match existing {
                Some(entry) if operator.is_none() && allows_multiple(&field) => {
                    entry.values.push(value.clone());
                }
                Some(entry) => entry.values = vec![value.clone()],
                None => entries.push(ParamEntry {
                    field,
                    operator,
                    values: vec![value.clone()],
                }),
            }
        }

        entries
    }
}

/// `price[gte]` becomes `("price", Some("gte"))`
fn split_operator(key: &str) -> (String, Option<String>) {
    if let Some(open) = key.find('[') {
        if key.ends_with(']') && open > 0 {
            let field = key[..open].to_string();
            let operator = key[open + 1..key.len() - 1].to_string();
            return (field, Some(operator));
        }
    }
    (key.to_string(), None)
}
