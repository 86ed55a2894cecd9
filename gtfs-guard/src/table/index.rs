//! Derived lookup structures over a table's rows.

use std::collections::HashMap;

/// Maps the values of one field to the positions of the rows holding them.
///
/// Positions are indices into the owning container's row vector and are kept
/// in ascending order, so lookups yield rows in source order.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    field: &'static str,
    positions: HashMap<String, Vec<usize>>,
}

impl FieldIndex {
    /// Builds an index over `keys`, where item `i` is the key of row `i`.
    pub(crate) fn build<'a, I>(field: &'static str, keys: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, key) in keys.into_iter().enumerate() {
            if let Some(key) = key {
                positions.entry(key.to_string()).or_default().push(position);
            }
        }
        Self { field, positions }
    }

    /// Name of the indexed field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Row positions for `key`; empty when nothing matches.
    pub fn positions(&self, key: &str) -> &[usize] {
        self.positions.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn distinct_keys(&self) -> usize {
        self.positions.len()
    }

    /// Iterates over distinct keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }
}
