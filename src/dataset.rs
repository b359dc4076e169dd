use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interpreter::value::DoubleVector;

/// One named column of a [`Dataset`].
///
/// Deserializes from a JSON array: numbers make a scalar column, arrays of
/// numbers a vector column, strings a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Column {
    /// One number per row.
    Scalar(Vec<f64>),
    /// One vector per row; lengths may differ between rows.
    Vector(Vec<DoubleVector>),
    /// One category label per row.
    Categorical(Vec<String>),
}

impl Column {
    /// Number of rows stored in this column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(v) => v.len(),
            Self::Vector(v) => v.len(),
            Self::Categorical(v) => v.len(),
        }
    }

    /// `true` if the column holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the column kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Vector(_) => "vector",
            Self::Categorical(_) => "categorical",
        }
    }
}

/// In-memory table of named columns.
///
/// Columns may have different lengths; reading a row past the end of a column
/// is detected by the evaluator and yields an undefined result.
///
/// # Example
/// ```
/// use symvec::dataset::{Column, Dataset};
///
/// let data = Dataset::from_json(r#"{ "x": [1.0, 2.0], "c": ["a", "b", "a"] }"#).unwrap();
/// assert_eq!(data.rows(), 3);
/// assert!(matches!(data.column("x"), Some(Column::Scalar(_))));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    columns: BTreeMap<String, Column>,
}

impl Dataset {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a column, returning the dataset.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Self {
        self.insert(name, column);
        self
    }

    /// Adds or replaces a column.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        self.columns.insert(name.into(), column);
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Column names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Length of the longest column.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.columns.values().map(Column::len).max().unwrap_or(0)
    }

    /// Parses a dataset from a JSON object of column name to array.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed input, including vector
    /// cells that are empty arrays.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_kinds_from_json() {
        let data = Dataset::from_json(r#"{
            "s": [1.5, 2.5],
            "v": [[1.0, 2.0], [3.0]],
            "c": ["red", "blue"]
        }"#).unwrap();

        assert_eq!(data.column("s").map(Column::kind), Some("scalar"));
        assert_eq!(data.column("v").map(Column::kind), Some("vector"));
        assert_eq!(data.column("c").map(Column::kind), Some("categorical"));
        assert_eq!(data.names().collect::<Vec<_>>(), ["c", "s", "v"]);
    }

    #[test]
    fn empty_vector_cells_are_rejected() {
        assert!(Dataset::from_json(r#"{ "v": [[1.0], []] }"#).is_err());
    }
}
