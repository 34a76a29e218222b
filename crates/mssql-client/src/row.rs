//! Row representation for materialized results.
//!
//! Every value in a [`Row`] has been copied out of the engine's row buffer
//! before the cursor moved on, so rows are plain owned data that can be
//! sent across threads and kept indefinitely.
//!
//! ## Duplicate column names
//!
//! The server does not guarantee unique column names (`SELECT 1 AS a, 2 AS a`
//! is valid). A row keeps every value positionally. Name-based lookups are
//! case-insensitive and resolve to the *last* column carrying the name, and
//! [`Row::to_map`] follows the same last-write-wins rule.

use std::collections::HashMap;
use std::sync::Arc;

use mssql_types::{FromSql, SqlValue, TypeError};
use tds_engine::TypeId;

/// Column metadata describing a result set column.
///
/// Captured once per result set from the engine's column calls.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Column {
    /// Column name (may be empty for unnamed expressions).
    pub name: String,
    /// Column index (0-based).
    pub index: usize,
    /// Wire type tag as the engine reported it.
    pub type_tag: i32,
    /// Declared maximum byte length.
    pub declared_length: i32,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, index: usize, type_tag: i32, declared_length: i32) -> Self {
        Self {
            name: name.into(),
            index,
            type_tag,
            declared_length,
        }
    }

    /// The known wire type, if the tag is recognised.
    #[must_use]
    pub fn type_id(&self) -> Option<TypeId> {
        TypeId::from_raw(self.type_tag)
    }

    /// SQL type name (e.g., "INT", "NVARCHAR"), or "UNKNOWN".
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_id().map_or("UNKNOWN", TypeId::name)
    }
}

/// Shared column metadata for a result set.
///
/// This is shared across all rows in the result set to avoid
/// duplicating metadata per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColMetaData {
    /// Column definitions.
    pub columns: Arc<[Column]>,
}

impl ColMetaData {
    /// Create new column metadata from a list of columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns: columns.into(),
        }
    }

    /// Get the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get a column by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Find a column index by name (case-insensitive, last match wins).
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .rposition(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// A row from a result set.
#[derive(Clone, PartialEq)]
pub struct Row {
    /// Column metadata (shared across result set).
    metadata: Arc<ColMetaData>,
    /// Decoded values, one per column.
    values: Box<[SqlValue]>,
}

impl Row {
    /// Create a row from shared metadata and its decoded values.
    pub fn new(metadata: Arc<ColMetaData>, values: Vec<SqlValue>) -> Self {
        Self {
            metadata,
            values: values.into_boxed_slice(),
        }
    }

    /// Create a row from columns and values, without shared metadata.
    pub fn from_values(columns: Vec<Column>, values: Vec<SqlValue>) -> Self {
        Self::new(Arc::new(ColMetaData::new(columns)), values)
    }

    // ========================================================================
    // Type-Converting Access (FromSql trait)
    // ========================================================================

    /// Get a value by column index with type conversion.
    pub fn get<T: FromSql>(&self, index: usize) -> Result<T, TypeError> {
        self.values
            .get(index)
            .ok_or_else(|| TypeError::TypeMismatch {
                expected: "valid column index",
                actual: format!("index {index} out of bounds"),
            })
            .and_then(T::from_sql)
    }

    /// Get a value by column name with type conversion.
    pub fn get_by_name<T: FromSql>(&self, name: &str) -> Result<T, TypeError> {
        let index = self
            .metadata
            .find_by_name(name)
            .ok_or_else(|| TypeError::TypeMismatch {
                expected: "valid column name",
                actual: format!("column '{name}' not found"),
            })?;

        self.get(index)
    }

    /// Try to get a value by column index, returning None if NULL or not found.
    pub fn try_get<T: FromSql>(&self, index: usize) -> Option<T> {
        self.values
            .get(index)
            .and_then(|v| T::from_sql_nullable(v).ok().flatten())
    }

    /// Try to get a value by column name, returning None if NULL or not found.
    pub fn try_get_by_name<T: FromSql>(&self, name: &str) -> Option<T> {
        let index = self.metadata.find_by_name(name)?;
        self.try_get(index)
    }

    // ========================================================================
    // Raw Value Access
    // ========================================================================

    /// Get the decoded value by index.
    #[must_use]
    pub fn get_raw(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Get the decoded value by column name.
    #[must_use]
    pub fn get_raw_by_name(&self, name: &str) -> Option<&SqlValue> {
        let index = self.metadata.find_by_name(name)?;
        self.get_raw(index)
    }

    /// All decoded values in column order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Consume the row, returning its values in column order.
    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values.into_vec()
    }

    /// Iterate over `(column name, value)` pairs in column order.
    pub fn iter(&self) -> RowIter<'_> {
        RowIter {
            row: self,
            index: 0,
        }
    }

    /// Build a name-to-value map.
    ///
    /// Columns sharing a name collapse to the last one.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, SqlValue> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    // ========================================================================
    // Metadata Access
    // ========================================================================

    /// Get the number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the column metadata.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.metadata.columns
    }

    /// Get the shared column metadata.
    #[must_use]
    pub fn metadata(&self) -> &Arc<ColMetaData> {
        &self.metadata
    }

    /// Check if a column value is NULL.
    ///
    /// Out-of-range indices report NULL.
    #[must_use]
    pub fn is_null(&self, index: usize) -> bool {
        self.values.get(index).is_none_or(SqlValue::is_null)
    }

    /// Check if a column value is NULL by name.
    #[must_use]
    pub fn is_null_by_name(&self, name: &str) -> bool {
        self.metadata
            .find_by_name(name)
            .is_none_or(|i| self.is_null(i))
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.iter() {
            map.entry(&name, value);
        }
        map.finish()
    }
}

/// Iterator over `(column name, value)` pairs of a row.
pub struct RowIter<'a> {
    row: &'a Row,
    index: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = (&'a str, &'a SqlValue);

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.row.values.get(self.index)?;
        let name = self
            .row
            .metadata
            .get(self.index)
            .map_or("", |c| c.name.as_str());
        self.index += 1;
        Some((name, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowIter<'_> {}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a str, &'a SqlValue);
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn int_column(name: &str, index: usize) -> Column {
        Column::new(name, index, TypeId::Int4.raw(), 4)
    }

    #[test]
    fn test_column_metadata() {
        let col = Column::new("name", 1, TypeId::XNVarChar.raw(), 100);

        assert_eq!(col.name, "name");
        assert_eq!(col.index, 1);
        assert_eq!(col.type_id(), Some(TypeId::XNVarChar));
        assert_eq!(col.type_name(), "NVARCHAR");
        assert_eq!(Column::new("x", 0, 0x99, 0).type_name(), "UNKNOWN");
    }

    #[test]
    fn test_col_metadata_find_by_name() {
        let meta = ColMetaData::new(vec![int_column("id", 0), int_column("Name", 1)]);

        assert_eq!(meta.find_by_name("id"), Some(0));
        assert_eq!(meta.find_by_name("ID"), Some(0));
        assert_eq!(meta.find_by_name("name"), Some(1));
        assert_eq!(meta.find_by_name("unknown"), None);
    }

    #[test]
    fn test_row_from_values() {
        let columns = vec![
            int_column("id", 0),
            Column::new("name", 1, TypeId::XNVarChar.raw(), 100),
        ];
        let values = vec![SqlValue::Int(42), SqlValue::String("Alice".to_string())];

        let row = Row::from_values(columns, values);

        assert_eq!(row.len(), 2);
        assert_eq!(row.get::<i32>(0).unwrap(), 42);
        assert_eq!(row.get_by_name::<String>("name").unwrap(), "Alice");
        assert!(row.get::<i32>(5).is_err());
        assert!(row.get_by_name::<i32>("missing").is_err());
    }

    #[test]
    fn test_row_is_null() {
        let row = Row::from_values(
            vec![int_column("id", 0), int_column("nullable_col", 1)],
            vec![SqlValue::Int(1), SqlValue::Null],
        );

        assert!(!row.is_null(0));
        assert!(row.is_null(1));
        assert!(row.is_null(99));
        assert!(row.is_null_by_name("NULLABLE_COL"));
        assert!(row.is_null_by_name("missing"));
    }

    #[test]
    fn test_row_try_get() {
        let row = Row::from_values(
            vec![int_column("a", 0), int_column("b", 1)],
            vec![SqlValue::Int(7), SqlValue::Null],
        );

        assert_eq!(row.try_get::<i32>(0), Some(7));
        assert_eq!(row.try_get::<i32>(1), None);
        assert_eq!(row.try_get::<String>(0), None);
        assert_eq!(row.try_get_by_name::<i64>("A"), Some(7));
    }

    #[test]
    fn test_duplicate_names_resolve_to_last_column() {
        let row = Row::from_values(
            vec![int_column("a", 0), int_column("a", 1)],
            vec![SqlValue::Int(1), SqlValue::Int(2)],
        );

        assert_eq!(row.len(), 2);
        assert_eq!(row.get::<i32>(0).unwrap(), 1);
        assert_eq!(row.get_by_name::<i32>("a").unwrap(), 2);
        assert_eq!(row.get_raw_by_name("A"), Some(&SqlValue::Int(2)));

        let map = row.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["a"], SqlValue::Int(2));
    }

    #[test]
    fn test_row_iter_pairs() {
        let row = Row::from_values(
            vec![int_column("x", 0), int_column("y", 1)],
            vec![SqlValue::Int(1), SqlValue::Null],
        );

        let pairs: Vec<_> = row.iter().collect();
        assert_eq!(pairs, vec![("x", &SqlValue::Int(1)), ("y", &SqlValue::Null)]);
        assert_eq!(row.iter().len(), 2);
        assert_eq!((&row).into_iter().count(), 2);
    }

    #[test]
    fn test_row_metadata_access() {
        let row = Row::from_values(vec![int_column("col1", 0)], vec![SqlValue::Int(1)]);

        assert_eq!(row.columns().len(), 1);
        assert_eq!(row.columns()[0].name, "col1");
        assert_eq!(row.metadata().len(), 1);
        assert_eq!(row.values(), &[SqlValue::Int(1)]);
        assert_eq!(row.into_values(), vec![SqlValue::Int(1)]);
    }

    #[test]
    fn test_row_debug_lists_pairs() {
        let row = Row::from_values(vec![int_column("n", 0)], vec![SqlValue::Int(1)]);
        assert_eq!(format!("{row:?}"), r#"{"n": Int(1)}"#);
    }
}
