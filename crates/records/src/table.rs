//! Container pairing parsed rows with the header found in the file.

/// Rows of one raw table plus the column names its file actually carried.
///
/// A blank value in a present column is not the same as an absent column:
/// aggregators that degrade when a column is missing consult the header
/// through [`TableData::has_column`] rather than guessing from defaults.
#[derive(Debug, Clone)]
pub struct TableData<T> {
    rows: Vec<T>,
    columns: Vec<String>,
}

impl<T> TableData<T> {
    pub fn new<C: Into<String>>(rows: Vec<T>, columns: impl IntoIterator<Item = C>) -> Self {
        Self {
            rows,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the source file carried the named column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
