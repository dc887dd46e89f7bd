//! Class index to category label table.

use crate::{Error, Result};
use std::path::Path;

/// Read-only mapping from class index to category label.
///
/// Loaded once at startup from a JSON array of strings, where the array
/// position is the class id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Builds a table from labels in class-id order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `labels` is empty.
    pub fn from_labels<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(Error::InvalidInput("label table is empty".to_string()));
        }
        Ok(Self { labels })
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// strings, or is empty.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_label_table".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        let labels: Vec<String> =
            serde_json::from_str(&content).map_err(|e| Error::OperationFailed {
                operation: "parse_label_table".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let table = Self::from_labels(labels)?;
        tracing::info!(path = %path.display(), classes = table.len(), "Loaded label table");
        Ok(table)
    }

    /// Returns the label for `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in class-id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_labels() {
        let table = LabelTable::from_labels(["Change", "Incident"]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("Incident"));
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = LabelTable::from_labels(Vec::<String>::new());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"["Change", "Incident", "Problem", "Request"]"#).unwrap();

        let table = LabelTable::load_from_file(file.path()).unwrap();
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec!["Change", "Incident", "Problem", "Request"]
        );
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"0": "Change"}}"#).unwrap();

        let err = LabelTable::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("parse_label_table"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LabelTable::load_from_file("/nonexistent/labels.json").unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }
}
