use std::fs;
use std::path::Path;

use crate::error::{ResolveError, StartupError};

/// Ordered index-to-label mapping for the classifier's output vector.
///
/// Built once at startup from the immediate subdirectory names of the class
/// directory, sorted lexicographically. The sort order is an external
/// contract: it must match the order the model's output layer was trained
/// with, and nothing in this process can verify that independently.
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    labels: Vec<String>,
}

impl LabelRegistry {
    pub fn from_dir(path: &Path) -> Result<Self, StartupError> {
        if !path.is_dir() {
            return Err(StartupError::ClassDirMissing(path.to_path_buf()));
        }
        let read_err = |source| StartupError::ClassDirUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let mut labels = Vec::new();
        for entry in fs::read_dir(path).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if entry.file_type().map_err(read_err)?.is_dir() {
                labels.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        labels.sort();
        labels.dedup();
        if labels.is_empty() {
            return Err(StartupError::NoClasses(path.to_path_buf()));
        }
        Ok(Self { labels })
    }

    /// Build a registry from an explicit label list (sorted and deduplicated
    /// the same way the directory scan would).
    pub fn from_labels(mut labels: Vec<String>) -> Self {
        labels.sort();
        labels.dedup();
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_at(&self, index: usize) -> Result<&str, ResolveError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or(ResolveError::IndexOutOfRange {
                index,
                len: self.labels.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn labels_are_sorted_lexicographically() {
        let dir = class_dir(&["normal", "cataract", "glaucoma", "diabetic_retinopathy"]);
        let registry = LabelRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(
            registry.labels(),
            &["cataract", "diabetic_retinopathy", "glaucoma", "normal"]
        );
    }

    #[test]
    fn plain_files_are_ignored() {
        let dir = class_dir(&["cataract", "normal"]);
        fs::write(dir.path().join("README.txt"), "notes").unwrap();
        let registry = LabelRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.labels(), &["cataract", "normal"]);
    }

    #[test]
    fn label_at_is_total_over_the_index_range() {
        let dir = class_dir(&["cataract", "normal"]);
        let registry = LabelRegistry::from_dir(dir.path()).unwrap();
        for i in 0..registry.len() {
            assert!(registry.label_at(i).is_ok());
        }
        assert!(matches!(
            registry.label_at(registry.len()),
            Err(ResolveError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn missing_directory_is_a_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(matches!(
            LabelRegistry::from_dir(&gone),
            Err(StartupError::ClassDirMissing(_))
        ));
    }

    #[test]
    fn empty_directory_is_a_startup_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LabelRegistry::from_dir(dir.path()),
            Err(StartupError::NoClasses(_))
        ));
    }

    #[test]
    fn from_labels_sorts_and_dedups() {
        let registry = LabelRegistry::from_labels(vec![
            "normal".to_string(),
            "cataract".to_string(),
            "cataract".to_string(),
        ]);
        assert_eq!(registry.labels(), &["cataract", "normal"]);
    }
}
