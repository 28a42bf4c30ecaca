//! Files selected for upload

/// One collected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub file_name: String,
    /// Path relative to the collected directory, `/`-separated
    pub relative_path: String,
    pub content: Vec<u8>,
}

/// Collected files in walk order
#[derive(Debug, Clone, Default)]
pub struct FileBundle {
    entries: Vec<BundleEntry>,
}

impl FileBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: BundleEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative paths in collection order
    pub fn relative_paths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect()
    }

    /// Total size of the collected file contents
    pub fn content_size(&self) -> usize {
        self.entries.iter().map(|e| e.content.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &str) -> BundleEntry {
        BundleEntry {
            file_name: path.rsplit('/').next().unwrap_or(path).to_string(),
            relative_path: path.to_string(),
            content: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_entries_keep_push_order() {
        let mut bundle = FileBundle::new();
        assert!(bundle.is_empty());

        bundle.push(entry("b.tfvars", "bb"));
        bundle.push(entry("modules/net/a.tf", "a"));

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.relative_paths(), vec!["b.tfvars", "modules/net/a.tf"]);
        assert_eq!(bundle.entries()[1].file_name, "a.tf");
        assert_eq!(bundle.content_size(), 3);
    }
}
