use super::types::{LifecycleError, LifecycleResult};
use std::path::Path;

/// Targets of a batch command, one per line of a list file, in file order.
///
/// Lines are trimmed; blank lines and lines starting with `#` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceList {
    entries: Vec<String>,
}

impl ResourceList {
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { entries }
    }

    pub async fn read(path: &Path) -> LifecycleResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LifecycleError::ResourceList {
                path: path.to_path_buf(),
                source,
            })?;
        let list = Self::parse(&content);
        tracing::debug!(
            "Read {} target(s) from {}",
            list.len(),
            path.display()
        );
        Ok(list)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ResourceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# web tier\nweb-01\n  web-02  \n\n   # disabled: web-03\nbatch-01\n";
        let list = ResourceList::parse(content);
        assert_eq!(list.entries(), ["web-01", "web-02", "batch-01"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(ResourceList::parse("").is_empty());
        assert!(ResourceList::parse("# only comments\n#\n").is_empty());
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let list = ResourceList::parse("ocid1.mysqldbsystem.oc1.iad.a\r\nocid1.mysqldbsystem.oc1.iad.b\r\n");
        assert_eq!(
            list.entries(),
            ["ocid1.mysqldbsystem.oc1.iad.a", "ocid1.mysqldbsystem.oc1.iad.b"]
        );
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ResourceList::read(&dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::ResourceList { .. }));
    }

    #[tokio::test]
    async fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.txt");
        tokio::fs::write(&path, "app-01\n#app-02\napp-03\n").await.unwrap();
        let list = ResourceList::read(&path).await.unwrap();
        assert_eq!(list.len(), 2);
    }
}
