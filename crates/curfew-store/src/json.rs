//! JSON file store

use curfew_api::PolicyDocument;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::{PolicyStore, StoreError, StoreResult};

/// Policy document kept as a pretty-printed JSON file
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(document: &PolicyDocument) -> StoreResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl PolicyStore for JsonStore {
    /// A missing or blank file yields the initial document, which is
    /// written out immediately so a bad location fails early.
    fn load(&self) -> StoreResult<PolicyDocument> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            let document = PolicyDocument::initial();
            self.save(&document)?;
            info!(store_path = %self.path.display(), "Initialized policy document");
            return Ok(document);
        }

        let mut document: PolicyDocument =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        if document.restore_default() {
            warn!(
                store_path = %self.path.display(),
                "Policy document lacked the default group, restored it"
            );
        }

        debug!(
            store_path = %self.path.display(),
            group_count = document.groups.len(),
            "Policy document loaded"
        );
        Ok(document)
    }

    /// Written to a sibling temporary file and renamed over the target, so
    /// a failed save never leaves a half-written document behind.
    fn save(&self, document: &PolicyDocument) -> StoreResult<()> {
        let bytes = Self::encode(document)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!(store_path = %self.path.display(), "Policy document saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curfew_util::GroupName;

    #[test]
    fn test_missing_file_is_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("curfew.json");
        let store = JsonStore::new(&path);

        let doc = store.load().unwrap();
        assert_eq!(doc, PolicyDocument::initial());
        assert!(path.exists(), "initial document should be written");
    }

    #[test]
    fn test_blank_file_is_initialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curfew.json");
        std::fs::write(&path, "  \n").unwrap();

        let doc = JsonStore::new(&path).load().unwrap();
        assert_eq!(doc, PolicyDocument::initial());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("curfew.json"));

        let mut doc = PolicyDocument::initial();
        doc.active.insert(GroupName::new("work"));
        doc.groups.insert(GroupName::new("work"), Default::default());
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn test_saved_file_is_indented_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curfew.json");
        JsonStore::new(&path).save(&PolicyDocument::initial()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n    \"active\": ["));
        assert!(content.contains("\"hours\": [\n"));
        assert!(content.ends_with("}\n"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curfew.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonStore::new(&path).load();
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_invalid_spec_in_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curfew.json");
        std::fs::write(&path, r#"{"groups": {"x": {"hours": ["25"]}}}"#).unwrap();

        let result = JsonStore::new(&path).load();
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_case_colliding_groups_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curfew.json");
        let content = r#"{"groups": {"Work": {"domains": ["a.com"]}, "work": {"domains": ["b.com"]}}}"#;
        std::fs::write(&path, content).unwrap();

        let result = JsonStore::new(&path).load();
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_missing_default_group_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curfew.json");
        std::fs::write(
            &path,
            r#"{"active": ["work"], "groups": {"work": {"domains": ["HTTP://Example.com"]}}}"#,
        )
        .unwrap();

        let doc = JsonStore::new(&path).load().unwrap();
        let default = GroupName::default_group();
        assert!(doc.is_active(&default));
        assert!(doc.group(&default).unwrap().hours.is_any());

        let work = doc.group(&GroupName::new("work")).unwrap();
        assert!(work.domains.contains("example.com"));
    }
}
