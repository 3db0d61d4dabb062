//! Editing session
//!
//! Holds what an editor front end needs between user actions: which file is
//! open, the live field values, whether saving is allowed, and the last
//! status message. The reset-on-failure policy lives here so every front
//! end gets it for free.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};
use crate::error::{ErrorKind, Result};
use crate::pdf::metadata::{LopdfStore, MetadataStore};
use crate::record::{MetadataKey, MetadataRecord};

/// Status shown before any file has been opened
pub const INITIAL_STATUS: &str = "Drag and drop a PDF here, or select a PDF.";

/// Extract a filesystem path from a `text/uri-list` payload
///
/// Only the first URI is used. Comment lines (starting with `#`) and blank
/// lines are skipped, and percent escapes are decoded. Returns `None` when
/// no `file://` URI is present.
pub fn path_from_uri_list(uri_list: &str) -> Option<PathBuf> {
    let uri = uri_list
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))?;

    let rest = uri.strip_prefix("file://")?;
    // file://localhost/tmp/a.pdf and file:///tmp/a.pdf name the same file;
    // any other host is not on this machine
    let (host, encoded) = rest.split_at(rest.find('/')?);
    if !host.is_empty() && !host.eq_ignore_ascii_case("localhost") {
        return None;
    }

    let decoded = urlencoding::decode(encoded).ok()?;
    if decoded.is_empty() {
        return None;
    }
    Some(PathBuf::from(decoded.into_owned()))
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// State of one editing session
#[derive(Debug)]
pub struct Session<S: MetadataStore = LopdfStore> {
    store: S,
    current_path: Option<PathBuf>,
    loaded_at: Option<SystemTime>,
    fields: MetadataRecord,
    can_save: bool,
    status: String,
}

impl Session<LopdfStore> {
    pub fn new() -> Self {
        Self::with_store(LopdfStore)
    }
}

impl Default for Session<LopdfStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MetadataStore> Session<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            current_path: None,
            loaded_at: None,
            fields: MetadataRecord::new(),
            can_save: false,
            status: INITIAL_STATUS.to_string(),
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn fields(&self) -> &MetadataRecord {
        &self.fields
    }

    pub fn field(&self, key: MetadataKey) -> &str {
        self.fields.get(key)
    }

    pub fn set_field(&mut self, key: MetadataKey, value: impl Into<String>) {
        self.fields.set(key, value);
    }

    pub fn can_save(&self) -> bool {
        self.can_save
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// True when the open file's modification time differs from when it was loaded
    pub fn changed_on_disk(&self) -> bool {
        match (&self.current_path, self.loaded_at) {
            (Some(path), Some(loaded_at)) => modified_time(path) != Some(loaded_at),
            _ => false,
        }
    }

    /// Open a PDF and load its fields
    ///
    /// On failure every field is reset to empty and saving is disabled
    /// until a later open succeeds.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        debug!(path = %path.display(), "opening");
        self.status = format!("Loading: {}", path.display());

        match self.store.load(&path) {
            Ok(record) => {
                self.fields = record;
                self.can_save = true;
                self.loaded_at = modified_time(&path);
                self.status = format!("Loaded: {}", path.display());
                self.current_path = Some(path);
                Ok(())
            }
            Err(e) => {
                self.fields.clear_all();
                self.can_save = false;
                self.loaded_at = None;
                self.status = match e.kind() {
                    ErrorKind::FileNotFound => "Error: File not found.".to_string(),
                    ErrorKind::DocumentFormat => format!("Error loading PDF: {}", e),
                    _ => format!("An unexpected error occurred: {}", e),
                };
                self.current_path = Some(path);
                Err(e)
            }
        }
    }

    /// Open the file named by a dropped `text/uri-list` payload
    ///
    /// Returns `Ok(false)` when the payload holds no usable `file://` URI.
    pub fn open_uri(&mut self, uri_list: &str) -> Result<bool> {
        match path_from_uri_list(uri_list) {
            Some(path) => self.open(path).map(|_| true),
            None => {
                debug!("dropped payload has no file URI");
                Ok(false)
            }
        }
    }

    /// Empty every field in the form; nothing is written until [`save`](Self::save)
    pub fn clear_fields(&mut self) {
        self.fields.clear_all();
        self.status = "All metadata fields cleared.".to_string();
    }

    /// Write the current fields back to the open file
    ///
    /// Returns `Ok(false)` without touching anything when no file is open
    /// or the last open failed. Fields are kept when saving fails.
    pub fn save(&mut self) -> Result<bool> {
        let path = match (&self.current_path, self.can_save) {
            (Some(path), true) => path.clone(),
            _ => return Ok(false),
        };

        if self.changed_on_disk() {
            warn!(path = %path.display(), "file changed on disk since it was loaded; edited fields will overwrite it");
        }

        match self.store.save(&path, &self.fields) {
            Ok(()) => {
                self.loaded_at = modified_time(&path);
                self.status = format!("Metadata saved to: {}", path.display());
                Ok(true)
            }
            Err(e) => {
                self.status = match e.kind() {
                    ErrorKind::DocumentFormat => format!("Error saving PDF: {}", e),
                    _ => format!("An unexpected error occurred while saving: {}", e),
                };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    /// In-memory store keyed by path
    #[derive(Default)]
    struct MemoryStore {
        files: RefCell<HashMap<PathBuf, MetadataRecord>>,
        fail_save: bool,
    }

    impl MemoryStore {
        fn with_file(path: &str, record: MetadataRecord) -> Self {
            let store = MemoryStore::default();
            store.files.borrow_mut().insert(PathBuf::from(path), record);
            store
        }
    }

    impl MetadataStore for MemoryStore {
        fn load(&self, path: &Path) -> Result<MetadataRecord> {
            if path.ends_with("broken.pdf") {
                let source = lopdf::Document::load_mem(b"garbage").unwrap_err();
                return Err(Error::pdf(path, source));
            }
            if path.ends_with("locked.pdf") {
                return Err(Error::io(path, io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
            }
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))
        }

        fn save(&self, path: &Path, record: &MetadataRecord) -> Result<()> {
            if self.fail_save {
                return Err(Error::io(path, io::Error::new(io::ErrorKind::Other, "disk full")));
            }
            self.files.borrow_mut().insert(path.to_path_buf(), record.clone());
            Ok(())
        }
    }

    fn titled(title: &str) -> MetadataRecord {
        let mut record = MetadataRecord::new();
        record.set(MetadataKey::Title, title);
        record
    }

    #[test]
    fn test_initial_state() {
        let session = Session::with_store(MemoryStore::default());
        assert_eq!(session.status(), INITIAL_STATUS);
        assert!(!session.can_save());
        assert!(session.current_path().is_none());
        assert!(session.fields().is_empty());
    }

    #[test]
    fn test_open_success_enables_save() {
        let mut session = Session::with_store(MemoryStore::with_file("a.pdf", titled("Report")));
        session.open("a.pdf").unwrap();

        assert!(session.can_save());
        assert_eq!(session.field(MetadataKey::Title), "Report");
        assert_eq!(session.status(), "Loaded: a.pdf");
    }

    #[test]
    fn test_open_missing_file_resets_fields() {
        let mut session = Session::with_store(MemoryStore::with_file("a.pdf", titled("Report")));
        session.open("a.pdf").unwrap();

        let err = session.open("missing.pdf").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(session.fields().is_empty());
        assert!(!session.can_save());
        assert_eq!(session.status(), "Error: File not found.");
    }

    #[test]
    fn test_open_failure_messages_by_kind() {
        let mut session = Session::with_store(MemoryStore::default());

        assert!(session.open("broken.pdf").is_err());
        assert!(session.status().starts_with("Error loading PDF:"));
        assert!(!session.can_save());

        assert!(session.open("locked.pdf").is_err());
        assert!(session.status().starts_with("An unexpected error occurred:"));
        assert!(!session.can_save());
    }

    #[test]
    fn test_save_after_failed_open_is_noop() {
        let mut session = Session::with_store(MemoryStore::default());
        let _ = session.open("missing.pdf");
        session.set_field(MetadataKey::Title, "Ignored");

        assert!(!session.save().unwrap());
        assert!(session.store.files.borrow().is_empty());
    }

    #[test]
    fn test_save_without_open_is_noop() {
        let mut session = Session::with_store(MemoryStore::default());
        assert!(!session.save().unwrap());
        assert_eq!(session.status(), INITIAL_STATUS);
    }

    #[test]
    fn test_edit_and_save() {
        let mut session = Session::with_store(MemoryStore::with_file("a.pdf", titled("Report")));
        session.open("a.pdf").unwrap();
        session.set_field(MetadataKey::Title, "Final Report");

        assert!(session.save().unwrap());
        assert_eq!(session.status(), "Metadata saved to: a.pdf");
        assert_eq!(
            session.store.files.borrow().get(Path::new("a.pdf")),
            Some(&titled("Final Report"))
        );
    }

    #[test]
    fn test_clear_fields_does_not_write() {
        let mut session = Session::with_store(MemoryStore::with_file("a.pdf", titled("Report")));
        session.open("a.pdf").unwrap();
        session.clear_fields();

        assert!(session.fields().is_empty());
        assert!(session.can_save());
        assert_eq!(session.status(), "All metadata fields cleared.");
        assert_eq!(
            session.store.files.borrow().get(Path::new("a.pdf")),
            Some(&titled("Report"))
        );
    }

    #[test]
    fn test_failed_save_keeps_fields() {
        let mut store = MemoryStore::with_file("a.pdf", titled("Report"));
        store.fail_save = true;
        let mut session = Session::with_store(store);
        session.open("a.pdf").unwrap();
        session.set_field(MetadataKey::Author, "Someone");

        let err = session.save().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedIo);
        assert_eq!(session.field(MetadataKey::Author), "Someone");
        assert!(session.can_save());
        assert!(session.status().starts_with("An unexpected error occurred while saving:"));
    }

    #[test]
    fn test_open_uri() {
        let mut session =
            Session::with_store(MemoryStore::with_file("/tmp/my report.pdf", titled("Spaced")));

        assert!(session.open_uri("file:///tmp/my%20report.pdf\r\n").unwrap());
        assert_eq!(session.field(MetadataKey::Title), "Spaced");

        assert!(!session.open_uri("https://example.com/a.pdf").unwrap());
    }

    #[test]
    fn test_path_from_uri_list() {
        assert_eq!(
            path_from_uri_list("file:///home/user/Relat%C3%B3rio.pdf"),
            Some(PathBuf::from("/home/user/Relatório.pdf"))
        );
        assert_eq!(
            path_from_uri_list("# comment\nfile://localhost/tmp/a.pdf\nfile:///tmp/b.pdf"),
            Some(PathBuf::from("/tmp/a.pdf"))
        );
        assert_eq!(path_from_uri_list("file://fileserver/share/a.pdf"), None);
        assert_eq!(path_from_uri_list("file://LOCALHOST/tmp/a.pdf"), Some(PathBuf::from("/tmp/a.pdf")));
        assert_eq!(path_from_uri_list(""), None);
        assert_eq!(path_from_uri_list("/tmp/a.pdf"), None);
        assert_eq!(path_from_uri_list("file://"), None);
    }
}
