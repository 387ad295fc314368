//! Newsletter subscriber list persisted as `{"emails": [...]}`.
//!
//! Every signup rewrites the whole file while holding the store's mutex, so concurrent
//! signups serialize and the file always holds the full current list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct NewsletterDocument {
    #[serde(default)]
    emails: Vec<String>,
}

#[derive(Serialize)]
struct NewsletterSnapshot<'a> {
    emails: &'a [String],
}

/// Error raised while reading or rewriting the newsletter file.
#[derive(Debug, thiserror::Error)]
pub enum NewsletterError {
    #[error("failed to read newsletter store {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("newsletter store {} is not valid JSON: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write newsletter store {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode newsletter store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// File-backed, append-only list of subscriber emails.
#[derive(Debug)]
pub struct NewsletterStore {
    path: PathBuf,
    emails: Mutex<Vec<String>>,
}

impl NewsletterStore {
    /// Open the store at `path`. A missing file starts an empty list; nothing is written until
    /// the first signup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, NewsletterError> {
        let path = path.into();
        let emails = match fs::read(&path) {
            Ok(bytes) => {
                let document: NewsletterDocument =
                    serde_json::from_slice(&bytes).map_err(|source| NewsletterError::Malformed {
                        path: path.clone(),
                        source,
                    })?;
                document.emails
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "newsletter store not found, starting empty");
                Vec::new()
            }
            Err(source) => return Err(NewsletterError::Read { path, source }),
        };

        info!(path = %path.display(), subscribers = emails.len(), "newsletter store opened");
        Ok(Self {
            path,
            emails: Mutex::new(emails),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_emails(path: impl Into<PathBuf>, emails: Vec<String>) -> Self {
        Self {
            path: path.into(),
            emails: Mutex::new(emails),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `email` and rewrite the file. Returns the new subscriber count.
    ///
    /// No deduplication or format validation is applied. When the write fails the in-memory
    /// list is left as it was before the call.
    pub fn subscribe(&self, email: impl Into<String>) -> Result<usize, NewsletterError> {
        let mut guard = self.emails.lock().expect("newsletter mutex poisoned");
        guard.push(email.into());

        if let Err(err) = self.persist(&guard) {
            guard.pop();
            return Err(err);
        }

        let subscribers = guard.len();
        info!(subscribers, "newsletter signup recorded");
        Ok(subscribers)
    }

    pub fn emails(&self) -> Vec<String> {
        self.emails.lock().expect("newsletter mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.emails.lock().expect("newsletter mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, emails: &[String]) -> Result<(), NewsletterError> {
        let payload = serde_json::to_vec_pretty(&NewsletterSnapshot { emails })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| NewsletterError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        fs::write(&self.path, payload).map_err(|source| NewsletterError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn read_file(path: &Path) -> Value {
        let bytes = fs::read(path).expect("newsletter file exists");
        serde_json::from_slice(&bytes).expect("newsletter file is json")
    }

    #[test]
    fn missing_file_starts_empty_and_is_not_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("newsletter.json");
        let store = NewsletterStore::open(&path).expect("missing store is non-fatal");
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn subscribe_appends_and_preserves_prior_emails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("newsletter.json");
        fs::write(&path, r#"{"emails": ["first@example.org"]}"#).expect("seed file");

        let store = NewsletterStore::open(&path).expect("store opens");
        let count = store.subscribe("second@example.org").expect("signup persists");

        assert_eq!(count, 2);
        assert_eq!(
            read_file(&path),
            json!({ "emails": ["first@example.org", "second@example.org"] })
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("newsletter.json");
        let store = NewsletterStore::open(&path).expect("store opens");

        store.subscribe("same@example.org").expect("first signup");
        store.subscribe("same@example.org").expect("second signup");

        assert_eq!(store.emails(), vec!["same@example.org", "same@example.org"]);
        assert_eq!(read_file(&path)["emails"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state").join("newsletter.json");
        let store = NewsletterStore::open(&path).expect("store opens");

        store.subscribe("reader@example.org").expect("signup persists");

        assert_eq!(read_file(&path), json!({ "emails": ["reader@example.org"] }));
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("newsletter.json");
        fs::write(&path, "not json").expect("seed file");

        let err = NewsletterStore::open(&path).expect_err("garbage must fail");
        assert!(matches!(err, NewsletterError::Malformed { .. }));
    }

    #[test]
    fn failed_write_rolls_back_the_append() {
        let dir = tempfile::tempdir().expect("tempdir");
        // The target path is an existing directory, so the rewrite cannot succeed.
        let opened = NewsletterStore::open(dir.path()).expect_err("directory is not a file");
        assert!(matches!(opened, NewsletterError::Read { .. }));

        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).expect("create dir");
        let store = NewsletterStore::with_emails(blocked, vec!["kept@example.org".to_string()]);

        let err = store.subscribe("lost@example.org").expect_err("write fails");
        assert!(matches!(err, NewsletterError::Write { .. }));
        assert_eq!(store.emails(), vec!["kept@example.org"]);
    }
}
