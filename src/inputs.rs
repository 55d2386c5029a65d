//! Memoized puzzle input files.
//!
//! Inputs live at `<root>/challenges/<year>/<day>/input.txt`. Each
//! `(year, day)` is read at most once per cache; there is no eviction.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{error, warn};

use crate::error::InputError;

type Loader = Arc<dyn Fn(&Path) -> io::Result<String> + Send + Sync>;

/// Read attempts before giving up on an input file.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Explicit `(year, day) -> content` cache.
#[derive(Clone)]
pub struct InputCache {
    root: PathBuf,
    max_attempts: usize,
    loader: Loader,
    entries: Arc<Mutex<HashMap<(u16, u8), Arc<str>>>>,
}

impl InputCache {
    /// Cache reading from the filesystem under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_loader(root, |path: &Path| std::fs::read_to_string(path))
    }

    /// Cache using a custom loader for the resolved path.
    pub fn with_loader<L>(root: impl Into<PathBuf>, loader: L) -> Self
    where
        L: Fn(&Path) -> io::Result<String> + Send + Sync + 'static,
    {
        Self {
            root: root.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            loader: Arc::new(loader),
            entries: Arc::default(),
        }
    }

    /// Set the number of read attempts (at least 1).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Path of the input file for a puzzle.
    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        self.root
            .join("challenges")
            .join(year.to_string())
            .join(day.to_string())
            .join("input.txt")
    }

    /// Trimmed input of a puzzle, read on first use.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file is missing on every attempt.
    /// - `Io` if the last attempt failed for another reason.
    pub fn get(&self, year: u16, day: u8) -> Result<Arc<str>, InputError> {
        if let Some(content) = self.lock().get(&(year, day)) {
            return Ok(Arc::clone(content));
        }

        let content: Arc<str> = self.load(year, day)?.into();
        // A concurrent reader may have filled the slot meanwhile; keep the first.
        let cached = self
            .lock()
            .entry((year, day))
            .or_insert(content)
            .clone();
        Ok(cached)
    }

    /// Number of cached inputs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn load(&self, year: u16, day: u8) -> Result<String, InputError> {
        let path = self.path(year, day);

        for attempt in 1..=self.max_attempts {
            match (self.loader)(&path) {
                Ok(raw) => {
                    let content = raw.trim();
                    if content.is_empty() {
                        warn!(path = %path.display(), "input file is empty");
                    }
                    return Ok(content.to_string());
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(path = %path.display(), attempt, "input file not found");
                }
                Err(e) => {
                    error!(path = %path.display(), attempt, error = %e, "error reading input file");
                    if attempt == self.max_attempts {
                        return Err(InputError::Io { path, source: e });
                    }
                }
            }
        }

        Err(InputError::NotFound {
            path,
            attempts: self.max_attempts,
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(u16, u8), Arc<str>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for InputCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputCache")
            .field("root", &self.root)
            .field("max_attempts", &self.max_attempts)
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn path_layout() {
        let cache = InputCache::new("/aoc");
        assert_eq!(
            cache.path(2025, 9),
            PathBuf::from("/aoc/challenges/2025/9/input.txt")
        );
    }

    #[test]
    fn loads_once_and_trims() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let cache = InputCache::with_loader("/aoc", move |_: &Path| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("  1\n2\n3  \n".to_string())
        });

        assert_eq!(&*cache.get(2024, 7).unwrap(), "1\n2\n3");
        assert_eq!(&*cache.get(2024, 7).unwrap(), "1\n2\n3");
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn transient_failure_is_retried() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let cache = InputCache::with_loader("/aoc", move |_: &Path| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(io::Error::new(io::ErrorKind::NotFound, "not yet"))
            } else {
                Ok("42".to_string())
            }
        });

        assert_eq!(&*cache.get(2025, 1).unwrap(), "42");
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn io_error_on_last_attempt() {
        let cache = InputCache::with_loader("/aoc", |_: &Path| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        })
        .max_attempts(2);

        assert!(matches!(cache.get(2025, 2), Err(InputError::Io { .. })));
        assert!(cache.is_empty());
    }
}
