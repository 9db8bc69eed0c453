//! Physical tree traversal and classification bookkeeping.
//!
//! The walk is depth-first and post-order: a directory's subtree is
//! visited before the directory's own name is classified. Combined with
//! discovery-order execution this guarantees that actions inside a
//! directory are applied before the directory itself is renamed.

use std::ffi::OsStr;
use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use crate::action::{Action, ObjectInfo};
use crate::classify::{classify, Classification};
use crate::error::{ScanError, ScanResult};
use crate::observer::ScanObserver;
use crate::scan::resolver::{resolve, Verdict};

/// Traversal and fix-level configuration for a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// 0 = report candidates only, 1 = queue non-colliding renames,
    /// 2 or more = also queue collision resolutions.
    pub autofix: u8,
    /// Do not descend into objects on a different filesystem than the root.
    pub one_file_system: bool,
}

/// Running counters for everything a scan touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub ascii: u64,
    pub nfc: u64,
    pub nfd: u64,
    pub other: u64,
    pub invalid: u64,
    pub collisions: u64,
    pub objects: u64,
    pub unreadable: u64,
    pub renamed: u64,
    pub removed: u64,
}

impl fmt::Display for ScanStats {
    /// Formats the final summary line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} ascii, {} nfc, {} nfd, {} other, {} invalid & {} collisions; \
             {} objects, {} unreadable, {} renamed & {} removed]",
            self.ascii,
            self.nfc,
            self.nfd,
            self.other,
            self.invalid,
            self.collisions,
            self.objects,
            self.unreadable,
            self.renamed,
            self.removed
        )
    }
}

/// Everything a finished scan produced.
#[derive(Debug)]
pub struct ScanOutcome {
    pub stats: ScanStats,
    /// Deferred actions in discovery order.
    pub actions: Vec<Action>,
}

/// Depth-first scanner accumulating statistics and deferred actions.
///
/// One `Scanner` can walk several roots in sequence; counters and the
/// action list are shared across all of them. Call [`Scanner::finish`] to
/// take the results.
///
/// # Examples
///
/// ```no_run
/// use nfcsweep_core::{NullObserver, ScanOptions, Scanner};
/// use std::path::Path;
///
/// let mut scanner = Scanner::new(ScanOptions { autofix: 1, ..Default::default() });
/// scanner.scan_root(Path::new("/srv/share"), &mut NullObserver).unwrap();
/// let outcome = scanner.finish();
/// println!("{}", outcome.stats);
/// ```
pub struct Scanner {
    opts: ScanOptions,
    stats: ScanStats,
    actions: Vec<Action>,
}

impl Scanner {
    pub fn new(opts: ScanOptions) -> Self {
        Self {
            opts,
            stats: ScanStats::default(),
            actions: Vec::new(),
        }
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Walks one root, classifying every object exactly once.
    ///
    /// The root path is made absolute (lexically, without resolving
    /// symlinks) so queued actions carry absolute directories regardless
    /// of later working-directory changes. Symbolic links are never
    /// followed, including a root that is itself a symlink. Children are
    /// visited in sorted name order for deterministic discovery.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] — the root does not exist.
    /// - [`ScanError::PermissionDenied`] — the root cannot be stat'ed.
    ///
    /// Both count the root as unreadable. Everything below the root is
    /// handled without errors: unreadable subtrees are counted and
    /// skipped, and never abort the walk.
    pub fn scan_root(&mut self, root: &Path, obs: &mut dyn ScanObserver) -> ScanResult<()> {
        let root = std::path::absolute(root)?;
        let meta = match std::fs::symlink_metadata(&root) {
            Ok(m) => m,
            Err(e) => {
                self.stats.unreadable += 1;
                return Err(match e.kind() {
                    std::io::ErrorKind::NotFound => ScanError::NotFound(root),
                    std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(root),
                    _ => ScanError::Io(e),
                });
            }
        };
        let root_dev = device_of(&meta);
        self.visit(&root, &meta, root_dev, obs);
        Ok(())
    }

    /// Consumes the scanner, yielding counters and the action list.
    pub fn finish(self) -> ScanOutcome {
        ScanOutcome {
            stats: self.stats,
            actions: self.actions,
        }
    }

    fn visit(&mut self, path: &Path, meta: &Metadata, root_dev: u64, obs: &mut dyn ScanObserver) {
        if meta.is_dir() {
            self.visit_children(path, root_dev, obs);
        }

        self.stats.objects += 1;
        obs.visited(self.stats.objects);

        let Some(name) = path.file_name() else {
            // A filesystem root has no final component to classify.
            self.stats.ascii += 1;
            return;
        };
        let class = classify_os(name);
        match class {
            Classification::Ascii => self.stats.ascii += 1,
            Classification::InvalidUtf8 => {
                self.stats.invalid += 1;
                obs.skipped_invalid(path);
            }
            Classification::Nfc => self.stats.nfc += 1,
            Classification::Nfd | Classification::OtherUnicode => {
                if class == Classification::Nfd {
                    self.stats.nfd += 1;
                } else {
                    self.stats.other += 1;
                }
                if let Some(name) = name.to_str() {
                    let found = ObjectInfo::new(name, meta);
                    self.resolve_candidate(path, class, &found, obs);
                }
            }
        }
    }

    fn visit_children(&mut self, dir: &Path, root_dev: u64, obs: &mut dyn ScanObserver) {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                self.stats.unreadable += 1;
                tracing::warn!("{}: unreadable directory: {e}", dir.display());
                return;
            }
        };

        let mut children: Vec<PathBuf> = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(e) => children.push(e.path()),
                Err(e) => {
                    self.stats.unreadable += 1;
                    tracing::warn!("{}: unreadable entry: {e}", dir.display());
                }
            }
        }
        children.sort();

        for child in children {
            let meta = match std::fs::symlink_metadata(&child) {
                Ok(m) => m,
                Err(e) => {
                    self.stats.unreadable += 1;
                    tracing::warn!("{}: stat failed: {e}", child.display());
                    continue;
                }
            };
            if self.opts.one_file_system && device_of(&meta) != root_dev {
                tracing::debug!("{}: filesystem boundary, not descending", child.display());
                continue;
            }
            self.visit(&child, &meta, root_dev, obs);
        }
    }

    fn resolve_candidate(
        &mut self,
        path: &Path,
        class: Classification,
        found: &ObjectInfo,
        obs: &mut dyn ScanObserver,
    ) {
        let dir = parent_dir(path);
        match resolve(&dir, found) {
            Verdict::Identical => obs.skipped_identical(path),
            Verdict::Rename(action) => {
                if self.opts.autofix >= 1 {
                    obs.planned(&action);
                    self.actions.push(action);
                } else {
                    obs.candidate(path, class, false);
                }
            }
            Verdict::Collision(action) => {
                self.stats.collisions += 1;
                if self.opts.autofix >= 2 {
                    obs.planned(&action);
                    self.actions.push(action);
                } else {
                    obs.candidate(path, class, true);
                }
            }
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn classify_os(name: &OsStr) -> Classification {
    use std::os::unix::ffi::OsStrExt;
    classify(name.as_bytes())
}

#[cfg(not(unix))]
fn classify_os(name: &OsStr) -> Classification {
    match name.to_str() {
        Some(s) => classify(s.as_bytes()),
        None => Classification::InvalidUtf8,
    }
}

#[cfg(unix)]
fn device_of(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.dev()
}

#[cfg(not(unix))]
fn device_of(_meta: &Metadata) -> u64 {
    0
}
