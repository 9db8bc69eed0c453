//! Deferred filesystem actions.
//!
//! The walk itself never mutates anything. Every decision becomes an
//! [`Action`] carrying the metadata captured at visit time; the executor
//! replays the whole list once, after all roots have been walked.
//! Metadata is not re-read between walk and execution.

use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

/// Identity and metadata of one filesystem object, captured at walk time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    name: String,
    size: u64,
    modified: SystemTime,
    is_dir: bool,
}

impl ObjectInfo {
    /// Captures an object from its directory-relative name and metadata.
    ///
    /// The modification time keeps whatever sub-second precision the
    /// filesystem reports; objects without one sort as the epoch.
    pub fn new(name: impl Into<String>, metadata: &Metadata) -> Self {
        Self {
            name: name.into(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir: metadata.is_dir(),
        }
    }

    /// The directory-relative (bare) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes as reported at walk time.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time as reported at walk time.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Whether the object is a directory (decides rmdir vs. unlink).
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// What to do about one non-canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Nothing exists at the canonical name; plain rename.
    RenameToNfc,
    /// A canonical sibling exists and is at least as new; it stays and
    /// the non-canonical object is disposed of.
    ResolveKeepNfc,
    /// The non-canonical object is strictly newer; the canonical sibling
    /// is disposed of first, then the non-canonical object takes its name.
    ResolveKeepNfd,
}

/// One deferred unit of work, tied to the directory it happens in.
///
/// All names are bare: the executor changes the process working directory
/// to `dir` before touching anything. Actions are kept in discovery order,
/// and the walk is post-order, so actions inside a directory always come
/// before an action renaming that directory itself.
#[derive(Debug, Clone)]
pub struct Action {
    /// Absolute directory the names below live in.
    pub dir: PathBuf,
    pub kind: ActionKind,
    /// The non-canonical object as found during the walk.
    pub found: ObjectInfo,
    /// The computed canonical (NFC) form of `found`'s name.
    pub nfc_name: String,
    /// The pre-existing object at the canonical name, when there is one.
    pub existing: Option<ObjectInfo>,
}
