//! nfcsweep core library — filename normalization engine.
//!
//! `nfcsweep-core` finds file names whose byte encoding is not canonical
//! Unicode NFC and reconciles them with any pre-existing NFC-named sibling
//! without data loss. It is frontend-agnostic: a driver configures a
//! [`Scanner`], observes progress through [`ScanObserver`], and replays the
//! deferred [`Action`] list with [`execute`] once every root has been walked.
//!
//! # Modules
//!
//! - [`classify`] — Pure byte-level encoding/normalization classification.
//! - [`action`] — Deferred work units captured during the walk.
//! - [`scan`] — Tree walker, collision resolver, and unique-name generation.
//! - [`exec`] — Replay of the deferred action list.
//! - [`observer`] — Event seam between the core and a frontend.
//! - [`error`] — Unified error type ([`ScanError`]) and result alias ([`ScanResult`]).

pub mod action;
pub mod classify;
pub mod error;
pub mod exec;
pub mod observer;
pub mod scan;

pub use action::{Action, ActionKind, ObjectInfo};
pub use classify::{classify, to_nfc, Classification};
pub use error::{ScanError, ScanResult};
pub use exec::{execute, ExecOptions};
pub use observer::{NullObserver, ScanObserver};
pub use scan::resolver::{resolve, Verdict};
pub use scan::unique::unique_name;
pub use scan::walker::{ScanOptions, ScanOutcome, ScanStats, Scanner};
