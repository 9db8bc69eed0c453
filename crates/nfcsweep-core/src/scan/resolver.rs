//! Collision resolution for eligible names.
//!
//! Given a non-canonical name and the on-disk state of its computed NFC
//! form, decide which object survives and how the other is disposed of.
//! The resolver only decides; nothing here mutates the filesystem.

use std::cmp::Ordering;
use std::path::Path;

use crate::action::{Action, ActionKind, ObjectInfo};
use crate::classify::to_nfc;

/// Outcome of resolving one eligible name.
#[derive(Debug)]
pub enum Verdict {
    /// The canonical form is byte-identical to the name; nothing to do.
    Identical,
    /// No object exists at the canonical name.
    Rename(Action),
    /// An object already exists at the canonical name. The action's kind
    /// records which side survives.
    Collision(Action),
}

/// Decides what should happen to the non-canonical object `found`, which
/// lives in `dir`.
///
/// The existing canonical sibling, when present, wins ties: only a
/// strictly newer non-canonical object takes over the canonical name.
/// Comparison uses the full sub-second precision of the captured
/// modification times. The sibling probe is a non-following stat, so a
/// symlink at the canonical name counts as an existing object.
pub fn resolve(dir: &Path, found: &ObjectInfo) -> Verdict {
    let nfc_name = to_nfc(found.name());
    if nfc_name == found.name() {
        return Verdict::Identical;
    }

    match std::fs::symlink_metadata(dir.join(&nfc_name)) {
        Err(_) => Verdict::Rename(Action {
            dir: dir.to_path_buf(),
            kind: ActionKind::RenameToNfc,
            found: found.clone(),
            nfc_name,
            existing: None,
        }),
        Ok(meta) => {
            let existing = ObjectInfo::new(nfc_name.clone(), &meta);
            let kind = match existing.modified().cmp(&found.modified()) {
                Ordering::Less => ActionKind::ResolveKeepNfd,
                Ordering::Equal | Ordering::Greater => ActionKind::ResolveKeepNfc,
            };
            Verdict::Collision(Action {
                dir: dir.to_path_buf(),
                kind,
                found: found.clone(),
                nfc_name,
                existing: Some(existing),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const NFD: &str = "cafe\u{301}.txt";
    const NFC: &str = "caf\u{e9}.txt";

    fn capture(dir: &Path, name: &str) -> ObjectInfo {
        let meta = fs::symlink_metadata(dir.join(name)).unwrap();
        ObjectInfo::new(name, &meta)
    }

    fn set_mtime(path: &Path, t: SystemTime) {
        let f = fs::OpenOptions::new().write(true).open(path).unwrap();
        f.set_modified(t).unwrap();
    }

    #[test]
    fn already_canonical_name_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(NFC), "").unwrap();

        let found = capture(tmp.path(), NFC);
        assert!(matches!(resolve(tmp.path(), &found), Verdict::Identical));
    }

    #[test]
    fn no_sibling_means_plain_rename() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(NFD), "decomposed").unwrap();

        let found = capture(tmp.path(), NFD);
        match resolve(tmp.path(), &found) {
            Verdict::Rename(action) => {
                assert_eq!(action.kind, ActionKind::RenameToNfc);
                assert_eq!(action.nfc_name, NFC);
                assert_eq!(action.found.name(), NFD);
                assert!(action.existing.is_none());
                assert_eq!(action.dir, tmp.path());
            }
            other => panic!("expected Rename, got {other:?}"),
        }
    }

    #[test]
    fn newer_canonical_sibling_is_kept() {
        let tmp = TempDir::new().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs::write(tmp.path().join(NFD), "old").unwrap();
        fs::write(tmp.path().join(NFC), "new").unwrap();
        set_mtime(&tmp.path().join(NFD), base);
        set_mtime(&tmp.path().join(NFC), base + Duration::from_secs(10));

        let found = capture(tmp.path(), NFD);
        match resolve(tmp.path(), &found) {
            Verdict::Collision(action) => {
                assert_eq!(action.kind, ActionKind::ResolveKeepNfc);
                assert_eq!(action.existing.as_ref().unwrap().name(), NFC);
            }
            other => panic!("expected Collision, got {other:?}"),
        }
    }

    #[test]
    fn newer_non_canonical_object_takes_over() {
        let tmp = TempDir::new().unwrap();
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs::write(tmp.path().join(NFD), "new").unwrap();
        fs::write(tmp.path().join(NFC), "old").unwrap();
        set_mtime(&tmp.path().join(NFD), base + Duration::from_secs(20));
        set_mtime(&tmp.path().join(NFC), base + Duration::from_secs(10));

        let found = capture(tmp.path(), NFD);
        match resolve(tmp.path(), &found) {
            Verdict::Collision(action) => {
                assert_eq!(action.kind, ActionKind::ResolveKeepNfd);
                assert_eq!(action.nfc_name, NFC);
            }
            other => panic!("expected Collision, got {other:?}"),
        }
    }

    #[test]
    fn equal_mtimes_keep_the_canonical_object() {
        let tmp = TempDir::new().unwrap();
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
            + Duration::from_nanos(123_456_789);
        fs::write(tmp.path().join(NFD), "a").unwrap();
        fs::write(tmp.path().join(NFC), "b").unwrap();
        set_mtime(&tmp.path().join(NFD), t);
        set_mtime(&tmp.path().join(NFC), t);

        let found = capture(tmp.path(), NFD);
        match resolve(tmp.path(), &found) {
            Verdict::Collision(action) => assert_eq!(action.kind, ActionKind::ResolveKeepNfc),
            other => panic!("expected Collision, got {other:?}"),
        }
    }

    #[test]
    fn nanosecond_differences_decide() {
        let tmp = TempDir::new().unwrap();
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        fs::write(tmp.path().join(NFD), "a").unwrap();
        fs::write(tmp.path().join(NFC), "b").unwrap();
        set_mtime(&tmp.path().join(NFD), t + Duration::from_nanos(1));
        set_mtime(&tmp.path().join(NFC), t);

        let found = capture(tmp.path(), NFD);
        match resolve(tmp.path(), &found) {
            Verdict::Collision(action) => assert_eq!(action.kind, ActionKind::ResolveKeepNfd),
            other => panic!("expected Collision, got {other:?}"),
        }
    }
}
