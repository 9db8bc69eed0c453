//! Deferred action execution.
//!
//! Replays the action list produced by the walk, after the walk of every
//! root has completed. Consecutive same-directory actions are applied
//! behind a single working-directory change; all filesystem calls then
//! use bare names relative to that directory.

use std::path::Path;

use crate::action::{Action, ActionKind, ObjectInfo};
use crate::error::{ScanError, ScanResult};
use crate::observer::ScanObserver;
use crate::scan::unique::unique_name;
use crate::scan::walker::ScanStats;

/// Execution-phase configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    /// Perform the mutations. When false (dry-run), every action is
    /// decided and reported identically but no filesystem call mutates
    /// anything.
    pub apply: bool,
    /// Skip the rest of a failed action and continue with the next
    /// instead of aborting the run.
    pub ignore_errors: bool,
    /// Rename colliding losers aside to a generated unique name instead
    /// of removing them.
    pub preserve: bool,
}

/// Replays `actions` in order.
///
/// Renamed/removed counts are added to `stats`, in dry-run mode too, so
/// a dry run reports exactly what an apply run would do.
///
/// # Errors
///
/// - [`ScanError::ChangeDir`] — the target directory cannot be entered.
///   Always fatal.
/// - [`ScanError::Rename`] / [`ScanError::Remove`] — an action failed.
///   Fatal unless `ignore_errors` is set, in which case the rest of that
///   action is skipped with a warning and execution continues.
pub fn execute(
    actions: &[Action],
    opts: &ExecOptions,
    stats: &mut ScanStats,
    obs: &mut dyn ScanObserver,
) -> ScanResult<()> {
    let mut cwd: Option<&Path> = None;

    for action in actions {
        if cwd != Some(action.dir.as_path()) {
            std::env::set_current_dir(&action.dir).map_err(|source| ScanError::ChangeDir {
                dir: action.dir.clone(),
                source,
            })?;
            cwd = Some(action.dir.as_path());
        }

        match run_action(action, opts, stats, obs) {
            Ok(()) => {}
            Err(e) if opts.ignore_errors => tracing::warn!("{e}: ignored"),
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn run_action(
    action: &Action,
    opts: &ExecOptions,
    stats: &mut ScanStats,
    obs: &mut dyn ScanObserver,
) -> ScanResult<()> {
    match action.kind {
        ActionKind::RenameToNfc => {
            rename(action, action.found.name(), &action.nfc_name, opts, stats, obs)
        }
        ActionKind::ResolveKeepNfc => dispose(action, &action.found, opts, stats, obs),
        ActionKind::ResolveKeepNfd => {
            if let Some(existing) = &action.existing {
                dispose(action, existing, opts, stats, obs)?;
            }
            rename(action, action.found.name(), &action.nfc_name, opts, stats, obs)
        }
    }
}

/// Removes `victim`, or renames it aside when preservation is configured.
fn dispose(
    action: &Action,
    victim: &ObjectInfo,
    opts: &ExecOptions,
    stats: &mut ScanStats,
    obs: &mut dyn ScanObserver,
) -> ScanResult<()> {
    if opts.preserve {
        let aside = unique_name(&action.dir, &action.nfc_name, victim.is_dir());
        return rename(action, victim.name(), &aside, opts, stats, obs);
    }

    if opts.apply {
        let result = if victim.is_dir() {
            std::fs::remove_dir(victim.name())
        } else {
            std::fs::remove_file(victim.name())
        };
        result.map_err(|source| ScanError::Remove {
            dir: action.dir.clone(),
            name: victim.name().to_string(),
            source,
        })?;
    }
    stats.removed += 1;
    obs.removed(&action.dir, victim.name(), opts.apply);
    Ok(())
}

fn rename(
    action: &Action,
    from: &str,
    to: &str,
    opts: &ExecOptions,
    stats: &mut ScanStats,
    obs: &mut dyn ScanObserver,
) -> ScanResult<()> {
    if !is_valid_filename(to) {
        return Err(ScanError::InvalidName(to.to_string()));
    }
    if opts.apply {
        std::fs::rename(from, to).map_err(|source| ScanError::Rename {
            dir: action.dir.clone(),
            from: from.to_string(),
            to: to.to_string(),
            source,
        })?;
    }
    stats.renamed += 1;
    obs.renamed(&action.dir, from, to, opts.apply);
    Ok(())
}

fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}
