//! nfcsweep — scan file trees for non-NFC filenames and fix them.
//!
//! This binary is a thin frontend over `nfcsweep-core`: it parses flags,
//! renders the report stream and progress spinner, and maps fatal errors
//! to a non-zero exit status. All decisions live in the core crate.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use nfcsweep_core::{
    execute, Action, ActionKind, Classification, ExecOptions, ScanObserver, ScanOptions, Scanner,
};

/// Scans directory trees for file names that are not canonical Unicode
/// NFC and optionally renames them, reconciling collisions with existing
/// NFC-named siblings without losing data.
#[derive(Debug, Parser)]
#[command(name = "nfcsweep", version, about)]
struct Args {
    /// Roots to scan.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Fix what is found: once renames non-colliding names, twice also
    /// resolves collisions.
    #[arg(short, long, action = clap::ArgAction::Count)]
    autofix: u8,

    /// Decide and report everything, but change nothing.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Rename colliding losers aside instead of removing them.
    #[arg(short, long)]
    preserve: bool,

    /// Continue past failed renames and removals.
    #[arg(short, long)]
    ignore_errors: bool,

    /// Do not cross filesystem boundaries.
    #[arg(short = 'x', long)]
    one_file_system: bool,

    /// Increase verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Increase debug output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut reporter = ConsoleReporter::new(args.verbose, args.debug);
    let mut scanner = Scanner::new(ScanOptions {
        autofix: args.autofix,
        one_file_system: args.one_file_system,
    });

    if args.verbose > 0 {
        println!("Scanning:");
    }
    for root in &args.paths {
        if let Err(e) = scanner.scan_root(root, &mut reporter) {
            tracing::warn!("{e}: skipping root");
        }
    }
    let outcome = scanner.finish();
    reporter.scan_done();

    if args.verbose > 0 && !outcome.actions.is_empty() {
        println!("Processing {} objects:", outcome.actions.len());
    }

    let exec_opts = ExecOptions {
        apply: !args.dry_run,
        ignore_errors: args.ignore_errors,
        preserve: args.preserve,
    };
    let mut stats = outcome.stats;
    execute(&outcome.actions, &exec_opts, &mut stats, &mut reporter)?;

    println!("{stats}");
    Ok(())
}

fn init_tracing(debug: u8) {
    let default_level = match debug {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Renders core events as the line-oriented report stream.
///
/// Report lines go to stdout; the spinner and notices go to stderr. The
/// spinner shows the running object count and hides itself when stderr is
/// not a terminal.
struct ConsoleReporter {
    progress: ProgressBar,
    verbose: u8,
    debug: u8,
}

impl ConsoleReporter {
    fn new(verbose: u8, debug: u8) -> Self {
        let style = ProgressStyle::with_template("[{msg}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let progress = ProgressBar::new_spinner().with_style(style);
        progress.enable_steady_tick(Duration::from_millis(1000));
        Self {
            progress,
            verbose,
            debug,
        }
    }

    fn scan_done(&mut self) {
        self.progress.finish_and_clear();
    }

    fn out(&self, line: String) {
        self.progress.suspend(|| println!("{line}"));
    }

    fn err(&self, line: String) {
        self.progress.suspend(|| eprintln!("{line}"));
    }
}

impl ScanObserver for ConsoleReporter {
    fn visited(&mut self, total: u64) {
        self.progress.set_message(total.to_string());
    }

    fn candidate(&mut self, path: &Path, class: Classification, collision: bool) {
        if self.verbose > 0 {
            let tag = if collision {
                "NFD & NFC"
            } else {
                class.label()
            };
            self.out(format!("{}: {tag}", path.display()));
        } else {
            self.out(path.display().to_string());
        }
    }

    fn skipped_invalid(&mut self, path: &Path) {
        self.out(format!("{}: unknown encoding - skipping", path.display()));
    }

    fn skipped_identical(&mut self, path: &Path) {
        self.err(format!(
            "{}: canonical form is identical - skipping",
            path.display()
        ));
    }

    fn planned(&mut self, action: &Action) {
        if self.debug == 0 {
            return;
        }
        let path = action.dir.join(action.found.name());
        let line = match (action.kind, &action.existing) {
            (ActionKind::RenameToNfc, _) => format!(
                "{}: renaming to NFC ({}) [size: {}]",
                path.display(),
                fmt_time(action.found.modified()),
                action.found.size(),
            ),
            (ActionKind::ResolveKeepNfc, Some(existing)) => format!(
                "{}: collision - keeping NFC sibling ({} >= {}) [size: {} vs {}]",
                path.display(),
                fmt_time(existing.modified()),
                fmt_time(action.found.modified()),
                existing.size(),
                action.found.size(),
            ),
            (ActionKind::ResolveKeepNfd, Some(existing)) => format!(
                "{}: collision - replacing older NFC sibling ({} < {}) [size: {} vs {}]",
                path.display(),
                fmt_time(existing.modified()),
                fmt_time(action.found.modified()),
                existing.size(),
                action.found.size(),
            ),
            _ => return,
        };
        self.out(line);
    }

    fn renamed(&mut self, dir: &Path, from: &str, to: &str, applied: bool) {
        let suffix = if applied { "" } else { " (dry-run)" };
        self.out(format!(
            "{}/{from} -> {to}: renamed{suffix}",
            dir.display()
        ));
    }

    fn removed(&mut self, dir: &Path, name: &str, applied: bool) {
        let suffix = if applied { "" } else { " (dry-run)" };
        self.out(format!("{}/{name}: removed{suffix}", dir.display()));
    }
}

fn fmt_time(t: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(t)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
