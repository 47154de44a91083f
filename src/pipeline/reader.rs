//! Concurrent corpus reader.
//!
//! A fixed pool of workers pulls paths from a shared queue, extracts and
//! resolves each file, and inserts the result into a mutex-guarded map.
//! The first failure cancels the run: workers finish the file they hold,
//! see the flag before taking the next path, and stop.

use crate::error::{ErrorContext, MinerError, Result};
use crate::model::{Formula, FormulaMap, ResolveOptions};
use crate::parsers::{parse_formula_file, ExtractOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Corpus-relative glob patterns for formula and alias files.
pub const CORPUS_PATTERNS: &[&str] = &["Formula/**/*.rb", "Aliases/*"];

/// Settings for one corpus read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    pub workers: usize,
    pub extract: ExtractOptions,
    pub resolve: ResolveOptions,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            workers: crate::config::defaults::MAX_WORKERS,
            extract: ExtractOptions::default(),
            resolve: ResolveOptions::default(),
        }
    }
}

// ============================================================================
// Enumeration
// ============================================================================

/// List the formula and alias files of a corpus, sorted by path.
///
/// # Errors
///
/// Fails when `root` is not a directory or a directory entry cannot be read.
pub fn enumerate_corpus(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MinerError::corpus(format!(
            "corpus root {} is not a directory",
            root.display()
        )));
    }
    let root_str = root
        .to_str()
        .ok_or_else(|| MinerError::corpus(format!("non UTF-8 corpus root {}", root.display())))?;
    let escaped = glob::Pattern::escape(root_str);

    let mut paths = Vec::new();
    for pattern in CORPUS_PATTERNS {
        for entry in glob::glob(&format!("{escaped}/{pattern}"))? {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                MinerError::io(path, e.into_error())
            })?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }
    paths.sort();
    Ok(paths)
}

// ============================================================================
// Worker pool
// ============================================================================

struct WorkQueue {
    paths: Vec<PathBuf>,
    next: AtomicUsize,
}

impl WorkQueue {
    fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            next: AtomicUsize::new(0),
        }
    }

    fn pop(&self) -> Option<&Path> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.paths.get(index).map(PathBuf::as_path)
    }
}

struct Shared<'a> {
    queue: WorkQueue,
    cancelled: AtomicBool,
    results: Mutex<FormulaMap>,
    first_error: Mutex<Option<MinerError>>,
    options: &'a ReaderOptions,
}

/// Extract and resolve one file.
///
/// # Errors
///
/// Propagates read and extraction failures with the file path as context.
pub fn read_formula(path: &Path, options: &ReaderOptions) -> Result<Formula> {
    let source = parse_formula_file(path, &options.extract)
        .with_context(|| path.display().to_string())?;
    Ok(Formula::from_source(source, &options.resolve))
}

/// Read every formula of the corpus at `root`.
///
/// The map is content-identical for any worker count. Any single failure
/// makes the whole read fail; no partial map is returned.
///
/// # Errors
///
/// Fails on a zero worker count, enumeration errors, pool construction
/// errors, or the first per-file failure.
pub fn read_corpus(root: &Path, options: &ReaderOptions) -> Result<FormulaMap> {
    if options.workers == 0 {
        return Err(MinerError::config("reader.max_workers must be greater than 0"));
    }
    let paths = enumerate_corpus(root)?;
    info!(files = paths.len(), workers = options.workers, "Reading corpus");

    let shared = Shared {
        results: Mutex::new(FormulaMap::with_capacity(paths.len())),
        queue: WorkQueue::new(paths),
        cancelled: AtomicBool::new(false),
        first_error: Mutex::new(None),
        options,
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|i| format!("formula-reader-{i}"))
        .build()?;
    pool.scope(|scope| {
        for _ in 0..options.workers {
            scope.spawn(|_| run_worker(&shared));
        }
    });

    if let Some(err) = shared
        .first_error
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
    {
        return Err(err);
    }
    let map = shared
        .results
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);
    info!(formulas = map.len(), "Corpus read");
    Ok(map)
}

fn run_worker(shared: &Shared<'_>) {
    while !shared.cancelled.load(Ordering::Acquire) {
        let Some(path) = shared.queue.pop() else {
            break;
        };
        debug!(path = %path.display(), "Reading formula");
        match read_formula(path, shared.options) {
            Ok(formula) => {
                let mut results = shared
                    .results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(previous) = results.insert(formula.name.clone(), formula) {
                    warn!(formula = %previous.name, "Duplicate formula name in corpus");
                }
            }
            Err(err) => {
                shared.cancelled.store(true, Ordering::Release);
                let mut slot = shared
                    .first_error
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if slot.is_none() {
                    *slot = Some(err);
                } else {
                    debug!(error = %err, "Suppressed error after cancellation");
                }
            }
        }
    }
}
