//! Where the words come from: word list files and codebase scans.

use crate::utils::{AppConfig, ScanProgress, extract_identifiers, is_binary};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A word together with the grouping key it came from (package, module path
/// or source file). Only `name` takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Symbol {
    pub name: String,
    pub group: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Split a qualified entry at its last `.` or `::`; unqualified entries
    /// get an empty group.
    pub fn parse_qualified(entry: &str) -> Option<Self> {
        let dot = entry.rfind('.').map(|i| (i, i + 1));
        let path = entry.rfind("::").map(|i| (i, i + 2));
        let (group, name) = match dot.max(path) {
            Some((end, start)) => (&entry[..end], &entry[start..]),
            None => ("", entry),
        };

        (!name.is_empty()).then(|| Self::new(name, group))
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Read a word list from `path`, or from stdin when `path` is `-`
pub fn load_word_list(path: &Path) -> Result<Vec<Symbol>> {
    if path == Path::new("-") {
        return parse_word_list(io::stdin().lock()).context("Failed to read word list from stdin");
    }

    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open word list {}", path.display()))?;
    parse_word_list(BufReader::new(file))
        .with_context(|| format!("Failed to read word list {}", path.display()))
}

/// One entry per line; blank lines and `#` comments are skipped
pub fn parse_word_list(reader: impl BufRead) -> Result<Vec<Symbol>> {
    let mut symbols = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        if let Some(symbol) = Symbol::parse_qualified(entry) {
            symbols.push(symbol);
        }
    }

    log::info!("word list: {} entries", symbols.len());
    Ok(symbols)
}

/// Settings for [`scan_codebase`]
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Only files whose relative path matches one of these are read
    pub globs: Vec<String>,
    pub max_file_size: u64,
    pub min_identifier_len: usize,
    pub exclude_dirs: Vec<String>,
    pub show_progress: bool,
}

impl ScanOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            globs: Vec::new(),
            max_file_size: config.max_file_size,
            min_identifier_len: config.min_identifier_len,
            exclude_dirs: config.exclude_dirs.clone(),
            show_progress: false,
        }
    }
}

fn build_globset(globs: &[String]) -> Result<Option<GlobSet>> {
    if globs.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(Glob::new(glob).with_context(|| format!("Invalid glob {:?}", glob))?);
    }
    Ok(Some(builder.build()?))
}

/// Collect identifiers from every source file under `root`. Each identifier
/// is grouped by the relative path of the file it was found in; the result is
/// sorted and free of duplicates.
pub fn scan_codebase(root: &Path, options: &ScanOptions) -> Result<Vec<Symbol>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Invalid path {}", root.display()))?;
    let globs = build_globset(&options.globs)?;

    let discovering = if options.show_progress {
        ScanProgress::spinner("Discovering files...")
    } else {
        ScanProgress::hidden()
    };

    let exclude = options.exclude_dirs.clone();
    let walker = WalkBuilder::new(&root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            !exclude.iter().any(|dir| dir.as_str() == name.as_ref())
        })
        .build();

    let files: Vec<(PathBuf, String)> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            let path = entry.into_path();
            let rel_path = path.strip_prefix(&root).ok()?.to_path_buf();
            if let Some(globs) = &globs {
                if !globs.is_match(&rel_path) {
                    return None;
                }
            }
            let group = rel_path.to_string_lossy().replace('\\', "/");
            Some((path, group))
        })
        .collect();

    discovering.finish(format!("Found {} files", files.len()));

    let reading = if options.show_progress {
        ScanProgress::bar(files.len() as u64, "Extracting identifiers...")
    } else {
        ScanProgress::hidden()
    };
    let unreadable = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);

    let mut symbols: Vec<Symbol> = files
        .par_iter()
        .flat_map_iter(|(path, group)| {
            let symbols = read_identifiers(path, options).unwrap_or_else(|err| {
                log::debug!("{}: {}", path.display(), err);
                unreadable.fetch_add(1, Ordering::Relaxed);
                None
            });
            if symbols.is_none() {
                skipped.fetch_add(1, Ordering::Relaxed);
            }
            reading.inc();

            symbols
                .into_iter()
                .flatten()
                .map(move |name| Symbol::new(name, group.clone()))
        })
        .collect();

    symbols.par_sort_unstable();
    symbols.dedup();

    reading.finish(format!("{} identifiers", symbols.len()));

    let unreadable = unreadable.load(Ordering::Relaxed);
    if unreadable > 0 {
        log::warn!("{} files could not be read", unreadable);
    }
    log::info!(
        "scanned {} files under {} ({} skipped), {} symbols",
        files.len(),
        root.display(),
        skipped.load(Ordering::Relaxed),
        symbols.len()
    );

    Ok(symbols)
}

/// Identifiers in one file, or `None` for oversized, binary or non-UTF-8 files
fn read_identifiers(path: &Path, options: &ScanOptions) -> io::Result<Option<Vec<String>>> {
    if fs::metadata(path)?.len() > options.max_file_size {
        return Ok(None);
    }

    let content = fs::read(path)?;
    if is_binary(&content) {
        return Ok(None);
    }
    let Ok(text) = std::str::from_utf8(&content) else {
        return Ok(None);
    };

    Ok(Some(
        extract_identifiers(text, options.min_identifier_len)
            .into_iter()
            .collect(),
    ))
}
