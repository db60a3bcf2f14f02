//! Locating documents and turning them into frequency models.

use crate::histogram::HistogramPair;
use crate::utils::tokenizer::Tokenizer;
use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories never searched for documents
const SKIPPED_DIRS: &[&str] = &[".git", "node_modules", "target", "__pycache__", ".venv", "venv"];

fn file_matcher(pattern: &str) -> Result<GlobMatcher> {
    let glob = Glob::new(pattern).with_context(|| format!("Invalid include pattern: {}", pattern))?;
    Ok(glob.compile_matcher())
}

/// Every file below `root` whose name matches `pattern`, sorted by path.
///
/// Hidden files and anything excluded by ignore files are skipped.
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = file_matcher(pattern)?;

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !SKIPPED_DIRS.iter().any(|dir| name == *dir)
        })
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| matcher.is_match(entry.file_name()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    tracing::info!("found {} documents under {}", files.len(), root.display());
    Ok(files)
}

/// Resolve the `--file` / `--dir` arguments into a list of documents.
///
/// A file that does not exist yields no inputs rather than an error, so a
/// batch over an empty input set still produces a (trivial) summary.
pub fn collect_inputs(file: Option<&Path>, dir: Option<&Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    if let Some(file) = file {
        if file.is_file() {
            inputs.push(file.to_path_buf());
        } else {
            tracing::warn!("input file {} does not exist", file.display());
        }
    }

    if let Some(dir) = dir {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }
        inputs.extend(discover(dir, pattern)?);
    }

    Ok(inputs)
}

/// Word statistics of one document
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub path: PathBuf,
    pub histograms: HistogramPair,
    pub word_count: u64,
}

impl DocumentAnalysis {
    /// Read and tokenize a document. Invalid UTF-8 is replaced, not rejected.
    pub fn from_path(path: &Path, tokenizer: Tokenizer) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_text(path, &text, tokenizer))
    }

    pub fn from_text(path: &Path, text: &str, tokenizer: Tokenizer) -> Self {
        let tokens = tokenizer.tokenize(text);
        Self {
            path: path.to_path_buf(),
            histograms: tokens.histograms,
            word_count: tokens.word_count,
        }
    }

    /// No words could be extracted from the document
    pub fn is_extraction_failure(&self) -> bool {
        self.word_count == 0
    }

    /// File name without directories
    pub fn name(&self) -> String {
        file_name(&self.path)
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
