//! Command-name completion for the first word of a line.
//!
//! Candidates come from the builtin names first. Only when no builtin matches are
//! the search-path directories scanned, so the two sources are never mixed.

use crate::builtin::Builtin;
use crate::env::Environment;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// Result of one completion request.
///
/// In terms of an `(insertable suffix, candidates)` pair:
/// - `Unique` is a non-empty suffix with a single candidate; the caller adds a space.
/// - `Partial` is a non-empty suffix extending to the candidates' common prefix.
/// - `Ambiguous` is an empty suffix with the full candidate list, for display.
/// - `None` is no suggestion at all; the caller rings the bell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    None,
    Unique(String),
    Partial(String),
    Ambiguous(Vec<String>),
}

/// Remembers the prefix of the previous Tab press and how many times in a row it
/// was pressed for that same prefix.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompletionState {
    last_prefix: String,
    presses: usize,
}

impl CompletionState {
    /// Registers a Tab press for `prefix` and returns the consecutive press count.
    ///
    /// The counter starts over whenever the prefix differs from the previous press.
    pub fn press(&mut self, prefix: &str) -> usize {
        if prefix != self.last_prefix {
            self.last_prefix = prefix.to_string();
            self.presses = 0;
        }
        self.presses += 1;
        self.presses
    }

    pub fn reset(&mut self) {
        self.last_prefix.clear();
        self.presses = 0;
    }

    pub fn presses(&self) -> usize {
        self.presses
    }
}

/// Proposes completions from a fixed set of builtin names and a list of directories.
#[derive(Debug, Clone)]
pub struct Completer {
    builtins: Vec<String>,
    dirs: Vec<PathBuf>,
}

impl Completer {
    pub fn new(builtins: Vec<String>, dirs: Vec<PathBuf>) -> Self {
        Self { builtins, dirs }
    }

    /// Completer over the builtin table, the current directory and every `PATH` entry.
    pub fn from_environment(env: &Environment) -> Self {
        let mut dirs = vec![PathBuf::from(".")];
        dirs.extend(env.search_path());
        Self::new(Builtin::names().map(String::from).collect(), dirs)
    }

    /// Completes `prefix` given how many times Tab was pressed in a row for it.
    pub fn complete(&self, prefix: &str, tab_presses: usize) -> Completion {
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Completion::None;
        }

        let candidates = self.candidates(prefix);
        match candidates.as_slice() {
            [] => Completion::None,
            [only] => Completion::Unique(only[prefix.len()..].to_string()),
            _ => {
                let lcp = longest_common_prefix(&candidates);
                if lcp.len() > prefix.len() {
                    Completion::Partial(lcp[prefix.len()..].to_string())
                } else if tab_presses > 1 {
                    Completion::Ambiguous(candidates)
                } else {
                    Completion::None
                }
            }
        }
    }

    /// Sorted, de-duplicated names starting with (but not equal to) `prefix`.
    pub fn candidates(&self, prefix: &str) -> Vec<String> {
        let builtins: BTreeSet<String> = self
            .builtins
            .iter()
            .filter(|name| name.starts_with(prefix) && name.as_str() != prefix)
            .cloned()
            .collect();
        if !builtins.is_empty() {
            return builtins.into_iter().collect();
        }
        self.search_dirs(prefix).into_iter().collect()
    }

    fn search_dirs(&self, prefix: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for dir in &self.dirs {
            let entries = match fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::trace!("skipping {}: {}", dir.display(), e);
                    continue;
                }
            };
            for entry in entries.flatten() {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(true);
                if is_dir {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    if name.starts_with(prefix) && name != prefix {
                        found.insert(name.to_string());
                    }
                }
            }
        }
        found
    }
}

/// Longest string that every element of `strs` starts with.
///
/// Shrinks a running prefix, starting from the first string, until all strings
/// share it. An empty slice yields an empty string.
pub fn longest_common_prefix<S: AsRef<str>>(strs: &[S]) -> String {
    let Some((first, rest)) = strs.split_first() else {
        return String::new();
    };
    let mut prefix = first.as_ref().to_string();
    for s in rest {
        while !s.as_ref().starts_with(prefix.as_str()) {
            prefix.pop();
        }
    }
    prefix
}
