use std::collections::HashMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Mutable, user-level view of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: a map of environment variables that will be visible to executed commands.
/// - `current_dir`: the working directory for command execution.
/// - `should_exit` / `exit_code`: set by the `exit` builtin, checked by the REPL loop.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, the interactive loop stops after the current line.
    pub should_exit: bool,
    /// Status the shell process exits with once `should_exit` is set.
    pub exit_code: i32,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_vars(stdenv::vars().collect(), current_dir)
    }

    /// Build an environment from explicit variables and working directory.
    pub fn with_vars(vars: HashMap<String, String>, current_dir: PathBuf) -> Self {
        Self {
            vars,
            current_dir,
            should_exit: false,
            exit_code: 0,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Directories listed in `PATH`, in order. Empty entries are skipped.
    pub fn search_path(&self) -> Vec<PathBuf> {
        match self.get_var("PATH") {
            Some(paths) => stdenv::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn home_dir(&self) -> Option<PathBuf> {
        self.get_var("HOME").map(PathBuf::from)
    }

    /// Expands a leading `~` or `~/` to the home directory. Anything else, including
    /// `~user`, is returned unchanged.
    pub fn expand_home(&self, path: &str) -> PathBuf {
        let home = match self.home_dir() {
            Some(home) => home,
            None => return PathBuf::from(path),
        };
        if path == "~" {
            home
        } else if let Some(rest) = path.strip_prefix("~/") {
            home.join(rest)
        } else {
            PathBuf::from(path)
        }
    }

    /// Resolves `path` against the working directory unless it is already absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.current_dir.join(path)
    }

    /// Request the interactive loop to stop and the process to exit with `code`.
    pub fn request_exit(&mut self, code: i32) {
        self.should_exit = true;
        self.exit_code = code;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
