use crate::env::Environment;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A program found on disk, ready to be spawned with its arguments.
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Resolves `argv[0]` through the environment's `PATH`.
    ///
    /// Returns `None` for an empty `argv` or when no executable is found.
    pub fn resolve(env: &Environment, argv: &[String]) -> Option<Self> {
        let (name, args) = argv.split_first()?;
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let program = find_command_path(OsStr::new(&search_paths), Path::new(name))?;
        Some(Self::new(env.resolve(program.as_ref()), args.to_vec()))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Spawns the program and blocks until it exits.
    ///
    /// The child runs in the environment's working directory with its variables.
    /// The returned status is informational only: the shell does not adopt it.
    pub fn spawn_and_wait(
        self,
        stdout: Stdio,
        stderr: Stdio,
        env: &Environment,
    ) -> io::Result<ExitStatus> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(stderr)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()?;
        child.wait()
    }
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it is an executable file.
/// - Relative with multiple components (e.g., `bin/sh` or `./foo`): returns it if it
///   is an executable file relative to the current directory.
/// - Single path component (no separators): search each directory in `search_paths`
///   (PATH) and return the first executable match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) if !path.starts_with(".") => {
            find_in_path(search_paths, x.as_os_str()).map(Cow::Owned)
        }
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if is_executable(path) { Some(path) } else { None }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
