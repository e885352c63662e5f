use crate::env::Environment;
use crate::parser::{RedirectTarget, Redirections};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;

/// A redirection target could not be opened.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct RedirectError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Opens `target` relative to the environment's working directory.
///
/// Truncate mode creates or overwrites the file, append mode creates or appends.
pub fn open_target(target: &RedirectTarget, env: &Environment) -> Result<File, RedirectError> {
    let path = env.resolve(&target.path);
    let mut options = OpenOptions::new();
    options.create(true);
    if target.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(&path).map_err(|source| RedirectError {
        path: PathBuf::from(&target.path),
        source,
    })
}

/// Files opened for one command's redirected streams. `None` means "inherit".
///
/// Dropping the value closes the files, which ends the redirection.
#[derive(Debug, Default)]
pub struct RedirectedStreams {
    pub stdout: Option<File>,
    pub stderr: Option<File>,
}

impl RedirectedStreams {
    /// Opens stdout's target, then stderr's. The first failure aborts.
    pub fn open(redirects: &Redirections, env: &Environment) -> Result<Self, RedirectError> {
        let stdout = redirects
            .stdout
            .as_ref()
            .map(|t| open_target(t, env))
            .transpose()?;
        let stderr = redirects
            .stderr
            .as_ref()
            .map(|t| open_target(t, env))
            .transpose()?;
        Ok(Self { stdout, stderr })
    }

    /// Converts into handles for a child process, inheriting unset streams.
    pub fn into_stdio(self) -> (Stdio, Stdio) {
        (into_stdio(self.stdout), into_stdio(self.stderr))
    }
}

fn into_stdio(file: Option<File>) -> Stdio {
    match file {
        Some(file) => Stdio::from(file),
        None => Stdio::inherit(),
    }
}
