use crate::builtin::Builtin;
use crate::env::Environment;
use crate::external::ExternalCommand;
use std::fmt;
use std::path::PathBuf;

/// How the shell would run a command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Builtin(Builtin),
    External(PathBuf),
    NotFound,
}

/// Classifies `name` the same way the dispatcher does: builtins first, then `PATH`.
pub fn classify(name: &str, env: &Environment) -> CommandKind {
    if let Some(builtin) = Builtin::lookup(name) {
        return CommandKind::Builtin(builtin);
    }
    match ExternalCommand::resolve(env, &[name.to_string()]) {
        Some(cmd) => CommandKind::External(cmd.program().to_path_buf()),
        None => CommandKind::NotFound,
    }
}

/// Human-readable description of a command, as printed by `type`.
pub struct Description<'a> {
    pub name: &'a str,
    pub kind: CommandKind,
}

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CommandKind::Builtin(_) => write!(f, "{} is a shell builtin", self.name),
            CommandKind::External(path) => write!(f, "{} is {}", self.name, path.display()),
            CommandKind::NotFound => write!(f, "{}: not found", self.name),
        }
    }
}

pub fn describe<'a>(name: &'a str, env: &Environment) -> Description<'a> {
    Description {
        name,
        kind: classify(name, env),
    }
}
