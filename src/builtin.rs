use crate::command::describe;
use crate::env::Environment;
use anyhow::{Context, Result, anyhow, bail};
use argh::{EarlyExit, FromArgs};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process with explicit output and error streams.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Executes the command.
    ///
    /// An error is printed to `stderr` by the caller; nothing else is reported back.
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()>;
}

/// The builtin table: every command name the shell runs in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
    Clear,
    Ls,
    Cat,
    Cp,
    Mv,
    Rm,
    Mkdir,
    Rmdir,
}

impl Builtin {
    pub const ALL: [Builtin; 13] = [
        Builtin::Exit,
        Builtin::Echo,
        Builtin::Type,
        Builtin::Pwd,
        Builtin::Cd,
        Builtin::Clear,
        Builtin::Ls,
        Builtin::Cat,
        Builtin::Cp,
        Builtin::Mv,
        Builtin::Rm,
        Builtin::Mkdir,
        Builtin::Rmdir,
    ];

    /// Canonical name of the command, e.g. "echo" or "cd".
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Echo => "echo",
            Builtin::Type => "type",
            Builtin::Pwd => "pwd",
            Builtin::Cd => "cd",
            Builtin::Clear => "clear",
            Builtin::Ls => "ls",
            Builtin::Cat => "cat",
            Builtin::Cp => "cp",
            Builtin::Mv => "mv",
            Builtin::Rm => "rm",
            Builtin::Mkdir => "mkdir",
            Builtin::Rmdir => "rmdir",
        }
    }

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(Builtin::name)
    }

    /// Runs the builtin with `argv` (command name included) as its argument vector.
    pub fn invoke(
        self,
        argv: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) {
        match self {
            Builtin::Exit => run::<Exit>(argv, stdout, stderr, env),
            Builtin::Echo => run::<Echo>(argv, stdout, stderr, env),
            Builtin::Type => run::<Type>(argv, stdout, stderr, env),
            Builtin::Pwd => run::<Pwd>(argv, stdout, stderr, env),
            Builtin::Cd => run::<Cd>(argv, stdout, stderr, env),
            Builtin::Clear => run::<ClearScreen>(argv, stdout, stderr, env),
            Builtin::Ls => run::<Ls>(argv, stdout, stderr, env),
            Builtin::Cat => run::<Cat>(argv, stdout, stderr, env),
            Builtin::Cp => run::<Cp>(argv, stdout, stderr, env),
            Builtin::Mv => run::<Mv>(argv, stdout, stderr, env),
            Builtin::Rm => run::<Rm>(argv, stdout, stderr, env),
            Builtin::Mkdir => run::<Mkdir>(argv, stdout, stderr, env),
            Builtin::Rmdir => run::<Rmdir>(argv, stdout, stderr, env),
        }
    }
}

fn run<T: BuiltinCommand>(
    argv: &[String],
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
    env: &mut Environment,
) {
    let Some((name, args)) = argv.split_first() else {
        return;
    };
    let args = operand_args(args);

    let result = match T::from_args(&[name.as_str()], &args) {
        Ok(cmd) => cmd.execute(stdout, stderr, env),
        // --help
        Err(EarlyExit {
            output,
            status: Ok(()),
        }) => write_line(stdout, &output),
        Err(EarlyExit {
            output,
            status: Err(()),
        }) => write_line(stderr, &output),
    };

    if let Err(e) = result {
        if let Err(write_err) = writeln!(stderr, "{:#}", e) {
            tracing::warn!("{}: cannot report error: {}", name, write_err);
        }
    }
}

/// Arguments as handed to argh.
///
/// Builtins take no options, so every word is an operand, including `help` and
/// words starting with `-`. Only a lone `--help` asks for usage.
fn operand_args(args: &[String]) -> Vec<&str> {
    match args {
        [only] if only == "--help" => vec!["--help"],
        _ => std::iter::once("--")
            .chain(args.iter().map(String::as_str))
            .collect(),
    }
}

fn write_line(out: &mut dyn Write, text: &str) -> Result<()> {
    if text.ends_with('\n') {
        write!(out, "{}", text)?;
    } else {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional)]
    /// exit status of the shell process, 0 when omitted
    pub code: Option<i32>,
}

impl BuiltinCommand for Exit {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        env.request_exit(self.code.unwrap_or(0));
        Ok(())
    }
}

#[derive(FromArgs)]
/// Write the arguments to standard output, separated by spaces.
/// A leading `-n` suppresses the trailing newline.
pub struct Echo {
    #[argh(positional, greedy)]
    /// values to print as-is, separated by spaces.
    pub args: Vec<String>,
}

impl BuiltinCommand for Echo {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<()> {
        let (no_newline, words) = match self.args.split_first() {
            Some((flag, rest)) if flag == "-n" => (true, rest),
            _ => (false, self.args.as_slice()),
        };
        let s = words.join(" ");
        if no_newline {
            write!(stdout, "{}", s)?;
        } else {
            writeln!(stdout, "{}", s)?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Describe how each name would be run: builtin, external program or not found.
pub struct Type {
    #[argh(positional, greedy)]
    /// command names to look up
    pub names: Vec<String>,
}

impl BuiltinCommand for Type {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        if self.names.is_empty() {
            bail!("type: missing argument");
        }
        for name in &self.names {
            writeln!(stdout, "{}", describe(name, env))?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; `~` and `~/dir` are relative to $HOME. Defaults to $HOME when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => env.expand_home(t),
            _ => env
                .home_dir()
                .ok_or_else(|| anyhow!("cd: no target and HOME not set"))?,
        };

        let new_dir = env.resolve(&target);
        let canonical = fs::canonicalize(&new_dir)
            .map_err(|_| anyhow!("cd: {}: No such file or directory", target.display()))?;
        if !canonical.is_dir() {
            bail!("cd: {}: Not a directory", target.display());
        }

        env::set_current_dir(&canonical)
            .with_context(|| format!("cd: can't chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Clear the terminal screen.
pub struct ClearScreen {}

impl BuiltinCommand for ClearScreen {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<()> {
        clear_screen(stdout)?;
        Ok(())
    }
}

fn clear_screen<W: Write>(mut out: W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

#[derive(FromArgs)]
/// List directory entries, one per line, sorted by name.
pub struct Ls {
    #[argh(positional)]
    /// directory to list, the current directory when omitted
    pub dir: Option<String>,
}

impl BuiltinCommand for Ls {
    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        let dir = self.dir.as_deref().unwrap_or(".");
        let entries = fs::read_dir(env.resolve(dir))
            .map_err(|e| anyhow!("ls: cannot access '{}': {}", dir, e))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        for name in names {
            writeln!(stdout, "{}", name)?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// print file(s) to stdout
pub struct Cat {
    #[argh(positional, greedy)]
    /// files to print, in order
    pub files: Vec<String>,
}

impl BuiltinCommand for Cat {
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        if self.files.is_empty() {
            bail!("cat: missing file operand");
        }
        for fname in &self.files {
            match fs::File::open(env.resolve(fname)) {
                Ok(mut f) => {
                    io::copy(&mut f, stdout).with_context(|| format!("cat: {}", fname))?;
                }
                Err(e) => writeln!(stderr, "cat: {}: {}", fname, e)?,
            }
        }
        Ok(())
    }
}

/// Where `source` should land: inside `destination` when that is a directory.
fn destination_for(source: &Path, destination: PathBuf) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination,
    }
}

#[derive(FromArgs)]
/// Copy a file.
pub struct Cp {
    #[argh(positional)]
    /// file to copy
    pub source: String,

    #[argh(positional)]
    /// target file, or an existing directory to copy into
    pub destination: String,
}

impl BuiltinCommand for Cp {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        let source = env.resolve(&self.source);
        let destination = destination_for(&source, env.resolve(&self.destination));
        fs::copy(&source, &destination).map_err(|e| {
            anyhow!(
                "cp: cannot copy '{}' to '{}': {}",
                self.source,
                self.destination,
                e
            )
        })?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Move or rename a file or directory.
pub struct Mv {
    #[argh(positional)]
    /// file or directory to move
    pub source: String,

    #[argh(positional)]
    /// new name, or an existing directory to move into
    pub destination: String,
}

impl BuiltinCommand for Mv {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        let source = env.resolve(&self.source);
        let destination = destination_for(&source, env.resolve(&self.destination));
        fs::rename(&source, &destination).map_err(|e| {
            anyhow!(
                "mv: cannot move '{}' to '{}': {}",
                self.source,
                self.destination,
                e
            )
        })?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Remove files.
pub struct Rm {
    #[argh(positional, greedy)]
    /// files to remove
    pub files: Vec<String>,
}

impl BuiltinCommand for Rm {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        if self.files.is_empty() {
            bail!("rm: missing operand");
        }
        for file in &self.files {
            let path = env.resolve(file);
            if path.is_dir() {
                writeln!(stderr, "rm: cannot remove '{}': Is a directory", file)?;
            } else if let Err(e) = fs::remove_file(&path) {
                writeln!(stderr, "rm: cannot remove '{}': {}", file, e)?;
            }
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Create directories, including missing parents.
pub struct Mkdir {
    #[argh(positional, greedy)]
    /// directories to create
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Mkdir {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        if self.dirs.is_empty() {
            bail!("mkdir: missing operand");
        }
        for dir in &self.dirs {
            if let Err(e) = fs::create_dir_all(env.resolve(dir)) {
                writeln!(stderr, "mkdir: cannot create directory '{}': {}", dir, e)?;
            }
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Remove empty directories.
pub struct Rmdir {
    #[argh(positional, greedy)]
    /// empty directories to remove
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Rmdir {
    fn execute(
        self,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<()> {
        if self.dirs.is_empty() {
            bail!("rmdir: missing operand");
        }
        for dir in &self.dirs {
            if let Err(e) = fs::remove_dir(env.resolve(dir)) {
                writeln!(stderr, "rmdir: failed to remove '{}': {}", dir, e)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env as stdenv;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    pub(crate) fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: Mutex<()> = Mutex::new(());
        MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn env_in(dir: &Path) -> Environment {
        Environment::with_vars(HashMap::new(), dir.to_path_buf())
    }

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Invokes a builtin through the table, returning (stdout, stderr).
    fn invoke(env: &mut Environment, items: &[&str]) -> (String, String) {
        let argv = argv(items);
        let builtin = Builtin::lookup(&argv[0]).expect("builtin");
        let mut out = Vec::new();
        let mut err = Vec::new();
        builtin.invoke(&argv, &mut out, &mut err, env);
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_table_lookup_and_names() {
        assert_eq!(Builtin::lookup("echo"), Some(Builtin::Echo));
        assert_eq!(Builtin::lookup("clear"), Some(Builtin::Clear));
        assert_eq!(Builtin::lookup("ech"), None);
        let names: Vec<&str> = Builtin::names().collect();
        assert_eq!(names.len(), Builtin::ALL.len());
        for b in Builtin::ALL {
            assert_eq!(Builtin::lookup(b.name()), Some(b));
        }
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let dir = TempDir::new().unwrap();
        let mut env = env_in(dir.path());

        let (out, err) = invoke(&mut env, &["pwd"]);
        assert_eq!(out, format!("{}\n", dir.path().to_string_lossy()));
        assert!(err.is_empty());
    }

    #[test]
    fn test_echo_with_and_without_newline() {
        let mut env = Environment::new();

        let (out, _) = invoke(&mut env, &["echo", "hello", "world"]);
        assert_eq!(out, "hello world\n");

        let (out, _) = invoke(&mut env, &["echo", "-n", "foo", "bar"]);
        assert_eq!(out, "foo bar");

        let (out, _) = invoke(&mut env, &["echo"]);
        assert_eq!(out, "\n");
    }

    #[test]
    fn test_echo_prints_option_like_words() {
        let mut env = Environment::new();

        let (out, err) = invoke(&mut env, &["echo", "help"]);
        assert_eq!(out, "help\n");
        assert!(err.is_empty());

        let (out, err) = invoke(&mut env, &["echo", "-e", "x"]);
        assert_eq!(out, "-e x\n");
        assert!(err.is_empty());

        let (out, _) = invoke(&mut env, &["echo", "-1", "--", "-n"]);
        assert_eq!(out, "-1 -- -n\n");

        let (out, _) = invoke(&mut env, &["echo", "-n"]);
        assert_eq!(out, "");
    }

    #[test]
    fn test_cat_reads_file_named_like_help() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("help"), "manual\n").unwrap();
        fs::write(dir.path().join("-v"), "dash\n").unwrap();
        let mut env = env_in(dir.path());

        let (out, err) = invoke(&mut env, &["cat", "help", "-v"]);
        assert_eq!(out, "manual\ndash\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_exit_accepts_negative_code() {
        let mut env = Environment::new();
        invoke(&mut env, &["exit", "-1"]);
        assert!(env.should_exit);
        assert_eq!(env.exit_code, -1);
    }

    #[test]
    fn test_help_goes_to_stdout_and_bad_args_to_stderr() {
        let mut env = Environment::new();

        let (out, err) = invoke(&mut env, &["pwd", "--help"]);
        assert!(out.contains("Usage"));
        assert!(err.is_empty());

        let (out, err) = invoke(&mut env, &["pwd", "extra"]);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }

    #[test]
    fn test_exit_requests_termination() {
        let mut env = Environment::new();
        let (out, err) = invoke(&mut env, &["exit"]);
        assert!(out.is_empty() && err.is_empty());
        assert!(env.should_exit);
        assert_eq!(env.exit_code, 0);

        let mut env = Environment::new();
        invoke(&mut env, &["exit", "7"]);
        assert!(env.should_exit);
        assert_eq!(env.exit_code, 7);
    }

    #[test]
    fn test_type_describes_each_name() {
        let mut env = Environment::new();
        env.set_var("PATH", "/nonexistent");
        let (out, err) = invoke(&mut env, &["type", "ls", "zzzNoSuchCmd"]);
        assert_eq!(out, "ls is a shell builtin\nzzzNoSuchCmd: not found\n");
        assert!(err.is_empty());

        let (_, err) = invoke(&mut env, &["type"]);
        assert_eq!(err, "type: missing argument\n");
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let _lock = lock_current_dir();
        let temp = TempDir::new().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_in(&orig);

        let (_, err) = invoke(&mut env, &["cd", &canonical_temp.to_string_lossy()]);
        let new_cwd = fs::canonicalize(stdenv::current_dir().unwrap()).unwrap();
        stdenv::set_current_dir(&orig).expect("failed to restore cwd");

        assert!(err.is_empty(), "{}", err);
        assert_eq!(new_cwd, canonical_temp);
        assert_eq!(env.current_dir, canonical_temp);
    }

    #[test]
    fn test_cd_relative_and_home_shorthand() {
        let _lock = lock_current_dir();
        let temp = TempDir::new().unwrap();
        let canonical_temp = fs::canonicalize(temp.path()).unwrap();
        fs::create_dir(canonical_temp.join("sub")).unwrap();
        let orig = stdenv::current_dir().unwrap();

        let mut env = env_in(&canonical_temp);
        env.set_var("HOME", canonical_temp.to_string_lossy());

        invoke(&mut env, &["cd", "sub"]);
        assert_eq!(env.current_dir, canonical_temp.join("sub"));

        invoke(&mut env, &["cd", "~"]);
        assert_eq!(env.current_dir, canonical_temp);

        invoke(&mut env, &["cd", "~/sub"]);
        assert_eq!(env.current_dir, canonical_temp.join("sub"));

        invoke(&mut env, &["cd"]);
        assert_eq!(env.current_dir, canonical_temp);

        stdenv::set_current_dir(&orig).expect("failed to restore cwd");
    }

    #[test]
    fn test_cd_nonexistent_path_errors() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut env = env_in(&orig);

        let name = format!("nonexistent_dir_for_cd_test_{}", std::process::id());
        let (_, err) = invoke(&mut env, &["cd", &name]);

        assert_eq!(err, format!("cd: {}: No such file or directory\n", name));
        assert_eq!(stdenv::current_dir().unwrap(), orig);
        assert_eq!(env.current_dir, orig);
    }

    #[test]
    fn test_clear_writes_control_sequences() {
        let mut env = Environment::new();
        let (out, err) = invoke(&mut env, &["clear"]);
        assert!(out.starts_with("\x1b["));
        assert!(err.is_empty());
    }

    #[test]
    fn test_ls_lists_sorted_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();
        let mut env = env_in(dir.path());

        let (out, _) = invoke(&mut env, &["ls"]);
        assert_eq!(out, "a.txt\nb.txt\nc\n");

        let (_, err) = invoke(&mut env, &["ls", "missing"]);
        assert!(err.starts_with("ls: cannot access 'missing': "));
    }

    #[test]
    fn test_cat_reads_files_and_reports_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.txt"), "hello\n").unwrap();
        fs::write(dir.path().join("two.txt"), "world\n").unwrap();
        let mut env = env_in(dir.path());

        let (out, err) = invoke(&mut env, &["cat", "one.txt", "nope.txt", "two.txt"]);
        assert_eq!(out, "hello\nworld\n");
        assert!(err.starts_with("cat: nope.txt: "));

        let (_, err) = invoke(&mut env, &["cat"]);
        assert_eq!(err, "cat: missing file operand\n");
    }

    #[test]
    fn test_cp_to_file_and_into_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("src.txt"), "data").unwrap();
        fs::create_dir(dir.path().join("dest")).unwrap();
        let mut env = env_in(dir.path());

        invoke(&mut env, &["cp", "src.txt", "copy.txt"]);
        invoke(&mut env, &["cp", "src.txt", "dest"]);

        assert_eq!(fs::read_to_string(dir.path().join("copy.txt")).unwrap(), "data");
        assert_eq!(fs::read_to_string(dir.path().join("dest/src.txt")).unwrap(), "data");
        assert!(dir.path().join("src.txt").exists());

        let (_, err) = invoke(&mut env, &["cp", "missing.txt", "x.txt"]);
        assert!(err.starts_with("cp: cannot copy 'missing.txt' to 'x.txt': "));
    }

    #[test]
    fn test_mv_renames() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("old.txt"), "data").unwrap();
        let mut env = env_in(dir.path());

        let (_, err) = invoke(&mut env, &["mv", "old.txt", "new.txt"]);
        assert!(err.is_empty());
        assert!(!dir.path().join("old.txt").exists());
        assert_eq!(fs::read_to_string(dir.path().join("new.txt")).unwrap(), "data");
    }

    #[test]
    fn test_rm_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();
        fs::write(dir.path().join("b"), "").unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();
        let mut env = env_in(dir.path());

        let (_, err) = invoke(&mut env, &["rm", "a", "missing", "d", "b"]);
        assert!(!dir.path().join("a").exists());
        assert!(!dir.path().join("b").exists());
        assert!(dir.path().join("d").exists());
        let lines: Vec<&str> = err.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("rm: cannot remove 'missing': "));
        assert_eq!(lines[1], "rm: cannot remove 'd': Is a directory");
    }

    #[test]
    fn test_mkdir_and_rmdir() {
        let dir = TempDir::new().unwrap();
        let mut env = env_in(dir.path());

        let (_, err) = invoke(&mut env, &["mkdir", "x/y/z", "w"]);
        assert!(err.is_empty());
        assert!(dir.path().join("x/y/z").is_dir());
        assert!(dir.path().join("w").is_dir());

        let (_, err) = invoke(&mut env, &["rmdir", "x"]);
        assert!(err.starts_with("rmdir: failed to remove 'x': "));

        let (_, err) = invoke(&mut env, &["rmdir", "x/y/z", "w"]);
        assert!(err.is_empty());
        assert!(!dir.path().join("x/y/z").exists());
        assert!(!dir.path().join("w").exists());
    }
}
