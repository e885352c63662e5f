use crate::builtin::Builtin;
use crate::completion::Completer;
use crate::config::Config;
use crate::editor::{LineReader, Prompt, ReadEvent};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::io_adapters::{RedirectedStreams, open_target};
use crate::lexer;
use crate::parser::{self, Redirections};
use crate::terminal::RawMode;
use anyhow::Context;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitStatus;

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// The interpreter owns an [`Environment`]. Each line goes through the lexer, then
/// redirection extraction, then dispatch to a builtin or an external program.
///
/// Example
/// ```
/// use shx::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// sh.execute_line_with_output("echo hello 'big world'", &mut out, &mut err).unwrap();
/// assert_eq!(out, b"hello big world\n");
/// ```
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Exit status requested with `exit`, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        self.env.exit_code
    }

    /// Runs one command line against the process's standard streams.
    pub fn execute_line(&mut self, line: &str) -> anyhow::Result<()> {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.execute_line_with_output(line, &mut stdout.lock(), &mut stderr.lock())
    }

    /// Runs one command line, using `stdout`/`stderr` as the shell's own streams.
    ///
    /// Syntax errors are reported on `stderr` and nothing runs. Errors are only
    /// returned when the shell's own streams cannot be written.
    pub fn execute_line_with_output(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let tokens = lexer::tokenize(line);
        if tokens.is_empty() {
            return Ok(());
        }

        match parser::extract_redirections(tokens) {
            Ok(command) => self.dispatch(&command.argv, &command.redirects, stdout, stderr)?,
            Err(e) => writeln!(stderr, "{}", e)?,
        }
        stdout.flush()?;
        Ok(())
    }

    /// Routes `argv` to a builtin or an external program.
    ///
    /// An empty `argv` is a no-op. Streams without a redirection target use the
    /// shell's own `stdout`/`stderr`.
    pub fn dispatch(
        &mut self,
        argv: &[String],
        redirects: &Redirections,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> io::Result<()> {
        let Some(name) = argv.first() else {
            return Ok(());
        };

        match Builtin::lookup(name) {
            Some(builtin) => self.run_builtin(builtin, argv, redirects, stdout, stderr),
            None => {
                self.run_external(argv, redirects, stdout, stderr)?;
                Ok(())
            }
        }
    }

    fn run_builtin(
        &mut self,
        builtin: Builtin,
        argv: &[String],
        redirects: &Redirections,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> io::Result<()> {
        let mut streams = match RedirectedStreams::open(redirects, &self.env) {
            Ok(streams) => streams,
            Err(e) => return writeln!(stderr, "{}", e),
        };

        tracing::debug!("running builtin {}", builtin.name());
        let out: &mut dyn Write = match streams.stdout.as_mut() {
            Some(file) => file,
            None => stdout,
        };
        let err: &mut dyn Write = match streams.stderr.as_mut() {
            Some(file) => file,
            None => stderr,
        };
        builtin.invoke(argv, out, err, &mut self.env);
        out.flush()?;
        err.flush()
    }

    /// Spawns an external program and waits for it.
    ///
    /// The child's exit status is returned for inspection but never becomes the
    /// shell's own status.
    fn run_external(
        &mut self,
        argv: &[String],
        redirects: &Redirections,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> io::Result<Option<ExitStatus>> {
        let name = &argv[0];
        let Some(command) = ExternalCommand::resolve(&self.env, argv) else {
            tracing::debug!("{} not found on PATH", name);
            self.report_not_found(name, redirects, stderr)?;
            return Ok(None);
        };

        let streams = match RedirectedStreams::open(redirects, &self.env) {
            Ok(streams) => streams,
            Err(e) => {
                writeln!(stderr, "{}", e)?;
                return Ok(None);
            }
        };
        let (child_stdout, child_stderr) = streams.into_stdio();

        // Keep output order intact around the child's own writes.
        stdout.flush()?;
        stderr.flush()?;

        tracing::debug!("spawning {}", command.program().display());
        match command.spawn_and_wait(child_stdout, child_stderr, &self.env) {
            Ok(status) => {
                tracing::debug!("{} exited with {}", name, status);
                Ok(Some(status))
            }
            Err(e) => {
                writeln!(stderr, "{}: {}", name, e)?;
                Ok(None)
            }
        }
    }

    fn report_not_found(
        &self,
        name: &str,
        redirects: &Redirections,
        stderr: &mut dyn Write,
    ) -> io::Result<()> {
        match &redirects.stderr {
            Some(target) => match open_target(target, &self.env) {
                Ok(mut file) => writeln!(file, "{}: command not found", name),
                Err(e) => writeln!(stderr, "{}", e),
            },
            None => writeln!(stderr, "{}: command not found", name),
        }
    }

    /// Runs the shell until `exit`, end of input or Ctrl-C.
    ///
    /// A terminal on standard input gets the interactive line editor; anything else
    /// is read line by line without a prompt. Returns the process exit status.
    pub fn repl(&mut self, config: &Config) -> anyhow::Result<i32> {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            return self.run_script(stdin.lock());
        }

        let prompt = Prompt::new(config.prompt.as_str(), config.color);
        let mut reader = LineReader::new(prompt, Completer::from_environment(&self.env));

        while !self.env.should_exit {
            // The working directory may have changed since the last line.
            reader.set_completer(Completer::from_environment(&self.env));

            let event = {
                let _raw = RawMode::enable().context("cannot switch the terminal to raw mode")?;
                reader.read_line(&mut stdin.lock(), &mut io::stdout())?
            };

            match event {
                ReadEvent::Line(line) => self.execute_line(line.trim())?,
                ReadEvent::Interrupted => return Ok(0),
                ReadEvent::Eof => break,
            }
        }

        Ok(self.env.exit_code)
    }

    /// Executes every line of `input` in order until it ends or `exit` runs.
    pub fn run_script<R: BufRead>(&mut self, input: R) -> anyhow::Result<i32> {
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            self.execute_line(&line)?;
            if self.env.should_exit {
                break;
            }
        }
        Ok(self.env.exit_code)
    }
}

impl Default for Interpreter {
    /// An interpreter over the current process environment.
    fn default() -> Self {
        Self::new(Environment::new())
    }
}
