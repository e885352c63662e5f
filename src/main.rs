use shx::{Config, Environment, Interpreter, ShellArgs};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "SHX_LOG";

fn main() {
    let args: ShellArgs = argh::from_env();

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let env = Environment::new();
    let config = Config::from_args(args, &env);
    let mut shell = Interpreter::new(env);

    let result = match config.command.as_deref() {
        Some(line) => shell.execute_line(line).map(|()| shell.exit_code()),
        None => shell.repl(&config),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("shx: {:#}", e);
            std::process::exit(1);
        }
    }
}
