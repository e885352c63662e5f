use crate::env::Environment;
use argh::FromArgs;

pub const DEFAULT_PROMPT_LABEL: &str = "ShX";

#[derive(FromArgs, Debug)]
/// An interactive shell with tab completion and output redirection.
pub struct ShellArgs {
    #[argh(option, short = 'c')]
    /// run a single command line and exit
    pub command: Option<String>,

    #[argh(option, default = "String::from(DEFAULT_PROMPT_LABEL)")]
    /// label shown in front of the prompt arrow
    pub prompt: String,

    #[argh(switch)]
    /// print the prompt without colors
    pub no_color: bool,
}

/// Settings the shell runs with, resolved from [`ShellArgs`] and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Option<String>,
    pub prompt: String,
    pub color: bool,
}

impl Config {
    /// Colors are off when `--no-color` is given or `NO_COLOR` is set to anything non-empty.
    pub fn from_args(args: ShellArgs, env: &Environment) -> Self {
        let no_color_var = env.get_var("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            command: args.command,
            prompt: args.prompt,
            color: !(args.no_color || no_color_var),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            prompt: DEFAULT_PROMPT_LABEL.to_string(),
            color: true,
        }
    }
}
