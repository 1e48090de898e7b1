use std::path::PathBuf;

use clap::{Args, Parser};
use log::trace;

use crate::error::{Error, Result};
use crate::model::REPO_URL;

/// What the first positional argument asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
}

impl Action {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "install" | "-Syu" => Some(Action::Install),
            "uninstall" | "-R" => Some(Action::Uninstall),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Uninstall => "uninstall",
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Common {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Disable color output
    #[arg(long)]
    pub no_color: bool,
}

/// Install or update GoSublime
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct InstallArgs {
    /// Path where Sublime Text 3 packages are stored.
    #[arg(long, value_name = "PATH", allow_hyphen_values = true)]
    pub packages: Option<PathBuf>,

    /// The version tag (e.g. v19.12.30) or branch to install.
    ///
    /// Enter 'latest' to install the latest stable release branch (development).
    /// Enter 'beta' to install the unreleased development branch (next).
    #[arg(long, value_name = "REF", default_value = "latest", allow_hyphen_values = true)]
    pub version: String,

    /// Force apply git operations, even in cases where data might be overwritten.
    #[arg(long)]
    pub force: bool,

    /// Git URL GoSublime is cloned from.
    #[arg(
        long,
        value_name = "URL",
        env = "GOSUBLIME_GET_REPO",
        default_value = REPO_URL,
        allow_hyphen_values = true
    )]
    pub repo: String,

    #[command(flatten)]
    pub common: Common,
}

/// Remove GoSublime from the packages directory
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct UninstallArgs {
    /// Path where Sublime Text 3 packages are stored.
    #[arg(long, value_name = "PATH", allow_hyphen_values = true)]
    pub packages: Option<PathBuf>,

    #[command(flatten)]
    pub common: Common,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install(InstallArgs),
    Uninstall(UninstallArgs),
}

impl Command {
    pub fn common(&self) -> &Common {
        match self {
            Command::Install(args) => &args.common,
            Command::Uninstall(args) => &args.common,
        }
    }
}

const VALUE_FLAGS: &[&str] = &["packages", "version", "repo"];
const SWITCH_FLAGS: &[&str] = &["force", "debug", "no-color", "help"];

/// Turns the single-dash long flags the tool has always accepted
/// (`-packages`, `-version=beta`) into the `--` form clap expects.
/// Only known flag names are rewritten; the value after a flag, short flags
/// and everything after `--` are left alone.
fn normalize_flags(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut flags = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--" {
            flags.push(arg);
            flags.extend(args.by_ref());
            break;
        }

        let dashes = if arg.starts_with("--") { 2 } else { 1 };
        let (name, has_value) = match arg.get(dashes..).filter(|_| arg.starts_with('-')) {
            Some(rest) => match rest.split_once('=') {
                Some((name, _)) => (name, true),
                None => (rest, false),
            },
            None => ("", false),
        };
        let takes_value = VALUE_FLAGS.contains(&name);
        let known = takes_value || SWITCH_FLAGS.contains(&name);

        let value = if takes_value && !has_value {
            args.next()
        } else {
            None
        };
        if known && dashes == 1 {
            flags.push(format!("-{}", arg));
        } else {
            flags.push(arg);
        }
        flags.extend(value);
    }
    flags
}

/// Parses the full argument list, program name included.
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut args = args.into_iter();
    let prog = args.next().unwrap_or_else(|| "gosublime-get".to_string());

    let action = match args.next().as_deref().and_then(Action::from_arg) {
        Some(action) => action,
        None => return Err(Error::Usage(prog)),
    };

    let flags = normalize_flags(args);
    trace!("{:?} flags: {:?}", action, flags);
    let argv = std::iter::once(format!("{} {}", prog, action.name())).chain(flags);

    Ok(match action {
        Action::Install => Command::Install(InstallArgs::try_parse_from(argv)?),
        Action::Uninstall => Command::Uninstall(UninstallArgs::try_parse_from(argv)?),
    })
}
