mod cli;
mod commands;
mod error;
mod model;
mod utils;

use std::io::{self, Write};
use std::path::PathBuf;

use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;
use yansi::Paint;

use crate::cli::Command;
use crate::commands::{install, uninstall, Removal};
use crate::error::{Error, Result};
use crate::model::{Settings, Version};
use crate::utils::platform::default_packages_dir;

fn main() {
    let command = match cli::parse(std::env::args()) {
        Ok(command) => command,
        Err(e) => exit(e),
    };

    let common = command.common();
    let level = if common.debug {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("Failed to set up logging: {}", e);
    }

    if Paint::enable_windows_ascii() && !common.no_color {
        Paint::enable()
    } else {
        Paint::disable()
    }

    if let Err(e) = run(command) {
        exit(e);
    }
}

fn run(command: Command) -> Result<()> {
    let mut stdout = io::stdout();
    match command {
        Command::Install(args) => {
            let packages = packages_dir(args.packages)?;
            let settings = Settings {
                repo_url: args.repo,
                ..Settings::default()
            };
            install(
                &packages,
                &Version::parse(&args.version),
                args.force,
                &settings,
                &mut stdout,
            )?;
        }
        Command::Uninstall(args) => {
            let packages = packages_dir(args.packages)?;
            let removal = uninstall(
                &packages,
                &Settings::default(),
                &mut stdout,
                &mut io::stdin().lock(),
            )?;
            match removal {
                Removal::Removed(dir) => debug!("removed {}", dir.display()),
                Removal::Declined(dir) => debug!("{} left in place", dir.display()),
            }
        }
    }
    Ok(())
}

/// The `-packages` flag when given, the platform default otherwise.
fn packages_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir),
        None => default_packages_dir(),
    }
}

fn exit(e: Error) -> ! {
    match e {
        Error::Usage(_) => eprintln!("{}", e),
        Error::Flags(e) => e.exit(),
        e => {
            let _ = error!(io::stderr(), "{}", e);
        }
    }
    std::process::exit(1)
}
