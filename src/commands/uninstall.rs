use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::model::Settings;
use crate::success;
use crate::utils::platform::install_dir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(PathBuf),
    Declined(PathBuf),
}

/// Asks for confirmation on `input`, then deletes GoSublime from `packages`.
pub fn uninstall(
    packages: &Path,
    settings: &Settings,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<Removal> {
    let gs_dir = install_dir(packages, &settings.install_dir_name);
    match std::fs::metadata(&gs_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(Error::NotADirectory(gs_dir)),
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::NotInstalled(gs_dir)),
        Err(source) => return Err(Error::Stat { path: gs_dir, source }),
    }

    write!(
        out,
        "Are you sure you want to remove directory {}?\nEnter 'Y' or 'y' to confirm: ",
        gs_dir.display()
    )?;
    out.flush()?;

    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;
    let line = String::from_utf8_lossy(&line);
    let answer = line.split_whitespace().next().unwrap_or_default();
    if answer != "Y" && answer != "y" {
        debug!("removal of {} declined with {:?}", gs_dir.display(), answer);
        return Ok(Removal::Declined(gs_dir));
    }

    if let Err(source) = std::fs::remove_dir_all(&gs_dir) {
        return Err(Error::Remove { path: gs_dir, source });
    }
    success!(out, "{} removed", gs_dir.display())?;
    Ok(Removal::Removed(gs_dir))
}
