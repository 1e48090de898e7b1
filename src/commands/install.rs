use std::fs::DirBuilder;
use std::io::Write;
use std::path::{Path, PathBuf};

use git2::ErrorCode;
use log::{debug, trace};
use yansi::Paint;

use crate::error::{Error, Result};
use crate::model::{Settings, Version};
use crate::utils::git::{self, Status};
use crate::utils::platform::install_dir;
use crate::{success, tip, title, warning};

/// Clones or updates GoSublime in `packages` and checks out `version`.
/// Returns the directory it was installed in.
pub fn install(
    packages: &Path,
    version: &Version,
    force: bool,
    settings: &Settings,
    out: &mut dyn Write,
) -> Result<PathBuf> {
    let reference = version.reference();
    let gs_dir = install_dir(packages, &settings.install_dir_name);
    let remote_name = settings.remote_name.as_str();
    debug!("installing {} ({}) into {}", version.name(), reference, gs_dir.display());

    if force {
        warning!(out, "Force mode: local changes in {} may be overwritten", gs_dir.display())?;
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    builder.create(packages)?;

    title!(
        out,
        "🔎",
        "Cloning {} into {}",
        settings.repo_url,
        Paint::cyan(gs_dir.display()).underline()
    )?;
    let repo = git::clone_or_open(&settings.repo_url, &gs_dir, remote_name, &reference, out)
        .map_err(|source| Error::Clone {
            url: settings.repo_url.clone(),
            source,
        })?;

    let mut remote = git::ensure_remote(&repo, remote_name, &settings.repo_url).map_err(
        |source| Error::Remote {
            name: remote_name.to_string(),
            url: settings.repo_url.clone(),
            source,
        },
    )?;

    title!(out, "📥", "Fetching {}", remote_name)?;
    match git::fetch(&repo, &mut remote, force, out).map_err(Error::Fetch)? {
        Status::UpToDate => writeln!(out, "Already up to date.")?,
        status => trace!("fetch: {:?}", status),
    }

    title!(out, "🔀", "Checking out {}", reference.short())?;
    if let Err(e) = git::checkout(&repo, &reference, force) {
        if e.code() != ErrorCode::NotFound || reference.is_tag() {
            return Err(Error::Checkout {
                reference: reference.full(),
                source: e,
            });
        }
        debug!("checkout {} failed ({}), creating the branch", reference, e.message());
        git::create_branch(&repo, &reference, remote_name)
            .and_then(|_| git::checkout(&repo, &reference, force))
            .map_err(|source| Error::Checkout {
                reference: reference.full(),
                source,
            })?;
    }

    title!(out, "⏬", "Pulling {}", reference.short())?;
    let status = git::pull(&repo, &mut remote, &reference, force, out).map_err(|source| {
        Error::Pull {
            reference: reference.full(),
            source,
        }
    })?;
    match status {
        Status::UpToDate => writeln!(out, "Already up to date.")?,
        Status::Updated => writeln!(out, "Fast-forwarded {}.", reference.short())?,
        Status::Diverged => {
            return Err(Error::NonFastForward {
                reference: reference.full(),
            })
        }
    }

    success!(out, "GoSublime installed in {}.", gs_dir.display())?;
    tip!(out, "You might need to restart Sublime Text for changes to take effect.")?;
    Ok(gs_dir)
}
