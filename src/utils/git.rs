use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    AutotagOption, ErrorCode, FetchOptions, ObjectType, Oid, Remote, RemoteCallbacks,
    Repository,
};
use log::{debug, trace};

use crate::model::{ReferenceKind, ReferenceName};

/// Outcome of a fetch or pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Updated,
    UpToDate,
    /// Local branch has commits the remote does not, a fast-forward is impossible.
    Diverged,
}

/// Streams transfer progress into the output sink and counts updated refs.
struct Transfer<'w> {
    out: RefCell<&'w mut dyn Write>,
    updated: Cell<usize>,
    printed: Cell<bool>,
}

impl<'w> Transfer<'w> {
    fn new(out: &'w mut dyn Write) -> Self {
        Transfer {
            out: RefCell::new(out),
            updated: Cell::new(0),
            printed: Cell::new(false),
        }
    }

    fn fetch_options<'a>(&'a self, tags: AutotagOption) -> FetchOptions<'a>
    where
        'w: 'a,
    {
        let mut callbacks = RemoteCallbacks::new();
        callbacks.sideband_progress(move |data| {
            let _ = self.out.borrow_mut().write_all(data);
            true
        });
        callbacks.transfer_progress(move |stats| {
            if stats.total_objects() > 0 {
                let _ = write!(
                    self.out.borrow_mut(),
                    "\rReceiving objects: {:3}% ({}/{}), {} bytes",
                    stats.received_objects() * 100 / stats.total_objects(),
                    stats.received_objects(),
                    stats.total_objects(),
                    stats.received_bytes()
                );
                self.printed.set(true);
            }
            true
        });
        callbacks.update_tips(move |refname, old, new| {
            trace!("{}: {} -> {}", refname, old, new);
            self.updated.set(self.updated.get() + 1);
            true
        });

        let mut options = FetchOptions::new();
        options.remote_callbacks(callbacks).download_tags(tags);
        options
    }

    fn finish(&self) -> Status {
        if self.printed.get() {
            let _ = writeln!(self.out.borrow_mut());
        }
        if self.updated.get() == 0 {
            Status::UpToDate
        } else {
            Status::Updated
        }
    }
}

/// Clones `url` into `path` with its remote called `remote_name`. When `path`
/// already holds a repository it is opened instead.
pub fn clone_or_open(
    url: &str,
    path: &Path,
    remote_name: &str,
    reference: &ReferenceName,
    out: &mut dyn Write,
) -> Result<Repository, git2::Error> {
    let transfer = Transfer::new(out);
    let mut builder = RepoBuilder::new();
    builder
        .fetch_options(transfer.fetch_options(AutotagOption::Auto))
        .remote_create(move |repo, _name, url| repo.remote(remote_name, url));
    if reference.kind() == ReferenceKind::Branch {
        builder.branch(reference.short());
    }

    let result = builder.clone(url, path);
    transfer.finish();
    match result {
        Ok(repo) => Ok(repo),
        Err(e) if e.code() == ErrorCode::Exists => {
            debug!("{} already exists ({}), opening it", path.display(), e.message());
            Repository::open(path)
        }
        Err(e) => Err(e),
    }
}

/// Looks up `name`, creating it with `url` when missing.
pub fn ensure_remote<'r>(
    repo: &'r Repository,
    name: &str,
    url: &str,
) -> Result<Remote<'r>, git2::Error> {
    match repo.find_remote(name) {
        Ok(remote) => {
            if remote.url() != Some(url) {
                debug!("remote {} points at {:?}, not {}", name, remote.url(), url);
            }
            Ok(remote)
        }
        Err(e) => {
            debug!("remote {} not found ({}), creating it", name, e.message());
            repo.remote(name, url)
        }
    }
}

/// Fetches every branch and every tag from `remote`. Tags that moved upstream
/// are only overwritten with `force`; otherwise they are put back and the
/// fetch fails.
pub fn fetch(
    repo: &Repository,
    remote: &mut Remote,
    force: bool,
    out: &mut dyn Write,
) -> Result<Status, git2::Error> {
    let name = remote.name().unwrap_or_default().to_string();
    let heads = format!("+refs/heads/*:refs/remotes/{}/*", name);
    let tags = if force {
        "+refs/tags/*:refs/tags/*"
    } else {
        "refs/tags/*:refs/tags/*"
    };
    // libgit2 moves tags even without the `+`.
    let known = tag_targets(repo)?;

    let transfer = Transfer::new(out);
    remote.fetch(
        &[heads.as_str(), tags],
        Some(&mut transfer.fetch_options(AutotagOption::All)),
        None,
    )?;
    let status = transfer.finish();

    let mut moved = Vec::new();
    for (tag, old) in known {
        let new = match repo.find_reference(&tag) {
            Ok(reference) => reference.target(),
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(e),
        };
        if new == Some(old) {
            continue;
        }
        if force {
            debug!("{} moved from {} to {:?}", tag, old, new);
        } else {
            repo.reference(&tag, old, true, "fetch: keep tag, update needs force")?;
            moved.push(tag);
        }
    }

    if moved.is_empty() {
        Ok(status)
    } else {
        Err(git2::Error::from_str(&format!(
            "tag update is not a fast-forward, force needed: {}",
            moved.join(", ")
        )))
    }
}

fn tag_targets(repo: &Repository) -> Result<Vec<(String, Oid)>, git2::Error> {
    let mut tags = Vec::new();
    for reference in repo.references_glob("refs/tags/*")? {
        let reference = reference?;
        if let (Some(name), Some(target)) = (reference.name(), reference.target()) {
            tags.push((name.to_string(), target));
        }
    }
    Ok(tags)
}

fn checkout_options(force: bool) -> CheckoutBuilder<'static> {
    let mut options = CheckoutBuilder::new();
    if force {
        options.force();
    } else {
        options.safe();
    }
    options
}

/// Checks out `reference`. Branches become HEAD, tags are checked out detached.
/// Fails with `ErrorCode::NotFound` when the local branch does not exist.
pub fn checkout(
    repo: &Repository,
    reference: &ReferenceName,
    force: bool,
) -> Result<(), git2::Error> {
    let full = reference.full();
    let commit = repo.find_reference(&full)?.peel(ObjectType::Commit)?;
    repo.checkout_tree(&commit, Some(&mut checkout_options(force)))?;
    match reference.kind() {
        ReferenceKind::Branch => repo.set_head(&full),
        ReferenceKind::Tag => repo.set_head_detached(commit.id()),
    }
}

/// Creates the local branch for `reference`, starting at its remote-tracking
/// branch when the remote has one and at HEAD otherwise.
pub fn create_branch(
    repo: &Repository,
    reference: &ReferenceName,
    remote_name: &str,
) -> Result<(), git2::Error> {
    let (commit, upstream) = match repo.find_reference(&reference.remote_tracking(remote_name)) {
        Ok(tracking) => (
            tracking.peel_to_commit()?,
            Some(format!("{}/{}", remote_name, reference.short())),
        ),
        Err(e) if e.code() == ErrorCode::NotFound => (repo.head()?.peel_to_commit()?, None),
        Err(e) => return Err(e),
    };

    debug!("creating branch {} at {}", reference.short(), commit.id());
    let mut branch = repo.branch(reference.short(), &commit, false)?;
    if let Some(upstream) = upstream {
        branch.set_upstream(Some(&upstream))?;
    }
    Ok(())
}

/// Fetches `reference` from `remote` and fast-forwards the local branch and
/// working tree to it. Tags never move, so pulling one is always up to date.
pub fn pull(
    repo: &Repository,
    remote: &mut Remote,
    reference: &ReferenceName,
    force: bool,
    out: &mut dyn Write,
) -> Result<Status, git2::Error> {
    if reference.is_tag() {
        return Ok(Status::UpToDate);
    }

    let name = remote.name().unwrap_or_default().to_string();
    let tracking = reference.remote_tracking(&name);
    let refspec = format!("+{}:{}", reference.full(), tracking);
    let transfer = Transfer::new(out);
    remote.fetch(
        &[refspec.as_str()],
        Some(&mut transfer.fetch_options(AutotagOption::None)),
        None,
    )?;
    transfer.finish();

    let fetched = repo.reference_to_annotated_commit(&repo.find_reference(&tracking)?)?;
    let (analysis, _) = repo.merge_analysis(&[&fetched])?;
    if analysis.is_up_to_date() {
        return Ok(Status::UpToDate);
    }
    if !analysis.is_fast_forward() {
        return Ok(Status::Diverged);
    }

    let target = repo.find_object(fetched.id(), Some(ObjectType::Commit))?;
    repo.checkout_tree(&target, Some(&mut checkout_options(force)))?;
    repo.find_reference(&reference.full())?.set_target(
        fetched.id(),
        &format!("pull: fast-forward {} to {}", reference.short(), fetched.id()),
    )?;
    repo.set_head(&reference.full())?;
    Ok(Status::Updated)
}
