//! Fixtures for tests that need a GoSublime-like upstream repository.

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

use crate::model::Settings;

/// A bare upstream with `master`/`development` at `development-1`, tag
/// `v1.0.0` on the same commit, and `next` two commits ahead (`next-2`).
/// Every commit holds a single `VERSION` file with the commit's label.
pub struct Origin {
    pub repo: Repository,
    dir: TempDir,
}

impl Origin {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init_bare(dir.path()).unwrap();

        let dev = commit(&repo, "refs/heads/development", "development-1");
        repo.reference("refs/heads/master", dev, false, "init").unwrap();
        repo.reference("refs/heads/next", dev, false, "init").unwrap();
        repo.tag_lightweight("v1.0.0", &repo.find_object(dev, None).unwrap(), false)
            .unwrap();
        commit(&repo, "refs/heads/next", "next-1");
        commit(&repo, "refs/heads/next", "next-2");

        Origin { repo, dir }
    }

    /// Settings pointing at this upstream instead of the real one.
    pub fn settings(&self) -> Settings {
        Settings {
            repo_url: self.dir.path().display().to_string(),
            ..Settings::default()
        }
    }
}

/// Commits a tree whose only file is `VERSION` = `label` on top of `refname`.
pub fn commit(repo: &Repository, refname: &str, label: &str) -> Oid {
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let blob = repo.blob(label.as_bytes()).unwrap();
    let mut tree = repo.treebuilder(None).unwrap();
    tree.insert("VERSION", blob, 0o100644).unwrap();
    let tree = repo.find_tree(tree.write().unwrap()).unwrap();

    let parent = repo
        .find_reference(refname)
        .ok()
        .and_then(|r| r.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some(refname), &sig, &sig, label, &tree, &parents)
        .unwrap()
}
