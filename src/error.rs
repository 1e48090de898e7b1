use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Usage: {0} <install|uninstall>")]
    Usage(String),

    #[error(transparent)]
    Flags(#[from] clap::Error),

    #[error("Packages dir `{}` is not absolute", .0.display())]
    PackagesDirNotAbsolute(PathBuf),

    #[error("Cannot stat packages dir `{}`: {source}", path.display())]
    PackagesDirMissing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot clone/open {url}: {source}")]
    Clone { url: String, source: git2::Error },

    #[error("Cannot create remote {name} ({url}): {source}")]
    Remote {
        name: String,
        url: String,
        source: git2::Error,
    },

    #[error("git fetch failed: {0}")]
    Fetch(git2::Error),

    #[error("git checkout({reference}) failed: {source}")]
    Checkout {
        reference: String,
        source: git2::Error,
    },

    #[error("git pull({reference}) failed: {source}")]
    Pull {
        reference: String,
        source: git2::Error,
    },

    #[error("git pull({reference}) failed: local branch has diverged, non-fast-forward update")]
    NonFastForward { reference: String },

    #[error("GoSublime not installed: {} does not exist", .0.display())]
    NotInstalled(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot access {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
