use std::fmt;

pub const REPO_URL: &str = "https://margo.sh/GoSublime";
pub const REMOTE_NAME: &str = "gosublime-get";
pub const INSTALL_DIR_NAME: &str = "GoSublime";

/// Where GoSublime comes from and where it lands inside the packages dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub repo_url: String,
    pub remote_name: String,
    pub install_dir_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            repo_url: REPO_URL.to_string(),
            remote_name: REMOTE_NAME.to_string(),
            install_dir_name: INSTALL_DIR_NAME.to_string(),
        }
    }
}

/// Version selector as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    /// Latest stable release branch.
    Latest,
    /// Unreleased development branch.
    Beta,
    /// A tag (e.g. `v19.12.30`) or branch name.
    Named(String),
}

impl Version {
    pub fn parse(s: &str) -> Self {
        match s {
            "latest" => Version::Latest,
            "beta" => Version::Beta,
            other => Version::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Version::Latest => "development",
            Version::Beta => "next",
            Version::Named(name) => name,
        }
    }

    pub fn reference(&self) -> ReferenceName {
        reference_name(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Branch,
    Tag,
}

/// A fully qualified git reference, `refs/heads/<name>` or `refs/tags/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceName {
    kind: ReferenceKind,
    short: String,
}

impl ReferenceName {
    pub fn branch(name: &str) -> Self {
        ReferenceName {
            kind: ReferenceKind::Branch,
            short: name.to_string(),
        }
    }

    pub fn tag(name: &str) -> Self {
        ReferenceName {
            kind: ReferenceKind::Tag,
            short: name.to_string(),
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn is_tag(&self) -> bool {
        self.kind == ReferenceKind::Tag
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn full(&self) -> String {
        match self.kind {
            ReferenceKind::Branch => format!("refs/heads/{}", self.short),
            ReferenceKind::Tag => format!("refs/tags/{}", self.short),
        }
    }

    /// The ref a fetch from `remote` stores this reference under.
    pub fn remote_tracking(&self, remote: &str) -> String {
        match self.kind {
            ReferenceKind::Branch => format!("refs/remotes/{}/{}", remote, self.short),
            ReferenceKind::Tag => self.full(),
        }
    }
}

impl fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full())
    }
}

/// Version strings with a dot are release tags, anything else is a branch.
pub fn reference_name(name: &str) -> ReferenceName {
    if name.contains('.') {
        ReferenceName::tag(name)
    } else {
        ReferenceName::branch(name)
    }
}
