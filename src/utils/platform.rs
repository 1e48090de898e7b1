use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// Operating systems with a known Sublime Text 3 packages location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// Packages dir template, with environment variables left unexpanded.
    pub fn template(self) -> &'static str {
        match self {
            Platform::Linux => "$HOME/.config/sublime-text-3/Packages",
            Platform::MacOs => "$HOME/Library/Application Support/Sublime Text 3/Packages",
            Platform::Windows => "$APPDATA\\Sublime Text 3\\Packages",
            Platform::Other => "",
        }
    }
}

/// Replaces `$VAR` and `${VAR}` with the value returned by `lookup`.
/// Unset variables expand to the empty string.
pub fn expand_env<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    out.push('$');
                    rest = after;
                }
            }
            continue;
        }

        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len]).unwrap_or_default());
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    out
}

/// Resolves the default packages directory of `platform`, reading variables
/// through `lookup`. The result must be absolute and exist.
pub fn packages_dir<F>(platform: Platform, lookup: F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let dir = PathBuf::from(expand_env(platform.template(), lookup));
    debug!("{:?} packages dir expands to {}", platform, dir.display());

    if !dir.is_absolute() {
        return Err(Error::PackagesDirNotAbsolute(dir));
    }
    if let Err(source) = dir.symlink_metadata() {
        return Err(Error::PackagesDirMissing { path: dir, source });
    }
    Ok(dir)
}

/// Packages directory of the running system, from the process environment.
pub fn default_packages_dir() -> Result<PathBuf> {
    packages_dir(Platform::current(), |name| std::env::var(name).ok())
}

/// `<packages>/<name>`
pub fn install_dir(packages: &Path, name: &str) -> PathBuf {
    packages.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/gopher".to_string()),
            "APPDATA" => Some("C:\\Users\\gopher\\AppData\\Roaming".to_string()),
            _ => None,
        }
    }

    #[test]
    fn templates_expand_per_platform() {
        assert_eq!(
            expand_env(Platform::Linux.template(), env),
            "/home/gopher/.config/sublime-text-3/Packages"
        );
        assert_eq!(
            expand_env(Platform::MacOs.template(), env),
            "/home/gopher/Library/Application Support/Sublime Text 3/Packages"
        );
        assert_eq!(
            expand_env(Platform::Windows.template(), env),
            "C:\\Users\\gopher\\AppData\\Roaming\\Sublime Text 3\\Packages"
        );
        assert_eq!(expand_env(Platform::Other.template(), env), "");
    }

    #[cfg(unix)]
    #[test]
    fn unix_templates_are_absolute() {
        for platform in [Platform::Linux, Platform::MacOs] {
            assert!(Path::new(&expand_env(platform.template(), env)).is_absolute());
        }
    }

    #[cfg(windows)]
    #[test]
    fn windows_template_is_absolute() {
        assert!(Path::new(&expand_env(Platform::Windows.template(), env)).is_absolute());
    }

    #[test]
    fn expand_env_forms() {
        assert_eq!(expand_env("${HOME}/x", env), "/home/gopher/x");
        assert_eq!(expand_env("$HOME_/x", env), "/x");
        assert_eq!(expand_env("$UNSET", env), "");
        assert_eq!(expand_env("a$", env), "a$");
        assert_eq!(expand_env("$-x", env), "$-x");
        assert_eq!(expand_env("${HOME", env), "${HOME");
        assert_eq!(expand_env("no vars", env), "no vars");
    }

    #[test]
    fn unknown_platform_is_rejected() {
        match packages_dir(Platform::Other, env) {
            Err(Error::PackagesDirNotAbsolute(dir)) => assert_eq!(dir, PathBuf::new()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn missing_packages_dir_is_rejected() {
        let home = tempfile::tempdir().unwrap();
        let home_str = home.path().display().to_string();
        let lookup = |name: &str| (name == "HOME").then(|| home_str.clone());

        match packages_dir(Platform::Linux, lookup) {
            Err(Error::PackagesDirMissing { path, .. }) => {
                assert_eq!(path, home.path().join(".config/sublime-text-3/Packages"))
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let packages = home.path().join(".config/sublime-text-3/Packages");
        std::fs::create_dir_all(&packages).unwrap();
        assert_eq!(packages_dir(Platform::Linux, lookup).unwrap(), packages);
    }

    #[test]
    fn install_dir_joins_name() {
        assert_eq!(
            install_dir(Path::new("/tmp/pkgs"), "GoSublime"),
            PathBuf::from("/tmp/pkgs/GoSublime")
        );
    }
}
