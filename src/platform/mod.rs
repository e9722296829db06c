//! Platform and channel selection
//!
//! A [`PlatformTarget`] is built once per invocation, either from the
//! `--platform` flag or from the host the binary was compiled for.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::NvgtError;

/// Operating systems NVGT publishes builds for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Linux,
    Darwin,
}

impl Os {
    pub const ALL: [Os; 3] = [Os::Windows, Os::Linux, Os::Darwin];

    /// Detect the OS of the running host
    pub fn detect() -> Result<Self, NvgtError> {
        Self::from_host_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a supported OS.
    /// Rust reports macOS as "macos"; NVGT calls it darwin.
    pub fn from_host_name(name: &str) -> Result<Self, NvgtError> {
        match name {
            "macos" => Ok(Os::Darwin),
            other => other.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }

    /// Extension of the stable release artifact for this OS
    pub fn stable_extension(&self) -> &'static str {
        match self {
            Os::Windows => "exe",
            Os::Linux => "tar.gz",
            Os::Darwin => "dmg",
        }
    }

    /// Asset name suffixes accepted on the dev channel, most preferred first
    pub fn dev_asset_suffixes(&self) -> &'static [&'static str] {
        match self {
            Os::Windows => &[".exe", ".zip"],
            Os::Linux => &[".tar.gz", ".tgz"],
            Os::Darwin => &[".dmg", ".zip"],
        }
    }

    /// Lowercase fragments that mark a generic asset (e.g. a `.zip`) as built for this OS
    pub fn name_hints(&self) -> &'static [&'static str] {
        match self {
            Os::Windows => &["win"],
            Os::Linux => &["linux"],
            Os::Darwin => &["mac", "darwin", "osx"],
        }
    }

    /// Where the toolkit lands when no `--path` is given
    pub fn default_install_path(&self) -> PathBuf {
        match self {
            Os::Windows => PathBuf::from(r"C:\nvgt"),
            Os::Linux => PathBuf::from("/opt/nvgt"),
            Os::Darwin => PathBuf::from("/Applications/NVGT.app"),
        }
    }

    /// Location of the toolkit executable inside an installation
    pub fn executable_path(&self, install_path: &Path) -> PathBuf {
        match self {
            Os::Windows => install_path.join("nvgt.exe"),
            Os::Linux => install_path.join("nvgt"),
            Os::Darwin => install_path.join("Contents").join("MacOS").join("NVGT"),
        }
    }
}

impl FromStr for Os {
    type Err = NvgtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Os::ALL
            .into_iter()
            .find(|os| os.as_str() == name)
            .ok_or_else(|| NvgtError::UnsupportedPlatform(s.trim().to_string()))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release stream to install from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Stable,
    Dev,
}

impl Channel {
    pub fn from_dev_flag(dev: bool) -> Self {
        if dev { Channel::Dev } else { Channel::Stable }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stable => f.write_str("stable"),
            Channel::Dev => f.write_str("dev"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformTarget {
    pub os: Os,
    pub channel: Channel,
}

impl PlatformTarget {
    pub fn new(os: Os, channel: Channel) -> Self {
        Self { os, channel }
    }
}

/// Pick the OS from an explicit `--platform` value, falling back to the host.
#[tracing::instrument]
pub fn resolve_os(explicit: Option<&str>) -> Result<Os, NvgtError> {
    match explicit {
        Some(name) => name.parse(),
        None => Os::detect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_names_case_insensitive() {
        for (input, expected) in [
            ("windows", Os::Windows),
            ("Windows", Os::Windows),
            ("LINUX", Os::Linux),
            ("linux", Os::Linux),
            ("Darwin", Os::Darwin),
            (" darwin ", Os::Darwin),
        ] {
            assert_eq!(input.parse::<Os>().unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_unsupported_names() {
        for input in ["solaris", "android", "mac", "", "win"] {
            let err = input.parse::<Os>().unwrap_err();
            assert!(
                matches!(err, NvgtError::UnsupportedPlatform(_)),
                "input {:?} gave {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_from_host_name() {
        assert_eq!(Os::from_host_name("macos").unwrap(), Os::Darwin);
        assert_eq!(Os::from_host_name("linux").unwrap(), Os::Linux);
        assert_eq!(Os::from_host_name("windows").unwrap(), Os::Windows);
        assert!(Os::from_host_name("freebsd").is_err());
    }

    #[test]
    fn test_detect_matches_host() {
        #[cfg(target_os = "linux")]
        assert_eq!(Os::detect().unwrap(), Os::Linux);

        #[cfg(target_os = "macos")]
        assert_eq!(Os::detect().unwrap(), Os::Darwin);

        #[cfg(target_os = "windows")]
        assert_eq!(Os::detect().unwrap(), Os::Windows);
    }

    #[test]
    fn test_resolve_os_prefers_explicit() {
        assert_eq!(resolve_os(Some("darwin")).unwrap(), Os::Darwin);
        assert!(resolve_os(Some("solaris")).is_err());
    }

    #[test]
    fn test_default_install_paths() {
        assert_eq!(Os::Windows.default_install_path(), PathBuf::from(r"C:\nvgt"));
        assert_eq!(Os::Linux.default_install_path(), PathBuf::from("/opt/nvgt"));
        assert_eq!(
            Os::Darwin.default_install_path(),
            PathBuf::from("/Applications/NVGT.app")
        );
    }

    #[test]
    fn test_executable_path() {
        let root = Path::new("/opt/nvgt");
        assert_eq!(Os::Linux.executable_path(root), root.join("nvgt"));
        assert_eq!(Os::Windows.executable_path(root), root.join("nvgt.exe"));
        assert_eq!(
            Os::Darwin.executable_path(root),
            root.join("Contents/MacOS/NVGT")
        );
    }

    #[test]
    fn test_channel_from_dev_flag() {
        assert_eq!(Channel::from_dev_flag(false), Channel::Stable);
        assert_eq!(Channel::from_dev_flag(true), Channel::Dev);
        assert_eq!(Channel::Dev.to_string(), "dev");
    }
}
