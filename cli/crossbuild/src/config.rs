//! `crossbuild.toml` parsing and workspace layout.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration file looked up at the workspace root.
pub const CONFIG_FILE: &str = "crossbuild.toml";

/// Descriptor file name used when the configuration does not name one.
pub const DEFAULT_DESCRIPTOR: &str = "linux.cmake";

/// The top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossbuildConfig {
    /// External build command settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Toolchain descriptor settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// External build command; defaults to `$CARGO`, then `cargo`.
    #[serde(default)]
    pub program: Option<String>,
    /// Extra arguments appended to every build.
    #[serde(default)]
    pub args: Vec<String>,
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Descriptor path, relative to the workspace root.
    #[serde(default)]
    pub descriptor: Option<PathBuf>,
}

impl CrossbuildConfig {
    /// Load `crossbuild.toml` from `root`, or the defaults if it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            log::debug!("no {} in {}, using defaults", CONFIG_FILE, root.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a configuration from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing crossbuild.toml")
    }

    /// Absolute path of the toolchain descriptor.
    pub fn descriptor_path(&self, root: &Path) -> PathBuf {
        let relative = self
            .toolchain
            .descriptor
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DESCRIPTOR));
        root.join(relative)
    }

    /// The external build command, given the value of `$CARGO`.
    pub fn program(&self, cargo_env: Option<OsString>) -> OsString {
        match &self.build.program {
            Some(program) => program.into(),
            None => cargo_env.unwrap_or_else(|| "cargo".into()),
        }
    }
}

/// The workspace root: two levels above this crate's manifest.
///
/// Fixed at compile time so it does not depend on the caller's current
/// directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CrossbuildConfig::load(dir.path()).unwrap();
        assert!(config.build.program.is_none());
        assert!(config.build.args.is_empty());
        assert_eq!(
            config.descriptor_path(dir.path()),
            dir.path().join("linux.cmake")
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[build]
program = "cross"
args = ["--locked"]

[toolchain]
descriptor = "toolchains/amd64.cmake"
"#,
        )
        .unwrap();
        let config = CrossbuildConfig::load(dir.path()).unwrap();
        assert_eq!(config.build.program.as_deref(), Some("cross"));
        assert_eq!(config.build.args, vec!["--locked"]);
        assert_eq!(
            config.descriptor_path(dir.path()),
            dir.path().join("toolchains/amd64.cmake")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CrossbuildConfig::from_str("[build]\njobs = 4\n").is_err());
        assert!(CrossbuildConfig::from_str("[deploy]\n").is_err());
    }

    #[test]
    fn program_precedence() {
        let config = CrossbuildConfig::default();
        assert_eq!(config.program(None), OsString::from("cargo"));
        assert_eq!(
            config.program(Some("/usr/bin/cargo".into())),
            OsString::from("/usr/bin/cargo")
        );

        let config = CrossbuildConfig::from_str("[build]\nprogram = \"cross\"\n").unwrap();
        assert_eq!(
            config.program(Some("/usr/bin/cargo".into())),
            OsString::from("cross")
        );
    }

    #[test]
    fn absolute_descriptor_is_kept() {
        let config =
            CrossbuildConfig::from_str("[toolchain]\ndescriptor = \"/etc/linux.cmake\"\n").unwrap();
        assert_eq!(
            config.descriptor_path(Path::new("/work")),
            PathBuf::from("/etc/linux.cmake")
        );
    }

    #[test]
    fn workspace_root_holds_the_descriptor() {
        let root = workspace_root();
        assert!(root.is_absolute());
        assert!(root.join("Cargo.toml").is_file());
        assert!(root.join(DEFAULT_DESCRIPTOR).is_file());
    }
}
