//! Toolchain descriptor model.
//!
//! Mirrors the variables of a CMake toolchain file used when cross-compiling
//! native dependencies: target system identity, compiler executables, and
//! the root-path search policy.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ToolchainError;
use crate::triple::TargetTriple;

pub const SYSTEM_NAME: &str = "CMAKE_SYSTEM_NAME";
pub const SYSTEM_PROCESSOR: &str = "CMAKE_SYSTEM_PROCESSOR";
pub const C_COMPILER: &str = "CMAKE_C_COMPILER";
pub const CXX_COMPILER: &str = "CMAKE_CXX_COMPILER";
pub const FIND_ROOT_PATH_MODE_PROGRAM: &str = "CMAKE_FIND_ROOT_PATH_MODE_PROGRAM";
pub const FIND_ROOT_PATH_MODE_LIBRARY: &str = "CMAKE_FIND_ROOT_PATH_MODE_LIBRARY";
pub const FIND_ROOT_PATH_MODE_INCLUDE: &str = "CMAKE_FIND_ROOT_PATH_MODE_INCLUDE";

/// Every variable a descriptor sets, in canonical order.
pub const KEYS: [&str; 7] = [
    SYSTEM_NAME,
    SYSTEM_PROCESSOR,
    C_COMPILER,
    CXX_COMPILER,
    FIND_ROOT_PATH_MODE_PROGRAM,
    FIND_ROOT_PATH_MODE_LIBRARY,
    FIND_ROOT_PATH_MODE_INCLUDE,
];

/// Where the external build system looks when resolving a kind of artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindRootPathMode {
    /// Search the host only.
    Never,
    /// Search the target root only.
    Only,
    /// Search the target root first, then the host.
    Both,
}

impl FindRootPathMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "NEVER",
            Self::Only => "ONLY",
            Self::Both => "BOTH",
        }
    }
}

impl fmt::Display for FindRootPathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FindRootPathMode {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEVER" => Ok(Self::Never),
            "ONLY" => Ok(Self::Only),
            "BOTH" => Ok(Self::Both),
            _ => Err(ToolchainError::InvalidMode(s.into())),
        }
    }
}

/// Root-path search policy for the three artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FindRootPathPolicy {
    pub program: FindRootPathMode,
    pub library: FindRootPathMode,
    pub include: FindRootPathMode,
}

impl FindRootPathPolicy {
    /// Programs from the host, libraries and headers from the target root.
    pub fn cross() -> Self {
        Self {
            program: FindRootPathMode::Never,
            library: FindRootPathMode::Only,
            include: FindRootPathMode::Only,
        }
    }
}

/// A complete cross-compilation toolchain descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ToolchainDescriptor {
    /// Target operating system (e.g., "Linux").
    pub system_name: String,
    /// Target processor (e.g., "amd64").
    pub system_processor: String,
    /// Target C compiler, resolved through the caller's `PATH`.
    pub c_compiler: String,
    /// Target C++ compiler, resolved through the caller's `PATH`.
    pub cxx_compiler: String,
    /// Root-path search policy.
    pub find_root_path: FindRootPathPolicy,
}

impl ToolchainDescriptor {
    /// Descriptor for `x86_64-unknown-linux-gnu` with a GNU cross toolchain.
    pub fn linux_x86_64() -> Self {
        let triple = TargetTriple::x86_64_linux_gnu();
        Self {
            system_name: "Linux".into(),
            system_processor: "amd64".into(),
            c_compiler: triple.c_compiler(),
            cxx_compiler: triple.cxx_compiler(),
            find_root_path: FindRootPathPolicy::cross(),
        }
    }

    /// Target triple implied by the C compiler name, if it follows the
    /// `<triple>-<tool>` convention.
    pub fn c_compiler_triple(&self) -> Option<TargetTriple> {
        compiler_triple(&self.c_compiler)
    }

    /// Target triple implied by the C++ compiler name.
    pub fn cxx_compiler_triple(&self) -> Option<TargetTriple> {
        compiler_triple(&self.cxx_compiler)
    }

    /// The descriptor as ordered `(variable, value)` pairs.
    pub fn entries(&self) -> [(&'static str, String); 7] {
        [
            (SYSTEM_NAME, self.system_name.clone()),
            (SYSTEM_PROCESSOR, self.system_processor.clone()),
            (C_COMPILER, self.c_compiler.clone()),
            (CXX_COMPILER, self.cxx_compiler.clone()),
            (FIND_ROOT_PATH_MODE_PROGRAM, self.find_root_path.program.to_string()),
            (FIND_ROOT_PATH_MODE_LIBRARY, self.find_root_path.library.to_string()),
            (FIND_ROOT_PATH_MODE_INCLUDE, self.find_root_path.include.to_string()),
        ]
    }

    /// Assemble a descriptor from `(variable, value)` pairs.
    ///
    /// Every variable in [`KEYS`] must be present.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, ToolchainError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut values: [Option<String>; 7] = Default::default();
        for (key, value) in entries {
            if let Some(idx) = KEYS.iter().position(|k| *k == key.as_ref()) {
                values[idx] = Some(value.as_ref().to_string());
            }
        }

        let get = |idx: usize| {
            values[idx]
                .clone()
                .ok_or(ToolchainError::MissingKey(KEYS[idx]))
        };
        let mode = |idx: usize| -> Result<FindRootPathMode, ToolchainError> {
            let raw = get(idx)?;
            raw.parse()
                .map_err(|_| ToolchainError::InvalidValue { key: KEYS[idx], value: raw })
        };

        Ok(Self {
            system_name: get(0)?,
            system_processor: get(1)?,
            c_compiler: get(2)?,
            cxx_compiler: get(3)?,
            find_root_path: FindRootPathPolicy {
                program: mode(4)?,
                library: mode(5)?,
                include: mode(6)?,
            },
        })
    }
}

fn compiler_triple(compiler: &str) -> Option<TargetTriple> {
    let file_name = Path::new(compiler).file_name()?.to_str()?;
    let (prefix, _tool) = file_name.rsplit_once('-')?;
    prefix.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_descriptor_values() {
        let d = ToolchainDescriptor::linux_x86_64();
        assert_eq!(d.system_name, "Linux");
        assert_eq!(d.system_processor, "amd64");
        assert_eq!(d.c_compiler, "x86_64-unknown-linux-gnu-gcc");
        assert_eq!(d.cxx_compiler, "x86_64-unknown-linux-gnu-g++");
        assert_eq!(d.find_root_path.program, FindRootPathMode::Never);
        assert_eq!(d.find_root_path.library, FindRootPathMode::Only);
        assert_eq!(d.find_root_path.include, FindRootPathMode::Only);
    }

    #[test]
    fn compilers_imply_the_same_triple() {
        let d = ToolchainDescriptor::linux_x86_64();
        let expected = Some(TargetTriple::x86_64_linux_gnu());
        assert_eq!(d.c_compiler_triple(), expected);
        assert_eq!(d.cxx_compiler_triple(), expected);
    }

    #[test]
    fn bare_compiler_has_no_triple() {
        let mut d = ToolchainDescriptor::linux_x86_64();
        d.c_compiler = "gcc".into();
        assert!(d.c_compiler_triple().is_none());
    }

    #[test]
    fn compiler_path_directories_are_ignored() {
        let mut d = ToolchainDescriptor::linux_x86_64();
        d.c_compiler = "/opt/cross-tools/x86_64-unknown-linux-gnu-gcc".into();
        d.cxx_compiler = "/opt/cross-tools/bin/x86_64-unknown-linux-gnu-g++".into();
        let expected = Some(TargetTriple::x86_64_linux_gnu());
        assert_eq!(d.c_compiler_triple(), expected);
        assert_eq!(d.cxx_compiler_triple(), expected);
    }

    #[test]
    fn entries_follow_canonical_order() {
        let d = ToolchainDescriptor::linux_x86_64();
        let keys: Vec<&str> = d.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, KEYS);
    }

    #[test]
    fn from_entries_requires_every_key() {
        let d = ToolchainDescriptor::linux_x86_64();
        let entries = d.entries();
        let err = ToolchainDescriptor::from_entries(entries[..6].to_vec()).unwrap_err();
        assert!(matches!(
            err,
            ToolchainError::MissingKey(FIND_ROOT_PATH_MODE_INCLUDE)
        ));
    }

    #[test]
    fn from_entries_rejects_unknown_mode() {
        let d = ToolchainDescriptor::linux_x86_64();
        let mut entries = d.entries().to_vec();
        entries[5].1 = "SOMETIMES".into();
        let err = ToolchainDescriptor::from_entries(entries).unwrap_err();
        assert!(matches!(err, ToolchainError::InvalidValue { .. }));
    }

    #[test]
    fn mode_round_trips_through_str() {
        for mode in [
            FindRootPathMode::Never,
            FindRootPathMode::Only,
            FindRootPathMode::Both,
        ] {
            assert_eq!(mode.as_str().parse::<FindRootPathMode>().unwrap(), mode);
        }
        assert!(matches!(
            "never".parse::<FindRootPathMode>(),
            Err(ToolchainError::InvalidMode(_))
        ));
    }
}
