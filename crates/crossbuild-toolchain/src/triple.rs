//! Target triples.

use std::fmt;
use std::str::FromStr;

use crate::error::ToolchainError;

/// A target triple such as `x86_64-unknown-linux-gnu`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTriple {
    /// CPU architecture (e.g., "x86_64", "aarch64").
    pub arch: String,
    /// Vendor (e.g., "unknown", "apple").
    pub vendor: String,
    /// Operating system (e.g., "linux", "none").
    pub os: String,
    /// ABI / environment, absent for three-part triples.
    pub env: Option<String>,
}

impl TargetTriple {
    /// The triple the `linux` build targets.
    pub fn x86_64_linux_gnu() -> Self {
        Self {
            arch: "x86_64".into(),
            vendor: "unknown".into(),
            os: "linux".into(),
            env: Some("gnu".into()),
        }
    }

    /// Name of the environment variable the `cc` crate consults for this
    /// target's C compiler, e.g. `CC_x86_64_unknown_linux_gnu`.
    pub fn cc_env_var(&self) -> String {
        format!("CC_{}", self.to_string().replace('-', "_"))
    }

    /// Prefix shared by the cross compiler executables, e.g.
    /// `x86_64-unknown-linux-gnu-`.
    pub fn compiler_prefix(&self) -> String {
        format!("{self}-")
    }

    /// Name of the target C compiler executable.
    pub fn c_compiler(&self) -> String {
        format!("{}gcc", self.compiler_prefix())
    }

    /// Name of the target C++ compiler executable.
    pub fn cxx_compiler(&self) -> String {
        format!("{}g++", self.compiler_prefix())
    }

    /// Processor spellings an external build system accepts for this
    /// architecture.
    pub fn processor_aliases(&self) -> &'static [&'static str] {
        match self.arch.as_str() {
            "x86_64" => &["x86_64", "amd64", "AMD64"],
            "aarch64" => &["aarch64", "arm64", "ARM64"],
            "i686" | "i586" => &["i686", "i586", "x86"],
            "riscv64gc" | "riscv64" => &["riscv64"],
            _ => &[],
        }
    }

    /// System name an external build system expects for this OS.
    pub fn system_name(&self) -> Option<&'static str> {
        match self.os.as_str() {
            "linux" => Some("Linux"),
            "windows" => Some("Windows"),
            "darwin" => Some("Darwin"),
            "freebsd" => Some("FreeBSD"),
            "none" => Some("Generic"),
            _ => None,
        }
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.vendor, self.os)?;
        if let Some(env) = &self.env {
            write!(f, "-{env}")?;
        }
        Ok(())
    }
}

impl FromStr for TargetTriple {
    type Err = ToolchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ToolchainError::Triple(s.into()));
        }
        match parts.as_slice() {
            [arch, vendor, os] => Ok(Self {
                arch: (*arch).into(),
                vendor: (*vendor).into(),
                os: (*os).into(),
                env: None,
            }),
            [arch, vendor, os, env] => Ok(Self {
                arch: (*arch).into(),
                vendor: (*vendor).into(),
                os: (*os).into(),
                env: Some((*env).into()),
            }),
            _ => Err(ToolchainError::Triple(s.into())),
        }
    }
}
