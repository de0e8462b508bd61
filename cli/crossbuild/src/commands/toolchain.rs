//! `crossbuild toolchain` — show, validate, and write the descriptor.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use crossbuild_toolchain::{
    descriptor_to_cmake, descriptor_to_toml, load_descriptor, validate_descriptor, Severity,
    ToolchainDescriptor,
};

/// Print the descriptor at `path` as CMake (default) or TOML.
pub fn show(path: &Path, format: Option<&str>) -> Result<()> {
    let descriptor = load_descriptor(path).with_context(|| {
        format!(
            "loading {} (run 'crossbuild toolchain write' to create it)",
            path.display()
        )
    })?;
    print!("{}", render(&descriptor, format)?);
    Ok(())
}

fn render(descriptor: &ToolchainDescriptor, format: Option<&str>) -> Result<String> {
    match format.unwrap_or("cmake") {
        "cmake" => Ok(descriptor_to_cmake(descriptor)),
        "toml" => Ok(descriptor_to_toml(descriptor)?),
        other => bail!("unknown format: '{other}'. Expected 'cmake' or 'toml'."),
    }
}

/// Load and validate the descriptor at `path`. Errors fail the command;
/// warnings are only printed.
pub fn validate(path: &Path) -> Result<()> {
    let descriptor =
        load_descriptor(path).with_context(|| format!("loading {}", path.display()))?;

    match validate_descriptor(&descriptor) {
        Ok(()) => {
            println!("{}: ok", path.display());
            Ok(())
        }
        Err(issues) => {
            let mut errors = 0;
            for issue in &issues {
                match issue.severity {
                    Severity::Error => {
                        errors += 1;
                        eprintln!("error: {}", issue.message);
                    }
                    Severity::Warning => eprintln!("warning: {}", issue.message),
                }
            }
            if errors > 0 {
                bail!("{}: {errors} error(s) found", path.display());
            }
            println!("{}: ok ({} warning(s))", path.display(), issues.len());
            Ok(())
        }
    }
}

/// Write the built-in `x86_64-unknown-linux-gnu` descriptor to `path`.
///
/// The format follows the extension (`.toml` or CMake). An existing file is
/// only replaced with `force`.
pub fn write(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    let descriptor = ToolchainDescriptor::linux_x86_64();
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => "toml",
        _ => "cmake",
    };
    let content = render(&descriptor, Some(format))?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {format} descriptor to {}", path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::workspace_root;

    #[test]
    fn show_shipped_descriptor() {
        let path = workspace_root().join("linux.cmake");
        assert!(show(&path, None).is_ok());
        assert!(show(&path, Some("toml")).is_ok());
        assert!(show(&path, Some("yaml")).is_err());
    }

    #[test]
    fn show_missing_descriptor_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(show(&dir.path().join("linux.cmake"), None).is_err());
    }

    #[test]
    fn validate_shipped_descriptor() {
        assert!(validate(&workspace_root().join("linux.cmake")).is_ok());
    }

    #[test]
    fn validate_fails_on_mismatched_compilers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linux.cmake");
        let mut d = ToolchainDescriptor::linux_x86_64();
        d.cxx_compiler = "aarch64-unknown-linux-gnu-g++".into();
        fs::write(&path, descriptor_to_cmake(&d)).unwrap();
        assert!(validate(&path).is_err());
    }

    #[test]
    fn validate_passes_with_warnings_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linux.cmake");
        let mut d = ToolchainDescriptor::linux_x86_64();
        d.system_processor = "k8".into();
        fs::write(&path, descriptor_to_cmake(&d)).unwrap();
        assert!(validate(&path).is_ok());
    }

    #[test]
    fn write_creates_matching_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linux.cmake");
        write(&path, false).unwrap();
        let shipped = fs::read_to_string(workspace_root().join("linux.cmake")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), shipped);
    }

    #[test]
    fn write_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linux.cmake");
        fs::write(&path, "# hand edited\n").unwrap();
        assert!(write(&path, false).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hand edited\n");

        write(&path, true).unwrap();
        assert_eq!(
            load_descriptor(&path).unwrap(),
            ToolchainDescriptor::linux_x86_64()
        );
    }

    #[test]
    fn write_toml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linux.toml");
        write(&path, false).unwrap();
        assert_eq!(
            load_descriptor(&path).unwrap(),
            ToolchainDescriptor::linux_x86_64()
        );
    }
}
