//! Resolved external build invocations.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use shell_escape::escape;

/// A fully resolved external command: program, arguments, environment
/// overrides, and working directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    program: OsString,
    args: Vec<OsString>,
    /// Variables set on the child in addition to the inherited environment.
    env: BTreeMap<String, OsString>,
    cwd: Option<PathBuf>,
}

impl fmt::Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, val) in &self.env {
            write!(f, "{}={} ", key, escape(val.to_string_lossy()))?;
        }
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", escape(arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

impl BuildPlan {
    pub fn new<T: AsRef<OsStr>>(program: T) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// (chainable) Adds `arg` to the args list.
    pub fn arg<T: AsRef<OsStr>>(&mut self, arg: T) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// (chainable) Adds multiple `args` to the args list.
    pub fn args<T: AsRef<OsStr>>(&mut self, args: &[T]) -> &mut Self {
        self.args
            .extend(args.iter().map(|t| t.as_ref().to_os_string()));
        self
    }

    /// (chainable) Sets an environment variable for the child.
    pub fn env<T: AsRef<OsStr>>(&mut self, key: &str, val: T) -> &mut Self {
        self.env.insert(key.to_string(), val.as_ref().to_os_string());
        self
    }

    /// (chainable) Sets the working directory of the child.
    pub fn cwd<T: AsRef<Path>>(&mut self, path: T) -> &mut Self {
        self.cwd = Some(path.as_ref().to_path_buf());
        self
    }

    /// Converts the plan into a `std::process::Command` with inherited stdio.
    pub fn build_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command.args(&self.args);
        command.envs(&self.env);
        command
    }

    /// Runs the plan to completion and returns the child's exit status.
    ///
    /// A non-zero exit is not an error here; only failing to start the
    /// child is.
    pub fn exec(&self) -> Result<ExitStatus> {
        log::debug!("running {self}");
        let status = self
            .build_command()
            .status()
            .with_context(|| format!("could not execute process `{self}`"))?;
        log::debug!("`{}` exited with {status}", self.program.to_string_lossy());
        Ok(status)
    }
}

#[cfg(test)]
impl BuildPlan {
    pub fn get_program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Gets an environment variable explicitly set on the plan (inherited
    /// variables are not reported).
    pub fn get_env(&self, var: &str) -> Option<&OsStr> {
        self.env.get(var).map(OsString::as_os_str)
    }

    pub fn get_envs(&self) -> &BTreeMap<String, OsString> {
        &self.env
    }

    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

/// Exit code to report for a finished child. Children terminated by a
/// signal have no code and map to 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_env_then_command() {
        let mut plan = BuildPlan::new("cargo");
        plan.arg("build")
            .arg("--release")
            .env("CMAKE_TOOLCHAIN_FILE", "/work dir/linux.cmake");
        assert_eq!(
            plan.to_string(),
            "CMAKE_TOOLCHAIN_FILE='/work dir/linux.cmake' cargo build --release"
        );
    }

    #[test]
    fn accessors_report_what_was_set() {
        let mut plan = BuildPlan::new("cargo");
        plan.args(&["build", "--release"]).cwd("/work");
        assert_eq!(plan.get_program(), OsStr::new("cargo"));
        assert_eq!(plan.get_args(), &[OsString::from("build"), OsString::from("--release")]);
        assert_eq!(plan.get_cwd(), Some(Path::new("/work")));
        assert!(plan.get_envs().is_empty());
        assert!(plan.get_env("PATH").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn exec_reports_child_exit_code() {
        let mut plan = BuildPlan::new("sh");
        plan.args(&["-c", "exit 3"]);
        let status = plan.exec().unwrap();
        assert_eq!(exit_code(status), 3);

        let status = BuildPlan::new("true").exec().unwrap();
        assert_eq!(exit_code(status), 0);
    }

    #[cfg(unix)]
    #[test]
    fn exec_passes_environment_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = BuildPlan::new("sh");
        plan.args(&["-c", "test \"$CROSSBUILD_PROBE\" = yes && test -f marker"])
            .env("CROSSBUILD_PROBE", "yes")
            .cwd(dir.path());
        std::fs::write(dir.path().join("marker"), b"").unwrap();
        assert!(plan.exec().unwrap().success());
    }

    #[test]
    fn exec_missing_program_is_an_error() {
        let plan = BuildPlan::new("crossbuild-no-such-program");
        let err = plan.exec().unwrap_err();
        assert!(format!("{err:#}").contains("could not execute process"));
    }
}
