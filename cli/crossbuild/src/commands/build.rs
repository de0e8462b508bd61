//! `crossbuild release` and `crossbuild linux` — external build dispatch.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use crossbuild_toolchain::TargetTriple;

use crate::config::CrossbuildConfig;
use crate::plan::{exit_code, BuildPlan};

/// Environment variable pointing the external build system at the
/// toolchain descriptor.
pub const TOOLCHAIN_FILE_VAR: &str = "CMAKE_TOOLCHAIN_FILE";

/// Plan an optimized build for the host.
pub fn release_plan(program: &OsStr, root: &Path, config: &CrossbuildConfig) -> BuildPlan {
    let mut plan = BuildPlan::new(program);
    plan.arg("build")
        .arg("--release")
        .args(&config.build.args)
        .cwd(root);
    plan
}

/// Plan an optimized build for `x86_64-unknown-linux-gnu`.
///
/// The child gets the target C compiler in `CC_<triple>` and the absolute
/// descriptor path in `CMAKE_TOOLCHAIN_FILE`.
pub fn linux_plan(program: &OsStr, root: &Path, config: &CrossbuildConfig) -> BuildPlan {
    let triple = TargetTriple::x86_64_linux_gnu();
    let mut plan = BuildPlan::new(program);
    plan.env(&triple.cc_env_var(), triple.c_compiler())
        .env(TOOLCHAIN_FILE_VAR, config.descriptor_path(root))
        .arg("build")
        .arg(format!("--target={triple}"))
        .arg("--release")
        .args(&config.build.args)
        .cwd(root);
    plan
}

/// Run a plan and return the exit code to report.
///
/// With `dry_run` the plan is printed instead and the exit code is 0.
pub fn run(plan: &BuildPlan, dry_run: bool) -> Result<i32> {
    if dry_run {
        println!("{plan}");
        return Ok(0);
    }
    let status = plan.exec()?;
    if !status.success() {
        log::debug!("build failed with {status}");
    }
    Ok(exit_code(status))
}
