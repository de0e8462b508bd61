//! `crossbuild doctor` — toolchain diagnostics.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use crossbuild_toolchain::{load_descriptor, validate_descriptor, TargetTriple};

/// Print diagnostics for the external build command, the target
/// compilers, and the descriptor at `descriptor_path`.
pub fn run(program: &OsStr, descriptor_path: &Path) -> Result<()> {
    println!("=== crossbuild doctor ===");
    println!();

    println!("crossbuild version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Build Command ---");
    print_tool_status(program, &["--version"]);
    println!();

    let triple = TargetTriple::x86_64_linux_gnu();
    println!("--- Target: {triple} ---");
    println!("  {}={}", triple.cc_env_var(), triple.c_compiler());

    println!();
    println!("--- Toolchain Descriptor ---");
    println!("  Path: {}", descriptor_path.display());
    match load_descriptor(descriptor_path) {
        Ok(descriptor) => {
            match validate_descriptor(&descriptor) {
                Ok(()) => println!("  Status: valid"),
                Err(issues) => {
                    for issue in issues {
                        println!("  {:?}: {}", issue.severity, issue.message);
                    }
                }
            }
            println!();
            println!("--- Target Compilers ---");
            print_tool_status(OsStr::new(&descriptor.c_compiler), &["--version"]);
            print_tool_status(OsStr::new(&descriptor.cxx_compiler), &["--version"]);
        }
        Err(e) => println!("  Status: {e}"),
    }

    Ok(())
}

fn print_tool_status(name: &OsStr, args: &[&str]) {
    let display = name.to_string_lossy();
    match Command::new(name).args(args).output() {
        Ok(output) => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("(unknown version)");
            println!("  {display}: {first_line}");
        }
        Err(_) => {
            println!("  {display}: not found");
        }
    }
}
