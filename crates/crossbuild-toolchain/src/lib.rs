//! Cross-compilation toolchain descriptors.
//!
//! A toolchain descriptor tells an external build system which target it is
//! building for and how to resolve compilers, libraries, and headers:
//! - **Target triple:** architecture, vendor, operating system, and ABI
//! - **Descriptor:** system name, processor, C/C++ compilers, root-path modes
//! - **Parsing:** the CMake `set(...)` form and a TOML form

pub mod descriptor;
pub mod error;
pub mod parse;
pub mod triple;

pub use descriptor::{FindRootPathMode, ToolchainDescriptor};
pub use error::{Result, ToolchainError};
pub use parse::{
    descriptor_to_cmake, descriptor_to_toml, load_descriptor, parse_cmake_declarations,
    parse_descriptor_cmake, parse_descriptor_toml, validate_descriptor, Severity, ValidationIssue,
};
pub use triple::TargetTriple;
