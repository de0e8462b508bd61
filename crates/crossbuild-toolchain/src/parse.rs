//! Parsing, rendering, and validation of toolchain descriptors.
//!
//! Descriptors are stored as CMake toolchain files made of `set(VAR VALUE)`
//! declarations. A TOML form with the same fields is also supported.

use std::path::Path;

use crate::descriptor::{
    ToolchainDescriptor, C_COMPILER, CXX_COMPILER, KEYS, SYSTEM_NAME, SYSTEM_PROCESSOR,
};
use crate::error::{Result, ToolchainError};

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A validation issue found in a descriptor.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Load a descriptor from disk.
///
/// Files ending in `.toml` are read as TOML; anything else as CMake.
pub fn load_descriptor(path: &Path) -> Result<ToolchainDescriptor> {
    if !path.exists() {
        return Err(ToolchainError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_descriptor_toml(&content),
        _ => parse_descriptor_cmake(&content),
    }
}

/// Parse the ordered `set(...)` declarations of a CMake toolchain file.
///
/// Blank lines and `#` comments are skipped. Each declaration sets exactly
/// one value, optionally double-quoted.
pub fn parse_cmake_declarations(text: &str) -> Result<Vec<(String, String)>> {
    let mut decls = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        decls.push(parse_set(trimmed, line)?);
    }
    Ok(decls)
}

fn parse_set(stmt: &str, line: usize) -> Result<(String, String)> {
    let syntax = |detail: &str| ToolchainError::Syntax {
        line,
        detail: detail.into(),
    };

    let open = stmt.find('(').ok_or_else(|| syntax("expected `set(...)`"))?;
    if !stmt[..open].trim_end().eq_ignore_ascii_case("set") {
        return Err(syntax("only `set(...)` declarations are supported"));
    }
    let close = closing_paren(stmt, open).ok_or_else(|| syntax("unclosed `set(`"))?;
    let trailing = stmt[close + 1..].trim_start();
    if !trailing.is_empty() && !trailing.starts_with('#') {
        return Err(syntax("unexpected text after `)`"));
    }

    let body = stmt[open + 1..close].trim();
    let (key, rest) = match body.split_once(char::is_whitespace) {
        Some((key, rest)) => (key, rest.trim()),
        None => return Err(syntax("`set` needs a variable and a value")),
    };

    let value = if let Some(quoted) = rest.strip_prefix('"') {
        match quoted.strip_suffix('"') {
            Some(inner) if !inner.contains('"') => inner,
            _ => return Err(syntax("unterminated or malformed quoted value")),
        }
    } else if rest.split_whitespace().count() == 1 {
        rest
    } else {
        return Err(syntax("list values are not supported"));
    };

    Ok((key.to_string(), value.to_string()))
}

/// Byte offset of the `)` closing the `(` at `open`, skipping quoted text.
fn closing_paren(stmt: &str, open: usize) -> Option<usize> {
    let mut in_quotes = false;
    for (offset, ch) in stmt[open + 1..].char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ')' if !in_quotes => return Some(open + 1 + offset),
            _ => {}
        }
    }
    None
}

/// Parse a descriptor from CMake toolchain file text.
///
/// Each descriptor variable must be set exactly once; unknown variables are
/// rejected.
pub fn parse_descriptor_cmake(text: &str) -> Result<ToolchainDescriptor> {
    let decls = parse_cmake_declarations(text)?;
    let mut seen: Vec<&str> = Vec::with_capacity(KEYS.len());
    for (line, (key, _)) in declaration_lines(text).zip(&decls) {
        if !KEYS.contains(&key.as_str()) {
            return Err(ToolchainError::UnknownKey {
                line,
                key: key.clone(),
            });
        }
        if seen.contains(&key.as_str()) {
            return Err(ToolchainError::DuplicateKey {
                line,
                key: key.clone(),
            });
        }
        seen.push(key.as_str());
    }
    ToolchainDescriptor::from_entries(decls)
}

/// Line numbers of the lines that hold declarations.
fn declaration_lines(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.lines().enumerate().filter_map(|(idx, raw)| {
        let trimmed = raw.trim();
        (!trimmed.is_empty() && !trimmed.starts_with('#')).then_some(idx + 1)
    })
}

/// Render a descriptor as a CMake toolchain file.
///
/// Target identity, compilers, and search policy are written as three
/// blank-line separated groups.
pub fn descriptor_to_cmake(descriptor: &ToolchainDescriptor) -> String {
    let mut out = String::new();
    for (idx, (key, value)) in descriptor.entries().iter().enumerate() {
        if idx == 2 || idx == 4 {
            out.push('\n');
        }
        if value.is_empty() || value.contains(char::is_whitespace) {
            out.push_str(&format!("set({key} \"{value}\")\n"));
        } else {
            out.push_str(&format!("set({key} {value})\n"));
        }
    }
    out
}

/// Parse a descriptor from a TOML string.
pub fn parse_descriptor_toml(toml_str: &str) -> Result<ToolchainDescriptor> {
    let descriptor: ToolchainDescriptor = toml::from_str(toml_str)?;
    Ok(descriptor)
}

/// Serialize a descriptor to pretty TOML.
pub fn descriptor_to_toml(descriptor: &ToolchainDescriptor) -> Result<String> {
    let toml_str = toml::to_string_pretty(descriptor)?;
    Ok(toml_str)
}

/// Check a descriptor for internal consistency.
///
/// Returns `Err(issues)` if anything was found, including warnings only;
/// callers decide whether warnings are fatal.
pub fn validate_descriptor(
    descriptor: &ToolchainDescriptor,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    // 1. No empty values
    for (key, value) in descriptor.entries() {
        if value.trim().is_empty() {
            issues.push(ValidationIssue::error(format!("{key} is empty")));
        }
    }

    // 2. Both compilers name the same target triple
    let c_triple = descriptor.c_compiler_triple();
    let cxx_triple = descriptor.cxx_compiler_triple();
    match (&c_triple, &cxx_triple) {
        (Some(c), Some(cxx)) if c != cxx => {
            issues.push(ValidationIssue::error(format!(
                "{C_COMPILER} targets '{c}' but {CXX_COMPILER} targets '{cxx}'"
            )));
        }
        (Some(_), Some(_)) => {}
        _ => {
            issues.push(ValidationIssue::warning(format!(
                "compiler names '{}' and '{}' do not both follow the <triple>-<tool> convention",
                descriptor.c_compiler, descriptor.cxx_compiler
            )));
        }
    }

    // 3. Processor and system name agree with the triple
    if let Some(triple) = c_triple {
        let aliases = triple.processor_aliases();
        if !aliases.is_empty() && !aliases.contains(&descriptor.system_processor.as_str()) {
            issues.push(ValidationIssue::warning(format!(
                "{SYSTEM_PROCESSOR} '{}' is not a known name for architecture '{}'",
                descriptor.system_processor, triple.arch
            )));
        }
        if let Some(expected) = triple.system_name() {
            if descriptor.system_name != expected {
                issues.push(ValidationIssue::warning(format!(
                    "{SYSTEM_NAME} '{}' does not match '{expected}' implied by '{triple}'",
                    descriptor.system_name
                )));
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
