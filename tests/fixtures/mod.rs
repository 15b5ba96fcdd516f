//! Shared fixtures for integration tests.
//!
//! - `projects/jaffle.toml`: the active project, including configuration for
//!   its `utils` dependency
//! - `projects/utils.json`: the dependency project

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Directory holding the fixture projects
pub fn projects_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/projects")
}

/// Path to the active fixture project
pub fn jaffle_path() -> PathBuf {
    projects_dir().join("jaffle.toml")
}

/// Path to the dependency fixture project
pub fn utils_path() -> PathBuf {
    projects_dir().join("utils.json")
}
