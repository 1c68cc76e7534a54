//
//  codeship-rs
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Configuration file I/O.
//!
//! I/O failures are reported as [`ApiError::Config`] naming the path, so a
//! misplaced or unreadable file surfaces the same way as any other
//! construction-time misconfiguration.

use std::path::Path;

use crate::api::common::{ApiError, Result};

/// Reads a configuration file into a string.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ApiError::Config(format!("unable to read config file {}: {}", path.display(), e)))
}

/// Writes a configuration file, creating parent directories as needed.
///
/// Existing files are overwritten.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::Config(format!("unable to create config directory {}: {}", parent.display(), e))
        })?;
    }
    std::fs::write(path, content)
        .map_err(|e| ApiError::Config(format!("unable to write config file {}: {}", path.display(), e)))
}

/// Returns `true` if a file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}
