// Copyright 2026 The Mockingbird Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use super::error::ConfigError;

/// Where config YAML comes from. Binaries read from disk; tests provide
/// content directly and skip file I/O.
pub trait ConfigSource {
    fn load(&self) -> Result<String, ConfigError>;
}

/// Reads config from a file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// In-memory config content, for tests.
pub struct StringSource(pub String);

impl ConfigSource for StringSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(self.0.clone())
    }
}
