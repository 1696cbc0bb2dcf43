//! Destinations for finished packages.

use crate::common::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receives the serialized package together with a suggested file name.
pub trait PackageSink {
    fn accept(&mut self, bytes: Vec<u8>, suggested_name: &str) -> Result<()>;
}

/// Writes packages into a directory under their suggested name.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, oldest first.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PackageSink for FileSink {
    fn accept(&mut self, bytes: Vec<u8>, suggested_name: &str) -> Result<()> {
        // only the final component is honored
        let name = Path::new(suggested_name)
            .file_name()
            .ok_or_else(|| Error::InvalidArgument(format!("invalid file name '{}'", suggested_name)))?;

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "package written");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps packages in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub packages: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PackageSink for MemorySink {
    fn accept(&mut self, bytes: Vec<u8>, suggested_name: &str) -> Result<()> {
        self.packages.push((suggested_name.to_string(), bytes));
        Ok(())
    }
}
