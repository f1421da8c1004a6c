use std::{
    collections::HashMap,
    io::{Cursor, Read},
};

use super::{BlobError, BlobSource};

/// Named entries held in memory. Mostly useful for tests and benchmarks
/// that want a feed without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobSource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryBlobSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(name.into(), contents.into());
        self
    }
}

impl BlobSource for MemoryBlobSource {
    fn exists(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.entries.contains_key(name))
    }

    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, BlobError> {
        let contents = self
            .entries
            .get(name)
            .ok_or_else(|| BlobError::NotFound(name.to_string()))?;
        Ok(Box::new(Cursor::new(contents.clone())))
    }
}
