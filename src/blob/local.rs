use std::{
    fs::File,
    io::{self, Read},
    path::PathBuf,
};

use super::{BlobError, BlobSource};

/// Feed files under a directory on the local filesystem.
pub struct LocalBlobSource {
    root: PathBuf,
}

impl LocalBlobSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlobSource for LocalBlobSource {
    fn exists(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.root.join(name).is_file())
    }

    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, BlobError> {
        match File::open(self.root.join(name)) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(name.to_string()))
            }
            Err(err) => Err(BlobError::transport(err)),
        }
    }
}
