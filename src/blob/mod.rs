use std::io::Read;

use thiserror::Error;

mod archive;
mod local;
mod memory;
mod remote;

pub use archive::ZipBlobSource;
pub use local::LocalBlobSource;
pub use memory::MemoryBlobSource;
pub use remote::AzureBlobSource;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BlobError {
    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}

/// Uniform read access to the files of a single feed, whether they live in
/// a local directory, a zip archive or a cloud object container.
pub trait BlobSource: Send + Sync {
    fn exists(&self, name: &str) -> Result<bool, BlobError>;

    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, BlobError>;
}
