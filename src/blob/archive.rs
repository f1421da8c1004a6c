use std::{
    fs::File,
    io::{Cursor, Read},
    path::Path,
    sync::{Mutex, MutexGuard},
};

use zip::ZipArchive;

use super::{BlobError, BlobSource};

/// A feed packaged as a single zip archive, the form most agencies publish.
/// Entries are decompressed on open.
pub struct ZipBlobSource {
    archive: Mutex<ZipArchive<File>>,
}

impl ZipBlobSource {
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, BlobError> {
        let file = File::open(path.as_ref()).map_err(BlobError::transport)?;
        let archive = ZipArchive::new(file).map_err(BlobError::transport)?;
        Ok(Self {
            archive: Mutex::new(archive),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ZipArchive<File>> {
        match self.archive.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl BlobSource for ZipBlobSource {
    fn exists(&self, name: &str) -> Result<bool, BlobError> {
        Ok(self.lock().index_for_name(name).is_some())
    }

    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, BlobError> {
        let mut archive = self.lock();
        let index = archive
            .index_for_name(name)
            .ok_or_else(|| BlobError::NotFound(name.to_string()))?;
        let mut entry = archive.by_index(index).map_err(BlobError::transport)?;
        // The entry borrows the archive, so decompress before the lock drops.
        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut contents)
            .map_err(BlobError::transport)?;
        Ok(Box::new(Cursor::new(contents)))
    }
}
