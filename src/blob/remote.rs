use std::{
    io::{self, Read},
    sync::Arc,
};

use bytes::{Buf, Bytes};
use futures_util::stream::{BoxStream, StreamExt};
use object_store::{azure::MicrosoftAzureBuilder, path::Path as ObjectPath, ObjectStore};
use tokio::runtime::{Builder, Runtime};

use super::{BlobError, BlobSource};

/// Feed files in an Azure blob container addressed by (account, container).
///
/// Credentials are chained: environment-provided secrets and workload
/// identity first, then the developer's Azure CLI login. The first provider
/// that succeeds wins.
pub struct AzureBlobSource {
    store: Arc<dyn ObjectStore>,
    runtime: Arc<Runtime>,
}

impl AzureBlobSource {
    pub fn connect(account: &str, container: &str) -> Result<Self, BlobError> {
        let store = MicrosoftAzureBuilder::from_env()
            .with_account(account)
            .with_container_name(container)
            .with_use_azure_cli(true)
            .build()
            .map_err(BlobError::transport)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(BlobError::transport)?;
        Ok(Self {
            store: Arc::new(store),
            runtime: Arc::new(runtime),
        })
    }
}

impl BlobSource for AzureBlobSource {
    fn exists(&self, name: &str) -> Result<bool, BlobError> {
        let path = ObjectPath::from(name);
        match self.runtime.block_on(self.store.head(&path)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(BlobError::transport(err)),
        }
    }

    fn open(&self, name: &str) -> Result<Box<dyn Read + Send>, BlobError> {
        let path = ObjectPath::from(name);
        let result = match self.runtime.block_on(self.store.get(&path)) {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(BlobError::NotFound(name.to_string()))
            }
            Err(err) => return Err(BlobError::transport(err)),
        };
        Ok(Box::new(RemoteReader {
            runtime: self.runtime.clone(),
            stream: result.into_stream(),
            chunk: Bytes::new(),
        }))
    }
}

/// Bridges the asynchronous object byte stream into the blocking `Read`
/// the CSV layer consumes, one chunk at a time.
struct RemoteReader {
    runtime: Arc<Runtime>,
    stream: BoxStream<'static, object_store::Result<Bytes>>,
    chunk: Bytes,
}

impl Read for RemoteReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.chunk.is_empty() {
            match self.runtime.block_on(self.stream.next()) {
                Some(Ok(chunk)) => self.chunk = chunk,
                Some(Err(err)) => return Err(io::Error::other(err)),
                None => return Ok(0),
            }
        }
        let len = buf.len().min(self.chunk.len());
        buf[..len].copy_from_slice(&self.chunk[..len]);
        self.chunk.advance(len);
        Ok(len)
    }
}
