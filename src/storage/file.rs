//! Upload source file handle

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::File;

/// A local file opened for upload
///
/// Holds the file open for as long as the upload runs. Dropping the value
/// releases the handle, so every exit path of an upload closes it.
#[derive(Debug)]
pub struct StorageFile {
    path: PathBuf,
    size: u64,
    handle: File,
}

impl StorageFile {
    /// Open a regular file for upload
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let handle = File::open(&path).await?;
        let metadata = handle.metadata().await?;

        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        Ok(Self {
            path,
            size: metadata.len(),
            handle,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Read the whole file through a second handle
    pub async fn read_all(&self) -> io::Result<Vec<u8>> {
        use tokio::io::{AsyncReadExt, AsyncSeekExt};

        let mut reader = self.handle.try_clone().await?;
        reader.seek(io::SeekFrom::Start(0)).await?;
        let mut data = Vec::with_capacity(self.size as usize);
        reader.read_to_end(&mut data).await?;
        Ok(data)
    }
}
