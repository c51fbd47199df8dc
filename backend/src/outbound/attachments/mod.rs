//! Local-directory attachment storage.
//!
//! Files live directly under one upload directory opened through `cap_std`,
//! so every access is confined to that directory. Stored paths are bare file
//! names of the form `<uuid>.<ext>`.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::AttachmentUpload;
use crate::domain::ports::{AttachmentStore, AttachmentStoreError};

/// Attachment store writing into a local upload directory.
#[derive(Clone)]
pub struct LocalAttachmentStore {
    dir: Arc<Dir>,
    root: PathBuf,
}

impl LocalAttachmentStore {
    /// Open `root`, creating it when missing.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            root,
        })
    }

    /// Directory the store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, AttachmentStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(|err| AttachmentStoreError::io(err.to_string()))?
            .map_err(|err| AttachmentStoreError::io(err.to_string()))
    }
}

/// Accept only a single plain file name.
fn stored_name(path: &str) -> Result<&str, AttachmentStoreError> {
    let mut components = Path::new(path).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(AttachmentStoreError::invalid_path(path)),
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn save(&self, upload: &AttachmentUpload) -> Result<String, AttachmentStoreError> {
        let name = format!("{}.{}", Uuid::new_v4(), upload.extension());
        let bytes = upload.bytes().to_vec();
        let target = name.clone();
        self.blocking(move |dir| dir.write(&target, bytes)).await?;
        debug!(file = %name, "attachment stored");
        Ok(name)
    }

    async fn remove(&self, path: &str) -> Result<(), AttachmentStoreError> {
        let name = stored_name(path)?.to_owned();
        self.blocking(move |dir| match dir.remove_file(&name) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await
    }
}
