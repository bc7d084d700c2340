//! Asset loading collaborators.
//!
//! The viewer core only depends on the [`AssetLoader`] contract: give it a
//! URI, get back a future that resolves to the decoded asset or an
//! [`AssetError`]. Concrete readers and decoders live behind it.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::errors::AssetError;
use crate::resources::geometry::MeshAsset;
use crate::resources::texture::Texture;

/// Mesh/texture loading collaborator.
///
/// Futures are `'static` and not `Send`: they are driven cooperatively on
/// the thread that owns the [`AssetCache`](super::AssetCache).
pub trait AssetLoader {
    fn load_mesh(&self, uri: &str) -> LocalBoxFuture<'static, Result<MeshAsset, AssetError>>;
    fn load_texture(&self, uri: &str) -> LocalBoxFuture<'static, Result<Texture, AssetError>>;
}

/// Turns raw bytes into a [`MeshAsset`]. Format support is up to the implementor.
pub trait MeshDecoder {
    fn decode(&self, uri: &str, bytes: &[u8]) -> Result<MeshAsset, AssetError>;
}

/// Decodes the serde representation of [`MeshAsset`] (JSON).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonMeshDecoder;

impl MeshDecoder for JsonMeshDecoder {
    fn decode(&self, uri: &str, bytes: &[u8]) -> Result<MeshAsset, AssetError> {
        let mut asset: MeshAsset =
            serde_json::from_slice(bytes).map_err(|e| AssetError::Decode {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;
        if asset.name.is_empty() {
            asset.name = source_filename(uri).to_string();
        }
        Ok(asset)
    }
}

/// Local file loader
///
/// Reads relative URIs under `root_path`. Textures are decoded with the
/// `image` crate, meshes with the configured [`MeshDecoder`].
pub struct FileAssetLoader {
    root_path: PathBuf,
    decoder: Rc<dyn MeshDecoder>,
}

impl FileAssetLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self {
            root_path,
            decoder: Rc::new(JsonMeshDecoder),
        }
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: impl MeshDecoder + 'static) -> Self {
        self.decoder = Rc::new(decoder);
        self
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

fn read_file(path: &Path, uri: &str) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|e| AssetError::Io {
        uri: uri.to_string(),
        message: e.to_string(),
    })
}

impl AssetLoader for FileAssetLoader {
    fn load_mesh(&self, uri: &str) -> LocalBoxFuture<'static, Result<MeshAsset, AssetError>> {
        let path = self.root_path.join(uri);
        let decoder = Rc::clone(&self.decoder);
        let uri = uri.to_string();
        async move {
            let bytes = read_file(&path, &uri)?;
            decoder.decode(&uri, &bytes)
        }
        .boxed_local()
    }

    fn load_texture(&self, uri: &str) -> LocalBoxFuture<'static, Result<Texture, AssetError>> {
        let path = self.root_path.join(uri);
        let uri = uri.to_string();
        async move {
            let bytes = read_file(&path, &uri)?;
            Texture::decode(&uri, &bytes)
        }
        .boxed_local()
    }
}

/// Last path segment of a local path or URL.
pub fn source_filename(source: &str) -> &str {
    source
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(source)
}
