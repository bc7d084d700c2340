//! Load-once asset cache.
//!
//! [`AssetCache`] hands out [`AssetHandle`]s immediately and resolves them
//! in the background. Every distinct URI is fetched at most once for the
//! lifetime of the cache; repeated requests get a clone of the first handle.
//!
//! Loads run as tasks on a single-threaded [`LocalPool`]. Nothing blocks:
//! the owner calls [`AssetCache::pump`] once per frame and any task whose
//! I/O has completed makes progress.
//!
//! Failure policy differs per asset kind:
//! - a failed mesh leaves its handle `Failed`, and callers must cope with a
//!   viewport that never gets a mesh;
//! - a failed texture resolves to [`Texture::blank`], so material
//!   assignment never has to deal with a broken entry.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use rustc_hash::FxHashMap;

use crate::assets::io::AssetLoader;
use crate::assets::palette::TexturePalette;
use crate::assets::{MeshHandle, TextureHandle};
use crate::errors::AssetError;
use crate::resources::texture::Texture;

pub struct AssetCache {
    loader: Rc<dyn AssetLoader>,
    meshes: FxHashMap<String, MeshHandle>,
    textures: FxHashMap<String, TextureHandle>,
    pool: LocalPool,
    spawner: LocalSpawner,
    in_flight: Rc<Cell<usize>>,
}

impl AssetCache {
    pub fn new(loader: impl AssetLoader + 'static) -> Self {
        Self::from_shared(Rc::new(loader))
    }

    pub fn from_shared(loader: Rc<dyn AssetLoader>) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            loader,
            meshes: FxHashMap::default(),
            textures: FxHashMap::default(),
            pool,
            spawner,
            in_flight: Rc::new(Cell::new(0)),
        }
    }

    /// Requests the mesh at `uri`. The returned handle resolves once.
    pub fn load_mesh(&mut self, uri: &str) -> MeshHandle {
        if let Some(handle) = self.meshes.get(uri) {
            return handle.clone();
        }

        let handle = MeshHandle::pending(uri);
        let task_handle = handle.clone();
        let load = self.loader.load_mesh(uri);

        let spawned = self.spawn(async move {
            let result = load.await;
            match &result {
                Ok(mesh) => log::info!(
                    "Mesh '{}' loaded ({} nodes)",
                    task_handle.uri(),
                    mesh.nodes.len()
                ),
                Err(e) => log::error!("Mesh load failed: {e}"),
            }
            task_handle.resolve(result);
        });

        if let Err(e) = spawned {
            log::error!("Mesh load for '{uri}' could not start: {e}");
            handle.resolve(Err(e));
        }

        self.meshes.insert(uri.to_string(), handle.clone());
        handle
    }

    /// Requests the texture at `uri`. Never ends up `Failed`: broken
    /// textures resolve to a blank fallback.
    pub fn load_texture(&mut self, uri: &str) -> TextureHandle {
        if let Some(handle) = self.textures.get(uri) {
            return handle.clone();
        }

        let handle = TextureHandle::pending(uri);
        let task_handle = handle.clone();
        let load = self.loader.load_texture(uri);

        let spawned = self.spawn(async move {
            let texture = load.await.unwrap_or_else(|e| {
                log::warn!("{e}; using blank fallback");
                Texture::blank(task_handle.uri())
            });
            task_handle.resolve(Ok(texture));
        });

        if let Err(e) = spawned {
            log::warn!("Texture load for '{uri}' could not start: {e}; using blank fallback");
            handle.resolve(Ok(Texture::blank(uri)));
        }

        self.textures.insert(uri.to_string(), handle.clone());
        handle
    }

    /// Requests every texture of the palette, preserving order.
    pub fn load_texture_palette<I, S>(&mut self, uris: I) -> TexturePalette
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let textures = uris
            .into_iter()
            .map(|uri| self.load_texture(uri.as_ref()))
            .collect();
        TexturePalette::new(textures)
    }

    /// Runs every load task until none can make progress without new I/O.
    pub fn pump(&mut self) {
        if self.in_flight.get() > 0 {
            self.pool.run_until_stalled();
        }
    }

    /// Number of loads that have not resolved yet.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.in_flight.get() == 0
    }

    fn spawn(&self, task: impl Future<Output = ()> + 'static) -> Result<(), AssetError> {
        let counter = Rc::clone(&self.in_flight);
        counter.set(counter.get() + 1);

        let tracked = {
            let counter = Rc::clone(&counter);
            async move {
                task.await;
                counter.set(counter.get() - 1);
            }
        };

        self.spawner.spawn_local(tracked).map_err(|e| {
            counter.set(counter.get() - 1);
            AssetError::Spawn(e.to_string())
        })
    }
}
