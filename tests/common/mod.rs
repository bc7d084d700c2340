//! Shared test fixtures: recording render surfaces, an in-memory surface
//! provider and a scripted asset loader.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use glam::Vec3;
use rustc_hash::FxHashMap;

use vitrine::assets::AssetLoader;
use vitrine::resources::{Color, MeshAsset, MeshNode, Texture};
use vitrine::{AssetError, FrameView, RenderSurface, SurfaceProvider};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Recording surface
// ============================================================================

/// What one draw call saw.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub viewport: String,
    pub aspect: f32,
    pub has_mesh: bool,
    /// Texture URI of each paintable surface, `None` when untextured.
    pub maps: Vec<Option<String>>,
    pub colors: Vec<Color>,
    pub mesh_center: Option<Vec3>,
    pub has_ambient: bool,
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub client_size: (u32, u32),
    pub set_sizes: Vec<(u32, u32)>,
    pub frames: Vec<FrameRecord>,
}

impl SurfaceLog {
    pub fn draw_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }
}

pub type SharedLog = Rc<RefCell<SurfaceLog>>;

pub struct RecordingSurface {
    log: SharedLog,
}

impl RenderSurface for RecordingSurface {
    fn client_size(&self) -> (u32, u32) {
        self.log.borrow().client_size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().set_sizes.push((width, height));
    }

    fn draw(&mut self, frame: &FrameView<'_>) {
        let (maps, colors): (Vec<Option<String>>, Vec<Color>) = frame
            .mesh
            .map(|mesh| {
                mesh.surfaces()
                    .iter()
                    .map(|s| (s.material.map().map(|m| m.uri().to_owned()), s.material.color()))
                    .unzip()
            })
            .unwrap_or_default();

        let record = FrameRecord {
            viewport: frame.viewport.to_owned(),
            aspect: frame.camera.aspect,
            has_mesh: frame.mesh.is_some(),
            maps,
            colors,
            mesh_center: frame
                .mesh
                .and_then(|mesh| mesh.bounding_box())
                .map(|b| b.center()),
            has_ambient: frame.lights.ambient.is_some(),
        };
        self.log.borrow_mut().frames.push(record);
    }
}

/// Surfaces keyed by id, like canvases in a document.
#[derive(Default)]
pub struct InMemorySurfaces {
    surfaces: FxHashMap<String, SharedLog>,
}

impl InMemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a surface with the given client size (zero = hidden).
    pub fn add(&mut self, id: &str, width: u32, height: u32) -> SharedLog {
        let log = Rc::new(RefCell::new(SurfaceLog {
            client_size: (width, height),
            ..SurfaceLog::default()
        }));
        self.surfaces.insert(id.to_owned(), Rc::clone(&log));
        log
    }

    pub fn log(&self, id: &str) -> SharedLog {
        Rc::clone(&self.surfaces[id])
    }
}

impl SurfaceProvider for InMemorySurfaces {
    fn acquire(&mut self, surface_id: &str) -> Option<Box<dyn RenderSurface>> {
        let log = self.surfaces.get(surface_id)?;
        Some(Box::new(RecordingSurface { log: Rc::clone(log) }))
    }
}

// ============================================================================
// Scripted loader
// ============================================================================

enum Script<T> {
    Ready(T),
    Fail(AssetError),
    /// Resolves when the test sends the result.
    Gated(flume::Receiver<Result<T, AssetError>>),
}

impl<T: Clone + 'static> Script<T> {
    fn start(&self) -> LocalBoxFuture<'static, Result<T, AssetError>> {
        match self {
            Script::Ready(value) => futures::future::ready(Ok(value.clone())).boxed_local(),
            Script::Fail(error) => futures::future::ready(Err(error.clone())).boxed_local(),
            Script::Gated(rx) => {
                let rx = rx.clone();
                async move {
                    rx.into_recv_async().await.unwrap_or_else(|_| {
                        Err(AssetError::Io {
                            uri: "gated".to_owned(),
                            message: "sender dropped".to_owned(),
                        })
                    })
                }
                .boxed_local()
            }
        }
    }
}

/// In-memory [`AssetLoader`] with per-URI scripted outcomes.
/// Unscripted URIs fail with [`AssetError::Io`].
#[derive(Default)]
pub struct ScriptedLoader {
    meshes: FxHashMap<String, Script<MeshAsset>>,
    textures: FxHashMap<String, Script<Texture>>,
    loads: RefCell<FxHashMap<String, usize>>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(mut self, uri: &str, asset: MeshAsset) -> Self {
        self.meshes.insert(uri.to_owned(), Script::Ready(asset));
        self
    }

    pub fn failing_mesh(mut self, uri: &str) -> Self {
        self.meshes.insert(
            uri.to_owned(),
            Script::Fail(AssetError::Http {
                uri: uri.to_owned(),
                status: 404,
            }),
        );
        self
    }

    pub fn gated_mesh(mut self, uri: &str) -> (Self, flume::Sender<Result<MeshAsset, AssetError>>) {
        let (tx, rx) = flume::bounded(1);
        self.meshes.insert(uri.to_owned(), Script::Gated(rx));
        (self, tx)
    }

    pub fn texture(mut self, uri: &str) -> Self {
        let texture = Texture::from_rgba8(uri, 2, 2, vec![128; 16]);
        self.textures.insert(uri.to_owned(), Script::Ready(texture));
        self
    }

    pub fn failing_texture(mut self, uri: &str) -> Self {
        self.textures.insert(
            uri.to_owned(),
            Script::Fail(AssetError::Decode {
                uri: uri.to_owned(),
                message: "corrupt".to_owned(),
            }),
        );
        self
    }

    /// How many times `uri` was requested from the loader.
    pub fn load_count(&self, uri: &str) -> usize {
        self.loads.borrow().get(uri).copied().unwrap_or(0)
    }

    fn record(&self, uri: &str) {
        *self.loads.borrow_mut().entry(uri.to_owned()).or_default() += 1;
    }
}

fn not_found<T: 'static>(uri: &str) -> LocalBoxFuture<'static, Result<T, AssetError>> {
    futures::future::ready(Err(AssetError::Io {
        uri: uri.to_owned(),
        message: "not found".to_owned(),
    }))
    .boxed_local()
}

impl AssetLoader for ScriptedLoader {
    fn load_mesh(&self, uri: &str) -> LocalBoxFuture<'static, Result<MeshAsset, AssetError>> {
        self.record(uri);
        self.meshes.get(uri).map_or_else(|| not_found(uri), Script::start)
    }

    fn load_texture(&self, uri: &str) -> LocalBoxFuture<'static, Result<Texture, AssetError>> {
        self.record(uri);
        self.textures.get(uri).map_or_else(|| not_found(uri), Script::start)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A rug whose authored origin is far from its center.
pub fn off_center_rug() -> MeshAsset {
    MeshAsset::new(
        "rug",
        vec![
            MeshNode::group("root"),
            MeshNode::mesh(
                "pile",
                vec![
                    [20.0, 1.0, 30.0],
                    [21.5, 1.0, 30.0],
                    [21.5, 1.2, 32.2],
                    [20.0, 1.2, 32.2],
                ],
                vec![0, 1, 2, 0, 2, 3],
            ),
            MeshNode::mesh("backing", vec![[20.0, 0.9, 30.0], [21.5, 0.9, 32.2]], vec![]),
        ],
    )
}

pub const MESH_URL: &str = "./assets/Doormate.json";
pub const PALETTE: [&str; 4] = [
    "./assets/Doormate_metallicRoughness.png",
    "./assets/Doormate_baseColor.png",
    "./assets/Doormate_normal.png",
    "./assets/Carpet4.png",
];

/// Loader that serves the carpet showroom's assets.
pub fn showroom_loader() -> ScriptedLoader {
    PALETTE
        .iter()
        .fold(ScriptedLoader::new().mesh(MESH_URL, off_center_rug()), |loader, uri| {
            loader.texture(uri)
        })
}

pub const GALLERY: [&str; 4] = ["carpetCanvas1", "carpetCanvas2", "carpetCanvas3", "carpetCanvas4"];

/// All five showroom canvases, visible.
pub fn showroom_surfaces() -> InMemorySurfaces {
    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("home-canvas", 1280, 720);
    for id in GALLERY {
        surfaces.add(id, 300, 300);
    }
    surfaces
}
