//! Browser host
//!
//! Canvas-backed render surfaces, a `fetch` asset loader and the
//! `requestAnimationFrame` driver, plus the DOM listeners that feed each
//! canvas's pointer input to its viewport. Drawing itself is delegated to a
//! [`CanvasPainter`] (a WebGL or WebGPU backend).

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, EventTarget, HtmlCanvasElement, MouseEvent, PointerEvent, Response, WheelEvent};

use crate::app::input::Input;
use crate::app::surface::{FrameView, RenderSurface, SurfaceProvider};
use crate::assets::io::{AssetLoader, JsonMeshDecoder, MeshDecoder};
use crate::errors::AssetError;
use crate::resources::geometry::MeshAsset;
use crate::resources::texture::Texture;
use crate::showroom::Showroom;

/// Routes panics and `log` output to the browser console.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::debug!("Logger already initialised");
    }
}

/// Draws frames into a canvas.
pub trait CanvasPainter {
    fn resize(&mut self, width: u32, height: u32);
    fn paint(&mut self, canvas: &HtmlCanvasElement, frame: &FrameView<'_>);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    painter: Box<dyn CanvasPainter>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, painter: Box<dyn CanvasPainter>) -> Self {
        Self { canvas, painter }
    }
}

impl RenderSurface for CanvasSurface {
    fn client_size(&self) -> (u32, u32) {
        // Hidden elements report 0.
        let width = u32::try_from(self.canvas.client_width()).unwrap_or(0);
        let height = u32::try_from(self.canvas.client_height()).unwrap_or(0);
        (width, height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.painter.resize(width, height);
    }

    fn draw(&mut self, frame: &FrameView<'_>) {
        self.painter.paint(&self.canvas, frame);
    }
}

/// Finds canvases by element id.
pub struct DocumentSurfaces<F> {
    document: Document,
    make_painter: F,
}

impl<F> DocumentSurfaces<F>
where
    F: FnMut(&HtmlCanvasElement) -> Box<dyn CanvasPainter>,
{
    pub fn new(document: Document, make_painter: F) -> Self {
        Self {
            document,
            make_painter,
        }
    }
}

impl<F> SurfaceProvider for DocumentSurfaces<F>
where
    F: FnMut(&HtmlCanvasElement) -> Box<dyn CanvasPainter>,
{
    fn acquire(&mut self, surface_id: &str) -> Option<Box<dyn RenderSurface>> {
        let canvas = self
            .document
            .get_element_by_id(surface_id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let painter = (self.make_painter)(&canvas);
        Some(Box::new(CanvasSurface::new(canvas, painter)))
    }
}

/// Loads assets with the browser's `fetch`.
pub struct FetchAssetLoader {
    decoder: Rc<dyn MeshDecoder>,
}

impl Default for FetchAssetLoader {
    fn default() -> Self {
        Self {
            decoder: Rc::new(JsonMeshDecoder),
        }
    }
}

impl FetchAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: impl MeshDecoder + 'static) -> Self {
        self.decoder = Rc::new(decoder);
        self
    }
}

impl AssetLoader for FetchAssetLoader {
    fn load_mesh(&self, uri: &str) -> LocalBoxFuture<'static, Result<MeshAsset, AssetError>> {
        let uri = uri.to_owned();
        let decoder = Rc::clone(&self.decoder);
        async move {
            let bytes = fetch_bytes(&uri).await?;
            decoder.decode(&uri, &bytes)
        }
        .boxed_local()
    }

    fn load_texture(&self, uri: &str) -> LocalBoxFuture<'static, Result<Texture, AssetError>> {
        let uri = uri.to_owned();
        async move {
            let bytes = fetch_bytes(&uri).await?;
            Texture::decode(&uri, &bytes)
        }
        .boxed_local()
    }
}

async fn fetch_bytes(uri: &str) -> Result<Vec<u8>, AssetError> {
    let io_error = |e: JsValue| AssetError::Io {
        uri: uri.to_owned(),
        message: format!("{e:?}"),
    };

    let window = web_sys::window().ok_or_else(|| io_error(JsValue::from_str("no window")))?;
    let response: Response = JsFuture::from(window.fetch_with_str(uri))
        .await
        .map_err(io_error)?
        .dyn_into()
        .map_err(io_error)?;

    if !response.ok() {
        return Err(AssetError::Http {
            uri: uri.to_owned(),
            status: response.status(),
        });
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(io_error)?)
        .await
        .map_err(io_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Starts the frame loop. It re-schedules itself every display refresh for
/// the lifetime of the page.
pub fn start_render_loop(showroom: Rc<RefCell<Showroom>>) -> Result<(), JsValue> {
    let next_frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let first_frame = Rc::clone(&next_frame);

    *first_frame.borrow_mut() = Some(Closure::new(move || {
        showroom.borrow_mut().frame();
        if let Some(callback) = next_frame.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                log::error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }));

    if let Some(callback) = first_frame.borrow().as_ref() {
        request_animation_frame(callback)?;
    }
    Ok(())
}

/// Resizes every viewport on window `resize`.
pub fn install_resize_listener(showroom: Rc<RefCell<Showroom>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_resize = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        let report = showroom.borrow_mut().resize_all();
        log::debug!(
            "Window resized: {} viewports resized, {} hidden",
            report.resized.len(),
            report.skipped.len()
        );
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    on_resize.forget();
    Ok(())
}

/// Routes pointer and wheel events of every registered viewport's canvas to
/// that viewport's [`Input`].
pub fn install_pointer_listeners(showroom: &Rc<RefCell<Showroom>>) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let names: Vec<String> = showroom
        .borrow()
        .registry()
        .iter()
        .map(|viewport| viewport.name().to_owned())
        .collect();

    for name in names {
        let Some(element) = document.get_element_by_id(&name) else {
            continue;
        };
        let target: &EventTarget = element.as_ref();

        listen(target, "pointerdown", showroom, &name, |input, e: &PointerEvent| {
            input.handle_dom_button(e.button(), true);
        })?;
        listen(target, "pointerup", showroom, &name, |input, e: &PointerEvent| {
            input.handle_dom_button(e.button(), false);
        })?;
        listen(target, "pointermove", showroom, &name, |input, e: &PointerEvent| {
            input.handle_cursor_move(e.offset_x() as f32, e.offset_y() as f32);
        })?;
        listen(target, "pointerleave", showroom, &name, |input, _: &PointerEvent| {
            input.handle_cursor_left();
        })?;
        listen(target, "wheel", showroom, &name, |input, e: &WheelEvent| {
            e.prevent_default();
            input.handle_dom_wheel(e.delta_x(), e.delta_y(), e.delta_mode());
        })?;
        // Secondary drag pans.
        listen(target, "contextmenu", showroom, &name, |_, e: &MouseEvent| {
            e.prevent_default();
        })?;
    }
    Ok(())
}

fn listen<E, H>(
    target: &EventTarget,
    kind: &str,
    showroom: &Rc<RefCell<Showroom>>,
    viewport: &str,
    mut handle: H,
) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    H: FnMut(&mut Input, &E) + 'static,
{
    let showroom = Rc::clone(showroom);
    let viewport = viewport.to_owned();
    let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let Some(event) = event.dyn_ref::<E>() else {
            return;
        };
        // Busy only while a frame is running; the event is dropped.
        let Ok(mut showroom) = showroom.try_borrow_mut() else {
            return;
        };
        if let Some(viewport) = showroom.registry_mut().by_name_mut(&viewport) {
            handle(viewport.input_mut(), event);
        }
    });
    target.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    listener.forget();
    Ok(())
}
