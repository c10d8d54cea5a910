//! 2D canvas backend
//!
//! Loads the manifest's images and replays [`DrawCommand`] lists on a
//! `CanvasRenderingContext2d`.

use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::assets::{AssetManifest, SpriteId};
use crate::render::{DrawCommand, SpriteAvailability};

/// Image elements by sprite. An entry exists as soon as loading starts;
/// readiness is tracked separately by the host's `AssetTracker`.
#[derive(Default)]
pub struct ImageStore {
    images: HashMap<SpriteId, HtmlImageElement>,
}

impl ImageStore {
    /// Create an `<img>` per manifest entry and start loading it.
    ///
    /// `on_settled(sprite, loaded)` fires once per image from its load or
    /// error event.
    pub fn load(
        manifest: &AssetManifest,
        on_settled: impl Fn(SpriteId, bool) + Clone + 'static,
    ) -> Result<Self, JsValue> {
        let mut images = HashMap::new();
        for (sprite, path) in manifest.entries() {
            let img = HtmlImageElement::new()?;

            let done = on_settled.clone();
            let onload = Closure::<dyn FnMut()>::new(move || done(sprite, true));
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let done = on_settled.clone();
            let onerror = Closure::<dyn FnMut()>::new(move || done(sprite, false));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            img.set_src(path);
            images.insert(sprite, img);
        }
        log::info!("Loading {} sprites", images.len());
        Ok(Self { images })
    }

    pub fn get(&self, sprite: SpriteId) -> Option<&HtmlImageElement> {
        self.images.get(&sprite)
    }
}

/// Fetch the 2D context of `canvas`
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Replay `commands` in order. A failed image draw is logged and skipped.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    commands: &[DrawCommand],
    images: &ImageStore,
    ready: &impl SpriteAvailability,
) {
    for command in commands {
        match command {
            DrawCommand::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
            }
            DrawCommand::FillRect { rect, color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCommand::DrawImage { sprite, rect } => {
                let Some(img) = images.get(*sprite).filter(|_| ready.is_ready(*sprite)) else {
                    continue;
                };
                if let Err(e) = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    rect.x as f64,
                    rect.y as f64,
                    rect.w as f64,
                    rect.h as f64,
                ) {
                    log::warn!("Draw error for {:?}: {:?}", sprite, e);
                }
            }
        }
    }
}
