//! Pointer-driven particle trail and magnetic cursor.
//!
//! The simulation core is platform neutral and lives in the top-level
//! modules; the browser front end (listeners, DOM queries, WebGL2 drawing)
//! is compiled only for `wasm32`.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod anchors;
pub mod config;
pub mod cursor;
pub mod follower;
pub mod input;
pub mod particle;
pub mod pool;
pub mod projection;
pub mod simulation;
pub mod snapshot;

pub use anchors::{AnchorSource, NoAnchors};
pub use config::{ConfigError, ConfigResult, TrailConfig};
pub use input::PointerSample;
pub use pool::ParticlePool;
pub use projection::{Projection, Viewport};
pub use simulation::{Frame, TrailSimulation};
pub use snapshot::RenderBuffers;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod dom;
    mod error;
    mod listeners;
    mod render;

    pub use error::MountError;
    pub use render::{mount, TrailHandle};

    thread_local! {
        static ACTIVE: std::cell::RefCell<Option<TrailHandle>> =
            const { std::cell::RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or(MountError::MissingWindow)?;
        let document = window.document().ok_or(MountError::MissingDocument)?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or_else(|| MountError::CanvasNotFound("c".into()))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let config = dom::config_from_canvas(&canvas)?;
        let handle = render::start(canvas, config)?;
        ACTIVE.with(|slot| *slot.borrow_mut() = Some(handle));
        Ok(())
    }

    /// Unmounts the trail started by [`main`]. Safe to call more than once.
    #[wasm_bindgen]
    pub fn teardown() {
        if let Some(mut handle) = ACTIVE.with(|slot| slot.borrow_mut().take()) {
            handle.unmount();
        }
    }
}
