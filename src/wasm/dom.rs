use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlElement};

use super::error::MountError;
use crate::anchors::{rect_center, AnchorSource};
use crate::config::TrailConfig;

pub const ACTIVE_CLASS: &str = "custom-cursor-active";

/// Magnetic elements found by a CSS selector, read on demand.
pub struct DomAnchors {
    document: Document,
    selector: String,
}

impl DomAnchors {
    pub fn new(document: Document, selector: impl Into<String>) -> Self {
        Self {
            document,
            selector: selector.into(),
        }
    }
}

impl AnchorSource for DomAnchors {
    fn anchor_centers(&self) -> Vec<Vec2> {
        let nodes = match self.document.query_selector_all(&self.selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("magnetic selector {:?} rejected: {:?}", self.selector, err);
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| {
                let r = el.get_bounding_client_rect();
                rect_center(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
            })
            .collect()
    }
}

/// Whether the event target is, or sits inside, an element matching `selector`.
pub fn targets_interactive(event: &Event, selector: &str) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(selector).ok().flatten())
        .is_some()
}

/// Hides the native cursor while the trail is mounted.
pub fn hide_system_cursor(document: &Document) {
    for el in styled_roots(document) {
        if let Err(err) = el.style().set_property("cursor", "none") {
            log::warn!("could not hide cursor: {:?}", err);
        }
    }
    if let Some(body) = document.body() {
        body.class_list().add_1(ACTIVE_CLASS).ok();
    }
}

pub fn restore_system_cursor(document: &Document) {
    for el in styled_roots(document) {
        el.style().set_property("cursor", "auto").ok();
    }
    if let Some(body) = document.body() {
        body.class_list().remove_1(ACTIVE_CLASS).ok();
    }
}

fn styled_roots(document: &Document) -> Vec<HtmlElement> {
    let root = document
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    document.body().into_iter().chain(root).collect()
}

/// Reads `data-trail-config` (JSON) or `data-trail-preset` from the canvas.
/// An unknown preset falls back to the default with a warning.
pub fn config_from_canvas(canvas: &HtmlCanvasElement) -> Result<TrailConfig, MountError> {
    if let Some(json) = canvas.get_attribute("data-trail-config") {
        return Ok(TrailConfig::from_json_str(&json)?);
    }
    match canvas.get_attribute("data-trail-preset") {
        Some(name) => Ok(TrailConfig::preset(&name).unwrap_or_else(|err| {
            log::warn!("{err}; using default preset");
            TrailConfig::default()
        })),
        None => Ok(TrailConfig::default()),
    }
}
