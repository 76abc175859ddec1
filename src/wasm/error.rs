use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::config::ConfigError;

/// Errors raised while mounting the trail onto a canvas.
#[derive(Error, Debug)]
pub enum MountError {
    #[error("no window")]
    MissingWindow,
    #[error("no document")]
    MissingDocument,
    #[error("canvas #{0} not found")]
    CanvasNotFound(String),
    #[error("WebGL2 not supported")]
    WebGl2Unsupported,
    #[error("shader compile failed: {0}")]
    Shader(String),
    #[error("program link failed: {0}")]
    Link(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
