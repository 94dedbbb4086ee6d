//! Crate error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A tuning parameter is outside its valid range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A required DOM node is missing at mount time
    #[error("element not found: #{0}")]
    ElementNotFound(String),

    /// The element exists but is not a `<canvas>`
    #[error("element #{0} is not a canvas")]
    NotACanvas(String),

    /// The canvas refused to hand out a 2D context
    #[error("2d rendering context unavailable")]
    ContextUnavailable,

    /// A browser API call failed
    #[error("browser call failed: {0}")]
    Js(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for Error {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Error::Js(format!("{value:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
