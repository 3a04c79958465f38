use mitsutouge_page::{DomError, SwitchError};
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::dom::js_error_message;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("browser error: {0}")]
    Js(String),
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Switch(#[from] SwitchError),
    #[error("a language switch is already running")]
    Busy,
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_error_message(&value))
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
