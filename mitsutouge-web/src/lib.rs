//! Browser build of the Mitsutouge page scripts.
//!
//! Runs the accessibility enhancer and the language switcher from
//! `mitsutouge-page` against the live DOM, and publishes
//! `announceToScreenReader`, `setFocus`, `trapFocus` and `languageSwitcher`
//! on `window` for inline page scripts.

#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bindings;
pub mod browser;
pub mod context;
pub mod dom;
pub mod error;
pub mod platform;

pub use browser::BrowserDocument;
pub use context::{AppContext, LanguageSwitcherHandle, boot};
pub use error::WebError;
pub use platform::{BrowserNavigator, LocalStoragePreferences};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    dom::init_logging(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    context::run_when_ready(|| {
        if let Err(err) = context::boot() {
            log::error!("page scripts failed to start: {err}");
        }
    })
}
