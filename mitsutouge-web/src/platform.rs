//! Browser-backed preference storage and history access.

use mitsutouge_page::{Location, Navigator, PlatformError, PreferenceStore};
use wasm_bindgen::JsValue;

use crate::dom::{self, js_error_message};

/// Preferences kept in `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStoragePreferences;

fn storage_error(err: &JsValue) -> PlatformError {
    PlatformError::Storage(js_error_message(err))
}

impl PreferenceStore for LocalStoragePreferences {
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        dom::local_storage()
            .and_then(|storage| storage.get_item(key))
            .map_err(|err| storage_error(&err))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        dom::local_storage()
            .and_then(|storage| storage.set_item(key, value))
            .map_err(|err| storage_error(&err))
    }
}

/// `window.location` and `window.history`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn location(&self) -> Result<Location, PlatformError> {
        let read = || -> Result<Location, JsValue> {
            let location = dom::window()?.location();
            Ok(Location {
                path: location.pathname()?,
                search: location.search()?,
                hash: location.hash()?,
            })
        };
        read().map_err(|err| PlatformError::Location(js_error_message(&err)))
    }

    fn push_state(&self, url: &str) -> Result<(), PlatformError> {
        dom::window()
            .and_then(|window| window.history())
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(url)))
            .map_err(|err| PlatformError::History(js_error_message(&err)))
    }

    fn navigate(&self, url: &str) -> Result<(), PlatformError> {
        dom::window()
            .and_then(|window| window.location().set_href(url))
            .map_err(|err| PlatformError::Navigation(js_error_message(&err)))
    }
}
