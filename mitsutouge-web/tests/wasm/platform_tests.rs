use mitsutouge_page::{Navigator, PreferenceStore};
use mitsutouge_web::{BrowserNavigator, LocalStoragePreferences};
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn local_storage_keeps_preferences() {
    let prefs = LocalStoragePreferences;
    prefs.store("mitsutouge.test", "en").expect("store");
    assert_eq!(prefs.load("mitsutouge.test").expect("load").as_deref(), Some("en"));
}

#[wasm_bindgen_test]
fn push_state_updates_location_path() {
    let nav = BrowserNavigator;
    let before = nav.location().expect("location");
    nav.push_state("/tour/en").expect("push");
    assert_eq!(nav.location().expect("location").path, "/tour/en");
    nav.push_state(&before.href()).expect("restore");
}
