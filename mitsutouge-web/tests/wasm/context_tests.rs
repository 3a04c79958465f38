use mitsutouge_page::{Document, Locale};
use mitsutouge_web::{AppContext, boot};
use wasm_bindgen_test::*;

use crate::sandbox;

fn booted() -> std::rc::Rc<AppContext> {
    sandbox(
        "context-sandbox",
        r#"<p id="greeting" data-ja="こんにちは" data-en="&lt;b&gt;Hello&lt;/b&gt;">こんにちは</p>"#,
    );
    boot().expect("boot")
}

#[wasm_bindgen_test]
fn boot_installs_widget_and_live_region() {
    let ctx = booted();
    let doc = ctx.doc();
    assert!(doc.element_by_id("lang-ja").is_some());
    assert!(doc.element_by_id("lang-en").is_some());
    let region = doc.element_by_id("a11y-announcer").expect("live region");
    assert_eq!(doc.attribute(&region, "aria-live").as_deref(), Some("polite"));
}

#[wasm_bindgen_test]
fn announcements_reach_the_live_region() {
    let ctx = booted();
    ctx.announce("English");
    let region = ctx.doc().element_by_id("a11y-announcer").expect("live region");
    assert_eq!(ctx.doc().text_content(&region), "English");
}

#[wasm_bindgen_test]
fn switching_decodes_markup_once() {
    let ctx = booted();
    let report = ctx.switch_to(Locale::En).expect("switch");
    assert_eq!(report.locale, Locale::En);
    let greeting = ctx.doc().element_by_id("greeting").expect("greeting");
    assert_eq!(greeting.inner_html(), "<b>Hello</b>");
    assert!(ctx.switch_code("fr").is_err());
    ctx.switch_to(Locale::Ja).expect("switch back");
    assert_eq!(greeting.inner_html(), "こんにちは");
}
