use mitsutouge_page::a11y::{backfill_form_labels, harden_external_links};
use mitsutouge_page::{A11yConfig, Document, FocusTrap, Key, KeyOutcome, KeyPress, Selector};
use mitsutouge_web::BrowserDocument;
use mitsutouge_web::bindings::observe_lazy_images;
use wasm_bindgen_test::*;

use crate::sandbox;

fn document() -> BrowserDocument {
    BrowserDocument::current().expect("browser document")
}

#[wasm_bindgen_test]
fn selectors_render_to_valid_css() {
    let root = sandbox(
        "selector-sandbox",
        r#"<a href="https://example.com">x</a><a href="/local">y</a><span tabindex="-1"></span>"#,
    );
    let doc = document();
    let external = doc.query_all(Some(&root), &Selector::tag("a").prefix("href", "http"));
    assert_eq!(external.len(), 1);
    let focusable = doc.query_all(
        Some(&root),
        &Selector::any().present("tabindex").not_equals("tabindex", "-1"),
    );
    assert!(focusable.is_empty());
}

#[wasm_bindgen_test]
fn external_links_are_hardened_in_the_live_dom() {
    let root = sandbox(
        "links-sandbox",
        r#"<a id="ext" href="https://www.fujikyu-railway.jp/">Fujikyu</a>"#,
    );
    let doc = document();
    assert!(harden_external_links(&doc).expect("harden") >= 1);
    let link = doc.query_first(Some(&root), &Selector::tag("a")).expect("link");
    assert_eq!(doc.attribute(&link, "target").as_deref(), Some("_blank"));
    assert!(doc.attribute(&link, "rel").unwrap_or_default().contains("noopener"));
}

#[wasm_bindgen_test]
fn labels_are_inserted_before_controls() {
    let root = sandbox(
        "form-sandbox",
        r#"<form><input type="text" placeholder="Name"></form>"#,
    );
    let doc = document();
    backfill_form_labels(&doc).expect("labels");
    let input = doc.query_first(Some(&root), &Selector::tag("input")).expect("input");
    let id = doc.attribute(&input, "id").expect("synthesized id");
    let label = doc
        .query_first(Some(&root), &Selector::tag("label").equals("for", &id))
        .expect("label");
    assert_eq!(doc.text_content(&label), "Name");
}

#[wasm_bindgen_test]
fn focus_trap_wraps_in_the_browser() {
    let root = sandbox(
        "trap-sandbox",
        r#"<button id="trap-a">A</button><a id="trap-b" href="#b">B</a><button id="trap-c">C</button>"#,
    );
    let doc = document();
    let first = doc.element_by_id("trap-a").expect("first");
    let last = doc.element_by_id("trap-c").expect("last");
    let trap = FocusTrap::new(root);

    assert!(doc.focus(&last));
    assert_eq!(trap.handle_key(&doc, KeyPress::new(Key::Tab)), KeyOutcome::Handled);
    assert_eq!(doc.active_element(), Some(first.clone()));
    assert_eq!(trap.handle_key(&doc, KeyPress::shifted(Key::Tab)), KeyOutcome::Handled);
    assert_eq!(doc.active_element(), Some(last));
}

#[wasm_bindgen_test]
fn lazy_images_are_observed_when_the_browser_supports_it() {
    let root = sandbox(
        "lazy-sandbox",
        r#"<img class="lazy" data-src="/img/mitsutouge-summit.jpg" alt="三ツ峠山頂">"#,
    );
    let doc = document();
    let config = A11yConfig::default();
    let images = mitsutouge_page::a11y::lazy_images(&doc, &config);
    assert!(images.iter().any(|img| root.contains(Some(img))));
    assert!(observe_lazy_images(&doc, &images, &config).expect("observer"));
    assert!(observe_lazy_images(&doc, &[], &config).expect("no images"));
}
