#![cfg(target_arch = "wasm32")]

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

mod browser_document_tests;
mod context_tests;
mod platform_tests;

/// Fresh container appended to `<body>` for one test.
pub fn sandbox(id: &str, html: &str) -> web_sys::Element {
    let doc = mitsutouge_web::dom::document().expect("document");
    if let Some(old) = doc.get_element_by_id(id) {
        old.remove();
    }
    let root = doc.create_element("div").expect("create sandbox");
    root.set_id(id);
    root.set_inner_html(html);
    doc.body()
        .expect("document body")
        .append_child(&root)
        .expect("append sandbox");
    root
}
