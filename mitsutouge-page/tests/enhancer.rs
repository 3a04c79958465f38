use std::collections::BTreeSet;

use mitsutouge_page::a11y::{Binding, Key, KeyPress, activate_aria_button, reveal, toggle_disclosure};
use mitsutouge_page::{A11yConfig, Document, FocusTrap, KeyOutcome, Page, PageFixture, Selector, enhance};

fn tourism_page() -> Page {
    let fixture = PageFixture::from_json(include_str!("../fixtures/tourism.json"))
        .expect("fixture should parse");
    Page::from_fixture(&fixture)
}

#[test]
fn external_links_open_in_new_tab() {
    let page = tourism_page();
    enhance(&page, &A11yConfig::default());
    let external = page.query_all(None, &Selector::tag("a").prefix("href", "http"));
    assert_eq!(external.len(), 1);
    for link in external {
        let rel = page.attribute(&link, "rel").unwrap_or_default();
        assert!(rel.split_whitespace().any(|r| r == "noopener"));
        assert_eq!(page.attribute(&link, "target").as_deref(), Some("_blank"));
    }
    let internal = page
        .query_first(None, &Selector::tag("a").equals("href", "/access/ja"))
        .unwrap();
    assert_eq!(page.attribute(&internal, "target"), None);
}

#[test]
fn images_without_alt_get_fallback() {
    let page = tourism_page();
    let missing: Vec<_> = page
        .query_all(None, &Selector::tag("img"))
        .into_iter()
        .filter(|img| page.attribute(img, "alt").is_none())
        .collect();
    assert_eq!(missing.len(), 3);
    enhance(&page, &A11yConfig::default());
    for img in missing {
        assert_eq!(page.attribute(&img, "alt").as_deref(), Some("Image"));
    }
}

#[test]
fn every_unlabelled_control_gets_exactly_one_label() {
    let page = tourism_page();
    let result = enhance(&page, &A11yConfig::default());
    assert_eq!(result.counts.labels_created, 3);

    let form = page.query_first(None, &Selector::tag("form")).unwrap();
    let controls = page.query_all(Some(&form), &Selector::tags(&["input", "textarea", "select"]));
    let ids: Vec<String> = controls
        .iter()
        .map(|c| page.attribute(c, "id").expect("every control has an id"))
        .collect();
    let unique: BTreeSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());

    for (control, id) in controls.iter().zip(&ids) {
        let labels = page.query_all(Some(&form), &Selector::tag("label").equals("for", id));
        let hidden = page.attribute(control, "type").as_deref() == Some("hidden");
        assert_eq!(labels.len(), usize::from(!hidden), "labels for {id}");
    }
}

#[test]
fn enhancement_is_idempotent() {
    let page = tourism_page();
    let config = A11yConfig::default();
    enhance(&page, &config);
    let once = page.serialize();
    let second = enhance(&page, &config);
    assert_eq!(page.serialize(), once);
    assert!(!second.counts.skip_link_inserted);
    assert_eq!(second.counts.labels_created, 0);
}

#[test]
fn skip_link_targets_tagged_main() {
    let page = tourism_page();
    enhance(&page, &A11yConfig::default());
    let body = page.body().unwrap();
    let first = page.children(body)[0];
    assert_eq!(page.attribute(&first, "href").as_deref(), Some("#main-content"));
    let main = page.element_by_id("main-content").unwrap();
    assert_eq!(page.tag_name(&main), "main");
    assert_eq!(page.attribute(&main, "role").as_deref(), Some("main"));
}

#[test]
fn icon_button_inherits_title() {
    let page = tourism_page();
    enhance(&page, &A11yConfig::default());
    let button = page
        .query_first(None, &Selector::tag("button").equals("title", "メニューを開く"))
        .unwrap();
    assert_eq!(page.attribute(&button, "aria-label").as_deref(), Some("メニューを開く"));
}

#[test]
fn bindings_drive_keyboard_and_lazy_loading() {
    let page = tourism_page();
    let config = A11yConfig::default();
    let result = enhance(&page, &config);
    assert_eq!(result.bindings.len(), 3);

    for binding in &result.bindings {
        match binding {
            Binding::Disclosure { summary: _, details } => {
                let out = toggle_disclosure(&page, details, KeyPress::new(Key::Enter));
                assert_eq!(out, KeyOutcome::Handled);
                assert!(page.has_attribute(details, "open"));
            }
            Binding::AriaButton(el) => {
                activate_aria_button(&page, el, KeyPress::new(Key::Space));
                assert_eq!(page.clicks(*el), 1);
            }
            Binding::LazyImage(img) => {
                assert!(reveal(&page, img, true, &config));
                assert_eq!(page.attribute(img, "src").as_deref(), Some("/images/onsen.jpg"));
                assert!(!page.has_class(img, "lazy"));
                assert!(page.has_class(img, "rounded-lg"));
            }
        }
    }
}

#[test]
fn announcer_region_is_appended_last() {
    let page = tourism_page();
    let result = enhance(&page, &A11yConfig::default());
    let announcer = result.announcer.expect("announcer installed");
    let body = page.body().unwrap();
    assert_eq!(page.children(body).last(), Some(announcer.region()));
    let pending = announcer.announce(&page, "English");
    assert_eq!(page.text_content(announcer.region()), "English");
    assert!(announcer.clear(&page, pending));
}

#[test]
fn focus_trap_cycles_dialog_buttons() {
    let page = tourism_page();
    let dialog = page.element_by_id("dialog").unwrap();
    let items = page.children(dialog);
    let (first, last) = (items[0], items[2]);
    let trap = FocusTrap::new(dialog);

    assert!(page.focus(&last));
    assert_eq!(trap.handle_key(&page, KeyPress::new(Key::Tab)), KeyOutcome::Handled);
    assert_eq!(page.active_element(), Some(first));

    assert_eq!(trap.handle_key(&page, KeyPress::shifted(Key::Tab)), KeyOutcome::Handled);
    assert_eq!(page.active_element(), Some(last));
}
