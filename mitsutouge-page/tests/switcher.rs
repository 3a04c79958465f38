use std::rc::Rc;

use mitsutouge_page::switcher::SwitchStep;
use mitsutouge_page::{
    Document, LanguageSwitcher, Locale, LocaleSource, MemoryNavigator, MemoryPreferences, Page,
    PageFixture, Selector, SwitcherConfig,
};

fn tourism_page() -> Page {
    let fixture = PageFixture::from_json(include_str!("../fixtures/tourism.json"))
        .expect("fixture should parse");
    Page::from_fixture(&fixture)
}

fn stored_switcher(prefs: Rc<MemoryPreferences>) -> LanguageSwitcher {
    let config = SwitcherConfig::stored_preference();
    let source = LocaleSource::stored(prefs, &config.storage_key);
    LanguageSwitcher::new(config, source)
}

fn url_switcher(nav: Rc<MemoryNavigator>) -> LanguageSwitcher {
    LanguageSwitcher::new(SwitcherConfig::url_path_suffix(), LocaleSource::url_path(nav))
}

#[test]
fn switching_twice_is_idempotent() {
    for mut switcher in [
        stored_switcher(Rc::new(MemoryPreferences::new())),
        url_switcher(Rc::new(MemoryNavigator::new("/tour"))),
    ] {
        let page = tourism_page();
        switcher.init(&page);
        switcher.switch_language(&page, Locale::En);
        let once = page.serialize();
        let report = switcher.switch_language(&page, Locale::En);
        assert!(report.is_clean());
        assert_eq!(page.serialize(), once);
    }
}

#[test]
fn round_trip_restores_japanese_state() {
    let page = tourism_page();
    let mut switcher = stored_switcher(Rc::new(MemoryPreferences::new()));
    let initial = switcher.init(&page);
    assert_eq!(initial.locale, Locale::Ja);
    let ja_state = page.serialize();

    switcher.switch_language(&page, Locale::En);
    assert_ne!(page.serialize(), ja_state);
    switcher.switch_language(&page, Locale::Ja);
    assert_eq!(page.serialize(), ja_state);
}

#[test]
fn markup_is_decoded_not_double_escaped() {
    let page = tourism_page();
    let mut switcher = stored_switcher(Rc::new(MemoryPreferences::new()));
    switcher.switch_language(&page, Locale::En);

    let greeting = page
        .query_first(None, &Selector::tag("p").equals("data-en", "<b>Hello</b>"))
        .unwrap();
    assert_eq!(page.inner_html(greeting).as_deref(), Some("<b>Hello</b>"));
    assert_eq!(page.text_content(&greeting), "Hello");

    let heading = page.query_first(None, &Selector::tag("h1")).unwrap();
    assert_eq!(
        page.inner_html(heading).as_deref(),
        Some("Welcome to <span>Mitsutouge</span>")
    );
}

#[test]
fn stored_preference_selects_initial_locale() {
    let prefs = Rc::new(MemoryPreferences::with_value("selectedLanguage", "en"));
    let mut switcher = stored_switcher(Rc::clone(&prefs));
    assert_eq!(switcher.current(), Locale::En);

    let page = tourism_page();
    let report = switcher.init(&page);
    assert_eq!(report.locale, Locale::En);
    let root = page.root().unwrap();
    assert_eq!(page.attribute(&root, "lang").as_deref(), Some("en"));

    switcher.switch_language(&page, Locale::Ja);
    assert_eq!(prefs.get("selectedLanguage").as_deref(), Some("ja"));
}

#[test]
fn url_suffix_selects_initial_locale_and_rewrites() {
    let nav = Rc::new(MemoryNavigator::new("/tour/en?from=top#map"));
    let mut switcher = url_switcher(Rc::clone(&nav));
    assert_eq!(switcher.current(), Locale::En);

    let page = tourism_page();
    switcher.init(&page);
    assert!(nav.pushed().is_empty());

    switcher.switch_language(&page, Locale::Ja);
    assert_eq!(nav.href(), "/tour/ja?from=top#map");
}

#[test]
fn fallback_variant_shows_ja_for_ja_only_content() {
    let page = tourism_page();
    let only_ja = page
        .query_first(None, &Selector::tag("p").equals("data-ja", "日本語のみの案内です"))
        .unwrap();

    let mut stored = stored_switcher(Rc::new(MemoryPreferences::new()));
    stored.switch_language(&page, Locale::En);
    assert_eq!(page.inner_html(only_ja).as_deref(), Some("日本語のみの案内です"));

    let strict_page = tourism_page();
    let strict_only_ja = strict_page
        .query_first(None, &Selector::tag("p").equals("data-ja", "日本語のみの案内です"))
        .unwrap();
    let mut strict = url_switcher(Rc::new(MemoryNavigator::new("/")));
    strict.switch_language(&strict_page, Locale::En);
    assert_eq!(strict_page.inner_html(strict_only_ja), None);
    assert_eq!(strict_page.text_content(&strict_only_ja), "日本語のみの案内です");
}

#[test]
fn metadata_map_and_buttons_follow_locale() {
    let page = tourism_page();
    let config = SwitcherConfig::stored_preference();
    let mut switcher = stored_switcher(Rc::new(MemoryPreferences::new()));
    switcher.init(&page);
    let report = switcher.switch_language(&page, Locale::En);

    let title = page.query_first(None, &Selector::tag("title")).unwrap();
    assert_eq!(
        page.text_content(&title),
        "Mitsutouge | Mountain Trips with Views of Mt. Fuji"
    );
    let desc = page
        .query_first(None, &Selector::tag("meta").equals("name", "description"))
        .unwrap();
    assert_eq!(
        page.attribute(&desc, "content").as_deref(),
        Some("Hiking & hot springs starting from Mitsutouge Station")
    );
    let og_desc = page
        .query_first(None, &Selector::tag("meta").equals("property", "og:description"))
        .unwrap();
    assert_eq!(page.attribute(&og_desc, "content").as_deref(), Some("富士山の絶景スポット"));
    assert_eq!(report.step(SwitchStep::Metadata).map(|s| s.applied), Some(6));

    let iframe = page.query_first(None, &Selector::tag("iframe")).unwrap();
    assert_eq!(page.attribute(&iframe, "src"), config.map_embeds.en.clone());

    let en = page.element_by_id("lang-en").unwrap();
    let ja = page.element_by_id("lang-ja").unwrap();
    assert_eq!(page.attribute(&en, "class"), Some(config.buttons.active.clone()));
    assert_eq!(page.attribute(&ja, "class"), Some(config.buttons.inactive.clone()));
}

#[test]
fn url_variant_switches_bilingual_links() {
    let page = tourism_page();
    let mut switcher = url_switcher(Rc::new(MemoryNavigator::new("/")));
    let report = switcher.switch_language(&page, Locale::En);
    assert_eq!(report.step(SwitchStep::Links).map(|s| s.applied), Some(1));

    let link = page
        .query_first(None, &Selector::tag("a").present("data-href-en"))
        .unwrap();
    assert_eq!(page.attribute(&link, "href").as_deref(), Some("/access/en"));
    assert_eq!(page.text_content(&link), "Access");
    assert!(page.element_by_id("lang-en").is_none());
}

#[test]
fn rejected_history_update_navigates_instead() {
    let nav = Rc::new(MemoryNavigator::new("/tour/ja"));
    nav.set_reject_push(true);
    let page = tourism_page();
    let mut switcher = url_switcher(Rc::clone(&nav));
    let report = switcher.switch_language(&page, Locale::En);
    assert!(report.is_clean());
    assert_eq!(nav.navigations(), vec!["/tour/en".to_string()]);
}

#[test]
fn url_variant_keeps_markup_in_bilingual_link_text() {
    let page = Page::new();
    let link = page
        .add(page.body_id(), "a")
        .attr("href", "/ja/access")
        .attr("data-href-ja", "/ja/access")
        .attr("data-href-en", "/en/access")
        .attr("data-ja", "<b>アクセス</b>")
        .attr("data-en", "<b>Access</b>")
        .id();
    let mut switcher = url_switcher(Rc::new(MemoryNavigator::new("/tour")));

    let report = switcher.switch_language(&page, Locale::En);
    assert!(report.is_clean());
    assert_eq!(page.attribute(&link, "href").as_deref(), Some("/en/access"));
    assert_eq!(page.inner_html(link).as_deref(), Some("<b>Access</b>"));
    assert_eq!(page.text_content(&link), "Access");
    assert!(!page.serialize().contains("&lt;b&gt;"));

    switcher.switch_language(&page, Locale::Ja);
    assert_eq!(page.inner_html(link).as_deref(), Some("<b>アクセス</b>"));
}
