use std::collections::BTreeSet;

use anyhow::{Result, ensure};
use mitsutouge_page::switcher::decode_entities;
use mitsutouge_page::{
    Announcer, Document, FocusTrap, Key, KeyPress, LanguageSwitcher, Locale, LocaleSourceKind,
    MemoryNavigator, MemoryPreferences, Page, Selector, enhance,
};

use super::ScenarioCtx;

fn switcher(ctx: &ScenarioCtx, url: &str) -> LanguageSwitcher {
    LanguageSwitcher::from_config(
        ctx.config.switcher.clone(),
        MemoryPreferences::new(),
        MemoryNavigator::new(url),
    )
}

pub fn external_links(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    enhance(&page, &ctx.config.a11y);
    for link in page.query_all(None, &Selector::tag("a").prefix("href", "http")) {
        let href = page.attribute(&link, "href").unwrap_or_default();
        let rel = page.attribute(&link, "rel").unwrap_or_default();
        ensure!(
            rel.split_whitespace().any(|r| r == "noopener"),
            "{href}: rel `{rel}` lacks noopener"
        );
        ensure!(
            page.attribute(&link, "target").as_deref() == Some("_blank"),
            "{href}: target is not _blank"
        );
    }
    Ok(())
}

pub fn image_alt(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    let missing: Vec<_> = page
        .query_all(None, &Selector::tag("img"))
        .into_iter()
        .filter(|img| page.non_empty_attribute(img, "alt").is_none())
        .collect();
    enhance(&page, &ctx.config.a11y);
    for img in &missing {
        let alt = page.attribute(img, "alt");
        ensure!(
            alt.as_deref() == Some(ctx.config.a11y.image_alt_fallback.as_str()),
            "image without alt got {alt:?}"
        );
    }
    if ctx.verbose {
        println!("   {} images received fallback alt text", missing.len());
    }
    Ok(())
}

pub fn form_labels(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    enhance(&page, &ctx.config.a11y);
    let controls = Selector::tags(&["input", "textarea", "select"]);
    for form in page.query_all(None, &Selector::tag("form")) {
        let mut ids = BTreeSet::new();
        for control in page.query_all(Some(&form), &controls) {
            if page.attribute(&control, "type").as_deref() == Some("hidden") {
                continue;
            }
            let Some(id) = page.non_empty_attribute(&control, "id") else {
                anyhow::bail!("<{}> has no id", page.tag_name(&control));
            };
            ensure!(ids.insert(id.clone()), "id `{id}` is used twice in one form");
            let labels = page.query_all(Some(&form), &Selector::tag("label").equals("for", &id));
            ensure!(labels.len() == 1, "`{id}` has {} labels", labels.len());
        }
    }
    Ok(())
}

pub fn enhance_idempotent(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    enhance(&page, &ctx.config.a11y);
    let once = page.serialize();
    let second = enhance(&page, &ctx.config.a11y);
    ensure!(page.serialize() == once, "second enhancement changed the page");
    ensure!(!second.counts.skip_link_inserted, "skip link inserted twice");
    Ok(())
}

pub fn switch_idempotent(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    let mut switcher = switcher(ctx, "/");
    switcher.init(&page);
    switcher.switch_language(&page, Locale::En);
    let once = page.serialize();
    let report = switcher.switch_language(&page, Locale::En);
    ensure!(report.is_clean(), "second switch failed: {:?}", report.failures());
    ensure!(page.serialize() == once, "second switch to en changed the page");
    Ok(())
}

pub fn switch_round_trip(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    let mut switcher = switcher(ctx, "/");
    let initial = switcher.init(&page);
    ensure!(initial.locale == Locale::Ja, "fresh page started in {}", initial.locale);
    let ja = page.serialize();
    switcher.switch_language(&page, Locale::En);
    switcher.switch_language(&page, Locale::Ja);
    ensure!(page.serialize() == ja, "switching en then ja did not restore the page");
    Ok(())
}

fn carries_markup(value: &str) -> bool {
    value.contains('<') || value.contains('&')
}

pub fn markup_decoding(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    let mut switcher = switcher(ctx, "/");
    switcher.switch_language(&page, Locale::En);

    let mut checked = 0;
    for el in page.query_all(None, &Selector::any().present("data-en")) {
        let tag = page.tag_name(&el);
        if matches!(tag.as_str(), "meta" | "title" | "img") || page.has_attribute(&el, "data-href-en") {
            continue;
        }
        let Some(value) = page.non_empty_attribute(&el, "data-en") else {
            continue;
        };
        if !carries_markup(&value) || !page.has_attribute(&el, "data-ja") {
            continue;
        }
        let expected = decode_entities(&value);
        let actual = page.inner_html(el);
        ensure!(
            actual.as_deref() == Some(expected.as_ref()),
            "<{tag}> rendered {actual:?}, expected {expected:?}"
        );
        checked += 1;
    }
    if ctx.verbose {
        println!("   {checked} markup-bearing elements decoded");
    }
    Ok(())
}

pub fn initial_locale(ctx: &ScenarioCtx) -> Result<()> {
    let mut url_config = ctx.config.switcher.clone();
    url_config.locale_source = LocaleSourceKind::UrlPathSuffix;
    let from_url = LanguageSwitcher::from_config(
        url_config,
        MemoryPreferences::new(),
        MemoryNavigator::new("/tour/en"),
    );
    ensure!(from_url.current() == Locale::En, "/tour/en resolved to {}", from_url.current());

    let mut stored_config = ctx.config.switcher.clone();
    stored_config.locale_source = LocaleSourceKind::StoredPreference;
    let prefs = MemoryPreferences::with_value(&stored_config.storage_key, "en");
    let from_store = LanguageSwitcher::from_config(stored_config, prefs, MemoryNavigator::new("/"));
    ensure!(
        from_store.current() == Locale::En,
        "stored `en` resolved to {}",
        from_store.current()
    );

    let unset = switcher(ctx, "/");
    ensure!(unset.current() == Locale::Ja, "no preference resolved to {}", unset.current());
    Ok(())
}

pub fn focus_trap(_ctx: &ScenarioCtx) -> Result<()> {
    let page = Page::new();
    let dialog = page.add(page.body_id(), "div").attr("role", "dialog").id();
    let a = page.add(dialog, "button").text("A").id();
    let _b = page.add(dialog, "a").attr("href", "#b").text("B").id();
    let c = page.add(dialog, "button").text("C").id();
    let trap = FocusTrap::new(dialog);

    ensure!(page.focus(&c), "last element not focusable");
    trap.handle_key(&page, KeyPress::new(Key::Tab));
    ensure!(page.active_element() == Some(a), "Tab on last did not wrap to first");
    trap.handle_key(&page, KeyPress::shifted(Key::Tab));
    ensure!(page.active_element() == Some(c), "Shift+Tab on first did not wrap to last");
    Ok(())
}

pub fn announcer(ctx: &ScenarioCtx) -> Result<()> {
    let page = ctx.page();
    let announcer = Announcer::install(&page, &ctx.config.a11y)?;
    let stale = announcer.announce(&page, "日本語");
    let fresh = announcer.announce(&page, "English");
    ensure!(!announcer.clear(&page, stale), "stale clear erased a newer message");
    ensure!(page.text_content(announcer.region()) == "English", "newer message lost");
    ensure!(announcer.clear(&page, fresh), "current clear was ignored");
    ensure!(page.text_content(announcer.region()).is_empty(), "region not emptied");
    Ok(())
}
