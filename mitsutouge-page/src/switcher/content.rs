use std::borrow::Cow;

use crate::config::{ContentPolicy, SwitcherConfig};
use crate::document::{Document, Selector};
use crate::error::DomError;
use crate::locale::Locale;

/// Decode entity-encoded markup once, e.g. `&lt;b&gt;` to `<b>`.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Pick the value of an attribute pair such as `data-ja`/`data-en`.
pub fn resolve_pair<D: Document>(
    doc: &D,
    el: &D::Element,
    locale: Locale,
    attr: fn(Locale) -> &'static str,
    policy: ContentPolicy,
) -> Option<String> {
    match policy {
        ContentPolicy::FallbackToPrimary => doc
            .non_empty_attribute(el, attr(locale))
            .or_else(|| doc.non_empty_attribute(el, attr(Locale::primary()))),
        ContentPolicy::RequireBothLocales => {
            let complete = Locale::ALL.iter().all(|l| doc.has_attribute(el, attr(*l)));
            if complete {
                doc.attribute(el, attr(locale))
            } else {
                None
            }
        }
    }
}

/// Swap the inner markup of every `[data-ja]` element.
///
/// # Errors
///
/// Returns the first attribute failure while mirroring image alt text.
pub fn swap_content<D: Document>(doc: &D, locale: Locale, config: &SwitcherConfig) -> Result<usize, DomError> {
    let mut swapped = 0;
    let bilingual = Selector::any().present(Locale::primary().content_attr());
    for el in doc.query_all(None, &bilingual) {
        let tag = doc.tag_name(&el);
        if tag == "meta" {
            continue;
        }
        let Some(content) = resolve_pair(doc, &el, locale, Locale::content_attr, config.content_policy)
        else {
            continue;
        };
        let decoded = decode_entities(&content);
        doc.set_inner_html(&el, &decoded);
        if config.mirror_image_alt && tag == "img" {
            doc.set_attribute(&el, "alt", &decoded)?;
        }
        swapped += 1;
    }
    Ok(swapped)
}

/// Update bilingual links: href from `data-href-*`, text from `data-*`, each
/// only when both locale values of that pair are present.
///
/// # Errors
///
/// Returns the first attribute failure.
pub fn swap_links<D: Document>(doc: &D, locale: Locale) -> Result<usize, DomError> {
    let links = Locale::ALL
        .iter()
        .map(|l| Selector::tag("a").present(l.href_attr()))
        .fold(Selector::default(), Selector::or);
    let mut updated = 0;
    for link in doc.query_all(None, &links) {
        let href = resolve_pair(doc, &link, locale, Locale::href_attr, ContentPolicy::RequireBothLocales);
        if let Some(href) = &href {
            doc.set_attribute(&link, "href", href)?;
        }
        let text = resolve_pair(doc, &link, locale, Locale::content_attr, ContentPolicy::RequireBothLocales);
        if let Some(text) = &text {
            doc.set_inner_html(&link, &decode_entities(text));
        }
        if href.is_some() || text.is_some() {
            updated += 1;
        }
    }
    Ok(updated)
}
