//! Accessibility remediation applied once the page has loaded.
//!
//! [`enhance`] mutates the document directly and hands back the keyboard and
//! visibility [`Binding`]s a host must wire to browser events, together with
//! the live-region [`Announcer`].

mod announce;
mod focus;
mod forms;
mod keys;
mod lazy;

use serde::Serialize;

use crate::config::A11yConfig;
use crate::document::{Document, Selector};
use crate::error::DomError;

pub use announce::{Announcer, PendingClear};
pub use focus::{FocusTrap, focusable_selector, set_focus};
pub use forms::backfill_form_labels;
pub use keys::{Key, KeyOutcome, KeyPress, activate_aria_button, toggle_disclosure};
pub use lazy::{lazy_images, reveal};

/// Event wiring requested by [`enhance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<E> {
    /// Keydown on `summary` toggles `details`.
    Disclosure { summary: E, details: E },
    /// Keydown on a `role="button"` element clicks it.
    AriaButton(E),
    /// Observe the image and [`reveal`] it on first intersection.
    LazyImage(E),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceCounts {
    pub external_links: usize,
    pub disclosures: usize,
    pub aria_buttons: usize,
    pub skip_link_inserted: bool,
    pub main_landmark: bool,
    pub labels_created: usize,
    pub aria_labels: usize,
    pub image_alts: usize,
    pub lazy_images: usize,
    pub failures: usize,
}

#[derive(Debug)]
pub struct Enhancement<E> {
    pub counts: EnhanceCounts,
    pub bindings: Vec<Binding<E>>,
    pub announcer: Option<Announcer<E>>,
}

fn soft<T>(step: &str, result: Result<T, DomError>, failures: &mut usize) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("accessibility step `{step}` failed: {err}");
            *failures += 1;
            None
        }
    }
}

/// Run every remediation step. Steps are independent: a failing step is
/// logged and counted, and the others still run.
pub fn enhance<D: Document>(doc: &D, config: &A11yConfig) -> Enhancement<D::Element> {
    let mut counts = EnhanceCounts::default();
    let mut bindings = Vec::new();
    let mut failures = 0;

    counts.external_links =
        soft("external-links", harden_external_links(doc), &mut failures).unwrap_or_default();

    let disclosures = disclosure_bindings(doc);
    counts.disclosures = disclosures.len();
    bindings.extend(disclosures);

    let buttons = aria_button_bindings(doc);
    counts.aria_buttons = buttons.len();
    bindings.extend(buttons);

    counts.skip_link_inserted =
        soft("skip-link", insert_skip_link(doc, config), &mut failures).unwrap_or_default();
    counts.main_landmark =
        soft("main-landmark", tag_main_landmark(doc, config), &mut failures).unwrap_or_default();
    counts.labels_created =
        soft("form-labels", backfill_form_labels(doc), &mut failures).unwrap_or_default();
    counts.aria_labels =
        soft("aria-labels", backfill_aria_labels(doc), &mut failures).unwrap_or_default();
    counts.image_alts =
        soft("image-alt", backfill_image_alt(doc, config), &mut failures).unwrap_or_default();

    let lazy = lazy_images(doc, config);
    counts.lazy_images = lazy.len();
    bindings.extend(lazy.into_iter().map(Binding::LazyImage));

    let announcer = soft("announcer", Announcer::install(doc, config), &mut failures);
    counts.failures = failures;

    log::debug!("accessibility enhancement: {counts:?}");
    Enhancement {
        counts,
        bindings,
        announcer,
    }
}

/// `rel="noopener"` and `target="_blank"` on every `http(s)` link.
///
/// # Errors
///
/// Returns the first attribute failure.
pub fn harden_external_links<D: Document>(doc: &D) -> Result<usize, DomError> {
    let links = doc.query_all(None, &Selector::tag("a").prefix("href", "http"));
    for link in &links {
        doc.set_attribute(link, "rel", "noopener")?;
        doc.set_attribute(link, "target", "_blank")?;
    }
    Ok(links.len())
}

pub fn disclosure_bindings<D: Document>(doc: &D) -> Vec<Binding<D::Element>> {
    doc.query_all(None, &Selector::tag("details"))
        .into_iter()
        .filter_map(|details| {
            doc.query_first(Some(&details), &Selector::tag("summary"))
                .map(|summary| Binding::Disclosure { summary, details })
        })
        .collect()
}

pub fn aria_button_bindings<D: Document>(doc: &D) -> Vec<Binding<D::Element>> {
    doc.query_all(None, &Selector::any().equals("role", "button"))
        .into_iter()
        .map(Binding::AriaButton)
        .collect()
}

/// Insert the skip link as the first child of `<body>`.
///
/// Returns `false` when body already opens with a link to the main content.
/// Other links to `#main-content` further down the page do not count.
///
/// # Errors
///
/// Returns an error if the link cannot be created or inserted.
pub fn insert_skip_link<D: Document>(doc: &D, config: &A11yConfig) -> Result<bool, DomError> {
    let target = format!("#{}", config.main_content_id);
    let body = doc.body().ok_or(DomError::Detached)?;
    let present = doc.first_child(&body).is_some_and(|first| {
        doc.tag_name(&first) == "a" && doc.attribute(&first, "href").as_deref() == Some(target.as_str())
    });
    if present {
        return Ok(false);
    }
    let link = doc.create_element("a")?;
    doc.set_attribute(&link, "href", &target)?;
    doc.set_attribute(&link, "class", &config.skip_link_class)?;
    doc.set_text_content(&link, &config.skip_link_text);
    doc.prepend_child(&body, &link)?;
    Ok(true)
}

/// Mark the first `<main>`, else `#top`, as the skip link target.
///
/// # Errors
///
/// Returns an error if the attributes cannot be set.
pub fn tag_main_landmark<D: Document>(doc: &D, config: &A11yConfig) -> Result<bool, DomError> {
    let Some(main) = doc
        .query_first(None, &Selector::tag("main"))
        .or_else(|| doc.element_by_id("top"))
    else {
        return Ok(false);
    };
    doc.set_attribute(&main, "id", &config.main_content_id)?;
    doc.set_attribute(&main, "role", "main")?;
    Ok(true)
}

/// Copy `title` into `aria-label` on interactive elements that have no text
/// and no label of their own.
///
/// # Errors
///
/// Returns the first attribute failure.
pub fn backfill_aria_labels<D: Document>(doc: &D) -> Result<usize, DomError> {
    let interactive = Selector::tags(&["button", "a", "input", "textarea", "select"]);
    let mut labelled = 0;
    for el in doc.query_all(None, &interactive) {
        if doc.non_empty_attribute(&el, "aria-label").is_some()
            || !doc.text_content(&el).trim().is_empty()
        {
            continue;
        }
        if let Some(title) = doc.non_empty_attribute(&el, "title") {
            doc.set_attribute(&el, "aria-label", &title)?;
            labelled += 1;
        }
    }
    Ok(labelled)
}

/// Give images without alt text the configured fallback.
///
/// # Errors
///
/// Returns the first attribute failure.
pub fn backfill_image_alt<D: Document>(doc: &D, config: &A11yConfig) -> Result<usize, DomError> {
    let mut filled = 0;
    for img in doc.query_all(None, &Selector::tag("img")) {
        if doc.non_empty_attribute(&img, "alt").is_none() {
            doc.set_attribute(&img, "alt", &config.image_alt_fallback)?;
            filled += 1;
        }
    }
    Ok(filled)
}
