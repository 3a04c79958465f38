use crate::config::A11yConfig;
use crate::document::{Document, Selector};

/// Images waiting for their deferred source.
#[must_use]
pub fn lazy_images<D: Document>(doc: &D, config: &A11yConfig) -> Vec<D::Element> {
    doc.query_all(None, &Selector::tag("img").present(&config.lazy_source_attr))
}

/// Promote the deferred source of an image that became visible.
///
/// Returns `true` when the image was revealed and observation should stop.
pub fn reveal<D: Document>(doc: &D, img: &D::Element, intersecting: bool, config: &A11yConfig) -> bool {
    if !intersecting {
        return false;
    }
    if let Some(src) = doc.attribute(img, &config.lazy_source_attr) {
        if let Err(err) = doc.set_attribute(img, "src", &src) {
            log::warn!("lazy image source update failed: {err}");
            return false;
        }
    }
    if let Err(err) = doc.remove_class(img, &config.lazy_class) {
        log::warn!("lazy class removal failed: {err}");
    }
    true
}
