use crate::config::SwitcherConfig;
use crate::document::{Document, Selector};
use crate::error::DomError;
use crate::locale::Locale;
use crate::switcher::content::{decode_entities, resolve_pair};

/// Head elements carrying their own `data-ja`/`data-en` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaTarget {
    Title,
    Description,
    OgTitle,
    OgDescription,
    TwitterTitle,
    TwitterDescription,
}

impl MetaTarget {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Description,
        Self::OgTitle,
        Self::OgDescription,
        Self::TwitterTitle,
        Self::TwitterDescription,
    ];

    #[must_use]
    pub fn selector(self) -> Selector {
        let meta = Selector::tag("meta");
        match self {
            Self::Title => Selector::tag("title"),
            Self::Description => meta.equals("name", "description"),
            Self::OgTitle => meta.equals("property", "og:title"),
            Self::OgDescription => meta.equals("property", "og:description"),
            Self::TwitterTitle => meta.equals("name", "twitter:title"),
            Self::TwitterDescription => meta.equals("name", "twitter:description"),
        }
    }
}

/// Update title and description metadata. Targets without a usable value
/// keep their current text.
///
/// # Errors
///
/// Returns the first attribute failure.
pub fn update_metadata<D: Document>(doc: &D, locale: Locale, config: &SwitcherConfig) -> Result<usize, DomError> {
    let mut updated = 0;
    for target in MetaTarget::ALL {
        let Some(el) = doc.query_first(None, &target.selector()) else {
            continue;
        };
        let Some(value) = resolve_pair(doc, &el, locale, Locale::content_attr, config.content_policy)
        else {
            continue;
        };
        let value = decode_entities(&value);
        if target == MetaTarget::Title {
            doc.set_text_content(&el, &value);
        } else {
            doc.set_attribute(&el, "content", &value)?;
        }
        updated += 1;
    }
    Ok(updated)
}

/// Point the embedded map at the locale's URL. Returns whether the source
/// changed.
///
/// # Errors
///
/// Returns an error if the `src` attribute cannot be written.
pub fn switch_map<D: Document>(doc: &D, locale: Locale, config: &SwitcherConfig) -> Result<bool, DomError> {
    let iframe = doc.query_first(None, &Selector::tag("iframe").contains("src", &config.map_marker));
    let (Some(iframe), Some(url)) = (iframe, config.map_embeds.get(locale).as_deref()) else {
        return Ok(false);
    };
    if doc.attribute(&iframe, "src").as_deref() == Some(url) {
        return Ok(false);
    }
    doc.set_attribute(&iframe, "src", url)?;
    Ok(true)
}
