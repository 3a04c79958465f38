use std::cell::Cell;
use std::time::Duration;

use crate::config::A11yConfig;
use crate::document::Document;
use crate::error::DomError;

/// A clear the host must run once `delay` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingClear {
    generation: u64,
    pub delay: Duration,
}

/// Polite live region that assistive technology reads aloud.
#[derive(Debug)]
pub struct Announcer<E> {
    region: E,
    clear_after: Duration,
    generation: Cell<u64>,
}

impl<E: Clone + PartialEq> Announcer<E> {
    /// Reuse the page's live region or append a new one to `<body>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be created or attached.
    pub fn install<D: Document<Element = E>>(doc: &D, config: &A11yConfig) -> Result<Self, DomError> {
        let region = match doc.element_by_id(&config.announcer_id) {
            Some(existing) => existing,
            None => {
                let body = doc.body().ok_or(DomError::Detached)?;
                let region = doc.create_element("div")?;
                doc.set_attribute(&region, "id", &config.announcer_id)?;
                doc.set_attribute(&region, "aria-live", "polite")?;
                doc.set_attribute(&region, "aria-atomic", "true")?;
                doc.set_attribute(&region, "class", &config.announcer_class)?;
                doc.append_child(&body, &region)?;
                region
            }
        };
        Ok(Self {
            region,
            clear_after: Duration::from_millis(u64::from(config.announce_clear_ms)),
            generation: Cell::new(0),
        })
    }

    pub const fn region(&self) -> &E {
        &self.region
    }

    /// Write `message` into the region.
    pub fn announce<D: Document<Element = E>>(&self, doc: &D, message: &str) -> PendingClear {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        doc.set_text_content(&self.region, message);
        PendingClear {
            generation,
            delay: self.clear_after,
        }
    }

    /// Empty the region unless a newer message replaced the one `pending`
    /// belongs to. Returns whether the region was cleared.
    pub fn clear<D: Document<Element = E>>(&self, doc: &D, pending: PendingClear) -> bool {
        if pending.generation != self.generation.get() {
            return false;
        }
        doc.set_text_content(&self.region, "");
        true
    }
}
