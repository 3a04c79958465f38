use crate::document::Document;

/// Keys the page scripts react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Tab,
    Escape,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    /// Keys that activate buttons and summaries.
    #[must_use]
    pub const fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    #[must_use]
    pub const fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    #[must_use]
    pub fn from_dom(key: &str, shift: bool) -> Self {
        Self {
            key: Key::from_dom(key),
            shift,
        }
    }
}

/// Whether the host must call `preventDefault` on the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

impl KeyOutcome {
    #[must_use]
    pub const fn prevent_default(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// `Enter`/`Space` on a summary flips its disclosure's `open` state.
pub fn toggle_disclosure<D: Document>(doc: &D, details: &D::Element, press: KeyPress) -> KeyOutcome {
    if !press.key.activates() {
        return KeyOutcome::Ignored;
    }
    let result = if doc.has_attribute(details, "open") {
        doc.remove_attribute(details, "open")
    } else {
        doc.set_attribute(details, "open", "")
    };
    if let Err(err) = result {
        log::warn!("disclosure toggle failed: {err}");
    }
    KeyOutcome::Handled
}

/// `Enter`/`Space` on a `role="button"` element runs its click behaviour.
pub fn activate_aria_button<D: Document>(doc: &D, el: &D::Element, press: KeyPress) -> KeyOutcome {
    if !press.key.activates() {
        return KeyOutcome::Ignored;
    }
    doc.click(el);
    KeyOutcome::Handled
}
