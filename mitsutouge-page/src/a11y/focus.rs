use crate::a11y::keys::{Key, KeyOutcome, KeyPress};
use crate::document::{Document, Selector};

/// `button, [href], input, select, textarea, [tabindex]:not([tabindex="-1"])`
#[must_use]
pub fn focusable_selector() -> Selector {
    Selector::tag("button")
        .or(Selector::any().present("href"))
        .or(Selector::tags(&["input", "select", "textarea"]))
        .or(Selector::any().present("tabindex").not_equals("tabindex", "-1"))
}

/// Focus `el` if there is one and it can take focus.
pub fn set_focus<D: Document>(doc: &D, el: Option<&D::Element>) -> bool {
    el.is_some_and(|el| doc.focus(el))
}

/// Keeps Tab / Shift+Tab cycling inside a container.
///
/// The focusable descendants are looked up on every key press, so content
/// added to the container after installation is part of the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusTrap<E> {
    container: E,
}

impl<E: Clone + PartialEq> FocusTrap<E> {
    pub const fn new(container: E) -> Self {
        Self { container }
    }

    pub const fn container(&self) -> &E {
        &self.container
    }

    pub fn handle_key<D: Document<Element = E>>(&self, doc: &D, press: KeyPress) -> KeyOutcome {
        if press.key != Key::Tab {
            return KeyOutcome::Ignored;
        }
        let focusables = doc.query_all(Some(&self.container), &focusable_selector());
        let (Some(first), Some(last)) = (focusables.first(), focusables.last()) else {
            return KeyOutcome::Ignored;
        };
        let Some(active) = doc.active_element() else {
            return KeyOutcome::Ignored;
        };

        if !doc.contains(&self.container, &active) {
            doc.focus(first);
            return KeyOutcome::Handled;
        }
        if press.shift && active == *first {
            doc.focus(last);
            KeyOutcome::Handled
        } else if !press.shift && active == *last {
            doc.focus(first);
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }
}
