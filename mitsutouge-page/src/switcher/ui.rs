use crate::a11y::{KeyOutcome, KeyPress};
use crate::config::SwitcherConfig;
use crate::document::Document;
use crate::error::DomError;
use crate::locale::Locale;

/// Append the fixed bottom-left language selector unless the page already
/// has one. Returns whether it was created.
///
/// # Errors
///
/// Returns an error if the widget cannot be built or attached.
pub fn ensure_widget<D: Document>(doc: &D, locale: Locale, config: &SwitcherConfig) -> Result<bool, DomError> {
    if Locale::ALL.iter().any(|l| doc.element_by_id(l.button_id()).is_some()) {
        return Ok(false);
    }
    let body = doc.body().ok_or(DomError::Detached)?;
    let outer = doc.create_element("div")?;
    doc.set_attribute(&outer, "class", &config.widget_class)?;
    let inner = doc.create_element("div")?;
    doc.set_attribute(&inner, "class", &config.widget_inner_class)?;
    for button_locale in Locale::ALL {
        let button = doc.create_element("button")?;
        doc.set_attribute(&button, "id", button_locale.button_id())?;
        doc.set_attribute(&button, "lang", button_locale.code())?;
        doc.set_attribute(&button, "class", button_class(button_locale, locale, config))?;
        doc.set_text_content(&button, button_locale.native_name());
        doc.append_child(&inner, &button)?;
    }
    doc.append_child(&outer, &inner)?;
    doc.append_child(&body, &outer)?;
    Ok(true)
}

fn button_class(button: Locale, current: Locale, config: &SwitcherConfig) -> &str {
    if button == current {
        &config.buttons.active
    } else {
        &config.buttons.inactive
    }
}

/// Give the current locale's button the active style and the other the
/// inactive one. Needs both buttons; returns whether they were styled.
///
/// # Errors
///
/// Returns the first attribute failure.
pub fn update_buttons<D: Document>(doc: &D, locale: Locale, config: &SwitcherConfig) -> Result<bool, DomError> {
    let buttons: Vec<(Locale, D::Element)> = Locale::ALL
        .into_iter()
        .filter_map(|l| doc.element_by_id(l.button_id()).map(|el| (l, el)))
        .collect();
    if buttons.len() != Locale::ALL.len() {
        return Ok(false);
    }
    for (button_locale, el) in &buttons {
        doc.set_attribute(el, "class", button_class(*button_locale, locale, config))?;
    }
    Ok(true)
}

/// Keyboard activation of a selector button.
#[must_use]
pub fn button_key(press: KeyPress) -> KeyOutcome {
    if press.key.activates() {
        KeyOutcome::Handled
    } else {
        KeyOutcome::Ignored
    }
}
