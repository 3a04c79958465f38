//! Event listeners for the bindings produced by the page scripts.
//!
//! Listeners live as long as the page, so their closures are leaked with
//! `Closure::forget` once registered.

use std::rc::Rc;

use js_sys::{Array, Reflect};
use mitsutouge_page::a11y::{activate_aria_button, reveal, toggle_disclosure};
use mitsutouge_page::switcher::button_key;
use mitsutouge_page::{A11yConfig, Binding, Document, FocusTrap, KeyOutcome, KeyPress, Locale};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, IntersectionObserver, IntersectionObserverEntry, KeyboardEvent};

use crate::browser::BrowserDocument;
use crate::context::AppContext;
use crate::dom;

/// Call `handler` for every keydown on `target`, cancelling the default
/// action when it reports [`KeyOutcome::Handled`].
///
/// # Errors
/// Returns an error if the listener cannot be registered.
pub fn on_keydown<F>(target: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut(KeyPress) -> KeyOutcome + 'static,
{
    let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        let press = KeyPress::from_dom(&event.key(), event.shift_key());
        if handler(press).prevent_default() {
            event.prevent_default();
        }
    });
    target.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_click<F>(target: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler());
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Register listeners for every binding. Returns how many were wired.
///
/// # Errors
/// Returns the first registration failure.
pub fn wire(
    doc: &BrowserDocument,
    bindings: Vec<Binding<Element>>,
    config: &A11yConfig,
) -> Result<usize, JsValue> {
    let mut wired = 0;
    let mut lazy = Vec::new();
    for binding in bindings {
        match binding {
            Binding::Disclosure { summary, details } => {
                let doc = doc.clone();
                on_keydown(&summary, move |press| toggle_disclosure(&doc, &details, press))?;
                wired += 1;
            }
            Binding::AriaButton(el) => {
                let doc = doc.clone();
                let target = el.clone();
                on_keydown(&el, move |press| activate_aria_button(&doc, &target, press))?;
                wired += 1;
            }
            Binding::LazyImage(img) => lazy.push(img),
        }
    }
    if observe_lazy_images(doc, &lazy, config)? {
        wired += lazy.len();
    }
    Ok(wired)
}

/// Reveal each image on its first intersection, then stop observing it.
/// Returns `false` when the browser has no `IntersectionObserver`.
///
/// # Errors
/// Returns an error if the observer cannot be created.
pub fn observe_lazy_images(
    doc: &BrowserDocument,
    images: &[Element],
    config: &A11yConfig,
) -> Result<bool, JsValue> {
    if images.is_empty() {
        return Ok(true);
    }
    let window = dom::window()?;
    if !Reflect::has(window.as_ref(), &JsValue::from_str("IntersectionObserver"))? {
        log::info!("IntersectionObserver unsupported; {} images stay deferred", images.len());
        return Ok(false);
    }

    let doc = doc.clone();
    let config = config.clone();
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let img = entry.target();
                if reveal(&doc, &img, entry.is_intersecting(), &config) {
                    observer.unobserve(&img);
                }
            }
        },
    );
    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
    callback.forget();
    for img in images {
        observer.observe(img);
    }
    Ok(true)
}

/// Click and keyboard activation for the locale selector buttons.
///
/// # Errors
/// Returns the first registration failure.
pub fn wire_locale_buttons(ctx: &Rc<AppContext>) -> Result<usize, JsValue> {
    let mut wired = 0;
    for locale in Locale::ALL {
        let Some(button) = ctx.doc().element_by_id(locale.button_id()) else {
            continue;
        };
        let on_select = Rc::clone(ctx);
        on_click(&button, move || on_select.select(locale))?;
        let on_key = Rc::clone(ctx);
        on_keydown(&button, move |press| {
            let outcome = button_key(press);
            if outcome == KeyOutcome::Handled {
                on_key.select(locale);
            }
            outcome
        })?;
        wired += 1;
    }
    Ok(wired)
}

/// Keep Tab focus cycling inside `container`.
///
/// # Errors
/// Returns an error if the listener cannot be registered.
pub fn trap_focus(doc: &BrowserDocument, container: &Element) -> Result<(), JsValue> {
    let doc = doc.clone();
    let trap = FocusTrap::new(container.clone());
    on_keydown(container, move |press| trap.handle_key(&doc, press))
}
