//! Application context shared by every event handler.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use mitsutouge_page::{
    Announcer, Document, EnhanceCounts, LanguageSwitcher, Locale, SiteConfig, SwitchReport,
    enhance, set_focus,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::bindings;
use crate::browser::BrowserDocument;
use crate::dom::{self, sleep_ms};
use crate::error::WebError;
use crate::platform::{BrowserNavigator, LocalStoragePreferences};

/// Id of the optional `<script type="application/json">` holding a
/// [`SiteConfig`] override.
pub const CONFIG_SCRIPT_ID: &str = "mitsutouge-config";

thread_local! {
    static CONTEXT: RefCell<Option<Rc<AppContext>>> = const { RefCell::new(None) };
}

#[derive(Debug)]
pub struct AppContext {
    doc: BrowserDocument,
    config: SiteConfig,
    counts: EnhanceCounts,
    announcer: Option<Announcer<Element>>,
    switcher: RefCell<LanguageSwitcher>,
}

impl AppContext {
    /// Enhance the page, apply the initial locale and wire every listener.
    ///
    /// # Errors
    /// Returns an error if a listener cannot be registered.
    pub fn install(doc: BrowserDocument, config: SiteConfig) -> Result<Rc<Self>, WebError> {
        let enhancement = enhance(&doc, &config.a11y);
        let mut switcher = LanguageSwitcher::from_config(
            config.switcher.clone(),
            LocalStoragePreferences,
            BrowserNavigator,
        );
        let report = switcher.init(&doc);
        if !report.is_clean() {
            log::warn!("initial language {} applied with {} failed steps", report.locale, report.failures().len());
        }

        let bindings = enhancement.bindings;
        let ctx = Rc::new(Self {
            doc,
            config,
            counts: enhancement.counts,
            announcer: enhancement.announcer,
            switcher: RefCell::new(switcher),
        });
        let wired = bindings::wire(&ctx.doc, bindings, &ctx.config.a11y)?;
        let buttons = bindings::wire_locale_buttons(&ctx)?;
        log::debug!("wired {wired} accessibility listeners and {buttons} locale buttons");
        Ok(ctx)
    }

    /// The context installed by [`boot`], if any.
    #[must_use]
    pub fn current() -> Option<Rc<Self>> {
        CONTEXT.with(|slot| slot.borrow().clone())
    }

    #[must_use]
    pub const fn doc(&self) -> &BrowserDocument {
        &self.doc
    }

    #[must_use]
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub const fn counts(&self) -> EnhanceCounts {
        self.counts
    }

    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.switcher.borrow().current()
    }

    /// Push `message` to the live region and clear it after the configured
    /// delay unless a newer message arrived first.
    pub fn announce(self: &Rc<Self>, message: &str) {
        let Some(announcer) = &self.announcer else {
            log::warn!("no live region for announcement");
            return;
        };
        let pending = announcer.announce(&self.doc, message);
        let ctx = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let delay = i32::try_from(pending.delay.as_millis()).unwrap_or(i32::MAX);
            if let Err(err) = sleep_ms(delay).await {
                log::warn!("announcement clear timer failed: {}", dom::js_error_message(&err));
                return;
            }
            if let Some(announcer) = &ctx.announcer {
                announcer.clear(&ctx.doc, pending);
            }
        });
    }

    /// Switch to the locale named by `code`.
    ///
    /// # Errors
    /// Returns an error for unknown codes or while another switch is running.
    pub fn switch_code(&self, code: &str) -> Result<SwitchReport, WebError> {
        let mut switcher = self.switcher.try_borrow_mut().map_err(|_| WebError::Busy)?;
        Ok(switcher.switch_code(&self.doc, code)?)
    }

    /// Switch to `locale`.
    ///
    /// # Errors
    /// Returns [`WebError::Busy`] while another switch is running.
    pub fn switch_to(&self, locale: Locale) -> Result<SwitchReport, WebError> {
        let mut switcher = self.switcher.try_borrow_mut().map_err(|_| WebError::Busy)?;
        Ok(switcher.switch_language(&self.doc, locale))
    }

    /// Locale button handler.
    pub fn select(&self, locale: Locale) {
        match self.switch_to(locale) {
            Ok(report) if !report.is_clean() => {
                log::warn!("switch to {locale} finished with {} failed steps", report.failures().len());
            }
            Ok(_) => {}
            Err(err) => log::warn!("switch to {locale} ignored: {err}"),
        }
    }
}

/// Read the override from `#mitsutouge-config`, falling back to defaults.
#[must_use]
pub fn load_config(doc: &BrowserDocument) -> SiteConfig {
    let Some(script) = doc.element_by_id(CONFIG_SCRIPT_ID) else {
        return SiteConfig::default();
    };
    SiteConfig::from_json(&doc.text_content(&script)).unwrap_or_else(|err| {
        log::warn!("ignoring invalid #{CONFIG_SCRIPT_ID}: {err}");
        SiteConfig::default()
    })
}

/// Build the context once and publish the page globals.
///
/// # Errors
/// Returns an error when the document is unavailable or wiring fails.
pub fn boot() -> Result<Rc<AppContext>, WebError> {
    if let Some(ctx) = AppContext::current() {
        return Ok(ctx);
    }
    let doc = BrowserDocument::current()?;
    let config = load_config(&doc);
    let ctx = AppContext::install(doc, config)?;
    CONTEXT.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&ctx)));
    install_globals(&ctx)?;
    log::info!("page scripts ready ({})", ctx.current_locale());
    Ok(ctx)
}

/// Run `f` once the document has been parsed.
///
/// # Errors
/// Returns an error if the `DOMContentLoaded` listener cannot be added.
pub fn run_when_ready(f: impl FnOnce() + 'static) -> Result<(), JsValue> {
    let document = dom::document()?;
    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }
    let closure = Closure::once(f);
    document.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_globals(ctx: &Rc<AppContext>) -> Result<(), JsValue> {
    let window = dom::window()?;

    let announce_ctx = Rc::clone(ctx);
    let announce =
        Closure::<dyn Fn(String)>::new(move |message: String| announce_ctx.announce(&message));
    Reflect::set(&window, &"announceToScreenReader".into(), &announce.into_js_value())?;

    let focus_doc = ctx.doc.clone();
    let focus = Closure::<dyn Fn(JsValue) -> bool>::new(move |target: JsValue| {
        let el = target.dyn_into::<Element>().ok();
        set_focus(&focus_doc, el.as_ref())
    });
    Reflect::set(&window, &"setFocus".into(), &focus.into_js_value())?;

    let trap_doc = ctx.doc.clone();
    let trap = Closure::<dyn Fn(JsValue) -> Result<(), JsValue>>::new(move |target: JsValue| {
        match target.dyn_into::<Element>() {
            Ok(container) => bindings::trap_focus(&trap_doc, &container),
            Err(_) => Ok(()),
        }
    });
    Reflect::set(&window, &"trapFocus".into(), &trap.into_js_value())?;

    let handle = LanguageSwitcherHandle { ctx: Rc::clone(ctx) };
    Reflect::set(&window, &"languageSwitcher".into(), &JsValue::from(handle))?;
    Ok(())
}

/// Script-facing handle over the page's language switcher.
#[wasm_bindgen(js_name = LanguageSwitcher)]
#[derive(Debug)]
pub struct LanguageSwitcherHandle {
    ctx: Rc<AppContext>,
}

#[wasm_bindgen(js_class = LanguageSwitcher)]
impl LanguageSwitcherHandle {
    /// Attach to the running page scripts, booting them if needed.
    ///
    /// # Errors
    /// Throws if the page scripts cannot start.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, JsValue> {
        let ctx = boot()?;
        Ok(Self { ctx })
    }

    /// Switch the page and return the per-step report.
    ///
    /// # Errors
    /// Throws for codes other than `ja` and `en`.
    #[wasm_bindgen(js_name = switchLanguage)]
    pub fn switch_language(&self, lang: &str) -> Result<JsValue, JsValue> {
        let report = self.ctx.switch_code(lang)?;
        Ok(serde_wasm_bindgen::to_value(&report)?)
    }

    #[wasm_bindgen(js_name = currentLang)]
    #[must_use]
    pub fn current_lang(&self) -> String {
        self.ctx.current_locale().code().to_string()
    }

    /// Counts from the accessibility pass run at startup.
    ///
    /// # Errors
    /// Throws if the counts cannot be converted.
    #[wasm_bindgen(js_name = enhancementCounts)]
    pub fn enhancement_counts(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.ctx.counts())?)
    }
}
