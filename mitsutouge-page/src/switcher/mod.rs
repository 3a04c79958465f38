//! Runtime switching between the Japanese and English renderings of a page.
//!
//! Every step of a switch reports its own outcome. A failing step is logged
//! and recorded in the [`SwitchReport`]; the steps after it still run.

mod content;
mod meta;
mod source;
mod ui;

use serde::Serialize;

use crate::config::{LocaleSourceKind, SwitcherConfig};
use crate::document::Document;
use crate::error::SwitchError;
use crate::locale::Locale;
use crate::platform::{Navigator, PreferenceStore};

pub use content::{decode_entities, resolve_pair, swap_content, swap_links};
pub use meta::{MetaTarget, switch_map, update_metadata};
pub use source::{LocaleSource, locale_from_path, rewrite_path};
pub use ui::{button_key, ensure_widget, update_buttons};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchStep {
    Commit,
    Content,
    Metadata,
    Map,
    Links,
    DocumentLang,
    Buttons,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: SwitchStep,
    /// Elements changed by the step.
    pub applied: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchReport {
    pub locale: Locale,
    pub steps: Vec<StepOutcome>,
}

impl SwitchReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.steps.iter().all(|s| s.error.is_none())
    }

    #[must_use]
    pub fn failures(&self) -> Vec<&StepOutcome> {
        self.steps.iter().filter(|s| s.error.is_some()).collect()
    }

    #[must_use]
    pub fn step(&self, step: SwitchStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.step == step)
    }

    fn record<E: Into<SwitchError>>(&mut self, step: SwitchStep, result: Result<usize, E>) {
        let outcome = match result {
            Ok(applied) => StepOutcome {
                step,
                applied,
                error: None,
            },
            Err(err) => {
                let err: SwitchError = err.into();
                log::warn!("language switch to {} failed at {step:?}: {err}", self.locale);
                StepOutcome {
                    step,
                    applied: 0,
                    error: Some(err.to_string()),
                }
            }
        };
        self.steps.push(outcome);
    }
}

/// Language switch controller.
///
/// One controller serves both site variants; the configured
/// [`LocaleSource`] and [`crate::ContentPolicy`] pick the behaviour.
#[derive(Debug)]
pub struct LanguageSwitcher {
    config: SwitcherConfig,
    source: LocaleSource,
    current: Locale,
}

impl LanguageSwitcher {
    /// Create a controller and resolve the initial locale from `source`.
    #[must_use]
    pub fn new(config: SwitcherConfig, source: LocaleSource) -> Self {
        let current = source.resolve();
        Self {
            config,
            source,
            current,
        }
    }

    /// Build the source named by `config.locale_source` from the host's
    /// services.
    #[must_use]
    pub fn from_config(
        config: SwitcherConfig,
        store: impl PreferenceStore + 'static,
        navigator: impl Navigator + 'static,
    ) -> Self {
        let source = match config.locale_source {
            LocaleSourceKind::StoredPreference => LocaleSource::stored(store, &config.storage_key),
            LocaleSourceKind::UrlPathSuffix => LocaleSource::url_path(navigator),
        };
        Self::new(config, source)
    }

    #[must_use]
    pub const fn current(&self) -> Locale {
        self.current
    }

    #[must_use]
    pub const fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    /// Inject the selector widget if configured, then apply the resolved
    /// locale to the page.
    pub fn init<D: Document>(&mut self, doc: &D) -> SwitchReport {
        if self.config.inject_widget {
            if let Err(err) = ensure_widget(doc, self.current, &self.config) {
                log::warn!("language selector could not be added: {err}");
            }
        }
        self.switch_language(doc, self.current)
    }

    /// Parse `code` and switch to it.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::UnknownLocale`] for codes other than `ja`/`en`;
    /// the page is left untouched in that case.
    pub fn switch_code<D: Document>(&mut self, doc: &D, code: &str) -> Result<SwitchReport, SwitchError> {
        let locale: Locale = code.parse()?;
        Ok(self.switch_language(doc, locale))
    }

    pub fn switch_language<D: Document>(&mut self, doc: &D, locale: Locale) -> SwitchReport {
        self.current = locale;
        let config = &self.config;
        let mut report = SwitchReport {
            locale,
            steps: Vec::with_capacity(7),
        };

        report.record(SwitchStep::Commit, self.source.commit(locale).map(|()| 1));
        report.record(SwitchStep::Content, swap_content(doc, locale, config));
        report.record(SwitchStep::Metadata, update_metadata(doc, locale, config));
        report.record(SwitchStep::Map, switch_map(doc, locale, config).map(usize::from));
        if config.switch_links {
            report.record(SwitchStep::Links, swap_links(doc, locale));
        }
        let lang = match doc.root() {
            Some(root) => doc.set_attribute(&root, "lang", locale.code()).map(|()| 1),
            None => Ok(0),
        };
        report.record(SwitchStep::DocumentLang, lang);
        report.record(
            SwitchStep::Buttons,
            update_buttons(doc, locale, config).map(usize::from),
        );

        log::debug!("switched language to {locale}: {:?}", report.steps);
        report
    }
}
