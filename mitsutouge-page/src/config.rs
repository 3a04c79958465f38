//! Site configuration.
//!
//! Every field has a default matching the published site, and all structs are
//! `#[serde(default)]` so a host can override a single value from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::PerLocale;

const MAP_EMBED_JA: &str = "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d3246.9483617271617!2d138.839799176787!3d35.53027373824988!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x60195df877592bcd%3A0xc3627466034bebe8!2z5LiJ44OE5bOg44Gu5a6_!5e0!3m2!1sja!2sjp!4v1757050131177!5m2!1sja!2sjp";
const MAP_EMBED_EN: &str = "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d3246.9483617271617!2d138.839799176787!3d35.53027373824988!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x60195df877592bcd%3A0xc3627466034bebe8!2sMitsutouge%20Station!5e0!3m2!1sen!2sjp!4v1757050131177!5m2!1sen!2sjp";

const BUTTON_ACTIVE: &str =
    "px-3 py-1 text-sm bg-indigo-600 text-white rounded-md hover:bg-indigo-700 transition-colors";
const BUTTON_INACTIVE: &str =
    "px-3 py-1 text-sm bg-gray-200 text-gray-700 rounded-md hover:bg-gray-300 transition-colors";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub a11y: A11yConfig,
    pub switcher: SwitcherConfig,
}

impl SiteConfig {
    /// Parse a (possibly partial) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    pub main_content_id: String,
    pub skip_link_text: String,
    pub skip_link_class: String,
    pub announcer_id: String,
    pub announcer_class: String,
    pub announce_clear_ms: u32,
    pub image_alt_fallback: String,
    pub lazy_source_attr: String,
    pub lazy_class: String,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            main_content_id: "main-content".to_string(),
            skip_link_text: "Skip to main content".to_string(),
            skip_link_class: "sr-only focus:not-sr-only focus:absolute focus:top-4 focus:left-4 bg-blue-600 text-white px-4 py-2 rounded z-50".to_string(),
            announcer_id: "a11y-announcer".to_string(),
            announcer_class: "sr-only".to_string(),
            announce_clear_ms: 1000,
            image_alt_fallback: "Image".to_string(),
            lazy_source_attr: "data-src".to_string(),
            lazy_class: "lazy".to_string(),
        }
    }
}

/// Where the initial locale comes from and where a switch is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocaleSourceKind {
    #[default]
    StoredPreference,
    UrlPathSuffix,
}

/// What a bilingual element shows when the target locale is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentPolicy {
    /// Use the target locale's value, else the `data-ja` value.
    #[default]
    FallbackToPrimary,
    /// Only act when both locale values are present.
    RequireBothLocales,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyles {
    pub active: String,
    pub inactive: String,
}

impl Default for ButtonStyles {
    fn default() -> Self {
        Self {
            active: BUTTON_ACTIVE.to_string(),
            inactive: BUTTON_INACTIVE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    pub locale_source: LocaleSourceKind,
    pub content_policy: ContentPolicy,
    pub storage_key: String,
    pub switch_links: bool,
    pub mirror_image_alt: bool,
    pub inject_widget: bool,
    pub widget_class: String,
    pub widget_inner_class: String,
    pub buttons: ButtonStyles,
    /// Substring identifying the map iframe by its `src`.
    pub map_marker: String,
    pub map_embeds: PerLocale<Option<String>>,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self::stored_preference()
    }
}

impl SwitcherConfig {
    /// Remembered locale, `data-ja` fallback, injected selector widget.
    #[must_use]
    pub fn stored_preference() -> Self {
        Self {
            locale_source: LocaleSourceKind::StoredPreference,
            content_policy: ContentPolicy::FallbackToPrimary,
            storage_key: "selectedLanguage".to_string(),
            switch_links: false,
            mirror_image_alt: true,
            inject_widget: true,
            widget_class: "fixed bottom-4 left-4 z-50".to_string(),
            widget_inner_class: "flex space-x-2 bg-white rounded-lg shadow-lg p-2 border border-gray-200".to_string(),
            buttons: ButtonStyles::default(),
            map_marker: "google.com/maps".to_string(),
            map_embeds: PerLocale::new(
                Some(MAP_EMBED_JA.to_string()),
                Some(MAP_EMBED_EN.to_string()),
            ),
        }
    }

    /// Locale carried in the URL path, strict pairs, bilingual links.
    #[must_use]
    pub fn url_path_suffix() -> Self {
        Self {
            locale_source: LocaleSourceKind::UrlPathSuffix,
            content_policy: ContentPolicy::RequireBothLocales,
            switch_links: true,
            mirror_image_alt: false,
            inject_widget: false,
            ..Self::stored_preference()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SiteConfig::from_json(
            r#"{"switcher": {"locale_source": "url-path-suffix", "storage_key": "lang"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.switcher.locale_source, LocaleSourceKind::UrlPathSuffix);
        assert_eq!(cfg.switcher.storage_key, "lang");
        assert_eq!(cfg.switcher.map_marker, "google.com/maps");
        assert_eq!(cfg.a11y.image_alt_fallback, "Image");
    }

    #[test]
    fn map_embeds_cover_both_locales() {
        let cfg = SwitcherConfig::default();
        for locale in Locale::ALL {
            let url = cfg.map_embeds.get(locale).as_deref().unwrap();
            assert!(url.contains(&cfg.map_marker));
            assert!(url.contains(&format!("!1s{locale}!2sjp")));
        }
    }

    #[test]
    fn presets_differ_only_in_variant_switches() {
        let stored = SwitcherConfig::stored_preference();
        let url = SwitcherConfig::url_path_suffix();
        assert_eq!(url.content_policy, ContentPolicy::RequireBothLocales);
        assert!(url.switch_links && !stored.switch_links);
        assert_eq!(url.buttons, stored.buttons);
        assert_eq!(url.map_embeds, stored.map_embeds);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(SiteConfig::from_json("{\"a11y\": 3}").is_err());
    }
}
