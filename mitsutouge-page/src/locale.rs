use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Display language of the site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale `{0}`")]
pub struct UnknownLocale(pub String);

impl Locale {
    pub const ALL: [Self; 2] = [Self::Ja, Self::En];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::En => "en",
        }
    }

    /// Name shown on the selector button, in the locale's own language.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::Ja => "日本語",
            Self::En => "English",
        }
    }

    /// Attribute holding this locale's content on a bilingual element.
    #[must_use]
    pub const fn content_attr(self) -> &'static str {
        match self {
            Self::Ja => "data-ja",
            Self::En => "data-en",
        }
    }

    /// Attribute holding this locale's navigation target on a bilingual link.
    #[must_use]
    pub const fn href_attr(self) -> &'static str {
        match self {
            Self::Ja => "data-href-ja",
            Self::En => "data-href-en",
        }
    }

    #[must_use]
    pub const fn button_id(self) -> &'static str {
        match self {
            Self::Ja => "lang-ja",
            Self::En => "lang-en",
        }
    }

    /// The locale whose content every bilingual element is guaranteed to carry.
    #[must_use]
    pub const fn primary() -> Self {
        Self::Ja
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ja" => Ok(Self::Ja),
            "en" => Ok(Self::En),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// One value per supported locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerLocale<T> {
    pub ja: T,
    pub en: T,
}

impl<T> PerLocale<T> {
    pub const fn new(ja: T, en: T) -> Self {
        Self { ja, en }
    }

    pub const fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Ja => &self.ja,
            Locale::En => &self.en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes_and_rejects_others() {
        assert_eq!("ja".parse::<Locale>(), Ok(Locale::Ja));
        assert_eq!(" en ".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(UnknownLocale("fr".to_string()))
        );
    }

    #[test]
    fn attribute_names_follow_locale_code() {
        for locale in Locale::ALL {
            assert_eq!(locale.content_attr(), format!("data-{locale}"));
            assert_eq!(locale.href_attr(), format!("data-href-{locale}"));
            assert_eq!(locale.button_id(), format!("lang-{locale}"));
        }
    }

    #[test]
    fn default_locale_is_japanese() {
        assert_eq!(Locale::default(), Locale::Ja);
        assert_eq!(Locale::primary(), Locale::Ja);
    }

    #[test]
    fn serializes_as_lowercase_code() {
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
        let parsed: Locale = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(parsed, Locale::Ja);
    }
}
