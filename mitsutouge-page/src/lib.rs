//! Mitsutouge Page Scripts
//!
//! Platform-agnostic core of the Mitsutouge tourism site's client scripts.
//! The DOM is reached only through the [`Document`] trait, so the accessibility
//! enhancer and the language switcher run unchanged against the browser
//! (see `mitsutouge-web`) or against the in-memory [`Page`].

pub mod a11y;
pub mod config;
pub mod document;
pub mod error;
pub mod locale;
pub mod page;
pub mod platform;
pub mod switcher;

// Re-export commonly used types
pub use a11y::{
    Announcer, Binding, EnhanceCounts, Enhancement, FocusTrap, Key, KeyOutcome, KeyPress,
    PendingClear, enhance, set_focus,
};
pub use config::{A11yConfig, ButtonStyles, ContentPolicy, LocaleSourceKind, SiteConfig, SwitcherConfig};
pub use document::{AttrMatch, Compound, Document, Selector};
pub use error::{ConfigError, DomError, PlatformError, SwitchError};
pub use locale::{Locale, PerLocale, UnknownLocale};
pub use page::{NodeId, Page, PageFixture};
pub use platform::{Location, MemoryNavigator, MemoryPreferences, Navigator, PreferenceStore};
pub use switcher::{LanguageSwitcher, LocaleSource, StepOutcome, SwitchReport, SwitchStep};
