use crate::error::SwitchError;
use crate::locale::Locale;
use crate::platform::{Location, Navigator, PreferenceStore};

/// Where the initial locale is read from and where a switch is recorded.
pub enum LocaleSource {
    /// A remembered preference under `key`.
    StoredPreference {
        store: Box<dyn PreferenceStore>,
        key: String,
    },
    /// A trailing `/ja` or `/en` path segment.
    UrlPathSuffix { navigator: Box<dyn Navigator> },
}

impl std::fmt::Debug for LocaleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoredPreference { key, .. } => f
                .debug_struct("StoredPreference")
                .field("key", key)
                .finish_non_exhaustive(),
            Self::UrlPathSuffix { .. } => f.debug_struct("UrlPathSuffix").finish_non_exhaustive(),
        }
    }
}

impl LocaleSource {
    pub fn stored(store: impl PreferenceStore + 'static, key: &str) -> Self {
        Self::StoredPreference {
            store: Box::new(store),
            key: key.to_string(),
        }
    }

    pub fn url_path(navigator: impl Navigator + 'static) -> Self {
        Self::UrlPathSuffix {
            navigator: Box::new(navigator),
        }
    }

    /// Locale to show on load; anything unreadable resolves to `ja`.
    #[must_use]
    pub fn resolve(&self) -> Locale {
        match self {
            Self::StoredPreference { store, key } => match store.load(key) {
                Ok(Some(code)) => code.parse().unwrap_or_else(|err| {
                    log::warn!("ignoring stored locale: {err}");
                    Locale::default()
                }),
                Ok(None) => Locale::default(),
                Err(err) => {
                    log::warn!("locale preference unreadable: {err}");
                    Locale::default()
                }
            },
            Self::UrlPathSuffix { navigator } => match navigator.location() {
                Ok(location) => locale_from_path(&location.path).unwrap_or_default(),
                Err(err) => {
                    log::warn!("location unreadable: {err}");
                    Locale::default()
                }
            },
        }
    }

    /// Record `locale` as the active one.
    ///
    /// For the URL source the path is rewritten through the history API; if
    /// that is rejected the page navigates to the rewritten URL instead.
    ///
    /// # Errors
    ///
    /// Returns an error when the preference cannot be written, or when both
    /// the history update and the navigation fallback fail.
    pub fn commit(&self, locale: Locale) -> Result<(), SwitchError> {
        match self {
            Self::StoredPreference { store, key } => Ok(store.store(key, locale.code())?),
            Self::UrlPathSuffix { navigator } => {
                let current = navigator.location()?;
                let target = Location {
                    path: rewrite_path(&current.path, locale),
                    ..current.clone()
                };
                if target == current {
                    return Ok(());
                }
                let href = target.href();
                if let Err(err) = navigator.push_state(&href) {
                    log::warn!("history update failed, navigating to {href}: {err}");
                    navigator.navigate(&href)?;
                }
                Ok(())
            }
        }
    }
}

/// Locale named by the last path segment, if it is `ja` or `en`.
#[must_use]
pub fn locale_from_path(path: &str) -> Option<Locale> {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    Locale::ALL.into_iter().find(|locale| {
        trimmed
            .strip_suffix(locale.code())
            .is_some_and(|rest| rest.ends_with('/'))
    })
}

/// Replace (or add) the trailing locale segment of `path`.
#[must_use]
pub fn rewrite_path(path: &str, locale: Locale) -> String {
    let mut base = path.strip_suffix('/').unwrap_or(path);
    if let Some(current) = locale_from_path(base) {
        base = &base[..base.len() - current.code().len() - 1];
    }
    format!("{base}/{}", locale.code())
}
