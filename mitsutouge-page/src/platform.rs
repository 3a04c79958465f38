//! Host services around the document: preference storage and URL history.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::PlatformError;

/// Key/value storage for the remembered locale (browser `localStorage`).
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns an error if the storage backend is unavailable.
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn store(&self, key: &str, value: &str) -> Result<(), PlatformError>;
}

/// Current URL split the way `window.location` exposes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    /// Query string including its leading `?`, or empty.
    pub search: String,
    /// Fragment including its leading `#`, or empty.
    pub hash: String,
}

impl Location {
    /// Split a relative or absolute-path URL such as `/tour/en?x=1#map`.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (rest, hash) = url
            .find('#')
            .map_or((url, ""), |idx| (&url[..idx], &url[idx..]));
        let (path, search) = rest
            .find('?')
            .map_or((rest, ""), |idx| (&rest[..idx], &rest[idx..]));
        Self {
            path: path.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    #[must_use]
    pub fn href(&self) -> String {
        format!("{}{}{}", self.path, self.search, self.hash)
    }
}

/// Browser history access used by the URL-suffix locale source.
pub trait Navigator {
    /// # Errors
    ///
    /// Returns an error if the location cannot be read.
    fn location(&self) -> Result<Location, PlatformError>;

    /// Record `url` as the current entry without reloading.
    ///
    /// # Errors
    ///
    /// Returns an error when the history API rejects the update.
    fn push_state(&self, url: &str) -> Result<(), PlatformError>;

    /// Full navigation to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation cannot be started.
    fn navigate(&self, url: &str) -> Result<(), PlatformError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Rc<T> {
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        (**self).store(key, value)
    }
}

impl<T: Navigator + ?Sized> Navigator for Rc<T> {
    fn location(&self) -> Result<Location, PlatformError> {
        (**self).location()
    }

    fn push_state(&self, url: &str) -> Result<(), PlatformError> {
        (**self).push_state(url)
    }

    fn navigate(&self, url: &str) -> Result<(), PlatformError> {
        (**self).navigate(url)
    }
}

/// Preference store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RefCell<BTreeMap<String, String>>,
    unavailable: Cell<bool>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let prefs = Self::default();
        prefs
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        prefs
    }

    /// Make every later call fail, as a browser with storage disabled does.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> Result<Option<String>, PlatformError> {
        if self.unavailable.get() {
            return Err(PlatformError::Storage("storage disabled".into()));
        }
        Ok(self.get(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PlatformError> {
        if self.unavailable.get() {
            return Err(PlatformError::Storage("storage disabled".into()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// History stack kept in memory.
#[derive(Debug)]
pub struct MemoryNavigator {
    current: RefCell<Location>,
    pushed: RefCell<Vec<String>>,
    navigations: RefCell<Vec<String>>,
    reject_push: Cell<bool>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            current: RefCell::new(Location::parse(url)),
            pushed: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            reject_push: Cell::new(false),
        }
    }

    /// Make `push_state` fail so the navigation fallback runs.
    pub fn set_reject_push(&self, reject: bool) {
        self.reject_push.set(reject);
    }

    #[must_use]
    pub fn href(&self) -> String {
        self.current.borrow().href()
    }

    #[must_use]
    pub fn pushed(&self) -> Vec<String> {
        self.pushed.borrow().clone()
    }

    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> Result<Location, PlatformError> {
        Ok(self.current.borrow().clone())
    }

    fn push_state(&self, url: &str) -> Result<(), PlatformError> {
        if self.reject_push.get() {
            return Err(PlatformError::History("SecurityError".into()));
        }
        self.pushed.borrow_mut().push(url.to_string());
        *self.current.borrow_mut() = Location::parse(url);
        Ok(())
    }

    fn navigate(&self, url: &str) -> Result<(), PlatformError> {
        self.navigations.borrow_mut().push(url.to_string());
        *self.current.borrow_mut() = Location::parse(url);
        Ok(())
    }
}
