//! Document abstraction shared by the browser backend and the in-memory page.

use std::fmt;

use crate::error::DomError;

/// Attribute condition inside a [`Compound`] selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// `[name]`
    Present(String),
    /// `[name="value"]`
    Equals(String, String),
    /// `[name^="value"]`
    Prefix(String, String),
    /// `[name*="value"]`
    Contains(String, String),
    /// `:not([name="value"])`
    NotEquals(String, String),
}

impl AttrMatch {
    /// Check the condition against the attribute's current value.
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Present(_) => value.is_some(),
            Self::Equals(_, expected) => value == Some(expected.as_str()),
            Self::Prefix(_, prefix) => value.is_some_and(|v| v.starts_with(prefix.as_str())),
            Self::Contains(_, needle) => value.is_some_and(|v| v.contains(needle.as_str())),
            Self::NotEquals(_, expected) => value != Some(expected.as_str()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Present(name)
            | Self::Equals(name, _)
            | Self::Prefix(name, _)
            | Self::Contains(name, _)
            | Self::NotEquals(name, _) => name,
        }
    }
}

/// A tag plus attribute conditions, e.g. `meta[property="og:title"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub attrs: Vec<AttrMatch>,
}

impl Compound {
    /// Match using a caller supplied attribute lookup.
    pub fn matches<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.tag
            .as_deref()
            .is_none_or(|want| want.eq_ignore_ascii_case(tag))
            && self.attrs.iter().all(|m| m.matches(attr(m.name())))
    }
}

/// Comma separated list of [`Compound`] alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    #[must_use]
    pub fn tag(tag: &str) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: Some(tag.to_ascii_lowercase()),
                attrs: Vec::new(),
            }],
        }
    }

    /// Any element, narrowed by attribute conditions.
    #[must_use]
    pub fn any() -> Self {
        Self {
            alternatives: vec![Compound::default()],
        }
    }

    #[must_use]
    pub fn tags(tags: &[&str]) -> Self {
        tags.iter()
            .map(|t| Self::tag(t))
            .fold(Self::default(), Self::or)
    }

    /// Add an attribute condition to the last alternative.
    #[must_use]
    pub fn with(mut self, condition: AttrMatch) -> Self {
        if self.alternatives.is_empty() {
            self.alternatives.push(Compound::default());
        }
        if let Some(last) = self.alternatives.last_mut() {
            last.attrs.push(condition);
        }
        self
    }

    #[must_use]
    pub fn present(self, name: &str) -> Self {
        self.with(AttrMatch::Present(name.to_string()))
    }

    #[must_use]
    pub fn equals(self, name: &str, value: &str) -> Self {
        self.with(AttrMatch::Equals(name.to_string(), value.to_string()))
    }

    #[must_use]
    pub fn prefix(self, name: &str, value: &str) -> Self {
        self.with(AttrMatch::Prefix(name.to_string(), value.to_string()))
    }

    #[must_use]
    pub fn contains(self, name: &str, value: &str) -> Self {
        self.with(AttrMatch::Contains(name.to_string(), value.to_string()))
    }

    #[must_use]
    pub fn not_equals(self, name: &str, value: &str) -> Self {
        self.with(AttrMatch::NotEquals(name.to_string(), value.to_string()))
    }

    /// Union of both selectors, keeping document order when queried.
    #[must_use]
    pub fn or(mut self, other: Self) -> Self {
        self.alternatives.extend(other.alternatives);
        self
    }

    #[must_use]
    pub fn alternatives(&self) -> &[Compound] {
        &self.alternatives
    }

    pub fn matches<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str> + Copy) -> bool {
        self.alternatives.iter().any(|c| c.matches(tag, attr))
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    f.write_str("\"")
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if self.attrs.is_empty() => f.write_str("*")?,
            None => {}
        }
        for cond in &self.attrs {
            let (open, op, name, value) = match cond {
                AttrMatch::Present(name) => {
                    write!(f, "[{name}]")?;
                    continue;
                }
                AttrMatch::Equals(n, v) => ("[", "=", n, v),
                AttrMatch::Prefix(n, v) => ("[", "^=", n, v),
                AttrMatch::Contains(n, v) => ("[", "*=", n, v),
                AttrMatch::NotEquals(n, v) => (":not([", "=", n, v),
            };
            write!(f, "{open}{name}{op}")?;
            write_quoted(f, value)?;
            f.write_str(if open == "[" { "]" } else { "])" })?;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, alt) in self.alternatives.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{alt}")?;
        }
        Ok(())
    }
}

/// The page as seen by the enhancer and the switcher.
///
/// Implementations use interior mutability: every mutation takes `&self` so
/// event handlers can share one document handle.
pub trait Document {
    type Element: Clone + PartialEq + fmt::Debug;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// All elements matching `selector` in document order, below `scope` or
    /// anywhere in the document when `scope` is `None`.
    fn query_all(&self, scope: Option<&Self::Element>, selector: &Selector) -> Vec<Self::Element>;

    /// Lowercase tag name.
    fn tag_name(&self, el: &Self::Element) -> String;
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error when the backend rejects the attribute.
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str) -> Result<(), DomError>;

    /// # Errors
    ///
    /// Returns an error when the backend rejects the removal.
    fn remove_attribute(&self, el: &Self::Element, name: &str) -> Result<(), DomError>;

    fn text_content(&self, el: &Self::Element) -> String;
    fn set_text_content(&self, el: &Self::Element, text: &str);
    fn set_inner_html(&self, el: &Self::Element, html: &str);

    /// # Errors
    ///
    /// Returns an error if the element cannot be created.
    fn create_element(&self, tag: &str) -> Result<Self::Element, DomError>;

    /// # Errors
    ///
    /// Returns an error if the node cannot be attached.
    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), DomError>;

    /// Insert `child` as the very first child node of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node cannot be attached.
    fn prepend_child(&self, parent: &Self::Element, child: &Self::Element) -> Result<(), DomError>;

    /// Insert `node` immediately before `reference` under the same parent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Detached`] when `reference` has no parent.
    fn insert_before(&self, reference: &Self::Element, node: &Self::Element) -> Result<(), DomError>;

    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// First element child of `parent`, skipping text nodes.
    fn first_child(&self, parent: &Self::Element) -> Option<Self::Element>;
    fn contains(&self, container: &Self::Element, el: &Self::Element) -> bool;

    /// Move focus to `el`. Returns `false` when the element cannot take focus.
    fn focus(&self, el: &Self::Element) -> bool;
    fn active_element(&self) -> Option<Self::Element>;

    /// Run the element's default activation behaviour.
    fn click(&self, el: &Self::Element);

    fn query_first(&self, scope: Option<&Self::Element>, selector: &Selector) -> Option<Self::Element> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn has_attribute(&self, el: &Self::Element, name: &str) -> bool {
        self.attribute(el, name).is_some()
    }

    /// Attribute value, treating an empty string as absent.
    fn non_empty_attribute(&self, el: &Self::Element, name: &str) -> Option<String> {
        self.attribute(el, name).filter(|v| !v.is_empty())
    }

    fn has_class(&self, el: &Self::Element, class: &str) -> bool {
        self.attribute(el, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// # Errors
    ///
    /// Propagates attribute failures from the backend.
    fn add_class(&self, el: &Self::Element, class: &str) -> Result<(), DomError> {
        if self.has_class(el, class) {
            return Ok(());
        }
        let joined = match self.attribute(el, "class") {
            Some(list) if !list.trim().is_empty() => format!("{} {class}", list.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(el, "class", &joined)
    }

    /// # Errors
    ///
    /// Propagates attribute failures from the backend.
    fn remove_class(&self, el: &Self::Element, class: &str) -> Result<(), DomError> {
        let Some(list) = self.attribute(el, "class") else {
            return Ok(());
        };
        if !list.split_ascii_whitespace().any(|c| c == class) {
            return Ok(());
        }
        let kept: Vec<&str> = list
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect();
        self.set_attribute(el, "class", &kept.join(" "))
    }
}
