//! [`Document`] backed by the live browser DOM.

use mitsutouge_page::{Document, DomError, Selector};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, NodeList};

use crate::dom::{self, js_error_message};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserDocument {
    inner: web_sys::Document,
}

impl BrowserDocument {
    #[must_use]
    pub const fn new(inner: web_sys::Document) -> Self {
        Self { inner }
    }

    /// The document of the current window.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Js`] outside of a browser context.
    pub fn current() -> Result<Self, DomError> {
        dom::document()
            .map(Self::new)
            .map_err(|err| DomError::Js(js_error_message(&err)))
    }

    #[must_use]
    pub const fn inner(&self) -> &web_sys::Document {
        &self.inner
    }
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn insert_error(err: &wasm_bindgen::JsValue) -> DomError {
    DomError::Insert(js_error_message(err))
}

impl Document for BrowserDocument {
    type Element = Element;

    fn root(&self) -> Option<Element> {
        self.inner.document_element()
    }

    fn body(&self) -> Option<Element> {
        self.inner.body().map(Element::from)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.inner.get_element_by_id(id)
    }

    fn query_all(&self, scope: Option<&Element>, selector: &Selector) -> Vec<Element> {
        let css = selector.to_string();
        let found = match scope {
            Some(el) => el.query_selector_all(&css),
            None => self.inner.query_selector_all(&css),
        };
        match found {
            Ok(list) => elements(&list),
            Err(err) => {
                log::warn!("selector `{css}` rejected: {}", js_error_message(&err));
                Vec::new()
            }
        }
    }

    fn tag_name(&self, el: &Element) -> String {
        el.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &Element, name: &str, value: &str) -> Result<(), DomError> {
        el.set_attribute(name, value).map_err(|err| DomError::Attribute {
            name: name.to_string(),
            reason: js_error_message(&err),
        })
    }

    fn remove_attribute(&self, el: &Element, name: &str) -> Result<(), DomError> {
        el.remove_attribute(name).map_err(|err| DomError::Attribute {
            name: name.to_string(),
            reason: js_error_message(&err),
        })
    }

    fn text_content(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn set_inner_html(&self, el: &Element, html: &str) {
        el.set_inner_html(html);
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.inner
            .create_element(tag)
            .map_err(|_| DomError::CreateElement(tag.to_string()))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(|_| ()).map_err(|err| insert_error(&err))
    }

    fn prepend_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.prepend_with_node_1(child).map_err(|err| insert_error(&err))
    }

    fn insert_before(&self, reference: &Element, node: &Element) -> Result<(), DomError> {
        let parent = reference.parent_node().ok_or(DomError::Detached)?;
        parent
            .insert_before(node, Some(reference))
            .map(|_| ())
            .map_err(|err| insert_error(&err))
    }

    fn parent(&self, el: &Element) -> Option<Element> {
        el.parent_element()
    }

    fn first_child(&self, parent: &Element) -> Option<Element> {
        parent.first_element_child()
    }

    fn contains(&self, container: &Element, el: &Element) -> bool {
        container.contains(Some(el))
    }

    fn focus(&self, el: &Element) -> bool {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return false;
        };
        if html.focus().is_err() {
            return false;
        }
        self.active_element().as_ref() == Some(el)
    }

    fn active_element(&self) -> Option<Element> {
        self.inner.active_element()
    }

    fn click(&self, el: &Element) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            html.click();
        }
    }
}
