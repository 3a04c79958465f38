//! In-memory page used by tests, the tester CLI and any non-browser host.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Selector};
use crate::error::DomError;

/// Handle to an element inside a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Leading text before the child elements.
    text: String,
    /// Raw markup assigned through `set_inner_html`; replaces text and children.
    markup: Option<String>,
    clicks: usize,
}

#[derive(Debug, Clone, Default)]
struct Tree {
    nodes: Vec<NodeData>,
    active: Option<NodeId>,
}

impl Tree {
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn descendants(&self, from: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(from).children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.node(node).parent {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    fn text_of(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        if let Some(markup) = &node.markup {
            out.push_str(&strip_tags(markup));
            return;
        }
        out.push_str(&node.text);
        for child in &node.children {
            self.text_of(*child, out);
        }
    }

    fn focusable(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.attrs.contains_key("disabled") {
            return false;
        }
        match node.tag.as_str() {
            "button" | "input" | "select" | "textarea" | "summary" => true,
            "a" | "area" => node.attrs.contains_key("href") || node.attrs.contains_key("tabindex"),
            _ => node.attrs.contains_key("tabindex"),
        }
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        let _ = write!(out, "<{}", node.tag);
        for (name, value) in &node.attrs {
            let _ = write!(
                out,
                " {name}=\"{}\"",
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        out.push('>');
        if let Some(markup) = &node.markup {
            out.push_str(markup);
        } else {
            out.push_str(&html_escape::encode_text(&node.text));
            for child in &node.children {
                self.serialize(*child, out);
            }
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

/// Text content of a markup fragment: tags dropped, entities decoded.
fn strip_tags(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    html_escape::decode_html_entities(&text).into_owned()
}

/// Serializable element tree used to seed a [`Page`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFixture {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<PageFixture>,
}

impl PageFixture {
    /// Parse a fixture from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an element tree.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Arena backed document.
///
/// Always holds `<html>` with a `<head>` and a `<body>`; elements created
/// through [`Document::create_element`] stay detached until inserted.
#[derive(Debug, Clone)]
pub struct Page {
    tree: RefCell<Tree>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let root = tree.push("html");
        let head = tree.push("head");
        let body = tree.push("body");
        for child in [head, body] {
            tree.node_mut(child).parent = Some(root);
            tree.node_mut(root).children.push(child);
        }
        Self {
            tree: RefCell::new(tree),
            root,
            head,
            body,
        }
    }

    /// Build a page from a fixture rooted at `html`; its `head` and `body`
    /// children are merged into the page's own.
    #[must_use]
    pub fn from_fixture(fixture: &PageFixture) -> Self {
        let page = Self::new();
        let (root, head, body) = (page.root, page.head, page.body);
        if fixture.tag.eq_ignore_ascii_case("html") {
            page.merge_attrs(root, &fixture.attrs);
            for child in &fixture.children {
                if child.tag.eq_ignore_ascii_case("head") {
                    page.merge_attrs(head, &child.attrs);
                    page.add_children(head, &child.children);
                } else if child.tag.eq_ignore_ascii_case("body") {
                    page.merge_attrs(body, &child.attrs);
                    page.set_own_text(body, &child.text);
                    page.add_children(body, &child.children);
                } else {
                    page.add_fixture(body, child);
                }
            }
        } else {
            page.add_fixture(body, fixture);
        }
        page
    }

    fn merge_attrs(&self, id: NodeId, attrs: &BTreeMap<String, String>) {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(id)
            .attrs
            .extend(attrs.iter().map(|(k, v)| (k.to_ascii_lowercase(), v.clone())));
    }

    fn set_own_text(&self, id: NodeId, text: &str) {
        self.tree.borrow_mut().node_mut(id).text = text.to_string();
    }

    fn add_children(&self, parent: NodeId, children: &[PageFixture]) {
        for child in children {
            self.add_fixture(parent, child);
        }
    }

    fn add_fixture(&self, parent: NodeId, fixture: &PageFixture) -> NodeId {
        let id = self.add(parent, &fixture.tag).text(&fixture.text).id();
        self.merge_attrs(id, &fixture.attrs);
        self.add_children(id, &fixture.children);
        id
    }

    #[must_use]
    pub const fn head(&self) -> NodeId {
        self.head
    }

    #[must_use]
    pub const fn body_id(&self) -> NodeId {
        self.body
    }

    /// Append a new `tag` element under `parent` and return a builder for it.
    pub fn add(&self, parent: NodeId, tag: &str) -> NodeBuilder<'_> {
        let mut tree = self.tree.borrow_mut();
        let id = tree.push(tag);
        tree.node_mut(id).parent = Some(parent);
        tree.node_mut(parent).children.push(id);
        NodeBuilder { page: self, id }
    }

    /// Markup assigned through `set_inner_html`, if any.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> Option<String> {
        self.tree.borrow().node(id).markup.clone()
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.borrow().node(id).children.clone()
    }

    /// Number of times [`Document::click`] ran on `id`.
    #[must_use]
    pub fn clicks(&self, id: NodeId) -> usize {
        self.tree.borrow().node(id).clicks
    }

    /// Render the whole document as HTML, attributes sorted by name.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.tree.borrow().serialize(self.root, &mut out);
        out
    }
}

/// Fluent helper returned by [`Page::add`].
#[derive(Debug)]
pub struct NodeBuilder<'a> {
    page: &'a Page,
    id: NodeId,
}

impl NodeBuilder<'_> {
    #[must_use]
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.page
            .tree
            .borrow_mut()
            .node_mut(self.id)
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    #[must_use]
    pub fn text(self, text: &str) -> Self {
        self.page.set_own_text(self.id, text);
        self
    }

    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }
}

impl Document for Page {
    type Element = NodeId;

    fn root(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_first(None, &Selector::any().equals("id", id))
    }

    fn query_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut candidates = Vec::new();
        tree.descendants(scope.copied().unwrap_or(self.root), &mut candidates);
        if scope.is_none() {
            candidates.insert(0, self.root);
        }
        candidates
            .into_iter()
            .filter(|id| {
                let node = tree.node(*id);
                selector.matches(&node.tag, |name| node.attrs.get(name).map(String::as_str))
            })
            .collect()
    }

    fn tag_name(&self, el: &NodeId) -> String {
        self.tree.borrow().node(*el).tag.clone()
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .node(*el)
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn set_attribute(&self, el: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(DomError::Attribute {
                name: name.to_string(),
                reason: "invalid attribute name".to_string(),
            });
        }
        self.tree
            .borrow_mut()
            .node_mut(*el)
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&self, el: &NodeId, name: &str) -> Result<(), DomError> {
        self.tree
            .borrow_mut()
            .node_mut(*el)
            .attrs
            .remove(&name.to_ascii_lowercase());
        Ok(())
    }

    fn text_content(&self, el: &NodeId) -> String {
        let mut out = String::new();
        self.tree.borrow().text_of(*el, &mut out);
        out
    }

    fn set_text_content(&self, el: &NodeId, text: &str) {
        let mut tree = self.tree.borrow_mut();
        let children = std::mem::take(&mut tree.node_mut(*el).children);
        for child in children {
            tree.node_mut(child).parent = None;
        }
        let node = tree.node_mut(*el);
        node.markup = None;
        node.text = text.to_string();
    }

    fn set_inner_html(&self, el: &NodeId, html: &str) {
        let mut tree = self.tree.borrow_mut();
        let children = std::mem::take(&mut tree.node_mut(*el).children);
        for child in children {
            tree.node_mut(child).parent = None;
        }
        let node = tree.node_mut(*el);
        node.text.clear();
        node.markup = Some(html.to_string());
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(DomError::CreateElement(tag.to_string()));
        }
        Ok(self.tree.borrow_mut().push(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if parent == child || tree.is_ancestor(*child, *parent) {
            return Err(DomError::Insert("cannot insert an ancestor into itself".into()));
        }
        tree.detach(*child);
        tree.node_mut(*child).parent = Some(*parent);
        tree.node_mut(*parent).children.push(*child);
        Ok(())
    }

    fn prepend_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if parent == child || tree.is_ancestor(*child, *parent) {
            return Err(DomError::Insert("cannot insert an ancestor into itself".into()));
        }
        tree.detach(*child);
        tree.node_mut(*child).parent = Some(*parent);
        tree.node_mut(*parent).children.insert(0, *child);
        Ok(())
    }

    fn insert_before(&self, reference: &NodeId, node: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if reference == node {
            return Ok(());
        }
        let parent = tree.node(*reference).parent.ok_or(DomError::Detached)?;
        if parent == *node || tree.is_ancestor(*node, parent) {
            return Err(DomError::Insert("cannot insert an ancestor into itself".into()));
        }
        tree.detach(*node);
        let siblings = &mut tree.node_mut(parent).children;
        let index = siblings
            .iter()
            .position(|c| c == reference)
            .ok_or(DomError::Detached)?;
        siblings.insert(index, *node);
        tree.node_mut(*node).parent = Some(parent);
        Ok(())
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.tree.borrow().node(*el).parent
    }

    fn first_child(&self, parent: &NodeId) -> Option<NodeId> {
        self.tree.borrow().node(*parent).children.first().copied()
    }

    fn contains(&self, container: &NodeId, el: &NodeId) -> bool {
        container == el || self.tree.borrow().is_ancestor(*container, *el)
    }

    fn focus(&self, el: &NodeId) -> bool {
        let mut tree = self.tree.borrow_mut();
        if !tree.focusable(*el) {
            return false;
        }
        tree.active = Some(*el);
        true
    }

    fn active_element(&self) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.active.or(Some(self.body))
    }

    fn click(&self, el: &NodeId) {
        self.tree.borrow_mut().node_mut(*el).clicks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_page_has_head_and_body() {
        let page = Page::new();
        assert_eq!(page.children(page.root().unwrap()), vec![page.head(), page.body_id()]);
        assert_eq!(page.serialize(), "<html><head></head><body></body></html>");
    }

    #[test]
    fn query_all_returns_document_order() {
        let page = Page::new();
        let body = page.body_id();
        let first = page.add(body, "p").attr("data-ja", "一").id();
        let section = page.add(body, "section").id();
        let nested = page.add(section, "p").attr("data-ja", "二").id();
        let found = page.query_all(None, &Selector::any().present("data-ja"));
        assert_eq!(found, vec![first, nested]);

        let scoped = page.query_all(Some(&section), &Selector::tag("p"));
        assert_eq!(scoped, vec![nested]);
    }

    #[test]
    fn inner_html_replaces_children_and_exposes_text() {
        let page = Page::new();
        let body = page.body_id();
        let p = page.add(body, "p").text("old").id();
        let _ = page.add(p, "span").text("child").id();
        page.set_inner_html(&p, "<b>Hello</b> &amp; bye");
        assert_eq!(page.children(p), Vec::new());
        assert_eq!(page.inner_html(p).as_deref(), Some("<b>Hello</b> &amp; bye"));
        assert_eq!(page.text_content(&p), "Hello & bye");
    }

    #[test]
    fn insert_before_places_node_ahead_of_reference() {
        let page = Page::new();
        let body = page.body_id();
        let a = page.add(body, "input").id();
        let b = page.add(body, "input").id();
        let label = page.create_element("label").unwrap();
        page.insert_before(&b, &label).unwrap();
        assert_eq!(page.children(body), vec![a, label, b]);
    }

    #[test]
    fn insert_before_detached_reference_fails() {
        let page = Page::new();
        let loose = page.create_element("div").unwrap();
        let other = page.create_element("span").unwrap();
        assert_eq!(page.insert_before(&loose, &other), Err(DomError::Detached));
    }

    #[test]
    fn insert_before_rejects_ancestor_under_descendant() {
        let page = Page::new();
        let body = page.body_id();
        let section = page.add(body, "section").id();
        let inner = page.add(section, "div").id();
        let leaf = page.add(inner, "p").id();
        assert!(matches!(page.insert_before(&leaf, &section), Err(DomError::Insert(_))));
        assert!(matches!(page.insert_before(&leaf, &inner), Err(DomError::Insert(_))));
        assert_eq!(page.children(body), vec![section]);
        assert_eq!(page.children(inner), vec![leaf]);
        assert_eq!(page.query_all(Some(&body), &Selector::any()).len(), 3);
    }

    #[test]
    fn focus_rejects_plain_containers() {
        let page = Page::new();
        let body = page.body_id();
        let div = page.add(body, "div").id();
        let button = page.add(body, "button").id();
        assert!(!page.focus(&div));
        assert!(page.focus(&button));
        assert_eq!(page.active_element(), Some(button));
    }

    #[test]
    fn fixture_merges_head_and_body() {
        let json = r#"{
            "tag": "html",
            "attrs": {"lang": "ja"},
            "children": [
                {"tag": "head", "children": [{"tag": "title", "text": "三ツ峠"}]},
                {"tag": "body", "children": [{"tag": "main", "attrs": {"id": "top"}}]}
            ]
        }"#;
        let page = Page::from_fixture(&PageFixture::from_json(json).unwrap());
        assert_eq!(
            page.serialize(),
            "<html lang=\"ja\"><head><title>三ツ峠</title></head><body><main id=\"top\"></main></body></html>"
        );
    }
}
