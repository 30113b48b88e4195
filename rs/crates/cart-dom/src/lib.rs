//! cart-dom — DomNode tree shared by the cart view and the HTML renderer
//!
//! The view builds one `DomNode` tree per list container; the HTML renderer
//! serializes it.

use std::collections::HashMap;

/// A single node in the view tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomNode {
    /// HTML tag name (e.g. "ul", "li", "button")
    pub tag: String,

    /// Stable identity, emitted as `data-key`
    pub key: Option<String>,

    /// HTML attributes (class, data-id, etc.)
    pub attrs: Option<HashMap<String, String>>,

    /// Map of DOM event name → action name (e.g. "click" → "add-to-cart")
    pub events: Option<HashMap<String, String>>,

    /// Text content for leaf nodes
    pub text: Option<String>,

    /// Child nodes
    pub children: Option<Vec<DomNode>>,
}

impl DomNode {
    /// Create an empty element
    pub fn element(tag: &str) -> Self {
        DomNode {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    /// Create a simple text node
    pub fn text(tag: &str, content: &str) -> Self {
        DomNode::element(tag).with_text(content)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    /// Bind a DOM event to a named action
    pub fn on(mut self, event: &str, action: &str) -> Self {
        self.events
            .get_or_insert_with(HashMap::new)
            .insert(event.to_string(), action.to_string());
        self
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DomNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn push_child(&mut self, child: DomNode) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Get an attribute if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// Get a class attribute if present
    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }

    /// True if the whitespace-separated class list contains `name`
    pub fn has_class(&self, name: &str) -> bool {
        self.class()
            .map(|c| c.split_whitespace().any(|part| part == name))
            .unwrap_or(false)
    }

    /// Iterate over children (empty slice if none)
    pub fn children_iter(&self) -> &[DomNode] {
        match &self.children {
            Some(c) => c,
            None => &[],
        }
    }

    /// Get an event action by event name
    pub fn event(&self, name: &str) -> Option<&str> {
        self.events.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// First descendant (depth-first, self included) carrying `class`
    pub fn find_class(&self, class: &str) -> Option<&DomNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children_iter().iter().find_map(|c| c.find_class(class))
    }
}
