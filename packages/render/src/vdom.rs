use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node.
///
/// Attributes and styles use ordered maps so that equal documents always
/// produce equal trees (and byte-identical HTML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Id of the document entity this node renders
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// Comment node
    Comment { content: String },

    /// Visible stand-in for content that could not be rendered
    Placeholder {
        /// The `type` tag that was not understood
        kind: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn placeholder(kind: impl Into<String>, key: Option<String>) -> Self {
        let kind = kind.into();
        VNode::Placeholder {
            message: format!("Unsupported block: {}", kind),
            kind,
            key,
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Append a class to the `class` attribute
    pub fn with_class(mut self, class: &str) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            let entry = attributes.entry("class".to_string()).or_default();
            if !entry.split_whitespace().any(|c| c == class) {
                if !entry.is_empty() {
                    entry.push(' ');
                }
                entry.push_str(class);
            }
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles<K, V>(mut self, new_styles: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.extend(new_styles.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        match self {
            VNode::Element {
                key: ref mut node_key,
                ..
            }
            | VNode::Placeholder {
                key: ref mut node_key,
                ..
            } => *node_key = Some(key.into()),
            _ => {}
        }
        self
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            VNode::Element { key, .. } | VNode::Placeholder { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Depth-first, pre-order traversal
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a VNode)) {
        visit(self);
        for child in self.children() {
            child.walk(&mut *visit);
        }
    }

    /// First node (pre-order) matching `predicate`
    pub fn find(&self, predicate: impl Fn(&VNode) -> bool) -> Option<&VNode> {
        let mut found = None;
        self.walk(&mut |node| {
            if found.is_none() && predicate(node) {
                found = Some(node);
            }
        });
        found
    }

    pub fn find_by_key(&self, key: &str) -> Option<&VNode> {
        self.find(|node| node.key() == Some(key))
    }

    pub fn count(&self, predicate: impl Fn(&VNode) -> bool) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if predicate(node) {
                count += 1;
            }
        });
        count
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| match node {
            VNode::Text { content } => out.push_str(content),
            VNode::Placeholder { message, .. } => out.push_str(message),
            _ => {}
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let node = VNode::element("div")
            .with_class("a")
            .with_class("b")
            .with_class("a")
            .with_style("color", "red")
            .with_key("r-1")
            .with_child(VNode::text("hi"));

        assert_eq!(node.attr("class"), Some("a b"));
        assert!(node.has_class("b"));
        assert_eq!(node.style("color"), Some("red"));
        assert_eq!(node.key(), Some("r-1"));
        assert_eq!(node.text_content(), "hi");
    }

    #[test]
    fn test_find_and_count() {
        let tree = VNode::element("div").with_children(vec![
            VNode::element("p").with_key("b-1"),
            VNode::placeholder("mystery", Some("b-2".into())),
        ]);

        assert_eq!(tree.find_by_key("b-1").and_then(|n| n.tag()), Some("p"));
        assert_eq!(tree.count(|n| matches!(n, VNode::Placeholder { .. })), 1);
        assert_eq!(tree.text_content(), "Unsupported block: mystery");
    }

    #[test]
    fn test_builders_ignore_non_elements() {
        let text = VNode::text("x").with_attr("a", "b").with_child(VNode::text("y"));
        assert_eq!(text, VNode::text("x"));
    }
}
