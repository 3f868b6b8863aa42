//! Owned XML element trees for a single record.
//!
//! The extractor materializes only the subtree of the `<record>` it is
//! currently reading, as an [`Element`]. Everything downstream of the reader
//! works on these trees, and traversals that only need structure (children and
//! text) are written against the [`ElementNode`] trait.

/// A node with ordered children and optional text.
pub trait ElementNode {
    /// Child elements in document order.
    fn child_nodes(&self) -> &[Self]
    where
        Self: Sized;

    /// Character data directly inside this node, if any.
    fn text(&self) -> Option<&str>;

    /// Returns true if this node has no child elements.
    fn is_leaf(&self) -> bool
    where
        Self: Sized,
    {
        self.child_nodes().is_empty()
    }
}

/// An XML element with its namespace resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI the element name resolved to, `None` when unbound
    pub namespace: Option<String>,
    /// Local (unprefixed) element name
    pub local_name: String,
    /// Attributes as (local name, unescaped value), in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<Element>,
    /// Concatenated character data directly inside this element
    pub text: String,
}

impl Element {
    /// Create an element with no attributes, children or text.
    #[must_use]
    pub fn new(namespace: Option<String>, local_name: impl Into<String>) -> Self {
        Element {
            namespace,
            local_name: local_name.into(),
            ..Default::default()
        }
    }

    /// Add an attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set the text content, builder style.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Value of the first attribute with the given local name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if this element has the given namespace and local name.
    #[must_use]
    pub fn is_named(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == namespace
    }

    /// Child elements with the given local name, in any namespace.
    pub fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter(move |child| child.local_name == local_name)
    }
}

impl ElementNode for Element {
    fn child_nodes(&self) -> &[Self] {
        &self.children
    }

    fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }
}
