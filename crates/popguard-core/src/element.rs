//! Snapshots of interacted DOM elements.
//!
//! The host hands the engine an [`ElementDescriptor`] for the literal event
//! target. Each descriptor carries its parent, so the tracker can walk the
//! ancestor chain outward without holding a live DOM handle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tag identity of an element, grouped by navigation capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementKind {
    /// `<a>` or `<area>`.
    Link,
    /// `<button>`.
    Button,
    /// `<input>`.
    Input,
    /// `<select>`.
    Select,
    /// `<textarea>`.
    TextArea,
    /// `<form>`.
    Form,
    /// Any other tag, lowercased.
    Other(String),
}

impl ElementKind {
    /// Classify an HTML tag name (case-insensitive). Only `<a>` and
    /// `<area>` are links; a `<link>` tag is metadata and classifies as
    /// [`ElementKind::Other`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "a" | "area" => Self::Link,
            "button" => Self::Button,
            "input" => Self::Input,
            "select" => Self::Select,
            "textarea" => Self::TextArea,
            "form" => Self::Form,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical name used in configuration and logs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Link => "link",
            Self::Button => "button",
            Self::Input => "input",
            Self::Select => "select",
            Self::TextArea => "textarea",
            Self::Form => "form",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("element kind must not be empty".to_string());
        }
        // Configuration names links by kind, not by tag.
        if trimmed.eq_ignore_ascii_case("link") {
            return Ok(Self::Link);
        }
        Ok(Self::from_tag(trimmed))
    }
}

impl TryFrom<String> for ElementKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A read-only snapshot of an element and its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Tag identity.
    pub kind: ElementKind,
    /// Attributes keyed by lowercase name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// The enclosing element, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<ElementDescriptor>>,
}

impl ElementDescriptor {
    /// Create a descriptor with no attributes and no parent.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            parent: None,
        }
    }

    /// Create a descriptor from an HTML tag name.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        Self::new(ElementKind::from_tag(tag))
    }

    /// A link pointing at `href`.
    #[must_use]
    pub fn link(href: impl Into<String>) -> Self {
        Self::new(ElementKind::Link).with_attribute("href", href)
    }

    /// Set an attribute (name is lowercased).
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Nest this element inside `parent`.
    #[must_use]
    pub fn within(mut self, parent: ElementDescriptor) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Look up an attribute by name (case-insensitive).
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `href` attribute.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.attribute("href")
    }

    /// The `target` attribute (e.g. `_blank`).
    #[must_use]
    pub fn target_attribute(&self) -> Option<&str> {
        self.attribute("target")
    }

    /// Whether this element is a link.
    #[must_use]
    pub fn is_link(&self) -> bool {
        self.kind == ElementKind::Link
    }

    /// Iterate this element followed by each ancestor, innermost first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }
}

impl fmt::Display for ElementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.kind)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        write!(f, ">")
    }
}

/// Iterator over an element and its ancestor chain.
#[derive(Debug)]
pub struct Ancestors<'a> {
    next: Option<&'a ElementDescriptor>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ElementDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
