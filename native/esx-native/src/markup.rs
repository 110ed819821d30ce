//! Markup input model.
//!
//! A read-only tree handed over by the host parser. Expressions embedded in
//! the markup are opaque to the core and travel as the host's own type `E`:
//! `oxc_ast::ast::Expression<'a>` for the JavaScript adapter, `String`
//! (expression source text) for the JSON surface.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// 1-based line/column of a byte offset into `source`.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let prefix = source.get(..offset as usize).unwrap_or(source);
        let line = prefix.matches('\n').count() as u32 + 1;
        let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = prefix[line_start..].chars().count() as u32 + 1;
        Self { line, column }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Attribute name, optionally namespaced (`xmlns:xlink`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    pub namespace: Option<String>,
    pub name: String,
}

impl QualifiedName {
    pub fn new(name: &str) -> Self {
        Self {
            namespace: None,
            name: name.to_string(),
        }
    }

    pub fn namespaced(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.split_once(':') {
            Some((ns, local)) if !ns.is_empty() && !local.is_empty() => {
                Ok(Self::namespaced(ns, local))
            }
            None if !raw.is_empty() => Ok(Self::new(raw)),
            _ => Err(format!("Invalid attribute name '{}'", raw)),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

/// The name position of an opening tag, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementName {
    /// `div`, `MyComponent`
    Identifier(String),
    /// `xml:svg`
    Namespaced { namespace: String, name: String },
    /// `UI.Button`, `this.Item`; segments in source order
    Member(Vec<String>),
}

impl ElementName {
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("Element name cannot be empty".to_string());
        }
        if let Some((namespace, name)) = raw.split_once(':') {
            if namespace.is_empty() || name.is_empty() || name.contains(':') {
                return Err(format!("Invalid namespaced element name '{}'", raw));
            }
            return Ok(ElementName::Namespaced {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        }
        if raw.contains('.') {
            let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
            if segments.iter().any(|s| s.is_empty()) {
                return Err(format!("Invalid member element name '{}'", raw));
            }
            return Ok(ElementName::Member(segments));
        }
        Ok(ElementName::Identifier(raw.to_string()))
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementName::Identifier(name) => f.write_str(name),
            ElementName::Namespaced { namespace, name } => write!(f, "{}:{}", namespace, name),
            ElementName::Member(segments) => f.write_str(&segments.join(".")),
        }
    }
}

impl TryFrom<String> for ElementName {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ElementName> for String {
    fn from(name: ElementName) -> Self {
        name.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarkupNode<E> {
    Element(ElementNode<E>),
    Fragment(FragmentNode<E>),
    Text(TextNode),
    Expression(ExpressionChild<E>),
    Spread(SpreadChild<E>),
}

/// An element or a component; which one is decided by the classifier from
/// the shape of `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode<E> {
    pub name: ElementName,
    #[serde(default = "Vec::new")]
    pub attributes: Vec<RawAttribute<E>>,
    #[serde(default = "Vec::new")]
    pub children: Vec<MarkupNode<E>>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentNode<E> {
    #[serde(default = "Vec::new")]
    pub children: Vec<MarkupNode<E>>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub raw: String,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionChild<E> {
    pub expression: E,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadChild<E> {
    pub expression: E,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RawAttribute<E> {
    Named(NamedAttribute<E>),
    Spread(SpreadAttribute<E>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedAttribute<E> {
    pub name: QualifiedName,
    pub value: Option<AttrValue<E>>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadAttribute<E> {
    pub expression: E,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AttrValue<E> {
    String(String),
    Expression(E),
    /// Bare markup as a value (`a=<span />`). Never lowered; rejected by the
    /// attribute aggregator.
    Markup(Box<MarkupNode<E>>),
}

impl<E> MarkupNode<E> {
    pub fn element(
        name: ElementName,
        attributes: Vec<RawAttribute<E>>,
        children: Vec<MarkupNode<E>>,
    ) -> Self {
        MarkupNode::Element(ElementNode {
            name,
            attributes,
            children,
            location: SourceLocation::default(),
        })
    }

    pub fn fragment(children: Vec<MarkupNode<E>>) -> Self {
        MarkupNode::Fragment(FragmentNode {
            children,
            location: SourceLocation::default(),
        })
    }

    pub fn text(raw: &str) -> Self {
        MarkupNode::Text(TextNode {
            raw: raw.to_string(),
            location: SourceLocation::default(),
        })
    }

    pub fn expression(expression: E) -> Self {
        MarkupNode::Expression(ExpressionChild {
            expression,
            location: SourceLocation::default(),
        })
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            MarkupNode::Element(el) => el.location,
            MarkupNode::Fragment(frag) => frag.location,
            MarkupNode::Text(text) => text.location,
            MarkupNode::Expression(expr) => expr.location,
            MarkupNode::Spread(spread) => spread.location,
        }
    }

    /// Elements and fragments; the nodes that lower to a chevron.
    pub fn is_chevron(&self) -> bool {
        matches!(self, MarkupNode::Element(_) | MarkupNode::Fragment(_))
    }
}

impl<E> RawAttribute<E> {
    pub fn named(name: QualifiedName, value: Option<AttrValue<E>>) -> Self {
        RawAttribute::Named(NamedAttribute {
            name,
            value,
            location: SourceLocation::default(),
        })
    }

    pub fn spread(expression: E) -> Self {
        RawAttribute::Spread(SpreadAttribute {
            expression,
            location: SourceLocation::default(),
        })
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            RawAttribute::Named(attr) => attr.location,
            RawAttribute::Spread(spread) => spread.location,
        }
    }
}
