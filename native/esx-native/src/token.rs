//! Token tree output model.
//!
//! One sum type with five kinds. Every host encoding (call expressions for
//! JavaScript, tagged JSON objects for everything else) is an adapter over
//! these types; no encoding gets its own lowering path.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

use crate::classify::classify_properties;
use crate::reference::TemplateReference;

/// Discriminants shared with the support module. The numeric values are part
/// of the runtime contract (`ESXToken.STATIC_TYPE` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Static,
    Mixed,
    Runtime,
    Template,
    Element,
    Fragment,
    Component,
}

impl TokenKind {
    pub fn bits(self) -> u32 {
        match self {
            TokenKind::Static => 1 << 0,
            TokenKind::Mixed => 1 << 1,
            TokenKind::Runtime => 1 << 2,
            TokenKind::Template => 1 << 3,
            TokenKind::Element => 1 << 6,
            TokenKind::Fragment => 1 << 7,
            TokenKind::Component => 1 << 8,
        }
    }

    /// Name of the static field holding this discriminant on the support class.
    pub fn type_name(self) -> &'static str {
        match self {
            TokenKind::Static => "STATIC_TYPE",
            TokenKind::Mixed => "MIXED_TYPE",
            TokenKind::Runtime => "RUNTIME_TYPE",
            TokenKind::Template => "TEMPLATE_TYPE",
            TokenKind::Element => "ELEMENT_TYPE",
            TokenKind::Fragment => "FRAGMENT_TYPE",
            TokenKind::Component => "COMPONENT_TYPE",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Token<E> {
    Template(Template<E>),
    Chevron(Chevron<E>),
    PropertySet(PropertySet<E>),
    Property(Property<E>),
    Leaf(Leaf<E>),
}

impl<E> Token<E> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Template(_) => TokenKind::Template,
            Token::Chevron(chevron) => chevron.kind(),
            Token::PropertySet(set) => set.kind(),
            Token::Property(property) => property.kind(),
            Token::Leaf(leaf) => leaf.kind(),
        }
    }

    pub fn as_template(&self) -> Option<&Template<E>> {
        match self {
            Token::Template(template) => Some(template),
            _ => None,
        }
    }
}

/// A markup root together with the identity slot minted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Template<E> {
    pub id: TemplateReference,
    pub value: Chevron<E>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHEVRON
// ═══════════════════════════════════════════════════════════════════════════════

/// Member access path of a component tag, e.g. `UI.Button`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentPath(pub Vec<String>);

impl ComponentPath {
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl Serialize for ComponentPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Element tags are strings, component tags are expressions, fragments have
/// no tag at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChevronTag {
    Element(String),
    Component(ComponentPath),
    Fragment,
}

/// An angle-bracket construct.
///
/// `properties` and `children` use `None` as the "nothing here" sentinel;
/// `Some` always holds a non-empty collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Chevron<E> {
    pub tag: ChevronTag,
    pub properties: Option<PropertySet<E>>,
    pub children: Option<Vec<Leaf<E>>>,
}

impl<E> Chevron<E> {
    pub fn new(tag: ChevronTag, properties: Option<PropertySet<E>>, children: Vec<Leaf<E>>) -> Self {
        Self {
            tag,
            properties,
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self.tag {
            ChevronTag::Element(_) => TokenKind::Element,
            ChevronTag::Component(_) => TokenKind::Component,
            ChevronTag::Fragment => TokenKind::Fragment,
        }
    }

    pub fn children(&self) -> &[Leaf<E>] {
        self.children.as_deref().unwrap_or(&[])
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StaticValue {
    Bool(bool),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property<E> {
    /// Value known at compile time (`a`, `a="x"`).
    Static { name: String, value: StaticValue },
    /// Value supplied by an expression container (`a={x}`).
    Dynamic { name: String, value: E },
    /// `{...x}`; members are only known at evaluation time.
    Spread { value: E },
}

impl<E> Property<E> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Property::Static { .. } => TokenKind::Static,
            Property::Dynamic { .. } | Property::Spread { .. } => TokenKind::Runtime,
        }
    }

    /// Spreads carry the empty name.
    pub fn name(&self) -> &str {
        match self {
            Property::Static { name, .. } | Property::Dynamic { name, .. } => name,
            Property::Spread { .. } => "",
        }
    }

    pub fn is_spread(&self) -> bool {
        matches!(self, Property::Spread { .. })
    }
}

/// Ordered, classified property list of one chevron.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySet<E> {
    kind: TokenKind,
    properties: Vec<Property<E>>,
}

impl<E> PropertySet<E> {
    /// Classifies `properties` as a whole. Returns `None` for an empty list.
    pub fn new(properties: Vec<Property<E>>) -> Option<Self> {
        let kind = classify_properties(&properties)?;
        Some(Self { kind, properties })
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn properties(&self) -> &[Property<E>] {
        &self.properties
    }

    pub fn into_properties(self) -> Vec<Property<E>> {
        self.properties
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEAF
// ═══════════════════════════════════════════════════════════════════════════════

/// One entry of a children sequence. Nested chevrons are wrapped as static
/// leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf<E> {
    Text(String),
    Interpolation(E),
    Chevron(Box<Chevron<E>>),
}

impl<E> Leaf<E> {
    pub fn kind(&self) -> TokenKind {
        match self {
            Leaf::Text(_) | Leaf::Chevron(_) => TokenKind::Static,
            Leaf::Interpolation(_) => TokenKind::Runtime,
        }
    }

    pub fn as_chevron(&self) -> Option<&Chevron<E>> {
        match self {
            Leaf::Chevron(chevron) => Some(chevron),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

impl<E: Serialize> Serialize for Template<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Template", 3)?;
        s.serialize_field("type", &TokenKind::Template)?;
        s.serialize_field("id", &self.id.name)?;
        s.serialize_field("value", &self.value)?;
        s.end()
    }
}

impl<E: Serialize> Serialize for Chevron<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Chevron", 4)?;
        s.serialize_field("type", &self.kind())?;
        match &self.tag {
            ChevronTag::Element(tag) => s.serialize_field("value", tag)?,
            ChevronTag::Component(path) => s.serialize_field("value", path)?,
            ChevronTag::Fragment => s.serialize_field("value", &Option::<String>::None)?,
        }
        s.serialize_field("properties", &self.properties)?;
        s.serialize_field("children", &self.children)?;
        s.end()
    }
}

impl<E: Serialize> Serialize for PropertySet<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PropertySet", 2)?;
        s.serialize_field("type", &self.kind)?;
        s.serialize_field("value", &self.properties)?;
        s.end()
    }
}

impl<E: Serialize> Serialize for Property<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Property", 4)?;
        s.serialize_field("type", &self.kind())?;
        s.serialize_field("name", self.name())?;
        match self {
            Property::Static { value, .. } => s.serialize_field("value", value)?,
            Property::Dynamic { value, .. } | Property::Spread { value } => {
                s.serialize_field("value", value)?
            }
        }
        s.serialize_field("spread", &self.is_spread())?;
        s.end()
    }
}

impl<E: Serialize> Serialize for Leaf<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Leaf", 2)?;
        s.serialize_field("type", &self.kind())?;
        match self {
            Leaf::Text(text) => s.serialize_field("value", text)?,
            Leaf::Interpolation(value) => s.serialize_field("value", value)?,
            Leaf::Chevron(chevron) => s.serialize_field("value", chevron.as_ref())?,
        }
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discriminants_match_support_module() {
        assert_eq!(TokenKind::Static.bits(), 1);
        assert_eq!(TokenKind::Mixed.bits(), 2);
        assert_eq!(TokenKind::Runtime.bits(), 4);
        assert_eq!(TokenKind::Template.bits(), 8);
        assert_eq!(TokenKind::Element.bits(), 64);
        assert_eq!(TokenKind::Fragment.bits(), 128);
        assert_eq!(TokenKind::Component.bits(), 256);
    }

    #[test]
    fn test_empty_children_use_sentinel() {
        let chevron: Chevron<String> =
            Chevron::new(ChevronTag::Element("div".to_string()), None, vec![]);
        assert!(chevron.children.is_none());
        assert!(chevron.children().is_empty());
        assert!(PropertySet::<String>::new(vec![]).is_none());
    }

    #[test]
    fn test_json_encoding() {
        let set = PropertySet::new(vec![
            Property::Static {
                name: "a".to_string(),
                value: StaticValue::Bool(true),
            },
            Property::Spread {
                value: "rest".to_string(),
            },
        ]);
        let chevron = Chevron::new(
            ChevronTag::Component(ComponentPath(vec!["UI".to_string(), "Card".to_string()])),
            set,
            vec![Leaf::Text("hi".to_string()), Leaf::Interpolation("x".to_string())],
        );
        let value = serde_json::to_value(&chevron).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "component",
                "value": "UI.Card",
                "properties": {
                    "type": "runtime",
                    "value": [
                        {"type": "static", "name": "a", "value": true, "spread": false},
                        {"type": "runtime", "name": "", "value": "rest", "spread": true}
                    ]
                },
                "children": [
                    {"type": "static", "value": "hi"},
                    {"type": "runtime", "value": "x"}
                ]
            })
        );
    }
}
