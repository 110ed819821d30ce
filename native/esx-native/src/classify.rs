//! Per-node classification.
//!
//! Pure decisions over a single node: which chevron kind a tag name lowers
//! to, and how an already lowered property list is summarized.

use regex::Regex;

use crate::markup::ElementName;
use crate::token::{ChevronTag, ComponentPath, Property, TokenKind};

lazy_static::lazy_static! {
    static ref INTRINSIC_TAG_RE: Regex = Regex::new(r"^[a-z]").unwrap();
}

/// Lowercase-initial identifiers name intrinsic elements (`div`, `my-widget`).
pub fn is_intrinsic_tag(name: &str) -> bool {
    INTRINSIC_TAG_RE.is_match(name)
}

/// Element vs component.
///
/// Namespaced names and lowercase-initial identifiers are elements tagged
/// with their literal text (`xml:svg` stays `"xml:svg"`). Everything else is
/// a component tagged with the expression path it names.
pub fn classify_name(name: &ElementName) -> ChevronTag {
    match name {
        ElementName::Namespaced { namespace, name } => {
            ChevronTag::Element(format!("{}:{}", namespace, name))
        }
        ElementName::Identifier(id) if is_intrinsic_tag(id) => ChevronTag::Element(id.clone()),
        ElementName::Identifier(id) => ChevronTag::Component(ComponentPath(vec![id.clone()])),
        ElementName::Member(segments) => ChevronTag::Component(ComponentPath(segments.clone())),
    }
}

/// Set-level summary of a property list.
///
/// - empty → `None` (the "no properties" sentinel)
/// - any spread → `RUNTIME`
/// - only static members → `STATIC`
/// - only dynamic members → `RUNTIME`
/// - static and dynamic members → `MIXED`
///
/// Looks at every member; the result does not depend on member order.
pub fn classify_properties<E>(properties: &[Property<E>]) -> Option<TokenKind> {
    if properties.is_empty() {
        return None;
    }

    let mut has_static = false;
    let mut has_dynamic = false;
    let mut has_spread = false;
    for property in properties {
        match property {
            Property::Static { .. } => has_static = true,
            Property::Dynamic { .. } => has_dynamic = true,
            Property::Spread { .. } => has_spread = true,
        }
    }

    Some(match (has_static, has_dynamic, has_spread) {
        (_, _, true) => TokenKind::Runtime,
        (true, false, false) => TokenKind::Static,
        (false, true, false) => TokenKind::Runtime,
        _ => TokenKind::Mixed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticValue;

    fn static_prop(name: &str) -> Property<&'static str> {
        Property::Static {
            name: name.to_string(),
            value: StaticValue::Bool(true),
        }
    }

    fn dynamic_prop(name: &str) -> Property<&'static str> {
        Property::Dynamic {
            name: name.to_string(),
            value: "x",
        }
    }

    fn spread_prop() -> Property<&'static str> {
        Property::Spread { value: "s" }
    }

    #[test]
    fn test_intrinsic_tags() {
        assert!(is_intrinsic_tag("div"));
        assert!(is_intrinsic_tag("my-widget"));
        assert!(!is_intrinsic_tag("Button"));
        assert!(!is_intrinsic_tag("_private"));
        assert!(!is_intrinsic_tag(""));
    }

    #[test]
    fn test_classify_name() {
        assert_eq!(
            classify_name(&ElementName::parse("div").unwrap()),
            ChevronTag::Element("div".to_string())
        );
        assert_eq!(
            classify_name(&ElementName::parse("xml:svg").unwrap()),
            ChevronTag::Element("xml:svg".to_string())
        );
        assert_eq!(
            classify_name(&ElementName::parse("Button").unwrap()),
            ChevronTag::Component(ComponentPath(vec!["Button".to_string()]))
        );
        // Member access is always a component, even with a lowercase head.
        assert_eq!(
            classify_name(&ElementName::parse("ui.forms.Input").unwrap()),
            ChevronTag::Component(ComponentPath(vec![
                "ui".to_string(),
                "forms".to_string(),
                "Input".to_string()
            ]))
        );
    }

    #[test]
    fn test_classify_properties() {
        assert_eq!(classify_properties::<&str>(&[]), None);
        assert_eq!(
            classify_properties(&[static_prop("a")]),
            Some(TokenKind::Static)
        );
        assert_eq!(
            classify_properties(&[static_prop("a"), static_prop("b")]),
            Some(TokenKind::Static)
        );
        assert_eq!(
            classify_properties(&[dynamic_prop("a")]),
            Some(TokenKind::Runtime)
        );
        assert_eq!(classify_properties(&[spread_prop()]), Some(TokenKind::Runtime));
        assert_eq!(
            classify_properties(&[static_prop("a"), dynamic_prop("b")]),
            Some(TokenKind::Mixed)
        );
        assert_eq!(
            classify_properties(&[dynamic_prop("b"), static_prop("a")]),
            Some(TokenKind::Mixed)
        );
    }

    #[test]
    fn test_spread_forces_runtime_in_any_position() {
        assert_eq!(
            classify_properties(&[static_prop("a"), spread_prop()]),
            Some(TokenKind::Runtime)
        );
        assert_eq!(
            classify_properties(&[spread_prop(), static_prop("a")]),
            Some(TokenKind::Runtime)
        );
        assert_eq!(
            classify_properties(&[static_prop("a"), dynamic_prop("b"), spread_prop()]),
            Some(TokenKind::Runtime)
        );
    }
}
