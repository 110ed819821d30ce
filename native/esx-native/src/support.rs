//! The runtime support module contract.
//!
//! Lowered code calls `ESXToken.template`, `ESXToken.element`, ... and reads
//! the `*_TYPE` discriminants. The module is either imported or defined
//! inline, once per unit.

use serde::{Deserialize, Serialize};

pub const SUPPORT_BINDING: &str = "ESXToken";
pub const DEFAULT_SUPPORT_SOURCE: &str = "@ungap/esxtoken";

/// Guarded global definition; a second copy in the same realm is a no-op.
pub const INLINE_SUPPORT_MODULE: &str = r#"globalThis.ESXToken || (globalThis.ESXToken = class ESXToken {
  static STATIC_TYPE = 1 << 0;
  static MIXED_TYPE = 1 << 1;
  static RUNTIME_TYPE = 1 << 2;
  static TEMPLATE_TYPE = 1 << 3;
  static ELEMENT_TYPE = 1 << 6;
  static FRAGMENT_TYPE = 1 << 7;
  static COMPONENT_TYPE = 1 << 8;
  static create = (type, value) => ({__proto__: ESXToken.prototype, type, value});
  static property = (type, name, value) => ({__proto__: ESXToken.prototype, type, name, value});
  static template = (id, value) => ({__proto__: ESXToken.prototype, type: ESXToken.TEMPLATE_TYPE, id, value});
  static chevron = (type, value, properties, children) => ({__proto__: ESXToken.prototype, type, value, properties, children});
  static fragment = (...children) => ESXToken.chevron(ESXToken.FRAGMENT_TYPE, null, null, children);
  static element = (tag, properties, ...children) => ESXToken.chevron(ESXToken.ELEMENT_TYPE, tag, properties, children);
  static component = (fn, properties, ...children) => ESXToken.chevron(ESXToken.COMPONENT_TYPE, fn, properties, children);
});
"#;

/// What to put at the top of a unit so `ESXToken` resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SupportInjection {
    Inline,
    Import { source: String },
}

impl SupportInjection {
    /// Source text of the injected statement.
    pub fn statement(&self) -> String {
        match self {
            SupportInjection::Inline => INLINE_SUPPORT_MODULE.to_string(),
            SupportInjection::Import { source } => {
                let literal = serde_json::to_string(source).unwrap_or_default();
                format!("import {} from {};\n", SUPPORT_BINDING, literal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_import_statement() {
        let injection = SupportInjection::Import {
            source: DEFAULT_SUPPORT_SOURCE.to_string(),
        };
        assert_eq!(
            injection.statement(),
            "import ESXToken from \"@ungap/esxtoken\";\n"
        );
    }

    #[test]
    fn test_inline_module_exposes_every_discriminant() {
        for kind in [
            TokenKind::Static,
            TokenKind::Mixed,
            TokenKind::Runtime,
            TokenKind::Template,
            TokenKind::Element,
            TokenKind::Fragment,
            TokenKind::Component,
        ] {
            let field = format!("static {} = 1 << {};", kind.type_name(), kind.bits().trailing_zeros());
            assert!(INLINE_SUPPORT_MODULE.contains(&field), "missing {}", field);
        }
        for ctor in ["create", "property", "template", "chevron", "fragment", "element", "component"] {
            assert!(INLINE_SUPPORT_MODULE.contains(&format!("static {} = ", ctor)));
        }
    }
}
