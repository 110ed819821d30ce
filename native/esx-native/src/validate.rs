use serde::{Deserialize, Serialize};
use std::fmt;

use crate::markup::SourceLocation;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_CONFIGURATION: &str = "ESX-ERR-CONFIG-001";
pub const ERR_STATIC_MARKUP_VALUE: &str = "ESX-ERR-ATTR-001";
pub const ERR_SPREAD_CHILD: &str = "ESX-ERR-CHILD-001";
pub const ERR_SYNTAX: &str = "ESX-ERR-SYNTAX-001";
pub const ERR_INVALID_ROOT: &str = "ESX-ERR-ROOT-001";
pub const ERR_IO: &str = "ESX-ERR-IO-001";

/// Category of a lowering failure. Every kind except `Io` is a static
/// property of the input: the same input always fails the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Configuration,
    UnsupportedStaticMarkupValue,
    UnsupportedSpreadChild,
    Syntax,
    InvalidRoot,
    Io,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Configuration => ERR_CONFIGURATION,
            ErrorKind::UnsupportedStaticMarkupValue => ERR_STATIC_MARKUP_VALUE,
            ErrorKind::UnsupportedSpreadChild => ERR_SPREAD_CHILD,
            ErrorKind::Syntax => ERR_SYNTAX,
            ErrorKind::InvalidRoot => ERR_INVALID_ROOT,
            ErrorKind::Io => ERR_IO,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GUARANTEES
// ═══════════════════════════════════════════════════════════════════════════════

fn get_guarantee(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => {
            "Options are validated before any markup root is rewritten."
        }
        ErrorKind::UnsupportedStaticMarkupValue => {
            "Attribute values are either static strings or expression containers."
        }
        ErrorKind::UnsupportedSpreadChild => "Children positions never expand at evaluation time.",
        ErrorKind::Syntax => "Only sources the host parser accepts are lowered.",
        ErrorKind::InvalidRoot => "Every template root is a chevron or a plain value.",
        ErrorKind::Io => "A unit that cannot be read produces no output.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerError {
    pub code: String,
    pub kind: ErrorKind,
    pub message: String,
    pub guarantee: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(kind: ErrorKind, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_hints(kind, message, file, line, column, vec![])
    }

    pub fn with_hints(
        kind: ErrorKind,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: kind.code().to_string(),
            kind,
            message: message.to_string(),
            guarantee: get_guarantee(kind).to_string(),
            file: file.to_string(),
            line,
            column,
            hints,
        }
    }

    pub fn at(kind: ErrorKind, message: &str, file: &str, location: &SourceLocation) -> Self {
        Self::new(kind, message, file, location.line, location.column)
    }

    /// Invalid options. Raised before a unit is opened, so it has no position.
    pub fn configuration(message: &str) -> Self {
        Self::new(ErrorKind::Configuration, message, "", 0, 0)
    }

    pub fn static_markup_value(file: &str, location: &SourceLocation) -> Self {
        Self::with_hints(
            ErrorKind::UnsupportedStaticMarkupValue,
            "JSX elements are not supported as static attributes. Please wrap it in { }.",
            file,
            location.line,
            location.column,
            vec!["Write the attribute as name={<tag />} instead of name=<tag />.".to_string()],
        )
    }

    pub fn spread_child(file: &str, location: &SourceLocation) -> Self {
        Self::with_hints(
            ErrorKind::UnsupportedSpreadChild,
            "Spread children are not supported. Please delete the ... token.",
            file,
            location.line,
            location.column,
            vec!["Use {items} to interpolate an array of children.".to_string()],
        )
    }

    pub fn io(message: &str, file: &str) -> Self {
        Self::new(ErrorKind::Io, message, file, 0, 0)
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(
                f,
                "[{}] {} ({}:{}:{})",
                self.code, self.message, self.file, self.line, self.column
            )
        }
    }
}

impl std::error::Error for CompilerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_kind() {
        let err = CompilerError::spread_child("app.jsx", &SourceLocation { line: 3, column: 7 });
        assert_eq!(err.code, ERR_SPREAD_CHILD);
        assert_eq!(err.kind, ErrorKind::UnsupportedSpreadChild);
        assert_eq!((err.line, err.column), (3, 7));
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn test_display_includes_position() {
        let err = CompilerError::static_markup_value(
            "app.jsx",
            &SourceLocation { line: 1, column: 8 },
        );
        let shown = err.to_string();
        assert!(shown.starts_with("[ESX-ERR-ATTR-001]"));
        assert!(shown.ends_with("(app.jsx:1:8)"));

        let config = CompilerError::configuration("bad mode");
        assert_eq!(config.to_string(), "[ESX-ERR-CONFIG-001] bad mode");
    }
}
