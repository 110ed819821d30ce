//! Transform options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::support::DEFAULT_SUPPORT_SOURCE;
use crate::validate::CompilerError;

/// How the support module becomes available in a lowered unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawSupportModuleMode")]
pub enum SupportModuleMode {
    /// Already provided by the environment; nothing is injected.
    None,
    /// The full class definition is injected once per unit.
    Inline,
    /// A single import statement is injected once per unit.
    #[default]
    Import,
}

impl SupportModuleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SupportModuleMode::None => "none",
            SupportModuleMode::Inline => "inline",
            SupportModuleMode::Import => "import",
        }
    }
}

impl fmt::Display for SupportModuleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn invalid_mode(shown: &str) -> CompilerError {
    CompilerError::configuration(&format!(
        "The supportModule option must be one of: \"none\", \"inline\", \"import\" (got {}).",
        shown
    ))
}

impl FromStr for SupportModuleMode {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SupportModuleMode::None),
            "inline" => Ok(SupportModuleMode::Inline),
            "import" => Ok(SupportModuleMode::Import),
            other => Err(invalid_mode(&format!("{:?}", other))),
        }
    }
}

/// Accepted spellings: one of the three names, or `false` for `none`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSupportModuleMode {
    Flag(bool),
    Name(String),
}

impl TryFrom<RawSupportModuleMode> for SupportModuleMode {
    type Error = CompilerError;

    fn try_from(raw: RawSupportModuleMode) -> Result<Self, Self::Error> {
        match raw {
            RawSupportModuleMode::Flag(false) => Ok(SupportModuleMode::None),
            RawSupportModuleMode::Flag(true) => Err(invalid_mode("true")),
            RawSupportModuleMode::Name(name) => name.parse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    #[serde(alias = "polyfill")]
    pub support_module: SupportModuleMode,
    /// Module specifier used by the `import` mode.
    pub support_source: String,
    /// Log unit-level lowering events to stderr.
    pub debug: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            support_module: SupportModuleMode::default(),
            support_source: DEFAULT_SUPPORT_SOURCE.to_string(),
            debug: false,
        }
    }
}

impl TransformOptions {
    pub fn with_support_module(mut self, mode: SupportModuleMode) -> Self {
        self.support_module = mode;
        self
    }

    /// Parses and validates options. Runs before any unit is touched.
    pub fn from_json(json: &str) -> Result<Self, CompilerError> {
        let options: TransformOptions = serde_json::from_str(json)
            .map_err(|e| CompilerError::configuration(&format!("Invalid options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), CompilerError> {
        if self.support_source.trim().is_empty() {
            return Err(CompilerError::configuration(
                "The supportSource option cannot be empty.",
            ));
        }
        Ok(())
    }

    /// Stable string covering every option that changes lowered output.
    pub fn fingerprint(&self) -> String {
        format!("{}|{}", self.support_module, self.support_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ErrorKind;

    #[test]
    fn test_default_is_import() {
        let options = TransformOptions::from_json("{}").unwrap();
        assert_eq!(options.support_module, SupportModuleMode::Import);
        assert_eq!(options.support_source, "@ungap/esxtoken");
        assert!(!options.debug);
    }

    #[test]
    fn test_mode_spellings() {
        for (json, mode) in [
            (r#"{"supportModule": "none"}"#, SupportModuleMode::None),
            (r#"{"supportModule": "inline"}"#, SupportModuleMode::Inline),
            (r#"{"supportModule": "import"}"#, SupportModuleMode::Import),
            (r#"{"supportModule": false}"#, SupportModuleMode::None),
            (r#"{"polyfill": "inline"}"#, SupportModuleMode::Inline),
        ] {
            assert_eq!(TransformOptions::from_json(json).unwrap().support_module, mode);
        }
    }

    #[test]
    fn test_invalid_mode_fails_fast() {
        for json in [
            r#"{"supportModule": "eval"}"#,
            r#"{"supportModule": true}"#,
            r#"{"supportModule": 3}"#,
        ] {
            let err = TransformOptions::from_json(json).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration, "{}", json);
        }
        let err = "INLINE".parse::<SupportModuleMode>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_empty_support_source_is_rejected() {
        let err = TransformOptions::from_json(r#"{"supportSource": " "}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_fingerprint_tracks_output_options() {
        let import = TransformOptions::default();
        let inline = TransformOptions::default().with_support_module(SupportModuleMode::Inline);
        assert_ne!(import.fingerprint(), inline.fingerprint());

        let mut debug = TransformOptions::default();
        debug.debug = true;
        assert_eq!(import.fingerprint(), debug.fingerprint());
    }
}
