//! Unit-level entry points.
//!
//! [`transform_source`] parses one JS/TS unit with oxc, lowers every markup
//! root in place and prints the result with the unit prelude (reference
//! declarations plus the support module statement) ahead of the body.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::AstBuilder;
use oxc_ast_visit::VisitMut;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};

use crate::jsx_lowerer::JsxLowerer;
use crate::markup::MarkupNode;
use crate::options::TransformOptions;
use crate::reference::{ReferenceAllocator, TemplateReference};
use crate::rewriter::{lower_unit, RewriteSummary, Rewriter};
use crate::scope::{collect_top_level_bindings, collect_unit_names};
use crate::support::{SupportInjection, SUPPORT_BINDING};
use crate::validate::{CompilerError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub code: String,
    /// Minted reference names, in minting order.
    pub references: Vec<String>,
    pub support: Option<SupportInjection>,
}

/// `.ts` keeps JSX off; anything else parses with JSX enabled.
pub fn source_type_for(file_path: &str) -> SourceType {
    match SourceType::from_path(file_path) {
        Ok(source_type) if source_type.is_typescript() => source_type,
        Ok(source_type) => source_type.with_jsx(true),
        Err(_) => SourceType::default().with_module(true).with_jsx(true),
    }
}

pub fn transform_source(
    source: &str,
    file_path: &str,
    options: &TransformOptions,
) -> Result<TransformResult, CompilerError> {
    options.validate()?;

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type_for(file_path)).parse();
    if let Some(error) = ret.errors.first() {
        return Err(CompilerError::new(
            ErrorKind::Syntax,
            &format!("Invalid syntax: {}", error),
            file_path,
            0,
            0,
        ));
    }
    let mut program = ret.program;

    let support_bound = collect_top_level_bindings(&program).contains(SUPPORT_BINDING);
    let references = ReferenceAllocator::new(options.support_module, &options.support_source)
        .with_reserved_names(collect_unit_names(&program))
        .with_support_bound(support_bound);

    let mut lowerer = JsxLowerer::new(&allocator, source, Rewriter::new(references, file_path));
    lowerer.visit_program(&mut program);
    let roots = lowerer.root_count();
    let summary = lowerer.finish()?;

    if options.debug {
        eprintln!(
            "[EsxNative] {}: lowered {} markup root(s)",
            file_path, roots
        );
        match &summary.support {
            Some(injection) => eprintln!(
                "[EsxNative] {}: injecting support module ({:?})",
                file_path, injection
            ),
            None if roots > 0 && support_bound => eprintln!(
                "[EsxNative] {}: {} already bound, support module skipped",
                file_path, SUPPORT_BINDING
            ),
            None => {}
        }
    }

    let prelude = render_prelude(&summary);
    let code = if prelude.is_empty() {
        Codegen::new().build(&program).code
    } else {
        // Hashbang and directives stay ahead of the prelude.
        let mut header = String::new();
        if let Some(hashbang) = program.hashbang.take() {
            header.push_str(&format!("#!{}\n", hashbang.value));
        }
        let directives =
            std::mem::replace(&mut program.directives, AstBuilder::new(&allocator).vec());
        for directive in directives.iter() {
            header.push_str(directive.expression.span.source_text(source));
            header.push_str(";\n");
        }
        let body = Codegen::new().build(&program).code;
        format!("{}{}{}", header, prelude, body)
    };

    Ok(TransformResult {
        code,
        references: summary.references.into_iter().map(|r| r.name).collect(),
        support: summary.support,
    })
}

/// `var _templateReference = {}, ...;` followed by the support statement.
pub fn render_prelude(summary: &RewriteSummary) -> String {
    let mut prelude = String::new();
    if !summary.references.is_empty() {
        let declarators: Vec<String> = summary
            .references
            .iter()
            .map(|r: &TemplateReference| format!("{} = {{}}", r.name))
            .collect();
        prelude.push_str(&format!("var {};\n", declarators.join(", ")));
    }
    if let Some(injection) = &summary.support {
        prelude.push_str(&injection.statement());
    }
    prelude
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON SURFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Lowers markup given as JSON (one node or an array of roots). Embedded
/// expressions are carried as their source text.
pub fn lower_markup_json(
    markup_json: &str,
    options_json: Option<&str>,
    file_path: &str,
) -> Result<serde_json::Value, CompilerError> {
    let options = match options_json {
        Some(json) => TransformOptions::from_json(json)?,
        None => TransformOptions::default(),
    };

    let value: serde_json::Value = serde_json::from_str(markup_json).map_err(|e| {
        CompilerError::new(
            ErrorKind::Syntax,
            &format!("Markup JSON parse error: {}", e),
            file_path,
            0,
            0,
        )
    })?;
    let roots: Vec<MarkupNode<String>> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value),
        single => serde_json::from_value(single).map(|node| vec![node]),
    }
    .map_err(|e| {
        CompilerError::new(
            ErrorKind::Syntax,
            &format!("Invalid markup node: {}", e),
            file_path,
            0,
            0,
        )
    })?;

    let unit = lower_unit(roots, &options, file_path)?;
    serde_json::to_value(&unit).map_err(|e| {
        CompilerError::new(
            ErrorKind::Syntax,
            &format!("Serialize error: {}", e),
            file_path,
            0,
            0,
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI WRAPPERS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn options_from(options_json: Option<String>) -> napi::Result<TransformOptions> {
    match options_json {
        Some(json) => TransformOptions::from_json(&json)
            .map_err(|e| napi::Error::from_reason(e.to_string())),
        None => Ok(TransformOptions::default()),
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn transform_native(
    source: String,
    file_path: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options = options_from(options_json)?;
    let result = transform_source(&source, &file_path, &options)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(result)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}

#[cfg(feature = "napi")]
#[napi]
pub fn lower_markup_native(
    markup_json: String,
    options_json: Option<String>,
    file_path: Option<String>,
) -> napi::Result<serde_json::Value> {
    lower_markup_json(
        &markup_json,
        options_json.as_deref(),
        file_path.as_deref().unwrap_or(""),
    )
    .map_err(|e| napi::Error::from_reason(e.to_string()))
}
