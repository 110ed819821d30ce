//! Tree rewriting.
//!
//! Markup roots go through [`Rewriter::rewrite`], which mints an identity
//! slot and wraps the lowered chevron in a template. Markup reached as a
//! child goes through [`lower_chevron`] and never gets a slot of its own.

use serde::Serialize;

use crate::attributes::aggregate;
use crate::children::normalize_children;
use crate::classify::classify_name;
use crate::markup::MarkupNode;
use crate::options::TransformOptions;
use crate::reference::{ReferenceAllocator, TemplateReference};
use crate::support::SupportInjection;
use crate::token::{Chevron, ChevronTag, Leaf, Template, Token};
use crate::validate::{CompilerError, ErrorKind};

/// Lowers an element or fragment without minting anything. Children are
/// lowered before the node's own attributes.
pub fn lower_chevron<E>(node: MarkupNode<E>, file_path: &str) -> Result<Chevron<E>, CompilerError> {
    match node {
        MarkupNode::Element(el) => {
            let tag = classify_name(&el.name);
            let children = normalize_children(el.children, file_path)?;
            let properties = aggregate(el.attributes, file_path)?;
            Ok(Chevron::new(tag, properties, children))
        }
        MarkupNode::Fragment(frag) => {
            let children = normalize_children(frag.children, file_path)?;
            Ok(Chevron::new(ChevronTag::Fragment, None, children))
        }
        other => Err(CompilerError::at(
            ErrorKind::InvalidRoot,
            "Only elements and fragments lower to a chevron.",
            file_path,
            &other.location(),
        )),
    }
}

/// Rewrites the markup roots of one compilation unit.
pub struct Rewriter {
    allocator: ReferenceAllocator,
    file_path: String,
    support: Option<SupportInjection>,
}

impl Rewriter {
    pub fn new(allocator: ReferenceAllocator, file_path: &str) -> Self {
        Self {
            allocator,
            file_path: file_path.to_string(),
            support: None,
        }
    }

    /// Lowers one markup root.
    ///
    /// Elements and fragments become a `Template` holding a freshly minted
    /// reference. Text and expression roots are returned as bare leaves. The
    /// first template of the unit also settles the support module decision.
    pub fn rewrite<E>(&mut self, root: MarkupNode<E>) -> Result<Token<E>, CompilerError> {
        match root {
            MarkupNode::Element(_) | MarkupNode::Fragment(_) => {
                let value = lower_chevron(root, &self.file_path)?;
                let id = self.allocator.next_id();
                if let Some(injection) = self.allocator.ensure_support_module() {
                    self.support = Some(injection);
                }
                Ok(Token::Template(Template { id, value }))
            }
            MarkupNode::Text(text) => Ok(Token::Leaf(Leaf::Text(text.raw))),
            MarkupNode::Expression(expr) => Ok(Token::Leaf(Leaf::Interpolation(expr.expression))),
            MarkupNode::Spread(spread) => Err(CompilerError::at(
                ErrorKind::InvalidRoot,
                "A spread cannot stand on its own as a markup root.",
                &self.file_path,
                &spread.location,
            )),
        }
    }

    pub fn references(&self) -> &[TemplateReference] {
        self.allocator.references()
    }

    pub fn finish(self) -> RewriteSummary {
        RewriteSummary {
            references: self.allocator.references().to_vec(),
            support: self.support,
        }
    }
}

/// Unit-level side effects of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSummary {
    pub references: Vec<TemplateReference>,
    pub support: Option<SupportInjection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoweredUnit<E> {
    pub tokens: Vec<Token<E>>,
    pub references: Vec<TemplateReference>,
    pub support: Option<SupportInjection>,
}

/// Lowers an ordered list of markup roots as one compilation unit. The
/// first failing root aborts the whole unit.
pub fn lower_unit<E>(
    roots: Vec<MarkupNode<E>>,
    options: &TransformOptions,
    file_path: &str,
) -> Result<LoweredUnit<E>, CompilerError> {
    options.validate()?;
    let allocator = ReferenceAllocator::new(options.support_module, &options.support_source);
    let mut rewriter = Rewriter::new(allocator, file_path);
    let tokens = roots
        .into_iter()
        .map(|root| rewriter.rewrite(root))
        .collect::<Result<Vec<_>, _>>()?;
    let summary = rewriter.finish();
    Ok(LoweredUnit {
        tokens,
        references: summary.references,
        support: summary.support,
    })
}
