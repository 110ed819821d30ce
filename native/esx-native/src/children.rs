//! Children normalization.

use crate::markup::MarkupNode;
use crate::rewriter::lower_chevron;
use crate::token::Leaf;
use crate::validate::CompilerError;

/// Whitespace-only text that spans a line break is layout between tags on
/// separate lines and produces no token.
pub fn is_layout_whitespace(raw: &str) -> bool {
    raw.trim().is_empty() && raw.contains(['\r', '\n'])
}

/// Lowers one raw child. `Ok(None)` means the child is dropped.
pub fn normalize_child<E>(
    child: MarkupNode<E>,
    file_path: &str,
) -> Result<Option<Leaf<E>>, CompilerError> {
    match child {
        MarkupNode::Expression(expr) => Ok(Some(Leaf::Interpolation(expr.expression))),
        MarkupNode::Spread(spread) => Err(CompilerError::spread_child(file_path, &spread.location)),
        MarkupNode::Text(text) if is_layout_whitespace(&text.raw) => Ok(None),
        MarkupNode::Text(text) => Ok(Some(Leaf::Text(text.raw))),
        nested @ (MarkupNode::Element(_) | MarkupNode::Fragment(_)) => {
            let chevron = lower_chevron(nested, file_path)?;
            Ok(Some(Leaf::Chevron(Box::new(chevron))))
        }
    }
}

/// Lowers a children list in source order. Nested markup becomes a bare
/// chevron without a template or reference of its own.
pub fn normalize_children<E>(
    children: Vec<MarkupNode<E>>,
    file_path: &str,
) -> Result<Vec<Leaf<E>>, CompilerError> {
    let mut leaves = Vec::with_capacity(children.len());
    for child in children {
        if let Some(leaf) = normalize_child(child, file_path)? {
            leaves.push(leaf);
        }
    }
    Ok(leaves)
}
