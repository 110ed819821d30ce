//! # ESX Native
//!
//! Lowers JSX markup into `ESXToken` template trees.
//!
//! ## Lowering Invariants
//!
//! 1. **One identity per root**: every element or fragment that is not the
//!    child of other markup receives exactly one `_templateReference*` slot,
//!    declared once as `var _templateReference = {}` at the top of its unit.
//!    Nested markup shares its root's slot.
//!
//! 2. **Order is preserved**: children and attributes keep their source order,
//!    spreads included. Children are lowered before the attributes of their
//!    parent element.
//!
//! 3. **Classification**: a property set is `STATIC` when every entry is known
//!    at compile time, `RUNTIME` when every entry (or any spread) is evaluated
//!    at runtime, `MIXED` otherwise. An empty set lowers to `null`.
//!
//! 4. **Support module**: injected at most once per unit, and only when the
//!    unit lowered at least one root and does not already bind `ESXToken`.
//!
//! 5. **No partial output**: markup as an attribute value and spread children
//!    abort the unit with an error. Nothing is emitted for that unit.

mod attributes;
mod batch;
mod cache;
mod children;
mod classify;
mod discovery;
mod entities;
mod jsx_lowerer;
mod markup;
mod options;
mod reference;
mod rewriter;
mod scope;
mod support;
mod token;
mod transform;
mod validate;

#[cfg(test)]
mod lowering_tests;

pub use attributes::{aggregate, lower_attribute};
pub use batch::{transform_directory, transform_units, SourceUnit, UnitOutcome};
pub use cache::TransformCache;
pub use children::{is_layout_whitespace, normalize_child, normalize_children};
pub use classify::{classify_name, classify_properties, is_intrinsic_tag};
pub use discovery::discover_sources;
pub use entities::decode_entities;
pub use jsx_lowerer::JsxLowerer;
pub use markup::*;
pub use options::{SupportModuleMode, TransformOptions};
pub use reference::{ReferenceAllocator, TemplateReference, REFERENCE_PREFIX};
pub use rewriter::{lower_chevron, lower_unit, LoweredUnit, RewriteSummary, Rewriter};
pub use scope::{collect_top_level_bindings, collect_unit_names};
pub use support::{
    SupportInjection, DEFAULT_SUPPORT_SOURCE, INLINE_SUPPORT_MODULE, SUPPORT_BINDING,
};
pub use token::*;
pub use transform::{
    lower_markup_json, render_prelude, source_type_for, transform_source, TransformResult,
};
pub use validate::*;

#[cfg(feature = "napi")]
pub use transform::{lower_markup_native, transform_native};
