//! JSX lowering over the oxc AST.
//!
//! Every JSX element or fragment reached by the visitor is a markup root:
//! it is read into a [`MarkupNode`], rewritten into a template token and
//! emitted back as `ESXToken.*` call expressions. The emitted expression is
//! walked again, so JSX embedded in expression containers becomes a root of
//! its own, in source order.

use oxc_allocator::{Allocator, Box as oxc_box, CloneIn};
use oxc_ast::ast::*;
use oxc_ast::AstBuilder;
use oxc_ast_visit::walk_mut::walk_expression;
use oxc_ast_visit::VisitMut;
use oxc_span::{Span, SPAN};

use crate::entities::decode_entities;
use crate::markup::{
    AttrValue, ElementName, ElementNode, ExpressionChild, FragmentNode, MarkupNode,
    NamedAttribute, QualifiedName, RawAttribute, SourceLocation, SpreadAttribute, SpreadChild,
    TextNode,
};
use crate::rewriter::{RewriteSummary, Rewriter};
use crate::support::SUPPORT_BINDING;
use crate::token::{
    Chevron, ChevronTag, ComponentPath, Leaf, Property, PropertySet, StaticValue, Template, Token,
    TokenKind,
};
use crate::validate::CompilerError;

type Markup<'a> = MarkupNode<Expression<'a>>;

pub struct JsxLowerer<'a> {
    pub ast: AstBuilder<'a>,
    source_text: &'a str,
    rewriter: Rewriter,
    error: Option<CompilerError>,
}

impl<'a> JsxLowerer<'a> {
    pub fn new(allocator: &'a Allocator, source_text: &'a str, rewriter: Rewriter) -> Self {
        Self {
            ast: AstBuilder::new(allocator),
            source_text,
            rewriter,
            error: None,
        }
    }

    /// Roots lowered so far.
    pub fn root_count(&self) -> usize {
        self.rewriter.references().len()
    }

    /// Ends the pass. The first error met anywhere in the unit wins.
    pub fn finish(self) -> Result<RewriteSummary, CompilerError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.rewriter.finish()),
        }
    }

    fn location(&self, span: Span) -> SourceLocation {
        SourceLocation::from_offset(self.source_text, span.start)
    }

    fn lower_root(&mut self, markup: Markup<'a>) -> Result<Expression<'a>, CompilerError> {
        let token = self.rewriter.rewrite(markup)?;
        Ok(self.emit_token(token))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // JSX → MARKUP
    // ═══════════════════════════════════════════════════════════════════════════

    fn element_markup(&self, element: &JSXElement<'a>) -> Markup<'a> {
        let opening = &element.opening_element;
        MarkupNode::Element(ElementNode {
            name: self.element_name(&opening.name),
            attributes: opening
                .attributes
                .iter()
                .map(|item| self.attribute_markup(item))
                .collect(),
            children: self.children_markup(&element.children),
            location: self.location(element.span),
        })
    }

    fn fragment_markup(&self, fragment: &JSXFragment<'a>) -> Markup<'a> {
        MarkupNode::Fragment(FragmentNode {
            children: self.children_markup(&fragment.children),
            location: self.location(fragment.span),
        })
    }

    fn element_name(&self, name: &JSXElementName<'a>) -> ElementName {
        match name {
            JSXElementName::Identifier(id) => ElementName::Identifier(id.name.to_string()),
            JSXElementName::IdentifierReference(id) => ElementName::Identifier(id.name.to_string()),
            JSXElementName::NamespacedName(ns) => ElementName::Namespaced {
                namespace: ns.namespace.name.to_string(),
                name: ns.name.name.to_string(),
            },
            JSXElementName::MemberExpression(me) => ElementName::Member(self.member_segments(me)),
            JSXElementName::ThisExpression(_) => ElementName::Identifier("this".to_string()),
        }
    }

    fn member_segments(&self, me: &JSXMemberExpression<'a>) -> Vec<String> {
        let mut segments = match &me.object {
            JSXMemberExpressionObject::IdentifierReference(id) => vec![id.name.to_string()],
            JSXMemberExpressionObject::MemberExpression(inner) => self.member_segments(inner),
            JSXMemberExpressionObject::ThisExpression(_) => vec!["this".to_string()],
        };
        segments.push(me.property.name.to_string());
        segments
    }

    fn attribute_markup(&self, item: &JSXAttributeItem<'a>) -> RawAttribute<Expression<'a>> {
        match item {
            JSXAttributeItem::Attribute(attr) => {
                let name = match &attr.name {
                    JSXAttributeName::Identifier(id) => QualifiedName::new(id.name.as_str()),
                    JSXAttributeName::NamespacedName(ns) => {
                        QualifiedName::namespaced(ns.namespace.name.as_str(), ns.name.name.as_str())
                    }
                };
                // Markup values are rejected downstream; point at the value itself.
                let mut span = attr.span;
                let value = match &attr.value {
                    None => None,
                    Some(JSXAttributeValue::StringLiteral(s)) => {
                        Some(AttrValue::String(decode_entities(s.value.as_str())))
                    }
                    Some(JSXAttributeValue::ExpressionContainer(container)) => Some(
                        AttrValue::Expression(self.container_expression(&container.expression)),
                    ),
                    Some(JSXAttributeValue::Element(el)) => {
                        span = el.span;
                        Some(AttrValue::Markup(Box::new(self.element_markup(el))))
                    }
                    Some(JSXAttributeValue::Fragment(frag)) => {
                        span = frag.span;
                        Some(AttrValue::Markup(Box::new(self.fragment_markup(frag))))
                    }
                };
                RawAttribute::Named(NamedAttribute {
                    name,
                    value,
                    location: self.location(span),
                })
            }
            JSXAttributeItem::SpreadAttribute(spread) => RawAttribute::Spread(SpreadAttribute {
                expression: spread.argument.clone_in(self.ast.allocator),
                location: self.location(spread.span),
            }),
        }
    }

    /// `a={}` has no expression; it evaluates to `undefined`.
    fn container_expression(&self, jsx_expr: &JSXExpression<'a>) -> Expression<'a> {
        jsx_expr
            .as_expression()
            .map(|e| e.clone_in(self.ast.allocator))
            .unwrap_or_else(|| self.ast.expression_identifier(SPAN, "undefined"))
    }

    fn children_markup(&self, children: &oxc_allocator::Vec<'a, JSXChild<'a>>) -> Vec<Markup<'a>> {
        children
            .iter()
            .filter_map(|child| self.child_markup(child))
            .collect()
    }

    /// `{}` and `{/* comment */}` children carry no value and are skipped.
    fn child_markup(&self, child: &JSXChild<'a>) -> Option<Markup<'a>> {
        match child {
            JSXChild::Text(t) => Some(MarkupNode::Text(TextNode {
                raw: decode_entities(t.value.as_str()),
                location: self.location(t.span),
            })),
            JSXChild::Element(el) => Some(self.element_markup(el)),
            JSXChild::Fragment(frag) => Some(self.fragment_markup(frag)),
            JSXChild::ExpressionContainer(container) => {
                container.expression.as_expression().map(|e| {
                    MarkupNode::Expression(ExpressionChild {
                        expression: e.clone_in(self.ast.allocator),
                        location: self.location(container.span),
                    })
                })
            }
            JSXChild::Spread(spread) => Some(MarkupNode::Spread(SpreadChild {
                expression: spread.expression.clone_in(self.ast.allocator),
                location: self.location(spread.span),
            })),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TOKEN → CALL EXPRESSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    fn alloc(&self, value: &str) -> &'a str {
        self.ast.allocator.alloc_str(value)
    }

    /// `ESXToken.<property>`
    fn esx_member(&self, property: &'static str) -> Expression<'a> {
        Expression::from(self.ast.member_expression_static(
            SPAN,
            self.ast.expression_identifier(SPAN, SUPPORT_BINDING),
            self.ast.identifier_name(SPAN, property),
            false,
        ))
    }

    fn esx_call(
        &self,
        method: &'static str,
        args: oxc_allocator::Vec<'a, Argument<'a>>,
    ) -> Expression<'a> {
        self.ast.expression_call(
            SPAN,
            self.esx_member(method),
            None::<oxc_box<TSTypeParameterInstantiation>>,
            args,
            false,
        )
    }

    fn string_expr(&self, value: &str) -> Expression<'a> {
        self.ast
            .expression_string_literal(SPAN, self.alloc(value), None)
    }

    fn kind_expr(&self, kind: TokenKind) -> Expression<'a> {
        self.esx_member(kind.type_name())
    }

    /// `ESXToken.create(ESXToken.<KIND>_TYPE, value)`
    fn create_call(&self, kind: TokenKind, value: Expression<'a>) -> Expression<'a> {
        let mut args = self.ast.vec();
        args.push(Argument::from(self.kind_expr(kind)));
        args.push(Argument::from(value));
        self.esx_call("create", args)
    }

    pub fn emit_token(&self, token: Token<Expression<'a>>) -> Expression<'a> {
        match token {
            Token::Template(template) => self.emit_template(template),
            Token::Chevron(chevron) => self.emit_chevron(chevron),
            Token::PropertySet(set) => self.emit_properties(Some(set)),
            Token::Property(property) => self.emit_property(property),
            Token::Leaf(leaf) => self.emit_leaf(leaf),
        }
    }

    fn emit_template(&self, template: Template<Expression<'a>>) -> Expression<'a> {
        let mut args = self.ast.vec();
        args.push(Argument::from(
            self.ast
                .expression_identifier(SPAN, self.alloc(&template.id.name)),
        ));
        args.push(Argument::from(self.emit_chevron(template.value)));
        self.esx_call("template", args)
    }

    fn emit_chevron(&self, chevron: Chevron<Expression<'a>>) -> Expression<'a> {
        let Chevron {
            tag,
            properties,
            children,
        } = chevron;

        let mut args = self.ast.vec();
        let method = match tag {
            ChevronTag::Element(name) => {
                args.push(Argument::from(self.string_expr(&name)));
                args.push(Argument::from(self.emit_properties(properties)));
                "element"
            }
            ChevronTag::Component(path) => {
                args.push(Argument::from(self.component_expr(&path)));
                args.push(Argument::from(self.emit_properties(properties)));
                "component"
            }
            ChevronTag::Fragment => "fragment",
        };
        for leaf in children.into_iter().flatten() {
            args.push(Argument::from(self.emit_leaf(leaf)));
        }
        self.esx_call(method, args)
    }

    /// `UI.Button` → the member expression it names.
    fn component_expr(&self, path: &ComponentPath) -> Expression<'a> {
        let Some((head, rest)) = path.segments().split_first() else {
            return self.ast.expression_identifier(SPAN, "undefined");
        };
        let mut expr = if head == "this" {
            self.ast.expression_this(SPAN)
        } else {
            self.ast.expression_identifier(SPAN, self.alloc(head))
        };
        for segment in rest {
            expr = Expression::from(self.ast.member_expression_static(
                SPAN,
                expr,
                self.ast.identifier_name(SPAN, self.alloc(segment)),
                false,
            ));
        }
        expr
    }

    fn emit_properties(&self, properties: Option<PropertySet<Expression<'a>>>) -> Expression<'a> {
        let Some(set) = properties else {
            return self.ast.expression_null_literal(SPAN);
        };
        let kind = set.kind();
        let mut elements = self.ast.vec();
        for property in set.into_properties() {
            elements.push(ArrayExpressionElement::from(self.emit_property(property)));
        }
        self.create_call(kind, self.ast.expression_array(SPAN, elements))
    }

    fn emit_property(&self, property: Property<Expression<'a>>) -> Expression<'a> {
        let kind = property.kind();
        let (name, value) = match property {
            Property::Static { name, value } => {
                let value = match value {
                    StaticValue::Bool(flag) => self.ast.expression_boolean_literal(SPAN, flag),
                    StaticValue::String(s) => self.string_expr(&s),
                };
                (name, value)
            }
            Property::Dynamic { name, value } => (name, value),
            Property::Spread { value } => (String::new(), value),
        };

        let mut args = self.ast.vec();
        args.push(Argument::from(self.kind_expr(kind)));
        args.push(Argument::from(self.string_expr(&name)));
        args.push(Argument::from(value));
        self.esx_call("property", args)
    }

    fn emit_leaf(&self, leaf: Leaf<Expression<'a>>) -> Expression<'a> {
        let kind = leaf.kind();
        let value = match leaf {
            Leaf::Text(text) => self.string_expr(&text),
            Leaf::Interpolation(expr) => expr,
            Leaf::Chevron(chevron) => self.emit_chevron(*chevron),
        };
        self.create_call(kind, value)
    }
}

impl<'a> VisitMut<'a> for JsxLowerer<'a> {
    fn visit_expression(&mut self, expr: &mut Expression<'a>) {
        if self.error.is_some() {
            return;
        }

        let markup = match expr {
            Expression::JSXElement(element) => Some(self.element_markup(element)),
            Expression::JSXFragment(fragment) => Some(self.fragment_markup(fragment)),
            _ => None,
        };
        if let Some(markup) = markup {
            match self.lower_root(markup) {
                Ok(lowered) => *expr = lowered,
                Err(err) => {
                    self.error = Some(err);
                    return;
                }
            }
        }

        walk_expression(self, expr);
    }
}
