#[cfg(test)]
mod tests {
    use crate::options::{SupportModuleMode, TransformOptions};
    use crate::support::SupportInjection;
    use crate::transform::{transform_source, TransformResult};
    use crate::validate::{CompilerError, ErrorKind};

    fn lower(code: &str) -> TransformResult {
        lower_with(code, &TransformOptions::default())
    }

    fn lower_with(code: &str, options: &TransformOptions) -> TransformResult {
        transform_source(code, "test.jsx", options).unwrap()
    }

    fn lower_err(code: &str) -> CompilerError {
        transform_source(code, "test.jsx", &TransformOptions::default()).unwrap_err()
    }

    /// Output with all whitespace removed, so assertions do not depend on
    /// printer layout.
    fn compact(code: &str) -> String {
        code.split_whitespace().collect()
    }

    #[test]
    fn test_static_element() {
        let result = lower(r#"const a = <div a b="b" />;"#);
        assert_eq!(result.references, vec!["_templateReference"]);
        assert!(result.code.starts_with(
            "var _templateReference = {};\nimport ESXToken from \"@ungap/esxtoken\";\n"
        ));
        assert!(compact(&result.code).contains(
            r#"ESXToken.template(_templateReference,ESXToken.element("div",ESXToken.create(ESXToken.STATIC_TYPE,[ESXToken.property(ESXToken.STATIC_TYPE,"a",true),ESXToken.property(ESXToken.STATIC_TYPE,"b","b")])))"#
        ));
    }

    #[test]
    fn test_runtime_and_mixed_properties() {
        let runtime = compact(&lower("const a = <div a={x} />;").code);
        assert!(runtime.contains(
            r#"ESXToken.create(ESXToken.RUNTIME_TYPE,[ESXToken.property(ESXToken.RUNTIME_TYPE,"a",x)])"#
        ));

        let mixed = compact(&lower(r#"const a = <div a="1" b={x} />;"#).code);
        assert!(mixed.contains(
            r#"ESXToken.create(ESXToken.MIXED_TYPE,[ESXToken.property(ESXToken.STATIC_TYPE,"a","1"),ESXToken.property(ESXToken.RUNTIME_TYPE,"b",x)])"#
        ));
    }

    #[test]
    fn test_spread_keeps_position_and_forces_runtime() {
        let code = compact(&lower(r#"const a = <div a="1" {...rest} b="2" />;"#).code);
        assert!(code.contains(
            r#"ESXToken.create(ESXToken.RUNTIME_TYPE,[ESXToken.property(ESXToken.STATIC_TYPE,"a","1"),ESXToken.property(ESXToken.RUNTIME_TYPE,"",rest),ESXToken.property(ESXToken.STATIC_TYPE,"b","2")])"#
        ));
    }

    #[test]
    fn test_empty_properties_and_children() {
        let code = compact(&lower("const a = <br />;").code);
        assert!(code.contains(r#"ESXToken.template(_templateReference,ESXToken.element("br",null))"#));
    }

    #[test]
    fn test_children_in_order() {
        let code = compact(&lower("const a = <p>hi{name}<b /></p>;").code);
        assert!(code.contains(
            r#"ESXToken.element("p",null,ESXToken.create(ESXToken.STATIC_TYPE,"hi"),ESXToken.create(ESXToken.RUNTIME_TYPE,name),ESXToken.create(ESXToken.STATIC_TYPE,ESXToken.element("b",null)))"#
        ));
    }

    #[test]
    fn test_layout_whitespace_is_dropped() {
        let source = "const a = (\n  <ul>\n    <li>a</li>\n    <li>b</li>\n  </ul>\n);\n";
        let result = lower(source);
        assert_eq!(result.references, vec!["_templateReference"]);
        assert!(compact(&result.code).contains(
            r#"ESXToken.element("ul",null,ESXToken.create(ESXToken.STATIC_TYPE,ESXToken.element("li",null,ESXToken.create(ESXToken.STATIC_TYPE,"a"))),ESXToken.create(ESXToken.STATIC_TYPE,ESXToken.element("li",null,ESXToken.create(ESXToken.STATIC_TYPE,"b"))))"#
        ));
    }

    #[test]
    fn test_character_references_are_decoded() {
        let text = lower("const a = <p>&amp; &lt;x&gt;</p>;").code;
        assert!(!text.contains("&amp;"));
        assert!(compact(&text).contains(r#"ESXToken.create(ESXToken.STATIC_TYPE,"&<x>")"#));

        let attr = lower(r#"const a = <div title="&quot;hi&quot; &#x41;&#66;" />;"#).code;
        assert!(!attr.contains("&quot;"));
        assert!(attr.contains(r#"\"hi\" AB"#) || attr.contains(r#"'"hi" AB'"#));
    }

    #[test]
    fn test_whitespace_rule_sees_decoded_text() {
        let newline = compact(&lower("const a = <p>&#10;</p>;").code);
        assert!(newline.contains(r#"ESXToken.element("p",null))"#));

        let kept = compact(&lower("const a = <p>\n  &amp;\n</p>;").code);
        assert!(kept.contains(r#"ESXToken.create(ESXToken.STATIC_TYPE,"\n&\n")"#));
    }

    #[test]
    fn test_fragment_gets_one_reference() {
        let result = lower("const a = <><a /><b /></>;");
        assert_eq!(result.references, vec!["_templateReference"]);
        assert!(compact(&result.code).contains(
            r#"ESXToken.template(_templateReference,ESXToken.fragment(ESXToken.create(ESXToken.STATIC_TYPE,ESXToken.element("a",null)),ESXToken.create(ESXToken.STATIC_TYPE,ESXToken.element("b",null))))"#
        ));
    }

    #[test]
    fn test_components() {
        let code = compact(&lower(r#"const a = <MyComponent a="1"><UI.Button /></MyComponent>;"#).code);
        assert!(code.contains(
            r#"ESXToken.component(MyComponent,ESXToken.create(ESXToken.STATIC_TYPE,[ESXToken.property(ESXToken.STATIC_TYPE,"a","1")]),ESXToken.create(ESXToken.STATIC_TYPE,ESXToken.component(UI.Button,null)))"#
        ));

        let this_member = compact(&lower("class A { render() { return <this.Item />; } }").code);
        assert!(this_member.contains("ESXToken.component(this.Item,null)"));
    }

    #[test]
    fn test_namespaced_names_stay_literal() {
        let code = compact(&lower(r#"const a = <xml:svg xmlns:xlink="u" />;"#).code);
        assert!(code.contains(
            r#"ESXToken.element("xml:svg",ESXToken.create(ESXToken.STATIC_TYPE,[ESXToken.property(ESXToken.STATIC_TYPE,"xmlns:xlink","u")]))"#
        ));
    }

    #[test]
    fn test_roots_are_numbered_in_source_order() {
        let result = lower("const a = <a />;\nconst b = <b />;\n");
        assert_eq!(
            result.references,
            vec!["_templateReference", "_templateReference2"]
        );
        assert!(result
            .code
            .starts_with("var _templateReference = {}, _templateReference2 = {};\n"));
        let code = compact(&result.code);
        assert!(code.contains(r#"ESXToken.template(_templateReference,ESXToken.element("a",null))"#));
        assert!(code.contains(r#"ESXToken.template(_templateReference2,ESXToken.element("b",null))"#));
    }

    #[test]
    fn test_markup_inside_expressions_is_its_own_root() {
        let result = lower("const a = <ul>{items.map(i => <li>{i}</li>)}</ul>;");
        assert_eq!(
            result.references,
            vec!["_templateReference", "_templateReference2"]
        );
        let code = compact(&result.code);
        assert!(code.contains(r#"ESXToken.template(_templateReference,ESXToken.element("ul""#));
        assert!(code.contains(
            r#"ESXToken.template(_templateReference2,ESXToken.element("li",null,ESXToken.create(ESXToken.RUNTIME_TYPE,i)))"#
        ));
        assert!(!code.contains("<li>"));
    }

    #[test]
    fn test_markup_in_attribute_expression() {
        let result = lower("const a = <Card header={<h1>t</h1>} />;");
        assert_eq!(
            result.references,
            vec!["_templateReference", "_templateReference2"]
        );
        assert!(compact(&result.code).contains(
            r#"ESXToken.property(ESXToken.RUNTIME_TYPE,"header",ESXToken.template(_templateReference2,ESXToken.element("h1",null,ESXToken.create(ESXToken.STATIC_TYPE,"t"))))"#
        ));
    }

    #[test]
    fn test_reference_names_avoid_existing_bindings() {
        let result = lower("const _templateReference = 1;\nconst a = <a />;\n");
        assert_eq!(result.references, vec!["_templateReference2"]);
    }

    #[test]
    fn test_markup_value_attribute_is_rejected() {
        let err = lower_err("const ok = <p />;\nconst a = <div a=<b /> />;\n");
        assert_eq!(err.kind, ErrorKind::UnsupportedStaticMarkupValue);
        assert_eq!(err.code, "ESX-ERR-ATTR-001");
        assert_eq!(
            err.message,
            "JSX elements are not supported as static attributes. Please wrap it in { }."
        );
        assert_eq!(err.file, "test.jsx");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_markup_value_error_points_at_value() {
        let element = lower_err("const a = <div a=<b /> />;");
        assert_eq!((element.line, element.column), (1, 18));

        let fragment = lower_err("const a = <div\n  title=<></>\n/>;");
        assert_eq!(fragment.kind, ErrorKind::UnsupportedStaticMarkupValue);
        assert_eq!((fragment.line, fragment.column), (2, 9));
    }

    #[test]
    fn test_spread_child_is_rejected() {
        let err = lower_err("const a = <div>{...items}</div>;");
        assert_eq!(err.kind, ErrorKind::UnsupportedSpreadChild);
        assert_eq!(
            err.message,
            "Spread children are not supported. Please delete the ... token."
        );
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_syntax_error() {
        let err = lower_err("const a = <div>;");
        assert_eq!(err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_support_module_modes() {
        let none = lower_with(
            "const a = <a />;",
            &TransformOptions::default().with_support_module(SupportModuleMode::None),
        );
        assert!(none.support.is_none());
        assert!(!none.code.contains("import ESXToken"));
        assert!(none.code.starts_with("var _templateReference = {};\n"));

        let inline = lower_with(
            "const a = <a />;",
            &TransformOptions::default().with_support_module(SupportModuleMode::Inline),
        );
        assert_eq!(inline.support, Some(SupportInjection::Inline));
        assert!(inline.code.contains("globalThis.ESXToken || (globalThis.ESXToken = class ESXToken"));
        assert!(!inline.code.contains("import ESXToken"));

        let custom = TransformOptions::from_json(r#"{"supportSource": "./esx.js"}"#).unwrap();
        let imported = lower_with("const a = <a />;\nconst b = <b />;", &custom);
        assert_eq!(imported.code.matches("import ESXToken from \"./esx.js\";").count(), 1);
    }

    #[test]
    fn test_existing_support_binding_is_not_duplicated() {
        let result = lower("import ESXToken from \"custom\";\nconst a = <a />;\n");
        assert!(result.support.is_none());
        assert_eq!(result.code.matches("import ESXToken").count(), 1);
        assert_eq!(result.references, vec!["_templateReference"]);
    }

    #[test]
    fn test_hoisted_var_support_binding_is_not_duplicated() {
        let result = lower("if (x) { var ESXToken = 1; }\nconst a = <a />;\n");
        assert!(result.support.is_none());
        assert!(!result.code.contains("import ESXToken"));
        assert_eq!(result.references, vec!["_templateReference"]);
    }

    #[test]
    fn test_directive_source_text_is_kept() {
        let result = lower("'use \"x\"';\nconst a = <a />;\n");
        assert!(result
            .code
            .starts_with("'use \"x\"';\nvar _templateReference = {};\n"));
    }

    #[test]
    fn test_directives_stay_first() {
        let result = lower("\"use strict\";\nconst a = <a />;\n");
        assert!(result
            .code
            .starts_with("\"use strict\";\nvar _templateReference = {};\n"));
    }

    #[test]
    fn test_typescript_units() {
        let tsx = transform_source(
            "const a: unknown = <div a={x as number} />;",
            "a.tsx",
            &TransformOptions::default(),
        )
        .unwrap();
        assert_eq!(tsx.references, vec!["_templateReference"]);

        let ts = transform_source("let a: number = 1;", "a.ts", &TransformOptions::default()).unwrap();
        assert!(ts.references.is_empty());
        assert!(ts.support.is_none());
    }

    #[test]
    fn test_lowering_is_deterministic() {
        let source = r#"
            export function App({ items }) {
                return (
                    <main class="app" {...rest}>
                        <Header title={title} />
                        {items.map(item => <Item key={item.id} {...item} />)}
                    </main>
                );
            }
        "#;
        let first = lower(source);
        let second = lower(source);
        assert_eq!(first, second);
        assert_eq!(first.references.len(), 2);
    }
}
