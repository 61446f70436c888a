use super::*;
use pretty_assertions::assert_eq;
use weft_ir::{Attributes, ElementNode, NodeKind};

fn parse(src: &str) -> ParseOutput {
    parse_document(src).unwrap()
}

#[test]
fn test_greeting_component_end_to_end_shape() {
    let out = parse(
        r#"<component name="Greeting">
             <set name="x" value="1"/>
             <if test="{x}"><return value="yes"/></if>
           </component>"#,
    );
    assert!(out.is_valid(), "{:?}", out.errors);
    let component = out.root.as_component().unwrap();
    assert_eq!(component.name, "Greeting");
    let kinds: Vec<_> = component.children.iter().map(Node::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Set, NodeKind::If]);
}

#[test]
fn test_uppercase_tag_becomes_component_call() {
    let out = parse(r#"<Button label="Click"/>"#);
    let Node::ComponentCall(call) = out.root else {
        panic!("expected component call, got {:?}", out.root);
    };
    assert_eq!(call.component_name, "Button");
    assert_eq!(
        call.props,
        Attributes::from_iter([("label".to_string(), "Click".to_string())])
    );
    assert!(call.children.is_empty());
}

#[test]
fn test_registered_parser_wins_over_generic_fallback() {
    let mut registry = ParserRegistry::with_builtins();
    registry.register("div", |_: &Element, _: &DocumentParser<'_>| {
        Ok(Node::Text(weft_ir::TextNode::new("custom")))
    });
    let out = parse_document_with(&registry, "<div><span/></div>").unwrap();
    assert_eq!(out.root, Node::Text(weft_ir::TextNode::new("custom")));
}

#[test]
fn test_last_registration_wins() {
    let mut registry = ParserRegistry::new();
    registry.register("x", |_: &Element, _: &DocumentParser<'_>| {
        Ok(Node::Text(weft_ir::TextNode::new("first")))
    });
    registry.register("x", |_: &Element, _: &DocumentParser<'_>| {
        Ok(Node::Text(weft_ir::TextNode::new("second")))
    });
    assert_eq!(registry.len(), 1);
    let out = parse_document_with(&registry, "<x/>").unwrap();
    assert_eq!(out.root, Node::Text(weft_ir::TextNode::new("second")));
}

#[test]
fn test_unregistered_tag_without_fallback_is_missing_registration() {
    let mut registry = ParserRegistry::with_builtins();
    registry.clear_generic();
    let err = parse_document_with(&registry, "<component name=\"A\"><div/></component>")
        .unwrap_err();
    assert!(err.is_missing_registration());
    assert_eq!(err.to_string(), "no parser for tag <div>");
}

#[test]
fn test_namespace_prefix_is_stripped() {
    let out = parse(r#"<q:component name="A"><q:set name="x" value="1"/></q:component>"#);
    let component = out.root.as_component().unwrap();
    assert_eq!(component.children[0].kind(), NodeKind::Set);
}

#[test]
fn test_generic_element_keeps_attributes_and_text() {
    let out = parse(r#"<div class="card">Hello {user.name}<b>static</b></div>"#);
    let Node::Element(ElementNode {
        tag,
        attrs,
        children,
    }) = out.root
    else {
        panic!("expected element");
    };
    assert_eq!(tag, "div");
    assert_eq!(attrs.get("class"), Some("card"));
    assert_eq!(children.len(), 2);
    let Node::Text(text) = &children[0] else {
        panic!("expected text");
    };
    assert!(text.databound);
    let Node::Element(bold) = &children[1] else {
        panic!("expected element");
    };
    let Node::Text(inner) = &bold.children[0] else {
        panic!("expected text");
    };
    assert!(!inner.databound);
}

#[test]
fn test_validation_errors_are_collected_not_fatal() {
    let out = parse(
        r#"<component name="A">
             <set value="1"/>
             <loop var="i" type="range" from="1"/>
           </component>"#,
    );
    assert_eq!(out.errors.len(), 2);
    assert_eq!(out.errors[0].tag, "set");
    assert_eq!(out.errors[1].tag, "loop");
    assert!(out.errors[0].message.contains("name"));
}

#[test]
fn test_malformed_markup() {
    let err = parse_document("<component><set></component>").unwrap_err();
    assert!(matches!(err, ParseError::Markup { .. }));
}

#[test]
fn test_empty_document() {
    assert_eq!(parse_document("  ").unwrap_err(), ParseError::EmptyDocument);
}

#[test]
fn test_builtin_registry_knows_every_descriptor() {
    let registry = builtin_registry();
    for descriptor in weft_ir::tags::descriptors() {
        assert!(
            registry.is_registered(descriptor.tag),
            "no parser for <{}>",
            descriptor.tag
        );
    }
}
