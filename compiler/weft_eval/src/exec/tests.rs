use pretty_assertions::assert_eq;
use weft_ir::{Attributes, ElementNode, Node, NodeKind, ReturnNode, SlotNode, TextNode};

use super::markup::partition_slots;
use super::*;
use crate::context::ExecutionContext;
use crate::interpreter::Interpreter;
use crate::output::buffer_output;
use crate::{EvalErrorKind, Value};

#[test]
fn test_builtins_cover_every_kind_but_element() {
    let registry = ExecutorRegistry::with_builtins();
    for kind in NodeKind::ALL {
        assert_eq!(registry.contains(kind), kind != NodeKind::Element, "{kind}");
        assert!(registry.get(kind).is_some(), "{kind}");
    }
    assert!(registry.has_fallback());
}

#[test]
fn test_executor_rejects_other_node_kinds() {
    let interp = Interpreter::builder().output(buffer_output()).build();
    let ctx = ExecutionContext::root();
    let text = Node::Text(TextNode::new("x"));
    let err = control::exec_return(&text, &ctx, &interp).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));

    let ret = Node::Return(ReturnNode { value: None });
    let flow = control::exec_return(&ret, &ctx, &interp).unwrap();
    assert_eq!(flow, crate::Flow::Return(Value::Null));
}

#[test]
fn test_partition_slots() {
    let element = |tag: &str, attrs: &[(&str, &str)]| {
        Node::Element(ElementNode {
            tag: tag.to_string(),
            attrs: attrs.iter().copied().collect::<Attributes>(),
            children: Vec::new(),
        })
    };
    let children = vec![
        element("p", &[]),
        Node::Text(TextNode::new("  ")),
        element("h1", &[("slot", "head"), ("class", "big")]),
        Node::Slot(SlotNode {
            name: Some("foot".to_string()),
            children: vec![Node::Text(TextNode::new("bye"))],
        }),
        Node::Text(TextNode::new("tail")),
    ];
    let slots = partition_slots(&children);

    assert_eq!(slots[""], vec![element("p", &[]), Node::Text(TextNode::new("tail"))]);
    assert_eq!(slots["head"], vec![element("h1", &[("class", "big")])]);
    assert_eq!(slots["foot"], vec![Node::Text(TextNode::new("bye"))]);
}

#[test]
fn test_render_element_escapes_attribute_quotes() {
    let interp = Interpreter::builder().output(buffer_output()).build();
    let ctx = ExecutionContext::root();
    ctx.set(weft_ir::VarScope::Local, "q", Value::str(r#"say "hi""#));
    let node = Node::Element(ElementNode {
        tag: "span".to_string(),
        attrs: [("title", "{q}")].into_iter().collect(),
        children: vec![Node::Text(TextNode::new("{q}"))],
    });
    render_element(&node, &ctx, &interp).unwrap();
    assert_eq!(
        interp.output().contents(),
        r#"<span title="say &quot;hi&quot;">say "hi"</span>"#
    );
}
