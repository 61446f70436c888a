use super::*;
use crate::{Attributes, VarScope};
use pretty_assertions::assert_eq;

fn set(name: &str, value: &str) -> Node {
    Node::Set(SetNode {
        name: name.to_string(),
        value: Some(value.to_string()),
        scope: VarScope::Local,
        ty: None,
        operation: SetOperation::Assign,
    })
}

fn component(children: Vec<Node>) -> Node {
    Node::Component(ComponentNode {
        name: "Greeting".to_string(),
        description: None,
        children,
    })
}

#[test]
fn test_kind_names_are_unique() {
    let mut names: Vec<_> = NodeKind::ALL.iter().map(|k| k.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), NodeKind::ALL.len());
}

#[test]
fn test_to_dict_is_ordered_and_deterministic() {
    let node = component(vec![set("x", "1")]);
    let first = node.to_dict().to_string();
    assert_eq!(first, node.to_dict().to_string());
    assert_eq!(
        first,
        r#"{"type":"component","name":"Greeting","description":null,"children":[{"type":"set","name":"x","value":"1","scope":"local","ty":null,"operation":"assign"}]}"#
    );
}

#[test]
fn test_children_of_if_cover_all_branches() {
    let node = Node::If(IfNode {
        branches: vec![
            Branch {
                condition: "{a}".to_string(),
                body: vec![set("x", "1")],
            },
            Branch {
                condition: "{b}".to_string(),
                body: vec![set("x", "2")],
            },
        ],
        else_body: Some(vec![set("x", "3")]),
    });
    assert_eq!(node.children().len(), 3);
}

#[test]
fn test_validate_missing_required() {
    let node = Node::Set(SetNode {
        name: String::new(),
        value: None,
        scope: VarScope::Local,
        ty: None,
        operation: SetOperation::Assign,
    });
    assert_eq!(
        node.validate(),
        vec!["<set> is missing required attribute `name`"]
    );
}

#[test]
fn test_validate_is_local() {
    let bad_child = Node::Set(SetNode {
        name: String::new(),
        value: None,
        scope: VarScope::Local,
        ty: None,
        operation: SetOperation::Assign,
    });
    let node = component(vec![bad_child]);
    assert!(node.validate().is_empty());
}

#[test]
fn test_validate_inconsistent_data_source() {
    let node = Node::Data(DataNode {
        name: "rows".to_string(),
        source: DataSource::File,
        path: None,
        body: None,
    });
    let errors = node.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("requires attribute `path`"));
}

#[test]
fn test_validate_range_loop_needs_bounds() {
    let node = Node::Loop(LoopNode {
        var: "i".to_string(),
        index: None,
        kind: LoopKind::Range {
            from: Some("1".to_string()),
            to: None,
            step: None,
        },
        children: vec![],
    });
    assert_eq!(
        node.validate(),
        vec!["<loop type=\"range\"> requires attribute `to`"]
    );
}

#[test]
fn test_validate_query_without_datasource() {
    let mut query = QueryNode {
        name: "users".to_string(),
        datasource: None,
        source: QuerySource::Database,
        sql: "SELECT 1".to_string(),
        params: vec![],
    };
    assert_eq!(Node::Query(query.clone()).validate().len(), 1);
    query.source = QuerySource::Memory;
    assert!(Node::Query(query).validate().is_empty());
}

#[test]
fn test_validate_duplicate_function_params() {
    let param = ParamNode {
        name: "a".to_string(),
        ty: None,
        default: None,
        required: true,
    };
    let node = Node::Function(FunctionNode {
        name: "sum".to_string(),
        returns: None,
        params: vec![param.clone(), param],
        children: vec![],
    });
    let errors = node.validate();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("more than once"));
}

#[test]
fn test_component_call_props_projection() {
    let node = Node::ComponentCall(ComponentCallNode {
        component_name: "Button".to_string(),
        props: [("label", "Click"), ("kind", "primary")]
            .into_iter()
            .collect::<Attributes>(),
        children: vec![],
    });
    assert_eq!(node.tag_name(), "Button");
    assert_eq!(
        node.to_dict().to_string(),
        r#"{"type":"component_call","component_name":"Button","props":{"label":"Click","kind":"primary"}}"#
    );
}

#[test]
fn test_text_binding_detection() {
    assert!(TextNode::new("Hello {name}!").databound);
    assert!(!TextNode::new("Hello world").databound);
    assert!(!TextNode::new("a } b { c").databound);
}

#[test]
fn test_import_local_name() {
    let import = ImportNode {
        component: "Card".to_string(),
        from: Some("./ui".to_string()),
        alias: None,
    };
    assert_eq!(import.local_name(), "Card");
    let aliased = ImportNode {
        alias: Some("UiCard".to_string()),
        ..import
    };
    assert_eq!(aliased.local_name(), "UiCard");
}
