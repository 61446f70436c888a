//! Pre-order traversal over a node tree.
//!
//! Walks use an explicit stack rather than recursion, so arbitrarily deep
//! documents can be visited on any thread.

use crate::{ImportNode, Node, NodeKind};

/// Visit `root` and every descendant in document (pre-)order.
pub fn walk<'a>(root: &'a Node, mut visit: impl FnMut(&'a Node)) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visit(node);
        stack.extend(node.children().into_iter().rev());
    }
}

/// Every node of `kind` under (and including) `root`, in document order.
pub fn collect_kind(root: &Node, kind: NodeKind) -> Vec<&Node> {
    let mut found = Vec::new();
    walk(root, |node| {
        if node.kind() == kind {
            found.push(node);
        }
    });
    found
}

/// Every import declaration anywhere in the tree, in document order.
pub fn imports(root: &Node) -> Vec<&ImportNode> {
    let mut found = Vec::new();
    walk(root, |node| {
        if let Node::Import(import) = node {
            found.push(import);
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentNode, ElementNode, TextNode};
    use pretty_assertions::assert_eq;

    fn el(tag: &str, children: Vec<Node>) -> Node {
        Node::Element(ElementNode {
            tag: tag.to_string(),
            attrs: crate::Attributes::new(),
            children,
        })
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = el(
            "div",
            vec![el("p", vec![Node::Text(TextNode::new("a"))]), el("span", vec![])],
        );
        let mut tags = Vec::new();
        walk(&tree, |n| tags.push(n.tag_name().to_string()));
        assert_eq!(tags, vec!["div", "p", "#text", "span"]);
    }

    #[test]
    fn test_imports_found_at_any_depth() {
        let import = |name: &str| {
            Node::Import(ImportNode {
                component: name.to_string(),
                from: None,
                alias: None,
            })
        };
        let tree = Node::Component(ComponentNode {
            name: "Page".to_string(),
            description: None,
            children: vec![import("Header"), el("main", vec![import("Footer")])],
        });
        let names: Vec<_> = imports(&tree).iter().map(|i| i.component.as_str()).collect();
        assert_eq!(names, vec!["Header", "Footer"]);
        assert_eq!(collect_kind(&tree, NodeKind::Import).len(), 2);
    }
}
