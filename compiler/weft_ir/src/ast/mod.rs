//! The Weft abstract syntax tree.
//!
//! [`Node`] is a closed enumeration: adding a language construct means adding
//! a variant here, a parser registration and an executor registration. Code
//! that needs every construct (validation, `to_dict`, the visitor) matches
//! exhaustively so a new variant cannot be silently ignored.

mod decl;
mod markup;
mod record;
mod stmt;

pub use decl::{ApplicationNode, ComponentNode, FunctionNode, ImportNode, JobNode, ParamNode};
pub use markup::{ComponentCallNode, ElementNode, SlotNode, TextNode};
pub use stmt::{
    Branch, CallNode, DataNode, DataSource, IfNode, LogLevel, LogNode, LoopKind, LoopNode,
    QueryNode, QueryParam, QuerySource, ReturnNode, SetNode, SetOperation, ValueType,
};

use std::fmt;

use serde_json::Value as Json;

use crate::tags::{self, TagDescriptor};

/// One construct of a parsed document.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Application(ApplicationNode),
    Component(ComponentNode),
    Job(JobNode),
    Param(ParamNode),
    Set(SetNode),
    If(IfNode),
    Loop(LoopNode),
    Function(FunctionNode),
    Call(CallNode),
    Return(ReturnNode),
    Import(ImportNode),
    ComponentCall(ComponentCallNode),
    Slot(SlotNode),
    Query(QueryNode),
    Data(DataNode),
    Log(LogNode),
    /// Unregistered lowercase tag, passed through to output.
    Element(ElementNode),
    Text(TextNode),
}

/// Fieldless mirror of [`Node`], used as the executor registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Application,
    Component,
    Job,
    Param,
    Set,
    If,
    Loop,
    Function,
    Call,
    Return,
    Import,
    ComponentCall,
    Slot,
    Query,
    Data,
    Log,
    Element,
    Text,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::Application,
        NodeKind::Component,
        NodeKind::Job,
        NodeKind::Param,
        NodeKind::Set,
        NodeKind::If,
        NodeKind::Loop,
        NodeKind::Function,
        NodeKind::Call,
        NodeKind::Return,
        NodeKind::Import,
        NodeKind::ComponentCall,
        NodeKind::Slot,
        NodeKind::Query,
        NodeKind::Data,
        NodeKind::Log,
        NodeKind::Element,
        NodeKind::Text,
    ];

    /// Stable name, also the `"type"` key of `to_dict()`.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Application => "application",
            NodeKind::Component => "component",
            NodeKind::Job => "job",
            NodeKind::Param => "param",
            NodeKind::Set => "set",
            NodeKind::If => "if",
            NodeKind::Loop => "loop",
            NodeKind::Function => "function",
            NodeKind::Call => "call",
            NodeKind::Return => "return",
            NodeKind::Import => "import",
            NodeKind::ComponentCall => "component_call",
            NodeKind::Slot => "slot",
            NodeKind::Query => "query",
            NodeKind::Data => "data",
            NodeKind::Log => "log",
            NodeKind::Element => "element",
            NodeKind::Text => "text",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Application(_) => NodeKind::Application,
            Node::Component(_) => NodeKind::Component,
            Node::Job(_) => NodeKind::Job,
            Node::Param(_) => NodeKind::Param,
            Node::Set(_) => NodeKind::Set,
            Node::If(_) => NodeKind::If,
            Node::Loop(_) => NodeKind::Loop,
            Node::Function(_) => NodeKind::Function,
            Node::Call(_) => NodeKind::Call,
            Node::Return(_) => NodeKind::Return,
            Node::Import(_) => NodeKind::Import,
            Node::ComponentCall(_) => NodeKind::ComponentCall,
            Node::Slot(_) => NodeKind::Slot,
            Node::Query(_) => NodeKind::Query,
            Node::Data(_) => NodeKind::Data,
            Node::Log(_) => NodeKind::Log,
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
        }
    }

    /// Tag name for diagnostics: the logical tag for built-ins, the written
    /// name for component calls and generic elements.
    pub fn tag_name(&self) -> &str {
        match self {
            Node::ComponentCall(call) => &call.component_name,
            Node::Element(el) => &el.tag,
            Node::Text(_) => "#text",
            other => other.kind().as_str(),
        }
    }

    fn descriptor(&self) -> Option<&'static TagDescriptor> {
        match self {
            Node::ComponentCall(_) | Node::Element(_) | Node::Text(_) => None,
            other => tags::descriptor(other.kind().as_str()),
        }
    }

    /// Direct children in document order.
    ///
    /// For `if`, the bodies of every branch followed by the `else` body.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Application(n) => n.children.iter().collect(),
            Node::Component(n) => n.children.iter().collect(),
            Node::Job(n) => n.children.iter().collect(),
            Node::Loop(n) => n.children.iter().collect(),
            Node::Function(n) => n.children.iter().collect(),
            Node::ComponentCall(n) => n.children.iter().collect(),
            Node::Slot(n) => n.children.iter().collect(),
            Node::Element(n) => n.children.iter().collect(),
            Node::If(n) => n
                .branches
                .iter()
                .flat_map(|b| b.body.iter())
                .chain(n.else_body.iter().flatten())
                .collect(),
            Node::Param(_)
            | Node::Set(_)
            | Node::Call(_)
            | Node::Return(_)
            | Node::Import(_)
            | Node::Query(_)
            | Node::Data(_)
            | Node::Log(_)
            | Node::Text(_) => Vec::new(),
        }
    }

    /// Value of a descriptor attribute, as stored on the node.
    ///
    /// Returns `None` when the attribute was absent or empty in the source.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let value = match self {
            Node::Application(n) => n.attr(name),
            Node::Component(n) => n.attr(name),
            Node::Job(n) => n.attr(name),
            Node::Param(n) => n.attr(name),
            Node::Set(n) => n.attr(name),
            Node::If(n) => n.attr(name),
            Node::Loop(n) => n.attr(name),
            Node::Function(n) => n.attr(name),
            Node::Call(n) => n.attr(name),
            Node::Return(n) => n.value.as_deref().filter(|_| name == "value"),
            Node::Import(n) => n.attr(name),
            Node::Slot(n) => n.name.as_deref().filter(|_| name == "name"),
            Node::Query(n) => n.attr(name),
            Node::Data(n) => n.attr(name),
            Node::Log(n) => n.attr(name),
            Node::ComponentCall(n) => n.props.get(name),
            Node::Element(n) => n.attrs.get(name),
            Node::Text(_) => None,
        };
        value.filter(|v| !v.is_empty())
    }

    /// Local validation: missing required attributes and inconsistent fields.
    ///
    /// Does not descend into children; see `weft_parse::validate_tree` for a
    /// whole-document walk.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = match self.descriptor() {
            Some(descriptor) => descriptor.missing_required(|attr| self.attr(attr).is_some()),
            None => Vec::new(),
        };
        match self {
            Node::Param(n) => n.check(&mut errors),
            Node::If(n) => n.check(&mut errors),
            Node::Loop(n) => n.check(&mut errors),
            Node::Function(n) => n.check(&mut errors),
            Node::Query(n) => n.check(&mut errors),
            Node::Data(n) => n.check(&mut errors),
            Node::ComponentCall(n) => n.check(&mut errors),
            Node::Application(_)
            | Node::Component(_)
            | Node::Job(_)
            | Node::Set(_)
            | Node::Call(_)
            | Node::Return(_)
            | Node::Import(_)
            | Node::Slot(_)
            | Node::Log(_)
            | Node::Element(_)
            | Node::Text(_) => {}
        }
        errors
    }

    /// Order-preserving record projection for diagnostics and snapshots.
    pub fn to_dict(&self) -> Json {
        match self {
            Node::Application(n) => n.to_dict(),
            Node::Component(n) => n.to_dict(),
            Node::Job(n) => n.to_dict(),
            Node::Param(n) => n.to_dict(),
            Node::Set(n) => n.to_dict(),
            Node::If(n) => n.to_dict(),
            Node::Loop(n) => n.to_dict(),
            Node::Function(n) => n.to_dict(),
            Node::Call(n) => n.to_dict(),
            Node::Return(n) => n.to_dict(),
            Node::Import(n) => n.to_dict(),
            Node::ComponentCall(n) => n.to_dict(),
            Node::Slot(n) => n.to_dict(),
            Node::Query(n) => n.to_dict(),
            Node::Data(n) => n.to_dict(),
            Node::Log(n) => n.to_dict(),
            Node::Element(n) => n.to_dict(),
            Node::Text(n) => n.to_dict(),
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_component(self) -> Option<ComponentNode> {
        match self {
            Node::Component(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
