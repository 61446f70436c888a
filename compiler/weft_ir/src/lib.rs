//! Weft IR - the typed AST shared by the parser, resolver and interpreter.
//!
//! # Layout
//!
//! - `ast`: the closed [`Node`] enumeration and its per-variant payloads
//! - `attrs`: ordered attribute lists as written in the source
//! - `tags`: the read-only [`TagDescriptor`] table (required/optional attributes)
//! - `scope`: the four variable scopes a `set` can target
//! - `visitor`: pre-order walks over a tree
//!
//! Nodes own their children exclusively. The only cross-tree references are
//! by name (an import's target component), so a parsed tree can be handed to
//! any number of read-only consumers.

pub mod ast;
mod attrs;
mod scope;
pub mod tags;
pub mod visitor;

pub use ast::{
    ApplicationNode, Branch, CallNode, ComponentCallNode, ComponentNode, DataNode, DataSource,
    ElementNode, FunctionNode, IfNode, ImportNode, JobNode, LogLevel, LogNode, LoopKind,
    LoopNode, Node, NodeKind, ParamNode, QueryNode, QueryParam, QuerySource, ReturnNode,
    SetNode, SetOperation, SlotNode, TextNode, ValueType,
};
pub use attrs::Attributes;
pub use scope::{UnknownScope, VarScope};
pub use tags::{descriptor, TagDescriptor};
