//! Statements: set, if, loop, call, return, query, data, log.

use serde_json::Value as Json;

use super::record::{nodes_json, Record};
use super::Node;
use crate::{Attributes, VarScope};

/// Coercion target of `<set type="...">`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Decimal,
    Number,
    Boolean,
    Array,
    Object,
}

impl ValueType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" | "str" => ValueType::String,
            "integer" | "int" => ValueType::Integer,
            "decimal" | "float" => ValueType::Decimal,
            "number" => ValueType::Number,
            "boolean" | "bool" => ValueType::Boolean,
            "array" | "list" => ValueType::Array,
            "object" | "map" => ValueType::Object,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Decimal => "decimal",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

/// How `<set>` combines its value with the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SetOperation {
    #[default]
    Assign,
    Increment,
    Decrement,
    Append,
}

impl SetOperation {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "assign" => SetOperation::Assign,
            "increment" => SetOperation::Increment,
            "decrement" => SetOperation::Decrement,
            "append" => SetOperation::Append,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SetOperation::Assign => "assign",
            SetOperation::Increment => "increment",
            SetOperation::Decrement => "decrement",
            SetOperation::Append => "append",
        }
    }
}

/// Variable declaration / assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct SetNode {
    pub name: String,
    pub value: Option<String>,
    pub scope: VarScope,
    pub ty: Option<ValueType>,
    pub operation: SetOperation,
}

impl SetNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "value" => self.value.as_deref(),
            "scope" => Some(self.scope.as_str()),
            "type" => self.ty.map(ValueType::as_str),
            "operation" => Some(self.operation.as_str()),
            _ => None,
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("set")
            .field("name", self.name.as_str())
            .opt("value", self.value.as_deref())
            .field("scope", self.scope.as_str())
            .opt("ty", self.ty.map(ValueType::as_str))
            .field("operation", self.operation.as_str())
            .finish()
    }
}

/// One conditional arm: the `if` itself or an `elseif`.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub condition: String,
    pub body: Vec<Node>,
}

impl Branch {
    fn to_dict(&self) -> Json {
        Record::new("branch")
            .field("condition", self.condition.as_str())
            .nodes("body", &self.body)
            .finish()
    }
}

/// `if` with its `elseif` arms folded in; never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct IfNode {
    pub branches: Vec<Branch>,
    pub else_body: Option<Vec<Node>>,
}

impl IfNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "condition" => self.branches.first().map(|b| b.condition.as_str()),
            _ => None,
        }
    }

    pub(super) fn check(&self, errors: &mut Vec<String>) {
        for branch in self.branches.iter().skip(1) {
            if branch.condition.trim().is_empty() {
                errors.push("<elseif> is missing required attribute `condition`".to_string());
            }
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        let branches: Vec<Json> = self.branches.iter().map(Branch::to_dict).collect();
        let else_body = self.else_body.as_deref().map_or(Json::Null, nodes_json);
        Record::new("if")
            .field("branches", branches)
            .field("else", else_body)
            .finish()
    }
}

/// Iteration source of a loop.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopKind {
    /// Inclusive integer range.
    Range {
        from: Option<String>,
        to: Option<String>,
        step: Option<String>,
    },
    /// `items` evaluates to a list.
    Array { items: Option<String> },
    /// `items` is a delimited string.
    List {
        items: Option<String>,
        delimiter: Option<String>,
    },
}

impl LoopKind {
    pub fn name(&self) -> &'static str {
        match self {
            LoopKind::Range { .. } => "range",
            LoopKind::Array { .. } => "array",
            LoopKind::List { .. } => "list",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoopNode {
    pub var: String,
    pub index: Option<String>,
    pub kind: LoopKind,
    pub children: Vec<Node>,
}

impl LoopNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match (name, &self.kind) {
            ("var", _) => Some(&self.var),
            ("index", _) => self.index.as_deref(),
            ("type", kind) => Some(kind.name()),
            ("from", LoopKind::Range { from, .. }) => from.as_deref(),
            ("to", LoopKind::Range { to, .. }) => to.as_deref(),
            ("step", LoopKind::Range { step, .. }) => step.as_deref(),
            ("items", LoopKind::Array { items } | LoopKind::List { items, .. }) => {
                items.as_deref()
            }
            ("delimiter", LoopKind::List { delimiter, .. }) => delimiter.as_deref(),
            _ => None,
        }
    }

    pub(super) fn check(&self, errors: &mut Vec<String>) {
        let kind = self.kind.name();
        let needs: &[&str] = match self.kind {
            LoopKind::Range { .. } => &["from", "to"],
            LoopKind::Array { .. } | LoopKind::List { .. } => &["items"],
        };
        for attr in needs {
            if !self.attr(attr).is_some_and(|v| !v.is_empty()) {
                errors.push(format!("<loop type=\"{kind}\"> requires attribute `{attr}`"));
            }
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        let record = Record::new("loop")
            .field("var", self.var.as_str())
            .opt("index", self.index.as_deref())
            .field("kind", self.kind.name());
        let record = match &self.kind {
            LoopKind::Range { from, to, step } => record
                .opt("from", from.as_deref())
                .opt("to", to.as_deref())
                .opt("step", step.as_deref()),
            LoopKind::Array { items } => record.opt("items", items.as_deref()),
            LoopKind::List { items, delimiter } => record
                .opt("items", items.as_deref())
                .opt("delimiter", delimiter.as_deref()),
        };
        record.children(&self.children)
    }
}

/// `<call function="total" a="{x}" result="sum"/>`
#[derive(Clone, Debug, PartialEq)]
pub struct CallNode {
    pub function: String,
    /// Every attribute except `function` and `result`.
    pub args: Attributes,
    pub result: Option<String>,
}

impl CallNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "function" => Some(&self.function),
            "result" => self.result.as_deref(),
            other => self.args.get(other),
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("call")
            .field("function", self.function.as_str())
            .attrs("args", &self.args)
            .opt("result", self.result.as_deref())
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnNode {
    pub value: Option<String>,
}

impl ReturnNode {
    pub(super) fn to_dict(&self) -> Json {
        Record::new("return")
            .opt("value", self.value.as_deref())
            .finish()
    }
}

/// Where a query runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QuerySource {
    /// A named external datasource.
    #[default]
    Database,
    /// Data already in scope; no datasource needed.
    Memory,
}

impl QuerySource {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "database" | "db" => Some(QuerySource::Database),
            "memory" => Some(QuerySource::Memory),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuerySource::Database => "database",
            QuerySource::Memory => "memory",
        }
    }
}

/// `<param name="id" value="{user_id}"/>` inside a query.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

/// A blocking call to an external data source.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryNode {
    pub name: String,
    pub datasource: Option<String>,
    pub source: QuerySource,
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl QueryNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "datasource" => self.datasource.as_deref(),
            "source" => Some(self.source.as_str()),
            _ => None,
        }
    }

    pub(super) fn check(&self, errors: &mut Vec<String>) {
        if self.source == QuerySource::Database && self.datasource.is_none() {
            errors.push(format!(
                "<query name=\"{}\"> runs against a database but names no `datasource`",
                self.name
            ));
        }
        if self.sql.trim().is_empty() {
            errors.push(format!("<query name=\"{}\"> has no query text", self.name));
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        let params: Vec<Json> = self
            .params
            .iter()
            .map(|p| {
                Record::new("query_param")
                    .field("name", p.name.as_str())
                    .field("value", p.value.as_str())
                    .finish()
            })
            .collect();
        Record::new("query")
            .field("name", self.name.as_str())
            .opt("datasource", self.datasource.as_deref())
            .field("source", self.source.as_str())
            .field("sql", self.sql.as_str())
            .field("params", params)
            .finish()
    }
}

/// Origin of a `<data>` element's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataSource {
    /// JSON in the element body.
    #[default]
    Inline,
    /// JSON file at `path`.
    File,
}

impl DataSource {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inline" => Some(DataSource::Inline),
            "file" | "json" => Some(DataSource::File),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Inline => "inline",
            DataSource::File => "file",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataNode {
    pub name: String,
    pub source: DataSource,
    pub path: Option<String>,
    pub body: Option<String>,
}

impl DataNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "source" => Some(self.source.as_str()),
            "path" => self.path.as_deref(),
            _ => None,
        }
    }

    pub(super) fn check(&self, errors: &mut Vec<String>) {
        match self.source {
            DataSource::File if self.path.is_none() => errors.push(format!(
                "<data name=\"{}\" source=\"file\"> requires attribute `path`",
                self.name
            )),
            DataSource::Inline if !self.body.as_deref().is_some_and(|b| !b.trim().is_empty()) => {
                errors.push(format!(
                    "<data name=\"{}\" source=\"inline\"> has no body",
                    self.name
                ));
            }
            DataSource::File | DataSource::Inline => {}
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("data")
            .field("name", self.name.as_str())
            .field("source", self.source.as_str())
            .opt("path", self.path.as_deref())
            .opt("body", self.body.as_deref())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogNode {
    pub message: String,
    pub level: LogLevel,
}

impl LogNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "message" => Some(&self.message),
            "level" => Some(self.level.as_str()),
            _ => None,
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("log")
            .field("message", self.message.as_str())
            .field("level", self.level.as_str())
            .finish()
    }
}
