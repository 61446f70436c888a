//! Parsers for statements.

use weft_ir::{
    Branch, CallNode, DataNode, DataSource, IfNode, LogLevel, LogNode, LoopKind, LoopNode, Node,
    QueryNode, QueryParam, QuerySource, ReturnNode, SetNode, SetOperation, ValueType, VarScope,
};

use super::{integer, keyword, optional, required};
use crate::markup::{Content, Element};
use crate::{DocumentParser, ParseError, TagParser};

pub struct SetParser;

impl TagParser for SetParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let scope = keyword(
            el,
            "scope",
            |s: &str| s.parse::<VarScope>().ok(),
            "local, function, component, session",
        )?;
        let ty = keyword(
            el,
            "type",
            ValueType::from_name,
            "string, integer, decimal, number, boolean, array, object",
        )?;
        let operation = keyword(
            el,
            "operation",
            SetOperation::from_name,
            "assign, increment, decrement, append",
        )?;
        Ok(Node::Set(SetNode {
            name: required(el, "name"),
            value: optional(el, "value"),
            scope: scope.unwrap_or_default(),
            ty,
            operation: operation.unwrap_or_default(),
        }))
    }
}

/// `<if>` folds its `<elseif>`/`<else>` children into branches.
///
/// Content following an `<elseif>` or `<else>` marker (self-closing or not)
/// belongs to that arm, so both of these are equivalent:
///
/// ```text
/// <if condition="{a}">A<elseif condition="{b}">B</elseif><else>C</else></if>
/// <if condition="{a}">A<elseif condition="{b}"/>B<else/>C</if>
/// ```
pub struct IfParser;

impl TagParser for IfParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let mut branches = vec![Branch {
            condition: condition(el),
            body: Vec::new(),
        }];
        let mut else_body: Option<Vec<Node>> = None;

        for child in &el.children {
            match child {
                Content::Element(arm) if arm.local_name() == "elseif" => {
                    if else_body.is_some() {
                        return Err(ParseError::misplaced("elseif", "follows <else>"));
                    }
                    branches.push(Branch {
                        condition: condition(arm),
                        body: parser.parse_children(arm)?,
                    });
                }
                Content::Element(arm) if arm.local_name() == "else" => {
                    if else_body.is_some() {
                        return Err(ParseError::misplaced("else", "appears twice in one <if>"));
                    }
                    else_body = Some(parser.parse_children(arm)?);
                }
                other => {
                    let nodes = parser.parse_content(std::slice::from_ref(other))?;
                    if let Some(body) = else_body.as_mut() {
                        body.extend(nodes);
                    } else if let Some(branch) = branches.last_mut() {
                        branch.body.extend(nodes);
                    }
                }
            }
        }

        Ok(Node::If(IfNode {
            branches,
            else_body,
        }))
    }
}

/// `test` is accepted as a spelling of `condition`.
fn condition(el: &Element) -> String {
    el.attr("condition")
        .or_else(|| el.attr("test"))
        .unwrap_or_default()
        .to_string()
}

/// `<elseif>` and `<else>` are consumed by `IfParser`; reaching the registry
/// means they appear outside an `<if>`.
pub struct BranchParser;

impl TagParser for BranchParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Err(ParseError::misplaced(
            el.local_name(),
            "must appear directly inside <if>",
        ))
    }
}

pub struct LoopParser;

impl TagParser for LoopParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let default_kind = if el.attr("items").is_some() {
            "array"
        } else {
            "range"
        };
        let kind = match el.attr("type").map_or(default_kind, str::trim) {
            "range" => LoopKind::Range {
                from: integer(el, "from")?,
                to: integer(el, "to")?,
                step: integer(el, "step")?,
            },
            "array" => LoopKind::Array {
                items: optional(el, "items"),
            },
            "list" => LoopKind::List {
                items: optional(el, "items"),
                delimiter: optional(el, "delimiter"),
            },
            other => {
                return Err(ParseError::invalid_attribute(
                    "loop",
                    "type",
                    format!("`{other}` is not one of range, array, list"),
                ))
            }
        };
        Ok(Node::Loop(LoopNode {
            var: required(el, "var"),
            index: optional(el, "index"),
            kind,
            children: parser.parse_children(el)?,
        }))
    }
}

pub struct CallParser;

impl TagParser for CallParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Call(CallNode {
            function: required(el, "function"),
            args: el.attrs.without(&["function", "result"]),
            result: optional(el, "result"),
        }))
    }
}

pub struct ReturnParser;

impl TagParser for ReturnParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Return(ReturnNode {
            value: optional(el, "value"),
        }))
    }
}

/// `<query>`: body text is the query, `<param>` children its parameters.
pub struct QueryParser;

impl TagParser for QueryParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let source = keyword(el, "source", QuerySource::from_name, "database, memory")?;
        let mut params = Vec::new();
        for child in el.elements() {
            if child.local_name() != "param" {
                return Err(ParseError::misplaced(
                    child.local_name(),
                    "only <param> may appear inside <query>",
                ));
            }
            let Some(name) = child.attr("name") else {
                return Err(ParseError::misplaced("param", "query parameter has no name"));
            };
            params.push(QueryParam {
                name: name.to_string(),
                value: required(child, "value"),
            });
        }
        Ok(Node::Query(QueryNode {
            name: required(el, "name"),
            datasource: optional(el, "datasource"),
            source: source.unwrap_or_default(),
            sql: el.text(),
            params,
        }))
    }
}

pub struct DataParser;

impl TagParser for DataParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let source = keyword(el, "source", DataSource::from_name, "inline, file")?;
        let path = optional(el, "path");
        let source = source.unwrap_or(if path.is_some() {
            DataSource::File
        } else {
            DataSource::Inline
        });
        let body = el.text();
        Ok(Node::Data(DataNode {
            name: required(el, "name"),
            source,
            path,
            body: (!body.is_empty()).then_some(body),
        }))
    }
}

pub struct LogParser;

impl TagParser for LogParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let level = keyword(
            el,
            "level",
            LogLevel::from_name,
            "trace, debug, info, warn, error",
        )?;
        Ok(Node::Log(LogNode {
            message: required(el, "message"),
            level: level.unwrap_or_default(),
        }))
    }
}
