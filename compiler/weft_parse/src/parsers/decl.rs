//! Parsers for declarations.

use weft_ir::{
    ApplicationNode, ComponentNode, FunctionNode, ImportNode, JobNode, Node, ParamNode,
};

use super::{boolean, optional, required};
use crate::markup::{Content, Element};
use crate::{DocumentParser, ParseError, TagParser};

pub struct ApplicationParser;

impl TagParser for ApplicationParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Application(ApplicationNode {
            id: required(el, "id"),
            kind: optional(el, "type"),
            children: parser.parse_children(el)?,
        }))
    }
}

pub struct ComponentParser;

impl TagParser for ComponentParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Component(ComponentNode {
            name: required(el, "name"),
            description: optional(el, "description"),
            children: parser.parse_children(el)?,
        }))
    }
}

pub struct JobParser;

impl TagParser for JobParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Job(JobNode {
            name: required(el, "name"),
            schedule: optional(el, "schedule"),
            children: parser.parse_children(el)?,
        }))
    }
}

pub struct ParamParser;

impl ParamParser {
    fn param(el: &Element) -> Result<ParamNode, ParseError> {
        Ok(ParamNode {
            name: required(el, "name"),
            ty: optional(el, "type"),
            default: optional(el, "default"),
            required: boolean(el, "required")?.unwrap_or(false),
        })
    }
}

impl TagParser for ParamParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Param(Self::param(el)?))
    }
}

/// `<function>`: direct `<param>` children become the signature, the rest is the body.
pub struct FunctionParser;

impl TagParser for FunctionParser {
    fn parse(&self, el: &Element, parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        let mut params = Vec::new();
        let mut body = Vec::new();
        for child in &el.children {
            match child {
                Content::Element(p) if p.local_name() == "param" => {
                    params.push(ParamParser::param(p)?);
                }
                other => body.push(other.clone()),
            }
        }
        Ok(Node::Function(FunctionNode {
            name: required(el, "name"),
            returns: optional(el, "returns"),
            params,
            children: parser.parse_content(&body)?,
        }))
    }
}

pub struct ImportParser;

impl TagParser for ImportParser {
    fn parse(&self, el: &Element, _parser: &DocumentParser<'_>) -> Result<Node, ParseError> {
        Ok(Node::Import(ImportNode {
            component: required(el, "component"),
            from: optional(el, "from"),
            alias: optional(el, "as"),
        }))
    }
}
