//! Declarations: application, component, job, param, function, import.

use serde_json::Value as Json;

use super::record::Record;
use super::Node;

/// Root of a multi-component document.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationNode {
    pub id: String,
    pub kind: Option<String>,
    pub children: Vec<Node>,
}

impl ApplicationNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "type" => self.kind.as_deref(),
            _ => None,
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("application")
            .field("id", self.id.as_str())
            .opt("kind", self.kind.as_deref())
            .children(&self.children)
    }

    /// Components declared directly under the application.
    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> {
        self.children.iter().filter_map(Node::as_component)
    }
}

/// A named, reusable unit; the unit the component resolver loads.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentNode {
    pub name: String,
    pub description: Option<String>,
    /// Statements in document order, including `param` and `import` declarations.
    pub children: Vec<Node>,
}

impl ComponentNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => self.description.as_deref(),
            _ => None,
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("component")
            .field("name", self.name.as_str())
            .opt("description", self.description.as_deref())
            .children(&self.children)
    }

    /// Declared parameters, in order.
    pub fn params(&self) -> impl Iterator<Item = &ParamNode> {
        self.children.iter().filter_map(|n| match n {
            Node::Param(p) => Some(p),
            _ => None,
        })
    }

    /// Top-level import declarations, in order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportNode> {
        self.children.iter().filter_map(|n| match n {
            Node::Import(i) => Some(i),
            _ => None,
        })
    }
}

/// A background job: a body executed in its own frame.
#[derive(Clone, Debug, PartialEq)]
pub struct JobNode {
    pub name: String,
    pub schedule: Option<String>,
    pub children: Vec<Node>,
}

impl JobNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "schedule" => self.schedule.as_deref(),
            _ => None,
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("job")
            .field("name", self.name.as_str())
            .opt("schedule", self.schedule.as_deref())
            .children(&self.children)
    }
}

/// A component or function parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamNode {
    pub name: String,
    pub ty: Option<String>,
    pub default: Option<String>,
    pub required: bool,
}

impl ParamNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "type" => self.ty.as_deref(),
            "default" => self.default.as_deref(),
            _ => None,
        }
    }

    pub(super) fn check(&self, errors: &mut Vec<String>) {
        if self.required && self.default.is_some() {
            errors.push(format!(
                "<param name=\"{}\"> is required but also declares a default",
                self.name
            ));
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("param")
            .field("name", self.name.as_str())
            .opt("ty", self.ty.as_deref())
            .opt("default", self.default.as_deref())
            .field("required", self.required)
            .finish()
    }
}

/// A function declared inside a component.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionNode {
    pub name: String,
    pub returns: Option<String>,
    pub params: Vec<ParamNode>,
    pub children: Vec<Node>,
}

impl FunctionNode {
    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "returns" => self.returns.as_deref(),
            _ => None,
        }
    }

    pub(super) fn check(&self, errors: &mut Vec<String>) {
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                errors.push(format!(
                    "<function name=\"{}\"> declares parameter `{}` more than once",
                    self.name, param.name
                ));
            }
            param.check(errors);
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        let params: Vec<Json> = self.params.iter().map(ParamNode::to_dict).collect();
        Record::new("function")
            .field("name", self.name.as_str())
            .opt("returns", self.returns.as_deref())
            .field("params", params)
            .children(&self.children)
    }
}

/// `<import component="Card" from="./ui" as="UiCard"/>`
#[derive(Clone, Debug, PartialEq)]
pub struct ImportNode {
    pub component: String,
    pub from: Option<String>,
    pub alias: Option<String>,
}

impl ImportNode {
    /// Name the importing document uses to refer to the component.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.component)
    }

    pub(super) fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "component" => Some(&self.component),
            "from" => self.from.as_deref(),
            "as" => self.alias.as_deref(),
            _ => None,
        }
    }

    pub(super) fn to_dict(&self) -> Json {
        Record::new("import")
            .field("component", self.component.as_str())
            .opt("from", self.from.as_deref())
            .opt("alias", self.alias.as_deref())
            .finish()
    }
}
