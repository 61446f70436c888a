//! Side channels: query, data, log.

use std::path::PathBuf;

use tracing::{debug, error, info, trace, warn};
use weft_ir::{DataSource, LogLevel, Node, NodeKind, VarScope};

use super::wrong_node;
use crate::context::ExecutionContext;
use crate::errors::{data_error, query_error, EvalResult};
use crate::expr::{evaluate_value, interpolate};
use crate::interpreter::{Flow, Interpreter};
use crate::query::QueryRequest;
use crate::Value;

/// Run a query through the configured backend and store the result under
/// the query's name.
pub(super) fn exec_query(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Query(query) = node else {
        return Err(wrong_node(NodeKind::Query, node));
    };
    let backend = interp
        .query_backend()
        .ok_or_else(|| query_error(&query.name, "no query backend configured"))?;

    let sql = interpolate(&query.sql, ctx)?;
    let mut params = Vec::with_capacity(query.params.len());
    for param in &query.params {
        params.push((param.name.clone(), evaluate_value(&param.value, ctx)?));
    }
    debug!(query = %query.name, params = params.len(), "running query");

    let result = backend
        .run(&QueryRequest {
            name: &query.name,
            datasource: query.datasource.as_deref(),
            source: query.source,
            sql: &sql,
            params: &params,
        })
        .map_err(|err| query_error(&query.name, err.0))?;
    ctx.assign(VarScope::Local, query.name.clone(), result.clone());
    Ok(Flow::Normal(result))
}

/// Load JSON from the node body or a file and store it under the node's
/// name. Inline bodies are taken literally.
pub(super) fn exec_data(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Data(data) = node else {
        return Err(wrong_node(NodeKind::Data, node));
    };
    let text = match data.source {
        DataSource::Inline => data.body.clone().unwrap_or_default(),
        DataSource::File => {
            let Some(path) = data.path.as_deref() else {
                return Err(data_error(&data.name, "no `path` given"));
            };
            let mut path = PathBuf::from(interpolate(path, ctx)?);
            if path.is_relative() {
                if let Some(dir) = interp.data_dir() {
                    path = dir.join(path);
                }
            }
            std::fs::read_to_string(&path)
                .map_err(|err| data_error(&data.name, format!("{}: {err}", path.display())))?
        }
    };
    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| data_error(&data.name, err.to_string()))?;
    let value = Value::from_json(json);
    ctx.assign(VarScope::Local, data.name.clone(), value.clone());
    Ok(Flow::Normal(value))
}

/// Write the message to the output and emit it as a tracing event.
pub(super) fn exec_log(
    node: &Node,
    ctx: &ExecutionContext,
    interp: &Interpreter,
) -> EvalResult<Flow> {
    let Node::Log(log) = node else {
        return Err(wrong_node(NodeKind::Log, node));
    };
    let message = interpolate(&log.message, ctx)?;
    match log.level {
        LogLevel::Trace => trace!(target: "weft::log", "{message}"),
        LogLevel::Debug => debug!(target: "weft::log", "{message}"),
        LogLevel::Info => info!(target: "weft::log", "{message}"),
        LogLevel::Warn => warn!(target: "weft::log", "{message}"),
        LogLevel::Error => error!(target: "weft::log", "{message}"),
    }
    interp.output().writeln(&message);
    Ok(Flow::unit())
}
