//! Tools the model may invoke during a session.
//!
//! Each tool is declared to the provider as a named function with a JSON
//! schema for its parameters; when the model calls one, the session routes
//! the arguments through the registry and returns the handler's JSON output.

use futures_util::future::BoxFuture;
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    Unknown(String),

    #[error("tool '{name}' failed: {message}")]
    Failed { name: String, message: String },
}

type ToolHandler = Box<dyn Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync>;

struct Tool {
    description: String,
    parameters: Value,
    handler: ToolHandler,
}

/// Named functions exposed to the model.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under `name` with its JSON-schema `parameters`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        handler: F,
    ) where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        self.tools.insert(
            name.into(),
            Tool {
                description: description.into(),
                parameters,
                handler: Box::new(move |args| Box::pin(handler(args))),
            },
        );
    }

    /// Invokes the named tool with the model-supplied arguments.
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::Unknown(name.to_string()))?;
        (tool.handler)(args).await
    }

    /// Function declarations for the `session.update` payload.
    pub fn schemas(&self) -> Vec<Value> {
        let mut schemas: Vec<Value> = self
            .tools
            .iter()
            .map(|(name, tool)| {
                json!({
                    "type": "function",
                    "name": name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                })
            })
            .collect();
        // HashMap iteration order is arbitrary; keep the payload stable.
        schemas.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        schemas
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_echo() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            "echo",
            "Echoes its arguments back",
            json!({"type": "object", "properties": {"text": {"type": "string"}}}),
            |args| async move { Ok(json!({"echoed": args})) },
        );
        registry
    }

    #[tokio::test]
    async fn dispatch_runs_registered_handler() {
        let registry = registry_with_echo();
        let out = registry
            .dispatch("echo", json!({"text": "ciao"}))
            .await
            .unwrap();
        assert_eq!(out["echoed"]["text"], "ciao");
    }

    #[tokio::test]
    async fn dispatch_rejects_unknown_tool() {
        let registry = registry_with_echo();
        let err = registry.dispatch("hangup", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Unknown(name) if name == "hangup"));
    }

    #[test]
    fn schemas_declare_function_shape() {
        let registry = registry_with_echo();
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0]["type"], "function");
        assert_eq!(schemas[0]["name"], "echo");
        assert_eq!(schemas[0]["parameters"]["type"], "object");
    }

    #[test]
    fn register_replaces_existing_tool() {
        let mut registry = registry_with_echo();
        registry.register("echo", "Replacement", json!({"type": "object"}), |_| async {
            Ok(json!("v2"))
        });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.schemas()[0]["description"], "Replacement");
    }
}
