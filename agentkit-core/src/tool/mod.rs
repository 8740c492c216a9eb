//! Typed tools and the registry an agent calls them through.

use crate::types::ToolError;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A callable tool with typed, schema-described parameters.
///
/// Usually generated by `#[tools(...)]` rather than written by hand.
#[async_trait]
pub trait ToolFunction: Send + Sync {
    type Params: JsonSchema + DeserializeOwned + Send;
    type Response: Serialize + Send;

    fn name() -> &'static str;

    fn description() -> &'static str;

    /// JSON Schema of [`Self::Params`]
    fn parameters_schema() -> Value {
        serde_json::to_value(schemars::schema_for!(Self::Params)).unwrap_or(Value::Null)
    }

    async fn execute(&self, params: Self::Params) -> Result<Self::Response, ToolError>;
}

/// Object-safe view of a [`ToolFunction`] taking and returning JSON.
#[async_trait]
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn call(&self, args: Value) -> Result<Value, ToolError>;
}

#[async_trait]
impl<T> DynTool for T
where
    T: ToolFunction,
{
    fn name(&self) -> &str {
        <T as ToolFunction>::name()
    }

    fn description(&self) -> &str {
        <T as ToolFunction>::description()
    }

    fn parameters_schema(&self) -> Value {
        <T as ToolFunction>::parameters_schema()
    }

    async fn call(&self, args: Value) -> Result<Value, ToolError> {
        let params: T::Params = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidInput(e.to_string()))?;
        let response = self.execute(params).await?;
        Ok(serde_json::to_value(response)?)
    }
}

/// Ordered set of tools addressed by name.
#[derive(Clone, Default)]
pub struct ToolBox {
    tools: Vec<Arc<dyn DynTool>>,
}

impl ToolBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool<T>(mut self, tool: T) -> Self
    where
        T: ToolFunction + 'static,
    {
        self.add(tool);
        self
    }

    /// Register a tool. A tool with the same name is replaced in place.
    pub fn add<T>(&mut self, tool: T) -> &mut Self
    where
        T: ToolFunction + 'static,
    {
        let tool: Arc<dyn DynTool> = Arc::new(tool);
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(index) => self.tools[index] = tool,
            None => self.tools.push(tool),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DynTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One `name: description` line per tool. Tools taking several
    /// parameters also name the JSON keys they expect.
    pub fn describe(&self) -> String {
        self.tools
            .iter()
            .map(|t| {
                let schema = t.parameters_schema();
                let keys: Vec<&str> = schema
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                if keys.len() > 1 {
                    format!(
                        "{}: {} Input must be a JSON object with keys: {}.",
                        t.name(),
                        t.description(),
                        keys.join(", ")
                    )
                } else {
                    format!("{}: {}", t.name(), t.description())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Call a tool with free-form text input.
    ///
    /// A JSON object is passed through as the parameters. Anything else is
    /// bound to the parameter when the tool takes exactly one, which is also
    /// the fallback when an object does not mention that parameter. String
    /// responses are returned as-is, other responses as JSON text.
    pub async fn invoke(&self, name: &str, input: &str) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::InvalidInput(format!("unknown tool `{}`", name)))?;

        let args = coerce_input(input.trim(), single_property(&tool.parameters_schema()))?;
        tracing::debug!(tool = name, %args, "invoking tool");

        Ok(match tool.call(args).await? {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }
}

impl fmt::Debug for ToolBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBox")
            .field("tools", &self.names())
            .finish()
    }
}

fn single_property(schema: &Value) -> Option<String> {
    let properties = schema.get("properties")?.as_object()?;
    if properties.len() == 1 {
        properties.keys().next().cloned()
    } else {
        None
    }
}

fn coerce_input(input: &str, single: Option<String>) -> Result<Value, ToolError> {
    let bind = |field: String, value: Value| {
        let mut map = Map::new();
        map.insert(field, value);
        Value::Object(map)
    };

    match (serde_json::from_str::<Value>(input), single) {
        (Ok(Value::Object(map)), Some(field)) if !map.contains_key(&field) => {
            Ok(bind(field, Value::String(input.to_string())))
        }
        (Ok(value @ Value::Object(_)), _) => Ok(value),
        (Ok(Value::String(text)), Some(field)) => Ok(bind(field, Value::String(text))),
        (_, Some(field)) => Ok(bind(field, Value::String(input.to_string()))),
        (_, None) => Err(ToolError::InvalidInput(format!(
            "expected a JSON object, got `{}`",
            input
        ))),
    }
}
