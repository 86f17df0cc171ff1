//! Functions and workers exposed to a GAME agent.
//!
//! A [`GameWorker`] groups [`GameFunction`]s. The remote planner picks a function
//! by name, and the agent runs it locally through its [`FunctionExecutable`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Outcome reported back to the planner after a function ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutableGameFunctionStatus {
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableGameFunctionResponse {
    pub status: ExecutableGameFunctionStatus,
    pub feedback: String,
}

impl ExecutableGameFunctionResponse {
    pub fn done(feedback: impl Into<String>) -> Self {
        Self {
            status: ExecutableGameFunctionStatus::Done,
            feedback: feedback.into(),
        }
    }

    pub fn failed(feedback: impl Into<String>) -> Self {
        Self {
            status: ExecutableGameFunctionStatus::Failed,
            feedback: feedback.into(),
        }
    }
}

/// Declared argument of a function, shown to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionArg {
    pub name: String,
    pub description: String,
}

impl FunctionArg {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Arguments chosen by the planner for one call.
///
/// The planner sends either bare values or `{"value": ...}` wrappers; both read the same.
#[derive(Debug, Clone, Default)]
pub struct FunctionArgs(Map<String, Value>);

impl FunctionArgs {
    pub fn new(args: Map<String, Value>) -> Self {
        Self(args)
    }

    pub fn get(&self, name: &str) -> Option<String> {
        let value = self.0.get(name)?;
        let value = value.get("value").unwrap_or(value);
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Like [`FunctionArgs::get`], but treats blank strings as missing.
    pub fn require(&self, name: &str) -> Result<String, ExecutableGameFunctionResponse> {
        match self.get(name) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ExecutableGameFunctionResponse::failed(format!(
                "Missing required argument '{}'",
                name
            ))),
        }
    }
}

impl From<Map<String, Value>> for FunctionArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Local implementation behind a [`GameFunction`].
#[async_trait]
pub trait FunctionExecutable: Send + Sync {
    async fn execute(&self, args: &FunctionArgs) -> ExecutableGameFunctionResponse;
}

#[derive(Clone)]
pub struct GameFunction {
    pub name: String,
    pub description: String,
    pub args: Vec<FunctionArg>,
    executable: Arc<dyn FunctionExecutable>,
}

impl fmt::Debug for GameFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameFunction")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl GameFunction {
    pub fn new(
        name: &str,
        description: &str,
        args: Vec<FunctionArg>,
        executable: Arc<dyn FunctionExecutable>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            args,
            executable,
        }
    }

    /// Description sent to the planner.
    pub fn to_json(&self) -> Value {
        json!({
            "fn_name": self.name,
            "fn_description": self.description,
            "args": self.args,
        })
    }

    pub async fn execute(&self, args: &FunctionArgs) -> ExecutableGameFunctionResponse {
        info!("Executing function '{}'", self.name);
        let response = self.executable.execute(args).await;
        match response.status {
            ExecutableGameFunctionStatus::Done => info!("Function '{}' done", self.name),
            ExecutableGameFunctionStatus::Failed => {
                error!("Function '{}' failed: {}", self.name, response.feedback)
            }
        }
        response
    }
}

/// A named set of functions the planner can move between.
#[derive(Debug, Clone)]
pub struct GameWorker {
    pub id: String,
    pub name: String,
    pub description: String,
    pub functions: Vec<GameFunction>,
}

impl GameWorker {
    pub fn new(id: &str, name: &str, description: &str, functions: Vec<GameFunction>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            functions,
        }
    }

    pub fn function(&self, name: &str) -> Option<&GameFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Runs the named function, failing softly when the worker does not have it.
    pub async fn execute(&self, fn_name: &str, args: &FunctionArgs) -> ExecutableGameFunctionResponse {
        match self.function(fn_name) {
            Some(function) => function.execute(args).await,
            None => ExecutableGameFunctionResponse::failed(format!(
                "Function '{}' is not available on worker '{}'",
                fn_name, self.id
            )),
        }
    }
}
