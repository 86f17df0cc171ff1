//! GAME autonomous agent runtime.
//!
//! Planning happens remotely; this module registers the agent with the GAME API,
//! asks it for actions and runs the chosen functions locally.

mod agent;
mod client;
mod function;
mod twitter_plugin;

use async_trait::async_trait;

pub use agent::{AgentConfig, GameAgent, LlmModel, StepOutcome};
pub use client::{ActionType, GameClient, GameError};
pub use function::{
    ExecutableGameFunctionResponse, ExecutableGameFunctionStatus, FunctionArg, FunctionArgs,
    FunctionExecutable, GameFunction, GameWorker,
};
pub use twitter_plugin::{twitter_worker, TWITTER_WORKER_ID};

/// The agent as seen by the service: initialized once, then stepped on demand.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn init(&self) -> Result<(), GameError>;

    async fn step(&self) -> Result<StepOutcome, GameError>;
}
