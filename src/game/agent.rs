//! The GAME agent: remote planning, local function execution.

use async_trait::async_trait;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use super::client::{ActionResult, ActionType, GameClient, GameError};
use super::function::{ExecutableGameFunctionResponse, FunctionArgs, GameWorker};
use super::AgentRuntime;

/// Language model the planner runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmModel {
    #[default]
    DeepSeekR1,
    DeepSeekV3,
    Llama3_1_405B,
    Llama3_3_70B,
    Qwen2_5_72B,
}

impl LlmModel {
    pub fn as_str(self) -> &'static str {
        match self {
            LlmModel::DeepSeekR1 => "deepseek-r1",
            LlmModel::DeepSeekV3 => "deepseek-v3",
            LlmModel::Llama3_1_405B => "Llama-3.1-405B-Instruct",
            LlmModel::Llama3_3_70B => "Llama-3.3-70B-Instruct",
            LlmModel::Qwen2_5_72B => "Qwen-2.5-72B-Instruct",
        }
    }
}

/// Identity and goal of an agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub name: String,
    pub goal: String,
    pub description: String,
    pub llm_model: LlmModel,
}

/// What a single step did.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub action_type: ActionType,
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExecutableGameFunctionResponse>,
}

#[derive(Debug, Default)]
struct StepState {
    agent_id: Option<String>,
    map_id: Option<String>,
    current_worker: usize,
    last_result: Option<ActionResult>,
    agent_state: Value,
}

pub struct GameAgent {
    client: GameClient,
    config: AgentConfig,
    workers: Vec<GameWorker>,
    state: Mutex<StepState>,
}

impl GameAgent {
    pub fn new(client: GameClient, config: AgentConfig, workers: Vec<GameWorker>) -> Self {
        Self {
            client,
            config,
            workers,
            state: Mutex::new(StepState::default()),
        }
    }

    fn worker_index(&self, worker_id: &str) -> Result<usize, GameError> {
        self.workers
            .iter()
            .position(|w| w.id == worker_id)
            .ok_or_else(|| GameError::UnknownWorker(worker_id.to_string()))
    }
}

#[async_trait]
impl AgentRuntime for GameAgent {
    async fn init(&self) -> Result<(), GameError> {
        if self.workers.is_empty() {
            return Err(GameError::NoWorkers);
        }

        info!("Initializing GAME agent '{}'", self.config.name);
        let map_id = self.client.create_map(&self.workers).await?;
        let agent_id = self
            .client
            .create_agent(&self.config.name, &self.config.goal, &self.config.description)
            .await?;

        let mut state = self.state.lock().await;
        state.map_id = Some(map_id);
        state.agent_id = Some(agent_id.clone());
        state.current_worker = 0;
        state.last_result = None;
        info!(
            "GAME agent '{}' initialized with id {} and {} workers",
            self.config.name,
            agent_id,
            self.workers.len()
        );
        Ok(())
    }

    async fn step(&self) -> Result<StepOutcome, GameError> {
        let mut state = self.state.lock().await;
        let (agent_id, map_id) = match (state.agent_id.clone(), state.map_id.clone()) {
            (Some(agent_id), Some(map_id)) => (agent_id, map_id),
            _ => return Err(GameError::NotInitialized),
        };

        let worker = &self.workers[state.current_worker];
        let action = self
            .client
            .get_action(
                &agent_id,
                &map_id,
                worker,
                state.last_result.as_ref(),
                &state.agent_state,
            )
            .await?;
        state.agent_state = action.agent_state.clone();
        info!(
            "Agent '{}' received action {:?} at worker '{}'",
            self.config.name, action.action_type, worker.id
        );

        let mut outcome = StepOutcome {
            action_type: action.action_type,
            worker_id: worker.id.clone(),
            function: None,
            result: None,
        };

        match action.action_type {
            ActionType::CallFunction | ActionType::ContinueFunction => {
                let fn_name = action.action_args.fn_name.clone().unwrap_or_default();
                let args = FunctionArgs::new(action.action_args.args.clone());
                let response = worker.execute(&fn_name, &args).await;

                state.last_result = Some(ActionResult {
                    action_id: action.action_args.fn_id.clone().unwrap_or_default(),
                    action_status: response.status,
                    feedback_message: response.feedback.clone(),
                });
                outcome.function = Some(fn_name);
                outcome.result = Some(response);
            }
            ActionType::GoTo => {
                let location = action.action_args.location_id.clone().unwrap_or_default();
                state.current_worker = self.worker_index(&location)?;
                state.last_result = None;
                outcome.worker_id = location;
            }
            ActionType::Wait => {
                info!("Agent '{}' is waiting", self.config.name);
                state.last_result = None;
            }
            ActionType::Unknown => {
                warn!("Agent '{}' received an unrecognized action", self.config.name);
                state.last_result = None;
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Arc;

    use axum::{
        extract::{Path, State},
        routing::post,
        Json, Router,
    };
    use serde_json::json;

    use crate::game::{ExecutableGameFunctionStatus, FunctionArg, FunctionExecutable, GameFunction};
    use crate::tests::spawn_upstream;

    /// GAME API stand-in: hands out scripted actions and keeps every action request.
    #[derive(Clone, Default)]
    struct FakeGame {
        actions: Arc<std::sync::Mutex<VecDeque<Value>>>,
        requests: Arc<std::sync::Mutex<Vec<Value>>>,
    }

    impl FakeGame {
        fn requests(&self) -> Vec<Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn issue_token() -> Json<Value> {
        Json(json!({ "data": { "accessToken": "game-token" } }))
    }

    async fn create_map() -> Json<Value> {
        Json(json!({ "data": { "id": "map-1" } }))
    }

    async fn create_agent() -> Json<Value> {
        Json(json!({ "data": { "id": "agent-1" } }))
    }

    async fn next_action(
        State(game): State<FakeGame>,
        Path(agent_id): Path<String>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let mut request = body["data"].clone();
        request["agent_id"] = json!(agent_id);
        game.requests.lock().unwrap().push(request);
        let action = game
            .actions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| json!({ "action_type": "wait" }));
        Json(json!({ "data": action }))
    }

    struct Echo;

    #[async_trait]
    impl FunctionExecutable for Echo {
        async fn execute(&self, args: &FunctionArgs) -> ExecutableGameFunctionResponse {
            match args.require("text") {
                Ok(text) => ExecutableGameFunctionResponse::done(text),
                Err(failed) => failed,
            }
        }
    }

    fn echo_worker(id: &str) -> GameWorker {
        GameWorker::new(
            id,
            "Echo",
            "Repeats text",
            vec![GameFunction::new(
                "echo",
                "Echo the text back",
                vec![FunctionArg::new("text", "Text to echo")],
                Arc::new(Echo),
            )],
        )
    }

    fn bot_config() -> AgentConfig {
        AgentConfig {
            name: "Threads Bot".to_string(),
            goal: "List and manage threads".to_string(),
            description: "A bot that lists and manages threads".to_string(),
            llm_model: LlmModel::default(),
        }
    }

    /// Starts a fake GAME API scripted with `actions` and returns an initialized agent
    /// with two echo workers, `w1` (the starting one) and `w2`.
    async fn initialized_agent(actions: Vec<Value>) -> (GameAgent, FakeGame) {
        let game = FakeGame::default();
        game.actions.lock().unwrap().extend(actions);
        let router = Router::new()
            .route("/accesses/tokens", post(issue_token))
            .route("/v2/maps", post(create_map))
            .route("/v2/agents", post(create_agent))
            .route("/v2/agents/:id/actions", post(next_action))
            .with_state(game.clone());
        let base_url = spawn_upstream(router).await;

        let client = GameClient::new("key", &base_url, &base_url, LlmModel::default().as_str());
        let agent = GameAgent::new(client, bot_config(), vec![echo_worker("w1"), echo_worker("w2")]);
        agent.init().await.unwrap();
        (agent, game)
    }

    fn call_echo(fn_id: &str, text: &str) -> Value {
        json!({
            "action_type": "call_function",
            "action_args": {"fn_id": fn_id, "fn_name": "echo", "args": {"text": {"value": text}}},
            "agent_state": {"energy": 1}
        })
    }

    #[tokio::test]
    async fn test_call_function_result_reported_on_next_step() {
        let (agent, game) =
            initialized_agent(vec![call_echo("f1", "hello"), json!({"action_type": "wait"})]).await;

        let first = agent.step().await.unwrap();
        assert_eq!(first.action_type, ActionType::CallFunction);
        assert_eq!(first.worker_id, "w1");
        assert_eq!(first.function.as_deref(), Some("echo"));
        assert_eq!(first.result, Some(ExecutableGameFunctionResponse::done("hello")));

        let second = agent.step().await.unwrap();
        assert_eq!(second.action_type, ActionType::Wait);
        assert!(second.result.is_none());

        let requests = game.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["agent_id"], "agent-1");
        assert_eq!(requests[0]["map_id"], "map-1");
        assert_eq!(requests[0]["location"], "w1");
        assert_eq!(requests[0]["functions"][0]["fn_name"], "echo");
        assert!(requests[0]["current_action"].is_null());

        assert_eq!(
            requests[1]["current_action"],
            json!({"action_id": "f1", "action_status": "done", "feedback_message": "hello"})
        );
        assert_eq!(requests[1]["agent_state"], json!({"energy": 1}));
    }

    #[tokio::test]
    async fn test_failed_function_reported_as_failed() {
        let missing_text = json!({
            "action_type": "call_function",
            "action_args": {"fn_id": "f2", "fn_name": "echo", "args": {}}
        });
        let (agent, game) = initialized_agent(vec![missing_text]).await;

        let outcome = agent.step().await.unwrap();
        let result = outcome.result.unwrap();
        assert_eq!(result.status, ExecutableGameFunctionStatus::Failed);

        agent.step().await.unwrap();
        assert_eq!(game.requests()[1]["current_action"]["action_status"], "failed");
    }

    #[tokio::test]
    async fn test_go_to_switches_worker() {
        let go_to = json!({"action_type": "go_to", "action_args": {"location_id": "w2"}});
        let (agent, game) = initialized_agent(vec![go_to]).await;

        let outcome = agent.step().await.unwrap();
        assert_eq!(outcome.action_type, ActionType::GoTo);
        assert_eq!(outcome.worker_id, "w2");

        let next = agent.step().await.unwrap();
        assert_eq!(next.worker_id, "w2");

        let requests = game.requests();
        assert_eq!(requests[0]["location"], "w1");
        assert_eq!(requests[1]["location"], "w2");
        assert!(requests[1]["current_action"].is_null());
    }

    #[tokio::test]
    async fn test_go_to_unknown_worker_fails() {
        let go_to = json!({"action_type": "go_to", "action_args": {"location_id": "nowhere"}});
        let (agent, _game) = initialized_agent(vec![go_to]).await;

        match agent.step().await {
            Err(GameError::UnknownWorker(id)) => assert_eq!(id, "nowhere"),
            other => panic!("expected UnknownWorker, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_clears_last_result() {
        let (agent, game) = initialized_agent(vec![
            call_echo("f1", "hello"),
            json!({"action_type": "wait"}),
            json!({"action_type": "wait"}),
        ])
        .await;

        for _ in 0..3 {
            agent.step().await.unwrap();
        }

        let requests = game.requests();
        assert!(!requests[1]["current_action"].is_null());
        assert!(requests[2]["current_action"].is_null());
    }

    #[tokio::test]
    async fn test_step_before_init_fails() {
        let client = GameClient::new("key", "http://127.0.0.1:9", "http://127.0.0.1:9", "deepseek-r1");
        let agent = GameAgent::new(
            client,
            AgentConfig {
                name: "Threads Bot".to_string(),
                goal: "List and manage threads".to_string(),
                description: "A bot that lists and manages threads".to_string(),
                llm_model: LlmModel::default(),
            },
            vec![GameWorker::new("w", "Worker", "Does nothing", vec![])],
        );
        assert!(matches!(agent.step().await, Err(GameError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_init_without_workers_fails() {
        let client = GameClient::new("key", "http://127.0.0.1:9", "http://127.0.0.1:9", "deepseek-r1");
        let agent = GameAgent::new(
            client,
            AgentConfig {
                name: "Empty".to_string(),
                goal: "Nothing".to_string(),
                description: "No workers".to_string(),
                llm_model: LlmModel::DeepSeekV3,
            },
            vec![],
        );
        assert!(matches!(agent.init().await, Err(GameError::NoWorkers)));
    }

    #[test]
    fn test_model_names() {
        assert_eq!(LlmModel::default().as_str(), "deepseek-r1");
        assert_eq!(LlmModel::Llama3_3_70B.as_str(), "Llama-3.3-70B-Instruct");
    }
}
