//! HTTP client for the GAME agent API.
//!
//! The API key is exchanged for a short-lived access token, which then
//! authenticates every agent call. All request and response bodies are wrapped in a
//! top-level `data` object.

use log::{debug, error, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;

use super::function::{ExecutableGameFunctionStatus, GameWorker};
use crate::twitter::sanitize_for_logging;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("GAME API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("request to GAME API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected GAME API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("agent has not been initialized")]
    NotInitialized,
    #[error("unknown worker '{0}'")]
    UnknownWorker(String),
    #[error("agent has no workers")]
    NoWorkers,
}

/// Next move chosen by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    CallFunction,
    ContinueFunction,
    Wait,
    GoTo,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionArgs {
    #[serde(default)]
    pub fn_id: Option<String>,
    #[serde(default)]
    pub fn_name: Option<String>,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    pub action_type: ActionType,
    #[serde(default)]
    pub action_args: ActionArgs,
    #[serde(default)]
    pub agent_state: Value,
}

/// Result of the previous function call, reported with the next action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub action_id: String,
    pub action_status: ExecutableGameFunctionStatus,
    pub feedback_message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

pub struct GameClient {
    http: Client,
    api_key: String,
    base_url: String,
    access_url: String,
    model_name: String,
    access_token: Mutex<Option<String>>,
}

impl GameClient {
    pub fn new(api_key: &str, base_url: &str, access_url: &str, model_name: &str) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_url: access_url.trim_end_matches('/').to_string(),
            model_name: model_name.to_string(),
            access_token: Mutex::new(None),
        }
    }

    /// Returns the cached access token, fetching a new one when none is held.
    async fn access_token(&self) -> Result<String, GameError> {
        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        info!("Requesting GAME access token");
        let response = self
            .http
            .post(format!("{}/accesses/tokens", self.access_url))
            .header("x-api-key", &self.api_key)
            .json(&json!({ "data": {} }))
            .send()
            .await?;
        let token: Envelope<AccessToken> = decode(response, "access_token").await?;

        *cached = Some(token.data.access_token.clone());
        Ok(token.data.access_token)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Value,
        operation_name: &str,
    ) -> Result<T, GameError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header("model_name", &self.model_name)
            .json(&json!({ "data": data }))
            .send()
            .await?;

        let result = decode::<Envelope<T>>(response, operation_name).await;
        if let Err(GameError::Api { status: 401, .. }) = &result {
            warn!("GAME access token rejected, it will be refreshed on the next call");
            *self.access_token.lock().await = None;
        }
        Ok(result?.data)
    }

    /// Registers the workers as locations on a map and returns the map id.
    pub async fn create_map(&self, workers: &[GameWorker]) -> Result<String, GameError> {
        let locations: Vec<Value> = workers
            .iter()
            .map(|w| json!({ "id": w.id, "name": w.name, "description": w.description }))
            .collect();
        let created: Created = self
            .post("/v2/maps", json!({ "locations": locations }), "create_map")
            .await?;
        Ok(created.id)
    }

    /// Creates the agent and returns its id.
    pub async fn create_agent(
        &self,
        name: &str,
        goal: &str,
        description: &str,
    ) -> Result<String, GameError> {
        let created: Created = self
            .post(
                "/v2/agents",
                json!({ "name": name, "goal": goal, "description": description }),
                "create_agent",
            )
            .await?;
        Ok(created.id)
    }

    /// Asks the planner for the agent's next action while located at `worker`.
    pub async fn get_action(
        &self,
        agent_id: &str,
        map_id: &str,
        worker: &GameWorker,
        last_result: Option<&ActionResult>,
        agent_state: &Value,
    ) -> Result<ActionResponse, GameError> {
        let functions: Vec<Value> = worker.functions.iter().map(|f| f.to_json()).collect();
        let payload = json!({
            "location": worker.id,
            "map_id": map_id,
            "environment": {},
            "functions": functions,
            "agent_state": agent_state,
            "current_action": last_result,
            "version": "v2",
        });
        debug!("Action request for agent {}: {}", agent_id, payload);

        self.post(
            &format!("/v2/agents/{}/actions", urlencoding::encode(agent_id)),
            payload,
            "get_action",
        )
        .await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<T, GameError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        debug!(
            "GAME operation '{}' succeeded: {} bytes received",
            operation_name,
            body.len()
        );
        return Ok(serde_json::from_str(&body)?);
    }

    error!("GAME operation '{}' failed - Status: {}", operation_name, status);
    Err(GameError::Api {
        status: status.as_u16(),
        message: sanitize_for_logging(&body, 200),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };

    use crate::tests::spawn_upstream;

    /// GAME API that rejects the first map request with a 401.
    #[derive(Clone, Default)]
    struct ExpiringTokens {
        issued: Arc<AtomicUsize>,
        rejected_once: Arc<AtomicBool>,
        api_keys: Arc<std::sync::Mutex<Vec<String>>>,
        bearers: Arc<std::sync::Mutex<Vec<String>>>,
    }

    fn header(headers: &HeaderMap, name: &str) -> String {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    async fn issue_token(State(game): State<ExpiringTokens>, headers: HeaderMap) -> Json<Value> {
        game.api_keys.lock().unwrap().push(header(&headers, "x-api-key"));
        let n = game.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Json(json!({ "data": { "accessToken": format!("token-{}", n) } }))
    }

    async fn create_map(State(game): State<ExpiringTokens>, headers: HeaderMap) -> Response {
        game.bearers.lock().unwrap().push(header(&headers, "authorization"));
        if !game.rejected_once.swap(true, Ordering::SeqCst) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "token expired" })))
                .into_response();
        }
        Json(json!({ "data": { "id": "map-1" } })).into_response()
    }

    #[tokio::test]
    async fn test_rejected_token_is_refreshed() {
        let game = ExpiringTokens::default();
        let router = Router::new()
            .route("/api/accesses/tokens", post(issue_token))
            .route("/v2/maps", post(create_map))
            .with_state(game.clone());
        let base_url = spawn_upstream(router).await;
        let client = GameClient::new(
            "game-key",
            &base_url,
            &format!("{}/api/", base_url),
            "deepseek-r1",
        );
        let workers = [GameWorker::new("w1", "Worker", "Does things", vec![])];

        match client.create_map(&workers).await {
            Err(GameError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("token expired"));
            }
            other => panic!("expected a 401, got {:?}", other),
        }

        assert_eq!(client.create_map(&workers).await.unwrap(), "map-1");
        assert_eq!(client.create_map(&workers).await.unwrap(), "map-1");

        assert_eq!(game.issued.load(Ordering::SeqCst), 2);
        assert_eq!(*game.api_keys.lock().unwrap(), vec!["game-key", "game-key"]);
        assert_eq!(
            *game.bearers.lock().unwrap(),
            vec!["Bearer token-1", "Bearer token-2", "Bearer token-2"]
        );
    }

    #[test]
    fn test_action_response_decoding() {
        let body = r#"{
            "action_type": "call_function",
            "action_args": {"fn_id": "abc", "fn_name": "post_tweet", "args": {"tweet": {"value": "gm"}}},
            "agent_state": {"energy": 3}
        }"#;
        let action: ActionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(action.action_type, ActionType::CallFunction);
        assert_eq!(action.action_args.fn_name.as_deref(), Some("post_tweet"));
        assert_eq!(action.agent_state["energy"], 3);
    }

    #[test]
    fn test_unknown_action_type() {
        let action: ActionResponse =
            serde_json::from_str(r#"{"action_type": "teleport"}"#).unwrap();
        assert_eq!(action.action_type, ActionType::Unknown);
        assert!(action.action_args.fn_name.is_none());
    }

    #[test]
    fn test_action_result_serialization() {
        let result = ActionResult {
            action_id: "abc".to_string(),
            action_status: ExecutableGameFunctionStatus::Done,
            feedback_message: "Tweet posted successfully".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action_status"], "done");
        assert_eq!(json["action_id"], "abc");
    }
}
