use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    pub number_of_partitions: u32,
    pub number_of_replications: u16,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopic {
    pub name: Option<String>,
    #[serde(default = "default_partitions")]
    pub number_of_partitions: u32,
    #[serde(default = "default_replications")]
    pub number_of_replications: u16,
}

/// Query parameters accepted by the topic list.
#[derive(Deserialize)]
pub struct ListTopics {
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopic {
    pub number_of_partitions: Option<u32>,
    pub number_of_replications: Option<u16>,
}

/// Error body sent with every 4xx the server produces.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub stack: String,
}

pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn not_found(name: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NoSuchElementException",
            message: format!("topic {name} does not exist"),
        }
    }

    fn bad_request(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "IllegalArgumentException",
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.to_string(),
            message: self.message,
            stack: String::new(),
        };
        (self.status, Json(body)).into_response()
    }
}

fn default_partitions() -> u32 {
    1
}

fn default_replications() -> u16 {
    1
}

pub type Db = Arc<RwLock<BTreeMap<String, Topic>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route("/v0/topics", get(list_topics).post(create_topic))
        .route(
            "/v0/topics/{name}",
            get(get_topic)
                .put(update_topic)
                .patch(update_topic)
                .delete(delete_topic),
        )
        .route("/v0/maintenance", get(maintenance))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_topics(
    State(db): State<Db>,
    Query(params): Query<ListTopics>,
) -> Json<Vec<Topic>> {
    let topics = db.read().await;
    Json(
        topics
            .values()
            .filter(|t| params.name.as_ref().is_none_or(|name| &t.name == name))
            .cloned()
            .collect(),
    )
}

async fn create_topic(
    State(db): State<Db>,
    Json(input): Json<CreateTopic>,
) -> Result<(StatusCode, Json<Topic>), ApiError> {
    validate_partitions(input.number_of_partitions)?;
    let name = input
        .name
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let mut topics = db.write().await;
    if topics.contains_key(&name) {
        return Err(ApiError::bad_request(format!("topic {name} already exists")));
    }
    let topic = Topic {
        name: name.clone(),
        number_of_partitions: input.number_of_partitions,
        number_of_replications: input.number_of_replications,
    };
    topics.insert(name, topic.clone());
    tracing::info!(topic = %topic.name, "topic created");
    Ok((StatusCode::CREATED, Json(topic)))
}

async fn get_topic(State(db): State<Db>, Path(name): Path<String>) -> Result<Json<Topic>, ApiError> {
    let topics = db.read().await;
    topics
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(&name))
}

async fn update_topic(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<UpdateTopic>,
) -> Result<Json<Topic>, ApiError> {
    if let Some(partitions) = input.number_of_partitions {
        validate_partitions(partitions)?;
    }
    let mut topics = db.write().await;
    let topic = topics.get_mut(&name).ok_or_else(|| ApiError::not_found(&name))?;
    if let Some(partitions) = input.number_of_partitions {
        topic.number_of_partitions = partitions;
    }
    if let Some(replications) = input.number_of_replications {
        topic.number_of_replications = replications;
    }
    Ok(Json(topic.clone()))
}

async fn delete_topic(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut topics = db.write().await;
    topics
        .remove(&name)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::not_found(&name))
}

/// Always unavailable, with an error body that has no `message`.
async fn maintenance() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({})))
}

fn validate_partitions(partitions: u32) -> Result<(), ApiError> {
    if partitions == 0 {
        return Err(ApiError::bad_request(
            "numberOfPartitions must be bigger than 0".to_string(),
        ));
    }
    Ok(())
}
