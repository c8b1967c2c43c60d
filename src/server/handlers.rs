#[cfg(test)]
#[path = "handlers_test.rs"]
mod tests;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::chat::{ChatError, ChatReply, ChatRequest};
use crate::models::{Conversation, ConversationPatch, ConversationSpec, Model};
use crate::server::{ApiError, AppState};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelUpdate {
    pub model: Option<String>,
}

pub async fn create_chat(
    State(state): State<AppState>,
    payload: Result<Json<ConversationSpec>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let Json(spec) = payload?;
    let conversation = state.store.create(spec).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn list_chats(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Conversation>>> {
    let Query(params) = params?;
    let conversations = match params.model.as_deref().map(str::trim) {
        Some(model) if !model.is_empty() => state.store.list_by_model(model).await,
        _ => state.store.list().await,
    };
    Ok(Json(conversations))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Conversation>> {
    state
        .store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::conversation_not_found(&id))
}

pub async fn update_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ConversationPatch>, JsonRejection>,
) -> ApiResult<Json<Conversation>> {
    let Json(patch) = payload?;
    apply_patch(&state, &id, patch).await
}

pub async fn update_chat_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ModelUpdate>, JsonRejection>,
) -> ApiResult<Json<Conversation>> {
    let Json(update) = payload?;
    let model = update
        .model
        .filter(|model| !model.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("`model` is required".to_string()))?;

    apply_patch(&state, &id, ConversationPatch::default().with_model(model)).await
}

pub async fn delete_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::conversation_not_found(&id))
    }
}

pub async fn clear_context(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Conversation>> {
    state
        .store
        .clear_context(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::conversation_not_found(&id))
}

pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    let Json(request) = payload?;
    let reply = state.chat.send(request).await?;
    Ok(Json(reply))
}

pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<Vec<Model>>> {
    let models = state
        .backend
        .list_models()
        .await
        .map_err(ChatError::from)?;
    Ok(Json(models))
}

async fn apply_patch(
    state: &AppState,
    id: &str,
    patch: ConversationPatch,
) -> ApiResult<Json<Conversation>> {
    state
        .store
        .update(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::conversation_not_found(id))
}
