use crate::schemas::{bad_request, db_error, not_found, ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use model::entities::note;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Note kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum NoteKind {
    Text,
    Table,
}

impl From<NoteKind> for note::NoteKind {
    fn from(value: NoteKind) -> Self {
        match value {
            NoteKind::Text => note::NoteKind::Text,
            NoteKind::Table => note::NoteKind::Table,
        }
    }
}

impl From<note::NoteKind> for NoteKind {
    fn from(value: note::NoteKind) -> Self {
        match value {
            note::NoteKind::Text => NoteKind::Text,
            note::NoteKind::Table => NoteKind::Table,
        }
    }
}

/// A tabular note's content has to be a JSON document.
fn validate_content(kind: NoteKind, content: &str) -> Result<(), ApiError> {
    if kind == NoteKind::Table && serde_json::from_str::<serde_json::Value>(content).is_err() {
        return Err(bad_request("A table note's content must be valid JSON"));
    }
    Ok(())
}

/// Request body for creating a note
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateNoteRequest {
    pub title: String,
    /// Free text, or a JSON document for table notes
    pub content: String,
    pub kind: NoteKind,
    pub color: Option<String>,
    pub label: Option<String>,
    pub pinned: Option<bool>,
}

/// Request body for updating a note
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<NoteKind>,
    pub color: Option<String>,
    pub label: Option<String>,
    pub pinned: Option<bool>,
}

/// Note response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub kind: NoteKind,
    pub color: Option<String>,
    pub label: Option<String>,
    pub pinned: bool,
}

impl From<note::Model> for NoteResponse {
    fn from(model: note::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            kind: model.kind.into(),
            color: model.color,
            label: model.label,
            pinned: model.pinned,
        }
    }
}

/// Create a new note
#[utoipa::path(
    post,
    path = "/api/v1/notes",
    tag = "notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = ApiResponse<NoteResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_note(
    State(state): State<AppState>,
    Json(request): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NoteResponse>>), ApiError> {
    if request.title.trim().is_empty() {
        return Err(bad_request("title must not be empty"));
    }
    validate_content(request.kind, &request.content)?;

    let now = Utc::now();
    let new_note = note::ActiveModel {
        title: Set(request.title.clone()),
        content: Set(request.content.clone()),
        kind: Set(request.kind.into()),
        color: Set(request.color.clone()),
        label: Set(request.label.clone()),
        pinned: Set(request.pinned.unwrap_or(false)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_note.insert(&state.db).await {
        Ok(note_model) => {
            info!("Note created with ID: {}, title: {}", note_model.id, note_model.title);
            let response = ApiResponse {
                data: NoteResponse::from(note_model),
                message: "Note created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(error) => {
            error!("Failed to create note '{}': {}", request.title, error);
            Err(db_error(error))
        }
    }
}

/// Get all notes, pinned first
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    tag = "notes",
    responses(
        (status = 200, description = "Notes retrieved successfully", body = ApiResponse<Vec<NoteResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_notes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<NoteResponse>>>, ApiError> {
    match note::Entity::find()
        .order_by_desc(note::Column::Pinned)
        .order_by_desc(note::Column::UpdatedAt)
        .all(&state.db)
        .await
    {
        Ok(notes) => {
            let response = ApiResponse {
                data: notes.into_iter().map(NoteResponse::from).collect(),
                message: "Notes retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to retrieve notes: {}", error);
            Err(db_error(error))
        }
    }
}

/// Get a specific note by ID
#[utoipa::path(
    get,
    path = "/api/v1/notes/{note_id}",
    tag = "notes",
    params(
        ("note_id" = i32, Path, description = "Note ID"),
    ),
    responses(
        (status = 200, description = "Note retrieved successfully", body = ApiResponse<NoteResponse>),
        (status = 404, description = "Note not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_note(
    Path(note_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<NoteResponse>>, ApiError> {
    match note::Entity::find_by_id(note_id).one(&state.db).await {
        Ok(Some(note_model)) => {
            let response = ApiResponse {
                data: NoteResponse::from(note_model),
                message: "Note retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Note with ID {} not found", note_id);
            Err(not_found(format!("Note with id {note_id} not found")))
        }
        Err(error) => {
            error!("Failed to retrieve note {}: {}", note_id, error);
            Err(db_error(error))
        }
    }
}

/// Update a note
#[utoipa::path(
    put,
    path = "/api/v1/notes/{note_id}",
    tag = "notes",
    params(
        ("note_id" = i32, Path, description = "Note ID"),
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = ApiResponse<NoteResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Note not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_note(
    Path(note_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<ApiResponse<NoteResponse>>, ApiError> {
    let existing = match note::Entity::find_by_id(note_id).one(&state.db).await {
        Ok(Some(note_model)) => note_model,
        Ok(None) => {
            warn!("Note with ID {} not found for update", note_id);
            return Err(not_found(format!("Note with id {note_id} not found")));
        }
        Err(error) => {
            error!("Failed to lookup note {}: {}", note_id, error);
            return Err(db_error(error));
        }
    };

    // Validate against the kind the note will have after the update.
    let next_kind = request.kind.unwrap_or(existing.kind.into());
    let next_content = request.content.as_deref().unwrap_or(&existing.content);
    validate_content(next_kind, next_content)?;

    let mut note_active: note::ActiveModel = existing.into();
    if let Some(title) = request.title {
        note_active.title = Set(title);
    }
    if let Some(content) = request.content {
        note_active.content = Set(content);
    }
    if let Some(kind) = request.kind {
        note_active.kind = Set(kind.into());
    }
    if let Some(color) = request.color {
        note_active.color = Set(Some(color));
    }
    if let Some(label) = request.label {
        note_active.label = Set(Some(label));
    }
    if let Some(pinned) = request.pinned {
        note_active.pinned = Set(pinned);
    }
    note_active.updated_at = Set(Utc::now());

    match note_active.update(&state.db).await {
        Ok(updated) => {
            info!("Note with ID {} updated successfully", note_id);
            let response = ApiResponse {
                data: NoteResponse::from(updated),
                message: "Note updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(error) => {
            error!("Failed to update note {}: {}", note_id, error);
            Err(db_error(error))
        }
    }
}

/// Delete a note
#[utoipa::path(
    delete,
    path = "/api/v1/notes/{note_id}",
    tag = "notes",
    params(
        ("note_id" = i32, Path, description = "Note ID"),
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Note not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_note(
    Path(note_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    match note::Entity::delete_by_id(note_id).exec(&state.db).await {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Note with ID {} deleted successfully", note_id);
                let response = ApiResponse {
                    data: format!("Note {note_id} deleted"),
                    message: "Note deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("Note with ID {} not found for deletion", note_id);
                Err(not_found(format!("Note with id {note_id} not found")))
            }
        }
        Err(error) => {
            error!("Failed to delete note {}: {}", note_id, error);
            Err(db_error(error))
        }
    }
}
