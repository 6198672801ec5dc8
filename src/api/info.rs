//! Info note API handlers
//!
//! CRUD over the info collection. Unlike contacts and income, an update does
//! not replace the note's owner.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{
    owner_usernames, parse_owner, require_id, require_str, username_for, MessageResponse,
};
use crate::db::schemas::InfoDoc;
use crate::error::AppError;
use crate::state::AppState;

/// Info note as returned to clients, with the owner's username attached
#[derive(Debug, Serialize)]
pub struct InfoView {
    /// Record id, hex encoded
    pub id: String,
    /// Owning user id, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Note title
    pub title: String,
    /// Note body
    pub description: String,
    /// When the record was created
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last written
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Owner display name, `"Unknown"` when unresolvable
    pub username: String,
}

impl InfoView {
    fn enriched(info: InfoDoc, username: String) -> Self {
        Self {
            id: info._id.map(|id| id.to_hex()).unwrap_or_default(),
            user: info.user.map(|id| id.to_hex()),
            title: info.title,
            description: info.description,
            created_at: info.stamps.created_at.map(|dt| dt.to_chrono()),
            updated_at: info.stamps.updated_at.map(|dt| dt.to_chrono()),
            username,
        }
    }
}

/// Create info request
#[derive(Deserialize)]
pub struct CreateInfoRequest {
    /// Owning user id
    pub user: Option<String>,
    /// Note title
    pub title: Option<String>,
    /// Note body
    pub description: Option<String>,
}

/// Update info request; the owner is left untouched
#[derive(Deserialize)]
pub struct UpdateInfoRequest {
    /// Target record id
    pub id: Option<String>,
    /// Note title
    pub title: Option<String>,
    /// Note body
    pub description: Option<String>,
}

/// Delete info request
#[derive(Deserialize)]
pub struct DeleteInfoRequest {
    /// Target record id
    pub id: Option<String>,
}

/// GET /info - List all info notes with owner usernames attached
pub async fn list_info(State(state): State<AppState>) -> Result<Json<Vec<InfoView>>, AppError> {
    let notes = state.info.find_all().await?;

    if notes.is_empty() {
        return Err(AppError::NotFound("No info found".to_string()));
    }

    let usernames = owner_usernames(state.users.as_ref(), notes.iter().map(|n| n.user)).await;

    let views = notes
        .into_iter()
        .map(|note| {
            let username = username_for(note.user, &usernames);
            InfoView::enriched(note, username)
        })
        .collect();

    Ok(Json(views))
}

/// POST /info - Create a new info note
pub async fn create_info(
    State(state): State<AppState>,
    Json(request): Json<CreateInfoRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let owner = parse_owner(&require_str(&request.user)?)?;
    let title = require_str(&request.title)?;
    let description = require_str(&request.description)?;

    let note = InfoDoc {
        user: Some(owner),
        title,
        description,
        ..Default::default()
    };

    state.info.create(note).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("New info created")),
    ))
}

/// PATCH /info - Replace the title and body of an existing info note
pub async fn update_info(
    State(state): State<AppState>,
    Json(request): Json<UpdateInfoRequest>,
) -> Result<Json<String>, AppError> {
    let id = require_str(&request.id)?;
    let title = require_str(&request.title)?;
    let description = require_str(&request.description)?;

    let mut note = state
        .info
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Info not found".to_string()))?;

    note.title = title;
    note.description = description;

    let updated = state.info.save(note).await?;

    Ok(Json(format!("'{}' updated", updated.title)))
}

/// DELETE /info - Delete an info note by id
pub async fn delete_info(
    State(state): State<AppState>,
    Json(request): Json<DeleteInfoRequest>,
) -> Result<Json<String>, AppError> {
    let id = require_id(&request.id, "Info ID required")?;

    let note = state
        .info
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Info not found".to_string()))?;

    state.info.delete(&id).await?;

    // Reply from the record fetched above; the delete result may not carry it
    Ok(Json(format!("Info '{}' with ID {} deleted", note.title, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UNKNOWN_USERNAME;
    use crate::repo::MemoryUserLookup;
    use crate::state::AppState;
    use bson::oid::ObjectId;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn create_request(owner: &ObjectId, title: &str) -> CreateInfoRequest {
        CreateInfoRequest {
            user: Some(owner.to_hex()),
            title: Some(title.to_string()),
            description: Some("wifi password is on the fridge".to_string()),
        }
    }

    #[tokio::test]
    async fn test_list_info_resolves_owner_username() {
        let owner = ObjectId::new();
        let state = AppState {
            users: Arc::new(MemoryUserLookup::with_users(HashMap::from([(
                owner,
                "dana".to_string(),
            )]))),
            ..AppState::in_memory()
        };

        create_info(State(state.clone()), Json(create_request(&owner, "Wifi")))
            .await
            .unwrap();

        let views = list_info(State(state)).await.unwrap();
        assert_eq!(views.0.len(), 1);
        assert_eq!(views.0[0].username, "dana");
    }

    #[tokio::test]
    async fn test_list_info_unresolvable_owner_is_unknown() {
        let state = AppState::in_memory();
        create_info(
            State(state.clone()),
            Json(create_request(&ObjectId::new(), "Wifi")),
        )
        .await
        .unwrap();

        let views = list_info(State(state)).await.unwrap();
        assert_eq!(views.0[0].username, UNKNOWN_USERNAME);
    }

    #[tokio::test]
    async fn test_update_info_leaves_owner_untouched() {
        let owner = ObjectId::new();
        let state = AppState::in_memory();
        create_info(State(state.clone()), Json(create_request(&owner, "Wifi")))
            .await
            .unwrap();
        let all = state.info.find_all().await.unwrap();
        let note = &all[0];

        let request = UpdateInfoRequest {
            id: Some(note._id.unwrap().to_hex()),
            title: Some("Wifi password".to_string()),
            description: Some("rotated last week".to_string()),
        };

        let result = update_info(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(result.0, "'Wifi password' updated");

        let remaining = state.info.find_all().await.unwrap();
        assert_eq!(remaining[0].user, Some(owner));
        assert_eq!(remaining[0].title, "Wifi password");
    }

    #[tokio::test]
    async fn test_update_info_missing_title() {
        let state = AppState::in_memory();
        let request = UpdateInfoRequest {
            id: Some(ObjectId::new().to_hex()),
            title: None,
            description: Some("body".to_string()),
        };

        let result = update_info(State(state), Json(request)).await;
        match result.unwrap_err() {
            AppError::Validation(message) => assert_eq!(message, "All fields are required"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }
}
