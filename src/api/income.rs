//! Income API handlers
//!
//! CRUD over the income collection. Titles are unique; the store's unique
//! index is the source of truth, and duplicate-key writes surface as 409.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{
    owner_usernames, parse_owner, require_amount, require_id, require_str, username_for,
    MessageResponse,
};
use crate::db::schemas::IncomeDoc;
use crate::error::AppError;
use crate::repo::RepoError;
use crate::state::AppState;

/// Income entry as returned to clients, with the owner's username attached
#[derive(Debug, Serialize)]
pub struct IncomeView {
    /// Record id, hex encoded
    pub id: String,
    /// Owning user id, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Amount of the entry
    pub amount: f64,
    /// Entry title
    pub title: String,
    /// Free-form notes
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

impl IncomeView {
    fn enriched(income: IncomeDoc, username: String) -> Self {
        Self {
            id: income._id.map(|id| id.to_hex()).unwrap_or_default(),
            user: income.user.map(|id| id.to_hex()),
            amount: income.amount,
            title: income.title,
            description: income.description,
            created_at: income.stamps.created_at.map(|dt| dt.to_chrono()),
            updated_at: income.stamps.updated_at.map(|dt| dt.to_chrono()),
            username,
        }
    }
}

/// Create income request
#[derive(Deserialize)]
pub struct CreateIncomeRequest {
    /// Owning user id
    pub user: Option<String>,
    /// Amount of the entry; zero reads as missing
    pub amount: Option<f64>,
    /// Entry title, unique across all entries
    pub title: Option<String>,
    /// Free-form notes
    pub description: Option<String>,
}

/// Update income request; the whole field set is replaced
#[derive(Deserialize)]
pub struct UpdateIncomeRequest {
    /// Target record id
    pub id: Option<String>,
    /// Owning user id
    pub user: Option<String>,
    /// Amount of the entry; zero reads as missing
    pub amount: Option<f64>,
    /// Entry title, unique across all entries
    pub title: Option<String>,
    /// Free-form notes
    pub description: Option<String>,
}

/// Delete income request
#[derive(Deserialize)]
pub struct DeleteIncomeRequest {
    /// Target record id
    pub id: Option<String>,
}

/// GET /income - List all income entries with owner usernames attached
pub async fn list_income(State(state): State<AppState>) -> Result<Json<Vec<IncomeView>>, AppError> {
    let entries = state.income.find_all().await?;

    if entries.is_empty() {
        return Err(AppError::NotFound("No income found".to_string()));
    }

    let usernames = owner_usernames(state.users.as_ref(), entries.iter().map(|e| e.user)).await;

    let views = entries
        .into_iter()
        .map(|entry| {
            let username = username_for(entry.user, &usernames);
            IncomeView::enriched(entry, username)
        })
        .collect();

    Ok(Json(views))
}

/// POST /income - Create a new income entry
pub async fn create_income(
    State(state): State<AppState>,
    Json(request): Json<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let owner = parse_owner(&require_str(&request.user)?)?;
    let amount = require_amount(request.amount)?;
    let title = require_str(&request.title)?;
    let description = require_str(&request.description)?;

    let entry = IncomeDoc {
        user: Some(owner),
        amount,
        title,
        description,
        ..Default::default()
    };

    match state.income.create(entry).await {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("New income created")),
        )),
        Err(RepoError::Duplicate(_)) => {
            Err(AppError::Conflict("Duplicate income title".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

/// PATCH /income - Replace every field of an existing income entry
///
/// Re-saving an entry under its own title is not a conflict.
pub async fn update_income(
    State(state): State<AppState>,
    Json(request): Json<UpdateIncomeRequest>,
) -> Result<Json<String>, AppError> {
    let id = require_str(&request.id)?;
    let owner = parse_owner(&require_str(&request.user)?)?;
    let amount = require_amount(request.amount)?;
    let title = require_str(&request.title)?;
    let description = require_str(&request.description)?;

    let mut entry = state
        .income
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Income not found".to_string()))?;

    entry.user = Some(owner);
    entry.amount = amount;
    entry.title = title;
    entry.description = description;

    let updated = match state.income.save(entry).await {
        Ok(updated) => updated,
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::Conflict("Duplicate income title".to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(format!("'{}' updated", updated.title)))
}

/// DELETE /income - Delete an income entry by id
pub async fn delete_income(
    State(state): State<AppState>,
    Json(request): Json<DeleteIncomeRequest>,
) -> Result<Json<String>, AppError> {
    let id = require_id(&request.id, "Income ID required")?;

    let entry = state
        .income
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Income not found".to_string()))?;

    state.income.delete(&id).await?;

    // Reply from the record fetched above; the delete result may not carry it
    Ok(Json(format!(
        "Income '{}' with ID {} deleted",
        entry.title, id
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use bson::oid::ObjectId;

    fn create_request(title: &str, amount: f64) -> CreateIncomeRequest {
        CreateIncomeRequest {
            user: Some(ObjectId::new().to_hex()),
            amount: Some(amount),
            title: Some(title.to_string()),
            description: Some("monthly".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_income_zero_amount_rejected() {
        let state = AppState::in_memory();
        let result =
            create_income(State(state.clone()), Json(create_request("Rent", 0.0))).await;
        match result.unwrap_err() {
            AppError::Validation(message) => assert_eq!(message, "All fields are required"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }

        assert!(state.income.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_income_duplicate_title_conflict() {
        let state = AppState::in_memory();
        let (status, _) = create_income(State(state.clone()), Json(create_request("Rent", 1200.0)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let result = create_income(State(state), Json(create_request("Rent", 900.0))).await;
        match result.unwrap_err() {
            AppError::Conflict(message) => assert_eq!(message, "Duplicate income title"),
            other => panic!("Expected Conflict error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_income_keeps_own_title() {
        let state = AppState::in_memory();
        create_income(State(state.clone()), Json(create_request("Rent", 1200.0)))
            .await
            .unwrap();
        let all = state.income.find_all().await.unwrap();
        let entry = &all[0];

        let request = UpdateIncomeRequest {
            id: Some(entry._id.unwrap().to_hex()),
            user: Some(ObjectId::new().to_hex()),
            amount: Some(1300.0),
            title: Some("Rent".to_string()),
            description: Some("raised this year".to_string()),
        };

        let result = update_income(State(state), Json(request)).await.unwrap();
        assert_eq!(result.0, "'Rent' updated");
    }

    #[tokio::test]
    async fn test_update_income_onto_other_title_conflict() {
        let state = AppState::in_memory();
        create_income(State(state.clone()), Json(create_request("Rent", 1200.0)))
            .await
            .unwrap();
        create_income(State(state.clone()), Json(create_request("Salary", 4000.0)))
            .await
            .unwrap();
        let salary = state.income.find_by_field("title", "Salary").await.unwrap().unwrap();

        let request = UpdateIncomeRequest {
            id: Some(salary._id.unwrap().to_hex()),
            user: Some(ObjectId::new().to_hex()),
            amount: Some(4000.0),
            title: Some("Rent".to_string()),
            description: Some("renamed".to_string()),
        };

        let result = update_income(State(state), Json(request)).await;
        match result.unwrap_err() {
            AppError::Conflict(message) => assert_eq!(message, "Duplicate income title"),
            other => panic!("Expected Conflict error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_income_not_found() {
        let state = AppState::in_memory();
        let request = DeleteIncomeRequest {
            id: Some(ObjectId::new().to_hex()),
        };

        let result = delete_income(State(state), Json(request)).await;
        match result.unwrap_err() {
            AppError::NotFound(message) => assert_eq!(message, "Income not found"),
            other => panic!("Expected NotFound error, got: {:?}", other),
        }
    }
}
