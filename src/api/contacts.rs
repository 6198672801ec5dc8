//! Contact API handlers
//!
//! CRUD over the contacts collection. Reads enrich each record with the
//! owner's display name.

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{
    owner_usernames, parse_owner, require_id, require_str, username_for, MessageResponse,
};
use crate::db::schemas::ContactDoc;
use crate::error::AppError;
use crate::state::AppState;

/// Contact as returned to clients, with the owner's username attached
#[derive(Debug, Serialize)]
pub struct ContactView {
    /// Record id, hex encoded
    pub id: String,
    /// Owning user id, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Contact display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Email address
    pub email: String,
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

impl ContactView {
    fn enriched(contact: ContactDoc, username: String) -> Self {
        Self {
            id: contact._id.map(|id| id.to_hex()).unwrap_or_default(),
            user: contact.user.map(|id| id.to_hex()),
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            description: contact.description,
            created_at: contact.stamps.created_at.map(|dt| dt.to_chrono()),
            updated_at: contact.stamps.updated_at.map(|dt| dt.to_chrono()),
            username,
        }
    }
}

/// Create contact request
#[derive(Deserialize)]
pub struct CreateContactRequest {
    /// Owning user id
    pub user: Option<String>,
    /// Contact display name
    pub name: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Free-form notes
    pub description: Option<String>,
}

/// Update contact request; the whole field set is replaced
#[derive(Deserialize)]
pub struct UpdateContactRequest {
    /// Target record id
    pub id: Option<String>,
    /// Owning user id
    pub user: Option<String>,
    /// Contact display name
    pub name: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Free-form notes
    pub description: Option<String>,
}

/// Delete contact request
#[derive(Deserialize)]
pub struct DeleteContactRequest {
    /// Target record id
    pub id: Option<String>,
}

/// GET /contact - List all contacts with owner usernames attached
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactView>>, AppError> {
    let contacts = state.contacts.find_all().await?;

    if contacts.is_empty() {
        return Err(AppError::NotFound("No contacts found".to_string()));
    }

    let usernames = owner_usernames(state.users.as_ref(), contacts.iter().map(|c| c.user)).await;

    let views = contacts
        .into_iter()
        .map(|contact| {
            let username = username_for(contact.user, &usernames);
            ContactView::enriched(contact, username)
        })
        .collect();

    Ok(Json(views))
}

/// POST /contact - Create a new contact
pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let owner = parse_owner(&require_str(&request.user)?)?;
    let name = require_str(&request.name)?;
    let phone = require_str(&request.phone)?;
    let email = require_str(&request.email)?;
    let description = require_str(&request.description)?;

    let contact = ContactDoc {
        user: Some(owner),
        name,
        phone,
        email,
        description,
        ..Default::default()
    };

    state.contacts.create(contact).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("New contact created")),
    ))
}

/// PATCH /contact - Replace every field of an existing contact
pub async fn update_contact(
    State(state): State<AppState>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<String>, AppError> {
    let id = require_str(&request.id)?;
    let owner = parse_owner(&require_str(&request.user)?)?;
    let name = require_str(&request.name)?;
    let phone = require_str(&request.phone)?;
    let email = require_str(&request.email)?;
    let description = require_str(&request.description)?;

    let mut contact = state
        .contacts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

    contact.user = Some(owner);
    contact.name = name;
    contact.phone = phone;
    contact.email = email;
    contact.description = description;

    let updated = state.contacts.save(contact).await?;

    Ok(Json(format!("'{}' updated", updated.name)))
}

/// DELETE /contact - Delete a contact by id
pub async fn delete_contact(
    State(state): State<AppState>,
    Json(request): Json<DeleteContactRequest>,
) -> Result<Json<String>, AppError> {
    let id = require_id(&request.id, "Contact ID required")?;

    let contact = state
        .contacts
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

    state.contacts.delete(&id).await?;

    // Reply from the record fetched above; the delete result may not carry it
    Ok(Json(format!(
        "Contact '{}' with ID {} deleted",
        contact.name, id
    )))
}
