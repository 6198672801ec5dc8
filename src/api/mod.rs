//! API module
//!
//! Contains HTTP request handlers for the contact, income, and info
//! endpoints, plus the validation and enrichment helpers they share.

pub mod contacts;
pub mod income;
pub mod info;

use std::collections::{HashMap, HashSet};

use bson::oid::ObjectId;
use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::repo::UserLookup;

/// Username attached to records whose owner is absent or unresolvable
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Message response body used by create endpoints
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

impl MessageResponse {
    /// Build a response from any message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Extract a required string field, rejecting absent and blank values.
pub(crate) fn require_str(value: &Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(AppError::Validation("All fields are required".to_string())),
    }
}

/// Extract a required amount. Zero is indistinguishable from "missing" on
/// the wire, so both are rejected.
pub(crate) fn require_amount(value: Option<f64>) -> Result<f64, AppError> {
    match value {
        Some(amount) if amount != 0.0 => Ok(amount),
        _ => Err(AppError::Validation("All fields are required".to_string())),
    }
}

/// Extract a required record id, with an endpoint-specific message.
pub(crate) fn require_id(value: &Option<String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(id) if !id.trim().is_empty() => Ok(id.clone()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Parse an owner reference supplied by the client.
pub(crate) fn parse_owner(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::Validation("Invalid user ID".to_string()))
}

/// Resolve display names for the distinct owners of a record set in one
/// batch query. A lookup fault degrades to an empty map so enrichment falls
/// back to [`UNKNOWN_USERNAME`] instead of failing the request.
pub(crate) async fn owner_usernames(
    users: &dyn UserLookup,
    owners: impl Iterator<Item = Option<ObjectId>>,
) -> HashMap<ObjectId, String> {
    let distinct: HashSet<ObjectId> = owners.flatten().collect();
    let distinct: Vec<ObjectId> = distinct.into_iter().collect();

    match users.usernames_for(&distinct).await {
        Ok(usernames) => usernames,
        Err(err) => {
            warn!(error = %err, "user lookup failed, falling back to Unknown");
            HashMap::new()
        }
    }
}

/// The display name for one record's owner.
pub(crate) fn username_for(
    owner: Option<ObjectId>,
    usernames: &HashMap<ObjectId, String>,
) -> String {
    owner
        .and_then(|id| usernames.get(&id).cloned())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string())
}
