//! Integration tests for the CRUD flow across record types
//!
//! These tests drive the handlers end-to-end over in-memory stores:
//! 1. Validation failures leave the store untouched
//! 2. Created records come back enriched from list
//! 3. Duplicate income titles conflict, self-renames do not
//! 4. Store faults map to a generic 500 response

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bson::oid::ObjectId;

use lifeboard_backend::api::contacts::{create_contact, list_contacts, CreateContactRequest};
use lifeboard_backend::api::income::{
    create_income, update_income, CreateIncomeRequest, UpdateIncomeRequest,
};
use lifeboard_backend::api::info::{
    create_info, delete_info, list_info, update_info, CreateInfoRequest, DeleteInfoRequest,
    UpdateInfoRequest,
};
use lifeboard_backend::config::ApiConfig;
use lifeboard_backend::error::AppError;
use lifeboard_backend::repo::{
    MemoryUserLookup, Record, RecordRepository, RepoError, UserLookup,
};
use lifeboard_backend::state::AppState;

fn state_with_user(owner: ObjectId, username: &str) -> AppState {
    AppState {
        users: Arc::new(MemoryUserLookup::with_users(HashMap::from([(
            owner,
            username.to_string(),
        )]))),
        ..AppState::in_memory()
    }
}

/// Store double whose every operation fails
struct FaultyRepository;

#[async_trait]
impl<T: Record> RecordRepository<T> for FaultyRepository {
    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        Err(RepoError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<T>, RepoError> {
        Err(RepoError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_field(&self, _field: &str, _value: &str) -> Result<Option<T>, RepoError> {
        Err(RepoError::Unavailable("connection refused".to_string()))
    }

    async fn create(&self, _record: T) -> Result<T, RepoError> {
        Err(RepoError::Unavailable("connection refused".to_string()))
    }

    async fn save(&self, _record: T) -> Result<T, RepoError> {
        Err(RepoError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _id: &str) -> Result<Option<T>, RepoError> {
        Err(RepoError::Unavailable("connection refused".to_string()))
    }
}

/// Test 1: the full info lifecycle, create through delete
#[tokio::test]
async fn test_info_end_to_end_flow() {
    let owner = ObjectId::new();
    let state = state_with_user(owner, "u1");

    // Create
    let (status, response) = create_info(
        State(state.clone()),
        Json(CreateInfoRequest {
            user: Some(owner.to_hex()),
            title: Some("T".to_string()),
            description: Some("D".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.message, "New info created");

    // List shows the record with the owner's username resolved
    let views = list_info(State(state.clone())).await.unwrap();
    assert_eq!(views.0.len(), 1);
    assert_eq!(views.0[0].title, "T");
    assert_eq!(views.0[0].username, "u1");
    let id = views.0[0].id.clone();

    // Update replaces the title
    let message = update_info(
        State(state.clone()),
        Json(UpdateInfoRequest {
            id: Some(id.clone()),
            title: Some("T2".to_string()),
            description: Some("D".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(message.0, "'T2' updated");

    // Delete reports the new title and the id
    let message = delete_info(
        State(state.clone()),
        Json(DeleteInfoRequest {
            id: Some(id.clone()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(message.0, format!("Info 'T2' with ID {} deleted", id));

    // The collection is empty again
    let result = list_info(State(state)).await;
    match result.unwrap_err() {
        AppError::NotFound(message) => assert_eq!(message, "No info found"),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

/// Test 2: failed validation performs no store write
#[tokio::test]
async fn test_create_failures_leave_store_untouched() {
    let state = AppState::in_memory();

    let missing_phone = CreateContactRequest {
        user: Some(ObjectId::new().to_hex()),
        name: Some("Ada".to_string()),
        phone: None,
        email: Some("ada@example.com".to_string()),
        description: Some("notes".to_string()),
    };
    assert!(create_contact(State(state.clone()), Json(missing_phone))
        .await
        .is_err());

    let zero_amount = CreateIncomeRequest {
        user: Some(ObjectId::new().to_hex()),
        amount: Some(0.0),
        title: Some("Rent".to_string()),
        description: Some("monthly".to_string()),
    };
    assert!(create_income(State(state.clone()), Json(zero_amount))
        .await
        .is_err());

    let blank_title = CreateInfoRequest {
        user: Some(ObjectId::new().to_hex()),
        title: Some("".to_string()),
        description: Some("body".to_string()),
    };
    assert!(create_info(State(state.clone()), Json(blank_title))
        .await
        .is_err());

    assert!(state.contacts.find_all().await.unwrap().is_empty());
    assert!(state.income.find_all().await.unwrap().is_empty());
    assert!(state.info.find_all().await.unwrap().is_empty());
}

/// Test 3: duplicate income titles conflict, a self-rename does not
#[tokio::test]
async fn test_income_title_uniqueness() {
    let owner = ObjectId::new();
    let state = AppState::in_memory();

    let request = CreateIncomeRequest {
        user: Some(owner.to_hex()),
        amount: Some(1200.0),
        title: Some("Rent".to_string()),
        description: Some("monthly".to_string()),
    };
    let (status, _) = create_income(State(state.clone()), Json(request)).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);

    // Second create with the same title is rejected
    let duplicate = CreateIncomeRequest {
        user: Some(owner.to_hex()),
        amount: Some(900.0),
        title: Some("Rent".to_string()),
        description: Some("sublet".to_string()),
    };
    let result = create_income(State(state.clone()), Json(duplicate)).await;
    match result.unwrap_err() {
        AppError::Conflict(message) => assert_eq!(message, "Duplicate income title"),
        other => panic!("Expected Conflict error, got: {:?}", other),
    }

    // Updating the record under its own title succeeds
    let id = state.income.find_all().await.unwrap()[0]._id.unwrap().to_hex();
    let rename = UpdateIncomeRequest {
        id: Some(id),
        user: Some(owner.to_hex()),
        amount: Some(1250.0),
        title: Some("Rent".to_string()),
        description: Some("raised".to_string()),
    };
    let message = update_income(State(state), Json(rename)).await.unwrap();
    assert_eq!(message.0, "'Rent' updated");
}

/// Test 4: unknown ids resolve to not-found for update and delete
#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let state = AppState::in_memory();
    let unassigned = ObjectId::new().to_hex();

    let update = UpdateInfoRequest {
        id: Some(unassigned.clone()),
        title: Some("T".to_string()),
        description: Some("D".to_string()),
    };
    match update_info(State(state.clone()), Json(update)).await.unwrap_err() {
        AppError::NotFound(message) => assert_eq!(message, "Info not found"),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }

    let delete = DeleteInfoRequest {
        id: Some("not-an-object-id".to_string()),
    };
    match delete_info(State(state), Json(delete)).await.unwrap_err() {
        AppError::NotFound(message) => assert_eq!(message, "Info not found"),
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

/// Test 5: list enrichment falls back to Unknown when the lookup faults
#[tokio::test]
async fn test_list_survives_user_lookup_fault() {
    struct FaultyLookup;

    #[async_trait]
    impl UserLookup for FaultyLookup {
        async fn find_by_id(
            &self,
            _id: &ObjectId,
        ) -> Result<Option<lifeboard_backend::db::schemas::UserDoc>, RepoError> {
            Err(RepoError::Unavailable("connection refused".to_string()))
        }

        async fn usernames_for(
            &self,
            _ids: &[ObjectId],
        ) -> Result<HashMap<ObjectId, String>, RepoError> {
            Err(RepoError::Unavailable("connection refused".to_string()))
        }
    }

    let state = AppState {
        users: Arc::new(FaultyLookup),
        ..AppState::in_memory()
    };

    create_info(
        State(state.clone()),
        Json(CreateInfoRequest {
            user: Some(ObjectId::new().to_hex()),
            title: Some("T".to_string()),
            description: Some("D".to_string()),
        }),
    )
    .await
    .unwrap();

    let views = list_info(State(state)).await.unwrap();
    assert_eq!(views.0[0].username, "Unknown");
}

/// Test 6: store faults surface as a generic 500 response
#[tokio::test]
async fn test_store_fault_maps_to_internal_error() {
    let state = AppState {
        info: Arc::new(FaultyRepository),
        ..AppState::in_memory()
    };

    let result = list_info(State(state)).await;
    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Store(_)));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Internal Server Error");
}

/// Test 7: validation errors render the original wire shape
#[tokio::test]
async fn test_validation_error_response_shape() {
    let state = AppState::in_memory();
    let err = create_info(
        State(state),
        Json(CreateInfoRequest {
            user: None,
            title: Some("T".to_string()),
            description: Some("D".to_string()),
        }),
    )
    .await
    .unwrap_err();

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "All fields are required");
}

/// Test 8: the not-found status knob accepts the legacy 400 mapping
#[test]
fn test_not_found_status_config() {
    let legacy = ApiConfig {
        not_found_status: 400,
    };
    assert_eq!(legacy.not_found_status_code(), StatusCode::BAD_REQUEST);

    let normalized = ApiConfig {
        not_found_status: 404,
    };
    assert_eq!(normalized.not_found_status_code(), StatusCode::NOT_FOUND);
}

/// Test 9: list contacts resolves usernames through the shared lookup
#[tokio::test]
async fn test_list_contacts_enrichment() {
    let owner = ObjectId::new();
    let state = state_with_user(owner, "marisol");

    create_contact(
        State(state.clone()),
        Json(CreateContactRequest {
            user: Some(owner.to_hex()),
            name: Some("Ada".to_string()),
            phone: Some("555-0101".to_string()),
            email: Some("ada@example.com".to_string()),
            description: Some("met at the conference".to_string()),
        }),
    )
    .await
    .unwrap();

    // A second contact owned by nobody we know falls back to Unknown
    create_contact(
        State(state.clone()),
        Json(CreateContactRequest {
            user: Some(ObjectId::new().to_hex()),
            name: Some("Grace".to_string()),
            phone: Some("555-0102".to_string()),
            email: Some("grace@example.com".to_string()),
            description: Some("old colleague".to_string()),
        }),
    )
    .await
    .unwrap();

    let views = list_contacts(State(state)).await.unwrap();
    assert_eq!(views.0.len(), 2);
    assert_eq!(views.0[0].username, "marisol");
    assert_eq!(views.0[1].username, "Unknown");
}
