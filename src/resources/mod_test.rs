use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::*;
use crate::mock;
use crate::storage::MemoryStorage;
use crate::types::{Role, Session, User};

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer tok-fleet")
}

fn signed_in_store() -> SessionStore<MemoryStorage> {
    let store = SessionStore::new(MemoryStorage::new());
    store
        .set(&Session {
            token: "tok-fleet".into(),
            user: User {
                id: 1,
                name: "Jefa".into(),
                email: "jefa@example.test".into(),
                role: Role::Jefe,
                extra: serde_json::Map::from_iter([("organization_id".to_owned(), 1.into())]),
            },
        })
        .unwrap();
    store
}

fn vehicles_router() -> Router {
    Router::new()
        .route(
            "/api/vehiculos",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." })));
                }
                (
                    StatusCode::OK,
                    Json(json!([
                        { "id": 1, "matricula": "1234BCD", "marca": "Renault", "modelo": "Kangoo", "kilometros": 1200 },
                        { "id": 2, "matricula": "5678FGH", "marca": "Iveco", "modelo": "Daily" },
                    ])),
                )
            })
            .post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({})));
                }
                if body["matricula"] == "" {
                    return (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Json(json!({ "errors": { "matricula": ["La matrícula es obligatoria"] } })),
                    );
                }
                let mut created = body.clone();
                created["id"] = json!(3);
                (StatusCode::CREATED, Json(json!({ "data": created })))
            }),
        )
        .route(
            "/api/vehiculos/{id}",
            get(|Path(id): Path<i64>| async move {
                if id == 404 {
                    return (StatusCode::NOT_FOUND, Json(json!({ "message": "Vehículo no encontrado" })));
                }
                (StatusCode::OK, Json(json!({ "data": { "id": id, "matricula": "1234BCD" } })))
            })
            .put(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                let mut updated = body.clone();
                updated["id"] = json!(id);
                Json(updated)
            })
            .delete(|headers: HeaderMap| async move {
                if authorized(&headers) { StatusCode::NO_CONTENT } else { StatusCode::UNAUTHORIZED }
            }),
        )
}

async fn client() -> ResourceClient<Vehicle, MemoryStorage> {
    ResourceClient::new(mock::serve(vehicles_router()).await, signed_in_store()).unwrap()
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn list_reads_bare_array_and_keeps_extra_fields() {
    let vehicles = client().await.list().await.unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0].plate.as_deref(), Some("1234BCD"));
    assert_eq!(vehicles[0].extra.get("kilometros"), Some(&json!(1200)));
    assert_eq!(vehicles[1].brand.as_deref(), Some("Iveco"));
}

#[tokio::test]
async fn get_unwraps_data_envelope() {
    let vehicle = client().await.get(8).await.unwrap();
    assert_eq!(vehicle.id, 8);
}

#[tokio::test]
async fn get_missing_surfaces_backend_message() {
    let err = client().await.get(404).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Vehículo no encontrado");
}

#[tokio::test]
async fn create_returns_created_record() {
    let created = client()
        .await
        .create(&json!({ "matricula": "3456MNP", "marca": "Ford", "modelo": "Transit" }))
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    assert!(created.has_valid_plate());
}

#[tokio::test]
async fn create_validation_errors_are_normalized() {
    let err = client()
        .await
        .create(&json!({ "matricula": "" }))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "La matrícula es obligatoria");
}

#[tokio::test]
async fn update_and_delete_use_item_path() {
    let client = client().await;
    let updated = client
        .update(2, &json!({ "matricula": "5678FGH", "estado": "en taller" }))
        .await
        .unwrap();
    assert_eq!(updated.id, 2);
    assert_eq!(updated.status.as_deref(), Some("en taller"));

    client.delete(2).await.unwrap();
}

#[tokio::test]
async fn requests_without_session_fail_locally() {
    let config = mock::serve(vehicles_router()).await;
    let client: ResourceClient<Vehicle, _> = ResourceClient::new(config, SessionStore::new(MemoryStorage::new())).unwrap();
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
}

#[tokio::test]
async fn from_gateway_shares_session() {
    let config = mock::serve(vehicles_router()).await;
    let storage = signed_in_store().storage().clone();
    let gateway = AuthGateway::new(config, storage).unwrap();
    let client = ResourceClient::<Vehicle, _>::from_gateway(&gateway);
    assert_eq!(client.list().await.unwrap().len(), 2);

    gateway.store().clear();
    assert!(matches!(client.list().await.unwrap_err(), ApiError::NotAuthenticated));
}

// =============================================================================
// Models
// =============================================================================

#[test]
fn models_accept_english_aliases() {
    let task: Task = serde_json::from_value(json!({
        "id": 5,
        "title": "Revisar frenos",
        "status": "pendiente",
        "worker_id": 12,
    }))
    .unwrap();
    assert_eq!(task.title.as_deref(), Some("Revisar frenos"));
    assert_eq!(task.worker_id, Some(12));
    assert_eq!(task.search_fields(), vec!["Revisar frenos", "pendiente"]);
}

#[test]
fn location_requires_coordinates() {
    let ok = serde_json::from_value::<WorkerLocation>(json!({ "id": 1, "latitud": 40.4, "longitud": -3.7 }));
    assert!(ok.is_ok());
    let missing = serde_json::from_value::<WorkerLocation>(json!({ "id": 1, "latitud": 40.4 }));
    assert!(missing.is_err());
}

#[test]
fn notification_defaults_to_unread() {
    let n: Notification = serde_json::from_value(json!({ "id": 1, "titulo": "Nueva tarea" })).unwrap();
    assert!(!n.read);
    assert_eq!(Notification::PATH, "/notificaciones");
}

#[test]
fn unwrap_data_leaves_plain_values() {
    assert_eq!(unwrap_data(json!([1, 2])), json!([1, 2]));
    assert_eq!(unwrap_data(json!({ "data": [1] })), json!([1]));
    assert_eq!(unwrap_data(json!({ "id": 1 })), json!({ "id": 1 }));
}

// =============================================================================
// Client-side validation
// =============================================================================

#[tokio::test]
async fn invalid_plate_is_rejected_before_any_request() {
    let client: ResourceClient<Vehicle, _> = ResourceClient::new(mock::dead_config(), signed_in_store()).unwrap();
    let err = client
        .create(&json!({ "matricula": "1234ABC", "marca": "Seat" }))
        .await
        .unwrap_err();
    let ApiError::Validation(fields) = &err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(fields.iter().any(|(field, _)| field == "matricula"));
    assert_eq!(err.to_string(), models::INVALID_PLATE);

    let err = client.update(1, &json!({ "matricula": 1234 })).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[test]
fn plate_validation_accepts_valid_or_absent_plates() {
    assert!(Vehicle::validate(&json!({ "matricula": "1234 BCD" })).is_empty());
    assert!(Vehicle::validate(&json!({ "marca": "Seat" })).is_empty());
    assert!(Machine::validate(&json!({ "matricula": "E-1234-BCD" })).is_empty());
    assert!(Machine::validate(&json!({ "plate": null })).is_empty());
    assert!(!Machine::validate(&json!({ "plate": "XX" })).is_empty());
    assert!(Task::validate(&json!({ "matricula": "XX" })).is_empty());
}
