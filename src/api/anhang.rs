//! Attachment endpoints
//!
//! Reads expand the protocol and medium references independently; each
//! block is present only when its row resolves.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::api::{AppState, ErrorResponse};
use crate::entity::{Attachment, NewAttachment};
use crate::resolver::{AttachmentWithReferences, ReferenceResolver};

/// Request body for create (all fields required) and update (any subset)
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentPayload {
    pub protokoll_id: Option<i64>,
    pub medium_id: Option<i64>,
}

impl AttachmentPayload {
    fn into_new(self) -> Option<NewAttachment> {
        Some(NewAttachment {
            protokoll_id: self.protokoll_id?,
            medium_id: self.medium_id?,
        })
    }

    fn apply(self, attachment: &mut Attachment) {
        if let Some(protokoll_id) = self.protokoll_id {
            attachment.protokoll_id = protokoll_id;
        }
        if let Some(medium_id) = self.medium_id {
            attachment.medium_id = medium_id;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachmentListResponse {
    pub attachments: Vec<AttachmentWithReferences>,
    pub count: usize,
}

/// GET /api/anhang
pub async fn list_attachments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AttachmentListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let attachments = store.get_attachments().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    let resolver = ReferenceResolver::new(&store);
    let attachments: Vec<AttachmentWithReferences> = attachments
        .into_iter()
        .map(|attachment| resolver.expand_attachment(attachment))
        .collect();
    let count = attachments.len();

    Ok(Json(AttachmentListResponse { attachments, count }))
}

/// GET /api/anhang/{id}
pub async fn get_attachment(
    State(state): State<Arc<AppState>>,
    Path(attachment_id): Path<i64>,
) -> Result<Json<AttachmentWithReferences>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    match store.get_attachment(attachment_id) {
        Ok(Some(attachment)) => {
            let resolver = ReferenceResolver::new(&store);
            Ok(Json(resolver.expand_attachment(attachment)))
        }
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Attachment not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// POST /api/anhang
pub async fn create_attachment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AttachmentPayload>,
) -> Result<(StatusCode, Json<Attachment>), (StatusCode, Json<ErrorResponse>)> {
    let Some(new_attachment) = payload.into_new() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        ));
    };

    let mut store = state.store.lock().await;
    let attachment = store.insert_attachment(&new_attachment).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    Ok((StatusCode::CREATED, Json(attachment)))
}

/// PUT /api/anhang/{id}
pub async fn update_attachment(
    State(state): State<Arc<AppState>>,
    Path(attachment_id): Path<i64>,
    Json(payload): Json<AttachmentPayload>,
) -> Result<Json<Attachment>, (StatusCode, Json<ErrorResponse>)> {
    let mut store = state.store.lock().await;
    let mut attachment = match store.get_attachment(attachment_id) {
        Ok(Some(attachment)) => attachment,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Attachment not found")),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ));
        }
    };

    payload.apply(&mut attachment);
    store.update_attachment(&attachment).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    Ok(Json(attachment))
}

/// DELETE /api/anhang/{id}
pub async fn delete_attachment(
    State(state): State<Arc<AppState>>,
    Path(attachment_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let mut store = state.store.lock().await;
    let deleted = store.delete_attachment(attachment_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    if deleted {
        Ok(Json(
            serde_json::json!({"message": "Attachment deleted successfully"}),
        ))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Attachment not found")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_state;
    use crate::entity::{NewMedium, NewProtocol};

    fn full_payload() -> AttachmentPayload {
        serde_json::from_value(serde_json::json!({"protokoll_id": 1, "medium_id": 1})).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_with_expansion() {
        let state = test_state();
        {
            let mut store = state.store.lock().await;
            store
                .insert_protocol(&NewProtocol {
                    datum: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
                    text: Some("Kickoff".to_string()),
                    dauer: Some(45),
                    tldr: None,
                    termin_id: Some(2),
                })
                .unwrap();
            store
                .insert_medium(&NewMedium {
                    dateityp: "pdf".to_string(),
                    dateiname: "kickoff.pdf".to_string(),
                })
                .unwrap();
        }

        let (status, Json(created)) = create_attachment(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_attachment(State(state), Path(created.id)).await.unwrap();
        let json = serde_json::to_value(&fetched).unwrap();
        assert_eq!(json["protokoll_id"], 1);
        assert_eq!(json["protokoll"]["datum"], "2024-03-01");
        assert_eq!(json["protokoll"]["termin_id"], 2);
        assert_eq!(json["medium"]["dateiname"], "kickoff.pdf");
    }

    #[tokio::test]
    async fn test_get_tolerates_dangling_references() {
        let state = test_state();
        let (_, Json(created)) = create_attachment(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();

        let Json(fetched) = get_attachment(State(state), Path(created.id)).await.unwrap();
        let json = serde_json::to_value(&fetched).unwrap();
        assert!(json.get("protokoll").is_none());
        assert!(json.get("medium").is_none());
        assert_eq!(json["protokoll_id"], 1);
    }

    #[tokio::test]
    async fn test_create_with_missing_field() {
        let state = test_state();
        let payload: AttachmentPayload =
            serde_json::from_value(serde_json::json!({"protokoll_id": 1})).unwrap();
        let (status, Json(body)) = create_attachment(State(state), Json(payload))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Missing required fields");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let state = test_state();
        let (_, Json(created)) = create_attachment(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();

        let patch: AttachmentPayload =
            serde_json::from_value(serde_json::json!({"medium_id": 9})).unwrap();
        let Json(updated) = update_attachment(State(state), Path(created.id), Json(patch))
            .await
            .unwrap();
        assert_eq!(updated.medium_id, 9);
        assert_eq!(updated.protokoll_id, created.protokoll_id);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let state = test_state();
        let (_, Json(created)) = create_attachment(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();

        let Json(ack) = delete_attachment(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(ack["message"], "Attachment deleted successfully");

        let (status, _) = delete_attachment(State(state), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_attachments() {
        let state = test_state();
        create_attachment(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();
        create_attachment(
            State(state.clone()),
            Json(
                serde_json::from_value(serde_json::json!({"protokoll_id": 2, "medium_id": 2}))
                    .unwrap(),
            ),
        )
        .await
        .unwrap();

        let Json(response) = list_attachments(State(state)).await.unwrap();
        assert_eq!(response.count, 2);
    }
}
