//! Contact endpoints
//!
//! Reads expand the polymorphic reference via the resolver; creates
//! validate that every required field is present and writes echo back the
//! stored row.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::api::{AppState, ErrorResponse};
use crate::entity::{Contact, NewContact};
use crate::resolver::{ContactWithReference, ReferenceResolver};

/// Request body for create (all fields required) and update (any subset)
#[derive(Debug, Clone, Deserialize)]
pub struct ContactPayload {
    pub email: Option<String>,
    pub telefonnummer: Option<String>,
    pub rolle: Option<String>,
    pub referenz: Option<i64>,
    pub ref_typ: Option<String>,
}

impl ContactPayload {
    /// Into a full row for insertion; `None` when a required field is missing
    fn into_new(self) -> Option<NewContact> {
        Some(NewContact {
            email: self.email?,
            telefonnummer: self.telefonnummer?,
            rolle: self.rolle?,
            referenz: self.referenz?,
            ref_typ: self.ref_typ?,
        })
    }

    /// Overwrite exactly the fields present in the payload
    fn apply(self, contact: &mut Contact) {
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(telefonnummer) = self.telefonnummer {
            contact.telefonnummer = telefonnummer;
        }
        if let Some(rolle) = self.rolle {
            contact.rolle = rolle;
        }
        if let Some(referenz) = self.referenz {
            contact.referenz = referenz;
        }
        if let Some(ref_typ) = self.ref_typ {
            contact.ref_typ = ref_typ;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactWithReference>,
    pub count: usize,
}

/// GET /api/kontakt
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ContactListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let contacts = store.get_contacts().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    let resolver = ReferenceResolver::new(&store);
    let contacts: Vec<ContactWithReference> = contacts
        .into_iter()
        .map(|contact| resolver.expand_contact(contact))
        .collect();
    let count = contacts.len();

    Ok(Json(ContactListResponse { contacts, count }))
}

/// GET /api/kontakt/{id}
pub async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<i64>,
) -> Result<Json<ContactWithReference>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    match store.get_contact(contact_id) {
        Ok(Some(contact)) => {
            let resolver = ReferenceResolver::new(&store);
            Ok(Json(resolver.expand_contact(contact)))
        }
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Contact not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

/// POST /api/kontakt
pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContactPayload>,
) -> Result<(StatusCode, Json<Contact>), (StatusCode, Json<ErrorResponse>)> {
    let Some(new_contact) = payload.into_new() else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        ));
    };

    let mut store = state.store.lock().await;
    let contact = store.insert_contact(&new_contact).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// PUT /api/kontakt/{id}
pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<i64>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<Contact>, (StatusCode, Json<ErrorResponse>)> {
    let mut store = state.store.lock().await;
    let mut contact = match store.get_contact(contact_id) {
        Ok(Some(contact)) => contact,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Contact not found")),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ));
        }
    };

    payload.apply(&mut contact);
    store.update_contact(&contact).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    Ok(Json(contact))
}

/// DELETE /api/kontakt/{id}
pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let mut store = state.store.lock().await;
    let deleted = store.delete_contact(contact_id).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;

    if deleted {
        Ok(Json(
            serde_json::json!({"message": "Contact deleted successfully"}),
        ))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Contact not found")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::test_state;
    use crate::entity::{NewAddress, NewPerson};

    fn full_payload() -> ContactPayload {
        serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "telefonnummer": "123",
            "rolle": "owner",
            "referenz": 5,
            "ref_typ": "Person"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let state = test_state();

        let (status, Json(created)) = create_contact(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.email, "a@b.com");
        assert_eq!(created.referenz, 5);

        let Json(fetched) = get_contact(State(state), Path(created.id)).await.unwrap();
        assert_eq!(fetched.contact, created);

        // Person 5 does not exist, the dangling reference is tolerated
        let json = serde_json::to_value(&fetched).unwrap();
        assert!(json.get("referenz_data").is_none());
    }

    #[tokio::test]
    async fn test_create_with_missing_field() {
        let state = test_state();

        let payload: ContactPayload =
            serde_json::from_value(serde_json::json!({"email": "a@b.com"})).unwrap();
        let (status, Json(body)) = create_contact(State(state.clone()), Json(payload))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Missing required fields");

        // no row was created
        let Json(response) = list_contacts(State(state)).await.unwrap();
        assert_eq!(response.count, 0);
    }

    #[tokio::test]
    async fn test_partial_update_preserves_untouched_fields() {
        let state = test_state();
        let (_, Json(created)) = create_contact(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();

        let patch: ContactPayload =
            serde_json::from_value(serde_json::json!({"rolle": "admin"})).unwrap();
        let Json(updated) = update_contact(State(state.clone()), Path(created.id), Json(patch))
            .await
            .unwrap();

        assert_eq!(updated.rolle, "admin");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.telefonnummer, created.telefonnummer);
        assert_eq!(updated.referenz, created.referenz);
        assert_eq!(updated.ref_typ, created.ref_typ);

        let Json(fetched) = get_contact(State(state), Path(created.id)).await.unwrap();
        assert_eq!(fetched.contact, updated);
    }

    #[tokio::test]
    async fn test_update_absent_contact() {
        let state = test_state();
        let patch: ContactPayload =
            serde_json::from_value(serde_json::json!({"rolle": "admin"})).unwrap();
        let (status, _) = update_contact(State(state), Path(42), Json(patch))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_and_repeat_delete() {
        let state = test_state();
        let (_, Json(created)) = create_contact(State(state.clone()), Json(full_payload()))
            .await
            .unwrap();

        let Json(ack) = delete_contact(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(ack["message"], "Contact deleted successfully");

        let (status, _) = get_contact(State(state.clone()), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = delete_contact(State(state), Path(created.id))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_expands_resolvable_references() {
        let state = test_state();
        {
            let mut store = state.store.lock().await;
            let address = store
                .insert_address(&NewAddress {
                    plz: "04109".to_string(),
                    ortsname: "Leipzig".to_string(),
                    strasse: "Marktgasse".to_string(),
                    hausnr: "12a".to_string(),
                })
                .unwrap();
            store
                .insert_person(&NewPerson {
                    name: "Maria Beispiel".to_string(),
                    adresse_id: address.id,
                    geburtsdatum: None,
                    titel: None,
                })
                .unwrap();
        }

        let payload: ContactPayload = serde_json::from_value(serde_json::json!({
            "email": "m@b.com",
            "telefonnummer": "456",
            "rolle": "lead",
            "referenz": 1,
            "ref_typ": "Person"
        }))
        .unwrap();
        create_contact(State(state.clone()), Json(payload))
            .await
            .unwrap();

        let Json(response) = list_contacts(State(state)).await.unwrap();
        assert_eq!(response.count, 1);

        let json = serde_json::to_value(&response).unwrap();
        let contact = &json["contacts"][0];
        assert_eq!(contact["referenz_data"]["name"], "Maria Beispiel");
        assert_eq!(contact["referenz_data"]["adresse"]["ortsname"], "Leipzig");
    }
}
