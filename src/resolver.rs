//! Reference resolution
//!
//! Expands foreign-key-bearing rows into nested response structures:
//! - Contact: polymorphic reference into person or unternehmen, selected by
//!   the stored tag, with the target's address resolved one level deeper
//! - Attachment: independent protocol and medium lookups
//!
//! Expansion is best-effort. A dangling reference, an unknown tag or a
//! store failure mid-expansion degrades the payload (the nested block is
//! omitted) and never fails the enclosing request. Each lookup is an
//! independent read; no transaction spans an expansion.

use serde::Serialize;

use crate::Result;
use crate::entity::{Address, Attachment, Company, Contact, ContactRef, Medium, Person, Protocol};
use crate::storage::RecordStore;

/// Expanded person target of a contact reference
#[derive(Debug, Serialize)]
pub struct PersonReference {
    #[serde(flatten)]
    pub person: Person,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<Address>,
}

/// Expanded company target of a contact reference
#[derive(Debug, Serialize)]
pub struct CompanyReference {
    #[serde(flatten)]
    pub company: Company,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<Address>,
}

/// The resolved target of a contact's polymorphic reference
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReferenceData {
    Person(PersonReference),
    Company(CompanyReference),
}

/// A contact with its reference expanded, when resolvable
#[derive(Debug, Serialize)]
pub struct ContactWithReference {
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenz_data: Option<ReferenceData>,
}

/// An attachment with its protocol and medium expanded, when resolvable
#[derive(Debug, Serialize)]
pub struct AttachmentWithReferences {
    #[serde(flatten)]
    pub attachment: Attachment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protokoll: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Medium>,
}

/// Resolver expanding stored references into nested structures
pub struct ReferenceResolver<'a> {
    store: &'a RecordStore,
}

impl<'a> ReferenceResolver<'a> {
    /// Create a new resolver over the given store
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Expand a contact's polymorphic reference
    pub fn expand_contact(&self, contact: Contact) -> ContactWithReference {
        let referenz_data = self.resolve_reference(&contact.reference());
        ContactWithReference {
            contact,
            referenz_data,
        }
    }

    /// Resolve a polymorphic reference to its target, plus the target's
    /// address one level deeper.
    ///
    /// Returns `None` for unknown tags, dangling ids and store failures
    /// (logged) alike - absence of a result is not an error condition.
    pub fn resolve_reference(&self, reference: &ContactRef) -> Option<ReferenceData> {
        match self.try_resolve_reference(reference) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("failed to resolve reference {}: {}", reference, e);
                None
            }
        }
    }

    fn try_resolve_reference(&self, reference: &ContactRef) -> Result<Option<ReferenceData>> {
        match reference {
            ContactRef::Person(id) => {
                let Some(person) = self.store.get_person(*id)? else {
                    return Ok(None);
                };
                let adresse = self.store.get_address(person.adresse_id)?;
                Ok(Some(ReferenceData::Person(PersonReference {
                    person,
                    adresse,
                })))
            }
            ContactRef::Company(id) => {
                let Some(company) = self.store.get_company(*id)? else {
                    return Ok(None);
                };
                let adresse = self.store.get_address(company.adresse_id)?;
                Ok(Some(ReferenceData::Company(CompanyReference {
                    company,
                    adresse,
                })))
            }
            ContactRef::Unknown { .. } => Ok(None),
        }
    }

    /// Expand an attachment's protocol and medium references independently
    pub fn expand_attachment(&self, attachment: Attachment) -> AttachmentWithReferences {
        let protokoll = match self.store.get_protocol(attachment.protokoll_id) {
            Ok(protokoll) => protokoll,
            Err(e) => {
                tracing::warn!(
                    "failed to resolve protocol {}: {}",
                    attachment.protokoll_id,
                    e
                );
                None
            }
        };
        let medium = match self.store.get_medium(attachment.medium_id) {
            Ok(medium) => medium,
            Err(e) => {
                tracing::warn!("failed to resolve medium {}: {}", attachment.medium_id, e);
                None
            }
        };
        AttachmentWithReferences {
            attachment,
            protokoll,
            medium,
        }
    }
}
