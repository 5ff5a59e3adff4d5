//! Entity types - the record schema
//!
//! One struct per table, plus a `New*` builder for rows whose id the store
//! has not assigned yet. Field names double as the JSON wire names of the
//! API; where the stored column differs (`bezeichnung`/`name`) the mapping
//! lives in the storage layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contact's polymorphic reference target.
///
/// The stored discriminator tag selects which table the reference id points
/// into. Tags other than `"Person"` and `"Unternehmen"` are carried as
/// `Unknown` and never resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRef {
    /// Reference into the person table
    Person(i64),
    /// Reference into the unternehmen table
    Company(i64),
    /// Unrecognized tag - resolution is a no-op
    Unknown { tag: String, id: i64 },
}

impl ContactRef {
    /// Build a reference from the stored tag and id
    pub fn from_tag(tag: &str, id: i64) -> Self {
        match tag {
            "Person" => ContactRef::Person(id),
            "Unternehmen" => ContactRef::Company(id),
            other => ContactRef::Unknown {
                tag: other.to_string(),
                id,
            },
        }
    }

    /// The discriminator tag as stored
    pub fn tag(&self) -> &str {
        match self {
            ContactRef::Person(_) => "Person",
            ContactRef::Company(_) => "Unternehmen",
            ContactRef::Unknown { tag, .. } => tag,
        }
    }

    /// The referenced row id
    pub fn id(&self) -> i64 {
        match self {
            ContactRef::Person(id) | ContactRef::Company(id) => *id,
            ContactRef::Unknown { id, .. } => *id,
        }
    }
}

impl std::fmt::Display for ContactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tag(), self.id())
    }
}

/// A product row (read-only over the API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Absent when no price is recorded
    pub price: Option<f64>,
}

/// A new product, id assigned on insert
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Option<f64>,
}

/// An address row - leaf of every reference chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub plz: String,
    pub ortsname: String,
    pub strasse: String,
    pub hausnr: String,
}

#[derive(Debug, Clone)]
pub struct NewAddress {
    pub plz: String,
    pub ortsname: String,
    pub strasse: String,
    pub hausnr: String,
}

/// A person row, referencing an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub adresse_id: i64,
    pub geburtsdatum: Option<NaiveDate>,
    pub titel: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub adresse_id: i64,
    pub geburtsdatum: Option<NaiveDate>,
    pub titel: Option<String>,
}

/// A company row, referencing an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub adresse_id: i64,
    pub umsatz: f64,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub adresse_id: i64,
    pub umsatz: f64,
}

/// A contact row.
///
/// `referenz`/`ref_typ` form the polymorphic reference; use [`Contact::reference`]
/// to get the typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub email: String,
    pub telefonnummer: String,
    pub rolle: String,
    pub referenz: i64,
    pub ref_typ: String,
}

impl Contact {
    /// The typed reference, built from the stored tag and id
    pub fn reference(&self) -> ContactRef {
        ContactRef::from_tag(&self.ref_typ, self.referenz)
    }
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub email: String,
    pub telefonnummer: String,
    pub rolle: String,
    pub referenz: i64,
    pub ref_typ: String,
}

/// A protocol row. `termin_id` points at a meeting table this service
/// does not model; it is surfaced but never resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub id: i64,
    pub datum: Option<NaiveDate>,
    pub text: Option<String>,
    pub dauer: Option<i64>,
    pub tldr: Option<String>,
    pub termin_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewProtocol {
    pub datum: Option<NaiveDate>,
    pub text: Option<String>,
    pub dauer: Option<i64>,
    pub tldr: Option<String>,
    pub termin_id: Option<i64>,
}

/// A medium row - stored file metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    pub id: i64,
    pub dateityp: String,
    pub dateiname: String,
}

#[derive(Debug, Clone)]
pub struct NewMedium {
    pub dateityp: String,
    pub dateiname: String,
}

/// An attachment row, tying a protocol to a medium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub protokoll_id: i64,
    pub medium_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub protokoll_id: i64,
    pub medium_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_from_tag_person() {
        let r = ContactRef::from_tag("Person", 7);
        assert_eq!(r, ContactRef::Person(7));
        assert_eq!(r.tag(), "Person");
        assert_eq!(r.id(), 7);
    }

    #[test]
    fn test_ref_from_tag_company() {
        let r = ContactRef::from_tag("Unternehmen", 3);
        assert_eq!(r, ContactRef::Company(3));
        assert_eq!(r.tag(), "Unternehmen");
    }

    #[test]
    fn test_ref_from_tag_unknown_keeps_raw_tag() {
        let r = ContactRef::from_tag("Abteilung", 9);
        assert_eq!(
            r,
            ContactRef::Unknown {
                tag: "Abteilung".to_string(),
                id: 9
            }
        );
        assert_eq!(r.tag(), "Abteilung");
        assert_eq!(r.id(), 9);
    }

    #[test]
    fn test_ref_tags_are_case_sensitive() {
        // "person" is not a valid tag, only the exact stored spelling is
        assert!(matches!(
            ContactRef::from_tag("person", 1),
            ContactRef::Unknown { .. }
        ));
    }

    #[test]
    fn test_contact_reference_view() {
        let contact = Contact {
            id: 1,
            email: "a@b.com".to_string(),
            telefonnummer: "123".to_string(),
            rolle: "owner".to_string(),
            referenz: 5,
            ref_typ: "Person".to_string(),
        };
        assert_eq!(contact.reference(), ContactRef::Person(5));
    }
}
