//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - produkt(bezeichnung, preis)
//! - adresse(plz, ortsname, strasse, hausnr)
//! - person(name, adresse, geburtsdatum, titel)
//! - unternehmen(name, adresse, umsatz)
//! - kontakt(email, telefonnummer, rolle, referenz, ref_typ)
//! - protokoll(datum, text, dauer, tldr, termin)
//! - medium(dateityp, dateiname)
//! - anhang(protokoll, medium)

pub mod schema;
pub mod sqlite;

pub use sqlite::{RecordStore, StoreStats};
