//! SQLite-backed record store

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use super::schema;
use crate::Result;
use crate::entity::{
    Address, Attachment, Company, Contact, Medium, NewAddress, NewAttachment, NewCompany,
    NewContact, NewMedium, NewPerson, NewProduct, NewProtocol, Person, Product, Protocol,
};

/// SQLite-backed store for the record tables.
///
/// Reads are single independent statements. Writes run inside a per-call
/// transaction - committed on success, rolled back when the guard drops on
/// an error path.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Connectivity check for the health endpoint
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    // ========== Product Operations ==========

    /// Get all products
    pub fn get_products(&self) -> Result<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, bezeichnung, preis FROM produkt ORDER BY id")?;

        let products = stmt
            .query_map([], row_to_product)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(products)
    }

    /// Get a product by id
    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        self.conn
            .query_row(
                "SELECT id, bezeichnung, preis FROM produkt WHERE id = ?1",
                [id],
                row_to_product,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a product, returning the stored row
    pub fn insert_product(&mut self, new: &NewProduct) -> Result<Product> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO produkt (bezeichnung, preis) VALUES (?1, ?2)",
            params![new.name, new.price],
        )?;
        let id = tx.last_insert_rowid();
        let product = tx.query_row(
            "SELECT id, bezeichnung, preis FROM produkt WHERE id = ?1",
            [id],
            row_to_product,
        )?;
        tx.commit()?;
        Ok(product)
    }

    // ========== Address Operations ==========

    /// Get an address by id
    pub fn get_address(&self, id: i64) -> Result<Option<Address>> {
        self.conn
            .query_row(
                "SELECT id, plz, ortsname, strasse, hausnr FROM adresse WHERE id = ?1",
                [id],
                row_to_address,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert an address, returning the stored row
    pub fn insert_address(&mut self, new: &NewAddress) -> Result<Address> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO adresse (plz, ortsname, strasse, hausnr) VALUES (?1, ?2, ?3, ?4)",
            params![new.plz, new.ortsname, new.strasse, new.hausnr],
        )?;
        let id = tx.last_insert_rowid();
        let address = tx.query_row(
            "SELECT id, plz, ortsname, strasse, hausnr FROM adresse WHERE id = ?1",
            [id],
            row_to_address,
        )?;
        tx.commit()?;
        Ok(address)
    }

    // ========== Person Operations ==========

    /// Get a person by id
    pub fn get_person(&self, id: i64) -> Result<Option<Person>> {
        self.conn
            .query_row(
                "SELECT id, name, adresse, geburtsdatum, titel FROM person WHERE id = ?1",
                [id],
                row_to_person,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a person, returning the stored row
    pub fn insert_person(&mut self, new: &NewPerson) -> Result<Person> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO person (name, adresse, geburtsdatum, titel) VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.adresse_id, new.geburtsdatum, new.titel],
        )?;
        let id = tx.last_insert_rowid();
        let person = tx.query_row(
            "SELECT id, name, adresse, geburtsdatum, titel FROM person WHERE id = ?1",
            [id],
            row_to_person,
        )?;
        tx.commit()?;
        Ok(person)
    }

    // ========== Company Operations ==========

    /// Get a company by id
    pub fn get_company(&self, id: i64) -> Result<Option<Company>> {
        self.conn
            .query_row(
                "SELECT id, name, adresse, umsatz FROM unternehmen WHERE id = ?1",
                [id],
                row_to_company,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a company, returning the stored row
    pub fn insert_company(&mut self, new: &NewCompany) -> Result<Company> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO unternehmen (name, adresse, umsatz) VALUES (?1, ?2, ?3)",
            params![new.name, new.adresse_id, new.umsatz],
        )?;
        let id = tx.last_insert_rowid();
        let company = tx.query_row(
            "SELECT id, name, adresse, umsatz FROM unternehmen WHERE id = ?1",
            [id],
            row_to_company,
        )?;
        tx.commit()?;
        Ok(company)
    }

    // ========== Contact Operations ==========

    /// Get all contacts
    pub fn get_contacts(&self) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, telefonnummer, rolle, referenz, ref_typ FROM kontakt ORDER BY id",
        )?;

        let contacts = stmt
            .query_map([], row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(contacts)
    }

    /// Get a contact by id
    pub fn get_contact(&self, id: i64) -> Result<Option<Contact>> {
        self.conn
            .query_row(
                "SELECT id, email, telefonnummer, rolle, referenz, ref_typ FROM kontakt WHERE id = ?1",
                [id],
                row_to_contact,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a contact, returning the stored row with its assigned id
    pub fn insert_contact(&mut self, new: &NewContact) -> Result<Contact> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO kontakt (email, telefonnummer, rolle, referenz, ref_typ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.email, new.telefonnummer, new.rolle, new.referenz, new.ref_typ],
        )?;
        let id = tx.last_insert_rowid();
        let contact = tx.query_row(
            "SELECT id, email, telefonnummer, rolle, referenz, ref_typ FROM kontakt WHERE id = ?1",
            [id],
            row_to_contact,
        )?;
        tx.commit()?;
        Ok(contact)
    }

    /// Overwrite a contact row with the given state
    pub fn update_contact(&mut self, contact: &Contact) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE kontakt SET email = ?1, telefonnummer = ?2, rolle = ?3, referenz = ?4, ref_typ = ?5 WHERE id = ?6",
            params![
                contact.email,
                contact.telefonnummer,
                contact.rolle,
                contact.referenz,
                contact.ref_typ,
                contact.id,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a contact. Returns false when no row matched.
    pub fn delete_contact(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let affected = tx.execute("DELETE FROM kontakt WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(affected > 0)
    }

    // ========== Protocol Operations ==========

    /// Get a protocol by id
    pub fn get_protocol(&self, id: i64) -> Result<Option<Protocol>> {
        self.conn
            .query_row(
                "SELECT id, datum, text, dauer, tldr, termin FROM protokoll WHERE id = ?1",
                [id],
                row_to_protocol,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a protocol, returning the stored row
    pub fn insert_protocol(&mut self, new: &NewProtocol) -> Result<Protocol> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO protokoll (datum, text, dauer, tldr, termin) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.datum, new.text, new.dauer, new.tldr, new.termin_id],
        )?;
        let id = tx.last_insert_rowid();
        let protocol = tx.query_row(
            "SELECT id, datum, text, dauer, tldr, termin FROM protokoll WHERE id = ?1",
            [id],
            row_to_protocol,
        )?;
        tx.commit()?;
        Ok(protocol)
    }

    // ========== Medium Operations ==========

    /// Get a medium by id
    pub fn get_medium(&self, id: i64) -> Result<Option<Medium>> {
        self.conn
            .query_row(
                "SELECT id, dateityp, dateiname FROM medium WHERE id = ?1",
                [id],
                row_to_medium,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a medium, returning the stored row
    pub fn insert_medium(&mut self, new: &NewMedium) -> Result<Medium> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO medium (dateityp, dateiname) VALUES (?1, ?2)",
            params![new.dateityp, new.dateiname],
        )?;
        let id = tx.last_insert_rowid();
        let medium = tx.query_row(
            "SELECT id, dateityp, dateiname FROM medium WHERE id = ?1",
            [id],
            row_to_medium,
        )?;
        tx.commit()?;
        Ok(medium)
    }

    // ========== Attachment Operations ==========

    /// Get all attachments
    pub fn get_attachments(&self) -> Result<Vec<Attachment>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, protokoll, medium FROM anhang ORDER BY id")?;

        let attachments = stmt
            .query_map([], row_to_attachment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(attachments)
    }

    /// Get an attachment by id
    pub fn get_attachment(&self, id: i64) -> Result<Option<Attachment>> {
        self.conn
            .query_row(
                "SELECT id, protokoll, medium FROM anhang WHERE id = ?1",
                [id],
                row_to_attachment,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert an attachment, returning the stored row with its assigned id
    pub fn insert_attachment(&mut self, new: &NewAttachment) -> Result<Attachment> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO anhang (protokoll, medium) VALUES (?1, ?2)",
            params![new.protokoll_id, new.medium_id],
        )?;
        let id = tx.last_insert_rowid();
        let attachment = tx.query_row(
            "SELECT id, protokoll, medium FROM anhang WHERE id = ?1",
            [id],
            row_to_attachment,
        )?;
        tx.commit()?;
        Ok(attachment)
    }

    /// Overwrite an attachment row with the given state
    pub fn update_attachment(&mut self, attachment: &Attachment) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE anhang SET protokoll = ?1, medium = ?2 WHERE id = ?3",
            params![attachment.protokoll_id, attachment.medium_id, attachment.id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete an attachment. Returns false when no row matched.
    pub fn delete_attachment(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let affected = tx.execute("DELETE FROM anhang WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(affected > 0)
    }

    // ========== Statistics ==========

    /// Get row counts per table
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            products: self.count_rows("produkt")?,
            addresses: self.count_rows("adresse")?,
            persons: self.count_rows("person")?,
            companies: self.count_rows("unternehmen")?,
            contacts: self.count_rows("kontakt")?,
            protocols: self.count_rows("protokoll")?,
            media: self.count_rows("medium")?,
            attachments: self.count_rows("anhang")?,
        })
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }
}

// ========== Row Mappers ==========

fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
    })
}

fn row_to_address(row: &rusqlite::Row) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get(0)?,
        plz: row.get(1)?,
        ortsname: row.get(2)?,
        strasse: row.get(3)?,
        hausnr: row.get(4)?,
    })
}

fn row_to_person(row: &rusqlite::Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        adresse_id: row.get(2)?,
        geburtsdatum: row.get(3)?,
        titel: row.get(4)?,
    })
}

fn row_to_company(row: &rusqlite::Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        adresse_id: row.get(2)?,
        umsatz: row.get(3)?,
    })
}

fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        email: row.get(1)?,
        telefonnummer: row.get(2)?,
        rolle: row.get(3)?,
        referenz: row.get(4)?,
        ref_typ: row.get(5)?,
    })
}

fn row_to_protocol(row: &rusqlite::Row) -> rusqlite::Result<Protocol> {
    Ok(Protocol {
        id: row.get(0)?,
        datum: row.get(1)?,
        text: row.get(2)?,
        dauer: row.get(3)?,
        tldr: row.get(4)?,
        termin_id: row.get(5)?,
    })
}

fn row_to_medium(row: &rusqlite::Row) -> rusqlite::Result<Medium> {
    Ok(Medium {
        id: row.get(0)?,
        dateityp: row.get(1)?,
        dateiname: row.get(2)?,
    })
}

fn row_to_attachment(row: &rusqlite::Row) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        protokoll_id: row.get(1)?,
        medium_id: row.get(2)?,
    })
}

/// Record store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub products: usize,
    pub addresses: usize,
    pub persons: usize,
    pub companies: usize,
    pub contacts: usize,
    pub protocols: usize,
    pub media: usize,
    pub attachments: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Record store statistics:")?;
        writeln!(f, "  Products: {}", self.products)?;
        writeln!(f, "  Addresses: {}", self.addresses)?;
        writeln!(f, "  Persons: {}", self.persons)?;
        writeln!(f, "  Companies: {}", self.companies)?;
        writeln!(f, "  Contacts: {}", self.contacts)?;
        writeln!(f, "  Protocols: {}", self.protocols)?;
        writeln!(f, "  Media: {}", self.media)?;
        writeln!(f, "  Attachments: {}", self.attachments)
    }
}
