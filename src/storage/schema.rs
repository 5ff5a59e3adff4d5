//! Database schema definitions

/// SQL to create the produkt table
pub const CREATE_PRODUKT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS produkt (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bezeichnung TEXT NOT NULL,
    preis REAL
)
"#;

/// SQL to create the adresse table
pub const CREATE_ADRESSE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS adresse (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plz TEXT NOT NULL,
    ortsname TEXT NOT NULL,
    strasse TEXT NOT NULL,
    hausnr TEXT NOT NULL
)
"#;

/// SQL to create the person table
pub const CREATE_PERSON_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS person (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    adresse INTEGER NOT NULL,
    geburtsdatum TEXT,
    titel TEXT
)
"#;

/// SQL to create the unternehmen table
pub const CREATE_UNTERNEHMEN_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS unternehmen (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    adresse INTEGER NOT NULL,
    umsatz REAL NOT NULL
)
"#;

/// SQL to create the kontakt table
///
/// `referenz`/`ref_typ` form the polymorphic reference into person or
/// unternehmen. No foreign key constraint - dangling references are
/// tolerated at read time.
pub const CREATE_KONTAKT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS kontakt (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    telefonnummer TEXT NOT NULL,
    rolle TEXT NOT NULL,
    referenz INTEGER NOT NULL,
    ref_typ TEXT NOT NULL
)
"#;

/// SQL to create the protokoll table
pub const CREATE_PROTOKOLL_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS protokoll (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    datum TEXT,
    text TEXT,
    dauer INTEGER,
    tldr TEXT,
    termin INTEGER
)
"#;

/// SQL to create the medium table
pub const CREATE_MEDIUM_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS medium (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    dateityp TEXT NOT NULL,
    dateiname TEXT NOT NULL
)
"#;

/// SQL to create the anhang table
pub const CREATE_ANHANG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS anhang (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    protokoll INTEGER NOT NULL,
    medium INTEGER NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_person_adresse ON person(adresse)",
    "CREATE INDEX IF NOT EXISTS idx_unternehmen_adresse ON unternehmen(adresse)",
    "CREATE INDEX IF NOT EXISTS idx_kontakt_referenz ON kontakt(referenz, ref_typ)",
    "CREATE INDEX IF NOT EXISTS idx_anhang_protokoll ON anhang(protokoll)",
    "CREATE INDEX IF NOT EXISTS idx_anhang_medium ON anhang(medium)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_PRODUKT_TABLE,
        CREATE_ADRESSE_TABLE,
        CREATE_PERSON_TABLE,
        CREATE_UNTERNEHMEN_TABLE,
        CREATE_KONTAKT_TABLE,
        CREATE_PROTOKOLL_TABLE,
        CREATE_MEDIUM_TABLE,
        CREATE_ANHANG_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
