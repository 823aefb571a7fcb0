// 🗄️ Catalog Store - SQLite persistence for curated entries
//
// Entries are insert-once: a second import of the same raw listing (same
// fingerprint) is skipped, never merged. Every insert and delete is recorded
// in the `events` table.

use crate::entities::{BadgeTag, CatalogEntry, CategoryTag};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub fn open_database<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let conn = Connection::open(path.as_ref())
        .with_context(|| format!("Failed to open catalog database: {:?}", path.as_ref()))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS catalog_entries (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT UNIQUE NOT NULL,
            fingerprint TEXT UNIQUE NOT NULL,
            raw_title TEXT NOT NULL,
            curated_name TEXT NOT NULL,
            category TEXT NOT NULL,
            cost_in_source_currency REAL NOT NULL,
            retail_price INTEGER NOT NULL,
            was_price INTEGER NOT NULL,
            margin_percent INTEGER NOT NULL,
            profit_in_dest_currency INTEGER NOT NULL,
            images TEXT NOT NULL,
            colors_text TEXT NOT NULL,
            sizes_text TEXT NOT NULL,
            badge TEXT NOT NULL,
            quality_score INTEGER NOT NULL DEFAULT 0,
            description TEXT NOT NULL,
            source_url TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entry_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_category ON catalog_entries(category)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entry ON events(entry_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// CATALOG ENTRIES
// ============================================================================

/// Returns false when an entry with the same fingerprint already exists
pub fn insert_entry(conn: &Connection, entry: &CatalogEntry, actor: &str) -> Result<bool> {
    let images_json = serde_json::to_string(&entry.images)?;
    let fingerprint = entry.fingerprint();

    let result = conn.execute(
        "INSERT INTO catalog_entries (
            id, fingerprint, raw_title, curated_name, category, cost_in_source_currency,
            retail_price, was_price, margin_percent, profit_in_dest_currency,
            images, colors_text, sizes_text, badge, quality_score, description, source_url, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            entry.id,
            fingerprint,
            entry.raw_title,
            entry.curated_name,
            entry.category.as_str(),
            entry.cost_in_source_currency,
            entry.retail_price,
            entry.was_price,
            entry.margin_percent,
            entry.profit_in_dest_currency,
            images_json,
            entry.colors_text,
            entry.sizes_text,
            entry.badge.as_str(),
            entry.quality_score,
            entry.description,
            entry.source_url,
            entry.created_at.to_rfc3339(),
        ],
    );

    match result {
        Ok(_) => {
            let event = Event::new(
                "entry_added",
                &entry.id,
                serde_json::json!({
                    "curated_name": entry.curated_name,
                    "category": entry.category.as_str(),
                    "retail_price": entry.retail_price,
                }),
                actor,
            );
            insert_event(conn, &event)?;
            debug!(id = %entry.id, name = %entry.curated_name, "Entry stored");
            Ok(true)
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            warn!(title = %entry.raw_title, "Duplicate listing skipped");
            Ok(false)
        }
        Err(e) => Err(e).context("Failed to insert catalog entry"),
    }
}

/// Returns how many of `entries` were new
pub fn insert_entries(conn: &Connection, entries: &[CatalogEntry], actor: &str) -> Result<usize> {
    let mut inserted = 0;
    for entry in entries {
        if insert_entry(conn, entry, actor)? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

pub fn fingerprint_exists(conn: &Connection, fingerprint: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM catalog_entries WHERE fingerprint = ?1",
            params![fingerprint],
            |row| row.get(0),
        )
        .optional()?;

    Ok(found.is_some())
}

/// All entries in creation order
pub fn get_all_entries(conn: &Connection) -> Result<Vec<CatalogEntry>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY row_id ASC", SELECT_ENTRY))?;

    let entries = stmt
        .query_map([], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

pub fn get_entry(conn: &Connection, id: &str) -> Result<Option<CatalogEntry>> {
    let entry = conn
        .query_row(&format!("{} WHERE id = ?1", SELECT_ENTRY), params![id], entry_from_row)
        .optional()?;

    Ok(entry)
}

/// Returns false if no entry had this id
pub fn delete_entry(conn: &Connection, id: &str, actor: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM catalog_entries WHERE id = ?1", params![id])?;

    if deleted == 0 {
        return Ok(false);
    }

    insert_event(conn, &Event::new("entry_deleted", id, serde_json::json!({}), actor))?;
    Ok(true)
}

pub fn verify_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM catalog_entries", [], |row| row.get(0))?;

    Ok(count)
}

const SELECT_ENTRY: &str = "SELECT id, raw_title, curated_name, category, cost_in_source_currency,
        retail_price, was_price, margin_percent, profit_in_dest_currency,
        images, colors_text, sizes_text, badge, quality_score, description, source_url, created_at
 FROM catalog_entries";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
    let category: String = row.get(3)?;
    let images_json: String = row.get(9)?;
    let badge: String = row.get(12)?;
    let created_at: String = row.get(16)?;

    Ok(CatalogEntry {
        id: row.get(0)?,
        raw_title: row.get(1)?,
        curated_name: row.get(2)?,
        category: category
            .parse::<CategoryTag>()
            .map_err(|e| conversion_error(3, e.into()))?,
        cost_in_source_currency: row.get(4)?,
        retail_price: row.get(5)?,
        was_price: row.get(6)?,
        margin_percent: row.get(7)?,
        profit_in_dest_currency: row.get(8)?,
        images: serde_json::from_str(&images_json).map_err(|e| conversion_error(9, Box::new(e)))?,
        colors_text: row.get(10)?,
        sizes_text: row.get(11)?,
        badge: badge
            .parse::<BadgeTag>()
            .map_err(|e| conversion_error(12, e.into()))?,
        quality_score: row.get(13)?,
        description: row.get(14)?,
        source_url: row.get(15)?,
        created_at: parse_timestamp(&created_at).map_err(|e| conversion_error(16, Box::new(e)))?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

fn conversion_error(
    column: usize,
    err: Box<dyn std::error::Error + Send + Sync + 'static>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err)
}

// ============================================================================
// EVENTS (audit trail)
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entry_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(event_type: &str, entry_id: &str, data: serde_json::Value, actor: &str) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entry_id: entry_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (event_id, timestamp, event_type, entry_id, data, actor)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entry_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Events for one entry, oldest first
pub fn get_events_for_entry(conn: &Connection, entry_id: &str) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entry_id, data, actor
         FROM events
         WHERE entry_id = ?1
         ORDER BY row_id ASC",
    )?;

    let events = stmt
        .query_map(params![entry_id], |row| {
            let timestamp: String = row.get(1)?;
            let data_json: String = row.get(4)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: parse_timestamp(&timestamp).map_err(|e| conversion_error(1, Box::new(e)))?,
                event_type: row.get(2)?,
                entry_id: row.get(3)?,
                data: serde_json::from_str(&data_json).map_err(|e| conversion_error(4, Box::new(e)))?,
                actor: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn create_test_entry(raw_title: &str, curated_name: &str, category: CategoryTag) -> CatalogEntry {
        CatalogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            raw_title: raw_title.to_string(),
            curated_name: curated_name.to_string(),
            category,
            cost_in_source_currency: 180.0,
            retail_price: 1699,
            was_price: 2199,
            margin_percent: 61,
            profit_in_dest_currency: 1038,
            images: vec!["https://ae01.alicdn.com/kf/Sbed001.jpg".to_string()],
            colors_text: "Grey".to_string(),
            sizes_text: "King".to_string(),
            badge: BadgeTag::BestSeller,
            quality_score: 58,
            description: "The centrepiece your bedroom deserves.".to_string(),
            source_url: "https://ae.example.com/item/1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_read_back() {
        let conn = create_test_db();
        let entry = create_test_entry("Velvet Platform Bed", "Milano Velvet Platform Bed", CategoryTag::Beds);

        assert!(insert_entry(&conn, &entry, "test").unwrap());

        let all = get_all_entries(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, entry.id);
        assert_eq!(all[0].curated_name, "Milano Velvet Platform Bed");
        assert_eq!(all[0].category, CategoryTag::Beds);
        assert_eq!(all[0].badge, BadgeTag::BestSeller);
        assert_eq!(all[0].images, entry.images);
        assert_eq!(all[0].quality_score, 58);
        assert_eq!(all[0].created_at.timestamp(), entry.created_at.timestamp());
    }

    #[test]
    fn test_idempotency_import_twice() {
        let conn = create_test_db();
        let first = create_test_entry("Velvet Platform Bed", "Milano Velvet Platform Bed", CategoryTag::Beds);

        // Same listing, curated again: new id and name, same fingerprint
        let mut second = first.clone();
        second.id = uuid::Uuid::new_v4().to_string();
        second.curated_name = "Aurora Velvet Platform Bed".to_string();

        assert_eq!(insert_entries(&conn, &[first.clone(), second], "test").unwrap(), 1);
        assert_eq!(verify_count(&conn).unwrap(), 1);
        assert!(fingerprint_exists(&conn, &first.fingerprint()).unwrap());
    }

    #[test]
    fn test_creation_order() {
        let conn = create_test_db();
        let names = ["Milano Velvet Platform Bed", "Luna Modern Nightstand", "Nova Glass Coffee Table"];

        for (i, name) in names.iter().enumerate() {
            let entry = create_test_entry(&format!("Listing {}", i), name, CategoryTag::Beds);
            insert_entry(&conn, &entry, "test").unwrap();
        }

        let stored: Vec<String> = get_all_entries(&conn)
            .unwrap()
            .into_iter()
            .map(|e| e.curated_name)
            .collect();
        assert_eq!(stored, names);
    }

    #[test]
    fn test_delete_entry() {
        let conn = create_test_db();
        let entry = create_test_entry("Oak Nightstand", "Luna Oak Nightstand", CategoryTag::Nightstands);
        insert_entry(&conn, &entry, "test").unwrap();

        assert!(delete_entry(&conn, &entry.id, "test").unwrap());
        assert!(!delete_entry(&conn, &entry.id, "test").unwrap());
        assert_eq!(verify_count(&conn).unwrap(), 0);
        assert!(get_entry(&conn, &entry.id).unwrap().is_none());
    }

    #[test]
    fn test_events_recorded() {
        let conn = create_test_db();
        let entry = create_test_entry("Oak Nightstand", "Luna Oak Nightstand", CategoryTag::Nightstands);
        insert_entry(&conn, &entry, "cli").unwrap();
        delete_entry(&conn, &entry.id, "api").unwrap();

        let events = get_events_for_entry(&conn, &entry.id).unwrap();
        let kinds: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();

        assert_eq!(kinds, vec!["entry_added", "entry_deleted"]);
        assert_eq!(events[0].actor, "cli");
        assert_eq!(events[0].data["curated_name"], "Luna Oak Nightstand");
    }

    #[test]
    fn test_unknown_category_in_row_is_an_error() {
        let conn = create_test_db();
        let entry = create_test_entry("Oak Nightstand", "Luna Oak Nightstand", CategoryTag::Nightstands);
        insert_entry(&conn, &entry, "test").unwrap();
        conn.execute("UPDATE catalog_entries SET category = 'lamps'", []).unwrap();

        assert!(get_all_entries(&conn).is_err());
    }

    #[test]
    fn test_restart_rebuilds_registry_from_store() {
        use crate::{CurationConfig, CurationPipeline, RawListing};

        let conn = create_test_db();
        let listing = RawListing::new("Velvet Platform Bed", 180.0);

        let first_run = CurationPipeline::with_seed(CurationConfig::default(), 1).unwrap();
        let entry = first_run.curate(&listing).unwrap();
        insert_entry(&conn, &entry, "test").unwrap();

        let restarted = CurationPipeline::with_seed(CurationConfig::default(), 1).unwrap();
        restarted.rebuild_from_catalog(&get_all_entries(&conn).unwrap());

        let mut relisted = listing.clone();
        relisted.source_url = "https://ae.example.com/item/2".to_string();
        let next = restarted.curate(&relisted).unwrap();

        assert_ne!(next.curated_name, entry.curated_name);
        assert!(insert_entry(&conn, &next, "test").unwrap());
        assert_eq!(verify_count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_reimport_leaves_rotation_as_rebuilt() {
        use crate::{CurationConfig, CurationPipeline, RawListing};

        let conn = create_test_db();
        let stored = RawListing::new("Velvet Platform Bed", 180.0);

        let first_run = CurationPipeline::with_seed(CurationConfig::default(), 1).unwrap();
        insert_entry(&conn, &first_run.curate(&stored).unwrap(), "test").unwrap();

        let pipeline = CurationPipeline::with_seed(CurationConfig::default(), 1).unwrap();
        pipeline.rebuild_from_catalog(&get_all_entries(&conn).unwrap());
        let rebuilt = pipeline.registry();

        let report = pipeline
            .curate_new(&[stored], |fingerprint| fingerprint_exists(&conn, fingerprint))
            .unwrap();

        assert_eq!(report.duplicates, 1);
        assert_eq!(report.pass_count(), 0);
        assert_eq!(pipeline.registry().counter(CategoryTag::Beds), 1);
        assert_eq!(pipeline.registry(), rebuilt);
    }
}
