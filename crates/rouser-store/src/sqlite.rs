//! SQLite-based store implementation

use chrono::{DateTime, Local};
use rouser_api::{Preferences, TrackedItem};
use rouser_util::ItemId;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::{Store, StoreError, StoreResult};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            -- Tracked items; rowid preserves insertion order for display
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                process_name TEXT,
                launch_json TEXT,
                server_reset_time TEXT,
                mandatory_enabled INTEGER NOT NULL DEFAULT 0,
                mandatory_times_json TEXT NOT NULL DEFAULT '[]',
                user_cycle_hours INTEGER,
                last_played TEXT
            );

            -- Global preferences (single row)
            CREATE TABLE IF NOT EXISTS preferences (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                prefs_json TEXT NOT NULL
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<(TrackedItem, Option<String>, String)> {
        let item = TrackedItem {
            id: ItemId::new(row.get::<_, String>(0)?),
            name: row.get(1)?,
            process_name: row.get(2)?,
            launch: None,
            server_reset_time: row.get(4)?,
            mandatory_enabled: row.get::<_, i64>(5)? != 0,
            mandatory_times: Vec::new(),
            user_cycle_hours: row.get::<_, Option<i64>>(7)?.map(|h| h as u32),
            last_played: None,
        };
        let launch_json: Option<String> = row.get(3)?;
        let times_json: String = row.get(6)?;
        // last_played parsed by the caller so parse errors surface as StoreError
        Ok((item, launch_json, times_json))
    }

    fn load_item(row: &Row<'_>) -> StoreResult<TrackedItem> {
        let (mut item, launch_json, times_json) =
            Self::row_to_item(row).map_err(StoreError::from)?;

        if let Some(json) = launch_json {
            item.launch = Some(serde_json::from_str(&json)?);
        }
        item.mandatory_times = serde_json::from_str(&times_json)?;

        let last_played_str: Option<String> = row.get(8).map_err(StoreError::from)?;
        item.last_played = last_played_str.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Local))
                .ok()
        });

        Ok(item)
    }
}

const ITEM_COLUMNS: &str = "id, name, process_name, launch_json, server_reset_time, \
     mandatory_enabled, mandatory_times_json, user_cycle_hours, last_played";

impl Store for SqliteStore {
    fn get_items(&self) -> StoreResult<Vec<TrackedItem>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items ORDER BY rowid",
            ITEM_COLUMNS
        ))?;

        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(Self::load_item(row)?);
        }

        Ok(items)
    }

    fn get_item(&self, id: &ItemId) -> StoreResult<Option<TrackedItem>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE id = ?",
            ITEM_COLUMNS
        ))?;

        let mut rows = stmt.query([id.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::load_item(row)?)),
            None => Ok(None),
        }
    }

    fn upsert_item(&self, item: &TrackedItem) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();

        let launch_json = item
            .launch
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let times_json = serde_json::to_string(&item.mandatory_times)?;
        let last_played = item.last_played.map(|dt| dt.to_rfc3339());

        conn.execute(
            r#"
            INSERT INTO items (id, name, process_name, launch_json, server_reset_time,
                               mandatory_enabled, mandatory_times_json, user_cycle_hours, last_played)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                process_name = excluded.process_name,
                launch_json = excluded.launch_json,
                server_reset_time = excluded.server_reset_time,
                mandatory_enabled = excluded.mandatory_enabled,
                mandatory_times_json = excluded.mandatory_times_json,
                user_cycle_hours = excluded.user_cycle_hours,
                last_played = excluded.last_played
            "#,
            params![
                item.id.as_str(),
                item.name,
                item.process_name,
                launch_json,
                item.server_reset_time,
                item.mandatory_enabled as i64,
                times_json,
                item.user_cycle_hours.map(|h| h as i64),
                last_played,
            ],
        )?;

        debug!(item_id = %item.id, "Item upserted");
        Ok(())
    }

    fn update_last_played(
        &self,
        id: &ItemId,
        played_at: DateTime<Local>,
    ) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();

        let stored: Option<Option<String>> = conn
            .query_row(
                "SELECT last_played FROM items WHERE id = ?",
                [id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let stored = match stored {
            Some(s) => s,
            None => return Err(StoreError::NotFound(id.to_string())),
        };

        // Monotonic: never roll back an existing timestamp
        if let Some(existing) = stored.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Local))
                .ok()
        }) {
            if played_at <= existing {
                debug!(
                    item_id = %id,
                    played_at = %played_at,
                    existing = %existing,
                    "Ignoring stale last-played update"
                );
                return Ok(false);
            }
        }

        conn.execute(
            "UPDATE items SET last_played = ? WHERE id = ?",
            params![played_at.to_rfc3339(), id.as_str()],
        )?;

        debug!(item_id = %id, played_at = %played_at, "Last-played advanced");
        Ok(true)
    }

    fn delete_item(&self, id: &ItemId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM items WHERE id = ?", [id.as_str()])?;
        Ok(())
    }

    fn get_preferences(&self) -> StoreResult<Preferences> {
        let conn = self.conn.lock().unwrap();

        let json: Option<String> = conn
            .query_row("SELECT prefs_json FROM preferences WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Preferences::default()),
        }
    }

    fn save_preferences(&self, prefs: &Preferences) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let json = serde_json::to_string(prefs)?;

        conn.execute(
            r#"
            INSERT INTO preferences (id, prefs_json) VALUES (1, ?)
            ON CONFLICT(id) DO UPDATE SET prefs_json = excluded.prefs_json
            "#,
            [json],
        )?;

        debug!("Preferences saved");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |_| Ok(())).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_item(id: &str) -> TrackedItem {
        let mut item = TrackedItem::new(id, "Test Game");
        item.process_name = Some("game.exe".into());
        item.server_reset_time = Some("05:00".into());
        item.mandatory_enabled = true;
        item.mandatory_times = vec!["12:00".into(), "18:00".into()];
        item.user_cycle_hours = Some(24);
        item
    }

    #[test]
    fn item_crud_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();

        let item = make_item("genshin");
        store.upsert_item(&item).unwrap();

        let loaded = store.get_item(&ItemId::new("genshin")).unwrap().unwrap();
        assert_eq!(loaded, item);

        store.delete_item(&ItemId::new("genshin")).unwrap();
        assert!(store.get_item(&ItemId::new("genshin")).unwrap().is_none());
    }

    #[test]
    fn items_keep_insertion_order() {
        let store = SqliteStore::in_memory().unwrap();

        store.upsert_item(&make_item("zzz")).unwrap();
        store.upsert_item(&make_item("aaa")).unwrap();
        store.upsert_item(&make_item("mmm")).unwrap();

        let ids: Vec<String> = store
            .get_items()
            .unwrap()
            .into_iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(ids, vec!["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn last_played_is_monotonic() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_item(&make_item("genshin")).unwrap();
        let id = ItemId::new("genshin");

        let t1 = Local.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let t2 = Local.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap();

        assert!(store.update_last_played(&id, t2).unwrap());
        // Older timestamp is ignored
        assert!(!store.update_last_played(&id, t1).unwrap());

        let loaded = store.get_item(&id).unwrap().unwrap();
        assert_eq!(loaded.last_played, Some(t2));
    }

    #[test]
    fn last_played_unknown_item_errors() {
        let store = SqliteStore::in_memory().unwrap();
        let result = store.update_last_played(&ItemId::new("nope"), Local::now());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn preferences_default_then_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();

        // Unsaved store yields defaults
        assert_eq!(store.get_preferences().unwrap(), Preferences::default());

        let mut prefs = Preferences::default();
        prefs.sleep_start = "22:30".into();
        prefs.notify.daily_reset = false;
        store.save_preferences(&prefs).unwrap();

        assert_eq!(store.get_preferences().unwrap(), prefs);
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rouser.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert_item(&make_item("genshin")).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_items().unwrap().len(), 1);
        assert!(store.is_healthy());
    }
}
