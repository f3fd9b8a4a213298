use crate::common::{FaceRegError, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// One enrolled person. `id` is the label space shared with sample filenames
/// and model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: i32,
    pub name: String,
    pub age: u32,
}

/// SQLite-backed store for person metadata. Rows are upserted during
/// enrollment, read during recognition, never deleted.
pub struct PersonStore {
    conn: Connection,
}

impl PersonStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            FaceRegError::Storage(format!("Failed to open database {}: {}", path.display(), e))
        })?;

        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| FaceRegError::Storage(format!("Failed to open database: {}", e)))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS students (
                id   INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                age  INTEGER NOT NULL
            )",
        )?;
        Ok(())
    }

    /// Insert the record, or overwrite name and age if the id already exists.
    /// A single statement, so a partial update can never leave a row with a
    /// stale name and a fresh age.
    pub fn upsert(&self, record: &PersonRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO students (id, name, age) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, age = excluded.age",
            rusqlite::params![record.id, record.name, record.age],
        )?;
        Ok(())
    }

    pub fn get(&self, id: i32) -> Result<Option<PersonRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, age FROM students WHERE id = ?1",
                [id],
                |row| {
                    Ok(PersonRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        age: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PersonRecord {
        PersonRecord {
            id: 7,
            name: "Alice".into(),
            age: 30,
        }
    }

    #[test]
    fn upsert_then_get_round_trips() {
        let store = PersonStore::open_in_memory().unwrap();
        store.upsert(&alice()).unwrap();

        assert_eq!(store.get(7).unwrap(), Some(alice()));
    }

    #[test]
    fn upsert_is_idempotent_and_takes_latest_values() {
        let store = PersonStore::open_in_memory().unwrap();
        store.upsert(&alice()).unwrap();
        store
            .upsert(&PersonRecord {
                id: 7,
                name: "Alicia".into(),
                age: 31,
            })
            .unwrap();

        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        let record = store.get(7).unwrap().unwrap();
        assert_eq!(record.name, "Alicia");
        assert_eq!(record.age, 31);
    }

    #[test]
    fn get_missing_id_is_none() {
        let store = PersonStore::open_in_memory().unwrap();
        store.upsert(&alice()).unwrap();

        assert_eq!(store.get(42).unwrap(), None);
    }
}
