//! SQLite-backed task store.

use super::{ChangeVersion, TaskStore};
use crate::model::task::LocalTask;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

const TASK_SELECT_SQL: &str = "SELECT id, title, description, is_completed FROM tasks";

const TASK_UPSERT_SQL: &str = "INSERT INTO tasks (id, title, description, is_completed)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(id) DO UPDATE SET
        title = excluded.title,
        description = excluded.description,
        is_completed = excluded.is_completed;";

/// Task store owning one migrated SQLite connection.
pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
    changes: watch::Sender<ChangeVersion>,
}

impl SqliteTaskStore {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            conn: Mutex::new(conn),
            changes,
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::StoreUnavailable)
    }

    fn notify(&self, op: &str) {
        self.changes.send_modify(|version| *version += 1);
        debug!(
            "event=store_commit module=store op={op} version={}",
            *self.changes.borrow()
        );
    }

    fn write<T, F>(&self, op: &str, apply: F) -> RepoResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let value = {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            let value = apply(&tx)?;
            tx.commit()?;
            value
        };
        self.notify(op);
        Ok(value)
    }
}

impl TaskStore for SqliteTaskStore {
    fn get_task(&self, id: &str) -> RepoResult<Option<LocalTask>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn get_all_tasks(&self) -> RepoResult<Vec<LocalTask>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn upsert_task(&self, task: &LocalTask) -> RepoResult<()> {
        self.write("upsert", |tx| {
            upsert_row(tx, task)
        })
    }

    fn upsert_all_tasks(&self, tasks: &[LocalTask]) -> RepoResult<()> {
        self.write("upsert_all", |tx| insert_all(tx, tasks))
    }

    fn replace_all_tasks(&self, tasks: &[LocalTask]) -> RepoResult<()> {
        self.write("replace_all", |tx| {
            tx.execute("DELETE FROM tasks;", [])?;
            insert_all(tx, tasks)
        })
    }

    fn delete_task(&self, id: &str) -> RepoResult<()> {
        self.write("delete", |tx| {
            tx.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
            Ok(())
        })
    }

    fn delete_all_tasks(&self) -> RepoResult<()> {
        self.write("delete_all", |tx| {
            tx.execute("DELETE FROM tasks;", [])?;
            Ok(())
        })
    }

    fn delete_completed_tasks(&self) -> RepoResult<usize> {
        self.write("delete_completed", |tx| {
            tx.execute("DELETE FROM tasks WHERE is_completed = 1;", [])
        })
    }

    fn update_text(&self, id: &str, title: &str, description: &str) -> RepoResult<bool> {
        self.write("update_text", |tx| {
            let changed = tx.execute(
                "UPDATE tasks SET title = ?1, description = ?2 WHERE id = ?3;",
                params![title, description, id],
            )?;
            Ok(changed > 0)
        })
    }

    fn update_completed(&self, id: &str, is_completed: bool) -> RepoResult<bool> {
        self.write("update_completed", |tx| {
            let changed = tx.execute(
                "UPDATE tasks SET is_completed = ?1 WHERE id = ?2;",
                params![bool_to_int(is_completed), id],
            )?;
            Ok(changed > 0)
        })
    }

    fn subscribe(&self) -> watch::Receiver<ChangeVersion> {
        self.changes.subscribe()
    }
}

fn insert_all(tx: &Transaction<'_>, tasks: &[LocalTask]) -> rusqlite::Result<()> {
    for task in tasks {
        upsert_row(tx, task)?;
    }
    Ok(())
}

fn upsert_row(tx: &Transaction<'_>, task: &LocalTask) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare_cached(TASK_UPSERT_SQL)?;
    stmt.execute(params![
        task.id.as_str(),
        task.title.as_str(),
        task.description.as_str(),
        bool_to_int(task.is_completed),
    ])?;
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<LocalTask> {
    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in tasks.is_completed"
            )));
        }
    };

    Ok(LocalTask {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteTaskStore;
    use crate::store::open_db_in_memory;
    use crate::model::task::LocalTask;
    use crate::store::TaskStore;

    fn local(id: &str, title: &str, is_completed: bool) -> LocalTask {
        LocalTask {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("description of {title}"),
            is_completed,
        }
    }

    fn store() -> SqliteTaskStore {
        SqliteTaskStore::new(open_db_in_memory().expect("in-memory db should open"))
    }

    #[test]
    fn upsert_keeps_insertion_slot_on_update() {
        let store = store();
        store
            .upsert_all_tasks(&[local("b", "second", false), local("a", "first", true)])
            .expect("bulk upsert should succeed");
        store
            .upsert_task(&local("b", "second edited", false))
            .expect("update upsert should succeed");

        let ids: Vec<String> = store
            .get_all_tasks()
            .expect("scan should succeed")
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(
            store.get_task("b").expect("lookup").expect("row").title,
            "second edited"
        );
    }

    #[test]
    fn every_mutation_bumps_change_version_once() {
        let store = store();
        let rx = store.subscribe();
        assert_eq!(*rx.borrow(), 0);

        store.upsert_task(&local("1", "one", false)).expect("upsert");
        store.update_completed("missing", true).expect("update");
        store
            .replace_all_tasks(&[local("2", "two", false), local("3", "three", true)])
            .expect("replace");

        assert_eq!(*rx.borrow(), 3);
    }

    #[test]
    fn update_completed_reports_missing_rows() {
        let store = store();
        store.upsert_task(&local("1", "one", false)).expect("upsert");

        assert!(store.update_completed("1", true).expect("update"));
        assert!(!store.update_completed("nope", true).expect("update"));
        assert!(store.get_task("1").expect("lookup").expect("row").is_completed);
    }

    #[test]
    fn update_text_keeps_flag_and_never_inserts() {
        let store = store();
        store.upsert_task(&local("1", "one", true)).expect("upsert");

        assert!(store.update_text("1", "uno", "first").expect("update"));
        assert!(!store.update_text("2", "dos", "second").expect("update"));

        let row = store.get_task("1").expect("lookup").expect("row");
        assert_eq!((row.title.as_str(), row.description.as_str()), ("uno", "first"));
        assert!(row.is_completed);
        assert!(store.get_task("2").expect("lookup").is_none());
    }

    #[test]
    fn delete_completed_returns_removed_count() {
        let store = store();
        store
            .upsert_all_tasks(&[
                local("1", "one", true),
                local("2", "two", false),
                local("3", "three", true),
            ])
            .expect("bulk upsert");

        assert_eq!(store.delete_completed_tasks().expect("delete"), 2);
        let remaining = store.get_all_tasks().expect("scan");
        assert_eq!(remaining, vec![local("2", "two", false)]);
    }
}
