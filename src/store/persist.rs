//! Persistence Bridge: mirrors the durable panel fields to a SQLite
//! key-value `settings` table and rehydrates them on startup.
//!
//! The whole collection is one JSON array under [`STORAGE_KEY`], written
//! as a full overwrite on every durable change. Loading tolerates a
//! missing key, corrupted JSON (the bad value is cleared), and legacy
//! record shapes, which are migrated to the current shape with sensible
//! defaults. When the database cannot be opened the repository runs
//! disabled and the store stays fully functional in memory.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::path::Path;
use std::str::FromStr;

use super::dedupe_terms;
use crate::types::{SearchMode, SortOrder, StoredPanel};

/// Storage key for the persisted panel array.
pub const STORAGE_KEY: &str = "hobby_custom_panels_v1";

/// Key-value store backed by an optional SQLite pool.
#[derive(Debug, Clone)]
pub struct PanelRepository {
    pool: Option<SqlitePool>,
}

impl PanelRepository {
    /// Open (or create) the database at `path`. Any failure logs a warning
    /// and yields a disabled repository instead of aborting startup.
    pub async fn open(path: &Path) -> Self {
        match Self::try_open(path).await {
            Ok(repository) => repository,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Storage unavailable, panels will not persist across restarts"
                );
                Self::disabled()
            }
        }
    }

    async fn try_open(path: &Path) -> Result<Self, anyhow::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path.display()))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::from_pool(pool).await.map_err(Into::into)
    }

    /// Build from an existing pool (tests use `sqlite::memory:`).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool: Some(pool) })
    }

    /// Repository that never persists; every load is empty.
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub fn is_persistent(&self) -> bool {
        self.pool.is_some()
    }

    /// Load and migrate the persisted panels. Never fails: storage
    /// problems degrade to an empty collection.
    pub async fn load(&self) -> Vec<StoredPanel> {
        let raw = match self.get(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored panels");
                return Vec::new();
            }
        };

        match parse_stored_panels(&raw) {
            Some(panels) => panels,
            None => {
                tracing::warn!("Clearing corrupted panel storage");
                if let Err(e) = self.remove(STORAGE_KEY).await {
                    tracing::warn!(error = %e, "Failed to clear corrupted panel storage");
                }
                Vec::new()
            }
        }
    }

    /// Overwrite the whole persisted collection.
    pub async fn save(&self, panels: &[StoredPanel]) -> anyhow::Result<()> {
        if self.pool.is_none() {
            return Ok(());
        }
        let json = serde_json::to_string(panels)?;
        self.set(STORAGE_KEY, &json).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, sqlx::Error> {
        let Some(pool) = &self.pool else {
            return Ok(None);
        };
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), sqlx::Error> {
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Parse the stored JSON document. `None` means the JSON itself is
/// corrupt and the stored value should be cleared; a well-formed document
/// that is not an array yields an empty collection.
pub fn parse_stored_panels(raw: &str) -> Option<Vec<StoredPanel>> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let serde_json::Value::Array(records) = value else {
        return Some(Vec::new());
    };
    Some(records.iter().filter_map(migrate_record).collect())
}

/// Migrate one record, current or legacy shape, discarding records
/// missing a non-empty id or title.
fn migrate_record(value: &serde_json::Value) -> Option<StoredPanel> {
    let id = nonempty_str(value.get("id"))?;
    let title = nonempty_str(value.get("title"))?;

    let raw_terms: Vec<String> = match value.get("searchTerms") {
        Some(serde_json::Value::Array(terms)) => terms
            .iter()
            .filter_map(|t| t.as_str().map(str::to_string))
            .collect(),
        // Legacy shape: a single free-text query field.
        _ => match value.get("query").and_then(|q| q.as_str()) {
            Some(query) if !query.is_empty() => vec![query.to_string()],
            _ => Vec::new(),
        },
    };
    let search_terms = dedupe_terms(raw_terms);

    let active_term = value
        .get("activeTerm")
        .and_then(|a| a.as_str())
        .filter(|a| !a.is_empty() && search_terms.iter().any(|t| t == a))
        .map(str::to_string)
        .unwrap_or_else(|| search_terms.first().cloned().unwrap_or_default());

    let sort_order = value
        .get("sortOrder")
        .and_then(|v| serde_json::from_value::<SortOrder>(v.clone()).ok())
        .unwrap_or_default();
    let search_mode = value
        .get("searchMode")
        .and_then(|v| serde_json::from_value::<SearchMode>(v.clone()).ok())
        .unwrap_or_default();

    Some(StoredPanel {
        id: id.to_string(),
        title: title.to_string(),
        search_terms,
        active_term,
        sort_order,
        search_mode,
    })
}

fn nonempty_str(value: Option<&serde_json::Value>) -> Option<&str> {
    value.and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_repository() -> PanelRepository {
        // A single connection keeps the in-memory database shared.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        PanelRepository::from_pool(pool).await.unwrap()
    }

    fn sample() -> StoredPanel {
        StoredPanel {
            id: "p1".into(),
            title: "Shoes".into(),
            search_terms: vec!["Nike".into(), "Adidas".into()],
            active_term: "Nike".into(),
            sort_order: SortOrder::Date,
            search_mode: SearchMode::LabelOnly,
        }
    }

    #[tokio::test]
    async fn save_load_round_trips_unchanged() {
        let repository = memory_repository().await;
        repository.save(&[sample()]).await.unwrap();
        assert_eq!(repository.load().await, vec![sample()]);
    }

    #[tokio::test]
    async fn missing_key_loads_empty() {
        let repository = memory_repository().await;
        assert!(repository.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_json_is_cleared() {
        let repository = memory_repository().await;
        repository.set(STORAGE_KEY, "{not json").await.unwrap();
        assert!(repository.load().await.is_empty());
        // The bad value is gone, not just skipped.
        assert_eq!(repository.get(STORAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn open_creates_parent_dirs_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panels.db");

        let repository = PanelRepository::open(&path).await;
        assert!(repository.is_persistent());
        repository.save(&[sample()]).await.unwrap();
        drop(repository);

        let reopened = PanelRepository::open(&path).await;
        assert_eq!(reopened.load().await, vec![sample()]);
    }

    #[tokio::test]
    async fn disabled_repository_is_inert() {
        let repository = PanelRepository::disabled();
        assert!(!repository.is_persistent());
        repository.save(&[sample()]).await.unwrap();
        assert!(repository.load().await.is_empty());
    }

    #[test]
    fn non_array_document_is_empty_not_corrupt() {
        assert_eq!(parse_stored_panels(r#"{"a":1}"#), Some(Vec::new()));
        assert_eq!(parse_stored_panels("null"), Some(Vec::new()));
        assert_eq!(parse_stored_panels("oops"), None);
    }

    #[test]
    fn legacy_query_field_becomes_single_term() {
        let panels =
            parse_stored_panels(r#"[{"id":"p1","title":"Shoes","query":"nike air"}]"#).unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].search_terms, vec!["nike air"]);
        assert_eq!(panels[0].active_term, "nike air");
        assert_eq!(panels[0].sort_order, SortOrder::Relevance);
        assert_eq!(panels[0].search_mode, SearchMode::CategoryPlusLabel);
    }

    #[test]
    fn records_missing_id_or_title_are_discarded() {
        let panels = parse_stored_panels(
            r#"[
                {"title":"no id"},
                {"id":"","title":"blank id"},
                {"id":"p1"},
                {"id":"p2","title":"kept"}
            ]"#,
        )
        .unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].id, "p2");
    }

    #[test]
    fn invalid_sort_and_mode_fall_back_to_defaults() {
        let panels = parse_stored_panels(
            r#"[{"id":"p1","title":"T","searchTerms":["a"],
                 "sortOrder":"hot","searchMode":"everything"}]"#,
        )
        .unwrap();
        assert_eq!(panels[0].sort_order, SortOrder::Relevance);
        assert_eq!(panels[0].search_mode, SearchMode::CategoryPlusLabel);
    }

    #[test]
    fn stale_active_term_falls_back_to_first() {
        let panels = parse_stored_panels(
            r#"[{"id":"p1","title":"T","searchTerms":["a","b"],"activeTerm":"gone"}]"#,
        )
        .unwrap();
        assert_eq!(panels[0].active_term, "a");
    }

    #[test]
    fn terms_are_trimmed_deduped_and_blank_filtered() {
        let panels = parse_stored_panels(
            r#"[{"id":"p1","title":"T","searchTerms":[" Nike ","nike","","Adidas"]}]"#,
        )
        .unwrap();
        assert_eq!(panels[0].search_terms, vec!["Nike", "Adidas"]);
    }
}
