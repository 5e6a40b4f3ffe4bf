// worklog-backend/src/store/file_record_store.rs
use super::{now_local, StoreError};
use crate::db::{self, DbPool};
use crate::models::{FileRecord, NewFileRecord};
use crate::schema::file_history;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::path::{Path, PathBuf};

pub const DEFAULT_CATEGORY: &str = "general";
pub const UPLOADED_STATUS: &str = "Uploaded";

/// Append-only history of uploaded files, plus where their bytes live on disk.
#[derive(Clone)]
pub struct FileRecordStore {
    pool: DbPool,
    upload_dir: PathBuf,
}

impl FileRecordStore {
    pub fn new(pool: DbPool, upload_dir: PathBuf) -> Self {
        FileRecordStore { pool, upload_dir }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Destination for an already-sanitized filename. Same name, same path.
    pub fn upload_path(&self, sanitized_name: &str) -> PathBuf {
        self.upload_dir.join(sanitized_name)
    }

    pub async fn record_upload(
        &self,
        filename: &str,
        category: Option<&str>,
    ) -> Result<FileRecord, StoreError> {
        if filename.is_empty() {
            return Err(StoreError::InvalidFilename);
        }

        let category = category
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let new_record = NewFileRecord {
            filename: filename.to_string(),
            file_type: Some(file_type_of(filename)),
            upload_date: Some(now_local()),
            status: Some(UPLOADED_STATUS.to_string()),
            category: Some(category.to_string()),
        };

        let mut conn = db::connection(&self.pool).await?;
        let record = diesel::insert_into(file_history::table)
            .values(new_record)
            .returning(FileRecord::as_returning())
            .get_result::<FileRecord>(&mut conn)
            .await?;

        log::info!(
            "Recorded upload {} '{}' (category {})",
            record.id,
            record.filename,
            category
        );
        Ok(record)
    }

    /// Records whose filename ends with `suffix`, compared byte for byte
    /// (so `.evtx` does not match `REPORT.EVTX`). Most recent first.
    pub async fn list_files_by_suffix(&self, suffix: &str) -> Result<Vec<FileRecord>, StoreError> {
        let mut conn = db::connection(&self.pool).await?;

        // LIKE is case-insensitive in SQLite: it narrows, ends_with decides.
        let candidates = file_history::table
            .filter(file_history::filename.like(format!("%{}", escape_like(suffix))).escape('\\'))
            .order(file_history::id.desc())
            .select(FileRecord::as_select())
            .load::<FileRecord>(&mut conn)
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|record| record.filename.ends_with(suffix))
            .collect())
    }

    pub async fn list_files_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<FileRecord>, StoreError> {
        let mut conn = db::connection(&self.pool).await?;

        let records = file_history::table
            .filter(file_history::category.eq(category))
            .order(file_history::id.desc())
            .select(FileRecord::as_select())
            .load::<FileRecord>(&mut conn)
            .await?;

        Ok(records)
    }

    pub async fn list_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        let mut conn = db::connection(&self.pool).await?;

        let records = file_history::table
            .order(file_history::id.desc())
            .select(FileRecord::as_select())
            .load::<FileRecord>(&mut conn)
            .await?;

        Ok(records)
    }
}

/// Lower-cased text after the last `.`; the whole name when there is no dot.
pub fn file_type_of(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_lowercase()
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::fresh_pool;

    #[test]
    fn file_type_is_last_suffix_lowercased() {
        assert_eq!(file_type_of("report.EVTX"), "evtx");
        assert_eq!(file_type_of("weekly.report.Docx"), "docx");
        assert_eq!(file_type_of("README"), "readme");
        assert_eq!(file_type_of("trailing."), "");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like(".evtx"), ".evtx");
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }

    #[actix_web::test]
    async fn upload_record_has_derived_fields() {
        let (dir, pool) = fresh_pool().await;
        let store = FileRecordStore::new(pool, dir.path().join("uploads"));

        let record = store.record_upload("report.EVTX", Some("evtx")).await.unwrap();
        assert_eq!(record.filename, "report.EVTX");
        assert_eq!(record.file_type.as_deref(), Some("evtx"));
        assert_eq!(record.status.as_deref(), Some(UPLOADED_STATUS));
        assert_eq!(record.category.as_deref(), Some("evtx"));
        assert!(record.upload_date.is_some());

        let general = store.record_upload("notes.txt", None).await.unwrap();
        assert_eq!(general.category.as_deref(), Some(DEFAULT_CATEGORY));
        let blank = store.record_upload("notes.txt", Some("")).await.unwrap();
        assert_eq!(blank.category.as_deref(), Some(DEFAULT_CATEGORY));
        assert_ne!(general.id, blank.id);
    }

    #[actix_web::test]
    async fn suffix_match_is_case_sensitive_and_newest_first() {
        let (dir, pool) = fresh_pool().await;
        let store = FileRecordStore::new(pool, dir.path().join("uploads"));

        let first = store.record_upload("day1.evtx", Some("evtx")).await.unwrap();
        store.record_upload("REPORT.EVTX", Some("evtx")).await.unwrap();
        store.record_upload("summary.docx", Some("weekly")).await.unwrap();
        store.record_upload("evtx_notes.txt", None).await.unwrap();
        let second = store.record_upload("day2.evtx", Some("evtx")).await.unwrap();

        let names: Vec<_> = store
            .list_files_by_suffix(".evtx")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(names, vec![second.id, first.id]);

        let upper: Vec<_> = store
            .list_files_by_suffix(".EVTX")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(upper, vec!["REPORT.EVTX"]);
    }

    #[actix_web::test]
    async fn category_listing_filters_exactly() {
        let (dir, pool) = fresh_pool().await;
        let store = FileRecordStore::new(pool, dir.path().join("uploads"));

        store.record_upload("w1.docx", Some("weekly")).await.unwrap();
        store.record_upload("misc.txt", None).await.unwrap();
        store.record_upload("w2.docx", Some("weekly")).await.unwrap();

        let weekly: Vec<_> = store
            .list_files_by_category("weekly")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(weekly, vec!["w2.docx", "w1.docx"]);
        assert_eq!(store.list_files().await.unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn empty_filename_writes_no_record() {
        let (dir, pool) = fresh_pool().await;
        let store = FileRecordStore::new(pool, dir.path().join("uploads"));

        let err = store.record_upload("", Some("evtx")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilename));
        assert!(store.list_files().await.unwrap().is_empty());
    }
}
