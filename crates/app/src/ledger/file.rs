use std::collections::BTreeMap;

use playtime_core::DurationRecord;
use playtime_store::{FileHandle, Storage};

use crate::error::LedgerError;

pub const LOG_DIR_NAME: &str = "log";
pub const LEDGER_FILE_NAME: &str = "playtime.json";
pub const LEDGER_MIME_TYPE: &str = "application/json";

pub(crate) type Entries = BTreeMap<u64, DurationRecord>;

/// Reads the ledger file into a fresh map. Later duplicates of an id replace
/// earlier ones.
pub(crate) fn load_entries(storage: &dyn Storage) -> Result<Entries, LedgerError> {
    let dir = storage
        .resolve_directory(LOG_DIR_NAME)
        .map_err(|err| LedgerError::on_read("resolve log dir", err))?
        .ok_or_else(|| {
            LedgerError::StorageUnavailable(format!("{} directory missing", LOG_DIR_NAME))
        })?;
    let file = storage
        .find_file(&dir, LEDGER_FILE_NAME)
        .map_err(|err| LedgerError::on_read("find ledger file", err))?
        .ok_or_else(|| {
            LedgerError::StorageUnavailable(format!("{} missing", LEDGER_FILE_NAME))
        })?;
    let reader = storage
        .open_for_read(&file)
        .map_err(|err| LedgerError::on_read("open ledger file", err))?;
    let records: Vec<DurationRecord> = serde_json::from_reader(reader)
        .map_err(|err| LedgerError::ReadFailure(format!("parse ledger file: {}", err)))?;

    let mut entries = Entries::new();
    for record in records {
        entries.insert(record.id, record);
    }
    Ok(entries)
}

/// Writes every record, sorted by id, over the previous ledger file.
pub(crate) fn save_entries(storage: &dyn Storage, entries: &Entries) -> Result<(), LedgerError> {
    let file = ledger_file(storage)?;
    let records = entries.values().collect::<Vec<_>>();
    let bytes = serde_json::to_vec_pretty(&records)
        .map_err(|err| LedgerError::WriteFailure(format!("serialize ledger: {}", err)))?;
    storage
        .replace_contents(&file, &bytes)
        .map_err(|err| LedgerError::on_write("write ledger file", err))
}

fn ledger_file(storage: &dyn Storage) -> Result<FileHandle, LedgerError> {
    let existing_dir = storage
        .resolve_directory(LOG_DIR_NAME)
        .map_err(|err| LedgerError::on_write("resolve log dir", err))?;
    let dir = match existing_dir {
        Some(dir) => dir,
        None => storage
            .create_directory(LOG_DIR_NAME)
            .map_err(|err| LedgerError::on_write("create log dir", err))?,
    };
    let existing_file = storage
        .find_file(&dir, LEDGER_FILE_NAME)
        .map_err(|err| LedgerError::on_write("find ledger file", err))?;
    match existing_file {
        Some(file) => Ok(file),
        None => storage
            .create_file(&dir, LEDGER_FILE_NAME, LEDGER_MIME_TYPE)
            .map_err(|err| LedgerError::on_write("create ledger file", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playtime_store::MemoryStorage;

    fn record(id: u64, label: &str, total: u64) -> DurationRecord {
        DurationRecord {
            id,
            label: label.to_string(),
            total_duration_ms: total,
        }
    }

    #[test]
    fn save_then_load_reconstructs_entries() {
        let storage = MemoryStorage::new();
        let mut entries = Entries::new();
        entries.insert(9, record(9, "Nine", 9_000));
        entries.insert(1, record(1, "", 0));
        entries.insert(u64::MAX, record(u64::MAX, "Max", u64::MAX));

        save_entries(&storage, &entries).expect("save");
        let loaded = load_entries(&storage).expect("load");
        assert_eq!(loaded, entries);
    }

    #[test]
    fn duplicate_ids_keep_the_last_record() {
        let storage = MemoryStorage::new();
        storage
            .put_file(
                LOG_DIR_NAME,
                LEDGER_FILE_NAME,
                r#"[
                    {"titleId": 5, "title": "Old", "totalPlayTimeMs": 100},
                    {"titleId": 6, "title": "Other", "totalPlayTimeMs": 1},
                    {"titleId": 5, "title": "New", "totalPlayTimeMs": 40}
                ]"#,
            )
            .expect("seed");
        let loaded = load_entries(&storage).expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&5], record(5, "New", 40));
    }

    #[test]
    fn missing_file_is_storage_unavailable() {
        let storage = MemoryStorage::new();
        let err = load_entries(&storage).expect_err("no dir");
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));

        storage.create_directory(LOG_DIR_NAME).expect("dir");
        let err = load_entries(&storage).expect_err("no file");
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
    }

    #[test]
    fn malformed_content_is_read_failure() {
        let storage = MemoryStorage::new();
        storage
            .put_file(LOG_DIR_NAME, LEDGER_FILE_NAME, "{not json")
            .expect("seed");
        let err = load_entries(&storage).expect_err("corrupt");
        assert!(matches!(err, LedgerError::ReadFailure(_)));

        storage
            .put_file(
                LOG_DIR_NAME,
                LEDGER_FILE_NAME,
                r#"[{"titleId": 1, "title": "Neg", "totalPlayTimeMs": -5}]"#,
            )
            .expect("seed");
        let err = load_entries(&storage).expect_err("negative total");
        assert!(matches!(err, LedgerError::ReadFailure(_)));
    }

    #[test]
    fn save_without_root_is_storage_unavailable() {
        let storage = MemoryStorage::new();
        storage.set_root_available(false);
        let err = save_entries(&storage, &Entries::new()).expect_err("no root");
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
    }

    #[test]
    fn save_output_is_sorted_by_id() {
        let storage = MemoryStorage::new();
        let mut entries = Entries::new();
        entries.insert(20, record(20, "B", 2_000));
        entries.insert(3, record(3, "A", 1_000));
        save_entries(&storage, &entries).expect("save");

        let bytes = storage
            .file_contents(LOG_DIR_NAME, LEDGER_FILE_NAME)
            .expect("file written");
        let expected = r#"[
  {
    "titleId": 3,
    "title": "A",
    "totalPlayTimeMs": 1000
  },
  {
    "titleId": 20,
    "title": "B",
    "totalPlayTimeMs": 2000
  }
]"#;
        assert_eq!(String::from_utf8(bytes).expect("utf8"), expected);
    }
}
