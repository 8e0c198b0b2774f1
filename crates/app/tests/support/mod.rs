#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use playtime_app::{AppPaths, Ledger, open_ledger};
use playtime_store::MemoryStorage;
use tempfile::TempDir;

pub struct TestLedger {
    pub _dir: TempDir,
    pub paths: AppPaths,
    pub ledger: Arc<Ledger>,
}

impl TestLedger {
    /// A second ledger over the same files, standing in for another process.
    pub fn reopen(&self) -> Arc<Ledger> {
        open_ledger(&self.paths).expect("reopen ledger")
    }

    pub fn ledger_json(&self) -> serde_json::Value {
        let contents = std::fs::read_to_string(&self.paths.ledger_path).expect("read ledger");
        serde_json::from_str(&contents).expect("parse ledger")
    }

    pub fn write_ledger(&self, contents: &str) {
        std::fs::create_dir_all(&self.paths.log_dir).expect("log dir");
        std::fs::write(&self.paths.ledger_path, contents).expect("write ledger");
    }
}

pub fn setup_ledger() -> TestLedger {
    let dir = tempfile::tempdir().expect("temp dir");
    let paths = AppPaths::new(PathBuf::from(dir.path()).join("data"));
    let ledger = open_ledger(&paths).expect("open ledger");
    TestLedger {
        _dir: dir,
        paths,
        ledger,
    }
}

pub fn memory_ledger() -> (Arc<MemoryStorage>, Ledger) {
    let storage = Arc::new(MemoryStorage::new());
    let ledger = Ledger::open(storage.clone());
    (storage, ledger)
}

pub fn ids_in(json: &serde_json::Value) -> Vec<u64> {
    json.as_array()
        .expect("array")
        .iter()
        .map(|record| record["titleId"].as_u64().expect("titleId"))
        .collect()
}
