use std::path::PathBuf;
use std::sync::Arc;

use playtime_store::FsStorage;

use crate::Result;
use crate::ledger::{LEDGER_FILE_NAME, LOG_DIR_NAME, Ledger};

#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub ledger_path: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let log_dir = app_data_dir.join(LOG_DIR_NAME);
        let ledger_path = log_dir.join(LEDGER_FILE_NAME);
        Self {
            app_data_dir,
            log_dir,
            ledger_path,
        }
    }
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    std::fs::create_dir_all(&paths.app_data_dir)?;
    Ok(())
}

/// Creates the data dir if needed and opens the ledger stored inside it.
pub fn open_ledger(paths: &AppPaths) -> Result<Arc<Ledger>> {
    ensure_app_data_dir(paths)?;
    let storage = FsStorage::new(paths.app_data_dir.clone());
    Ok(Arc::new(Ledger::open(Arc::new(storage))))
}
