pub mod error;
pub mod ledger;
pub mod session;
pub mod startup;

pub use error::{AppError, IssueKind, LedgerError, Result};
pub use ledger::{LEDGER_FILE_NAME, LEDGER_MIME_TYPE, LOG_DIR_NAME, Ledger, LedgerIssue};
pub use session::SessionTimer;
pub use startup::{AppPaths, ensure_app_data_dir, open_ledger};
