pub mod ledger;
pub mod reconcile;

pub use ledger::{import_ledger, parse_ledger_date, LedgerColumns, LedgerEncoding, LedgerError, LedgerProfile};
pub use reconcile::{reconcile, MatchedPair, ReconcileError, ReconciliationResult};
