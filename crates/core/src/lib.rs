pub mod account;
pub mod date;
pub mod money;
pub mod period;
pub mod transaction;

pub use account::{normalize_account_key, AccountKey, InvalidAccountKey, ACCOUNT_KEY_LEN};
pub use date::parse_day_first_date;
pub use money::{normalize_amount, normalize_amount_with, DecimalSeparator, Money};
pub use period::{InvalidPeriod, StatementPeriod};
pub use transaction::{JoinKey, LedgerTransaction, StatementTransaction, TransactionKind};
