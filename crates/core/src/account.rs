use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const ACCOUNT_KEY_LEN: usize = 5;

/// Canonical join key for an account: exactly five ASCII digits.
///
/// Derived from the trailing digits of a raw account number, so statement
/// numbers like `12.345-6` and ledger numbers like `0001234567` can meet.
/// An account without a key is represented as `Option<AccountKey>::None`
/// and never joins, not even with another missing key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountKey(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid account key: '{0}'")]
pub struct InvalidAccountKey(pub String);

impl AccountKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountKey {
    type Err = InvalidAccountKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == ACCOUNT_KEY_LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(AccountKey(s.to_string()))
        } else {
            Err(InvalidAccountKey(s.to_string()))
        }
    }
}

impl TryFrom<String> for AccountKey {
    type Error = InvalidAccountKey;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountKey> for String {
    fn from(key: AccountKey) -> Self {
        key.0
    }
}

/// Keeps the last five digits of `raw`, left-padded with zeros.
///
/// Returns `None` when there is no input or the input has no digits at all.
pub fn normalize_account_key(raw: Option<&str>) -> Option<AccountKey> {
    let digits: Vec<char> = raw?.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let tail: String = digits[digits.len().saturating_sub(ACCOUNT_KEY_LEN)..]
        .iter()
        .collect();
    Some(AccountKey(format!("{tail:0>width$}", width = ACCOUNT_KEY_LEN)))
}
