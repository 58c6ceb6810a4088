use std::collections::{BTreeMap, BTreeSet};

use concilia_core::{JoinKey, LedgerTransaction, StatementTransaction};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Nothing to reconcile (statement empty: {statement_empty}, ledger empty: {ledger_empty})")]
    NothingToReconcile { statement_empty: bool, ledger_empty: bool },
}

/// A statement movement and a ledger row that share a join key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    pub statement: StatementTransaction,
    pub ledger: LedgerTransaction,
}

/// Three-way split of both inputs.
///
/// Every statement transaction appears either in one or more matched pairs or
/// in `statement_only`, never both; likewise for ledger transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub matched: Vec<MatchedPair>,
    pub statement_only: Vec<StatementTransaction>,
    pub ledger_only: Vec<LedgerTransaction>,
}

impl ReconciliationResult {
    pub fn is_fully_matched(&self) -> bool {
        self.statement_only.is_empty() && self.ledger_only.is_empty()
    }
}

/// Full outer equi-join on `(account_key, date, |value|)`.
///
/// When N statement rows and M ledger rows share a key, all N×M pairs are
/// produced. Matched pairs follow statement input order, then ledger input
/// order. Records without a complete key never match anything.
pub fn reconcile(
    statement: &[StatementTransaction],
    ledger: &[LedgerTransaction],
) -> Result<ReconciliationResult, ReconcileError> {
    if statement.is_empty() || ledger.is_empty() {
        return Err(ReconcileError::NothingToReconcile {
            statement_empty: statement.is_empty(),
            ledger_empty: ledger.is_empty(),
        });
    }

    let mut ledger_by_key: BTreeMap<JoinKey, Vec<&LedgerTransaction>> = BTreeMap::new();
    for tx in ledger {
        if let Some(key) = tx.join_key() {
            ledger_by_key.entry(key).or_default().push(tx);
        }
    }

    let mut result = ReconciliationResult::default();
    let mut statement_keys = BTreeSet::new();

    for tx in statement {
        let Some(key) = tx.join_key() else {
            result.statement_only.push(tx.clone());
            continue;
        };
        match ledger_by_key.get(&key) {
            Some(rows) => {
                result.matched.extend(rows.iter().map(|l| MatchedPair {
                    statement: tx.clone(),
                    ledger: (*l).clone(),
                }));
            }
            None => result.statement_only.push(tx.clone()),
        }
        statement_keys.insert(key);
    }

    result.ledger_only = ledger
        .iter()
        .filter(|tx| tx.join_key().map_or(true, |k| !statement_keys.contains(&k)))
        .cloned()
        .collect();

    info!(
        "Reconciled: {} matched, {} statement-only, {} ledger-only",
        result.matched.len(),
        result.statement_only.len(),
        result.ledger_only.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use concilia_core::{AccountKey, TransactionKind};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn key(s: &str) -> Option<AccountKey> {
        Some(s.parse().unwrap())
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn stx(account: Option<AccountKey>, d: u32, value: &str) -> StatementTransaction {
        StatementTransaction::new(date(d), TransactionKind::Application, dec(value), account, "a.pdf")
    }

    fn ltx(account: Option<AccountKey>, d: u32, value: &str, doc: &str) -> LedgerTransaction {
        LedgerTransaction {
            date: Some(date(d)),
            value: dec(value),
            account_key: account,
            document_ref: Some(doc.to_string()),
        }
    }

    #[test]
    fn exact_match() {
        let r = reconcile(&[stx(key("12345"), 1, "1000")], &[ltx(key("12345"), 1, "1000.00", "d1")]).unwrap();
        assert_eq!(r.matched.len(), 1);
        assert!(r.is_fully_matched());
    }

    #[test]
    fn sign_difference_still_matches() {
        let r = reconcile(&[stx(key("12345"), 1, "1000")], &[ltx(key("12345"), 1, "-1000", "d1")]).unwrap();
        assert_eq!(r.matched.len(), 1);
    }

    #[test]
    fn rounding_to_cents_before_join() {
        let r = reconcile(&[stx(key("12345"), 1, "100.004")], &[ltx(key("12345"), 1, "100.001", "d1")]).unwrap();
        assert_eq!(r.matched.len(), 1);
    }

    #[test]
    fn different_date_or_account_does_not_match() {
        let r = reconcile(
            &[stx(key("12345"), 1, "10"), stx(key("12345"), 2, "10")],
            &[ltx(key("12345"), 3, "10", "d1"), ltx(key("54321"), 2, "10", "d2")],
        )
        .unwrap();
        assert!(r.matched.is_empty());
        assert_eq!(r.statement_only.len(), 2);
        assert_eq!(r.ledger_only.len(), 2);
    }

    #[test]
    fn duplicates_produce_cross_product() {
        let r = reconcile(
            &[stx(key("12345"), 1, "10"), stx(key("12345"), 1, "10")],
            &[
                ltx(key("12345"), 1, "10", "d1"),
                ltx(key("12345"), 1, "10", "d2"),
                ltx(key("12345"), 1, "10", "d3"),
            ],
        )
        .unwrap();
        assert_eq!(r.matched.len(), 6);
        assert!(r.statement_only.is_empty());
        assert!(r.ledger_only.is_empty());
        let docs: Vec<_> = r.matched.iter().map(|p| p.ledger.document_ref.clone().unwrap()).collect();
        assert_eq!(docs, ["d1", "d2", "d3", "d1", "d2", "d3"]);
    }

    #[test]
    fn missing_key_never_matches() {
        let r = reconcile(&[stx(None, 1, "10")], &[ltx(None, 1, "10", "d1")]).unwrap();
        assert!(r.matched.is_empty());
        assert_eq!(r.statement_only.len(), 1);
        assert_eq!(r.ledger_only.len(), 1);
    }

    #[test]
    fn ledger_without_date_is_ledger_only() {
        let mut l = ltx(key("12345"), 1, "10", "d1");
        l.date = None;
        let r = reconcile(&[stx(key("12345"), 1, "10")], &[l]).unwrap();
        assert_eq!(r.statement_only.len(), 1);
        assert_eq!(r.ledger_only.len(), 1);
    }

    #[test]
    fn unmatched_statement_account() {
        let r = reconcile(&[stx(key("99999"), 1, "10")], &[ltx(key("12345"), 1, "10", "d1")]).unwrap();
        assert!(r.matched.is_empty());
        assert_eq!(r.statement_only[0].account_key, key("99999"));
    }

    #[test]
    fn every_record_accounted_for_once() {
        let statement = vec![
            stx(key("12345"), 1, "10"),
            stx(key("12345"), 2, "20"),
            stx(None, 3, "30"),
        ];
        let ledger = vec![
            ltx(key("12345"), 1, "-10", "d1"),
            ltx(key("12345"), 4, "40", "d2"),
        ];
        let r = reconcile(&statement, &ledger).unwrap();

        let matched_statement: BTreeSet<_> = r.matched.iter().map(|p| p.statement.date).collect();
        let only_statement: BTreeSet<_> = r.statement_only.iter().map(|t| t.date).collect();
        assert!(matched_statement.is_disjoint(&only_statement));
        assert_eq!(matched_statement.len() + only_statement.len(), statement.len());

        let matched_ledger: BTreeSet<_> = r.matched.iter().map(|p| p.ledger.document_ref.clone()).collect();
        let only_ledger: BTreeSet<_> = r.ledger_only.iter().map(|t| t.document_ref.clone()).collect();
        assert!(matched_ledger.is_disjoint(&only_ledger));
        assert_eq!(matched_ledger.len() + only_ledger.len(), ledger.len());
    }

    #[test]
    fn empty_inputs_are_reported() {
        let err = reconcile(&[], &[ltx(key("12345"), 1, "10", "d1")]).unwrap_err();
        assert_eq!(err, ReconcileError::NothingToReconcile { statement_empty: true, ledger_empty: false });
        let err = reconcile(&[stx(key("12345"), 1, "10")], &[]).unwrap_err();
        assert_eq!(err, ReconcileError::NothingToReconcile { statement_empty: false, ledger_empty: true });
    }
}
