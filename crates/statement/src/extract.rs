use std::sync::OnceLock;

use concilia_core::{normalize_amount, Money};
use regex::Regex;

use crate::types::{BalanceSummary, HeaderInfo};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_branch,
    r"(?:Agência|Agencia|Branch)\s*:?\s*(\d[\d-]*)");
re!(re_account,
    r"\b(?:Conta corrente|Conta|Account)\s*:?\s*(\d[\d.\-]*)");
re!(re_period,
    r"(?:Mês/ano referência|Mes/ano referencia|Reference month)\s*:?\s*((?:\p{Lu}+|\d{1,2})/\d{4})");

re!(re_previous_balance,
    r"(?:SALDO ANTERIOR|PREVIOUS BALANCE)\s*(-?[\d.,]+)");
re!(re_applications,
    r"(?:APLICAÇÕES|APPLICATIONS) \(\+\)\s*([\d.,]+)");
re!(re_redemptions,
    r"(?:RESGATES|REDEMPTIONS) \(-\)\s*([\d.,]+)");
re!(re_net_yield,
    r"(?:RENDIMENTO LÍQUIDO|NET YIELD)\s*(-?[\d.,]+)");
re!(re_current_balance,
    r"(?:SALDO ATUAL|CURRENT BALANCE) =\s*(-?[\d.,]+)");

// ── Header ───────────────────────────────────────────────────────────────────

/// Pulls branch, account and reference period from a page's text. Each field
/// is searched independently and is trimmed but otherwise left as printed.
pub fn extract_header(page_text: &str) -> HeaderInfo {
    HeaderInfo {
        branch: capture(re_branch(), page_text),
        account_raw: capture(re_account(), page_text),
        period: capture(re_period(), page_text),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    let c = re.captures(text)?;
    let value = c.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ── Text summary ─────────────────────────────────────────────────────────────

/// Reads a period summary printed as running text. Both balances must be
/// present for the layout to count; the flow lines default to zero.
pub fn extract_text_summary(page_text: &str) -> Option<BalanceSummary> {
    let previous_balance = signed_amount(re_previous_balance(), page_text)?;
    let current_balance = signed_amount(re_current_balance(), page_text)?;
    Some(BalanceSummary {
        previous_balance,
        applications: signed_amount(re_applications(), page_text).unwrap_or_default(),
        redemptions: signed_amount(re_redemptions(), page_text).unwrap_or_default(),
        net_yield: signed_amount(re_net_yield(), page_text),
        current_balance,
    })
}

fn signed_amount(re: &Regex, text: &str) -> Option<Money> {
    let raw = capture(re, text)?;
    Some(signed_money(&raw))
}

/// Like [`normalize_amount`] but honours a leading minus sign.
pub(crate) fn signed_money(raw: &str) -> Money {
    let magnitude = Money::from_decimal(normalize_amount(raw));
    if raw.trim_start().starts_with('-') {
        Money::zero() - magnitude
    } else {
        magnitude
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
