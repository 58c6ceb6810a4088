use crate::types::StatementKind;

const INVESTMENT_MARKERS: &[&str] = &["Investimentos Fundos", "Investment Funds"];
const CURRENT_ACCOUNT_MARKERS: &[&str] = &["Extrato de Conta Corrente", "Current Account Statement"];

/// Phrases the bank prints when the requested period had no movement.
pub const NO_MOVEMENT_MARKERS: &[&str] = &[
    "NÃO HOUVE MOVIMENTO NO PERÍODO SOLICITADO",
    "NO MOVEMENT IN THE REQUESTED PERIOD",
];

/// Decides which kind of statement a page belongs to from its header phrases.
/// The investment marker wins over anything else on the page.
pub fn classify(page_text: &str) -> StatementKind {
    if INVESTMENT_MARKERS.iter().any(|m| page_text.contains(m)) {
        return StatementKind::Investment;
    }
    if CURRENT_ACCOUNT_MARKERS.iter().any(|m| page_text.contains(m)) {
        return StatementKind::CurrentAccount;
    }
    StatementKind::Unknown
}

pub fn is_no_movement(page_text: &str) -> bool {
    NO_MOVEMENT_MARKERS.iter().any(|m| page_text.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn investment_marker() {
        assert_eq!(
            classify("Banco X\nInvestimentos Fundos\nAgência 1234-5"),
            StatementKind::Investment
        );
    }

    #[test]
    fn investment_wins_over_current_account() {
        let text = "Extrato de Conta Corrente\n...\nInvestimentos Fundos";
        assert_eq!(classify(text), StatementKind::Investment);
    }

    #[test]
    fn current_account_marker() {
        assert_eq!(classify("Extrato de Conta Corrente"), StatementKind::CurrentAccount);
    }

    #[test]
    fn cover_page_is_unknown() {
        assert_eq!(classify("Bem-vindo ao seu extrato"), StatementKind::Unknown);
        assert_eq!(classify(""), StatementKind::Unknown);
    }

    #[test]
    fn no_movement_sentinel() {
        assert!(is_no_movement("x NÃO HOUVE MOVIMENTO NO PERÍODO SOLICITADO. y"));
        assert!(!is_no_movement("HOUVE MOVIMENTO"));
    }
}
