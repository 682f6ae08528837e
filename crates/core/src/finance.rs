//! Income and expense ledger used for the public transparency page.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Money;
use crate::validation::validate_one_of;

pub const TYPE_INCOME: &str = "income";
pub const TYPE_EXPENSE: &str = "expense";

pub const VALID_TYPES: &[&str] = &[TYPE_INCOME, TYPE_EXPENSE];

/// Header row of the admin CSV export.
pub const CSV_HEADERS: &[&str] = &["Date", "Type", "Category", "Description", "Amount", "Verified"];

pub fn validate_type(transaction_type: &str) -> Result<(), CoreError> {
    validate_one_of("transaction type", transaction_type, VALID_TYPES)
}

/// Totals shown on the transparency page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

impl FinancialSummary {
    /// Build a summary from raw sums; missing sums count as zero.
    pub fn from_totals(income: Option<Money>, expense: Option<Money>) -> Self {
        let income = income.unwrap_or(Decimal::ZERO);
        let expense = expense.unwrap_or(Decimal::ZERO);
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_is_income_minus_expense() {
        let s = FinancialSummary::from_totals(Some(Decimal::from(1200)), Some(Decimal::from(450)));
        assert_eq!(s.balance, Decimal::from(750));
    }

    #[test]
    fn missing_totals_are_zero() {
        let s = FinancialSummary::from_totals(None, Some(Decimal::from(30)));
        assert_eq!(s.income, Decimal::ZERO);
        assert_eq!(s.balance, Decimal::from(-30));
    }

    #[test]
    fn types() {
        assert!(validate_type(TYPE_EXPENSE).is_ok());
        assert!(validate_type("transfer").is_err());
    }
}
