use std::collections::BTreeMap;

use serde::Serialize;

/// NACRES category code. Kept as a plain string: codes are opaque keys and
/// only ever compared for equality and lexicographic order.
pub type CategoryCode = String;

/// Code → total amount mapping built per source and for the merged result.
/// `BTreeMap` keeps report rows sorted by code without an extra pass.
pub type CodeMap = BTreeMap<CategoryCode, f64>;

/// Reason a source row was excluded from a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The code cell was empty after normalization.
    BlankCode,
    /// The amount cell was empty or could not be coerced to a number.
    NonNumericAmount,
}

/// Outcome of validating a single data row of a source export.
///
/// Rows are classified before anything is folded into a mapping so the drop
/// policy is observable in tests and in logs instead of happening as a silent
/// mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// The row carries a usable code and amount.
    Kept { code: CategoryCode, amount: f64 },
    /// The row was excluded from aggregation.
    Dropped { reason: DropReason },
}

/// Summary counters reported alongside the rendered artifact. These mirror
/// the four metrics the tool displays and are not part of the artifact
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    /// Number of distinct codes contributed by the CNRS export.
    pub cnrs_codes: usize,
    /// Number of distinct codes contributed by the INSA export.
    pub insa_codes: usize,
    /// Number of distinct codes in the merged result.
    pub merged_codes: usize,
    /// Grand total of all merged amounts.
    pub total_amount: f64,
}

/// Rounds a monetary value to two decimal places.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::round_to_cents;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_cents(20.004), 20.0);
        assert_eq!(round_to_cents(20.006), 20.01);
        assert_eq!(round_to_cents(-3.556), -3.56);
        assert_eq!(round_to_cents(100.0), 100.0);
    }
}
