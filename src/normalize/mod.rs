//! Normalizers turning the two institutional exports into code → amount
//! mappings.
//!
//! Each normalizer works in two stages: a scan that classifies every data row
//! into an explicit [`RowOutcome`], then a fold of the kept rows into a
//! [`CodeMap`]. Keeping the scan separate makes the drop policy (blank codes,
//! non-numeric amounts) directly observable instead of a silent side effect
//! of building the mapping.

use calamine::{DataType, Range};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::io::ods_read::{cell_to_amount, cell_to_string};
use crate::model::{CodeMap, DropReason, RowOutcome, round_to_cents};

/// Fixed-offset layout of the GESLAB (CNRS) export. The sheet carries no
/// usable column names, so positions are pinned explicitly and checked
/// against the actual sheet width before any row is read.
#[derive(Debug, Clone, Copy)]
pub struct GeslabLayout {
    /// Leading non-data rows, header row included.
    pub header_rows: usize,
    /// Subtotal/label rows sitting between the header block and the data.
    pub subtotal_rows: usize,
    /// Zero-based column holding the NACRES code.
    pub code_col: usize,
    /// Zero-based column holding the HT total.
    pub amount_col: usize,
}

/// Layout of the GESLAB export as produced by the CNRS management tool.
pub const GESLAB_LAYOUT: GeslabLayout = GeslabLayout {
    header_rows: 4,
    subtotal_rows: 1,
    code_col: 0,
    amount_col: 20,
};

/// Header of the purchase-code column in the INSA export.
pub const INSA_CODE_COLUMN: &str = "Code achat";
/// Header of the budgetary-amount column in the INSA export.
pub const INSA_AMOUNT_COLUMN: &str = "Montant budgétaire répartition";

/// Canonical form of a category code: surrounding whitespace trimmed and `.`
/// separators removed, so variants such as `A.123` and `A123` denote the
/// same category in both exports.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().replace('.', "")
}

/// Classifies one data row given its code and amount cells.
pub fn classify_row(code: Option<&DataType>, amount: Option<&DataType>) -> RowOutcome {
    let code = normalize_code(&cell_to_string(code));
    if code.is_empty() {
        return RowOutcome::Dropped {
            reason: DropReason::BlankCode,
        };
    }
    match cell_to_amount(amount) {
        Some(amount) => RowOutcome::Kept { code, amount },
        None => RowOutcome::Dropped {
            reason: DropReason::NonNumericAmount,
        },
    }
}

/// Scans the GESLAB sheet and classifies every data row.
///
/// Fails if the sheet is narrower than the layout's amount column, which is
/// the symptom of an export whose structure shifted.
pub fn geslab_rows(range: &Range<DataType>, layout: &GeslabLayout) -> Result<Vec<RowOutcome>> {
    if range.width() <= layout.amount_col {
        return Err(ToolError::InvalidLayout(format!(
            "GESLAB sheet is {} columns wide, expected the amount in column {}",
            range.width(),
            layout.amount_col + 1
        )));
    }

    Ok(range
        .rows()
        .skip(layout.header_rows + layout.subtotal_rows)
        .map(|row| classify_row(row.get(layout.code_col), row.get(layout.amount_col)))
        .collect())
}

/// Builds the GESLAB code → amount mapping. Codes are unique in this export
/// (it is already aggregated upstream); a duplicated code keeps the last
/// amount seen, matching a plain map insert.
pub fn normalize_geslab(range: &Range<DataType>) -> Result<CodeMap> {
    let outcomes = geslab_rows(range, &GESLAB_LAYOUT)?;
    let mut mapping = CodeMap::new();
    let mut dropped = 0usize;

    for outcome in outcomes {
        match outcome {
            RowOutcome::Kept { code, amount } => {
                mapping.insert(code, amount);
            }
            RowOutcome::Dropped { reason } => {
                debug!(?reason, "dropped GESLAB row");
                dropped += 1;
            }
        }
    }

    debug!(codes = mapping.len(), dropped, "GESLAB export normalized");
    Ok(mapping)
}

/// Scans the INSA sheet and classifies every transaction row. The two named
/// columns are located from the header row; a missing header is a layout
/// failure, not a droppable row.
pub fn insa_rows(range: &Range<DataType>) -> Result<Vec<RowOutcome>> {
    let header = range.rows().next().ok_or_else(|| missing_column(INSA_CODE_COLUMN))?;
    let code_col = find_column(header, INSA_CODE_COLUMN)?;
    let amount_col = find_column(header, INSA_AMOUNT_COLUMN)?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| classify_row(row.get(code_col), row.get(amount_col)))
        .collect())
}

/// Builds the INSA code → amount mapping. The export has one row per
/// transaction line, so amounts for a repeated code accumulate; each row's
/// amount is rounded to cents before it is added.
pub fn normalize_insa(range: &Range<DataType>) -> Result<CodeMap> {
    let outcomes = insa_rows(range)?;
    let mut mapping = CodeMap::new();
    let mut dropped = 0usize;

    for outcome in outcomes {
        match outcome {
            RowOutcome::Kept { code, amount } => {
                *mapping.entry(code).or_insert(0.0) += round_to_cents(amount);
            }
            RowOutcome::Dropped { reason } => {
                debug!(?reason, "dropped INSA row");
                dropped += 1;
            }
        }
    }

    debug!(codes = mapping.len(), dropped, "INSA export normalized");
    Ok(mapping)
}

fn find_column(header: &[DataType], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell_to_string(Some(cell)).trim() == name)
        .ok_or_else(|| missing_column(name))
}

fn missing_column(name: &str) -> ToolError {
    ToolError::MissingColumn {
        export: "INSA".into(),
        column: name.into(),
    }
}

#[cfg(test)]
mod tests {
    use calamine::{DataType, Range};

    use super::*;
    use crate::model::{DropReason, RowOutcome};

    fn geslab_range(data_rows: &[(&str, Option<f64>)]) -> Range<DataType> {
        let offset = (GESLAB_LAYOUT.header_rows + GESLAB_LAYOUT.subtotal_rows) as u32;
        let amount_col = GESLAB_LAYOUT.amount_col as u32;
        let height = offset + data_rows.len() as u32;
        let mut range = Range::new((0, 0), (height.max(1) - 1, amount_col));
        range.set_value((0, 0), DataType::String("Synthèse".into()));
        // header row wide enough to cover the amount column
        range.set_value((3, amount_col), DataType::String("Total HT".into()));
        // subtotal row that must be skipped
        range.set_value((4, 0), DataType::String("TOTAL".into()));
        range.set_value((4, amount_col), DataType::Float(9999.99));
        for (i, (code, amount)) in data_rows.iter().enumerate() {
            let row = offset + i as u32;
            range.set_value((row, 0), DataType::String((*code).into()));
            if let Some(amount) = amount {
                range.set_value((row, amount_col), DataType::Float(*amount));
            }
        }
        range
    }

    fn insa_range(data_rows: &[(&str, DataType)]) -> Range<DataType> {
        let mut range = Range::new((0, 0), (data_rows.len() as u32, 2));
        range.set_value((0, 0), DataType::String("Fournisseur".into()));
        range.set_value((0, 1), DataType::String(INSA_CODE_COLUMN.into()));
        range.set_value((0, 2), DataType::String(INSA_AMOUNT_COLUMN.into()));
        for (i, (code, amount)) in data_rows.iter().enumerate() {
            let row = i as u32 + 1;
            range.set_value((row, 0), DataType::String(format!("AC{row:02}")));
            range.set_value((row, 1), DataType::String((*code).into()));
            range.set_value((row, 2), amount.clone());
        }
        range
    }

    #[test]
    fn code_normalization_strips_dots_and_whitespace() {
        assert_eq!(normalize_code(" A.123 "), "A123");
        assert_eq!(normalize_code("7010"), "7010");
        assert_eq!(normalize_code("  "), "");
    }

    #[test]
    fn geslab_skips_header_and_subtotal_rows() {
        let range = geslab_range(&[("7010", Some(100.0)), ("7020", Some(250.5))]);
        let mapping = normalize_geslab(&range).expect("GESLAB normalized");
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["7010"], 100.0);
        assert_eq!(mapping["7020"], 250.5);
    }

    #[test]
    fn geslab_drops_rows_with_missing_amounts_without_failing() {
        let range = geslab_range(&[("7010", Some(100.0)), ("7030", None), ("9000", Some(12.34))]);
        let outcomes = geslab_rows(&range, &GESLAB_LAYOUT).expect("rows scanned");
        assert_eq!(
            outcomes[1],
            RowOutcome::Dropped {
                reason: DropReason::NonNumericAmount
            }
        );
        let mapping = normalize_geslab(&range).expect("GESLAB normalized");
        assert!(!mapping.contains_key("7030"));
        assert_eq!(mapping.len(), 2);
    }

    #[test]
    fn geslab_rejects_sheets_narrower_than_the_layout() {
        let mut range = Range::new((0, 0), (5, 2));
        range.set_value((0, 0), DataType::String("Code".into()));
        let error = normalize_geslab(&range).expect_err("narrow sheet rejected");
        assert!(matches!(error, ToolError::InvalidLayout(_)));
    }

    #[test]
    fn insa_sums_repeated_codes_to_two_decimals() {
        let range = insa_range(&[
            ("7010", DataType::Float(25.25)),
            ("7010", DataType::Float(10.004)),
            ("8020", DataType::Float(20.0)),
        ]);
        let mapping = normalize_insa(&range).expect("INSA normalized");
        assert_eq!(mapping["7010"], 35.25);
        assert_eq!(mapping["8020"], 20.0);
    }

    #[test]
    fn insa_drops_whole_rows_with_non_numeric_amounts() {
        let range = insa_range(&[
            ("7010", DataType::Float(5.0)),
            ("B555", DataType::String("ND".into())),
            ("", DataType::Float(4.0)),
        ]);
        let outcomes = insa_rows(&range).expect("rows scanned");
        assert_eq!(
            outcomes[1],
            RowOutcome::Dropped {
                reason: DropReason::NonNumericAmount
            }
        );
        assert_eq!(
            outcomes[2],
            RowOutcome::Dropped {
                reason: DropReason::BlankCode
            }
        );
        let mapping = normalize_insa(&range).expect("INSA normalized");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["7010"], 5.0);
    }

    #[test]
    fn insa_unifies_dotted_code_variants() {
        let range = insa_range(&[
            ("A.123", DataType::Float(1.0)),
            ("A123", DataType::Float(2.0)),
        ]);
        let mapping = normalize_insa(&range).expect("INSA normalized");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["A123"], 3.0);
    }

    #[test]
    fn insa_requires_both_named_columns() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), DataType::String("Fournisseur".into()));
        range.set_value((0, 1), DataType::String(INSA_CODE_COLUMN.into()));
        let error = normalize_insa(&range).expect_err("missing amount column rejected");
        assert!(matches!(
            error,
            ToolError::MissingColumn { column, .. } if column == INSA_AMOUNT_COLUMN
        ));
    }
}
