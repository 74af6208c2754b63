use std::io::Cursor;

use calamine::{DataType, Ods, Range, Reader};

use crate::error::{Result, ToolError};

/// Opens an ODS workbook from an in-memory byte buffer and returns the cell
/// range of its first sheet.
///
/// Both institutional exports ship as single-sheet workbooks, so the first
/// sheet is the only one the tool ever looks at.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Range<DataType>> {
    let mut workbook: Ods<_> = Ods::new(Cursor::new(bytes))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ToolError::InvalidLayout("workbook contains no sheets".into()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| ToolError::InvalidLayout(format!("missing sheet '{sheet_name}'")))?
        .map_err(ToolError::from)?;
    Ok(range)
}

/// Renders a cell as the string form used for category codes and header
/// matching. Empty cells become the empty string.
pub fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Coerces a cell to a monetary amount. String cells are parsed after
/// mapping the French decimal comma to a point; anything that does not parse
/// as a finite number yields `None`.
pub fn cell_to_amount(cell: Option<&DataType>) -> Option<f64> {
    let value = match cell {
        Some(DataType::Float(value)) => Some(*value),
        Some(DataType::Int(value)) => Some(*value as f64),
        Some(DataType::String(value)) => value.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod tests {
    use calamine::DataType;

    use super::{cell_to_amount, cell_to_string};

    #[test]
    fn string_coercion_covers_cell_kinds() {
        assert_eq!(cell_to_string(Some(&DataType::String("NB22".into()))), "NB22");
        assert_eq!(cell_to_string(Some(&DataType::Float(7010.0))), "7010");
        assert_eq!(cell_to_string(Some(&DataType::Int(42))), "42");
        assert_eq!(cell_to_string(Some(&DataType::Empty)), "");
        assert_eq!(cell_to_string(None), "");
    }

    #[test]
    fn amount_coercion_accepts_numeric_and_french_decimal_strings() {
        assert_eq!(cell_to_amount(Some(&DataType::Float(12.5))), Some(12.5));
        assert_eq!(cell_to_amount(Some(&DataType::Int(3))), Some(3.0));
        assert_eq!(cell_to_amount(Some(&DataType::String(" 12,50 ".into()))), Some(12.5));
        assert_eq!(cell_to_amount(Some(&DataType::String("12.50".into()))), Some(12.5));
    }

    #[test]
    fn amount_coercion_rejects_non_numeric_cells() {
        assert_eq!(cell_to_amount(Some(&DataType::String("ND".into()))), None);
        assert_eq!(cell_to_amount(Some(&DataType::String("".into()))), None);
        assert_eq!(cell_to_amount(Some(&DataType::Bool(true))), None);
        assert_eq!(cell_to_amount(Some(&DataType::Empty)), None);
        assert_eq!(cell_to_amount(None), None);
    }
}
