use std::fmt::Write;

use crate::model::{AggregateStats, CodeMap};

/// Header line of the report artifact.
pub const REPORT_HEADER: &str = "Code NACRES\tMontant";
/// File name under which the artifact is offered to the caller.
pub const DEFAULT_REPORT_NAME: &str = "bilan_achats.tsv";

/// Serializes the merged mapping as tab-separated text: one header line, then
/// one line per code in ascending order with the amount printed to two
/// decimals.
pub fn render_report(merged: &CodeMap) -> String {
    let mut text = String::with_capacity(REPORT_HEADER.len() + 1 + merged.len() * 16);
    text.push_str(REPORT_HEADER);
    text.push('\n');
    for (code, amount) in merged {
        // writing to a String cannot fail
        let _ = writeln!(text, "{code}\t{amount:.2}");
    }
    text
}

/// Derives the four display counters from the three mappings.
pub fn compute_stats(cnrs: &CodeMap, insa: &CodeMap, merged: &CodeMap) -> AggregateStats {
    AggregateStats {
        cnrs_codes: cnrs.len(),
        insa_codes: insa.len(),
        merged_codes: merged.len(),
        total_amount: merged.values().sum(),
    }
}
