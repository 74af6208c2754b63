use crate::model::CodeMap;

/// Merges the two source mappings by summing amounts for shared codes.
///
/// Codes present in only one source keep their amount unchanged, so merging
/// with an empty mapping on either side returns the other mapping as is.
pub fn merge(cnrs: &CodeMap, insa: &CodeMap) -> CodeMap {
    let mut merged = cnrs.clone();
    for (code, amount) in insa {
        *merged.entry(code.clone()).or_insert(0.0) += amount;
    }
    merged
}
