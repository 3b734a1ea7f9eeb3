//! Node labeling rule

use crate::errors::GraphConstructionError;
use crate::value_objects::{LabelMode, NodeKind, StandardType, BLANK_STANDARD_LABEL};

/// Label a standard node.
///
/// Under ASN labels every standard shows its Id. Under NGSS labels CC and
/// SEP standards render the blank placeholder and the rest show their NGSS
/// code (blank when the record has none). Any other kind is an error.
pub fn standard_label(
    id: &str,
    kind: &NodeKind,
    ngss_code: Option<&str>,
    mode: LabelMode,
) -> Result<String, GraphConstructionError> {
    let standard_type = match kind {
        NodeKind::Standard(t) if !matches!(t, StandardType::Unrecognized(_)) => t,
        other => {
            return Err(GraphConstructionError::Unlabelable {
                id: id.to_string(),
                kind: other.to_string(),
            })
        }
    };

    Ok(match (mode, standard_type) {
        (LabelMode::Asn, _) => id.to_string(),
        (LabelMode::Ngss, StandardType::Cc | StandardType::Sep) => BLANK_STANDARD_LABEL.to_string(),
        (LabelMode::Ngss, _) => ngss_code
            .map(str::to_string)
            .unwrap_or_else(|| BLANK_STANDARD_LABEL.to_string()),
    })
}
