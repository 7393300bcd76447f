use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::LenderProfile;

/// Immutable lender panel shared read-only by every analysis request.
///
/// Built once at startup from already-parsed profiles; iteration order is the
/// configured order and doubles as the tie-break when confidence scores match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LenderCatalog {
    lenders: Vec<LenderProfile>,
}

impl LenderCatalog {
    pub fn new(lenders: Vec<LenderProfile>) -> Self {
        Self { lenders }
    }

    /// Catalog with no lenders; every analysis over it is an empty result set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON source, degrading to an empty panel when
    /// the document is malformed. A missing or broken rate-sheet file must
    /// never take the desk down.
    pub fn from_json_str(source: &str) -> Self {
        match serde_json::from_str::<Vec<LenderProfile>>(source) {
            Ok(lenders) => Self::new(lenders),
            Err(error) => {
                warn!(%error, "lender catalog unreadable, continuing with empty panel");
                Self::empty()
            }
        }
    }

    pub fn lenders(&self) -> &[LenderProfile] {
        &self.lenders
    }

    pub fn len(&self) -> usize {
        self.lenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lenders.is_empty()
    }
}
