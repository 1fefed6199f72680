//! Options for building and checking a model.

use serde::{Deserialize, Serialize};

use crate::logic::SabotageScope;

/// Configuration of a [`Model`](crate::model::Model).
///
/// ```
/// use kripke_rs::config::CheckOptions;
/// use kripke_rs::logic::SabotageScope;
///
/// let options = CheckOptions {
///     sabotage_scope: SabotageScope::Base,
///     ..CheckOptions::default()
/// };
/// assert_eq!(options.storage_bits, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Initial size of the BDD node table, as a power of two (default: 16)
    pub storage_bits: usize,
    /// Relation seen by `<>`/`[]` in sabotage formulas (default: current)
    pub sabotage_scope: SabotageScope,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            storage_bits: 16,
            sabotage_scope: SabotageScope::Current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options() {
        let options: CheckOptions = serde_json::from_str(r#"{"sabotage_scope": "base"}"#).unwrap();
        assert_eq!(options.storage_bits, 16);
        assert_eq!(options.sabotage_scope, SabotageScope::Base);

        let options: CheckOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CheckOptions::default());
    }
}
