//! Export normalization.

use crate::document::model::ConfigurationDocument;

/// Drop empty top-level collections so generated YAML carries no
/// `actions: []` style noise.
///
/// Scalars are kept unconditionally. The function is idempotent.
pub fn normalize(document: ConfigurationDocument) -> ConfigurationDocument {
    ConfigurationDocument {
        listen_address: document.listen_address,
        log_level: document.log_level,
        actions: document.actions.filter(|items| !items.is_empty()),
        entities: document.entities.filter(|items| !items.is_empty()),
        dashboards: document.dashboards.filter(|items| !items.is_empty()),
    }
}
