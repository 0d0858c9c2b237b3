//! Port resolving subject identifiers to display names.
//!
//! Used by the per-student report to label its per-subject buckets. Ids the
//! directory cannot resolve simply stay absent from the returned map; the
//! report buckets those records under `"Unknown"`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::ids::SubjectId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by subject directory adapters.
    pub enum SubjectDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "subject directory connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "subject name lookup failed: {message}",
    }
}

/// Port mapping subject ids to their display names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubjectDirectory: Send + Sync {
    /// Resolve display names for the given ids. Unresolvable ids are left
    /// out of the map.
    async fn subject_names(
        &self,
        ids: Vec<SubjectId>,
    ) -> Result<HashMap<SubjectId, String>, SubjectDirectoryError>;
}
