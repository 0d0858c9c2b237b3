//! Port for class roster lookups.
//!
//! The roster is the source of truth for who must appear in an attendance
//! sheet or report: membership is never inferred from attendance history.

use async_trait::async_trait;

use crate::domain::attendance::RosterEntry;
use crate::domain::ids::ClassId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by roster provider adapters.
    pub enum RosterProviderError {
        /// Provider connection could not be established.
        Connection { message: String } =>
            "roster provider connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } =>
            "roster lookup failed: {message}",
    }
}

/// Port returning the ordered set of students enrolled in a class.
///
/// Entries are ordered by roll number. An unknown class yields an empty
/// roster rather than an error; callers that need existence checks use the
/// class repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// Fetch the current roster for `class_id`.
    async fn roster_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<RosterEntry>, RosterProviderError>;
}
