//! PostgreSQL-backed [`RosterProvider`] implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::attendance::RosterEntry;
use crate::domain::ids::{ClassId, StudentId};
use crate::domain::ports::{RosterProvider, RosterProviderError};

use super::pool::{DbPool, PoolError};
use super::schema::students;

/// Diesel-backed implementation of the [`RosterProvider`] port.
///
/// The roster is ordered by roll number; an unknown class simply yields an
/// empty roster.
#[derive(Clone)]
pub struct DieselRosterProvider {
    pool: DbPool,
}

impl DieselRosterProvider {
    /// Create a new provider with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RosterProviderError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            RosterProviderError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RosterProviderError {
    debug!(error = %error, "roster lookup failed");
    RosterProviderError::query(error.to_string())
}

#[async_trait]
impl RosterProvider for DieselRosterProvider {
    async fn roster_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<RosterEntry>, RosterProviderError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(Uuid, String, String)> = students::table
            .filter(students::class_id.eq(*class_id.as_uuid()))
            .order_by(students::roll_no)
            .select((students::id, students::name, students::roll_no))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name, roll_no)| RosterEntry {
                student_id: StudentId::new(id),
                name,
                roll_no,
            })
            .collect())
    }
}
