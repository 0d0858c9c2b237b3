//! Offline repair utility for known attendance data-integrity gaps.
//!
//! Two repairs, both idempotent:
//!
//! 1. Realign the denormalised `class_id` on attendance records with each
//!    student's current enrolment class.
//! 2. Rewrite status labels outside `{Present, Absent}` to `Absent`.
//!
//! Run with `--dry-run` to report without writing.

use std::collections::HashMap;

use clap::Parser;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use backend::domain::AttendanceStatus;
use backend::outbound::persistence::schema::{attendance_records, students};
use backend::outbound::persistence::{DbPool, PoolConfig};

/// Repair denormalised attendance fields.
#[derive(Debug, Parser)]
#[command(name = "repair-relations")]
struct Args {
    /// Report what would change without writing.
    #[arg(long)]
    dry_run: bool,

    /// Database connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let pool = DbPool::new(PoolConfig::new(&args.database_url))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let realigned = realign_class_references(&pool, args.dry_run)
        .await
        .map_err(std::io::Error::other)?;
    info!(count = realigned, dry_run = args.dry_run, "class references realigned");

    let repaired = repair_status_labels(&pool, args.dry_run)
        .await
        .map_err(std::io::Error::other)?;
    info!(count = repaired, dry_run = args.dry_run, "status labels repaired");

    info!("repair completed, verify data and indexes");
    Ok(())
}

/// Point each record's `class_id` at the owning student's current class.
///
/// Records whose student no longer exists are left alone; there is nothing
/// to backfill from.
async fn realign_class_references(pool: &DbPool, dry_run: bool) -> Result<usize, String> {
    let mut conn = pool.get().await.map_err(|e| e.to_string())?;

    let enrolments: Vec<(Uuid, Uuid)> = students::table
        .select((students::id, students::class_id))
        .load(&mut conn)
        .await
        .map_err(|e| e.to_string())?;
    let enrolments: HashMap<Uuid, Uuid> = enrolments.into_iter().collect();

    let records: Vec<(Uuid, Uuid, Uuid)> = attendance_records::table
        .select((
            attendance_records::id,
            attendance_records::student_id,
            attendance_records::class_id,
        ))
        .load(&mut conn)
        .await
        .map_err(|e| e.to_string())?;

    let mut realigned = 0_usize;
    for (record_id, student_id, class_id) in records {
        let Some(&current_class) = enrolments.get(&student_id) else {
            continue;
        };
        if current_class == class_id {
            continue;
        }
        realigned += 1;
        if dry_run {
            continue;
        }
        diesel::update(attendance_records::table.find(record_id))
            .set((
                attendance_records::class_id.eq(current_class),
                attendance_records::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(|e| e.to_string())?;
    }
    Ok(realigned)
}

/// Rewrite status labels outside the enum to `Absent`.
async fn repair_status_labels(pool: &DbPool, dry_run: bool) -> Result<usize, String> {
    let mut conn = pool.get().await.map_err(|e| e.to_string())?;
    let valid = vec![
        AttendanceStatus::Present.as_str(),
        AttendanceStatus::Absent.as_str(),
    ];

    if dry_run {
        let invalid: i64 = attendance_records::table
            .filter(attendance_records::status.ne_all(valid))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|e| e.to_string())?;
        return Ok(invalid as usize);
    }

    diesel::update(attendance_records::table.filter(attendance_records::status.ne_all(valid)))
        .set((
            attendance_records::status.eq(AttendanceStatus::Absent.as_str()),
            attendance_records::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| e.to_string())
}
