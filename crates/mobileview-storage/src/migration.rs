//! 스키마 마이그레이션.
//!
//! `schema_version` 테이블에 적용된 버전을 기록하고, 아직 적용되지 않은
//! 단계만 순서대로 실행한다. 각 단계는 하나의 트랜잭션이다.

use rusqlite::{params, Connection};
use tracing::{debug, info};

/// (버전, SQL) 순서대로 나열
const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );",
)];

/// 최신 스키마 버전
pub const CURRENT_VERSION: u32 = MIGRATIONS[MIGRATIONS.len() - 1].0;

/// 미적용 마이그레이션 실행
pub fn run_migrations(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    if applied >= CURRENT_VERSION {
        debug!("스키마 최신 상태: v{applied}");
        return Ok(());
    }

    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > applied) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![version],
        )?;
        tx.commit()?;
        info!("스키마 v{version} 적용");
    }

    Ok(())
}
