// ==========================================
// 测试线报价系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一建表入口（目录库仅四张表，不走外部迁移脚本）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存数据库（测试用）并应用统一配置
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化目录库 schema（幂等）
///
/// 表:
/// - historical_model: 历史机种主表
/// - model_station: 机种站位明细（按板别）
/// - station_catalog: 站位价格/标准 CT 目录
/// - config_kv: 请求默认值配置
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS historical_model (
            model_id    TEXT PRIMARY KEY,
            model_code  TEXT NOT NULL UNIQUE,
            customer_id TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS model_station (
            model_id       TEXT NOT NULL REFERENCES historical_model(model_id),
            board_type     TEXT NOT NULL,
            station_code   TEXT NOT NULL,
            seq_no         INTEGER NOT NULL,
            quantity       INTEGER NOT NULL,
            manpower       REAL NOT NULL,
            cycle_time_sec REAL NOT NULL,
            unit_price     REAL,
            PRIMARY KEY (model_id, board_type, station_code)
        );

        CREATE TABLE IF NOT EXISTS station_catalog (
            station_code           TEXT PRIMARY KEY,
            unit_price             REAL NOT NULL,
            typical_cycle_time_sec REAL NOT NULL,
            description            TEXT
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );",
    )?;
    Ok(())
}
