// ==========================================
// 测试线报价系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、默认值兜底
// 存储: config_kv 表 (scope_id + key + value)
// 优先级在 SPEC 中一次性声明: 显式传入 > config_kv > 编译期默认
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键全集
// ==========================================
pub mod config_keys {
    /// 相似度匹配: 主结果最大条数
    pub const MATCH_DEFAULT_LIMIT: &str = "match/default_limit";
    /// 相似度匹配: 最低相似度阈值
    pub const MATCH_MIN_SIMILARITY: &str = "match/min_similarity";
    /// 成本估算: 默认目标 UPH
    pub const COST_DEFAULT_TARGET_UPH: &str = "cost/default_target_uph";
    /// 成本估算: 默认月产量
    pub const COST_DEFAULT_MONTHLY_VOLUME: &str = "cost/default_monthly_volume";
    /// 成本估算: 默认班次数
    pub const COST_DEFAULT_SHIFT_COUNT: &str = "cost/default_shift_count";
}

// ==========================================
// QuoteDefaults - 解析后的默认值快照
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteDefaults {
    pub match_limit: usize,
    pub min_similarity: u32,
    pub target_uph: f64,
    pub monthly_volume: f64,
    pub shift_count: i32,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            match_limit: 5,
            min_similarity: 60,
            target_uph: 100.0,
            monthly_volume: 10_000.0,
            shift_count: 2,
        }
    }
}

// ==========================================
// QuoteConfig - 配置管理器
// ==========================================
pub struct QuoteConfig {
    conn: Arc<Mutex<Connection>>,
}

impl QuoteConfig {
    /// 从数据库路径创建
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (对传入连接幂等应用统一 PRAGMA)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)
                .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入配置值 (scope_id='global')
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取可解析为 T 的配置, 缺失或解析失败时退回默认值
    ///
    /// 说明: 解析失败按"配置不存在"处理并记录告警, 不中断请求
    fn get_parsed_or<T: std::str::FromStr>(&self, key: &str, default: T) -> RepositoryResult<T> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "配置值无法解析, 使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 读取完整默认值快照
    pub fn defaults(&self) -> RepositoryResult<QuoteDefaults> {
        let compiled = QuoteDefaults::default();
        Ok(QuoteDefaults {
            match_limit: self
                .get_parsed_or(config_keys::MATCH_DEFAULT_LIMIT, compiled.match_limit)?,
            min_similarity: self
                .get_parsed_or(config_keys::MATCH_MIN_SIMILARITY, compiled.min_similarity)?,
            target_uph: self
                .get_parsed_or(config_keys::COST_DEFAULT_TARGET_UPH, compiled.target_uph)?,
            monthly_volume: self.get_parsed_or(
                config_keys::COST_DEFAULT_MONTHLY_VOLUME,
                compiled.monthly_volume,
            )?,
            shift_count: self
                .get_parsed_or(config_keys::COST_DEFAULT_SHIFT_COUNT, compiled.shift_count)?,
        })
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};

    fn create_config() -> QuoteConfig {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        QuoteConfig::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = create_config();
        let defaults = config.defaults().unwrap();
        assert_eq!(defaults.match_limit, 5);
        assert_eq!(defaults.min_similarity, 60);
        assert_eq!(defaults.shift_count, 2);
    }

    #[test]
    fn test_config_kv_overrides_compiled_default() {
        let config = create_config();
        config
            .set_config_value(config_keys::MATCH_MIN_SIMILARITY, "75")
            .unwrap();
        config
            .set_config_value(config_keys::COST_DEFAULT_TARGET_UPH, "250")
            .unwrap();

        let defaults = config.defaults().unwrap();
        assert_eq!(defaults.min_similarity, 75);
        assert_eq!(defaults.target_uph, 250.0);
    }

    #[test]
    fn test_unparseable_value_falls_back() {
        let config = create_config();
        config
            .set_config_value(config_keys::MATCH_DEFAULT_LIMIT, "not-a-number")
            .unwrap();

        let defaults = config.defaults().unwrap();
        assert_eq!(defaults.match_limit, 5);
    }
}
