// ==========================================
// 测试线报价系统 - 价格目录仓储
// ==========================================
// 职责: station_catalog 表的读写 (站位单价 / 标准节拍)
// 成本引擎只通过 PriceCatalog trait 访问
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::domain::station::StationCode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// PriceCatalog - 价格目录接口
// ==========================================
pub trait PriceCatalog: Send {
    /// 站位治具单价; 目录中无记录时返回 None
    fn unit_price(&self, code: &StationCode) -> RepositoryResult<Option<f64>>;

    /// 站位标准节拍 (秒); 目录中无记录时返回 None
    fn typical_cycle_time(&self, code: &StationCode) -> RepositoryResult<Option<f64>>;

    /// 写入/更新目录记录 (导入器使用)
    fn upsert_station(
        &self,
        code: &StationCode,
        unit_price: f64,
        typical_cycle_time_sec: f64,
        description: Option<&str>,
    ) -> RepositoryResult<()>;
}

// ==========================================
// SqlitePriceCatalog - SQLite 实现
// ==========================================
pub struct SqlitePriceCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePriceCatalog {
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

    fn query_column(&self, code: &StationCode, column: &str) -> RepositoryResult<Option<f64>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let sql = format!(
            "SELECT {} FROM station_catalog WHERE station_code = ?1",
            column
        );
        let value = conn
            .query_row(&sql, params![code.as_str()], |row| row.get::<_, f64>(0))
            .optional()?;
        Ok(value)
    }
}

impl PriceCatalog for SqlitePriceCatalog {
    fn unit_price(&self, code: &StationCode) -> RepositoryResult<Option<f64>> {
        self.query_column(code, "unit_price")
    }

    fn typical_cycle_time(&self, code: &StationCode) -> RepositoryResult<Option<f64>> {
        self.query_column(code, "typical_cycle_time_sec")
    }

    fn upsert_station(
        &self,
        code: &StationCode,
        unit_price: f64,
        typical_cycle_time_sec: f64,
        description: Option<&str>,
    ) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.execute(
            "INSERT INTO station_catalog (station_code, unit_price, typical_cycle_time_sec, description)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(station_code) DO UPDATE SET
                 unit_price = excluded.unit_price,
                 typical_cycle_time_sec = excluded.typical_cycle_time_sec,
                 description = excluded.description",
            params![code.as_str(), unit_price, typical_cycle_time_sec, description],
        )?;
        Ok(())
    }
}

// ==========================================
// StaticPriceCatalog - 内存实现
// ==========================================
// 用途: 引擎单元测试、无数据库场景的快速估算
pub struct StaticPriceCatalog {
    entries: HashMap<String, (f64, f64)>, // code -> (unit_price, cycle_time_sec)
}

impl StaticPriceCatalog {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 登记站位 (代码按规范形式存储)
    pub fn insert(&mut self, code: &str, unit_price: f64, typical_cycle_time_sec: f64) {
        if let Some(code) = StationCode::new(code) {
            self.entries
                .insert(code.as_str().to_string(), (unit_price, typical_cycle_time_sec));
        }
    }
}

impl Default for StaticPriceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceCatalog for StaticPriceCatalog {
    fn unit_price(&self, code: &StationCode) -> RepositoryResult<Option<f64>> {
        Ok(self.entries.get(code.as_str()).map(|(price, _)| *price))
    }

    fn typical_cycle_time(&self, code: &StationCode) -> RepositoryResult<Option<f64>> {
        Ok(self.entries.get(code.as_str()).map(|(_, ct)| *ct))
    }

    fn upsert_station(
        &self,
        _code: &StationCode,
        _unit_price: f64,
        _typical_cycle_time_sec: f64,
        _description: Option<&str>,
    ) -> RepositoryResult<()> {
        Err(RepositoryError::DataError(
            "StaticPriceCatalog 为只读目录".to_string(),
        ))
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};

    fn create_catalog() -> SqlitePriceCatalog {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        SqlitePriceCatalog::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_upsert_and_query() {
        let catalog = create_catalog();
        let code = StationCode::new("MBT").unwrap();

        catalog.upsert_station(&code, 50_000.0, 20.0, Some("主板功能测试")).unwrap();
        assert_eq!(catalog.unit_price(&code).unwrap(), Some(50_000.0));
        assert_eq!(catalog.typical_cycle_time(&code).unwrap(), Some(20.0));

        // 更新覆盖
        catalog.upsert_station(&code, 55_000.0, 22.0, None).unwrap();
        assert_eq!(catalog.unit_price(&code).unwrap(), Some(55_000.0));
    }

    #[test]
    fn test_missing_station_is_none() {
        let catalog = create_catalog();
        let code = StationCode::new("NOPE").unwrap();
        assert_eq!(catalog.unit_price(&code).unwrap(), None);
        assert_eq!(catalog.typical_cycle_time(&code).unwrap(), None);
    }

    #[test]
    fn test_static_catalog() {
        let mut catalog = StaticPriceCatalog::new();
        catalog.insert(" mbt ", 1000.0, 20.0);

        let code = StationCode::new("MBT").unwrap();
        assert_eq!(catalog.unit_price(&code).unwrap(), Some(1000.0));
    }
}
