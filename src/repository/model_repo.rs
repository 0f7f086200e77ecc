// ==========================================
// 测试线报价系统 - 历史机种仓储
// ==========================================
// 职责: historical_model / model_station 表的读写
// 引擎只通过 ModelRepository trait 访问 (窄接口)
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::domain::model::{BoardStations, HistoricalModel, StationRecord};
use crate::domain::station::StationCode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ModelRepository - 机种仓储接口
// ==========================================
// 引擎消费的唯一读边界; 获取失败原样向上传播
pub trait ModelRepository: Send {
    /// 按客户取机种 (customer_id 精确匹配)
    fn fetch_models_by_customer(&self, customer_id: &str) -> RepositoryResult<Vec<HistoricalModel>>;

    /// 取全部机种
    fn fetch_all_models(&self) -> RepositoryResult<Vec<HistoricalModel>>;

    /// 按主键取单一机种
    fn fetch_model(&self, model_id: &str) -> RepositoryResult<Option<HistoricalModel>>;

    /// 按机种代码取单一机种 (导入器幂等性使用)
    fn fetch_model_by_code(&self, model_code: &str) -> RepositoryResult<Option<HistoricalModel>>;

    /// 保存机种 (upsert, 导入器使用)
    fn save_model(&self, model: &HistoricalModel) -> RepositoryResult<()>;
}

// ==========================================
// SqliteModelRepository - SQLite 实现
// ==========================================
pub struct SqliteModelRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteModelRepository {
    /// 从数据库路径创建
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
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

    /// 查询机种主记录并装载站位明细
    fn load_models(
        &self,
        conn: &Connection,
        where_clause: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<HistoricalModel>> {
        let sql = format!(
            "SELECT model_id, model_code, customer_id, created_at
             FROM historical_model {} ORDER BY model_code",
            where_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let headers: Vec<(String, String, Option<String>, NaiveDateTime)> = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, NaiveDateTime>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut models = Vec::with_capacity(headers.len());
        for (model_id, model_code, customer_id, created_at) in headers {
            let boards = self.load_boards(conn, &model_id)?;
            models.push(HistoricalModel {
                model_id,
                model_code,
                customer_id,
                boards,
                created_at,
            });
        }
        Ok(models)
    }

    /// 装载单机种的板别站位明细 (板别字母序, 板内按 seq_no)
    fn load_boards(&self, conn: &Connection, model_id: &str) -> RepositoryResult<Vec<BoardStations>> {
        let mut stmt = conn.prepare(
            "SELECT board_type, station_code, seq_no, quantity, manpower, cycle_time_sec, unit_price
             FROM model_station WHERE model_id = ?1
             ORDER BY board_type, seq_no",
        )?;

        let rows: Vec<(String, String, i32, i32, f64, f64, Option<f64>)> = stmt
            .query_map(params![model_id], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut boards: Vec<BoardStations> = Vec::new();
        for (board_type, code, seq_no, quantity, manpower, cycle_time_sec, unit_price) in rows {
            let station_code = StationCode::new(&code).ok_or_else(|| {
                RepositoryError::DataError(format!(
                    "机种 {} 存在空站位代码 (board {})",
                    model_id, board_type
                ))
            })?;
            let record = StationRecord {
                station_code,
                seq_no,
                quantity,
                manpower,
                cycle_time_sec,
                unit_price,
            };

            match boards.last_mut() {
                Some(board) if board.board_type == board_type => board.stations.push(record),
                _ => boards.push(BoardStations {
                    board_type,
                    stations: vec![record],
                }),
            }
        }
        Ok(boards)
    }
}

impl ModelRepository for SqliteModelRepository {
    fn fetch_models_by_customer(&self, customer_id: &str) -> RepositoryResult<Vec<HistoricalModel>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        self.load_models(&conn, "WHERE customer_id = ?1", &[&customer_id])
    }

    fn fetch_all_models(&self) -> RepositoryResult<Vec<HistoricalModel>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        self.load_models(&conn, "", &[])
    }

    fn fetch_model(&self, model_id: &str) -> RepositoryResult<Option<HistoricalModel>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let mut models = self.load_models(&conn, "WHERE model_id = ?1", &[&model_id])?;
        Ok(models.pop())
    }

    fn fetch_model_by_code(&self, model_code: &str) -> RepositoryResult<Option<HistoricalModel>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let mut models = self.load_models(&conn, "WHERE model_code = ?1", &[&model_code])?;
        Ok(models.pop())
    }

    fn save_model(&self, model: &HistoricalModel) -> RepositoryResult<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO historical_model (model_id, model_code, customer_id, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(model_id) DO UPDATE SET
                 model_code = excluded.model_code,
                 customer_id = excluded.customer_id",
            params![
                model.model_id,
                model.model_code,
                model.customer_id,
                model.created_at
            ],
        )?;

        // 站位明细整体替换
        tx.execute(
            "DELETE FROM model_station WHERE model_id = ?1",
            params![model.model_id],
        )?;
        for board in &model.boards {
            for station in &board.stations {
                tx.execute(
                    "INSERT INTO model_station
                     (model_id, board_type, station_code, seq_no, quantity, manpower, cycle_time_sec, unit_price)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        model.model_id,
                        board.board_type,
                        station.station_code.as_str(),
                        station.seq_no,
                        station.quantity,
                        station.manpower,
                        station.cycle_time_sec,
                        station.unit_price
                    ],
                )?;
            }
        }
        tx.commit()?;

        tracing::debug!(model_id = %model.model_id, "机种已保存");
        Ok(())
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, open_in_memory_connection};
    use chrono::NaiveDate;

    fn create_repo() -> SqliteModelRepository {
        let conn = open_in_memory_connection().unwrap();
        init_schema(&conn).unwrap();
        SqliteModelRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    fn create_test_model(model_id: &str, model_code: &str, customer: Option<&str>) -> HistoricalModel {
        HistoricalModel {
            model_id: model_id.to_string(),
            model_code: model_code.to_string(),
            customer_id: customer.map(|s| s.to_string()),
            boards: vec![BoardStations {
                board_type: "MAIN".to_string(),
                stations: vec![StationRecord {
                    station_code: StationCode::new("MBT").unwrap(),
                    seq_no: 1,
                    quantity: 2,
                    manpower: 0.5,
                    cycle_time_sec: 20.0,
                    unit_price: Some(50_000.0),
                }],
            }],
            created_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_save_and_fetch_model() {
        let repo = create_repo();
        let model = create_test_model("M001", "PX100", Some("CUST-A"));
        repo.save_model(&model).unwrap();

        let loaded = repo.fetch_model("M001").unwrap().unwrap();
        assert_eq!(loaded.model_code, "PX100");
        assert_eq!(loaded.boards.len(), 1);
        assert_eq!(loaded.boards[0].stations[0].station_code.as_str(), "MBT");
        assert_eq!(loaded.boards[0].stations[0].quantity, 2);
    }

    #[test]
    fn test_fetch_model_not_found() {
        let repo = create_repo();
        assert!(repo.fetch_model("NOPE").unwrap().is_none());
    }

    #[test]
    fn test_fetch_by_customer() {
        let repo = create_repo();
        repo.save_model(&create_test_model("M001", "PX100", Some("CUST-A")))
            .unwrap();
        repo.save_model(&create_test_model("M002", "PX200", Some("CUST-B")))
            .unwrap();

        let models = repo.fetch_models_by_customer("CUST-A").unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].model_code, "PX100");

        assert_eq!(repo.fetch_all_models().unwrap().len(), 2);
    }

    #[test]
    fn test_save_model_upsert_replaces_stations() {
        let repo = create_repo();
        let mut model = create_test_model("M001", "PX100", None);
        repo.save_model(&model).unwrap();

        model.boards[0].stations.push(StationRecord {
            station_code: StationCode::new("CAL").unwrap(),
            seq_no: 2,
            quantity: 1,
            manpower: 1.0,
            cycle_time_sec: 30.0,
            unit_price: None,
        });
        repo.save_model(&model).unwrap();

        let loaded = repo.fetch_model("M001").unwrap().unwrap();
        assert_eq!(loaded.boards[0].stations.len(), 2);
    }
}
