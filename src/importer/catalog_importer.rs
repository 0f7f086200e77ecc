// ==========================================
// 测试线报价系统 - 目录导入器
// ==========================================
// 职责: 机种目录 / 价格目录文件 → 仓储
// 流程: 解析 → 映射 → 按机种分组 → 保存
// 红线: 行级错误带行号报出, 不静默跳过坏行
// ==========================================

use crate::domain::model::{BoardStations, HistoricalModel, StationRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::station_row::{CatalogRow, RowMapper};
use crate::repository::model_repo::ModelRepository;
use crate::repository::price_repo::PriceCatalog;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

// ==========================================
// ImportSummary - 导入结果汇总
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub models_imported: usize,   // 导入机种数
    pub stations_imported: usize, // 导入站位行数
}

// ==========================================
// CatalogImporter - 目录导入器
// ==========================================
pub struct CatalogImporter {
    parser: UniversalFileParser,
    mapper: RowMapper,
}

impl CatalogImporter {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            mapper: RowMapper,
        }
    }

    /// 导入历史机种目录 (一行一站位, 按机种代码分组)
    ///
    /// 幂等性: 机种代码已存在时复用其 model_id, 站位明细整体替换
    pub fn import_models<P: AsRef<Path>>(
        &self,
        file_path: P,
        repo: &dyn ModelRepository,
    ) -> ImportResult<ImportSummary> {
        let records = self.parser.parse(&file_path)?;
        if records.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        // 行号从 2 起 (1 为表头), 与源文件一致
        let rows: Vec<CatalogRow> = records
            .iter()
            .enumerate()
            .map(|(i, record)| self.mapper.map_catalog_row(record, i + 2))
            .collect::<ImportResult<Vec<_>>>()?;

        let station_count = rows.len();
        let models = self.group_rows(rows);
        let model_count = models.len();

        for mut model in models {
            if let Some(existing) = repo.fetch_model_by_code(&model.model_code)? {
                model.model_id = existing.model_id;
                model.created_at = existing.created_at;
            }
            repo.save_model(&model)?;
        }

        tracing::info!(
            models = model_count,
            stations = station_count,
            "机种目录导入完成"
        );

        Ok(ImportSummary {
            models_imported: model_count,
            stations_imported: station_count,
        })
    }

    /// 导入站位价格目录
    pub fn import_price_catalog<P: AsRef<Path>>(
        &self,
        file_path: P,
        catalog: &dyn PriceCatalog,
    ) -> ImportResult<usize> {
        let records = self.parser.parse(&file_path)?;
        if records.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        let mut imported = 0;
        for (i, record) in records.iter().enumerate() {
            let row = self.mapper.map_price_row(record, i + 2)?;
            catalog.upsert_station(
                &row.station_code,
                row.unit_price,
                row.typical_cycle_time_sec,
                row.description.as_deref(),
            )?;
            imported += 1;
        }

        tracing::info!(stations = imported, "价格目录导入完成");
        Ok(imported)
    }

    /// 按机种代码分组为 HistoricalModel (保留行出现顺序)
    fn group_rows(&self, rows: Vec<CatalogRow>) -> Vec<HistoricalModel> {
        let mut models: Vec<HistoricalModel> = Vec::new();

        for row in rows {
            let record = StationRecord {
                station_code: row.station_code,
                seq_no: row.seq_no,
                quantity: row.quantity,
                manpower: row.manpower,
                cycle_time_sec: row.cycle_time_sec,
                unit_price: row.unit_price,
            };

            let idx = match models.iter().position(|m| m.model_code == row.model_code) {
                Some(i) => i,
                None => {
                    models.push(HistoricalModel {
                        model_id: Uuid::new_v4().to_string(),
                        model_code: row.model_code.clone(),
                        customer_id: row.customer_id.clone(),
                        boards: Vec::new(),
                        created_at: Utc::now().naive_utc(),
                    });
                    models.len() - 1
                }
            };
            let model = &mut models[idx];

            match model
                .boards
                .iter_mut()
                .find(|b| b.board_type == row.board_type)
            {
                Some(board) => board.stations.push(record),
                None => model.boards.push(BoardStations {
                    board_type: row.board_type,
                    stations: vec![record],
                }),
            }
        }

        models
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for CatalogImporter {
    fn default() -> Self {
        Self::new()
    }
}
