// ==========================================
// 测试线报价系统 - 行字段映射器
// ==========================================
// 职责: 源字段 → 标准字段映射 + 类型转换
// 表头支持中英文别名 (客户导出格式不统一)
// ==========================================

use crate::domain::station::StationCode;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

// ==========================================
// CatalogRow - 机种目录行 (一行一站位)
// ==========================================
#[derive(Debug, Clone)]
pub struct CatalogRow {
    pub model_code: String,          // 机种代码 (必填)
    pub customer_id: Option<String>, // 客户
    pub board_type: String,          // 板别 (缺省 MAIN)
    pub station_code: StationCode,   // 站位代码 (必填)
    pub seq_no: i32,                 // 工序顺序号
    pub quantity: i32,               // 台数 (缺省 1)
    pub manpower: f64,               // 单台人力 (缺省 0)
    pub cycle_time_sec: f64,         // 节拍 (缺省 0)
    pub unit_price: Option<f64>,     // 治具单价
    pub row_number: usize,           // 源文件行号 (报错用)
}

// ==========================================
// PriceRow - 站位价格目录行
// ==========================================
#[derive(Debug, Clone)]
pub struct PriceRow {
    pub station_code: StationCode,   // 站位代码 (必填)
    pub unit_price: f64,             // 单价 (必填)
    pub typical_cycle_time_sec: f64, // 标准节拍 (必填)
    pub description: Option<String>, // 描述
    pub row_number: usize,
}

// ==========================================
// RowMapper - 字段映射器
// ==========================================
pub struct RowMapper;

impl RowMapper {
    /// 机种目录行映射
    pub fn map_catalog_row(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<CatalogRow> {
        let model_code = self
            .get_string(row, "model_code")
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: "model_code".to_string(),
            })?;

        let station_code = self.require_station_code(row, row_number)?;

        Ok(CatalogRow {
            model_code,
            customer_id: self.get_string(row, "customer_id"),
            board_type: self
                .get_string(row, "board_type")
                .unwrap_or_else(|| "MAIN".to_string()),
            station_code,
            seq_no: self.parse_i32(row, "seq_no", row_number)?.unwrap_or(0),
            quantity: self.parse_i32(row, "quantity", row_number)?.unwrap_or(1),
            manpower: self.parse_f64(row, "manpower", row_number)?.unwrap_or(0.0),
            cycle_time_sec: self
                .parse_f64(row, "cycle_time_sec", row_number)?
                .unwrap_or(0.0),
            unit_price: self.parse_f64(row, "unit_price", row_number)?,
            row_number,
        })
    }

    /// 价格目录行映射
    pub fn map_price_row(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<PriceRow> {
        let station_code = self.require_station_code(row, row_number)?;

        let unit_price = self
            .parse_f64(row, "unit_price", row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: "unit_price".to_string(),
            })?;
        let typical_cycle_time_sec = self
            .parse_f64(row, "cycle_time_sec", row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: "cycle_time_sec".to_string(),
            })?;

        Ok(PriceRow {
            station_code,
            unit_price,
            typical_cycle_time_sec,
            description: self.get_string(row, "description"),
            row_number,
        })
    }

    /// 站位代码必填字段
    fn require_station_code(
        &self,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<StationCode> {
        let raw = self
            .get_string(row, "station_code")
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: "station_code".to_string(),
            })?;
        StationCode::new(&raw).ok_or_else(|| ImportError::MissingField {
            row: row_number,
            field: "station_code".to_string(),
        })
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        // 定义列名别名映射
        let aliases: Vec<&str> = match key {
            "model_code" => vec!["model_code", "model", "机种代码", "机种"],
            "customer_id" => vec!["customer_id", "customer", "客户代码", "客户"],
            "board_type" => vec!["board_type", "board", "板别"],
            "station_code" => vec!["station_code", "station", "站位代码", "站位", "工站"],
            "seq_no" => vec!["seq_no", "seq", "序号", "顺序"],
            "quantity" => vec!["quantity", "qty", "台数", "数量"],
            "manpower" => vec!["manpower", "mp", "人力"],
            "cycle_time_sec" => vec!["cycle_time_sec", "cycle_time", "ct", "节拍", "节拍(秒)"],
            "unit_price" => vec!["unit_price", "price", "单价", "治具单价"],
            "description" => vec!["description", "desc", "描述", "说明"],
            _ => vec![key],
        };

        // 尝试所有可能的列名
        for alias in aliases {
            if let Some(v) = row.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    /// 解析浮点数
    fn parse_f64(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value.parse::<f64>().map(Some).map_err(|_| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }
            }),
        }
    }

    /// 解析整数
    fn parse_i32(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> ImportResult<Option<i32>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value.parse::<i32>().map(Some).map_err(|_| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为整数: {}", value),
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_catalog_row_basic() {
        let mapper = RowMapper;
        let record = mapper
            .map_catalog_row(
                &row(&[
                    ("model_code", "PX100"),
                    ("station_code", " mbt "),
                    ("qty", "2"),
                    ("mp", "0.5"),
                    ("ct", "20"),
                ]),
                1,
            )
            .unwrap();

        assert_eq!(record.model_code, "PX100");
        assert_eq!(record.station_code.as_str(), "MBT"); // 规范化
        assert_eq!(record.quantity, 2);
        assert_eq!(record.manpower, 0.5);
        assert_eq!(record.board_type, "MAIN"); // 缺省
    }

    #[test]
    fn test_map_catalog_row_chinese_aliases() {
        let mapper = RowMapper;
        let record = mapper
            .map_catalog_row(
                &row(&[
                    ("机种代码", "PX200"),
                    ("站位", "CAL"),
                    ("台数", "1"),
                    ("板别", "SUB"),
                ]),
                3,
            )
            .unwrap();

        assert_eq!(record.model_code, "PX200");
        assert_eq!(record.board_type, "SUB");
    }

    #[test]
    fn test_map_catalog_row_missing_model_code() {
        let mapper = RowMapper;
        let result = mapper.map_catalog_row(&row(&[("station_code", "MBT")]), 7);

        match result {
            Err(ImportError::MissingField { row, field }) => {
                assert_eq!(row, 7);
                assert_eq!(field, "model_code");
            }
            other => panic!("期望 MissingField, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_map_catalog_row_invalid_number() {
        let mapper = RowMapper;
        let result = mapper.map_catalog_row(
            &row(&[
                ("model_code", "PX100"),
                ("station_code", "MBT"),
                ("qty", "two"),
            ]),
            2,
        );
        assert!(matches!(
            result,
            Err(ImportError::TypeConversionError { row: 2, .. })
        ));
    }

    #[test]
    fn test_map_price_row() {
        let mapper = RowMapper;
        let record = mapper
            .map_price_row(
                &row(&[
                    ("station_code", "MBT"),
                    ("unit_price", "50000"),
                    ("cycle_time_sec", "20"),
                ]),
                1,
            )
            .unwrap();

        assert_eq!(record.unit_price, 50_000.0);
        assert_eq!(record.typical_cycle_time_sec, 20.0);
    }

    #[test]
    fn test_map_price_row_missing_price() {
        let mapper = RowMapper;
        let result =
            mapper.map_price_row(&row(&[("station_code", "MBT"), ("cycle_time_sec", "20")]), 4);
        assert!(matches!(result, Err(ImportError::MissingField { .. })));
    }
}
