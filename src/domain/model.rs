// ==========================================
// 测试线报价系统 - 历史机种领域模型
// ==========================================
// 用途: 相似度匹配与比对的候选机种
// 红线: 加载后只读,比对期间不可变
// ==========================================

use crate::domain::station::{StationCode, StationSet};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// StationRecord - 机种内单站位记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_code: StationCode, // 站位代码
    pub seq_no: i32,               // 工序顺序号
    pub quantity: i32,             // 设备台数
    pub manpower: f64,             // 单台人力
    pub cycle_time_sec: f64,       // 节拍 (秒)
    pub unit_price: Option<f64>,   // 治具单价 (历史记录值,可缺)
}

// ==========================================
// BoardStations - 按板别分组的站位清单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardStations {
    pub board_type: String,           // 板别 (如 MAIN / SUB)
    pub stations: Vec<StationRecord>, // 站位明细 (按 seq_no 排列)
}

// ==========================================
// HistoricalModel - 历史机种
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalModel {
    pub model_id: String,            // 主键
    pub model_code: String,          // 机种代码
    pub customer_id: Option<String>, // 客户
    pub boards: Vec<BoardStations>,  // 按板别站位清单
    pub created_at: NaiveDateTime,   // 建档时间
}

impl HistoricalModel {
    /// 全机种站位集合（跨板别并集,保留出现顺序）
    pub fn station_set(&self) -> StationSet {
        let codes: Vec<StationCode> = self
            .boards
            .iter()
            .flat_map(|b| b.stations.iter().map(|s| s.station_code.clone()))
            .collect();
        StationSet::from_codes(codes)
    }

    /// 全机种站位记录迭代（跨板别,按板别内顺序）
    pub fn all_stations(&self) -> impl Iterator<Item = &StationRecord> {
        self.boards.iter().flat_map(|b| b.stations.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(code: &str, seq: i32) -> StationRecord {
        StationRecord {
            station_code: StationCode::new(code).unwrap(),
            seq_no: seq,
            quantity: 1,
            manpower: 0.5,
            cycle_time_sec: 20.0,
            unit_price: None,
        }
    }

    #[test]
    fn test_station_set_union_across_boards() {
        let model = HistoricalModel {
            model_id: "M001".to_string(),
            model_code: "PX100".to_string(),
            customer_id: None,
            boards: vec![
                BoardStations {
                    board_type: "MAIN".to_string(),
                    stations: vec![record("MBT", 1), record("CAL", 2)],
                },
                BoardStations {
                    board_type: "SUB".to_string(),
                    stations: vec![record("CAL", 1), record("FQC", 2)],
                },
            ],
            created_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };

        let set = model.station_set();
        assert_eq!(set.len(), 3); // CAL 跨板别去重
    }
}
