// ==========================================
// 测试线报价系统 - 机种比对领域模型
// ==========================================
// 用途: 选定机种后的详细比对输出
// ==========================================

use crate::domain::station::StationSet;
use serde::{Deserialize, Serialize};

// ==========================================
// BoardGroup - 按板别汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardGroup {
    pub board_type: String,          // 板别
    pub station_count: usize,        // 板别内站位数
    pub matched: StationSet,         // 板别内命中的查询站位
    pub total_manpower: f64,         // Σ(人力 × 台数)
    pub total_cycle_time_sec: f64,   // Σ 节拍
}

// ==========================================
// ComparisonDetail - 比对明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonDetail {
    pub matched: StationSet,          // 查询 ∩ 机种
    pub missing: StationSet,          // 查询 - 机种
    pub extra: StationSet,            // 机种 - 查询
    pub board_groups: Vec<BoardGroup>, // 按板别汇总
}
