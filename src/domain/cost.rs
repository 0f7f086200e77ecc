// ==========================================
// 测试线报价系统 - 成本估算领域模型
// ==========================================
// 不变式:
// - total_investment = Σ(单价 × 台数)
// - bottleneck 站位的稼动率为全线最大
// ==========================================

use crate::domain::station::StationCode;
use serde::{Deserialize, Serialize};

// ==========================================
// StationInput - 成本估算的站位输入
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationInput {
    pub station_code: StationCode, // 站位代码
    pub quantity: i32,             // 设备台数
    pub manpower: f64,             // 单台人力
}

impl StationInput {
    pub fn new(station_code: StationCode, quantity: i32, manpower: f64) -> Self {
        Self {
            station_code,
            quantity,
            manpower,
        }
    }
}

// ==========================================
// FixtureInvestment - 治具投资
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureInvestment {
    pub total_investment: f64,        // 治具投资总额
    pub annual_volume: f64,           // 年产量 (月产量 × 12)
    pub amortized_cost_per_unit: f64, // 单台分摊成本
}

// ==========================================
// ManpowerRequirement - 人力需求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManpowerRequirement {
    pub per_shift: f64,    // 单班人力 = Σ(人力 × 台数)
    pub shift_count: i32,  // 班次数
    pub full_day: f64,     // 全天人力 = 单班 × 班次
}

// ==========================================
// StationUtilization - 单站位产能指标
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationUtilization {
    pub station_code: StationCode,  // 站位代码
    pub quantity: i32,              // 当前台数
    pub cycle_time_sec: f64,        // 节拍 (秒)
    pub station_uph: f64,           // 站位产能 = 3600/CT × 台数
    pub utilization_percent: f64,   // 稼动率 = 目标UPH/站位UPH × 100 (>100 为合法可报告状态)
    pub suggested_quantity: i32,    // 建议台数 (稼动率 ≤ 95%)
}

// ==========================================
// CapacityResult - 全线产能结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityResult {
    pub target_uph: f64,                      // 目标 UPH
    pub stations: Vec<StationUtilization>,    // 按输入顺序的站位指标
    pub bottleneck_station: Option<StationCode>, // 瓶颈站位 (最大稼动率)
    pub line_utilization_percent: f64,        // 全线稼动率 = 瓶颈稼动率
}

impl CapacityResult {
    /// 稼动率超过 100% 的站位数
    pub fn overloaded_count(&self) -> usize {
        self.stations
            .iter()
            .filter(|s| s.utilization_percent > 100.0)
            .count()
    }
}

// ==========================================
// CostBreakdown - 成本估算汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub fixture: FixtureInvestment,    // 治具投资
    pub manpower: ManpowerRequirement, // 人力需求
    pub capacity: CapacityResult,      // 产能/瓶颈
}
