// ==========================================
// 测试线报价系统 - 相似度结果领域模型
// ==========================================
// 不变式:
// - matched ∪ missing = 查询集合
// - matched ∪ extra   = 机种站位集合
// - matched           = 查询 ∩ 机种
// ==========================================

use crate::domain::station::StationSet;
use serde::{Deserialize, Serialize};

// ==========================================
// BoardMatchBreakdown - 按板别的匹配明细
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMatchBreakdown {
    pub board_type: String,    // 板别
    pub matched: StationSet,   // 该板别内命中的查询站位
    pub station_total: usize,  // 该板别站位总数
}

// ==========================================
// SimilarityResult - 单机种相似度结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub model_id: String,            // 机种主键
    pub model_code: String,          // 机种代码
    pub customer_id: Option<String>, // 客户
    pub score: u32,                  // 相似度 [0,100]
    pub matched: StationSet,         // 命中站位
    pub missing: StationSet,         // 查询有、机种无
    pub extra: StationSet,           // 机种有、查询无
    pub board_breakdown: Option<Vec<BoardMatchBreakdown>>, // 按板别明细 (多板别机种)
}
