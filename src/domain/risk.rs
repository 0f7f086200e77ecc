// ==========================================
// 测试线报价系统 - 风险评估领域模型
// ==========================================
// 不变式: 0 ≤ risk_score ≤ 5, flags 顺序 = 规则声明顺序
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RiskAssessment - 风险评估结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: u8,      // 风险分 [0,5]
    pub flags: Vec<String>,  // 命中的风险提示 (声明顺序)
}
