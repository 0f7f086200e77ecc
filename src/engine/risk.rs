// ==========================================
// 测试线报价系统 - 风险评估引擎
// ==========================================
// 职责: 产能结果 + 产品特性标志 → 风险分与风险提示
// 规则: 有序独立规则表, 每条命中 +1 分, 封顶 5 分
// 红线: 规则必须全量可终止、不抛异常; 提示顺序 = 声明顺序
// ==========================================

use crate::domain::cost::CapacityResult;
use crate::domain::risk::RiskAssessment;
use serde::{Deserialize, Serialize};

// ==========================================
// 固定阈值
// ==========================================

/// 风险分上限
pub const MAX_RISK_SCORE: u8 = 5;

/// RF 规则的瓶颈稼动率阈值 (%)
pub const RF_BOTTLENECK_THRESHOLD_PCT: f64 = 90.0;

/// 超载站位数阈值: 超过该数量的站位稼动率 >100% 时记 1 分
pub const OVERLOADED_STATION_LIMIT: usize = 1;

// ==========================================
// 产品特性标志
// ==========================================
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub has_rf: bool,         // RF 测试
    pub has_bga: bool,        // BGA 封装
    pub has_fine_pitch: bool, // 细间距
}

// ==========================================
// RiskContext - 规则判定上下文
// ==========================================
pub struct RiskContext<'a> {
    pub capacity: &'a CapacityResult,
    pub flags: FeatureFlags,
}

// ==========================================
// RiskRule - 单条风险规则
// ==========================================
// 每条规则独立判定,互不依赖,对总分的贡献与求值顺序无关
struct RiskRule {
    id: &'static str,
    flag: &'static str,
    predicate: fn(&RiskContext) -> bool,
}

/// 规则表 (声明顺序即输出提示顺序)
const RISK_RULES: &[RiskRule] = &[
    RiskRule {
        id: "rf_bottleneck",
        flag: "RF 测试且瓶颈稼动率超过 90%, 测试节拍风险高",
        predicate: |ctx| {
            ctx.flags.has_rf
                && ctx.capacity.line_utilization_percent > RF_BOTTLENECK_THRESHOLD_PCT
        },
    },
    RiskRule {
        id: "bga",
        flag: "含 BGA 封装, 返修与检测复杂度高",
        predicate: |ctx| ctx.flags.has_bga,
    },
    RiskRule {
        id: "fine_pitch",
        flag: "含细间距器件, 治具精度要求高",
        predicate: |ctx| ctx.flags.has_fine_pitch,
    },
    RiskRule {
        id: "multi_overload",
        flag: "多个站位稼动率超过 100%, 现有配置无法满足目标产能",
        predicate: |ctx| ctx.capacity.overloaded_count() > OVERLOADED_STATION_LIMIT,
    },
    RiskRule {
        id: "line_overload",
        flag: "全线稼动率超过 100%, 瓶颈站位需要增加台数",
        predicate: |ctx| ctx.capacity.line_utilization_percent > 100.0,
    },
];

// ==========================================
// RiskAssessor - 风险评估引擎
// ==========================================
pub struct RiskAssessor {
    // 无状态引擎
}

impl RiskAssessor {
    pub fn new() -> Self {
        Self {}
    }

    /// 评估风险
    ///
    /// # 规则
    /// - 按声明顺序逐条判定, 命中 +1 分并追加提示
    /// - 总分封顶 MAX_RISK_SCORE, 永不为负
    /// - 规则互相独立, 单条命中与否不受其他规则影响
    pub fn assess(&self, capacity: &CapacityResult, flags: FeatureFlags) -> RiskAssessment {
        let ctx = RiskContext { capacity, flags };

        let mut score: u8 = 0;
        let mut hit_flags = Vec::new();

        for rule in RISK_RULES {
            if (rule.predicate)(&ctx) {
                score = (score + 1).min(MAX_RISK_SCORE);
                hit_flags.push(rule.flag.to_string());
                tracing::debug!(rule = rule.id, "风险规则命中");
            }
        }

        RiskAssessment {
            risk_score: score,
            flags: hit_flags,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cost::StationUtilization;
    use crate::domain::station::StationCode;

    /// 创建测试用产能结果
    fn create_test_capacity(utilizations: &[f64]) -> CapacityResult {
        let stations: Vec<StationUtilization> = utilizations
            .iter()
            .enumerate()
            .map(|(i, util)| StationUtilization {
                station_code: StationCode::new(&format!("ST{}", i + 1)).unwrap(),
                quantity: 1,
                cycle_time_sec: 20.0,
                station_uph: 180.0,
                utilization_percent: *util,
                suggested_quantity: 1,
            })
            .collect();

        let line_utilization = utilizations.iter().cloned().fold(0.0, f64::max);
        let bottleneck = stations
            .iter()
            .max_by(|a, b| {
                a.utilization_percent
                    .partial_cmp(&b.utilization_percent)
                    .unwrap()
            })
            .map(|s| s.station_code.clone());

        CapacityResult {
            target_uph: 100.0,
            stations,
            bottleneck_station: bottleneck,
            line_utilization_percent: line_utilization,
        }
    }

    #[test]
    fn test_no_risk() {
        let assessor = RiskAssessor::new();
        let capacity = create_test_capacity(&[50.0, 60.0]);

        let assessment = assessor.assess(&capacity, FeatureFlags::default());
        assert_eq!(assessment.risk_score, 0);
        assert!(assessment.flags.is_empty());
    }

    #[test]
    fn test_rf_rule_requires_high_bottleneck() {
        let assessor = RiskAssessor::new();

        // RF 但瓶颈稼动率低 → 不命中
        let low = create_test_capacity(&[50.0]);
        let flags = FeatureFlags {
            has_rf: true,
            ..Default::default()
        };
        assert_eq!(assessor.assess(&low, flags).risk_score, 0);

        // RF 且瓶颈稼动率 > 90% → 命中
        let high = create_test_capacity(&[95.0]);
        assert_eq!(assessor.assess(&high, flags).risk_score, 1);
    }

    #[test]
    fn test_bga_and_fine_pitch_each_add_one() {
        let assessor = RiskAssessor::new();
        let capacity = create_test_capacity(&[50.0]);

        let flags = FeatureFlags {
            has_bga: true,
            has_fine_pitch: true,
            ..Default::default()
        };
        let assessment = assessor.assess(&capacity, flags);
        assert_eq!(assessment.risk_score, 2);
        assert_eq!(assessment.flags.len(), 2);
    }

    #[test]
    fn test_multi_overload_rule() {
        let assessor = RiskAssessor::new();

        // 单站位超载不命中 multi_overload (阈值为 >1), 但命中 line_overload
        let one = create_test_capacity(&[110.0, 80.0]);
        assert_eq!(assessor.assess(&one, FeatureFlags::default()).risk_score, 1);

        // 两站位超载 → multi_overload + line_overload
        let two = create_test_capacity(&[110.0, 120.0]);
        assert_eq!(assessor.assess(&two, FeatureFlags::default()).risk_score, 2);
    }

    #[test]
    fn test_score_capped_at_5() {
        let assessor = RiskAssessor::new();
        let capacity = create_test_capacity(&[110.0, 120.0, 130.0]);
        let flags = FeatureFlags {
            has_rf: true,
            has_bga: true,
            has_fine_pitch: true,
        };

        let assessment = assessor.assess(&capacity, flags);
        assert_eq!(assessment.risk_score, 5); // 5 条全命中, 封顶
        assert!(assessment.risk_score <= MAX_RISK_SCORE);
    }

    #[test]
    fn test_score_bounds_exhaustive() {
        // 全量组合: 0 ≤ score ≤ 5
        let assessor = RiskAssessor::new();
        let capacities = [
            create_test_capacity(&[50.0]),
            create_test_capacity(&[95.0]),
            create_test_capacity(&[110.0, 120.0]),
        ];

        for capacity in &capacities {
            for rf in [false, true] {
                for bga in [false, true] {
                    for fine in [false, true] {
                        let assessment = assessor.assess(
                            capacity,
                            FeatureFlags {
                                has_rf: rf,
                                has_bga: bga,
                                has_fine_pitch: fine,
                            },
                        );
                        assert!(assessment.risk_score <= MAX_RISK_SCORE);
                        assert_eq!(
                            assessment.flags.len().min(MAX_RISK_SCORE as usize),
                            assessment.risk_score as usize
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_flag_order_is_declaration_order() {
        let assessor = RiskAssessor::new();
        let capacity = create_test_capacity(&[95.0]);
        let flags = FeatureFlags {
            has_rf: true,
            has_bga: true,
            has_fine_pitch: true,
        };

        let assessment = assessor.assess(&capacity, flags);
        assert!(assessment.flags[0].contains("RF"));
        assert!(assessment.flags[1].contains("BGA"));
        assert!(assessment.flags[2].contains("细间距"));
    }

    #[test]
    fn test_monotonic_adding_condition_never_decreases() {
        let assessor = RiskAssessor::new();
        let capacity = create_test_capacity(&[95.0]);

        let base = assessor.assess(&capacity, FeatureFlags::default());
        let with_bga = assessor.assess(
            &capacity,
            FeatureFlags {
                has_bga: true,
                ..Default::default()
            },
        );
        assert!(with_bga.risk_score >= base.risk_score);
    }
}
