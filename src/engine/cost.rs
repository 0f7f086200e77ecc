// ==========================================
// 测试线报价系统 - 成本估算引擎
// ==========================================
// 职责: 治具投资 / 人力 / 产能稼动 / 瓶颈 / 建议台数
// 输入: 站位清单 {站位,台数,人力} + 价格目录 + 目标UPH + 月产量
// 红线: 任一站位无法取价 ⇒ 整体失败,不返回部分结果
// ==========================================

use crate::domain::cost::{
    CapacityResult, CostBreakdown, FixtureInvestment, ManpowerRequirement, StationInput,
    StationUtilization,
};
use crate::domain::station::StationCode;
use crate::engine::error::{EngineError, EngineResult};
use crate::repository::price_repo::PriceCatalog;

// ==========================================
// 固定策略常量
// ==========================================

/// 每小时秒数 (站位 UPH = 3600 / 节拍 × 台数)
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// 月产量 → 年产量的固定乘数
/// 调用方传入月产量,分摊一律按 12 个月年化,不做隐式判断
pub const AMORTIZATION_MONTHS: f64 = 12.0;

/// 建议台数的目标稼动率上限 (%)
/// 建议台数保证稼动率 ≤ 95%,预留 5% 余量
pub const TARGET_UTILIZATION_PCT: f64 = 95.0;

// ==========================================
// CostEstimator - 成本估算引擎
// ==========================================
pub struct CostEstimator {
    // 无状态引擎,价格目录由调用方注入
}

impl CostEstimator {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 治具投资
    // ==========================================

    /// 计算治具投资与单台分摊
    ///
    /// # 规则
    /// - total = Σ(目录单价 × 台数)
    /// - 年产量 = 月产量 × AMORTIZATION_MONTHS
    /// - 单台分摊 = total / 年产量
    ///
    /// # 错误
    /// - 站位清单为空 / 台数 ≤ 0 / 月产量 ≤ 0 → Validation
    /// - 任一站位目录中无单价 → Validation (报出站位代码)
    pub fn fixture_investment(
        &self,
        stations: &[StationInput],
        catalog: &dyn PriceCatalog,
        monthly_volume: f64,
    ) -> EngineResult<FixtureInvestment> {
        self.validate_stations(stations)?;
        if monthly_volume <= 0.0 {
            return Err(EngineError::Validation(format!(
                "月产量必须为正数: {}",
                monthly_volume
            )));
        }

        let mut total_investment = 0.0;
        for station in stations {
            let unit_price = catalog
                .unit_price(&station.station_code)?
                .ok_or_else(|| {
                    EngineError::Validation(format!(
                        "站位 {} 在价格目录中无单价,无法完成报价",
                        station.station_code
                    ))
                })?;
            total_investment += unit_price * station.quantity as f64;
        }

        let annual_volume = monthly_volume * AMORTIZATION_MONTHS;

        Ok(FixtureInvestment {
            total_investment,
            annual_volume,
            amortized_cost_per_unit: total_investment / annual_volume,
        })
    }

    // ==========================================
    // 人力需求
    // ==========================================

    /// 计算人力需求
    ///
    /// # 规则
    /// - 单班 = Σ(人力 × 台数)
    /// - 全天 = 单班 × 班次数
    pub fn manpower_requirement(
        &self,
        stations: &[StationInput],
        shift_count: i32,
    ) -> EngineResult<ManpowerRequirement> {
        self.validate_stations(stations)?;
        if shift_count <= 0 {
            return Err(EngineError::Validation(format!(
                "班次数必须为正数: {}",
                shift_count
            )));
        }

        let per_shift: f64 = stations
            .iter()
            .map(|s| s.manpower * s.quantity as f64)
            .sum();

        Ok(ManpowerRequirement {
            per_shift,
            shift_count,
            full_day: per_shift * shift_count as f64,
        })
    }

    // ==========================================
    // 产能 / 稼动率 / 瓶颈 / 建议台数
    // ==========================================

    /// 计算全线产能指标
    ///
    /// # 规则
    /// - 站位 UPH = 3600 / 节拍 × 台数
    /// - 稼动率 = 目标UPH / 站位UPH × 100 (>100 表示该站位无法满足目标,
    ///   属合法可报告状态,不是错误)
    /// - 瓶颈 = 稼动率最大的站位,同值取输入顺序靠前者
    /// - 建议台数 = ceil(目标UPH / (单台UPH × 95%)),保证稼动率 ≤ 95%
    ///
    /// # 错误
    /// - 目标 UPH ≤ 0 → Validation
    /// - 站位目录中无标准节拍 → Validation
    /// - 节拍 ≤ 0 → Computation (不应出现的数值状态,立即失败)
    pub fn line_capacity(
        &self,
        stations: &[StationInput],
        catalog: &dyn PriceCatalog,
        target_uph: f64,
    ) -> EngineResult<CapacityResult> {
        self.validate_stations(stations)?;
        if target_uph <= 0.0 {
            return Err(EngineError::Validation(format!(
                "目标 UPH 必须为正数: {}",
                target_uph
            )));
        }

        let mut utilizations: Vec<StationUtilization> = Vec::with_capacity(stations.len());
        let mut bottleneck: Option<(StationCode, f64)> = None;

        for station in stations {
            let cycle_time_sec = catalog
                .typical_cycle_time(&station.station_code)?
                .ok_or_else(|| {
                    EngineError::Validation(format!(
                        "站位 {} 在目录中无标准节拍,无法计算产能",
                        station.station_code
                    ))
                })?;
            if cycle_time_sec <= 0.0 {
                return Err(EngineError::Computation(format!(
                    "站位 {} 的节拍非法: {} 秒",
                    station.station_code, cycle_time_sec
                )));
            }

            let single_uph = SECONDS_PER_HOUR / cycle_time_sec;
            let station_uph = single_uph * station.quantity as f64;
            let utilization_percent = target_uph / station_uph * 100.0;
            let suggested_quantity = self.suggested_quantity(target_uph, single_uph);

            // 严格大于才替换 ⇒ 同值保留输入顺序靠前的站位
            match &bottleneck {
                Some((_, max_util)) if utilization_percent <= *max_util => {}
                _ => bottleneck = Some((station.station_code.clone(), utilization_percent)),
            }

            utilizations.push(StationUtilization {
                station_code: station.station_code.clone(),
                quantity: station.quantity,
                cycle_time_sec,
                station_uph,
                utilization_percent,
                suggested_quantity,
            });
        }

        let (bottleneck_station, line_utilization_percent) = match bottleneck {
            Some((code, util)) => (Some(code), util),
            None => (None, 0.0),
        };

        Ok(CapacityResult {
            target_uph,
            stations: utilizations,
            bottleneck_station,
            line_utilization_percent,
        })
    }

    /// 建议台数: 满足目标 UPH 且稼动率 ≤ TARGET_UTILIZATION_PCT 的最小台数
    fn suggested_quantity(&self, target_uph: f64, single_uph: f64) -> i32 {
        let effective_uph = single_uph * TARGET_UTILIZATION_PCT / 100.0;
        (target_uph / effective_uph).ceil().max(1.0) as i32
    }

    // ==========================================
    // 完整成本估算
    // ==========================================

    /// 组合治具投资 + 人力 + 产能为完整成本估算
    pub fn full_breakdown(
        &self,
        stations: &[StationInput],
        catalog: &dyn PriceCatalog,
        target_uph: f64,
        monthly_volume: f64,
        shift_count: i32,
    ) -> EngineResult<CostBreakdown> {
        let fixture = self.fixture_investment(stations, catalog, monthly_volume)?;
        let manpower = self.manpower_requirement(stations, shift_count)?;
        let capacity = self.line_capacity(stations, catalog, target_uph)?;

        tracing::debug!(
            total_investment = fixture.total_investment,
            per_shift = manpower.per_shift,
            line_utilization = capacity.line_utilization_percent,
            "成本估算完成"
        );

        Ok(CostBreakdown {
            fixture,
            manpower,
            capacity,
        })
    }

    // ==========================================
    // 输入校验
    // ==========================================

    /// 校验站位清单: 非空、台数为正、人力非负
    fn validate_stations(&self, stations: &[StationInput]) -> EngineResult<()> {
        if stations.is_empty() {
            return Err(EngineError::Validation("站位清单为空".to_string()));
        }
        for station in stations {
            if station.quantity <= 0 {
                return Err(EngineError::Validation(format!(
                    "站位 {} 的台数必须为正数: {}",
                    station.station_code, station.quantity
                )));
            }
            if station.manpower < 0.0 {
                return Err(EngineError::Validation(format!(
                    "站位 {} 的人力不能为负数: {}",
                    station.station_code, station.manpower
                )));
            }
        }
        Ok(())
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for CostEstimator {
    fn default() -> Self {
        Self::new()
    }
}
