// ==========================================
// 测试线报价系统 - 机种比对引擎
// ==========================================
// 职责: 选定机种 vs 查询站位集合的详细比对
// 输出: matched/missing/extra + 按板别汇总
// 红线: 同一机种快照 + 同一查询 ⇒ 输出确定
// ==========================================

use crate::domain::comparison::{BoardGroup, ComparisonDetail};
use crate::domain::model::HistoricalModel;
use crate::domain::station::{StationCode, StationSet};
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// ComparisonResolver - 比对引擎
// ==========================================
pub struct ComparisonResolver {
    // 无状态引擎,机种查找由调用方 (API 层) 处理
}

impl ComparisonResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算比对明细
    ///
    /// # 参数
    /// - `model`: 选定的历史机种 (只读快照)
    /// - `requested`: 查询站位集合 (必须非空)
    ///
    /// # 返回
    /// ComparisonDetail, 满足:
    /// - matched ∪ missing = requested
    /// - matched ∪ extra   = model.station_set()
    pub fn resolve(
        &self,
        model: &HistoricalModel,
        requested: &StationSet,
    ) -> EngineResult<ComparisonDetail> {
        if requested.is_empty() {
            return Err(EngineError::Validation(
                "查询站位集合为空,无法比对".to_string(),
            ));
        }

        let model_set = model.station_set();
        let matched = requested.intersection(&model_set);
        let missing = requested.difference(&model_set);
        let extra = model_set.difference(requested);

        let board_groups = model
            .boards
            .iter()
            .map(|board| {
                let board_set = StationSet::from_codes(
                    board
                        .stations
                        .iter()
                        .map(|s| s.station_code.clone())
                        .collect::<Vec<StationCode>>(),
                );

                // 板别内人力按 人力×台数 累加, 节拍直接累加
                let total_manpower: f64 = board
                    .stations
                    .iter()
                    .map(|s| s.manpower * s.quantity as f64)
                    .sum();
                let total_cycle_time_sec: f64 =
                    board.stations.iter().map(|s| s.cycle_time_sec).sum();

                BoardGroup {
                    board_type: board.board_type.clone(),
                    station_count: board.stations.len(),
                    matched: requested.intersection(&board_set),
                    total_manpower,
                    total_cycle_time_sec,
                }
            })
            .collect();

        Ok(ComparisonDetail {
            matched,
            missing,
            extra,
            board_groups,
        })
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ComparisonResolver {
    fn default() -> Self {
        Self::new()
    }
}
