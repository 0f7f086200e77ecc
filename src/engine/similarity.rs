// ==========================================
// 测试线报价系统 - 相似度匹配引擎
// ==========================================
// 职责: 查询站位集合 vs 历史机种的 Jaccard 相似度排名
// 算法: |查询 ∩ 机种| / |查询 ∪ 机种| × 100, 四舍五入取整
// ==========================================
// 排序规则 (确定性):
// - 主结果: 分数降序, 同分按 model_code 升序
// - closest_match: 被阈值淘汰者中分数最高, 同分取 model_code 最小
// ==========================================

use crate::domain::model::HistoricalModel;
use crate::domain::similarity::{BoardMatchBreakdown, SimilarityResult};
use crate::domain::station::StationSet;
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// MatchOptions - 匹配参数
// ==========================================
#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub limit: usize,                    // 主结果最大条数
    pub min_similarity: u32,             // 最低相似度阈值 [0,100]
    pub customer_filter: Option<String>, // 客户过滤 (可选)
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            min_similarity: 60,
            customer_filter: None,
        }
    }
}

// ==========================================
// MatchOutcome - 匹配输出
// ==========================================
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub results: Vec<SimilarityResult>,          // 达标结果 (已排序截断)
    pub closest_match: Option<SimilarityResult>, // 无达标结果时的最接近机种
}

// ==========================================
// SimilarityMatcher - 相似度匹配引擎
// ==========================================
pub struct SimilarityMatcher {
    // 无状态引擎,不需要注入依赖
    // Repository 操作由调用方处理
}

impl SimilarityMatcher {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对候选机种逐一评分并排名
    ///
    /// # 参数
    /// - `query`: 查询站位集合 (必须非空)
    /// - `candidates`: 候选历史机种
    /// - `options`: limit / 阈值 / 客户过滤
    ///
    /// # 返回
    /// MatchOutcome:
    /// - results: 达到阈值的结果, 分数降序、同分 model_code 升序, 截断到 limit
    /// - closest_match: 所有结果均低于阈值时,被淘汰者中的最高分
    ///
    /// # 错误
    /// - 空查询集合 → EngineError::Validation
    pub fn match_models(
        &self,
        query: &StationSet,
        candidates: &[HistoricalModel],
        options: &MatchOptions,
    ) -> EngineResult<MatchOutcome> {
        if query.is_empty() {
            return Err(EngineError::Validation(
                "查询站位集合为空,无法进行相似度匹配".to_string(),
            ));
        }

        // 客户过滤 (缺省不过滤)
        let filtered: Vec<&HistoricalModel> = candidates
            .iter()
            .filter(|m| match &options.customer_filter {
                Some(customer) => m.customer_id.as_deref() == Some(customer.as_str()),
                None => true,
            })
            .collect();

        // 逐候选评分 (每个候选只依赖自身与查询,顺序无关)
        let mut scored: Vec<SimilarityResult> = filtered
            .iter()
            .map(|model| self.score_candidate(query, model))
            .collect();

        // 确定性排序: 分数降序, 同分 model_code 升序
        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.model_code.cmp(&b.model_code))
        });

        // 阈值筛选: 淘汰者中跟踪最高分作为 closest_match
        let mut results = Vec::new();
        let mut closest_match: Option<SimilarityResult> = None;
        for result in scored {
            if result.score >= options.min_similarity {
                results.push(result);
            } else if closest_match.is_none() {
                // scored 已按分数降序+代码升序排列,首个淘汰者即为
                // 最高分且同分时 model_code 最小者
                closest_match = Some(result);
            }
        }

        results.truncate(options.limit);

        tracing::debug!(
            candidates = filtered.len(),
            qualified = results.len(),
            has_closest = closest_match.is_some(),
            "相似度匹配完成"
        );

        Ok(MatchOutcome {
            results,
            closest_match,
        })
    }

    /// 单候选评分
    ///
    /// # 返回
    /// SimilarityResult, 满足集合不变式:
    /// matched ∪ missing = 查询, matched ∪ extra = 机种集合
    pub fn score_candidate(
        &self,
        query: &StationSet,
        model: &HistoricalModel,
    ) -> SimilarityResult {
        let model_set = model.station_set();
        let score = self.jaccard_score(query, &model_set);

        let matched = query.intersection(&model_set);
        let missing = query.difference(&model_set);
        let extra = model_set.difference(query);

        // 多板别机种附带按板别命中明细
        let board_breakdown = if model.boards.len() > 1 {
            Some(
                model
                    .boards
                    .iter()
                    .map(|board| {
                        let board_set = StationSet::from_codes(
                            board
                                .stations
                                .iter()
                                .map(|s| s.station_code.clone())
                                .collect(),
                        );
                        BoardMatchBreakdown {
                            board_type: board.board_type.clone(),
                            matched: query.intersection(&board_set),
                            station_total: board_set.len(),
                        }
                    })
                    .collect(),
            )
        } else {
            None
        };

        SimilarityResult {
            model_id: model.model_id.clone(),
            model_code: model.model_code.clone(),
            customer_id: model.customer_id.clone(),
            score,
            matched,
            missing,
            extra,
            board_breakdown,
        }
    }

    /// Jaccard 相似度 (百分比,四舍五入取整)
    ///
    /// 定义的边界情形 (非崩溃路径):
    /// - 两集合均为空 → 100 (视为完全一致,规避除零)
    /// - 查询非空、候选为空 → 0
    pub fn jaccard_score(&self, a: &StationSet, b: &StationSet) -> u32 {
        let union_len = a.union_len(b);
        if union_len == 0 {
            return 100;
        }
        let inter_len = a.intersection(b).len();
        ((inter_len as f64 / union_len as f64) * 100.0).round() as u32
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new()
    }
}
