// ==========================================
// 测试线报价系统 - 报价业务接口
// ==========================================
// 五个业务操作:
// 1. similarity_search     - 相似机种检索
// 2. model_comparison      - 选定机种比对 + 成本估算
// 3. cost_breakdown        - 成本估算
// 4. risk_assessment       - 风险评估
// 5. detect_table_structure - 粘贴文本结构检测
// ==========================================
// 参数优先级: 调用方显式传入 > config_kv > 编译期默认值
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::quote_config::{QuoteConfig, QuoteDefaults};
use crate::domain::comparison::ComparisonDetail;
use crate::domain::cost::{CapacityResult, CostBreakdown, StationInput};
use crate::domain::risk::RiskAssessment;
use crate::domain::similarity::SimilarityResult;
use crate::domain::station::StationSet;
use crate::domain::table::StructureDetection;
use crate::engine::cost::CostEstimator;
use crate::engine::comparison::ComparisonResolver;
use crate::engine::risk::{FeatureFlags, RiskAssessor};
use crate::engine::similarity::{MatchOptions, SimilarityMatcher};
use crate::engine::structure::TableStructureDetector;
use crate::repository::model_repo::ModelRepository;
use crate::repository::price_repo::PriceCatalog;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// 请求/响应结构
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilaritySearchRequest {
    pub station_codes: Vec<String>,      // 原始站位 token (未规范化)
    pub customer_id: Option<String>,     // 客户过滤
    pub limit: Option<usize>,            // 覆写默认 limit
    pub min_similarity: Option<u32>,     // 覆写默认阈值
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilaritySearchResponse {
    pub results: Vec<SimilarityResult>,
    pub closest_match: Option<SimilarityResult>,
}

/// 机种摘要 (比对响应头)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_id: String,
    pub model_code: String,
    pub customer_id: Option<String>,
    pub board_count: usize,
    pub station_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelComparisonResponse {
    pub model: ModelSummary,
    pub comparison: ComparisonDetail,
    pub cost_estimate: CostBreakdown, // 按机种自身站位配置估算
}

// ==========================================
// QuoteApi - 报价接口
// ==========================================
pub struct QuoteApi {
    model_repo: Arc<dyn ModelRepository>,
    price_catalog: Arc<dyn PriceCatalog>,
    config: Option<Arc<QuoteConfig>>,
    matcher: SimilarityMatcher,
    resolver: ComparisonResolver,
    estimator: CostEstimator,
    assessor: RiskAssessor,
    detector: TableStructureDetector,
}

impl QuoteApi {
    /// 创建 (无配置库, 使用编译期默认值)
    pub fn new(
        model_repo: Arc<dyn ModelRepository>,
        price_catalog: Arc<dyn PriceCatalog>,
    ) -> Self {
        Self {
            model_repo,
            price_catalog,
            config: None,
            matcher: SimilarityMatcher::new(),
            resolver: ComparisonResolver::new(),
            estimator: CostEstimator::new(),
            assessor: RiskAssessor::new(),
            detector: TableStructureDetector::new(),
        }
    }

    /// 创建 (带 config_kv 配置库)
    pub fn with_config(
        model_repo: Arc<dyn ModelRepository>,
        price_catalog: Arc<dyn PriceCatalog>,
        config: Arc<QuoteConfig>,
    ) -> Self {
        let mut api = Self::new(model_repo, price_catalog);
        api.config = Some(config);
        api
    }

    /// 解析请求默认值 (config_kv → 编译期默认)
    fn request_defaults(&self) -> ApiResult<QuoteDefaults> {
        match &self.config {
            Some(config) => Ok(config.defaults()?),
            None => Ok(QuoteDefaults::default()),
        }
    }

    // ==========================================
    // 操作 1: 相似机种检索
    // ==========================================

    /// 相似机种检索
    ///
    /// 候选集: 指定客户时仅取该客户机种, 否则取全部
    pub fn similarity_search(
        &self,
        request: &SimilaritySearchRequest,
    ) -> ApiResult<SimilaritySearchResponse> {
        let defaults = self.request_defaults()?;

        let query = StationSet::normalize(&request.station_codes);
        if query.is_empty() {
            return Err(ApiError::InvalidInput(
                "站位清单为空, 无法检索相似机种".to_string(),
            ));
        }

        // 仓储读是唯一的 I/O 边界, 失败原样向上传播
        let candidates = match &request.customer_id {
            Some(customer_id) => self.model_repo.fetch_models_by_customer(customer_id)?,
            None => self.model_repo.fetch_all_models()?,
        };

        let options = MatchOptions {
            limit: request.limit.unwrap_or(defaults.match_limit),
            min_similarity: request.min_similarity.unwrap_or(defaults.min_similarity),
            customer_filter: None, // 候选集已按客户过滤
        };

        let outcome = self.matcher.match_models(&query, &candidates, &options)?;

        tracing::info!(
            query_stations = query.len(),
            results = outcome.results.len(),
            "相似机种检索完成"
        );

        Ok(SimilaritySearchResponse {
            results: outcome.results,
            closest_match: outcome.closest_match,
        })
    }

    // ==========================================
    // 操作 2: 选定机种比对
    // ==========================================

    /// 选定机种比对 + 按机种配置的成本估算
    ///
    /// 成本估算参数 (UPH/产量/班次) 取 config_kv 默认值
    pub fn model_comparison(
        &self,
        model_id: &str,
        requested_codes: &[String],
    ) -> ApiResult<ModelComparisonResponse> {
        let defaults = self.request_defaults()?;

        let model = self
            .model_repo
            .fetch_model(model_id)?
            .ok_or_else(|| ApiError::NotFound(format!("机种不存在: {}", model_id)))?;

        let requested = StationSet::normalize(requested_codes);
        let comparison = self.resolver.resolve(&model, &requested)?;

        // 机种自身站位配置 → 成本估算输入
        let stations: Vec<StationInput> = model
            .all_stations()
            .map(|s| StationInput::new(s.station_code.clone(), s.quantity, s.manpower))
            .collect();
        let cost_estimate = self.estimator.full_breakdown(
            &stations,
            self.price_catalog.as_ref(),
            defaults.target_uph,
            defaults.monthly_volume,
            defaults.shift_count,
        )?;

        let summary = ModelSummary {
            model_id: model.model_id.clone(),
            model_code: model.model_code.clone(),
            customer_id: model.customer_id.clone(),
            board_count: model.boards.len(),
            station_count: model.station_set().len(),
        };

        Ok(ModelComparisonResponse {
            model: summary,
            comparison,
            cost_estimate,
        })
    }

    // ==========================================
    // 操作 3: 成本估算
    // ==========================================

    /// 成本估算 (治具投资 / 人力 / 产能 / 瓶颈)
    pub fn cost_breakdown(
        &self,
        stations: &[StationInput],
        target_uph: f64,
        monthly_volume: f64,
        shift_count: Option<i32>,
    ) -> ApiResult<CostBreakdown> {
        let defaults = self.request_defaults()?;
        let breakdown = self.estimator.full_breakdown(
            stations,
            self.price_catalog.as_ref(),
            target_uph,
            monthly_volume,
            shift_count.unwrap_or(defaults.shift_count),
        )?;
        Ok(breakdown)
    }

    // ==========================================
    // 操作 4: 风险评估
    // ==========================================

    /// 风险评估 (规则全量可终止, 不会失败)
    pub fn risk_assessment(
        &self,
        capacity: &CapacityResult,
        flags: FeatureFlags,
    ) -> RiskAssessment {
        self.assessor.assess(capacity, flags)
    }

    // ==========================================
    // 操作 5: 结构检测
    // ==========================================

    /// 粘贴/上传文本的结构检测
    pub fn detect_table_structure(&self, raw_text: &str) -> StructureDetection {
        self.detector.detect(raw_text)
    }

    /// 结构检测 + 站位提取 + 规范化 (组合入口)
    pub fn extract_station_set(&self, raw_text: &str) -> ApiResult<StationSet> {
        let tokens = self.detector.extract_station_codes(raw_text);
        let set = StationSet::normalize(&tokens);
        if set.is_empty() {
            return Err(ApiError::InvalidInput(
                "未能从输入文本中提取出站位代码".to_string(),
            ));
        }
        Ok(set)
    }
}
