// ==========================================
// 测试线报价系统 - API 层
// ==========================================
// 职责: 请求编排 (取数 → 引擎 → 响应), 错误归一
// 红线: API 不实现业务规则, 规则全部在引擎层
// ==========================================

pub mod error;
pub mod quote_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use quote_api::{
    ModelComparisonResponse, ModelSummary, QuoteApi, SimilaritySearchRequest,
    SimilaritySearchResponse,
};
