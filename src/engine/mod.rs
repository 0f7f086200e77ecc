// ==========================================
// 测试线报价系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有规则必须输出 reason
// ==========================================

pub mod comparison;
pub mod cost;
pub mod error;
pub mod risk;
pub mod similarity;
pub mod structure;

// 重导出核心引擎
pub use comparison::ComparisonResolver;
pub use cost::CostEstimator;
pub use error::{EngineError, EngineResult};
pub use risk::RiskAssessor;
pub use similarity::{MatchOptions, MatchOutcome, SimilarityMatcher};
pub use structure::TableStructureDetector;
