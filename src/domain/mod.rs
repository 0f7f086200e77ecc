// ==========================================
// 测试线报价系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod comparison;
pub mod cost;
pub mod model;
pub mod risk;
pub mod similarity;
pub mod station;
pub mod table;
pub mod types;

// 重导出核心类型
pub use comparison::{BoardGroup, ComparisonDetail};
pub use cost::{
    CapacityResult, CostBreakdown, FixtureInvestment, ManpowerRequirement, StationInput,
    StationUtilization,
};
pub use model::{BoardStations, HistoricalModel, StationRecord};
pub use risk::RiskAssessment;
pub use similarity::{BoardMatchBreakdown, SimilarityResult};
pub use station::{StationCode, StationSet};
pub use table::{ColumnDetection, DetectionValidation, ParsedTable, StructureDetection};
pub use types::{ColumnRole, InputType};
