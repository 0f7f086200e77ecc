// ==========================================
// 测试线报价系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 报价决策支持 (匹配与估算引擎)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 历史机种目录导入
pub mod importer;

// 配置层 - 请求默认值
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ColumnRole, InputType};

// 领域实体
pub use domain::{
    BoardGroup, BoardStations, CapacityResult, ColumnDetection, ComparisonDetail, CostBreakdown,
    DetectionValidation, FixtureInvestment, HistoricalModel, ManpowerRequirement, ParsedTable,
    RiskAssessment, SimilarityResult, StationCode, StationInput, StationRecord, StationSet,
    StationUtilization, StructureDetection,
};

// 引擎
pub use engine::{
    ComparisonResolver, CostEstimator, EngineError, MatchOptions, MatchOutcome, RiskAssessor,
    SimilarityMatcher, TableStructureDetector,
};

// 仓储
pub use repository::{
    ModelRepository, PriceCatalog, RepositoryError, SqliteModelRepository, SqlitePriceCatalog,
    StaticPriceCatalog,
};

// API
pub use api::{ApiError, QuoteApi};

/// 系统版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
