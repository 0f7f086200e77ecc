// ==========================================
// 测试线报价系统 - 数据仓储层
// ==========================================
// 职责: 历史机种与价格目录的数据访问
// 红线: 仓储失败原样向上传播, 不做静默回退
// ==========================================

pub mod error;
pub mod model_repo;
pub mod price_repo;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use model_repo::{ModelRepository, SqliteModelRepository};
pub use price_repo::{PriceCatalog, SqlitePriceCatalog, StaticPriceCatalog};
