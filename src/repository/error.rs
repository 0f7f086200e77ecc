// ==========================================
// 测试线报价系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库连接失败: {0}")]
    ConnectionError(String),

    #[error("数据库查询失败: {0}")]
    QueryError(String),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("数据格式异常: {0}")]
    DataError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::QueryError(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
