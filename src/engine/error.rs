// ==========================================
// 测试线报价系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 不静默回退、不返回部分结果
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入校验错误 =====
    #[error("输入校验失败: {0}")]
    Validation(String),

    // ===== 数值异常 =====
    // 仅用于真正不应出现的数值状态 (如负节拍),必须立即失败
    #[error("数值计算异常: {0}")]
    Computation(String),

    // ===== 仓储错误 (原样向上传播) =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
