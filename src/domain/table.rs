// ==========================================
// 测试线报价系统 - 表格结构检测领域模型
// ==========================================
// 用途: 粘贴/上传文本的结构分类与列语义推断结果
// ==========================================

use crate::domain::types::{ColumnRole, InputType};
use serde::{Deserialize, Serialize};

// ==========================================
// ParsedTable - 解析后的表格
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,    // 表头 (多行表头合并后)
    pub rows: Vec<Vec<String>>,  // 数据行
    pub row_count: usize,        // 数据行数
    pub col_count: usize,        // 列数 (以表头为准)
}

// ==========================================
// ColumnDetection - 单列语义推断
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDetection {
    pub index: usize,     // 列下标
    pub role: ColumnRole, // 推断角色
    pub confidence: f64,  // 置信度 [0,1] (前两名得分的归一化差距)
}

// ==========================================
// DetectionValidation - 检测结果校验
// ==========================================
// STATION_CODE 列为下游必需,缺失即无效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionValidation {
    pub valid: bool,
    pub message: Option<String>,
}

// ==========================================
// StructureDetection - 结构检测总输出
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureDetection {
    pub input_type: InputType,                 // 结构分类
    pub confidence: f64,                       // 分类置信度 [0,1]
    pub table: Option<ParsedTable>,            // 仅 EXCEL_TABLE 提供
    pub columns: Option<Vec<ColumnDetection>>, // 仅 EXCEL_TABLE 提供
    pub validation: Option<DetectionValidation>, // 仅 EXCEL_TABLE 提供
}
