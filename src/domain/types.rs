// ==========================================
// 测试线报价系统 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与前端/存储一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 输入结构类型 (Input Type)
// ==========================================
// 粘贴/上传文本的结构分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    ExcelTable, // 多行多列表格 (tab/逗号分隔)
    SimpleList, // 每行一个站位
    InlineList, // 单行逗号分隔
    Unknown,    // 无法识别
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputType::ExcelTable => write!(f, "EXCEL_TABLE"),
            InputType::SimpleList => write!(f, "SIMPLE_LIST"),
            InputType::InlineList => write!(f, "INLINE_LIST"),
            InputType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// 列语义角色 (Column Role)
// ==========================================
// 表格列的推断语义,STATION_CODE 为下游必需角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnRole {
    StationCode, // 站位代码
    Sequence,    // 工序顺序号
    Manpower,    // 人力
    CycleTime,   // 节拍 (秒)
    BoardType,   // 板别
    Unknown,     // 未识别
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::StationCode => write!(f, "STATION_CODE"),
            ColumnRole::Sequence => write!(f, "SEQUENCE"),
            ColumnRole::Manpower => write!(f, "MANPOWER"),
            ColumnRole::CycleTime => write!(f, "CYCLE_TIME"),
            ColumnRole::BoardType => write!(f, "BOARD_TYPE"),
            ColumnRole::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
