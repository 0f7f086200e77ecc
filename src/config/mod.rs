// ==========================================
// 测试线报价系统 - 配置层
// ==========================================
// 职责: 请求默认值管理 (limit / 阈值 / UPH / 产量 / 班次)
// 存储: config_kv 表
// 取值优先级: 调用方显式传入 > config_kv > 编译期默认值
// ==========================================

pub mod quote_config;

// 重导出核心配置管理器
pub use quote_config::{config_keys, QuoteConfig, QuoteDefaults};
