// ==========================================
// 测试线报价系统 - 导入层
// ==========================================
// 职责: 历史机种目录 / 站位价格目录的文件导入
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

pub mod catalog_importer;
pub mod error;
pub mod file_parser;
pub mod station_row;

// 重导出核心类型
pub use catalog_importer::{CatalogImporter, ImportSummary};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use station_row::{CatalogRow, PriceRow, RowMapper};
