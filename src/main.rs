// ==========================================
// 测试线报价系统 - 命令行入口
// ==========================================
// 子命令:
//   import-models <db> <file>          导入历史机种目录 (CSV/Excel)
//   import-prices <db> <file>          导入站位价格目录 (CSV/Excel)
//   match <db> <input> [customer]      粘贴文本 → 站位提取 → 相似机种检索
//   compare <db> <model_id> <input>    选定机种比对 + 成本估算
//   detect <input>                     输入文本的结构检测 (无需数据库)
// ==========================================

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::sync::{Arc, Mutex};
use testline_rfq::api::{QuoteApi, SimilaritySearchRequest};
use testline_rfq::config::QuoteConfig;
use testline_rfq::db::{init_schema, open_sqlite_connection};
use testline_rfq::importer::CatalogImporter;
use testline_rfq::logging;
use testline_rfq::repository::{SqliteModelRepository, SqlitePriceCatalog};

const USAGE: &str = "用法:
  testline-rfq import-models <db> <file>
  testline-rfq import-prices <db> <file>
  testline-rfq match <db> <input_file> [customer_id]
  testline-rfq compare <db> <model_id> <input_file>
  testline-rfq detect <input_file>";

fn main() -> Result<()> {
    logging::init();
    tracing::info!(version = testline_rfq::VERSION, "测试线报价系统启动");

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");

    match command {
        "import-models" => {
            let (db_path, file) = two_args(&args)?;
            let parts = open_catalog(db_path)?;
            let importer = CatalogImporter::new();
            let summary = importer.import_models(file, parts.model_repo.as_ref())?;
            println!(
                "导入完成: {} 个机种, {} 条站位记录",
                summary.models_imported, summary.stations_imported
            );
        }
        "import-prices" => {
            let (db_path, file) = two_args(&args)?;
            let parts = open_catalog(db_path)?;
            let importer = CatalogImporter::new();
            let imported = importer.import_price_catalog(file, parts.price_catalog.as_ref())?;
            println!("导入完成: {} 条站位价格记录", imported);
        }
        "match" => {
            let (db_path, file) = two_args(&args)?;
            let parts = open_catalog(db_path)?;
            let api = parts.into_api();

            let raw = read_input(file)?;
            let stations = api.extract_station_set(&raw)?;
            let request = SimilaritySearchRequest {
                station_codes: stations
                    .codes()
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
                customer_id: args.get(4).cloned(),
                limit: None,
                min_similarity: None,
            };
            let response = api.similarity_search(&request)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "compare" => {
            let db_path = args.get(2).map(|s| s.as_str()).unwrap_or("");
            let model_id = args.get(3).map(|s| s.as_str()).unwrap_or("");
            let file = args.get(4).map(|s| s.as_str()).unwrap_or("");
            if db_path.is_empty() || model_id.is_empty() || file.is_empty() {
                bail!("{}", USAGE);
            }
            let parts = open_catalog(db_path)?;
            let api = parts.into_api();

            let raw = read_input(file)?;
            let stations = api.extract_station_set(&raw)?;
            let codes: Vec<String> = stations
                .codes()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect();
            let response = api.model_comparison(model_id, &codes)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "detect" => {
            let file = args.get(2).map(|s| s.as_str()).unwrap_or("");
            if file.is_empty() {
                bail!("{}", USAGE);
            }
            let raw = read_input(file)?;
            let api = open_catalog(":memory:")?.into_api();
            let detection = api.detect_table_structure(&raw);
            println!("{}", serde_json::to_string_pretty(&detection)?);
        }
        _ => bail!("{}", USAGE),
    }

    Ok(())
}

// ==========================================
// 目录库组件装配
// ==========================================
struct CatalogParts {
    model_repo: Arc<SqliteModelRepository>,
    price_catalog: Arc<SqlitePriceCatalog>,
    config: Arc<QuoteConfig>,
}

impl CatalogParts {
    fn into_api(self) -> QuoteApi {
        QuoteApi::with_config(self.model_repo, self.price_catalog, self.config)
    }
}

/// 打开目录库: 单连接共享给仓储/价格目录/配置, schema 幂等初始化
fn open_catalog(db_path: &str) -> Result<CatalogParts> {
    let conn = open_sqlite_connection(db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    init_schema(&conn).context("初始化数据库 schema 失败")?;
    let conn = Arc::new(Mutex::new(conn));

    Ok(CatalogParts {
        model_repo: Arc::new(SqliteModelRepository::from_connection(conn.clone())?),
        price_catalog: Arc::new(SqlitePriceCatalog::from_connection(conn.clone())?),
        config: Arc::new(QuoteConfig::from_connection(conn)?),
    })
}

fn two_args(args: &[String]) -> Result<(&str, &str)> {
    match (args.get(2), args.get(3)) {
        (Some(a), Some(b)) => Ok((a.as_str(), b.as_str())),
        _ => bail!("{}", USAGE),
    }
}

fn read_input(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("无法读取输入文件: {}", path))
}
