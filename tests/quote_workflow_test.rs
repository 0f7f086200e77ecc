// ==========================================
// 测试线报价系统 - 报价工作流集成测试
// ==========================================
// 范围: 文件导入 → 粘贴文本识别 → 检索 → 比对 → 估算 → 风险
// 模拟一次完整的 RFQ 报价过程
// ==========================================

use std::io::Write;
use std::sync::{Arc, Mutex};
use testline_rfq::api::{QuoteApi, SimilaritySearchRequest};
use testline_rfq::db::{init_schema, open_in_memory_connection};
use testline_rfq::engine::risk::FeatureFlags;
use testline_rfq::importer::CatalogImporter;
use testline_rfq::repository::{SqliteModelRepository, SqlitePriceCatalog};
use testline_rfq::InputType;

fn csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

/// 从 CSV 目录文件装配完整 API
fn build_api_from_files() -> QuoteApi {
    let conn = open_in_memory_connection().unwrap();
    init_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    let model_repo = Arc::new(SqliteModelRepository::from_connection(conn.clone()).unwrap());
    let price_catalog = Arc::new(SqlitePriceCatalog::from_connection(conn).unwrap());

    let importer = CatalogImporter::new();

    let models = csv_file(
        "model_code,customer,board,station_code,seq,qty,mp,ct\n\
         PX100,CUST-A,MAIN,MBT,1,2,0.5,20\n\
         PX100,CUST-A,MAIN,CAL,2,1,1.0,30\n\
         PX100,CUST-A,SUB,FQC,1,1,1.0,10\n\
         PX900,CUST-B,MAIN,OTA,1,1,0.5,40\n",
    );
    importer
        .import_models(models.path(), model_repo.as_ref())
        .unwrap();

    let prices = csv_file(
        "station_code,unit_price,cycle_time_sec\n\
         MBT,50000,20\n\
         CAL,30000,30\n\
         FQC,10000,10\n\
         OTA,60000,40\n",
    );
    importer
        .import_price_catalog(prices.path(), price_catalog.as_ref())
        .unwrap();

    QuoteApi::new(model_repo, price_catalog)
}

#[test]
fn test_full_rfq_workflow_from_pasted_table() {
    let api = build_api_from_files();

    // 客户粘贴的 Excel 表格
    let pasted = "Station Code\tSeq\tMP\tCT\nMBT\t1\t0.5\t20\nCAL\t2\t1.0\t30\nFQC\t3\t1.0\t10\n";

    // 1. 结构检测
    let detection = api.detect_table_structure(pasted);
    assert_eq!(detection.input_type, InputType::ExcelTable);
    assert!(detection.validation.unwrap().valid);

    // 2. 站位提取 + 规范化
    let stations = api.extract_station_set(pasted).unwrap();
    assert_eq!(stations.len(), 3);

    // 3. 相似机种检索: PX100 完全命中
    let request = SimilaritySearchRequest {
        station_codes: stations
            .codes()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        customer_id: None,
        limit: None,
        min_similarity: None,
    };
    let search = api.similarity_search(&request).unwrap();
    assert_eq!(search.results[0].model_code, "PX100");
    assert_eq!(search.results[0].score, 100);

    // 4. 选定机种比对 + 成本估算
    let model_id = search.results[0].model_id.clone();
    let codes: Vec<String> = stations
        .codes()
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();
    let comparison = api.model_comparison(&model_id, &codes).unwrap();

    assert_eq!(comparison.model.board_count, 2); // MAIN + SUB
    assert!(comparison.comparison.missing.is_empty());
    assert!(comparison.comparison.extra.is_empty());

    // 治具投资 = Σ(单价 × 台数): MBT×2 + CAL×1 + FQC×1
    assert_eq!(
        comparison.cost_estimate.fixture.total_investment,
        50_000.0 * 2.0 + 30_000.0 + 10_000.0
    );
    // 单班人力 = 0.5×2 + 1.0×1 + 1.0×1
    assert_eq!(comparison.cost_estimate.manpower.per_shift, 3.0);

    // 5. 风险评估: 默认目标 UPH=100, CAL 单台 120 UPH 不超载
    let assessment = api.risk_assessment(
        &comparison.cost_estimate.capacity,
        FeatureFlags::default(),
    );
    assert_eq!(assessment.risk_score, 0);
}

#[test]
fn test_workflow_inline_list_input() {
    let api = build_api_from_files();

    let stations = api.extract_station_set("mbt, cal, fqc").unwrap();
    let request = SimilaritySearchRequest {
        station_codes: stations
            .codes()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        customer_id: Some("CUST-A".to_string()),
        limit: None,
        min_similarity: None,
    };

    let search = api.similarity_search(&request).unwrap();
    assert_eq!(search.results.len(), 1);
    assert_eq!(search.results[0].model_code, "PX100");
}

#[test]
fn test_workflow_reimport_is_idempotent() {
    let conn = open_in_memory_connection().unwrap();
    init_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));
    let model_repo = Arc::new(SqliteModelRepository::from_connection(conn).unwrap());

    let importer = CatalogImporter::new();
    let file = csv_file(
        "model_code,station_code,qty\n\
         PX100,MBT,1\n\
         PX100,CAL,1\n",
    );

    let first = importer.import_models(file.path(), model_repo.as_ref()).unwrap();
    let second = importer.import_models(file.path(), model_repo.as_ref()).unwrap();

    assert_eq!(first.models_imported, second.models_imported);

    // 重复导入不翻倍站位明细
    use testline_rfq::repository::ModelRepository;
    let models = model_repo.fetch_all_models().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].station_set().len(), 2);
}
