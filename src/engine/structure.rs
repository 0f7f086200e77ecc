// ==========================================
// 测试线报价系统 - 表格结构检测引擎
// ==========================================
// 职责: 粘贴/上传文本 → 结构分类 + 表格解析 + 列语义推断
// 流水线: detect_input_type → parse_table → merge_multi_row_headers
//         → detect_columns → validate_detection
// 红线: 全程无状态、无 I/O; STATION_CODE 列缺失即判定无效
// ==========================================

use crate::domain::table::{
    ColumnDetection, DetectionValidation, ParsedTable, StructureDetection,
};
use crate::domain::types::{ColumnRole, InputType};

// ==========================================
// 分类策略常量
// ==========================================

/// EXCEL_TABLE 判定: 至少几行共享相同分隔符数
const EXCEL_MIN_DELIMITED_LINES: usize = 2;

/// EXCEL_TABLE 判定: 每行至少几个分隔符
const EXCEL_MIN_DELIMITERS_PER_LINE: usize = 2;

/// SIMPLE_LIST 固定置信度
const SIMPLE_LIST_CONFIDENCE: f64 = 0.9;

/// INLINE_LIST 固定置信度
const INLINE_LIST_CONFIDENCE: f64 = 0.8;

/// 表头判定: 非数值单元格占比下限
const HEADER_NON_NUMERIC_RATIO: f64 = 0.6;

/// 表头判定: 单元格平均长度上限
const HEADER_AVG_TOKEN_LEN: f64 = 12.0;

/// 列角色得分下限, 低于此值判为 UNKNOWN
const MIN_ROLE_SCORE: f64 = 0.3;

/// 关键词命中权重 / 内容形态权重
const KEYWORD_WEIGHT: f64 = 0.6;
const CONTENT_WEIGHT: f64 = 0.4;

// ==========================================
// 列角色规则表 (声明式)
// ==========================================

/// 内容形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentKind {
    Code,    // 字母数字代码 (含字母, 不是纯数值)
    Integer, // 整数
    Decimal, // 小数/数值
    Text,    // 任意非空文本
}

/// 单条列角色规则: 表头关键词 + 内容形态
struct ColumnRoleRule {
    role: ColumnRole,
    keywords: &'static [&'static str],
    content: ContentKind,
}

/// 规则表: 每列对每条规则独立打分, 最高分胜出
const COLUMN_RULES: &[ColumnRoleRule] = &[
    ColumnRoleRule {
        role: ColumnRole::StationCode,
        keywords: &["code", "station", "站位", "工站", "代码"],
        content: ContentKind::Code,
    },
    ColumnRoleRule {
        role: ColumnRole::Sequence,
        keywords: &["seq", "no", "顺序", "序号"],
        content: ContentKind::Integer,
    },
    ColumnRoleRule {
        role: ColumnRole::Manpower,
        keywords: &["mp", "manpower", "operator", "人力", "人员"],
        content: ContentKind::Decimal,
    },
    ColumnRoleRule {
        role: ColumnRole::CycleTime,
        keywords: &["cycle", "ct", "sec", "节拍", "秒"],
        content: ContentKind::Decimal,
    },
    ColumnRoleRule {
        role: ColumnRole::BoardType,
        keywords: &["board", "板别", "板"],
        content: ContentKind::Text,
    },
];

// ==========================================
// TableStructureDetector - 结构检测引擎
// ==========================================
pub struct TableStructureDetector {
    // 无状态引擎
}

impl TableStructureDetector {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 总入口
    // ==========================================

    /// 完整检测流水线
    ///
    /// EXCEL_TABLE 附带表格解析/列推断/校验结果;
    /// 列表类输入只返回分类与置信度
    pub fn detect(&self, raw_text: &str) -> StructureDetection {
        let (input_type, confidence, delimiter) = self.detect_input_type(raw_text);

        match (input_type, delimiter) {
            (InputType::ExcelTable, Some(delim)) => {
                let mut table = self.parse_table(raw_text, delim);
                self.merge_multi_row_headers(&mut table);
                let columns = self.detect_columns(&table);
                let validation = self.validate_detection(&columns);

                tracing::debug!(
                    rows = table.row_count,
                    cols = table.col_count,
                    valid = validation.valid,
                    "表格结构检测完成"
                );

                StructureDetection {
                    input_type,
                    confidence,
                    table: Some(table),
                    columns: Some(columns),
                    validation: Some(validation),
                }
            }
            _ => StructureDetection {
                input_type,
                confidence,
                table: None,
                columns: None,
                validation: None,
            },
        }
    }

    // ==========================================
    // 阶段 1: 输入结构分类
    // ==========================================

    /// 根据分隔符密度分类输入结构
    ///
    /// # 判定策略
    /// - ≥2 行共享相同的分隔符数且每行 ≥2 个 → EXCEL_TABLE (tab 优先于逗号)
    /// - 单行且含逗号 → INLINE_LIST
    /// - 每行一个 token (无分隔符) → SIMPLE_LIST
    /// - 其余 → UNKNOWN
    ///
    /// # 返回
    /// (类型, 置信度, 表格分隔符)
    pub fn detect_input_type(&self, raw_text: &str) -> (InputType, f64, Option<char>) {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(|l| l.trim_end())
            .filter(|l| !l.trim().is_empty())
            .collect();

        if lines.is_empty() {
            return (InputType::Unknown, 0.0, None);
        }

        // tab 优先于逗号: Excel 粘贴默认 tab 分隔
        for delim in ['\t', ','] {
            if let Some(confidence) = self.excel_confidence(&lines, delim) {
                return (InputType::ExcelTable, confidence, Some(delim));
            }
        }

        // 单行逗号分隔 → INLINE_LIST
        if lines.len() == 1 && lines[0].contains(',') {
            return (InputType::InlineList, INLINE_LIST_CONFIDENCE, None);
        }

        // 每行一个 token → SIMPLE_LIST
        let all_single_token = lines
            .iter()
            .all(|l| !l.contains('\t') && !l.contains(',') && !l.trim().contains(' '));
        if all_single_token {
            return (InputType::SimpleList, SIMPLE_LIST_CONFIDENCE, None);
        }

        (InputType::Unknown, 0.0, None)
    }

    /// EXCEL_TABLE 置信度: 与主导列数一致的行占比
    ///
    /// 不满足判定策略时返回 None
    fn excel_confidence(&self, lines: &[&str], delim: char) -> Option<f64> {
        let counts: Vec<usize> = lines
            .iter()
            .map(|l| l.matches(delim).count())
            .collect();

        // 主导分隔符数 (众数, 仅统计 ≥ 下限的行)
        let mut best: Option<(usize, usize)> = None; // (count, lines)
        for &c in &counts {
            if c < EXCEL_MIN_DELIMITERS_PER_LINE {
                continue;
            }
            let freq = counts.iter().filter(|&&x| x == c).count();
            match best {
                Some((_, best_freq)) if freq <= best_freq => {}
                _ => best = Some((c, freq)),
            }
        }

        match best {
            Some((_, freq)) if freq >= EXCEL_MIN_DELIMITED_LINES => {
                Some(freq as f64 / lines.len() as f64)
            }
            _ => None,
        }
    }

    // ==========================================
    // 阶段 2: 表格解析
    // ==========================================

    /// 以主导分隔符切分表头行与数据行
    ///
    /// 与导入器一致: 单元格去首尾空白, 跳过完全空白的行
    pub fn parse_table(&self, raw_text: &str, delimiter: char) -> ParsedTable {
        let mut lines = raw_text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|line| {
                line.split(delimiter)
                    .map(|cell| cell.trim().to_string())
                    .collect::<Vec<String>>()
            })
            .filter(|cells| cells.iter().any(|c| !c.is_empty()));

        let headers: Vec<String> = lines.next().unwrap_or_default();
        let rows: Vec<Vec<String>> = lines.collect();

        let col_count = headers.len();
        let row_count = rows.len();

        ParsedTable {
            headers,
            rows,
            row_count,
            col_count,
        }
    }

    // ==========================================
    // 阶段 3: 多行表头合并
    // ==========================================

    /// 前两行均为表头形态时, 按列拼接为单行表头
    ///
    /// 表头形态: 非数值单元格占比 ≥ 60% 且平均长度较短
    pub fn merge_multi_row_headers(&self, table: &mut ParsedTable) {
        if table.rows.is_empty() {
            return;
        }
        if !self.looks_like_header(&table.headers) || !self.looks_like_header(&table.rows[0]) {
            return;
        }

        let second = table.rows.remove(0);
        for (i, extra) in second.iter().enumerate() {
            if extra.is_empty() {
                continue;
            }
            match table.headers.get_mut(i) {
                Some(header) if header.is_empty() => *header = extra.clone(),
                Some(header) => {
                    header.push(' ');
                    header.push_str(extra);
                }
                None => table.headers.push(extra.clone()),
            }
        }
        table.row_count = table.rows.len();
        table.col_count = table.headers.len();
    }

    /// 表头形态判定
    fn looks_like_header(&self, cells: &[String]) -> bool {
        let non_empty: Vec<&String> = cells.iter().filter(|c| !c.is_empty()).collect();
        if non_empty.is_empty() {
            return false;
        }

        let non_numeric = non_empty
            .iter()
            .filter(|c| c.parse::<f64>().is_err())
            .count();
        let non_numeric_ratio = non_numeric as f64 / non_empty.len() as f64;

        let avg_len = non_empty.iter().map(|c| c.chars().count()).sum::<usize>() as f64
            / non_empty.len() as f64;

        non_numeric_ratio >= HEADER_NON_NUMERIC_RATIO && avg_len <= HEADER_AVG_TOKEN_LEN
    }

    // ==========================================
    // 阶段 4: 列语义推断
    // ==========================================

    /// 对每一列按规则表打分, 最高分角色胜出
    ///
    /// 置信度 = 前两名得分的归一化差距 (top-second)/top, 限制在 [0,1]
    pub fn detect_columns(&self, table: &ParsedTable) -> Vec<ColumnDetection> {
        (0..table.col_count)
            .map(|index| {
                let header = table
                    .headers
                    .get(index)
                    .map(|h| h.to_lowercase())
                    .unwrap_or_default();
                let cells: Vec<&str> = table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|c| c.as_str())
                    .filter(|c| !c.is_empty())
                    .collect();

                let mut scores: Vec<(ColumnRole, f64)> = COLUMN_RULES
                    .iter()
                    .map(|rule| (rule.role, self.score_rule(rule, &header, &cells)))
                    .collect();
                scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

                let (top_role, top_score) = scores[0];
                let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

                if top_score < MIN_ROLE_SCORE {
                    ColumnDetection {
                        index,
                        role: ColumnRole::Unknown,
                        confidence: 0.0,
                    }
                } else {
                    let confidence = ((top_score - second_score) / top_score).clamp(0.0, 1.0);
                    ColumnDetection {
                        index,
                        role: top_role,
                        confidence,
                    }
                }
            })
            .collect()
    }

    /// 单规则得分: 关键词命中 × 0.6 + 内容形态匹配占比 × 0.4
    fn score_rule(&self, rule: &ColumnRoleRule, header_lower: &str, cells: &[&str]) -> f64 {
        let keyword_hit = rule
            .keywords
            .iter()
            .any(|kw| header_lower.contains(kw));
        let keyword_score = if keyword_hit { KEYWORD_WEIGHT } else { 0.0 };

        let content_score = if cells.is_empty() {
            0.0
        } else {
            let matching = cells
                .iter()
                .filter(|cell| self.matches_content(rule.content, cell))
                .count();
            CONTENT_WEIGHT * matching as f64 / cells.len() as f64
        };

        keyword_score + content_score
    }

    /// 内容形态判定 (与导入器一致, 用 parse 探测数值)
    fn matches_content(&self, kind: ContentKind, cell: &str) -> bool {
        match kind {
            ContentKind::Integer => cell.parse::<i64>().is_ok(),
            ContentKind::Decimal => cell.parse::<f64>().is_ok(),
            ContentKind::Code => {
                cell.parse::<f64>().is_err()
                    && cell.len() >= 2
                    && cell.len() <= 12
                    && cell.chars().any(|c| c.is_ascii_alphabetic())
                    && cell
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            }
            ContentKind::Text => !cell.is_empty(),
        }
    }

    // ==========================================
    // 阶段 5: 检测校验
    // ==========================================

    /// STATION_CODE 列为下游必需, 缺失即无效
    pub fn validate_detection(&self, columns: &[ColumnDetection]) -> DetectionValidation {
        let has_station_code = columns.iter().any(|c| c.role == ColumnRole::StationCode);
        if has_station_code {
            DetectionValidation {
                valid: true,
                message: None,
            }
        } else {
            DetectionValidation {
                valid: false,
                message: Some("未识别出站位代码列, 无法用于后续匹配".to_string()),
            }
        }
    }

    // ==========================================
    // 站位代码提取 (供规范化器的上游数据流)
    // ==========================================

    /// 从任意结构的输入中提取原始站位 token
    ///
    /// - EXCEL_TABLE: 取 STATION_CODE 列的数据单元格
    /// - SIMPLE_LIST: 每行一个
    /// - INLINE_LIST: 逗号切分
    /// - UNKNOWN: 空
    pub fn extract_station_codes(&self, raw_text: &str) -> Vec<String> {
        let detection = self.detect(raw_text);

        match detection.input_type {
            InputType::ExcelTable => {
                let (table, columns) = match (detection.table, detection.columns) {
                    (Some(t), Some(c)) => (t, c),
                    _ => return Vec::new(),
                };
                let code_col = columns
                    .iter()
                    .find(|c| c.role == ColumnRole::StationCode)
                    .map(|c| c.index);
                match code_col {
                    Some(index) => table
                        .rows
                        .iter()
                        .filter_map(|row| row.get(index))
                        .filter(|c| !c.is_empty())
                        .cloned()
                        .collect(),
                    None => Vec::new(),
                }
            }
            InputType::SimpleList => raw_text
                .lines()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            InputType::InlineList => raw_text
                .lines()
                .next()
                .map(|line| {
                    line.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            InputType::Unknown => Vec::new(),
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for TableStructureDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_excel_table_tab_delimited() {
        let detector = TableStructureDetector::new();
        let text = "Station Code\tSeq\tMP\tCT\nMBT\t1\t0.5\t20\nCAL\t2\t1.0\t30\n";

        let (input_type, confidence, delim) = detector.detect_input_type(text);
        assert_eq!(input_type, InputType::ExcelTable);
        assert!(confidence >= 0.7);
        assert_eq!(delim, Some('\t'));
    }

    #[test]
    fn test_detect_simple_list() {
        let detector = TableStructureDetector::new();
        let (input_type, confidence, _) = detector.detect_input_type("MBT\nCAL\nRFT1\n");
        assert_eq!(input_type, InputType::SimpleList);
        assert!(confidence > 0.0);
    }

    #[test]
    fn test_detect_inline_list() {
        let detector = TableStructureDetector::new();
        let (input_type, _, _) = detector.detect_input_type("MBT, CAL, RFT1, FQC");
        assert_eq!(input_type, InputType::InlineList);
    }

    #[test]
    fn test_detect_unknown() {
        let detector = TableStructureDetector::new();
        let (input_type, confidence, _) =
            detector.detect_input_type("这是一段没有结构的描述文字 关于产品");
        assert_eq!(input_type, InputType::Unknown);
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_empty_input_is_unknown() {
        let detector = TableStructureDetector::new();
        let (input_type, _, _) = detector.detect_input_type("   \n  \n");
        assert_eq!(input_type, InputType::Unknown);
    }

    #[test]
    fn test_parse_table_basic() {
        let detector = TableStructureDetector::new();
        let table =
            detector.parse_table("Code\tSeq\tMP\nMBT\t1\t0.5\nCAL\t2\t1.0\n", '\t');

        assert_eq!(table.headers, vec!["Code", "Seq", "MP"]);
        assert_eq!(table.row_count, 2);
        assert_eq!(table.col_count, 3);
        assert_eq!(table.rows[0][0], "MBT");
    }

    #[test]
    fn test_merge_multi_row_headers() {
        let detector = TableStructureDetector::new();
        let text = "Station\tCycle\tMan\nCode\tTime\tPower\nMBT\t20\t0.5\nCAL\t30\t1.0\n";
        let mut table = detector.parse_table(text, '\t');
        detector.merge_multi_row_headers(&mut table);

        assert_eq!(table.headers, vec!["Station Code", "Cycle Time", "Man Power"]);
        assert_eq!(table.row_count, 2);
    }

    #[test]
    fn test_merge_skips_numeric_second_row() {
        let detector = TableStructureDetector::new();
        let text = "Code\tSeq\tCT\nMBT\t1\t20\nCAL\t2\t30\n";
        let mut table = detector.parse_table(text, '\t');
        detector.merge_multi_row_headers(&mut table);

        // 第二行是数据行 (多数为数值), 不应被合并
        assert_eq!(table.headers, vec!["Code", "Seq", "CT"]);
        assert_eq!(table.row_count, 2);
    }

    #[test]
    fn test_detect_columns_scenario_c() {
        // 场景 C: 含 "code" 表头的列被推断为 STATION_CODE
        let detector = TableStructureDetector::new();
        let text = "Station Code\tSeq\tMP\tCT(sec)\nMBT\t1\t0.5\t20\nCAL\t2\t1.0\t30\nRFT1\t3\t0.5\t25\n";
        let detection = detector.detect(text);

        assert_eq!(detection.input_type, InputType::ExcelTable);
        assert!(detection.confidence >= 0.7);

        let columns = detection.columns.unwrap();
        assert_eq!(columns[0].role, ColumnRole::StationCode);
        assert_eq!(columns[1].role, ColumnRole::Sequence);
        assert_eq!(columns[2].role, ColumnRole::Manpower);
        assert_eq!(columns[3].role, ColumnRole::CycleTime);
        assert!(detection.validation.unwrap().valid);
    }

    #[test]
    fn test_column_confidence_in_unit_range() {
        let detector = TableStructureDetector::new();
        let text = "Code\tSeq\tCT\nMBT\t1\t20\nCAL\t2\t30\n";
        let detection = detector.detect(text);
        assert_eq!(detection.input_type, InputType::ExcelTable);

        for col in detection.columns.unwrap() {
            assert!((0.0..=1.0).contains(&col.confidence));
        }
    }

    #[test]
    fn test_single_delimiter_lines_are_not_a_table() {
        // 每行仅 1 个分隔符, 低于表格判定下限 → 不产生表格解析结果
        let detector = TableStructureDetector::new();
        let text = "Code\tSeq\nMBT\t1\nCAL\t2\n";

        let (input_type, confidence, delim) = detector.detect_input_type(text);
        assert_eq!(input_type, InputType::Unknown);
        assert_eq!(confidence, 0.0);
        assert_eq!(delim, None);

        let detection = detector.detect(text);
        assert!(detection.table.is_none());
        assert!(detection.columns.is_none());
    }

    #[test]
    fn test_validation_fails_without_station_code_column() {
        let detector = TableStructureDetector::new();
        // 纯数值表格, 无代码列
        let text = "Seq\tMP\tCT\n1\t0.5\t20\n2\t1.0\t30\n";
        let detection = detector.detect(text);

        let validation = detection.validation.unwrap();
        assert!(!validation.valid);
        assert!(validation.message.is_some());
    }

    #[test]
    fn test_extract_station_codes_from_excel() {
        let detector = TableStructureDetector::new();
        let text = "Station Code\tSeq\tMP\nMBT\t1\t0.5\nCAL\t2\t1.0\n";
        let codes = detector.extract_station_codes(text);
        assert_eq!(codes, vec!["MBT", "CAL"]);
    }

    #[test]
    fn test_extract_station_codes_from_lists() {
        let detector = TableStructureDetector::new();
        assert_eq!(
            detector.extract_station_codes("MBT\nCAL\n"),
            vec!["MBT", "CAL"]
        );
        assert_eq!(
            detector.extract_station_codes("MBT, CAL, FQC"),
            vec!["MBT", "CAL", "FQC"]
        );
    }
}
