// ==========================================
// 测试线报价系统 - 站位代码与站位集合
// ==========================================
// 规则: 站位代码统一转大写、去首尾空白、去重
// 红线: StationCode 一经构造即为规范形式,相等性只看规范形式
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// StationCode - 站位代码 (规范化值对象)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationCode(String);

impl StationCode {
    /// 从原始 token 构造站位代码
    ///
    /// # 规则
    /// - 去首尾空白
    /// - 统一转大写
    /// - 空 token 返回 None
    pub fn new(raw: &str) -> Option<Self> {
        let canonical = raw.trim().to_uppercase();
        if canonical.is_empty() {
            None
        } else {
            Some(Self(canonical))
        }
    }

    /// 规范形式字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// StationSet - 站位集合
// ==========================================
// 顺序无关的集合语义,但保留首次出现顺序用于有序输出
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSet {
    codes: Vec<StationCode>,
}

impl StationSet {
    /// 空集合
    pub fn empty() -> Self {
        Self { codes: Vec::new() }
    }

    /// 从原始 token 序列规范化构造
    ///
    /// # 规则
    /// - 逐个 token 规范化 (见 StationCode::new)
    /// - 丢弃空 token
    /// - 按规范形式去重,保留首次出现顺序
    pub fn normalize<S: AsRef<str>>(raw_tokens: &[S]) -> Self {
        let mut codes: Vec<StationCode> = Vec::new();
        for token in raw_tokens {
            if let Some(code) = StationCode::new(token.as_ref()) {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
        }
        Self { codes }
    }

    /// 从已规范化的代码序列构造（仍去重、保序）
    pub fn from_codes(codes: Vec<StationCode>) -> Self {
        let mut deduped: Vec<StationCode> = Vec::new();
        for code in codes {
            if !deduped.contains(&code) {
                deduped.push(code);
            }
        }
        Self { codes: deduped }
    }

    /// 集合大小
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// 是否包含指定代码
    pub fn contains(&self, code: &StationCode) -> bool {
        self.codes.contains(code)
    }

    /// 有序代码切片（首次出现顺序）
    pub fn codes(&self) -> &[StationCode] {
        &self.codes
    }

    /// 交集（保留 self 的顺序）
    pub fn intersection(&self, other: &StationSet) -> StationSet {
        StationSet {
            codes: self
                .codes
                .iter()
                .filter(|c| other.contains(c))
                .cloned()
                .collect(),
        }
    }

    /// 差集 self - other（保留 self 的顺序）
    pub fn difference(&self, other: &StationSet) -> StationSet {
        StationSet {
            codes: self
                .codes
                .iter()
                .filter(|c| !other.contains(c))
                .cloned()
                .collect(),
        }
    }

    /// 并集大小
    pub fn union_len(&self, other: &StationSet) -> usize {
        let extra = other.codes.iter().filter(|c| !self.contains(c)).count();
        self.codes.len() + extra
    }

    /// 是否为 other 的子集
    pub fn is_subset_of(&self, other: &StationSet) -> bool {
        self.codes.iter().all(|c| other.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_code_canonical() {
        let code = StationCode::new("  mbt ").unwrap();
        assert_eq!(code.as_str(), "MBT");
        assert_eq!(code, StationCode::new("MBT").unwrap());
    }

    #[test]
    fn test_station_code_empty_is_none() {
        assert!(StationCode::new("   ").is_none());
        assert!(StationCode::new("").is_none());
    }

    #[test]
    fn test_normalize_dedupe_preserves_order() {
        let set = StationSet::normalize(&["mbt", " CAL", "MBT", "", "rft1"]);
        let codes: Vec<&str> = set.codes().iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["MBT", "CAL", "RFT1"]);
    }

    #[test]
    fn test_set_operations() {
        let a = StationSet::normalize(&["MBT", "CAL", "RFT1"]);
        let b = StationSet::normalize(&["CAL", "FQC"]);

        let inter = a.intersection(&b);
        assert_eq!(inter.len(), 1);
        assert!(inter.contains(&StationCode::new("CAL").unwrap()));

        let diff = a.difference(&b);
        assert_eq!(diff.len(), 2);

        assert_eq!(a.union_len(&b), 4);
        assert!(inter.is_subset_of(&a));
        assert!(inter.is_subset_of(&b));
    }
}
