//! TF-IDF 벡터화
//!
//! - 소문자 변환 후 `\b\w\w+\b` 토큰 추출
//! - 영어 불용어 제거
//! - 어휘는 사전순 정렬
//! - 평활 idf: `ln((1 + n) / (1 + df)) + 1`
//! - 행 단위 L2 정규화
//!
//! 대부분의 성분이 0이므로 행은 `(특징 인덱스, 값)` 희소 표현으로 보관합니다.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;

use super::ClusterError;
use super::stop_words::is_stop_word;

/// 토큰 패턴 (두 글자 이상의 단어 문자 연속)
pub(crate) const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// 희소 행 벡터
pub(crate) type SparseRow = Vec<(usize, f64)>;

/// 벡터화 결과
#[derive(Debug, Clone)]
pub(crate) struct TfidfMatrix {
    /// 문서별 L2 정규화된 희소 벡터 (특징 인덱스 오름차순)
    pub rows: Vec<SparseRow>,
    /// 어휘 크기
    pub n_features: usize,
}

/// TF-IDF 벡터라이저
#[derive(Clone)]
pub(crate) struct TfidfVectorizer {
    token: Regex,
}

impl TfidfVectorizer {
    pub(crate) fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token: Regex::new(TOKEN_PATTERN)?,
        })
    }

    fn tokenize<'a>(&self, lowered: &'a str) -> impl Iterator<Item = &'a str> {
        self.token
            .find_iter(lowered)
            .map(|m| m.as_str())
            .filter(|tok| !is_stop_word(tok))
    }

    /// 문서 목록을 TF-IDF 행렬로 변환합니다.
    ///
    /// 모든 토큰이 불용어이거나 토큰이 없으면 [`ClusterError::EmptyVocabulary`]입니다.
    pub(crate) fn fit_transform(&self, documents: &[String]) -> Result<TfidfMatrix, ClusterError> {
        let lowered: Vec<String> = documents.iter().map(|d| d.to_lowercase()).collect();

        // 문서별 단어 빈도
        let counts: Vec<HashMap<&str, usize>> = lowered
            .iter()
            .map(|doc| {
                let mut tf = HashMap::new();
                for tok in self.tokenize(doc) {
                    *tf.entry(tok).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // 문서 빈도 (정렬된 어휘)
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *document_frequency.entry(*term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ClusterError::EmptyVocabulary);
        }

        let n_docs = documents.len() as f64;
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (i, (term, df)) in document_frequency.iter().enumerate() {
            index.insert(*term, i);
            idf.push(((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0);
        }

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: SparseRow = tf
                    .iter()
                    .filter_map(|(term, count)| {
                        index
                            .get(term)
                            .map(|&feature| (feature, *count as f64 * idf[feature]))
                    })
                    .collect();
                row.sort_unstable_by_key(|(feature, _)| *feature);

                let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in &mut row {
                        *v /= norm;
                    }
                }
                row
            })
            .collect();

        Ok(TfidfMatrix {
            rows,
            n_features: document_frequency.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn vocabulary_excludes_stop_words_and_short_tokens() {
        let v = TfidfVectorizer::new().unwrap();
        let m = v
            .fit_transform(&docs(&["the NullPointer in a handler x", "handler failed"]))
            .unwrap();
        // failed, handler, nullpointer
        assert_eq!(m.n_features, 3);
    }

    #[test]
    fn rows_are_unit_length() {
        let v = TfidfVectorizer::new().unwrap();
        let m = v
            .fit_transform(&docs(&[
                "NullPointerException in handler",
                "handler handler crashed",
                "ClassCastException thrown",
            ]))
            .unwrap();
        for row in &m.rows {
            let norm: f64 = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let v = TfidfVectorizer::new().unwrap();
        // 어휘: common(0), rare(1)
        let m = v.fit_transform(&docs(&["common rare", "common"])).unwrap();
        let first = &m.rows[0];
        assert_eq!(first.len(), 2);
        assert!(first[1].1 > first[0].1);
    }

    #[test]
    fn only_stop_words_is_empty_vocabulary() {
        let v = TfidfVectorizer::new().unwrap();
        let err = v.fit_transform(&docs(&["the and of", "a an"])).unwrap_err();
        assert!(matches!(err, ClusterError::EmptyVocabulary));
    }

    #[test]
    fn document_without_terms_is_zero_vector() {
        let v = TfidfVectorizer::new().unwrap();
        let m = v.fit_transform(&docs(&["crashed", "the"])).unwrap();
        assert!(m.rows[1].is_empty());
    }
}
