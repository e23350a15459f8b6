//! TF-IDF vectorization over word n-grams
//!
//! Weights follow the smoothed formulation `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! applied to raw term counts, with every document row L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use ndarray::{Array2, Axis};
use regex::Regex;
use thiserror::Error;

use crate::stopwords::ENGLISH_STOP_WORDS;

/// Words of two or more word characters
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"));

/// Why a vector space could not be built
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VectorizeError {
    #[error("Empty vocabulary: documents contain only stop words")]
    EmptyVocabulary,

    #[error("No terms remain after document-frequency pruning")]
    AllTermsPruned,
}

/// A fitted document-term matrix
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    /// Terms in column order
    pub vocabulary: Vec<String>,
    /// One L2-normalized row per document
    pub weights: Array2<f64>,
}

/// TF-IDF vectorizer configured once and fitted per document set
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    /// Drop terms present in more than this fraction of documents
    max_df: f64,
    /// Drop terms present in fewer than this many documents
    min_df: usize,
    stop_words: Option<&'static HashSet<&'static str>>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// Unigrams only, no stop words, no pruning
    pub fn new() -> Self {
        Self {
            ngram_range: (1, 1),
            max_df: 1.0,
            min_df: 1,
            stop_words: None,
        }
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        let min_n = min_n.max(1);
        self.ngram_range = (min_n, max_n.max(min_n));
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df.clamp(0.0, 1.0);
        self
    }

    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    pub fn with_stop_words_english(mut self) -> Self {
        self.stop_words = Some(&*ENGLISH_STOP_WORDS);
        self
    }

    /// Lowercase, tokenize, drop stop words, then emit n-grams joined by spaces
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lower = document.to_lowercase();
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| self.stop_words.map_or(true, |sw| !sw.contains(t)))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }

    /// Learn the vocabulary of `documents` and return their weight matrix
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<TfidfMatrix, VectorizeError> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| self.analyze(d.as_ref())).collect();

        // BTreeMap keeps column order independent of hashing
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &analyzed {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(VectorizeError::EmptyVocabulary);
        }

        let n_docs = documents.len();
        let max_doc_count = self.max_df * n_docs as f64;
        let kept: Vec<(&str, usize)> = doc_freq
            .into_iter()
            .filter(|&(_, df)| df >= self.min_df && df as f64 <= max_doc_count)
            .collect();

        if kept.is_empty() {
            return Err(VectorizeError::AllTermsPruned);
        }

        let column: HashMap<&str, usize> = kept
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (*term, idx))
            .collect();

        let mut weights = Array2::<f64>::zeros((n_docs, kept.len()));
        for (row, terms) in analyzed.iter().enumerate() {
            for term in terms {
                if let Some(&col) = column.get(term.as_str()) {
                    weights[[row, col]] += 1.0;
                }
            }
        }

        for (col, (_, df)) in kept.iter().enumerate() {
            let idf = ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0;
            weights.column_mut(col).mapv_inplace(|count| count * idf);
        }

        for mut row in weights.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|w| w / norm);
            }
        }

        Ok(TfidfMatrix {
            vocabulary: kept.into_iter().map(|(term, _)| term.to_string()).collect(),
            weights,
        })
    }
}
