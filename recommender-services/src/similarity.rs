//! Similarity ranking of stories against free text

use ndarray::ArrayView1;
use tracing::{debug, warn};

use recommender_core::Story;

use crate::vectorizer::{TfidfVectorizer, VectorizeError};

/// Calculate cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero length.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let dot_product = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    // Avoid division by zero
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// A candidate story with its similarity to the input text
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredStory<'a> {
    /// Cosine similarity in `[0, 1]`
    pub score: f64,
    pub story: &'a Story,
}

/// Result of ranking candidates
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome<'a> {
    /// Candidates sorted by descending similarity
    Ranked(Vec<ScoredStory<'a>>),
    /// No vector space could be built; every candidate scores 0 in input order
    Degraded {
        scored: Vec<ScoredStory<'a>>,
        reason: VectorizeError,
    },
}

impl<'a> RankOutcome<'a> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RankOutcome::Degraded { .. })
    }

    pub fn scored(&self) -> &[ScoredStory<'a>] {
        match self {
            RankOutcome::Ranked(scored) | RankOutcome::Degraded { scored, .. } => scored,
        }
    }

    pub fn into_scored(self) -> Vec<ScoredStory<'a>> {
        match self {
            RankOutcome::Ranked(scored) | RankOutcome::Degraded { scored, .. } => scored,
        }
    }
}

/// Ranks stories by TF-IDF cosine similarity to an input text
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    vectorizer: TfidfVectorizer,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityRanker {
    /// English stop words, unigrams and bigrams, terms in over 80% of documents dropped
    pub fn new() -> Self {
        Self {
            vectorizer: TfidfVectorizer::new()
                .with_stop_words_english()
                .with_ngram_range(1, 2)
                .with_max_df(0.8)
                .with_min_df(1),
        }
    }

    /// Score every candidate against `input_text`, highest first
    ///
    /// Ties keep the candidates' original order.
    pub fn rank<'a>(&self, input_text: &str, candidates: &'a [Story]) -> RankOutcome<'a> {
        if candidates.is_empty() {
            return RankOutcome::Ranked(Vec::new());
        }

        let documents: Vec<String> = std::iter::once(input_text.to_string())
            .chain(candidates.iter().map(Story::ranking_text))
            .collect();

        let matrix = match self.vectorizer.fit_transform(&documents) {
            Ok(matrix) => matrix,
            Err(reason) => {
                warn!("Similarity ranking degraded: {}", reason);
                let scored = candidates
                    .iter()
                    .map(|story| ScoredStory { score: 0.0, story })
                    .collect();
                return RankOutcome::Degraded { scored, reason };
            }
        };

        debug!(
            "Ranking {} candidates over {} terms",
            candidates.len(),
            matrix.vocabulary.len()
        );

        let input = matrix.weights.row(0);
        let mut scored: Vec<ScoredStory<'a>> = candidates
            .iter()
            .enumerate()
            .map(|(idx, story)| ScoredStory {
                score: cosine_similarity(input, matrix.weights.row(idx + 1)).clamp(0.0, 1.0),
                story,
            })
            .collect();

        // Stable: equal scores keep candidate order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        RankOutcome::Ranked(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn story(id: &str, title: &str, description: &str) -> Story {
        Story::new(id, title, format!("https://example.com/{id}"), description, vec![])
    }

    fn ids<'a>(outcome: &RankOutcome<'a>) -> Vec<&'a str> {
        outcome.scored().iter().map(|s| s.story.id.as_str()).collect()
    }

    fn candidates() -> Vec<Story> {
        vec![
            story("1", "City Council Approves Budget", "The council voted 5-2 to approve the budget."),
            story("2", "Local Bakery Wins Award", "A downtown bakery won a regional baking award."),
            story("3", "School Board Delays Vote", "The board postponed a vote on new school start times."),
        ]
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = array![1.0, 2.0, 3.0];
        let sim = cosine_similarity(a.view(), a.view());
        assert!((sim - 1.0).abs() < 1e-9, "Identical vectors should have similarity ~1.0");
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = array![1.0, 0.0, 0.0];
        let b = array![0.0, 1.0, 0.0];
        assert!(cosine_similarity(a.view(), b.view()).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = array![0.0, 0.0];
        let b = array![1.0, 1.0];
        assert_eq!(cosine_similarity(a.view(), b.view()), 0.0);
    }

    #[test]
    fn test_rank_empty_candidates() {
        let outcome = SimilarityRanker::new().rank("anything", &[]);
        assert_eq!(outcome, RankOutcome::Ranked(Vec::new()));
    }

    #[test]
    fn test_rank_orders_best_match_first() {
        let stories = candidates();
        let outcome = SimilarityRanker::new().rank("City council budget vote", &stories);

        assert!(!outcome.is_degraded());
        let scored = outcome.scored();
        assert_eq!(scored[0].story.id, "1");
        assert!(scored[0].score > scored[1].score);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(scored.iter().all(|s| (0.0..=1.0).contains(&s.score)));
    }

    #[test]
    fn test_rank_is_deterministic() {
        let stories = candidates();
        let ranker = SimilarityRanker::new();
        let first = ranker.rank("bakery award downtown", &stories);
        let second = ranker.rank("bakery award downtown", &stories);
        assert_eq!(first, second);
        assert_eq!(ids(&first)[0], "2");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let stories = candidates();
        // No overlap with any candidate: every score is 0
        let outcome = SimilarityRanker::new().rank("volcano eruption", &stories);
        assert!(!outcome.is_degraded());
        assert_eq!(ids(&outcome), vec!["1", "2", "3"]);
        assert!(outcome.scored().iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn test_empty_vocabulary_degrades() {
        let stories = vec![story("1", "The", "and of the"), story("2", "Which", "would be")];
        let outcome = SimilarityRanker::new().rank("the of and", &stories);

        assert!(outcome.is_degraded());
        assert_eq!(ids(&outcome), vec!["1", "2"]);
        assert!(outcome.scored().iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn test_degraded_outcome_keeps_reason_when_cloned() {
        let stories = vec![story("1", "The", "and of the")];
        let outcome = SimilarityRanker::new().rank("which would", &stories);

        let copy = outcome.clone();
        assert_eq!(copy, outcome);
        match copy {
            RankOutcome::Degraded { reason, .. } => assert_eq!(reason, VectorizeError::EmptyVocabulary),
            RankOutcome::Ranked(_) => panic!("expected a degraded outcome"),
        }
    }

    #[test]
    fn test_title_weighs_more_than_description() {
        let stories = vec![
            story("desc", "Weather Update", "Transit expansion mentioned briefly."),
            story("title", "Transit Expansion", "Weather update mentioned briefly."),
            story("other", "Bakery Wins Award", "Downtown bakery celebrates."),
        ];
        let outcome = SimilarityRanker::new().rank("transit expansion", &stories);
        assert_eq!(ids(&outcome)[0], "title");
    }
}
