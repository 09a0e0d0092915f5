/// Text similarity ranking
///
/// TF-IDF over the corpus's combined texts, compared with cosine similarity.
/// The model is fit fresh for every request and never cached.

use crate::intelligence::scorer::{Scorer, SparseVector};
use crate::intelligence::stop_words::ENGLISH_STOP_WORDS;
use std::collections::{BTreeMap, HashSet};

/// Neighbors at or below this score are not treated as the same kind of task
pub const FOLLOW_UP_THRESHOLD: f64 = 0.5;

/// Splits text into lowercase terms, dropping stop words
///
/// A term is a run of two or more word characters (letters, digits or `_`).
pub struct Tokenizer {
    stop_words: HashSet<&'static str>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|term| term.chars().count() >= 2)
            .filter(|term| !self.stop_words.contains(*term))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One ranked entry: a corpus position and its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMatch {
    pub index: usize,
    pub score: f64,
}

/// TF-IDF model fit on one corpus
pub struct TfIdfModel {
    tokenizer: Tokenizer,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<SparseVector>,
}

impl TfIdfModel {
    /// Fit on a corpus of texts
    ///
    /// Returns `None` for an empty corpus, where fitting is undefined. A
    /// corpus made only of stop words fits to an empty vocabulary and every
    /// similarity is 0.
    pub fn fit(texts: &[String]) -> Option<Self> {
        if texts.is_empty() {
            return None;
        }

        let tokenizer = Tokenizer::new();
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenizer.tokenize(t)).collect();

        // Vocabulary indices follow sorted term order
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let vocabulary: BTreeMap<String, usize> = document_frequency
            .keys()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        let idf = document_frequency
            .values()
            .map(|&df| Scorer::smooth_idf(texts.len(), df))
            .collect();

        let mut model = Self {
            tokenizer,
            vocabulary,
            idf,
            documents: Vec::with_capacity(texts.len()),
        };
        model.documents = tokenized.iter().map(|tokens| model.weigh(tokens)).collect();

        Some(model)
    }

    /// Project arbitrary text into the fitted space
    ///
    /// Terms the corpus never saw are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&self.tokenizer.tokenize(text))
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count as f64 * self.idf[index]))
            .collect();
        Scorer::l2_normalize(&mut vector);
        vector
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Similarity of `query` against every document (1 x N)
    pub fn query_scores(&self, query: &str) -> Vec<f64> {
        let vector = self.transform(query);
        self.documents
            .iter()
            .map(|doc| Scorer::cosine(&vector, doc))
            .collect()
    }

    /// Similarity of document `index` against every document, itself included
    pub fn row_scores(&self, index: usize) -> Vec<f64> {
        match self.documents.get(index) {
            Some(row) => self
                .documents
                .iter()
                .map(|doc| Scorer::cosine(row, doc))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Full N x N similarity matrix
    pub fn pairwise(&self) -> Vec<Vec<f64>> {
        (0..self.documents.len()).map(|i| self.row_scores(i)).collect()
    }
}

/// Ranks corpus positions by score, highest first
///
/// Equal scores keep corpus order. Asking for more than exists returns
/// what exists.
pub fn top_k(scores: &[f64], k: usize, exclude: Option<usize>) -> Vec<RankedMatch> {
    let mut ranked: Vec<RankedMatch> = scores
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != exclude)
        .map(|(index, &score)| RankedMatch { index, score })
        .collect();

    // sort_by is stable, so ties stay in corpus order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}

/// Rank corpus texts for a suggestion request
///
/// With a query (non-empty after trimming) every text is scored against it.
/// Without one, the first task anchors the ranking and its neighbors are
/// ranked with the task itself left out.
pub fn rank_similar(texts: &[String], query: Option<&str>, k: usize) -> Vec<RankedMatch> {
    if k == 0 {
        return Vec::new();
    }

    let Some(model) = TfIdfModel::fit(texts) else {
        return Vec::new();
    };

    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => {
            tracing::debug!(corpus = texts.len(), "ranking against query");
            top_k(&model.query_scores(query), k, None)
        }
        None => {
            tracing::debug!(corpus = texts.len(), "ranking pairwise from first task");
            top_k(&model.row_scores(0), k, Some(0))
        }
    }
}

/// Neighbors of each task scoring strictly above the follow-up threshold
///
/// Row `i` lists the other positions in descending score order.
pub fn follow_up_neighbors(model: &TfIdfModel) -> Vec<Vec<RankedMatch>> {
    model
        .pairwise()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            top_k(row, row.len(), Some(i))
                .into_iter()
                .filter(|m| m.score > FOLLOW_UP_THRESHOLD)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize() {
        let tokenizer = Tokenizer::new();

        let tokens = tokenizer.tokenize("Renew the driver's license at the DMV");
        assert_eq!(tokens, vec!["renew", "driver", "license", "dmv"]);

        // Everything here is a stop word or a single character
        assert!(tokenizer.tokenize("call me if I am up").is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        assert!(TfIdfModel::fit(&[]).is_none());
        assert!(rank_similar(&[], Some("anything"), 5).is_empty());
        assert!(rank_similar(&[], None, 5).is_empty());
    }

    #[test]
    fn test_query_ranking() {
        let corpus = texts(&[
            "Water plants ",
            "Renew driver's license ",
            "Pay electricity invoice ",
        ]);

        let ranked = rank_similar(&corpus, Some("Renew license DMV"), 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 1);
        assert!(ranked[0].score > 0.0);
    }

    #[test]
    fn test_blank_query_falls_back_to_pairwise() {
        let corpus = texts(&["Buy groceries ", "Cook dinner ", "Buy groceries "]);

        let ranked = rank_similar(&corpus, Some("   "), 5);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|m| m.index != 0));
        assert_eq!(ranked[0].index, 2);
    }

    #[test]
    fn test_pairwise_excludes_self_and_never_pads() {
        let corpus = texts(&["Buy groceries ", "Cook dinner ", "Wash dishes "]);

        let ranked = rank_similar(&corpus, None, 10);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|m| m.index != 0));
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let ranked = top_k(&[0.2, 0.7, 0.2, 0.7], 4, None);
        let order: Vec<usize> = ranked.iter().map(|m| m.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let corpus = texts(&[
            "Buy groceries milk eggs",
            "Buy groceries bread",
            "the and of",
            "Quarterly tax filing",
        ]);
        let model = TfIdfModel::fit(&corpus).unwrap();

        for row in model.pairwise() {
            for score in row {
                assert!((0.0..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_stop_word_text_scores_zero() {
        let corpus = texts(&["the and of", "Buy groceries"]);
        let model = TfIdfModel::fit(&corpus).unwrap();

        assert_eq!(model.row_scores(0), vec![0.0, 0.0]);
        assert_eq!(model.query_scores("the"), vec![0.0, 0.0]);
    }

    #[test]
    fn test_all_stop_words_corpus() {
        let corpus = texts(&["the", "and of"]);
        let model = TfIdfModel::fit(&corpus).unwrap();
        assert_eq!(model.vocabulary_size(), 0);

        let ranked = rank_similar(&corpus, None, 3);
        assert_eq!(ranked, vec![RankedMatch { index: 1, score: 0.0 }]);
    }

    #[test]
    fn test_follow_up_threshold() {
        let corpus = texts(&[
            "Buy groceries ",
            "Buy groceries ",
            "Cook dinner ",
        ]);
        let model = TfIdfModel::fit(&corpus).unwrap();
        let neighbors = follow_up_neighbors(&model);

        assert_eq!(neighbors[0].len(), 1);
        assert_eq!(neighbors[0][0].index, 1);
        assert!(neighbors[2].is_empty());
    }

    #[test]
    fn test_zero_budget() {
        let corpus = texts(&["Buy groceries "]);
        assert!(rank_similar(&corpus, Some("groceries"), 0).is_empty());
    }
}
