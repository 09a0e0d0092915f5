/// Suggestion engine
///
/// Merges the two signals into one ranked list of follow-up tasks. A
/// confident sequence prediction goes first; text similarity fills the rest
/// of the budget.
///
/// Every call is a pure function of its inputs. Nothing is cached between
/// requests, so concurrent calls need no coordination.

use crate::db::Task;
use crate::intelligence::corpus::{Corpus, SuggestedTask};
use crate::intelligence::sequence_predictor::SequencePredictor;
use crate::intelligence::text_similarity::rank_similar;

/// The task suggestions are compared against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionTarget {
    pub title: String,
    pub description: Option<String>,
}

impl SuggestionTarget {
    /// Free-text target with no description
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            title: text.into(),
            description: None,
        }
    }

    /// Title and description joined by a space, skipping a missing description
    pub fn query_text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.title, description),
            None => self.title.clone(),
        }
    }
}

impl From<&Task> for SuggestionTarget {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
        }
    }
}

/// Suggestion engine
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Suggest up to `top_n` follow-up tasks
    ///
    /// # Arguments
    /// * `tasks` - Corpus, already filtered and ordered by the caller
    /// * `target` - Optional task to compare against
    /// * `top_n` - Result budget; 0 asks for nothing
    ///
    /// # Returns
    /// * Between 0 and `top_n` suggestions, never padded
    pub fn suggest(
        tasks: &[Task],
        target: Option<&SuggestionTarget>,
        top_n: usize,
    ) -> Vec<SuggestedTask> {
        if top_n == 0 || tasks.is_empty() {
            return Vec::new();
        }

        let corpus = Corpus::new(tasks);
        tracing::debug!(corpus = corpus.len(), top_n, "generating suggestions");

        let predicted = SequencePredictor::predict_next(corpus.texts())
            .and_then(|prediction| corpus.first_index_of(&prediction.text))
            .and_then(|index| corpus.suggestion(index));

        let query = target.map(SuggestionTarget::query_text);

        match predicted {
            Some(prediction) if top_n > 1 => {
                let mut suggestions = Self::similar(&corpus, query.as_deref(), top_n - 1);
                suggestions.insert(0, prediction);
                suggestions
            }
            Some(prediction) => vec![prediction],
            None => Self::similar(&corpus, query.as_deref(), top_n),
        }
    }

    /// Similarity-only ranking, materialized as suggestions
    fn similar(corpus: &Corpus<'_>, query: Option<&str>, top_n: usize) -> Vec<SuggestedTask> {
        rank_similar(corpus.texts(), query, top_n)
            .into_iter()
            .filter_map(|ranked| corpus.suggestion(ranked.index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TaskStatus;
    use chrono::Utc;

    fn task(title: &str, description: &str) -> Task {
        Task {
            id: 0,
            title: title.to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            created_at: Utc::now(),
            due_date: None,
            status: TaskStatus::Completed,
        }
    }

    fn titles(suggestions: &[SuggestedTask]) -> Vec<&str> {
        suggestions.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_empty_corpus() {
        assert!(SuggestionEngine::suggest(&[], None, 5).is_empty());

        let target = SuggestionTarget::from_text("anything");
        assert!(SuggestionEngine::suggest(&[], Some(&target), 5).is_empty());
    }

    #[test]
    fn test_zero_budget() {
        let tasks = vec![task("Buy groceries", ""), task("Buy groceries", "")];
        assert!(SuggestionEngine::suggest(&tasks, None, 0).is_empty());
    }

    #[test]
    fn test_prediction_is_prepended() {
        let tasks = vec![
            task("Buy groceries", ""),
            task("Cook dinner", ""),
            task("Buy groceries", ""),
            task("Cook dinner", ""),
        ];

        let suggestions = SuggestionEngine::suggest(&tasks, None, 3);

        // Cook -> Buy with probability 1.0, then the first task's neighbors
        assert_eq!(
            titles(&suggestions),
            vec!["Buy groceries", "Buy groceries", "Cook dinner"]
        );
    }

    #[test]
    fn test_prediction_alone_when_budget_is_one() {
        let tasks = vec![
            task("Buy groceries", ""),
            task("Cook dinner", ""),
            task("Buy groceries", ""),
            task("Cook dinner", ""),
        ];

        let suggestions = SuggestionEngine::suggest(&tasks, None, 1);
        assert_eq!(titles(&suggestions), vec!["Buy groceries"]);
    }

    #[test]
    fn test_similarity_only_without_prediction() {
        let tasks = vec![
            task("Water plants", ""),
            task("Renew driver's license", ""),
            task("Pay electricity invoice", ""),
            task("Book dentist appointment", ""),
        ];
        let target = SuggestionTarget {
            title: "Renew license".to_string(),
            description: Some("DMV".to_string()),
        };

        let suggestions = SuggestionEngine::suggest(&tasks, Some(&target), 1);
        assert_eq!(titles(&suggestions), vec!["Renew driver's license"]);
    }

    #[test]
    fn test_budget_larger_than_corpus() {
        let tasks = vec![
            task("Water plants", ""),
            task("Pay rent", ""),
            task("Wash car", ""),
        ];

        // Pairwise mode leaves the anchor task out
        let suggestions = SuggestionEngine::suggest(&tasks, None, 10);
        assert_eq!(suggestions.len(), 2);

        let target = SuggestionTarget::from_text("rent");
        let suggestions = SuggestionEngine::suggest(&tasks, Some(&target), 10);
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].title, "Pay rent");
    }

    #[test]
    fn test_prediction_uses_first_matching_row() {
        let due = Utc::now();
        let mut first = task("Buy groceries", "");
        first.due_date = Some(due);
        let tasks = vec![
            first,
            task("Cook dinner", ""),
            task("Buy groceries", ""),
            task("Cook dinner", ""),
        ];

        let suggestions = SuggestionEngine::suggest(&tasks, None, 1);
        assert_eq!(suggestions[0].due_date, Some(due));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let tasks = vec![task("Buy groceries", "milk"), task("Cook dinner", "")];
        let before = tasks.clone();

        let _ = SuggestionEngine::suggest(&tasks, None, 5);
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_query_text() {
        let target = SuggestionTarget {
            title: "Renew license".to_string(),
            description: Some("DMV".to_string()),
        };
        assert_eq!(target.query_text(), "Renew license DMV");
        assert_eq!(SuggestionTarget::from_text("Pay rent").query_text(), "Pay rent");
    }
}
