/// Intelligence module
///
/// Suggests follow-up tasks from task history: text similarity, sequence
/// prediction and the engine that merges them.

pub mod analyzer;
pub mod corpus;
pub mod pattern_detector;
pub mod scorer;
pub mod sequence_predictor;
pub mod stop_words;
pub mod suggestion_engine;
pub mod text_similarity;

pub use analyzer::{Analyzer, SuggestionMode, SuggestionReport, SuggestionRequest, TargetSpec};
pub use corpus::{Corpus, SuggestedTask};
pub use pattern_detector::{FollowUp, PatternDetector, PatternType};
pub use scorer::Scorer;
pub use sequence_predictor::{Prediction, SequencePredictor, TransitionTable};
pub use suggestion_engine::{SuggestionEngine, SuggestionTarget};
pub use text_similarity::{RankedMatch, TfIdfModel, Tokenizer};
