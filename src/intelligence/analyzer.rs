/// Main analyzer orchestrator
///
/// Loads the corpus for a request and hands it to the right suggestion
/// mode. This is the only intelligence component that touches storage.

use crate::core::Retriever;
use crate::db::{Database, TaskQuery, TaskStatus};
use crate::error::{Result, TaskError};
use crate::intelligence::{
    FollowUp, PatternDetector, SuggestedTask, SuggestionEngine, SuggestionTarget,
};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// Which suggestion strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionMode {
    /// Sequence prediction merged with text similarity
    #[default]
    Smart,
    /// Titles that read alike
    Frequency,
    /// Completed titles that keep coming back
    Sequence,
    /// Completed tasks due on the same day
    Time,
}

impl FromStr for SuggestionMode {
    type Err = TaskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "smart" => Ok(SuggestionMode::Smart),
            "frequency" => Ok(SuggestionMode::Frequency),
            "sequence" => Ok(SuggestionMode::Sequence),
            "time" => Ok(SuggestionMode::Time),
            other => Err(TaskError::InvalidArgument(format!(
                "unknown mode '{}' (expected smart, frequency, sequence or time)",
                other
            ))),
        }
    }
}

/// How the caller names the task to compare against
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSpec {
    /// A stored task, looked up by id
    Task(i64),
    /// Free text
    Query(String),
}

/// One suggestion request
#[derive(Debug, Clone, Default)]
pub struct SuggestionRequest {
    pub mode: SuggestionMode,
    pub status: Option<TaskStatus>,
    pub target: Option<TargetSpec>,
    pub limit: usize,
}

/// Analysis report
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SuggestionReport {
    Tasks(Vec<SuggestedTask>),
    FollowUps(Vec<FollowUp>),
}

impl SuggestionReport {
    pub fn is_empty(&self) -> bool {
        match self {
            SuggestionReport::Tasks(tasks) => tasks.is_empty(),
            SuggestionReport::FollowUps(follow_ups) => follow_ups.is_empty(),
        }
    }
}

/// Main analyzer
pub struct Analyzer {
    retriever: Retriever,
}

impl Analyzer {
    /// Create a new analyzer
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            retriever: Retriever::new(db),
        }
    }

    /// Run one suggestion request
    ///
    /// The corpus is the status-filtered task list in creation order. An
    /// unknown target id is an error; everything else that finds nothing
    /// comes back as an empty report.
    pub async fn suggest(&self, request: &SuggestionRequest) -> Result<SuggestionReport> {
        let target = self.resolve_target(request.target.as_ref()).await?;
        let tasks = self
            .retriever
            .list(&TaskQuery::with_status(request.status))
            .await?;

        tracing::debug!(mode = ?request.mode, corpus = tasks.len(), "running suggestion request");

        let report = match request.mode {
            SuggestionMode::Smart => SuggestionReport::Tasks(SuggestionEngine::suggest(
                &tasks,
                target.as_ref(),
                request.limit,
            )),
            SuggestionMode::Frequency => {
                SuggestionReport::FollowUps(PatternDetector::similar_follow_ups(
                    &tasks,
                    target.as_ref().map(|t| t.title.as_str()),
                    request.limit,
                ))
            }
            SuggestionMode::Sequence => SuggestionReport::FollowUps(
                PatternDetector::recurring_follow_ups(&tasks, request.limit),
            ),
            SuggestionMode::Time => SuggestionReport::FollowUps(
                PatternDetector::same_day_follow_ups(&tasks, request.limit),
            ),
        };

        Ok(report)
    }

    async fn resolve_target(&self, spec: Option<&TargetSpec>) -> Result<Option<SuggestionTarget>> {
        match spec {
            None => Ok(None),
            Some(TargetSpec::Query(text)) => Ok(Some(SuggestionTarget::from_text(text.as_str()))),
            Some(TargetSpec::Task(id)) => {
                let task = self.retriever.require(*id).await?;
                Ok(Some(SuggestionTarget::from(&task)))
            }
        }
    }
}
