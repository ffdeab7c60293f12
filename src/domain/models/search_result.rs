use serde::Serialize;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_NUM_CANDIDATES: usize = 150;
pub const DEFAULT_MIN_SCORE: f32 = 0.6;
pub const DEFAULT_VECTOR_INDEX: &str = "vector_index";

#[derive(Debug, Clone, Serialize)]
pub struct ProductMatch {
    name: Option<String>,
    description: Option<String>,
    score: f32,
}

impl ProductMatch {
    pub fn new(name: Option<String>, description: Option<String>, score: f32) -> Self {
        Self {
            name,
            description,
            score,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn display_line(&self) -> String {
        format!(
            "{} (score: {:.3})",
            self.name.as_deref().unwrap_or("(unnamed)"),
            self.score
        )
    }
}

#[derive(Debug, Clone)]
pub struct ProductSearchQuery {
    query: String,
    limit: usize,
    num_candidates: usize,
    min_score: f32,
    index: String,
}

impl ProductSearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_SEARCH_LIMIT,
            num_candidates: DEFAULT_NUM_CANDIDATES,
            min_score: DEFAULT_MIN_SCORE,
            index: DEFAULT_VECTOR_INDEX.to_string(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_num_candidates(mut self, num_candidates: usize) -> Self {
        self.num_candidates = num_candidates;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Atlas requires `numCandidates >= limit`.
    pub fn num_candidates(&self) -> usize {
        self.num_candidates.max(self.limit)
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    pub fn index(&self) -> &str {
        &self.index
    }
}
