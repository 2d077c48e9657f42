//! In-process doubles for the search and model seams.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    CompletionRequest, Error, Result, SearchClient, SearchOptions, SearchResult,
    SummarizationModel,
};

pub fn result(title: &str, url: &str, snippet: &str) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
        date_published: None,
    }
}

/// Answers each query from a fixed table and records every call.
#[derive(Default)]
pub struct StaticSearch {
    by_query: HashMap<String, Vec<SearchResult>>,
    fallback: Vec<SearchResult>,
    calls: Mutex<Vec<(String, SearchOptions)>>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: &str, results: Vec<SearchResult>) -> Self {
        self.by_query.insert(query.to_string(), results);
        self
    }

    /// Results for any query without an explicit entry
    pub fn with_fallback(mut self, results: Vec<SearchResult>) -> Self {
        self.fallback = results;
        self
    }

    pub fn calls(&self) -> Vec<(String, SearchOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for StaticSearch {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), options.clone()));
        Ok(self
            .by_query
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

pub struct FailingSearch;

#[async_trait]
impl SearchClient for FailingSearch {
    async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<Vec<SearchResult>> {
        Err(Error::Upstream("Bing search failed".to_string()))
    }
}

/// Replies `generated: <user prompt>` and fails for prompts containing any
/// of the configured markers.
#[derive(Default)]
pub struct ScriptedModel {
    fail_on: Vec<String>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_on.push(marker.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummarizationModel for ScriptedModel {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        let prompt = request.user_prompt().unwrap_or_default();
        if self.fail_on.iter().any(|m| prompt.contains(m.as_str())) {
            return Err(Error::Upstream("completion failed".to_string()));
        }
        Ok(format!("generated: {}", prompt))
    }
}
