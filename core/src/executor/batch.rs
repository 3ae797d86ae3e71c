use std::path::Path;

use crate::catalog::Catalog;
use crate::config::BatchesConfig;
use crate::resolver::{resolve, ScriptRef, Selection};

use super::types::ExecutionRequest;

const SELECTION_LABEL: &str = "selection";

/// The two keyword batches offered next to free selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedBatch {
    /// "Complete Check": every audit script.
    Check,
    /// "Complete Fix": every remediation script.
    Fix,
}

impl NamedBatch {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Fix => "fix",
        }
    }

    pub fn keyword<'a>(&self, cfg: &'a BatchesConfig) -> &'a str {
        match self {
            Self::Check => &cfg.check_keyword,
            Self::Fix => &cfg.fix_keyword,
        }
    }
}

/// An ordered set of scripts executed as one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    label: String,
    keyword: Option<String>,
    scripts: Vec<ScriptRef>,
}

impl Batch {
    pub fn new(scripts: Vec<ScriptRef>) -> Self {
        Self::labeled(SELECTION_LABEL, scripts)
    }

    pub fn labeled(label: impl Into<String>, scripts: Vec<ScriptRef>) -> Self {
        Self {
            label: label.into(),
            keyword: None,
            scripts,
        }
    }

    /// Resolve `selection` against `catalog`. Keyword selections are labeled with their keyword.
    pub fn from_selection(catalog: &Catalog, selection: &Selection) -> Self {
        let scripts = resolve(catalog, selection);
        match selection {
            Selection::Keyword { keyword, .. } => Self {
                label: keyword.clone(),
                keyword: Some(keyword.clone()),
                scripts,
            },
            Selection::Explicit(_) => Self::new(scripts),
        }
    }

    pub fn named(catalog: &Catalog, root: &Path, which: NamedBatch, cfg: &BatchesConfig) -> Self {
        let keyword = which.keyword(cfg);
        Self {
            label: which.label().to_string(),
            keyword: Some(keyword.to_string()),
            scripts: resolve(catalog, &Selection::keyword(root, keyword)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// What to call this batch when it turns out empty.
    pub fn subject(&self) -> &str {
        self.keyword.as_deref().unwrap_or(&self.label)
    }

    pub fn scripts(&self) -> &[ScriptRef] {
        &self.scripts
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub(crate) fn into_requests(self) -> Vec<ExecutionRequest> {
        let label = self.label;
        self.scripts
            .into_iter()
            .map(|script| ExecutionRequest::new(script).with_group(label.clone()))
            .collect()
    }
}
