use crate::resolver::ScriptRef;

/// One script to run, plus the batch label it was submitted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub script: ScriptRef,
    pub group: Option<String>,
}

impl ExecutionRequest {
    pub fn new(script: ScriptRef) -> Self {
        Self {
            script,
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}
