use std::path::PathBuf;

/// What the operator picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Catalog paths as multi-selected in a tree: files and directories mixed.
    Explicit(Vec<PathBuf>),
    /// Every file under `root` whose file name contains `keyword`.
    Keyword { root: PathBuf, keyword: String },
}

impl Selection {
    pub fn explicit<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::Explicit(paths.into_iter().map(Into::into).collect())
    }

    pub fn keyword(root: impl Into<PathBuf>, keyword: impl Into<String>) -> Self {
        Self::Keyword {
            root: root.into(),
            keyword: keyword.into(),
        }
    }
}
