//! Reader options.

/// Options for decoding a project file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PbxReaderOptions {
    /// Project name to use instead of the one recovered from comments.
    pub project_name: Option<String>,
}

impl PbxReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the project name.
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }
}
