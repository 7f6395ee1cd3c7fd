use thiserror::Error;

/// Failures the command line reports with their own exit status.
#[derive(Debug, Error)]
pub enum Url2BibError {
    #[error("did you forget 'http(s)'? usage: url2bib <URL>")]
    Usage,
    #[error("failed to resolve Wikipedia citation data for {url}")]
    WikipediaUnresolved { url: String },
}

impl Url2BibError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Url2BibError::Usage => 3,
            Url2BibError::WikipediaUnresolved { .. } => 1,
        }
    }
}
