/// Errors that can occur while scraping or archiving
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("{rule}: expected element at {path} is missing")]
    MissingElement { rule: &'static str, path: String },

    #[error("{rule}: element at {path} has no href")]
    MissingHref { rule: &'static str, path: String },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid selector {0}")]
    InvalidSelector(String),

    #[error("No courses were found on the landing page")]
    NoCourses,

    #[error("You must choose at least one course.")]
    EmptySelection,

    #[error("Unknown course {0}")]
    UnknownCourse(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{0} was cancelled")]
    Cancelled(&'static str),

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Failed to connect to WebDriver at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("Browser command failed: {0}")]
    Browser(#[from] fantoccini::error::CmdError),

    #[error("Filesystem error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    /// Attach a path to an I/O error
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
