pub mod archive;
pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod parsers;
pub mod progress;
pub mod prompt;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use archive::{ArchiveSummary, Archiver};
pub use browser::{Page, WebSession};
pub use config::{ArchiverConfig, Credentials};
pub use error::ScrapeError;
pub use results::{Challenge, Course, CourseEntries, CourseLink, Lesson, Target};
