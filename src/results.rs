use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level content mode of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Target {
    /// Structured lessons, each with its own challenge list
    Learn,
    /// Standalone challenges grouped by category
    Practice,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Learn, Target::Practice];

    /// Prompt label
    pub fn label(&self) -> &'static str {
        match self {
            Target::Learn => "LEARN",
            Target::Practice => "PRACTICE",
        }
    }

    /// Path of the landing page listing this target's courses
    pub fn landing_path(&self) -> &'static str {
        match self {
            Target::Learn => "/learn",
            Target::Practice => "/challenges",
        }
    }

    /// Directory segment under the archive root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Target::Learn => "Learn",
            Target::Practice => "Practice",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A course card from a landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLink {
    pub name: String,
    pub url: String,
}

impl CourseLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A lesson inside a LEARN course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub name: String,
    pub url: String,
}

/// A challenge, either under a PRACTICE course or under a LEARN lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub name: String,
    pub url: String,

    /// Difficulty label, only present for lesson challenges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Nested entries of a course, shaped by the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items")]
pub enum CourseEntries {
    Lessons(Vec<Lesson>),
    Challenges(Vec<Challenge>),
}

impl CourseEntries {
    pub fn len(&self) -> usize {
        match self {
            CourseEntries::Lessons(lessons) => lessons.len(),
            CourseEntries::Challenges(challenges) => challenges.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A selected course with its entries already enumerated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub url: String,
    pub entries: CourseEntries,
}

impl Course {
    pub fn new(link: CourseLink, entries: CourseEntries) -> Self {
        Self {
            name: link.name,
            url: link.url,
            entries,
        }
    }
}
