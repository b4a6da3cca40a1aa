//! Page query adapters.
//!
//! Each target has its own extraction rules over the markup of the site. All
//! DOM traversal lives here so the rest of the crate only sees typed records.

pub mod learn;
pub mod practice;


use crate::error::{Result, ScrapeError};
use crate::results::{CourseEntries, CourseLink, Target};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Class marker shared by challenge cards on course and lesson pages
pub const CHALLENGE_CARD: &str = r#"[class="card flex mb-4 challenge-card"]"#;

/// A parsed page together with the URL it was loaded from
pub struct Document {
    html: Html,
    base: Url,
}

impl Document {
    /// Parse page source, keeping the page URL for resolving relative links
    pub fn parse(source: &str, page_url: &str) -> Result<Self> {
        let base = Url::parse(page_url).map_err(|source| ScrapeError::InvalidUrl {
            url: page_url.to_string(),
            source,
        })?;
        Ok(Self {
            html: Html::parse_document(source),
            base,
        })
    }

    /// All elements matching a CSS selector, in document order
    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = Selector::parse(css)
            .map_err(|_| ScrapeError::InvalidSelector(css.to_string()))?;
        Ok(self.html.select(&selector).collect())
    }

    /// Resolve an href against the page URL
    pub fn resolve(&self, href: &str) -> Result<String> {
        self.base
            .join(href)
            .map(|url| url.to_string())
            .map_err(|source| ScrapeError::InvalidUrl {
                url: href.to_string(),
                source,
            })
    }

    /// Absolute href of an element
    pub fn href(&self, element: ElementRef<'_>, rule: &'static str, path: &str) -> Result<String> {
        let href = element
            .value()
            .attr("href")
            .ok_or_else(|| ScrapeError::MissingHref {
                rule,
                path: path.to_string(),
            })?;
        self.resolve(href)
    }
}

/// Element children of an element, skipping text and comment nodes
pub fn element_children<'a>(element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap).collect()
}

/// Walk element children by index, e.g. `&[0, 1, 2]` is `children[0].children[1].children[2]`
pub fn child_at<'a>(
    element: ElementRef<'a>,
    path: &[usize],
    rule: &'static str,
) -> Result<ElementRef<'a>> {
    let mut current = element;
    for (depth, &index) in path.iter().enumerate() {
        current = element_children(current)
            .get(index)
            .copied()
            .ok_or_else(|| ScrapeError::MissingElement {
                rule,
                path: describe_path(&path[..=depth]),
            })?;
    }
    Ok(current)
}

/// Walk up the tree a fixed number of element levels
pub fn ancestor<'a>(
    element: ElementRef<'a>,
    levels: usize,
    rule: &'static str,
) -> Result<ElementRef<'a>> {
    let mut current = element;
    for level in 1..=levels {
        current = current
            .parent()
            .and_then(ElementRef::wrap)
            .ok_or_else(|| ScrapeError::MissingElement {
                rule,
                path: format!("parent^{}", level),
            })?;
    }
    Ok(current)
}

/// Text content of an element with surrounding whitespace trimmed
pub fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Human readable form of a child path, used in error messages
pub fn describe_path(path: &[usize]) -> String {
    if path.is_empty() {
        return "self".to_string();
    }
    path.iter()
        .map(|index| format!("children[{}]", index))
        .collect::<Vec<_>>()
        .join(".")
}

/// Extract the course cards of a landing page for the given target
pub fn courses(target: Target, source: &str, page_url: &str) -> Result<Vec<CourseLink>> {
    let doc = Document::parse(source, page_url)?;
    let courses = match target {
        Target::Learn => learn::courses(&doc)?,
        Target::Practice => practice::courses(&doc)?,
    };
    ::log::debug!(
        "Extracted {} {} courses from {}",
        courses.len(),
        target,
        page_url
    );
    Ok(courses)
}

/// Extract the nested entries of a course page for the given target
pub fn course_entries(target: Target, source: &str, page_url: &str) -> Result<CourseEntries> {
    let doc = Document::parse(source, page_url)?;
    let entries = match target {
        Target::Learn => CourseEntries::Lessons(learn::lessons(&doc)?),
        Target::Practice => CourseEntries::Challenges(practice::challenges(&doc)?),
    };
    ::log::debug!("Extracted {} entries from {}", entries.len(), page_url);
    Ok(entries)
}
