use crate::browser::Page;
use crate::config::ArchiverConfig;
use crate::error::Result;
use crate::parsers::{self, Document, learn};
use crate::results::{Challenge, Course, CourseLink, Lesson, Target};
use crate::utils;

/// Navigate to the landing page of a target
pub async fn open_target<P: Page>(
    page: &mut P,
    config: &ArchiverConfig,
    target: Target,
) -> Result<()> {
    let url = config.landing_url(target);
    ::log::info!("Opening {} landing page: {}", target, url);
    page.goto(&url).await
}

/// Course cards of the landing page currently loaded
pub async fn list_courses<P: Page>(page: &mut P, target: Target) -> Result<Vec<CourseLink>> {
    let url = page.current_url().await?;
    let source = page.source().await?;
    let courses = parsers::courses(target, &source, &url)?;
    ::log::info!("Found {} {} courses", courses.len(), target);
    Ok(courses)
}

/// Visit each picked course in order and collect its lessons or challenges.
///
/// Every course is enumerated before this returns, so archiving works from
/// complete lists.
pub async fn populate_courses<P: Page>(
    page: &mut P,
    links: Vec<CourseLink>,
    target: Target,
) -> Result<Vec<Course>> {
    let mut courses = Vec::with_capacity(links.len());
    for link in links {
        page.goto(&link.url).await?;
        let source = page.source().await?;
        let entries = parsers::course_entries(target, &source, &link.url)?;
        ::log::info!("Course {}: {} entries", link.name, entries.len());
        courses.push(Course::new(link, entries));
    }
    if ::log::log_enabled!(::log::Level::Debug) {
        match serde_json::to_string(&courses) {
            Ok(json) => ::log::debug!("Enumerated courses: {}", json),
            Err(e) => ::log::warn!("Could not serialize enumerated courses: {}", e),
        }
    }
    Ok(courses)
}

/// Challenges listed on a lesson's `/challenges` page
pub async fn lesson_challenges<P: Page>(
    page: &mut P,
    lesson: &Lesson,
) -> Result<Vec<Challenge>> {
    let url = utils::sub_page(&lesson.url, "challenges");
    page.goto(&url).await?;
    let source = page.source().await?;
    let doc = Document::parse(&source, &url)?;
    let challenges = learn::lesson_challenges(&doc)?;
    ::log::debug!("Lesson {}: {} challenges", lesson.name, challenges.len());
    Ok(challenges)
}
