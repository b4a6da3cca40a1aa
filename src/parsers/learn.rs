use super::{CHALLENGE_CARD, Document, ancestor, child_at, describe_path, text};
use crate::error::{Result, ScrapeError};
use crate::results::{Challenge, CourseLink, Lesson};
use crate::utils;

const COURSE_TITLE: &str = ".course-card > .card-body > .card-title";
const LESSON_NAME: &str = r#"[class="competition-name ml-8 w-full"]"#;

/// Course cards of the LEARN landing page.
///
/// The link is the second child of the card's last child.
pub fn courses(doc: &Document) -> Result<Vec<CourseLink>> {
    const RULE: &str = "learn course";

    let mut courses = Vec::new();
    for title in doc.select(COURSE_TITLE)? {
        let card = ancestor(title, 2, RULE)?;
        let last = super::element_children(card)
            .len()
            .checked_sub(1)
            .ok_or_else(|| ScrapeError::MissingElement {
                rule: RULE,
                path: "last child".to_string(),
            })?;
        let path = [last, 1];
        let link = child_at(card, &path, RULE)?;
        courses.push(CourseLink::new(
            text(title),
            doc.href(link, RULE, &describe_path(&path))?,
        ));
    }
    Ok(courses)
}

/// Lessons of a LEARN course page. The link wraps the name three levels up.
pub fn lessons(doc: &Document) -> Result<Vec<Lesson>> {
    const RULE: &str = "learn lesson";

    let mut lessons = Vec::new();
    for label in doc.select(LESSON_NAME)? {
        let link = ancestor(label, 3, RULE)?;
        lessons.push(Lesson {
            name: utils::lesson_name(&text(label)),
            url: doc.href(link, RULE, "parent^3")?,
        });
    }
    Ok(lessons)
}

/// Challenges listed on a lesson's `/challenges` page, with their level
pub fn lesson_challenges(doc: &Document) -> Result<Vec<Challenge>> {
    const RULE: &str = "learn challenge";
    const ANCHOR: [usize; 4] = [0, 0, 0, 0];
    const LEVEL: [usize; 4] = [0, 0, 1, 1];

    let mut challenges = Vec::new();
    for card in doc.select(CHALLENGE_CARD)? {
        let anchor = child_at(card, &ANCHOR, RULE)?;
        let level = child_at(card, &LEVEL, RULE)?;
        challenges.push(Challenge {
            name: utils::challenge_name(&text(anchor)),
            url: doc.href(anchor, RULE, &describe_path(&ANCHOR))?,
            level: Some(utils::level_label(&text(level))),
        });
    }
    Ok(challenges)
}
