use super::{CHALLENGE_CARD, Document, child_at, describe_path, element_children, text};
use crate::error::Result;
use crate::results::{Challenge, CourseLink};
use crate::utils;

const CATEGORY_CARD: &str = ".card-cat";

// (name, link) child paths per card shape
const SINGLE_CHILD: (&[usize], &[usize]) = (&[0, 0], &[0, 1, 2]);
const TWO_CHILDREN: (&[usize], &[usize]) = (&[0], &[1, 2]);
const WITH_BADGE: (&[usize], &[usize]) = (&[1], &[2, 2]);

/// Category cards of the PRACTICE landing page.
///
/// Cards come in three shapes, told apart by their element child count.
pub fn courses(doc: &Document) -> Result<Vec<CourseLink>> {
    const RULE: &str = "practice course";

    let mut courses = Vec::new();
    for card in doc.select(CATEGORY_CARD)? {
        let (name_path, link_path) = match element_children(card).len() {
            0 | 1 => SINGLE_CHILD,
            2 => TWO_CHILDREN,
            _ => WITH_BADGE,
        };
        let name = text(child_at(card, name_path, RULE)?);
        let link = child_at(card, link_path, RULE)?;
        courses.push(CourseLink::new(
            name,
            doc.href(link, RULE, &describe_path(link_path))?,
        ));
    }
    Ok(courses)
}

/// Challenges of a PRACTICE category page
pub fn challenges(doc: &Document) -> Result<Vec<Challenge>> {
    const RULE: &str = "practice challenge";
    const ANCHOR: [usize; 4] = [0, 0, 0, 0];

    let mut challenges = Vec::new();
    for card in doc.select(CHALLENGE_CARD)? {
        let anchor = child_at(card, &ANCHOR, RULE)?;
        challenges.push(Challenge {
            name: utils::challenge_name(&text(anchor)),
            url: doc.href(anchor, RULE, &describe_path(&ANCHOR))?,
            level: None,
        });
    }
    Ok(challenges)
}
