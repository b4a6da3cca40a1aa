//! Interactive prompts. The choice logic is kept in plain functions so it can
//! be tested without a terminal.

use crate::error::{Result, ScrapeError};
use crate::results::{CourseLink, Target};
use dialoguer::{MultiSelect, Select};

/// Ask which part of the site to archive
pub fn select_target() -> Result<Target> {
    let labels: Vec<&str> = Target::ALL.iter().map(Target::label).collect();
    let choice = Select::new()
        .with_prompt("Select target page")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    choice
        .map(|index| Target::ALL[index])
        .ok_or(ScrapeError::Cancelled("Target selection"))
}

/// Ask which courses to archive, re-prompting until at least one is chosen
pub fn pick_courses(candidates: &[CourseLink]) -> Result<Vec<CourseLink>> {
    if candidates.is_empty() {
        return Err(ScrapeError::NoCourses);
    }

    let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
    loop {
        let chosen = MultiSelect::new()
            .with_prompt("Select the courses you want")
            .items(&names)
            .interact_opt()?
            .ok_or(ScrapeError::Cancelled("Course selection"))?;

        let picked: Vec<&str> = chosen.iter().map(|&index| names[index]).collect();
        match resolve_selection(candidates, &picked) {
            Err(ScrapeError::EmptySelection) => {
                println!("{}", ScrapeError::EmptySelection);
            }
            result => return result,
        }
    }
}

/// Map chosen names back to their course links.
///
/// The first candidate with a matching name wins when names repeat.
pub fn resolve_selection(candidates: &[CourseLink], chosen: &[&str]) -> Result<Vec<CourseLink>> {
    if chosen.is_empty() {
        return Err(ScrapeError::EmptySelection);
    }

    chosen
        .iter()
        .map(|name| {
            candidates
                .iter()
                .find(|candidate| candidate.name == *name)
                .cloned()
                .ok_or_else(|| ScrapeError::UnknownCourse(name.to_string()))
        })
        .collect()
}
