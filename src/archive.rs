use crate::browser::Page;
use crate::catalog;
use crate::error::{Result, ScrapeError};
use crate::progress::Progress;
use crate::results::{Challenge, Course, CourseEntries, Lesson, Target};
use crate::utils;
use std::path::{Path, PathBuf};

pub const CHALLENGE_PNG: &str = "challenge.png";
pub const WRITEUP_PNG: &str = "writeup.png";
pub const LESSON_PNG: &str = "lesson.png";
pub const CHALLENGES_DIR: &str = "challenges";

/// Counts of what an archiving run produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub courses: usize,
    pub directories: usize,
    pub screenshots: usize,
}

/// Walks enumerated courses and saves screenshots into a mirrored tree:
///
/// ```text
/// <root>/Practice/<course>/<challenge>/{challenge,writeup}.png
/// <root>/Learn/<course>/<lesson>/lesson.png
/// <root>/Learn/<course>/<lesson>/challenges/[<level>] <challenge>/{challenge,writeup}.png
/// ```
pub struct Archiver<'a, P: Page, R: Progress> {
    page: &'a mut P,
    root: PathBuf,
    progress: &'a R,
    summary: ArchiveSummary,
}

impl<'a, P: Page, R: Progress> Archiver<'a, P, R> {
    /// `root` is the `CyberTalents` directory itself
    pub fn new(page: &'a mut P, root: impl Into<PathBuf>, progress: &'a R) -> Self {
        Self {
            page,
            root: root.into(),
            progress,
            summary: ArchiveSummary::default(),
        }
    }

    /// Archive every course in order, stopping at the first error
    pub async fn archive(mut self, courses: &[Course]) -> Result<ArchiveSummary> {
        for course in courses {
            match &course.entries {
                CourseEntries::Challenges(challenges) => {
                    let dir = self.course_dir(Target::Practice, course);
                    self.archive_practice(course, challenges, &dir).await?;
                }
                CourseEntries::Lessons(lessons) => {
                    let dir = self.course_dir(Target::Learn, course);
                    self.archive_learn(course, lessons, &dir).await?;
                }
            }
            self.summary.courses += 1;
        }
        ::log::info!(
            "Archived {} courses: {} directories, {} screenshots",
            self.summary.courses,
            self.summary.directories,
            self.summary.screenshots
        );
        Ok(self.summary)
    }

    fn course_dir(&self, target: Target, course: &Course) -> PathBuf {
        self.root
            .join(target.dir_name())
            .join(utils::path_segment(&course.name))
    }

    async fn archive_practice(
        &mut self,
        course: &Course,
        challenges: &[Challenge],
        course_dir: &Path,
    ) -> Result<()> {
        let task = self.progress.start(&course.name, challenges.len());
        for challenge in challenges {
            let dir = course_dir.join(utils::path_segment(&challenge.name));
            self.save_challenge(challenge, &dir).await?;
            self.progress.advance(&task);
        }
        self.progress.finish(task);
        Ok(())
    }

    async fn archive_learn(
        &mut self,
        course: &Course,
        lessons: &[Lesson],
        course_dir: &Path,
    ) -> Result<()> {
        let task = self.progress.start(&course.name, lessons.len());
        for lesson in lessons {
            let lesson_dir = course_dir.join(utils::path_segment(&lesson.name));
            create_dir(&lesson_dir).await?;
            self.summary.directories += 1;

            self.page.goto(&lesson.url).await?;
            self.capture(&lesson_dir.join(LESSON_PNG)).await?;

            let challenges = catalog::lesson_challenges(&mut *self.page, lesson).await?;
            let challenges_dir = lesson_dir.join(CHALLENGES_DIR);
            create_dir(&challenges_dir).await?;

            let nested = self.progress.start("challenge", challenges.len());
            for challenge in &challenges {
                let name = utils::leveled_dir_name(challenge.level.as_deref(), &challenge.name);
                let dir = challenges_dir.join(utils::path_segment(&name));
                self.save_challenge(challenge, &dir).await?;
                self.progress.advance(&nested);
            }
            self.progress.finish(nested);

            self.progress.advance(&task);
        }
        self.progress.finish(task);
        Ok(())
    }

    /// Challenge page and its writeups page into one directory
    async fn save_challenge(&mut self, challenge: &Challenge, dir: &Path) -> Result<()> {
        create_dir(dir).await?;
        self.summary.directories += 1;

        self.page.goto(&challenge.url).await?;
        self.capture(&dir.join(CHALLENGE_PNG)).await?;

        self.page
            .goto(&utils::sub_page(&challenge.url, "writeups"))
            .await?;
        self.capture(&dir.join(WRITEUP_PNG)).await
    }

    async fn capture(&mut self, path: &Path) -> Result<()> {
        if let Err(e) = self.page.hide_chrome().await {
            ::log::warn!("Could not hide page chrome before {}: {}", path.display(), e);
        }
        self.page.screenshot(path).await?;
        self.summary.screenshots += 1;
        Ok(())
    }
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| ScrapeError::io(path, e))
}
