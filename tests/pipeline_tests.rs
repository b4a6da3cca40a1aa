use ct_archiver::archive::{CHALLENGE_PNG, LESSON_PNG, WRITEUP_PNG};
use ct_archiver::error::{Result, ScrapeError};
use ct_archiver::progress::{Progress, Silent};
use ct_archiver::{
    ArchiverConfig, Archiver, Course, CourseEntries, Page, Target, catalog, prompt,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SITE: &str = "https://cybertalents.com";
const EMPTY_PAGE: &str = "<html><body></body></html>";

/// In-memory site serving fixture HTML by URL
#[derive(Default)]
struct FakeSite {
    pages: HashMap<String, String>,
    current: String,
    visits: Vec<String>,
    hide_calls: usize,
    fail_hide: bool,
}

impl FakeSite {
    fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl Page for FakeSite {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.visits.push(url.to_string());
        self.current = url.to_string();
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.current.clone())
    }

    async fn source(&mut self) -> Result<String> {
        Ok(self
            .pages
            .get(&self.current)
            .cloned()
            .unwrap_or_else(|| EMPTY_PAGE.to_string()))
    }

    async fn hide_chrome(&mut self) -> Result<()> {
        self.hide_calls += 1;
        if self.fail_hide {
            return Err(ScrapeError::MissingElement {
                rule: "page chrome",
                path: "footer".to_string(),
            });
        }
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<()> {
        fs::write(path, format!("PNG of {}", self.current))
            .map_err(|e| ScrapeError::io(path, e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Start(usize, String, usize),
    Advance(usize),
    Finish(usize),
}

/// Progress reporter that keeps every call it receives
#[derive(Default)]
struct Recorder {
    events: RefCell<Vec<Event>>,
    next_id: RefCell<usize>,
}

impl Progress for Recorder {
    type Task = usize;

    fn start(&self, title: &str, total: usize) -> usize {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id += 1;
        self.events
            .borrow_mut()
            .push(Event::Start(id, title.to_string(), total));
        id
    }

    fn advance(&self, task: &usize) {
        self.events.borrow_mut().push(Event::Advance(*task));
    }

    fn finish(&self, task: usize) {
        self.events.borrow_mut().push(Event::Finish(task));
    }
}

impl Recorder {
    /// `(title, total)` of every started task, in start order
    fn starts(&self) -> Vec<(String, usize)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Start(_, title, total) => Some((title.clone(), *total)),
                _ => None,
            })
            .collect()
    }

    fn advances(&self, id: usize) -> usize {
        let events = self.events.borrow();
        events.iter().filter(|e| **e == Event::Advance(id)).count()
    }

    fn finished(&self, id: usize) -> bool {
        self.events.borrow().contains(&Event::Finish(id))
    }
}

fn practice_card(name: &str, slug: &str) -> String {
    format!(
        r#"<div class="card-cat"><h4>{name}</h4><div><span>1</span><span>x</span><a href="/challenges/category/{slug}">View</a></div></div>"#
    )
}

fn challenge_card(name: &str, href: &str, level: Option<&str>) -> String {
    let level = level
        .map(|l| format!("<div><span>*</span><span>{l}</span></div>"))
        .unwrap_or_default();
    format!(
        r#"<div class="card flex mb-4 challenge-card"><div><div><h3><a href="{href}">{name}</a></h3>{level}</div></div></div>"#
    )
}

fn page(body: &str) -> String {
    format!("<html><body>{body}</body></html>")
}

fn practice_category(slug: &str, count: usize) -> String {
    let cards: String = (1..=count)
        .map(|i| {
            let name = format!("{slug} challenge {i}?");
            challenge_card(&name, &format!("/challenges/{slug}/{i}"), None)
        })
        .collect();
    page(&cards)
}

fn practice_site() -> FakeSite {
    let landing = page(&format!(
        "{}{}{}",
        practice_card("Web", "web"),
        practice_card("Crypto", "crypto"),
        practice_card("Forensics", "forensics")
    ));
    FakeSite::default()
        .with_page(format!("{SITE}/challenges"), landing)
        .with_page(format!("{SITE}/challenges/category/web"), practice_category("web", 3))
        .with_page(format!("{SITE}/challenges/category/crypto"), practice_category("crypto", 5))
}

fn learn_site() -> FakeSite {
    let landing = page(
        r#"<div class="course-card">
             <div class="card-body"><h5 class="card-title">Web Security</h5></div>
             <div class="card-footer"><span>2 lessons</span><a href="/learn/web-security">Start</a></div>
           </div>"#,
    );
    let course = page(
        r#"<a href="/learn/web-security/intro"><div><div><span class="competition-name ml-8 w-full">Intro-Module(Level 1)</span></div></div></a>
           <a href="/learn/web-security/sqli"><div><div><span class="competition-name ml-8 w-full">SQL-Injection (Medium)</span></div></div></a>"#,
    );
    FakeSite::default()
        .with_page(format!("{SITE}/learn"), landing)
        .with_page(format!("{SITE}/learn/web-security"), course)
        .with_page(
            format!("{SITE}/learn/web-security/intro/challenges"),
            page(&challenge_card(
                "Cookie Monster",
                "/challenges/web/cookie",
                Some("Difficulty: Easy"),
            )),
        )
        .with_page(
            format!("{SITE}/learn/web-security/sqli/challenges"),
            page(&challenge_card(
                "Union Station?",
                "/challenges/web/union",
                Some("Difficulty: Hard"),
            )),
        )
}

/// Runs the pipeline after the prompts: landing page, course pick, enumeration
async fn enumerate(site: &mut FakeSite, target: Target, picks: &[&str]) -> Result<Vec<Course>> {
    catalog::open_target(site, &ArchiverConfig::default(), target).await?;
    let available = catalog::list_courses(site, target).await?;
    let picked = prompt::resolve_selection(&available, picks)?;
    catalog::populate_courses(site, picked, target).await
}

/// Relative paths of every file under `root`, sorted
fn files_under(root: &Path) -> Vec<PathBuf> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

#[tokio::test]
async fn test_practice_two_courses_make_eight_challenge_dirs() {
    let mut site = practice_site();
    let courses = enumerate(&mut site, Target::Practice, &["Web", "Crypto"])
        .await
        .unwrap();
    let sizes: Vec<usize> = courses.iter().map(|c| c.entries.len()).collect();
    assert_eq!(sizes, vec![3, 5]);

    let out = TempDir::new().unwrap();
    let root = out.path().join("CyberTalents");
    let summary = Archiver::new(&mut site, &root, &Silent)
        .archive(&courses)
        .await
        .unwrap();

    assert_eq!(summary.courses, 2);
    assert_eq!(summary.directories, 8);
    assert_eq!(summary.screenshots, 16);

    let practice = root.join("Practice");
    for (course, slug, count) in [("Web", "web", 3), ("Crypto", "crypto", 5)] {
        let dirs = fs::read_dir(practice.join(course)).unwrap().count();
        assert_eq!(dirs, count);
        for i in 1..=count {
            let dir = practice.join(course).join(format!("{slug} challenge {i} "));
            assert!(dir.join(CHALLENGE_PNG).is_file(), "missing {}", dir.display());
            assert!(dir.join(WRITEUP_PNG).is_file(), "missing {}", dir.display());
        }
    }
    assert!(!practice.join("Forensics").exists());
    assert_eq!(files_under(&root).len(), 16);

    let writeup_path = practice.join("Web/web challenge 1 ").join(WRITEUP_PNG);
    let writeup = fs::read_to_string(writeup_path).unwrap();
    assert_eq!(writeup, format!("PNG of {SITE}/challenges/web/1/writeups"));
    assert_eq!(site.hide_calls, 16);
}

#[tokio::test]
async fn test_learn_lessons_and_nested_challenges() {
    let mut site = learn_site();
    let courses = enumerate(&mut site, Target::Learn, &["Web Security"]).await.unwrap();
    assert!(matches!(&courses[0].entries, CourseEntries::Lessons(lessons) if lessons.len() == 2));

    let out = TempDir::new().unwrap();
    let root = out.path().join("CyberTalents");
    let summary = Archiver::new(&mut site, &root, &Silent)
        .archive(&courses)
        .await
        .unwrap();

    let expected: Vec<PathBuf> = [
        "Learn/Web Security/Intro- Module/challenges/[Easy] Cookie Monster/challenge.png",
        "Learn/Web Security/Intro- Module/challenges/[Easy] Cookie Monster/writeup.png",
        "Learn/Web Security/Intro- Module/lesson.png",
        "Learn/Web Security/SQL- Injection/challenges/[Hard] Union Station /challenge.png",
        "Learn/Web Security/SQL- Injection/challenges/[Hard] Union Station /writeup.png",
        "Learn/Web Security/SQL- Injection/lesson.png",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(files_under(&root), expected);
    assert_eq!(summary.screenshots, 6);
    assert_eq!(summary.directories, 4);

    let lesson_path = root.join("Learn/Web Security/Intro- Module").join(LESSON_PNG);
    let lesson = fs::read_to_string(lesson_path).unwrap();
    assert_eq!(lesson, format!("PNG of {SITE}/learn/web-security/intro"));
    assert!(site.visits.contains(&format!("{SITE}/learn/web-security/sqli/challenges")));
}

#[tokio::test]
async fn test_zero_courses_refuses_to_continue() {
    let mut site = FakeSite::default().with_page(format!("{SITE}/challenges"), EMPTY_PAGE);
    catalog::open_target(&mut site, &ArchiverConfig::default(), Target::Practice)
        .await
        .unwrap();
    let available = catalog::list_courses(&mut site, Target::Practice).await.unwrap();
    assert!(available.is_empty());

    let out = TempDir::new().unwrap();
    assert!(matches!(prompt::pick_courses(&available), Err(ScrapeError::NoCourses)));
    assert!(!out.path().join("CyberTalents").exists());
}

#[tokio::test]
async fn test_rerun_reproduces_the_same_tree() {
    let out = TempDir::new().unwrap();
    let root = out.path().join("CyberTalents");

    let mut trees = Vec::new();
    for _ in 0..2 {
        let mut site = practice_site();
        let courses = enumerate(&mut site, Target::Practice, &["Crypto"]).await.unwrap();
        Archiver::new(&mut site, &root, &Silent)
            .archive(&courses)
            .await
            .unwrap();
        trees.push(files_under(&root));
    }
    assert_eq!(trees[0].len(), 10);
    assert_eq!(trees[0], trees[1]);
}

#[tokio::test]
async fn test_chrome_hiding_failure_is_not_fatal() {
    let mut site = practice_site();
    site.fail_hide = true;
    let courses = enumerate(&mut site, Target::Practice, &["Web"]).await.unwrap();

    let out = TempDir::new().unwrap();
    let summary = Archiver::new(&mut site, out.path(), &Silent)
        .archive(&courses)
        .await
        .unwrap();
    assert_eq!(summary.screenshots, 6);
}

#[tokio::test]
async fn test_malformed_card_stops_enumeration() {
    let broken = page(r#"<div class="card flex mb-4 challenge-card"><div></div></div>"#);
    let mut site = practice_site().with_page(format!("{SITE}/challenges/category/web"), broken);
    let err = enumerate(&mut site, Target::Practice, &["Web"]).await.unwrap_err();
    assert!(matches!(err, ScrapeError::MissingElement { rule: "practice challenge", .. }));
}

#[tokio::test]
async fn test_unwritable_root_is_an_io_error() {
    let out = TempDir::new().unwrap();
    let blocker = out.path().join("CyberTalents");
    fs::write(&blocker, "not a directory").unwrap();

    let mut site = practice_site();
    let courses = enumerate(&mut site, Target::Practice, &["Web"]).await.unwrap();
    let err = Archiver::new(&mut site, &blocker, &Silent)
        .archive(&courses)
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::Io { .. }));
}

#[tokio::test]
async fn test_practice_progress_has_one_bar_per_course() {
    let mut site = practice_site();
    let courses = enumerate(&mut site, Target::Practice, &["Web", "Crypto"])
        .await
        .unwrap();

    let out = TempDir::new().unwrap();
    let recorder = Recorder::default();
    Archiver::new(&mut site, out.path(), &recorder)
        .archive(&courses)
        .await
        .unwrap();

    let starts = recorder.starts();
    assert_eq!(starts, vec![("Web".to_string(), 3), ("Crypto".to_string(), 5)]);
    assert_eq!(recorder.advances(0), 3);
    assert_eq!(recorder.advances(1), 5);
    assert!(recorder.finished(0) && recorder.finished(1));

    // the first bar is done before the second one starts
    let events = recorder.events.borrow();
    let finish_web = events.iter().position(|e| *e == Event::Finish(0)).unwrap();
    let start_crypto = events
        .iter()
        .position(|e| matches!(e, Event::Start(1, ..)))
        .unwrap();
    assert!(finish_web < start_crypto);
}

#[tokio::test]
async fn test_learn_progress_nests_a_challenge_bar_per_lesson() {
    let mut site = learn_site();
    let courses = enumerate(&mut site, Target::Learn, &["Web Security"]).await.unwrap();

    let out = TempDir::new().unwrap();
    let recorder = Recorder::default();
    Archiver::new(&mut site, out.path(), &recorder)
        .archive(&courses)
        .await
        .unwrap();

    let expected = vec![
        ("Web Security".to_string(), 2),
        ("challenge".to_string(), 1),
        ("challenge".to_string(), 1),
    ];
    assert_eq!(recorder.starts(), expected);
    assert_eq!(recorder.advances(0), 2);
    assert_eq!(recorder.advances(1), 1);
    assert_eq!(recorder.advances(2), 1);
    assert!((0..3).all(|id| recorder.finished(id)));

    // each lesson's challenge bar closes before the lesson counts as done
    let events = recorder.events.borrow();
    let finish_first = events.iter().position(|e| *e == Event::Finish(1)).unwrap();
    let first_lesson = events.iter().position(|e| *e == Event::Advance(0)).unwrap();
    assert!(finish_first < first_lesson);
}

#[tokio::test]
async fn test_absolute_challenge_name_stays_under_root() {
    let cards = page(&challenge_card("/abs/x", "/challenges/web/abs", None));
    let mut site = practice_site().with_page(format!("{SITE}/challenges/category/web"), cards);
    let courses = enumerate(&mut site, Target::Practice, &["Web"]).await.unwrap();

    let out = TempDir::new().unwrap();
    let root = out.path().join("CyberTalents");
    Archiver::new(&mut site, &root, &Silent)
        .archive(&courses)
        .await
        .unwrap();

    let expected: Vec<PathBuf> = [
        "Practice/Web/abs/x/challenge.png",
        "Practice/Web/abs/x/writeup.png",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(files_under(&root), expected);
    assert!(!Path::new("/abs/x").join(CHALLENGE_PNG).exists());
}
