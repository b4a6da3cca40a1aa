use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "Capturing ({pos}/{len}): {msg} | [{bar:40}] | ETA: {eta}";

/// Reports archiving progress. Purely observational.
pub trait Progress {
    /// Handle for one running task
    type Task;

    /// Start a task with a title and the number of steps it will take
    fn start(&self, title: &str, total: usize) -> Self::Task;

    /// Mark one step of a task as done
    fn advance(&self, task: &Self::Task);

    /// Remove a finished task from the display
    fn finish(&self, task: Self::Task);
}

/// Stacked terminal progress bars, one per running task
pub struct Bars {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl Bars {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#.");
        Self {
            multi: MultiProgress::new(),
            style,
        }
    }
}

impl Default for Bars {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for Bars {
    type Task = ProgressBar;

    fn start(&self, title: &str, total: usize) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(total as u64));
        bar.set_style(self.style.clone());
        bar.set_message(title.to_string());
        bar
    }

    fn advance(&self, task: &ProgressBar) {
        task.inc(1);
    }

    fn finish(&self, task: ProgressBar) {
        task.finish_and_clear();
        self.multi.remove(&task);
    }
}

/// Reporter that displays nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    type Task = ();

    fn start(&self, _title: &str, _total: usize) {}

    fn advance(&self, _task: &()) {}

    fn finish(&self, _task: ()) {}
}
