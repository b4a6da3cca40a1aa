use crate::results::Target;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Environment variable holding the account email
pub const EMAIL_VAR: &str = "CYBERTALENTS_EMAIL";

/// Environment variable holding the account password
pub const PASSWORD_VAR: &str = "CYBERTALENTS_PASSWORD";

/// Environment variable overriding the WebDriver URL
pub const WEBDRIVER_VAR: &str = "WEBDRIVER_URL";

/// Name of the directory created under the output directory
pub const ARCHIVE_DIR: &str = "CyberTalents";

/// Configuration for an archiving run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiverConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Site root, e.g. `https://cybertalents.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the login form relative to `base_url`
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Directory under which `CyberTalents/` is created
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default)]
    pub viewport: Viewport,

    /// Page load timeout; unset means navigation never times out
    #[serde(default)]
    pub navigation_timeout_secs: Option<u64>,

    #[serde(default)]
    pub login: LoginSelectors,

    #[serde(default)]
    pub chrome: PageChrome,
}

/// Browser viewport used for every screenshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_scale: 2.0,
        }
    }
}

/// Selectors of the login form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSelectors {
    pub email_selector: String,
    pub password_selector: String,
    pub submit_selector: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            email_selector: r#"input[name="email"]"#.to_string(),
            password_selector: r#"input[name="password"]"#.to_string(),
            submit_selector: r#"button[type="submit"]"#.to_string(),
        }
    }
}

/// Page elements hidden before each screenshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageChrome {
    /// Element id of the top strip
    pub hidden_id: String,

    /// Tag name whose first element is hidden
    pub footer_tag: String,

    /// Class whose first element is hidden
    pub back_to_top_class: String,
}

impl Default for PageChrome {
    fn default() -> Self {
        Self {
            hidden_id: "stu".to_string(),
            footer_tag: "footer".to_string(),
            back_to_top_class: "go2top".to_string(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default value for base_url
fn default_base_url() -> String {
    "https://cybertalents.com".to_string()
}

/// Default value for login_path
fn default_login_path() -> String {
    "/login".to_string()
}

/// Default output directory is the working directory
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_headless() -> bool {
    true
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            base_url: default_base_url(),
            login_path: default_login_path(),
            output_dir: default_output_dir(),
            headless: default_headless(),
            viewport: Viewport::default(),
            navigation_timeout_secs: None,
            login: LoginSelectors::default(),
            chrome: PageChrome::default(),
        }
    }
}

impl ArchiverConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Override the WebDriver URL with an environment variable if provided
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var(WEBDRIVER_VAR) {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// Full URL of the login form
    pub fn login_url(&self) -> String {
        self.site_url(&self.login_path)
    }

    /// Full URL of a target's landing page
    pub fn landing_url(&self, target: Target) -> String {
        self.site_url(target.landing_path())
    }

    /// Root of the archive tree, `<output_dir>/CyberTalents`
    pub fn archive_root(&self) -> PathBuf {
        self.output_dir.join(ARCHIVE_DIR)
    }

    fn site_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Login credentials read from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// Missing values become empty strings; the login form rejects them later.
    pub fn from_env() -> Self {
        let read = |name: &str| match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                ::log::warn!("{} is not set", name);
                String::new()
            }
        };
        Self {
            email: read(EMAIL_VAR),
            password: read(PASSWORD_VAR),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
