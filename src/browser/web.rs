use super::Page;
use crate::config::{ArchiverConfig, Credentials, LoginSelectors, PageChrome, Viewport};
use crate::error::{Result, ScrapeError};
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;

/// Page load timeout used when navigation timeouts are disabled
const UNBOUNDED_PAGE_LOAD: Duration = Duration::from_secs(60 * 60 * 24);

/// How long to wait for the browser to leave the login form
const LOGIN_WAIT: Duration = Duration::from_secs(60);

const LOGIN_POLL: Duration = Duration::from_millis(500);

const HIDE_CHROME_SCRIPT: &str = r#"
const [id, tag, cls] = arguments;
const hide = (el) => { if (el) { el.style.display = "none"; } };
hide(document.getElementById(id));
hide(document.getElementsByTagName(tag)[0]);
hide(document.getElementsByClassName(cls)[0]);
"#;

const PAGE_HEIGHT_SCRIPT: &str = r#"
return Math.max(
    document.body ? document.body.scrollHeight : 0,
    document.documentElement.scrollHeight
);
"#;

/// Height taken by tabs and toolbars; zero in headless mode
const BROWSER_UI_HEIGHT_SCRIPT: &str = "return window.outerHeight - window.innerHeight;";

/// A single browser window driven over WebDriver
pub struct WebSession {
    client: Client,
    viewport: Viewport,
    chrome: PageChrome,
}

impl WebSession {
    /// Start a browser session with a fixed viewport and no navigation timeout
    pub async fn launch(config: &ArchiverConfig) -> Result<Self> {
        let client = connect_to_webdriver(&config.webdriver_url, config).await?;

        let timeouts = TimeoutConfiguration::new(None, Some(page_load_timeout(config)), None);
        client.update_timeouts(timeouts).await?;
        client
            .set_window_size(config.viewport.width, config.viewport.height)
            .await?;

        ::log::debug!(
            "Browser ready with viewport {}x{} @{}x",
            config.viewport.width,
            config.viewport.height,
            config.viewport.device_scale
        );

        Ok(Self {
            client,
            viewport: config.viewport,
            chrome: config.chrome.clone(),
        })
    }

    /// Submit the login form and wait until the browser navigates away from it
    pub async fn login(
        &mut self,
        login_url: &str,
        credentials: &Credentials,
        selectors: &LoginSelectors,
    ) -> Result<()> {
        self.goto(login_url).await?;
        let form_url = self.current_url().await?;

        self.client
            .find(Locator::Css(&selectors.email_selector))
            .await?
            .send_keys(&credentials.email)
            .await?;
        self.client
            .find(Locator::Css(&selectors.password_selector))
            .await?
            .send_keys(&credentials.password)
            .await?;
        self.client
            .find(Locator::Css(&selectors.submit_selector))
            .await?
            .click()
            .await?;

        let waited = tokio::time::timeout(LOGIN_WAIT, async {
            loop {
                let url = self.current_url().await?;
                if url != form_url {
                    return Ok::<String, ScrapeError>(url);
                }
                tokio::time::sleep(LOGIN_POLL).await;
            }
        })
        .await;

        match waited {
            Ok(Ok(url)) => {
                ::log::info!("Logged in as {}, landed on {}", credentials.email, url);
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ScrapeError::LoginFailed(format!(
                "still on {} after {} seconds",
                form_url,
                LOGIN_WAIT.as_secs()
            ))),
        }
    }

    /// End the WebDriver session, closing the browser
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    /// Run a script returning a pixel height; anything non-numeric counts as 0
    async fn script_height(&self, script: &str) -> Result<u32> {
        let value = self.client.execute(script, Vec::new()).await?;
        Ok(value
            .as_u64()
            .map(|h| u32::try_from(h).unwrap_or(u32::MAX))
            .unwrap_or(0))
    }
}

impl Page for WebSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        ::log::debug!("GOTO: {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn source(&mut self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    async fn hide_chrome(&mut self) -> Result<()> {
        let args = vec![
            Value::String(self.chrome.hidden_id.clone()),
            Value::String(self.chrome.footer_tag.clone()),
            Value::String(self.chrome.back_to_top_class.clone()),
        ];
        self.client.execute(HIDE_CHROME_SCRIPT, args).await?;
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> Result<()> {
        // WebDriver only captures the viewport, so grow the window to the page height
        let page_height = self.script_height(PAGE_HEIGHT_SCRIPT).await?;
        let ui_height = self.script_height(BROWSER_UI_HEIGHT_SCRIPT).await?;
        let height = window_height(page_height, self.viewport.height, ui_height);
        let restored = window_height(self.viewport.height, self.viewport.height, ui_height);

        self.client
            .set_window_size(self.viewport.width, height)
            .await?;
        let png = self.client.screenshot().await;
        self.client
            .set_window_size(self.viewport.width, restored)
            .await?;

        tokio::fs::write(path, png?)
            .await
            .map_err(|e| ScrapeError::io(path, e))?;
        ::log::trace!("Saved {} ({}px tall)", path.display(), height);
        Ok(())
    }
}

/// Page load timeout for the session, unbounded unless configured
fn page_load_timeout(config: &ArchiverConfig) -> Duration {
    config
        .navigation_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(UNBOUNDED_PAGE_LOAD)
}

/// Outer window height whose viewport fits the whole page.
///
/// `set_window_size` sizes the outer window, so the browser UI height is
/// added on top of the content height.
fn window_height(page_height: u32, viewport_height: u32, ui_height: u32) -> u32 {
    page_height.max(viewport_height).saturating_add(ui_height)
}

/// Chrome capabilities for a fixed-size, optionally headless window
fn chrome_capabilities(config: &ArchiverConfig) -> serde_json::Map<String, Value> {
    let mut args = vec![
        format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        ),
        format!("--force-device-scale-factor={}", config.viewport.device_scale),
        "--hide-scrollbars".to_string(),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
    }

    let mut caps = serde_json::Map::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Connects to the WebDriver instance, trying common local ports on failure
async fn connect_to_webdriver(webdriver_url: &str, config: &ArchiverConfig) -> Result<Client> {
    let caps = chrome_capabilities(config);

    let first_error = match ClientBuilder::native()
        .capabilities(caps.clone())
        .connect(webdriver_url)
        .await
    {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native()
            .capabilities(caps.clone())
            .connect(url)
            .await
        {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScrapeError::Connect {
        url: webdriver_url.to_string(),
        source: first_error,
    })
}
