use anyhow::{Context, anyhow};
use clap::Parser;
use ct_archiver::progress::Bars;
use ct_archiver::{ArchiverConfig, Archiver, Credentials, WebSession, catalog, prompt};
use std::io::Write;

mod args;
use args::{Args, convert_target};

/// Print a status line, optionally replacing the current one
fn status(text: &str, replace_line: bool) {
    if replace_line {
        print!("\r\x1b[2K");
    }
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ArchiverConfig::from_file(path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ArchiverConfig::default(),
    };
    config.apply_env();
    args.apply(&mut config);
    ::log::debug!("Using configuration: {:?}", config);

    status("[-] Starting Browser...", false);
    let mut session = WebSession::launch(&config)
        .await
        .context("Failed to start the browser")?;
    status("[+] Browser Started\n", true);

    let result = run(&mut session, &config, &args).await;

    if let Err(e) = session.close().await {
        ::log::warn!("Failed to close the browser session: {}", e);
    }

    let root = config.archive_root();
    let summary = result?;
    println!(
        "[+] Downloaded {} courses ({} screenshots) and saved to \"{}\"",
        summary.courses,
        summary.screenshots,
        root.display()
    );
    Ok(())
}

/// The sequential pipeline: login, target, courses, entries, screenshots
async fn run(
    session: &mut WebSession,
    config: &ArchiverConfig,
    args: &Args,
) -> anyhow::Result<ct_archiver::ArchiveSummary> {
    status("[-] Authenticating...", false);
    let credentials = Credentials::from_env();
    session
        .login(&config.login_url(), &credentials, &config.login)
        .await
        .context("Failed to log in")?;
    status("[+] Authenticated\n", true);

    let target = match args.target {
        Some(arg) => convert_target(arg),
        None => prompt::select_target()?,
    };
    catalog::open_target(session, config, target).await?;

    let available = catalog::list_courses(session, target)
        .await
        .context("Failed to read the course list")?;
    let picked = prompt::pick_courses(&available)?;

    status("[-] Fetching Lessons of each course...", false);
    let courses = catalog::populate_courses(session, picked, target)
        .await
        .context("Failed to read course contents")?;
    status("[+] Lessons Fetched\n", true);

    let bars = Bars::new();
    let summary = Archiver::new(session, config.archive_root(), &bars)
        .archive(&courses)
        .await
        .context("Archiving stopped")?;
    Ok(summary)
}
