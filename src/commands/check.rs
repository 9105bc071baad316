//! Check content for authoring mistakes

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::path::Path;
use std::time::Duration;

use crate::content::store::has_extension;
use crate::content::{ContentStore, ScanReport};
use crate::Site;

/// Scan the whole site, print every finding, and fail if any error was found
pub fn run(site: &Site) -> Result<()> {
    let report = site.scan()?;
    print!("{}", summarize(&report));

    if !report.is_clean() {
        anyhow::bail!("{} content error(s) found", report.errors.len());
    }
    Ok(())
}

/// Re-run the check whenever content or configuration changes
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<DebounceEventResult>();

    let mut debouncer =
        new_debouncer(Duration::from_millis(300), move |res: DebounceEventResult| {
            let _ = tx.send(res);
        })?;

    debouncer
        .watcher()
        .watch(&site.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", site.content_dir);

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    let mut site = site.clone();
    print_scan(&site);
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(Ok(events)) => {
                    let relevant = events.iter().any(|e| is_relevant(&site, &e.path));
                    if !relevant {
                        continue;
                    }
                    if events.iter().any(|e| e.path == config_path) {
                        match Site::new(&site.base_dir) {
                            Ok(reloaded) => site = reloaded,
                            Err(e) => {
                                println!("Config reload failed: {:#}", e);
                                continue;
                            }
                        }
                    }
                    println!();
                    print_scan(&site);
                }
                Some(Err(e)) => tracing::error!("Watch error: {:?}", e),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

fn print_scan(site: &Site) {
    match site.scan() {
        Ok(report) => print!("{}", summarize(&report)),
        Err(e) => println!("Check failed: {:#}", e),
    }
}

fn is_relevant(site: &Site, path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) == Some("_config.yml") {
        return true;
    }
    has_extension(path, &site.config.extensions)
}

fn summarize(report: &ScanReport) -> String {
    let mut out = String::new();
    for err in &report.errors {
        out.push_str(&format!("  error: {}\n", err));
    }

    let warnings = missing_images(&report.store);
    for warning in &warnings {
        tracing::warn!("{}", warning);
        out.push_str(&format!("  warning: {}\n", warning));
    }

    let drafts = report.store.list_items().filter(|i| i.draft).count();
    out.push_str(&format!(
        "Checked {} items ({} drafts): {} errors, {} warnings\n",
        report.store.len(),
        drafts,
        report.errors.len(),
        warnings.len()
    ));
    out
}

/// Relative image links whose target file does not exist
///
/// Site-absolute paths (`/img/a.png`) are served from outside the content
/// directory and are not checked.
pub fn missing_images(store: &ContentStore) -> Vec<String> {
    let mut warnings = Vec::new();

    for item in store.list_items() {
        let dir = store
            .root()
            .join(item.source.parent().unwrap_or_else(|| Path::new("")));

        for link in item.links() {
            if !link.image || !link.is_local() || link.url.starts_with('/') {
                continue;
            }
            let target = link.url.split(['?', '#']).next().unwrap_or_default();
            if target.is_empty() || dir.join(target).exists() {
                continue;
            }
            warnings.push(format!(
                "{}: image {:?} not found",
                item.source.display(),
                link.url
            ));
        }
    }

    warnings
}
