//! Create a new content item

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::content::ContentPath;
use crate::Site;

/// Write a new draft with `title`, the current date and `draft: true`
///
/// Refuses to overwrite a file or to create a second item at an existing path.
pub fn create_item(
    site: &Site,
    title: &str,
    section: Option<&str>,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let options = site.config.store_options()?;

    let section = section
        .unwrap_or(&site.config.default_section)
        .trim_matches('/');
    if !Path::new(section)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        anyhow::bail!(
            "Section {:?} must be a relative directory inside the content directory",
            section
        );
    }
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let relative = Path::new(section).join(format!("{}.{}", slug, options.extensions[0]));
    let file_path = site.content_dir.join(&relative);

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let path = ContentPath::from_source(&relative, &options.extensions);
    let report = site.scan()?;
    if let Some(existing) = report.store.get(&path) {
        anyhow::bail!(
            "An item already exists at {}: {:?}",
            path,
            existing.source
        );
    }

    let now = match options.parse.timezone {
        Some(tz) => Utc::now().with_timezone(&tz).fixed_offset(),
        None => chrono::Local::now().fixed_offset(),
    };

    let content = format!(
        "---\ntitle: {}\ndate: {}\ndraft: true\n---\n\n",
        serde_json::to_string(title)?,
        now.to_rfc3339_opts(SecondsFormat::Secs, false)
    );

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created {:?} at {}", file_path, path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, section: Option<&str>, slug: Option<&str>) -> Result<()> {
    let file_path = create_item(site, title, section, slug)?;
    println!("Created: {:?}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_item_roundtrips_through_store() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let file = create_item(&site, "Closures: a \"toy\" example", None, None).unwrap();
        assert_eq!(
            file,
            dir.path().join("content/posts/closures-a-toy-example.md")
        );

        let store = site.store().unwrap();
        let item = store.read_item("posts/closures-a-toy-example").unwrap();
        assert_eq!(item.title, "Closures: a \"toy\" example");
        assert!(item.draft);
    }

    #[test]
    fn test_create_item_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        create_item(&site, "MVP Tips", Some("notes"), None).unwrap();
        assert!(create_item(&site, "MVP tips", Some("notes"), None).is_err());
    }

    #[test]
    fn test_create_item_refuses_existing_bundle() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let bundle = dir.path().join("content/posts/closures");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(
            bundle.join("index.md"),
            "---\ntitle: Closures\ndate: 2022-04-10T18:05:00+03:00\ndraft: true\n---\n",
        )
        .unwrap();

        let err = create_item(&site, "Closures", None, None).unwrap_err();
        assert!(err.to_string().contains("already exists at posts/closures"));
    }

    #[test]
    fn test_create_item_with_slug() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let file = create_item(&site, "Anything", Some("/drafts/"), Some("My Slug")).unwrap();
        assert_eq!(file, dir.path().join("content/drafts/my-slug.md"));
    }

    #[test]
    fn test_create_item_rejects_section_outside_content() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        for section in ["../outside", "posts/../../outside", "./posts"] {
            let err = create_item(&site, "Escape", Some(section), None).unwrap_err();
            assert!(err.to_string().contains("must be a relative directory"), "{}", section);
        }
        assert!(!dir.path().join("outside").exists());
        assert!(!dir.path().join("content").exists());
    }
}
