//! Front-matter parsing

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ContentError;

/// Offset-less timestamp layouts, accepted only with a configured timezone
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Timestamp layouts carrying an offset that RFC 3339 parsing rejects
const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Syntax of the metadata block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `---` delimited YAML
    Yaml,
    /// `+++` delimited TOML
    Toml,
    /// A leading JSON object
    Json,
}

/// Settings that influence how metadata values are interpreted
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Zone used for timestamps written without an offset
    pub timezone: Option<Tz>,
}

/// Validated front-matter of a content file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub format: Format,
    pub title: String,
    pub date: DateTime<FixedOffset>,
    pub draft: bool,
    pub slug: Option<String>,
    /// Fields the store does not interpret, in file order
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Front-matter as written, before required fields are checked
#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    draft: Option<bool>,
    slug: Option<String>,
    #[serde(flatten)]
    extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse<'a>(
        file: &Path,
        content: &'a str,
        options: &ParseOptions,
    ) -> Result<(Self, &'a str), ContentError> {
        let content = content.trim_start_matches('\u{feff}');
        let content = content.trim_start_matches(['\n', '\r', ' ', '\t']);

        let (format, raw, body) = if content.starts_with("---") {
            let (block, body) = split_delimited(file, content, "---")?;
            (Format::Yaml, parse_yaml(file, block)?, body)
        } else if content.starts_with("+++") {
            let (block, body) = split_delimited(file, content, "+++")?;
            (Format::Toml, parse_toml(file, block)?, body)
        } else if content.starts_with('{') {
            let (raw, body) = parse_json(file, content)?;
            (Format::Json, raw, body)
        } else {
            return Err(ContentError::malformed(file, "missing front-matter block"));
        };

        let fm = Self::validate(file, format, raw, options)?;
        Ok((fm, body.trim_start_matches(['\n', '\r'])))
    }

    fn validate(
        file: &Path,
        format: Format,
        raw: RawFrontMatter,
        options: &ParseOptions,
    ) -> Result<Self, ContentError> {
        let title = raw
            .title
            .ok_or_else(|| ContentError::malformed(file, "missing required field `title`"))?;
        let date = raw
            .date
            .ok_or_else(|| ContentError::malformed(file, "missing required field `date`"))?;
        let draft = raw
            .draft
            .ok_or_else(|| ContentError::malformed(file, "missing required field `draft`"))?;

        let date = parse_date(&date, options.timezone)
            .map_err(|reason| ContentError::malformed(file, reason))?;

        if let Some(slug) = &raw.slug {
            let slug_name = slug.trim();
            if slug_name.is_empty()
                || slug_name == "."
                || slug_name == ".."
                || slug.contains(['/', '\\'])
            {
                return Err(ContentError::malformed(
                    file,
                    format!("`slug` must be a single path segment, got {:?}", slug),
                ));
            }
        }

        Ok(Self {
            format,
            title,
            date,
            draft,
            slug: raw.slug,
            extra: raw.extra,
        })
    }
}

/// Split `delim`-fenced metadata from the rest of the file
///
/// Both fences must sit on their own line.
fn split_delimited<'a>(
    file: &Path,
    content: &'a str,
    delim: &str,
) -> Result<(&'a str, &'a str), ContentError> {
    let mut lines = content.split_inclusive('\n');
    let opening = lines.next().unwrap_or_default();
    if opening.trim_end() != delim {
        return Err(ContentError::malformed(
            file,
            format!("opening `{}` must be alone on its line", delim),
        ));
    }

    let start = opening.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == delim {
            return Ok((&content[start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(ContentError::malformed(
        file,
        format!("missing closing `{}` delimiter", delim),
    ))
}

fn parse_yaml(file: &Path, block: &str) -> Result<RawFrontMatter, ContentError> {
    if block.trim().is_empty() {
        return Ok(RawFrontMatter::default());
    }
    serde_yaml::from_str(block)
        .map_err(|e| ContentError::malformed(file, format!("invalid YAML: {}", e)))
}

fn parse_toml(file: &Path, block: &str) -> Result<RawFrontMatter, ContentError> {
    let mut table: toml::Table = toml::from_str(block)
        .map_err(|e| ContentError::malformed(file, format!("invalid TOML: {}", e.message())))?;

    // Native TOML datetimes become their textual form so every format shares one date parser
    for (_, value) in table.iter_mut() {
        stringify_datetimes(value);
    }

    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| {
            ContentError::malformed(file, format!("invalid TOML: {}", e.message()))
        })
}

fn stringify_datetimes(value: &mut toml::Value) {
    match value {
        toml::Value::Datetime(dt) => *value = toml::Value::String(dt.to_string()),
        toml::Value::Array(items) => items.iter_mut().for_each(stringify_datetimes),
        toml::Value::Table(table) => table
            .iter_mut()
            .for_each(|(_, value)| stringify_datetimes(value)),
        _ => {}
    }
}

fn parse_json<'a>(file: &Path, content: &'a str) -> Result<(RawFrontMatter, &'a str), ContentError> {
    let mut stream = serde_json::Deserializer::from_str(content).into_iter::<RawFrontMatter>();
    match stream.next() {
        Some(Ok(raw)) => Ok((raw, &content[stream.byte_offset()..])),
        Some(Err(e)) => Err(ContentError::malformed(file, format!("invalid JSON: {}", e))),
        None => Err(ContentError::malformed(file, "empty JSON front-matter")),
    }
}

/// Parse a front-matter timestamp
///
/// Offset-carrying timestamps keep their literal offset. Naive ones are placed
/// in `timezone` and rejected when it is unset.
pub fn parse_date(raw: &str, timezone: Option<Tz>) -> Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(dt);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    match (naive, timezone) {
        (Some(naive), Some(tz)) => tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| format!("date `{}` does not exist in {}", raw, tz)),
        (Some(_), None) => Err(format!(
            "date `{}` has no UTC offset and no timezone is configured",
            raw
        )),
        (None, _) => Err(format!("unrecognised date `{}`", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<(FrontMatter, &str), ContentError> {
        FrontMatter::parse(Path::new("post.md"), content, &ParseOptions::default())
    }

    fn reason(err: ContentError) -> String {
        match err {
            ContentError::MalformedFrontMatter { reason, .. } => reason,
            other => panic!("expected malformed front-matter, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "MVP Tips"
date: 2022-03-28T00:29:54+03:00
draft: false
---

Lessons learned shipping an internal tool.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.format, Format::Yaml);
        assert_eq!(fm.title, "MVP Tips");
        assert!(!fm.draft);
        assert_eq!(
            fm.date,
            DateTime::parse_from_rfc3339("2022-03-28T00:29:54+03:00").unwrap()
        );
        assert_eq!(fm.date.offset().local_minus_utc(), 3 * 3600);
        assert_eq!(body, "Lessons learned shipping an internal tool.\n");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "MVP Tips"
date = 2022-03-28T00:29:54+03:00
draft = false
+++
Body.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.format, Format::Toml);
        assert_eq!(fm.title, "MVP Tips");
        assert_eq!(
            fm.date,
            DateTime::parse_from_rfc3339("2022-03-28T00:29:54+03:00").unwrap()
        );
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "MVP Tips", "date": "2022-03-28T00:29:54+03:00", "draft": false, "note": "a } inside"}

Body.
"#;

        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.format, Format::Json);
        assert_eq!(fm.title, "MVP Tips");
        assert_eq!(
            fm.date,
            DateTime::parse_from_rfc3339("2022-03-28T00:29:54+03:00").unwrap()
        );
        assert!(!fm.draft);
        assert_eq!(fm.extra.len(), 1);
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let content = "---\ndate: 2022-03-28T00:29:54+03:00\ndraft: false\n---\nBody\n";
        assert!(reason(parse(content).unwrap_err()).contains("`title`"));
    }

    #[test]
    fn test_missing_draft_is_malformed() {
        let content = "---\ntitle: A\ndate: 2022-03-28T00:29:54+03:00\n---\nBody\n";
        assert!(reason(parse(content).unwrap_err()).contains("`draft`"));
    }

    #[test]
    fn test_mistyped_draft_is_malformed() {
        let content = "---\ntitle: A\ndate: 2022-03-28T00:29:54+03:00\ndraft: maybe\n---\n";
        assert!(reason(parse(content).unwrap_err()).contains("invalid YAML"));
    }

    #[test]
    fn test_unterminated_block_is_malformed() {
        let content = "---\ntitle: A\ndate: 2022-03-28T00:29:54+03:00\ndraft: false\nBody\n";
        assert!(reason(parse(content).unwrap_err()).contains("closing"));
    }

    #[test]
    fn test_no_frontmatter_is_malformed() {
        let content = "# Just a heading\n\nSome prose.\n";
        assert!(reason(parse(content).unwrap_err()).contains("missing front-matter"));
    }

    #[test]
    fn test_empty_block_reports_missing_title() {
        assert!(reason(parse("---\n---\nBody\n").unwrap_err()).contains("`title`"));
    }

    #[test]
    fn test_body_separator_is_not_a_closing_fence() {
        let content = r#"---
title: Closures
date: 2022-04-02T12:00:00+00:00
draft: true
---
Intro

---

After a thematic break.
"#;

        let (fm, body) = parse(content).unwrap();
        assert!(fm.draft);
        assert!(body.starts_with("Intro"));
        assert!(body.contains("After a thematic break."));
    }

    #[test]
    fn test_unknown_fields_kept_in_order() {
        let content = r#"---
title: A
date: 2022-03-28T00:29:54+03:00
draft: false
tags: [rust, closures]
author: me
---
"#;

        let (fm, _) = parse(content).unwrap();
        let keys: Vec<_> = fm.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tags", "author"]);
    }

    #[test]
    fn test_slug_must_be_single_segment() {
        let content = "---\ntitle: A\ndate: 2022-03-28T00:29:54+03:00\ndraft: false\nslug: a/b\n---\n";
        assert!(reason(parse(content).unwrap_err()).contains("slug"));
    }

    #[test]
    fn test_slug_rejects_dot_segments() {
        for slug in [".", "..", "\" .. \""] {
            let content = format!(
                "---\ntitle: A\ndate: 2022-03-28T00:29:54+03:00\ndraft: false\nslug: {}\n---\n",
                slug
            );
            assert!(reason(parse(&content).unwrap_err()).contains("slug"), "{}", slug);
        }
    }

    #[test]
    fn test_parse_toml_nested_datetimes_kept_as_text() {
        let content = r#"+++
title = "A"
date = 2022-03-28T00:29:54+03:00
draft = false

[history]
revised = 2022-04-01T10:00:00Z
+++
"#;

        let (fm, _) = parse(content).unwrap();
        let history = fm.extra.get("history").unwrap();
        assert_eq!(
            history.get("revised").and_then(|v| v.as_str()),
            Some("2022-04-01T10:00:00Z")
        );
    }

    #[test]
    fn test_parse_date_with_space_separator() {
        let dt = parse_date("2022-03-28 00:29:54+03:00", None).unwrap();
        assert_eq!(dt, DateTime::parse_from_rfc3339("2022-03-28T00:29:54+03:00").unwrap());
    }

    #[test]
    fn test_naive_date_needs_timezone() {
        assert!(parse_date("2022-03-28 00:29:54", None)
            .unwrap_err()
            .contains("no UTC offset"));

        let tz: Tz = "Europe/Istanbul".parse().unwrap();
        let dt = parse_date("2022-03-28 00:29:54", Some(tz)).unwrap();
        assert_eq!(dt, DateTime::parse_from_rfc3339("2022-03-28T00:29:54+03:00").unwrap());

        let midnight = parse_date("2022-03-28", Some(tz)).unwrap();
        assert_eq!(midnight.format("%H:%M").to_string(), "00:00");
    }

    #[test]
    fn test_garbage_date_rejected() {
        assert!(parse_date("last tuesday", None)
            .unwrap_err()
            .contains("unrecognised"));
    }
}
