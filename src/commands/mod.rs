//! CLI commands

pub mod check;
pub mod list;
pub mod new;
pub mod show;

use chrono::{DateTime, FixedOffset};
use std::fmt::Write;

use crate::config::SiteConfig;

/// Format a date for display, in the site timezone when one is configured
///
/// Falls back to RFC 3339 when `date_format` is not a usable strftime pattern.
pub(crate) fn display_date(config: &SiteConfig, date: &DateTime<FixedOffset>) -> String {
    let mut out = String::new();
    let written = match config.timezone() {
        Ok(Some(tz)) => write!(out, "{}", date.with_timezone(&tz).format(&config.date_format)),
        _ => write!(out, "{}", date.format(&config.date_format)),
    };
    match written {
        Ok(()) => out,
        Err(_) => date.to_rfc3339(),
    }
}
