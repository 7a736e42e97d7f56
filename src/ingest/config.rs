// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::registry;
use super::types::FeedDescriptor;

pub const ENV_FEEDS_PATH: &str = "NEWS_FEEDS_PATH";

/// Load a feed table from an explicit path. Supports TOML or JSON formats.
pub fn load_feeds_from(path: &Path) -> Result<Vec<FeedDescriptor>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed table from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_feeds(&content, ext.as_str())
}

/// Load the feed table using env var + fallbacks:
/// 1) $NEWS_FEEDS_PATH
/// 2) config/feeds.toml
/// 3) config/feeds.json
/// 4) built-in registry
pub fn load_feeds_default() -> Result<Vec<FeedDescriptor>> {
    if let Ok(p) = std::env::var(ENV_FEEDS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_feeds_from(&pb);
        } else {
            return Err(anyhow!("{ENV_FEEDS_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/feeds.toml");
    if toml_p.exists() {
        return load_feeds_from(&toml_p);
    }
    let json_p = PathBuf::from("config/feeds.json");
    if json_p.exists() {
        return load_feeds_from(&json_p);
    }
    Ok(registry::default_feeds())
}

fn parse_feeds(s: &str, hint_ext: &str) -> Result<Vec<FeedDescriptor>> {
    let try_toml = hint_ext == "toml" || s.contains("[[feeds]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported feed table format"))
}

fn parse_toml(s: &str) -> Result<Vec<FeedDescriptor>> {
    #[derive(serde::Deserialize)]
    struct TomlFeeds {
        feeds: Vec<FeedDescriptor>,
    }
    let v: TomlFeeds = toml::from_str(s)?;
    clean_table(v.feeds)
}

fn parse_json(s: &str) -> Result<Vec<FeedDescriptor>> {
    let v: Vec<FeedDescriptor> = serde_json::from_str(s)?;
    clean_table(v)
}

/// Trim fields, drop rows without a URL, keep the first row per name.
fn clean_table(rows: Vec<FeedDescriptor>) -> Result<Vec<FeedDescriptor>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for mut f in rows {
        f.name = f.name.trim().to_string();
        f.url = f.url.trim().to_string();
        if f.url.is_empty() || f.name.is_empty() {
            continue;
        }
        if seen.insert(f.name.clone()) {
            out.push(f);
        }
    }
    if out.is_empty() {
        return Err(anyhow!("feed table is empty"));
    }
    Ok(out)
}
