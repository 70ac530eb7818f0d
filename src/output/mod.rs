use std::collections::HashMap;

use colored::{ColoredString, Colorize};
use itertools::Itertools;
use reqwest::Url;
use serde::Serialize;

use crate::api;
use crate::catalog::{
    compatibility_band, CompatibilityBand, FilterConfig, MinCompatibility, Recommendation,
    RecommendationView, TypeFilter,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".xml") {
        return Some(OutputFormat::Xml);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OutputRecord {
    pub model: String,
    pub compatibility: u8,
    pub best_size_eu: f32,
    pub shoe_type: &'static str,
    pub type_source: &'static str,
    pub photo_available: Option<bool>,
    pub photo_url: String,
    pub detail_path: String,
}

pub fn build_records(
    visible: &[&Recommendation],
    images: &HashMap<String, bool>,
    base: &Url,
) -> Vec<OutputRecord> {
    visible
        .iter()
        .map(|rec| OutputRecord {
            model: rec.model.clone(),
            compatibility: rec.compatibility,
            best_size_eu: rec.best_size_eu,
            shoe_type: rec.shoe_type.as_str(),
            type_source: match rec.type_source {
                crate::catalog::TypeSource::Lookup => "lookup",
                crate::catalog::TypeSource::Heuristic => "heuristic",
                crate::catalog::TypeSource::Default => "default",
            },
            photo_available: images.get(&rec.model).copied(),
            photo_url: api::image_url(base, &rec.model, 1).to_string(),
            detail_path: api::detail_path(base, &rec.model),
        })
        .collect()
}

pub fn render_text(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!(
            "{} :: {}% :: EU {} :: {}\n",
            r.model, r.compatibility, r.best_size_eu, r.shoe_type
        ));
    }
    out.into_bytes()
}

pub fn render_json(records: &[OutputRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_xml(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    out.push_str("<recommendations>\n");
    for r in records {
        out.push_str("  <recommendation>\n");
        out.push_str(&format!("    <model>{}</model>\n", escape_xml(&r.model)));
        out.push_str(&format!(
            "    <compatibility>{}</compatibility>\n",
            r.compatibility
        ));
        out.push_str(&format!(
            "    <best_size_eu>{}</best_size_eu>\n",
            r.best_size_eu
        ));
        out.push_str(&format!("    <shoe_type>{}</shoe_type>\n", r.shoe_type));
        out.push_str(&format!(
            "    <type_source>{}</type_source>\n",
            r.type_source
        ));
        if let Some(photo) = r.photo_available {
            out.push_str(&format!("    <photo_available>{photo}</photo_available>\n"));
        }
        out.push_str(&format!(
            "    <photo_url>{}</photo_url>\n",
            escape_xml(&r.photo_url)
        ));
        out.push_str(&format!(
            "    <detail_path>{}</detail_path>\n",
            escape_xml(&r.detail_path)
        ));
        out.push_str("  </recommendation>\n");
    }
    out.push_str("</recommendations>\n");
    out.into_bytes()
}

pub fn render_html(records: &[OutputRecord]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>fitscout recommendations</title>
<style>
  body { font-family: sans-serif; background: #1e1e1e; color: #eee; margin: 24px; }
  .grid { display: flex; flex-wrap: wrap; gap: 12px; }
  .card { border: 1px solid #444; border-radius: 8px; padding: 12px; width: 230px; }
  .model { font-weight: bold; margin-bottom: 6px; }
  .badge { display: inline-block; border-radius: 4px; padding: 2px 8px; color: #fff; }
  .high { background: #4CAF50; }
  .medium { background: #FF9800; }
  .low { background: #F44336; }
  .size { margin-top: 6px; font-size: 90%; }
  .meta { margin-top: 6px; font-size: 80%; color: #aaa; }
</style>
</head>
<body>
<div class="grid">
"#,
    );
    for r in records {
        let band = match compatibility_band(r.compatibility) {
            CompatibilityBand::High => "high",
            CompatibilityBand::Medium => "medium",
            CompatibilityBand::Low => "low",
        };
        out.push_str("  <div class=\"card\">\n");
        out.push_str(&format!(
            "    <div class=\"model\">{}</div>\n",
            escape_xml(&r.model)
        ));
        out.push_str(&format!(
            "    <span class=\"badge {band}\">{}%</span>\n",
            r.compatibility
        ));
        out.push_str(&format!(
            "    <div class=\"size\">EU {} &middot; {}</div>\n",
            r.best_size_eu, r.shoe_type
        ));
        out.push_str(&format!(
            "    <div class=\"meta\"><a href=\"{}\">details</a></div>\n",
            escape_xml(&r.detail_path)
        ));
        out.push_str("  </div>\n");
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out.into_bytes()
}

fn badge(compatibility: u8) -> ColoredString {
    let label = format!("{compatibility:>3}%");
    match compatibility_band(compatibility) {
        CompatibilityBand::High => label.bold().green(),
        CompatibilityBand::Medium => label.bold().yellow(),
        CompatibilityBand::Low => label.bold().red(),
    }
}

fn model_name(model: &str, theme: Theme) -> ColoredString {
    match theme {
        Theme::Dark => model.bold().white(),
        Theme::Light => model.bold(),
    }
}

fn summarize_filters(filters: &FilterConfig) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let MinCompatibility::AtLeast(pct) = filters.min_compatibility {
        parts.push(format!("min={pct}%"));
    }
    if let TypeFilter::Only(shoe_type) = filters.type_filter {
        parts.push(format!("type={}", shoe_type.as_str()));
    }
    parts.push(format!("sort={}", filters.sort_key.as_str()));
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Prints the visible window as a card list. Models without a probed
/// photo get the placeholder marker the web gallery used, built from
/// the first word of the model name.
pub fn print_gallery(
    view: &RecommendationView,
    images: &HashMap<String, bool>,
    base: &Url,
    theme: Theme,
) {
    let visible = view.visible();
    let filtered = view.filtered_count();

    if visible.is_empty() {
        println!(
            "{}{}{} {}",
            "[".bold().white(),
            "i".bold().blue(),
            "]".bold().white(),
            "no matches for the current filters".bold().yellow(),
        );
        if let Some(summary) = summarize_filters(view.filters()) {
            println!(":: {:<10}: {}", "filters", summary);
        }
        return;
    }

    println!(
        ":: showing {} of {} recommendation(s) ::",
        visible.len(),
        filtered
    );
    if let Some(summary) = summarize_filters(view.filters()) {
        println!(":: {:<10}: {}", "filters", summary);
    }
    println!();

    for (idx, rec) in visible.iter().enumerate() {
        let photo = match images.get(&rec.model) {
            Some(true) => "photo".green(),
            Some(false) => {
                let first_word = rec.model.split(' ').next().unwrap_or(&rec.model);
                format!("placeholder ({first_word})").dimmed()
            }
            None => "photo not probed".dimmed(),
        };
        println!(
            "{:>3}. {:<32} {} EU {:<5} {}",
            idx + 1,
            model_name(&rec.model, theme),
            badge(rec.compatibility),
            rec.best_size_eu,
            rec.shoe_type.as_str().bold().blue(),
        );
        println!(
            "     {}  {}",
            photo,
            api::detail_path(base, &rec.model).underline(),
        );
    }

    let tally = view
        .items()
        .iter()
        .map(|rec| rec.shoe_type)
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .map(|(shoe_type, count)| format!("{} {}", shoe_type.as_str(), count))
        .join(", ");
    println!();
    println!(":: {:<10}: {}", "catalog", tally);

    if view.can_show_more() {
        println!(
            ":: {:<10}: {} more hidden",
            "paging",
            filtered - visible.len()
        );
    }
}

pub fn print_unauthenticated(base: &Url) {
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "!".bold().yellow(),
        "]".bold().white(),
        "please log in to see your recommendations".bold().white(),
    );
    println!(":: {:<10}: {}loggin", "login page", base);
    println!(":: {:<10}: pass -e and -p (or set them in the config file)", "hint");
}

pub fn print_empty(base: &Url) {
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "i".bold().blue(),
        "]".bold().white(),
        "no recommendations yet, fill in your foot measurements first"
            .bold()
            .white(),
    );
    println!(":: {:<10}: {}measure", "measure", base);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parse_accepts_known_names() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse(" txt "), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn format_inference_prefers_the_extension() {
        assert_eq!(infer_format_from_path("./out.html"), Some(OutputFormat::Html));
        assert_eq!(infer_format_from_path("GALLERY.JSON"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("./out"), None);
    }

    #[test]
    fn theme_parse_round_trips() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("Light"), Some(Theme::Light));
        assert_eq!(Theme::parse("solarized"), None);
    }
}
