use crate::catalog::{SortKey, TypeFilter};
use crate::cli::args::CliArgs;
use crate::output::{OutputFormat, Theme};
use crate::utils;

const TYPE_NAMES: [&str; 5] = ["all", "sport", "casual", "running", "boots"];

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(pct) = args.min_compatibility {
        if pct > 100 {
            return Err(format!(
                "invalid --min-compatibility '{pct}', expected 0-100"
            ));
        }
    }
    if let Some(raw) = args.shoe_type.as_deref() {
        if TypeFilter::parse(raw).is_none() {
            return Err(match utils::closest_match(raw, &TYPE_NAMES) {
                Some(suggestion) => {
                    format!("invalid --type '{raw}', did you mean '{suggestion}'?")
                }
                None => format!("invalid --type '{raw}', expected one of {TYPE_NAMES:?}"),
            });
        }
    }
    if let Some(raw) = args.sort.as_deref() {
        if SortKey::parse(raw).is_none() {
            return Err(match utils::closest_match(raw, &SortKey::NAMES) {
                Some(suggestion) => {
                    format!("invalid --sort '{raw}', did you mean '{suggestion}'?")
                }
                None => format!("invalid --sort '{raw}', expected one of {:?}", SortKey::NAMES),
            });
        }
    }
    if let Some(limit) = args.limit {
        if limit == 0 {
            return Err("invalid --limit, expected a positive number".to_string());
        }
    }
    if let Some(raw) = args.theme.as_deref() {
        if Theme::parse(raw).is_none() {
            return Err(format!("invalid --theme '{raw}', expected dark or light"));
        }
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json, xml, or html"
            ));
        }
    }
    if args.save_theme && args.theme.is_none() {
        return Err("--save-theme requires --theme".to_string());
    }
    Ok(())
}
