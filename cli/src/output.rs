//! Output formatting for parse reports and option listings.

use optline_core::{OptionKind, OptionRecord, OptionRegistry, ParseSummary};
use serde::Serialize;

/// Formats for machine-readable parse reports.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
}

/// Formats for human-readable option listings.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ListingFormat {
    Table,
    Markdown,
}

/// Everything a parse produced, in a serializable shape.
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub verbs: Vec<&'a str>,
    pub summary: ParseSummary,
    pub options: Vec<OptionReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OptionReport<'a> {
    pub name: &'a str,
    pub kind: OptionKind,
    pub count: usize,
    pub user_set: bool,
    pub values: Vec<String>,
}

impl<'a> ParseReport<'a> {
    pub fn new(registry: &'a OptionRegistry, summary: ParseSummary) -> Self {
        let options = registry
            .iter()
            .map(|option| OptionReport {
                name: &option.name,
                kind: option.kind,
                count: option.count,
                user_set: option.user_set,
                values: option.strings(),
            })
            .collect();
        Self {
            verbs: registry.verbs(),
            summary,
            options,
        }
    }
}

/// Serializes a parse report.
pub fn format_report(report: &ParseReport<'_>, format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        ReportFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Renders the declared options of a registry.
pub fn format_listing(registry: &OptionRegistry, format: ListingFormat) -> String {
    match format {
        ListingFormat::Table => listing_to_table(registry),
        ListingFormat::Markdown => listing_to_markdown(registry),
    }
}

fn display_name(option: &OptionRecord, registry: &OptionRegistry) -> String {
    let prefixes = registry.prefixes();
    let long = if option.kind == OptionKind::Verb || option.kind == OptionKind::Unnamed {
        option.name.clone()
    } else {
        format!("{}{}", prefixes.long, option.name)
    };
    match &option.short {
        Some(short) => format!("{}{short}, {long}", prefixes.short),
        None => long,
    }
}

fn signature(option: &OptionRecord) -> String {
    if option.kind == OptionKind::Flag {
        return String::new();
    }
    option
        .signature()
        .iter()
        .map(|ty| format!("<{ty}>"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn markers(option: &OptionRecord, registry: &OptionRegistry) -> String {
    let mut marks = Vec::new();
    if registry.default_parameter() == Some(option.name.as_str()) {
        marks.push("default parameter");
    }
    if registry.default_verb() == Some(option.name.as_str()) {
        marks.push("default verb");
    }
    if marks.is_empty() {
        String::new()
    } else {
        format!(" ({})", marks.join(", "))
    }
}

fn listing_to_table(registry: &OptionRegistry) -> String {
    let mut out = String::new();
    if registry.is_empty() {
        out.push_str("No options declared.\n");
        return out;
    }

    let rows: Vec<(String, String, &OptionRecord)> = registry
        .iter()
        .map(|option| {
            let usage = format!("{} {}", display_name(option, registry), signature(option));
            (usage.trim_end().to_string(), option.kind.to_string(), option)
        })
        .collect();
    let max_usage = rows.iter().map(|(usage, _, _)| usage.len()).max().unwrap_or(4);
    let max_kind = rows.iter().map(|(_, kind, _)| kind.len()).max().unwrap_or(4);

    for (usage, kind, option) in &rows {
        let desc = option.description.as_deref().unwrap_or("");
        let line = format!(
            "  {usage:<max_usage$}  {kind:<max_kind$}  {desc}{}",
            markers(option, registry)
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn listing_to_markdown(registry: &OptionRegistry) -> String {
    let mut out = String::new();

    out.push_str("| Option | Kind | Values | Description |\n");
    out.push_str("|--------|------|--------|-------------|\n");
    for option in registry.iter() {
        let desc = option.description.as_deref().unwrap_or("");
        out.push_str(&format!(
            "| `{}` | {} | {} | {desc}{} |\n",
            display_name(option, registry),
            option.kind,
            signature(option),
            markers(option, registry)
        ));
    }

    out
}
