//! Render use cases: text, JSON and Markdown from in-memory reports.

use anyhow::Context;
use regosql_types::CompileReport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

pub fn render_report(report: &CompileReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(regosql_render::render_text(report)),
        OutputFormat::Markdown => Ok(regosql_render::render_markdown(report)),
        OutputFormat::Json => {
            let mut text = String::from_utf8(crate::serialize_report(report)?)?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Renders a batch in input order. JSON is one array of reports; text and Markdown
/// precede each report with its input index.
pub fn render_reports(reports: &[CompileReport], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        let mut text = serde_json::to_string_pretty(reports).context("serialize reports")?;
        text.push('\n');
        return Ok(text);
    }

    let mut out = String::new();
    for (index, report) in reports.iter().enumerate() {
        match format {
            OutputFormat::Markdown => {
                if index > 0 {
                    out.push('\n');
                }
                out.push_str(&format!("<!-- input {index} -->\n"));
            }
            _ => out.push_str(&format!("input[{index}]\n")),
        }
        out.push_str(&render_report(report, format)?);
    }
    Ok(out)
}
