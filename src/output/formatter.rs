//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScreenerError};
use crate::output::report::ScreeningReport;
use crate::processing::scoring::Recommendation;
use crate::processing::skill_extractor::SkillCategory;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting screening reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and text charts
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured output
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for shareable reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// HTML formatter with inline styling
pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that dispatches to the configured formatter
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Resume Screening Report</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #333; max-width: 960px; margin: 0 auto; padding: 20px; background: #f8f9fa; }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; }
        .metric { background: #1f77b4; color: white; padding: 15px; border-radius: 6px; text-align: center; }
        table { border-collapse: collapse; width: 100%; margin: 15px 0; }
        th, td { border-bottom: 1px solid #e9ecef; padding: 6px 10px; text-align: left; }
        .Hire { color: #28a745; font-weight: bold; }
        .Review { color: #b8860b; font-weight: bold; }
        .Reject { color: #dc3545; font-weight: bold; }
        .bar { background: #1f77b4; height: 12px; display: inline-block; }
        .warning { background: #fff3cd; padding: 10px; border-radius: 6px; }
    </style>
    {% endif %}
</head>
<body>
<div class="container">
    <h1>Resume Screening Report</h1>
    <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>

    <div class="metrics">
        <div class="metric"><h4>Best Candidate</h4><p>{{ best_score }}/10</p></div>
        <div class="metric"><h4>Average Score</h4><p>{{ average_score }}/10</p></div>
        <div class="metric"><h4>Unique Skill Tags</h4><p>{{ unique_skill_tags }}</p></div>
        <div class="metric"><h4>Resumes Processed</h4><p>{{ resumes_processed }}</p></div>
    </div>

    <h2>Weights</h2>
    <p>{{ weights }}</p>

    <h2>Candidates</h2>
    <table>
        <tr><th>Resume</th><th>Score</th><th>Python</th><th>Leadership</th><th>Web</th><th>Data</th><th>Recommendation</th></tr>
        {% for row in rows %}
        <tr><td>{{ row.name }}</td><td>{{ row.score }}</td><td>{{ row.python }}</td><td>{{ row.leadership }}</td><td>{{ row.web }}</td><td>{{ row.data }}</td><td class="{{ row.recommendation }}">{{ row.recommendation }}</td></tr>
        {% endfor %}
    </table>

    <h2>Score Distribution</h2>
    <table>
        {% for bin in bins %}
        <tr><td>{{ bin.range }}</td><td><span class="bar" style="width: {{ bin.width }}px"></span> {{ bin.count }}</td></tr>
        {% endfor %}
    </table>

    {% if has_clusters %}
    <h2>Skill Clusters</h2>
    <ul>
        {% for cluster in clusters %}
        <li>Cluster {{ cluster.label }}: {{ cluster.phrases }}</li>
        {% endfor %}
    </ul>
    {% endif %}

    {% if has_skipped %}
    <div class="warning">
        <h3>Skipped Documents</h3>
        <ul>
            {% for reason in skipped %}
            <li>{{ reason }}</li>
            {% endfor %}
        </ul>
    </div>
    {% endif %}

    <p><small>resume-screener v{{ version }}</small></p>
</div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    best_score: String,
    average_score: String,
    unique_skill_tags: usize,
    resumes_processed: usize,
    weights: String,
    rows: Vec<HtmlCandidateRow>,
    bins: Vec<HtmlBin>,
    has_clusters: bool,
    clusters: Vec<HtmlCluster>,
    has_skipped: bool,
    skipped: Vec<String>,
    version: String,
}

struct HtmlCandidateRow {
    name: String,
    score: String,
    python: usize,
    leadership: usize,
    web: usize,
    data: usize,
    recommendation: String,
}

struct HtmlBin {
    range: String,
    width: usize,
    count: usize,
}

struct HtmlCluster {
    label: usize,
    phrases: String,
}

fn format_timestamp(report: &ScreeningReport) -> String {
    chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

fn format_weights(report: &ScreeningReport) -> String {
    report
        .weights
        .iter()
        .map(|(category, weight)| format!("{}: {:.2}", category.label(), weight))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_recommendation(&self, recommendation: Recommendation) -> String {
        let color = match recommendation {
            Recommendation::Hire => Color::Green,
            Recommendation::Review => Color::Yellow,
            Recommendation::Reject => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", recommendation.as_str().color(color).bold())
        } else {
            format!("[{}]", recommendation)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str(&self.format_header("📊 RESUME SCREENING REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!("Weights: {}\n", format_weights(report)));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!("  • Best Candidate:    {:.1}/10\n", summary.best_score));
        output.push_str(&format!("  • Average Score:     {:.1}/10\n", summary.average_score));
        output.push_str(&format!("  • Unique Skill Tags: {}\n", summary.unique_skill_tags));
        output.push_str(&format!("  • Resumes Processed: {}\n", summary.resumes_processed));
        output.push_str(&format!(
            "  • Hire / Review / Reject: {} / {} / {}\n",
            report.count_with(Recommendation::Hire),
            report.count_with(Recommendation::Review),
            report.count_with(Recommendation::Reject)
        ));

        output.push_str(&self.format_header("Candidates", 2));
        output.push_str(&format!(
            "  {:<28} {:>7} {:>7} {:>10} {:>5} {:>5}\n",
            "Resume", "Score", "Python", "Leadership", "Web", "Data"
        ));
        for candidate in &report.candidates {
            let name: String = candidate.name.chars().take(28).collect();
            output.push_str(&format!(
                "  {:<28} {:>7.2} {:>7} {:>10} {:>5} {:>5} {}\n",
                name,
                candidate.score,
                candidate.skills.get(SkillCategory::Python),
                candidate.skills.get(SkillCategory::Leadership),
                candidate.skills.get(SkillCategory::Web),
                candidate.skills.get(SkillCategory::Data),
                self.format_recommendation(candidate.recommendation)
            ));
            if self.detailed && !candidate.matched_keywords.is_empty() {
                output.push_str(&format!(
                    "      keywords: {}\n",
                    candidate.matched_keywords.join(", ")
                ));
            }
        }

        output.push_str(&self.format_header("Candidate Score Distribution", 2));
        for bin in &summary.distribution {
            let bar = "█".repeat(bin.count);
            output.push_str(&format!(
                "  {:>4.1}-{:<4.1} | {} {}\n",
                bin.lower,
                bin.upper,
                self.colorize(&bar, Color::Cyan),
                bin.count
            ));
        }

        if !summary.top_profiles.is_empty() {
            output.push_str(&self.format_header("Top Candidates - Skill Profile", 2));
            for profile in &summary.top_profiles {
                let name: String = profile.name.chars().take(15).collect();
                output.push_str(&format!("  {} ({:.2})\n", name, profile.score));
                for (category, count) in &profile.counts {
                    output.push_str(&format!(
                        "    {:<10} {} {}\n",
                        category.label(),
                        self.colorize(&"■".repeat(*count), Color::Magenta),
                        count
                    ));
                }
            }
        }

        if let Some(clusters) = &report.clusters {
            output.push_str(&self.format_header("Skill Clusters", 2));
            for cluster in clusters {
                output.push_str(&format!(
                    "  Cluster {}: {}\n",
                    cluster.label,
                    cluster.phrases.join(", ")
                ));
            }
        }

        if !report.skipped.is_empty() {
            output.push_str(&self.format_header("Skipped", 3));
            for skipped in &report.skipped {
                output.push_str(&format!(
                    "  {} {}\n",
                    self.colorize("⚠️", Color::Yellow),
                    skipped.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str("# 📊 Resume Screening Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
        }
        output.push_str(&format!("**Weights:** {}\n\n", format_weights(report)));

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Best Candidate | {:.1}/10 |\n", summary.best_score));
        output.push_str(&format!("| Average Score | {:.1}/10 |\n", summary.average_score));
        output.push_str(&format!("| Unique Skill Tags | {} |\n", summary.unique_skill_tags));
        output.push_str(&format!("| Resumes Processed | {} |\n\n", summary.resumes_processed));

        output.push_str("## Candidates\n\n");
        output.push_str("| Resume | Score | Python | Leadership | Web | Data | Recommendation |\n");
        output.push_str("|--------|-------|--------|------------|-----|------|----------------|\n");
        for candidate in &report.candidates {
            output.push_str(&format!(
                "| {} | {:.2} | {} | {} | {} | {} | {} |\n",
                candidate.name.replace('|', "\\|"),
                candidate.score,
                candidate.skills.get(SkillCategory::Python),
                candidate.skills.get(SkillCategory::Leadership),
                candidate.skills.get(SkillCategory::Web),
                candidate.skills.get(SkillCategory::Data),
                candidate.recommendation
            ));
        }
        output.push('\n');

        output.push_str("## Score Distribution\n\n");
        output.push_str("| Range | Count |\n");
        output.push_str("|-------|-------|\n");
        for bin in &summary.distribution {
            output.push_str(&format!("| {:.1}–{:.1} | {} |\n", bin.lower, bin.upper, bin.count));
        }
        output.push('\n');

        if let Some(clusters) = &report.clusters {
            output.push_str("## Skill Clusters\n\n");
            for cluster in clusters {
                output.push_str(&format!(
                    "- **Cluster {}:** {}\n",
                    cluster.label,
                    cluster.phrases.join(", ")
                ));
            }
            output.push('\n');
        }

        if !report.skipped.is_empty() {
            output.push_str("## ⚠️ Skipped Documents\n\n");
            for skipped in &report.skipped {
                output.push_str(&format!("- `{}`: {}\n", skipped.name, skipped.reason));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str(&format!(
                "---\n*Generated by resume-screener v{}*\n",
                report.metadata.screener_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &ScreeningReport) -> HtmlTemplate {
        let summary = &report.summary;
        let rows = report
            .candidates
            .iter()
            .map(|c| HtmlCandidateRow {
                name: c.name.clone(),
                score: format!("{:.2}", c.score),
                python: c.skills.get(SkillCategory::Python),
                leadership: c.skills.get(SkillCategory::Leadership),
                web: c.skills.get(SkillCategory::Web),
                data: c.skills.get(SkillCategory::Data),
                recommendation: c.recommendation.to_string(),
            })
            .collect();

        let bins = summary
            .distribution
            .iter()
            .map(|b| HtmlBin {
                range: format!("{:.1}–{:.1}", b.lower, b.upper),
                width: b.count * 20,
                count: b.count,
            })
            .collect();

        let clusters: Vec<HtmlCluster> = report
            .clusters
            .iter()
            .flatten()
            .map(|c| HtmlCluster {
                label: c.label,
                phrases: c.phrases.join(", "),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: format_timestamp(report),
            processing_time: report.metadata.processing_time_ms,
            best_score: format!("{:.1}", summary.best_score),
            average_score: format!("{:.1}", summary.average_score),
            unique_skill_tags: summary.unique_skill_tags,
            resumes_processed: summary.resumes_processed,
            weights: format_weights(report),
            rows,
            bins,
            has_clusters: report.clusters.is_some(),
            clusters,
            has_skipped: !report.skipped.is_empty(),
            skipped: report.skipped.iter().map(|s| s.reason.clone()).collect(),
            version: report.metadata.screener_version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeScreenerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("screening_report{}.txt", timestamp_suffix),
        OutputFormat::Json => format!("screening_report{}.json", timestamp_suffix),
        OutputFormat::Markdown => format!("screening_report{}.md", timestamp_suffix),
        OutputFormat::Html => format!("screening_report{}.html", timestamp_suffix),
    }
}
