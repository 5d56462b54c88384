//! Console output formatter

use super::formatter::ReportFormatter;
use super::structured::{Priority, StructuredResults};
use assess_application::{ResumeOutput, SubmitAnswerOutput};
use assess_domain::{Catalog, ConfigIssue, Dimension, MAX_SCORE, Severity, Tier};
use colored::Colorize;

/// Formats sessions and reports for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a results document as a colored summary
    pub fn format_results(results: &StructuredResults) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Rapport de Maturité Digitale"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}   {} {}\n",
            "Session:".dimmed(),
            results.session_id,
            "Status:".dimmed(),
            results.status
        ));
        output.push_str(&format!(
            "{} {:.1}%   {} {} (Niveau {})\n",
            "Score global:".bold(),
            results.global_score,
            "Profil:".bold(),
            results.profile_name.green().bold(),
            results.profile_level
        ));
        output.push_str(&format!(
            "{} {} ({}%)\n",
            "Réponses:".dimmed(),
            results.summary.total_questions_answered,
            results.summary.completion_percentage
        ));

        // Dimensions
        output.push_str(&Self::section_header("Dimensions"));
        output.push_str(&format!(
            "  {:<18} {:>4} {:>4} {:>4} {:>4} {:>6} {:>8}  {}\n",
            "", "P1", "P2", "P3", "P4", "Total", "Score", "Palier"
        ));
        for dim in &results.dimensions {
            let percent = format!("{:>8}", format!("{:.1}%", dim.score_percent));
            let percent = if dim.score_percent < 50.0 {
                percent.red()
            } else {
                percent.green()
            };
            output.push_str(&format!(
                "  {:<18} {:>4} {:>4} {:>4} {:>4} {:>6} {}  {}\n",
                dim.name.label(),
                dim.tier_totals[0],
                dim.tier_totals[1],
                dim.tier_totals[2],
                dim.tier_totals[3],
                dim.score_raw,
                percent,
                dim.achieved_level
            ));
        }

        // Gap analysis
        output.push_str(&Self::section_header(&format!(
            "Digital gaps (palier cible {})",
            results.profile_level
        )));
        if results.digital_gaps.is_empty() {
            output.push_str(&format!("  {}\n", "Aucune lacune majeure identifiée.".green()));
        }
        for gap in &results.digital_gaps {
            output.push_str(&format!(
                "  {} {} (palier {} -> {})\n",
                "!".red().bold(),
                gap.dimension.label(),
                gap.tier_attained,
                gap.tier_target
            ));
        }

        let aligned = results.aligned_dimensions();
        if !aligned.is_empty() {
            output.push_str(&format!(
                "  {} Alignées: {}\n",
                "v".green(),
                Self::labels(&aligned)
            ));
        }
        for (dimension, tier) in results.exceeding_dimensions() {
            output.push_str(&format!(
                "  {} {} (palier {})\n",
                "*".cyan(),
                dimension.label(),
                tier
            ));
        }

        // Recommendations
        output.push_str(&Self::section_header("Recommandations"));
        for rec in &results.recommendations {
            let priority = match rec.priority {
                Priority::High => "high".red().bold(),
                Priority::Medium => "medium".yellow().bold(),
                Priority::Low => "low".green().bold(),
            };
            output.push_str(&format!("  [{}] {}\n", priority, rec.title.bold()));
            output.push_str(&format!("{}\n", Self::indent(&rec.description, "      ")));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format one conversation turn
    pub fn format_turn(turn: &SubmitAnswerOutput) -> String {
        let mut output = String::new();

        if let Some(score) = turn.score {
            output.push_str(&format!(
                "{}\n",
                format!("[score {}/{}]", score, MAX_SCORE).dimmed()
            ));
        }
        if turn.is_finished() {
            output.push_str(&format!("{}\n", turn.ai_question.green()));
            output.push_str(&format!(
                "\n{} digi-assess results --session {}\n",
                "Rapport:".bold(),
                turn.session_id
            ));
        } else {
            output.push_str(&format!("{}\n", turn.ai_question));
            output.push_str(&format!(
                "{}\n",
                format!("({})", turn.current_criterion_id).dimmed()
            ));
        }

        output
    }

    /// Format the outstanding state of a session
    pub fn format_resume(state: &ResumeOutput, catalog_len: usize) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}   {} {}/{}\n",
            "Session:".dimmed(),
            state.session_id,
            "Question:".dimmed(),
            (state.current_index + 1).min(catalog_len),
            catalog_len
        ));

        match state.pending_question() {
            Some(question) => output.push_str(&format!("\n{}\n", question)),
            None if state.is_finished() => output.push_str(&format!(
                "\n{}\n",
                "Diagnostic terminé. Le rapport est disponible.".green()
            )),
            None => output.push_str(&format!("\n{}\n", "Aucune question en attente.".yellow())),
        }

        output
    }

    /// List the catalog grouped by dimension and tier
    pub fn format_catalog(catalog: &Catalog) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Grille de diagnostic ({} critères)", catalog.len())));
        output.push('\n');
        for dimension in Dimension::ALL {
            output.push_str(&Self::section_header(&format!(
                "D{} {}",
                dimension.number(),
                dimension.label()
            )));
            for tier in Tier::all() {
                for criterion in catalog.criteria_in(dimension, tier) {
                    output.push_str(&format!(
                        "  {} {}\n",
                        criterion.id.to_string().cyan(),
                        criterion.prompt_text
                    ));
                }
            }
        }

        output
    }

    /// Show where configuration came from and what is wrong with it
    pub fn format_config(sources: &[String], issues: &[ConfigIssue]) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Configuration sources"));
        if sources.is_empty() {
            output.push_str("  (defaults only)\n");
        }
        for source in sources {
            output.push_str(&format!("  {}\n", source));
        }

        output.push_str(&Self::section_header("Issues"));
        if issues.is_empty() {
            output.push_str(&format!("  {}\n", "none".green()));
        }
        for issue in issues {
            output.push_str(&format!("  {}\n", Self::format_issue(issue)));
        }

        output
    }

    pub fn format_issue(issue: &ConfigIssue) -> String {
        match issue.severity {
            Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
            Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
        }
    }

    fn labels(dimensions: &[Dimension]) -> String {
        dimensions
            .iter()
            .map(|d| d.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, results: &StructuredResults) -> String {
        Self::format_results(results)
    }
}
