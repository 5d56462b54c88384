//! Printable HTML report
//!
//! A self-contained A4 page: summary table, gap analysis, then the full
//! grid with the score of every criterion. Printing it to PDF from a
//! browser gives the downloadable report.

use super::formatter::ReportFormatter;
use super::structured::StructuredResults;
use assess_domain::{Catalog, Dimension, Tier};
use std::collections::HashMap;
use std::fmt::Write;

const ACCENT: &str = "#008C9E";

const STYLE: &str = r#"
    @page { size: A4; margin: 25mm 15mm; }
    body { font-family: -apple-system, "Segoe UI", Roboto, Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; }
    .container { width: 90%; margin: 0 auto; }
    .header { text-align: center; border-bottom: 3px solid #008C9E; padding-bottom: 20px; margin-bottom: 30px; }
    .header h1 { color: #008C9E; margin: 0; font-size: 2.2em; }
    .header p { color: #666; margin: 5px 0 0 0; }
    .page-break { page-break-after: always; }
    table { width: 100%; border-collapse: collapse; margin-bottom: 20px; border: 2px solid #333; font-size: 0.9em; }
    th, td { border: 1px solid #333; padding: 8px; }
    thead th { background-color: #008C9E; color: white; text-align: center; }
    td.num { text-align: center; font-weight: bold; }
    tr.weak td.pct { background-color: #ffcccc; }
    .global-score { background: linear-gradient(135deg, #008C9E, #006b7a); color: white; padding: 20px; border-radius: 10px; text-align: center; margin-bottom: 30px; }
    .global-score .value { font-size: 2.5em; font-weight: bold; }
    .analysis { background: #f8f9fa; padding: 25px; border-radius: 10px; margin-bottom: 30px; border-left: 5px solid #008C9E; }
    .gaps h3 { color: #dc3545; }
    .aligned h3 { color: #28a745; }
    .exceeding h3 { color: #008C9E; }
    .tier-1 { background-color: #e6f7ff; }
    .tier-2 { background-color: #fffbe6; }
    .tier-3 { background-color: #fff0e6; }
    .tier-4 { background-color: #e6ffed; }
    .criterion { font-size: 0.85em; }
    .footer { text-align: center; margin-top: 40px; padding-top: 20px; border-top: 1px solid #dee2e6; color: #888; font-size: 0.8em; }
"#;

/// Renders a results document as a printable page
pub struct HtmlReport<'a> {
    catalog: &'a Catalog,
}

impl<'a> HtmlReport<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn render(&self, results: &StructuredResults) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <meta charset="UTF-8">
  <title>Rapport de Maturité Digitale</title>
  <style>{style}</style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Rapport de Maturité Digitale</h1>
      <p>Session : {session}</p>
      <p>Rapport généré le : {date}</p>
    </div>
"#,
            style = STYLE,
            session = escape(&results.session_id),
            date = results.generated_at.format("%d/%m/%Y %H:%M"),
        );

        self.summary(&mut html, results);
        self.analysis(&mut html, results);
        html.push_str("    <div class=\"page-break\"></div>\n");
        self.detail(&mut html, results);

        html.push_str(
            r#"    <div class="footer"><p>Rapport généré par digi-assess</p></div>
  </div>
</body>
</html>
"#,
        );
        html
    }

    fn summary(&self, html: &mut String, results: &StructuredResults) {
        html.push_str(
            r#"    <table>
      <thead><tr><th>Dimension</th><th>Palier 1</th><th>Palier 2</th><th>Palier 3</th><th>Palier 4</th><th>Total</th><th>Score %</th><th>Palier atteint</th></tr></thead>
      <tbody>
"#,
        );
        for dim in &results.dimensions {
            let class = if dim.score_percent < 50.0 { "weak" } else { "" };
            let _ = write!(
                html,
                "        <tr class=\"{}\"><td><b>{}</b></td>",
                class,
                escape(dim.name.label())
            );
            for total in dim.tier_totals {
                let _ = write!(html, "<td class=\"num\">{}</td>", total);
            }
            let _ = writeln!(
                html,
                "<td class=\"num\">{}</td><td class=\"num pct\">{:.1}%</td><td class=\"num\">Palier {}</td></tr>",
                dim.score_raw, dim.score_percent, dim.achieved_level
            );
        }
        let _ = write!(
            html,
            r#"      </tbody>
    </table>
    <div class="global-score">
      <div class="value">{:.1}%</div>
      <div>Profil : {} (Niveau {})</div>
      <div>Palier cible attendu : Palier {}</div>
    </div>
"#,
            results.global_score,
            escape(&results.profile_name),
            results.profile_level,
            results.profile_level
        );
    }

    fn analysis(&self, html: &mut String, results: &StructuredResults) {
        let target = results.profile_level;
        html.push_str("    <div class=\"analysis\">\n      <h2>Analyse des digital gaps</h2>\n");

        let _ = writeln!(
            html,
            "      <div class=\"gaps\"><h3>Digital gaps identifiés (dimensions &lt; Palier {})</h3>",
            target
        );
        if results.digital_gaps.is_empty() {
            html.push_str("        <p>Aucune lacune majeure identifiée par rapport à votre profil.</p>\n");
        } else {
            html.push_str("        <ul>\n");
            for gap in &results.digital_gaps {
                let advice = if gap.tier_attained + 1 < target {
                    "à renforcer fortement"
                } else {
                    "à faire progresser"
                };
                let _ = writeln!(
                    html,
                    "          <li><b>{} (Palier {} → {})</b></li>",
                    escape(gap.dimension.label()),
                    gap.tier_attained,
                    advice
                );
            }
            html.push_str("        </ul>\n");
        }
        html.push_str("      </div>\n");

        html.push_str("      <div class=\"aligned\"><h3>Dimensions alignées au palier cible</h3>\n");
        let aligned = results.aligned_dimensions();
        if aligned.is_empty() {
            html.push_str(
                "        <p>Aucune dimension n'est exactement alignée avec le niveau cible.</p>\n",
            );
        } else {
            let names: Vec<String> = aligned.iter().map(|d| escape(d.label())).collect();
            let _ = writeln!(html, "        <ul><li><b>{}</b></li></ul>", names.join(", "));
        }
        html.push_str("      </div>\n");

        html.push_str(
            "      <div class=\"exceeding\"><h3>Dimensions dépassant le palier cible</h3>\n",
        );
        let exceeding = results.exceeding_dimensions();
        if exceeding.is_empty() {
            html.push_str("        <p>Aucune dimension ne dépasse actuellement le niveau cible.</p>\n");
        } else {
            html.push_str("        <ul>\n");
            for (dimension, tier) in exceeding {
                let _ = writeln!(
                    html,
                    "          <li><b>{} (Palier {}) : opportunité de capitalisation</b></li>",
                    escape(dimension.label()),
                    tier
                );
            }
            html.push_str("        </ul>\n");
        }
        html.push_str("      </div>\n    </div>\n");
    }

    fn detail(&self, html: &mut String, results: &StructuredResults) {
        let scores: HashMap<&str, u8> = results
            .detailed_responses
            .iter()
            .filter_map(|r| Some((r.criterion_id.as_str(), r.evaluation.as_ref()?.score())))
            .collect();

        let _ = write!(
            html,
            r#"    <h2 style="color: {accent};">Rapport détaillé</h2>
    <table>
      <thead><tr><th>Dimension</th><th>Palier cible</th><th>Critère 1</th><th>Critère 2</th><th>Critère 3</th><th>Score %</th></tr></thead>
      <tbody>
"#,
            accent = ACCENT
        );

        for dim in &results.dimensions {
            let rows: Vec<(Tier, Vec<(&str, &str)>)> = Tier::all()
                .map(|tier| {
                    let cells = self
                        .catalog
                        .criteria_in(dim.name, tier)
                        .map(|c| (c.id.as_str(), c.prompt_text.as_str()))
                        .collect::<Vec<_>>();
                    (tier, cells)
                })
                .filter(|(_, cells)| !cells.is_empty())
                .collect();
            let rowspan = rows.len() * 2;
            let width = rows.iter().map(|(_, c)| c.len()).max().unwrap_or(0);

            for (i, (tier, cells)) in rows.iter().enumerate() {
                let _ = write!(html, "        <tr class=\"tier-{}\">", tier.value());
                if i == 0 {
                    self.dimension_cells(html, dim.name, results.profile_level, rowspan);
                }
                for slot in 0..width {
                    let text = cells.get(slot).map(|(_, t)| escape(t)).unwrap_or_default();
                    let _ = write!(html, "<td class=\"criterion\">{}</td>", text);
                }
                if i == 0 {
                    let _ = write!(
                        html,
                        "<td class=\"num\" rowspan=\"{}\">{:.2}%</td>",
                        rowspan, dim.score_percent
                    );
                }
                html.push_str("</tr>\n");

                let _ = write!(html, "        <tr class=\"tier-{}\">", tier.value());
                for slot in 0..width {
                    let score = cells
                        .get(slot)
                        .map(|(id, _)| scores.get(id).copied().unwrap_or(0).to_string())
                        .unwrap_or_default();
                    let _ = write!(html, "<td class=\"num\">{}</td>", score);
                }
                html.push_str("</tr>\n");
            }
        }

        let _ = write!(
            html,
            r#"      </tbody>
    </table>
    <table>
      <tr><th>Score final de maturité globale %</th><th>Niveau final de maturité globale</th></tr>
      <tr><td class="num">{:.2}%</td><td class="num">{} - {}</td></tr>
    </table>
"#,
            results.global_score,
            results.profile_level,
            escape(&results.profile_name)
        );
    }

    fn dimension_cells(&self, html: &mut String, dimension: Dimension, target: u8, rowspan: usize) {
        let _ = write!(
            html,
            "<td rowspan=\"{rowspan}\"><b>{}</b></td><td class=\"num\" rowspan=\"{rowspan}\">Niveau {}</td>",
            escape(dimension.label()),
            target,
        );
    }
}

impl ReportFormatter for HtmlReport<'_> {
    fn format(&self, results: &StructuredResults) -> String {
        self.render(results)
    }
}

/// Escape text for HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
