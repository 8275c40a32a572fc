//! Report rendering — plain text and JSON views of a panel run.

use chrono::{DateTime, Utc};
use consilium_core::outcome::Outcome;
use consilium_core::role::Role;
use consilium_panel::RunResult;
use serde::Serialize;

const PREVIEW_CHARS: usize = 200;

/// Reports at or below this many words are flagged as limited.
const LIMITED_DEPTH_WORDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct RoleEntry<'a> {
    role: Role,
    success: bool,
    text: &'a str,
}

impl<'a> RoleEntry<'a> {
    fn new(role: Role, outcome: &'a Outcome) -> Self {
        Self {
            role,
            success: outcome.is_success(),
            text: outcome.body(),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    run_id: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    document_preview: String,
    specialists: Vec<RoleEntry<'a>>,
    synthesis: RoleEntry<'a>,
}

pub fn render(result: &RunResult, document: &str, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => render_text(result),
        ReportFormat::Json => render_json(result, document),
    }
}

/// Whitespace-separated word count of a successful report; zero for failures.
pub fn word_count(outcome: &Outcome) -> usize {
    outcome.text().map_or(0, |text| text.split_whitespace().count())
}

fn depth_label(words: usize) -> &'static str {
    if words > LIMITED_DEPTH_WORDS {
        "complete"
    } else {
        "limited"
    }
}

fn preview(document: &str) -> String {
    let mut chars = document.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

fn outcome_body(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success { text } => text.clone(),
        Outcome::Failure { message } => format!("FAILED: {message}"),
    }
}

pub fn render_text(result: &RunResult) -> String {
    let specialists = result.specialists();
    let mut out = String::new();

    out.push_str("# Medical AI Diagnosis Report\n");
    out.push_str(&format!(
        "Generated: {}\n",
        result.metadata().finished_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Specialists: {} consulted, {} succeeded\n",
        specialists.len(),
        specialists.success_count()
    ));

    out.push_str("\n## Final Diagnosis\n");
    out.push_str(&outcome_body(result.synthesis()));
    out.push('\n');

    out.push_str("\n## Individual Specialist Reports\n");
    for (role, outcome) in specialists.iter() {
        let heading = if outcome.is_success() {
            let words = word_count(outcome);
            format!("{role} ({words} words, {})", depth_label(words))
        } else {
            format!("{role} (failed)")
        };
        out.push_str(&format!("\n### {heading}\n{}\n", outcome_body(outcome)));
    }

    out
}

pub fn render_json(result: &RunResult, document: &str) -> String {
    let metadata = result.metadata();
    let report = JsonReport {
        run_id: &metadata.run_id,
        started_at: metadata.started_at,
        finished_at: metadata.finished_at,
        document_preview: preview(document),
        specialists: result
            .specialists()
            .iter()
            .map(|(role, outcome)| RoleEntry::new(role, outcome))
            .collect(),
        synthesis: RoleEntry::new(result.synthesis_role(), result.synthesis()),
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_panel::{ResultStore, RunMetadata};

    fn sample() -> RunResult {
        let now = Utc::now();
        let mut store = ResultStore::new();
        store.put(Role::Neurologist, Outcome::success("Possible migraine; recommend an MRI"));
        store.put(Role::Cardiologist, Outcome::failure("timeout: no response within 30.0s"));
        store.put(
            Role::Psychologist,
            Outcome::success("Symptoms consistent with panic disorder, recommend a structured clinical interview and follow-up"),
        );
        RunResult::new(
            RunMetadata {
                run_id: "run-42".into(),
                started_at: now,
                finished_at: now,
            },
            store,
            Role::MultidisciplinaryTeam,
            Outcome::success("- Panic disorder\n- Migraine\n- Arrhythmia"),
        )
    }

    #[test]
    fn text_report_leads_with_the_team_diagnosis() {
        let text = render_text(&sample());
        let diagnosis = text.find("## Final Diagnosis").unwrap();
        let individual = text.find("## Individual Specialist Reports").unwrap();
        assert!(diagnosis < individual);
        assert!(text.contains("Specialists: 3 consulted, 2 succeeded"));
        assert!(text.contains("- Panic disorder"));
    }

    #[test]
    fn text_report_shows_failures_instead_of_omitting_them() {
        let text = render_text(&sample());
        assert!(text.contains("### Cardiologist (failed)\nFAILED: timeout: no response within 30.0s"));
    }

    #[test]
    fn text_report_lists_specialists_in_canonical_order() {
        let text = render_text(&sample());
        let cardio = text.find("### Cardiologist").unwrap();
        let psych = text.find("### Psychologist").unwrap();
        let neuro = text.find("### Neurologist").unwrap();
        assert!(cardio < psych && psych < neuro);
    }

    #[test]
    fn word_counts_flag_limited_reports() {
        let text = render_text(&sample());
        assert!(text.contains("### Neurologist (5 words, limited)"));
        assert!(text.contains("### Psychologist (12 words, complete)"));
        assert_eq!(word_count(&Outcome::failure("boom boom")), 0);
    }

    #[test]
    fn json_report_has_role_success_text_entries() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&sample(), "patient reports chest pain")).unwrap();

        assert_eq!(json["run_id"], "run-42");
        assert_eq!(json["document_preview"], "patient reports chest pain");
        let specialists = json["specialists"].as_array().unwrap();
        assert_eq!(specialists.len(), 3);
        assert_eq!(specialists[0]["role"], "Cardiologist");
        assert_eq!(specialists[0]["success"], false);
        assert_eq!(specialists[0]["text"], "timeout: no response within 30.0s");
        assert_eq!(json["synthesis"]["role"], "MultidisciplinaryTeam");
        assert_eq!(json["synthesis"]["success"], true);
    }

    #[test]
    fn long_documents_are_previewed() {
        let document = "é".repeat(PREVIEW_CHARS + 5);
        let shown = preview(&document);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }
}
