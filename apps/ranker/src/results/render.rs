//! Plain-text rendering of the results screen for a terminal.

use crate::models::{Candidate, JobStatusResponse};
use crate::results::stats::{ResultStats, ScoreBand};
use crate::results::view::ResultsView;

const MAX_LISTED_SKILLS: usize = 4;
const DESCRIPTION_PREVIEW_CHARS: usize = 120;

pub fn render_stats(stats: &ResultStats) -> String {
    format!(
        "Total: {}  |  Excellent (80+): {}  |  Good (60-79): {}  |  Average score: {}",
        stats.total, stats.excellent, stats.good, stats.average
    )
}

pub fn render_table(candidates: &[&Candidate]) -> String {
    if candidates.is_empty() {
        return "No candidates were returned for this job.\n".to_string();
    }

    let name_width = candidates
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:>3}  {:<name_width$}  {:>5}  {:<9}  {:>5}  {}\n",
        "#", "Name", "Score", "Band", "Exp", "Top skills"
    ));
    for (i, c) in candidates.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<name_width$}  {:>5.0}  {:<9}  {:>5}  {}\n",
            i + 1,
            c.name,
            c.score,
            ScoreBand::of(c.score).label(),
            format!("{}y", format_years(c.experience)),
            top_skills(c)
        ));
    }
    out
}

pub fn render_detail(c: &Candidate) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} (id {})\n", c.name, c.id));
    out.push_str(&format!(
        "  Score:      {:.0} ({})\n",
        c.score,
        ScoreBand::of(c.score).label()
    ));
    out.push_str(&format!("  Email:      {}\n", or_dash(&c.email)));
    out.push_str(&format!("  Phone:      {}\n", or_dash(&c.phone)));
    out.push_str(&format!("  Experience: {} years\n", format_years(c.experience)));
    out.push_str(&format!("  Skills:     {}\n", or_dash(&c.skills.join(", "))));
    if c.has_sub_scores() {
        out.push_str("  Match breakdown:\n");
        for (label, value) in [
            ("skills", c.skills_match),
            ("experience", c.experience_match),
            ("education", c.education_match),
        ] {
            if let Some(v) = value {
                out.push_str(&format!("    {label:<11}{v:>5.0}%\n"));
            }
        }
    }
    out.push_str(&format!("  Summary:    {}\n", or_dash(&c.summary)));
    if let Some(notes) = c.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        out.push_str(&format!("  Notes:      {notes}\n"));
    }
    out
}

/// Header, stats line, sorted table and, if one is open, the detail overlay.
pub fn render_results(view: &ResultsView) -> String {
    let mut out = String::new();
    if let Some(job_id) = view.results().job_id.as_deref() {
        out.push_str(&format!("Results for job {job_id}\n"));
    }
    if !view.job_description().trim().is_empty() {
        out.push_str(&format!("Job description: {}\n", preview(view.job_description())));
    }
    out.push_str(&render_stats(&view.stats()));
    out.push('\n');
    let sort = view.sort();
    out.push_str(&format!("Sorted by {} ({})\n\n", sort.key, sort.direction));
    out.push_str(&render_table(&view.display_order()));
    if let Some(selected) = view.selected() {
        out.push('\n');
        out.push_str(&render_detail(selected));
    }
    out
}

/// One status line per poll tick.
pub fn render_progress(status: &JobStatusResponse) -> String {
    let mut line = format!("[{}]", status.status);
    if let Some(p) = status.progress {
        line.push_str(&format!(" {p:>3}%"));
    }
    if let Some(message) = status.message.as_deref().filter(|m| !m.is_empty()) {
        line.push_str(&format!(" {message}"));
    }
    line
}

fn top_skills(c: &Candidate) -> String {
    let mut skills = c
        .skills
        .iter()
        .take(MAX_LISTED_SKILLS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if c.skills.len() > MAX_LISTED_SKILLS {
        skills.push_str(&format!(" +{}", c.skills.len() - MAX_LISTED_SKILLS));
    }
    skills
}

fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        format!("{years:.1}")
    }
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}
