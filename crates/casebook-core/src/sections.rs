//! Best-effort parsing of generated text into titled sections.
//!
//! Generated drafts follow a heading-delimited convention: a line starting
//! with a single `#` opens a new section titled by the rest of the line.
//! The parse is lossy and advisory only: callers keep the flat text as the
//! authoritative copy and treat the section list as a disposable projection.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ReportSection;

/// Matches a top-level heading line: `# Title` but not `## Subtitle`.
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#(?:[^#]|$)").expect("valid regex"));

fn heading_title(line: &str) -> Option<&str> {
    if HEADING.is_match(line) {
        Some(line[1..].trim())
    } else {
        None
    }
}

fn flush(title: Option<String>, body: &mut Vec<&str>, out: &mut Vec<ReportSection>) {
    let content = body.join("\n").trim().to_string();
    body.clear();
    match title {
        Some(t) => out.push(ReportSection::text(t, content)),
        None => {
            if !content.is_empty() {
                out.push(ReportSection::text("Untitled", content));
            }
        }
    }
}

/// Parse heading-delimited text into sections.
///
/// Returns `None` when the text contains no top-level heading at all, in
/// which case the caller should keep treating it as one flat document.
/// Text before the first heading becomes a leading "Untitled" section when
/// it is non-blank.
pub fn parse_sections(text: &str) -> Option<Vec<ReportSection>> {
    let mut sections: Vec<ReportSection> = Vec::new();
    let mut current_title: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut saw_heading = false;

    for line in text.lines() {
        if let Some(title) = heading_title(line) {
            saw_heading = true;
            flush(current_title.take(), &mut body, &mut sections);
            current_title = Some(title.to_string());
        } else {
            body.push(line);
        }
    }
    flush(current_title.take(), &mut body, &mut sections);

    if saw_heading {
        Some(sections)
    } else {
        None
    }
}

/// Render sections back into heading-delimited flat text.
///
/// `parse_sections(render_sections(s)) == Some(s)` for non-empty titled
/// sections; the round trip is what the editing workflow relies on.
pub fn render_sections(sections: &[ReportSection]) -> String {
    let mut out = String::new();
    for section in sections {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str("# ");
        out.push_str(&section.title);
        out.push_str("\n\n");
        out.push_str(&section.content);
    }
    out
}
