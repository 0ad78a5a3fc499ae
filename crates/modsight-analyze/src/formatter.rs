//! Human-readable rendering of analysis results.

#![allow(clippy::format_push_string)]

use crate::types::{CrashSuspect, FailedMod, LogAnalyzeResult, LogLikelyCause};

const RULE: &str = "───────────────────────────────────────────────────────────────\n";
const BANNER: &str = "═══════════════════════════════════════════════════════════════\n";
const LINE_WIDTH: usize = 100;

/// Formats a result into a multi-section report.
#[must_use]
pub fn format_report(result: &LogAnalyzeResult) -> String {
    let mut output = String::new();
    output.push_str(BANNER);
    output.push_str("                     MODSIGHT CRASH REPORT\n");
    output.push_str(BANNER);
    output.push_str(&format_counts(result));

    if result.is_empty() {
        output.push_str("\nNo log lines to analyze.\n");
        return output;
    }

    if result.likely_causes.is_empty() {
        output.push_str("\nNo known failure signature matched.\n");
    } else {
        output.push_str("\nLIKELY CAUSES\n");
        output.push_str(RULE);
        for (i, cause) in result.likely_causes.iter().enumerate() {
            let evidence = result
                .evidence_by_cause
                .get(&cause.id)
                .map_or(&[][..], Vec::as_slice);
            output.push_str(&format_cause(i + 1, cause, evidence));
        }
    }

    if !result.failed_mods.is_empty() {
        output.push_str("\nFAILED MODS\n");
        output.push_str(RULE);
        for failed in &result.failed_mods {
            output.push_str(&format_failed_mod(failed));
        }
    }

    if !result.suspects.is_empty() {
        output.push_str("\nSUSPECTS\n");
        output.push_str(RULE);
        for suspect in &result.suspects {
            output.push_str(&format_suspect(suspect));
        }
    }

    if !result.key_errors.is_empty() {
        output.push_str("\nKEY ERRORS\n");
        output.push_str(RULE);
        for line in &result.key_errors {
            output.push_str(&format!("  {}\n", truncate(line, LINE_WIDTH)));
        }
    }

    if !result.confidence_notes.is_empty() {
        output.push('\n');
        output.push_str(BANNER);
        for note in &result.confidence_notes {
            output.push_str(&format!("{note}\n"));
        }
    }

    output
}

fn format_counts(result: &LogAnalyzeResult) -> String {
    format!(
        "Lines: {}  (error {}, warn {}, info {}, debug {}, trace {})\n",
        result.total_lines,
        result.error_count,
        result.warn_count,
        result.info_count,
        result.debug_count,
        result.trace_count
    )
}

fn format_cause(rank: usize, cause: &LogLikelyCause, evidence: &[String]) -> String {
    let mut output = format!(
        "\n[{rank}] {} ({})\n",
        cause.title,
        percent(cause.confidence)
    );
    output.push_str(&format!("    {}\n", truncate(&cause.reason, LINE_WIDTH)));
    if !evidence.is_empty() {
        output.push_str("    Evidence:\n");
        for line in evidence {
            output.push_str(&format!("    • {}\n", truncate(line, LINE_WIDTH)));
        }
    }
    for fix in &cause.fixes {
        output.push_str(&format!("    Fix: {fix}\n"));
    }
    output
}

fn format_failed_mod(failed: &FailedMod) -> String {
    format!(
        "  {} [{}] {}\n      {}\n",
        failed.label,
        failed.id,
        percent(failed.confidence),
        truncate(&failed.reason, LINE_WIDTH)
    )
}

fn format_suspect(suspect: &CrashSuspect) -> String {
    format!(
        "  {:<24} {:>4}  {} line(s)\n",
        suspect.label,
        percent(suspect.confidence),
        suspect.matches
    )
}

/// One-line summary, e.g. for notifications.
#[must_use]
pub fn format_summary(result: &LogAnalyzeResult) -> String {
    match (result.top_cause(), result.suspects.first()) {
        _ if result.is_empty() => "[EMPTY] no log lines".to_string(),
        (Some(cause), Some(suspect)) => format!(
            "[{}] {} ({}), top suspect {}",
            severity_tag(result),
            cause.title,
            percent(cause.confidence),
            suspect.label
        ),
        (Some(cause), None) => format!(
            "[{}] {} ({})",
            severity_tag(result),
            cause.title,
            percent(cause.confidence)
        ),
        (None, _) => format!(
            "[{}] no known cause, {} error line(s)",
            severity_tag(result),
            result.error_count
        ),
    }
}

fn severity_tag(result: &LogAnalyzeResult) -> &'static str {
    if result.error_count > 0 {
        "ERROR"
    } else if result.warn_count > 0 {
        "WARN"
    } else {
        "OK"
    }
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_log_text;

    const CRASH: &str = "[12:00:00] [Server thread/ERROR]: Exception in thread \"main\" java.lang.NoClassDefFoundError: net/foo/BarMod\nCaused by: java.lang.ClassNotFoundException: net.foo.BarMod\n\tat net.foo.BarMod.init(BarMod.java:10)";

    #[test]
    fn report_has_sections() {
        let report = format_report(&analyze_log_text(CRASH));
        assert!(report.contains("MODSIGHT CRASH REPORT"));
        assert!(report.contains("Lines: 3"));
        assert!(report.contains("LIKELY CAUSES"));
        assert!(report.contains("[1] Missing class, method or field"));
        assert!(report.contains("Fix: "));
        assert!(report.contains("KEY ERRORS"));
    }

    #[test]
    fn empty_report() {
        let report = format_report(&LogAnalyzeResult::default());
        assert!(report.contains("No log lines to analyze."));
        assert!(!report.contains("LIKELY CAUSES"));
    }

    #[test]
    fn report_without_causes() {
        let report = format_report(&analyze_log_text("all quiet"));
        assert!(report.contains("No known failure signature matched."));
    }

    #[test]
    fn summary_lines() {
        assert_eq!(format_summary(&LogAnalyzeResult::default()), "[EMPTY] no log lines");
        let summary = format_summary(&analyze_log_text(CRASH));
        assert!(summary.starts_with("[ERROR] Missing class, method or field ("));
        assert_eq!(
            format_summary(&analyze_log_text("all quiet")),
            "[OK] no known cause, 0 error line(s)"
        );
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}
