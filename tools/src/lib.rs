//! Reports on the compiled boundary rule tables, shared by the tool binaries.
use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use unicorn_segment::{BoundaryKind, Program, RuleTable, MAX_PROGRAM_LEN, THREAD_POOL_CAPACITY};

#[derive(Debug, Serialize)]
pub struct RuleReport {
    pub name: &'static str,
    pub breaks: bool,
    pub left_len: usize,
    pub right_len: usize,
    /// Disassembly, one instruction per line (backward program).
    pub left: Vec<String>,
    pub right: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TableReport {
    pub kind: BoundaryKind,
    pub longest_program: usize,
    pub max_program_len: usize,
    pub thread_pool_capacity: usize,
    pub rules: Vec<RuleReport>,
}

fn listing(program: &Program, kind: BoundaryKind) -> Vec<String> {
    program.disassemble(kind).lines().map(str::to_owned).collect()
}

/// Build the report for one boundary kind, optionally keeping only the rule
/// called `only`.
pub fn table_report(kind: BoundaryKind, only: Option<&str>) -> Result<TableReport> {
    let table = RuleTable::for_kind(kind)?;
    let rules = table
        .rules()
        .iter()
        .filter(|rule| only.is_none_or(|name| rule.name.eq_ignore_ascii_case(name)))
        .map(|rule| RuleReport {
            name: rule.name,
            breaks: rule.breaks,
            left_len: rule.left.len(),
            right_len: rule.right.len(),
            left: listing(&rule.left, kind),
            right: listing(&rule.right, kind),
        })
        .collect();

    Ok(TableReport {
        kind,
        longest_program: table.max_program_len(),
        max_program_len: MAX_PROGRAM_LEN,
        thread_pool_capacity: THREAD_POOL_CAPACITY,
        rules,
    })
}

/// Plain-text rendering. Without `disassemble` only sizes are listed.
pub fn render_text(report: &TableReport, disassemble: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} rules: {} (longest program {}/{}, thread pool {})",
        report.kind,
        report.rules.len(),
        report.longest_program,
        report.max_program_len,
        report.thread_pool_capacity
    );
    for rule in &report.rules {
        let verdict = if rule.breaks { "÷" } else { "×" };
        let _ = writeln!(
            out,
            "  {:<6} {}  left {:>2}  right {:>2}",
            rule.name, verdict, rule.left_len, rule.right_len
        );
        if disassemble {
            for (label, lines) in [("left", &rule.left), ("right", &rule.right)] {
                let _ = writeln!(out, "    {label}:");
                for line in lines {
                    let _ = writeln!(out, "      {line}");
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_fit_the_simulator() {
        for kind in BoundaryKind::ALL {
            let report = table_report(kind, None).unwrap();
            assert!(report.longest_program <= report.max_program_len);
            assert!(!report.rules.is_empty());
            assert_eq!(report.rules.last().unwrap().left, vec!["0000  halt"]);
        }
    }

    #[test]
    fn test_single_rule_filter() {
        let report = table_report(BoundaryKind::Grapheme, Some("gb3")).unwrap();
        assert_eq!(report.rules.len(), 1);
        assert_eq!(report.rules[0].name, "GB3");
        assert!(!report.rules[0].breaks);

        let text = render_text(&report, true);
        assert!(text.contains("class CR"));
        assert!(text.contains("class LF"));
    }

    #[test]
    fn test_json_shape() {
        let report = table_report(BoundaryKind::Sentence, Some("SB998")).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "sentence");
        assert_eq!(json["rules"][0]["breaks"], false);
    }
}
