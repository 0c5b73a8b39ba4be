// src/reporting/console.rs
use crate::pipeline::RunOutcome;
use crate::reporting::AnalysisRow;
use colored::Colorize;
use std::collections::BTreeMap;

/// Prints what an upgrade run changed.
pub fn print_upgrade(outcome: &RunOutcome, written: Option<usize>) {
    for path in &outcome.changed {
        println!("  {} {}", "~".yellow(), path.display());
    }
    print_annotations(outcome);

    let summary = format!(
        "{} {} in {} {} ({} tool {})",
        outcome.changed.len(),
        pluralize("file", outcome.changed.len()),
        outcome.passes,
        pluralize("pass", outcome.passes as usize),
        outcome.runs.len(),
        pluralize("run", outcome.runs.len()),
    );
    match written {
        Some(n) => println!("{} Upgraded {summary}; wrote {n}.", "OK".green().bold()),
        None => println!("{} Would upgrade {summary} (dry run).", "OK".green().bold()),
    }
}

/// Prints analysis findings grouped by source file.
pub fn print_analysis(outcome: &RunOutcome) {
    let mut by_file: BTreeMap<&str, Vec<&AnalysisRow>> = BTreeMap::new();
    for row in outcome.table.rows() {
        by_file.entry(row.source_path.as_str()).or_default().push(row);
    }

    for (file, rows) in &by_file {
        println!("{} {}", "-->".blue(), file.bold());
        for row in rows {
            print_row(row);
        }
        println!();
    }
    print_annotations(outcome);

    let findings = outcome.table.len();
    if findings == 0 {
        println!("{} No findings.", "OK".green().bold());
    } else {
        println!(
            "{} {findings} {} in {} {}.",
            "DONE".yellow().bold(),
            pluralize("finding", findings),
            by_file.len(),
            pluralize("file", by_file.len()),
        );
    }
}

fn print_row(row: &AnalysisRow) {
    println!("   {} {}: {}", "=".blue(), row.rule_id.yellow(), row.rule_label);
    for line in row.code_snippet.lines() {
        println!("   {}   {}", "|".blue(), line.dimmed());
    }
    if let Some(rec) = &row.recommendation {
        println!("   {} {} {rec}", "=".blue(), "FIX:".green());
    }
    if let Some(link) = &row.link {
        println!("   {} {} {link}", "=".blue(), "SEE:".cyan());
    }
}

fn print_annotations(outcome: &RunOutcome) {
    for node in outcome.nodes.iter().filter(|n| outcome.annotated.contains(n.path())) {
        for note in node.annotations() {
            println!(
                "{} {}: {}",
                "[!]".red().bold(),
                node.path().display(),
                note.message
            );
        }
    }
}

fn pluralize(word: &str, count: usize) -> String {
    match (word, count) {
        (_, 1) => word.to_string(),
        ("pass", _) => "passes".to_string(),
        _ => format!("{word}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plurals() {
        assert_eq!(pluralize("file", 1), "file");
        assert_eq!(pluralize("file", 2), "files");
        assert_eq!(pluralize("pass", 0), "passes");
    }
}
