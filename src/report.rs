use std::io::{self, Write};

use console::Style;
use serde::Serialize;

use crate::types::CheckResult;

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        Self {
            total: results.len(),
            failed: results.iter().filter(|r| !r.ok).count(),
        }
    }

    pub fn passed(&self) -> bool {
        self.failed == 0
    }

    /// 0 when every check passed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [CheckResult],
    failed: usize,
}

/// Write the human-readable report. Pure formatting, no probing.
pub fn write_report<W: Write>(out: &mut W, results: &[CheckResult]) -> io::Result<Summary> {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let yellow = Style::new().yellow();
    let summary = Summary::from_results(results);

    writeln!(out)?;
    for r in results {
        let marker = if r.ok {
            green.apply_to("PASS")
        } else {
            red.apply_to("FAIL")
        };
        match &r.details {
            Some(details) => writeln!(out, "  {marker} {}: {details}", r.name)?,
            None => writeln!(out, "  {marker} {}", r.name)?,
        }
        if let Some(fix) = &r.fix {
            let mut lines = fix.lines();
            if let Some(first) = lines.next() {
                writeln!(out, "       {} {first}", yellow.apply_to("fix:"))?;
            }
            for line in lines {
                writeln!(out, "            {line}")?;
            }
        }
    }
    writeln!(out)?;

    if summary.passed() {
        writeln!(
            out,
            "{}",
            green.apply_to(format!(
                "All {} checks passed. Your local telemetry pipeline looks healthy.",
                summary.total
            ))
        )?;
    } else {
        writeln!(out, "{}", red.apply_to(format!("{} check(s) failed.", summary.failed)))?;
    }

    Ok(summary)
}

/// Print the report to stdout.
pub fn print_report(results: &[CheckResult]) -> Summary {
    let mut stdout = io::stdout().lock();
    if let Err(e) = write_report(&mut stdout, results) {
        eprintln!("Error writing report: {e}");
    }
    Summary::from_results(results)
}

/// Print results as JSON.
pub fn print_json(results: &[CheckResult]) -> Summary {
    let summary = Summary::from_results(results);
    let report = JsonReport {
        results,
        failed: summary.failed,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing JSON: {e}"),
    }
    summary
}
