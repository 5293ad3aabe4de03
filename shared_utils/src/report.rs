//! Result Aggregation and Summary Reporting
//!
//! A pure fold over the outcome collection into a `RunSummary`, plus the
//! terminal rendering of that summary.

use crate::conversion::ConversionOutcome;
use console::style;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// One failed conversion, retained for the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Terminal artifact of the pipeline. Built once after all tasks complete.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub failures: Vec<FailureEntry>,
}

impl RunSummary {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.successful as f64 / self.total as f64) * 100.0
        }
    }
}

/// Partition outcomes into successes and failures, preserving the failures'
/// order. No side effects.
pub fn summarize(outcomes: &[ConversionOutcome]) -> RunSummary {
    let mut successful = 0;
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            ConversionOutcome::Success { .. } => successful += 1,
            ConversionOutcome::Failure { source, reason } => failures.push(FailureEntry {
                path: source.clone(),
                reason: reason.clone(),
            }),
        }
    }

    RunSummary {
        total: outcomes.len(),
        successful,
        failed: failures.len(),
        failures,
    }
}

pub fn print_summary_report(summary: &RunSummary, duration: Duration) {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              📊 Conversion Summary Report            ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  📁 Files Processed:    {:>10}                   ║", summary.total);
    println!("║  ✅ Succeeded:          {:>10}                   ║", summary.successful);
    println!("║  ❌ Failed:             {:>10}                   ║", summary.failed);
    println!("║  📈 Success Rate:       {:>9.1}%                   ║", summary.success_rate());
    println!("║  ⏱️  Total Time:         {:>9.1}s                   ║", duration.as_secs_f64());
    println!("╚══════════════════════════════════════════════════════╝");

    if !summary.failures.is_empty() {
        println!();
        println!("{}", style("❌ Failures:").red().bold());
        for entry in &summary.failures {
            println!("   {} → {}", entry.path.display(), entry.reason);
        }
    }
}
