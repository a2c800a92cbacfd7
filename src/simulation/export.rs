//! Export a run report to JSON and plain text

use std::fs::File;
use std::io::Write;

use crate::error::SimResult;
use crate::simulation::report::{age_histogram, RunReport};

/// Write the full report as pretty-printed JSON
pub fn export_report(report: &RunReport, path: &str) -> SimResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Generate a text summary of a finished run
pub fn generate_summary(report: &RunReport, seed: u64) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("=== Population Simulation Summary (Seed: {}) ===\n", seed));
    summary.push_str(&format!("Duration: {} years\n\n", report.years.len()));

    summary.push_str("--- Population ---\n");
    let initial = report.years.first().map(|y| y.population).unwrap_or(0);
    summary.push_str(&format!(
        "Size: {} initial, {} final, {} peak\n",
        initial,
        report.final_size(),
        report.peak_population()
    ));
    summary.push_str(&format!(
        "Flows: {} births, {} deaths, {} immigrants\n",
        report.total_births(),
        report.total_deaths(),
        report.total_immigrants()
    ));
    if let Some(last) = report.years.last() {
        summary.push_str(&format!(
            "Last snapshot: {} urban, {} rural\n",
            last.urban, last.rural
        ));
    }
    summary.push_str(&format!(
        "Dependency ratio: {:.3} | Mean education: {:.3}\n",
        report.final_dependency_ratio(),
        report.final_mean_education()
    ));
    match report.mean_childbearing_age() {
        Some(age) => summary.push_str(&format!("Mean parental age at birth: {:.1}\n", age)),
        None => summary.push_str("No births recorded\n"),
    }

    summary.push_str("\n--- Final Age Distribution ---\n");
    summary.push_str(&render_histogram(&report.final_ages, 10, 40));

    summary
}

/// ASCII bar chart of an age list
pub fn render_histogram(ages: &[u32], bins: usize, bar_width: usize) -> String {
    let histogram = age_histogram(ages, bins);
    let max_count = histogram.iter().map(|b| b.count).max().unwrap_or(0);

    let mut out = String::new();
    for bin in &histogram {
        let bar_len = if max_count == 0 { 0 } else { bin.count * bar_width / max_count };
        out.push_str(&format!(
            "  {:>5.1}-{:<5.1} | {:<width$} {}\n",
            bin.start,
            bin.end,
            "#".repeat(bar_len),
            bin.count,
            width = bar_width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::params::SimulationParams;
    use crate::simulation::simulation::run_simulation;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_report() -> RunReport {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        run_simulation(&SimulationParams::fast_test(), &[], &mut rng).unwrap()
    }

    #[test]
    fn test_summary_mentions_key_figures() {
        let report = small_report();
        let summary = generate_summary(&report, 12);
        assert!(summary.contains("Seed: 12"));
        assert!(summary.contains("Duration: 10 years"));
        assert!(summary.contains(&format!("{} final", report.final_size())));
        assert!(summary.contains("Final Age Distribution"));
    }

    #[test]
    fn test_histogram_rendering() {
        let rendered = render_histogram(&[1, 1, 1, 9], 2, 6);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("###### 3"));
        assert!(lines[1].contains("## "));
        assert!(render_histogram(&[], 4, 10).is_empty());
    }

    #[test]
    fn test_export_report_writes_json() {
        let report = small_report();
        let path = std::env::temp_dir().join("population_simulator_export_test.json");
        let path_str = path.to_string_lossy().to_string();

        export_report(&report, &path_str).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: RunReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.pop_sizes(), report.pop_sizes());
        std::fs::remove_file(&path).ok();
    }
}
