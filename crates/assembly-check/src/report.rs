//! Plain-text reports for build logs.

use std::fmt;

use crate::aggregate::AssemblyCheckResult;
use crate::pairwise::PairwiseAudit;

impl AssemblyCheckResult {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Assembly Interference Report ===\n\n");
        out.push_str(&format!("Stations: {}\n", self.stations));

        let subtotals = self.station_subtotals();
        for (i, subtotal) in subtotals.iter().enumerate() {
            let station = i + 1;
            out.push_str(&format!("\nTuner {station}: {subtotal:.4} mm³\n"));
            for check in self.checks.iter().filter(|c| c.station == station) {
                let verdict = check
                    .verdict
                    .map(|v| format!(" [{v}]"))
                    .unwrap_or_default();
                let note = if check.failed { " (query failed)" } else { "" };
                out.push_str(&format!(
                    "  {}: {:.4} mm³{}{}\n",
                    check.key(),
                    check.volume_mm3,
                    verdict,
                    note
                ));
            }
        }

        out.push_str(&format!(
            "\nTotal: {:.4} mm³ (threshold {:.4} mm³)\n",
            self.total_mm3, self.threshold_mm3
        ));
        let status = if self.passed() { "PASS" } else { "FAIL" };
        out.push_str(&format!("Status: {status}\n"));
        out
    }
}

impl fmt::Display for AssemblyCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl fmt::Display for PairwiseAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pairwise audit: {} pairs checked, {} skipped",
            self.pairs_checked, self.pairs_skipped
        )?;
        if self.findings.is_empty() {
            return writeln!(f, "Component intersections: none");
        }
        writeln!(f, "Component intersections:")?;
        for finding in &self.findings {
            write!(
                f,
                "  {} ∩ {} = {:.3} mm³",
                finding.first, finding.second, finding.volume_mm3
            )?;
            if finding.gear_mesh {
                write!(f, " (gear mesh limit {})", finding.limit_mm3)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
