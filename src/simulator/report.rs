//! Simulation report generation.

use std::collections::BTreeMap;

use serde::Serialize;

/// Statistics for a single simulated walker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub steps: u64,
    pub final_area: u32,
    pub final_level: u32,
    pub battles: u64,
    pub victories: u64,
    pub defeats: u64,
    pub inconclusive: u64,
    pub bosses_defeated: u64,
    pub item_boxes: u64,
    pub items_equipped: u64,
    pub experience: u64,
}

/// Aggregated results from multiple simulated walkers.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,

    pub avg_final_area: f64,
    pub avg_final_level: f64,
    pub avg_battles: f64,
    pub win_rate: f64,
    pub stalemate_rate: f64,
    pub avg_bosses_defeated: f64,
    pub avg_item_boxes: f64,
    pub avg_items_equipped: f64,

    /// Runs finishing in each area
    pub area_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn mean(runs: &[RunStats], f: impl Fn(&RunStats) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(f).sum::<f64>() / runs.len() as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let battles: u64 = runs.iter().map(|r| r.battles).sum();
        let rate = |count: u64| {
            if battles == 0 {
                0.0
            } else {
                count as f64 / battles as f64
            }
        };

        let mut area_distribution = BTreeMap::new();
        for run in &runs {
            *area_distribution.entry(run.final_area).or_insert(0) += 1;
        }

        Self {
            num_runs: runs.len() as u32,
            avg_final_area: mean(&runs, |r| r.final_area as f64),
            avg_final_level: mean(&runs, |r| r.final_level as f64),
            avg_battles: mean(&runs, |r| r.battles as f64),
            win_rate: rate(runs.iter().map(|r| r.victories).sum()),
            stalemate_rate: rate(runs.iter().map(|r| r.inconclusive).sum()),
            avg_bosses_defeated: mean(&runs, |r| r.bosses_defeated as f64),
            avg_item_boxes: mean(&runs, |r| r.item_boxes as f64),
            avg_items_equipped: mean(&runs, |r| r.items_equipped as f64),
            area_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    WALK SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Runs: {}\n\n", self.num_runs));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Area:      {:.1}\n", self.avg_final_area));
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Battles:         {:.0}\n", self.avg_battles));
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate * 100.0));
        report.push_str(&format!(
            "  Stalemates:          {:.2}%\n",
            self.stalemate_rate * 100.0
        ));
        report.push_str(&format!(
            "  Avg Bosses Beaten:   {:.2}\n\n",
            self.avg_bosses_defeated
        ));

        report.push_str("── LOOT ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Item Boxes:      {:.1}\n", self.avg_item_boxes));
        report.push_str(&format!(
            "  Avg Items Equipped:  {:.1}\n\n",
            self.avg_items_equipped
        ));

        report.push_str("── FINAL AREA ───────────────────────────────────────────────────\n");
        for (area, count) in &self.area_distribution {
            let pct = if self.num_runs == 0 {
                0.0
            } else {
                (*count as f64 / self.num_runs as f64) * 100.0
            };
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Area {:2}: {:>5.1}% {}\n", area, pct, bar));
        }

        if self.win_rate < 0.5 {
            report.push_str("\n  ⚠️  Walkers lose most battles - monster scaling too steep?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
