//! CSV output format for section statistics
//!
//! One header row, then one row per section in name order. Numbers use
//! Rust's shortest round-trip float formatting.

use crate::stats::SectionStats;

/// Column headers, in row order
pub const CSV_HEADERS: [&str; 9] = [
    "Section Name",
    "Call Count",
    "Total Time",
    "Min Time",
    "Max Time",
    "Avg Time",
    "File Name",
    "Function Name",
    "Line Number",
];

/// CSV statistics output formatter
#[derive(Debug, Default)]
pub struct CsvStatsOutput {
    stats: Vec<SectionStats>,
}

impl CsvStatsOutput {
    pub fn new() -> Self {
        Self { stats: Vec::new() }
    }

    /// Build from statistics already in output order
    pub fn from_stats<'a>(stats: impl IntoIterator<Item = &'a SectionStats>) -> Self {
        Self {
            stats: stats.into_iter().cloned().collect(),
        }
    }

    pub fn add_stat(&mut self, stat: SectionStats) {
        self.stats.push(stat);
    }

    fn header() -> String {
        CSV_HEADERS.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_stat(stat: &SectionStats) -> String {
        let (file, function, line) = match stat.last_call_site {
            Some(ref site) => (site.file.as_str(), site.function.as_str(), site.line),
            None => ("", "", 0),
        };

        [
            Self::escape_field(stat.name.as_str()),
            stat.count.to_string(),
            stat.total_time.to_string(),
            stat.min_time.to_string(),
            stat.max_time.to_string(),
            stat.avg_time.to_string(),
            Self::escape_field(file),
            Self::escape_field(function),
            line.to_string(),
        ]
        .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&Self::header());
        output.push('\n');

        for stat in &self.stats {
            output.push_str(&Self::format_stat(stat));
            output.push('\n');
        }

        output
    }
}
