//! JSON output format for section statistics
//!
//! An array of objects, one per section in name order. Every key is
//! always present; numbers are never quoted or omitted.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::stats::SectionStats;

/// One exported section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSectionStats {
    #[serde(rename = "Section Name")]
    pub section_name: String,
    #[serde(rename = "Call Count")]
    pub call_count: u64,
    #[serde(rename = "Total Time")]
    pub total_time: f64,
    #[serde(rename = "Min Time")]
    pub min_time: f64,
    #[serde(rename = "Max Time")]
    pub max_time: f64,
    #[serde(rename = "Avg Time")]
    pub avg_time: f64,
    /// Empty when the last exit carried no call-site
    #[serde(rename = "File Name")]
    pub file_name: String,
    #[serde(rename = "Function Name")]
    pub function_name: String,
    #[serde(rename = "Line Number")]
    pub line_number: u32,
}

impl From<&SectionStats> for JsonSectionStats {
    fn from(stat: &SectionStats) -> Self {
        let site = stat.last_call_site.as_ref();
        Self {
            section_name: stat.name.to_string(),
            call_count: stat.count,
            total_time: stat.total_time,
            min_time: stat.min_time,
            max_time: stat.max_time,
            avg_time: stat.avg_time,
            file_name: site.map(|s| s.file.clone()).unwrap_or_default(),
            function_name: site.map(|s| s.function.clone()).unwrap_or_default(),
            line_number: site.map_or(0, |s| s.line),
        }
    }
}

/// JSON statistics output formatter
#[derive(Debug, Default)]
pub struct JsonStatsOutput {
    sections: Vec<JsonSectionStats>,
}

impl JsonStatsOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from statistics already in output order
    pub fn from_stats<'a>(stats: impl IntoIterator<Item = &'a SectionStats>) -> Self {
        Self {
            sections: stats.into_iter().map(JsonSectionStats::from).collect(),
        }
    }

    pub fn add_stat(&mut self, stat: &SectionStats) {
        self.sections.push(stat.into());
    }

    pub fn sections(&self) -> &[JsonSectionStats] {
        &self.sections
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.sections)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::{CallSite, SectionName};

    fn stat(name: &str) -> SectionStats {
        SectionStats {
            name: SectionName::from(name),
            count: 3,
            total_time: 0.1 + 0.2,
            min_time: 0.0,
            max_time: 0.2,
            avg_time: (0.1 + 0.2) / 3.0,
            last_call_site: None,
        }
    }

    #[test]
    fn test_empty_output_is_empty_array() {
        let json = JsonStatsOutput::new().to_json().unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[test]
    fn test_all_keys_present_even_when_zero() {
        let mut output = JsonStatsOutput::new();
        output.add_stat(&stat("X"));
        let json = output.to_json().unwrap();

        assert!(json.contains("\"Section Name\": \"X\""));
        assert!(json.contains("\"Call Count\": 3"));
        assert!(json.contains("\"Min Time\": 0.0"));
        assert!(json.contains("\"File Name\": \"\""));
        assert!(json.contains("\"Function Name\": \"\""));
        assert!(!json.contains("null"));
        assert!(json.contains("\"Line Number\": 0"));
    }

    #[test]
    fn test_call_site_fields() {
        let mut s = stat("X");
        s.last_call_site = Some(CallSite::new(99, "src/lib.rs", "compute"));
        let record = JsonSectionStats::from(&s);
        assert_eq!(record.file_name, "src/lib.rs");
        assert_eq!(record.function_name, "compute");
        assert_eq!(record.line_number, 99);
    }

    #[test]
    fn test_parse_back_reproduces_numbers() {
        let s = stat("X");
        let json = JsonStatsOutput::from_stats([&s]).to_json().unwrap();
        let parsed: Vec<JsonSectionStats> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].total_time.to_bits(), s.total_time.to_bits());
        assert_eq!(parsed[0].avg_time.to_bits(), s.avg_time.to_bits());
    }

    #[test]
    fn test_names_with_quotes_are_escaped() {
        let json = JsonStatsOutput::from_stats([&stat("say \"hi\"")]).to_json().unwrap();
        let parsed: Vec<JsonSectionStats> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].section_name, "say \"hi\"");
    }
}
