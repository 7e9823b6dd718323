use serde::{Deserialize, Serialize};

use analysis_core::{ConfidenceLevel, StockAnalysisRecord};

/// Narrows a ranked universe by classification and confidence.
///
/// Empty include lists accept everything. Matching is case-insensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UniverseFilter {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub exclude_countries: Vec<String>,
    #[serde(default)]
    pub cap_sizes: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub exclude_industries: Vec<String>,
    #[serde(default)]
    pub min_confidence: Option<ConfidenceLevel>,
}

fn contains(list: &[String], value: Option<&str>) -> bool {
    value.map_or(false, |v| list.iter().any(|item| item.eq_ignore_ascii_case(v)))
}

impl UniverseFilter {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
            && self.exclude_countries.is_empty()
            && self.cap_sizes.is_empty()
            && self.industries.is_empty()
            && self.exclude_industries.is_empty()
            && self.min_confidence.is_none()
    }

    pub fn matches(&self, record: &StockAnalysisRecord) -> bool {
        let country = record.country.as_deref();
        let industry = record.industry.as_deref();

        if !self.countries.is_empty() && !contains(&self.countries, country) {
            return false;
        }
        if contains(&self.exclude_countries, country) {
            return false;
        }
        if !self.cap_sizes.is_empty() && !contains(&self.cap_sizes, record.cap_size.as_deref()) {
            return false;
        }
        if !self.industries.is_empty() && !contains(&self.industries, industry) {
            return false;
        }
        if contains(&self.exclude_industries, industry) {
            return false;
        }
        if let Some(min) = self.min_confidence {
            if record.confidence_level < min {
                return false;
            }
        }
        true
    }
}
