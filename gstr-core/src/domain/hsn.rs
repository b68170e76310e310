//! Classification code (HSN/SAC) hierarchy lookup

use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::Serialize;

use super::hsn_data::{self, CodeEntry};

/// Codes with this prefix are services (SAC), not goods (HSN)
pub const SERVICE_PREFIX: &str = "99";

/// Granularity a code matched at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CodeLevel {
    Chapter,
    Heading,
    SubHeading,
    TariffItem,
    ServiceGroup,
    Service,
}

/// Result of a lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMatch {
    pub code: String,
    pub level: CodeLevel,
    pub description: String,
    pub suggested_rate: Option<Decimal>,
}

type Table = HashMap<&'static str, &'static CodeEntry>;

fn index(entries: &'static [CodeEntry]) -> Table {
    entries.iter().map(|entry| (entry.code, entry)).collect()
}

/// True for SAC (service) codes
pub fn is_service_code(code: &str) -> bool {
    code.trim().starts_with(SERVICE_PREFIX)
}

/// Cascading lookup over the goods and services hierarchies
#[derive(Debug)]
pub struct CodeHierarchy {
    chapters: Table,
    headings: Table,
    sub_headings: Table,
    tariff_items: Table,
    service_groups: Table,
    services: Table,
}

static BUILTIN: LazyLock<CodeHierarchy> = LazyLock::new(|| CodeHierarchy {
    chapters: index(hsn_data::CHAPTERS),
    headings: index(hsn_data::HEADINGS),
    sub_headings: index(hsn_data::SUB_HEADINGS),
    tariff_items: index(hsn_data::TARIFF_ITEMS),
    service_groups: index(hsn_data::SERVICE_GROUPS),
    services: index(hsn_data::SERVICES),
});

impl CodeHierarchy {
    /// The built-in reference tables
    pub fn builtin() -> &'static CodeHierarchy {
        &BUILTIN
    }

    /// Levels to try for a code, most specific first
    fn levels(&self, code: &str) -> Vec<(usize, CodeLevel, &Table)> {
        if is_service_code(code) {
            vec![
                (6, CodeLevel::Service, &self.services),
                (4, CodeLevel::ServiceGroup, &self.service_groups),
            ]
        } else {
            vec![
                (8, CodeLevel::TariffItem, &self.tariff_items),
                (6, CodeLevel::SubHeading, &self.sub_headings),
                (4, CodeLevel::Heading, &self.headings),
                (2, CodeLevel::Chapter, &self.chapters),
            ]
        }
    }

    /// Most specific known entry for a code: 8, then 6, 4, 2 digits
    pub fn lookup(&self, code: &str) -> Option<CodeMatch> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        self.levels(code)
            .into_iter()
            .filter(|(len, _, _)| *len <= code.len())
            .find_map(|(len, level, table)| {
                table.get(&code[..len]).map(|entry| CodeMatch {
                    code: entry.code.to_string(),
                    level,
                    description: entry.description.to_string(),
                    suggested_rate: entry.rate.map(|r| Decimal::new(r as i64, 2)),
                })
            })
    }

    /// Best description for a code
    ///
    /// An entry at the code's own length wins. Otherwise the ancestor levels
    /// that do exist are joined, broadest first.
    pub fn describe(&self, code: &str) -> Option<String> {
        let code = code.trim();
        let hit = self.lookup(code)?;
        if hit.code.len() == code.len() {
            return Some(hit.description);
        }

        let parts: Vec<&str> = self
            .levels(code)
            .into_iter()
            .rev()
            .filter(|(len, _, _)| *len <= code.len())
            .filter_map(|(len, _, table)| table.get(&code[..len]).map(|entry| entry.description))
            .collect();

        Some(parts.join(" > "))
    }

    /// Suggested rate from the most specific level carrying one
    pub fn suggested_rate(&self, code: &str) -> Option<Decimal> {
        let code = code.trim();
        if !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        self.levels(code)
            .into_iter()
            .filter(|(len, _, _)| *len <= code.len())
            .filter_map(|(len, _, table)| table.get(&code[..len]))
            .find_map(|entry| entry.rate.map(|r| Decimal::new(r as i64, 2)))
    }

    /// A code is valid when it is 2/4/6/8 digits and its top level exists.
    /// Deeper levels are not required.
    pub fn is_valid_code(&self, code: &str) -> bool {
        let code = code.trim();
        if !matches!(code.len(), 2 | 4 | 6 | 8) || !code.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        if is_service_code(code) {
            code.len() >= 4 && self.service_groups.contains_key(&code[..4])
        } else {
            self.chapters.contains_key(&code[..2])
        }
    }
}
