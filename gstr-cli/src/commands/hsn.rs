//! HSN command - resolve a classification code

use anyhow::Result;
use colored::Colorize;
use gstr_core::domain::hsn::is_service_code;
use gstr_core::CodeHierarchy;
use serde::Serialize;

use crate::output;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeReport {
    code: String,
    valid: bool,
    service: bool,
    description: Option<String>,
    matched_level: Option<String>,
    suggested_rate: Option<String>,
}

pub fn run(code: &str, json: bool) -> Result<()> {
    let codes = CodeHierarchy::builtin();
    let code = code.trim();
    let hit = codes.lookup(code);

    let report = CodeReport {
        code: code.to_string(),
        valid: codes.is_valid_code(code),
        service: is_service_code(code),
        description: codes.describe(code),
        matched_level: hit.as_ref().map(|m| format!("{:?}", m.level)),
        suggested_rate: codes.suggested_rate(code).map(|r| r.normalize().to_string()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(description) = &report.description else {
        output::error(&format!("No entry for {}", code));
        return Ok(());
    };

    println!("{}  {}", report.code.bold(), description);
    let mut table = output::create_table();
    table.add_row(vec!["Type", if report.service { "Service (SAC)" } else { "Goods (HSN)" }]);
    table.add_row(vec!["Matched", report.matched_level.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Valid code", if report.valid { "yes" } else { "no" }]);
    table.add_row(vec![
        "Suggested rate",
        &report
            .suggested_rate
            .as_ref()
            .map(|r| format!("{}%", r))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    println!("{}", table);
    if !report.valid {
        output::info("Code length must be 2, 4, 6 or 8 digits with a known top level");
    }
    Ok(())
}
