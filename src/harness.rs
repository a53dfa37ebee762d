use crate::document::DocumentSource;
use crate::model::{FieldKey, FieldMap};
use crate::pipeline::{ArticleParser, ParseMode};
use crate::sanitize::sanitize;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FieldCoverage {
    pub field: FieldKey,
    pub matched_locator: Option<usize>,
    pub resolved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarnessReport {
    pub page_accepted: bool,
    pub rejection: Option<String>,
    pub full: Vec<FieldCoverage>,
    pub refresh: Vec<FieldCoverage>,
    pub full_resolved: usize,
    pub refresh_resolved: usize,
    pub status_sanitize_stable: Option<bool>,
}

pub fn run_harness(parser: &ArticleParser, markup: &str, source_url: &str) -> Result<HarnessReport> {
    let doc = DocumentSource::parse(markup);
    let rejection = parser.check_page(&doc, None).err().map(|err| err.to_string());

    let full_fields = parser.extract_fields(&doc, source_url, ParseMode::Full);
    let refresh_fields = parser.extract_fields(&doc, source_url, ParseMode::Refresh);

    let full = coverage(parser, ParseMode::Full, &full_fields);
    let refresh = coverage(parser, ParseMode::Refresh, &refresh_fields);

    let status_sanitize_stable = full_fields
        .text(FieldKey::AuctionState)
        .map(|markup| sanitize(&markup) == markup);

    Ok(HarnessReport {
        page_accepted: rejection.is_none(),
        rejection,
        full_resolved: full.iter().filter(|c| c.resolved).count(),
        refresh_resolved: refresh.iter().filter(|c| c.resolved).count(),
        full,
        refresh,
        status_sanitize_stable,
    })
}

fn coverage(parser: &ArticleParser, mode: ParseMode, fields: &FieldMap) -> Vec<FieldCoverage> {
    parser
        .spec(mode)
        .keys()
        .map(|field| FieldCoverage {
            field,
            matched_locator: fields.matched_locator(field),
            resolved: fields.contains(field),
        })
        .collect()
}
