use anyhow::Result;

use crate::output::json::to_json;
use crate::query::filter::parse_filter_json;
use crate::query::validate_search_filter;

/// Validate a raw filter and return its canonical JSON.
pub fn run(raw_filter: Option<&str>) -> Result<String> {
    let value = raw_filter.map(parse_filter_json).transpose()?;
    let filter = validate_search_filter(value.as_ref())?;
    Ok(to_json(&filter))
}
