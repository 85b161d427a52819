// Local prompt resolver: deterministically maps (prompt, dataset) to a chart
// specification. Pure, total, no environment access — this is the single
// shared implementation behind both the CLI and the suggest endpoint.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dataset::Dataset;
use crate::spec::{ChartSpec, ChartType};

lazy_static! {
    static ref LINE_KEYWORDS: Regex = Regex::new(r"\b(line|trend|over time)\b").unwrap();
    static ref BAR_KEYWORDS: Regex = Regex::new(r"\b(bar|bars|histogram|compare)\b").unwrap();
    static ref PIE_KEYWORDS: Regex = Regex::new(r"\b(pie|doughnut|proportion|share)\b").unwrap();
    static ref SCATTER_KEYWORDS: Regex = Regex::new(r"\b(scatter|correlat|relationship)\b").unwrap();
}

/// Resolve a free-text prompt against a dataset.
///
/// Never fails: every branch has a default, and an empty dataset returns the
/// fixed no-data specification. Column mentions are detected by
/// case-insensitive substring search, so a column name that happens to occur
/// inside another word will match; that is a known limitation of the
/// heuristic, kept deliberately.
pub fn resolve_prompt(prompt: &str, data: &Dataset) -> ChartSpec {
    if data.is_empty() || data.headers.is_empty() {
        return ChartSpec::no_data();
    }

    let p = prompt.to_lowercase();
    let chart_type = infer_chart_type(&p);
    let cols = data.column_set();

    // First mentioned column becomes x, later distinct mentions become y
    // (capped at 3), scanned in the dataset's column order.
    let mut x: Option<String> = None;
    let mut y: Vec<String> = Vec::new();
    for name in &cols.names {
        if p.contains(&name.to_lowercase()) {
            if x.is_none() {
                x = Some(name.clone());
            } else if y.len() < 3 && !y.contains(name) {
                y.push(name.clone());
            }
        }
    }

    let x = x.unwrap_or_else(|| cols.names[0].clone());

    if y.is_empty() {
        y = cols
            .names
            .iter()
            .zip(&cols.numeric_like)
            .filter(|(_, numeric)| **numeric)
            .map(|(name, _)| name.clone())
            .take(2)
            .collect();
        if y.is_empty() && cols.names.len() > 1 {
            y.push(cols.names[1].clone());
        }
    }

    let text = format!(
        "Suggested {} chart of \"{}\" vs \"{}\".",
        chart_type,
        y.join(", "),
        x
    );

    ChartSpec {
        chart_type: Some(chart_type),
        x: Some(x),
        y,
        text,
    }
}

/// Keyword families tested in fixed priority order; first match wins.
fn infer_chart_type(lowered_prompt: &str) -> ChartType {
    if LINE_KEYWORDS.is_match(lowered_prompt) {
        ChartType::Line
    } else if BAR_KEYWORDS.is_match(lowered_prompt) {
        ChartType::Bar
    } else if PIE_KEYWORDS.is_match(lowered_prompt) {
        ChartType::Pie
    } else if SCATTER_KEYWORDS.is_match(lowered_prompt) {
        ChartType::Scatter
    } else {
        ChartType::Bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_data(csv: &str) -> Dataset {
        Dataset::from_csv_str(csv, "test").unwrap()
    }

    #[test]
    fn test_totality_on_arbitrary_prompts() {
        let data = Dataset::sample().unwrap();
        for prompt in ["", "???", "draw me something nice", "sales", "x y z"] {
            let spec = resolve_prompt(prompt, &data);
            assert!(spec.chart_type.is_some(), "prompt {:?}", prompt);
            let x = spec.x.expect("x must be set for a non-empty dataset");
            assert!(data.headers.contains(&x));
            assert!(!spec.y.is_empty());
            assert!(!spec.text.is_empty());
        }
    }

    #[test]
    fn test_empty_dataset_returns_no_data_spec() {
        let data = Dataset::from_rows("empty", Vec::new());
        let spec = resolve_prompt("line chart of sales", &data);
        assert_eq!(spec.chart_type, None);
        assert_eq!(spec.x, None);
        assert!(spec.y.is_empty());
        assert!(!spec.text.is_empty());
    }

    #[test]
    fn test_keyword_priority_line_beats_bar() {
        let data = Dataset::sample().unwrap();
        let spec = resolve_prompt("show a line and bar chart", &data);
        assert_eq!(spec.chart_type, Some(ChartType::Line));
    }

    #[test]
    fn test_pie_family() {
        let data = Dataset::sample().unwrap();
        let spec = resolve_prompt("share of revenue by quarter", &data);
        assert_eq!(spec.chart_type, Some(ChartType::Pie));
    }

    #[test]
    fn test_unknown_keywords_default_to_bar() {
        let data = Dataset::sample().unwrap();
        let spec = resolve_prompt("chart it", &data);
        assert_eq!(spec.chart_type, Some(ChartType::Bar));
    }

    #[test]
    fn test_column_detection_in_column_order() {
        let data = make_data("Date,Sales,Region\n2024-01-01,120,North\n");
        let spec = resolve_prompt("compare sales by region", &data);
        assert_eq!(spec.chart_type, Some(ChartType::Bar));
        assert_eq!(spec.x.as_deref(), Some("Sales"));
        assert_eq!(spec.y, vec!["Region".to_string()]);
    }

    #[test]
    fn test_numeric_default_when_nothing_is_mentioned() {
        let data = make_data("Date,Sales,Region\n2024-01-01,120,North\n");
        let spec = resolve_prompt("chart it", &data);
        assert_eq!(spec.chart_type, Some(ChartType::Bar));
        assert_eq!(spec.x.as_deref(), Some("Date"));
        assert_eq!(spec.y, vec!["Sales".to_string()]);
        assert_eq!(spec.text, "Suggested bar chart of \"Sales\" vs \"Date\".");
    }

    #[test]
    fn test_second_column_default_when_nothing_is_numeric() {
        let data = make_data("City,Country\nParis,France\n");
        let spec = resolve_prompt("chart it", &data);
        assert_eq!(spec.x.as_deref(), Some("City"));
        assert_eq!(spec.y, vec!["Country".to_string()]);
    }

    #[test]
    fn test_y_mentions_capped_at_three() {
        let data = make_data("a1,b1,c1,d1,e1\n1,2,3,4,5\n");
        let spec = resolve_prompt("plot a1 b1 c1 d1 e1", &data);
        assert_eq!(spec.x.as_deref(), Some("a1"));
        assert_eq!(spec.y.len(), 3);
    }

    #[test]
    fn test_substring_matching_can_false_positive() {
        // "cat" occurs inside "concatenated" — accepted heuristic limitation.
        let data = make_data("cat,dog\n1,2\n");
        let spec = resolve_prompt("plot the concatenated totals", &data);
        assert_eq!(spec.x.as_deref(), Some("cat"));
    }
}
