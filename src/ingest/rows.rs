//! CSV row reading, per-player selection and metric extraction.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use super::mapping::{Aggregate, MappingConfig, MetricMapping, RowSelect, SourceFormat, SourceMapping, Transform};
use super::IngestError;

/// One CSV record keyed by header name.
pub type Row = HashMap<String, String>;

/// Rows kept for one player and the newest timestamp among them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRows {
    pub timestamp: Option<NaiveDateTime>,
    pub rows: Vec<Row>,
}

/// A metric read from the kept rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValue {
    pub value: Option<f64>,
    /// Signed value before an `abs` transform
    pub raw: Option<f64>,
}

/// Read a source CSV into header-keyed rows.
///
/// A UTF-8 BOM is ignored and `header_skip` lines are dropped before the
/// header row.
pub fn read_rows(source: &SourceMapping) -> Result<Vec<Row>, IngestError> {
    let contents = std::fs::read_to_string(&source.path)?;
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
    let data: String = contents
        .split_inclusive('\n')
        .skip(source.header_skip)
        .collect();
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(source.delimiter_byte()?)
        .flexible(true)
        .from_reader(data.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }

    debug!("Read {} rows from {:?}", rows.len(), source.path);
    Ok(rows)
}

/// Parse a numeric cell. Empty cells and `N/A` are missing; thousands
/// separators are ignored.
pub fn parse_value(cell: &str) -> Option<f64> {
    let v = cell.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("N/A") {
        return None;
    }
    v.replace(',', "").parse().ok()
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(v) {
        return Some(ts.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_us_date(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => {
            NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%m/%d/%Y %H:%M:%S").ok()
        }
        None => NaiveDateTime::parse_from_str(date, "%m/%d/%Y %H:%M:%S")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(date, "%m/%d/%Y")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
    }
}

/// Timestamp of a row according to the source's export format.
pub fn row_timestamp(source: &SourceMapping, row: &Row) -> Option<NaiveDateTime> {
    let date = row.get(source.date_field.as_deref()?)?;
    match source.format? {
        SourceFormat::Photon => parse_iso(date),
        SourceFormat::Hawkin => {
            let time = source
                .time_field
                .as_deref()
                .and_then(|f| row.get(f))
                .map(String::as_str);
            parse_us_date(date, time)
        }
    }
}

/// Group rows by canonical player name.
///
/// Rows are ordered newest first for the `latest` selection (rows without
/// a timestamp count as oldest); otherwise every row is kept in file
/// order.
pub fn select_rows(rows: Vec<Row>, source: &SourceMapping, mapping: &MappingConfig) -> BTreeMap<String, PlayerRows> {
    let mut grouped: BTreeMap<String, Vec<(Option<NaiveDateTime>, Row)>> = BTreeMap::new();
    for row in rows {
        let name = match row.get(&source.player_field).map(|n| n.trim()) {
            Some(n) if !n.is_empty() => mapping.canonical_name(n),
            _ => continue,
        };
        let timestamp = row_timestamp(source, &row);
        grouped.entry(name).or_default().push((timestamp, row));
    }

    grouped
        .into_iter()
        .map(|(name, mut items)| {
            let timestamp = items.iter().map(|(ts, _)| *ts).max().flatten();
            let rows = match source.row_select {
                Some(RowSelect::Latest) => {
                    items.sort_by(|a, b| b.0.cmp(&a.0));
                    items.into_iter().take(1).map(|(_, row)| row).collect()
                }
                None => items.into_iter().map(|(_, row)| row).collect(),
            };
            (name, PlayerRows { timestamp, rows })
        })
        .collect()
}

fn read_metric(row: &Row, metric: &MetricMapping) -> MetricValue {
    let signed = row.get(&metric.column).and_then(|c| parse_value(c));
    match metric.transform {
        Some(Transform::Abs) => MetricValue {
            value: signed.map(f64::abs),
            raw: signed,
        },
        None => MetricValue {
            value: signed,
            raw: None,
        },
    }
}

/// Metrics from the first kept row.
pub fn extract_metrics(rows: &[Row], metrics: &BTreeMap<String, MetricMapping>) -> BTreeMap<String, MetricValue> {
    metrics
        .iter()
        .map(|(id, metric)| {
            let value = rows.first().map(|row| read_metric(row, metric)).unwrap_or_default();
            (id.clone(), value)
        })
        .collect()
}

/// Pick the row whose value wins under `min` / `max`, keeping its signed raw.
fn pick_extreme(read: &[MetricValue], aggregate: Aggregate) -> MetricValue {
    let mut best: Option<(f64, MetricValue)> = None;
    for m in read {
        let Some(v) = m.value else { continue };
        let better = match (best, aggregate) {
            (None, _) => true,
            (Some((b, _)), Aggregate::Min) => v < b,
            (Some((b, _)), _) => v > b,
        };
        if better {
            best = Some((v, *m));
        }
    }
    best.map(|(_, m)| m).unwrap_or_default()
}

/// Metrics combined across every kept row, ignoring missing cells.
///
/// `min` and `max` take the winning row whole, so an `abs` metric keeps the
/// sign of the row it came from. `avg` averages the signed values on their
/// own; the sign of `raw` then only tells which side dominated on balance.
pub fn aggregate_metrics(
    rows: &[Row],
    metrics: &BTreeMap<String, MetricMapping>,
    aggregate: Aggregate,
) -> BTreeMap<String, MetricValue> {
    metrics
        .iter()
        .map(|(id, metric)| {
            let read: Vec<MetricValue> = rows.iter().map(|row| read_metric(row, metric)).collect();
            let value = match aggregate {
                Aggregate::Min | Aggregate::Max => pick_extreme(&read, aggregate),
                Aggregate::Avg | Aggregate::Other => {
                    let values: Vec<f64> = read.iter().filter_map(|m| m.value).collect();
                    let raws: Vec<f64> = read.iter().filter_map(|m| m.raw).collect();
                    MetricValue {
                        value: aggregate.apply(&values),
                        raw: aggregate.apply(&raws),
                    }
                }
            };
            (id.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn source(path: PathBuf) -> SourceMapping {
        serde_json::from_value(serde_json::json!({
            "path": path,
            "player_field": "Name",
            "date_field": "Date",
            "time_field": "Time",
            "format": "hawkin",
            "metrics": {
                "jump_height": { "column": "Jump Height", "unit": "cm" },
                "lr_peak_braking_force": { "column": "L|R Braking", "transform": "abs" }
            }
        }))
        .unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 41.2 "), Some(41.2));
        assert_eq!(parse_value("1,234.5"), Some(1234.5));
        assert_eq!(parse_value("N/A"), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("fast"), None);
    }

    #[test]
    fn test_read_rows_with_bom_and_header_skip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "\u{feff}Exported by device\nName,Jump Height\nKaito Sato,41.2\n\nRen Ito,38.0\n"
        )
        .unwrap();
        let mut src = source(file.path().to_path_buf());
        src.header_skip = 1;

        let rows = read_rows(&src).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "Kaito Sato");
        assert_eq!(rows[1]["Jump Height"], "38.0");
    }

    #[test]
    fn test_read_rows_semicolon_delimiter() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Name;Jump Height\nKaito Sato;41,2\n").unwrap();
        let mut src = source(file.path().to_path_buf());
        src.delimiter = ";".to_string();

        let rows = read_rows(&src).unwrap();
        assert_eq!(rows[0]["Jump Height"], "41,2");
    }

    #[test]
    fn test_hawkin_timestamps() {
        let src = source(PathBuf::from("unused.csv"));
        let with_time = row(&[("Date", "04/12/2025"), ("Time", "09:30:00")]);
        let date_only = row(&[("Date", "04/12/2025")]);

        let expected = NaiveDate::from_ymd_opt(2025, 4, 12).unwrap();
        assert_eq!(
            row_timestamp(&src, &with_time),
            expected.and_hms_opt(9, 30, 0)
        );
        assert_eq!(row_timestamp(&src, &date_only), expected.and_hms_opt(0, 0, 0));
        assert_eq!(row_timestamp(&src, &row(&[("Date", "2025-04-12")])), None);
    }

    #[test]
    fn test_photon_timestamps() {
        assert_eq!(
            parse_iso("2025-04-12T09:30:00"),
            NaiveDate::from_ymd_opt(2025, 4, 12).unwrap().and_hms_opt(9, 30, 0)
        );
        assert_eq!(
            parse_iso("2025-04-12T09:30:00+09:00"),
            NaiveDate::from_ymd_opt(2025, 4, 12).unwrap().and_hms_opt(9, 30, 0)
        );
        assert!(parse_iso("12/04/2025").is_none());
    }

    #[test]
    fn test_select_latest_row_with_alias() {
        let mut src = source(PathBuf::from("unused.csv"));
        src.row_select = Some(RowSelect::Latest);
        let mapping: MappingConfig = serde_json::from_value(serde_json::json!({
            "name_aliases": { "K. Sato": "Kaito Sato" }
        }))
        .unwrap();

        let rows = vec![
            row(&[("Name", "Kaito Sato"), ("Date", "03/01/2025"), ("Jump Height", "39")]),
            row(&[("Name", "K. Sato"), ("Date", "04/12/2025"), ("Jump Height", "41")]),
            row(&[("Name", ""), ("Date", "04/12/2025"), ("Jump Height", "50")]),
        ];
        let selected = select_rows(rows, &src, &mapping);

        assert_eq!(selected.len(), 1);
        let kaito = &selected["Kaito Sato"];
        assert_eq!(kaito.rows.len(), 1);
        assert_eq!(kaito.rows[0]["Jump Height"], "41");
        assert_eq!(
            kaito.timestamp,
            NaiveDate::from_ymd_opt(2025, 4, 12).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_select_all_rows_keeps_file_order() {
        let src = source(PathBuf::from("unused.csv"));
        let mapping: MappingConfig = serde_json::from_str("{}").unwrap();
        let rows = vec![
            row(&[("Name", "Ren Ito"), ("Date", "03/01/2025"), ("Jump Height", "1")]),
            row(&[("Name", "Ren Ito"), ("Date", "04/01/2025"), ("Jump Height", "2")]),
        ];
        let selected = select_rows(rows, &src, &mapping);
        let heights: Vec<_> = selected["Ren Ito"].rows.iter().map(|r| r["Jump Height"].as_str()).collect();
        assert_eq!(heights, vec!["1", "2"]);
    }

    #[test]
    fn test_extract_and_aggregate() {
        let src = source(PathBuf::from("unused.csv"));
        let rows = vec![
            row(&[("Jump Height", "40"), ("L|R Braking", "-4.0")]),
            row(&[("Jump Height", "N/A"), ("L|R Braking", "2.0")]),
            row(&[("Jump Height", "44"), ("L|R Braking", "")]),
        ];

        let first = extract_metrics(&rows, &src.metrics);
        assert_eq!(first["jump_height"].value, Some(40.0));
        assert_eq!(first["lr_peak_braking_force"].value, Some(4.0));
        assert_eq!(first["lr_peak_braking_force"].raw, Some(-4.0));

        let avg = aggregate_metrics(&rows, &src.metrics, Aggregate::Avg);
        assert_eq!(avg["jump_height"].value, Some(42.0));
        assert_eq!(avg["lr_peak_braking_force"].value, Some(3.0));
        assert_eq!(avg["lr_peak_braking_force"].raw, Some(-1.0));

        let max = aggregate_metrics(&rows, &src.metrics, Aggregate::Max);
        assert_eq!(max["jump_height"].value, Some(44.0));
        assert_eq!(max["jump_height"].raw, None);

        let empty = extract_metrics(&[], &src.metrics);
        assert_eq!(empty["jump_height"], MetricValue::default());
    }

    #[test]
    fn test_min_max_keep_sign_of_winning_row() {
        let src = source(PathBuf::from("unused.csv"));
        let rows = vec![
            row(&[("L|R Braking", "-4.0")]),
            row(&[("L|R Braking", "2.0")]),
        ];

        let min = aggregate_metrics(&rows, &src.metrics, Aggregate::Min);
        let lr = min["lr_peak_braking_force"];
        assert_eq!(lr.value, Some(2.0));
        assert_eq!(lr.raw, Some(2.0));
        assert_eq!(lr.raw.map(f64::abs), lr.value);

        let max = aggregate_metrics(&rows, &src.metrics, Aggregate::Max);
        let lr = max["lr_peak_braking_force"];
        assert_eq!(lr.value, Some(4.0));
        assert_eq!(lr.raw, Some(-4.0));
    }
}
