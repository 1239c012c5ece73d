/// Task list ingestion
///
/// Reads a maintenance task list exported as CSV into `TaskRecord`s. Header
/// spellings vary between planning systems, so each header is matched
/// against a table of known variants for the canonical columns; explicit
/// overrides from the `[columns]` config section take precedence.
///
/// Quoted fields (including embedded commas and doubled quotes) are
/// supported; fields spanning several lines are not.

use std::collections::BTreeMap;
use std::path::Path;

use crate::ingest::ata::extract_ata;
use crate::logging::{self, Stage};
use crate::model::{AnalysisError, TaskRecord};
use crate::normalize::parse_numeric;

// ============================================================================
// Column Registry
// ============================================================================

pub const COL_TASK: &str = "TASK";
pub const COL_TITLE: &str = "TITLE";
pub const COL_FH: &str = "FH";
pub const COL_CY: &str = "CY";
pub const COL_CAL: &str = "CAL";
pub const COL_CODE: &str = "CODE";
pub const COL_INT_THRES: &str = "INT_THRES";

/// Known header spellings for one canonical column.
pub struct ColumnVariants {
    pub canonical: &'static str,
    /// Upper-case spellings; headers are compared case-insensitively.
    pub variants: &'static [&'static str],
}

pub static COLUMN_REGISTRY: &[ColumnVariants] = &[
    ColumnVariants {
        canonical: COL_TASK,
        variants: &["TASK", "TASK NUMBER", "TASK_NUMBER", "TASK NO"],
    },
    ColumnVariants {
        canonical: COL_TITLE,
        variants: &["TITLE", "NAME", "DESC", "DESCRIPTION"],
    },
    ColumnVariants {
        canonical: COL_FH,
        variants: &["FH", "FLIGHT HOURS", "FLIGHT_HOURS", "HOURS"],
    },
    ColumnVariants {
        canonical: COL_CY,
        variants: &["CY", "FC", "CYCLES", "FLIGHT CYCLES"],
    },
    ColumnVariants {
        canonical: COL_CAL,
        variants: &["CAL", "MONTH", "MO", "CALENDAR"],
    },
    ColumnVariants {
        canonical: COL_CODE,
        variants: &["CODE", "UNIT", "CAL UNIT", "CAL_CODE"],
    },
    ColumnVariants {
        canonical: COL_INT_THRES,
        variants: &["INT/THRES", "INT_THRES", "INT-THRES", "INT\\THRES", "THRESHOLD"],
    },
];

/// Canonical column a header belongs to, if any.
pub fn canonical_column(header: &str) -> Option<&'static str> {
    let upper = header.trim().to_uppercase();
    COLUMN_REGISTRY
        .iter()
        .find(|c| c.variants.contains(&upper.as_str()))
        .map(|c| c.canonical)
}

/// Position of each canonical column in a header row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnMap {
    indices: BTreeMap<&'static str, usize>,
}

impl ColumnMap {
    /// Resolves canonical columns against `headers`.
    ///
    /// `overrides` maps a canonical name (any case) to an exact header. An
    /// override naming a header that is not present falls back to variant
    /// matching. Columns that cannot be found are simply absent.
    pub fn resolve(headers: &[String], overrides: &BTreeMap<String, String>) -> Self {
        let mut indices = BTreeMap::new();

        for column in COLUMN_REGISTRY {
            let overridden = overrides
                .iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(column.canonical))
                .map(|(_, header)| header.trim());

            let by_override = overridden.and_then(|wanted| headers.iter().position(|h| h.trim() == wanted));
            if let (Some(wanted), None) = (overridden, by_override) {
                logging::warn(
                    Stage::Ingest,
                    None,
                    &format!("Column override {} = '{}' not found in header", column.canonical, wanted),
                );
            }

            let index = by_override
                .or_else(|| headers.iter().position(|h| canonical_column(h) == Some(column.canonical)));
            if let Some(index) = index {
                indices.insert(column.canonical, index);
            }
        }

        ColumnMap { indices }
    }

    pub fn index_of(&self, canonical: &str) -> Option<usize> {
        self.indices.get(canonical).copied()
    }

    /// Canonical columns that could not be located.
    pub fn missing(&self) -> Vec<&'static str> {
        COLUMN_REGISTRY
            .iter()
            .map(|c| c.canonical)
            .filter(|c| !self.indices.contains_key(c))
            .collect()
    }
}

// ============================================================================
// CSV Parsing
// ============================================================================

/// Splits one CSV line into untrimmed fields, honouring quotes.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

fn cell<'a>(fields: &'a [String], index: Option<usize>) -> Option<&'a str> {
    index
        .and_then(|i| fields.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Parses CSV text into task records, one per non-blank data row.
///
/// Numbers go through the best-effort parse; the ATA chapter is extracted
/// from the task identifier. Rows without a TASK value get a positional
/// identifier (`row-N`, 1-based over data rows) and no ATA chapter.
pub fn parse_task_list(
    text: &str,
    overrides: &BTreeMap<String, String>,
) -> Result<Vec<TaskRecord>, AnalysisError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| AnalysisError::MalformedInput("no header row".to_string()))?;
    let headers = split_csv_line(header_line);
    let columns = ColumnMap::resolve(&headers, overrides);

    let missing = columns.missing();
    if !missing.is_empty() {
        logging::warn(
            Stage::Ingest,
            None,
            &format!("Columns not found, treated as empty: {}", missing.join(", ")),
        );
    }

    let idx = |name: &str| columns.index_of(name);
    let records: Vec<TaskRecord> = lines
        .enumerate()
        .map(|(row, line)| {
            let fields = split_csv_line(line);
            let raw_id = cell(&fields, idx(COL_TASK));
            let ata = raw_id.and_then(extract_ata);
            let task_id = raw_id
                .map(String::from)
                .unwrap_or_else(|| format!("row-{}", row + 1));
            TaskRecord {
                ata,
                title: cell(&fields, idx(COL_TITLE)).unwrap_or_default().to_string(),
                fh: cell(&fields, idx(COL_FH)).and_then(parse_numeric),
                cy: cell(&fields, idx(COL_CY)).and_then(parse_numeric),
                cal: cell(&fields, idx(COL_CAL)).and_then(parse_numeric),
                cal_code: cell(&fields, idx(COL_CODE)).map(String::from),
                interval_threshold: cell(&fields, idx(COL_INT_THRES)).map(String::from),
                task_id,
            }
        })
        .collect();

    logging::info(
        Stage::Ingest,
        None,
        &format!("Read {} task rows ({} header columns)", records.len(), headers.len()),
    );
    Ok(records)
}

/// Reads a CSV task list from disk.
pub fn load_task_list(
    path: &Path,
    overrides: &BTreeMap<String, String>,
) -> Result<Vec<TaskRecord>, AnalysisError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(AnalysisError::MalformedInput(format!(
            "{}: only CSV task lists are supported",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
    parse_task_list(&text, overrides)
}

// ============================================================================
// Tests
// ============================================================================
