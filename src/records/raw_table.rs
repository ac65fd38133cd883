//! Whitespace-delimited NDBC standard meteorological text, parsed into named
//! numeric columns.
//!
//! Depending on its vintage an archive has one header row (`YY MM DD hh ...`)
//! or two, the second carrying units (`#yr mo dy hr mn degT m/s ...`). The
//! header layout is resolved once into a [`RawSchema`].

use crate::records::error::RecordError;
use log::debug;

pub(crate) const YEAR_COLUMNS: [&str; 3] = ["YY", "#YY", "YYYY"];
pub(crate) const MONTH_COLUMN: &str = "MM";
pub(crate) const DAY_COLUMN: &str = "DD";
pub(crate) const HOUR_COLUMN: &str = "hh";
pub(crate) const MINUTE_COLUMN: &str = "mm";

/// Missing-value marker used by NDBC realtime files.
const MISSING_MARKER: &str = "MM";

/// How an archive lays out its header and date columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSchema {
    /// 1 for a names row only, 2 when a units row follows it.
    pub header_rows: usize,
    /// Which of `YY`, `#YY` or `YYYY` holds the year.
    pub year_column: String,
    pub has_hour: bool,
    pub has_minute: bool,
}

impl RawSchema {
    fn resolve(names: &[String], header_rows: usize) -> Result<Self, String> {
        let has = |name: &str| names.iter().any(|n| n == name);

        let year_column = YEAR_COLUMNS
            .iter()
            .find(|name| has(**name))
            .ok_or_else(|| "no year column (YY, #YY or YYYY)".to_string())?;
        for required in [MONTH_COLUMN, DAY_COLUMN] {
            if !has(required) {
                return Err(format!("no '{}' column", required));
            }
        }

        Ok(Self {
            header_rows,
            year_column: year_column.to_string(),
            has_hour: has(HOUR_COLUMN),
            has_minute: has(MINUTE_COLUMN),
        })
    }
}

/// A parsed station-year archive. Columns hold `None` where the file has the
/// `MM` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub(crate) station_id: String,
    pub(crate) year: i32,
    pub(crate) schema: RawSchema,
    pub(crate) names: Vec<String>,
    pub(crate) columns: Vec<Vec<Option<f64>>>,
    /// 1-based source line of every row.
    pub(crate) lines: Vec<usize>,
}

impl RawTable {
    pub fn parse(station_id: &str, year: i32, text: &str) -> Result<Self, RecordError> {
        let malformed = |line: usize, reason: String| RecordError::MalformedSource {
            station: station_id.to_string(),
            year,
            line,
            reason,
        };

        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
            .peekable();

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| malformed(1, "archive is empty".into()))?;
        let names: Vec<String> = header.split_whitespace().map(str::to_string).collect();

        // Only the line right after the names decides whether a units row is present.
        let units_row = lines
            .peek()
            .filter(|(_, line)| !is_data_line(line))
            .map(|(line_no, _)| *line_no);
        let header_rows = match units_row {
            Some(line_no) => {
                debug!(
                    "Skipping units row at line {} for station {} in {}",
                    line_no, station_id, year
                );
                lines.next();
                2
            }
            _ => 1,
        };
        let schema =
            RawSchema::resolve(&names, header_rows).map_err(|reason| malformed(header_line, reason))?;

        let mut columns = vec![Vec::new(); names.len()];
        let mut row_lines = Vec::new();
        for (line_no, line) in lines {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != names.len() {
                return Err(malformed(
                    line_no,
                    format!("expected {} fields, found {}", names.len(), tokens.len()),
                ));
            }
            for ((column, token), name) in columns.iter_mut().zip(tokens).zip(&names) {
                let value = parse_cell(token).ok_or_else(|| {
                    malformed(
                        line_no,
                        format!("non-numeric value '{}' in column '{}'", token, name),
                    )
                })?;
                column.push(value);
            }
            row_lines.push(line_no);
        }

        Ok(Self {
            station_id: station_id.to_string(),
            year,
            schema,
            names,
            columns,
            lines: row_lines,
        })
    }

    pub fn schema(&self) -> &RawSchema {
        &self.schema
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }
}

/// `Some(None)` for the missing marker, `None` when the token is not a number.
fn parse_cell(token: &str) -> Option<Option<f64>> {
    if token == MISSING_MARKER {
        return Some(None);
    }
    token.parse::<f64>().ok().map(Some)
}

fn is_data_line(line: &str) -> bool {
    line.split_whitespace().all(|token| parse_cell(token).is_some())
}
