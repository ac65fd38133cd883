use crate::records::error::RecordError;
use crate::records::raw_table::{
    RawTable, DAY_COLUMN, HOUR_COLUMN, MINUTE_COLUMN, MONTH_COLUMN, YEAR_COLUMNS,
};
use crate::types::cadence::Cadence;
use crate::types::observation::{Variables, YearObservationBatch};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

/// Values NDBC writes in place of a missing measurement.
const SENTINELS: [f64; 3] = [99.0, 999.0, 9999.0];

const DEFAULT_HOUR: f64 = 1.0;
const DEFAULT_MINUTE: f64 = 0.0;

/// Turns a [`RawTable`] into a resampled, time-indexed batch.
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    required_variable: Option<String>,
}

impl RecordNormalizer {
    pub fn new(required_variable: Option<String>) -> Self {
        Self { required_variable }
    }

    pub fn normalize(
        &self,
        raw: RawTable,
        cadence: Cadence,
    ) -> Result<YearObservationBatch, RecordError> {
        if let Some(variable) = &self.required_variable {
            if raw.column(variable).is_none() {
                return Err(RecordError::MissingRequiredVariable {
                    station: raw.station_id,
                    year: raw.year,
                    variable: variable.clone(),
                });
            }
        }

        let RawTable {
            station_id,
            year,
            schema,
            names,
            mut columns,
            lines,
        } = raw;

        for column in columns.iter_mut() {
            for value in column.iter_mut() {
                if value.is_some_and(|v| SENTINELS.contains(&v)) {
                    *value = None;
                }
            }
        }

        let index_of = |name: &str| names.iter().position(|n| n == name);
        let year_idx = index_of(&schema.year_column);
        let month_idx = index_of(MONTH_COLUMN);
        let day_idx = index_of(DAY_COLUMN);
        let hour_idx = index_of(HOUR_COLUMN);
        let minute_idx = index_of(MINUTE_COLUMN);
        let field = |idx: Option<usize>, row: usize, default: Option<f64>| match idx {
            Some(i) => columns[i][row],
            None => default,
        };

        // (timestamp, row) for every row whose time fields survived scrubbing
        let mut stamped = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let fields = [
                field(year_idx, row, None),
                field(month_idx, row, None),
                field(day_idx, row, None),
                field(hour_idx, row, Some(DEFAULT_HOUR)),
                field(minute_idx, row, Some(DEFAULT_MINUTE)),
            ];
            let [Some(y), Some(mo), Some(d), Some(h), Some(mi)] = fields else {
                debug!(
                    "Dropping row at line {} for station {} in {}: missing time field",
                    line, station_id, year
                );
                continue;
            };
            let y = if y < 100.0 { y + 1900.0 } else { y };

            let timestamp = build_timestamp(y, mo, d, h, mi).ok_or_else(|| {
                RecordError::MalformedSource {
                    station: station_id.clone(),
                    year,
                    line: *line,
                    reason: format!("invalid date {}-{}-{} {}:{}", y, mo, d, h, mi),
                }
            })?;
            stamped.push((timestamp, row));
        }

        let value_columns: Vec<(String, Vec<Option<f64>>)> = names
            .into_iter()
            .zip(columns)
            .filter(|(name, _)| !is_time_column(name))
            .collect();

        let (timestamps, variables) = resample(&stamped, &value_columns, cadence);
        debug!(
            "Station {} in {}: {} rows into {} {} buckets",
            station_id,
            year,
            stamped.len(),
            timestamps.len(),
            cadence
        );

        Ok(YearObservationBatch {
            station_id,
            year,
            timestamps,
            variables,
        })
    }
}

fn is_time_column(name: &str) -> bool {
    YEAR_COLUMNS.contains(&name)
        || [MONTH_COLUMN, DAY_COLUMN, HOUR_COLUMN, MINUTE_COLUMN].contains(&name)
}

fn whole(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
}

fn build_timestamp(y: f64, mo: f64, d: f64, h: f64, mi: f64) -> Option<NaiveDateTime> {
    let year = i32::try_from(whole(y)?).ok()?;
    NaiveDate::from_ymd_opt(year, whole(mo)?, whole(d)?)?.and_hms_opt(whole(h)?, whole(mi)?, 0)
}

/// Averages every value column into contiguous cadence buckets spanning the
/// stamped rows. Buckets without a contributing sample stay `None`.
fn resample(
    stamped: &[(NaiveDateTime, usize)],
    value_columns: &[(String, Vec<Option<f64>>)],
    cadence: Cadence,
) -> (Vec<NaiveDateTime>, Variables) {
    let bounds = stamped
        .iter()
        .map(|(ts, _)| *ts)
        .fold(None, |acc: Option<(NaiveDateTime, NaiveDateTime)>, ts| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
                None => (ts, ts),
            })
        });
    let Some((first, last)) = bounds else {
        let variables = value_columns
            .iter()
            .map(|(name, _)| (name.clone(), Vec::new()))
            .collect();
        return (Vec::new(), variables);
    };

    let labels = cadence.labels_between(first, last);
    // Labels are sorted, so each row finds its bucket by binary search.
    let slots: Vec<(usize, usize)> = stamped
        .iter()
        .filter_map(|(ts, row)| {
            labels
                .binary_search(&cadence.bucket(*ts))
                .ok()
                .map(|slot| (slot, *row))
        })
        .collect();

    let variables = value_columns
        .iter()
        .map(|(name, values)| {
            let mut sums = vec![0.0; labels.len()];
            let mut counts = vec![0usize; labels.len()];
            for (slot, row) in &slots {
                if let Some(v) = values[*row] {
                    sums[*slot] += v;
                    counts[*slot] += 1;
                }
            }
            let means = sums
                .into_iter()
                .zip(counts)
                .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                .collect();
            (name.clone(), means)
        })
        .collect();

    (labels, variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn normalize(text: &str, cadence: Cadence) -> Result<YearObservationBatch, RecordError> {
        let raw = RawTable::parse("tplm2", 2019, text)?;
        RecordNormalizer::new(Some("WTMP".into())).normalize(raw, cadence)
    }

    #[test]
    fn test_sentinel_becomes_missing() {
        let text = "\
#YY MM DD hh mm WTMP PRES
#yr mo dy hr mn degC hPa
2019 01 01 00 00 999 1016.0
2019 01 01 06 00 999 1018.0
2019 01 02 00 00 10.0 9999
";
        let batch = normalize(text, Cadence::Daily).unwrap();
        assert_eq!(batch.timestamps, vec![at(2019, 1, 1, 0), at(2019, 1, 2, 0)]);
        assert_eq!(batch.variables["WTMP"], vec![None, Some(10.0)]);
        assert_eq!(batch.variables["PRES"], vec![Some(1017.0), None]);
        // Date columns are not values.
        assert!(!batch.variables.contains_key("MM"));
        assert!(!batch.variables.contains_key("#YY"));
    }

    #[test]
    fn test_missing_buckets_stay_missing() {
        let text = "\
YYYY MM DD hh WTMP
2019 01 01 00 4.0
2019 01 01 12 6.0
2019 01 04 00 8.0
";
        let batch = normalize(text, Cadence::Daily).unwrap();
        // Inclusive labels Jan 1 to Jan 4: floor(span / cadence) + 1
        assert_eq!(batch.len(), 4);
        assert_eq!(
            batch.variables["WTMP"],
            vec![Some(5.0), None, None, Some(8.0)]
        );
    }

    #[test]
    fn test_two_digit_year_and_default_hour() {
        let text = "YY MM DD WTMP\n95 03 01 8.5\n95 03 01 9.5\n";
        let raw = RawTable::parse("41001", 1995, text).unwrap();
        let batch = RecordNormalizer::new(Some("WTMP".into()))
            .normalize(raw, Cadence::Hourly)
            .unwrap();
        assert_eq!(batch.timestamps, vec![at(1995, 3, 1, 1)]);
        assert_eq!(batch.variables["WTMP"], vec![Some(9.0)]);
    }

    #[test]
    fn test_missing_time_field_drops_row() {
        // Day 99 is scrubbed, so the second row has no timestamp.
        let text = "YYYY MM DD hh WTMP\n2019 02 01 00 3.0\n2019 02 99 00 4.0\n";
        let batch = normalize(text, Cadence::Daily).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.variables["WTMP"], vec![Some(3.0)]);
    }

    #[test]
    fn test_impossible_date_is_malformed() {
        let text = "YYYY MM DD hh WTMP\n2019 02 01 00 3.0\n2019 13 01 00 4.0\n";
        assert!(matches!(
            normalize(text, Cadence::Daily),
            Err(RecordError::MalformedSource { line: 3, .. })
        ));
    }

    #[test]
    fn test_required_variable() {
        let text = "YYYY MM DD hh WSPD\n2019 02 01 00 3.0\n";
        assert!(matches!(
            normalize(text, Cadence::Daily),
            Err(RecordError::MissingRequiredVariable { ref variable, .. }) if variable == "WTMP"
        ));

        let raw = RawTable::parse("x", 2019, text).unwrap();
        let batch = RecordNormalizer::new(None)
            .normalize(raw, Cadence::Daily)
            .unwrap();
        assert_eq!(batch.variables["WSPD"], vec![Some(3.0)]);
    }

    #[test]
    fn test_unsorted_rows_and_weekly_cadence() {
        let text = "\
YYYY MM DD hh WTMP
2020 03 10 00 6.0
2020 03 04 00 2.0
2020 03 05 00 4.0
";
        let batch = normalize(text, Cadence::Weekly).unwrap();
        assert_eq!(batch.timestamps, vec![at(2020, 3, 8, 0), at(2020, 3, 15, 0)]);
        assert_eq!(batch.variables["WTMP"], vec![Some(3.0), Some(6.0)]);
    }

    #[test]
    fn test_header_only_gives_empty_batch() {
        let batch = normalize("#YY MM DD hh mm WTMP\n#yr mo dy hr mn degC\n", Cadence::Daily).unwrap();
        assert!(batch.is_empty());
        assert!(batch.variables["WTMP"].is_empty());
    }
}
