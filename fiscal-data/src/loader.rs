use std::collections::BTreeMap;
use std::io::Read;

use fiscal_core::{IncomeTaxSchedule, RateBracket, ScheduleError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading income-tax brackets.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid brackets for tax year {year}: {source}")]
    Schedule {
        year: i32,
        #[source]
        source: ScheduleError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the income-tax brackets CSV file.
///
/// - `tax_year`: The fiscal year (e.g., 2024)
/// - `min_income`: Lower bound of the bracket
/// - `max_income`: Upper bound of the bracket (empty for unbounded)
/// - `rate`: The marginal rate as a percentage (e.g., 19 for 19%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive income-tax brackets stored as CSV.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Groups records by tax year and validates each group as a schedule.
    ///
    /// Rows within a year may appear in any order; they are sorted by their
    /// lower bound before validation.
    pub fn schedules(
        records: &[BracketRecord]
    ) -> Result<BTreeMap<i32, IncomeTaxSchedule>, BracketLoaderError> {
        let mut groups: BTreeMap<i32, Vec<RateBracket>> = BTreeMap::new();

        for record in records {
            groups.entry(record.tax_year).or_default().push(RateBracket {
                min: record.min_income,
                max: record.max_income,
                rate: record.rate,
            });
        }

        groups
            .into_iter()
            .map(|(year, mut brackets)| {
                brackets.sort_by(|a, b| a.min.cmp(&b.min));
                debug!(year, count = brackets.len(), "building income tax schedule");
                IncomeTaxSchedule::new(brackets)
                    .map(|schedule| (year, schedule))
                    .map_err(|source| BracketLoaderError::Schedule { year, source })
            })
            .collect()
    }

    /// Parses and validates in one step.
    pub fn load<R: Read>(
        reader: R
    ) -> Result<BTreeMap<i32, IncomeTaxSchedule>, BracketLoaderError> {
        let records = Self::parse(reader)?;
        Self::schedules(&records)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"tax_year,min_income,max_income,rate
2023,0,12450,19
2023,12450,20200,24
2023,20200,35200,30
2023,35200,60000,37
2023,60000,300000,45
2023,300000,,47
2024,300000,,47
2024,0,12450,19
2024,12450,20200,24
2024,20200,35200,30
2024,35200,60000,37
2024,60000,300000,47
"#;

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "tax_year,min_income,max_income,rate\n2024,0,12450,19";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            BracketRecord {
                tax_year: 2024,
                min_income: dec!(0),
                max_income: Some(dec!(12450)),
                rate: dec!(19),
            }
        );
    }

    #[test]
    fn test_parse_csv_unbounded_max_income() {
        let csv = "tax_year,min_income,max_income,rate\n2024,300000,,47";

        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_income, None);
        assert_eq!(records[0].min_income, dec!(300000));
        assert_eq!(records[0].rate, dec!(47));
    }

    #[test]
    fn test_schedules_group_by_year_and_sort() {
        let records = BracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

        let schedules = BracketLoader::schedules(&records).expect("valid schedules");

        assert_eq!(schedules.keys().copied().collect::<Vec<_>>(), vec![2023, 2024]);
        let brackets_2024 = schedules[&2024].brackets();
        assert_eq!(brackets_2024.len(), 6);
        assert_eq!(brackets_2024[0].min, dec!(0));
        assert_eq!(brackets_2024[5].max, None);
        assert_eq!(schedules[&2023].brackets()[4].rate, dec!(45));
    }

    #[test]
    fn test_schedules_reject_gap() {
        let csv = "tax_year,min_income,max_income,rate\n2024,0,10000,19\n2024,12000,,24";
        let records = BracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let err = BracketLoader::schedules(&records).expect_err("gap must be rejected");

        match err {
            BracketLoaderError::Schedule { year, source } => {
                assert_eq!(year, 2024);
                assert_eq!(
                    source,
                    ScheduleError::NotContiguous {
                        index: 1,
                        expected: dec!(10000),
                        found: dec!(12000),
                    }
                );
            }
            other => panic!("expected Schedule error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "tax_year,min_income\n2024,0";

        let result = BracketLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for missing column");
        let BracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "tax_year,min_income,max_income,rate\n2024,abc,12450,19";

        let result = BracketLoader::parse(csv.as_bytes());

        let err = result.expect_err("Should fail for invalid decimal");
        let BracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("invalid"),
            "Expected 'invalid' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_load_empty_csv() {
        let csv = "tax_year,min_income,max_income,rate\n";

        let schedules = BracketLoader::load(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(schedules.is_empty());
    }
}
