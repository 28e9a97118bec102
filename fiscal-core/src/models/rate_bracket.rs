use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::brackets::progressive_tax;

/// A single marginal-rate bracket of a progressive schedule.
///
/// `rate` is a percentage (`19` means 19 %). A `max` of `None` marks the
/// unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl RateBracket {
    /// Width of the bracket, or `None` for the unbounded top bracket.
    pub fn width(&self) -> Option<Decimal> {
        self.max.map(|max| max - self.min)
    }
}

/// Errors raised when a bracket sequence does not tile the income range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("a tax schedule needs at least one bracket")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} has a non-positive width ({min} to {max})")]
    EmptyRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} rate must be between 0 and 100, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} starts at {found} but the previous bracket ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} follows an unbounded bracket")]
    UnboundedNotLast { index: usize },

    #[error("last bracket must be unbounded, but it ends at {0}")]
    BoundedLast(Decimal),
}

/// A validated progressive income-tax schedule.
///
/// Brackets are ascending and contiguous, the first starts at zero and the
/// last one is unbounded. Construction through [`IncomeTaxSchedule::new`] (or
/// deserialization) is the only way to obtain one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateBracket>", into = "Vec<RateBracket>")]
pub struct IncomeTaxSchedule {
    brackets: Vec<RateBracket>,
}

impl IncomeTaxSchedule {
    /// Validates and wraps a bracket sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when the brackets leave gaps, overlap, carry
    /// a rate outside `[0, 100]`, or do not end in an unbounded bracket.
    pub fn new(brackets: Vec<RateBracket>) -> Result<Self, ScheduleError> {
        let first = brackets.first().ok_or(ScheduleError::Empty)?;
        if first.min != Decimal::ZERO {
            return Err(ScheduleError::FirstBracketNotZero(first.min));
        }

        let hundred = Decimal::ONE_HUNDRED;
        let mut previous_max: Option<Decimal> = None;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > hundred {
                return Err(ScheduleError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            if let Some(max) = bracket.max {
                if max <= bracket.min {
                    return Err(ScheduleError::EmptyRange {
                        index,
                        min: bracket.min,
                        max,
                    });
                }
            }

            if index > 0 {
                let expected = previous_max.ok_or(ScheduleError::UnboundedNotLast { index })?;
                if bracket.min != expected {
                    return Err(ScheduleError::NotContiguous {
                        index,
                        expected,
                        found: bracket.min,
                    });
                }
            }

            previous_max = bracket.max;
        }

        if let Some(max) = previous_max {
            return Err(ScheduleError::BoundedLast(max));
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[RateBracket] {
        &self.brackets
    }

    /// Progressive tax owed on `taxable_income`; negative input yields zero.
    pub fn tax(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        progressive_tax(taxable_income.max(Decimal::ZERO), &self.brackets)
    }

    /// Highest marginal rate in the schedule, as a percentage.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<RateBracket>> for IncomeTaxSchedule {
    type Error = ScheduleError;

    fn try_from(brackets: Vec<RateBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<IncomeTaxSchedule> for Vec<RateBracket> {
    fn from(schedule: IncomeTaxSchedule) -> Self {
        schedule.brackets
    }
}
