pub mod brackets;
pub mod common;
pub mod comparator;
pub mod contributions;
pub mod double_entry;
pub mod expenses;
pub mod projection;
pub mod regimes;

pub use comparator::{ScenarioComparator, ScenarioComparison};
pub use contributions::ContributionCalculator;
pub use double_entry::{DoubleEntry, TaxBase, double_entry};
pub use expenses::ExpenseEstimator;
pub use projection::{PROJECTION_YEARS, ProjectionInput, ProjectionRow, project};
pub use regimes::{RegimeSimulator, STARTUP_TAG};
