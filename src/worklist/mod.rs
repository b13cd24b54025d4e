pub mod aggregator;
pub mod intake;
pub mod personal;

pub use aggregator::WorklistAggregator;
pub use intake::{BulkReport, NameTagInput};
pub use personal::{generate_personal_code, is_valid_personal_number};
