pub mod cycle;
pub mod lookup;
pub mod record;
pub mod timezone;

pub use cycle::CycleRule;
pub use lookup::LookupTables;
pub use record::{LotIdentity, NormalizedRecord, Normalizer, SizeCategory};
