//! Normalization stages: everything the timeline needs, in base currency

mod bond;
mod currency;
mod fixed_costs;
mod mrc;
mod recurring;

pub use bond::{BondCost, BondTerms};
pub use currency::CurrencyConverter;
pub use fixed_costs::{process_fixed_costs, FixedCosts, NormalizedFixedCost};
pub use mrc::{resolve_mrc, ResolvedMrc};
pub use recurring::{process_recurring_services, EnrichedServiceLine, RecurringServices};
