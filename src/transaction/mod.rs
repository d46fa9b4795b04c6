//! Transaction input snapshots and approval lifecycle

mod business_unit;
mod input;
mod lifecycle;

pub use business_unit::{BusinessUnit, RegionalAttributes, Region, SaleType};
pub use input::{
    load_batch, Currency, FixedCostLine, Money, RecurringServiceLine, TransactionInput,
};
pub use lifecycle::{resolve_result, ApprovalRecord, ApprovalStatus, ResolvedResult};
