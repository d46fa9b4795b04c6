//! Timeline construction, KPIs and the evaluation orchestrator

mod engine;
mod irr;
mod kpi;
mod result;
mod timeline;

pub use engine::{EngineConfig, FinancialEngine};
pub use irr::{calculate_irr, calculate_npv, IrrConfig};
pub use kpi::{calculate_kpis, gross_margin, payback_period, ratio, Kpis};
pub use result::{FinancialResult, PreCommissionMargin};
pub use timeline::{build_timeline, CashflowPeriod, FixedCostSchedule, Timeline, TimelineInputs};
