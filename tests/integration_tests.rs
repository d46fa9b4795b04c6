use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use deal_engine::commission::CommissionRule;
use deal_engine::projection::{EngineConfig, FinancialEngine, IrrConfig};
use deal_engine::transaction::{
    resolve_result, ApprovalRecord, ApprovalStatus, BusinessUnit, FixedCostLine, Money,
    RecurringServiceLine, RegionalAttributes, Region, SaleType, TransactionInput,
};
use deal_engine::EngineError;

const REGIONAL_DEAL: &str = r#"{
    "locked_exchange_rate": 3.8,
    "contract_term_months": 24,
    "mrc": { "amount": 10000, "currency": "PEN" },
    "nrc": { "amount": 20000, "currency": "PEN" },
    "annual_capital_cost": 0.12,
    "bond_applies": false,
    "business_unit": { "code": "GIGALAN", "region": "LIMA", "sale_type": "NUEVO" },
    "recurring_services": [
        {
            "quantity": 1,
            "unit_price": { "amount": 10000, "currency": "PEN" },
            "cost1": { "amount": 1000, "currency": "USD" },
            "cost2": null,
            "description": "Dedicated internet 1 Gbps"
        }
    ],
    "fixed_costs": [
        {
            "id": "FC-1",
            "category": "installation",
            "quantity": 1,
            "unit_cost": { "amount": 5000, "currency": "PEN" },
            "start_period": 0,
            "duration_months": 1
        }
    ]
}"#;

fn service(quantity: f64, price: Money, cost1: Money) -> RecurringServiceLine {
    RecurringServiceLine {
        quantity,
        unit_price: price,
        cost1,
        ..RecurringServiceLine::default()
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenarios per business unit
// ---------------------------------------------------------------------------

#[test]
fn test_regional_new_sale_from_json() {
    let input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    let result = FinancialEngine::default().evaluate(&input);

    assert_relative_eq!(result.mrc_base.unwrap(), 10_000.0);
    assert_relative_eq!(result.total_revenue.unwrap(), 20_000.0 + 24.0 * 10_000.0);
    // 1,000 USD at 3.8 per month
    assert_relative_eq!(result.recurring_services[0].monthly_expense_base, 3_800.0, epsilon = 1e-9);

    // pre-commission ratio = (260,000 - 5,000 - 91,200) / 260,000 = 0.63
    assert_relative_eq!(
        result.pre_commission.gross_margin_ratio.unwrap(),
        163_800.0 / 260_000.0,
        epsilon = 1e-12
    );
    assert_eq!(result.pre_commission.payback, Some(0));

    assert_eq!(result.commission_detail.rule, CommissionRule::RegionalChannel);
    assert_eq!(result.commission_detail.rate, 0.019);
    assert_relative_eq!(result.commission.unwrap(), 0.019 * 10_000.0 * 24.0);
    assert_relative_eq!(
        result.total_expense.unwrap(),
        4_560.0 + 5_000.0 + 91_200.0,
        epsilon = 1e-6
    );
}

#[test]
fn test_regional_upgrade_pays_on_increase() {
    let mut input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    input.business_unit = BusinessUnit::RegionalChannel(
        RegionalAttributes::new(Region::Lima, SaleType::Existing).with_prior_mrc(6_000.0),
    );

    let result = FinancialEngine::default().evaluate(&input);
    assert_eq!(result.commission_detail.rate, 0.020);
    assert_relative_eq!(result.commission.unwrap(), 0.020 * 24.0 * 4_000.0);
}

#[test]
fn test_regional_slow_payback_pays_nothing() {
    let mut input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    input.nrc = Money::base(0.0);
    input.fixed_costs = vec![FixedCostLine::new(1.0, Money::base(30_000.0), 0, 1)];

    let result = FinancialEngine::default().evaluate(&input);
    // -30,000 then +6,200 a month
    assert_eq!(result.pre_commission.payback, Some(5));
    assert_eq!(result.commission, Some(0.0));
}

#[test]
fn test_state_sector_single_payment_example() {
    let input = TransactionInput {
        contract_term_months: 1,
        mrc: Money::base(1_000_000.0),
        business_unit: BusinessUnit::StateSector,
        recurring_services: vec![service(1.0, Money::base(0.0), Money::base(700_000.0))],
        ..TransactionInput::default()
    };

    let result = FinancialEngine::default().evaluate(&input);
    assert_relative_eq!(result.pre_commission.gross_margin_ratio.unwrap(), 0.30);
    assert_eq!(result.commission_detail.rule, CommissionRule::StateSectorSinglePayment);
    assert_relative_eq!(result.commission.unwrap(), 10_000.0);
    assert_eq!(result.commission_detail.cap, Some(11_000.0));
}

#[test]
fn test_state_sector_recurring_example() {
    // 12 x 18,000 recurring + 144,000 up front = 360,000 expense on 600,000 revenue
    let input = TransactionInput {
        contract_term_months: 12,
        mrc: Money::base(50_000.0),
        business_unit: BusinessUnit::StateSector,
        recurring_services: vec![service(1.0, Money::base(0.0), Money::base(18_000.0))],
        fixed_costs: vec![FixedCostLine::new(1.0, Money::base(144_000.0), 0, 1)],
        ..TransactionInput::default()
    };

    let result = FinancialEngine::default().evaluate(&input);
    assert_relative_eq!(result.pre_commission.gross_margin_ratio.unwrap(), 0.40);
    assert_eq!(result.pre_commission.payback, Some(5));
    assert_eq!(result.commission_detail.rate, 0.035);
    assert_relative_eq!(result.commission.unwrap(), 21_000.0, epsilon = 1e-6);
}

#[test]
fn test_corporate_and_unknown_units_pay_nothing() {
    let corporate = TransactionInput::from_json(
        r#"{"contract_term_months": 12, "mrc": {"amount": 1000}, "business_unit": {"code": "CORPORATIVO"}}"#,
    )
    .unwrap();
    let unknown = TransactionInput::from_json(
        r#"{"contract_term_months": 12, "mrc": {"amount": 1000}, "business_unit": {"code": "MAYORISTA"}}"#,
    )
    .unwrap();

    let engine = FinancialEngine::default();
    let corporate = engine.evaluate(&corporate);
    let unknown = engine.evaluate(&unknown);

    assert_eq!(corporate.commission_detail.rule, CommissionRule::Corporate);
    assert_eq!(corporate.commission, Some(0.0));
    assert_eq!(unknown.commission_detail.rule, CommissionRule::Unassigned);
    assert_eq!(unknown.commission, Some(0.0));
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn test_evaluation_is_deterministic() {
    let input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    let engine = FinancialEngine::default();

    let first = engine.evaluate(&input).to_json().unwrap();
    let second = engine.evaluate(&input).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_manual_mrc_overrides_service_lines() {
    let mut input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    input.mrc = Money::foreign(7_000.0);

    let result = FinancialEngine::default().evaluate(&input);
    assert_relative_eq!(result.mrc_original.unwrap(), 7_000.0);
    assert_relative_eq!(result.mrc_base.unwrap(), 7_000.0 * 3.8, epsilon = 1e-9);
    assert_relative_eq!(result.timeline.periods[1].mrc, 7_000.0 * 3.8, epsilon = 1e-9);
}

#[test]
fn test_timeline_conserves_revenue() {
    let input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    let result = FinancialEngine::default().evaluate(&input);

    assert_eq!(result.timeline.len(), 25);
    assert_relative_eq!(result.timeline.total_revenue(), result.total_revenue.unwrap());
    assert_relative_eq!(
        result.timeline.periods[24].cumulative_cash_flow,
        result.total_revenue.unwrap() - result.total_expense.unwrap(),
        epsilon = 1e-6
    );
}

#[test]
fn test_commission_does_not_move_tier_inputs() {
    let input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    let result = FinancialEngine::default().evaluate(&input);

    assert!(result.commission.unwrap() > 0.0);
    assert!(result.gross_margin_ratio.unwrap() < result.pre_commission.gross_margin_ratio.unwrap());
    // the final margin is the pre-commission margin minus commission
    assert_relative_eq!(
        result.gross_margin.unwrap(),
        result.pre_commission.gross_margin.unwrap() - result.commission.unwrap(),
        epsilon = 1e-6
    );
}

#[test]
fn test_irr_and_payback_round_trip() {
    let input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    let result = FinancialEngine::default().evaluate(&input);

    // positive period 0 and positive months: no sign change, no IRR
    assert_eq!(result.irr, None);
    assert_eq!(result.payback, Some(0));
    assert!(result.npv.unwrap() > 0.0);
}

#[test]
fn test_irr_exists_for_investment_profile() {
    let input = TransactionInput {
        contract_term_months: 12,
        mrc: Money::base(1_000.0),
        fixed_costs: vec![FixedCostLine::new(1.0, Money::base(10_000.0), 0, 1)],
        ..TransactionInput::default()
    };
    let engine = FinancialEngine::default();
    let result = engine.evaluate(&input);

    let irr = result.irr.unwrap();
    let npv_at_irr =
        deal_engine::projection::calculate_npv(irr, &result.timeline.net_cash_flows()).unwrap();
    assert_relative_eq!(npv_at_irr, 0.0, epsilon = 1e-6);
    assert_eq!(result.payback, Some(10));
}

#[test]
fn test_irr_settings_are_honoured() {
    let input = TransactionInput {
        contract_term_months: 12,
        mrc: Money::base(1_000.0),
        fixed_costs: vec![FixedCostLine::new(1.0, Money::base(10_000.0), 0, 1)],
        ..TransactionInput::default()
    };
    let engine = FinancialEngine::new(EngineConfig {
        irr: IrrConfig {
            max_iterations: 0,
            ..IrrConfig::default()
        },
        ..EngineConfig::default()
    });

    assert_eq!(engine.evaluate(&input).irr, None);
}

#[test]
fn test_non_finite_kpis_serialize_as_null() {
    let result = FinancialEngine::default().evaluate(&TransactionInput::default());
    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert!(value["irr"].is_null());
    assert_eq!(value["payback"], 0);
}

#[test]
fn test_malformed_input_is_rejected() {
    let err = TransactionInput::from_json(r#"{"contract_term_months": "twelve"}"#).unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(_)));

    let err = TransactionInput::from_json(r#"{"recurring_services": {"quantity": 1}}"#).unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(_)));
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_approved_transaction_reuses_cached_result() {
    let engine = FinancialEngine::default();
    let mut input = TransactionInput::from_json(REGIONAL_DEAL).unwrap();

    let mut record = ApprovalRecord::new();
    record.submit(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()).unwrap();
    record.approve(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()).unwrap();
    assert_eq!(record.status, ApprovalStatus::Approved);

    // first read after approval fills the cache
    let first = resolve_result(record.status, None, &engine, &input);
    assert!(first.store_in_cache);

    // later edits to the stored snapshot do not leak into the frozen result
    input.mrc = Money::base(1.0);
    let second = resolve_result(record.status, Some(first.result.clone()), &engine, &input);
    assert!(!second.store_in_cache);
    assert_eq!(second.result, first.result);
}

#[test]
fn test_lifecycle_rejects_out_of_order_transitions() {
    let mut record = ApprovalRecord::new();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

    let err = record.approve(at).unwrap_err();
    assert_eq!(err.to_string(), "cannot approve a transaction that is DRAFT");

    record.submit(at).unwrap();
    record.reject(at, Some("margin too thin".to_string())).unwrap();
    assert!(record.submit(at).is_err());
}

#[test]
fn test_batch_matches_single_evaluations() {
    let regional = TransactionInput::from_json(REGIONAL_DEAL).unwrap();
    let inputs = vec![regional.clone(), TransactionInput::default(), regional];
    let engine = FinancialEngine::default();

    let results = engine.evaluate_batch(&inputs);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], results[2]);
    assert_eq!(results[1], engine.evaluate(&inputs[1]));
}
