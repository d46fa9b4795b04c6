use deal_engine::normalize::{CurrencyConverter, NormalizedFixedCost};
use deal_engine::projection::{build_timeline, FinancialEngine, TimelineInputs};
use deal_engine::transaction::{
    BusinessUnit, Currency, FixedCostLine, Money, RecurringServiceLine, RegionalAttributes,
    Region, SaleType, TransactionInput,
};
use proptest::prelude::*;

fn arb_currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(vec![Currency::Base, Currency::Foreign])
}

fn arb_money() -> impl Strategy<Value = Money> {
    (0u32..100_000u32, arb_currency()).prop_map(|(amount, currency)| Money::new(amount as f64, currency))
}

fn arb_service() -> impl Strategy<Value = RecurringServiceLine> {
    (1u32..20u32, arb_money(), arb_money(), arb_money()).prop_map(|(quantity, unit_price, cost1, cost2)| {
        RecurringServiceLine {
            quantity: quantity as f64,
            unit_price,
            cost1,
            cost2,
            description: None,
        }
    })
}

fn arb_fixed_cost() -> impl Strategy<Value = FixedCostLine> {
    (1u32..5u32, arb_money(), 0u32..60u32, 0u32..36u32)
        .prop_map(|(quantity, unit_cost, start, duration)| FixedCostLine::new(quantity as f64, unit_cost, start, duration))
}

fn arb_business_unit() -> impl Strategy<Value = BusinessUnit> {
    prop::sample::select(vec![
        BusinessUnit::Unassigned,
        BusinessUnit::StateSector,
        BusinessUnit::Corporate,
        BusinessUnit::RegionalChannel(RegionalAttributes::new(Region::Lima, SaleType::New)),
        BusinessUnit::RegionalChannel(RegionalAttributes::new(Region::ProvincesWithTdp, SaleType::Existing)),
    ])
}

fn arb_transaction() -> impl Strategy<Value = TransactionInput> {
    (
        1u32..500u32,
        prop::sample::select(vec![0u32, 1, 12, 24, 36, 48, 60]),
        arb_money(),
        arb_money(),
        any::<bool>(),
        arb_business_unit(),
        prop::collection::vec(arb_service(), 0..5),
        prop::collection::vec(arb_fixed_cost(), 0..5),
    )
        .prop_map(
            |(rate_cents, term, mrc, nrc, bond_applies, business_unit, recurring_services, fixed_costs)| {
                TransactionInput {
                    locked_exchange_rate: rate_cents as f64 / 100.0,
                    contract_term_months: term,
                    mrc,
                    nrc,
                    annual_capital_cost: 0.10,
                    bond_applies,
                    bond_rate: 0.015,
                    business_unit,
                    recurring_services,
                    fixed_costs,
                }
            },
        )
}

proptest! {
    // ===================================================================
    // Evaluating the same snapshot twice gives byte-identical output
    // ===================================================================
    #[test]
    fn evaluation_is_deterministic(input in arb_transaction()) {
        let engine = FinancialEngine::default();
        let first = engine.evaluate(&input).to_json().unwrap();
        let second = engine.evaluate(&input).to_json().unwrap();
        prop_assert_eq!(first, second);
    }

    // ===================================================================
    // Base amounts are never touched by the exchange rate
    // ===================================================================
    #[test]
    fn base_currency_is_identity(amount in -1e9f64..1e9f64, rate in 0.01f64..100.0f64) {
        let converter = CurrencyConverter::new(rate);
        prop_assert_eq!(converter.to_base(amount, Currency::Base), amount);
    }

    // ===================================================================
    // Timeline revenue equals NRC + MRC x term
    // ===================================================================
    #[test]
    fn timeline_conserves_revenue(input in arb_transaction()) {
        let result = FinancialEngine::default().evaluate(&input);
        let expected = result.total_revenue.unwrap();
        let actual = result.timeline.total_revenue();
        prop_assert!((expected - actual).abs() <= 1e-6 * expected.abs().max(1.0));
        prop_assert_eq!(result.timeline.len(), input.contract_term_months as usize + 1);
    }

    // ===================================================================
    // Commission never changes the figures its tiers were picked with
    // ===================================================================
    #[test]
    fn commission_is_non_negative_and_separate(input in arb_transaction()) {
        let result = FinancialEngine::default().evaluate(&input);
        let mut without = input.clone();
        without.business_unit = BusinessUnit::Unassigned;
        let baseline = FinancialEngine::default().evaluate(&without);

        prop_assert!(result.commission.unwrap() >= 0.0);
        prop_assert_eq!(result.pre_commission, baseline.pre_commission);
    }

    // ===================================================================
    // A fixed cost lands only inside its window and never exceeds its total
    // ===================================================================
    #[test]
    fn fixed_cost_stays_in_window(line in arb_fixed_cost(), term in 0u32..60u32) {
        let converter = CurrencyConverter::new(3.5);
        let total_base = line.quantity * converter.money_to_base(line.unit_cost);
        let cost = NormalizedFixedCost {
            unit_cost_base: converter.money_to_base(line.unit_cost),
            total_base,
            line: line.clone(),
        };
        let costs = [cost];
        let timeline = build_timeline(&TimelineInputs {
            contract_term_months: term,
            nrc: 0.0,
            mrc: 0.0,
            commission: 0.0,
            bond_cost: 0.0,
            monthly_expense: 0.0,
            fixed_costs: &costs,
        });

        let schedule = &timeline.fixed_costs[0];
        let start = line.start_period as usize;
        let end = start + line.effective_duration() as usize;
        for (t, value) in schedule.values.iter().enumerate() {
            if t < start || t >= end {
                prop_assert_eq!(*value, 0.0);
            }
        }
        prop_assert!(schedule.applied <= total_base + 1e-6);
        if end <= timeline.len() {
            prop_assert!((schedule.applied - total_base).abs() <= 1e-6 * total_base.max(1.0));
        }
    }
}
