//! Property-based tests for the cash-flow validation rules.

use chrono::{Duration, NaiveDate};
use cashflow_shared::types::{CategoryId, OperationTypeId, SubCategoryId};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::rules::{
    CashFlowFields, MAX_AMOUNT, validate_all, validate_amount, validate_category_relation,
    validate_date,
};
use crate::catalog::{Category, SubCategory};

/// Strategy for amounts with up to four fractional digits, spanning both
/// sides of every bound.
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..20_000_000_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Strategy for a reference date and a signed day offset from it.
fn date_and_offset() -> impl Strategy<Value = (NaiveDate, i64)> {
    (0i64..20_000, -3_650i64..3_650).prop_map(|(days, offset)| {
        let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(days);
        (base, offset)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A date is rejected exactly when it is after today.
    #[test]
    fn prop_date_rejected_iff_future((today, offset) in date_and_offset()) {
        let date = today + Duration::days(offset);
        let result = validate_date(date, today);
        prop_assert_eq!(result.is_err(), date > today);
        if let Ok(validated) = result {
            prop_assert_eq!(validated, date);
        }
    }

    /// An amount is rejected exactly when it is outside (0, MAX_AMOUNT] or
    /// below half a cent.
    #[test]
    fn prop_amount_rejected_iff_out_of_bounds(amount in any_amount()) {
        let result = validate_amount(amount);
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        prop_assert_eq!(
            result.is_err(),
            rounded <= Decimal::ZERO || amount > MAX_AMOUNT
        );
    }

    /// Accepted amounts equal the input rounded half-up to two places.
    #[test]
    fn prop_amount_rounded_half_up(amount in any_amount()) {
        if let Ok(validated) = validate_amount(amount) {
            let expected = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            prop_assert_eq!(validated, expected);
            prop_assert!(validated.scale() == 2);
        }
    }

    /// Validating an accepted amount again changes nothing.
    #[test]
    fn prop_amount_idempotent(amount in any_amount()) {
        if let Ok(once) = validate_amount(amount) {
            prop_assert_eq!(validate_amount(once), Ok(once));
        }
    }

    /// The relation check fails exactly when both sides are present and
    /// the subcategory belongs to another category.
    #[test]
    fn prop_relation_fails_iff_mismatched(
        has_category in any::<bool>(),
        has_subcategory in any::<bool>(),
        related in any::<bool>(),
    ) {
        let category = Category {
            id: CategoryId::new(),
            operation_type_id: OperationTypeId::new(),
        };
        let subcategory = SubCategory {
            id: SubCategoryId::new(),
            category_id: if related { category.id } else { CategoryId::new() },
        };

        let result = validate_category_relation(
            has_category.then_some(&category),
            has_subcategory.then_some(&subcategory),
        );
        prop_assert_eq!(result.is_err(), has_category && has_subcategory && !related);
    }

    /// `validate_all` applied to its own output returns that output.
    #[test]
    fn prop_validate_all_idempotent(
        (today, offset) in date_and_offset(),
        amount in any_amount(),
        comment in proptest::option::of(".{0,20}"),
    ) {
        let fields = CashFlowFields {
            date: Some(today + Duration::days(offset)),
            amount: Some(amount),
            comment,
            ..CashFlowFields::default()
        };

        if let Ok(once) = validate_all(&fields, today) {
            let twice = validate_all(&once, today);
            prop_assert_eq!(twice, Ok(once));
        }
    }
}
