//! Property-based tests for derived money arithmetic, display number
//! formatting and line item validation.
//!
//! These use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use proptest::prelude::*;
use rust_decimal::Decimal;

use procura_api::handlers::common::DocumentItemRequest;
use procura_api::money;
use procura_api::sequence::DocumentKind;
use uuid::Uuid;
use validator::Validate;

// Strategies for generating test data

fn quantity_strategy() -> impl Strategy<Value = i32> {
    1i32..10_000
}

/// Prices with at most two decimal places, the shape accepted by the API.
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64, 0i64..100i64)
        .prop_map(|(units, cents)| Decimal::new(units * 100 + cents, 2))
}

fn line_strategy() -> impl Strategy<Value = (i32, Decimal)> {
    (quantity_strategy(), price_strategy())
}

fn kind_strategy() -> impl Strategy<Value = DocumentKind> {
    prop_oneof![
        Just(DocumentKind::PurchaseRequest),
        Just(DocumentKind::Rfq),
        Just(DocumentKind::PurchaseOrder),
    ]
}

// Property: line totals behave like exact multiplication

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn line_totals_are_never_negative((quantity, price) in line_strategy()) {
        prop_assert!(!money::line_total(quantity, price).is_sign_negative());
    }

    #[test]
    fn line_totals_add_over_quantity_splits(
        q1 in 1i32..5_000,
        q2 in 1i32..5_000,
        price in price_strategy(),
    ) {
        let split = money::line_total(q1, price) + money::line_total(q2, price);
        prop_assert_eq!(money::line_total(q1 + q2, price), split);
    }

    #[test]
    fn line_totals_keep_cent_precision((quantity, price) in line_strategy()) {
        prop_assert!(money::line_total(quantity, price).scale() <= 2);
    }
}

// Property: document totals are order-independent sums of their lines

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn totals_ignore_item_order(items in proptest::collection::vec(line_strategy(), 0..12)) {
        let forward = money::items_total(items.clone());
        let mut reversed = items;
        reversed.reverse();
        prop_assert_eq!(forward, money::items_total(reversed));
    }

    #[test]
    fn totals_add_over_concatenation(
        left in proptest::collection::vec(line_strategy(), 0..8),
        right in proptest::collection::vec(line_strategy(), 0..8),
    ) {
        let separate = money::items_total(left.clone()) + money::items_total(right.clone());
        let mut combined = left;
        combined.extend(right);
        prop_assert_eq!(money::items_total(combined), separate);
    }

    #[test]
    fn totals_dominate_every_line(items in proptest::collection::vec(line_strategy(), 1..12)) {
        let total = money::items_total(items.clone());
        for (quantity, price) in items {
            prop_assert!(total >= money::line_total(quantity, price));
        }
    }
}

// Property: display numbers always carry their prefix and round-trip

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn display_numbers_round_trip(kind in kind_strategy(), value in 1i64..100_000_000) {
        let formatted = kind.format(value);
        prop_assert!(formatted.starts_with(kind.prefix()));

        let digits = &formatted[kind.prefix().len()..];
        prop_assert!(digits.len() >= 6, "numeric part is at least six digits wide");
        prop_assert_eq!(digits.parse::<i64>().expect("numeric tail"), value);
    }

    #[test]
    fn small_display_numbers_are_zero_padded(kind in kind_strategy(), value in 1i64..1_000_000) {
        let formatted = kind.format(value);
        prop_assert_eq!(formatted.len(), kind.prefix().len() + 6);
    }
}

// Property: line item validation accepts exactly the positive quantities

proptest! {
    #[test]
    fn positive_quantities_validate(quantity in quantity_strategy(), price in price_strategy()) {
        let item = DocumentItemRequest {
            product_id: Uuid::new_v4(),
            description: None,
            quantity,
            estimated_unit_price: price,
        };
        prop_assert!(item.validate().is_ok());
    }

    #[test]
    fn non_positive_quantities_fail_validation(quantity in -10_000i32..1, price in price_strategy()) {
        let item = DocumentItemRequest {
            product_id: Uuid::new_v4(),
            description: None,
            quantity,
            estimated_unit_price: price,
        };
        prop_assert!(item.validate().is_err());
    }
}
