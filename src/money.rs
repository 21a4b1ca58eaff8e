use rust_decimal::Decimal;

/// Extension of an item line: quantity times unit price, computed in exact
/// decimal arithmetic. Totals are always derived from items and never stored.
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// Sum of line totals over `(quantity, unit_price)` pairs. An empty item set
/// totals to zero.
pub fn items_total<I>(items: I) -> Decimal
where
    I: IntoIterator<Item = (i32, Decimal)>,
{
    items
        .into_iter()
        .map(|(quantity, unit_price)| line_total(quantity, unit_price))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies_quantity_by_unit_price() {
        assert_eq!(line_total(3, dec!(10.00)), dec!(30.00));
        assert_eq!(line_total(1, dec!(0.01)), dec!(0.01));
    }

    #[test]
    fn line_total_keeps_decimal_scale() {
        assert_eq!(line_total(7, dec!(19.99)), dec!(139.93));
    }

    #[test]
    fn items_total_sums_lines() {
        let total = items_total(vec![(3, dec!(10.00)), (2, dec!(5.00))]);
        assert_eq!(total, dec!(40.00));
    }

    #[test]
    fn items_total_of_empty_set_is_zero() {
        assert_eq!(items_total(Vec::new()), Decimal::ZERO);
    }

    #[test]
    fn items_total_handles_zero_quantity_lines() {
        let total = items_total(vec![(0, dec!(99.99)), (4, dec!(2.50))]);
        assert_eq!(total, dec!(10.00));
    }
}
