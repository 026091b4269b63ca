use rust_decimal::Decimal;

/// Total price for `quantity` units at `unit_price`, in exact decimal
/// arithmetic. The result is snapshotted onto the booking row at admission
/// and never recomputed, so later price changes on the ticket type do not
/// touch existing bookings.
pub fn compute_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn multiplies_exactly() {
        assert_eq!(compute_total(dec!(50), 60), dec!(3000));
        assert_eq!(compute_total(dec!(19.99), 3), dec!(59.97));
    }

    #[test]
    fn zero_priced_tickets_stay_free() {
        assert_eq!(compute_total(dec!(0), 42), dec!(0));
    }

    #[test]
    fn no_float_drift_on_cents() {
        // 0.10 * 3 is exactly 0.30, not 0.30000000000000004.
        assert_eq!(compute_total(dec!(0.10), 3), dec!(0.30));
    }
}
