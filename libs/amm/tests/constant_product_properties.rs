//! Constant-Product Trade Properties
//!
//! Mathematical properties that must hold for every pool trade, regardless of
//! the specific reserves, fee, or amount.

use amm::{constant_product_holds, AmmError, ConstantProductMath, PoolReserves};
use proptest::prelude::*;

prop_compose! {
    fn valid_reserves()
        (reserve_in in 1i64..1_000_000_000_000i64, reserve_out in 2i64..1_000_000_000_000i64)
        -> (i64, i64) {
        (reserve_in, reserve_out)
    }
}

prop_compose! {
    fn valid_fee()
        (fee_bps in 0u32..1000u32) -> u32 {
        fee_bps
    }
}

proptest! {
    #[test]
    fn deposit_never_drains_or_breaks_invariant(
        (reserve_in, reserve_out) in valid_reserves(),
        fee_bps in valid_fee(),
        amount_in in 1i64..1_000_000_000_000i64,
    ) {
        let out = ConstantProductMath::calculate_output_amount(amount_in, reserve_in, reserve_out, fee_bps)
            .expect("deposit within range");

        prop_assert!(out >= 0);
        prop_assert!(out < reserve_out);

        let before = PoolReserves::new(reserve_in, reserve_out, fee_bps);
        let after = before.after_trade(amount_in, out).expect("reserves stay representable");
        prop_assert!(constant_product_holds(&before, &after));
    }

    #[test]
    fn deposit_is_monotonic_in_amount(
        (reserve_in, reserve_out) in valid_reserves(),
        fee_bps in valid_fee(),
        amount_in in 1i64..1_000_000_000i64,
        extra in 0i64..1_000_000i64,
    ) {
        let small = ConstantProductMath::calculate_output_amount(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        let large = ConstantProductMath::calculate_output_amount(amount_in + extra, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assert!(large >= small);
    }

    #[test]
    fn expectation_is_minimal_sufficient_input(
        (reserve_in, reserve_out) in valid_reserves(),
        fee_bps in valid_fee(),
        fraction in 1u32..1000u32,
    ) {
        let amount_out = ((reserve_out as i128 * fraction as i128) / 1000) as i64;
        prop_assume!(amount_out > 0 && amount_out < reserve_out);

        match ConstantProductMath::calculate_input_amount(amount_out, reserve_in, reserve_out, fee_bps) {
            Ok(input) => {
                let got = ConstantProductMath::calculate_output_amount(input, reserve_in, reserve_out, fee_bps).unwrap();
                prop_assert!(got >= amount_out);
                if input > 1 {
                    let short = ConstantProductMath::calculate_output_amount(input - 1, reserve_in, reserve_out, fee_bps).unwrap();
                    prop_assert!(short < amount_out);
                }
            }
            // Very steep curves can need more input than an i64 can carry
            Err(err) => prop_assert_eq!(err, AmmError::Overflow),
        }
    }

    #[test]
    fn expectation_of_deposit_does_not_exceed_deposit(
        (reserve_in, reserve_out) in valid_reserves(),
        fee_bps in valid_fee(),
        amount_in in 1i64..1_000_000_000i64,
    ) {
        let out = ConstantProductMath::calculate_output_amount(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assume!(out > 0);

        let input = ConstantProductMath::calculate_input_amount(out, reserve_in, reserve_out, fee_bps).unwrap();
        prop_assert!(input <= amount_in);
    }

    #[test]
    fn fee_never_increases_output(
        (reserve_in, reserve_out) in valid_reserves(),
        fee_bps in valid_fee(),
        amount_in in 1i64..1_000_000_000i64,
    ) {
        let with_fee = ConstantProductMath::calculate_output_amount(amount_in, reserve_in, reserve_out, fee_bps).unwrap();
        let without_fee = ConstantProductMath::calculate_output_amount(amount_in, reserve_in, reserve_out, 0).unwrap();
        prop_assert!(with_fee <= without_fee);
    }
}
