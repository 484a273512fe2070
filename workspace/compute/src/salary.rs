use common::SalaryComponents;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ComputeError, Result};

/// Applies the yearly hike and revision to the previous salary and rounds
/// to whole currency units: `round(previous x (1 + hike%) x (1 + revision%))`.
pub fn final_salary(
    previous_salary: Decimal,
    hike_percent: Decimal,
    revision_percent: Decimal,
) -> Result<Decimal> {
    if previous_salary < Decimal::ZERO {
        return Err(ComputeError::Salary(format!(
            "previous salary must not be negative, got {previous_salary}"
        )));
    }
    let hundred = Decimal::from(100);
    let hike_factor = Decimal::ONE + hike_percent / hundred;
    let revision_factor = Decimal::ONE + revision_percent / hundred;
    if hike_factor < Decimal::ZERO || revision_factor < Decimal::ZERO {
        return Err(ComputeError::Salary(format!(
            "percentages below -100 are not meaningful (hike {hike_percent}, revision {revision_percent})"
        )));
    }

    Ok((previous_salary * hike_factor * revision_factor)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Splits a final salary into its fixed-formula components: basic is 40%
/// of the total; HRA, PF and gratuity are 50%, 12% and 4.81% of basic;
/// the special allowance is the remainder, so the parts always re-sum to
/// the input exactly.
pub fn components(final_salary: Decimal) -> SalaryComponents {
    let basic = round2(final_salary * Decimal::new(40, 2));
    let hra = round2(basic * Decimal::new(50, 2));
    let pf = round2(basic * Decimal::new(12, 2));
    let gratuity = round2(basic * Decimal::new(481, 4));
    let special_allowance = final_salary - basic - hra - pf - gratuity;

    SalaryComponents {
        basic,
        hra,
        pf,
        gratuity,
        special_allowance,
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hike_and_revision_compound() {
        // 100000 x 1.10 x 1.05 = 115500
        let result = final_salary(
            Decimal::from(100_000),
            Decimal::from(10),
            Decimal::from(5),
        )
        .unwrap();
        assert_eq!(result, Decimal::from(115_500));
    }

    #[test]
    fn fractional_results_round_to_whole_units() {
        // 100000 x 1.0333 = 103330; 100001 x 1.015 = 101501.015 -> 101501
        let result = final_salary(
            Decimal::from(100_001),
            Decimal::new(15, 1), // 1.5%
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(result, Decimal::from(101_501));
    }

    #[test]
    fn zero_percentages_keep_the_previous_salary() {
        let result = final_salary(Decimal::from(84_000), Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(result, Decimal::from(84_000));
    }

    #[test]
    fn nonsense_percentages_are_rejected() {
        assert!(final_salary(Decimal::from(100), Decimal::from(-150), Decimal::ZERO).is_err());
        assert!(final_salary(Decimal::from(-1), Decimal::ZERO, Decimal::ZERO).is_err());
    }

    #[test]
    fn components_resum_to_the_final_salary() {
        let final_pay = Decimal::from(115_500);
        let split = components(final_pay);

        assert_eq!(split.basic, Decimal::from(46_200));
        assert_eq!(split.hra, Decimal::from(23_100));
        assert_eq!(split.pf, Decimal::new(554400, 2)); // 5544.00
        assert_eq!(split.gratuity, Decimal::new(222222, 2)); // 2222.22
        let total = split.basic + split.hra + split.pf + split.gratuity + split.special_allowance;
        assert_eq!(total, final_pay);
    }

    #[test]
    fn remainder_absorbs_rounding() {
        // A figure whose 4.81% gratuity does not land on a clean cent.
        let final_pay = Decimal::new(9999901, 2); // 99999.01
        let split = components(final_pay);
        let total = split.basic + split.hra + split.pf + split.gratuity + split.special_allowance;
        assert_eq!(total, final_pay);
    }
}
