//! Human-readable balance figures ("1,234.5 (37% staked)").

use govdash_types::TokenBalance;
use num_bigint::BigUint;

use crate::pair::BalancePair;

/// Decimal-adjust `amount` by `decimals`, round half-up to `precision`
/// fractional digits and group the integer part with commas.
pub fn format_amount(amount: &TokenBalance, decimals: u32, precision: u32) -> String {
    let ten = BigUint::from(10u32);
    let unit = ten.pow(precision);
    let divisor = ten.pow(decimals);

    let half = &divisor / 2u32;
    let scaled = (amount.raw() * &unit + half) / &divisor;
    let whole = commify(&(&scaled / &unit).to_string());

    if precision == 0 {
        whole
    } else {
        let frac = (&scaled % &unit).to_string();
        format!("{whole}.{frac:0>width$}", width = precision as usize)
    }
}

/// The pair's staked share as a whole percent, e.g. `"37%"`.
pub fn format_percent(pair: &BalancePair) -> String {
    format!("{:.0}%", pair.display_percent())
}

fn commify(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(commify("1"), "1");
        assert_eq!(commify("123"), "123");
        assert_eq!(commify("1234"), "1,234");
        assert_eq!(commify("1234567"), "1,234,567");
    }

    #[test]
    fn four_decimal_token_to_one_place() {
        let amount = TokenBalance::from(12_345_678u64);
        assert_eq!(format_amount(&amount, 4, 1), "1,234.6");
        assert_eq!(format_amount(&TokenBalance::zero(), 4, 1), "0.0");
        assert_eq!(format_amount(&TokenBalance::from(49u64), 4, 1), "0.0");
        assert_eq!(format_amount(&TokenBalance::from(500u64), 4, 1), "0.1");
    }

    #[test]
    fn precision_wider_than_decimals_pads() {
        assert_eq!(format_amount(&TokenBalance::from(15u64), 1, 3), "1.500");
        assert_eq!(format_amount(&TokenBalance::from(1_000u64), 0, 0), "1,000");
    }

    #[test]
    fn percent_rounds_to_whole() {
        let pair = BalancePair::loaded(TokenBalance::from(2u64), TokenBalance::from(1u64));
        assert_eq!(format_percent(&pair), "33%");
        assert_eq!(format_percent(&BalancePair::absent()), "0%");
    }
}
