//! Tax rate slabs

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Permitted tax rates in percent, ascending (value, scale)
const SLABS: &[(i64, u32)] = &[
    (0, 0),
    (1, 1),   // 0.1
    (25, 2),  // 0.25
    (1, 0),
    (15, 1),  // 1.5
    (3, 0),
    (5, 0),
    (6, 0),
    (75, 1),  // 7.5
    (12, 0),
    (18, 0),
    (28, 0),
    (40, 0),
];

/// All slabs, ascending
pub fn slabs() -> impl Iterator<Item = Decimal> {
    SLABS.iter().map(|(v, s)| Decimal::new(*v, *s))
}

/// True when `rate` is a whole-rate slab
pub fn is_slab(rate: Decimal) -> bool {
    slabs().any(|s| s == rate)
}

/// True when `rate` is half of a slab, as carried by each same-state
/// category (CGST, SGST) of a split line
pub fn is_half_slab(rate: Decimal) -> bool {
    slabs().any(|s| s / Decimal::TWO == rate)
}

/// Nearest slab by absolute difference; ties go to the lower slab
pub fn snap_to_slab(rate: Decimal) -> Decimal {
    let mut best = Decimal::ZERO;
    let mut best_diff: Option<Decimal> = None;
    for slab in slabs() {
        let diff = (slab - rate).abs();
        if best_diff.map_or(true, |d| diff < d) {
            best = slab;
            best_diff = Some(diff);
        }
    }
    best
}

/// Line sequence number used by the return format: `round(rate × 100) + 1`
pub fn item_number(rate: Decimal) -> u32 {
    (rate * Decimal::ONE_HUNDRED).round().to_u32().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_slab_membership() {
        assert!(is_slab(d("18")));
        assert!(is_slab(d("0.25")));
        assert!(is_slab(d("18.00")));
        assert!(!is_slab(d("9")));
        assert!(is_half_slab(d("9")));
        assert!(is_half_slab(d("2.5")));
        assert!(!is_half_slab(d("4")));
    }

    #[test]
    fn test_snap_to_nearest() {
        assert_eq!(snap_to_slab(d("17.96")), d("18"));
        assert_eq!(snap_to_slab(d("11.2")), d("12"));
        assert_eq!(snap_to_slab(d("0.3")), d("0.25"));
        assert_eq!(snap_to_slab(d("55")), d("40"));
    }

    #[test]
    fn test_snap_tie_goes_to_first_slab() {
        // 23 is 5 away from both 18 and 28
        assert_eq!(snap_to_slab(d("23")), d("18"));
    }

    #[test]
    fn test_item_number() {
        assert_eq!(item_number(d("18")), 1801);
        assert_eq!(item_number(d("0.25")), 26);
        assert_eq!(item_number(d("0")), 1);
        assert_eq!(item_number(d("7.5")), 751);
    }
}
