//! Perfection test by trial division
//!
//! Divisors are paired: every `d <= sqrt(n)` that divides `n` contributes both
//! `d` and its cofactor `n / d`, so the loop only has to run up to the square
//! root. This is the hot path of the whole search.

/// Returns true when `value` equals the sum of its proper divisors.
///
/// `max_divisor` must be `floor(sqrt(value))`; see
/// [`max_divisor`](super::position::max_divisor).
pub fn is_perfect(value: u32, max_divisor: u16) -> bool {
    if value < 2 {
        return false;
    }

    let target = u64::from(value);
    let mut sum: u64 = 1;

    for divisor in 2..=u32::from(max_divisor) {
        if value % divisor == 0 {
            sum += u64::from(divisor);
            let cofactor = value / divisor;
            if cofactor != divisor {
                sum += u64::from(cofactor);
            }
            // The sum only grows from here.
            if sum > target {
                return false;
            }
        }
    }

    sum == target
}

/// Sum of the proper divisors of `value` (aliquot sum).
pub fn divisor_sum(value: u32) -> u64 {
    if value < 2 {
        return 0;
    }

    let max_divisor = u32::from(super::position::max_divisor(value));
    let mut sum: u64 = 1;
    for divisor in 2..=max_divisor {
        if value % divisor == 0 {
            sum += u64::from(divisor);
            let cofactor = value / divisor;
            if cofactor != divisor {
                sum += u64::from(cofactor);
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::position::max_divisor;

    #[test]
    fn test_known_perfect_numbers() {
        assert!(is_perfect(6, 2));
        assert!(is_perfect(28, 5));
        assert!(is_perfect(496, max_divisor(496)));
        assert!(is_perfect(8128, max_divisor(8128)));
        assert!(is_perfect(33_550_336, max_divisor(33_550_336)));
    }

    #[test]
    fn test_non_perfect_numbers() {
        assert!(!is_perfect(12, 3));
        assert!(!is_perfect(4, 2));
        assert!(!is_perfect(27, 5));
        assert!(!is_perfect(1, 1));
        assert!(!is_perfect(0, 0));
    }

    #[test]
    fn test_square_root_divisor_counted_once() {
        // 1 + 3 = 4, counting 3 twice would give 7
        assert!(!is_perfect(9, 3));
        assert_eq!(divisor_sum(9), 4);
        assert_eq!(divisor_sum(16), 1 + 2 + 4 + 8);
    }

    #[test]
    fn test_divisor_sum_matches_definition() {
        for value in 2..500u32 {
            let naive: u64 = (1..value)
                .filter(|d| value % d == 0)
                .map(u64::from)
                .sum();
            assert_eq!(divisor_sum(value), naive, "value {value}");
        }
    }

    #[test]
    fn test_near_u32_max_does_not_overflow() {
        // 2^32 - 2 = 2 * (2^31 - 1), a Mersenne prime
        let value = 0xFFFF_FFFE;
        assert!(!is_perfect(value, max_divisor(value)));
        assert_eq!(divisor_sum(value), (1u64 << 31) + 2);

        // 2^32 - 16 = 2^4 * 3 * 5 * 29 * 43 * 113 * 127 is heavily abundant
        let abundant = 0xFFFF_FFF0;
        assert!(!is_perfect(abundant, max_divisor(abundant)));
        assert_eq!(divisor_sum(abundant), 10_035_544_080);
        assert!(!is_perfect(u32::MAX, max_divisor(u32::MAX)));
    }
}
