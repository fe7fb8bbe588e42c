//! Sale admissibility.
//!
//! A sale of `s` units against a product holding `q` units with a minimum of
//! `m` is admitted only when `q > s` and `q > m`. The second check looks at the
//! stock before the sale, so an admitted sale may still leave the product at or
//! below its minimum.

use crate::models::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted { remaining: i32 },
    InsufficientStock,
}

pub fn evaluate(quantity: i32, minimum_allowed: i32, requested: i32) -> Admission {
    if quantity > requested && quantity > minimum_allowed {
        Admission::Admitted { remaining: quantity - requested }
    } else {
        Admission::InsufficientStock
    }
}

pub fn evaluate_product(product: &Product, requested: i32) -> Admission {
    evaluate(product.quantity, product.minimum_allowed, requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_when_stock_exceeds_request_and_minimum() {
        assert_eq!(evaluate(10, 5, 3), Admission::Admitted { remaining: 7 });
    }

    #[test]
    fn rejects_requests_not_strictly_below_stock() {
        assert_eq!(evaluate(10, 5, 20), Admission::InsufficientStock);
        assert_eq!(evaluate(10, 5, 10), Admission::InsufficientStock);
    }

    #[test]
    fn rejects_any_request_once_stock_is_at_or_below_minimum() {
        for requested in [1, 2, 3, 100] {
            assert_eq!(evaluate(4, 5, requested), Admission::InsufficientStock);
            assert_eq!(evaluate(5, 5, requested), Admission::InsufficientStock);
        }
    }

    #[test]
    fn may_cross_the_minimum_in_one_sale() {
        // 6 > 5 holds before the sale; the sale leaves 1 unit.
        assert_eq!(evaluate(6, 5, 5), Admission::Admitted { remaining: 1 });
    }

    #[test]
    fn admissibility_matches_the_inequalities() {
        for q in 0..12 {
            for m in 0..12 {
                for s in 1..12 {
                    let admitted = matches!(evaluate(q, m, s), Admission::Admitted { .. });
                    assert_eq!(admitted, q > s && q > m, "q={q} m={m} s={s}");
                }
            }
        }
    }
}
