use analysis_core::MarginOfSafety;

/// price / conservative value. Undefined when either side is non-positive or unknown.
pub fn mos_ratio(price: f64, conservative: f64) -> Option<f64> {
    if !price.is_finite() || !conservative.is_finite() || price <= 0.0 || conservative <= 0.0 {
        return None;
    }
    Some(price / conservative)
}

/// Gate a price against the conservative value. A ratio equal to `required`
/// still counts as having a margin of safety.
pub fn evaluate(price: Option<f64>, conservative: f64, required: f64) -> Option<MarginOfSafety> {
    let ratio = mos_ratio(price?, conservative)?;
    Some(MarginOfSafety {
        ratio,
        has_margin: ratio <= required,
        buy_below_price: conservative * required,
        required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_margin_of_safety_gate() {
        let mos = evaluate(Some(60.0), 100.0, 0.70).unwrap();
        assert_relative_eq!(mos.ratio, 0.60);
        assert!(mos.has_margin);
        assert_relative_eq!(mos.buy_below_price, 70.0, epsilon = 1e-9);

        let mos = evaluate(Some(100.0), 120.0, 0.70).unwrap();
        assert_relative_eq!(mos.ratio, 0.8333, epsilon = 1e-4);
        assert!(!mos.has_margin);
        assert_relative_eq!(mos.buy_below_price, 84.0, epsilon = 1e-9);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let mos = evaluate(Some(84.0), 120.0, 0.70).unwrap();
        assert!(mos.has_margin);
    }

    #[test]
    fn test_undefined_inputs() {
        assert!(evaluate(None, 100.0, 0.70).is_none());
        assert!(evaluate(Some(50.0), 0.0, 0.70).is_none());
        assert!(evaluate(Some(50.0), -10.0, 0.70).is_none());
        assert!(mos_ratio(0.0, 100.0).is_none());
    }

    #[test]
    fn test_ratio_is_monotonic() {
        let cheaper = mos_ratio(50.0, 100.0).unwrap();
        let pricier = mos_ratio(60.0, 100.0).unwrap();
        let more_value = mos_ratio(60.0, 120.0).unwrap();
        assert!(cheaper < pricier);
        assert!(more_value < pricier);
    }
}
