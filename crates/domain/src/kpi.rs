//! Derived packing figures. Always recomputed from the full child
//! collections, never stored.

use chrono::{DateTime, Utc};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Rounds to two decimals, the precision hours and kg are reported with
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Shrinkage: input weight not explained by output or discard.
///
/// Negative values mean operators over-recorded output; they are reported,
/// not rejected.
pub fn merma(input_kg: f64, output_kg: f64, discard_kg: f64) -> f64 {
    input_kg - output_kg - discard_kg
}

/// Whole-percent yield of boxed kg over input kg; 0 without input
pub fn efficiency(box_kg: f64, input_kg: f64) -> f64 {
    if input_kg <= 0.0 {
        return 0.0;
    }
    (box_kg / input_kg * 100.0).round()
}

pub fn total_kg<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    weights.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_merma_may_be_negative() {
        assert_eq!(merma(1000.0, 900.0, 50.0), 50.0);
        assert_eq!(merma(1000.0, 1100.0, 0.0), -100.0);
    }

    #[test]
    fn test_efficiency() {
        assert_eq!(efficiency(0.0, 0.0), 0.0);
        assert_eq!(efficiency(500.0, 0.0), 0.0);
        assert_eq!(efficiency(850.0, 1000.0), 85.0);
        assert_eq!(efficiency(2.0, 3.0), 67.0);
    }

    #[test]
    fn test_hours_between() {
        let t0 = Utc::now();
        assert_eq!(hours_between(t0, t0 + Duration::minutes(90)), 1.5);
        assert_eq!(round2(hours_between(t0, t0 + Duration::minutes(20))), 0.33);
    }
}
