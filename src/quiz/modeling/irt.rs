//! Three-parameter logistic (3PL) item response model.

use crate::quiz::error::QuizResult;
use crate::quiz::types::ItemParameters;

/// Logit bound; `exp(50)` is still finite and the 3PL curve is flat beyond it.
pub const MAX_LOGIT: f64 = 50.0;
pub const PROB_EPSILON: f64 = 1e-10;

#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp_x = x.exp();
        exp_x / (1.0 + exp_x)
    }
}

/// `P(theta) = c + (1 - c) / (1 + exp(-a (theta - b)))`.
pub fn response_probability(theta: f64, params: &ItemParameters) -> QuizResult<f64> {
    params.validate()?;
    Ok(probability_unchecked(theta, params))
}

/// Fisher information of the item at `theta`. Zero when `P` collapses onto `c`.
pub fn item_information(theta: f64, params: &ItemParameters) -> QuizResult<f64> {
    params.validate()?;
    Ok(information_unchecked(theta, params))
}

/// Caller guarantees `params` has been validated.
#[inline]
pub(crate) fn probability_unchecked(theta: f64, params: &ItemParameters) -> f64 {
    let z = (params.discrimination * (theta - params.difficulty)).clamp(-MAX_LOGIT, MAX_LOGIT);
    let p = params.guessing + (1.0 - params.guessing) * sigmoid(z);
    p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON)
}

#[inline]
pub(crate) fn information_unchecked(theta: f64, params: &ItemParameters) -> f64 {
    let c = params.guessing;
    let p = probability_unchecked(theta, params);
    let excess = p - c;
    if excess <= PROB_EPSILON {
        return 0.0;
    }
    let a = params.discrimination;
    let info = a * a * excess * excess * (1.0 - p) / ((1.0 - c) * (1.0 - c) * p);
    if info.is_finite() {
        info.max(0.0)
    } else {
        0.0
    }
}

/// First derivative of the log-likelihood of one observed response.
#[inline]
pub(crate) fn score_unchecked(theta: f64, params: &ItemParameters, correct: bool) -> f64 {
    let c = params.guessing;
    let p = probability_unchecked(theta, params);
    let y = if correct { 1.0 } else { 0.0 };
    params.discrimination * (y - p) * (p - c).max(0.0) / (p * (1.0 - c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::error::QuizError;

    fn item(difficulty: f64, discrimination: f64, guessing: f64) -> ItemParameters {
        ItemParameters {
            difficulty,
            discrimination,
            guessing,
        }
    }

    #[test]
    fn test_probability_range() {
        for theta in [-4.0, -1.0, 0.0, 1.0, 4.0] {
            for difficulty in [-3.0, 0.0, 3.0] {
                for discrimination in [0.5, 1.0, 2.5] {
                    for guessing in [0.0, 0.2, 0.25] {
                        let params = item(difficulty, discrimination, guessing);
                        let p = response_probability(theta, &params).unwrap();
                        assert!(
                            p > guessing && p < 1.0,
                            "p={p} theta={theta} params={params:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_probability_at_difficulty() {
        let params = item(1.0, 1.7, 0.2);
        let p = response_probability(1.0, &params).unwrap();
        assert!((p - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_higher_ability_higher_probability() {
        let params = item(0.0, 1.0, 0.25);
        let p1 = response_probability(0.0, &params).unwrap();
        let p2 = response_probability(1.0, &params).unwrap();
        assert!(p2 > p1);
    }

    #[test]
    fn test_extreme_logits_are_finite() {
        let params = item(0.0, 4.0, 0.0);
        for theta in [-1e6, -100.0, 100.0, 1e6] {
            let p = response_probability(theta, &params).unwrap();
            assert!(p.is_finite() && p > 0.0 && p < 1.0);
            let info = item_information(theta, &params).unwrap();
            assert!(info.is_finite() && info >= 0.0);
        }
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            response_probability(0.0, &item(0.0, 0.0, 0.2)),
            Err(QuizError::InvalidParameter { .. })
        ));
        assert!(response_probability(0.0, &item(0.0, 1.0, 1.0)).is_err());
        assert!(item_information(0.0, &item(0.0, -0.5, 0.0)).is_err());
    }

    #[test]
    fn test_information_peaks_near_difficulty_for_2pl() {
        let params = item(0.7, 1.3, 0.0);
        let at_b = item_information(0.7, &params).unwrap();
        // a^2 * 0.25 at theta == b
        assert!((at_b - 1.3 * 1.3 * 0.25).abs() < 1e-9);
        for offset in [0.5, 1.0, 2.0] {
            assert!(item_information(0.7 + offset, &params).unwrap() < at_b);
            assert!(item_information(0.7 - offset, &params).unwrap() < at_b);
        }
    }

    #[test]
    fn test_information_zero_when_probability_collapses_to_guessing() {
        let params = item(4.0, 4.0, 0.3);
        let info = item_information(-1e6, &params).unwrap();
        assert_eq!(info, 0.0);
    }

    #[test]
    fn test_score_sign_follows_response() {
        let params = item(0.0, 1.2, 0.2);
        assert!(score_unchecked(0.0, &params, true) > 0.0);
        assert!(score_unchecked(0.0, &params, false) < 0.0);
    }
}
