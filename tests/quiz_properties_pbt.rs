//! Property-based checks for the response model, estimator, selector,
//! stopping rule and calibrator.

use std::collections::HashSet;

use proptest::prelude::*;

use danci_quiz_engine::quiz::decision::{select_next_question, should_continue_quiz};
use danci_quiz_engine::quiz::modeling::{
    confidence_from_information, estimate_ability, item_information, response_probability,
    update_question_parameters,
};
use danci_quiz_engine::quiz::types::{
    AbilityEstimate, CandidateItem, ItemParameters, ResponseRecord,
};

// ============================================================================
// Strategies
// ============================================================================

fn item_params_strategy() -> impl Strategy<Value = ItemParameters> {
    (-3.0f64..3.0, 0.2f64..2.5, 0.0f64..0.5).prop_map(|(difficulty, discrimination, guessing)| {
        ItemParameters {
            difficulty,
            discrimination,
            guessing,
        }
    })
}

fn responses_strategy() -> impl Strategy<Value = Vec<ResponseRecord>> {
    prop::collection::vec(
        (-3.0f64..3.0, 0.5f64..2.0, 0.0f64..0.35, any::<bool>()),
        1..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (difficulty, discrimination, guessing, correct))| {
                ResponseRecord::new(
                    format!("r{i}"),
                    correct,
                    ItemParameters {
                        difficulty,
                        discrimination,
                        guessing,
                    },
                )
            })
            .collect()
    })
}

fn ability_at(theta: f64, confidence: f64) -> AbilityEstimate {
    AbilityEstimate {
        theta,
        confidence,
        test_information: 0.0,
        history: Vec::new(),
    }
}

// ============================================================================
// Item response model
// ============================================================================

proptest! {
    #[test]
    fn prop_probability_increasing_and_above_floor(
        params in item_params_strategy(),
        theta in -4.0f64..3.5,
        delta in 0.01f64..0.5,
    ) {
        let low = response_probability(theta, &params).unwrap();
        let high = response_probability(theta + delta, &params).unwrap();

        prop_assert!(low > params.guessing && low < 1.0, "p={} c={}", low, params.guessing);
        prop_assert!(high > params.guessing && high < 1.0);
        prop_assert!(high > low, "p({})={} p({})={}", theta, low, theta + delta, high);
    }

    #[test]
    fn prop_information_non_negative(
        params in item_params_strategy(),
        theta in -10.0f64..10.0,
    ) {
        let info = item_information(theta, &params).unwrap();
        prop_assert!(info.is_finite());
        prop_assert!(info >= 0.0);
    }

    #[test]
    fn prop_information_peaks_near_difficulty(
        params in item_params_strategy(),
        theta in -6.0f64..6.0,
    ) {
        let c = params.guessing;
        let peak = params.difficulty
            + ((1.0 + (1.0 + 8.0 * c).sqrt()) / 2.0).ln() / params.discrimination;
        let at_peak = item_information(peak, &params).unwrap();
        let elsewhere = item_information(theta, &params).unwrap();
        prop_assert!(at_peak + 1e-9 >= elsewhere, "peak {} < {}", at_peak, elsewhere);
    }
}

// ============================================================================
// Ability estimator
// ============================================================================

proptest! {
    #[test]
    fn prop_estimate_deterministic_and_bounded(responses in responses_strategy()) {
        let first = estimate_ability(&responses).unwrap();
        let second = estimate_ability(&responses).unwrap();

        prop_assert_eq!(first.theta.to_bits(), second.theta.to_bits());
        prop_assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
        prop_assert!(first.theta >= -4.0 && first.theta <= 4.0);
        prop_assert!(first.confidence >= 0.0 && first.confidence < 1.0);
        prop_assert_eq!(first.history.len(), responses.len());
    }

    #[test]
    fn prop_correct_response_never_lowers_theta(
        responses in responses_strategy(),
        difficulty in -3.0f64..3.0,
        discrimination in 0.5f64..2.0,
        guessing in 0.0f64..0.35,
    ) {
        let params = ItemParameters { difficulty, discrimination, guessing };
        let before = estimate_ability(&responses).unwrap().theta;

        let mut with_correct = responses.clone();
        with_correct.push(ResponseRecord::new("extra", true, params));
        let after = estimate_ability(&with_correct).unwrap().theta;

        prop_assert!(after >= before - 1e-3, "before={} after={}", before, after);
    }

    #[test]
    fn prop_incorrect_response_never_raises_theta(
        responses in responses_strategy(),
        difficulty in -3.0f64..3.0,
        discrimination in 0.5f64..2.0,
        guessing in 0.0f64..0.35,
    ) {
        let params = ItemParameters { difficulty, discrimination, guessing };
        let before = estimate_ability(&responses).unwrap().theta;

        let mut with_incorrect = responses.clone();
        with_incorrect.push(ResponseRecord::new("extra", false, params));
        let after = estimate_ability(&with_incorrect).unwrap().theta;

        prop_assert!(after <= before + 1e-3, "before={} after={}", before, after);
    }

    #[test]
    fn prop_confidence_in_unit_interval(info in 0.0f64..1e9) {
        let confidence = confidence_from_information(info);
        prop_assert!((0.0..1.0).contains(&confidence));
    }
}

// ============================================================================
// Item selector
// ============================================================================

proptest! {
    #[test]
    fn prop_selector_skips_answered_items(
        pool in prop::collection::vec((item_params_strategy(), any::<bool>()), 0..25),
        theta in -4.0f64..4.0,
    ) {
        let items: Vec<CandidateItem> = pool
            .iter()
            .enumerate()
            .map(|(i, (params, _))| CandidateItem::new(format!("item-{i}"), *params))
            .collect();
        let answered: HashSet<String> = pool
            .iter()
            .enumerate()
            .filter(|(_, (_, done))| *done)
            .map(|(i, _)| format!("item-{i}"))
            .collect();

        let selected = select_next_question(&items, &ability_at(theta, 0.0), &answered).unwrap();
        let remaining = items.len() - answered.len();

        match selected {
            Some(item) => {
                prop_assert!(!answered.contains(&item.id));
                let best = item_information(theta, &item.params).unwrap();
                for other in items.iter().filter(|i| !answered.contains(&i.id)) {
                    prop_assert!(item_information(theta, &other.params).unwrap() <= best);
                }
            }
            None => prop_assert_eq!(remaining, 0),
        }
    }
}

// ============================================================================
// Stopping rule
// ============================================================================

proptest! {
    #[test]
    fn prop_stopping_bounds(
        theta in -4.0f64..4.0,
        confidence in 0.0f64..1.0,
        threshold in 0.0f64..1.0,
        answered in 0u32..40,
    ) {
        let ability = ability_at(theta, confidence);
        let keep_going = should_continue_quiz(&ability, answered, threshold);

        if answered >= 20 {
            prop_assert!(!keep_going);
        } else if answered < 5 {
            prop_assert!(keep_going);
        } else {
            prop_assert_eq!(keep_going, confidence < threshold);
        }
    }
}

// ============================================================================
// Parameter calibrator
// ============================================================================

proptest! {
    #[test]
    fn prop_calibration_output_valid(
        params in item_params_strategy(),
        correct in any::<bool>(),
        response_time in prop_oneof![
            0.01f64..600.0,
            Just(0.0),
            Just(-1.0),
            Just(f64::NAN),
        ],
    ) {
        let updated = update_question_parameters("p", correct, response_time, &params).unwrap();

        prop_assert!(updated.validate().is_ok());
        prop_assert!(updated.difficulty >= -4.0 && updated.difficulty <= 4.0);
        prop_assert!(updated.discrimination >= 0.1 && updated.discrimination <= 4.0);
        prop_assert_eq!(updated.guessing, params.guessing);
        // Correct answers only ever make the item easier.
        if correct {
            prop_assert!(updated.difficulty <= params.difficulty);
        } else {
            prop_assert!(updated.difficulty >= params.difficulty);
        }
    }
}
