pub mod calibration;
pub mod estimator;
pub mod irt;

pub use calibration::{update_question_parameters, ParameterCalibrator};
pub use estimator::{confidence_from_information, estimate_ability, AbilityEstimator};
pub use irt::{item_information, response_probability};
