//! Decoding when the step used for hiding is not known for sure.
//!
//! The configured step is tried first, then a ladder of candidate steps until
//! one of them produces a plausible text.

use log::{debug, info, warn};

use crate::decoder::decode_with;
use crate::media::Carrier;
use crate::message::is_plausible;
use crate::params::EmbeddingParams;
use crate::transform::TransformAdapter;

/// candidates closer than this to the initial step would only repeat the first attempt
pub const SAME_STEP_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackState {
    TryInitial,
    TryCandidate(usize),
    Accepted { text: String, step: f64 },
    Exhausted,
}

/// Outcome of a fallback decode
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    pub text: String,
    /// the step that produced `text`
    pub step: f64,
    /// `text` passed the plausibility check
    pub accepted: bool,
}

/// Decodes with `initial` and falls back to `candidate_steps`, never fails.
///
/// If no step yields a plausible text, the result of the initial step is returned as is.
pub fn recover<A: TransformAdapter>(
    carrier: &Carrier,
    initial: &EmbeddingParams,
    adapter: &A,
    candidate_steps: &[f64],
) -> Recovery {
    let attempt = |step: f64| {
        let params = initial.clone().with_step(step);
        decode_with(carrier, &params, adapter, params.max_positions)
    };

    let initial_text = attempt(initial.step);
    let mut state = FallbackState::TryInitial;
    loop {
        state = match state {
            FallbackState::TryInitial if is_plausible(&initial_text) => FallbackState::Accepted {
                text: initial_text.clone(),
                step: initial.step,
            },
            FallbackState::TryInitial => {
                debug!("step {} yields nothing plausible, trying candidates", initial.step);
                FallbackState::TryCandidate(0)
            }
            FallbackState::TryCandidate(i) => match candidate_steps.get(i) {
                None => FallbackState::Exhausted,
                Some(step) if (step - initial.step).abs() < SAME_STEP_EPSILON => {
                    FallbackState::TryCandidate(i + 1)
                }
                Some(step) => {
                    let text = attempt(*step);
                    if is_plausible(&text) {
                        info!("recovered a plausible message with step {step}");
                        FallbackState::Accepted { text, step: *step }
                    } else {
                        FallbackState::TryCandidate(i + 1)
                    }
                }
            },
            FallbackState::Accepted { text, step } => {
                return Recovery {
                    text,
                    step,
                    accepted: true,
                };
            }
            FallbackState::Exhausted => {
                warn!("no step produced a plausible message");
                return Recovery {
                    text: initial_text,
                    step: initial.step,
                    accepted: false,
                };
            }
        };
    }
}

/// [`recover`] reduced to the text
pub fn decode_with_fallback<A: TransformAdapter>(
    carrier: &Carrier,
    initial: &EmbeddingParams,
    adapter: &A,
    candidate_steps: &[f64],
) -> String {
    recover(carrier, initial, adapter, candidate_steps).text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::media::{SampleRange, Shape};
    use crate::params::Variant;
    use crate::transform::Adapter;

    fn cover() -> Carrier {
        Carrier::from_fn(Shape::new(96, 96), SampleRange::IMAGE, |r, c| {
            100.0 + ((r * 11 + c * 17) % 53) as f64
        })
    }

    #[test]
    fn should_accept_the_initial_step() {
        let params = EmbeddingParams::for_variant(Variant::BlockDct);
        let stego = encode(&cover(), "Hello", &params).unwrap().rounded();
        let adapter = Adapter::for_params(&params);

        assert_eq!(
            recover(&stego, &params, &adapter, &params.candidate_steps),
            Recovery {
                text: "Hello".to_string(),
                step: 10.0,
                accepted: true
            }
        );
    }

    #[test]
    fn should_find_the_step_used_for_hiding() {
        let hidden_with = EmbeddingParams::for_variant(Variant::BlockDct).with_step(20.0);
        let stego = encode(&cover(), "Hello", &hidden_with).unwrap().rounded();

        let guess = hidden_with.clone().with_step(7.0);
        let adapter = Adapter::for_params(&guess);
        let recovery = recover(&stego, &guess, &adapter, &[3.0, 20.0, 25.0]);

        assert!(recovery.accepted);
        assert_eq!(recovery.text, "Hello");
        assert_eq!(recovery.step, 20.0);
        assert_eq!(
            decode_with_fallback(&stego, &guess, &adapter, &[3.0, 20.0, 25.0]),
            "Hello"
        );
    }

    #[test]
    fn should_fall_back_to_the_initial_result() {
        let flat = Carrier::from_fn(Shape::new(64, 64), SampleRange::IMAGE, |_, _| 128.0);
        let params = EmbeddingParams::for_variant(Variant::BlockDct);
        let recovery = recover(
            &flat,
            &params,
            &Adapter::for_params(&params),
            &params.candidate_steps,
        );

        assert_eq!(
            recovery,
            Recovery {
                text: String::new(),
                step: 10.0,
                accepted: false
            }
        );
    }
}
