use crate::config::Dequantization;
use crate::error::ShapeMismatchError;
use crate::image_classifier::interface::ScoreVector;

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub probabilities: Vec<f32>,
    pub index: usize,
    pub probability: f32,
}

/// Maps raw scores onto real-valued pre-softmax scores. The mapping is monotonic.
pub fn dequantize(scores: &ScoreVector, mode: Dequantization) -> Vec<f32> {
    match scores {
        ScoreVector::Quantized { values, params } => match (mode, params) {
            (Dequantization::ModelParams, Some((zero_point, scale))) => values
                .iter()
                .map(|&q| (q as i32 - zero_point) as f32 * scale)
                .collect(),
            _ => values.iter().map(|&q| q as f32 / 255.0).collect(),
        },
        ScoreVector::Float(values) => values.clone(),
    }
}

/// Softmax with the maximum subtracted first so large inputs stay finite.
pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&e| e / sum).collect()
}

/// Index of the maximum value. Ties go to the lowest index.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best
}

pub fn decode(
    scores: &ScoreVector,
    label_count: usize,
    mode: Dequantization,
) -> Result<Decoded, ShapeMismatchError> {
    if scores.is_empty() {
        return Err(ShapeMismatchError::Empty);
    }

    if scores.len() != label_count {
        return Err(ShapeMismatchError::Length {
            scores: scores.len(),
            labels: label_count,
        });
    }

    let values = dequantize(scores, mode);

    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ShapeMismatchError::NonFinite { index });
    }

    let probabilities = softmax(&values);

    let (index, probability) = argmax(&probabilities).ok_or(ShapeMismatchError::Empty)?;

    if index >= label_count {
        return Err(ShapeMismatchError::Index {
            index,
            labels: label_count,
        });
    }

    Ok(Decoded {
        probabilities,
        index,
        probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(values: &[f32]) -> f32 {
        values.iter().sum()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probabilities = softmax(&[0.1, 2.5, -3.0, 0.7]);

        assert!((sum(&probabilities) - 1.0).abs() < 1e-6);
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_softmax_equal_values_is_uniform() {
        let probabilities = softmax(&[0.4; 5]);

        assert!((sum(&probabilities) - 1.0).abs() < 1e-6);
        for p in probabilities {
            assert!((p - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_dominant_outlier() {
        let probabilities = softmax(&[0.0, 1000.0, 0.0, 0.0]);

        assert!((sum(&probabilities) - 1.0).abs() < 1e-6);
        assert!(probabilities[1] > 0.999_999);
    }

    #[test]
    fn test_softmax_large_magnitudes_stay_finite() {
        let probabilities = softmax(&[1e30, 1e30, -1e30]);

        assert!(probabilities.iter().all(|p| p.is_finite()));
        assert!((sum(&probabilities) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_argmax_tie_picks_lowest_index() {
        assert_eq!(argmax(&[5.0, 5.0, 3.0]).map(|(i, _)| i), Some(0));
        assert_eq!(argmax(&[1.0, 7.0, 7.0]).map(|(i, _)| i), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_decode_tied_scores() {
        let decoded = decode(
            &ScoreVector::quantized(vec![5, 5, 3]),
            3,
            Dequantization::Linear255,
        )
        .unwrap();

        assert_eq!(decoded.index, 0);
        assert!((sum(&decoded.probabilities) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dequantize_linear() {
        let values = dequantize(
            &ScoreVector::quantized(vec![0, 51, 255]),
            Dequantization::Linear255,
        );

        assert_eq!(values, vec![0.0, 0.2, 1.0]);
    }

    #[test]
    fn test_dequantize_model_params() {
        let scores = ScoreVector::Quantized {
            values: vec![10, 20],
            params: Some((10, 0.5)),
        };

        assert_eq!(
            dequantize(&scores, Dequantization::ModelParams),
            vec![0.0, 5.0]
        );
        assert_eq!(
            dequantize(&scores, Dequantization::Linear255),
            vec![10.0 / 255.0, 20.0 / 255.0]
        );
    }

    #[test]
    fn test_dequantize_model_params_without_declared_params() {
        let values = dequantize(
            &ScoreVector::quantized(vec![255]),
            Dequantization::ModelParams,
        );

        assert_eq!(values, vec![1.0]);
    }

    #[test]
    fn test_decode_float_scores() {
        let decoded = decode(
            &ScoreVector::Float(vec![-1.0, 4.0]),
            2,
            Dequantization::Linear255,
        )
        .unwrap();

        assert_eq!(decoded.index, 1);
        assert!(decoded.probability > 0.99);
    }

    #[test]
    fn test_decode_length_mismatch() {
        let result = decode(
            &ScoreVector::quantized(vec![1, 2, 3]),
            2,
            Dequantization::Linear255,
        );

        assert_eq!(
            result,
            Err(ShapeMismatchError::Length {
                scores: 3,
                labels: 2
            })
        );
    }

    #[test]
    fn test_decode_empty() {
        let result = decode(&ScoreVector::quantized(vec![]), 0, Dequantization::Linear255);

        assert_eq!(result, Err(ShapeMismatchError::Empty));
    }

    #[test]
    fn test_decode_rejects_non_finite_scores() {
        let decode_float = |values: Vec<f32>| {
            decode(&ScoreVector::Float(values), 2, Dequantization::Linear255)
        };

        assert_eq!(
            decode_float(vec![f32::INFINITY, 0.0]),
            Err(ShapeMismatchError::NonFinite { index: 0 })
        );
        assert_eq!(
            decode_float(vec![f32::NEG_INFINITY, f32::NEG_INFINITY]),
            Err(ShapeMismatchError::NonFinite { index: 0 })
        );
        assert_eq!(
            decode_float(vec![0.5, f32::NAN]),
            Err(ShapeMismatchError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_decode_finite_extremes_stay_finite() {
        let decoded = decode(
            &ScoreVector::Float(vec![f32::MAX, f32::MIN]),
            2,
            Dequantization::Linear255,
        )
        .unwrap();

        assert_eq!(decoded.index, 0);
        assert!(decoded.probabilities.iter().all(|p| p.is_finite()));
        assert!((sum(&decoded.probabilities) - 1.0).abs() < 1e-6);
    }
}
