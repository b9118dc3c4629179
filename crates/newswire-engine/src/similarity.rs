//! Cosine similarity on the remapped [0, 1] scale.
//!
//! Every threshold in the engine (classification, threading) is expressed on
//! the remapped scale `0.5 + 0.5 × cos`, so orthogonal vectors score 0.5 and
//! identical vectors score 1.0. A vector with zero magnitude scores 0 against
//! anything, which keeps empty documents below every threshold.

use crate::tfidf::WeightVector;

/// Plain cosine similarity in [-1, 1], or 0 if either magnitude is zero.
#[must_use]
pub fn raw_cosine(a: &WeightVector, b: &WeightVector) -> f64 {
    let mag_a = a.magnitude();
    let mag_b = b.magnitude();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    a.dot(b) / (mag_a * mag_b)
}

/// Maps a cosine from [-1, 1] onto [0, 1].
#[must_use]
pub fn remap(cos: f64) -> f64 {
    0.5 + 0.5 * cos
}

/// Remapped cosine similarity.
///
/// # Returns
///
/// 0 if either vector has zero magnitude, otherwise `0.5 + 0.5 × cos`.
#[must_use]
pub fn cosine(a: &WeightVector, b: &WeightVector) -> f64 {
    if a.magnitude() == 0.0 || b.magnitude() == 0.0 {
        return 0.0;
    }
    remap(raw_cosine(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(pairs: &[(&str, f64)]) -> WeightVector {
        pairs.iter().map(|(t, w)| ((*t).to_string(), *w)).collect()
    }

    #[test]
    fn self_similarity_is_one() {
        let v = vector(&[("goal", 0.4), ("match", 0.2), ("team", 0.9)]);
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_scores_zero() {
        let v = vector(&[("goal", 0.4)]);
        let empty = WeightVector::new();

        assert_eq!(cosine(&empty, &empty), 0.0);
        assert_eq!(cosine(&v, &empty), 0.0);
        assert_eq!(cosine(&empty, &v), 0.0);
    }

    #[test]
    fn disjoint_vectors_score_half() {
        let a = vector(&[("goal", 1.0)]);
        let b = vector(&[("vote", 1.0)]);

        assert_eq!(raw_cosine(&a, &b), 0.0);
        assert!((cosine(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn symmetric() {
        let a = vector(&[("goal", 0.3), ("match", 0.5), ("vote", 0.1)]);
        let b = vector(&[("match", 0.2), ("team", 0.7), ("vote", 0.6)]);
        assert_eq!(cosine(&a, &b), cosine(&b, &a));
    }

    #[test]
    fn missing_terms_count_as_zero() {
        // a = (1, 1, 0), b = (1, 0, 1) over {x, y, z}: cos = 1/2
        let a = vector(&[("x", 1.0), ("y", 1.0)]);
        let b = vector(&[("x", 1.0), ("z", 1.0)]);

        assert!((raw_cosine(&a, &b) - 0.5).abs() < 1e-12);
        assert!((cosine(&a, &b) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn remap_bounds() {
        assert_eq!(remap(-1.0), 0.0);
        assert_eq!(remap(0.0), 0.5);
        assert_eq!(remap(1.0), 1.0);
    }
}
