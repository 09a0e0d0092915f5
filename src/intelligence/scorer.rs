/// Scoring algorithms for the suggestion engine
///
/// Term weighting, vector similarity and transition probabilities.

/// A sparse vector: `(term index, weight)` pairs sorted by term index
pub type SparseVector = Vec<(usize, f64)>;

/// Scorer for calculating weights and similarity scores
pub struct Scorer;

impl Scorer {
    /// Smoothed inverse document frequency
    ///
    /// # Arguments
    /// * `n_documents` - Number of documents in the corpus
    /// * `document_frequency` - Number of documents containing the term
    ///
    /// # Returns
    /// * `ln((1 + n) / (1 + df)) + 1`, always >= 1.0
    pub fn smooth_idf(n_documents: usize, document_frequency: usize) -> f64 {
        ((1.0 + n_documents as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
    }

    /// Scale a sparse vector to unit length in place
    ///
    /// A zero vector stays zero.
    pub fn l2_normalize(vector: &mut SparseVector) {
        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > f64::EPSILON {
            for (_, w) in vector.iter_mut() {
                *w /= norm;
            }
        }
    }

    /// Cosine similarity of two sparse vectors
    ///
    /// Weights are non-negative, so the result lies in [0, 1]. Any zero
    /// vector scores 0 against everything, including itself.
    pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
        let norm_a = a.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        let norm_b = b.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
            return 0.0;
        }

        (Self::dot(a, b) / (norm_a * norm_b)).clamp(0.0, 1.0)
    }

    /// Dot product by merging the two sorted index lists
    fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }

    /// Empirical transition probability
    ///
    /// # Arguments
    /// * `count` - Times the transition was observed
    /// * `total` - All outgoing transitions from the source state
    pub fn transition_probability(count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }

        (count as f64 / total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smooth_idf() {
        // A term present in every document still keeps weight 1.0
        assert_eq!(Scorer::smooth_idf(4, 4), 1.0);
        assert!(Scorer::smooth_idf(4, 1) > Scorer::smooth_idf(4, 2));
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![(0, 3.0), (2, 4.0)];
        Scorer::l2_normalize(&mut v);
        assert!((v[0].1 - 0.6).abs() < 1e-12);
        assert!((v[1].1 - 0.8).abs() < 1e-12);

        let mut zero: SparseVector = Vec::new();
        Scorer::l2_normalize(&mut zero);
        assert!(zero.is_empty());
    }

    #[test]
    fn test_cosine() {
        let a = vec![(0, 1.0), (1, 1.0)];
        let b = vec![(1, 1.0), (2, 1.0)];
        let c = vec![(3, 1.0)];

        assert!((Scorer::cosine(&a, &a) - 1.0).abs() < 1e-12);
        assert!((Scorer::cosine(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(Scorer::cosine(&a, &c), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![(0, 1.0)];
        let zero: SparseVector = Vec::new();

        let score = Scorer::cosine(&a, &zero);
        assert_eq!(score, 0.0);
        assert!(!Scorer::cosine(&zero, &zero).is_nan());
    }

    #[test]
    fn test_transition_probability() {
        assert_eq!(Scorer::transition_probability(1, 2), 0.5);
        assert_eq!(Scorer::transition_probability(2, 2), 1.0);
        assert_eq!(Scorer::transition_probability(0, 0), 0.0);
    }
}
