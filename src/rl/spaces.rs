use rand::Rng;

/// A box in R^n described by per-component lower and upper bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace {
    low: Vec<f32>,
    high: Vec<f32>,
}

impl BoxSpace {
    /// # Panics
    ///
    /// Panics if `low` and `high` have different lengths.
    #[must_use]
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(
            low.len(),
            high.len(),
            "low and high bounds must have the same length"
        );
        Self { low, high }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.low.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low.is_empty()
    }

    #[must_use]
    pub fn low(&self) -> &[f32] {
        &self.low
    }

    #[must_use]
    pub fn high(&self) -> &[f32] {
        &self.high
    }

    /// Draws a vector uniformly from the box.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(&lo, &hi)| rng.gen_range(lo..=hi))
            .collect()
    }

    /// Whether every component of `point` lies within the bounds.
    #[must_use]
    pub fn contains(&self, point: &[f32]) -> bool {
        point.len() == self.len()
            && point
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(&v, (&lo, &hi))| v >= lo && v <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_stays_within_bounds() {
        let space = BoxSpace::new(vec![-1.0], vec![1.0]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let action = space.sample(&mut rng);
            assert_eq!(action.len(), 1);
            assert!(space.contains(&action));
        }
    }

    #[test]
    fn contains_rejects_wrong_lengths_and_out_of_range() {
        let space = BoxSpace::new(vec![-1.0], vec![1.0]);
        assert!(!space.contains(&[]));
        assert!(!space.contains(&[0.0, 0.0]));
        assert!(!space.contains(&[1.5]));
        assert!(space.contains(&[1.0]));
    }
}
