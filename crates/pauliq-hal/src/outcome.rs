//! Classical-register outcomes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HalError;

/// Values of a classical register after one run.
///
/// Displayed and serialized as a bitstring with clbit 0 first, e.g. `"01"`
/// means c0 = 0 and c1 = 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Outcome {
    bits: Vec<bool>,
}

impl Outcome {
    /// All-zero register of `num_clbits` bits.
    pub fn zeros(num_clbits: usize) -> Self {
        Self {
            bits: vec![false; num_clbits],
        }
    }

    /// Create from explicit bit values, clbit 0 first.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Value of `clbit`, or `None` if out of range.
    pub fn get(&self, clbit: usize) -> Option<bool> {
        self.bits.get(clbit).copied()
    }

    /// Set `clbit`. Out-of-range writes are ignored.
    pub fn set(&mut self, clbit: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(clbit) {
            *bit = value;
        }
    }

    /// Register width.
    pub fn num_clbits(&self) -> usize {
        self.bits.len()
    }

    /// Bit values, clbit 0 first.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Outcome {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, HalError> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(HalError::InvalidState(format!(
                    "invalid bit '{other}' in outcome '{s}'"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Probability of each reachable outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    probabilities: BTreeMap<Outcome, f64>,
}

impl OutcomeDistribution {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `probability` to `outcome`, merging with any existing mass.
    pub fn add(&mut self, outcome: Outcome, probability: f64) {
        *self.probabilities.entry(outcome).or_insert(0.0) += probability;
    }

    /// Probability of `outcome` (zero if unreachable).
    pub fn probability(&self, outcome: &Outcome) -> f64 {
        self.probabilities.get(outcome).copied().unwrap_or(0.0)
    }

    /// Total probability mass; 1 up to rounding for a complete run.
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    /// Marginal `(P[clbit = 0], P[clbit = 1])`.
    pub fn marginal(&self, clbit: usize) -> (f64, f64) {
        self.probabilities
            .iter()
            .fold((0.0, 0.0), |(p0, p1), (outcome, p)| {
                if outcome.get(clbit).unwrap_or(false) {
                    (p0, p1 + p)
                } else {
                    (p0 + p, p1)
                }
            })
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// True if no outcome is recorded.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Iterate outcomes in order with their probabilities.
    pub fn iter(&self) -> impl Iterator<Item = (&Outcome, f64)> {
        self.probabilities.iter().map(|(o, p)| (o, *p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_bits() {
        let mut outcome = Outcome::zeros(3);
        outcome.set(1, true);
        outcome.set(7, true);
        assert_eq!(outcome.get(0), Some(false));
        assert_eq!(outcome.get(1), Some(true));
        assert_eq!(outcome.get(3), None);
        assert_eq!(outcome.to_string(), "010");
    }

    #[test]
    fn test_outcome_parse() {
        let outcome: Outcome = "101".parse().unwrap();
        assert_eq!(outcome.bits(), &[true, false, true]);
        assert!("10x".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_distribution_merges_and_marginalises() {
        let mut dist = OutcomeDistribution::new();
        dist.add("00".parse().unwrap(), 0.25);
        dist.add("10".parse().unwrap(), 0.25);
        dist.add("10".parse().unwrap(), 0.25);
        dist.add("11".parse().unwrap(), 0.25);

        assert_eq!(dist.len(), 3);
        assert!((dist.total() - 1.0).abs() < 1e-15);
        assert!((dist.probability(&"10".parse().unwrap()) - 0.5).abs() < 1e-15);

        let (p0, p1) = dist.marginal(0);
        assert!((p0 - 0.25).abs() < 1e-15);
        assert!((p1 - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_distribution_serde() {
        let mut dist = OutcomeDistribution::new();
        dist.add("01".parse().unwrap(), 1.0);
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"probabilities":{"01":1.0}}"#);
        let back: OutcomeDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dist);
    }
}
