use std::fmt;

use crate::model::ExperimentType;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transform {
    /// `2 - v`, flipping ratio metrics so improvement reads left to right.
    RatioComplement,
}

impl Transform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::RatioComplement => 2.0 - value,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RatioComplement => "ratio_complement",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn normalize(values: &[f64], transform: Transform) -> Vec<f64> {
    values.iter().map(|value| transform.apply(*value)).collect()
}

/// Which transform, if any, applies to a (dataset, experiment type) pair.
#[derive(Debug, Clone)]
pub struct NormalizationPolicy {
    rules: Vec<(String, ExperimentType, Transform)>,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self {
            rules: vec![(
                "msmarco-1M".to_string(),
                ExperimentType::Ratio,
                Transform::RatioComplement,
            )],
        }
    }
}

impl NormalizationPolicy {
    pub fn with_rule(mut self, dataset: &str, experiment: ExperimentType, transform: Transform) -> Self {
        self.rules.retain(|(name, kind, _)| !(name == dataset && *kind == experiment));
        self.rules.push((dataset.to_string(), experiment, transform));
        self
    }

    pub fn lookup(&self, dataset: &str, experiment: ExperimentType) -> Option<Transform> {
        self.rules
            .iter()
            .find(|(name, kind, _)| name == dataset && *kind == experiment)
            .map(|(_, _, transform)| *transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_complement_flips_around_one() {
        assert_eq!(
            normalize(&[0.5, 1.0, 1.5], Transform::RatioComplement),
            vec![1.5, 1.0, 0.5]
        );
        assert!(normalize(&[], Transform::RatioComplement).is_empty());
    }

    #[test]
    fn default_policy_only_complements_msmarco_ratio() {
        let policy = NormalizationPolicy::default();
        assert_eq!(
            policy.lookup("msmarco-1M", ExperimentType::Ratio),
            Some(Transform::RatioComplement)
        );
        assert_eq!(policy.lookup("msmarco-1M", ExperimentType::Visited), None);
        assert_eq!(policy.lookup("wikipedia-1M", ExperimentType::Ratio), None);
    }

    #[test]
    fn with_rule_adds_entries_without_duplicates() {
        let policy = NormalizationPolicy::default()
            .with_rule("text2image-1M", ExperimentType::Ratio, Transform::RatioComplement)
            .with_rule("text2image-1M", ExperimentType::Ratio, Transform::RatioComplement);

        assert_eq!(policy.rules.len(), 2);
        assert_eq!(
            policy.lookup("text2image-1M", ExperimentType::Ratio),
            Some(Transform::RatioComplement)
        );
        assert_eq!(policy.lookup("text2image-1M", ExperimentType::Top10), None);
    }
}
