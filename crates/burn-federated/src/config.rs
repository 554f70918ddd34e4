use alloc::format;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::PartitionError;

/// Distribution strategy used to assign elements to participants.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SplitMethod {
    /// Contiguous near-equal blocks.
    #[default]
    Uniform,
    /// Non-IID split where per-class proportions over parties follow a Dirichlet draw.
    Dirichlet,
    /// Non-IID split where each party only sees a bounded subset of classes.
    LabelSkew,
}

/// Parameters of a single partition run.
///
/// This is the flat, serializable form of a split request. Fields that only matter
/// to some methods are optional; [`SplitConfig::strategy`] checks that the chosen
/// method has everything it needs.
///
/// # Example
///
/// ```rust
/// use burn_federated::{SplitConfig, SplitMethod};
///
/// let config = SplitConfig::new()
///     .with_split_method(SplitMethod::Dirichlet)
///     .with_num_classes(10)
///     .with_alpha(100.0)
///     .with_random_state(1234)
///     .with_target(vec![0; 100]);
///
/// assert!(config.strategy().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Dimension to cut. Axis 0 is the sample axis.
    pub axis: usize,
    /// Distribution strategy.
    pub split_method: SplitMethod,
    /// Number of label classes, required by the non-uniform methods.
    pub num_classes: Option<usize>,
    /// Dirichlet concentration, required by [`SplitMethod::Dirichlet`].
    pub alpha: Option<f64>,
    /// Labels aligned with the sample axis, required by the non-uniform methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec<usize>>,
    /// Maximum number of distinct classes one participant may see,
    /// required by [`SplitMethod::LabelSkew`].
    pub max_class_nums: Option<usize>,
    /// Seed for every random decision of the run.
    pub random_state: Option<u64>,
    /// Whether the array being split is a label vector.
    pub is_label: bool,
    /// Permute the samples before cutting uniform blocks.
    pub shuffle: bool,
    /// Relative share of each participant for the uniform method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportions: Option<Vec<f64>>,
}

impl SplitConfig {
    /// Creates a uniform split along the sample axis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the axis to cut.
    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = axis;
        self
    }

    /// Sets the distribution strategy.
    pub fn with_split_method(mut self, split_method: SplitMethod) -> Self {
        self.split_method = split_method;
        self
    }

    /// Sets the number of label classes.
    pub fn with_num_classes(mut self, num_classes: usize) -> Self {
        self.num_classes = Some(num_classes);
        self
    }

    /// Sets the Dirichlet concentration.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Sets the labels used by the non-uniform methods.
    pub fn with_target<T: Into<Vec<usize>>>(mut self, target: T) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Sets the maximum number of classes per participant.
    pub fn with_max_class_nums(mut self, max_class_nums: usize) -> Self {
        self.max_class_nums = Some(max_class_nums);
        self
    }

    /// Sets the seed.
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Marks the source array as a label vector.
    pub fn with_is_label(mut self, is_label: bool) -> Self {
        self.is_label = is_label;
        self
    }

    /// Permutes samples before a uniform split.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Sets explicit per-participant proportions for a uniform split.
    pub fn with_proportions<T: Into<Vec<f64>>>(mut self, proportions: T) -> Self {
        self.proportions = Some(proportions.into());
        self
    }

    /// Resolves the configuration into a [`Strategy`].
    ///
    /// Fails with [`PartitionError::MissingParameter`] when the chosen method lacks a
    /// required field, and rejects values no method can work with (zero classes,
    /// non-positive `alpha`, proportions combined with a non-uniform method).
    /// Checks that need the array, such as the target length, happen in the planner.
    pub fn strategy(&self) -> Result<Strategy<'_>, PartitionError> {
        let method = self.split_method;
        let missing = |param| PartitionError::MissingParameter { method, param };

        if method != SplitMethod::Uniform {
            if self.proportions.is_some() {
                return Err(PartitionError::InvalidProportions(format!(
                    "proportions are only supported by `{}`, got `{method}`",
                    SplitMethod::Uniform
                )));
            }
            if self.axis != 0 {
                return Err(PartitionError::SampleAxisOnly {
                    method,
                    axis: self.axis,
                });
            }
        }

        match method {
            SplitMethod::Uniform => {
                let seed = match (self.shuffle, self.random_state) {
                    (true, None) => return Err(missing("random_state")),
                    (true, Some(seed)) => Some(seed),
                    (false, _) => None,
                };
                if seed.is_some() && self.axis != 0 {
                    return Err(PartitionError::InvalidParameter(format!(
                        "shuffle only applies to the sample axis, got axis {}",
                        self.axis
                    )));
                }
                Ok(Strategy::Uniform(UniformParams {
                    proportions: self.proportions.as_deref(),
                    shuffle_seed: seed,
                }))
            }
            SplitMethod::Dirichlet => {
                let num_classes = self.num_classes.ok_or_else(|| missing("num_classes"))?;
                let alpha = self.alpha.ok_or_else(|| missing("alpha"))?;
                let target = self.target.as_deref().ok_or_else(|| missing("target"))?;
                let seed = self.random_state.ok_or_else(|| missing("random_state"))?;
                check_num_classes(num_classes)?;
                // Written so that NaN is rejected too.
                if !(alpha > 0.0) {
                    return Err(PartitionError::NonPositiveAlpha(alpha));
                }
                Ok(Strategy::Dirichlet(DirichletParams {
                    target,
                    num_classes,
                    alpha,
                    seed,
                }))
            }
            SplitMethod::LabelSkew => {
                let num_classes = self.num_classes.ok_or_else(|| missing("num_classes"))?;
                let max_class_nums = self
                    .max_class_nums
                    .ok_or_else(|| missing("max_class_nums"))?;
                let target = self.target.as_deref().ok_or_else(|| missing("target"))?;
                let seed = self.random_state.ok_or_else(|| missing("random_state"))?;
                check_num_classes(num_classes)?;
                if max_class_nums == 0 {
                    return Err(PartitionError::InvalidParameter(
                        "max_class_nums must be at least 1".into(),
                    ));
                }
                Ok(Strategy::LabelSkew(LabelSkewParams {
                    target,
                    num_classes,
                    max_class_nums,
                    seed,
                }))
            }
        }
    }
}

fn check_num_classes(num_classes: usize) -> Result<(), PartitionError> {
    if num_classes == 0 {
        return Err(PartitionError::InvalidParameter(
            "num_classes must be at least 1".into(),
        ));
    }
    Ok(())
}

/// A validated split strategy with the parameters its method needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Strategy<'a> {
    /// Contiguous blocks, optionally weighted or shuffled.
    Uniform(UniformParams<'a>),
    /// Dirichlet non-IID split.
    Dirichlet(DirichletParams<'a>),
    /// Label-skew non-IID split.
    LabelSkew(LabelSkewParams<'a>),
}

impl Strategy<'_> {
    /// The method this strategy implements.
    pub fn method(&self) -> SplitMethod {
        match self {
            Strategy::Uniform(_) => SplitMethod::Uniform,
            Strategy::Dirichlet(_) => SplitMethod::Dirichlet,
            Strategy::LabelSkew(_) => SplitMethod::LabelSkew,
        }
    }
}

impl Default for Strategy<'_> {
    fn default() -> Self {
        Strategy::Uniform(UniformParams::default())
    }
}

/// Parameters of a [`Strategy::Uniform`] split.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformParams<'a> {
    /// Relative share of each participant. Equal shares when absent.
    pub proportions: Option<&'a [f64]>,
    /// Seed of the sample permutation applied before cutting blocks.
    pub shuffle_seed: Option<u64>,
}

/// Parameters of a [`Strategy::Dirichlet`] split.
#[derive(Clone, Debug, PartialEq)]
pub struct DirichletParams<'a> {
    /// Label of every sample.
    pub target: &'a [usize],
    /// Number of classes.
    pub num_classes: usize,
    /// Concentration, strictly positive.
    pub alpha: f64,
    /// Seed of the run.
    pub seed: u64,
}

/// Parameters of a [`Strategy::LabelSkew`] split.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSkewParams<'a> {
    /// Label of every sample.
    pub target: &'a [usize],
    /// Number of classes.
    pub num_classes: usize,
    /// Maximum number of distinct classes per participant.
    pub max_class_nums: usize,
    /// Seed of the run.
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::str::FromStr;

    #[test]
    fn test_default_config_is_uniform() {
        let config = SplitConfig::new();

        assert_eq!(config.strategy().unwrap(), Strategy::default());
        assert_eq!(config.axis, 0);
        assert!(!config.is_label);
    }

    #[test]
    fn test_split_method_string_forms() {
        assert_eq!(SplitMethod::LabelSkew.to_string(), "label_skew");
        assert_eq!(
            SplitMethod::from_str("dirichlet").unwrap(),
            SplitMethod::Dirichlet
        );
        assert!(SplitMethod::from_str("iid").is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SplitConfig = serde_json::from_str(
            r#"{"split_method": "label_skew", "num_classes": 10, "max_class_nums": 5}"#,
        )
        .unwrap();

        assert_eq!(config.split_method, SplitMethod::LabelSkew);
        assert_eq!(config.num_classes, Some(10));
        assert_eq!(config.axis, 0);
        assert_eq!(config.target, None);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = SplitConfig::new()
            .with_split_method(SplitMethod::Dirichlet)
            .with_alpha(0.5)
            .with_num_classes(3)
            .with_random_state(7)
            .with_target(vec![0, 1, 2]);

        let json = serde_json::to_string(&config).unwrap();
        let back: SplitConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back, config);
    }

    #[test]
    #[should_panic = "MissingParameter { method: Dirichlet, param: \"alpha\" }"]
    fn test_dirichlet_requires_alpha() {
        SplitConfig::new()
            .with_split_method(SplitMethod::Dirichlet)
            .with_num_classes(10)
            .with_random_state(1)
            .with_target(vec![0; 4])
            .strategy()
            .unwrap();
    }

    #[test]
    #[should_panic = "MissingParameter { method: LabelSkew, param: \"max_class_nums\" }"]
    fn test_label_skew_requires_max_class_nums() {
        SplitConfig::new()
            .with_split_method(SplitMethod::LabelSkew)
            .with_num_classes(10)
            .with_random_state(1)
            .with_target(vec![0; 4])
            .strategy()
            .unwrap();
    }

    #[test]
    #[should_panic = "MissingParameter { method: Uniform, param: \"random_state\" }"]
    fn test_shuffle_requires_seed() {
        SplitConfig::new().with_shuffle(true).strategy().unwrap();
    }

    #[test]
    fn test_non_positive_alpha_is_rejected() {
        for alpha in [0.0, -1.0, f64::NAN] {
            let config = SplitConfig::new()
                .with_split_method(SplitMethod::Dirichlet)
                .with_num_classes(2)
                .with_alpha(alpha)
                .with_random_state(1)
                .with_target(vec![0, 1]);

            assert!(matches!(
                config.strategy(),
                Err(PartitionError::NonPositiveAlpha(_))
            ));
        }
    }

    #[test]
    #[should_panic = "SampleAxisOnly { method: LabelSkew, axis: 2 }"]
    fn test_non_iid_rejects_feature_axis() {
        SplitConfig::new()
            .with_axis(2)
            .with_split_method(SplitMethod::LabelSkew)
            .with_num_classes(2)
            .with_max_class_nums(1)
            .with_random_state(1)
            .with_target(vec![0, 1])
            .strategy()
            .unwrap();
    }

    #[test]
    #[should_panic = "InvalidProportions"]
    fn test_proportions_only_for_uniform() {
        SplitConfig::new()
            .with_split_method(SplitMethod::Dirichlet)
            .with_proportions(vec![0.5, 0.5])
            .strategy()
            .unwrap();
    }
}
