use alloc::string::String;
use alloc::vec::Vec;

use crate::config::SplitMethod;

/// Represents errors that can occur while planning or assembling a partition.
///
/// Every variant is a caller input defect: the partition is a deterministic pure
/// computation, so none of these are transient and none should be retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PartitionError {
    /// The party list has no participants.
    #[error("the party list must contain at least one participant")]
    EmptyParties,

    /// The same participant appears twice in the party list.
    #[error("participant at position {0} is already in the party list")]
    DuplicateParty(usize),

    /// The split method needs a parameter the configuration does not carry.
    #[error("split method `{method}` requires `{param}`")]
    MissingParameter {
        /// The method being resolved.
        method: SplitMethod,
        /// Name of the missing field.
        param: &'static str,
    },

    /// A parameter is present but has an unusable value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The Dirichlet concentration must be strictly positive.
    #[error("alpha must be positive, got {0}")]
    NonPositiveAlpha(f64),

    /// The target labels are not aligned with the sample axis.
    #[error("target has {actual} labels but the sample axis has {expected} elements")]
    TargetLengthMismatch {
        /// Size of the sample axis.
        expected: usize,
        /// Length of the target vector.
        actual: usize,
    },

    /// A target label does not fall in `0..num_classes`.
    #[error("label {label} of sample {index} is outside 0..{num_classes}")]
    LabelOutOfRange {
        /// Offending sample.
        index: usize,
        /// Its label.
        label: usize,
        /// Configured class count.
        num_classes: usize,
    },

    /// Label skew cannot give every class at least one owner.
    #[error(
        "{num_parties} parties with at most {max_class_nums} classes each cannot cover {num_classes} classes"
    )]
    InsufficientClassCoverage {
        /// Number of participants.
        num_parties: usize,
        /// Classes visible to a single participant.
        max_class_nums: usize,
        /// Classes that must be covered.
        num_classes: usize,
    },

    /// The split axis does not exist on the source array.
    #[error("axis {axis} is out of bounds for an array of dimension {ndim}")]
    AxisOutOfBounds {
        /// Requested axis.
        axis: usize,
        /// Dimensionality of the array.
        ndim: usize,
    },

    /// The split method only partitions the sample axis.
    #[error("split method `{method}` only splits the sample axis, got axis {axis}")]
    SampleAxisOnly {
        /// The method being resolved.
        method: SplitMethod,
        /// Requested axis.
        axis: usize,
    },

    /// The index plan does not cover the axis it is applied to.
    #[error("index plan does not cover an axis of length {0}")]
    PlanSizeMismatch(usize),

    /// The number of shards differs from the number of participants.
    #[error("got {parties} participants but {shards} shards")]
    ShardCountMismatch {
        /// Number of participants.
        parties: usize,
        /// Number of shards.
        shards: usize,
    },

    /// The explicit per-party proportions are unusable.
    #[error("invalid proportions: {0}")]
    InvalidProportions(String),

    /// A label split was requested on an array that is not a label vector.
    #[error("expected a one-dimensional label vector, got shape {0:?}")]
    NotALabelVector(Vec<usize>),
}
