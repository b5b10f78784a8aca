//! # Sensory Fields
//!
//! A sensory field turns raw world state into the bounded numeric array an
//! agent observes. Fields are pure: the same input and configuration always
//! produce the same array, and encoding never touches any state.
//!
//! Three kinds exist, selected by [`FieldType`]:
//!
//! -   [`GridField`] accepts either a pre-shaped array or a flat cell index,
//!     which it expands into a one-hot array of the configured dimensions.
//! -   [`ContinuousField`] accepts only arrays and passes them through.
//! -   [`FeatureVectorField`] accepts a 1-D array whose shape must match the
//!     configured dimensions exactly.
//!
//! Every kind casts to the configured [`ElementType`] and clips to the
//! configured value range before returning.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

/// Closed set of sensory field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Grid,
    Continuous,
    FeatureVector,
}

impl FieldType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Grid => "grid",
            FieldType::Continuous => "continuous",
            FieldType::FeatureVector => "feature_vector",
        }
    }
}

impl FromStr for FieldType {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "grid" => Ok(FieldType::Grid),
            "continuous" => Ok(FieldType::Continuous),
            "feature_vector" => Ok(FieldType::FeatureVector),
            other => Err(EnvError::UnknownFieldType(other.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric type every encoded element is cast to before clipping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    #[default]
    Float32,
    /// Integral values, truncated toward zero.
    Int32,
}

impl ElementType {
    fn cast(self, value: f32) -> f32 {
        match self {
            ElementType::Float32 => value,
            ElementType::Int32 => value.trunc(),
        }
    }
}

/// Immutable description of a sensory field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensoryFieldConfig {
    field_type: FieldType,
    dimensions: Vec<usize>,
    encoding: String,
    value_range: (f32, f32),
    dtype: ElementType,
}

impl SensoryFieldConfig {
    /// Creates a config with the default `[0, 1]` range and `float32` elements.
    ///
    /// # Errors
    ///
    /// Fails when `dimensions` is empty.
    pub fn new(
        field_type: FieldType,
        dimensions: Vec<usize>,
        encoding: impl Into<String>,
    ) -> Result<Self> {
        Self::with_range(field_type, dimensions, encoding, (0.0, 1.0), ElementType::Float32)
    }

    /// # Errors
    ///
    /// Fails when `dimensions` is empty or `value_range` is not strictly ordered.
    pub fn with_range(
        field_type: FieldType,
        dimensions: Vec<usize>,
        encoding: impl Into<String>,
        value_range: (f32, f32),
        dtype: ElementType,
    ) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(EnvError::ConfigSchema("Field dimensions cannot be empty".into()));
        }
        let (min, max) = value_range;
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(EnvError::ConfigConsistency(format!(
                "value_range must be (min, max) with min < max, got ({}, {})",
                value_range.0, value_range.1
            )));
        }
        Ok(Self {
            field_type,
            dimensions,
            encoding: encoding.into(),
            value_range,
            dtype,
        })
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    #[must_use]
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    #[must_use]
    pub fn value_range(&self) -> (f32, f32) {
        self.value_range
    }

    #[must_use]
    pub fn dtype(&self) -> ElementType {
        self.dtype
    }

    fn finish(&self, mut encoded: ArrayD<f32>) -> ArrayD<f32> {
        let (min, max) = self.value_range;
        let dtype = self.dtype;
        encoded.mapv_inplace(|v| dtype.cast(v).clamp(min, max));
        encoded
    }
}

/// Raw world state handed to an encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RawState {
    Array(ArrayD<f32>),
    /// Flat (row-major) cell index.
    Position(usize),
}

impl From<ArrayD<f32>> for RawState {
    fn from(array: ArrayD<f32>) -> Self {
        RawState::Array(array)
    }
}

impl From<Vec<f32>> for RawState {
    fn from(values: Vec<f32>) -> Self {
        RawState::Array(Array1::from(values).into_dyn())
    }
}

impl From<usize> for RawState {
    fn from(index: usize) -> Self {
        RawState::Position(index)
    }
}

/// Common encoder behaviour.
pub trait Encoder {
    /// Encodes `state` into a bounded sensory array.
    ///
    /// # Errors
    ///
    /// Returns an error when the input kind or shape is not accepted by the field.
    fn encode(&self, state: RawState) -> Result<ArrayD<f32>>;

    fn config(&self) -> &SensoryFieldConfig;

    fn output_shape(&self) -> &[usize] {
        self.config().dimensions()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    config: SensoryFieldConfig,
}

impl GridField {
    /// # Errors
    ///
    /// Fails unless `config.field_type()` is [`FieldType::Grid`].
    pub fn new(config: SensoryFieldConfig) -> Result<Self> {
        require_kind(&config, FieldType::Grid, "GridField")?;
        Ok(Self { config })
    }
}

impl Encoder for GridField {
    fn encode(&self, state: RawState) -> Result<ArrayD<f32>> {
        let encoded = match state {
            RawState::Array(array) => array,
            RawState::Position(index) => {
                let mut grid = ArrayD::<f32>::zeros(IxDyn(self.config.dimensions()));
                let cells = grid.len();
                let cell = grid.as_slice_mut().and_then(|flat| flat.get_mut(index)).ok_or_else(|| {
                    EnvError::InvalidSensoryInput(format!(
                        "position {index} is outside a grid of {cells} cells"
                    ))
                })?;
                *cell = 1.0;
                grid
            }
        };
        Ok(self.config.finish(encoded))
    }

    fn config(&self) -> &SensoryFieldConfig {
        &self.config
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousField {
    config: SensoryFieldConfig,
}

impl ContinuousField {
    /// # Errors
    ///
    /// Fails unless `config.field_type()` is [`FieldType::Continuous`].
    pub fn new(config: SensoryFieldConfig) -> Result<Self> {
        require_kind(&config, FieldType::Continuous, "ContinuousField")?;
        Ok(Self { config })
    }
}

impl Encoder for ContinuousField {
    fn encode(&self, state: RawState) -> Result<ArrayD<f32>> {
        match state {
            RawState::Array(array) => Ok(self.config.finish(array)),
            RawState::Position(_) => Err(EnvError::InvalidSensoryInput(
                "ContinuousField requires array input".into(),
            )),
        }
    }

    fn config(&self) -> &SensoryFieldConfig {
        &self.config
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVectorField {
    config: SensoryFieldConfig,
}

impl FeatureVectorField {
    /// # Errors
    ///
    /// Fails unless the config is a 1-D [`FieldType::FeatureVector`] field.
    pub fn new(config: SensoryFieldConfig) -> Result<Self> {
        require_kind(&config, FieldType::FeatureVector, "FeatureVectorField")?;
        if config.dimensions().len() != 1 {
            return Err(EnvError::ConfigSchema(
                "FeatureVectorField must have 1D dimensions".into(),
            ));
        }
        Ok(Self { config })
    }
}

impl Encoder for FeatureVectorField {
    fn encode(&self, state: RawState) -> Result<ArrayD<f32>> {
        let RawState::Array(array) = state else {
            return Err(EnvError::InvalidSensoryInput(
                "FeatureVectorField requires a feature array".into(),
            ));
        };
        if array.shape() != self.config.dimensions() {
            return Err(EnvError::ShapeMismatch {
                what: "feature vector",
                expected: self.config.dimensions().to_vec(),
                actual: array.shape().to_vec(),
            });
        }
        Ok(self.config.finish(array))
    }

    fn config(&self) -> &SensoryFieldConfig {
        &self.config
    }
}

/// Any sensory field, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SensoryField {
    Grid(GridField),
    Continuous(ContinuousField),
    FeatureVector(FeatureVectorField),
}

impl Encoder for SensoryField {
    fn encode(&self, state: RawState) -> Result<ArrayD<f32>> {
        match self {
            SensoryField::Grid(field) => field.encode(state),
            SensoryField::Continuous(field) => field.encode(state),
            SensoryField::FeatureVector(field) => field.encode(state),
        }
    }

    fn config(&self) -> &SensoryFieldConfig {
        match self {
            SensoryField::Grid(field) => field.config(),
            SensoryField::Continuous(field) => field.config(),
            SensoryField::FeatureVector(field) => field.config(),
        }
    }
}

impl fmt::Display for SensoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config();
        write!(f, "SensoryField(type={}, dims={:?})", config.field_type(), config.dimensions())
    }
}

/// Builds the field matching `config.field_type()`.
///
/// # Errors
///
/// Propagates the per-kind construction checks.
pub fn create_sensory_field(config: SensoryFieldConfig) -> Result<SensoryField> {
    Ok(match config.field_type() {
        FieldType::Grid => SensoryField::Grid(GridField::new(config)?),
        FieldType::Continuous => SensoryField::Continuous(ContinuousField::new(config)?),
        FieldType::FeatureVector => SensoryField::FeatureVector(FeatureVectorField::new(config)?),
    })
}

fn require_kind(config: &SensoryFieldConfig, kind: FieldType, name: &str) -> Result<()> {
    if config.field_type() == kind {
        Ok(())
    } else {
        Err(EnvError::ConfigSchema(format!("{name} requires field_type='{kind}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    fn grid(dims: Vec<usize>) -> SensoryField {
        let config = SensoryFieldConfig::new(FieldType::Grid, dims, "one_hot").unwrap();
        create_sensory_field(config).unwrap()
    }

    #[test]
    fn grid_position_is_one_hot_at_flat_index() {
        let encoded = grid(vec![3, 4]).encode(RawState::Position(5)).unwrap();
        assert_eq!(encoded.shape(), &[3, 4]);
        assert_eq!(encoded[[1, 1]], 1.0);
        assert_eq!(encoded.sum(), 1.0);
    }

    #[test]
    fn grid_position_outside_field_is_rejected() {
        let err = grid(vec![2, 2]).encode(RawState::Position(4)).unwrap_err();
        assert!(matches!(err, EnvError::InvalidSensoryInput(_)));
    }

    #[test]
    fn grid_array_is_clipped_to_range() {
        let raw = arr1(&[-2.0_f32, 0.25, 7.0]).into_dyn();
        let encoded = grid(vec![3]).encode(raw.into()).unwrap();
        assert_eq!(encoded.as_slice().unwrap(), &[0.0, 0.25, 1.0]);
    }

    #[test]
    fn continuous_rejects_scalar_input() {
        let field = create_sensory_field(
            SensoryFieldConfig::new(FieldType::Continuous, vec![2, 2], "gaussian").unwrap(),
        )
        .unwrap();
        assert!(matches!(
            field.encode(RawState::Position(0)),
            Err(EnvError::InvalidSensoryInput(_))
        ));
    }

    #[test]
    fn int_elements_truncate_before_clipping() {
        let config = SensoryFieldConfig::with_range(
            FieldType::Continuous,
            vec![3],
            "linear",
            (-5.0, 5.0),
            ElementType::Int32,
        )
        .unwrap();
        let field = create_sensory_field(config).unwrap();
        let encoded = field.encode(vec![1.9_f32, -2.7, 9.5].into()).unwrap();
        assert_eq!(encoded.as_slice().unwrap(), &[1.0, -2.0, 5.0]);
    }

    #[test]
    fn feature_vector_requires_one_dimension() {
        let config =
            SensoryFieldConfig::new(FieldType::FeatureVector, vec![2, 2], "binary").unwrap();
        assert!(matches!(create_sensory_field(config), Err(EnvError::ConfigSchema(_))));
    }

    #[test]
    fn config_rejects_unordered_range_and_empty_dims() {
        assert!(SensoryFieldConfig::new(FieldType::Grid, vec![], "one_hot").is_err());
        assert!(SensoryFieldConfig::with_range(
            FieldType::Grid,
            vec![2],
            "one_hot",
            (1.0, 1.0),
            ElementType::Float32,
        )
        .is_err());
    }

    #[test]
    fn field_kind_must_match_constructor() {
        let config = SensoryFieldConfig::new(FieldType::Continuous, vec![2], "linear").unwrap();
        assert!(GridField::new(config).is_err());
    }

    #[test]
    fn unknown_field_tag_fails_to_parse() {
        let err = "hexagonal".parse::<FieldType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown sensory field type: hexagonal");
    }
}
