//! Model input tensors.

use serde::Serialize;

use crate::error::{ArchError, Result};

/// Height of the classifier input, in pixels.
pub const TENSOR_HEIGHT: usize = 256;
/// Width of the classifier input, in pixels.
pub const TENSOR_WIDTH: usize = 256;
/// Channels of the classifier input (grayscale).
pub const TENSOR_CHANNELS: usize = 1;

const TENSOR_LEN: usize = TENSOR_HEIGHT * TENSOR_WIDTH * TENSOR_CHANNELS;

/// Normalized single-image tensor, shape (256, 256, 1), values in [0.0, 1.0].
///
/// Stored row-major. Only [`crate::ImageNormalizer`] constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    pub(crate) fn from_normalized(data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), TENSOR_LEN);
        Self { data }
    }

    /// Tensor shape as (height, width, channels).
    pub fn shape(&self) -> [usize; 3] {
        [TENSOR_HEIGHT, TENSOR_WIDTH, TENSOR_CHANNELS]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Sample at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> Option<f32> {
        if y >= TENSOR_HEIGHT || x >= TENSOR_WIDTH {
            return None;
        }
        self.data.get(y * TENSOR_WIDTH + x).copied()
    }

    /// Wrap this tensor in a batch of one.
    pub fn into_batch(self) -> TensorBatch {
        TensorBatch {
            shape: vec![1, TENSOR_HEIGHT, TENSOR_WIDTH, TENSOR_CHANNELS],
            data: self.data,
        }
    }
}

/// Batched model input. Produced by [`ImageTensor::into_batch`] with shape
/// (1, 256, 256, 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorBatch {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl TensorBatch {
    /// The shape every classifier input must have.
    pub const EXPECTED_SHAPE: [usize; 4] = [1, TENSOR_HEIGHT, TENSOR_WIDTH, TENSOR_CHANNELS];

    /// Build a batch from an explicit shape and row-major data.
    ///
    /// Fails if the element count does not match the shape. The shape itself
    /// is not checked against [`Self::EXPECTED_SHAPE`]; the gateway does that.
    pub fn from_raw(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ArchError::Inference(format!(
                "tensor shape {:?} needs {} elements, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Whether the shape is the one the classifier was trained on.
    pub fn has_expected_shape(&self) -> bool {
        self.shape == Self::EXPECTED_SHAPE
    }
}
