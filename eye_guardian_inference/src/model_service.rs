use crate::InferenceError;
use ndarray::{Array2, Array4};

/// A loaded classifier. `batch` is NHWC, the result is one row of scores per image.
pub trait ModelService: Send + Sync + 'static {
    fn predict(&self, batch: &Array4<f32>) -> Result<Array2<f32>, InferenceError>;
}
