//! ComfyUI IMAGE 张量

use numpy::{PyArrayDyn, PyArrayMethods, PyUntypedArrayMethods};
use pyo3::{types::PyAnyMethods, Bound, PyAny};

use crate::{error::Error, image::Frame};

/// IMAGE 张量, 形状为 [B, H, W, C] 或 [H, W, C], float32 0..1
pub struct ImageTensor<'a, 'py> {
    tensor: &'a Bound<'py, PyAny>,
}

impl<'a, 'py> ImageTensor<'a, 'py> {
    pub fn new(tensor: &'a Bound<'py, PyAny>) -> Self {
        Self { tensor }
    }

    /// 取出批次中的第一帧
    ///
    /// 通过 `.cpu().contiguous().numpy()` 得到连续的 numpy 数组后拷贝。
    pub fn first_frame(&self) -> Result<Frame, Error> {
        let numpy_any = self
            .tensor
            .call_method0("cpu")?
            .call_method0("contiguous")?
            .call_method0("numpy")?;
        let array = numpy_any
            .downcast::<PyArrayDyn<f32>>()
            .map_err(|e| Error::PyErr(e.to_string()))?
            .readonly();

        let shape = array.shape().to_vec();
        let data = array
            .to_vec()
            .map_err(|e| Error::InvalidParameter(e.to_string()))?;
        Frame::first_of_batch(&shape, &data)
    }
}
