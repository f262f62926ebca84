use crate::{errors::PerceptionResult, tensor::Tensor};

/// An opaque model runtime: one input tensor in, one output tensor out.
///
/// Implementations that have no model loaded, or cannot reach the process
/// serving it, return [`PerceptionError::InferenceUnavailable`].
///
/// [`PerceptionError::InferenceUnavailable`]: crate::PerceptionError::InferenceUnavailable
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait InferenceBackend {
    fn invoke(&self, input: &Tensor) -> PerceptionResult<Tensor>;
}

impl<B: InferenceBackend + ?Sized> InferenceBackend for Box<B> {
    fn invoke(&self, input: &Tensor) -> PerceptionResult<Tensor> {
        (**self).invoke(input)
    }
}
