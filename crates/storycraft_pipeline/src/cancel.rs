//! Racing external calls against run cancellation.

use std::future::Future;
use storycraft_error::{GenerationError, GenerationErrorKind, StorycraftResult};
use tokio_util::sync::CancellationToken;

/// Await `call` unless `cancel` fires first.
///
/// A cancelled call is dropped mid-flight, retry backoff included, and
/// reported as a cancelled `capability` request.
pub(crate) async fn or_cancelled<T, F>(
    cancel: &CancellationToken,
    capability: &str,
    call: F,
) -> StorycraftResult<T>
where
    F: Future<Output = StorycraftResult<T>>,
{
    match cancel.run_until_cancelled(call).await {
        Some(result) => result,
        None => Err(GenerationError::new(GenerationErrorKind::Cancelled(capability.to_string())).into()),
    }
}
