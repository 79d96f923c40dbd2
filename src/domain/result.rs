//! Result type alias for Layerport

use super::errors::LayerportError;

/// Result type alias for Layerport operations
///
/// This is a convenience type alias that uses `LayerportError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use layerport::domain::result::Result;
/// use layerport::domain::errors::LayerportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LayerportError::NotFound("missing".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LayerportError>;
