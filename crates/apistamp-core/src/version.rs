//! Opaque API version values
//!
//! An [`ApiVersion`] carries whatever the application uses to identify an
//! API version: a number, a date string, an enum of its own. Nothing here
//! interprets it; a [`VersionFormatter`](crate::VersionFormatter) decides
//! how it is rendered on the wire.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

trait VersionValue: fmt::Display + fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

impl<T> VersionValue for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An opaque API version value
///
/// Cloning is cheap; the wrapped value is shared.
///
/// # Example
///
/// ```rust
/// use apistamp_core::ApiVersion;
///
/// let version = ApiVersion::from(1.2);
/// assert_eq!(version.to_string(), "1.2");
/// assert_eq!(version.downcast_ref::<f64>(), Some(&1.2));
/// ```
#[derive(Clone)]
pub struct ApiVersion(Arc<dyn VersionValue>);

impl ApiVersion {
    /// Wrap any displayable value as an API version
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    /// Get the wrapped value if it is of type `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Check whether the wrapped value is of type `T`
    pub fn is<T: Any>(&self) -> bool {
        (*self.0).as_any().is::<T>()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiVersion({:?})", &*self.0)
    }
}

macro_rules! impl_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ApiVersion {
                fn from(value: $ty) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

impl_from_value!(String, &'static str, f32, f64, i32, i64, u32, u64, usize);
