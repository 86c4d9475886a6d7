//! JNI view sources for [`Pinned`](mobile_surface::marshal::Pinned)
//!
//! Arrays are copied out with `Get<Type>ArrayRegion` on acquire and, in
//! [`ReleaseMode::CopyBack`], written back with `Set<Type>ArrayRegion` on
//! release. A `null` array is an acquire error, never an empty view.

use crate::error::{BridgeError, Result};
use jni::objects::{JByteArray, JDoubleArray, JFloatArray, JIntArray, JLongArray, JString};
use jni::sys::{jbyte, jdouble, jfloat, jint, jlong};
use jni::JNIEnv;
use mobile_surface::marshal::{Pinned, ReleaseMode, ViewSource};
use tracing::warn;

macro_rules! array_source {
    ($(#[$meta:meta])* $name:ident, $array:ident, $elem:ty, $get:ident, $set:ident) => {
        $(#[$meta])*
        pub struct $name<'a, 'local> {
            env: &'a JNIEnv<'local>,
            array: &'a $array<'local>,
        }

        impl<'a, 'local> $name<'a, 'local> {
            pub fn new(env: &'a JNIEnv<'local>, array: &'a $array<'local>) -> Self {
                Self { env, array }
            }
        }

        impl ViewSource for $name<'_, '_> {
            type View = Vec<$elem>;
            type Error = BridgeError;

            fn acquire(&mut self) -> Result<Vec<$elem>> {
                if self.array.is_null() {
                    return Err(BridgeError::NullArgument(stringify!($array)));
                }
                let len = self.env.get_array_length(self.array)?;
                let mut view = vec![<$elem>::default(); usize::try_from(len).unwrap_or(0)];
                self.env.$get(self.array, 0, &mut view)?;
                Ok(view)
            }

            fn release(&mut self, view: Vec<$elem>, mode: ReleaseMode) {
                if mode == ReleaseMode::Abort {
                    return;
                }
                if let Err(e) = self.env.$set(self.array, 0, &view) {
                    warn!("Failed to copy {} back: {}", stringify!($array), e);
                }
            }
        }
    };
}

array_source!(
    /// `int[]` view
    IntArraySource, JIntArray, jint, get_int_array_region, set_int_array_region
);
array_source!(
    /// `long[]` view
    LongArraySource, JLongArray, jlong, get_long_array_region, set_long_array_region
);
array_source!(
    /// `float[]` view
    FloatArraySource, JFloatArray, jfloat, get_float_array_region, set_float_array_region
);
array_source!(
    /// `double[]` view
    DoubleArraySource, JDoubleArray, jdouble, get_double_array_region, set_double_array_region
);
array_source!(
    /// `byte[]` view
    ByteArraySource, JByteArray, jbyte, get_byte_array_region, set_byte_array_region
);

/// Modified UTF-8 view of a `java.lang.String`, decoded to a Rust string
///
/// Strings are immutable on the Java side, so release only frees the view.
pub struct StringSource<'a, 'local> {
    env: &'a mut JNIEnv<'local>,
    string: &'a JString<'local>,
}

impl<'a, 'local> StringSource<'a, 'local> {
    pub fn new(env: &'a mut JNIEnv<'local>, string: &'a JString<'local>) -> Self {
        Self { env, string }
    }
}

impl ViewSource for StringSource<'_, '_> {
    type View = String;
    type Error = BridgeError;

    fn acquire(&mut self) -> Result<String> {
        if self.string.is_null() {
            return Err(BridgeError::NullArgument("String"));
        }
        Ok(self.env.get_string(self.string)?.into())
    }

    fn release(&mut self, _view: String, _mode: ReleaseMode) {}
}

/// Pin an `int[]` with copy-back release
pub fn pin_ints<'a, 'local>(
    env: &'a JNIEnv<'local>,
    array: &'a JIntArray<'local>,
) -> Result<Pinned<IntArraySource<'a, 'local>>> {
    Pinned::acquire(IntArraySource::new(env, array), ReleaseMode::CopyBack)
}

/// Pin a `long[]` with copy-back release
pub fn pin_longs<'a, 'local>(
    env: &'a JNIEnv<'local>,
    array: &'a JLongArray<'local>,
) -> Result<Pinned<LongArraySource<'a, 'local>>> {
    Pinned::acquire(LongArraySource::new(env, array), ReleaseMode::CopyBack)
}

/// Copy a Java string into Rust
pub fn read_string<'local>(env: &mut JNIEnv<'local>, string: &JString<'local>) -> Result<String> {
    let view = Pinned::acquire(StringSource::new(env, string), ReleaseMode::Abort)?;
    Ok(view.clone())
}
