//! JNI bridge errors

use thiserror::Error;

/// Errors raised at the JNI boundary
///
/// None of these cross into Java: entry points log them and fall back to
/// `false`, `0` or a no-op.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A JNI call failed
    #[error("JNI error: {0}")]
    Jni(#[from] jni::errors::Error),

    /// A class named in the config could not be found
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// `RegisterNatives` rejected a method table
    #[error("Failed to register native methods for {class}: {source}")]
    Registration {
        class: String,
        #[source]
        source: jni::errors::Error,
    },

    /// Java passed `null` where an object was required
    #[error("Null {0} argument")]
    NullArgument(&'static str),

    /// The Java surface has no native window behind it
    #[error("Surface has no native window")]
    NoNativeWindow,

    /// Native windows only exist on Android
    #[error("Native windows are only available on Android")]
    Unsupported,

    /// A native method ran before `JNI_OnLoad` finished
    #[error("Bridge not initialized")]
    NotInitialized,
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BridgeError::ClassNotFound("com/example/View".into()).to_string(),
            "Class not found: com/example/View"
        );
        assert_eq!(
            BridgeError::NullArgument("xs").to_string(),
            "Null xs argument"
        );
    }

    #[test]
    fn test_jni_error_converts() {
        let err: BridgeError = jni::errors::Error::NullPtr("env").into();
        assert!(matches!(err, BridgeError::Jni(_)));
    }
}
