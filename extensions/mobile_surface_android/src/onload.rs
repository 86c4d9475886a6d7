//! Library load and native method registration

use crate::bridge::{self, AndroidBridge};
use crate::error::{BridgeError, Result};
use crate::{logging, mobile_app, surface_view, user_surface_view};
use jni::sys::{jint, JNI_ERR, JNI_VERSION_1_6};
use jni::{JNIEnv, JavaVM, NativeMethod};
use mobile_surface::{BridgeConfig, BridgeContext, EngineFactory};
use std::ffi::c_void;
use tracing::{error, info};

/// One entry of a `RegisterNatives` table
pub struct NativeEntry {
    pub name: &'static str,
    pub signature: String,
    pub fn_ptr: *mut c_void,
}

impl NativeEntry {
    fn to_native_method(&self) -> NativeMethod {
        NativeMethod {
            name: self.name.into(),
            sig: self.signature.as_str().into(),
            fn_ptr: self.fn_ptr,
        }
    }
}

/// Build a table of [`NativeEntry`] from `name, signature => function` rows
macro_rules! natives {
    ($($name:literal, $sig:expr => $func:path;)*) => {
        vec![$(
            $crate::onload::NativeEntry {
                name: $name,
                signature: ::std::string::String::from($sig),
                fn_ptr: $func as *mut ::std::ffi::c_void,
            },
        )*]
    };
}
pub(crate) use natives;

/// Register `entries` on the class at `class_path`
pub fn register(env: &mut JNIEnv<'_>, class_path: &str, entries: &[NativeEntry]) -> Result<()> {
    let class = match env.find_class(class_path) {
        Ok(class) => class,
        Err(_) => {
            // FindClass leaves NoClassDefFoundError pending
            let _ = env.exception_clear();
            return Err(BridgeError::ClassNotFound(class_path.to_string()));
        }
    };

    let methods: Vec<NativeMethod> = entries.iter().map(NativeEntry::to_native_method).collect();
    env.register_native_methods(&class, &methods)
        .map_err(|source| BridgeError::Registration {
            class: class_path.to_string(),
            source,
        })
}

fn register_all(env: &mut JNIEnv<'_>, config: &BridgeConfig) -> Result<()> {
    let classes = &config.classes;
    register(env, &classes.surface_view, &surface_view::natives(classes))?;
    register(env, &classes.user_surface_view, &user_surface_view::natives())?;
    register(env, &classes.mobile_app, &mobile_app::natives())?;
    Ok(())
}

/// Body of `JNI_OnLoad`
///
/// Initializes logging, registers the three native method tables and
/// installs the bridge. Returns `JNI_VERSION_1_6`, or `JNI_ERR` if any class
/// is missing or any table is rejected.
pub fn on_load(vm: JavaVM, factory: EngineFactory, config: BridgeConfig) -> jint {
    logging::init(&config.log);

    let registered = match vm.get_env() {
        Ok(mut env) => register_all(&mut env, &config),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = registered {
        error!("JNI_OnLoad failed: {}", e);
        return JNI_ERR;
    }

    let context = BridgeContext::new(factory, config);
    if bridge::install(AndroidBridge::new(vm, context)).is_err() {
        info!("Native library loaded twice; keeping the first bridge");
    }
    info!("Native methods registered");
    JNI_VERSION_1_6
}

/// Define `JNI_OnLoad` for a native library
///
/// ```ignore
/// mobile_surface_android::export_mobile_surface!(|| Ok(my_engine::create()));
///
/// // or with a non-default configuration
/// mobile_surface_android::export_mobile_surface!(
///     || Ok(my_engine::create()),
///     mobile_surface::BridgeConfig::from_toml_str(include_str!("bridge.toml"))
///         .unwrap_or_default()
/// );
/// ```
#[macro_export]
macro_rules! export_mobile_surface {
    ($factory:expr) => {
        $crate::export_mobile_surface!($factory, $crate::__private::BridgeConfig::default());
    };
    ($factory:expr, $config:expr) => {
        #[no_mangle]
        pub extern "system" fn JNI_OnLoad(
            vm: *mut $crate::__private::jni::sys::JavaVM,
            _reserved: *mut ::std::ffi::c_void,
        ) -> $crate::__private::jni::sys::jint {
            // SAFETY: the VM passes a valid JavaVM pointer to JNI_OnLoad
            let vm = match unsafe { $crate::__private::jni::JavaVM::from_raw(vm) } {
                Ok(vm) => vm,
                Err(_) => return $crate::__private::jni::sys::JNI_ERR,
            };
            $crate::on_load(vm, ::std::boxed::Box::new($factory), $config)
        }
    };
}
