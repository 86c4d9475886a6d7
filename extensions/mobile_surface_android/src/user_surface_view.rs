//! Natives of the application's surface view subclass
//!
//! Each maps to one [`SurfaceAction`]; all are no-ops until the surface is
//! bound.

use crate::marshal::read_string;
use crate::onload::{natives, NativeEntry};
use crate::surface_view::with_surface;
use jni::objects::{JClass, JString};
use jni::sys::{jboolean, jlong, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use mobile_surface::SurfaceAction;
use std::path::PathBuf;
use tracing::warn;

/// Method table for the user surface view class
pub fn natives() -> Vec<NativeEntry> {
    natives![
        "loadFileS", "(JLjava/lang/String;)Z" => load_file;
        "setOperatorOrbitV", "(J)V" => set_operator_orbit;
        "onModeSimpleShadowZ", "(JZ)V" => on_mode_simple_shadow;
        "onModeSmoothV", "(J)V" => on_mode_smooth;
        "onModeHiddenLineV", "(J)V" => on_mode_hidden_line;
        "onUserCode1V", "(J)V" => on_user_code_1;
        "onUserCode2V", "(J)V" => on_user_code_2;
        "onUserCode3V", "(J)V" => on_user_code_3;
        "onUserCode4V", "(J)V" => on_user_code_4;
    ]
}

fn perform(ptr: jlong, action: SurfaceAction) -> bool {
    with_surface(ptr, false, |bridge, handle| {
        bridge.context().perform(handle, &action)
    })
}

extern "system" fn load_file<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    path: JString<'local>,
) -> jboolean {
    let path = match read_string(&mut env, &path) {
        Ok(path) => PathBuf::from(path),
        Err(e) => {
            warn!("Cannot load file: {}", e);
            return JNI_FALSE;
        }
    };
    if perform(ptr, SurfaceAction::LoadFile(path)) {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

extern "system" fn on_mode_simple_shadow<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    enable: jboolean,
) {
    perform(ptr, SurfaceAction::SimpleShadow(enable != JNI_FALSE));
}

macro_rules! action_native {
    ($name:ident, $action:expr) => {
        extern "system" fn $name<'local>(_env: JNIEnv<'local>, _class: JClass<'local>, ptr: jlong) {
            perform(ptr, $action);
        }
    };
}

action_native!(set_operator_orbit, SurfaceAction::SetOperatorOrbit);
action_native!(on_mode_smooth, SurfaceAction::SmoothMode);
action_native!(on_mode_hidden_line, SurfaceAction::HiddenLineMode);
action_native!(on_user_code_1, SurfaceAction::UserCode(1));
action_native!(on_user_code_2, SurfaceAction::UserCode(2));
action_native!(on_user_code_3, SurfaceAction::UserCode(3));
action_native!(on_user_code_4, SurfaceAction::UserCode(4));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        let table = natives();
        assert_eq!(table.len(), 9);
        assert_eq!(table[0].signature, "(JLjava/lang/String;)Z");
        let shadow = table
            .iter()
            .find(|e| e.name == "onModeSimpleShadowZ")
            .unwrap();
        assert_eq!(shadow.signature, "(JZ)V");
    }

    #[test]
    fn test_perform_without_bridge() {
        assert!(!perform(1, SurfaceAction::SmoothMode));
    }
}
