//! Natives of the Java surface view
//!
//! # Usage from Java
//!
//! ```java
//! public class AndroidMobileSurfaceView extends SurfaceView {
//!     private static native long create(AndroidMobileSurfaceView view, int guiSurfaceId);
//!     private static native boolean bind(long ptr, Object context, Object surface);
//!     private static native void release(long ptr, int flags);
//!     private static native void refresh(long ptr);
//!     private static native void touchDown(long ptr, int count, int[] xs, int[] ys, long[] ids);
//!     private static native void touchMove(long ptr, int count, int[] xs, int[] ys, long[] ids);
//!     private static native void touchUp(long ptr, int count, int[] xs, int[] ys, long[] ids);
//!     private static native void touchesCancel(long ptr);
//!     private static native void singleTap(long ptr, int x, int y);
//!     private static native void doubleTap(long ptr, int x, int y, long id);
//!     private static native void onTextInputJS(long ptr, String text);
//!     private static native void onKeyboardHiddenJ(long ptr);
//!
//!     // Called back from native threads
//!     public void ShowKeyboard() { ... }
//!     public void ShowPerformanceTestResult(float fps) { ... }
//! }
//! ```
//!
//! `ptr` is an opaque surface handle, never `0` for a created surface.

use crate::bridge::{bridge, release_flags, surface_handle, AndroidBridge};
use crate::error::Result;
use crate::marshal::{pin_ints, pin_longs, read_string};
use crate::onload::{natives, NativeEntry};
use jni::objects::{JClass, JIntArray, JLongArray, JObject, JString};
use jni::sys::{jboolean, jint, jlong, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use mobile_surface::{ClassPaths, SurfaceHandle, TouchBatch, TouchId};
use tracing::{error, warn};

/// Method table for the surface view class
pub fn natives(classes: &ClassPaths) -> Vec<NativeEntry> {
    natives![
        "create", format!("(L{};I)J", classes.surface_view) => create;
        "bind", "(JLjava/lang/Object;Ljava/lang/Object;)Z" => bind;
        "release", "(JI)V" => release;
        "refresh", "(J)V" => refresh;
        "touchDown", "(JI[I[I[J)V" => touch_down;
        "touchMove", "(JI[I[I[J)V" => touch_move;
        "touchUp", "(JI[I[I[J)V" => touch_up;
        "touchesCancel", "(J)V" => touches_cancel;
        "singleTap", "(JII)V" => single_tap;
        "doubleTap", "(JIIJ)V" => double_tap;
        "onTextInputJS", "(JLjava/lang/String;)V" => on_text_input;
        "onKeyboardHiddenJ", "(J)V" => on_keyboard_hidden;
    ]
}

/// Run `f` with the bridge and a decoded handle, or return `default`
pub(crate) fn with_surface<R>(
    raw: jlong,
    default: R,
    f: impl FnOnce(&AndroidBridge, SurfaceHandle) -> R,
) -> R {
    match (bridge(), surface_handle(raw)) {
        (Some(bridge), Some(handle)) => f(bridge, handle),
        _ => default,
    }
}

fn touch_batch<'local>(
    env: &JNIEnv<'local>,
    count: jint,
    xs: &JIntArray<'local>,
    ys: &JIntArray<'local>,
    ids: &JLongArray<'local>,
) -> Result<TouchBatch> {
    let xs = pin_ints(env, xs)?;
    let ys = pin_ints(env, ys)?;
    let ids = pin_longs(env, ids)?;
    Ok(TouchBatch::from_slices(count, &xs, &ys, &ids))
}

extern "system" fn create<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    view: JObject<'local>,
    gui_surface_id: jint,
) -> jlong {
    let Some(bridge) = bridge() else {
        return 0;
    };
    match bridge.create(&env, &view, gui_surface_id) {
        Ok(handle) => handle.to_raw(),
        Err(e) => {
            error!("Failed to create surface {}: {}", gui_surface_id, e);
            0
        }
    }
}

extern "system" fn bind<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    context: JObject<'local>,
    surface: JObject<'local>,
) -> jboolean {
    let bound = with_surface(ptr, false, |bridge, handle| {
        bridge
            .bind(&env, handle, &context, &surface)
            .unwrap_or_else(|e| {
                error!("Failed to bind surface {}: {}", ptr, e);
                false
            })
    });
    if bound {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

extern "system" fn release<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    flags: jint,
) {
    with_surface(ptr, (), |bridge, handle| {
        bridge.release(handle, release_flags(flags))
    });
}

extern "system" fn refresh<'local>(_env: JNIEnv<'local>, _class: JClass<'local>, ptr: jlong) {
    with_surface(ptr, (), |bridge, handle| bridge.context().refresh(handle));
}

macro_rules! touch_native {
    ($name:ident, $op:ident) => {
        extern "system" fn $name<'local>(
            env: JNIEnv<'local>,
            _class: JClass<'local>,
            ptr: jlong,
            count: jint,
            xs: JIntArray<'local>,
            ys: JIntArray<'local>,
            ids: JLongArray<'local>,
        ) {
            with_surface(ptr, (), |bridge, handle| {
                match touch_batch(&env, count, &xs, &ys, &ids) {
                    Ok(batch) => bridge.context().$op(handle, &batch),
                    Err(e) => warn!("Dropping {}: {}", stringify!($op), e),
                }
            });
        }
    };
}

touch_native!(touch_down, touch_down);
touch_native!(touch_move, touch_move);
touch_native!(touch_up, touch_up);

extern "system" fn touches_cancel<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
) {
    with_surface(ptr, (), |bridge, handle| {
        bridge.context().touches_cancel(handle)
    });
}

extern "system" fn single_tap<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    x: jint,
    y: jint,
) {
    with_surface(ptr, (), |bridge, handle| {
        bridge.context().single_tap(handle, x, y)
    });
}

extern "system" fn double_tap<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    x: jint,
    y: jint,
    id: jlong,
) {
    with_surface(ptr, (), |bridge, handle| {
        bridge.context().double_tap(handle, x, y, TouchId(id))
    });
}

extern "system" fn on_text_input<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    ptr: jlong,
    text: JString<'local>,
) {
    with_surface(ptr, (), |bridge, handle| match read_string(&mut env, &text) {
        Ok(text) => bridge.context().text_input(handle, &text),
        Err(e) => warn!("Dropping text input: {}", e),
    });
}

extern "system" fn on_keyboard_hidden<'local>(
    _env: JNIEnv<'local>,
    _class: JClass<'local>,
    _ptr: jlong,
) {
    if let Some(bridge) = bridge() {
        bridge.context().keyboard_hidden();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_uses_configured_view_class() {
        let classes = ClassPaths {
            surface_view: "com/example/View".to_string(),
            ..ClassPaths::default()
        };
        let table = natives(&classes);
        assert_eq!(table.len(), 12);
        assert_eq!(table[0].name, "create");
        assert_eq!(table[0].signature, "(Lcom/example/View;I)J");
    }

    #[test]
    fn test_touch_signatures() {
        let table = natives(&ClassPaths::default());
        for name in ["touchDown", "touchMove", "touchUp"] {
            let entry = table.iter().find(|e| e.name == name).unwrap();
            assert_eq!(entry.signature, "(JI[I[I[J)V");
        }
    }

    #[test]
    fn test_with_surface_without_bridge() {
        // No JNI_OnLoad in unit tests, so the default comes back
        assert!(!with_surface(1, false, |_, _| true));
    }
}
