//! Natives of the Java application class

use crate::bridge::bridge;
use crate::marshal::read_string;
use crate::onload::{natives, NativeEntry};
use jni::objects::{JClass, JString};
use jni::JNIEnv;
use mobile_surface::BridgeContext;
use std::path::Path;
use tracing::warn;

/// Method table for the application class
pub fn natives() -> Vec<NativeEntry> {
    natives![
        "shutdownV", "()V" => shutdown;
        "setLibraryDirectoryS", "(Ljava/lang/String;)V" => set_library_directory;
        "setFontDirectoryS", "(Ljava/lang/String;)V" => set_font_directory;
        "setMaterialsDirectoryS", "(Ljava/lang/String;)V" => set_materials_directory;
    ]
}

extern "system" fn shutdown<'local>(_env: JNIEnv<'local>, _class: JClass<'local>) {
    if let Some(bridge) = bridge() {
        bridge.context().shutdown();
    }
}

fn with_directory<'local>(
    env: &mut JNIEnv<'local>,
    dir: &JString<'local>,
    set: impl FnOnce(&BridgeContext, &Path),
) {
    let Some(bridge) = bridge() else {
        return;
    };
    match read_string(env, dir) {
        Ok(dir) => set(bridge.context(), Path::new(&dir)),
        Err(e) => warn!("Ignoring directory: {}", e),
    }
}

extern "system" fn set_library_directory<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    dir: JString<'local>,
) {
    with_directory(&mut env, &dir, BridgeContext::set_library_directory);
}

extern "system" fn set_font_directory<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    dir: JString<'local>,
) {
    with_directory(&mut env, &dir, BridgeContext::set_font_directory);
}

extern "system" fn set_materials_directory<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    dir: JString<'local>,
) {
    with_directory(&mut env, &dir, BridgeContext::set_materials_directory);
}
