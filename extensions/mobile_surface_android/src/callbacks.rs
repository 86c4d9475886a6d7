//! Calls from engine threads back into Java

use crate::error::Result;
use jni::objects::{GlobalRef, JValue};
use jni::JavaVM;
use mobile_surface::reentry::{reenter, CallbackTarget, ManagedCallback, ThreadAttach};
use std::sync::Arc;

/// Attaches native threads to the Java VM
pub struct JniAttacher<'a> {
    vm: &'a JavaVM,
}

impl<'a> JniAttacher<'a> {
    pub fn new(vm: &'a JavaVM) -> Self {
        Self { vm }
    }
}

impl ThreadAttach for JniAttacher<'_> {
    type Error = jni::errors::Error;

    fn is_attached(&self) -> bool {
        self.vm.get_env().is_ok()
    }

    fn attach(&self) -> std::result::Result<(), Self::Error> {
        self.vm.attach_current_thread_permanently().map(|_| ())
    }

    fn detach(&self) {
        // SAFETY: only called by an AttachGuard that attached this thread,
        // after every local reference created under it has been dropped
        unsafe { self.vm.detach_current_thread() }
    }
}

/// Delivers callbacks to the Java surface view that created a surface
pub struct JavaCallbackTarget {
    vm: Arc<JavaVM>,
    view: GlobalRef,
}

impl JavaCallbackTarget {
    pub fn new(vm: Arc<JavaVM>, view: GlobalRef) -> Self {
        Self { vm, view }
    }

    fn call(&self, callback: ManagedCallback) -> Result<()> {
        let mut env = self.vm.get_env()?;
        let args = match callback {
            ManagedCallback::ShowKeyboard => Vec::new(),
            ManagedCallback::PerformanceResult(fps) => vec![JValue::Float(fps)],
        };

        let result = env.call_method(
            &self.view,
            callback.method_name(),
            callback.signature(),
            &args,
        );
        if let Err(e) = result {
            // A failed lookup or a throwing callback leaves an exception pending
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl CallbackTarget for JavaCallbackTarget {
    fn deliver(&self, callback: ManagedCallback) {
        let attacher = JniAttacher::new(&self.vm);
        reenter(&attacher, || self.call(callback));
    }
}
