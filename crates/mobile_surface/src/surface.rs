//! Surface lifecycle and touch injection
//!
//! A [`MobileSurface`] owns at most one engine canvas and tracks whether it
//! is currently bound to a live platform window.
//!
//! ```text
//!                  bind                    release(0)
//! Uninitialized ─────────▶ Bound(valid) ─────────────▶ Released (canvas deleted)
//!                            ▲    │                        │
//!                            │    │ release(ROTATING)      │ bind: new canvas
//!                            │    ▼                        │
//!                            └─ Released (canvas kept) ◀───┘
//!                        bind: same canvas, new window
//! ```
//!
//! Input and refresh calls on a surface that is not bound are no-ops.

use crate::app::MobileApp;
use crate::coords::{pixel_to_window, WindowSize};
use crate::engine::{
    Canvas, CanvasId, PlatformData, SurfaceAction, UpdateKind, WindowHandle, WindowOptions,
};
use crate::error::Result;
use crate::event::{Event, Touch, TouchAction, TouchEvent, TouchId};
use crate::input::{TouchBatch, TouchSample};
use bitflags::bitflags;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, trace};

bitflags! {
    /// Flags passed to [`MobileSurface::release`]
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ReleaseFlags: u32 {
        /// The window is going away only because the screen is rotating;
        /// keep the canvas so the next bind can reuse it
        const SCREEN_ROTATING = 0x0000_0001;
    }
}

/// Lifecycle state of a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceState {
    /// Never bound; no canvas exists
    Uninitialized,
    /// Bound to a live window; input is delivered
    Bound,
    /// Released; the canvas may still exist if the release was a rotation
    Released,
}

#[derive(Default)]
struct SurfaceInner {
    canvas: Option<Arc<dyn Canvas>>,
    valid: bool,
    bound_once: bool,
}

/// One native rendering surface
///
/// `inner` is only held to read or change state; canvas calls happen after
/// it is dropped. `lifecycle` serializes `bind` and `release`.
pub struct MobileSurface {
    id: i32,
    inner: Mutex<SurfaceInner>,
    lifecycle: Mutex<()>,
}

impl MobileSurface {
    /// Create an uninitialized surface for the platform surface `id`
    pub fn new(id: i32) -> Self {
        Self {
            id,
            inner: Mutex::new(SurfaceInner::default()),
            lifecycle: Mutex::new(()),
        }
    }

    /// Platform surface id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Check if the surface is bound to a live window
    pub fn is_valid(&self) -> bool {
        self.inner.lock().valid
    }

    /// Current lifecycle state
    pub fn state(&self) -> SurfaceState {
        let inner = self.inner.lock();
        if inner.valid {
            SurfaceState::Bound
        } else if inner.bound_once {
            SurfaceState::Released
        } else {
            SurfaceState::Uninitialized
        }
    }

    /// Identity of the current canvas, if one exists
    pub fn canvas_id(&self) -> Option<CanvasId> {
        self.canvas().map(|c| c.id())
    }

    /// Window the current canvas renders to, if a canvas exists
    pub fn window_handle(&self) -> Option<WindowHandle> {
        self.canvas().map(|c| c.window_handle())
    }

    /// Bind the surface to a platform window
    ///
    /// Creates the canvas on first use. A released surface that kept its
    /// canvas is rebound to `window` instead of recreating the canvas.
    /// Tracked touches are cleared, the surface becomes valid, and an update
    /// is issued.
    pub fn bind(
        &self,
        app: &MobileApp,
        window: WindowHandle,
        platform_data: Option<PlatformData>,
    ) -> Result<()> {
        let _lifecycle = self.lifecycle.lock();
        let engine = app.engine()?;

        let (existing, valid) = {
            let inner = self.inner.lock();
            (inner.canvas.clone(), inner.valid)
        };

        let canvas = match existing {
            None => {
                let options = WindowOptions::mobile().with_platform_data(platform_data);
                let canvas = engine.create_canvas(window, &options)?;
                info!(
                    "Surface {}: created canvas {:?} for window {:#x}",
                    self.id,
                    canvas.id(),
                    window.as_raw()
                );
                self.inner.lock().canvas = Some(canvas.clone());
                canvas
            }
            Some(canvas) => {
                if !valid {
                    canvas.set_window_handle(window);
                    info!(
                        "Surface {}: rebound canvas {:?} to window {:#x}",
                        self.id,
                        canvas.id(),
                        window.as_raw()
                    );
                }
                canvas
            }
        };

        canvas
            .dispatcher()
            .inject(&Event::Touch(TouchEvent::clear()));

        {
            let mut inner = self.inner.lock();
            inner.valid = true;
            inner.bound_once = true;
        }
        canvas.update(UpdateKind::Default);
        Ok(())
    }

    /// Flush all rendering work and invalidate the surface
    ///
    /// Blocks until a complete update has finished so the caller may destroy
    /// the platform window afterwards. Unless `flags` contains
    /// [`ReleaseFlags::SCREEN_ROTATING`] the canvas is deleted and the engine
    /// synchronized.
    pub fn release(&self, app: &MobileApp, flags: ReleaseFlags) {
        let _lifecycle = self.lifecycle.lock();

        if let Some(canvas) = self.canvas() {
            canvas.update_with_notifier(UpdateKind::Complete).wait();
        }

        if !flags.contains(ReleaseFlags::SCREEN_ROTATING) {
            let canvas = self.inner.lock().canvas.take();
            if let Some(canvas) = canvas {
                debug!("Surface {}: deleting canvas {:?}", self.id, canvas.id());
                canvas.delete();
                match app.engine() {
                    Ok(engine) => engine.synchronize(),
                    Err(e) => debug!("Skipping synchronize: {}", e),
                }
            }
        }

        self.inner.lock().valid = false;
        info!("Surface {} released ({:?})", self.id, flags);
    }

    /// Request a cheap redraw; never blocks
    pub fn refresh(&self) {
        if let Some(canvas) = self.bound_canvas() {
            canvas.update(UpdateKind::Refresh);
        }
    }

    /// Touches started; returns whether an event was dispatched
    pub fn touch_down(&self, batch: &TouchBatch) -> bool {
        self.inject_touch_event(TouchAction::TouchDown, batch)
    }

    /// Touches moved; returns whether an event was dispatched
    pub fn touch_move(&self, batch: &TouchBatch) -> bool {
        self.inject_touch_event(TouchAction::Move, batch)
    }

    /// Touches ended; an empty batch clears all tracked touches
    pub fn touch_up(&self, batch: &TouchBatch) -> bool {
        self.inject_touch_event(TouchAction::TouchUp, batch)
    }

    /// Clear all tracked touches
    pub fn touches_cancel(&self) -> bool {
        self.touch_up(&TouchBatch::empty())
    }

    /// A single tap was recognized
    pub fn single_tap(&self, x: i32, y: i32) -> bool {
        trace!("Surface {}: single tap at ({}, {})", self.id, x, y);
        self.touches_cancel()
    }

    /// A double tap was recognized
    pub fn double_tap(&self, x: i32, y: i32, id: TouchId) -> bool {
        trace!(
            "Surface {}: double tap at ({}, {}) by {:?}",
            self.id,
            x,
            y,
            id
        );
        self.touches_cancel()
    }

    /// Deliver typed text to the surface's window
    pub fn text_input(&self, text: &str) -> bool {
        let Some(canvas) = self.bound_canvas() else {
            return false;
        };
        canvas
            .dispatcher()
            .inject(&Event::TextInput(text.to_string()));
        true
    }

    /// Run an application action on the canvas
    ///
    /// Returns `false` without doing anything if the surface is not bound.
    /// The surface stays usable from other threads while the action runs.
    pub fn perform(&self, action: &SurfaceAction) -> bool {
        match self.bound_canvas() {
            Some(canvas) => canvas.perform(action),
            None => {
                debug!("Surface {}: ignoring '{}' while unbound", self.id, action);
                false
            }
        }
    }

    fn canvas(&self) -> Option<Arc<dyn Canvas>> {
        self.inner.lock().canvas.clone()
    }

    /// The canvas, only while the surface is valid
    fn bound_canvas(&self) -> Option<Arc<dyn Canvas>> {
        let inner = self.inner.lock();
        if inner.valid {
            inner.canvas.clone()
        } else {
            None
        }
    }

    fn inject_touch_event(&self, action: TouchAction, batch: &TouchBatch) -> bool {
        let Some(canvas) = self.bound_canvas() else {
            return false;
        };

        let size = canvas.window_size();
        let touches = batch
            .samples()
            .iter()
            .map(|sample| to_window_touch(sample, size, batch.tap_count()))
            .collect();
        let event = TouchEvent::new(action, touches);

        canvas.dispatcher().inject(&Event::Touch(event));
        true
    }
}

fn to_window_touch(sample: &TouchSample, size: WindowSize, tap_count: usize) -> Touch {
    Touch {
        id: sample.id,
        position: pixel_to_window(sample.pixel_point(), size),
        tap_count,
    }
}
