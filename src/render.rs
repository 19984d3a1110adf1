//! Renderer lifecycle seam.
//!
//! Map layers hold resources (a map instance, layer groups) that must be
//! released when the trail view goes away. A [`TrailRenderer`] makes that
//! explicit: `mount` acquires a handle, `update` redraws it from a fresh
//! [`TrailView`], `dispose` releases it. [`RenderSession`] owns a handle and
//! disposes it exactly once, on [`RenderSession::close`] or on drop.
//!
//! No concrete renderer lives in this crate.

use log::debug;

use crate::error::Result;
use crate::TrailView;

/// A map layer that can draw trail views.
pub trait TrailRenderer {
    /// Where the renderer draws (DOM node id, canvas, file path...)
    type Container;
    /// Resources owned while mounted
    type Handle;

    fn mount(&mut self, container: Self::Container) -> Result<Self::Handle>;

    /// Redraw everything from `view`. Views are never diffed.
    fn update(&mut self, handle: &mut Self::Handle, view: &TrailView) -> Result<()>;

    fn dispose(&mut self, handle: Self::Handle);
}

/// A mounted renderer with its handle.
pub struct RenderSession<R: TrailRenderer> {
    renderer: R,
    handle: Option<R::Handle>,
    updates: u64,
}

impl<R: TrailRenderer> RenderSession<R> {
    /// Mount `renderer` into `container`.
    pub fn open(mut renderer: R, container: R::Container) -> Result<Self> {
        let handle = renderer.mount(container)?;
        debug!("[RenderSession] Mounted");
        Ok(Self {
            renderer,
            handle: Some(handle),
            updates: 0,
        })
    }

    /// Redraw from `view`.
    pub fn update(&mut self, view: &TrailView) -> Result<()> {
        if let Some(handle) = self.handle.as_mut() {
            self.renderer.update(handle, view)?;
            self.updates += 1;
        }
        Ok(())
    }

    /// Number of successful updates so far.
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Dispose the handle now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.renderer.dispose(handle);
            debug!("[RenderSession] Disposed after {} updates", self.updates);
        }
    }
}

impl<R: TrailRenderer> Drop for RenderSession<R> {
    fn drop(&mut self) {
        self.release();
    }
}
