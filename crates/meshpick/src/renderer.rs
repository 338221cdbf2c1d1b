//! Renderer-scoped ownership of the device and the program pool.

use meshpick_core::{Mesh, PickOptions, Result, Scene};
use meshpick_render::{
    FrameCounters, GraphicsDevice, PickFrame, PickProgramHandle, PickShaderSource, ProgramPool,
};

/// Owns a graphics device and the pick program pool that lives on it.
///
/// The pool is created with the renderer and torn down by
/// [`shutdown`](Self::shutdown), which hands the device back.
pub struct PickRenderer<D: GraphicsDevice> {
    device: D,
    pool: ProgramPool,
}

impl<D: GraphicsDevice> PickRenderer<D> {
    /// Creates a renderer with default options.
    pub fn new(device: D, source: impl PickShaderSource + 'static) -> Self {
        Self::with_options(device, source, PickOptions::default())
    }

    /// Creates a renderer.
    pub fn with_options(
        device: D,
        source: impl PickShaderSource + 'static,
        options: PickOptions,
    ) -> Self {
        log::info!("meshpick renderer initialized");
        Self {
            device,
            pool: ProgramPool::with_options(source, options),
        }
    }

    /// Acquires the pick program for `mesh` in `scene`.
    pub fn acquire(&mut self, scene: &Scene, mesh: &Mesh) -> Result<PickProgramHandle> {
        self.pool.acquire(&mut self.device, scene, mesh)
    }

    /// Releases a handle. Returns `true` if its program was destroyed.
    pub fn release(&mut self, handle: PickProgramHandle) -> Result<bool> {
        self.pool.release(&mut self.device, handle)
    }

    /// Draws one pick pass and returns its counters.
    ///
    /// Draws are issued in order, so sorting them by handle keeps program
    /// switches down. Stops at the first failed draw.
    pub fn draw_pass(
        &mut self,
        scene: &Scene,
        mut frame: PickFrame,
        draws: &[(&PickProgramHandle, &Mesh)],
    ) -> Result<FrameCounters> {
        for (handle, mesh) in draws {
            handle.draw_mesh(&mut self.device, scene, &mut frame, mesh)?;
        }
        log::trace!("pick pass drew {} meshes: {:?}", draws.len(), frame.counters);
        Ok(frame.counters)
    }

    /// Forwards a device context loss to every pooled program.
    pub fn device_lost(&mut self) {
        log::info!("graphics device lost; pick programs will be recompiled");
        self.pool.on_device_reset();
    }

    /// Destroys every pooled program and returns the device.
    pub fn shutdown(mut self) -> D {
        self.pool.shutdown(&mut self.device);
        log::info!("meshpick renderer shut down");
        self.device
    }

    /// Returns the device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Returns the device mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Returns the program pool.
    pub fn pool(&self) -> &ProgramPool {
        &self.pool
    }
}
