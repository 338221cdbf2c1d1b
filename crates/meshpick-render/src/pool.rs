//! The program pool: one shared, reference-counted pick program per
//! signature.

use std::collections::HashMap;
use std::rc::Rc;

use meshpick_core::{stats, MeshPickError, Mesh, PickOptions, Result, Scene};

use crate::device::GraphicsDevice;
use crate::program::{PickProgram, PickProgramHandle};
use crate::shader::PickShaderSource;
use crate::signature::ProgramSignature;

/// Cache of compiled pick programs keyed by [`ProgramSignature`].
///
/// Meshes with identical compile-time configuration share one program. Each
/// [`acquire`](Self::acquire) must be paired with a [`release`](Self::release);
/// the program is destroyed when its last handle comes back.
///
/// The pool and its handles are confined to the rendering thread.
pub struct ProgramPool {
    programs: HashMap<ProgramSignature, Rc<PickProgram>>,
    source: Rc<dyn PickShaderSource>,
    options: Rc<PickOptions>,
}

impl ProgramPool {
    /// Creates an empty pool with default options.
    pub fn new(source: impl PickShaderSource + 'static) -> Self {
        Self::with_options(source, PickOptions::default())
    }

    /// Creates an empty pool.
    pub fn with_options(source: impl PickShaderSource + 'static, options: PickOptions) -> Self {
        Self {
            programs: HashMap::new(),
            source: Rc::new(source),
            options: Rc::new(options),
        }
    }

    /// Returns the pool options.
    pub fn options(&self) -> &PickOptions {
        &self.options
    }

    /// Returns a handle to the program for `mesh`, compiling it on first use.
    ///
    /// On a compile failure nothing is cached and the error carries the
    /// compiler diagnostics; picking for this configuration is unavailable.
    pub fn acquire(
        &mut self,
        device: &mut dyn GraphicsDevice,
        scene: &Scene,
        mesh: &Mesh,
    ) -> Result<PickProgramHandle> {
        let signature = ProgramSignature::of(scene, mesh);

        if let Some(entry) = self.programs.get(&signature) {
            entry.use_count.set(entry.use_count.get() + 1);
            log::trace!(
                "reusing pick program '{signature}' ({} users)",
                entry.use_count.get()
            );
            return Ok(PickProgramHandle {
                entry: Rc::clone(entry),
            });
        }

        let entry = Rc::new(PickProgram::new(
            signature,
            Rc::clone(&self.source),
            Rc::clone(&self.options),
        ));
        let compiled = entry.compile(device, scene, mesh)?;
        *entry.compiled.borrow_mut() = Some(compiled);
        entry.use_count.set(1);

        self.programs.insert(signature, Rc::clone(&entry));
        stats::program_created();
        log::debug!("pick program '{signature}' added to pool");
        Ok(PickProgramHandle { entry })
    }

    /// Gives a handle back. Returns `true` if this was the last user and the
    /// program was destroyed.
    ///
    /// Handing back a handle this pool doesn't own is a contract violation;
    /// the pool is left untouched. A registered entry always has at least
    /// one user, since only `shutdown` zeroes a count and it also unregisters
    /// the entry.
    pub fn release(
        &mut self,
        device: &mut dyn GraphicsDevice,
        handle: PickProgramHandle,
    ) -> Result<bool> {
        let signature = *handle.signature();
        let registered = self
            .programs
            .get(&signature)
            .is_some_and(|entry| Rc::ptr_eq(entry, &handle.entry));
        if !registered {
            log::error!("released pick program '{signature}' is not in this pool");
            return Err(MeshPickError::ContractViolation(format!(
                "program '{signature}' released to a pool that does not hold it"
            )));
        }

        let entry = &handle.entry;
        let count = entry.use_count.get();
        debug_assert!(count > 0, "registered pick program '{signature}' has no users");
        entry.use_count.set(count.saturating_sub(1));
        if count > 1 {
            return Ok(false);
        }

        if let Some(compiled) = entry.compiled.borrow_mut().take() {
            device.destroy_program(compiled.program);
        }
        self.programs.remove(&signature);
        stats::program_destroyed();
        log::debug!("pick program '{signature}' evicted");
        Ok(true)
    }

    /// Marks every program as lost after a device context reset.
    ///
    /// Entries and use counts survive; each program is recompiled on its
    /// next draw.
    pub fn on_device_reset(&self) {
        for entry in self.programs.values() {
            entry.compiled.borrow_mut().take();
        }
        log::debug!("{} pick programs invalidated by device reset", self.programs.len());
    }

    /// Destroys every program and empties the pool.
    ///
    /// Handles still held elsewhere stop working: drawing with them returns a
    /// contract violation.
    pub fn shutdown(&mut self, device: &mut dyn GraphicsDevice) {
        for (signature, entry) in self.programs.drain() {
            let users = entry.use_count.replace(0);
            if users > 0 {
                log::warn!("pick program '{signature}' still had {users} users at shutdown");
            }
            if let Some(compiled) = entry.compiled.borrow_mut().take() {
                device.destroy_program(compiled.program);
            }
            entry.retired.set(true);
            stats::program_destroyed();
        }
        log::debug!("pick program pool shut down");
    }

    /// Returns the number of cached programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns true if no programs are cached.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Returns whether a program for this signature is cached.
    pub fn contains(&self, signature: &ProgramSignature) -> bool {
        self.programs.contains_key(signature)
    }

    /// Returns the number of users of a signature, 0 if not cached.
    pub fn use_count(&self, signature: &ProgramSignature) -> usize {
        self.programs
            .get(signature)
            .map_or(0, |entry| entry.use_count.get())
    }

    /// Returns an iterator over the cached signatures.
    pub fn signatures(&self) -> impl Iterator<Item = &ProgramSignature> {
        self.programs.keys()
    }
}

impl Drop for ProgramPool {
    fn drop(&mut self) {
        if self.programs.is_empty() {
            return;
        }
        log::warn!(
            "pick program pool dropped with {} programs; call shutdown() to destroy them",
            self.programs.len()
        );
        for entry in self.programs.values() {
            entry.retired.set(true);
            stats::program_destroyed();
        }
    }
}
