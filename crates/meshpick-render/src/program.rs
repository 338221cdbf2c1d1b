//! Pool entries: one compiled pick program shared by every mesh with the same
//! signature.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use meshpick_core::{MeshPickError, Mesh, PickOptions, Result, Scene, StateId, UniformNames};

use crate::device::{AttributeLocation, GraphicsDevice, ProgramId, UniformLocation};
use crate::shader::PickShaderSource;
use crate::signature::ProgramSignature;

/// Uniform locations of one clip slot.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ClipLocations {
    pub(crate) active: Option<UniformLocation>,
    pub(crate) pos: Option<UniformLocation>,
    pub(crate) dir: Option<UniformLocation>,
}

/// Every location the draw path may touch, resolved once per allocation.
#[derive(Debug, Clone, Default)]
pub(crate) struct PickLocations {
    pub(crate) positions_decode_matrix: Option<UniformLocation>,
    pub(crate) model_matrix: Option<UniformLocation>,
    pub(crate) view_matrix: Option<UniformLocation>,
    pub(crate) proj_matrix: Option<UniformLocation>,
    pub(crate) clips: Vec<ClipLocations>,
    pub(crate) position: Option<AttributeLocation>,
    pub(crate) clippable: Option<UniformLocation>,
    pub(crate) pick_color: Option<UniformLocation>,
    pub(crate) point_size: Option<UniformLocation>,
}

impl PickLocations {
    fn resolve(
        device: &dyn GraphicsDevice,
        program: ProgramId,
        names: &UniformNames,
        clip_slots: usize,
    ) -> Self {
        let uniform = |name: &str| device.uniform_location(program, name);
        Self {
            positions_decode_matrix: uniform(&names.positions_decode_matrix),
            model_matrix: uniform(&names.model_matrix),
            view_matrix: uniform(&names.view_matrix),
            proj_matrix: uniform(&names.proj_matrix),
            clips: (0..clip_slots)
                .map(|slot| ClipLocations {
                    active: uniform(&names.clip_active(slot)),
                    pos: uniform(&names.clip_pos(slot)),
                    dir: uniform(&names.clip_dir(slot)),
                })
                .collect(),
            position: device.attribute_location(program, &names.position),
            clippable: uniform(&names.clippable),
            pick_color: uniform(&names.pick_color),
            point_size: uniform(&names.point_size),
        }
    }
}

/// A linked program with its resolved locations.
#[derive(Debug)]
pub(crate) struct CompiledProgram {
    /// Unique per compile. Device program names may be recycled after a
    /// destroy, so draw-state tracking keys on this instead.
    pub(crate) id: StateId,
    pub(crate) program: ProgramId,
    pub(crate) locations: PickLocations,
}

/// Shared state behind every handle of one signature.
pub(crate) struct PickProgram {
    pub(crate) signature: ProgramSignature,
    source: Rc<dyn PickShaderSource>,
    options: Rc<PickOptions>,
    /// `None` until allocated, and again after a device reset.
    pub(crate) compiled: RefCell<Option<CompiledProgram>>,
    pub(crate) use_count: Cell<usize>,
    /// Set once the owning pool has shut down.
    pub(crate) retired: Cell<bool>,
}

impl PickProgram {
    pub(crate) fn new(
        signature: ProgramSignature,
        source: Rc<dyn PickShaderSource>,
        options: Rc<PickOptions>,
    ) -> Self {
        Self {
            signature,
            source,
            options,
            compiled: RefCell::new(None),
            use_count: Cell::new(0),
            retired: Cell::new(false),
        }
    }

    /// Generates, compiles and reflects a program for this signature.
    pub(crate) fn compile(
        &self,
        device: &mut dyn GraphicsDevice,
        scene: &Scene,
        mesh: &Mesh,
    ) -> Result<CompiledProgram> {
        let source = self.source.generate(scene, mesh);
        let program = device.compile_program(&source).map_err(|mut diagnostics| {
            if diagnostics.is_empty() {
                diagnostics.push("program failed to link without reporting diagnostics".into());
            }
            if self.options.log_compile_failures {
                log::error!("pick program '{}' failed to compile", self.signature);
                for line in &diagnostics {
                    log::error!("  {line}");
                }
            }
            MeshPickError::ShaderCompileFailed {
                signature: self.signature.to_string(),
                diagnostics,
            }
        })?;
        meshpick_core::stats::program_compiled();

        let locations = PickLocations::resolve(
            device,
            program,
            &self.options.uniform_names,
            scene.clips.len(),
        );
        if locations.pick_color.is_none() {
            log::warn!(
                "pick program '{}' has no '{}' uniform; its meshes will draw as id 0",
                self.signature,
                self.options.uniform_names.pick_color
            );
        }
        log::debug!("compiled pick program '{}' as {program:?}", self.signature);
        Ok(CompiledProgram {
            id: StateId::next(),
            program,
            locations,
        })
    }
}

/// A counted reference to a pool entry.
///
/// Returned by [`ProgramPool::acquire`](crate::ProgramPool::acquire) and given
/// back with [`ProgramPool::release`](crate::ProgramPool::release). Every
/// handle of one signature shares the same compiled program.
pub struct PickProgramHandle {
    pub(crate) entry: Rc<PickProgram>,
}

impl PickProgramHandle {
    /// Returns the signature of the shared program.
    pub fn signature(&self) -> &ProgramSignature {
        &self.entry.signature
    }

    /// Returns the number of live acquisitions of this entry.
    pub fn use_count(&self) -> usize {
        self.entry.use_count.get()
    }

    /// Returns the device program, or `None` while it is not allocated.
    pub fn program_id(&self) -> Option<ProgramId> {
        self.entry
            .compiled
            .borrow()
            .as_ref()
            .map(|compiled| compiled.program)
    }

    /// Returns whether a device program is currently allocated.
    pub fn is_allocated(&self) -> bool {
        self.entry.compiled.borrow().is_some()
    }

    /// Returns whether both handles refer to the same pool entry.
    pub fn same_entry(&self, other: &PickProgramHandle) -> bool {
        Rc::ptr_eq(&self.entry, &other.entry)
    }

    /// Marks the program as lost after the device context was reset.
    ///
    /// The old program is not destroyed, since it died with the context. Use
    /// counts are untouched and the next draw recompiles.
    pub fn on_device_reset(&self) {
        self.entry.compiled.borrow_mut().take();
    }
}

impl std::fmt::Debug for PickProgramHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickProgramHandle")
            .field("signature", &self.entry.signature.to_string())
            .field("use_count", &self.use_count())
            .field("program", &self.program_id())
            .finish()
    }
}
