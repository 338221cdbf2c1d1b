//! State-diffing draw of a mesh into the pick buffer.

use meshpick_core::{pick_color, MeshPickError, Mesh, PrimitiveTopology, Result, Scene};

use crate::device::{GraphicsDevice, UniformValue, VertexElementType};
use crate::frame::PickFrame;
use crate::program::{CompiledProgram, PickProgramHandle};

impl PickProgramHandle {
    /// Draws `mesh` with this program, issuing only the state changes that
    /// differ from what `frame` says is bound.
    ///
    /// If the program was lost to a device reset it is recompiled first; the
    /// caller sees nothing of it unless the recompile itself fails.
    pub fn draw_mesh(
        &self,
        device: &mut dyn GraphicsDevice,
        scene: &Scene,
        frame: &mut PickFrame,
        mesh: &Mesh,
    ) -> Result<()> {
        if self.entry.retired.get() {
            return Err(MeshPickError::ContractViolation(format!(
                "draw with program '{}' after its pool shut down",
                self.entry.signature
            )));
        }

        let mut slot = self.entry.compiled.borrow_mut();
        let compiled = match slot.take() {
            Some(compiled) => compiled,
            None => {
                log::debug!("reallocating pick program '{}'", self.entry.signature);
                self.entry.compile(device, scene, mesh)?
            }
        };

        if frame.last_program != Some(compiled.id) {
            bind_program(&compiled, device, scene, frame);
        }
        bind_material(&compiled, device, frame, mesh);

        let locations = &compiled.locations;
        if let Some(location) = locations.model_matrix {
            device.set_uniform(location, UniformValue::Mat4(mesh.world_matrix));
        }
        if let Some(location) = locations.clippable {
            device.set_uniform(location, mesh.clippable.into());
        }

        bind_geometry(&compiled, device, frame, mesh);

        if let Some(location) = locations.pick_color {
            device.set_uniform(location, UniformValue::Vec4(pick_color(mesh.pick_id)));
        }

        let geometry = mesh.geometry();
        if let Some(indices) = geometry.indices {
            device.draw_elements(geometry.primitive, indices.count, indices.index_type);
            frame.counters.draw_elements += 1;
        } else if let Some(positions) = geometry.positions {
            device.draw_arrays(PrimitiveTopology::Triangles, 0, positions.vertex_count);
            frame.counters.draw_arrays += 1;
        }

        *slot = Some(compiled);
        Ok(())
    }
}

fn bind_program(
    compiled: &CompiledProgram,
    device: &mut dyn GraphicsDevice,
    scene: &Scene,
    frame: &mut PickFrame,
) {
    device.use_program(compiled.program);
    frame.last_program = Some(compiled.id);
    frame.counters.use_program += 1;
    frame.reset_bindings();

    let locations = &compiled.locations;
    if let Some(location) = locations.view_matrix {
        let view = frame
            .pick_view_matrix
            .unwrap_or_else(|| scene.camera.view_matrix());
        device.set_uniform(location, UniformValue::Mat4(view));
    }
    if let Some(location) = locations.proj_matrix {
        let projection = frame
            .pick_proj_matrix
            .unwrap_or_else(|| scene.camera.projection_matrix());
        device.set_uniform(location, UniformValue::Mat4(projection));
    }

    for (slot, clip) in locations.clips.iter().zip(scene.clips.clips()) {
        if let Some(location) = slot.active {
            device.set_uniform(location, clip.is_active().into());
        }
        if let Some(location) = slot.pos {
            device.set_uniform(location, UniformValue::Vec3(clip.pos()));
        }
        if let Some(location) = slot.dir {
            device.set_uniform(location, UniformValue::Vec3(clip.dir()));
        }
    }
}

fn bind_material(
    compiled: &CompiledProgram,
    device: &mut dyn GraphicsDevice,
    frame: &mut PickFrame,
    mesh: &Mesh,
) {
    let material = mesh.material();
    if frame.last_material == Some(material.id()) {
        return;
    }

    if frame.backfaces != Some(material.backfaces) {
        device.set_cull_face(!material.backfaces);
        frame.backfaces = Some(material.backfaces);
    }
    if frame.front_face != Some(material.front_face) {
        device.set_front_face(material.front_face);
        frame.front_face = Some(material.front_face);
    }
    if frame.line_width != Some(material.line_width) {
        device.set_line_width(material.line_width);
        frame.line_width = Some(material.line_width);
    }
    if let Some(location) = compiled.locations.point_size {
        if frame.point_size != Some(material.point_size) {
            device.set_uniform(location, UniformValue::Float(material.point_size));
            frame.point_size = Some(material.point_size);
        }
    }
    frame.last_material = Some(material.id());
}

fn bind_geometry(
    compiled: &CompiledProgram,
    device: &mut dyn GraphicsDevice,
    frame: &mut PickFrame,
    mesh: &Mesh,
) {
    let geometry = mesh.geometry();
    if frame.last_geometry == Some(geometry.id()) {
        return;
    }

    let locations = &compiled.locations;
    if let (Some(location), Some(matrix)) =
        (locations.positions_decode_matrix, geometry.positions_decode_matrix)
    {
        device.set_uniform(location, UniformValue::Mat4(matrix));
    }
    if let (Some(attribute), Some(positions)) = (locations.position, geometry.positions) {
        let element_type = if geometry.is_quantized() {
            VertexElementType::U16
        } else {
            VertexElementType::F32
        };
        device.bind_vertex_buffer(attribute, positions.buffer, element_type);
        frame.counters.bind_array += 1;
    }
    if let Some(indices) = geometry.indices {
        device.bind_index_buffer(indices.buffer);
        frame.counters.bind_array += 1;
    }
    frame.last_geometry = Some(geometry.id());
}
