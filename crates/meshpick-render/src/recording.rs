//! Headless graphics device that records commands.
//!
//! [`RecordingDevice`] implements [`GraphicsDevice`] without a GPU. It
//! performs a light validation pass on shader sources, reflects uniform and
//! attribute declarations into locations, and keeps every state command in an
//! inspectable log. Useful for tests, for tracing what a pick pass would send
//! to the driver, and for simulating device loss.

use std::collections::HashMap;

use crate::device::{
    AttributeLocation, BufferId, FrontFace, GraphicsDevice, IndexType, PrimitiveTopology,
    ProgramId, UniformLocation, UniformValue, VertexElementType,
};
use crate::shader::ShaderSource;

/// A command issued to a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    UseProgram(ProgramId),
    SetUniform {
        location: UniformLocation,
        value: UniformValue,
    },
    SetCullFace(bool),
    SetFrontFace(FrontFace),
    SetLineWidth(f32),
    BindVertexBuffer {
        attribute: AttributeLocation,
        buffer: BufferId,
        element_type: VertexElementType,
    },
    BindIndexBuffer(BufferId),
    DrawElements {
        primitive: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
    },
    DrawArrays {
        primitive: PrimitiveTopology,
        first: u32,
        count: u32,
    },
}

impl DeviceCommand {
    /// Returns true for draw calls.
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawElements { .. } | Self::DrawArrays { .. })
    }

    /// Returns true for uniform uploads.
    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::SetUniform { .. })
    }
}

struct RecordedProgram {
    uniforms: HashMap<String, UniformLocation>,
    attributes: HashMap<String, AttributeLocation>,
}

/// In-memory [`GraphicsDevice`].
#[derive(Default)]
pub struct RecordingDevice {
    programs: HashMap<ProgramId, RecordedProgram>,
    uniform_names: HashMap<UniformLocation, (ProgramId, String)>,
    current_program: Option<ProgramId>,
    commands: Vec<DeviceCommand>,
    destroyed: Vec<ProgramId>,
    misuse: Vec<String>,
    compile_count: usize,
    context_losses: usize,
    next_program: u32,
    recycle_names: bool,
    free_names: Vec<u32>,
    next_location: u32,
    next_buffer: u32,
}

impl RecordingDevice {
    /// Creates an empty device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a device that hands out destroyed program names again, lowest
    /// first, the way GL drivers do.
    pub fn with_recycled_names() -> Self {
        Self {
            recycle_names: true,
            ..Self::default()
        }
    }

    /// Allocates a buffer handle.
    pub fn create_buffer(&mut self) -> BufferId {
        self.next_buffer += 1;
        BufferId(self.next_buffer)
    }

    /// Returns the recorded commands.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Programs passed to `destroy_program`, in call order.
    pub fn destroyed_programs(&self) -> &[ProgramId] {
        &self.destroyed
    }

    /// Number of successful compiles.
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    /// Number of currently linked programs.
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// Returns whether a program is linked in the current context.
    pub fn is_live(&self, program: ProgramId) -> bool {
        self.programs.contains_key(&program)
    }

    /// Number of simulated context losses.
    pub fn context_losses(&self) -> usize {
        self.context_losses
    }

    /// Misuse detected so far, such as uniform uploads to a program that
    /// isn't current or draws without a program.
    pub fn misuse(&self) -> &[String] {
        &self.misuse
    }

    /// Simulates losing the device context.
    ///
    /// Every program becomes invalid without being destroyed, exactly as a
    /// driver reset would leave them.
    pub fn lose_context(&mut self) {
        self.programs.clear();
        self.uniform_names.clear();
        self.current_program = None;
        if self.recycle_names {
            self.next_program = 0;
            self.free_names.clear();
        }
        self.context_losses += 1;
        log::debug!("recording device lost its context");
    }

    /// Returns the uniform name behind a location.
    pub fn uniform_name(&self, location: UniformLocation) -> Option<&str> {
        self.uniform_names.get(&location).map(|(_, name)| name.as_str())
    }

    /// Returns the names of uniforms uploaded by `commands`, in order.
    pub fn uniform_uploads<'a>(&'a self, commands: &'a [DeviceCommand]) -> Vec<&'a str> {
        commands
            .iter()
            .filter_map(|command| match command {
                DeviceCommand::SetUniform { location, .. } => self.uniform_name(*location),
                _ => None,
            })
            .collect()
    }

    /// Returns the last value uploaded to a uniform with this name.
    pub fn last_uniform(&self, name: &str) -> Option<UniformValue> {
        self.commands.iter().rev().find_map(|command| match command {
            DeviceCommand::SetUniform { location, value }
                if self.uniform_name(*location) == Some(name) =>
            {
                Some(*value)
            }
            _ => None,
        })
    }

    fn record(&mut self, command: DeviceCommand) {
        if command.is_draw() && self.current_program.is_none() {
            self.misuse.push(format!("{command:?} without a current program"));
        }
        self.commands.push(command);
    }

    fn alloc_program_name(&mut self) -> u32 {
        if let Some(name) = self.free_names.pop() {
            return name;
        }
        self.next_program += 1;
        self.next_program
    }

    fn alloc_location(&mut self) -> u32 {
        self.next_location += 1;
        self.next_location
    }
}

/// Checks both stages and returns GL-style diagnostics.
fn validate(source: &ShaderSource) -> Vec<String> {
    let mut diagnostics = Vec::new();
    for (stage, text) in [("vertex", &source.vertex), ("fragment", &source.fragment)] {
        if !text.contains("void main") {
            diagnostics.push(format!("ERROR: {stage}: 0:0: 'main' : function not defined"));
        }
        for (line_number, line) in text.lines().enumerate() {
            if let Some(message) = line.trim().strip_prefix("#error") {
                diagnostics.push(format!(
                    "ERROR: {stage}: 0:{}: '#error' : {}",
                    line_number + 1,
                    message.trim()
                ));
            }
        }
    }
    diagnostics
}

/// Declared variable kind found while reflecting a line.
enum Declaration<'a> {
    Uniform(&'a str),
    Attribute(&'a str),
}

fn reflect_line(line: &str, vertex_stage: bool) -> Option<Declaration<'_>> {
    let declaration = line.trim().strip_suffix(';')?;
    let tokens: Vec<&str> = declaration.split_whitespace().collect();
    let name = (*tokens.last()?).split('[').next()?;
    if tokens.contains(&"uniform") {
        Some(Declaration::Uniform(name))
    } else if vertex_stage && (tokens.contains(&"attribute") || tokens.contains(&"in")) {
        Some(Declaration::Attribute(name))
    } else {
        None
    }
}

impl GraphicsDevice for RecordingDevice {
    fn compile_program(&mut self, source: &ShaderSource) -> Result<ProgramId, Vec<String>> {
        let diagnostics = validate(source);
        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        let id = ProgramId(self.alloc_program_name());
        let mut program = RecordedProgram {
            uniforms: HashMap::new(),
            attributes: HashMap::new(),
        };

        let stages = [(&source.vertex, true), (&source.fragment, false)];
        for (text, vertex_stage) in stages {
            for line in text.lines() {
                match reflect_line(line, vertex_stage) {
                    Some(Declaration::Uniform(name)) if !program.uniforms.contains_key(name) => {
                        let location = UniformLocation(self.alloc_location());
                        program.uniforms.insert(name.to_string(), location);
                        self.uniform_names.insert(location, (id, name.to_string()));
                    }
                    Some(Declaration::Attribute(name)) => {
                        let next = u32::try_from(program.attributes.len()).unwrap_or(u32::MAX);
                        program
                            .attributes
                            .entry(name.to_string())
                            .or_insert(AttributeLocation(next));
                    }
                    _ => {}
                }
            }
        }

        self.programs.insert(id, program);
        self.compile_count += 1;
        Ok(id)
    }

    fn destroy_program(&mut self, program: ProgramId) {
        self.destroyed.push(program);
        if self.programs.remove(&program).is_some() {
            self.uniform_names.retain(|_, (owner, _)| *owner != program);
            if self.recycle_names {
                self.free_names.push(program.0);
                self.free_names.sort_unstable_by(|a, b| b.cmp(a));
            }
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.uniforms.get(name).copied()
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<AttributeLocation> {
        self.programs.get(&program)?.attributes.get(name).copied()
    }

    fn use_program(&mut self, program: ProgramId) {
        if !self.programs.contains_key(&program) {
            self.misuse.push(format!("use of unlinked program {program:?}"));
        }
        self.current_program = Some(program);
        self.record(DeviceCommand::UseProgram(program));
    }

    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue) {
        let owner = self.uniform_names.get(&location).map(|(owner, _)| *owner);
        if owner.is_none() || owner != self.current_program {
            self.misuse.push(format!(
                "uniform {location:?} uploaded while {:?} is current",
                self.current_program
            ));
        }
        self.record(DeviceCommand::SetUniform { location, value });
    }

    fn set_cull_face(&mut self, enabled: bool) {
        self.record(DeviceCommand::SetCullFace(enabled));
    }

    fn set_front_face(&mut self, front_face: FrontFace) {
        self.record(DeviceCommand::SetFrontFace(front_face));
    }

    fn set_line_width(&mut self, width: f32) {
        self.record(DeviceCommand::SetLineWidth(width));
    }

    fn bind_vertex_buffer(
        &mut self,
        attribute: AttributeLocation,
        buffer: BufferId,
        element_type: VertexElementType,
    ) {
        self.record(DeviceCommand::BindVertexBuffer {
            attribute,
            buffer,
            element_type,
        });
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.record(DeviceCommand::BindIndexBuffer(buffer));
    }

    fn draw_elements(&mut self, primitive: PrimitiveTopology, count: u32, index_type: IndexType) {
        self.record(DeviceCommand::DrawElements {
            primitive,
            count,
            index_type,
        });
    }

    fn draw_arrays(&mut self, primitive: PrimitiveTopology, first: u32, count: u32) {
        self.record(DeviceCommand::DrawArrays {
            primitive,
            first,
            count,
        });
    }
}
