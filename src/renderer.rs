//! Scene rendering.
//!
//! This module defines the [`SceneRenderer`], which owns every renderable object and the shared
//! projection, and the [`RenderDevice`] trait it draws through. The OpenGL implementation lives
//! in [`crate::abs::GlDevice`].
//!
//! The renderer goes through a fixed lifecycle: it is created uninitialized, becomes usable
//! after [`SceneRenderer::initialize`] and refuses every call after [`SceneRenderer::shutdown`].

use glam::{Mat4, Vec3};

use crate::error::{Result, ViewerError};
use crate::projection::ProjectionState;
use crate::transform::{ModelTransform, validate_rotation, validate_scale};
use crate::vertex::Vertex;

/// Uniform inputs of the shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    ModelTransform,
    ProjectionTransform,
}

impl UniformSlot {
    pub const ALL: [UniformSlot; 2] = [
        UniformSlot::ModelTransform,
        UniformSlot::ProjectionTransform,
    ];

    /// The name the uniform has in GLSL.
    pub fn name(self) -> &'static str {
        match self {
            UniformSlot::ModelTransform => "modelTransform",
            UniformSlot::ProjectionTransform => "projectionTransform",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Vertex inputs of the shader program and their fixed locations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeSlot {
    Position = 0,
    Color = 1,
}

impl AttributeSlot {
    pub const ALL: [AttributeSlot; 2] = [AttributeSlot::Position, AttributeSlot::Color];

    pub fn name(self) -> &'static str {
        match self {
            AttributeSlot::Position => "position",
            AttributeSlot::Color => "color",
        }
    }

    pub fn location(self) -> u32 {
        self as u32
    }

    /// Number of floats read per vertex.
    pub fn components(self) -> i32 {
        3
    }

    /// Byte offset inside a [`Vertex`].
    pub fn offset(self) -> usize {
        match self {
            AttributeSlot::Position => Vertex::POSITION_OFFSET,
            AttributeSlot::Color => Vertex::COLOR_OFFSET,
        }
    }
}

/// GLSL source text for both stages of the shader program.
#[derive(Clone, Debug)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// The shaders compiled into the binary.
    pub fn builtin() -> Self {
        Self::new(
            include_str!("shaders/vert.glsl"),
            include_str!("shaders/frag.glsl"),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessEqual,
}

/// Device state that is set once at initialization and never changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedState {
    pub depth_test: bool,
    pub cull_back_faces: bool,
    pub depth_func: DepthFunc,
    pub clear_color: [f32; 4],
}

impl FixedState {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            depth_test: true,
            cull_back_faces: true,
            depth_func: DepthFunc::LessEqual,
            clear_color,
        }
    }
}

/// The graphics API operations the renderer needs.
///
/// Buffers and programs are owned handles: the renderer hands them back to the device when it
/// releases them.
pub trait RenderDevice {
    type Buffer;
    type Program;

    /// Compiles and links the shader program, verifying every [`UniformSlot`] and
    /// [`AttributeSlot`] is present.
    fn create_program(&mut self, sources: &ShaderSources) -> Result<Self::Program>;

    /// Uploads vertices into a new device buffer.
    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> Result<Self::Buffer>;

    fn apply_fixed_state(&mut self, state: &FixedState);

    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clears the color and depth buffers.
    fn clear(&mut self);

    fn bind_program(&mut self, program: &Self::Program);

    fn set_uniform(&mut self, program: &Self::Program, slot: UniformSlot, value: &Mat4);

    fn bind_vertex_buffer(&mut self, buffer: &Self::Buffer);

    /// Draws `vertex_count` vertices of the bound buffer as a non-indexed triangle list.
    fn draw_triangles(&mut self, vertex_count: usize);

    fn unbind_program(&mut self);

    fn release_vertex_buffer(&mut self, buffer: Self::Buffer);

    fn release_program(&mut self, program: Self::Program);
}

/// Everything needed to create a renderable object.
#[derive(Clone, Debug)]
pub struct RenderableDesc {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub placement: Vec3,
}

impl RenderableDesc {
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, placement: Vec3) -> Self {
        Self {
            name: name.into(),
            vertices,
            placement,
        }
    }
}

/// An uploaded mesh with its own model transform.
#[derive(Debug)]
pub struct RenderableObject<B> {
    name: String,
    vertex_count: usize,
    buffer: B,
    transform: ModelTransform,
}

impl<B> RenderableObject<B> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn transform(&self) -> &ModelTransform {
        &self.transform
    }
}

enum Lifecycle<P> {
    Uninitialized,
    Initialized { program: P },
    ShutDown,
}

/// Owns the objects of the scene and draws them every frame.
pub struct SceneRenderer<D: RenderDevice> {
    device: D,
    lifecycle: Lifecycle<D::Program>,
    objects: Vec<RenderableObject<D::Buffer>>,
    projection: ProjectionState,
    rotation: Vec3,
    scale: f32,
}

impl<D: RenderDevice> SceneRenderer<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            lifecycle: Lifecycle::Uninitialized,
            objects: Vec::new(),
            projection: ProjectionState::default(),
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Builds the shader program, uploads every object and sets the fixed device state.
    ///
    /// Objects are drawn in the order they are given here. On error nothing stays allocated and
    /// the renderer remains uninitialized.
    pub fn initialize(
        &mut self,
        shaders: &ShaderSources,
        objects: Vec<RenderableDesc>,
        fixed_state: FixedState,
    ) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Initialized { .. } => return Err(ViewerError::AlreadyInitialized),
            Lifecycle::ShutDown => return Err(ViewerError::ShutDown),
        }

        let program = self.device.create_program(shaders)?;
        log::info!("Shader program linked");

        let mut uploaded = Vec::with_capacity(objects.len());
        for desc in objects {
            match self.upload(desc) {
                Ok(object) => uploaded.push(object),
                Err(err) => {
                    for object in uploaded {
                        self.device.release_vertex_buffer(object.buffer);
                    }
                    self.device.release_program(program);
                    return Err(err);
                }
            }
        }

        self.device.apply_fixed_state(&fixed_state);

        self.objects = uploaded;
        self.lifecycle = Lifecycle::Initialized { program };
        log::info!("Renderer initialized with {} objects", self.objects.len());

        Ok(())
    }

    fn upload(&mut self, desc: RenderableDesc) -> Result<RenderableObject<D::Buffer>> {
        let mut transform = ModelTransform::new(desc.placement);
        transform.set_rotation(self.rotation.x, self.rotation.y, self.rotation.z)?;
        transform.set_scale(self.scale)?;

        let buffer = self.device.create_vertex_buffer(&desc.vertices)?;
        log::debug!(
            "Uploaded '{}' ({} vertices) at {}",
            desc.name,
            desc.vertices.len(),
            desc.placement
        );

        Ok(RenderableObject {
            name: desc.name,
            vertex_count: desc.vertices.len(),
            buffer,
            transform,
        })
    }

    /// Draws every object once.
    pub fn render_frame(&mut self) -> Result<()> {
        let program = match &self.lifecycle {
            Lifecycle::Initialized { program } => program,
            Lifecycle::Uninitialized => return Err(ViewerError::NotInitialized),
            Lifecycle::ShutDown => return Err(ViewerError::ShutDown),
        };

        self.device.clear();
        self.device.bind_program(program);

        let projection = self.projection.matrix();
        for object in &self.objects {
            if object.vertex_count == 0 {
                continue;
            }

            self.device.bind_vertex_buffer(&object.buffer);
            self.device
                .set_uniform(program, UniformSlot::ModelTransform, &object.transform.matrix());
            self.device
                .set_uniform(program, UniformSlot::ProjectionTransform, &projection);
            self.device.draw_triangles(object.vertex_count);
        }

        self.device.unbind_program();
        Ok(())
    }

    /// Recomputes the projection and the device viewport for a new window size.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.ensure_not_shut_down()?;

        self.projection.on_resize(width, height);
        let (width, height) = self.projection.viewport();
        self.device.set_viewport(width, height);
        log::debug!("Viewport resized to {width}x{height}");

        Ok(())
    }

    /// Rotates every object towards the absolute target angles, in degrees.
    pub fn set_rotation(&mut self, x: f32, y: f32, z: f32) -> Result<()> {
        self.ensure_not_shut_down()?;
        validate_rotation(Vec3::new(x, y, z))?;

        log::debug!("Rotation changed to ({x}, {y}, {z})");
        for object in &mut self.objects {
            object.transform.set_rotation(x, y, z)?;
        }
        self.rotation = Vec3::new(x, y, z);

        Ok(())
    }

    /// Scales every object towards the absolute target factor.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        self.ensure_not_shut_down()?;
        validate_scale(scale)?;

        log::debug!("Scale changed to {scale}");
        for object in &mut self.objects {
            object.transform.set_scale(scale)?;
        }
        self.scale = scale;

        Ok(())
    }

    /// Releases every device resource. The renderer cannot be used afterwards.
    pub fn shutdown(&mut self) -> Result<()> {
        let lifecycle = std::mem::replace(&mut self.lifecycle, Lifecycle::ShutDown);
        let program = match lifecycle {
            Lifecycle::Initialized { program } => Some(program),
            Lifecycle::Uninitialized => None,
            Lifecycle::ShutDown => return Err(ViewerError::ShutDown),
        };

        let count = self.objects.len();
        for object in self.objects.drain(..) {
            self.device.release_vertex_buffer(object.buffer);
        }
        if let Some(program) = program {
            self.device.release_program(program);
        }
        log::info!("Renderer shut down, released {count} buffers");

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Initialized { .. })
    }

    /// Objects in draw order.
    pub fn objects(&self) -> &[RenderableObject<D::Buffer>] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&RenderableObject<D::Buffer>> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn projection(&self) -> &ProjectionState {
        &self.projection
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    fn ensure_not_shut_down(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::ShutDown => Err(ViewerError::ShutDown),
            _ => Ok(()),
        }
    }
}
