//! The four sub-states that make up a graphics pipeline.
//!
//! A complete pipeline defines all four of:
//!
//! - The vertex input interface: vertex input and input assembly state.
//! - The pre-rasterization shaders: the vertex, tessellation, geometry, task and mesh stages,
//!   with tessellation, viewport, rasterization, discard rectangle and fragment shading rate
//!   state.
//! - The fragment shader: the fragment stage, with depth/stencil, multisample and fragment
//!   shading rate state.
//! - The fragment output interface: color blend, multisample and attachment sample count state.
//!
//! With the `graphics_pipeline_library` feature, a pipeline can define only some of these itself
//! and take the others from libraries that it links. Each sub-state of a pipeline then either
//! belongs to the pipeline, or is shared with the library that defined it.

use super::{
    color_blend::ColorBlendState, depth_stencil::DepthStencilState,
    discard_rectangle::DiscardRectangleState, fragment_shading_rate::FragmentShadingRateState,
    input_assembly::InputAssemblyState, library::GraphicsPipelineLibraryFlags,
    multisample::{AttachmentSampleCountInfo, MultisampleState},
    rasterization::RasterizationState, subpass::PipelineSubpassType,
    tessellation::TessellationState, vertex_input::VertexInputState, viewport::ViewportState,
    GraphicsPipeline,
};
use crate::{
    pipeline::{layout::PipelineLayout, DynamicStates},
    shader::ShaderStages,
};
use std::{ops::Deref, sync::Arc};

/// A sub-state of a pipeline, and where it came from.
#[derive(Debug)]
pub enum SubState<T> {
    /// The sub-state was defined by the create info of the pipeline itself.
    Owned(Arc<T>),

    /// The sub-state was defined by a linked library.
    Inherited {
        /// The library that defined the sub-state.
        library: Arc<GraphicsPipeline>,

        /// The sub-state, shared with `library`.
        state: Arc<T>,
    },
}

impl<T> SubState<T> {
    /// Returns the sub-state itself.
    #[inline]
    pub fn get(&self) -> &T {
        self.arc()
    }

    /// Returns whether the sub-state was defined by the pipeline itself.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, SubState::Owned(_))
    }

    /// Returns the library that the sub-state was taken from, if any.
    #[inline]
    pub fn library(&self) -> Option<&Arc<GraphicsPipeline>> {
        match self {
            SubState::Owned(_) => None,
            SubState::Inherited { library, .. } => Some(library),
        }
    }

    pub(crate) fn arc(&self) -> &Arc<T> {
        match self {
            SubState::Owned(state) | SubState::Inherited { state, .. } => state,
        }
    }

    /// Returns the sub-state as defined by `library`, for a pipeline that links `library`.
    pub(crate) fn inherit(&self, library: &Arc<GraphicsPipeline>) -> Self {
        SubState::Inherited {
            library: library.clone(),
            state: self.arc().clone(),
        }
    }
}

impl<T> Clone for SubState<T> {
    fn clone(&self) -> Self {
        match self {
            SubState::Owned(state) => SubState::Owned(state.clone()),
            SubState::Inherited { library, state } => SubState::Inherited {
                library: library.clone(),
                state: state.clone(),
            },
        }
    }
}

impl<T> Deref for SubState<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        self.get()
    }
}

/// The vertex input interface sub-state.
#[derive(Clone, Debug)]
pub struct VertexInputSubState {
    pub vertex_input_state: Option<VertexInputState>,
    pub input_assembly_state: Option<InputAssemblyState>,

    /// The dynamic states of the create info that defined the sub-state.
    pub dynamic_state: DynamicStates,
}

/// The pre-rasterization shaders sub-state.
#[derive(Clone, Debug)]
pub struct PreRasterizationSubState {
    /// The pre-rasterization stages of the sub-state.
    pub stages: ShaderStages,

    /// The layout that the sub-state was created with.
    pub layout: Option<Arc<PipelineLayout>>,

    /// The render target that the sub-state was created for.
    pub subpass: Option<PipelineSubpassType>,

    pub tessellation_state: Option<TessellationState>,
    pub viewport_state: Option<ViewportState>,
    pub rasterization_state: Option<RasterizationState>,
    pub discard_rectangle_state: Option<DiscardRectangleState>,
    pub fragment_shading_rate_state: Option<FragmentShadingRateState>,

    /// The dynamic states of the create info that defined the sub-state.
    pub dynamic_state: DynamicStates,
}

impl PreRasterizationSubState {
    /// Returns whether rasterizer discard is enabled, and not dynamic.
    #[inline]
    pub fn discards_statically(&self) -> bool {
        self.rasterization_state
            .as_ref()
            .is_some_and(|state| state.discards_statically(&self.dynamic_state))
    }
}

/// The fragment shader sub-state.
#[derive(Clone, Debug)]
pub struct FragmentShaderSubState {
    /// The fragment stage, if the sub-state has one.
    pub stages: ShaderStages,

    /// The layout that the sub-state was created with.
    pub layout: Option<Arc<PipelineLayout>>,

    /// The render target that the sub-state was created for.
    pub subpass: Option<PipelineSubpassType>,

    pub depth_stencil_state: Option<DepthStencilState>,
    pub multisample_state: Option<MultisampleState>,
    pub fragment_shading_rate_state: Option<FragmentShadingRateState>,

    /// The dynamic states of the create info that defined the sub-state.
    pub dynamic_state: DynamicStates,
}

/// The fragment output interface sub-state.
#[derive(Clone, Debug)]
pub struct FragmentOutputSubState {
    /// The render target that the sub-state was created for.
    pub subpass: Option<PipelineSubpassType>,

    pub color_blend_state: Option<ColorBlendState>,
    pub multisample_state: Option<MultisampleState>,
    pub attachment_sample_count: Option<AttachmentSampleCountInfo>,

    /// The dynamic states of the create info that defined the sub-state.
    pub dynamic_state: DynamicStates,
}

/// The sub-states of a pipeline, resolved from its create info and its libraries.
#[derive(Clone, Debug, Default)]
pub(crate) struct SubStates {
    pub(crate) vertex_input: Option<SubState<VertexInputSubState>>,
    pub(crate) pre_rasterization: Option<SubState<PreRasterizationSubState>>,
    pub(crate) fragment_shader: Option<SubState<FragmentShaderSubState>>,
    pub(crate) fragment_output: Option<SubState<FragmentOutputSubState>>,
}

impl SubStates {
    /// Returns the sub-states that are present.
    pub(crate) fn library_flags(&self) -> GraphicsPipelineLibraryFlags {
        let mut flags = GraphicsPipelineLibraryFlags::empty();

        if self.vertex_input.is_some() {
            flags |= GraphicsPipelineLibraryFlags::VERTEX_INPUT_INTERFACE;
        }

        if self.pre_rasterization.is_some() {
            flags |= GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS;
        }

        if self.fragment_shader.is_some() {
            flags |= GraphicsPipelineLibraryFlags::FRAGMENT_SHADER;
        }

        if self.fragment_output.is_some() {
            flags |= GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE;
        }

        flags
    }

    /// Returns the union of the stages of all sub-states.
    pub(crate) fn stages(&self) -> ShaderStages {
        let mut stages = ShaderStages::empty();

        if let Some(state) = &self.pre_rasterization {
            stages |= state.stages;
        }

        if let Some(state) = &self.fragment_shader {
            stages |= state.stages;
        }

        stages
    }

    /// Returns the union of the dynamic states of all sub-states.
    pub(crate) fn dynamic_state(&self) -> DynamicStates {
        let mut dynamic_state = DynamicStates::new();

        if let Some(state) = &self.vertex_input {
            dynamic_state.extend_from(&state.dynamic_state);
        }

        if let Some(state) = &self.pre_rasterization {
            dynamic_state.extend_from(&state.dynamic_state);
        }

        if let Some(state) = &self.fragment_shader {
            dynamic_state.extend_from(&state.dynamic_state);
        }

        if let Some(state) = &self.fragment_output {
            dynamic_state.extend_from(&state.dynamic_state);
        }

        dynamic_state
    }

    /// Returns the render target, preferring the one of the fragment output interface.
    pub(crate) fn subpass(&self) -> Option<&PipelineSubpassType> {
        self.fragment_output
            .as_ref()
            .and_then(|state| state.subpass.as_ref())
            .or_else(|| {
                self.fragment_shader
                    .as_ref()
                    .and_then(|state| state.subpass.as_ref())
            })
            .or_else(|| {
                self.pre_rasterization
                    .as_ref()
                    .and_then(|state| state.subpass.as_ref())
            })
    }

    /// Returns whether rasterizer discard is statically enabled, so that no fragments are
    /// produced.
    pub(crate) fn discards_statically(&self) -> bool {
        self.pre_rasterization
            .as_ref()
            .is_some_and(|state| state.discards_statically())
    }
}
