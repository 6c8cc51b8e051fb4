//! A pipeline that performs graphics processing operations.
//!
//! A graphics pipeline consists of several shaders, with fixed-function state and glue logic in
//! between. The state is grouped into collections that each have a dedicated submodule, and the
//! collections are in turn grouped into four sub-states (see [`sub_state`]):
//!
//! 1. Vertex input interface: vertex input data is read from buffers and assembled into
//!    primitives.
//! 2. Pre-rasterization shaders: the vertex, tessellation and geometry shaders, or the task and
//!    mesh shaders, produce primitives that are clipped, mapped to the viewport and rasterized.
//! 3. Fragment shader: the fragment shader runs for each fragment, surrounded by the depth and
//!    stencil tests.
//! 4. Fragment output interface: the final values are blended into the color attachments.
//!
//! [`GraphicsPipeline::validate_new`] and [`validate_create_graphics_pipelines`] check a
//! [`GraphicsPipelineCreateInfo`] before it would be passed to `vkCreateGraphicsPipelines`. The
//! checks run as a series of independent groups. Every group adds what it finds to the same
//! [`ValidationReport`]; no group stops another from running.

pub use self::{
    chain::{ChainStruct, ExtensionChain, ExtensionStruct},
    library::{
        GraphicsPipelineLibraryCreateInfo, GraphicsPipelineLibraryFlags,
        PipelineLibraryCreateInfo,
    },
    sub_state::{
        FragmentOutputSubState, FragmentShaderSubState, PreRasterizationSubState, SubState,
        VertexInputSubState,
    },
};
use self::{
    color_blend::ColorBlendState,
    depth_stencil::DepthStencilState,
    discard_rectangle::DiscardRectangleState,
    fragment_shading_rate::FragmentShadingRateState,
    input_assembly::InputAssemblyState,
    multisample::{AttachmentSampleCountInfo, MultisampleState},
    rasterization::RasterizationState,
    robustness::PipelineRobustnessCreateInfo,
    sub_state::SubStates,
    subpass::{PipelineRenderingCreateInfo, PipelineSubpassType},
    tessellation::TessellationState,
    vertex_input::VertexInputState,
    viewport::ViewportState,
};
use crate::{
    device::DeviceCapabilities,
    format::FormatFeatures,
    object_table::ObjectTable,
    pipeline::{
        dynamic_state::{validate_dynamic_state_list, FixedFunctionState},
        layout::PipelineLayout,
        DynamicState, DynamicStates, PipelineCreateFlags, PipelineShaderStageCreateInfo,
    },
    render_pass::{RenderPass, Subpass},
    shader::{ShaderStage, ShaderStages},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationFailed,
    ValidationReport,
};
use ash::vk::{self, Handle};
use smallvec::SmallVec;
use std::sync::Arc;

pub mod chain;
pub mod color_blend;
pub mod depth_stencil;
pub mod discard_rectangle;
pub mod fragment_shading_rate;
pub mod input_assembly;
pub mod library;
pub mod multisample;
pub mod rasterization;
pub mod robustness;
pub mod sub_state;
pub mod subpass;
pub mod tessellation;
pub mod vertex_input;
pub mod viewport;
#[cfg(test)]
mod tests;

/// A snapshot of a graphics pipeline, or of a graphics pipeline library.
///
/// The sub-states that the pipeline defines itself are owned by it. The ones that were taken
/// from linked libraries are shared with those libraries.
#[derive(Debug)]
pub struct GraphicsPipeline {
    flags: PipelineCreateFlags,
    library_flags: GraphicsPipelineLibraryFlags,
    stages: ShaderStages,
    dynamic_state: DynamicStates,

    vertex_input: Option<SubState<VertexInputSubState>>,
    pre_rasterization: Option<SubState<PreRasterizationSubState>>,
    fragment_shader: Option<SubState<FragmentShaderSubState>>,
    fragment_output: Option<SubState<FragmentOutputSubState>>,
}

impl GraphicsPipeline {
    /// Creates a new `GraphicsPipeline`, if `create_info` passes validation.
    pub fn new(
        device: &DeviceCapabilities,
        objects: &impl ObjectTable,
        create_info: GraphicsPipelineCreateInfo,
    ) -> Result<Arc<GraphicsPipeline>, ValidationFailed> {
        Self::validate_new(device, objects, &create_info).into_result()?;

        Ok(Self::new_unchecked(objects, create_info))
    }

    /// Checks `create_info` as the only element of a `vkCreateGraphicsPipelines` call.
    pub fn validate_new(
        device: &DeviceCapabilities,
        objects: &impl ObjectTable,
        create_info: &GraphicsPipelineCreateInfo,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();

        report.scoped("create_info", |report| {
            create_info.validate(device, objects, std::slice::from_ref(create_info), 0, report);
        });

        report
    }

    /// Creates a new `GraphicsPipeline` without validating `create_info`.
    ///
    /// Handles that do not resolve are treated as null, and a sub-state that several sources
    /// define is taken from the first one.
    pub fn new_unchecked(
        objects: &impl ObjectTable,
        create_info: GraphicsPipelineCreateInfo,
    ) -> Arc<GraphicsPipeline> {
        let Gathered { sub_states, .. } = create_info.gather(objects, &mut ValidationReport::new());

        Self::from_sub_states(create_info.flags, sub_states)
    }

    fn from_sub_states(flags: PipelineCreateFlags, sub_states: SubStates) -> Arc<GraphicsPipeline> {
        let library_flags = sub_states.library_flags();
        let stages = sub_states.stages();
        let dynamic_state = sub_states.dynamic_state();
        let SubStates {
            vertex_input,
            pre_rasterization,
            fragment_shader,
            fragment_output,
        } = sub_states;

        Arc::new(GraphicsPipeline {
            flags,
            library_flags,
            stages,
            dynamic_state,
            vertex_input,
            pre_rasterization,
            fragment_shader,
            fragment_output,
        })
    }

    /// Returns the flags that the pipeline was created with.
    #[inline]
    pub fn flags(&self) -> PipelineCreateFlags {
        self.flags
    }

    /// Returns the sub-states that the pipeline has, whether owned or inherited.
    #[inline]
    pub fn library_flags(&self) -> GraphicsPipelineLibraryFlags {
        self.library_flags
    }

    /// Returns whether the pipeline was created with `PipelineCreateFlags::LIBRARY`.
    #[inline]
    pub fn is_library(&self) -> bool {
        self.flags.intersects(PipelineCreateFlags::LIBRARY)
    }

    /// Returns the union of the shader stages of all sub-states.
    #[inline]
    pub fn stages(&self) -> ShaderStages {
        self.stages
    }

    /// Returns the union of the dynamic states of all sub-states.
    #[inline]
    pub fn dynamic_state(&self) -> &DynamicStates {
        &self.dynamic_state
    }

    #[inline]
    pub fn vertex_input(&self) -> Option<&SubState<VertexInputSubState>> {
        self.vertex_input.as_ref()
    }

    #[inline]
    pub fn pre_rasterization(&self) -> Option<&SubState<PreRasterizationSubState>> {
        self.pre_rasterization.as_ref()
    }

    #[inline]
    pub fn fragment_shader(&self) -> Option<&SubState<FragmentShaderSubState>> {
        self.fragment_shader.as_ref()
    }

    #[inline]
    pub fn fragment_output(&self) -> Option<&SubState<FragmentOutputSubState>> {
        self.fragment_output.as_ref()
    }

    /// Returns the render target that the pipeline was created for.
    ///
    /// The one of the fragment output interface is preferred, then the fragment shader, then
    /// the pre-rasterization shaders.
    pub fn subpass(&self) -> Option<&PipelineSubpassType> {
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

    /// Returns the layout of the pre-rasterization sub-state, or else of the fragment shader
    /// sub-state.
    pub fn layout(&self) -> Option<&Arc<PipelineLayout>> {
        self.pre_rasterization
            .as_ref()
            .and_then(|state| state.layout.as_ref())
            .or_else(|| {
                self.fragment_shader
                    .as_ref()
                    .and_then(|state| state.layout.as_ref())
            })
    }

    #[inline]
    pub fn rasterization_state(&self) -> Option<&RasterizationState> {
        self.pre_rasterization
            .as_ref()
            .and_then(|state| state.rasterization_state.as_ref())
    }

    #[inline]
    pub fn depth_stencil_state(&self) -> Option<&DepthStencilState> {
        self.fragment_shader
            .as_ref()
            .and_then(|state| state.depth_stencil_state.as_ref())
    }

    #[inline]
    pub fn color_blend_state(&self) -> Option<&ColorBlendState> {
        self.fragment_output
            .as_ref()
            .and_then(|state| state.color_blend_state.as_ref())
    }

    /// Returns the multisample state of the fragment output interface, or else of the fragment
    /// shader.
    pub fn multisample_state(&self) -> Option<&MultisampleState> {
        self.fragment_output
            .as_ref()
            .and_then(|state| state.multisample_state.as_ref())
            .or_else(|| {
                self.fragment_shader
                    .as_ref()
                    .and_then(|state| state.multisample_state.as_ref())
            })
    }

    #[inline]
    pub fn attachment_sample_count(&self) -> Option<&AttachmentSampleCountInfo> {
        self.fragment_output
            .as_ref()
            .and_then(|state| state.attachment_sample_count.as_ref())
    }
}

/// Checks every element of a `vkCreateGraphicsPipelines` call.
///
/// Elements are checked in order. A derivative pipeline may only use an earlier element as its
/// base.
pub fn validate_create_graphics_pipelines(
    device: &DeviceCapabilities,
    objects: &impl ObjectTable,
    create_infos: &[GraphicsPipelineCreateInfo],
) -> ValidationReport {
    let mut report = ValidationReport::new();

    for (index, create_info) in create_infos.iter().enumerate() {
        report.scoped(format!("create_infos[{}]", index), |report| {
            create_info.validate(device, objects, create_infos, index, report);
        });
    }

    log::trace!(
        "validated {} graphics pipeline create infos, {} errors",
        create_infos.len(),
        report.errors().len(),
    );

    report
}

/// Parameters to create a new `GraphicsPipeline`.
#[derive(Clone, Debug)]
pub struct GraphicsPipelineCreateInfo {
    /// Specifies how to create the pipeline.
    ///
    /// The default value is empty.
    pub flags: PipelineCreateFlags,

    /// The shader stages to use.
    ///
    /// The default value is empty.
    pub stages: SmallVec<[PipelineShaderStageCreateInfo; 5]>,

    /// The vertex input state.
    ///
    /// This state is always used, and must be provided, unless the pipeline has a mesh stage,
    /// or [`DynamicState::VertexInput`] is used.
    ///
    /// The default value is `None`.
    pub vertex_input_state: Option<VertexInputState>,

    /// The input assembly state.
    ///
    /// This state is always used, and must be provided, unless the pipeline has a mesh stage.
    ///
    /// The default value is `None`.
    pub input_assembly_state: Option<InputAssemblyState>,

    /// The tessellation state.
    ///
    /// This state is used if `stages` contains tessellation shaders.
    ///
    /// The default value is `None`.
    pub tessellation_state: Option<TessellationState>,

    /// The viewport state.
    ///
    /// This state is used if [rasterizer discarding] is not enabled.
    ///
    /// The default value is `None`.
    ///
    /// [rasterizer discarding]: RasterizationState::rasterizer_discard_enable
    pub viewport_state: Option<ViewportState>,

    /// The rasterization state.
    ///
    /// This state is always used, and must be provided.
    ///
    /// The default value is `None`.
    pub rasterization_state: Option<RasterizationState>,

    /// The multisample state.
    ///
    /// This state is used if [rasterizer discarding] is not enabled.
    ///
    /// The default value is `None`.
    ///
    /// [rasterizer discarding]: RasterizationState::rasterizer_discard_enable
    pub multisample_state: Option<MultisampleState>,

    /// The depth/stencil state.
    ///
    /// This state is used if the render target has a depth or stencil attachment, and
    /// rasterizer discarding is not enabled.
    ///
    /// The default value is `None`.
    pub depth_stencil_state: Option<DepthStencilState>,

    /// The color blend state.
    ///
    /// This state is used if the render target has color attachments, and rasterizer
    /// discarding is not enabled.
    ///
    /// The default value is `None`.
    pub color_blend_state: Option<ColorBlendState>,

    /// The state that will be set dynamically when recording a command buffer.
    ///
    /// The default value is empty.
    pub dynamic_state: Vec<DynamicState>,

    /// The pipeline layout to use.
    ///
    /// The default value is a null handle.
    pub layout: vk::PipelineLayout,

    /// The render pass to use, or a null handle for dynamic rendering.
    ///
    /// With dynamic rendering, the attachment formats are taken from the
    /// [`PipelineRenderingCreateInfo`] of `next`, if there is one.
    ///
    /// The default value is a null handle.
    pub render_pass: vk::RenderPass,

    /// The index of the subpass of `render_pass` to use.
    ///
    /// The default value is `0`.
    pub subpass: u32,

    /// The pipeline to derive from, if `flags` contains `PipelineCreateFlags::DERIVATIVE`.
    ///
    /// The default value is a null handle.
    pub base_pipeline_handle: vk::Pipeline,

    /// The index of the element of the same creation call to derive from, or `-1`.
    ///
    /// The default value is `-1`.
    pub base_pipeline_index: i32,

    /// Extension structs.
    ///
    /// The default value is empty.
    pub next: ExtensionChain,

    pub _ne: crate::NonExhaustive,
}

impl Default for GraphicsPipelineCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            flags: PipelineCreateFlags::empty(),
            stages: SmallVec::new(),
            vertex_input_state: None,
            input_assembly_state: None,
            tessellation_state: None,
            viewport_state: None,
            rasterization_state: None,
            multisample_state: None,
            depth_stencil_state: None,
            color_blend_state: None,
            dynamic_state: Vec::new(),
            layout: vk::PipelineLayout::null(),
            render_pass: vk::RenderPass::null(),
            subpass: 0,
            base_pipeline_handle: vk::Pipeline::null(),
            base_pipeline_index: -1,
            next: ExtensionChain::new(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

/// What a create info refers to, looked up once and shared by all checks.
struct Gathered {
    own_flags: GraphicsPipelineLibraryFlags,
    libraries: Vec<(usize, Arc<GraphicsPipeline>)>,
    sub_states: SubStates,
}

impl GraphicsPipelineCreateInfo {
    /// Returns a `GraphicsPipelineCreateInfo` with the specified `layout`.
    #[inline]
    pub fn layout(layout: vk::PipelineLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// Returns the sub-states that the create info defines itself.
    ///
    /// Without a [`GraphicsPipelineLibraryCreateInfo`], a library or a pipeline that links
    /// libraries defines none, and any other pipeline defines all of them.
    pub fn own_library_flags(&self) -> GraphicsPipelineLibraryFlags {
        if let Some(library_info) = self.next.try_get::<GraphicsPipelineLibraryCreateInfo>() {
            library_info.flags
        } else if self.flags.intersects(PipelineCreateFlags::LIBRARY)
            || self
                .next
                .try_get::<PipelineLibraryCreateInfo>()
                .is_some_and(|info| !info.libraries.is_empty())
        {
            GraphicsPipelineLibraryFlags::empty()
        } else {
            GraphicsPipelineLibraryFlags::all()
        }
    }

    fn gather(&self, objects: &impl ObjectTable, report: &mut ValidationReport) -> Gathered {
        let own_flags = self.own_library_flags();
        let libraries = self
            .next
            .try_get::<PipelineLibraryCreateInfo>()
            .map(|info| info.resolve(objects, report))
            .unwrap_or_default();

        let layout = self.resolve_layout(objects, own_flags, libraries.is_empty(), report);
        let subpass = if own_flags.intersects(
            GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS
                | GraphicsPipelineLibraryFlags::FRAGMENT_SHADER
                | GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
        ) {
            self.resolve_subpass(objects, report)
        } else {
            None
        };

        let own = self.own_sub_states(own_flags, layout, subpass);
        let sub_states = library::link(own, &libraries, report);

        Gathered {
            own_flags,
            libraries,
            sub_states,
        }
    }

    fn resolve_layout(
        &self,
        objects: &impl ObjectTable,
        own_flags: GraphicsPipelineLibraryFlags,
        no_libraries: bool,
        report: &mut ValidationReport,
    ) -> Option<Arc<PipelineLayout>> {
        if !self.layout.is_null() {
            let layout = objects.get::<PipelineLayout>(self.layout);

            if layout.is_none() {
                report.push(Box::new(ValidationError {
                    context: "layout".into(),
                    problem: "is not a known pipeline layout".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-layout-parameter"],
                    kind: DefectKind::Resolution,
                    ..Default::default()
                }));
            }

            return layout;
        }

        if no_libraries
            && own_flags.intersects(
                GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS
                    | GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
            )
        {
            let vuids: &'static [&'static str] = if self
                .next
                .try_get::<GraphicsPipelineLibraryCreateInfo>()
                .is_some()
            {
                &["VUID-VkGraphicsPipelineCreateInfo-flags-06642"]
            } else {
                &["VUID-VkGraphicsPipelineCreateInfo-layout-06602"]
            };

            report.push(Box::new(ValidationError {
                context: "layout".into(),
                problem: "is a null handle, but the create info defines shader stages".into(),
                vuids,
                ..Default::default()
            }));
        }

        None
    }

    fn resolve_subpass(
        &self,
        objects: &impl ObjectTable,
        report: &mut ValidationReport,
    ) -> Option<PipelineSubpassType> {
        if self.render_pass.is_null() {
            let rendering_info = self
                .next
                .try_get::<PipelineRenderingCreateInfo>()
                .cloned()
                .unwrap_or_default();

            return Some(PipelineSubpassType::BeginRendering(rendering_info));
        }

        let Some(render_pass) = objects.get::<RenderPass>(self.render_pass) else {
            let vuids: &'static [&'static str] = if self
                .next
                .try_get::<GraphicsPipelineLibraryCreateInfo>()
                .is_some()
            {
                &["VUID-VkGraphicsPipelineCreateInfo-flags-06643"]
            } else {
                &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06603"]
            };

            report.push(Box::new(ValidationError {
                context: "render_pass".into(),
                problem: "is not a known render pass".into(),
                vuids,
                kind: DefectKind::Resolution,
                ..Default::default()
            }));

            return None;
        };

        let subpass_count = render_pass.subpasses().len();
        let subpass = Subpass::from(render_pass, self.subpass);

        if subpass.is_none() {
            report.push(Box::new(ValidationError {
                context: "subpass".into(),
                problem: format!(
                    "is {}, but the render pass has only {} subpasses",
                    self.subpass, subpass_count,
                )
                .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06046"],
                ..Default::default()
            }));
        }

        subpass.map(PipelineSubpassType::BeginRenderPass)
    }

    fn own_sub_states(
        &self,
        own_flags: GraphicsPipelineLibraryFlags,
        layout: Option<Arc<PipelineLayout>>,
        subpass: Option<PipelineSubpassType>,
    ) -> SubStates {
        let dynamic_state: DynamicStates = self.dynamic_state.iter().copied().collect();
        let stages: ShaderStages = self.stages.iter().map(|stage| stage.stage).collect();
        let fragment_shading_rate_state = self.next.try_get::<FragmentShadingRateState>().copied();

        SubStates {
            vertex_input: own_flags
                .intersects(GraphicsPipelineLibraryFlags::VERTEX_INPUT_INTERFACE)
                .then(|| {
                    SubState::Owned(Arc::new(VertexInputSubState {
                        vertex_input_state: self.vertex_input_state.clone(),
                        input_assembly_state: self.input_assembly_state,
                        dynamic_state: dynamic_state.clone(),
                    }))
                }),
            pre_rasterization: own_flags
                .intersects(GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS)
                .then(|| {
                    SubState::Owned(Arc::new(PreRasterizationSubState {
                        stages: stages & ShaderStages::PRE_RASTERIZATION,
                        layout: layout.clone(),
                        subpass: subpass.clone(),
                        tessellation_state: self.tessellation_state,
                        viewport_state: self.viewport_state.clone(),
                        rasterization_state: self.rasterization_state.clone(),
                        discard_rectangle_state: self
                            .next
                            .try_get::<DiscardRectangleState>()
                            .cloned(),
                        fragment_shading_rate_state,
                        dynamic_state: dynamic_state.clone(),
                    }))
                }),
            fragment_shader: own_flags
                .intersects(GraphicsPipelineLibraryFlags::FRAGMENT_SHADER)
                .then(|| {
                    SubState::Owned(Arc::new(FragmentShaderSubState {
                        stages: stages & ShaderStages::FRAGMENT,
                        layout: layout.clone(),
                        subpass: subpass.clone(),
                        depth_stencil_state: self.depth_stencil_state.clone(),
                        multisample_state: self.multisample_state.clone(),
                        fragment_shading_rate_state,
                        dynamic_state: dynamic_state.clone(),
                    }))
                }),
            fragment_output: own_flags
                .intersects(GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE)
                .then(|| {
                    SubState::Owned(Arc::new(FragmentOutputSubState {
                        subpass: subpass.clone(),
                        color_blend_state: self.color_blend_state.clone(),
                        multisample_state: self.multisample_state.clone(),
                        attachment_sample_count: self
                            .next
                            .try_get::<AttachmentSampleCountInfo>()
                            .cloned(),
                        dynamic_state: dynamic_state.clone(),
                    }))
                }),
        }
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        objects: &impl ObjectTable,
        create_infos: &[GraphicsPipelineCreateInfo],
        index: usize,
        report: &mut ValidationReport,
    ) {
        let &Self {
            flags,
            stages: _,
            vertex_input_state: _,
            input_assembly_state: _,
            tessellation_state: _,
            viewport_state: _,
            rasterization_state: _,
            multisample_state: _,
            depth_stencil_state: _,
            color_blend_state: _,
            ref dynamic_state,
            layout: _,
            render_pass: _,
            subpass: _,
            base_pipeline_handle: _,
            base_pipeline_index: _,
            ref next,
            _ne: _,
        } = self;

        log::trace!("validating graphics pipeline create info {}", index);

        report.check(flags.validate_device(device).map_err(|err| {
            err.add_context("flags")
                .set_vuids(&["VUID-VkGraphicsPipelineCreateInfo-flags-parameter"])
        }));
        next.validate(report);

        self.validate_derivative(objects, create_infos, index, report);

        let gathered = self.gather(objects, report);
        let library_info = next.try_get::<GraphicsPipelineLibraryCreateInfo>();

        log::trace!(
            "create info defines {:?}, links {} libraries",
            gathered.own_flags,
            gathered.libraries.len(),
        );

        library::validate_library_usage(
            device,
            flags,
            library_info,
            gathered.libraries.len(),
            report,
        );
        library::validate_library_flags(flags, &gathered.libraries, report);
        library::validate_consistency(&gathered.sub_states, library_info, report);
        self.validate_completeness(&gathered, report);

        validate_dynamic_state_list(
            device,
            dynamic_state,
            gathered.sub_states.stages().intersects(ShaderStages::MESH),
            report,
        );

        self.validate_stages(device, &gathered, report);
        self.validate_render_target(device, &gathered, report);
        self.validate_vertex_input(device, &gathered, report);
        self.validate_pre_rasterization(device, &gathered, report);
        self.validate_fragment_shader(device, &gathered, report);
        self.validate_fragment_output(device, &gathered, report);
        self.validate_shared(device, &gathered, report);
    }

    fn validate_derivative(
        &self,
        objects: &impl ObjectTable,
        create_infos: &[GraphicsPipelineCreateInfo],
        index: usize,
        report: &mut ValidationReport,
    ) {
        let &Self {
            flags,
            base_pipeline_handle,
            base_pipeline_index,
            ..
        } = self;

        if !flags.intersects(PipelineCreateFlags::DERIVATIVE) {
            return;
        }

        match (base_pipeline_handle.is_null(), base_pipeline_index) {
            (true, -1) => {
                report.push(Box::new(ValidationError {
                    problem: "`flags` contains `PipelineCreateFlags::DERIVATIVE`, but neither \
                        `base_pipeline_handle` nor `base_pipeline_index` is set"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-07984"],
                    ..Default::default()
                }));
            }
            (false, -1) => match objects.get::<GraphicsPipeline>(base_pipeline_handle) {
                None => {
                    report.push(Box::new(ValidationError {
                        context: "base_pipeline_handle".into(),
                        problem: "is not a known pipeline".into(),
                        vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-07984"],
                        kind: DefectKind::Resolution,
                        ..Default::default()
                    }));
                }
                Some(base) => {
                    if !base.flags().intersects(PipelineCreateFlags::ALLOW_DERIVATIVES) {
                        report.push(Box::new(ValidationError {
                            context: "base_pipeline_handle".into(),
                            problem: "was not created with \
                                `PipelineCreateFlags::ALLOW_DERIVATIVES`"
                                .into(),
                            vuids: &["VUID-vkCreateGraphicsPipelines-flags-00721"],
                            kind: DefectKind::CrossEntity,
                            ..Default::default()
                        }));
                    }
                }
            },
            (false, _) => {
                report.push(Box::new(ValidationError {
                    problem: "`base_pipeline_handle` and `base_pipeline_index` are both set".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-07986"],
                    ..Default::default()
                }));
            }
            (true, base_index) => {
                let Some(base_index) = usize::try_from(base_index)
                    .ok()
                    .filter(|&base_index| base_index < create_infos.len())
                else {
                    report.push(Box::new(ValidationError {
                        context: "base_pipeline_index".into(),
                        problem: "is not an index into the create infos of the call".into(),
                        vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-07985"],
                        ..Default::default()
                    }));
                    return;
                };

                if base_index >= index {
                    report.push(Box::new(ValidationError {
                        context: "base_pipeline_index".into(),
                        problem: "does not refer to an earlier create info".into(),
                        vuids: &["VUID-vkCreateGraphicsPipelines-flags-00720"],
                        ..Default::default()
                    }));
                } else if !create_infos[base_index]
                    .flags
                    .intersects(PipelineCreateFlags::ALLOW_DERIVATIVES)
                {
                    report.push(Box::new(ValidationError {
                        context: "base_pipeline_index".into(),
                        problem: "refers to a create info whose `flags` does not contain \
                            `PipelineCreateFlags::ALLOW_DERIVATIVES`"
                            .into(),
                        vuids: &["VUID-vkCreateGraphicsPipelines-flags-00721"],
                        kind: DefectKind::CrossEntity,
                        ..Default::default()
                    }));
                }
            }
        }
    }

    /// A pipeline that is not a library must end up with every sub-state that it needs.
    fn validate_completeness(&self, gathered: &Gathered, report: &mut ValidationReport) {
        if self.flags.intersects(PipelineCreateFlags::LIBRARY) {
            return;
        }

        let sub_states = &gathered.sub_states;
        let mut required = GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS;

        if sub_states.stages().intersects(ShaderStages::VERTEX) {
            required |= GraphicsPipelineLibraryFlags::VERTEX_INPUT_INTERFACE;
        }

        if !sub_states.discards_statically() {
            required |= GraphicsPipelineLibraryFlags::FRAGMENT_SHADER
                | GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE;
        }

        let missing = required - sub_states.library_flags();

        if !missing.is_empty() {
            report.push(Box::new(ValidationError {
                problem: format!(
                    "the pipeline is not a library, but the sub-states {:?} are defined \
                    neither by the create info nor by a linked library",
                    missing,
                )
                .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-06640"],
                ..Default::default()
            }));
        }
    }

    fn validate_stages(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        let own_flags = gathered.own_flags;
        let mut seen = ShaderStages::empty();

        for (index, stage_info) in self.stages.iter().enumerate() {
            let stage = stage_info.stage;

            report.scoped(format!("stages[{}]", index), |report| {
                stage_info.validate(device, report);
            });

            if seen.contains_enum(stage) {
                report.push(Box::new(ValidationError {
                    context: format!("stages[{}].stage", index).into(),
                    problem: "is the same stage as an earlier element".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-00726"],
                    ..Default::default()
                }));
            }

            seen |= ShaderStages::from(stage);

            if matches!(stage, ShaderStage::Compute | ShaderStage::Raygen) {
                report.push(Box::new(ValidationError {
                    context: format!("stages[{}].stage", index).into(),
                    problem: "is not a graphics stage".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-00728"],
                    ..Default::default()
                }));
            } else if stage == ShaderStage::Fragment
                && !own_flags.intersects(GraphicsPipelineLibraryFlags::FRAGMENT_SHADER)
            {
                report.push(Box::new(ValidationError {
                    context: format!("stages[{}].stage", index).into(),
                    problem: "is `ShaderStage::Fragment`, but the create info does not define \
                        the fragment shader sub-state"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-06894"],
                    ..Default::default()
                }));
            } else if ShaderStages::PRE_RASTERIZATION.contains_enum(stage)
                && !own_flags.intersects(GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS)
            {
                report.push(Box::new(ValidationError {
                    context: format!("stages[{}].stage", index).into(),
                    problem: "is a pre-rasterization stage, but the create info does not define \
                        the pre-rasterization shaders sub-state"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-06895"],
                    ..Default::default()
                }));
            }
        }

        if !own_flags.intersects(GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS) {
            return;
        }

        let stages = seen & ShaderStages::PRE_RASTERIZATION;

        if !stages.intersects(ShaderStages::VERTEX | ShaderStages::MESH) {
            report.push(Box::new(ValidationError {
                context: "stages".into(),
                problem: "contains neither a vertex nor a mesh stage".into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-stage-02096"],
                ..Default::default()
            }));
        }

        if stages.intersects(ShaderStages::VERTEX_FAMILY)
            && stages.intersects(ShaderStages::MESH_FAMILY)
        {
            report.push(Box::new(ValidationError {
                context: "stages".into(),
                problem: "contains both vertex processing and mesh processing stages".into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-02095"],
                ..Default::default()
            }));
        }

        if stages.intersects(ShaderStages::TASK) && !stages.intersects(ShaderStages::MESH) {
            report.push(Box::new(ValidationError {
                context: "stages".into(),
                problem: "contains a task stage, but no mesh stage".into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-TaskNV-07063"],
                ..Default::default()
            }));
        }

        match (
            stages.intersects(ShaderStages::TESSELLATION_CONTROL),
            stages.intersects(ShaderStages::TESSELLATION_EVALUATION),
        ) {
            (true, false) => {
                report.push(Box::new(ValidationError {
                    context: "stages".into(),
                    problem: "contains a tessellation control stage, but no tessellation \
                        evaluation stage"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00729"],
                    ..Default::default()
                }));
            }
            (false, true) => {
                report.push(Box::new(ValidationError {
                    context: "stages".into(),
                    problem: "contains a tessellation evaluation stage, but no tessellation \
                        control stage"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00730"],
                    ..Default::default()
                }));
            }
            _ => (),
        }
    }

    fn validate_render_target(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        if !gathered.own_flags.intersects(
            GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS
                | GraphicsPipelineLibraryFlags::FRAGMENT_SHADER
                | GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
        ) {
            return;
        }

        if self.render_pass.is_null() {
            if !device.enabled_features().dynamic_rendering {
                report.push(Box::new(ValidationError {
                    context: "render_pass".into(),
                    problem: "is a null handle".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "dynamic_rendering",
                    )])]),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-dynamicRendering-06576"],
                    kind: DefectKind::Capability,
                }));
            } else if let Some(rendering_info) = self.next.try_get::<PipelineRenderingCreateInfo>()
            {
                report.scoped("next.rendering_info", |report| {
                    rendering_info.validate(device, report)
                });
            }
        }

        // Multiview restrictions only concern the stages of this create info.
        let Some(pre_rasterization) = owned(&gathered.sub_states.pre_rasterization) else {
            return;
        };
        let Some(subpass) = &pre_rasterization.subpass else {
            return;
        };

        if subpass.view_mask() == 0 {
            return;
        }

        let is_dynamic_rendering = matches!(subpass, PipelineSubpassType::BeginRendering(_));
        let features = device.enabled_features();
        let stages = pre_rasterization.stages;

        let checks: [(bool, bool, RequiresOneOf, [&'static [&'static str]; 2]); 3] = [
            (
                stages.intersects(ShaderStages::MESH),
                features.multiview_mesh_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multiview_mesh_shader",
                )])]),
                [
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-07720"],
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-07064"],
                ],
            ),
            (
                stages.intersects(
                    ShaderStages::TESSELLATION_CONTROL | ShaderStages::TESSELLATION_EVALUATION,
                ),
                features.multiview_tessellation_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multiview_tessellation_shader",
                )])]),
                [
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06047"],
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06057"],
                ],
            ),
            (
                stages.intersects(ShaderStages::GEOMETRY),
                features.multiview_geometry_shader,
                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multiview_geometry_shader",
                )])]),
                [
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06048"],
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06058"],
                ],
            ),
        ];

        for (uses_stage, enabled, requires_one_of, vuids) in checks {
            if uses_stage && !enabled {
                report.push(Box::new(ValidationError {
                    context: "stages".into(),
                    problem: "the render target has a non-zero view mask, and a stage is used \
                        that cannot be combined with multiview"
                        .into(),
                    requires_one_of,
                    vuids: vuids[is_dynamic_rendering as usize],
                    kind: DefectKind::Capability,
                }));
            }
        }
    }

    fn validate_vertex_input(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        let Some(vertex_input) = owned(&gathered.sub_states.vertex_input) else {
            return;
        };
        let stages = gathered.sub_states.stages();

        // Mesh pipelines have no vertex input; whatever was provided is ignored.
        if stages.intersects(ShaderStages::MESH) {
            return;
        }

        let dynamic_state = &vertex_input.dynamic_state;
        let pre_rasterization = gathered.sub_states.pre_rasterization.as_ref();
        // A vertex input library linked against unknown shaders may leave both states out.
        let needs_vertex_input =
            pre_rasterization.is_some() || stages.intersects(ShaderStages::VERTEX);

        match &vertex_input.vertex_input_state {
            Some(vertex_input_state) => {
                if !dynamic_state.contains(DynamicState::VertexInput) {
                    report.scoped("vertex_input_state", |report| {
                        vertex_input_state.validate(device, report)
                    });
                }
            }
            None => {
                if needs_vertex_input
                    && !dynamic_state.allows_none(FixedFunctionState::VertexInput, device)
                {
                    report.push(Box::new(ValidationError {
                        context: "vertex_input_state".into(),
                        problem: "is `None`, but the pipeline has a vertex stage, and \
                            `DynamicState::VertexInput` is not used"
                            .into(),
                        vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-02097"],
                        ..Default::default()
                    }));
                }
            }
        }

        let Some(input_assembly_state) = &vertex_input.input_assembly_state else {
            if needs_vertex_input
                && !dynamic_state.allows_none(FixedFunctionState::InputAssembly, device)
            {
                report.push(Box::new(ValidationError {
                    context: "input_assembly_state".into(),
                    problem: "is `None`, but the pipeline has a vertex stage".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-02098"],
                    ..Default::default()
                }));
            }

            return;
        };

        report.scoped("input_assembly_state", |report| {
            input_assembly_state.validate(device, dynamic_state, report)
        });

        if pre_rasterization.is_none() || dynamic_state.contains(DynamicState::PrimitiveTopology)
        {
            return;
        }

        let has_tessellation = stages.intersects(
            ShaderStages::TESSELLATION_CONTROL | ShaderStages::TESSELLATION_EVALUATION,
        );
        let is_patch_list = input_assembly_state.topology.is_patch_list();

        if has_tessellation && !is_patch_list {
            report.push(Box::new(ValidationError {
                context: "input_assembly_state.topology".into(),
                problem: "is not `PrimitiveTopology::PatchList`, but the pipeline has \
                    tessellation stages"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-00736"],
                ..Default::default()
            }));
        } else if !has_tessellation && is_patch_list {
            report.push(Box::new(ValidationError {
                context: "input_assembly_state.topology".into(),
                problem: "is `PrimitiveTopology::PatchList`, but the pipeline has no \
                    tessellation stages"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-topology-08889"],
                ..Default::default()
            }));
        }
    }

    fn validate_pre_rasterization(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        let Some(pre_rasterization) = owned(&gathered.sub_states.pre_rasterization) else {
            return;
        };
        let &PreRasterizationSubState {
            stages,
            layout: _,
            subpass: _,
            ref tessellation_state,
            ref viewport_state,
            ref rasterization_state,
            ref discard_rectangle_state,
            fragment_shading_rate_state: _,
            ref dynamic_state,
        } = pre_rasterization;

        if stages.intersects(ShaderStages::TESSELLATION_CONTROL) {
            match tessellation_state {
                Some(tessellation_state) => report.scoped("tessellation_state", |report| {
                    tessellation_state.validate(device, dynamic_state, report)
                }),
                None => {
                    if !dynamic_state.allows_none(FixedFunctionState::Tessellation, device) {
                        report.push(Box::new(ValidationError {
                            context: "tessellation_state".into(),
                            problem: "is `None`, but the pipeline has tessellation stages".into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-pStages-09022"],
                            ..Default::default()
                        }));
                    }
                }
            }
        }

        match rasterization_state {
            Some(rasterization_state) => report.scoped("rasterization_state", |report| {
                rasterization_state.validate(device, dynamic_state, report)
            }),
            None => {
                if !dynamic_state.allows_none(FixedFunctionState::Rasterization, device) {
                    report.push(Box::new(ValidationError {
                        context: "rasterization_state".into(),
                        problem: "is `None`".into(),
                        vuids: &["VUID-VkGraphicsPipelineCreateInfo-pRasterizationState-09040"],
                        ..Default::default()
                    }));
                }
            }
        }

        if !pre_rasterization.discards_statically() {
            match viewport_state {
                Some(viewport_state) => report.scoped("viewport_state", |report| {
                    viewport_state.validate(device, dynamic_state, report)
                }),
                None => {
                    if !dynamic_state.allows_none(FixedFunctionState::Viewport, device) {
                        report.push(Box::new(ValidationError {
                            context: "viewport_state".into(),
                            problem: "is `None`, and rasterizer discard is not enabled".into(),
                            vuids: &[
                                "VUID-VkGraphicsPipelineCreateInfo-rasterizerDiscardEnable-09024",
                            ],
                            ..Default::default()
                        }));
                    }
                }
            }
        }

        if let Some(discard_rectangle_state) = discard_rectangle_state {
            report.scoped("next.discard_rectangle_state", |report| {
                discard_rectangle_state.validate(device, dynamic_state, report)
            });
        }
    }

    fn validate_fragment_shader(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        let Some(fragment_shader) = owned(&gathered.sub_states.fragment_shader) else {
            return;
        };
        let Some(subpass) = &fragment_shader.subpass else {
            return;
        };

        if gathered.sub_states.discards_statically() {
            return;
        }

        let dynamic_state = &fragment_shader.dynamic_state;

        if !(subpass.has_depth() || subpass.has_stencil()) {
            return;
        }

        match &fragment_shader.depth_stencil_state {
            Some(depth_stencil_state) => report.scoped("depth_stencil_state", |report| {
                depth_stencil_state.validate(device, dynamic_state, report)
            }),
            None => {
                if !dynamic_state.allows_none(FixedFunctionState::DepthStencil, device) {
                    let vuids: &'static [&'static str] = match subpass {
                        PipelineSubpassType::BeginRenderPass(_) => {
                            &["VUID-VkGraphicsPipelineCreateInfo-renderPass-09028"]
                        }
                        PipelineSubpassType::BeginRendering(_) => {
                            &["VUID-VkGraphicsPipelineCreateInfo-renderPass-09033"]
                        }
                    };

                    report.push(Box::new(ValidationError {
                        context: "depth_stencil_state".into(),
                        problem: "is `None`, but the render target has a depth or stencil \
                            attachment"
                            .into(),
                        vuids,
                        ..Default::default()
                    }));
                }
            }
        }
    }

    fn validate_fragment_output(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        let Some(fragment_output) = owned(&gathered.sub_states.fragment_output) else {
            return;
        };
        let &FragmentOutputSubState {
            ref subpass,
            ref color_blend_state,
            ref multisample_state,
            ref attachment_sample_count,
            ref dynamic_state,
        } = fragment_output;

        if let Some(attachment_sample_count) = attachment_sample_count {
            report.scoped("next.attachment_sample_count", |report| {
                attachment_sample_count.validate(report)
            });
        }

        if gathered.sub_states.discards_statically() {
            return;
        }

        if multisample_state.is_none()
            && gathered.sub_states.pre_rasterization.is_some()
            && !dynamic_state.allows_none(FixedFunctionState::Multisample, device)
        {
            report.push(Box::new(ValidationError {
                context: "multisample_state".into(),
                problem: "is `None`, and rasterizer discard is not enabled".into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-rasterizerDiscardEnable-09026"],
                ..Default::default()
            }));
        }

        let Some(subpass) = subpass else {
            return;
        };
        let is_dynamic_rendering = matches!(subpass, PipelineSubpassType::BeginRendering(_));

        if let (Some(multisample_state), PipelineSubpassType::BeginRenderPass(subpass)) =
            (multisample_state, subpass)
        {
            let extensions = device.enabled_extensions();
            let mixed_samples =
                extensions.amd_mixed_attachment_samples || extensions.nv_framebuffer_mixed_samples;

            if !mixed_samples && !dynamic_state.contains(DynamicState::RasterizationSamples) {
                if let Some(samples) = subpass.num_samples() {
                    if samples != multisample_state.rasterization_samples {
                        report.push(Box::new(ValidationError {
                            context: "multisample_state.rasterization_samples".into(),
                            problem: format!(
                                "is {:?}, but the attachments of the subpass have {:?}",
                                multisample_state.rasterization_samples, samples,
                            )
                            .into(),
                            vuids: &["VUID-VkGraphicsPipelineCreateInfo-subpass-00757"],
                            kind: DefectKind::CrossEntity,
                            ..Default::default()
                        }));
                    }
                }
            }
        }

        let color_attachment_formats = subpass.color_attachment_formats();

        let Some(color_blend_state) = color_blend_state else {
            if color_attachment_formats.iter().any(Option::is_some)
                && !dynamic_state.allows_none(FixedFunctionState::ColorBlend, device)
            {
                let vuids: &'static [&'static str] = if is_dynamic_rendering {
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-09037"]
                } else {
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-09030"]
                };

                report.push(Box::new(ValidationError {
                    context: "color_blend_state".into(),
                    problem: "is `None`, but the render target has color attachments".into(),
                    vuids,
                    ..Default::default()
                }));
            }

            return;
        };

        report.scoped("color_blend_state", |report| {
            color_blend_state.validate(device, dynamic_state, report)
        });

        if color_blend_state.attachments.len() != color_attachment_formats.len() {
            let vuids: &'static [&'static str] = if is_dynamic_rendering {
                &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06055"]
            } else {
                &["VUID-VkGraphicsPipelineCreateInfo-renderPass-07609"]
            };

            report.push(Box::new(ValidationError {
                context: "color_blend_state.attachments".into(),
                problem: format!(
                    "has {} elements, but the render target has {} color attachments",
                    color_blend_state.attachments.len(),
                    color_attachment_formats.len(),
                )
                .into(),
                vuids,
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }

        if dynamic_state.contains(DynamicState::ColorBlendEnable) {
            return;
        }

        for (index, (attachment_state, format)) in color_blend_state
            .attachments
            .iter()
            .zip(&color_attachment_formats)
            .enumerate()
        {
            let Some(format) = *format else {
                continue;
            };

            if attachment_state.blend.is_some()
                && !device
                    .format_features(format)
                    .intersects(FormatFeatures::COLOR_ATTACHMENT_BLEND)
            {
                let vuids: &'static [&'static str] = if is_dynamic_rendering {
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06062"]
                } else {
                    &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06041"]
                };

                report.push(Box::new(ValidationError {
                    context: format!("color_blend_state.attachments[{}].blend", index).into(),
                    problem: format!(
                        "is `Some`, but the format of the attachment, {:?}, does not support \
                        blending",
                        format,
                    )
                    .into(),
                    vuids,
                    kind: DefectKind::Capability,
                    ..Default::default()
                }));

                // The other attachments usually share the format.
                break;
            }
        }
    }

    /// Checks the state that several sub-states share, once.
    fn validate_shared(
        &self,
        device: &DeviceCapabilities,
        gathered: &Gathered,
        report: &mut ValidationReport,
    ) {
        let own_flags = gathered.own_flags;
        let dynamic_state: DynamicStates = self.dynamic_state.iter().copied().collect();

        if own_flags.intersects(
            GraphicsPipelineLibraryFlags::FRAGMENT_SHADER
                | GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
        ) && !gathered.sub_states.discards_statically()
        {
            if let Some(multisample_state) = &self.multisample_state {
                report.scoped("multisample_state", |report| {
                    multisample_state.validate(device, &dynamic_state, report)
                });
            }
        }

        if own_flags.intersects(
            GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS
                | GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        ) {
            if let Some(fragment_shading_rate_state) =
                self.next.try_get::<FragmentShadingRateState>()
            {
                report.scoped("next.fragment_shading_rate_state", |report| {
                    fragment_shading_rate_state.validate(device, &dynamic_state, report)
                });
            }
        }

        if !own_flags.is_empty() {
            if let Some(robustness) = self.next.try_get::<PipelineRobustnessCreateInfo>() {
                report.scoped("next.robustness", |report| {
                    robustness.validate(device, report)
                });
            }
        }
    }
}

/// Returns the sub-state if the create info defines it itself.
fn owned<T>(state: &Option<SubState<T>>) -> Option<&T> {
    state
        .as_ref()
        .filter(|state| state.is_owned())
        .map(SubState::get)
}
