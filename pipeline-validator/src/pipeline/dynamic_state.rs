//! State that is supplied while recording a command buffer instead of being baked into the
//! pipeline.
//!
//! Most dynamic states need a device feature before they may be listed. [`DynamicState::required`]
//! is the table that maps each state to what it needs, and [`DynamicStates::allows_none`] decides
//! whether a fixed-function state struct may be left out because everything in it is dynamic.

use crate::{
    device::DeviceCapabilities, macros::vulkan_enum, DefectKind, Requires, RequiresAllOf,
    RequiresOneOf, ValidationError, ValidationReport, Version,
};
use smallvec::SmallVec;

vulkan_enum! {
    /// A particular state value within a graphics pipeline that can be dynamically set by a
    /// command buffer.
    DynamicState = DynamicState(i32);

    Viewport = VIEWPORT,
    Scissor = SCISSOR,
    LineWidth = LINE_WIDTH,
    DepthBias = DEPTH_BIAS,
    BlendConstants = BLEND_CONSTANTS,
    DepthBounds = DEPTH_BOUNDS,
    StencilCompareMask = STENCIL_COMPARE_MASK,
    StencilWriteMask = STENCIL_WRITE_MASK,
    StencilReference = STENCIL_REFERENCE,
    CullMode = CULL_MODE,
    FrontFace = FRONT_FACE,
    PrimitiveTopology = PRIMITIVE_TOPOLOGY,
    ViewportWithCount = VIEWPORT_WITH_COUNT,
    ScissorWithCount = SCISSOR_WITH_COUNT,
    VertexInputBindingStride = VERTEX_INPUT_BINDING_STRIDE,
    DepthTestEnable = DEPTH_TEST_ENABLE,
    DepthWriteEnable = DEPTH_WRITE_ENABLE,
    DepthCompareOp = DEPTH_COMPARE_OP,
    DepthBoundsTestEnable = DEPTH_BOUNDS_TEST_ENABLE,
    StencilTestEnable = STENCIL_TEST_ENABLE,
    StencilOp = STENCIL_OP,
    RasterizerDiscardEnable = RASTERIZER_DISCARD_ENABLE,
    DepthBiasEnable = DEPTH_BIAS_ENABLE,
    PrimitiveRestartEnable = PRIMITIVE_RESTART_ENABLE,
    DiscardRectangle = DISCARD_RECTANGLE_EXT,
    DiscardRectangleEnable = DISCARD_RECTANGLE_ENABLE_EXT,
    DiscardRectangleMode = DISCARD_RECTANGLE_MODE_EXT,
    SampleLocations = SAMPLE_LOCATIONS_EXT,
    FragmentShadingRate = FRAGMENT_SHADING_RATE_KHR,
    LineStipple = LINE_STIPPLE_EXT,
    VertexInput = VERTEX_INPUT_EXT,
    PatchControlPoints = PATCH_CONTROL_POINTS_EXT,
    LogicOp = LOGIC_OP_EXT,
    ColorWriteEnable = COLOR_WRITE_ENABLE_EXT,
    TessellationDomainOrigin = TESSELLATION_DOMAIN_ORIGIN_EXT,
    DepthClampEnable = DEPTH_CLAMP_ENABLE_EXT,
    PolygonMode = POLYGON_MODE_EXT,
    RasterizationSamples = RASTERIZATION_SAMPLES_EXT,
    SampleMask = SAMPLE_MASK_EXT,
    AlphaToCoverageEnable = ALPHA_TO_COVERAGE_ENABLE_EXT,
    AlphaToOneEnable = ALPHA_TO_ONE_ENABLE_EXT,
    LogicOpEnable = LOGIC_OP_ENABLE_EXT,
    ColorBlendEnable = COLOR_BLEND_ENABLE_EXT,
    ColorBlendEquation = COLOR_BLEND_EQUATION_EXT,
    ColorWriteMask = COLOR_WRITE_MASK_EXT,
    RasterizationStream = RASTERIZATION_STREAM_EXT,
    ConservativeRasterizationMode = CONSERVATIVE_RASTERIZATION_MODE_EXT,
    ExtraPrimitiveOverestimationSize = EXTRA_PRIMITIVE_OVERESTIMATION_SIZE_EXT,
    DepthClipEnable = DEPTH_CLIP_ENABLE_EXT,
    SampleLocationsEnable = SAMPLE_LOCATIONS_ENABLE_EXT,
    ColorBlendAdvanced = COLOR_BLEND_ADVANCED_EXT,
    ProvokingVertexMode = PROVOKING_VERTEX_MODE_EXT,
    LineRasterizationMode = LINE_RASTERIZATION_MODE_EXT,
    LineStippleEnable = LINE_STIPPLE_ENABLE_EXT,
    DepthClipNegativeOneToOne = DEPTH_CLIP_NEGATIVE_ONE_TO_ONE_EXT,
    AttachmentFeedbackLoopEnable = ATTACHMENT_FEEDBACK_LOOP_ENABLE_EXT,
}

/// What must be available on the device before a dynamic state may be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureRequirement {
    /// The alternatives that allow the state.
    pub requires_one_of: RequiresOneOf,

    /// The VUIDs that are violated when none of the alternatives is satisfied.
    pub vuids: &'static [&'static str],
}

macro_rules! requires_feature {
    ($feature:ident, $vuid:literal) => {
        Some(FeatureRequirement {
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                stringify!($feature),
            )])]),
            vuids: &[$vuid],
        })
    };
}

macro_rules! requires_extension {
    ($extension:ident) => {
        Some(FeatureRequirement {
            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                stringify!($extension),
            )])]),
            vuids: &["VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-parameter"],
        })
    };
}

const EXTENDED_DYNAMIC_STATE: Option<FeatureRequirement> = Some(FeatureRequirement {
    requires_one_of: RequiresOneOf(&[
        RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
        RequiresAllOf(&[Requires::DeviceFeature("extended_dynamic_state")]),
    ]),
    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03378"],
});

const EXTENDED_DYNAMIC_STATE2: Option<FeatureRequirement> = Some(FeatureRequirement {
    requires_one_of: RequiresOneOf(&[
        RequiresAllOf(&[Requires::APIVersion(Version::V1_3)]),
        RequiresAllOf(&[Requires::DeviceFeature("extended_dynamic_state2")]),
    ]),
    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04868"],
});

impl DynamicState {
    /// Returns what the device must support for `self` to be listed as dynamic, or `None` if
    /// every device allows it.
    pub fn required(self) -> Option<FeatureRequirement> {
        match self {
            DynamicState::Viewport
            | DynamicState::Scissor
            | DynamicState::LineWidth
            | DynamicState::DepthBias
            | DynamicState::BlendConstants
            | DynamicState::DepthBounds
            | DynamicState::StencilCompareMask
            | DynamicState::StencilWriteMask
            | DynamicState::StencilReference => None,

            DynamicState::CullMode
            | DynamicState::FrontFace
            | DynamicState::PrimitiveTopology
            | DynamicState::ViewportWithCount
            | DynamicState::ScissorWithCount
            | DynamicState::VertexInputBindingStride
            | DynamicState::DepthTestEnable
            | DynamicState::DepthWriteEnable
            | DynamicState::DepthCompareOp
            | DynamicState::DepthBoundsTestEnable
            | DynamicState::StencilTestEnable
            | DynamicState::StencilOp => EXTENDED_DYNAMIC_STATE,

            DynamicState::RasterizerDiscardEnable
            | DynamicState::DepthBiasEnable
            | DynamicState::PrimitiveRestartEnable => EXTENDED_DYNAMIC_STATE2,

            DynamicState::LogicOp => requires_feature!(
                extended_dynamic_state2_logic_op,
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04869"
            ),
            DynamicState::PatchControlPoints => requires_feature!(
                extended_dynamic_state2_patch_control_points,
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04870"
            ),
            DynamicState::VertexInput => requires_feature!(
                vertex_input_dynamic_state,
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04807"
            ),
            DynamicState::ColorWriteEnable => requires_feature!(
                color_write_enable,
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04800"
            ),
            DynamicState::TessellationDomainOrigin => requires_feature!(
                extended_dynamic_state3_tessellation_domain_origin,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3TessellationDomainOrigin-07370"
            ),
            DynamicState::DepthClampEnable => requires_feature!(
                extended_dynamic_state3_depth_clamp_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3DepthClampEnable-07371"
            ),
            DynamicState::PolygonMode => requires_feature!(
                extended_dynamic_state3_polygon_mode,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3PolygonMode-07372"
            ),
            DynamicState::RasterizationSamples => requires_feature!(
                extended_dynamic_state3_rasterization_samples,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3RasterizationSamples-07373"
            ),
            DynamicState::SampleMask => requires_feature!(
                extended_dynamic_state3_sample_mask,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3SampleMask-07374"
            ),
            DynamicState::AlphaToCoverageEnable => requires_feature!(
                extended_dynamic_state3_alpha_to_coverage_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3AlphaToCoverageEnable-07375"
            ),
            DynamicState::AlphaToOneEnable => requires_feature!(
                extended_dynamic_state3_alpha_to_one_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3AlphaToOneEnable-07376"
            ),
            DynamicState::LogicOpEnable => requires_feature!(
                extended_dynamic_state3_logic_op_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3LogicOpEnable-07377"
            ),
            DynamicState::ColorBlendEnable => requires_feature!(
                extended_dynamic_state3_color_blend_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ColorBlendEnable-07378"
            ),
            DynamicState::ColorBlendEquation => requires_feature!(
                extended_dynamic_state3_color_blend_equation,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ColorBlendEquation-07379"
            ),
            DynamicState::ColorWriteMask => requires_feature!(
                extended_dynamic_state3_color_write_mask,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ColorWriteMask-07380"
            ),
            DynamicState::RasterizationStream => requires_feature!(
                extended_dynamic_state3_rasterization_stream,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3RasterizationStream-07381"
            ),
            DynamicState::ConservativeRasterizationMode => requires_feature!(
                extended_dynamic_state3_conservative_rasterization_mode,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ConservativeRasterizationMode-07382"
            ),
            DynamicState::ExtraPrimitiveOverestimationSize => requires_feature!(
                extended_dynamic_state3_extra_primitive_overestimation_size,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ExtraPrimitiveOverestimationSize-07383"
            ),
            DynamicState::DepthClipEnable => requires_feature!(
                extended_dynamic_state3_depth_clip_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3DepthClipEnable-07384"
            ),
            DynamicState::SampleLocationsEnable => requires_feature!(
                extended_dynamic_state3_sample_locations_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3SampleLocationsEnable-07385"
            ),
            DynamicState::ColorBlendAdvanced => requires_feature!(
                extended_dynamic_state3_color_blend_advanced,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ColorBlendAdvanced-07386"
            ),
            DynamicState::ProvokingVertexMode => requires_feature!(
                extended_dynamic_state3_provoking_vertex_mode,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3ProvokingVertexMode-07387"
            ),
            DynamicState::LineRasterizationMode => requires_feature!(
                extended_dynamic_state3_line_rasterization_mode,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3LineRasterizationMode-07388"
            ),
            DynamicState::LineStippleEnable => requires_feature!(
                extended_dynamic_state3_line_stipple_enable,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3LineStippleEnable-07389"
            ),
            DynamicState::DepthClipNegativeOneToOne => requires_feature!(
                extended_dynamic_state3_depth_clip_negative_one_to_one,
                "VUID-VkGraphicsPipelineCreateInfo-extendedDynamicState3DepthClipNegativeOneToOne-07390"
            ),
            DynamicState::AttachmentFeedbackLoopEnable => requires_feature!(
                attachment_feedback_loop_dynamic_state,
                "VUID-VkGraphicsPipelineCreateInfo-attachmentFeedbackLoopDynamicState-08910"
            ),

            DynamicState::DiscardRectangle
            | DynamicState::DiscardRectangleEnable
            | DynamicState::DiscardRectangleMode => requires_extension!(ext_discard_rectangles),
            DynamicState::SampleLocations => requires_extension!(ext_sample_locations),
            DynamicState::FragmentShadingRate => requires_extension!(khr_fragment_shading_rate),
            DynamicState::LineStipple => requires_extension!(ext_line_rasterization),
        }
    }
}

/// A fixed-function state struct of a graphics pipeline that can be omitted if all of its
/// contents are dynamic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedFunctionState {
    VertexInput,
    InputAssembly,
    Tessellation,
    Viewport,
    Rasterization,
    Multisample,
    DepthStencil,
    ColorBlend,
}

impl FixedFunctionState {
    /// Returns the dynamic states that must all be set for the struct to be omitted.
    pub fn dynamic_states(self, device: &DeviceCapabilities) -> &'static [DynamicState] {
        match self {
            FixedFunctionState::VertexInput => &[DynamicState::VertexInput],
            FixedFunctionState::InputAssembly => &[
                DynamicState::PrimitiveTopology,
                DynamicState::PrimitiveRestartEnable,
            ],
            FixedFunctionState::Tessellation => &[
                DynamicState::PatchControlPoints,
                DynamicState::TessellationDomainOrigin,
            ],
            FixedFunctionState::Viewport => &[
                DynamicState::ViewportWithCount,
                DynamicState::ScissorWithCount,
            ],
            FixedFunctionState::Rasterization => &[
                DynamicState::DepthClampEnable,
                DynamicState::RasterizerDiscardEnable,
                DynamicState::PolygonMode,
                DynamicState::CullMode,
                DynamicState::FrontFace,
                DynamicState::DepthBiasEnable,
                DynamicState::DepthBias,
                DynamicState::LineWidth,
            ],
            FixedFunctionState::Multisample => {
                // Alpha-to-one can only be non-default when the feature is enabled.
                if device.enabled_features().alpha_to_one {
                    &[
                        DynamicState::RasterizationSamples,
                        DynamicState::SampleMask,
                        DynamicState::AlphaToCoverageEnable,
                        DynamicState::AlphaToOneEnable,
                    ]
                } else {
                    &[
                        DynamicState::RasterizationSamples,
                        DynamicState::SampleMask,
                        DynamicState::AlphaToCoverageEnable,
                    ]
                }
            }
            FixedFunctionState::DepthStencil => &[
                DynamicState::DepthTestEnable,
                DynamicState::DepthWriteEnable,
                DynamicState::DepthCompareOp,
                DynamicState::DepthBoundsTestEnable,
                DynamicState::StencilTestEnable,
                DynamicState::StencilOp,
                DynamicState::DepthBounds,
            ],
            FixedFunctionState::ColorBlend => &[
                DynamicState::LogicOpEnable,
                DynamicState::LogicOp,
                DynamicState::ColorBlendEnable,
                DynamicState::ColorBlendEquation,
                DynamicState::ColorWriteMask,
                DynamicState::BlendConstants,
            ],
        }
    }
}

/// A set of dynamic states, iterated in the order they were first inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DynamicStates {
    states: SmallVec<[DynamicState; 8]>,
}

impl DynamicStates {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `state`, returning whether it was not already in the set.
    pub fn insert(&mut self, state: DynamicState) -> bool {
        if self.contains(state) {
            false
        } else {
            self.states.push(state);
            true
        }
    }

    #[inline]
    pub fn contains(&self, state: DynamicState) -> bool {
        self.states.contains(&state)
    }

    /// Returns whether every state in `states` is in the set.
    #[inline]
    pub fn contains_all(&self, states: &[DynamicState]) -> bool {
        states.iter().all(|&state| self.contains(state))
    }

    /// Returns whether any state in `states` is in the set.
    #[inline]
    pub fn contains_any(&self, states: &[DynamicState]) -> bool {
        states.iter().any(|&state| self.contains(state))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = DynamicState> + '_ {
        self.states.iter().copied()
    }

    /// Adds every state of `other` that is not already present.
    pub fn extend_from(&mut self, other: &DynamicStates) {
        for state in other.iter() {
            self.insert(state);
        }
    }

    /// Returns whether the fixed-function struct `state` may be omitted, because every field of
    /// it that can be dynamic is.
    #[inline]
    pub fn allows_none(&self, state: FixedFunctionState, device: &DeviceCapabilities) -> bool {
        self.contains_all(state.dynamic_states(device))
    }
}

impl FromIterator<DynamicState> for DynamicStates {
    fn from_iter<T: IntoIterator<Item = DynamicState>>(iter: T) -> Self {
        let mut states = DynamicStates::new();

        for state in iter {
            states.insert(state);
        }

        states
    }
}

impl<'a> IntoIterator for &'a DynamicStates {
    type Item = DynamicState;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DynamicState>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.states.iter().copied()
    }
}

/// Checks the list of dynamic states of a create info: no duplicates, no conflicting pairs, and
/// every state allowed by the device.
pub(crate) fn validate_dynamic_state_list(
    device: &DeviceCapabilities,
    dynamic_state: &[DynamicState],
    has_mesh_stage: bool,
    report: &mut ValidationReport,
) {
    let mut seen = DynamicStates::new();

    for (index, &state) in dynamic_state.iter().enumerate() {
        if !seen.insert(state) {
            report.push(Box::new(ValidationError {
                context: format!("dynamic_state[{}]", index).into(),
                problem: format!("`DynamicState::{:?}` is listed more than once", state).into(),
                vuids: &["VUID-VkPipelineDynamicStateCreateInfo-pDynamicStates-01442"],
                ..Default::default()
            }));
            continue;
        }

        if let Some(requirement) = state.required() {
            if !requirement.requires_one_of.is_satisfied_by(device) {
                report.push(Box::new(ValidationError {
                    context: format!("dynamic_state[{}]", index).into(),
                    problem: format!("is `DynamicState::{:?}`", state).into(),
                    requires_one_of: requirement.requires_one_of,
                    vuids: requirement.vuids,
                    kind: DefectKind::Capability,
                }));
            }
        }
    }

    const EXCLUSIVE: [(DynamicState, DynamicState, &[&str]); 2] = [
        (
            DynamicState::Viewport,
            DynamicState::ViewportWithCount,
            &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04132"],
        ),
        (
            DynamicState::Scissor,
            DynamicState::ScissorWithCount,
            &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-04133"],
        ),
    ];

    for (a, b, vuids) in EXCLUSIVE {
        if seen.contains(a) && seen.contains(b) {
            report.push(Box::new(ValidationError {
                context: "dynamic_state".into(),
                problem: format!(
                    "contains both `DynamicState::{:?}` and `DynamicState::{:?}`",
                    a, b,
                )
                .into(),
                vuids,
                ..Default::default()
            }));
        }
    }

    if has_mesh_stage {
        const FORBIDDEN_WITH_MESH: [(DynamicState, &[&str]); 4] = [
            (
                DynamicState::PrimitiveTopology,
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-07065"],
            ),
            (
                DynamicState::PrimitiveRestartEnable,
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-07065"],
            ),
            (
                DynamicState::VertexInputBindingStride,
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-07066"],
            ),
            (
                DynamicState::VertexInput,
                &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-07067"],
            ),
        ];

        for (state, vuids) in FORBIDDEN_WITH_MESH {
            if seen.contains(state) {
                report.push(Box::new(ValidationError {
                    context: "dynamic_state".into(),
                    problem: format!(
                        "the pipeline contains a mesh shader stage, but `dynamic_state` \
                        contains `DynamicState::{:?}`",
                        state,
                    )
                    .into(),
                    vuids,
                    ..Default::default()
                }));
            }
        }
    }
}
