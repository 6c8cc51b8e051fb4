//! Configures how primitives should be converted into collections of fragments.

use crate::{
    device::DeviceCapabilities,
    macros::vulkan_enum,
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};

/// The state in a graphics pipeline describing how the rasterization stage should behave.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterizationState {
    /// If true, then the depth value of the vertices will be clamped to the range [0.0, 1.0]. If
    /// false, fragments whose depth is outside of this range will be discarded.
    ///
    /// If enabled, the [`depth_clamp`](crate::device::DeviceFeatures::depth_clamp) feature must be
    /// enabled on the device.
    ///
    /// The default value is `false`.
    pub depth_clamp_enable: bool,

    /// If true, all the fragments will be discarded, and the fragment shader will not be run.
    ///
    /// A pipeline that statically discards all fragments does not need the fragment shader or
    /// fragment output sub-states.
    ///
    /// The default value is `false`.
    pub rasterizer_discard_enable: bool,

    /// This setting can ask the rasterizer to downgrade triangles into lines or points, or lines
    /// into points.
    ///
    /// If set to a value other than `Fill`, the
    /// [`fill_mode_non_solid`](crate::device::DeviceFeatures::fill_mode_non_solid) feature must be
    /// enabled on the device.
    ///
    /// The default value is [`PolygonMode::Fill`].
    pub polygon_mode: PolygonMode,

    /// Specifies whether front faces or back faces should be discarded, or none, or both.
    ///
    /// The default value is [`CullMode::None`].
    pub cull_mode: CullMode,

    /// Specifies which triangle orientation is considered to be the front of the triangle.
    ///
    /// The default value is [`FrontFace::CounterClockwise`].
    pub front_face: FrontFace,

    /// Sets how to modify depth values in the rasterization stage.
    ///
    /// If set to `None`, depth biasing is disabled.
    ///
    /// The default value is `None`.
    pub depth_bias: Option<DepthBiasState>,

    /// Width, in pixels, of lines when drawing lines.
    ///
    /// Setting this to a value other than 1.0 requires the
    /// [`wide_lines`](crate::device::DeviceFeatures::wide_lines) feature to be enabled on
    /// the device.
    ///
    /// The default value is `1.0`.
    pub line_width: f32,

    /// The rasterization mode for lines.
    ///
    /// If this is not set to `Default`, the
    /// [`ext_line_rasterization`](crate::device::DeviceExtensions::ext_line_rasterization)
    /// extension and an additional feature must be enabled on the device.
    ///
    /// The default value is [`LineRasterizationMode::Default`].
    pub line_rasterization_mode: LineRasterizationMode,

    /// Enables and sets the parameters for line stippling.
    ///
    /// The default value is `None`.
    pub line_stipple: Option<LineStipple>,

    /// Enables conservative rasterization.
    ///
    /// If this is set to `Some`, the
    /// [`ext_conservative_rasterization`](crate::device::DeviceExtensions::ext_conservative_rasterization)
    /// extension must be enabled on the device.
    ///
    /// The default value is `None`.
    pub conservative: Option<RasterizationConservativeState>,

    /// Explicitly enables or disables depth clipping, independently of `depth_clamp_enable`.
    ///
    /// If this is set to `Some`, the
    /// [`depth_clip_enable`](crate::device::DeviceFeatures::depth_clip_enable) feature must be
    /// enabled on the device.
    ///
    /// The default value is `None`.
    pub depth_clip_enable: Option<bool>,

    /// The vertex that is used as the source of flat-shaded outputs.
    ///
    /// The default value is [`ProvokingVertex::First`].
    pub provoking_vertex: ProvokingVertex,

    /// The vertex stream that is rasterized, when geometry shader streams are used.
    ///
    /// If this is set to `Some`, the
    /// [`geometry_streams`](crate::device::DeviceFeatures::geometry_streams) feature must be
    /// enabled on the device.
    ///
    /// The default value is `None`.
    pub rasterization_stream: Option<u32>,

    pub _ne: crate::NonExhaustive,
}

impl Default for RasterizationState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizationState {
    /// Returns a default `RasterizationState`.
    #[inline]
    pub const fn new() -> Self {
        Self {
            depth_clamp_enable: false,
            rasterizer_discard_enable: false,
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::None,
            front_face: FrontFace::CounterClockwise,
            depth_bias: None,
            line_width: 1.0,
            line_rasterization_mode: LineRasterizationMode::Default,
            line_stipple: None,
            conservative: None,
            depth_clip_enable: None,
            provoking_vertex: ProvokingVertex::First,
            rasterization_stream: None,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Returns whether rasterization is disabled for every draw, regardless of dynamic state.
    #[inline]
    pub(crate) fn discards_statically(&self, dynamic_state: &DynamicStates) -> bool {
        self.rasterizer_discard_enable
            && !dynamic_state.contains(DynamicState::RasterizerDiscardEnable)
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            depth_clamp_enable,
            rasterizer_discard_enable: _,
            polygon_mode,
            cull_mode,
            front_face,
            ref depth_bias,
            line_width,
            line_rasterization_mode,
            ref line_stipple,
            ref conservative,
            depth_clip_enable,
            provoking_vertex,
            rasterization_stream,
            _ne: _,
        } = self;

        let features = device.enabled_features();
        let extensions = device.enabled_extensions();
        let properties = device.properties();

        report.check(polygon_mode.validate_device(device).map_err(|err| {
            err.add_context("polygon_mode")
                .set_vuids(&["VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-parameter"])
        }));

        report.check(cull_mode.validate_device(device).map_err(|err| {
            err.add_context("cull_mode")
                .set_vuids(&["VUID-VkPipelineRasterizationStateCreateInfo-cullMode-parameter"])
        }));

        report.check(front_face.validate_device(device).map_err(|err| {
            err.add_context("front_face")
                .set_vuids(&["VUID-VkPipelineRasterizationStateCreateInfo-frontFace-parameter"])
        }));

        if depth_clamp_enable
            && !dynamic_state.contains(DynamicState::DepthClampEnable)
            && !features.depth_clamp
        {
            report.push(Box::new(ValidationError {
                context: "depth_clamp_enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "depth_clamp",
                )])]),
                vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-depthClampEnable-00782"],
                kind: DefectKind::Capability,
            }));
        }

        if polygon_mode != PolygonMode::Fill
            && !dynamic_state.contains(DynamicState::PolygonMode)
            && !features.fill_mode_non_solid
        {
            report.push(Box::new(ValidationError {
                context: "polygon_mode".into(),
                problem: "is not `PolygonMode::Fill`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "fill_mode_non_solid",
                )])]),
                vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-01507"],
                kind: DefectKind::Capability,
            }));
        }

        if let Some(depth_bias_state) = depth_bias {
            if depth_bias_state.clamp != 0.0
                && !dynamic_state.contains(DynamicState::DepthBias)
                && !features.depth_bias_clamp
            {
                report.push(Box::new(ValidationError {
                    context: "depth_bias.clamp".into(),
                    problem: "is not `0.0`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "depth_bias_clamp",
                    )])]),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00754"],
                    kind: DefectKind::Capability,
                }));
            }
        }

        if line_width != 1.0
            && !dynamic_state.contains(DynamicState::LineWidth)
            && !features.wide_lines
        {
            report.push(Box::new(ValidationError {
                context: "line_width".into(),
                problem: "is not `1.0`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "wide_lines",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749"],
                kind: DefectKind::Capability,
            }));
        }

        if !dynamic_state.contains(DynamicState::LineRasterizationMode) {
            let requirement = match line_rasterization_mode {
                LineRasterizationMode::Default => None,
                LineRasterizationMode::Rectangular if !features.rectangular_lines => Some((
                    "is `LineRasterizationMode::Rectangular`",
                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "rectangular_lines",
                    )])]),
                    &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-lineRasterizationMode-02768"]
                        as &'static [&'static str],
                )),
                LineRasterizationMode::Bresenham if !features.bresenham_lines => Some((
                    "is `LineRasterizationMode::Bresenham`",
                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "bresenham_lines",
                    )])]),
                    &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-lineRasterizationMode-02769"]
                        as &'static [&'static str],
                )),
                LineRasterizationMode::RectangularSmooth if !features.smooth_lines => Some((
                    "is `LineRasterizationMode::RectangularSmooth`",
                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("smooth_lines")])]),
                    &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-lineRasterizationMode-02770"]
                        as &'static [&'static str],
                )),
                _ => None,
            };

            if let Err(err) = line_rasterization_mode.validate_device(device) {
                report.push(err.add_context("line_rasterization_mode").set_vuids(&[
                    "VUID-VkPipelineRasterizationLineStateCreateInfoEXT-lineRasterizationMode-parameter",
                ]));
            } else if let Some((problem, requires_one_of, vuids)) = requirement {
                report.push(Box::new(ValidationError {
                    context: "line_rasterization_mode".into(),
                    problem: problem.into(),
                    requires_one_of,
                    vuids,
                    kind: DefectKind::Capability,
                }));
            }
        }

        if let Some(line_stipple) = line_stipple {
            if !extensions.ext_line_rasterization {
                report.push(Box::new(ValidationError {
                    context: "line_stipple".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_line_rasterization"),
                    ])]),
                    vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-pNext-pNext"],
                    kind: DefectKind::Capability,
                }));
            }

            if !dynamic_state.contains(DynamicState::LineStipple)
                && !(1..=256).contains(&line_stipple.factor)
            {
                report.push(Box::new(ValidationError {
                    context: "line_stipple.factor".into(),
                    problem: "is not between 1 and 256 inclusive".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-stippledLineEnable-02767"],
                    ..Default::default()
                }));
            }

            if !dynamic_state.contains_any(&[
                DynamicState::LineRasterizationMode,
                DynamicState::LineStippleEnable,
            ]) {
                let rectangular = RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "stippled_rectangular_lines",
                )])]);
                let requirement: Option<(RequiresOneOf, &'static [&'static str])> =
                    match line_rasterization_mode {
                        LineRasterizationMode::Default if !features.stippled_rectangular_lines => {
                            Some((
                                rectangular,
                                &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-stippledLineEnable-02774"],
                            ))
                        }
                        LineRasterizationMode::Rectangular
                            if !features.stippled_rectangular_lines =>
                        {
                            Some((
                                rectangular,
                                &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-stippledLineEnable-02771"],
                            ))
                        }
                        LineRasterizationMode::Bresenham if !features.stippled_bresenham_lines => {
                            Some((
                                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                                    "stippled_bresenham_lines",
                                )])]),
                                &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-stippledLineEnable-02772"],
                            ))
                        }
                        LineRasterizationMode::RectangularSmooth
                            if !features.stippled_smooth_lines =>
                        {
                            Some((
                                RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                                    "stippled_smooth_lines",
                                )])]),
                                &["VUID-VkPipelineRasterizationLineStateCreateInfoEXT-stippledLineEnable-02773"],
                            ))
                        }
                        _ => None,
                    };

                if let Some((requires_one_of, vuids)) = requirement {
                    report.push(Box::new(ValidationError {
                        problem: format!(
                            "`line_stipple` is `Some`, and `line_rasterization_mode` is \
                            `LineRasterizationMode::{:?}`",
                            line_rasterization_mode,
                        )
                        .into(),
                        requires_one_of,
                        vuids,
                        kind: DefectKind::Capability,
                        ..Default::default()
                    }));
                }
            }
        }

        if let Some(conservative) = conservative {
            if !extensions.ext_conservative_rasterization {
                report.push(Box::new(ValidationError {
                    context: "conservative".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_conservative_rasterization"),
                    ])]),
                    vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-pNext-pNext"],
                    kind: DefectKind::Capability,
                }));
            } else if !dynamic_state.contains(DynamicState::ExtraPrimitiveOverestimationSize) {
                report.scoped("conservative", |report| conservative.validate(device, report));
            }
        }

        if depth_clip_enable.is_some()
            && !dynamic_state.contains(DynamicState::DepthClipEnable)
            && !(extensions.ext_depth_clip_enable && features.depth_clip_enable)
        {
            report.push(Box::new(ValidationError {
                context: "depth_clip_enable".into(),
                problem: "is `Some`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                    Requires::DeviceExtension("ext_depth_clip_enable"),
                    Requires::DeviceFeature("depth_clip_enable"),
                ])]),
                vuids: &["VUID-VkPipelineRasterizationStateCreateInfo-pNext-pNext"],
                kind: DefectKind::Capability,
            }));
        }

        if provoking_vertex == ProvokingVertex::Last
            && !dynamic_state.contains(DynamicState::ProvokingVertexMode)
            && !features.provoking_vertex_last
        {
            report.push(Box::new(ValidationError {
                context: "provoking_vertex".into(),
                problem: "is `ProvokingVertex::Last`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "provoking_vertex_last",
                )])]),
                vuids: &[
                    "VUID-VkPipelineRasterizationProvokingVertexStateCreateInfoEXT-provokingVertexMode-04883",
                ],
                kind: DefectKind::Capability,
            }));
        }

        if let Some(stream) = rasterization_stream {
            if !features.geometry_streams {
                report.push(Box::new(ValidationError {
                    context: "rasterization_stream".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "geometry_streams",
                    )])]),
                    vuids: &[
                        "VUID-VkPipelineRasterizationStateStreamCreateInfoEXT-geometryStreams-02324",
                    ],
                    kind: DefectKind::Capability,
                }));
            }

            if !dynamic_state.contains(DynamicState::RasterizationStream)
                && stream >= properties.max_transform_feedback_streams.unwrap_or(0)
            {
                report.push(Box::new(ValidationError {
                    context: "rasterization_stream".into(),
                    problem: "is not less than the `max_transform_feedback_streams` limit".into(),
                    vuids: &[
                        "VUID-VkPipelineRasterizationStateStreamCreateInfoEXT-rasterizationStream-02325",
                    ],
                    kind: DefectKind::Capability,
                    ..Default::default()
                }));
            }
        }
    }
}

/// The values to use for depth biasing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthBiasState {
    /// Specifies a constant factor to be multiplied to every depth value.
    ///
    /// The default value is `1.0`.
    pub constant_factor: f32,

    /// The maximum (or minimum) depth bias of a fragment.
    ///
    /// Setting this to a value other than 0.0 requires the
    /// [`depth_bias_clamp`](crate::device::DeviceFeatures::depth_bias_clamp) feature to be enabled
    /// on the device.
    ///
    /// The default value is `0.0`.
    pub clamp: f32,

    /// A scalar factor to multiply with a fragment's slope in depth bias calculations.
    ///
    /// The default value is `1.0`.
    pub slope_factor: f32,
}

impl Default for DepthBiasState {
    #[inline]
    fn default() -> Self {
        Self {
            constant_factor: 1.0,
            clamp: 0.0,
            slope_factor: 1.0,
        }
    }
}

vulkan_enum! {
    /// Specifies the culling mode.
    CullMode = CullModeFlags(u32);

    /// No culling.
    None = NONE,

    /// The faces facing the front of the screen (ie. facing the user) will be removed.
    Front = FRONT,

    /// The faces facing the back of the screen will be removed.
    Back = BACK,

    /// All faces will be removed.
    FrontAndBack = FRONT_AND_BACK,
}

impl Default for CullMode {
    #[inline]
    fn default() -> CullMode {
        CullMode::None
    }
}

vulkan_enum! {
    /// Specifies which triangle orientation corresponds to the front or the triangle.
    FrontFace = FrontFace(i32);

    /// Triangles whose vertices are oriented counter-clockwise on the screen will be considered
    /// as facing their front.
    CounterClockwise = COUNTER_CLOCKWISE,

    /// Triangles whose vertices are oriented clockwise on the screen will be considered
    /// as facing their front.
    Clockwise = CLOCKWISE,
}

impl Default for FrontFace {
    #[inline]
    fn default() -> FrontFace {
        FrontFace::CounterClockwise
    }
}

vulkan_enum! {
    /// How polygons are rasterized.
    PolygonMode = PolygonMode(i32);

    Fill = FILL,

    Line = LINE,

    Point = POINT,
}

impl Default for PolygonMode {
    #[inline]
    fn default() -> PolygonMode {
        PolygonMode::Fill
    }
}

vulkan_enum! {
    /// The rasterization mode to use for lines.
    LineRasterizationMode = LineRasterizationModeEXT(i32);

    /// Lines are drawn as parallelograms, or as rectangles if the device has strict lines.
    Default = DEFAULT,

    /// Lines are drawn as if they were rectangles extruded from the line.
    Rectangular = RECTANGULAR
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_line_rasterization)]),
    ]),

    /// Lines are drawn by determining which pixel diamonds the line intersects and exits.
    Bresenham = BRESENHAM
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_line_rasterization)]),
    ]),

    /// As `Rectangular`, but with alpha falloff.
    RectangularSmooth = RECTANGULAR_SMOOTH
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_line_rasterization)]),
    ]),
}

impl Default for LineRasterizationMode {
    #[inline]
    fn default() -> Self {
        Self::Default
    }
}

/// The parameters of a stippled line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineStipple {
    /// The repeat factor used in stippled line rasterization. Must be between 1 and 256 inclusive.
    pub factor: u32,

    /// The bit pattern used in stippled line rasterization.
    pub pattern: u16,
}

/// The state in a graphics pipeline describing how the conservative rasterization mode should
/// behave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterizationConservativeState {
    /// Sets the conservative rasterization mode.
    ///
    /// The default value is [`ConservativeRasterizationMode::Disabled`].
    pub mode: ConservativeRasterizationMode,

    /// The extra size in pixels to increase the generating primitive during conservative
    /// rasterization. Ignored unless the mode is
    /// [`ConservativeRasterizationMode::Overestimate`].
    ///
    /// The default value is 0.0.
    pub overestimation_size: f32,
}

impl Default for RasterizationConservativeState {
    #[inline]
    fn default() -> Self {
        Self {
            mode: ConservativeRasterizationMode::Disabled,
            overestimation_size: 0.0,
        }
    }
}

impl RasterizationConservativeState {
    pub(crate) fn validate(self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let Self {
            mode,
            overestimation_size,
        } = self;

        report.check(mode.validate_device(device).map_err(|err| {
            err.add_context("mode").set_vuids(&[
                "VUID-VkPipelineRasterizationConservativeStateCreateInfoEXT-conservativeRasterizationMode-parameter",
            ])
        }));

        let max_size = device
            .properties()
            .max_extra_primitive_overestimation_size
            .unwrap_or(0.0);

        if mode == ConservativeRasterizationMode::Overestimate
            && !(0.0..=max_size).contains(&overestimation_size)
        {
            report.push(Box::new(ValidationError {
                context: "overestimation_size".into(),
                problem: "is not between 0.0 and the `max_extra_primitive_overestimation_size` \
                    limit inclusive"
                    .into(),
                vuids: &[
                    "VUID-VkPipelineRasterizationConservativeStateCreateInfoEXT-extraPrimitiveOverestimationSize-01769",
                ],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }
    }
}

vulkan_enum! {
    /// Describes how fragments will be generated based on how much is covered by a primitive.
    ConservativeRasterizationMode = ConservativeRasterizationModeEXT(i32);

    /// Conservative rasterization is disabled and rasterization proceeds as normal.
    Disabled = DISABLED,

    /// Fragments will be generated if any part of a primitive touches a pixel.
    Overestimate = OVERESTIMATE,

    /// Fragments will be generated only if a primitive completely covers a pixel.
    Underestimate = UNDERESTIMATE,
}

impl Default for ConservativeRasterizationMode {
    #[inline]
    fn default() -> ConservativeRasterizationMode {
        ConservativeRasterizationMode::Disabled
    }
}

vulkan_enum! {
    /// Specifies which vertex of a primitive is the provoking vertex.
    ProvokingVertex = ProvokingVertexModeEXT(i32);

    /// The first vertex of each primitive.
    First = FIRST_VERTEX,

    /// The last vertex of each primitive.
    Last = LAST_VERTEX
    RequiresOneOf([
        RequiresAllOf([DeviceExtension(ext_provoking_vertex)]),
    ]),
}

impl Default for ProvokingVertex {
    #[inline]
    fn default() -> Self {
        Self::First
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConservativeRasterizationMode, DepthBiasState, LineRasterizationMode, LineStipple,
        PolygonMode, ProvokingVertex, RasterizationConservativeState, RasterizationState,
    };
    use crate::{
        device::{DeviceCapabilities, DeviceProperties},
        pipeline::{DynamicState, DynamicStates},
        DefectKind, ValidationReport,
    };

    fn validate(
        state: &RasterizationState,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
    ) -> ValidationReport {
        ValidationReport::collect(|report| state.validate(device, dynamic_state, report))
    }

    #[test]
    fn feature_gates() {
        let device = test_device!();
        let none = DynamicStates::new();

        let wide = RasterizationState {
            line_width: 2.0,
            ..RasterizationState::new()
        };
        let report = validate(&wide, &device, &none);
        assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749"));
        assert_eq!(report.errors()[0].kind, DefectKind::Capability);
        assert!(validate(&wide, &device, &[DynamicState::LineWidth].into_iter().collect())
            .is_valid());
        assert!(validate(&wide, &test_device!(wide_lines), &none).is_valid());

        let clamped = RasterizationState {
            depth_bias: Some(DepthBiasState {
                clamp: 0.5,
                ..Default::default()
            }),
            ..RasterizationState::new()
        };
        assert!(validate(&clamped, &device, &none)
            .contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00754"));

        let lines = RasterizationState {
            polygon_mode: PolygonMode::Line,
            ..RasterizationState::new()
        };
        assert!(validate(&lines, &device, &none)
            .contains_vuid("VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-01507"));
        assert!(
            validate(&lines, &device, &[DynamicState::PolygonMode].into_iter().collect())
                .is_valid()
        );
    }

    #[test]
    fn reports_every_missing_feature() {
        let state = RasterizationState {
            depth_clamp_enable: true,
            polygon_mode: PolygonMode::Line,
            line_width: 2.0,
            ..RasterizationState::new()
        };

        let report = validate(&state, &test_device!(), &DynamicStates::new());
        assert_eq!(
            report.vuids().collect::<Vec<_>>(),
            [
                "VUID-VkPipelineRasterizationStateCreateInfo-depthClampEnable-00782",
                "VUID-VkPipelineRasterizationStateCreateInfo-polygonMode-01507",
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-00749",
            ],
        );
    }

    #[test]
    fn extension_structs_without_extensions() {
        let state = RasterizationState {
            line_stipple: Some(LineStipple {
                factor: 1,
                pattern: 0xFFFF,
            }),
            conservative: Some(RasterizationConservativeState::default()),
            depth_clip_enable: Some(true),
            ..RasterizationState::new()
        };

        let device = test_device!(stippled_rectangular_lines);
        let report = validate(&state, &device, &DynamicStates::new());
        assert_eq!(
            report.count_vuid("VUID-VkPipelineRasterizationStateCreateInfo-pNext-pNext"),
            3,
        );
        assert_eq!(report.errors()[0].context, "line_stipple");
        assert_eq!(report.errors()[1].context, "conservative");
        assert_eq!(report.errors()[2].context, "depth_clip_enable");
    }

    #[test]
    fn line_rasterization() {
        let state = RasterizationState {
            line_rasterization_mode: LineRasterizationMode::Bresenham,
            line_stipple: Some(LineStipple {
                factor: 1,
                pattern: 0xF0F0,
            }),
            ..RasterizationState::new()
        };

        let device = test_device_with_extensions!([bresenham_lines], [ext_line_rasterization]);
        assert!(validate(&state, &device, &DynamicStates::new()).contains_vuid(
            "VUID-VkPipelineRasterizationLineStateCreateInfoEXT-stippledLineEnable-02772"
        ));

        let device = test_device_with_extensions!(
            [bresenham_lines, stippled_bresenham_lines],
            [ext_line_rasterization]
        );
        assert!(validate(&state, &device, &DynamicStates::new()).is_valid());

        let device = test_device_with_extensions!([], [ext_line_rasterization]);
        let report = validate(&state, &device, &DynamicStates::new());
        assert!(report.contains_vuid(
            "VUID-VkPipelineRasterizationLineStateCreateInfoEXT-lineRasterizationMode-02769"
        ));
        assert!(report.contains_vuid(
            "VUID-VkPipelineRasterizationLineStateCreateInfoEXT-stippledLineEnable-02772"
        ));
    }

    #[test]
    fn conservative_overestimation() {
        let state = RasterizationState {
            conservative: Some(RasterizationConservativeState {
                mode: ConservativeRasterizationMode::Overestimate,
                overestimation_size: 1.0,
            }),
            ..RasterizationState::new()
        };

        assert!(!validate(&state, &test_device!(), &DynamicStates::new()).is_valid());

        let device = test_device_with_extensions!([], [ext_conservative_rasterization])
            .with_properties(DeviceProperties {
                max_extra_primitive_overestimation_size: Some(0.75),
                ..Default::default()
            });
        let report = validate(&state, &device, &DynamicStates::new());
        assert!(report.contains_vuid(
            "VUID-VkPipelineRasterizationConservativeStateCreateInfoEXT-extraPrimitiveOverestimationSize-01769"
        ));
        assert_eq!(report.errors()[0].context, "conservative.overestimation_size");
        assert!(validate(
            &state,
            &device,
            &[DynamicState::ExtraPrimitiveOverestimationSize]
                .into_iter()
                .collect()
        )
        .is_valid());
    }

    #[test]
    fn provoking_vertex_and_streams() {
        let last = RasterizationState {
            provoking_vertex: ProvokingVertex::Last,
            ..RasterizationState::new()
        };
        let device = test_device_with_extensions!([], [ext_provoking_vertex]);
        assert!(validate(&last, &device, &DynamicStates::new()).contains_vuid(
            "VUID-VkPipelineRasterizationProvokingVertexStateCreateInfoEXT-provokingVertexMode-04883"
        ));

        let streamed = RasterizationState {
            rasterization_stream: Some(2),
            ..RasterizationState::new()
        };
        let device = test_device!(geometry_streams).with_properties(DeviceProperties {
            max_transform_feedback_streams: Some(2),
            ..Default::default()
        });
        assert!(validate(&streamed, &device, &DynamicStates::new()).contains_vuid(
            "VUID-VkPipelineRasterizationStateStreamCreateInfoEXT-rasterizationStream-02325"
        ));
    }

    #[test]
    fn static_discard() {
        let state = RasterizationState {
            rasterizer_discard_enable: true,
            ..RasterizationState::new()
        };

        assert!(state.discards_statically(&DynamicStates::new()));
        assert!(!state.discards_statically(
            &[DynamicState::RasterizerDiscardEnable].into_iter().collect()
        ));
    }
}
