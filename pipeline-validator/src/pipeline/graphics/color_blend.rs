//! Defines how the color output of the fragment shader is written to the attachment.
//!
//! There are three kinds of color attachments for the purpose of blending:
//!
//! - Attachments with a floating-point or fixed point format, which can be blended.
//! - Attachments with a (signed or unsigned) integer format, which cannot be blended.
//! - Attachments whose format does not support `FormatFeatures::COLOR_ATTACHMENT_BLEND`.
//!
//! Which of these an attachment is only becomes known once the state is paired with a subpass
//! or a set of dynamic rendering formats, so those checks live with the pipeline.

use crate::{
    device::DeviceCapabilities,
    macros::{vulkan_bitflags, vulkan_enum},
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};
use smallvec::SmallVec;

/// Describes how the color output of the fragment shader is written to the attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBlendState {
    /// Sets the logical operation to perform between the incoming fragment color and the
    /// existing fragment in the framebuffer attachment.
    ///
    /// If set to `Some`, the [`logic_op`](crate::device::DeviceFeatures::logic_op) feature must
    /// be enabled on the device.
    ///
    /// The default value is `None`.
    pub logic_op: Option<LogicOp>,

    /// Sets the blend and output state for each color attachment. The number of elements must
    /// match the number of color attachments in the subpass.
    ///
    /// If there are multiple elements, and the `blend` and `color_write_mask` members of each
    /// element differ, then the
    /// [`independent_blend`](crate::device::DeviceFeatures::independent_blend) feature must be
    /// enabled on the device.
    ///
    /// The default value is empty.
    pub attachments: Vec<ColorBlendAttachmentState>,

    /// The constant color to use for some of the `BlendFactor` variants.
    ///
    /// The default value is `[0.0; 4]`.
    pub blend_constants: [f32; 4],

    /// Whether writes to each color attachment are enabled, from
    /// `VkPipelineColorWriteCreateInfoEXT`.
    ///
    /// If set to `Some`, the length must equal the length of `attachments`. If any element is
    /// `false`, the [`color_write_enable`](crate::device::DeviceFeatures::color_write_enable)
    /// feature must be enabled on the device.
    ///
    /// The default value is `None`.
    pub color_write_enables: Option<SmallVec<[bool; 4]>>,

    pub _ne: crate::NonExhaustive,
}

impl Default for ColorBlendState {
    /// Returns [`ColorBlendState::new(1)`].
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl ColorBlendState {
    /// Returns a default `ColorBlendState` with `count` duplicates of `attachment_state`.
    #[inline]
    pub fn with_attachment_states(count: u32, attachment_state: ColorBlendAttachmentState) -> Self {
        Self {
            attachments: std::iter::repeat(attachment_state)
                .take(count as usize)
                .collect(),
            ..Self::new(0)
        }
    }

    /// Creates a `ColorBlendState` with logical operations disabled, blend constants set to
    /// zero, and `num` attachment entries that have blending disabled and every color
    /// component enabled.
    #[inline]
    pub fn new(num: u32) -> Self {
        Self {
            logic_op: None,
            attachments: (0..num)
                .map(|_| ColorBlendAttachmentState::default())
                .collect(),
            blend_constants: [0.0; 4],
            color_write_enables: None,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Enables logical operations with the given logical operation.
    #[inline]
    pub fn logic_op(mut self, logic_op: LogicOp) -> Self {
        self.logic_op = Some(logic_op);
        self
    }

    /// Enables blending for all attachments, with the given parameters.
    #[inline]
    pub fn blend(mut self, blend: AttachmentBlend) -> Self {
        self.attachments
            .iter_mut()
            .for_each(|attachment_state| attachment_state.blend = Some(blend));
        self
    }

    /// Returns whether blending is enabled for any attachment.
    #[inline]
    pub(crate) fn has_blend(&self) -> bool {
        self.attachments.iter().any(|state| state.blend.is_some())
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            logic_op,
            ref attachments,
            blend_constants: _,
            ref color_write_enables,
            _ne: _,
        } = self;

        if let Some(logic_op) = logic_op {
            if !device.enabled_features().logic_op {
                report.push(Box::new(ValidationError {
                    context: "logic_op".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "logic_op",
                    )])]),
                    vuids: &["VUID-VkPipelineColorBlendStateCreateInfo-logicOpEnable-00606"],
                    kind: DefectKind::Capability,
                }));
            }

            if !dynamic_state.contains(DynamicState::LogicOp) {
                report.check(logic_op.validate_device(device).map_err(|err| {
                    err.add_context("logic_op").set_vuids(&[
                        "VUID-VkPipelineColorBlendStateCreateInfo-logicOpEnable-00607",
                    ])
                }));
            }
        }

        for (index, state) in attachments.iter().enumerate() {
            report.scoped(format!("attachments[{}]", index), |report| {
                state.validate(device, report)
            });
        }

        if !device.enabled_features().independent_blend
            && !dynamic_state.contains_any(&[
                DynamicState::ColorBlendEnable,
                DynamicState::ColorBlendEquation,
                DynamicState::ColorWriteMask,
            ])
        {
            if let Some(first) = attachments.first() {
                for (index, state) in attachments.iter().enumerate().skip(1) {
                    if state != first {
                        report.push(Box::new(ValidationError {
                            problem: format!(
                                "`attachments[{}]` does not equal `attachments[0]`",
                                index
                            )
                            .into(),
                            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                                Requires::DeviceFeature("independent_blend"),
                            ])]),
                            vuids: &[
                                "VUID-VkPipelineColorBlendStateCreateInfo-pAttachments-00605",
                            ],
                            kind: DefectKind::Capability,
                            ..Default::default()
                        }));
                    }
                }
            }
        }

        if let Some(color_write_enables) = color_write_enables {
            if color_write_enables.len() != attachments.len() {
                report.push(Box::new(ValidationError {
                    problem: "`color_write_enables` is `Some`, but its length does not equal \
                        the length of `attachments`"
                        .into(),
                    vuids: &["VUID-VkPipelineColorWriteCreateInfoEXT-attachmentCount-07608"],
                    ..Default::default()
                }));
            }

            if !device.enabled_features().color_write_enable
                && color_write_enables.iter().any(|&enable| !enable)
            {
                report.push(Box::new(ValidationError {
                    context: "color_write_enables".into(),
                    problem: "contains a `false` element".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "color_write_enable",
                    )])]),
                    vuids: &["VUID-VkPipelineColorWriteCreateInfoEXT-pAttachments-04801"],
                    kind: DefectKind::Capability,
                }));
            }
        }
    }
}

/// Describes how a framebuffer color attachment is handled in the pipeline during the color
/// blend stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorBlendAttachmentState {
    /// The blend parameters for the attachment.
    ///
    /// If set to `None`, blending is disabled, and all incoming pixels will be used directly.
    ///
    /// The default value is `None`.
    pub blend: Option<AttachmentBlend>,

    /// Sets which components of the final pixel value are written to the attachment.
    ///
    /// The default value is `ColorComponents::all()`.
    pub color_write_mask: ColorComponents,
}

impl Default for ColorBlendAttachmentState {
    #[inline]
    fn default() -> Self {
        Self {
            blend: None,
            color_write_mask: ColorComponents::all(),
        }
    }
}

impl ColorBlendAttachmentState {
    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            ref blend,
            color_write_mask,
        } = self;

        if let Some(blend) = blend {
            report.scoped("blend", |report| blend.validate(device, report));
        }

        report.check(color_write_mask.validate_device(device).map_err(|err| {
            err.add_context("color_write_mask").set_vuids(&[
                "VUID-VkPipelineColorBlendAttachmentState-colorWriteMask-parameter",
            ])
        }));
    }
}

/// Describes how the blending system should behave for an attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttachmentBlend {
    /// The operation to apply to the source color component before applying `color_op`.
    ///
    /// The default value is [`BlendFactor::SrcColor`].
    pub src_color_blend_factor: BlendFactor,

    /// The operation to apply to the destination color component before applying `color_op`.
    ///
    /// The default value is [`BlendFactor::Zero`].
    pub dst_color_blend_factor: BlendFactor,

    /// The operation to apply between the color components of the source and destination pixels,
    /// to produce the final pixel value.
    ///
    /// The default value is [`BlendOp::Add`].
    pub color_blend_op: BlendOp,

    /// The operation to apply to the source alpha component before applying `alpha_op`.
    ///
    /// The default value is [`BlendFactor::SrcColor`].
    pub src_alpha_blend_factor: BlendFactor,

    /// The operation to apply to the destination alpha component before applying `alpha_op`.
    ///
    /// The default value is [`BlendFactor::Zero`].
    pub dst_alpha_blend_factor: BlendFactor,

    /// The operation to apply between the alpha component of the source and destination pixels,
    /// to produce the final pixel value.
    ///
    /// The default value is [`BlendOp::Add`].
    pub alpha_blend_op: BlendOp,
}

impl Default for AttachmentBlend {
    #[inline]
    fn default() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::SrcColor,
            dst_color_blend_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::SrcColor,
            dst_alpha_blend_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
        }
    }
}

impl AttachmentBlend {
    /// Builds an `AttachmentBlend` where the output of the fragment shader is ignored and the
    /// destination is untouched.
    #[inline]
    pub fn ignore_source() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::Zero,
            dst_color_blend_factor: BlendFactor::DstColor,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::Zero,
            dst_alpha_blend_factor: BlendFactor::DstColor,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the output will be merged with the existing value
    /// based on the alpha of the source.
    #[inline]
    pub fn alpha() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::SrcAlpha,
            dst_color_blend_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::SrcAlpha,
            dst_alpha_blend_factor: BlendFactor::OneMinusSrcAlpha,
            alpha_blend_op: BlendOp::Add,
        }
    }

    /// Builds an `AttachmentBlend` where the colors are added, and alpha is set to the maximum
    /// of the two.
    #[inline]
    pub fn additive() -> Self {
        Self {
            src_color_blend_factor: BlendFactor::One,
            dst_color_blend_factor: BlendFactor::One,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::One,
            dst_alpha_blend_factor: BlendFactor::One,
            alpha_blend_op: BlendOp::Max,
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            src_color_blend_factor,
            dst_color_blend_factor,
            color_blend_op,
            src_alpha_blend_factor,
            dst_alpha_blend_factor,
            alpha_blend_op,
        } = self;

        let factors: [(&'static str, BlendFactor, &'static [&'static str], &'static [&'static str]); 4] = [
            (
                "src_color_blend_factor",
                src_color_blend_factor,
                &["VUID-VkPipelineColorBlendAttachmentState-srcColorBlendFactor-parameter"],
                &["VUID-VkPipelineColorBlendAttachmentState-srcColorBlendFactor-00608"],
            ),
            (
                "dst_color_blend_factor",
                dst_color_blend_factor,
                &["VUID-VkPipelineColorBlendAttachmentState-dstColorBlendFactor-parameter"],
                &["VUID-VkPipelineColorBlendAttachmentState-dstColorBlendFactor-00609"],
            ),
            (
                "src_alpha_blend_factor",
                src_alpha_blend_factor,
                &["VUID-VkPipelineColorBlendAttachmentState-srcAlphaBlendFactor-parameter"],
                &["VUID-VkPipelineColorBlendAttachmentState-srcAlphaBlendFactor-00610"],
            ),
            (
                "dst_alpha_blend_factor",
                dst_alpha_blend_factor,
                &["VUID-VkPipelineColorBlendAttachmentState-dstAlphaBlendFactor-parameter"],
                &["VUID-VkPipelineColorBlendAttachmentState-dstAlphaBlendFactor-00611"],
            ),
        ];

        for (context, factor, parameter_vuids, dual_src_vuids) in factors {
            report.check(
                factor
                    .validate_device(device)
                    .map_err(|err| err.add_context(context).set_vuids(parameter_vuids)),
            );

            if factor.is_dual_source() && !device.enabled_features().dual_src_blend {
                report.push(Box::new(ValidationError {
                    context: context.into(),
                    problem: "is `BlendFactor::Src1*`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "dual_src_blend",
                    )])]),
                    vuids: dual_src_vuids,
                    kind: DefectKind::Capability,
                }));
            }
        }

        report.check(color_blend_op.validate_device(device).map_err(|err| {
            err.add_context("color_blend_op").set_vuids(&[
                "VUID-VkPipelineColorBlendAttachmentState-colorBlendOp-parameter",
            ])
        }));

        report.check(alpha_blend_op.validate_device(device).map_err(|err| {
            err.add_context("alpha_blend_op").set_vuids(&[
                "VUID-VkPipelineColorBlendAttachmentState-alphaBlendOp-parameter",
            ])
        }));

        if device.enabled_extensions().khr_portability_subset
            && [src_color_blend_factor, dst_color_blend_factor].iter().any(|factor| {
                matches!(
                    factor,
                    BlendFactor::ConstantAlpha | BlendFactor::OneMinusConstantAlpha
                )
            })
        {
            report.push(Box::new(ValidationError {
                problem: "this device is a portability subset device, and a color blend \
                    factor is `BlendFactor::ConstantAlpha` or \
                    `BlendFactor::OneMinusConstantAlpha`"
                    .into(),
                vuids: &[
                    "VUID-VkPipelineColorBlendAttachmentState-constantAlphaColorBlendFactors-04454",
                    "VUID-VkPipelineColorBlendAttachmentState-constantAlphaColorBlendFactors-04455",
                ],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }
    }
}

vulkan_enum! {
    /// The operation that takes `source` (output from the fragment shader), `destination` (value
    /// currently in the framebuffer attachment) and `blend_constant` input values,
    /// and produces new inputs to be fed to `BlendOp`.
    ///
    /// Some operations take `source1` as an input, representing the second source value. The
    /// [`dual_src_blend`](crate::device::DeviceFeatures::dual_src_blend) feature must be enabled
    /// on the device when these are used.
    BlendFactor impl {
        /// Returns whether the factor reads the second source of the fragment shader.
        #[inline]
        pub fn is_dual_source(self) -> bool {
            matches!(
                self,
                BlendFactor::Src1Color
                    | BlendFactor::OneMinusSrc1Color
                    | BlendFactor::Src1Alpha
                    | BlendFactor::OneMinusSrc1Alpha
            )
        }
    }
    = BlendFactor(i32);

    /// `[0.0; 4]`
    Zero = ZERO,

    /// `[1.0; 4]`
    One = ONE,

    /// `source` component-wise.
    SrcColor = SRC_COLOR,

    /// `1.0 - source` component-wise.
    OneMinusSrcColor = ONE_MINUS_SRC_COLOR,

    /// `destination` component-wise.
    DstColor = DST_COLOR,

    /// `1.0 - destination` component-wise.
    OneMinusDstColor = ONE_MINUS_DST_COLOR,

    /// `source.a` for all components.
    SrcAlpha = SRC_ALPHA,

    /// `1.0 - source.a` for all components.
    OneMinusSrcAlpha = ONE_MINUS_SRC_ALPHA,

    /// `destination.a` for all components.
    DstAlpha = DST_ALPHA,

    /// `1.0 - destination.a` for all components.
    OneMinusDstAlpha = ONE_MINUS_DST_ALPHA,

    /// `blend_constants` component-wise.
    ConstantColor = CONSTANT_COLOR,

    /// `1.0 - blend_constants` component-wise.
    OneMinusConstantColor = ONE_MINUS_CONSTANT_COLOR,

    /// `blend_constants.a` for all components.
    ConstantAlpha = CONSTANT_ALPHA,

    /// `1.0 - blend_constants.a` for all components.
    OneMinusConstantAlpha = ONE_MINUS_CONSTANT_ALPHA,

    /// For the alpha component, always `1.0`. For the color components,
    /// `min(source.a, 1.0 - destination.a)` for all components.
    SrcAlphaSaturate = SRC_ALPHA_SATURATE,

    /// `source1` component-wise.
    Src1Color = SRC1_COLOR,

    /// `1.0 - source1` component-wise.
    OneMinusSrc1Color = ONE_MINUS_SRC1_COLOR,

    /// `source1.a` for all components.
    Src1Alpha = SRC1_ALPHA,

    /// `1.0 - source1.a` for all components.
    OneMinusSrc1Alpha = ONE_MINUS_SRC1_ALPHA,
}

vulkan_enum! {
    /// The arithmetic operation that is applied between the `source` and `destination` component
    /// values, after the appropriate `BlendFactor` is applied to both.
    BlendOp = BlendOp(i32);

    /// `source + destination`.
    Add = ADD,

    /// `source - destination`.
    Subtract = SUBTRACT,

    /// `destination - source`.
    ReverseSubtract = REVERSE_SUBTRACT,

    /// `min(source, destination)`.
    Min = MIN,

    /// `max(source, destination)`.
    Max = MAX,
}

vulkan_enum! {
    /// Which logical operation to apply to the output values.
    ///
    /// The operation is applied individually for each channel (red, green, blue and alpha).
    ///
    /// Only relevant for integer or unsigned attachments.
    ///
    /// Also note that some implementations don't support logic operations.
    LogicOp = LogicOp(i32);

    /// Returns `0`.
    Clear = CLEAR,

    /// Returns `source & destination`.
    And = AND,

    /// Returns `source & !destination`.
    AndReverse = AND_REVERSE,

    /// Returns `source`.
    Copy = COPY,

    /// Returns `!source & destination`.
    AndInverted = AND_INVERTED,

    /// Returns `destination`.
    Noop = NO_OP,

    /// Returns `source ^ destination`.
    Xor = XOR,

    /// Returns `source | destination`.
    Or = OR,

    /// Returns `!(source | destination)`.
    Nor = NOR,

    /// Returns `!(source ^ destination)`.
    Equivalent = EQUIVALENT,

    /// Returns `!destination`.
    Invert = INVERT,

    /// Returns `source | !destination`.
    OrReverse = OR_REVERSE,

    /// Returns `!source`.
    CopyInverted = COPY_INVERTED,

    /// Returns `!source | destination`.
    OrInverted = OR_INVERTED,

    /// Returns `!(source & destination)`.
    Nand = NAND,

    /// Returns `!0` (all bits set to 1).
    Set = SET,
}

impl Default for LogicOp {
    #[inline]
    fn default() -> LogicOp {
        LogicOp::Noop
    }
}

vulkan_bitflags! {
    /// A mask specifying color components that can be written to a framebuffer attachment.
    ColorComponents = ColorComponentFlags(u32);

    /// The red component.
    R = R,

    /// The green component.
    G = G,

    /// The blue component.
    B = B,

    /// The alpha component.
    A = A,
}
