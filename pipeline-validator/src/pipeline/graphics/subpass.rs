//! Configures the render target that a graphics pipeline renders to.
//!
//! A pipeline is either created for a specific subpass of a render pass, or for dynamic
//! rendering, in which case the formats of the attachments are declared up front.

use crate::{
    device::DeviceCapabilities,
    format::{Format, FormatFeatures},
    image::ImageAspects,
    render_pass::Subpass,
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};

/// Selects the type of render target that a graphics pipeline is created for.
#[derive(Clone, Debug)]
pub enum PipelineSubpassType {
    /// The pipeline will be used with a render pass that begins with `vkCmdBeginRenderPass`.
    BeginRenderPass(Subpass),

    /// The pipeline will be used with a render pass that begins with `vkCmdBeginRendering`.
    BeginRendering(PipelineRenderingCreateInfo),
}

impl PipelineSubpassType {
    /// Returns the view mask of the render target.
    #[inline]
    pub fn view_mask(&self) -> u32 {
        match self {
            PipelineSubpassType::BeginRenderPass(subpass) => subpass.subpass_desc().view_mask,
            PipelineSubpassType::BeginRendering(rendering_info) => rendering_info.view_mask,
        }
    }

    /// Returns the number of color attachment slots, used or not.
    #[inline]
    pub fn num_color_attachments(&self) -> u32 {
        match self {
            PipelineSubpassType::BeginRenderPass(subpass) => subpass.num_color_attachments(),
            PipelineSubpassType::BeginRendering(rendering_info) => {
                rendering_info.color_attachment_formats.len() as u32
            }
        }
    }

    /// Returns the format of each color attachment slot. Unused slots are `None`.
    pub fn color_attachment_formats(&self) -> Vec<Option<Format>> {
        match self {
            PipelineSubpassType::BeginRenderPass(subpass) => subpass
                .color_attachments()
                .map(|desc| desc.map(|desc| desc.format))
                .collect(),
            PipelineSubpassType::BeginRendering(rendering_info) => {
                rendering_info.color_attachment_formats.clone()
            }
        }
    }

    /// Returns whether the render target has an attachment with a depth aspect.
    #[inline]
    pub fn has_depth(&self) -> bool {
        match self {
            PipelineSubpassType::BeginRenderPass(subpass) => subpass.has_depth(),
            PipelineSubpassType::BeginRendering(rendering_info) => {
                rendering_info.depth_attachment_format.is_some()
            }
        }
    }

    /// Returns whether the render target has an attachment with a stencil aspect.
    #[inline]
    pub fn has_stencil(&self) -> bool {
        match self {
            PipelineSubpassType::BeginRenderPass(subpass) => subpass.has_stencil(),
            PipelineSubpassType::BeginRendering(rendering_info) => {
                rendering_info.stencil_attachment_format.is_some()
            }
        }
    }

    /// Returns whether `self` and `other` describe render targets that a pipeline could be
    /// linked across: the same kind, and for render passes, compatible ones and the same
    /// subpass index.
    pub(crate) fn is_compatible_with(&self, other: &PipelineSubpassType) -> bool {
        match (self, other) {
            (
                PipelineSubpassType::BeginRenderPass(a),
                PipelineSubpassType::BeginRenderPass(b),
            ) => a.index() == b.index() && a.render_pass().is_compatible_with(b.render_pass()),
            (
                PipelineSubpassType::BeginRendering(a),
                PipelineSubpassType::BeginRendering(b),
            ) => a == b,
            _ => false,
        }
    }
}

impl From<Subpass> for PipelineSubpassType {
    #[inline]
    fn from(val: Subpass) -> Self {
        Self::BeginRenderPass(val)
    }
}

impl From<PipelineRenderingCreateInfo> for PipelineSubpassType {
    #[inline]
    fn from(val: PipelineRenderingCreateInfo) -> Self {
        Self::BeginRendering(val)
    }
}

/// The dynamic rendering parameters to create a graphics pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineRenderingCreateInfo {
    /// If not `0`, indicates that multiview rendering will be enabled, and specifies the view
    /// indices that are rendered to. The value is a bitmask, so that that for example `0b11`
    /// will draw to the first two views and `0b101` will draw to the first and third view.
    ///
    /// If set to a nonzero value, the [`multiview`](crate::device::DeviceFeatures::multiview)
    /// feature must be enabled on the device.
    ///
    /// The default value is `0`.
    pub view_mask: u32,

    /// The formats of the color attachments that will be used during rendering.
    ///
    /// If an element is `None`, it indicates that the attachment will not be used.
    ///
    /// The default value is empty.
    pub color_attachment_formats: Vec<Option<Format>>,

    /// The format of the depth attachment that will be used during rendering.
    ///
    /// If set to `None`, it indicates that no depth attachment will be used.
    ///
    /// The default value is `None`.
    pub depth_attachment_format: Option<Format>,

    /// The format of the stencil attachment that will be used during rendering.
    ///
    /// If set to `None`, it indicates that no stencil attachment will be used.
    ///
    /// The default value is `None`.
    pub stencil_attachment_format: Option<Format>,

    pub _ne: crate::NonExhaustive,
}

impl Default for PipelineRenderingCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            view_mask: 0,
            color_attachment_formats: Vec::new(),
            depth_attachment_format: None,
            stencil_attachment_format: None,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl PipelineRenderingCreateInfo {
    /// Returns the rendering info that matches the attachments of `subpass`.
    pub fn from_subpass(subpass: &Subpass) -> Self {
        let depth_stencil_format = subpass
            .depth_stencil_attachment()
            .map(|(_, desc)| desc.format);

        Self {
            view_mask: subpass.subpass_desc().view_mask,
            color_attachment_formats: subpass
                .color_attachments()
                .map(|desc| desc.map(|desc| desc.format))
                .collect(),
            depth_attachment_format: depth_stencil_format
                .filter(|format| format.aspects().intersects(ImageAspects::DEPTH)),
            stencil_attachment_format: depth_stencil_format
                .filter(|format| format.aspects().intersects(ImageAspects::STENCIL)),
            _ne: crate::NonExhaustive(()),
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            view_mask,
            ref color_attachment_formats,
            depth_attachment_format,
            stencil_attachment_format,
            _ne: _,
        } = self;

        let properties = device.properties();

        if view_mask != 0 && !device.enabled_features().multiview {
            report.push(Box::new(ValidationError {
                context: "view_mask".into(),
                problem: "is not zero".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multiview",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-multiview-06577"],
                kind: DefectKind::Capability,
            }));
        }

        let view_count = u32::BITS - view_mask.leading_zeros();

        if view_count > properties.max_multiview_view_count {
            report.push(Box::new(ValidationError {
                context: "view_mask".into(),
                problem: "the number of views exceeds the `max_multiview_view_count` limit"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06578"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        if color_attachment_formats.len() > properties.max_color_attachments as usize {
            report.push(Box::new(ValidationError {
                context: "color_attachment_formats".into(),
                problem: "the length exceeds the `max_color_attachments` limit".into(),
                vuids: &["VUID-VkPipelineRenderingCreateInfo-colorAttachmentCount-09533"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        for (attachment_index, format) in color_attachment_formats
            .iter()
            .enumerate()
            .flat_map(|(i, f)| f.map(|f| (i, f)))
        {
            if !device
                .format_features(format)
                .intersects(FormatFeatures::COLOR_ATTACHMENT)
            {
                report.push(Box::new(ValidationError {
                    context: format!("color_attachment_formats[{}]", attachment_index).into(),
                    problem: "format features do not contain \
                        `FormatFeatures::COLOR_ATTACHMENT`"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06582"],
                    kind: DefectKind::Capability,
                    ..Default::default()
                }));
            }
        }

        if let Some(format) = depth_attachment_format {
            if !device
                .format_features(format)
                .intersects(FormatFeatures::DEPTH_STENCIL_ATTACHMENT)
            {
                report.push(Box::new(ValidationError {
                    context: "depth_attachment_format".into(),
                    problem: "format features do not contain \
                        `FormatFeatures::DEPTH_STENCIL_ATTACHMENT`"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06585"],
                    kind: DefectKind::Capability,
                    ..Default::default()
                }));
            }

            if !format.aspects().intersects(ImageAspects::DEPTH) {
                report.push(Box::new(ValidationError {
                    context: "depth_attachment_format".into(),
                    problem: "does not have a depth aspect".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06587"],
                    ..Default::default()
                }));
            }
        }

        if let Some(format) = stencil_attachment_format {
            if !device
                .format_features(format)
                .intersects(FormatFeatures::DEPTH_STENCIL_ATTACHMENT)
            {
                report.push(Box::new(ValidationError {
                    context: "stencil_attachment_format".into(),
                    problem: "format features do not contain \
                        `FormatFeatures::DEPTH_STENCIL_ATTACHMENT`"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06586"],
                    kind: DefectKind::Capability,
                    ..Default::default()
                }));
            }

            if !format.aspects().intersects(ImageAspects::STENCIL) {
                report.push(Box::new(ValidationError {
                    context: "stencil_attachment_format".into(),
                    problem: "does not have a stencil aspect".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06588"],
                    ..Default::default()
                }));
            }
        }

        if let (Some(depth_format), Some(stencil_format)) =
            (depth_attachment_format, stencil_attachment_format)
        {
            if depth_format != stencil_format {
                report.push(Box::new(ValidationError {
                    problem: "`depth_attachment_format` and `stencil_attachment_format` are both \
                        `Some`, but are not equal"
                        .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-renderPass-06589"],
                    ..Default::default()
                }));
            }
        }
    }
}
