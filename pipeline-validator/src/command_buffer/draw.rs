use super::{RenderTargetContext, RenderingAttachmentInfo, RenderingInfo};
use crate::{
    device::DeviceCapabilities,
    format::Format,
    image::{ImageAspects, ImageLayout, ImageView, SampleCount},
    object_table::ObjectTable,
    pipeline::{
        graphics::{
            multisample::AttachmentSampleCountInfo,
            subpass::{PipelineRenderingCreateInfo, PipelineSubpassType},
            GraphicsPipeline,
        },
        DynamicState,
    },
    render_pass::{RenderPass, Subpass},
    DefectKind, ValidationError, ValidationReport,
};
use ash::vk::{self, Handle};
use std::sync::Arc;

macro_rules! vuids {
    ($vuid_type:ident, $($id:literal),+ $(,)?) => {
        match $vuid_type {
            VUIDType::Draw => &[$(concat!("VUID-vkCmdDraw-", $id)),+],
            VUIDType::DrawIndirect => &[$(concat!("VUID-vkCmdDrawIndirect-", $id)),+],
            VUIDType::DrawIndirectCount => &[$(concat!("VUID-vkCmdDrawIndirectCount-", $id)),+],
            VUIDType::DrawIndexed => &[$(concat!("VUID-vkCmdDrawIndexed-", $id)),+],
            VUIDType::DrawIndexedIndirect => &[$(concat!("VUID-vkCmdDrawIndexedIndirect-", $id)),+],
            VUIDType::DrawIndexedIndirectCount => &[$(concat!("VUID-vkCmdDrawIndexedIndirectCount-", $id)),+],
            VUIDType::DrawMeshTasks => &[$(concat!("VUID-vkCmdDrawMeshTasksEXT-", $id)),+],
            VUIDType::DrawMeshTasksIndirect => &[$(concat!("VUID-vkCmdDrawMeshTasksIndirectEXT-", $id)),+],
            VUIDType::DrawMeshTasksIndirectCount => &[$(concat!("VUID-vkCmdDrawMeshTasksIndirectCountEXT-", $id)),+],
        }
    };
}

/// The draw command that is being recorded. Selects the command name in reported VUIDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VUIDType {
    Draw,
    DrawIndirect,
    DrawIndirectCount,
    DrawIndexed,
    DrawIndexedIndirect,
    DrawIndexedIndirectCount,
    DrawMeshTasks,
    DrawMeshTasksIndirect,
    DrawMeshTasksIndirectCount,
}

/// Checks that `pipeline` can be used for a draw command recorded in `render_target`.
///
/// Every check runs regardless of the outcome of the others. The only exceptions are handles
/// in `render_target` that do not resolve: the checks that need the object are skipped, and a
/// single error is reported for the handle instead.
pub fn validate_draw(
    device: &DeviceCapabilities,
    objects: &impl ObjectTable,
    pipeline: &GraphicsPipeline,
    render_target: &RenderTargetContext,
    vuid_type: VUIDType,
) -> ValidationReport {
    log::trace!("validating {:?} against the current render pass instance", vuid_type);

    let mut report = ValidationReport::new();

    if pipeline.is_library() {
        report.push(Box::new(ValidationError {
            context: "pipeline".into(),
            problem: "was created with `PipelineCreateFlags::LIBRARY`, and cannot be bound for \
                drawing"
                .into(),
            vuids: &["VUID-vkCmdBindPipeline-pipeline-03382"],
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));

        return report;
    }

    // A complete pipeline always has a render target, unless its render pass did not resolve
    // at creation time.
    let Some(pipeline_subpass) = pipeline.subpass() else {
        return report;
    };

    report.scoped("render_target", |report| match render_target {
        &RenderTargetContext::BeginRenderPass {
            render_pass,
            subpass,
        } => validate_render_pass(
            objects,
            pipeline,
            pipeline_subpass,
            render_pass,
            subpass,
            vuid_type,
            report,
        ),
        RenderTargetContext::BeginRendering(rendering_info) => validate_rendering(
            device,
            objects,
            pipeline,
            pipeline_subpass,
            rendering_info,
            vuid_type,
            report,
        ),
    });

    report
}

fn validate_render_pass(
    objects: &impl ObjectTable,
    pipeline: &GraphicsPipeline,
    pipeline_subpass: &PipelineSubpassType,
    render_pass: vk::RenderPass,
    subpass: u32,
    vuid_type: VUIDType,
    report: &mut ValidationReport,
) {
    let Some(render_pass) = objects.get::<RenderPass>(render_pass) else {
        report.push(Box::new(ValidationError {
            context: "render_pass".into(),
            problem: "is not a known render pass".into(),
            vuids: &["VUID-VkRenderPassBeginInfo-renderPass-parameter"],
            kind: DefectKind::Resolution,
            ..Default::default()
        }));

        return;
    };

    match pipeline_subpass {
        PipelineSubpassType::BeginRenderPass(pipeline_subpass) => {
            if !pipeline_subpass
                .render_pass()
                .is_compatible_with(&render_pass)
            {
                report.push(Box::new(ValidationError {
                    context: "render_pass".into(),
                    problem: "is not compatible with the render pass that the bound pipeline \
                        was created with"
                        .into(),
                    vuids: vuids!(vuid_type, "renderPass-02684"),
                    kind: DefectKind::CrossEntity,
                    ..Default::default()
                }));
            }

            if pipeline_subpass.index() != subpass {
                report.push(Box::new(ValidationError {
                    context: "subpass".into(),
                    problem: format!(
                        "is {}, but the bound pipeline was created for subpass {}",
                        subpass,
                        pipeline_subpass.index(),
                    )
                    .into(),
                    vuids: vuids!(vuid_type, "subpass-02685"),
                    kind: DefectKind::CrossEntity,
                    ..Default::default()
                }));
            }
        }
        PipelineSubpassType::BeginRendering(_) => {
            report.push(Box::new(ValidationError {
                context: "render_pass".into(),
                problem: "is not null, but the bound pipeline was created for dynamic rendering"
                    .into(),
                vuids: vuids!(vuid_type, "renderPass-02684"),
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }
    }

    // The layouts are those of the subpass that is current, whatever the pipeline was
    // created for.
    let Some(current_subpass) = Subpass::from(render_pass, subpass) else {
        return;
    };

    if let Some((reference, description)) = current_subpass.depth_stencil_attachment() {
        let aspects = description.format.aspects();

        if aspects.intersects(ImageAspects::DEPTH) {
            validate_depth_read_only(
                pipeline,
                reference.layout,
                "depth_stencil_attachment",
                vuid_type,
                report,
            );
        }

        if aspects.intersects(ImageAspects::STENCIL) {
            validate_stencil_read_only(
                pipeline,
                reference.stencil_layout(),
                "depth_stencil_attachment",
                vuid_type,
                report,
            );
        }
    }
}

fn validate_rendering(
    device: &DeviceCapabilities,
    objects: &impl ObjectTable,
    pipeline: &GraphicsPipeline,
    pipeline_subpass: &PipelineSubpassType,
    rendering_info: &RenderingInfo,
    vuid_type: VUIDType,
    report: &mut ValidationReport,
) {
    let &RenderingInfo {
        view_mask,
        ref color_attachments,
        ref depth_attachment,
        ref stencil_attachment,
        _ne: _,
    } = rendering_info;

    let pipeline_rendering_info = match pipeline_subpass {
        PipelineSubpassType::BeginRendering(pipeline_rendering_info) => pipeline_rendering_info,
        PipelineSubpassType::BeginRenderPass(_) => {
            report.push(Box::new(ValidationError {
                problem: "the current render pass instance was begun with \
                    `vkCmdBeginRendering`, but the bound pipeline was created with a render pass"
                    .into(),
                vuids: vuids!(vuid_type, "renderPass-06198"),
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));

            return;
        }
    };

    let &PipelineRenderingCreateInfo {
        view_mask: pipeline_view_mask,
        color_attachment_formats: ref pipeline_color_formats,
        depth_attachment_format: pipeline_depth_format,
        stencil_attachment_format: pipeline_stencil_format,
        _ne: _,
    } = pipeline_rendering_info;

    let unused_attachments = device.enabled_features().dynamic_rendering_unused_attachments;
    let samples = SampleRule::new(device, pipeline);

    if view_mask != pipeline_view_mask {
        report.push(Box::new(ValidationError {
            context: "view_mask".into(),
            problem: format!(
                "is {:#b}, but the bound pipeline was created with a view mask of {:#b}",
                view_mask, pipeline_view_mask,
            )
            .into(),
            vuids: vuids!(vuid_type, "viewMask-06178"),
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));
    }

    let color_slots: Vec<_> = color_attachments
        .iter()
        .enumerate()
        .map(|(index, attachment)| {
            AttachmentSlot::resolve(
                objects,
                attachment.as_ref(),
                || format!("color_attachments[{}].image_view", index),
                report,
            )
        })
        .collect();

    if !unused_attachments && color_attachments.len() != pipeline_color_formats.len() {
        report.push(Box::new(ValidationError {
            context: "color_attachments".into(),
            problem: format!(
                "has {} elements, but the bound pipeline was created with {} color attachment \
                formats",
                color_attachments.len(),
                pipeline_color_formats.len(),
            )
            .into(),
            vuids: vuids!(vuid_type, "colorAttachmentCount-06179"),
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));
    }

    for (index, (slot, &pipeline_format)) in
        color_slots.iter().zip(pipeline_color_formats).enumerate()
    {
        let context = || format!("color_attachments[{}].image_view", index);

        slot.validate_format(
            pipeline_format,
            unused_attachments,
            context,
            [
                vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08910"),
                vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08911"),
                vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08912"),
            ],
            report,
        );

        if let AttachmentSlot::Attached(view) = slot {
            samples.validate(
                view,
                samples.color_metadata(index),
                context,
                [
                    vuids!(vuid_type, "colorAttachmentCount-06185"),
                    vuids!(vuid_type, "colorAttachmentCount-06188"),
                ],
                report,
            );
        }
    }

    let depth_slot = AttachmentSlot::resolve(
        objects,
        depth_attachment.as_ref(),
        || "depth_attachment.image_view".to_owned(),
        report,
    );

    depth_slot.validate_format(
        pipeline_depth_format,
        unused_attachments,
        || "depth_attachment.image_view".to_owned(),
        [
            vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08914"),
            vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08915"),
            vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08916"),
        ],
        report,
    );

    if let (AttachmentSlot::Attached(view), Some(attachment)) = (&depth_slot, depth_attachment) {
        samples.validate(
            view,
            samples.depth_stencil_metadata(),
            || "depth_attachment.image_view".to_owned(),
            [
                vuids!(vuid_type, "pDepthAttachment-06186"),
                vuids!(vuid_type, "pDepthAttachment-06189"),
            ],
            report,
        );

        validate_depth_read_only(
            pipeline,
            attachment.image_layout,
            "depth_attachment.image_layout",
            vuid_type,
            report,
        );
    }

    let stencil_slot = AttachmentSlot::resolve(
        objects,
        stencil_attachment.as_ref(),
        || "stencil_attachment.image_view".to_owned(),
        report,
    );

    stencil_slot.validate_format(
        pipeline_stencil_format,
        unused_attachments,
        || "stencil_attachment.image_view".to_owned(),
        [
            vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08917"),
            vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08918"),
            vuids!(vuid_type, "dynamicRenderingUnusedAttachments-08919"),
        ],
        report,
    );

    if let (AttachmentSlot::Attached(view), Some(attachment)) =
        (&stencil_slot, stencil_attachment)
    {
        samples.validate(
            view,
            samples.depth_stencil_metadata(),
            || "stencil_attachment.image_view".to_owned(),
            [
                vuids!(vuid_type, "pStencilAttachment-06187"),
                vuids!(vuid_type, "pStencilAttachment-06190"),
            ],
            report,
        );

        validate_stencil_read_only(
            pipeline,
            attachment.image_layout,
            "stencil_attachment.image_layout",
            vuid_type,
            report,
        );
    }
}

/// An attachment slot of a dynamic rendering instance, with its image view resolved.
enum AttachmentSlot {
    /// The slot has no attachment, or the image view is null.
    Empty,
    Attached(Arc<ImageView>),
    /// The image view did not resolve. It has been reported already.
    Unresolved,
}

impl AttachmentSlot {
    fn resolve(
        objects: &impl ObjectTable,
        attachment: Option<&RenderingAttachmentInfo>,
        context: impl FnOnce() -> String,
        report: &mut ValidationReport,
    ) -> Self {
        let Some(attachment) = attachment.filter(|attachment| !attachment.image_view.is_null())
        else {
            return AttachmentSlot::Empty;
        };

        match objects.get::<ImageView>(attachment.image_view) {
            Some(view) => AttachmentSlot::Attached(view),
            None => {
                report.push(Box::new(ValidationError {
                    context: context().into(),
                    problem: "is not a known image view".into(),
                    vuids: &["VUID-VkRenderingAttachmentInfo-imageView-parameter"],
                    kind: DefectKind::Resolution,
                    ..Default::default()
                }));

                AttachmentSlot::Unresolved
            }
        }
    }

    /// Compares the format of the slot with the format that the pipeline was created with.
    ///
    /// `vuids` are for an unequal format, a conflicting format with unused attachments
    /// allowed, and a missing image view where the pipeline expects a format.
    fn validate_format(
        &self,
        pipeline_format: Option<Format>,
        unused_attachments: bool,
        context: impl FnOnce() -> String,
        vuids: [&'static [&'static str]; 3],
        report: &mut ValidationReport,
    ) {
        let (problem, vuids) = match (self, pipeline_format) {
            (AttachmentSlot::Attached(view), Some(pipeline_format))
                if view.format != pipeline_format =>
            {
                (
                    format!(
                        "has the format {:?}, but the bound pipeline was created with the \
                        format {:?} for this attachment",
                        view.format, pipeline_format,
                    ),
                    if unused_attachments { vuids[1] } else { vuids[0] },
                )
            }
            (AttachmentSlot::Attached(view), None) if !unused_attachments => (
                format!(
                    "has the format {:?}, but the bound pipeline was created without a format \
                    for this attachment",
                    view.format,
                ),
                vuids[0],
            ),
            (AttachmentSlot::Empty, Some(pipeline_format)) if !unused_attachments => (
                format!(
                    "is null, but the bound pipeline was created with the format {:?} for this \
                    attachment",
                    pipeline_format,
                ),
                vuids[2],
            ),
            _ => return,
        };

        report.push(Box::new(ValidationError {
            context: context().into(),
            problem: problem.into(),
            vuids,
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));
    }
}

/// What the sample counts of attachments are compared against.
struct SampleRule<'a> {
    /// `None` if the rasterization sample count is dynamic or not known.
    rasterization_samples: Option<SampleCount>,
    metadata: Option<&'a AttachmentSampleCountInfo>,
}

impl<'a> SampleRule<'a> {
    fn new(device: &DeviceCapabilities, pipeline: &'a GraphicsPipeline) -> Self {
        let rasterization_samples = if pipeline
            .dynamic_state()
            .contains(DynamicState::RasterizationSamples)
        {
            None
        } else {
            pipeline
                .multisample_state()
                .map(|state| state.rasterization_samples)
        };

        let extensions = device.enabled_extensions();
        let metadata = pipeline.attachment_sample_count().filter(|_| {
            extensions.amd_mixed_attachment_samples || extensions.nv_framebuffer_mixed_samples
        });

        SampleRule {
            rasterization_samples,
            metadata,
        }
    }

    fn color_metadata(&self, index: usize) -> Option<Option<SampleCount>> {
        self.metadata
            .map(|metadata| metadata.color_attachment_sample_count(index))
    }

    fn depth_stencil_metadata(&self) -> Option<Option<SampleCount>> {
        self.metadata
            .map(|metadata| metadata.depth_stencil_attachment_sample_count())
    }

    /// `metadata` is `Some` when attachment sample count metadata applies, and then holds the
    /// count for this attachment, if there is one. `vuids` are for a mismatch with the
    /// rasterization sample count and with the metadata, respectively.
    fn validate(
        &self,
        view: &ImageView,
        metadata: Option<Option<SampleCount>>,
        context: impl FnOnce() -> String,
        vuids: [&'static [&'static str]; 2],
        report: &mut ValidationReport,
    ) {
        let Some(rasterization_samples) = self.rasterization_samples else {
            return;
        };

        let (expected, source, vuids) = match metadata {
            None => (rasterization_samples, "rasterization sample count", vuids[0]),
            Some(Some(expected)) => (expected, "attachment sample count", vuids[1]),
            Some(None) => return,
        };

        if view.samples != expected {
            report.push(Box::new(ValidationError {
                context: context().into(),
                problem: format!(
                    "has {:?} samples, but the {} of the bound pipeline is {:?}",
                    view.samples, source, expected,
                )
                .into(),
                vuids,
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }
    }
}

fn validate_depth_read_only(
    pipeline: &GraphicsPipeline,
    layout: ImageLayout,
    context: &'static str,
    vuid_type: VUIDType,
    report: &mut ValidationReport,
) {
    if !layout.is_depth_read_only()
        || pipeline
            .dynamic_state()
            .contains(DynamicState::DepthWriteEnable)
    {
        return;
    }

    if pipeline
        .depth_stencil_state()
        .is_some_and(|state| state.writes_depth())
    {
        report.push(Box::new(ValidationError {
            context: context.into(),
            problem: format!(
                "is {:?}, which is read-only for the depth aspect, but the bound pipeline \
                writes to depth",
                layout,
            )
            .into(),
            vuids: vuids!(vuid_type, "None-06886"),
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));
    }
}

fn validate_stencil_read_only(
    pipeline: &GraphicsPipeline,
    layout: ImageLayout,
    context: &'static str,
    vuid_type: VUIDType,
    report: &mut ValidationReport,
) {
    if !layout.is_stencil_read_only()
        || pipeline.dynamic_state().contains(DynamicState::StencilOp)
    {
        return;
    }

    if pipeline
        .depth_stencil_state()
        .is_some_and(|state| state.has_non_keep_stencil_ops())
    {
        report.push(Box::new(ValidationError {
            context: context.into(),
            problem: format!(
                "is {:?}, which is read-only for the stencil aspect, but the bound pipeline \
                has stencil operations other than `StencilOp::Keep`",
                layout,
            )
            .into(),
            vuids: vuids!(vuid_type, "None-06887"),
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));
    }
}
