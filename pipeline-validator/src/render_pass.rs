//! Snapshots of render passes and their subpasses.
//!
//! Only what pipeline and draw validation looks at is kept: attachment formats and sample counts,
//! the attachment references of each subpass with their layouts, and view masks.

use crate::{
    format::Format,
    image::{ImageAspects, ImageLayout, SampleCount},
    ValidationError,
};
use std::sync::Arc;

/// A snapshot of a render pass.
#[derive(Debug)]
pub struct RenderPass {
    attachments: Vec<AttachmentDescription>,
    subpasses: Vec<SubpassDescription>,
}

impl RenderPass {
    /// Creates a new `RenderPass`, checking that every attachment reference is in range.
    pub fn new(create_info: RenderPassCreateInfo) -> Result<Arc<RenderPass>, Box<ValidationError>> {
        create_info.validate()?;

        Ok(Self::new_unchecked(create_info))
    }

    pub fn new_unchecked(create_info: RenderPassCreateInfo) -> Arc<RenderPass> {
        let RenderPassCreateInfo {
            attachments,
            subpasses,
            _ne: _,
        } = create_info;

        Arc::new(RenderPass {
            attachments,
            subpasses,
        })
    }

    #[inline]
    pub fn attachments(&self) -> &[AttachmentDescription] {
        &self.attachments
    }

    #[inline]
    pub fn subpasses(&self) -> &[SubpassDescription] {
        &self.subpasses
    }

    /// Returns whether `self` is compatible with `other`, following the render pass
    /// compatibility rules of Vulkan: the same number of subpasses, and for each subpass,
    /// corresponding attachment references that are either both unused or refer to attachments
    /// with the same format and sample count.
    pub fn is_compatible_with(&self, other: &RenderPass) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        if self.subpasses.len() != other.subpasses.len() {
            return false;
        }

        self.subpasses
            .iter()
            .zip(&other.subpasses)
            .all(|(mine, theirs)| {
                mine.view_mask == theirs.view_mask
                    && self.references_compatible(
                        other,
                        &mine.input_attachments,
                        &theirs.input_attachments,
                    )
                    && self.references_compatible(
                        other,
                        &mine.color_attachments,
                        &theirs.color_attachments,
                    )
                    && self.reference_compatible(
                        other,
                        mine.depth_stencil_attachment.as_ref(),
                        theirs.depth_stencil_attachment.as_ref(),
                    )
            })
    }

    fn references_compatible(
        &self,
        other: &RenderPass,
        mine: &[Option<AttachmentReference>],
        theirs: &[Option<AttachmentReference>],
    ) -> bool {
        (0..mine.len().max(theirs.len())).all(|index| {
            self.reference_compatible(
                other,
                mine.get(index).and_then(Option::as_ref),
                theirs.get(index).and_then(Option::as_ref),
            )
        })
    }

    fn reference_compatible(
        &self,
        other: &RenderPass,
        mine: Option<&AttachmentReference>,
        theirs: Option<&AttachmentReference>,
    ) -> bool {
        let mine = mine.and_then(|r| self.attachments.get(r.attachment as usize));
        let theirs = theirs.and_then(|r| other.attachments.get(r.attachment as usize));

        match (mine, theirs) {
            (None, None) => true,
            (Some(a), Some(b)) => a.format == b.format && a.samples == b.samples,
            _ => false,
        }
    }
}

/// Parameters to create a new `RenderPass`.
#[derive(Clone, Debug)]
pub struct RenderPassCreateInfo {
    /// The attachments available to the render pass.
    ///
    /// The default value is empty.
    pub attachments: Vec<AttachmentDescription>,

    /// The subpasses of the render pass.
    ///
    /// The default value is empty.
    pub subpasses: Vec<SubpassDescription>,

    pub _ne: crate::NonExhaustive,
}

impl Default for RenderPassCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            attachments: Vec::new(),
            subpasses: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl RenderPassCreateInfo {
    fn validate(&self) -> Result<(), Box<ValidationError>> {
        let attachment_count = self.attachments.len() as u32;

        for (subpass_index, subpass) in self.subpasses.iter().enumerate() {
            let references = subpass
                .input_attachments
                .iter()
                .chain(&subpass.color_attachments)
                .flatten()
                .chain(subpass.depth_stencil_attachment.as_ref());

            for reference in references {
                if reference.attachment >= attachment_count {
                    return Err(Box::new(ValidationError {
                        context: format!("subpasses[{}]", subpass_index).into(),
                        problem: format!(
                            "refers to attachment {}, which is not less than the number of \
                            attachments",
                            reference.attachment,
                        )
                        .into(),
                        vuids: &["VUID-VkRenderPassCreateInfo2-attachment-03051"],
                        ..Default::default()
                    }));
                }
            }
        }

        Ok(())
    }
}

/// Describes an attachment that will be used in a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentDescription {
    /// The format of the image that is going to be bound.
    pub format: Format,

    /// The number of samples of the image that is going to be bound.
    pub samples: SampleCount,

    pub _ne: crate::NonExhaustive,
}

impl AttachmentDescription {
    #[inline]
    pub fn new(format: Format, samples: SampleCount) -> Self {
        Self {
            format,
            samples,
            _ne: crate::NonExhaustive(()),
        }
    }
}

/// Describes one of the subpasses of a render pass.
#[derive(Clone, Debug, Default)]
pub struct SubpassDescription {
    /// If not `0`, enables multiview rendering for the views in the mask.
    pub view_mask: u32,

    pub input_attachments: Vec<Option<AttachmentReference>>,

    /// The color attachments of the subpass. `None` marks an unused slot.
    pub color_attachments: Vec<Option<AttachmentReference>>,

    pub depth_stencil_attachment: Option<AttachmentReference>,
}

/// A reference in a subpass description to a particular attachment of the render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachmentReference {
    /// The number of the attachment being referred to.
    pub attachment: u32,

    /// The image layout that the attachment is in during the subpass.
    pub layout: ImageLayout,

    /// For depth/stencil attachments, overrides `layout` for the stencil aspect.
    pub stencil_layout: Option<ImageLayout>,
}

impl AttachmentReference {
    #[inline]
    pub fn new(attachment: u32, layout: ImageLayout) -> Self {
        Self {
            attachment,
            layout,
            stencil_layout: None,
        }
    }

    /// Returns the layout of the stencil aspect.
    #[inline]
    pub fn stencil_layout(&self) -> ImageLayout {
        self.stencil_layout.unwrap_or(self.layout)
    }
}

/// A subpass of a render pass.
#[derive(Clone, Debug)]
pub struct Subpass {
    render_pass: Arc<RenderPass>,
    subpass_id: u32,
}

impl Subpass {
    /// Returns a handle to the `id`th subpass of `render_pass`, or `None` if out of range.
    #[inline]
    pub fn from(render_pass: Arc<RenderPass>, id: u32) -> Option<Subpass> {
        ((id as usize) < render_pass.subpasses.len()).then_some(Subpass {
            render_pass,
            subpass_id: id,
        })
    }

    #[inline]
    pub fn render_pass(&self) -> &Arc<RenderPass> {
        &self.render_pass
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.subpass_id
    }

    /// Returns the description of this subpass.
    #[inline]
    pub fn subpass_desc(&self) -> &SubpassDescription {
        &self.render_pass.subpasses[self.subpass_id as usize]
    }

    /// Returns the number of color attachment slots in this subpass, used or not.
    #[inline]
    pub fn num_color_attachments(&self) -> u32 {
        self.subpass_desc().color_attachments.len() as u32
    }

    /// Returns the attachment descriptions of the color attachment slots. Unused slots are
    /// `None`.
    pub fn color_attachments(&self) -> impl Iterator<Item = Option<&AttachmentDescription>> {
        self.subpass_desc()
            .color_attachments
            .iter()
            .map(|reference| self.attachment(reference.as_ref()))
    }

    /// Returns the reference and description of the depth/stencil attachment, if any.
    pub fn depth_stencil_attachment(
        &self,
    ) -> Option<(&AttachmentReference, &AttachmentDescription)> {
        let reference = self.subpass_desc().depth_stencil_attachment.as_ref()?;
        let description = self.attachment(Some(reference))?;

        Some((reference, description))
    }

    /// Returns whether the subpass has a depth/stencil attachment with a depth aspect.
    pub fn has_depth(&self) -> bool {
        self.depth_stencil_attachment()
            .is_some_and(|(_, desc)| desc.format.aspects().intersects(ImageAspects::DEPTH))
    }

    /// Returns whether the subpass has a depth/stencil attachment with a stencil aspect.
    pub fn has_stencil(&self) -> bool {
        self.depth_stencil_attachment()
            .is_some_and(|(_, desc)| desc.format.aspects().intersects(ImageAspects::STENCIL))
    }

    /// Returns the sample count of the color and depth/stencil attachments, if they have one
    /// in common. Returns `None` if the subpass has no such attachments.
    pub fn num_samples(&self) -> Option<SampleCount> {
        self.color_attachments()
            .flatten()
            .chain(self.depth_stencil_attachment().map(|(_, desc)| desc))
            .map(|desc| desc.samples)
            .next()
    }

    fn attachment(&self, reference: Option<&AttachmentReference>) -> Option<&AttachmentDescription> {
        self.render_pass
            .attachments
            .get(reference?.attachment as usize)
    }
}

impl PartialEq for Subpass {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.render_pass, &other.render_pass) && self.subpass_id == other.subpass_id
    }
}
