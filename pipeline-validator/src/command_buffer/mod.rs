//! Checks that run when a draw command is recorded.
//!
//! A pipeline that was valid when it was created can still be unusable with the render target
//! that is active when it is bound for drawing. [`validate_draw`] compares a bound pipeline with
//! a [`RenderTargetContext`], which describes the render pass instance that a draw command is
//! recorded in.

pub use self::draw::{validate_draw, VUIDType};
use crate::image::ImageLayout;
use ash::vk;

mod draw;

/// The render pass instance that a draw command is recorded in.
#[derive(Clone, Debug)]
pub enum RenderTargetContext {
    /// The render pass instance was begun with `vkCmdBeginRenderPass`.
    BeginRenderPass {
        /// The render pass of the instance.
        render_pass: vk::RenderPass,

        /// The index of the current subpass.
        subpass: u32,
    },

    /// The render pass instance was begun with `vkCmdBeginRendering`.
    BeginRendering(RenderingInfo),
}

impl From<RenderingInfo> for RenderTargetContext {
    #[inline]
    fn from(val: RenderingInfo) -> Self {
        Self::BeginRendering(val)
    }
}

/// The parameters of a render pass instance begun with `vkCmdBeginRendering`.
#[derive(Clone, Debug)]
pub struct RenderingInfo {
    /// If not `0`, multiview rendering is enabled for the views in the mask.
    ///
    /// The default value is `0`.
    pub view_mask: u32,

    /// The color attachments. `None` marks an unused slot.
    ///
    /// The default value is empty.
    pub color_attachments: Vec<Option<RenderingAttachmentInfo>>,

    /// The depth attachment.
    ///
    /// The default value is `None`.
    pub depth_attachment: Option<RenderingAttachmentInfo>,

    /// The stencil attachment.
    ///
    /// The default value is `None`.
    pub stencil_attachment: Option<RenderingAttachmentInfo>,

    pub _ne: crate::NonExhaustive,
}

impl Default for RenderingInfo {
    #[inline]
    fn default() -> Self {
        Self {
            view_mask: 0,
            color_attachments: Vec::new(),
            depth_attachment: None,
            stencil_attachment: None,
            _ne: crate::NonExhaustive(()),
        }
    }
}

/// An attachment of a render pass instance begun with `vkCmdBeginRendering`.
#[derive(Clone, Debug)]
pub struct RenderingAttachmentInfo {
    /// The image view used as the attachment.
    ///
    /// A null handle means that the slot has no attachment, the same as leaving it `None` in
    /// [`RenderingInfo`].
    pub image_view: vk::ImageView,

    /// The layout that `image_view` is in during rendering.
    ///
    /// The default value is [`ImageLayout::ColorAttachmentOptimal`].
    pub image_layout: ImageLayout,

    pub _ne: crate::NonExhaustive,
}

impl RenderingAttachmentInfo {
    /// Returns a `RenderingAttachmentInfo` with the specified `image_view`.
    #[inline]
    pub fn new(image_view: vk::ImageView) -> Self {
        Self {
            image_view,
            image_layout: ImageLayout::ColorAttachmentOptimal,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Returns a `RenderingAttachmentInfo` with the specified `image_view` and `image_layout`.
    #[inline]
    pub fn with_layout(image_view: vk::ImageView, image_layout: ImageLayout) -> Self {
        Self {
            image_layout,
            ..Self::new(image_view)
        }
    }
}
