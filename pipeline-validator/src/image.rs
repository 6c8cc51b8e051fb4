//! Image-related types: sample counts, layouts, aspects and image view snapshots.

use crate::{
    format::Format,
    macros::{vulkan_bitflags, vulkan_bitflags_enum, vulkan_enum},
};

vulkan_bitflags_enum! {
    /// A set of [`SampleCount`] values.
    SampleCounts impl {
        /// Returns the maximum sample count in `self`.
        #[inline]
        pub const fn max_count(self) -> SampleCount {
            if self.intersects(SampleCounts::SAMPLE_64) {
                SampleCount::Sample64
            } else if self.intersects(SampleCounts::SAMPLE_32) {
                SampleCount::Sample32
            } else if self.intersects(SampleCounts::SAMPLE_16) {
                SampleCount::Sample16
            } else if self.intersects(SampleCounts::SAMPLE_8) {
                SampleCount::Sample8
            } else if self.intersects(SampleCounts::SAMPLE_4) {
                SampleCount::Sample4
            } else if self.intersects(SampleCounts::SAMPLE_2) {
                SampleCount::Sample2
            } else {
                SampleCount::Sample1
            }
        }
    },

    /// The number of samples per texel of an image.
    SampleCount impl {
        /// Returns the number of samples as an integer.
        #[inline]
        pub const fn count(self) -> u32 {
            self as u32
        }
    },

    = SampleCountFlags(u32);

    /// 1 sample per texel.
    SAMPLE_1, Sample1 = TYPE_1,

    /// 2 samples per texel.
    SAMPLE_2, Sample2 = TYPE_2,

    /// 4 samples per texel.
    SAMPLE_4, Sample4 = TYPE_4,

    /// 8 samples per texel.
    SAMPLE_8, Sample8 = TYPE_8,

    /// 16 samples per texel.
    SAMPLE_16, Sample16 = TYPE_16,

    /// 32 samples per texel.
    SAMPLE_32, Sample32 = TYPE_32,

    /// 64 samples per texel.
    SAMPLE_64, Sample64 = TYPE_64,
}

impl Default for SampleCount {
    #[inline]
    fn default() -> Self {
        Self::Sample1
    }
}

vulkan_bitflags! {
    /// The aspects of an image.
    ImageAspects = ImageAspectFlags(u32);

    COLOR = COLOR,
    DEPTH = DEPTH,
    STENCIL = STENCIL,
}

vulkan_enum! {
    /// The layout of an image, describing how its memory is accessed.
    ImageLayout impl {
        /// Returns whether the depth aspect of an image in this layout is read-only.
        pub fn is_depth_read_only(self) -> bool {
            matches!(
                self,
                ImageLayout::DepthStencilReadOnlyOptimal
                    | ImageLayout::DepthReadOnlyStencilAttachmentOptimal
                    | ImageLayout::DepthReadOnlyOptimal
                    | ImageLayout::ShaderReadOnlyOptimal
                    | ImageLayout::ReadOnlyOptimal
            )
        }

        /// Returns whether the stencil aspect of an image in this layout is read-only.
        pub fn is_stencil_read_only(self) -> bool {
            matches!(
                self,
                ImageLayout::DepthStencilReadOnlyOptimal
                    | ImageLayout::DepthAttachmentStencilReadOnlyOptimal
                    | ImageLayout::StencilReadOnlyOptimal
                    | ImageLayout::ShaderReadOnlyOptimal
                    | ImageLayout::ReadOnlyOptimal
            )
        }
    }
    = ImageLayout(i32);

    Undefined = UNDEFINED,
    General = GENERAL,
    ColorAttachmentOptimal = COLOR_ATTACHMENT_OPTIMAL,
    DepthStencilAttachmentOptimal = DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
    DepthStencilReadOnlyOptimal = DEPTH_STENCIL_READ_ONLY_OPTIMAL,
    ShaderReadOnlyOptimal = SHADER_READ_ONLY_OPTIMAL,
    TransferSrcOptimal = TRANSFER_SRC_OPTIMAL,
    TransferDstOptimal = TRANSFER_DST_OPTIMAL,
    DepthReadOnlyStencilAttachmentOptimal = DEPTH_READ_ONLY_STENCIL_ATTACHMENT_OPTIMAL,
    DepthAttachmentStencilReadOnlyOptimal = DEPTH_ATTACHMENT_STENCIL_READ_ONLY_OPTIMAL,
    DepthAttachmentOptimal = DEPTH_ATTACHMENT_OPTIMAL,
    DepthReadOnlyOptimal = DEPTH_READ_ONLY_OPTIMAL,
    StencilAttachmentOptimal = STENCIL_ATTACHMENT_OPTIMAL,
    StencilReadOnlyOptimal = STENCIL_READ_ONLY_OPTIMAL,
    ReadOnlyOptimal = READ_ONLY_OPTIMAL,
    AttachmentOptimal = ATTACHMENT_OPTIMAL,
}

impl Default for ImageLayout {
    #[inline]
    fn default() -> Self {
        Self::Undefined
    }
}

/// A snapshot of an image view, as far as attachment compatibility is concerned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageView {
    /// The format of the view.
    pub format: Format,

    /// The sample count of the viewed image.
    pub samples: SampleCount,

    pub _ne: crate::NonExhaustive,
}

impl ImageView {
    #[inline]
    pub fn new(format: Format, samples: SampleCount) -> Self {
        Self {
            format,
            samples,
            _ne: crate::NonExhaustive(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageLayout, SampleCount, SampleCounts};

    #[test]
    fn sample_counts() {
        assert_eq!(SampleCount::Sample8.count(), 8);
        let counts = SampleCounts::SAMPLE_1 | SampleCounts::SAMPLE_4;
        assert!(counts.contains_enum(SampleCount::Sample4));
        assert!(!counts.contains_enum(SampleCount::Sample2));
        assert_eq!(counts.max_count(), SampleCount::Sample4);
        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            [SampleCount::Sample1, SampleCount::Sample4],
        );
    }

    #[test]
    fn read_only_layouts() {
        assert!(ImageLayout::DepthReadOnlyStencilAttachmentOptimal.is_depth_read_only());
        assert!(!ImageLayout::DepthReadOnlyStencilAttachmentOptimal.is_stencil_read_only());
        assert!(ImageLayout::DepthAttachmentStencilReadOnlyOptimal.is_stencil_read_only());
        assert!(!ImageLayout::DepthStencilAttachmentOptimal.is_depth_read_only());
        assert!(ImageLayout::DepthStencilReadOnlyOptimal.is_depth_read_only());
        assert!(ImageLayout::DepthStencilReadOnlyOptimal.is_stencil_read_only());
    }
}
