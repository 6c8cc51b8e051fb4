//! Image and vertex formats.
//!
//! Only the formats that validation needs to distinguish are listed. An undefined format is
//! represented as `Option<Format>::None` wherever Vulkan allows `VK_FORMAT_UNDEFINED`.

use crate::{image::ImageAspects, macros::vulkan_bitflags};

/// An image or vertex format.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum Format {
    R8G8B8A8_UNORM = ash::vk::Format::R8G8B8A8_UNORM.as_raw(),
    R8G8B8A8_SRGB = ash::vk::Format::R8G8B8A8_SRGB.as_raw(),
    R8G8B8A8_UINT = ash::vk::Format::R8G8B8A8_UINT.as_raw(),
    B8G8R8A8_UNORM = ash::vk::Format::B8G8R8A8_UNORM.as_raw(),
    B8G8R8A8_SRGB = ash::vk::Format::B8G8R8A8_SRGB.as_raw(),
    R16G16B16A16_SFLOAT = ash::vk::Format::R16G16B16A16_SFLOAT.as_raw(),
    R32_UINT = ash::vk::Format::R32_UINT.as_raw(),
    R32_SFLOAT = ash::vk::Format::R32_SFLOAT.as_raw(),
    R32G32_SFLOAT = ash::vk::Format::R32G32_SFLOAT.as_raw(),
    R32G32B32_SFLOAT = ash::vk::Format::R32G32B32_SFLOAT.as_raw(),
    R32G32B32A32_SFLOAT = ash::vk::Format::R32G32B32A32_SFLOAT.as_raw(),
    D16_UNORM = ash::vk::Format::D16_UNORM.as_raw(),
    D32_SFLOAT = ash::vk::Format::D32_SFLOAT.as_raw(),
    S8_UINT = ash::vk::Format::S8_UINT.as_raw(),
    D24_UNORM_S8_UINT = ash::vk::Format::D24_UNORM_S8_UINT.as_raw(),
    D32_SFLOAT_S8_UINT = ash::vk::Format::D32_SFLOAT_S8_UINT.as_raw(),
    BC1_RGBA_UNORM_BLOCK = ash::vk::Format::BC1_RGBA_UNORM_BLOCK.as_raw(),
}

impl Format {
    /// Returns the aspects that images of this format have.
    pub fn aspects(self) -> ImageAspects {
        match self {
            Format::D16_UNORM | Format::D32_SFLOAT => ImageAspects::DEPTH,
            Format::S8_UINT => ImageAspects::STENCIL,
            Format::D24_UNORM_S8_UINT | Format::D32_SFLOAT_S8_UINT => {
                ImageAspects::DEPTH | ImageAspects::STENCIL
            }
            _ => ImageAspects::COLOR,
        }
    }

    /// Returns whether the format has a depth or a stencil aspect.
    #[inline]
    pub fn is_depth_stencil(self) -> bool {
        self.aspects()
            .intersects(ImageAspects::DEPTH | ImageAspects::STENCIL)
    }
}

impl From<Format> for ash::vk::Format {
    #[inline]
    fn from(val: Format) -> Self {
        ash::vk::Format::from_raw(val as i32)
    }
}

impl TryFrom<ash::vk::Format> for Format {
    type Error = ();

    fn try_from(val: ash::vk::Format) -> Result<Self, Self::Error> {
        Ok(match val {
            ash::vk::Format::R8G8B8A8_UNORM => Format::R8G8B8A8_UNORM,
            ash::vk::Format::R8G8B8A8_SRGB => Format::R8G8B8A8_SRGB,
            ash::vk::Format::R8G8B8A8_UINT => Format::R8G8B8A8_UINT,
            ash::vk::Format::B8G8R8A8_UNORM => Format::B8G8R8A8_UNORM,
            ash::vk::Format::B8G8R8A8_SRGB => Format::B8G8R8A8_SRGB,
            ash::vk::Format::R16G16B16A16_SFLOAT => Format::R16G16B16A16_SFLOAT,
            ash::vk::Format::R32_UINT => Format::R32_UINT,
            ash::vk::Format::R32_SFLOAT => Format::R32_SFLOAT,
            ash::vk::Format::R32G32_SFLOAT => Format::R32G32_SFLOAT,
            ash::vk::Format::R32G32B32_SFLOAT => Format::R32G32B32_SFLOAT,
            ash::vk::Format::R32G32B32A32_SFLOAT => Format::R32G32B32A32_SFLOAT,
            ash::vk::Format::D16_UNORM => Format::D16_UNORM,
            ash::vk::Format::D32_SFLOAT => Format::D32_SFLOAT,
            ash::vk::Format::S8_UINT => Format::S8_UINT,
            ash::vk::Format::D24_UNORM_S8_UINT => Format::D24_UNORM_S8_UINT,
            ash::vk::Format::D32_SFLOAT_S8_UINT => Format::D32_SFLOAT_S8_UINT,
            ash::vk::Format::BC1_RGBA_UNORM_BLOCK => Format::BC1_RGBA_UNORM_BLOCK,
            _ => return Err(()),
        })
    }
}

vulkan_bitflags! {
    /// The features supported by a format, for images with optimal tiling or for buffers.
    FormatFeatures = FormatFeatureFlags(u32);

    SAMPLED_IMAGE = SAMPLED_IMAGE,
    STORAGE_IMAGE = STORAGE_IMAGE,
    UNIFORM_TEXEL_BUFFER = UNIFORM_TEXEL_BUFFER,
    STORAGE_TEXEL_BUFFER = STORAGE_TEXEL_BUFFER,

    /// Can be used as the format of a vertex attribute.
    VERTEX_BUFFER = VERTEX_BUFFER,

    /// Can be used as a color attachment.
    COLOR_ATTACHMENT = COLOR_ATTACHMENT,

    /// Can be used as a color attachment with blending enabled.
    COLOR_ATTACHMENT_BLEND = COLOR_ATTACHMENT_BLEND,

    /// Can be used as a depth and/or stencil attachment.
    DEPTH_STENCIL_ATTACHMENT = DEPTH_STENCIL_ATTACHMENT,

    BLIT_SRC = BLIT_SRC,
    BLIT_DST = BLIT_DST,
    TRANSFER_SRC = TRANSFER_SRC,
    TRANSFER_DST = TRANSFER_DST,
    FRAGMENT_SHADING_RATE_ATTACHMENT = FRAGMENT_SHADING_RATE_ATTACHMENT_KHR,
}

#[cfg(test)]
mod tests {
    use super::Format;
    use crate::image::ImageAspects;

    #[test]
    fn aspects() {
        assert_eq!(Format::R8G8B8A8_UNORM.aspects(), ImageAspects::COLOR);
        assert_eq!(
            Format::D24_UNORM_S8_UINT.aspects(),
            ImageAspects::DEPTH | ImageAspects::STENCIL,
        );
        assert!(Format::S8_UINT.is_depth_stencil());
        assert!(!Format::R32_UINT.is_depth_stencil());
    }

    #[test]
    fn vk_conversion() {
        let raw: ash::vk::Format = Format::D32_SFLOAT.into();
        assert_eq!(raw, ash::vk::Format::D32_SFLOAT);
        assert_eq!(Format::try_from(raw), Ok(Format::D32_SFLOAT));
        assert_eq!(Format::try_from(ash::vk::Format::UNDEFINED), Err(()));
    }
}
