//! The extension structs that can be chained onto a graphics pipeline create info.
//!
//! Vulkan links extension structs through `pNext` pointers and finds them by their `sType`.
//! Here the chain is a list of tagged values instead, and a struct of a given type is looked up
//! with [`ExtensionChain::try_get`]. A chain may contain at most one struct of each type.

use super::{
    discard_rectangle::DiscardRectangleState,
    fragment_shading_rate::FragmentShadingRateState,
    library::{GraphicsPipelineLibraryCreateInfo, PipelineLibraryCreateInfo},
    multisample::AttachmentSampleCountInfo,
    robustness::PipelineRobustnessCreateInfo,
    subpass::PipelineRenderingCreateInfo,
};
use crate::{ValidationError, ValidationReport};
use smallvec::SmallVec;
use std::mem::discriminant;

/// A struct that can be part of an [`ExtensionChain`].
pub trait ChainStruct: Sized {
    /// Returns `extension` as `Self`, if it holds a struct of this type.
    fn from_extension(extension: &ExtensionStruct) -> Option<&Self>;

    /// Wraps `self` into an [`ExtensionStruct`].
    fn into_extension(self) -> ExtensionStruct;
}

macro_rules! extension_structs {
    (
        $(
            $(#[doc = $doc:literal])*
            $variant:ident($ty:ty) = $vk_name:literal,
        )+
    ) => {
        /// One struct in an [`ExtensionChain`].
        #[derive(Clone, Debug)]
        #[non_exhaustive]
        pub enum ExtensionStruct {
            $(
                $(#[doc = $doc])*
                $variant($ty),
            )+
        }

        impl ExtensionStruct {
            /// Returns the name of the Vulkan struct that this value stands for.
            pub fn vk_name(&self) -> &'static str {
                match self {
                    $(
                        ExtensionStruct::$variant(_) => $vk_name,
                    )+
                }
            }
        }

        $(
            impl ChainStruct for $ty {
                #[inline]
                fn from_extension(extension: &ExtensionStruct) -> Option<&Self> {
                    match extension {
                        ExtensionStruct::$variant(val) => Some(val),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                #[inline]
                fn into_extension(self) -> ExtensionStruct {
                    ExtensionStruct::$variant(self)
                }
            }

            impl From<$ty> for ExtensionStruct {
                #[inline]
                fn from(val: $ty) -> Self {
                    ExtensionStruct::$variant(val)
                }
            }
        )+
    };
}

extension_structs! {
    /// Declares which sub-states the pipeline itself defines.
    GraphicsPipelineLibrary(GraphicsPipelineLibraryCreateInfo) =
        "VkGraphicsPipelineLibraryCreateInfoEXT",

    /// Lists the libraries that are linked into the pipeline.
    PipelineLibrary(PipelineLibraryCreateInfo) = "VkPipelineLibraryCreateInfoKHR",

    /// The attachment formats for dynamic rendering.
    PipelineRendering(PipelineRenderingCreateInfo) = "VkPipelineRenderingCreateInfo",

    DiscardRectangle(DiscardRectangleState) = "VkPipelineDiscardRectangleStateCreateInfoEXT",

    AttachmentSampleCount(AttachmentSampleCountInfo) = "VkAttachmentSampleCountInfoAMD",

    PipelineRobustness(PipelineRobustnessCreateInfo) = "VkPipelineRobustnessCreateInfoEXT",

    FragmentShadingRate(FragmentShadingRateState) =
        "VkPipelineFragmentShadingRateStateCreateInfoKHR",
}

/// The extension structs of a create info, in the order they were added.
#[derive(Clone, Debug, Default)]
pub struct ExtensionChain {
    structs: SmallVec<[ExtensionStruct; 2]>,
}

impl ExtensionChain {
    /// Returns an empty chain.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push).
    #[inline]
    pub fn with(mut self, val: impl ChainStruct) -> Self {
        self.push(val);
        self
    }

    /// Appends `val` to the end of the chain.
    #[inline]
    pub fn push(&mut self, val: impl ChainStruct) {
        self.structs.push(val.into_extension());
    }

    /// Returns the first struct of type `T` in the chain.
    #[inline]
    pub fn try_get<T: ChainStruct>(&self) -> Option<&T> {
        self.structs.iter().find_map(T::from_extension)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionStruct> {
        self.structs.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.structs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    pub(crate) fn validate(&self, report: &mut ValidationReport) {
        for (index, extension) in self.structs.iter().enumerate() {
            let kind = discriminant(extension);

            if self.structs[..index]
                .iter()
                .any(|earlier| discriminant(earlier) == kind)
            {
                report.push(Box::new(ValidationError {
                    context: format!("next[{}]", index).into(),
                    problem: format!(
                        "is a `{}`, but the chain already contains one",
                        extension.vk_name(),
                    )
                    .into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-sType-unique"],
                    ..Default::default()
                }));
            }
        }
    }
}

impl<T: ChainStruct> FromIterator<T> for ExtensionChain {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            structs: iter.into_iter().map(ChainStruct::into_extension).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExtensionChain;
    use crate::{
        pipeline::graphics::{
            discard_rectangle::DiscardRectangleState, robustness::PipelineRobustnessCreateInfo,
            subpass::PipelineRenderingCreateInfo,
        },
        ValidationReport,
    };

    #[test]
    fn try_get() {
        let chain = ExtensionChain::new()
            .with(DiscardRectangleState::new())
            .with(PipelineRenderingCreateInfo {
                view_mask: 3,
                ..Default::default()
            });

        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain
                .try_get::<PipelineRenderingCreateInfo>()
                .map(|info| info.view_mask),
            Some(3),
        );
        assert!(chain.try_get::<PipelineRobustnessCreateInfo>().is_none());
        assert!(ValidationReport::collect(|report| chain.validate(report)).is_valid());
    }

    #[test]
    fn duplicate_struct() {
        let chain = ExtensionChain::new()
            .with(PipelineRobustnessCreateInfo::default())
            .with(DiscardRectangleState::new())
            .with(PipelineRobustnessCreateInfo::default())
            .with(DiscardRectangleState::new());

        let report = ValidationReport::collect(|report| chain.validate(report));
        assert_eq!(
            report.count_vuid("VUID-VkGraphicsPipelineCreateInfo-sType-unique"),
            2,
        );
        assert_eq!(report.errors()[0].context, "next[2]");
        assert_eq!(report.errors()[1].context, "next[3]");
    }
}
