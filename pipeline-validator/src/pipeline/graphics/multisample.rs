//! Generates multiple fragments per framebuffer pixel when rasterizing.
//!
//! This can be used for anti-aliasing.
//!
//! The multisample state is shared by the fragment shader and fragment output sub-states of a
//! pipeline. When both come from different libraries, the two copies must be equal, which is
//! why [`MultisampleState`] implements its own [`PartialEq`].

use crate::{
    device::DeviceCapabilities,
    image::SampleCount,
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};
use ash::vk;

/// State of the multisampling.
#[derive(Clone, Debug)]
pub struct MultisampleState {
    /// The number of rasterization samples to take per pixel. The GPU will pick this many
    /// different locations within each pixel and assign to each of these locations a different
    /// depth value. The depth and stencil test will then be run for each sample.
    ///
    /// The default value is [`SampleCount::Sample1`].
    pub rasterization_samples: SampleCount,

    /// Controls the proportion (between 0.0 and 1.0) of the samples that will be run through the
    /// fragment shader.
    ///
    /// If the value is 1.0, then all sub-pixel samples will run through the shader and get a
    /// different value. If the value is 0.5, about half of the samples will run through the
    /// shader and the other half will get their values from the ones which went through the
    /// shader.
    ///
    /// If set to `Some`, the [`sample_rate_shading`](crate::device::DeviceFeatures::sample_rate_shading)
    /// feature must be enabled on the device.
    ///
    /// The default value is `None`.
    pub sample_shading: Option<f32>,

    /// A mask of bits that is ANDed with the coverage mask of each set of `rasterization_samples`
    /// samples. Only the first `rasterization_samples / 32` bits are used, the rest is ignored.
    ///
    /// The default value is `[0xFFFFFFFF; 2]`.
    pub sample_mask: [u32; 2],

    /// Controls whether the alpha value of the fragment will be used in an implementation-defined
    /// way to determine which samples get disabled or not.
    ///
    /// The default value is `false`.
    pub alpha_to_coverage_enable: bool,

    /// Controls whether the alpha value of all the samples will be forced to 1.0 (or the
    /// maximum possible value) after the effects of `alpha_to_coverage` have been applied.
    ///
    /// If set to `true`, the [`alpha_to_one`](crate::device::DeviceFeatures::alpha_to_one)
    /// feature must be enabled on the device.
    ///
    /// The default value is `false`.
    pub alpha_to_one_enable: bool,

    /// Custom sample locations.
    ///
    /// If set to `Some`, the
    /// [`ext_sample_locations`](crate::device::DeviceExtensions::ext_sample_locations) extension
    /// must be enabled on the device.
    ///
    /// The default value is `None`.
    pub sample_locations: Option<SampleLocationsState>,

    pub _ne: crate::NonExhaustive,
}

impl Default for MultisampleState {
    #[inline]
    fn default() -> Self {
        Self {
            rasterization_samples: SampleCount::Sample1,
            sample_shading: None,
            sample_mask: [0xFFFFFFFF; 2],
            alpha_to_coverage_enable: false,
            alpha_to_one_enable: false,
            sample_locations: None,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl MultisampleState {
    /// Creates a `MultisampleState` with multisampling disabled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a `MultisampleState` with the given number of rasterization samples.
    #[inline]
    pub fn with_samples(rasterization_samples: SampleCount) -> Self {
        Self {
            rasterization_samples,
            ..Self::default()
        }
    }

    /// Returns the words of `sample_mask` that are meaningful for `rasterization_samples`.
    #[inline]
    fn used_sample_mask(&self) -> &[u32] {
        let words = (self.rasterization_samples.count() as usize).div_ceil(32);
        &self.sample_mask[..words.min(self.sample_mask.len())]
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            rasterization_samples,
            sample_shading,
            sample_mask: _,
            alpha_to_coverage_enable: _,
            alpha_to_one_enable,
            ref sample_locations,
            _ne: _,
        } = self;

        report.check(rasterization_samples.validate_device(device).map_err(|err| {
            err.add_context("rasterization_samples").set_vuids(&[
                "VUID-VkPipelineMultisampleStateCreateInfo-rasterizationSamples-parameter",
            ])
        }));

        if let Some(min_sample_shading) = sample_shading {
            if !device.enabled_features().sample_rate_shading {
                report.push(Box::new(ValidationError {
                    context: "sample_shading".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "sample_rate_shading",
                    )])]),
                    vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-sampleShadingEnable-00784"],
                    kind: DefectKind::Capability,
                }));
            }

            if !(0.0..=1.0).contains(&min_sample_shading) {
                report.push(Box::new(ValidationError {
                    context: "sample_shading".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-minSampleShading-00786"],
                    ..Default::default()
                }));
            }
        }

        if alpha_to_one_enable
            && !dynamic_state.contains(DynamicState::AlphaToOneEnable)
            && !device.enabled_features().alpha_to_one
        {
            report.push(Box::new(ValidationError {
                context: "alpha_to_one_enable".into(),
                problem: "is `true`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "alpha_to_one",
                )])]),
                vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-alphaToOneEnable-00785"],
                kind: DefectKind::Capability,
            }));
        }

        if let Some(sample_locations) = sample_locations {
            if !device.enabled_extensions().ext_sample_locations {
                report.push(Box::new(ValidationError {
                    context: "sample_locations".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_sample_locations"),
                    ])]),
                    vuids: &["VUID-VkPipelineMultisampleStateCreateInfo-pNext-pNext"],
                    kind: DefectKind::Capability,
                }));
            } else if !dynamic_state.contains_any(&[
                DynamicState::SampleLocations,
                DynamicState::RasterizationSamples,
            ]) {
                report.check(
                    sample_locations
                        .validate(rasterization_samples)
                        .map_err(|err| err.add_context("sample_locations")),
                );
            }
        }
    }
}

impl PartialEq for MultisampleState {
    /// Compares every field, but only the words of `sample_mask` that the sample count covers.
    fn eq(&self, other: &Self) -> bool {
        self.rasterization_samples == other.rasterization_samples
            && self.sample_shading == other.sample_shading
            && self.used_sample_mask() == other.used_sample_mask()
            && self.alpha_to_coverage_enable == other.alpha_to_coverage_enable
            && self.alpha_to_one_enable == other.alpha_to_one_enable
            && self.sample_locations == other.sample_locations
    }
}

/// Custom locations of the samples within a pixel grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleLocationsState {
    /// The size of the pixel grid that the locations repeat over.
    ///
    /// The default value is `[1, 1]`.
    pub grid_size: [u32; 2],

    /// The locations, between 0.0 and 1.0, of every sample of every pixel in the grid.
    ///
    /// The default value is empty.
    pub locations: Vec<[f32; 2]>,
}

impl Default for SampleLocationsState {
    #[inline]
    fn default() -> Self {
        Self {
            grid_size: [1, 1],
            locations: Vec::new(),
        }
    }
}

impl SampleLocationsState {
    fn validate(&self, rasterization_samples: SampleCount) -> Result<(), Box<ValidationError>> {
        let &Self {
            grid_size,
            ref locations,
        } = self;

        let expected =
            grid_size[0] as u64 * grid_size[1] as u64 * rasterization_samples.count() as u64;

        if locations.len() as u64 != expected {
            return Err(Box::new(ValidationError {
                context: "locations".into(),
                problem: "the length is not equal to the number of pixels in `grid_size` \
                    multiplied by `rasterization_samples`"
                    .into(),
                vuids: &["VUID-VkSampleLocationsInfoEXT-sampleLocationsCount-01527"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

/// Sample counts of the attachments of a subpass, for devices that render with fewer color
/// samples than coverage samples.
///
/// This can only be used when rendering with a mixed-samples extension enabled, and then
/// replaces the rasterization sample count when sample counts are compared at draw time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentSampleCountInfo {
    /// The sample count of each color attachment. Each value must be a single sample count bit.
    ///
    /// The default value is empty.
    pub color_attachment_samples: Vec<vk::SampleCountFlags>,

    /// The sample count of the depth/stencil attachment, if there is one.
    ///
    /// The default value is `vk::SampleCountFlags::empty()`.
    pub depth_stencil_attachment_samples: vk::SampleCountFlags,

    pub _ne: crate::NonExhaustive,
}

impl Default for AttachmentSampleCountInfo {
    #[inline]
    fn default() -> Self {
        Self {
            color_attachment_samples: Vec::new(),
            depth_stencil_attachment_samples: vk::SampleCountFlags::empty(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl AttachmentSampleCountInfo {
    /// Returns the sample count of the color attachment at `index`, if it is a valid count.
    #[inline]
    pub fn color_attachment_sample_count(&self, index: usize) -> Option<SampleCount> {
        self.color_attachment_samples
            .get(index)
            .and_then(|&flags| SampleCount::try_from(flags).ok())
    }

    /// Returns the sample count of the depth/stencil attachment, if it is a valid count.
    #[inline]
    pub fn depth_stencil_attachment_sample_count(&self) -> Option<SampleCount> {
        SampleCount::try_from(self.depth_stencil_attachment_samples).ok()
    }

    pub(crate) fn validate(&self, report: &mut ValidationReport) {
        let Self {
            color_attachment_samples,
            depth_stencil_attachment_samples,
            _ne: _,
        } = self;

        for (index, &samples) in color_attachment_samples.iter().enumerate() {
            if SampleCount::try_from(samples).is_err() {
                report.push(Box::new(ValidationError {
                    context: format!("color_attachment_samples[{}]", index).into(),
                    problem: "is not a single valid sample count".into(),
                    vuids: &["VUID-VkAttachmentSampleCountInfoAMD-pColorAttachmentSamples-06592"],
                    ..Default::default()
                }));
            }
        }

        if !depth_stencil_attachment_samples.is_empty()
            && SampleCount::try_from(*depth_stencil_attachment_samples).is_err()
        {
            report.push(Box::new(ValidationError {
                context: "depth_stencil_attachment_samples".into(),
                problem: "is not a single valid sample count".into(),
                vuids: &[
                    "VUID-VkAttachmentSampleCountInfoAMD-depthStencilAttachmentSamples-06593",
                ],
                ..Default::default()
            }));
        }
    }
}
