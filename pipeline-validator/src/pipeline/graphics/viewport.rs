//! Configures the area of the framebuffer that pixels will be written to.
//!
//! There are two different concepts to determine where things will be drawn:
//!
//! - The viewport is the region of the image which corresponds to the vertex coordinates `-1.0`
//!   to `1.0`.
//! - Any pixel outside of the scissor box will be discarded.
//!
//! Both can be fixed in the pipeline, or provided dynamically at draw time. With the
//! `*WithCount` dynamic states, even the number of viewports and scissors is dynamic, and the
//! lists in [`ViewportState`] must then be empty.

use crate::{
    device::DeviceCapabilities,
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};
use smallvec::{smallvec, SmallVec};
use std::ops::RangeInclusive;

/// List of viewports and scissors that are used when creating a graphics pipeline object.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    /// Specifies the viewport transforms.
    ///
    /// When [`DynamicState::Viewport`] is used, the values of each element are ignored and must
    /// be set dynamically, but the number of viewports is fixed and must be matched when setting
    /// the dynamic value. When [`DynamicState::ViewportWithCount`] is used, the list must be
    /// empty.
    ///
    /// The default value is a single element of `Viewport::default()`.
    pub viewports: SmallVec<[Viewport; 1]>,

    /// Specifies the scissor rectangles, in the same way as `viewports`.
    ///
    /// The default value is a single element of `Scissor::default()`.
    pub scissors: SmallVec<[Scissor; 1]>,

    pub _ne: crate::NonExhaustive,
}

impl Default for ViewportState {
    #[inline]
    fn default() -> Self {
        Self {
            viewports: smallvec![Viewport::default()],
            scissors: smallvec![Scissor::default()],
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl ViewportState {
    /// Returns a `ViewportState` with a single default viewport and scissor.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a `ViewportState` with no viewports or scissors, for use with the `*WithCount`
    /// dynamic states.
    #[inline]
    pub fn with_count() -> Self {
        Self {
            viewports: SmallVec::new(),
            scissors: SmallVec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let Self {
            viewports,
            scissors,
            _ne: _,
        } = self;

        let properties = device.properties();

        let viewport_count = viewports.len() as u32;
        let scissor_count = scissors.len() as u32;

        if dynamic_state.contains(DynamicState::ViewportWithCount) {
            if viewport_count != 0 {
                report.push(Box::new(ValidationError {
                    context: "viewports".into(),
                    problem: "is not empty, but `DynamicState::ViewportWithCount` is used".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03379"],
                    ..Default::default()
                }));
            }
        } else if viewport_count == 0 {
            report.push(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "is empty".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-04135"],
                ..Default::default()
            }));
        }

        if dynamic_state.contains(DynamicState::ScissorWithCount) {
            if scissor_count != 0 {
                report.push(Box::new(ValidationError {
                    context: "scissors".into(),
                    problem: "is not empty, but `DynamicState::ScissorWithCount` is used".into(),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-03380"],
                    ..Default::default()
                }));
            }
        } else if scissor_count == 0 {
            report.push(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "is empty".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04136"],
                ..Default::default()
            }));
        }

        if viewport_count > 1 && !device.enabled_features().multi_viewport {
            report.push(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "the length is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01216"],
                kind: DefectKind::Capability,
            }));
        }

        if scissor_count > 1 && !device.enabled_features().multi_viewport {
            report.push(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "the length is greater than 1".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "multi_viewport",
                )])]),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-01217"],
                kind: DefectKind::Capability,
            }));
        }

        if viewport_count > properties.max_viewports {
            report.push(Box::new(ValidationError {
                context: "viewports".into(),
                problem: "the length exceeds the `max_viewports` limit".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-viewportCount-01218"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        if scissor_count > properties.max_viewports {
            report.push(Box::new(ValidationError {
                context: "scissors".into(),
                problem: "the length exceeds the `max_viewports` limit".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-01219"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        if !dynamic_state
            .contains_any(&[DynamicState::ViewportWithCount, DynamicState::ScissorWithCount])
            && viewport_count != scissor_count
        {
            report.push(Box::new(ValidationError {
                problem: "the length of `viewports` and the length of `scissors` are not equal"
                    .into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-scissorCount-04134"],
                ..Default::default()
            }));
        }

        if !dynamic_state.contains(DynamicState::Viewport) {
            for (index, viewport) in viewports.iter().enumerate() {
                report.scoped(format!("viewports[{}]", index), |report| {
                    viewport.validate(device, report)
                });
            }
        }

        if !dynamic_state.contains(DynamicState::Scissor) {
            for (index, scissor) in scissors.iter().enumerate() {
                report.scoped(format!("scissors[{}]", index), |report| {
                    scissor.validate(report)
                });
            }
        }
    }
}

/// State of a single viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Coordinates in pixels of the top-left hand corner of the viewport.
    ///
    /// The default value is `[0.0; 2]`.
    pub offset: [f32; 2],

    /// Dimensions in pixels of the viewport.
    ///
    /// The default value is `[1.0; 2]`, which you probably want to override.
    pub extent: [f32; 2],

    /// Minimum and maximum values of the depth.
    ///
    /// The values `0.0` to `1.0` of each vertex's Z coordinate will be mapped to this
    /// `depth_range` before being compared to the existing depth value.
    ///
    /// Without the `ext_depth_range_unrestricted` extension, both bounds must be between `0.0`
    /// and `1.0`.
    ///
    /// The default value is `0.0..=1.0`.
    pub depth_range: RangeInclusive<f32>,
}

impl Default for Viewport {
    #[inline]
    fn default() -> Self {
        Self {
            offset: [0.0; 2],
            extent: [1.0; 2],
            depth_range: 0.0..=1.0,
        }
    }
}

impl Viewport {
    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let Self {
            offset: _,
            extent,
            depth_range,
        } = self;

        let properties = device.properties();

        if !(extent[0] > 0.0) {
            report.push(Box::new(ValidationError {
                context: "extent[0]".into(),
                problem: "is not greater than zero".into(),
                vuids: &["VUID-VkViewport-width-01770"],
                ..Default::default()
            }));
        }

        if extent[0] > properties.max_viewport_dimensions[0] as f32 {
            report.push(Box::new(ValidationError {
                context: "extent[0]".into(),
                problem: "exceeds the `max_viewport_dimensions[0]` limit".into(),
                vuids: &["VUID-VkViewport-width-01771"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        // Negative heights flip the viewport, which Vulkan 1.1 allows.
        if extent[1].abs() > properties.max_viewport_dimensions[1] as f32 {
            report.push(Box::new(ValidationError {
                context: "extent[1]".into(),
                problem: "exceeds the `max_viewport_dimensions[1]` limit".into(),
                vuids: &["VUID-VkViewport-height-01773"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        if !device.enabled_extensions().ext_depth_range_unrestricted {
            if !(0.0..=1.0).contains(depth_range.start()) {
                report.push(Box::new(ValidationError {
                    context: "depth_range.start".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-VkViewport-minDepth-01234"],
                    ..Default::default()
                }));
            }

            if !(0.0..=1.0).contains(depth_range.end()) {
                report.push(Box::new(ValidationError {
                    context: "depth_range.end".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-VkViewport-maxDepth-01235"],
                    ..Default::default()
                }));
            }
        }
    }
}

/// A two-dimensional subregion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scissor {
    /// Coordinates of the top-left hand corner of the box.
    ///
    /// The default value is `[0; 2]`.
    pub offset: [i32; 2],

    /// Dimensions of the box.
    ///
    /// The default value is `[i32::MAX as u32; 2]`.
    pub extent: [u32; 2],
}

impl Default for Scissor {
    #[inline]
    fn default() -> Self {
        Self {
            offset: [0; 2],
            extent: [i32::MAX as u32; 2],
        }
    }
}

impl Scissor {
    pub(crate) fn validate(&self, report: &mut ValidationReport) {
        let &Self { offset, extent } = self;

        if offset[0] < 0 || offset[1] < 0 {
            report.push(Box::new(ValidationError {
                context: "offset".into(),
                problem: "is negative".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-x-02821"],
                ..Default::default()
            }));
        }

        if offset[0] as i64 + extent[0] as i64 > i32::MAX as i64 {
            report.push(Box::new(ValidationError {
                problem: "`offset[0] + extent[0]` is greater than `i32::MAX`".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-offset-02822"],
                ..Default::default()
            }));
        }

        if offset[1] as i64 + extent[1] as i64 > i32::MAX as i64 {
            report.push(Box::new(ValidationError {
                problem: "`offset[1] + extent[1]` is greater than `i32::MAX`".into(),
                vuids: &["VUID-VkPipelineViewportStateCreateInfo-offset-02823"],
                ..Default::default()
            }));
        }
    }
}
