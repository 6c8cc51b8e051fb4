//! Configures the operation of the depth, stencil and depth bounds tests.
//!
//! The depth test passes or fails depending on how the depth value of each fragment compares
//! to the existing depth value in the depth buffer at that fragment's location. Depth values
//! are always between 0.0 and 1.0.
//!
//! The depth bounds test allows you to ask the GPU to exclude fragments that are outside of a
//! certain range. This is done in addition to the regular depth test.
//!
//! The stencil test passes or fails depending on how a reference value compares to the existing
//! value in the stencil buffer at each fragment's location. Depending on the outcome of the
//! depth and stencil tests, the value of the stencil buffer at that location can be updated.

use crate::{
    device::DeviceCapabilities,
    macros::vulkan_enum,
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};
use std::ops::RangeInclusive;

/// The state in a graphics pipeline describing how the depth, depth bounds and stencil tests
/// should behave.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthStencilState {
    /// The state of the depth test.
    ///
    /// If set to `None`, the depth test is disabled, all fragments will pass and no depth writes
    /// are performed.
    ///
    /// The default value is `None`.
    pub depth: Option<DepthState>,

    /// The minimum and maximum depth values to use for the depth bounds test.
    ///
    /// If set to `None`, the depth bounds test is disabled. Otherwise, the
    /// [`depth_bounds`](crate::device::DeviceFeatures::depth_bounds) feature must be enabled on
    /// the device.
    ///
    /// The default value is `None`.
    pub depth_bounds: Option<RangeInclusive<f32>>,

    /// The state of the stencil test.
    ///
    /// If set to `None`, the stencil test is disabled, all fragments will pass and no stencil
    /// writes are performed.
    ///
    /// The default value is `None`.
    pub stencil: Option<StencilState>,
}

impl DepthStencilState {
    /// Returns a `DepthStencilState` with all tests disabled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a `DepthStencilState` with a `Less` depth test and depth writes enabled.
    #[inline]
    pub fn simple() -> Self {
        Self {
            depth: Some(DepthState::simple()),
            ..Self::default()
        }
    }

    /// Returns whether the pipeline writes to the depth aspect, as far as the static state can
    /// tell.
    #[inline]
    pub fn writes_depth(&self) -> bool {
        self.depth.as_ref().is_some_and(|depth| depth.write_enable)
    }

    /// Returns whether any stencil operation of either face does something other than
    /// [`StencilOp::Keep`].
    #[inline]
    pub fn has_non_keep_stencil_ops(&self) -> bool {
        self.stencil.as_ref().is_some_and(|stencil| {
            [&stencil.front, &stencil.back]
                .into_iter()
                .any(|face| face.ops.writes())
        })
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let Self {
            depth,
            depth_bounds,
            stencil,
        } = self;

        if let Some(depth_state) = depth {
            report.check(
                depth_state
                    .validate(device)
                    .map_err(|err| err.add_context("depth")),
            );
        }

        if let Some(depth_bounds) = depth_bounds {
            if !device.enabled_features().depth_bounds {
                report.push(Box::new(ValidationError {
                    context: "depth_bounds".into(),
                    problem: "is `Some`".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "depth_bounds",
                    )])]),
                    vuids: &[
                        "VUID-VkPipelineDepthStencilStateCreateInfo-depthBoundsTestEnable-00598",
                    ],
                    kind: DefectKind::Capability,
                }));
            }

            if !dynamic_state.contains(DynamicState::DepthBounds)
                && !device.enabled_extensions().ext_depth_range_unrestricted
                && !((0.0..=1.0).contains(depth_bounds.start())
                    && (0.0..=1.0).contains(depth_bounds.end()))
            {
                report.push(Box::new(ValidationError {
                    context: "depth_bounds".into(),
                    problem: "is not between 0.0 and 1.0 inclusive".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                        Requires::DeviceExtension("ext_depth_range_unrestricted"),
                    ])]),
                    vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-02510"],
                    ..Default::default()
                }));
            }
        }

        if let Some(stencil_state) = stencil {
            report.scoped("stencil", |report| stencil_state.validate(device, report));
        }
    }
}

/// The state in a graphics pipeline describing how the depth test should behave when enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepthState {
    /// Sets whether the value in the depth buffer will be updated when the depth test succeeds.
    ///
    /// The default value is `false`.
    pub write_enable: bool,

    /// Comparison operation to use between the depth value of each incoming fragment and the
    /// depth value currently in the depth buffer.
    ///
    /// The default value is [`CompareOp::Always`].
    pub compare_op: CompareOp,
}

impl Default for DepthState {
    #[inline]
    fn default() -> Self {
        Self {
            write_enable: false,
            compare_op: CompareOp::Always,
        }
    }
}

impl DepthState {
    /// Returns a `DepthState` with a `Less` depth test and depth writes enabled.
    #[inline]
    pub fn simple() -> Self {
        Self {
            compare_op: CompareOp::Less,
            write_enable: true,
        }
    }

    fn validate(self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        self.compare_op.validate_device(device).map_err(|err| {
            err.add_context("compare_op").set_vuids(&[
                "VUID-VkPipelineDepthStencilStateCreateInfo-depthCompareOp-parameter",
            ])
        })
    }
}

/// The state in a graphics pipeline describing how the stencil test should behave when
/// enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StencilState {
    /// The stencil operation state to use for points and lines, and for triangles whose front is
    /// facing the user.
    pub front: StencilOpState,

    /// The stencil operation state to use for triangles whose back is facing the user.
    pub back: StencilOpState,
}

impl StencilState {
    fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let Self { front, back } = self;

        report.scoped("front.ops", |report| front.ops.validate(device, report));
        report.scoped("back.ops", |report| back.ops.validate(device, report));
    }
}

/// Stencil test operations for a single face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilOpState {
    /// The stencil operations to perform.
    pub ops: StencilOps,

    /// A bitmask that selects the bits of the unsigned integer stencil values participating in
    /// the stencil test.
    ///
    /// The default value is `u32::MAX`.
    pub compare_mask: u32,

    /// A bitmask that selects the bits of the unsigned integer stencil values updated by the
    /// stencil test in the stencil framebuffer attachment.
    ///
    /// The default value is `u32::MAX`.
    pub write_mask: u32,

    /// Reference value that is used in the unsigned stencil comparison.
    ///
    /// The default value is `0`.
    pub reference: u32,
}

impl Default for StencilOpState {
    #[inline]
    fn default() -> StencilOpState {
        StencilOpState {
            ops: Default::default(),
            compare_mask: u32::MAX,
            write_mask: u32::MAX,
            reference: u32::MIN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilOps {
    /// The operation to perform when the stencil test failed.
    ///
    /// The default value is [`StencilOp::Keep`].
    pub fail_op: StencilOp,

    /// The operation to perform when both the depth test and the stencil test passed.
    ///
    /// The default value is [`StencilOp::Keep`].
    pub pass_op: StencilOp,

    /// The operation to perform when the stencil test passed but the depth test failed.
    ///
    /// The default value is [`StencilOp::Keep`].
    pub depth_fail_op: StencilOp,

    /// The comparison to perform between the existing stencil value in the stencil buffer, and
    /// the reference value (given by `reference`).
    ///
    /// The default value is [`CompareOp::Never`].
    pub compare_op: CompareOp,
}

impl Default for StencilOps {
    #[inline]
    fn default() -> Self {
        Self {
            pass_op: StencilOp::Keep,
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Never,
        }
    }
}

impl StencilOps {
    /// Returns whether any of the operations can modify the stencil buffer.
    #[inline]
    pub fn writes(&self) -> bool {
        [self.fail_op, self.pass_op, self.depth_fail_op]
            .into_iter()
            .any(|op| op != StencilOp::Keep)
    }

    fn validate(self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let Self {
            fail_op,
            pass_op,
            depth_fail_op,
            compare_op,
        } = self;

        report.check(fail_op.validate_device(device).map_err(|err| {
            err.add_context("fail_op")
                .set_vuids(&["VUID-VkStencilOpState-failOp-parameter"])
        }));

        report.check(pass_op.validate_device(device).map_err(|err| {
            err.add_context("pass_op")
                .set_vuids(&["VUID-VkStencilOpState-passOp-parameter"])
        }));

        report.check(depth_fail_op.validate_device(device).map_err(|err| {
            err.add_context("depth_fail_op")
                .set_vuids(&["VUID-VkStencilOpState-depthFailOp-parameter"])
        }));

        report.check(compare_op.validate_device(device).map_err(|err| {
            err.add_context("compare_op")
                .set_vuids(&["VUID-VkStencilOpState-compareOp-parameter"])
        }));
    }
}

vulkan_enum! {
    /// Operation to perform after the depth and stencil tests.
    StencilOp = StencilOp(i32);

    Keep = KEEP,
    Zero = ZERO,
    Replace = REPLACE,
    IncrementAndClamp = INCREMENT_AND_CLAMP,
    DecrementAndClamp = DECREMENT_AND_CLAMP,
    Invert = INVERT,
    IncrementAndWrap = INCREMENT_AND_WRAP,
    DecrementAndWrap = DECREMENT_AND_WRAP,
}

vulkan_enum! {
    /// Specifies how two values should be compared to decide whether a test passes or fails.
    ///
    /// Used for both depth testing and stencil testing.
    CompareOp = CompareOp(i32);

    /// The test never passes.
    Never = NEVER,

    /// The test passes if `value < reference_value`.
    Less = LESS,

    /// The test passes if `value == reference_value`.
    Equal = EQUAL,

    /// The test passes if `value <= reference_value`.
    LessOrEqual = LESS_OR_EQUAL,

    /// The test passes if `value > reference_value`.
    Greater = GREATER,

    /// The test passes if `value != reference_value`.
    NotEqual = NOT_EQUAL,

    /// The test passes if `value >= reference_value`.
    GreaterOrEqual = GREATER_OR_EQUAL,

    /// The test always passes.
    Always = ALWAYS,
}

#[cfg(test)]
mod tests {
    use super::{DepthStencilState, StencilOp, StencilOpState, StencilOps, StencilState};
    use crate::{
        device::DeviceCapabilities,
        pipeline::{DynamicState, DynamicStates},
        ValidationReport,
    };

    fn validate(
        state: &DepthStencilState,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
    ) -> ValidationReport {
        ValidationReport::collect(|report| state.validate(device, dynamic_state, report))
    }

    #[test]
    fn depth_bounds() {
        let state = DepthStencilState {
            depth_bounds: Some(0.25..=1.5),
            ..DepthStencilState::simple()
        };

        assert_eq!(
            validate(&state, &test_device!(), &DynamicStates::new())
                .vuids()
                .collect::<Vec<_>>(),
            [
                "VUID-VkPipelineDepthStencilStateCreateInfo-depthBoundsTestEnable-00598",
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-02510",
            ],
        );

        let device = test_device!(depth_bounds);
        assert_eq!(
            validate(&state, &device, &DynamicStates::new())
                .vuids()
                .collect::<Vec<_>>(),
            ["VUID-VkGraphicsPipelineCreateInfo-pDynamicStates-02510"],
        );
        assert!(validate(&state, &device, &[DynamicState::DepthBounds].into_iter().collect())
            .is_valid());

        let device = test_device_with_extensions!([depth_bounds], [ext_depth_range_unrestricted]);
        assert!(validate(&state, &device, &DynamicStates::new()).is_valid());
    }

    #[test]
    fn write_queries() {
        assert!(DepthStencilState::simple().writes_depth());
        assert!(!DepthStencilState::new().writes_depth());
        assert!(!DepthStencilState::simple().has_non_keep_stencil_ops());

        let stencil = DepthStencilState {
            stencil: Some(StencilState {
                back: StencilOpState {
                    ops: StencilOps {
                        depth_fail_op: StencilOp::IncrementAndWrap,
                        ..Default::default()
                    },
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..DepthStencilState::new()
        };
        assert!(stencil.has_non_keep_stencil_ops());
        assert!(!stencil.writes_depth());
    }
}
