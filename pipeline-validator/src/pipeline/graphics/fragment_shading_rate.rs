//! Configures the fragment shading rate, the number of pixels covered by each fragment shader
//! invocation.
//!
//! The state is shared by the pre-rasterization and fragment shader sub-states of a pipeline.
//! When they come from different libraries, both must carry an equal copy or neither may.

use crate::{
    device::DeviceCapabilities,
    macros::vulkan_enum,
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};

/// The state in a graphics pipeline describing the fragment shading rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentShadingRateState {
    /// The pipeline fragment shading rate.
    ///
    /// The default value is `[1, 1]`.
    pub fragment_size: [u32; 2],

    /// Determines how the pipeline, primitive, and attachment shading rates are combined for
    /// fragments generated.
    ///
    /// The default value is `[FragmentShadingRateCombinerOp::Keep; 2]`.
    pub combiner_ops: [FragmentShadingRateCombinerOp; 2],

    pub _ne: crate::NonExhaustive,
}

impl Default for FragmentShadingRateState {
    #[inline]
    fn default() -> Self {
        Self {
            fragment_size: [1, 1],
            combiner_ops: [FragmentShadingRateCombinerOp::Keep; 2],
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl FragmentShadingRateState {
    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            fragment_size,
            combiner_ops,
            _ne: _,
        } = self;

        if !device.enabled_extensions().khr_fragment_shading_rate {
            report.push(Box::new(ValidationError {
                problem: "a fragment shading rate state was provided".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "khr_fragment_shading_rate",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pNext-pNext"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));

            return;
        }

        if dynamic_state.contains(DynamicState::FragmentShadingRate) {
            return;
        }

        let properties = device.properties();
        let features = device.enabled_features();

        if !matches!(fragment_size[0], 1 | 2 | 4) {
            report.push(Box::new(ValidationError {
                context: "fragment_size[0]".into(),
                problem: "is not 1, 2 or 4".into(),
                vuids: &[
                    "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04494",
                    "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04496",
                    "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04498",
                ],
                ..Default::default()
            }));
        }

        if !matches!(fragment_size[1], 1 | 2 | 4) {
            report.push(Box::new(ValidationError {
                context: "fragment_size[1]".into(),
                problem: "is not 1, 2 or 4".into(),
                vuids: &[
                    "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04495",
                    "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04497",
                    "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04499",
                ],
                ..Default::default()
            }));
        }

        if !features.pipeline_fragment_shading_rate {
            report.push(Box::new(ValidationError {
                problem: "a fragment shading rate state was provided, and it is not dynamic"
                    .into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "pipeline_fragment_shading_rate",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04500"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }

        report.check(combiner_ops[0].validate_device(device).map_err(|err| {
            err.add_context("combiner_ops[0]")
                .set_vuids(&["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-06567"])
        }));

        report.check(combiner_ops[1].validate_device(device).map_err(|err| {
            err.add_context("combiner_ops[1]")
                .set_vuids(&["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-06568"])
        }));

        if !features.primitive_fragment_shading_rate
            && combiner_ops[0] != FragmentShadingRateCombinerOp::Keep
        {
            report.push(Box::new(ValidationError {
                context: "combiner_ops[0]".into(),
                problem: "is not `FragmentShadingRateCombinerOp::Keep`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "primitive_fragment_shading_rate",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04501"],
                kind: DefectKind::Capability,
            }));
        }

        if !features.attachment_fragment_shading_rate
            && combiner_ops[1] != FragmentShadingRateCombinerOp::Keep
        {
            report.push(Box::new(ValidationError {
                context: "combiner_ops[1]".into(),
                problem: "is not `FragmentShadingRateCombinerOp::Keep`".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                    "attachment_fragment_shading_rate",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04502"],
                kind: DefectKind::Capability,
            }));
        }

        if properties.fragment_shading_rate_non_trivial_combiner_ops == Some(false)
            && !combiner_ops.iter().all(|op| op.is_trivial())
        {
            report.push(Box::new(ValidationError {
                context: "combiner_ops".into(),
                problem: "the `fragment_shading_rate_non_trivial_combiner_ops` property is \
                    `false`, and an element is not `FragmentShadingRateCombinerOp::Keep` or \
                    `FragmentShadingRateCombinerOp::Replace`"
                    .into(),
                vuids: &[
                    "VUID-VkGraphicsPipelineCreateInfo-fragmentShadingRateNonTrivialCombinerOps-04506",
                ],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }
    }
}

vulkan_enum! {
    /// Control how fragment shading rates are combined.
    FragmentShadingRateCombinerOp impl {
        /// Returns whether the operation is `Keep` or `Replace`.
        #[inline]
        pub fn is_trivial(self) -> bool {
            matches!(
                self,
                FragmentShadingRateCombinerOp::Keep | FragmentShadingRateCombinerOp::Replace
            )
        }
    }
    = FragmentShadingRateCombinerOpKHR(i32);

    /// Specifies a combiner operation of combine(Xxy, Yxy) = Xxy.
    Keep = KEEP,

    /// Specifies a combiner operation of combine(Xxy, Yxy) = Yxy.
    Replace = REPLACE,

    /// Specifies a combiner operation of combine(Xxy, Yxy) = min(Xxy, Yxy).
    Min = MIN,

    /// Specifies a combiner operation of combine(Xxy, Yxy) = max(Xxy, Yxy).
    Max = MAX,

    /// Specifies a combiner operation of combine(Xxy, Yxy) = Xxy * Yxy.
    Mul = MUL,
}

impl Default for FragmentShadingRateCombinerOp {
    #[inline]
    fn default() -> Self {
        Self::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::{FragmentShadingRateCombinerOp, FragmentShadingRateState};
    use crate::{
        device::{DeviceCapabilities, DeviceProperties},
        pipeline::{DynamicState, DynamicStates},
        ValidationReport,
    };

    fn validate(
        state: &FragmentShadingRateState,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
    ) -> ValidationReport {
        ValidationReport::collect(|report| state.validate(device, dynamic_state, report))
    }

    #[test]
    fn fragment_size() {
        let device = test_device_with_extensions!(
            [pipeline_fragment_shading_rate],
            [khr_fragment_shading_rate]
        );
        let state = FragmentShadingRateState {
            fragment_size: [1, 3],
            ..Default::default()
        };

        assert!(validate(&state, &device, &DynamicStates::new())
            .contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04495"));

        let dynamic: DynamicStates = [DynamicState::FragmentShadingRate].into_iter().collect();
        assert!(validate(&state, &device, &dynamic).is_valid());
    }

    #[test]
    fn reports_size_and_feature() {
        let device = test_device_with_extensions!([], [khr_fragment_shading_rate]);
        let state = FragmentShadingRateState {
            fragment_size: [3, 8],
            ..Default::default()
        };

        let report = validate(&state, &device, &DynamicStates::new());
        assert_eq!(
            report.vuids().collect::<Vec<_>>(),
            [
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04494",
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04495",
                "VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04500",
            ],
        );

        let report = validate(&state, &test_device!(), &DynamicStates::new());
        assert_eq!(
            report.vuids().collect::<Vec<_>>(),
            ["VUID-VkGraphicsPipelineCreateInfo-pNext-pNext"],
        );
    }

    #[test]
    fn combiner_features() {
        let device = test_device_with_extensions!(
            [pipeline_fragment_shading_rate],
            [khr_fragment_shading_rate]
        );
        let state = FragmentShadingRateState {
            combiner_ops: [
                FragmentShadingRateCombinerOp::Keep,
                FragmentShadingRateCombinerOp::Max,
            ],
            ..Default::default()
        };

        assert!(validate(&state, &device, &DynamicStates::new())
            .contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pDynamicState-04502"));

        let device = test_device_with_extensions!(
            [pipeline_fragment_shading_rate, attachment_fragment_shading_rate],
            [khr_fragment_shading_rate]
        );
        assert!(validate(&state, &device, &DynamicStates::new()).is_valid());

        let device = device.with_properties(DeviceProperties {
            fragment_shading_rate_non_trivial_combiner_ops: Some(false),
            ..Default::default()
        });
        assert!(validate(&state, &device, &DynamicStates::new()).contains_vuid(
            "VUID-VkGraphicsPipelineCreateInfo-fragmentShadingRateNonTrivialCombinerOps-04506"
        ));
    }
}
