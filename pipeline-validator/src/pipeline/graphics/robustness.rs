//! Per-pipeline control over out-of-bounds access behavior.

use crate::{
    device::DeviceCapabilities, macros::vulkan_enum, DefectKind, Requires, RequiresAllOf,
    RequiresOneOf, ValidationError, ValidationReport,
};

/// Robustness behavior requested for the resources that a pipeline accesses, from
/// `VkPipelineRobustnessCreateInfoEXT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineRobustnessCreateInfo {
    /// Behavior of out-of-bounds accesses to storage buffers.
    ///
    /// The default value is [`PipelineRobustnessBufferBehavior::DeviceDefault`].
    pub storage_buffers: PipelineRobustnessBufferBehavior,

    /// Behavior of out-of-bounds accesses to uniform buffers.
    ///
    /// The default value is [`PipelineRobustnessBufferBehavior::DeviceDefault`].
    pub uniform_buffers: PipelineRobustnessBufferBehavior,

    /// Behavior of out-of-bounds accesses to vertex input attributes.
    ///
    /// The default value is [`PipelineRobustnessBufferBehavior::DeviceDefault`].
    pub vertex_inputs: PipelineRobustnessBufferBehavior,

    /// Behavior of out-of-bounds accesses to images.
    ///
    /// The default value is [`PipelineRobustnessImageBehavior::DeviceDefault`].
    pub images: PipelineRobustnessImageBehavior,

    pub _ne: crate::NonExhaustive,
}

impl Default for PipelineRobustnessCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            storage_buffers: PipelineRobustnessBufferBehavior::DeviceDefault,
            uniform_buffers: PipelineRobustnessBufferBehavior::DeviceDefault,
            vertex_inputs: PipelineRobustnessBufferBehavior::DeviceDefault,
            images: PipelineRobustnessImageBehavior::DeviceDefault,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl PipelineRobustnessCreateInfo {
    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            storage_buffers,
            uniform_buffers,
            vertex_inputs,
            images,
            _ne: _,
        } = self;

        if !device.enabled_features().pipeline_robustness {
            let buffers: [(&'static str, PipelineRobustnessBufferBehavior, &'static [&'static str]); 3] = [
                (
                    "storage_buffers",
                    storage_buffers,
                    &["VUID-VkPipelineRobustnessCreateInfoEXT-pipelineRobustness-06926"],
                ),
                (
                    "uniform_buffers",
                    uniform_buffers,
                    &["VUID-VkPipelineRobustnessCreateInfoEXT-pipelineRobustness-06927"],
                ),
                (
                    "vertex_inputs",
                    vertex_inputs,
                    &["VUID-VkPipelineRobustnessCreateInfoEXT-pipelineRobustness-06928"],
                ),
            ];

            let images_vuids: &'static [&'static str] =
                &["VUID-VkPipelineRobustnessCreateInfoEXT-pipelineRobustness-06929"];

            let offending = buffers
                .iter()
                .filter(|&&(_, behavior, _)| {
                    behavior != PipelineRobustnessBufferBehavior::DeviceDefault
                })
                .map(|&(context, _, vuids)| (context, vuids))
                .chain(
                    (images != PipelineRobustnessImageBehavior::DeviceDefault)
                        .then_some(("images", images_vuids)),
                );

            for (context, vuids) in offending {
                report.push(Box::new(ValidationError {
                    context: context.into(),
                    problem: "is not the device default".into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "pipeline_robustness",
                    )])]),
                    vuids,
                    kind: DefectKind::Capability,
                }));
            }
        }

        report.check(storage_buffers.validate_device(device).map_err(|err| {
            err.add_context("storage_buffers").set_vuids(&[
                "VUID-VkPipelineRobustnessCreateInfoEXT-robustBufferAccess2-06931",
            ])
        }));

        report.check(uniform_buffers.validate_device(device).map_err(|err| {
            err.add_context("uniform_buffers").set_vuids(&[
                "VUID-VkPipelineRobustnessCreateInfoEXT-robustBufferAccess2-06932",
            ])
        }));

        report.check(vertex_inputs.validate_device(device).map_err(|err| {
            err.add_context("vertex_inputs").set_vuids(&[
                "VUID-VkPipelineRobustnessCreateInfoEXT-robustBufferAccess2-06933",
            ])
        }));

        report.check(images.validate_device(device).map_err(|err| {
            let vuids: &'static [&'static str] = match images {
                PipelineRobustnessImageBehavior::RobustImageAccess => {
                    &["VUID-VkPipelineRobustnessCreateInfoEXT-robustImageAccess-06930"]
                }
                _ => &["VUID-VkPipelineRobustnessCreateInfoEXT-robustImageAccess2-06934"],
            };
            err.add_context("images").set_vuids(vuids)
        }));
    }
}

vulkan_enum! {
    /// How out-of-bounds accesses to a kind of buffer behave.
    PipelineRobustnessBufferBehavior = PipelineRobustnessBufferBehaviorEXT(i32);

    /// The behavior that the robustness features enabled on the device select.
    DeviceDefault = DEVICE_DEFAULT,

    /// Out-of-bounds accesses are undefined behavior.
    Disabled = DISABLED,

    /// Out-of-bounds accesses behave as with `robust_buffer_access`.
    RobustBufferAccess = ROBUST_BUFFER_ACCESS,

    /// Out-of-bounds accesses behave as with `robust_buffer_access2`.
    RobustBufferAccess2 = ROBUST_BUFFER_ACCESS_2
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(robust_buffer_access2)]),
    ]),
}

vulkan_enum! {
    /// How out-of-bounds accesses to images behave.
    PipelineRobustnessImageBehavior = PipelineRobustnessImageBehaviorEXT(i32);

    /// The behavior that the robustness features enabled on the device select.
    DeviceDefault = DEVICE_DEFAULT,

    /// Out-of-bounds accesses are undefined behavior.
    Disabled = DISABLED,

    /// Out-of-bounds accesses behave as with `robust_image_access`.
    RobustImageAccess = ROBUST_IMAGE_ACCESS
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(robust_image_access)]),
    ]),

    /// Out-of-bounds accesses behave as with `robust_image_access2`.
    RobustImageAccess2 = ROBUST_IMAGE_ACCESS_2
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(robust_image_access2)]),
    ]),
}
