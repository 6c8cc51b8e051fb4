//! A test to discard pixels that would be written to certain areas of a framebuffer.
//!
//! The discard rectangle test is similar to, but separate from the scissor test.

use crate::{
    device::DeviceCapabilities,
    macros::vulkan_enum,
    pipeline::{graphics::viewport::Scissor, DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};

/// The state in a graphics pipeline describing how the discard rectangle test should behave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscardRectangleState {
    /// Sets whether the discard rectangle test operates inclusively or exclusively.
    ///
    /// The default value is [`DiscardRectangleMode::Exclusive`].
    pub mode: DiscardRectangleMode,

    /// Specifies the discard rectangles.
    ///
    /// When [`DynamicState::DiscardRectangle`] is used, the values of each rectangle are ignored
    /// and must be set dynamically, but the number of discard rectangles is fixed and must be
    /// matched when setting the dynamic value.
    ///
    /// The default value is empty.
    pub rectangles: Vec<Scissor>,

    pub _ne: crate::NonExhaustive,
}

impl DiscardRectangleState {
    /// Creates a `DiscardRectangleState` in exclusive mode with zero rectangles.
    #[inline]
    pub fn new() -> Self {
        Self {
            mode: DiscardRectangleMode::Exclusive,
            rectangles: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            mode,
            ref rectangles,
            _ne: _,
        } = self;

        if !device.enabled_extensions().ext_discard_rectangles {
            report.push(Box::new(ValidationError {
                problem: "a discard rectangle state was provided".into(),
                requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceExtension(
                    "ext_discard_rectangles",
                )])]),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pNext-pNext"],
                kind: DefectKind::Capability,
                ..Default::default()
            }));

            return;
        }

        if !dynamic_state.contains(DynamicState::DiscardRectangleMode) {
            report.check(mode.validate_device(device).map_err(|err| {
                err.add_context("mode").set_vuids(&[
                    "VUID-VkPipelineDiscardRectangleStateCreateInfoEXT-discardRectangleMode-parameter",
                ])
            }));
        }

        let max_discard_rectangles = device.properties().max_discard_rectangles.unwrap_or(0);

        if rectangles.len() as u32 > max_discard_rectangles {
            report.push(Box::new(ValidationError {
                context: "rectangles".into(),
                problem: "the length exceeds the `max_discard_rectangles` limit".into(),
                vuids: &[
                    "VUID-VkPipelineDiscardRectangleStateCreateInfoEXT-discardRectangleCount-00582",
                ],
                kind: DefectKind::Capability,
                ..Default::default()
            }));
        }
    }
}

impl Default for DiscardRectangleState {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

vulkan_enum! {
    /// The mode in which the discard rectangle test operates.
    DiscardRectangleMode = DiscardRectangleModeEXT(i32);

    /// Samples that are inside a rectangle are kept, samples that are outside all rectangles
    /// are discarded.
    Inclusive = INCLUSIVE,

    /// Samples that are inside a rectangle are discarded, samples that are outside all
    /// rectangles are kept.
    Exclusive = EXCLUSIVE,
}

#[cfg(test)]
mod tests {
    use super::DiscardRectangleState;
    use crate::{
        device::{DeviceCapabilities, DeviceProperties},
        pipeline::{graphics::viewport::Scissor, DynamicStates},
        ValidationReport,
    };

    fn validate(state: &DiscardRectangleState, device: &DeviceCapabilities) -> ValidationReport {
        ValidationReport::collect(|report| state.validate(device, &DynamicStates::new(), report))
    }

    #[test]
    fn requires_extension() {
        let report = validate(&DiscardRectangleState::new(), &test_device!());
        assert_eq!(
            report.vuids().collect::<Vec<_>>(),
            ["VUID-VkGraphicsPipelineCreateInfo-pNext-pNext"],
        );
    }

    #[test]
    fn rectangle_limit() {
        let device = test_device_with_extensions!([], [ext_discard_rectangles]);
        let state = DiscardRectangleState {
            rectangles: vec![Scissor::default(); 2],
            ..DiscardRectangleState::new()
        };

        assert!(validate(&state, &device).contains_vuid(
            "VUID-VkPipelineDiscardRectangleStateCreateInfoEXT-discardRectangleCount-00582"
        ));

        let device = device.with_properties(DeviceProperties {
            max_discard_rectangles: Some(4),
            ..Default::default()
        });
        assert!(validate(&state, &device).is_valid());
    }
}
