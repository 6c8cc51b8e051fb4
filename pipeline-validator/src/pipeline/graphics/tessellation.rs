//! Subdivides primitives into smaller primitives.

use crate::{
    device::DeviceCapabilities,
    macros::vulkan_enum,
    pipeline::{DynamicState, DynamicStates},
    ValidationError, ValidationReport,
};

/// The state in a graphics pipeline describing the tessellation subdivision behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TessellationState {
    /// The number of patch control points to use.
    ///
    /// The default value is 3.
    pub patch_control_points: u32,

    /// The origin to use for the tessellation domain.
    ///
    /// If this is not [`TessellationDomainOrigin::UpperLeft`], the device API version must be at
    /// least 1.1.
    ///
    /// The default value is [`TessellationDomainOrigin::UpperLeft`].
    pub domain_origin: TessellationDomainOrigin,

    pub _ne: crate::NonExhaustive,
}

impl Default for TessellationState {
    #[inline]
    fn default() -> Self {
        Self {
            patch_control_points: 3,
            domain_origin: TessellationDomainOrigin::UpperLeft,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl TessellationState {
    /// Creates a new `TessellationState` with 3 patch control points.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of patch control points.
    #[inline]
    pub fn patch_control_points(mut self, num: u32) -> Self {
        self.patch_control_points = num;
        self
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            patch_control_points,
            domain_origin,
            _ne: _,
        } = self;

        let properties = device.properties();

        if !dynamic_state.contains(DynamicState::PatchControlPoints)
            && (patch_control_points == 0
                || patch_control_points > properties.max_tessellation_patch_size)
        {
            report.push(Box::new(ValidationError {
                context: "patch_control_points".into(),
                problem: "is zero, or greater than the `max_tessellation_patch_size` limit".into(),
                vuids: &[
                    "VUID-VkPipelineTessellationStateCreateInfo-patchControlPoints-01214",
                ],
                ..Default::default()
            }));
        }

        report.check(domain_origin.validate_device(device).map_err(|err| {
            err.add_context("domain_origin").set_vuids(&[
                "VUID-VkPipelineTessellationDomainOriginStateCreateInfo-domainOrigin-parameter",
            ])
        }));
    }
}

vulkan_enum! {
    /// The origin of the tessellation domain.
    TessellationDomainOrigin = TessellationDomainOrigin(i32);

    /// The origin is in the upper left corner.
    ///
    /// This is the default.
    UpperLeft = UPPER_LEFT,

    /// The origin is in the lower left corner.
    LowerLeft = LOWER_LEFT
    RequiresOneOf([
        RequiresAllOf([APIVersion(V1_1)]),
    ]),
}

impl Default for TessellationDomainOrigin {
    #[inline]
    fn default() -> Self {
        Self::UpperLeft
    }
}
