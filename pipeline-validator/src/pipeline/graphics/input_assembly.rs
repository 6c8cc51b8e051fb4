//! Configures how input vertices are assembled into primitives.

use crate::{
    device::DeviceCapabilities,
    macros::vulkan_enum,
    pipeline::{DynamicState, DynamicStates},
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};

/// The state in a graphics pipeline describing how the input assembly stage should behave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputAssemblyState {
    /// The type of primitives.
    ///
    /// Some topologies require a feature to be enabled on the device.
    ///
    /// The default value is [`PrimitiveTopology::TriangleList`].
    pub topology: PrimitiveTopology,

    /// If true, then when drawing with an index buffer, the special index value consisting of the
    /// maximum unsigned value will tell the GPU that it is the end of the current primitive.
    ///
    /// "List" topologies require a feature to be enabled on the device when combined with
    /// primitive restart.
    ///
    /// The default value is `false`.
    pub primitive_restart_enable: bool,

    pub _ne: crate::NonExhaustive,
}

impl Default for InputAssemblyState {
    #[inline]
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            primitive_restart_enable: false,
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl InputAssemblyState {
    /// Creates an `InputAssemblyState` with the `TriangleList` topology and primitive restart
    /// disabled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primitive topology.
    #[inline]
    pub fn topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Enables primitive restart.
    #[inline]
    pub fn primitive_restart_enable(mut self) -> Self {
        self.primitive_restart_enable = true;
        self
    }

    pub(crate) fn validate(
        &self,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
        report: &mut ValidationReport,
    ) {
        let &Self {
            topology,
            primitive_restart_enable,
            _ne: _,
        } = self;

        report.check(topology.validate_device(device).map_err(|err| {
            err.add_context("topology")
                .set_vuids(&["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-parameter"])
        }));

        let features = device.enabled_features();

        match topology {
            PrimitiveTopology::TriangleFan => {
                if device.enabled_extensions().khr_portability_subset && !features.triangle_fans {
                    report.push(Box::new(ValidationError {
                        problem: "this device is a portability subset device, and `topology` \
                            is `PrimitiveTopology::TriangleFan`"
                            .into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("triangle_fans"),
                        ])]),
                        vuids: &[
                            "VUID-VkPipelineInputAssemblyStateCreateInfo-triangleFans-04452",
                        ],
                        kind: DefectKind::Capability,
                        ..Default::default()
                    }));
                }
            }
            PrimitiveTopology::LineListWithAdjacency
            | PrimitiveTopology::LineStripWithAdjacency
            | PrimitiveTopology::TriangleListWithAdjacency
            | PrimitiveTopology::TriangleStripWithAdjacency => {
                if !features.geometry_shader {
                    report.push(Box::new(ValidationError {
                        context: "topology".into(),
                        problem: "is `PrimitiveTopology::*WithAdjacency`".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("geometry_shader"),
                        ])]),
                        vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00429"],
                        kind: DefectKind::Capability,
                    }));
                }
            }
            PrimitiveTopology::PatchList => {
                if !features.tessellation_shader {
                    report.push(Box::new(ValidationError {
                        context: "topology".into(),
                        problem: "is `PrimitiveTopology::PatchList`".into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("tessellation_shader"),
                        ])]),
                        vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00430"],
                        kind: DefectKind::Capability,
                    }));
                }
            }
            _ => (),
        }

        // With either value dynamic, the combination is only known at draw time.
        if primitive_restart_enable
            && !dynamic_state.contains_any(&[
                DynamicState::PrimitiveTopology,
                DynamicState::PrimitiveRestartEnable,
            ])
        {
            if topology.is_list() && !topology.is_patch_list() {
                if !features.primitive_topology_list_restart {
                    report.push(Box::new(ValidationError {
                        problem: "`topology` is `PrimitiveTopology::*List`, and \
                            `primitive_restart_enable` is `true`"
                            .into(),
                        requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                            Requires::DeviceFeature("primitive_topology_list_restart"),
                        ])]),
                        vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-06252"],
                        kind: DefectKind::Capability,
                        ..Default::default()
                    }));
                }
            } else if topology.is_patch_list() && !features.primitive_topology_patch_list_restart
            {
                report.push(Box::new(ValidationError {
                    problem: "`topology` is `PrimitiveTopology::PatchList`, and \
                        `primitive_restart_enable` is `true`"
                        .into(),
                    requires_one_of: RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "primitive_topology_patch_list_restart",
                    )])]),
                    vuids: &["VUID-VkPipelineInputAssemblyStateCreateInfo-topology-06253"],
                    kind: DefectKind::Capability,
                    ..Default::default()
                }));
            }
        }
    }
}

vulkan_enum! {
    /// Describes how vertices must be grouped together to form primitives.
    ///
    /// When enabling primitive restart, "list" topologies require a feature to be enabled on the
    /// device:
    /// - The `PatchList` topology requires the
    ///   [`primitive_topology_patch_list_restart`](crate::device::DeviceFeatures::primitive_topology_patch_list_restart)
    ///   feature.
    /// - All other "list" topologies require the
    ///   [`primitive_topology_list_restart`](crate::device::DeviceFeatures::primitive_topology_list_restart)
    ///   feature.
    PrimitiveTopology impl {
        /// Returns whether the topology is a "list" topology, including `PatchList`.
        #[inline]
        pub fn is_list(self) -> bool {
            matches!(
                self,
                Self::PointList
                    | Self::LineList
                    | Self::TriangleList
                    | Self::LineListWithAdjacency
                    | Self::TriangleListWithAdjacency
                    | Self::PatchList
            )
        }

        #[inline]
        pub fn is_patch_list(self) -> bool {
            matches!(self, Self::PatchList)
        }

        /// Returns the class of the topology.
        #[inline]
        pub fn class(self) -> PrimitiveTopologyClass {
            match self {
                Self::PointList => PrimitiveTopologyClass::Point,
                Self::LineList
                | Self::LineStrip
                | Self::LineListWithAdjacency
                | Self::LineStripWithAdjacency => PrimitiveTopologyClass::Line,
                Self::TriangleList
                | Self::TriangleStrip
                | Self::TriangleFan
                | Self::TriangleListWithAdjacency
                | Self::TriangleStripWithAdjacency => PrimitiveTopologyClass::Triangle,
                Self::PatchList => PrimitiveTopologyClass::Patch,
            }
        }
    }
    = PrimitiveTopology(i32);

    /// A series of separate point primitives.
    PointList = POINT_LIST,

    /// A series of separate line primitives.
    LineList = LINE_LIST,

    /// A series of consecutive line primitives, with consecutive lines sharing a vertex.
    LineStrip = LINE_STRIP,

    /// A series of separate triangle primitives.
    TriangleList = TRIANGLE_LIST,

    /// A series of consecutive triangle primitives, with consecutive triangles sharing an edge
    /// (two vertices).
    TriangleStrip = TRIANGLE_STRIP,

    /// A series of consecutive triangle primitives, with all triangles sharing a common vertex
    /// (the first).
    ///
    /// On [portability subset](crate::device::DeviceExtensions::khr_portability_subset)
    /// devices, the [`triangle_fans`](crate::device::DeviceFeatures::triangle_fans) feature
    /// must be enabled on the device.
    TriangleFan = TRIANGLE_FAN,

    /// As `LineList, but with adjacency, used in combination with geometry shaders.
    LineListWithAdjacency = LINE_LIST_WITH_ADJACENCY,

    /// As `LineStrip`, but with adjacency, used in combination with geometry shaders.
    LineStripWithAdjacency = LINE_STRIP_WITH_ADJACENCY,

    /// As `TriangleList`, but with adjacency, used in combination with geometry shaders.
    TriangleListWithAdjacency = TRIANGLE_LIST_WITH_ADJACENCY,

    /// As `TriangleStrip`, but with adjacency, used in combination with geometry shaders.
    TriangleStripWithAdjacency = TRIANGLE_STRIP_WITH_ADJACENCY,

    /// Separate patch primitives, used in combination with tessellation shaders.
    PatchList = PATCH_LIST,
}

/// Describes the shape of a primitive topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveTopologyClass {
    Point,
    Line,
    Triangle,
    Patch,
}

#[cfg(test)]
mod tests {
    use super::{InputAssemblyState, PrimitiveTopology, PrimitiveTopologyClass};
    use crate::{
        device::DeviceCapabilities,
        pipeline::{DynamicState, DynamicStates},
        DefectKind, ValidationReport,
    };

    fn validate(
        state: &InputAssemblyState,
        device: &DeviceCapabilities,
        dynamic_state: &DynamicStates,
    ) -> ValidationReport {
        ValidationReport::collect(|report| state.validate(device, dynamic_state, report))
    }

    #[test]
    fn topology_features() {
        let device = test_device!();
        let none = DynamicStates::new();

        let state =
            InputAssemblyState::new().topology(PrimitiveTopology::TriangleListWithAdjacency);
        let report = validate(&state, &device, &none);
        assert!(report.contains_vuid("VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00429"));
        assert_eq!(report.errors()[0].kind, DefectKind::Capability);

        let device = test_device!(tessellation_shader);
        let state = InputAssemblyState::new().topology(PrimitiveTopology::PatchList);
        assert!(validate(&state, &device, &none).is_valid());
    }

    #[test]
    fn list_restart() {
        let device = test_device!();
        let state = InputAssemblyState::new()
            .topology(PrimitiveTopology::LineList)
            .primitive_restart_enable();

        assert!(validate(&state, &device, &DynamicStates::new())
            .contains_vuid("VUID-VkPipelineInputAssemblyStateCreateInfo-topology-06252"));

        // Checked at draw time instead.
        let dynamic: DynamicStates = [DynamicState::PrimitiveRestartEnable].into_iter().collect();
        assert!(validate(&state, &device, &dynamic).is_valid());

        let strip = InputAssemblyState::new()
            .topology(PrimitiveTopology::TriangleStrip)
            .primitive_restart_enable();
        assert!(validate(&strip, &device, &DynamicStates::new()).is_valid());
    }

    #[test]
    fn patch_list_restart_without_tessellation() {
        let state = InputAssemblyState::new()
            .topology(PrimitiveTopology::PatchList)
            .primitive_restart_enable();

        let report = validate(&state, &test_device!(), &DynamicStates::new());
        assert_eq!(
            report.vuids().collect::<Vec<_>>(),
            [
                "VUID-VkPipelineInputAssemblyStateCreateInfo-topology-00430",
                "VUID-VkPipelineInputAssemblyStateCreateInfo-topology-06253",
            ],
        );
    }

    #[test]
    fn portability_triangle_fans() {
        let state = InputAssemblyState::new().topology(PrimitiveTopology::TriangleFan);

        assert!(validate(&state, &test_device!(), &DynamicStates::new()).is_valid());

        let device = test_device_with_extensions!([], [khr_portability_subset]);
        assert!(validate(&state, &device, &DynamicStates::new())
            .contains_vuid("VUID-VkPipelineInputAssemblyStateCreateInfo-triangleFans-04452"));
    }

    #[test]
    fn classes() {
        assert_eq!(
            PrimitiveTopology::LineStripWithAdjacency.class(),
            PrimitiveTopologyClass::Line,
        );
        assert!(PrimitiveTopology::PatchList.is_list());
        assert!(!PrimitiveTopology::TriangleFan.is_list());
    }
}
