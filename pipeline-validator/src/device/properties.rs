/// The limits of a device.
///
/// The default values are the minimums that the Vulkan specification requires of every
/// implementation. Limits that only exist when an extension is supported are `None` by default.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceProperties {
    pub max_bound_descriptor_sets: u32,
    pub max_push_constants_size: u32,
    pub max_vertex_input_bindings: u32,
    pub max_vertex_input_attributes: u32,
    pub max_vertex_input_binding_stride: u32,
    pub max_vertex_input_attribute_offset: u32,
    pub max_tessellation_patch_size: u32,
    pub max_viewports: u32,
    pub max_viewport_dimensions: [u32; 2],
    pub max_color_attachments: u32,
    pub max_multiview_view_count: u32,

    /// The maximum number of discard rectangles, if `ext_discard_rectangles` is supported.
    pub max_discard_rectangles: Option<u32>,
    pub max_extra_primitive_overestimation_size: Option<f32>,
    pub max_transform_feedback_streams: Option<u32>,
    pub fragment_shading_rate_non_trivial_combiner_ops: Option<bool>,
    /// Whether a pipeline with a dynamic primitive topology may draw with a topology of
    /// a different class.
    pub dynamic_primitive_topology_unrestricted: Option<bool>,
}

impl Default for DeviceProperties {
    #[inline]
    fn default() -> Self {
        Self {
            max_bound_descriptor_sets: 4,
            max_push_constants_size: 128,
            max_vertex_input_bindings: 16,
            max_vertex_input_attributes: 16,
            max_vertex_input_binding_stride: 2048,
            max_vertex_input_attribute_offset: 2047,
            max_tessellation_patch_size: 32,
            max_viewports: 16,
            max_viewport_dimensions: [4096, 4096],
            max_color_attachments: 4,
            max_multiview_view_count: 6,
            max_discard_rectangles: None,
            max_extra_primitive_overestimation_size: None,
            max_transform_feedback_streams: None,
            fragment_shading_rate_non_trivial_combiner_ops: None,
            dynamic_primitive_topology_unrestricted: None,
        }
    }
}
