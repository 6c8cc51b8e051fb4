use super::capability_flags;

capability_flags! {
    /// The device extensions that are enabled.
    DeviceExtensions {
        khr_dynamic_rendering,
        khr_fragment_shading_rate,
        /// The device is a portability-subset implementation, and the features that the subset
        /// makes optional must be checked.
        khr_portability_subset,
        amd_mixed_attachment_samples,
        nv_framebuffer_mixed_samples,
        ext_conservative_rasterization,
        ext_depth_clip_enable,
        ext_depth_range_unrestricted,
        /// Discard rectangles. Spec version 2 of the extension adds the enable and mode dynamic
        /// states.
        ext_discard_rectangles,
        ext_extended_dynamic_state3,
        ext_graphics_pipeline_library,
        ext_line_rasterization,
        ext_mesh_shader,
        ext_pipeline_robustness,
        ext_provoking_vertex,
        ext_sample_locations,
        ext_transform_feedback,
    }
}
