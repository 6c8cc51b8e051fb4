use super::capability_flags;

capability_flags! {
    /// The device features that are enabled.
    ///
    /// Members are named after the `VkPhysicalDevice*Features` members in snake case, so that
    /// rule tables can refer to them by name.
    DeviceFeatures {
        robust_buffer_access,
        /// Enables geometry shaders.
        geometry_shader,
        /// Enables tessellation control and evaluation shaders.
        tessellation_shader,
        sample_rate_shading,
        dual_src_blend,
        logic_op,
        depth_clamp,
        depth_bias_clamp,
        /// Enables `PolygonMode::Line` and `PolygonMode::Point`.
        fill_mode_non_solid,
        depth_bounds,
        wide_lines,
        alpha_to_one,
        multi_viewport,
        independent_blend,

        multiview,
        multiview_geometry_shader,
        multiview_tessellation_shader,

        dynamic_rendering,
        robust_image_access,
        /// Enables the `VK_EXT_extended_dynamic_state` dynamic states.
        extended_dynamic_state,
        /// Enables the core `VK_EXT_extended_dynamic_state2` dynamic states.
        extended_dynamic_state2,
        extended_dynamic_state2_logic_op,
        extended_dynamic_state2_patch_control_points,

        extended_dynamic_state3_tessellation_domain_origin,
        extended_dynamic_state3_depth_clamp_enable,
        extended_dynamic_state3_polygon_mode,
        extended_dynamic_state3_rasterization_samples,
        extended_dynamic_state3_sample_mask,
        extended_dynamic_state3_alpha_to_coverage_enable,
        extended_dynamic_state3_alpha_to_one_enable,
        extended_dynamic_state3_logic_op_enable,
        extended_dynamic_state3_color_blend_enable,
        extended_dynamic_state3_color_blend_equation,
        extended_dynamic_state3_color_write_mask,
        extended_dynamic_state3_rasterization_stream,
        extended_dynamic_state3_conservative_rasterization_mode,
        extended_dynamic_state3_extra_primitive_overestimation_size,
        extended_dynamic_state3_depth_clip_enable,
        extended_dynamic_state3_sample_locations_enable,
        extended_dynamic_state3_color_blend_advanced,
        extended_dynamic_state3_provoking_vertex_mode,
        extended_dynamic_state3_line_rasterization_mode,
        extended_dynamic_state3_line_stipple_enable,
        extended_dynamic_state3_depth_clip_negative_one_to_one,

        vertex_input_dynamic_state,
        color_write_enable,
        attachment_feedback_loop_dynamic_state,

        /// Allows pipelines to be created as partial-pipeline libraries and linked together.
        graphics_pipeline_library,
        /// Allows the fragment formats of a dynamic rendering pass to contain attachments that
        /// the bound pipeline does not write to.
        dynamic_rendering_unused_attachments,
        descriptor_buffer,

        task_shader,
        mesh_shader,
        multiview_mesh_shader,

        pipeline_fragment_shading_rate,
        primitive_fragment_shading_rate,
        attachment_fragment_shading_rate,

        primitive_topology_list_restart,
        primitive_topology_patch_list_restart,
        /// Only meaningful on portability-subset devices.
        triangle_fans,

        rectangular_lines,
        bresenham_lines,
        smooth_lines,
        stippled_rectangular_lines,
        stippled_bresenham_lines,
        stippled_smooth_lines,

        depth_clip_enable,
        depth_clip_control,
        provoking_vertex_last,
        geometry_streams,

        pipeline_robustness,
        robust_buffer_access2,
        robust_image_access2,
    }
}
