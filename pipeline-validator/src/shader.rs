//! Shader stages.

use crate::macros::vulkan_bitflags_enum;

vulkan_bitflags_enum! {
    /// A set of [`ShaderStage`] values.
    ShaderStages impl {
        /// The stages that belong to the pre-rasterization shader sub-state of a pipeline.
        pub const PRE_RASTERIZATION: ShaderStages = ShaderStages::VERTEX
            .union(ShaderStages::TESSELLATION_CONTROL)
            .union(ShaderStages::TESSELLATION_EVALUATION)
            .union(ShaderStages::GEOMETRY)
            .union(ShaderStages::TASK)
            .union(ShaderStages::MESH);

        /// The stages of the classic vertex processing pipeline.
        pub const VERTEX_FAMILY: ShaderStages = ShaderStages::VERTEX
            .union(ShaderStages::TESSELLATION_CONTROL)
            .union(ShaderStages::TESSELLATION_EVALUATION)
            .union(ShaderStages::GEOMETRY);

        /// The stages of the mesh processing pipeline.
        pub const MESH_FAMILY: ShaderStages = ShaderStages::TASK.union(ShaderStages::MESH);

        /// The stages that may appear in a graphics pipeline.
        pub const ALL_GRAPHICS: ShaderStages =
            ShaderStages::PRE_RASTERIZATION.union(ShaderStages::FRAGMENT);
    },

    /// A single shader stage.
    ShaderStage,

    = ShaderStageFlags(u32);

    VERTEX, Vertex = VERTEX,
    TESSELLATION_CONTROL, TessellationControl = TESSELLATION_CONTROL,
    TESSELLATION_EVALUATION, TessellationEvaluation = TESSELLATION_EVALUATION,
    GEOMETRY, Geometry = GEOMETRY,
    FRAGMENT, Fragment = FRAGMENT,
    COMPUTE, Compute = COMPUTE,
    RAYGEN, Raygen = RAYGEN_KHR,
    TASK, Task = TASK_EXT,
    MESH, Mesh = MESH_EXT,
}
