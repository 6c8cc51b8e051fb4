//! Describes a processing operation that will execute on the Vulkan device.
//!
//! Only graphics pipelines are covered. See [`graphics`] for the legality checks performed when
//! one is created, and [`crate::command_buffer`] for the checks performed when one is drawn with.

use crate::{
    device::DeviceCapabilities, macros::vulkan_bitflags, shader::ShaderStage, DefectKind,
    Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};

pub mod dynamic_state;
pub mod graphics;
pub mod layout;

pub use self::dynamic_state::{DynamicState, DynamicStates};

vulkan_bitflags! {
    /// Flags specifying how a pipeline is created.
    PipelineCreateFlags = PipelineCreateFlags(u32);

    /// The pipeline will not be optimized.
    DISABLE_OPTIMIZATION = DISABLE_OPTIMIZATION,

    /// Derivative pipelines can be created using this pipeline as a base.
    ALLOW_DERIVATIVES = ALLOW_DERIVATIVES,

    /// Create the pipeline by deriving from a base pipeline.
    DERIVATIVE = DERIVATIVE,

    /// Statistics and internal representations are captured from the pipeline.
    CAPTURE_INTERNAL_REPRESENTATIONS = CAPTURE_INTERNAL_REPRESENTATIONS_KHR,

    /// The pipeline is a library that cannot be bound, only linked into other pipelines.
    LIBRARY = LIBRARY_KHR,

    /// The pipeline uses descriptor buffers instead of descriptor sets.
    DESCRIPTOR_BUFFER = DESCRIPTOR_BUFFER_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(descriptor_buffer)]),
    ]),

    /// Information needed for link time optimization is kept in the library.
    RETAIN_LINK_TIME_OPTIMIZATION_INFO = RETAIN_LINK_TIME_OPTIMIZATION_INFO_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(graphics_pipeline_library)]),
    ]),

    /// Libraries linked into the pipeline are optimized as a whole.
    LINK_TIME_OPTIMIZATION = LINK_TIME_OPTIMIZATION_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(graphics_pipeline_library)]),
    ]),
}

/// Specifies a single shader stage when creating a pipeline.
#[derive(Clone, Debug)]
pub struct PipelineShaderStageCreateInfo {
    /// The stage that the shader is executed in.
    pub stage: ShaderStage,

    /// The name of the entry point in the shader module.
    ///
    /// The default value is `"main"`.
    pub entry_point_name: String,

    pub _ne: crate::NonExhaustive,
}

impl PipelineShaderStageCreateInfo {
    /// Returns a `PipelineShaderStageCreateInfo` for `stage`, with the `main` entry point.
    #[inline]
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            entry_point_name: "main".to_owned(),
            _ne: crate::NonExhaustive(()),
        }
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            stage,
            ref entry_point_name,
            _ne: _,
        } = self;

        if entry_point_name.is_empty() {
            report.push(Box::new(ValidationError {
                context: "entry_point_name".into(),
                problem: "is empty".into(),
                vuids: &["VUID-VkPipelineShaderStageCreateInfo-pName-parameter"],
                ..Default::default()
            }));
        }

        let features = device.enabled_features();

        let requirement: Option<(&'static str, &'static [&'static str], RequiresOneOf)> =
            match stage {
                ShaderStage::Geometry if !features.geometry_shader => Some((
                    "is `ShaderStage::Geometry`",
                    &["VUID-VkPipelineShaderStageCreateInfo-stage-00704"],
                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                        "geometry_shader",
                    )])]),
                )),
                ShaderStage::TessellationControl | ShaderStage::TessellationEvaluation
                    if !features.tessellation_shader =>
                {
                    Some((
                        "is a tessellation stage",
                        &["VUID-VkPipelineShaderStageCreateInfo-stage-00705"],
                        RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
                            "tessellation_shader",
                        )])]),
                    ))
                }
                ShaderStage::Mesh if !features.mesh_shader => Some((
                    "is `ShaderStage::Mesh`",
                    &["VUID-VkPipelineShaderStageCreateInfo-stage-02091"],
                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("mesh_shader")])]),
                )),
                ShaderStage::Task if !features.task_shader => Some((
                    "is `ShaderStage::Task`",
                    &["VUID-VkPipelineShaderStageCreateInfo-stage-02092"],
                    RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature("task_shader")])]),
                )),
                _ => None,
            };

        if let Err(err) = stage.validate_device(device) {
            report.push(
                err.add_context("stage")
                    .set_vuids(&["VUID-VkPipelineShaderStageCreateInfo-stage-parameter"]),
            );
        } else if let Some((problem, vuids, requires_one_of)) = requirement {
            report.push(Box::new(ValidationError {
                context: "stage".into(),
                problem: problem.into(),
                requires_one_of,
                vuids,
                kind: DefectKind::Capability,
            }));
        }
    }
}
