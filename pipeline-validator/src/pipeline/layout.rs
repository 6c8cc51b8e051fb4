//! The layout of descriptor sets and push constants used by a pipeline.
//!
//! When pipeline libraries are linked, the layouts they were created with are compared slot by
//! slot. A slot may be left empty (`None`) only when the `graphics_pipeline_library` feature is
//! enabled, which lets each library leave out the sets that only the other stages use.

use crate::{
    descriptor_set::{DescriptorSetLayout, DescriptorSetLayoutCreateFlags},
    device::DeviceCapabilities,
    macros::vulkan_bitflags,
    shader::ShaderStages,
    Requires, RequiresAllOf, RequiresOneOf, ValidationError,
};
use std::sync::Arc;

/// A snapshot of a pipeline layout.
#[derive(Debug)]
pub struct PipelineLayout {
    flags: PipelineLayoutCreateFlags,
    set_layouts: Vec<Option<Arc<DescriptorSetLayout>>>,
    push_constant_ranges: Vec<PushConstantRange>,
}

impl PipelineLayout {
    /// Creates a new `PipelineLayout`, checking `create_info` first.
    pub fn new(
        device: &DeviceCapabilities,
        create_info: PipelineLayoutCreateInfo,
    ) -> Result<Arc<PipelineLayout>, Box<ValidationError>> {
        create_info
            .validate(device)
            .map_err(|err| err.add_context("create_info"))?;

        Ok(Self::new_unchecked(create_info))
    }

    pub fn new_unchecked(create_info: PipelineLayoutCreateInfo) -> Arc<PipelineLayout> {
        let PipelineLayoutCreateInfo {
            flags,
            set_layouts,
            push_constant_ranges,
            _ne: _,
        } = create_info;

        Arc::new(PipelineLayout {
            flags,
            set_layouts,
            push_constant_ranges,
        })
    }

    /// Returns the flags that the pipeline layout was created with.
    #[inline]
    pub fn flags(&self) -> PipelineLayoutCreateFlags {
        self.flags
    }

    /// Returns the descriptor set layouts of the pipeline layout. Empty slots are `None`.
    #[inline]
    pub fn set_layouts(&self) -> &[Option<Arc<DescriptorSetLayout>>] {
        &self.set_layouts
    }

    /// Returns the push constant ranges, in the order they were declared.
    #[inline]
    pub fn push_constant_ranges(&self) -> &[PushConstantRange] {
        &self.push_constant_ranges
    }

    /// Returns whether the layout was created with `PipelineLayoutCreateFlags::INDEPENDENT_SETS`.
    #[inline]
    pub fn is_independent_sets(&self) -> bool {
        self.flags
            .intersects(PipelineLayoutCreateFlags::INDEPENDENT_SETS)
    }
}

/// Parameters to create a new `PipelineLayout`.
#[derive(Clone, Debug)]
pub struct PipelineLayoutCreateInfo {
    /// Specifies how to create the pipeline layout.
    ///
    /// The default value is empty.
    pub flags: PipelineLayoutCreateFlags,

    /// The descriptor set layouts that should be part of the pipeline layout.
    ///
    /// They are provided in order of set number. A slot may be `None` if the
    /// [`graphics_pipeline_library`](crate::device::DeviceFeatures::graphics_pipeline_library)
    /// feature is enabled.
    ///
    /// The default value is empty.
    pub set_layouts: Vec<Option<Arc<DescriptorSetLayout>>>,

    /// The ranges of push constants that the pipeline will access.
    ///
    /// A shader stage can only appear in one element of the list, but it is possible to combine
    /// ranges for multiple shader stages if they are the same.
    ///
    /// The default value is empty.
    pub push_constant_ranges: Vec<PushConstantRange>,

    pub _ne: crate::NonExhaustive,
}

impl Default for PipelineLayoutCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            flags: PipelineLayoutCreateFlags::empty(),
            set_layouts: Vec::new(),
            push_constant_ranges: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl PipelineLayoutCreateInfo {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let properties = device.properties();

        let &Self {
            flags,
            ref set_layouts,
            ref push_constant_ranges,
            _ne: _,
        } = self;

        flags.validate_device(device).map_err(|err| {
            err.add_context("flags")
                .set_vuids(&["VUID-VkPipelineLayoutCreateInfo-flags-parameter"])
        })?;

        if set_layouts.len() > properties.max_bound_descriptor_sets as usize {
            return Err(Box::new(ValidationError {
                context: "set_layouts".into(),
                problem: "the length exceeds the `max_bound_descriptor_sets` limit".into(),
                vuids: &["VUID-VkPipelineLayoutCreateInfo-setLayoutCount-00286"],
                ..Default::default()
            }));
        }

        let mut has_push_descriptor_set = false;

        for (index, set_layout) in set_layouts.iter().enumerate() {
            let set_layout = match set_layout {
                Some(set_layout) => set_layout,
                None => {
                    if !device.enabled_features().graphics_pipeline_library {
                        return Err(Box::new(ValidationError {
                            context: format!("set_layouts[{}]", index).into(),
                            problem: "is `None`".into(),
                            requires_one_of: RequiresOneOf(&[RequiresAllOf(&[
                                Requires::DeviceFeature("graphics_pipeline_library"),
                            ])]),
                            vuids: &["VUID-VkPipelineLayoutCreateInfo-graphicsPipelineLibrary-06753"],
                            kind: crate::DefectKind::Capability,
                        }));
                    }

                    continue;
                }
            };

            if set_layout
                .flags()
                .intersects(DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR)
            {
                if has_push_descriptor_set {
                    return Err(Box::new(ValidationError {
                        context: "set_layouts".into(),
                        problem: "contains more than one descriptor set layout whose flags \
                            include `DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR`"
                            .into(),
                        vuids: &["VUID-VkPipelineLayoutCreateInfo-pSetLayouts-00293"],
                        ..Default::default()
                    }));
                }

                has_push_descriptor_set = true;
            }
        }

        let mut seen_stages = ShaderStages::empty();

        for (range_index, range) in push_constant_ranges.iter().enumerate() {
            range
                .validate(device)
                .map_err(|err| err.add_context(format!("push_constant_ranges[{}]", range_index)))?;

            if seen_stages.intersects(range.stages) {
                return Err(Box::new(ValidationError {
                    context: "push_constant_ranges".into(),
                    problem: "contains more than one range with the same stage".into(),
                    vuids: &["VUID-VkPipelineLayoutCreateInfo-pPushConstantRanges-00292"],
                    ..Default::default()
                }));
            }

            seen_stages |= range.stages;
        }

        Ok(())
    }
}

vulkan_bitflags! {
    /// Flags that control how a pipeline layout is created.
    PipelineLayoutCreateFlags = PipelineLayoutCreateFlags(u32);

    /// Specifies that the pipeline layout can be used for pipeline libraries whose descriptor
    /// sets were bound independently of each other.
    INDEPENDENT_SETS = INDEPENDENT_SETS_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(graphics_pipeline_library)]),
    ]),
}

/// Description of a range of the push constants of a pipeline layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PushConstantRange {
    /// The stages which can access the range.
    ///
    /// The default value is empty, which must be overridden.
    pub stages: ShaderStages,

    /// Offset in bytes from the start of the push constants to this range.
    ///
    /// The value must be a multiple of 4.
    ///
    /// The default value is `0`.
    pub offset: u32,

    /// Size in bytes of the range.
    ///
    /// The value must be a multiple of 4, and not 0.
    ///
    /// The default value is `0`, which must be overridden.
    pub size: u32,
}

impl Default for PushConstantRange {
    #[inline]
    fn default() -> Self {
        Self {
            stages: ShaderStages::empty(),
            offset: 0,
            size: 0,
        }
    }
}

impl PushConstantRange {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            stages,
            offset,
            size,
        } = self;

        stages.validate_device(device).map_err(|err| {
            err.add_context("stages")
                .set_vuids(&["VUID-VkPushConstantRange-stageFlags-parameter"])
        })?;

        if stages.is_empty() {
            return Err(Box::new(ValidationError {
                context: "stages".into(),
                problem: "is empty".into(),
                vuids: &["VUID-VkPushConstantRange-stageFlags-requiredbitmask"],
                ..Default::default()
            }));
        }

        let max_push_constants_size = device.properties().max_push_constants_size;

        if offset >= max_push_constants_size {
            return Err(Box::new(ValidationError {
                context: "offset".into(),
                problem: "is not less than the `max_push_constants_size` limit".into(),
                vuids: &["VUID-VkPushConstantRange-offset-00294"],
                ..Default::default()
            }));
        }

        if offset % 4 != 0 {
            return Err(Box::new(ValidationError {
                context: "offset".into(),
                problem: "is not a multiple of 4".into(),
                vuids: &["VUID-VkPushConstantRange-offset-00295"],
                ..Default::default()
            }));
        }

        if size == 0 {
            return Err(Box::new(ValidationError {
                context: "size".into(),
                problem: "is zero".into(),
                vuids: &["VUID-VkPushConstantRange-size-00296"],
                ..Default::default()
            }));
        }

        if size % 4 != 0 {
            return Err(Box::new(ValidationError {
                context: "size".into(),
                problem: "is not a multiple of 4".into(),
                vuids: &["VUID-VkPushConstantRange-size-00297"],
                ..Default::default()
            }));
        }

        if size > max_push_constants_size - offset {
            return Err(Box::new(ValidationError {
                problem: "`size` is greater than `max_push_constants_size` limit minus `offset`"
                    .into(),
                vuids: &["VUID-VkPushConstantRange-size-00298"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}
