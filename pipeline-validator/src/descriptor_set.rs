//! Snapshots of descriptor set layouts.
//!
//! A pipeline layout refers to descriptor set layouts, and when two pipeline libraries are
//! linked, the layouts that each was created with must be *identically defined*: the same flags,
//! and the same bindings in the same order.

use crate::{
    device::DeviceCapabilities,
    macros::{vulkan_bitflags, vulkan_enum},
    shader::ShaderStages,
    ValidationError,
};
use ash::vk;
use std::sync::Arc;

/// A snapshot of a descriptor set layout.
#[derive(Debug)]
pub struct DescriptorSetLayout {
    flags: DescriptorSetLayoutCreateFlags,
    bindings: Vec<DescriptorSetLayoutBinding>,
}

impl DescriptorSetLayout {
    /// Creates a new `DescriptorSetLayout`, checking `create_info` first.
    pub fn new(
        device: &DeviceCapabilities,
        create_info: DescriptorSetLayoutCreateInfo,
    ) -> Result<Arc<DescriptorSetLayout>, Box<ValidationError>> {
        create_info.validate(device)?;

        Ok(Self::new_unchecked(create_info))
    }

    /// Creates a new `DescriptorSetLayout` without checking `create_info`.
    pub fn new_unchecked(create_info: DescriptorSetLayoutCreateInfo) -> Arc<DescriptorSetLayout> {
        let DescriptorSetLayoutCreateInfo {
            flags,
            bindings,
            _ne: _,
        } = create_info;

        Arc::new(DescriptorSetLayout { flags, bindings })
    }

    /// Returns the flags that the descriptor set layout was created with.
    #[inline]
    pub fn flags(&self) -> DescriptorSetLayoutCreateFlags {
        self.flags
    }

    /// Returns the bindings of the descriptor set layout, in declaration order.
    #[inline]
    pub fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }

    /// Returns the union of the stages of all bindings.
    pub fn stages(&self) -> ShaderStages {
        self.bindings
            .iter()
            .fold(ShaderStages::empty(), |stages, binding| stages | binding.stages)
    }

    /// Returns whether `self` and `other` are defined identically: the same flags, and the same
    /// bindings in the same order.
    #[inline]
    pub fn is_identically_defined(&self, other: &DescriptorSetLayout) -> bool {
        std::ptr::eq(self, other) || (self.flags == other.flags && self.bindings == other.bindings)
    }
}

/// Parameters to create a new `DescriptorSetLayout`.
#[derive(Clone, Debug)]
pub struct DescriptorSetLayoutCreateInfo {
    /// Specifies how to create the descriptor set layout.
    ///
    /// The default value is empty.
    pub flags: DescriptorSetLayoutCreateFlags,

    /// The bindings of the descriptor set layout, in declaration order.
    ///
    /// The default value is empty.
    pub bindings: Vec<DescriptorSetLayoutBinding>,

    pub _ne: crate::NonExhaustive,
}

impl Default for DescriptorSetLayoutCreateInfo {
    #[inline]
    fn default() -> Self {
        Self {
            flags: DescriptorSetLayoutCreateFlags::empty(),
            bindings: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }
}

impl DescriptorSetLayoutCreateInfo {
    pub(crate) fn validate(&self, device: &DeviceCapabilities) -> Result<(), Box<ValidationError>> {
        let &Self {
            flags,
            ref bindings,
            _ne: _,
        } = self;

        flags.validate_device(device).map_err(|err| {
            err.add_context("flags")
                .set_vuids(&["VUID-VkDescriptorSetLayoutCreateInfo-flags-parameter"])
        })?;

        for (index, binding) in bindings.iter().enumerate() {
            if bindings[..index]
                .iter()
                .any(|other| other.binding == binding.binding)
            {
                return Err(Box::new(ValidationError {
                    context: format!("bindings[{}].binding", index).into(),
                    problem: "is not unique among the bindings".into(),
                    vuids: &["VUID-VkDescriptorSetLayoutCreateInfo-binding-00279"],
                    ..Default::default()
                }));
            }

            binding
                .validate()
                .map_err(|err| err.add_context(format!("bindings[{}]", index)))?;
        }

        Ok(())
    }
}

/// A binding in a descriptor set layout.
#[derive(Clone, Debug)]
pub struct DescriptorSetLayoutBinding {
    /// The binding number.
    ///
    /// The default value is `0`.
    pub binding: u32,

    /// Specifies how to create the binding.
    ///
    /// The default value is empty.
    pub binding_flags: DescriptorBindingFlags,

    /// The content and layout of each array element of a binding.
    ///
    /// There is no default value.
    pub descriptor_type: DescriptorType,

    /// How many descriptors (array elements) this binding is made of.
    ///
    /// The default value is `1`.
    pub descriptor_count: u32,

    /// Which shader stages are going to access the descriptors in this binding.
    ///
    /// The default value is [`ShaderStages::empty()`], which must be overridden.
    pub stages: ShaderStages,

    /// Samplers that are included as a fixed part of the descriptor set layout.
    ///
    /// Only meaningful if `descriptor_type` is [`DescriptorType::Sampler`] or
    /// [`DescriptorType::CombinedImageSampler`]. The list must then be either empty, or contain
    /// exactly `descriptor_count` samplers.
    ///
    /// The default value is empty.
    pub immutable_samplers: Vec<vk::Sampler>,

    pub _ne: crate::NonExhaustive,
}

impl DescriptorSetLayoutBinding {
    /// Returns a `DescriptorSetLayoutBinding` with the given type.
    #[inline]
    pub fn descriptor_type(descriptor_type: DescriptorType) -> Self {
        Self {
            binding: 0,
            binding_flags: DescriptorBindingFlags::empty(),
            descriptor_type,
            descriptor_count: 1,
            stages: ShaderStages::empty(),
            immutable_samplers: Vec::new(),
            _ne: crate::NonExhaustive(()),
        }
    }

    fn uses_immutable_samplers(&self) -> bool {
        matches!(
            self.descriptor_type,
            DescriptorType::Sampler | DescriptorType::CombinedImageSampler
        ) && !self.immutable_samplers.is_empty()
    }

    fn validate(&self) -> Result<(), Box<ValidationError>> {
        let &Self {
            binding: _,
            binding_flags: _,
            descriptor_type,
            descriptor_count,
            stages: _,
            ref immutable_samplers,
            _ne: _,
        } = self;

        if matches!(
            descriptor_type,
            DescriptorType::Sampler | DescriptorType::CombinedImageSampler
        ) && !immutable_samplers.is_empty()
            && immutable_samplers.len() != descriptor_count as usize
        {
            return Err(Box::new(ValidationError {
                problem: "`immutable_samplers` is not empty, but its length is not equal to \
                    `descriptor_count`"
                    .into(),
                vuids: &["VUID-VkDescriptorSetLayoutBinding-descriptorType-00282"],
                ..Default::default()
            }));
        }

        Ok(())
    }
}

impl PartialEq for DescriptorSetLayoutBinding {
    /// Compares every field that affects the definition of the binding. Immutable samplers only
    /// take part if the descriptor type can have them.
    fn eq(&self, other: &Self) -> bool {
        self.binding == other.binding
            && self.descriptor_type == other.descriptor_type
            && self.descriptor_count == other.descriptor_count
            && self.stages == other.stages
            && self.binding_flags == other.binding_flags
            && self.uses_immutable_samplers() == other.uses_immutable_samplers()
            && (!self.uses_immutable_samplers()
                || self.immutable_samplers == other.immutable_samplers)
    }
}

impl Eq for DescriptorSetLayoutBinding {}

vulkan_bitflags! {
    /// Flags that control how a descriptor set layout is created.
    DescriptorSetLayoutCreateFlags = DescriptorSetLayoutCreateFlags(u32);

    UPDATE_AFTER_BIND_POOL = UPDATE_AFTER_BIND_POOL
    RequiresOneOf([
        RequiresAllOf([APIVersion(V1_2)]),
    ]),

    PUSH_DESCRIPTOR = PUSH_DESCRIPTOR_KHR,

    /// The layout is used with descriptor buffers instead of descriptor sets.
    DESCRIPTOR_BUFFER = DESCRIPTOR_BUFFER_EXT
    RequiresOneOf([
        RequiresAllOf([DeviceFeature(descriptor_buffer)]),
    ]),
}

vulkan_bitflags! {
    /// Flags that control how a binding in a descriptor set layout is created.
    DescriptorBindingFlags = DescriptorBindingFlags(u32);

    UPDATE_AFTER_BIND = UPDATE_AFTER_BIND,
    UPDATE_UNUSED_WHILE_PENDING = UPDATE_UNUSED_WHILE_PENDING,
    PARTIALLY_BOUND = PARTIALLY_BOUND,
    VARIABLE_DESCRIPTOR_COUNT = VARIABLE_DESCRIPTOR_COUNT,
}

vulkan_enum! {
    /// Describes what kind of resource may later be bound to a descriptor.
    DescriptorType = DescriptorType(i32);

    Sampler = SAMPLER,
    CombinedImageSampler = COMBINED_IMAGE_SAMPLER,
    SampledImage = SAMPLED_IMAGE,
    StorageImage = STORAGE_IMAGE,
    UniformTexelBuffer = UNIFORM_TEXEL_BUFFER,
    StorageTexelBuffer = STORAGE_TEXEL_BUFFER,
    UniformBuffer = UNIFORM_BUFFER,
    StorageBuffer = STORAGE_BUFFER,
    UniformBufferDynamic = UNIFORM_BUFFER_DYNAMIC,
    StorageBufferDynamic = STORAGE_BUFFER_DYNAMIC,
    InputAttachment = INPUT_ATTACHMENT,
}

#[cfg(test)]
mod tests {
    use super::{
        DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutCreateFlags,
        DescriptorSetLayoutCreateInfo, DescriptorType,
    };
    use crate::shader::ShaderStages;
    use ash::vk::{self, Handle};

    fn uniform(binding: u32, stages: ShaderStages) -> DescriptorSetLayoutBinding {
        DescriptorSetLayoutBinding {
            binding,
            stages,
            ..DescriptorSetLayoutBinding::descriptor_type(DescriptorType::UniformBuffer)
        }
    }

    #[test]
    fn identically_defined_is_order_sensitive() {
        let a = DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
            bindings: vec![
                uniform(0, ShaderStages::VERTEX),
                uniform(1, ShaderStages::FRAGMENT),
            ],
            ..Default::default()
        });
        let b = DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
            bindings: vec![
                uniform(1, ShaderStages::FRAGMENT),
                uniform(0, ShaderStages::VERTEX),
            ],
            ..Default::default()
        });
        let c = DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
            bindings: a.bindings().to_vec(),
            ..Default::default()
        });

        assert!(a.is_identically_defined(&a));
        assert!(a.is_identically_defined(&c));
        assert!(!a.is_identically_defined(&b));
        assert_eq!(a.stages(), ShaderStages::VERTEX | ShaderStages::FRAGMENT);
    }

    #[test]
    fn flags_take_part() {
        let bindings = vec![uniform(0, ShaderStages::VERTEX)];
        let a = DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
            bindings: bindings.clone(),
            ..Default::default()
        });
        let b = DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
            flags: DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR,
            bindings,
            ..Default::default()
        });

        assert!(!a.is_identically_defined(&b));
    }

    #[test]
    fn immutable_samplers_ignored_for_buffers() {
        let mut a = uniform(0, ShaderStages::VERTEX);
        let b = a.clone();
        a.immutable_samplers = vec![vk::Sampler::from_raw(7)];
        assert_eq!(a, b);

        let mut c = DescriptorSetLayoutBinding::descriptor_type(DescriptorType::Sampler);
        let d = c.clone();
        c.immutable_samplers = vec![vk::Sampler::from_raw(7)];
        assert_ne!(c, d);
    }

    #[test]
    fn duplicate_binding_numbers() {
        let device = test_device!();
        let err = DescriptorSetLayout::new(
            &device,
            DescriptorSetLayoutCreateInfo {
                bindings: vec![
                    uniform(3, ShaderStages::VERTEX),
                    uniform(3, ShaderStages::FRAGMENT),
                ],
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(err.has_vuid("VUID-VkDescriptorSetLayoutCreateInfo-binding-00279"));
    }
}
