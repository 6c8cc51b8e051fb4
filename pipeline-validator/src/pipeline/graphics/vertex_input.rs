//! Configures how data from vertex buffers is read into vertex shader input locations.

use crate::{
    device::DeviceCapabilities,
    format::{Format, FormatFeatures},
    macros::vulkan_enum,
    ValidationError, ValidationReport,
};

/// The state in a graphics pipeline describing how the vertex input stage should behave.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexInputState {
    /// The vertex buffer bindings.
    ///
    /// The default value is empty.
    pub bindings: Vec<VertexInputBindingDescription>,

    /// The vertex attributes, each read from one of `bindings`.
    ///
    /// The default value is empty.
    pub attributes: Vec<VertexInputAttributeDescription>,
}

impl VertexInputState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding.
    #[inline]
    pub fn binding(mut self, binding: u32, stride: u32, input_rate: VertexInputRate) -> Self {
        self.bindings.push(VertexInputBindingDescription {
            binding,
            stride,
            input_rate,
        });
        self
    }

    /// Adds an attribute.
    #[inline]
    pub fn attribute(mut self, location: u32, binding: u32, format: Format, offset: u32) -> Self {
        self.attributes.push(VertexInputAttributeDescription {
            location,
            binding,
            format,
            offset,
        });
        self
    }

    pub(crate) fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let Self {
            bindings,
            attributes,
        } = self;

        let properties = device.properties();

        if bindings.len() > properties.max_vertex_input_bindings as usize {
            report.push(Box::new(ValidationError {
                context: "bindings".into(),
                problem: "the length exceeds the `max_vertex_input_bindings` limit".into(),
                vuids: &[
                    "VUID-VkPipelineVertexInputStateCreateInfo-vertexBindingDescriptionCount-00613",
                ],
                ..Default::default()
            }));
        }

        if attributes.len() > properties.max_vertex_input_attributes as usize {
            report.push(Box::new(ValidationError {
                context: "attributes".into(),
                problem: "the length exceeds the `max_vertex_input_attributes` limit".into(),
                vuids: &[
                    "VUID-VkPipelineVertexInputStateCreateInfo-vertexAttributeDescriptionCount-00614",
                ],
                ..Default::default()
            }));
        }

        for (index, binding_desc) in bindings.iter().enumerate() {
            report.scoped(format!("bindings[{}]", index), |report| {
                binding_desc.validate(device, report)
            });

            if bindings[..index]
                .iter()
                .any(|other| other.binding == binding_desc.binding)
            {
                report.push(Box::new(ValidationError {
                    context: "bindings".into(),
                    problem: format!(
                        "binding number {} is described more than once",
                        binding_desc.binding,
                    )
                    .into(),
                    vuids: &[
                        "VUID-VkPipelineVertexInputStateCreateInfo-pVertexBindingDescriptions-00616",
                    ],
                    ..Default::default()
                }));
            }
        }

        for (index, attribute_desc) in attributes.iter().enumerate() {
            report.scoped(format!("attributes[{}]", index), |report| {
                attribute_desc.validate(device, report)
            });

            if attributes[..index]
                .iter()
                .any(|other| other.location == attribute_desc.location)
            {
                report.push(Box::new(ValidationError {
                    context: "attributes".into(),
                    problem: format!(
                        "location {} is described more than once",
                        attribute_desc.location,
                    )
                    .into(),
                    vuids: &[
                        "VUID-VkPipelineVertexInputStateCreateInfo-pVertexAttributeDescriptions-00617",
                    ],
                    ..Default::default()
                }));
            }

            if !bindings
                .iter()
                .any(|binding_desc| binding_desc.binding == attribute_desc.binding)
            {
                report.push(Box::new(ValidationError {
                    context: format!("attributes[{}].binding", index).into(),
                    problem: "does not refer to one of `bindings`".into(),
                    vuids: &["VUID-VkPipelineVertexInputStateCreateInfo-binding-00615"],
                    ..Default::default()
                }));
            }
        }
    }
}

/// Describes a single vertex buffer binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexInputBindingDescription {
    /// The binding number.
    pub binding: u32,

    /// The number of bytes from the start of one element to the start of the next.
    pub stride: u32,

    /// How often the vertex input should advance to the next element.
    pub input_rate: VertexInputRate,
}

impl VertexInputBindingDescription {
    fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            binding,
            stride,
            input_rate,
        } = self;

        let properties = device.properties();

        report.check(input_rate.validate_device(device).map_err(|err| {
            err.add_context("input_rate")
                .set_vuids(&["VUID-VkVertexInputBindingDescription-inputRate-parameter"])
        }));

        if binding >= properties.max_vertex_input_bindings {
            report.push(Box::new(ValidationError {
                context: "binding".into(),
                problem: "is not less than the `max_vertex_input_bindings` limit".into(),
                vuids: &["VUID-VkVertexInputBindingDescription-binding-00618"],
                ..Default::default()
            }));
        }

        if stride > properties.max_vertex_input_binding_stride {
            report.push(Box::new(ValidationError {
                context: "stride".into(),
                problem: "exceeds the `max_vertex_input_binding_stride` limit".into(),
                vuids: &["VUID-VkVertexInputBindingDescription-stride-00619"],
                ..Default::default()
            }));
        }
    }
}

/// Describes a single vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexInputAttributeDescription {
    /// The shader input location that the attribute is read into.
    pub location: u32,

    /// The vertex buffer binding that the attribute is read from.
    pub binding: u32,

    /// How the attribute data is stored in the buffer.
    pub format: Format,

    /// The byte offset of the attribute within an element of the binding.
    pub offset: u32,
}

impl VertexInputAttributeDescription {
    fn validate(&self, device: &DeviceCapabilities, report: &mut ValidationReport) {
        let &Self {
            location,
            binding,
            format,
            offset,
        } = self;

        let properties = device.properties();

        if location >= properties.max_vertex_input_attributes {
            report.push(Box::new(ValidationError {
                context: "location".into(),
                problem: "is not less than the `max_vertex_input_attributes` limit".into(),
                vuids: &["VUID-VkVertexInputAttributeDescription-location-00620"],
                ..Default::default()
            }));
        }

        if binding >= properties.max_vertex_input_bindings {
            report.push(Box::new(ValidationError {
                context: "binding".into(),
                problem: "is not less than the `max_vertex_input_bindings` limit".into(),
                vuids: &["VUID-VkVertexInputAttributeDescription-binding-00621"],
                ..Default::default()
            }));
        }

        if offset > properties.max_vertex_input_attribute_offset {
            report.push(Box::new(ValidationError {
                context: "offset".into(),
                problem: "exceeds the `max_vertex_input_attribute_offset` limit".into(),
                vuids: &["VUID-VkVertexInputAttributeDescription-offset-00622"],
                ..Default::default()
            }));
        }

        if !device
            .format_features(format)
            .intersects(FormatFeatures::VERTEX_BUFFER)
        {
            report.push(Box::new(ValidationError {
                context: "format".into(),
                problem: "the format features do not include `FormatFeatures::VERTEX_BUFFER`"
                    .into(),
                vuids: &["VUID-VkVertexInputAttributeDescription-format-00623"],
                kind: crate::DefectKind::Capability,
                ..Default::default()
            }));
        }
    }
}

vulkan_enum! {
    /// How the vertex source should be unrolled.
    VertexInputRate = VertexInputRate(i32);

    /// Each vertex has its own element.
    Vertex = VERTEX,

    /// Each instance has its own element.
    Instance = INSTANCE,
}

impl Default for VertexInputRate {
    #[inline]
    fn default() -> Self {
        Self::Vertex
    }
}

#[cfg(test)]
mod tests {
    use super::{VertexInputRate, VertexInputState};
    use crate::{format::Format, ValidationReport};

    fn validate(state: &VertexInputState) -> ValidationReport {
        let device = test_device!();
        ValidationReport::collect(|report| state.validate(&device, report))
    }

    #[test]
    fn valid_layout() {
        let state = VertexInputState::new()
            .binding(0, 24, VertexInputRate::Vertex)
            .binding(1, 16, VertexInputRate::Instance)
            .attribute(0, 0, Format::R32G32B32_SFLOAT, 0)
            .attribute(1, 0, Format::R32G32B32_SFLOAT, 12)
            .attribute(2, 1, Format::R32G32B32A32_SFLOAT, 0);

        assert!(validate(&state).is_valid());
    }

    #[test]
    fn unknown_binding() {
        let state = VertexInputState::new()
            .binding(0, 12, VertexInputRate::Vertex)
            .attribute(0, 3, Format::R32G32B32_SFLOAT, 0);

        let report = validate(&state);
        assert!(report.contains_vuid("VUID-VkPipelineVertexInputStateCreateInfo-binding-00615"));
        assert_eq!(report.errors()[0].context, "attributes[0].binding");
    }

    #[test]
    fn duplicate_location_and_bad_format() {
        let duplicate = VertexInputState::new()
            .binding(0, 12, VertexInputRate::Vertex)
            .attribute(4, 0, Format::R32_SFLOAT, 0)
            .attribute(4, 0, Format::R32_SFLOAT, 4);
        assert!(validate(&duplicate).contains_vuid(
            "VUID-VkPipelineVertexInputStateCreateInfo-pVertexAttributeDescriptions-00617"
        ));

        let depth = VertexInputState::new()
            .binding(0, 4, VertexInputRate::Vertex)
            .attribute(0, 0, Format::D32_SFLOAT, 0);
        assert!(validate(&depth).contains_vuid(
            "VUID-VkVertexInputAttributeDescription-format-00623"
        ));
    }

    #[test]
    fn reports_every_bad_description() {
        let state = VertexInputState::new()
            .binding(0, 4096, VertexInputRate::Vertex)
            .binding(0, 12, VertexInputRate::Vertex)
            .attribute(0, 0, Format::D32_SFLOAT, 0)
            .attribute(1, 7, Format::R32_SFLOAT, 0);

        let report = validate(&state);
        assert_eq!(
            report.vuids().collect::<Vec<_>>(),
            [
                "VUID-VkVertexInputBindingDescription-stride-00619",
                "VUID-VkPipelineVertexInputStateCreateInfo-pVertexBindingDescriptions-00616",
                "VUID-VkVertexInputAttributeDescription-format-00623",
                "VUID-VkPipelineVertexInputStateCreateInfo-binding-00615",
            ],
        );
        assert_eq!(report.errors()[0].context, "bindings[0].stride");
        assert_eq!(report.errors()[3].context, "attributes[1].binding");
    }
}
