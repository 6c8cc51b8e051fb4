use super::{
    color_blend::{AttachmentBlend, ColorBlendAttachmentState, ColorBlendState},
    fragment_shading_rate::FragmentShadingRateState,
    input_assembly::{InputAssemblyState, PrimitiveTopology},
    library::first_difference,
    multisample::MultisampleState,
    rasterization::RasterizationState,
    subpass::PipelineRenderingCreateInfo,
    validate_create_graphics_pipelines,
    vertex_input::VertexInputState,
    viewport::ViewportState,
    ExtensionChain, GraphicsPipeline, GraphicsPipelineCreateInfo,
    GraphicsPipelineLibraryCreateInfo, GraphicsPipelineLibraryFlags, PipelineLibraryCreateInfo,
};
use crate::{
    descriptor_set::{
        DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutCreateFlags,
        DescriptorSetLayoutCreateInfo, DescriptorType,
    },
    format::Format,
    image::{ImageLayout, SampleCount},
    object_table::{ObjectRegistry, ObjectTable},
    pipeline::{
        layout::{
            PipelineLayout, PipelineLayoutCreateFlags, PipelineLayoutCreateInfo,
            PushConstantRange,
        },
        DynamicState, PipelineCreateFlags, PipelineShaderStageCreateInfo,
    },
    render_pass::{
        AttachmentDescription, AttachmentReference, RenderPass, RenderPassCreateInfo,
        SubpassDescription,
    },
    shader::{ShaderStage, ShaderStages},
    DefectKind, ValidationReport,
};
use ash::vk::{self, Handle};
use std::sync::Arc;

fn rendering_info() -> PipelineRenderingCreateInfo {
    PipelineRenderingCreateInfo {
        color_attachment_formats: vec![Some(Format::R8G8B8A8_UNORM)],
        ..Default::default()
    }
}

fn empty_layout(objects: &ObjectRegistry) -> vk::PipelineLayout {
    objects.insert(PipelineLayout::new_unchecked(
        PipelineLayoutCreateInfo::default(),
    ))
}

fn layout_with_set_flags(
    objects: &ObjectRegistry,
    flags: DescriptorSetLayoutCreateFlags,
) -> vk::PipelineLayout {
    let set_layout = DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
        flags,
        ..Default::default()
    });

    objects.insert(PipelineLayout::new_unchecked(PipelineLayoutCreateInfo {
        set_layouts: vec![Some(set_layout)],
        ..Default::default()
    }))
}

fn stages(stages: &[ShaderStage]) -> impl Iterator<Item = PipelineShaderStageCreateInfo> + '_ {
    stages.iter().copied().map(PipelineShaderStageCreateInfo::new)
}

/// A complete pipeline that draws to one color attachment with dynamic rendering.
fn complete_create_info(layout: vk::PipelineLayout) -> GraphicsPipelineCreateInfo {
    GraphicsPipelineCreateInfo {
        stages: stages(&[ShaderStage::Vertex, ShaderStage::Fragment]).collect(),
        vertex_input_state: Some(VertexInputState::new()),
        input_assembly_state: Some(InputAssemblyState::new()),
        viewport_state: Some(ViewportState::new()),
        rasterization_state: Some(RasterizationState::new()),
        multisample_state: Some(MultisampleState::new()),
        color_blend_state: Some(ColorBlendState::new(1)),
        next: ExtensionChain::new().with(rendering_info()),
        ..GraphicsPipelineCreateInfo::layout(layout)
    }
}

/// The create info of a library that defines `flags`, taken from a complete create info.
fn library_create_info(
    flags: GraphicsPipelineLibraryFlags,
    layout: vk::PipelineLayout,
) -> GraphicsPipelineCreateInfo {
    let mut create_info = complete_create_info(layout);
    create_info.flags = PipelineCreateFlags::LIBRARY;
    create_info.stages.retain(|stage| match stage.stage {
        ShaderStage::Fragment => flags.intersects(GraphicsPipelineLibraryFlags::FRAGMENT_SHADER),
        _ => flags.intersects(GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS),
    });
    create_info
        .next
        .push(GraphicsPipelineLibraryCreateInfo::new(flags));

    create_info
}

fn insert_library(objects: &ObjectRegistry, create_info: GraphicsPipelineCreateInfo) -> vk::Pipeline {
    objects.insert(GraphicsPipeline::new_unchecked(objects, create_info))
}

/// A pipeline that defines nothing itself, and links `libraries`.
fn linked_create_info(libraries: Vec<vk::Pipeline>) -> GraphicsPipelineCreateInfo {
    GraphicsPipelineCreateInfo {
        next: ExtensionChain::new().with(PipelineLibraryCreateInfo::new(libraries)),
        ..Default::default()
    }
}

/// A pipeline that defines `flags` itself, and takes the other sub-states from `libraries`.
fn partial_create_info(
    flags: GraphicsPipelineLibraryFlags,
    layout: vk::PipelineLayout,
    libraries: Vec<vk::Pipeline>,
) -> GraphicsPipelineCreateInfo {
    let mut create_info = library_create_info(flags, layout);
    create_info.flags = PipelineCreateFlags::empty();
    create_info
        .next
        .push(PipelineLibraryCreateInfo::new(libraries));

    create_info
}

fn independent_layout(
    objects: &ObjectRegistry,
    set_layouts: Vec<Option<Arc<DescriptorSetLayout>>>,
    push_constant_ranges: Vec<PushConstantRange>,
) -> vk::PipelineLayout {
    objects.insert(PipelineLayout::new_unchecked(PipelineLayoutCreateInfo {
        flags: PipelineLayoutCreateFlags::INDEPENDENT_SETS,
        set_layouts,
        push_constant_ranges,
        ..Default::default()
    }))
}

fn set_layout(descriptor_type: DescriptorType, stages: ShaderStages) -> Arc<DescriptorSetLayout> {
    DescriptorSetLayout::new_unchecked(DescriptorSetLayoutCreateInfo {
        bindings: vec![DescriptorSetLayoutBinding {
            stages,
            ..DescriptorSetLayoutBinding::descriptor_type(descriptor_type)
        }],
        ..Default::default()
    })
}

/// A render pass with one color attachment, and a depth attachment of `depth_format` if given.
/// The only subpass uses `view_mask`.
fn single_subpass_render_pass(
    objects: &ObjectRegistry,
    depth_format: Option<Format>,
    view_mask: u32,
) -> vk::RenderPass {
    let mut attachments = vec![AttachmentDescription::new(
        Format::R8G8B8A8_UNORM,
        SampleCount::Sample1,
    )];
    attachments.extend(
        depth_format.map(|format| AttachmentDescription::new(format, SampleCount::Sample1)),
    );

    objects.insert(RenderPass::new_unchecked(RenderPassCreateInfo {
        attachments,
        subpasses: vec![SubpassDescription {
            view_mask,
            color_attachments: vec![Some(AttachmentReference::new(
                0,
                ImageLayout::ColorAttachmentOptimal,
            ))],
            depth_stencil_attachment: depth_format.map(|_| {
                AttachmentReference::new(1, ImageLayout::DepthStencilAttachmentOptimal)
            }),
            ..Default::default()
        }],
        ..Default::default()
    }))
}

fn vuids(report: &ValidationReport) -> Vec<&'static str> {
    let mut vuids: Vec<_> = report.vuids().collect();
    vuids.sort_unstable();
    vuids
}

#[test]
fn complete_pipeline() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);

    let pipeline = GraphicsPipeline::new(&device, &objects, complete_create_info(layout)).unwrap();

    assert!(!pipeline.is_library());
    assert_eq!(pipeline.library_flags(), GraphicsPipelineLibraryFlags::all());
    assert_eq!(
        pipeline.stages(),
        ShaderStages::VERTEX | ShaderStages::FRAGMENT,
    );
    assert!(pipeline.pre_rasterization().unwrap().is_owned());
    assert!(pipeline.layout().is_some());
    assert_eq!(pipeline.color_blend_state().unwrap().attachments.len(), 1);
}

#[test]
fn missing_rasterization_state() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        rasterization_state: None,
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pRasterizationState-09040"));

    let err = GraphicsPipeline::new(&device, &objects, create_info).unwrap_err();
    assert!(!err.report.is_valid());
}

#[test]
fn stage_rules() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);

    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[ShaderStage::Vertex, ShaderStage::Vertex, ShaderStage::Fragment]).collect(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        report.count_vuid("VUID-VkGraphicsPipelineCreateInfo-stage-00726"),
        1,
    );

    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[ShaderStage::Fragment, ShaderStage::Compute]).collect(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-stage-00728"));
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-stage-02096"));

    let device = test_device!(tessellation_shader);
    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[
            ShaderStage::Vertex,
            ShaderStage::TessellationControl,
            ShaderStage::Fragment,
        ])
        .collect(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-00729"));

    // The topology is a triangle list, but the pipeline tessellates.
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-00736"));
}

#[test]
fn patch_list_without_tessellation() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        input_assembly_state: Some(InputAssemblyState {
            topology: PrimitiveTopology::PatchList,
            ..Default::default()
        }),
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-topology-08889"));

    let create_info = GraphicsPipelineCreateInfo {
        dynamic_state: vec![DynamicState::PrimitiveTopology],
        ..create_info
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(!report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-topology-08889"));
}

#[test]
fn mesh_pipeline_ignores_vertex_input() {
    let device = test_device!(mesh_shader);
    let objects = ObjectRegistry::new();

    // Neither state is usable here, and neither is looked at.
    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[ShaderStage::Mesh, ShaderStage::Fragment]).collect(),
        input_assembly_state: Some(InputAssemblyState {
            topology: PrimitiveTopology::PatchList,
            primitive_restart_enable: true,
            ..Default::default()
        }),
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.is_valid(), "{:?}", report);

    let create_info = GraphicsPipelineCreateInfo {
        vertex_input_state: None,
        input_assembly_state: None,
        ..create_info
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.is_valid(), "{:?}", report);
}

#[test]
fn vertex_pipeline_needs_vertex_input() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        vertex_input_state: None,
        input_assembly_state: None,
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-02097"));
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-02098"));
}

#[test]
fn unresolved_handles() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        render_pass: vk::RenderPass::from_raw(0xdead),
        ..complete_create_info(vk::PipelineLayout::from_raw(0xbeef))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    let resolution: Vec<_> = report
        .errors()
        .iter()
        .filter(|err| err.kind == DefectKind::Resolution)
        .map(|err| err.vuids[0])
        .collect();
    assert_eq!(
        resolution,
        [
            "VUID-VkGraphicsPipelineCreateInfo-layout-parameter",
            "VUID-VkGraphicsPipelineCreateInfo-renderPass-06603",
        ],
    );

    let create_info = complete_create_info(vk::PipelineLayout::null());
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-layout-06602"));
}

#[test]
fn dynamic_rendering_requires_feature() {
    let device = crate::device::DeviceCapabilities::new(crate::Version::V1_3).with_common_formats();
    let objects = ObjectRegistry::new();
    let create_info = complete_create_info(empty_layout(&objects));

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-dynamicRendering-06576"));
}

#[test]
fn color_blend_against_render_target() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);

    let create_info = GraphicsPipelineCreateInfo {
        color_blend_state: Some(ColorBlendState::new(2)),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-06055"));

    let create_info = GraphicsPipelineCreateInfo {
        color_blend_state: Some(ColorBlendState::with_attachment_states(
            1,
            ColorBlendAttachmentState {
                blend: Some(AttachmentBlend::alpha()),
                ..Default::default()
            },
        )),
        next: ExtensionChain::new().with(PipelineRenderingCreateInfo {
            color_attachment_formats: vec![Some(Format::R8G8B8A8_UINT)],
            ..Default::default()
        }),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-06062"));

    let create_info = GraphicsPipelineCreateInfo {
        color_blend_state: None,
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-09037"));
}

#[test]
fn subpass_sample_count() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let render_pass = objects.insert(RenderPass::new_unchecked(RenderPassCreateInfo {
        attachments: vec![AttachmentDescription::new(
            Format::R8G8B8A8_UNORM,
            SampleCount::Sample4,
        )],
        subpasses: vec![SubpassDescription {
            color_attachments: vec![Some(AttachmentReference::new(
                0,
                ImageLayout::ColorAttachmentOptimal,
            ))],
            ..Default::default()
        }],
        ..Default::default()
    }));

    let create_info = GraphicsPipelineCreateInfo {
        render_pass,
        next: ExtensionChain::new(),
        ..complete_create_info(empty_layout(&objects))
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-subpass-00757"]);

    let create_info = GraphicsPipelineCreateInfo {
        multisample_state: Some(MultisampleState::with_samples(SampleCount::Sample4)),
        ..create_info
    };
    assert!(GraphicsPipeline::validate_new(&device, &objects, &create_info).is_valid());

    let create_info = GraphicsPipelineCreateInfo {
        subpass: 1,
        ..create_info
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-06046"));
}

#[test]
fn rasterizer_discard_skips_fragment_states() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[ShaderStage::Vertex]).collect(),
        viewport_state: None,
        rasterization_state: Some(RasterizationState {
            rasterizer_discard_enable: true,
            ..RasterizationState::new()
        }),
        multisample_state: None,
        color_blend_state: None,
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.is_valid(), "{:?}", report);
}

#[test]
fn derivatives() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);

    let create_infos = [
        complete_create_info(layout),
        GraphicsPipelineCreateInfo {
            flags: PipelineCreateFlags::DERIVATIVE,
            base_pipeline_index: 0,
            ..complete_create_info(layout)
        },
        GraphicsPipelineCreateInfo {
            flags: PipelineCreateFlags::DERIVATIVE,
            base_pipeline_index: 2,
            ..complete_create_info(layout)
        },
        GraphicsPipelineCreateInfo {
            flags: PipelineCreateFlags::DERIVATIVE,
            ..complete_create_info(layout)
        },
    ];

    let report = validate_create_graphics_pipelines(&device, &objects, &create_infos);
    let found: Vec<_> = report
        .errors()
        .iter()
        .map(|err| (err.context.as_ref(), err.vuids[0]))
        .collect();
    assert_eq!(
        found,
        [
            (
                "create_infos[1].base_pipeline_index",
                "VUID-vkCreateGraphicsPipelines-flags-00721",
            ),
            (
                "create_infos[2].base_pipeline_index",
                "VUID-vkCreateGraphicsPipelines-flags-00720",
            ),
            (
                "create_infos[3]",
                "VUID-VkGraphicsPipelineCreateInfo-flags-07984",
            ),
        ],
    );

    let base = {
        let mut create_info = complete_create_info(layout);
        create_info.flags = PipelineCreateFlags::ALLOW_DERIVATIVES;
        objects.insert(GraphicsPipeline::new(&device, &objects, create_info).unwrap())
    };
    let create_info = GraphicsPipelineCreateInfo {
        flags: PipelineCreateFlags::DERIVATIVE,
        base_pipeline_handle: base,
        ..complete_create_info(layout)
    };
    assert!(GraphicsPipeline::validate_new(&device, &objects, &create_info).is_valid());
}

#[test]
fn libraries_require_feature() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = library_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
        empty_layout(&objects),
    );

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06606"],
    );
    assert_eq!(report.errors()[0].kind, DefectKind::Capability);

    let device = test_device!(graphics_pipeline_library);
    assert!(GraphicsPipeline::validate_new(&device, &objects, &create_info).is_valid());
}

/// Creates one library for each sub-state. The pre-rasterization and fragment shader libraries
/// use the given layouts.
fn split_libraries(
    device: &crate::device::DeviceCapabilities,
    objects: &ObjectRegistry,
    pre_rasterization_layout: vk::PipelineLayout,
    fragment_layout: vk::PipelineLayout,
) -> Vec<vk::Pipeline> {
    let parts = [
        (
            GraphicsPipelineLibraryFlags::VERTEX_INPUT_INTERFACE,
            vk::PipelineLayout::null(),
        ),
        (
            GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS,
            pre_rasterization_layout,
        ),
        (GraphicsPipelineLibraryFlags::FRAGMENT_SHADER, fragment_layout),
        (
            GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
            vk::PipelineLayout::null(),
        ),
    ];

    parts
        .into_iter()
        .map(|(flags, layout)| {
            let create_info = library_create_info(flags, layout);
            let report = GraphicsPipeline::validate_new(device, objects, &create_info);
            assert!(report.is_valid(), "{:?}: {:?}", flags, report);

            insert_library(objects, create_info)
        })
        .collect()
}

#[test]
fn linked_pipeline() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);

    let pipeline =
        GraphicsPipeline::new(&device, &objects, linked_create_info(libraries.clone())).unwrap();

    assert_eq!(pipeline.library_flags(), GraphicsPipelineLibraryFlags::all());
    assert_eq!(
        pipeline.stages(),
        ShaderStages::VERTEX | ShaderStages::FRAGMENT,
    );

    let fragment_library = objects.get::<GraphicsPipeline>(libraries[2]).unwrap();
    let fragment_shader = pipeline.fragment_shader().unwrap();
    assert!(!fragment_shader.is_owned());
    assert!(Arc::ptr_eq(
        fragment_shader.library().unwrap(),
        &fragment_library,
    ));
    assert!(Arc::ptr_eq(
        fragment_shader.arc(),
        fragment_library.fragment_shader().unwrap().arc(),
    ));
}

#[test]
fn stage_union_over_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);

    let union = libraries
        .iter()
        .map(|&library| objects.get::<GraphicsPipeline>(library).unwrap().stages())
        .fold(ShaderStages::empty(), |stages, library_stages| stages | library_stages);

    let pipeline = GraphicsPipeline::new_unchecked(&objects, linked_create_info(libraries));
    assert_eq!(pipeline.stages(), union);
}

#[test]
fn incomplete_linked_pipeline() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, layout, layout);
    libraries.truncate(2);

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06640"]);
}

#[test]
fn sub_state_defined_twice() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, layout, layout);
    libraries.push(libraries[1]);

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06611"],
    );
}

#[test]
fn different_layouts_across_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let pre_rasterization_layout =
        layout_with_set_flags(&objects, DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR);
    let fragment_layout = layout_with_set_flags(&objects, DescriptorSetLayoutCreateFlags::empty());
    let libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(report.errors().len(), 1, "{:?}", report);
    assert_eq!(
        report.count_vuid("VUID-VkGraphicsPipelineCreateInfo-pLibraries-06613"),
        1,
    );
    assert!(report.errors()[0]
        .problem
        .contains("different pipeline layouts"));
}

#[test]
fn multisample_only_on_fragment_shader() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, layout, layout);

    libraries[3] = {
        let mut create_info =
            library_create_info(GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE, layout);
        create_info.multisample_state = None;
        insert_library(&objects, create_info)
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert!(report.is_valid(), "{:?}", report);
}

#[test]
fn multisample_mismatch_across_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, layout, layout);

    libraries[3] = {
        let mut create_info =
            library_create_info(GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE, layout);
        create_info.multisample_state = Some(MultisampleState {
            alpha_to_coverage_enable: true,
            ..Default::default()
        });
        insert_library(&objects, create_info)
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06633"],
    );
}

#[test]
fn render_targets_across_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, layout, layout);

    libraries[3] = {
        let mut create_info =
            library_create_info(GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE, layout);
        create_info.next = ExtensionChain::new()
            .with(GraphicsPipelineLibraryCreateInfo::new(
                GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
            ))
            .with(PipelineRenderingCreateInfo {
                color_attachment_formats: vec![Some(Format::B8G8R8A8_UNORM)],
                ..Default::default()
            });
        insert_library(&objects, create_info)
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06627"],
    );
}

#[test]
fn library_flag_rules() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);

    let create_info = GraphicsPipelineCreateInfo {
        flags: PipelineCreateFlags::LINK_TIME_OPTIMIZATION,
        ..linked_create_info(libraries)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        report.count_vuid("VUID-VkGraphicsPipelineCreateInfo-flags-06609"),
        4,
    );

    let not_a_library = objects.insert(GraphicsPipeline::new_unchecked(
        &objects,
        complete_create_info(layout),
    ));
    let report = GraphicsPipeline::validate_new(
        &device,
        &objects,
        &linked_create_info(vec![not_a_library, vk::Pipeline::from_raw(0xdead)]),
    );
    assert!(report.contains_vuid("VUID-VkPipelineLibraryCreateInfoKHR-pLibraries-03381"));
    assert!(report.contains_vuid("VUID-VkPipelineLibraryCreateInfoKHR-pLibraries-parameter"));
}

#[test]
fn validation_is_idempotent() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let pre_rasterization_layout =
        layout_with_set_flags(&objects, DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR);
    let fragment_layout = empty_layout(&objects);
    let mut libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );
    libraries.push(vk::Pipeline::from_raw(0xdead));

    let create_info = linked_create_info(libraries);
    let summarize = |report: ValidationReport| -> Vec<(String, &'static [&'static str])> {
        report
            .errors()
            .iter()
            .map(|err| (err.context.to_string(), err.vuids))
            .collect()
    };

    let first = summarize(GraphicsPipeline::validate_new(&device, &objects, &create_info));
    let second = summarize(GraphicsPipeline::validate_new(&device, &objects, &create_info));
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn library_describes_same_pipeline() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);

    let complete = GraphicsPipelineCreateInfo {
        viewport_state: Some(ViewportState::with_count()),
        color_blend_state: Some(ColorBlendState::new(3)),
        ..complete_create_info(layout)
    };
    let mut library = complete.clone();
    library.flags = PipelineCreateFlags::LIBRARY;
    library
        .next
        .push(GraphicsPipelineLibraryCreateInfo::new(
            GraphicsPipelineLibraryFlags::all(),
        ));

    let complete_report = GraphicsPipeline::validate_new(&device, &objects, &complete);
    let library_report = GraphicsPipeline::validate_new(&device, &objects, &library);

    assert!(!complete_report.is_valid());
    assert_eq!(vuids(&complete_report), vuids(&library_report));
}

#[test]
fn layout_equality() {
    let a = PipelineLayout::new_unchecked(PipelineLayoutCreateInfo::default());
    let b = PipelineLayout::new_unchecked(PipelineLayoutCreateInfo::default());
    assert_eq!(first_difference(&a, &b), None);
    assert_eq!(first_difference(&a, &a), None);

    let with_set = PipelineLayout::new_unchecked(PipelineLayoutCreateInfo {
        set_layouts: vec![None],
        ..Default::default()
    });
    assert!(first_difference(&a, &with_set)
        .unwrap()
        .contains("descriptor set layouts"));
}

#[test]
fn duplicate_extension_struct() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let mut create_info = complete_create_info(empty_layout(&objects));
    create_info.next.push(rendering_info());

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-sType-unique"],
    );
    assert_eq!(report.errors()[0].context, "create_info.next[1]");
}

#[test]
fn vertex_input_library_without_states() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();

    // The shaders are linked in later, so nothing says that a vertex stage is used.
    let create_info = GraphicsPipelineCreateInfo {
        vertex_input_state: None,
        input_assembly_state: None,
        ..library_create_info(
            GraphicsPipelineLibraryFlags::VERTEX_INPUT_INTERFACE,
            vk::PipelineLayout::null(),
        )
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.is_valid(), "{:?}", report);

    let create_info = GraphicsPipelineCreateInfo {
        vertex_input_state: None,
        input_assembly_state: None,
        ..library_create_info(
            GraphicsPipelineLibraryFlags::VERTEX_INPUT_INTERFACE
                | GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS,
            empty_layout(&objects),
        )
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        [
            "VUID-VkGraphicsPipelineCreateInfo-pStages-02097",
            "VUID-VkGraphicsPipelineCreateInfo-pStages-02098",
        ],
    );
}

#[test]
fn independent_sets_on_one_side() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let independent = independent_layout(&objects, Vec::new(), Vec::new());
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, independent, layout);

    let report =
        GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries.clone()));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06615"],
    );

    libraries.remove(2);
    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06614"]);
}

#[test]
fn independent_sets_push_constants() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let pre_rasterization_layout = independent_layout(
        &objects,
        Vec::new(),
        vec![PushConstantRange {
            stages: ShaderStages::VERTEX,
            offset: 0,
            size: 16,
        }],
    );
    let fragment_layout = independent_layout(&objects, Vec::new(), Vec::new());
    let mut libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );

    let report =
        GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries.clone()));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06623"],
    );
    assert_eq!(
        report.errors()[0].context,
        "create_info.layout.push_constant_ranges",
    );

    libraries.remove(2);
    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        fragment_layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06621"]);
}

#[test]
fn independent_sets_set_layouts() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let pre_rasterization_layout = independent_layout(
        &objects,
        vec![Some(set_layout(DescriptorType::UniformBuffer, ShaderStages::VERTEX))],
        Vec::new(),
    );
    let fragment_layout = independent_layout(
        &objects,
        vec![Some(set_layout(DescriptorType::StorageBuffer, ShaderStages::VERTEX))],
        Vec::new(),
    );
    let mut libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );

    let report =
        GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries.clone()));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06681"],
    );
    assert_eq!(
        report.errors()[0].context,
        "create_info.layout.set_layouts[0]",
    );

    libraries.remove(2);
    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        fragment_layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06679"]);

    // The fragment shader layout needs a set that the pre-rasterization layout leaves out.
    let pre_rasterization_layout = independent_layout(&objects, vec![None], Vec::new());
    let libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06758"],
    );

    // Only the first differing slot is reported, but other rules still are.
    let pre_rasterization_layout = independent_layout(
        &objects,
        vec![None, None],
        vec![PushConstantRange {
            stages: ShaderStages::VERTEX,
            offset: 0,
            size: 16,
        }],
    );
    let fragment_layout = independent_layout(
        &objects,
        vec![
            Some(set_layout(DescriptorType::UniformBuffer, ShaderStages::VERTEX)),
            Some(set_layout(DescriptorType::UniformBuffer, ShaderStages::VERTEX)),
        ],
        Vec::new(),
    );
    let libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(
        vuids(&report),
        [
            "VUID-VkGraphicsPipelineCreateInfo-pLibraries-06623",
            "VUID-VkGraphicsPipelineCreateInfo-pLibraries-06758",
        ],
    );

    // The create info defines the fragment shader, whose layout leaves out a set that the
    // pre-rasterization layout uses for the fragment stage.
    let pre_rasterization_layout = independent_layout(
        &objects,
        vec![Some(set_layout(DescriptorType::UniformBuffer, ShaderStages::FRAGMENT))],
        Vec::new(),
    );
    let fragment_layout = independent_layout(&objects, vec![None], Vec::new());
    let mut libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );
    libraries.remove(2);
    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        fragment_layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06756"]);
}

#[test]
fn different_layouts_with_create_info() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let pre_rasterization_layout =
        layout_with_set_flags(&objects, DescriptorSetLayoutCreateFlags::PUSH_DESCRIPTOR);
    let fragment_layout = layout_with_set_flags(&objects, DescriptorSetLayoutCreateFlags::empty());
    let mut libraries = split_libraries(
        &device,
        &objects,
        pre_rasterization_layout,
        fragment_layout,
    );
    libraries.remove(2);

    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        fragment_layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06612"]);
    assert_eq!(report.errors()[0].context, "create_info.layout");
}

#[test]
fn null_set_in_shared_layout() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = objects.insert(PipelineLayout::new_unchecked(PipelineLayoutCreateInfo {
        set_layouts: vec![None],
        ..Default::default()
    }));

    let create_info = library_create_info(
        GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS
            | GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        layout,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06682"]);
    assert_eq!(report.errors()[0].context, "create_info.layout.set_layouts[0]");

    let create_info =
        library_create_info(GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS, layout);
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.is_valid(), "{:?}", report);
}

#[test]
fn fragment_shading_rate_across_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&device, &objects, layout, layout);

    libraries[1] = {
        let mut create_info =
            library_create_info(GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS, layout);
        create_info.next.push(FragmentShadingRateState {
            fragment_size: [2, 2],
            ..Default::default()
        });
        insert_library(&objects, create_info)
    };

    let report =
        GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries.clone()));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06639"],
    );

    libraries.remove(2);
    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06638"]);
}

#[test]
fn multisample_defined_by_create_info() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);
    let alpha_to_coverage = MultisampleState {
        alpha_to_coverage_enable: true,
        ..Default::default()
    };

    let create_info = GraphicsPipelineCreateInfo {
        multisample_state: Some(alpha_to_coverage.clone()),
        ..partial_create_info(
            GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
            layout,
            vec![libraries[0], libraries[1], libraries[3]],
        )
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pMultisampleState-06629"],
    );

    let create_info = GraphicsPipelineCreateInfo {
        multisample_state: Some(alpha_to_coverage),
        ..partial_create_info(
            GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE,
            layout,
            libraries[..3].to_vec(),
        )
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pMultisampleState-06630"],
    );
}

#[test]
fn render_target_defined_by_create_info() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);
    let fragment_output = GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE;

    let create_info = GraphicsPipelineCreateInfo {
        next: ExtensionChain::new()
            .with(GraphicsPipelineLibraryCreateInfo::new(fragment_output))
            .with(PipelineLibraryCreateInfo::new(libraries[..3].to_vec()))
            .with(PipelineRenderingCreateInfo {
                color_attachment_formats: vec![Some(Format::B8G8R8A8_UNORM)],
                ..Default::default()
            }),
        ..partial_create_info(fragment_output, layout, Vec::new())
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06626"]);

    let create_info = GraphicsPipelineCreateInfo {
        render_pass: single_subpass_render_pass(&objects, None, 0),
        next: ExtensionChain::new()
            .with(GraphicsPipelineLibraryCreateInfo::new(fragment_output))
            .with(PipelineLibraryCreateInfo::new(libraries[..3].to_vec())),
        ..partial_create_info(fragment_output, layout, Vec::new())
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-renderpass-06624"],
    );
    assert_eq!(report.errors()[0].kind, DefectKind::CrossEntity);
}

#[test]
fn library_overlaps_create_info() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);

    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-flags-06645"]);
    assert_eq!(report.errors()[0].context, "create_info.next.libraries[2]");
}

#[test]
fn capture_flag_across_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let capture = PipelineCreateFlags::CAPTURE_INTERNAL_REPRESENTATIONS;
    let mut libraries = split_libraries(&device, &objects, layout, layout);

    libraries[3] = {
        let mut create_info =
            library_create_info(GraphicsPipelineLibraryFlags::FRAGMENT_OUTPUT_INTERFACE, layout);
        create_info.flags = PipelineCreateFlags::LIBRARY | capture;
        insert_library(&objects, create_info)
    };

    let create_info = GraphicsPipelineCreateInfo {
        flags: capture,
        ..linked_create_info(libraries.clone())
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06646"; 3],
    );

    let report = GraphicsPipeline::validate_new(&device, &objects, &linked_create_info(libraries));
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06647"],
    );
    assert_eq!(report.errors()[0].context, "create_info.next.libraries[3]");
}

#[test]
fn descriptor_buffer_disagreement_reported_once() {
    let device = test_device!(graphics_pipeline_library, descriptor_buffer);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let libraries = split_libraries(&device, &objects, layout, layout);

    let create_info = GraphicsPipelineCreateInfo {
        flags: PipelineCreateFlags::DESCRIPTOR_BUFFER,
        ..linked_create_info(libraries)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        ["VUID-VkGraphicsPipelineCreateInfo-pLibraries-08096"],
    );
}

#[test]
fn partial_pipeline_requires_library_feature() {
    let library_device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mut libraries = split_libraries(&library_device, &objects, layout, layout);
    libraries.remove(2);

    let create_info = partial_create_info(
        GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
        layout,
        libraries,
    );
    let report = GraphicsPipeline::validate_new(&test_device!(), &objects, &create_info);
    assert_eq!(
        vuids(&report),
        [
            "VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06607",
            "VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06608",
        ],
    );
    assert!(report
        .errors()
        .iter()
        .all(|err| err.kind == DefectKind::Capability));

    assert!(GraphicsPipeline::validate_new(&library_device, &objects, &create_info).is_valid());
}

#[test]
fn library_handles_without_libraries() {
    let device = test_device!(graphics_pipeline_library);
    let objects = ObjectRegistry::new();

    let create_info = library_create_info(
        GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS,
        vk::PipelineLayout::null(),
    );
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-flags-06642"));
    assert!(!report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-layout-06602"));

    let create_info = GraphicsPipelineCreateInfo {
        render_pass: vk::RenderPass::from_raw(0xdead),
        ..library_create_info(
            GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS,
            empty_layout(&objects),
        )
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-flags-06643"));
    assert!(!report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-06603"));
}

#[test]
fn tessellation_state_required() {
    let device = test_device!(tessellation_shader);
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[
            ShaderStage::Vertex,
            ShaderStage::TessellationControl,
            ShaderStage::TessellationEvaluation,
            ShaderStage::Fragment,
        ])
        .collect(),
        input_assembly_state: Some(InputAssemblyState {
            topology: PrimitiveTopology::PatchList,
            ..Default::default()
        }),
        tessellation_state: None,
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-pStages-09022"]);
    assert_eq!(report.errors()[0].context, "create_info.tessellation_state");
}

#[test]
fn missing_states_reported_together() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let create_info = GraphicsPipelineCreateInfo {
        viewport_state: None,
        multisample_state: None,
        ..complete_create_info(empty_layout(&objects))
    };

    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(
        vuids(&report),
        [
            "VUID-VkGraphicsPipelineCreateInfo-rasterizerDiscardEnable-09024",
            "VUID-VkGraphicsPipelineCreateInfo-rasterizerDiscardEnable-09026",
        ],
    );
}

#[test]
fn attachment_states_required_by_render_target() {
    let device = test_device!();
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);

    let create_info = GraphicsPipelineCreateInfo {
        render_pass: single_subpass_render_pass(&objects, Some(Format::D32_SFLOAT), 0),
        next: ExtensionChain::new(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-renderPass-09028"]);

    let create_info = GraphicsPipelineCreateInfo {
        next: ExtensionChain::new().with(PipelineRenderingCreateInfo {
            depth_attachment_format: Some(Format::D32_SFLOAT),
            ..rendering_info()
        }),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-renderPass-09033"]);

    let create_info = GraphicsPipelineCreateInfo {
        render_pass: single_subpass_render_pass(&objects, None, 0),
        color_blend_state: None,
        next: ExtensionChain::new(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-renderPass-09030"]);
}

#[test]
fn stage_families() {
    let device = test_device!(mesh_shader, task_shader, tessellation_shader);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let report_for = |shader_stages: &[ShaderStage]| {
        let create_info = GraphicsPipelineCreateInfo {
            stages: stages(shader_stages).collect(),
            input_assembly_state: Some(InputAssemblyState {
                topology: PrimitiveTopology::PatchList,
                ..Default::default()
            }),
            ..complete_create_info(layout)
        };

        GraphicsPipeline::validate_new(&device, &objects, &create_info)
    };

    let report = report_for(&[ShaderStage::Vertex, ShaderStage::Mesh, ShaderStage::Fragment]);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-02095"));

    let report = report_for(&[ShaderStage::Task, ShaderStage::Fragment]);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-TaskNV-07063"));
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-stage-02096"));

    let report = report_for(&[
        ShaderStage::Vertex,
        ShaderStage::TessellationEvaluation,
        ShaderStage::Fragment,
    ]);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-00730"));
    assert!(!report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-pStages-00729"));
}

#[test]
fn multiview_stage_features() {
    let device = test_device!(mesh_shader, tessellation_shader);
    let objects = ObjectRegistry::new();
    let layout = empty_layout(&objects);
    let mesh = || -> smallvec::SmallVec<[PipelineShaderStageCreateInfo; 5]> {
        stages(&[ShaderStage::Mesh, ShaderStage::Fragment]).collect()
    };

    let create_info = GraphicsPipelineCreateInfo {
        stages: mesh(),
        next: ExtensionChain::new().with(PipelineRenderingCreateInfo {
            view_mask: 0b1,
            ..rendering_info()
        }),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-renderPass-07064"]);
    assert_eq!(report.errors()[0].kind, DefectKind::Capability);

    let device_with_multiview_mesh = test_device!(mesh_shader, multiview_mesh_shader);
    assert!(
        GraphicsPipeline::validate_new(&device_with_multiview_mesh, &objects, &create_info)
            .is_valid()
    );

    let render_pass = single_subpass_render_pass(&objects, None, 0b1);
    let create_info = GraphicsPipelineCreateInfo {
        stages: mesh(),
        render_pass,
        next: ExtensionChain::new(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert_eq!(vuids(&report), ["VUID-VkGraphicsPipelineCreateInfo-renderPass-07720"]);

    let create_info = GraphicsPipelineCreateInfo {
        stages: stages(&[
            ShaderStage::Vertex,
            ShaderStage::TessellationControl,
            ShaderStage::TessellationEvaluation,
            ShaderStage::Fragment,
        ])
        .collect(),
        input_assembly_state: Some(InputAssemblyState {
            topology: PrimitiveTopology::PatchList,
            ..Default::default()
        }),
        render_pass,
        next: ExtensionChain::new(),
        ..complete_create_info(layout)
    };
    let report = GraphicsPipeline::validate_new(&device, &objects, &create_info);
    assert!(report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-06047"));
    assert!(!report.contains_vuid("VUID-VkGraphicsPipelineCreateInfo-renderPass-06057"));
}
