//! Graphics pipeline libraries: pipelines that define only some of the sub-states of a
//! pipeline, and are linked into other pipelines to provide the rest.
//!
//! When a pipeline is created, each of its four sub-states is either defined by its own create
//! info, as selected by [`GraphicsPipelineLibraryFlags`], or taken from one of the libraries
//! listed in a [`PipelineLibraryCreateInfo`]. Once the source of every sub-state is known, the
//! pieces that came from different sources are checked against each other.

use super::{
    sub_state::{FragmentOutputSubState, FragmentShaderSubState, SubState, SubStates},
    subpass::PipelineSubpassType,
    GraphicsPipeline,
};
use crate::{
    device::DeviceCapabilities,
    macros::vulkan_bitflags,
    object_table::ObjectTable,
    pipeline::{layout::PipelineLayout, PipelineCreateFlags},
    shader::ShaderStages,
    DefectKind, Requires, RequiresAllOf, RequiresOneOf, ValidationError, ValidationReport,
};
use ash::vk;
use std::sync::Arc;

vulkan_bitflags! {
    /// The sub-states of a graphics pipeline.
    GraphicsPipelineLibraryFlags = GraphicsPipelineLibraryFlagsEXT(u32);

    /// Vertex input and input assembly state.
    VERTEX_INPUT_INTERFACE = VERTEX_INPUT_INTERFACE,

    /// The pre-rasterization shader stages, with tessellation, viewport and rasterization state.
    PRE_RASTERIZATION_SHADERS = PRE_RASTERIZATION_SHADERS,

    /// The fragment shader stage, with depth/stencil state.
    FRAGMENT_SHADER = FRAGMENT_SHADER,

    /// Color blend state, and the multisample state that applies to the attachments.
    FRAGMENT_OUTPUT_INTERFACE = FRAGMENT_OUTPUT_INTERFACE,
}

/// Selects which sub-states a pipeline defines itself, from
/// `VkGraphicsPipelineLibraryCreateInfoEXT`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicsPipelineLibraryCreateInfo {
    /// The sub-states that the create info defines.
    ///
    /// The default value is empty.
    pub flags: GraphicsPipelineLibraryFlags,

    pub _ne: crate::NonExhaustive,
}

impl Default for GraphicsPipelineLibraryCreateInfo {
    #[inline]
    fn default() -> Self {
        Self::new(GraphicsPipelineLibraryFlags::empty())
    }
}

impl GraphicsPipelineLibraryCreateInfo {
    #[inline]
    pub fn new(flags: GraphicsPipelineLibraryFlags) -> Self {
        Self {
            flags,
            _ne: crate::NonExhaustive(()),
        }
    }
}

/// The libraries to link into a pipeline, from `VkPipelineLibraryCreateInfoKHR`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineLibraryCreateInfo {
    /// The handles of the libraries.
    ///
    /// The default value is empty.
    pub libraries: Vec<vk::Pipeline>,

    pub _ne: crate::NonExhaustive,
}

impl Default for PipelineLibraryCreateInfo {
    #[inline]
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PipelineLibraryCreateInfo {
    #[inline]
    pub fn new(libraries: Vec<vk::Pipeline>) -> Self {
        Self {
            libraries,
            _ne: crate::NonExhaustive(()),
        }
    }

    /// Looks up every library. Libraries that do not resolve are reported and left out.
    pub(crate) fn resolve(
        &self,
        objects: &impl ObjectTable,
        report: &mut ValidationReport,
    ) -> Vec<(usize, Arc<GraphicsPipeline>)> {
        let mut libraries = Vec::with_capacity(self.libraries.len());

        for (index, &handle) in self.libraries.iter().enumerate() {
            let Some(library) = objects.get::<GraphicsPipeline>(handle) else {
                report.push(Box::new(ValidationError {
                    context: format!("next.libraries[{}]", index).into(),
                    problem: "is not a known pipeline".into(),
                    vuids: &["VUID-VkPipelineLibraryCreateInfoKHR-pLibraries-parameter"],
                    kind: DefectKind::Resolution,
                    ..Default::default()
                }));
                continue;
            };

            if !library.flags().intersects(PipelineCreateFlags::LIBRARY) {
                report.push(Box::new(ValidationError {
                    context: format!("next.libraries[{}]", index).into(),
                    problem: "was not created with `PipelineCreateFlags::LIBRARY`".into(),
                    vuids: &["VUID-VkPipelineLibraryCreateInfoKHR-pLibraries-03381"],
                    kind: DefectKind::CrossEntity,
                    ..Default::default()
                }));
            }

            libraries.push((index, library));
        }

        libraries
    }
}

/// Checks that the device allows the pipeline to be, or to be made from, libraries.
pub(crate) fn validate_library_usage(
    device: &DeviceCapabilities,
    flags: PipelineCreateFlags,
    library_info: Option<&GraphicsPipelineLibraryCreateInfo>,
    library_count: usize,
    report: &mut ValidationReport,
) {
    if device.enabled_features().graphics_pipeline_library {
        return;
    }

    let requires_one_of = RequiresOneOf(&[RequiresAllOf(&[Requires::DeviceFeature(
        "graphics_pipeline_library",
    )])]);

    if flags.intersects(PipelineCreateFlags::LIBRARY) {
        report.push(Box::new(ValidationError {
            context: "flags".into(),
            problem: "contains `PipelineCreateFlags::LIBRARY`".into(),
            requires_one_of,
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06606"],
            kind: DefectKind::Capability,
        }));
    } else if library_info
        .is_some_and(|info| info.flags != GraphicsPipelineLibraryFlags::all())
    {
        report.push(Box::new(ValidationError {
            context: "next.flags".into(),
            problem: "does not contain every sub-state, and the pipeline is not a library".into(),
            requires_one_of,
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06607"],
            kind: DefectKind::Capability,
        }));
    }

    if library_count != 0 {
        report.push(Box::new(ValidationError {
            context: "next.libraries".into(),
            problem: "is not empty".into(),
            requires_one_of,
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-graphicsPipelineLibrary-06608"],
            kind: DefectKind::Capability,
        }));
    }
}

/// Takes the sub-states that `own` does not define from `libraries`, in order.
///
/// A sub-state that is defined more than once is reported, and the first definition is kept.
pub(crate) fn link(
    mut own: SubStates,
    libraries: &[(usize, Arc<GraphicsPipeline>)],
    report: &mut ValidationReport,
) -> SubStates {
    let own_flags = own.library_flags();
    let mut linked_flags = GraphicsPipelineLibraryFlags::empty();

    for (index, library) in libraries {
        let library_flags = library.library_flags();

        if library_flags.intersects(own_flags) {
            report.push(Box::new(ValidationError {
                context: format!("next.libraries[{}]", index).into(),
                problem: format!(
                    "defines the sub-states {:?}, which the create info also defines",
                    library_flags & own_flags,
                )
                .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-06645"],
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }

        if library_flags.intersects(linked_flags) {
            report.push(Box::new(ValidationError {
                context: format!("next.libraries[{}]", index).into(),
                problem: format!(
                    "defines the sub-states {:?}, which an earlier library also defines",
                    library_flags & linked_flags,
                )
                .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06611"],
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }

        inherit_into(&mut own.vertex_input, &library.vertex_input, library);
        inherit_into(&mut own.pre_rasterization, &library.pre_rasterization, library);
        inherit_into(&mut own.fragment_shader, &library.fragment_shader, library);
        inherit_into(&mut own.fragment_output, &library.fragment_output, library);

        log::trace!(
            "library {} contributes {:?}",
            index,
            library_flags - own_flags - linked_flags,
        );

        linked_flags |= library_flags;
    }

    own
}

fn inherit_into<T>(
    slot: &mut Option<SubState<T>>,
    from: &Option<SubState<T>>,
    library: &Arc<GraphicsPipeline>,
) {
    if slot.is_none() {
        *slot = from.as_ref().map(|state| state.inherit(library));
    }
}

/// Checks that the create flags of the pipeline agree with those of its libraries.
pub(crate) fn validate_library_flags(
    flags: PipelineCreateFlags,
    libraries: &[(usize, Arc<GraphicsPipeline>)],
    report: &mut ValidationReport,
) {
    let mut descriptor_buffer_reported = false;

    for (index, library) in libraries {
        let library_flags = library.flags();
        let context = format!("next.libraries[{}]", index);

        if flags.intersects(PipelineCreateFlags::LINK_TIME_OPTIMIZATION)
            && !library_flags.intersects(PipelineCreateFlags::RETAIN_LINK_TIME_OPTIMIZATION_INFO)
        {
            report.push(Box::new(ValidationError {
                context: context.clone().into(),
                problem: "`flags` contains `PipelineCreateFlags::LINK_TIME_OPTIMIZATION`, but \
                    the library was not created with \
                    `PipelineCreateFlags::RETAIN_LINK_TIME_OPTIMIZATION_INFO`"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-06609"],
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }

        let capture = PipelineCreateFlags::CAPTURE_INTERNAL_REPRESENTATIONS;

        if flags.intersects(capture) && !library_flags.intersects(capture) {
            report.push(Box::new(ValidationError {
                context: context.clone().into(),
                problem: "`flags` contains \
                    `PipelineCreateFlags::CAPTURE_INTERNAL_REPRESENTATIONS`, but the library \
                    was not created with it"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06646"],
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        } else if !flags.intersects(capture) && library_flags.intersects(capture) {
            report.push(Box::new(ValidationError {
                context: context.clone().into(),
                problem: "the library was created with \
                    `PipelineCreateFlags::CAPTURE_INTERNAL_REPRESENTATIONS`, but `flags` does \
                    not contain it"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06647"],
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }

        let descriptor_buffer = PipelineCreateFlags::DESCRIPTOR_BUFFER;

        // One report is enough, every later library disagrees for the same reason.
        if !descriptor_buffer_reported
            && flags.intersects(descriptor_buffer) != library_flags.intersects(descriptor_buffer)
        {
            report.push(Box::new(ValidationError {
                context: context.into(),
                problem: "the library and the pipeline disagree on whether \
                    `PipelineCreateFlags::DESCRIPTOR_BUFFER` is used"
                    .into(),
                vuids: &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-08096"],
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
            descriptor_buffer_reported = true;
        }
    }
}

/// Selects the VUIDs of a rule by where two values came from: the `flags` wording applies when
/// at least one side was defined by the create info itself.
fn select_vuids(
    either_owned: bool,
    flags: &'static [&'static str],
    libraries: &'static [&'static str],
) -> &'static [&'static str] {
    if either_owned {
        flags
    } else {
        libraries
    }
}

/// Checks that the sub-states that came from different sources agree with each other.
pub(crate) fn validate_consistency(
    sub_states: &SubStates,
    own_library_info: Option<&GraphicsPipelineLibraryCreateInfo>,
    report: &mut ValidationReport,
) {
    if let (Some(pre_rasterization), Some(fragment_shader)) =
        (&sub_states.pre_rasterization, &sub_states.fragment_shader)
    {
        if pre_rasterization.is_owned() && fragment_shader.is_owned() {
            // Both sides use the layout of the create info.
            if own_library_info.is_some_and(|info| {
                info.flags.contains(
                    GraphicsPipelineLibraryFlags::PRE_RASTERIZATION_SHADERS
                        | GraphicsPipelineLibraryFlags::FRAGMENT_SHADER,
                )
            }) {
                if let Some(layout) = &pre_rasterization.layout {
                    validate_no_null_sets(layout, report);
                }
            }
        } else {
            let either_owned = pre_rasterization.is_owned() || fragment_shader.is_owned();

            if let (Some(a), Some(b)) = (&pre_rasterization.layout, &fragment_shader.layout) {
                validate_layouts(a, b, either_owned, report);
            }

            log::trace!(
                "fragment shading rate from {} and {}",
                origin(pre_rasterization),
                origin(fragment_shader),
            );

            if pre_rasterization.fragment_shading_rate_state
                != fragment_shader.fragment_shading_rate_state
            {
                report.push(Box::new(ValidationError {
                    problem: "the pre-rasterization and fragment shader sub-states do not have \
                        equal fragment shading rate states"
                        .into(),
                    vuids: select_vuids(
                        either_owned,
                        &["VUID-VkGraphicsPipelineCreateInfo-flags-06638"],
                        &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06639"],
                    ),
                    kind: DefectKind::CrossEntity,
                    ..Default::default()
                }));
            }
        }
    }

    if let (Some(fragment_shader), Some(fragment_output)) =
        (&sub_states.fragment_shader, &sub_states.fragment_output)
    {
        if !(fragment_shader.is_owned() && fragment_output.is_owned()) {
            validate_multisample(fragment_shader, fragment_output, report);
        }
    }

    validate_render_targets(sub_states, report);
}

fn origin<T>(state: &SubState<T>) -> &'static str {
    if state.is_owned() {
        "the create info"
    } else {
        "a library"
    }
}

fn validate_no_null_sets(layout: &PipelineLayout, report: &mut ValidationReport) {
    if let Some(index) = layout.set_layouts().iter().position(Option::is_none) {
        report.push(Box::new(ValidationError {
            context: format!("layout.set_layouts[{}]", index).into(),
            problem: "is `None`, but the create info defines both the pre-rasterization and \
                fragment shader sub-states"
                .into(),
            vuids: &["VUID-VkGraphicsPipelineCreateInfo-flags-06682"],
            ..Default::default()
        }));
    }
}

/// Returns a description of the first way in which `a` and `b` are not identically defined.
pub(crate) fn first_difference(a: &PipelineLayout, b: &PipelineLayout) -> Option<String> {
    if std::ptr::eq(a, b) {
        return None;
    }

    if a.flags() != b.flags() {
        return Some(format!(
            "the flags are {:?} and {:?}",
            a.flags(),
            b.flags()
        ));
    }

    if a.set_layouts().len() != b.set_layouts().len() {
        return Some(format!(
            "there are {} and {} descriptor set layouts",
            a.set_layouts().len(),
            b.set_layouts().len(),
        ));
    }

    for (index, (set_a, set_b)) in a.set_layouts().iter().zip(b.set_layouts()).enumerate() {
        match (set_a, set_b) {
            (None, None) => (),
            (Some(set_a), Some(set_b)) => {
                if set_a.flags() != set_b.flags() {
                    return Some(format!(
                        "the flags of descriptor set layout {} are {:?} and {:?}",
                        index,
                        set_a.flags(),
                        set_b.flags(),
                    ));
                }

                if !set_a.is_identically_defined(set_b) {
                    return Some(format!(
                        "the bindings of descriptor set layout {} differ",
                        index
                    ));
                }
            }
            _ => {
                return Some(format!(
                    "descriptor set layout {} is `None` on only one side",
                    index
                ))
            }
        }
    }

    if a.push_constant_ranges() != b.push_constant_ranges() {
        return Some("the push constant ranges differ".to_owned());
    }

    None
}

/// `pre_rasterization` is the layout of the pre-rasterization sub-state, `fragment` the one of
/// the fragment shader sub-state.
fn validate_layouts(
    pre_rasterization: &PipelineLayout,
    fragment: &PipelineLayout,
    either_owned: bool,
    report: &mut ValidationReport,
) {
    match (
        pre_rasterization.is_independent_sets(),
        fragment.is_independent_sets(),
    ) {
        (false, false) => {
            if let Some(difference) = first_difference(pre_rasterization, fragment) {
                report.push(Box::new(ValidationError {
                    context: "layout".into(),
                    problem: format!(
                        "the pre-rasterization and fragment shader sub-states were created with \
                        different pipeline layouts: {}",
                        difference,
                    )
                    .into(),
                    vuids: select_vuids(
                        either_owned,
                        &["VUID-VkGraphicsPipelineCreateInfo-flags-06612"],
                        &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06613"],
                    ),
                    kind: DefectKind::CrossEntity,
                    ..Default::default()
                }));
            }
        }
        (true, false) | (false, true) => {
            report.push(Box::new(ValidationError {
                context: "layout".into(),
                problem: "only one of the pipeline layouts of the pre-rasterization and \
                    fragment shader sub-states was created with \
                    `PipelineLayoutCreateFlags::INDEPENDENT_SETS`"
                    .into(),
                vuids: select_vuids(
                    either_owned,
                    &["VUID-VkGraphicsPipelineCreateInfo-flags-06614"],
                    &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06615"],
                ),
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));
        }
        (true, true) => {
            if pre_rasterization.push_constant_ranges() != fragment.push_constant_ranges() {
                report.push(Box::new(ValidationError {
                    context: "layout.push_constant_ranges".into(),
                    problem: "the pipeline layouts of the pre-rasterization and fragment shader \
                        sub-states have different push constant ranges"
                        .into(),
                    vuids: select_vuids(
                        either_owned,
                        &["VUID-VkGraphicsPipelineCreateInfo-flags-06621"],
                        &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06623"],
                    ),
                    kind: DefectKind::CrossEntity,
                    ..Default::default()
                }));
            }

            validate_independent_sets(pre_rasterization, fragment, either_owned, report);
        }
    }
}

fn validate_independent_sets(
    pre_rasterization: &PipelineLayout,
    fragment: &PipelineLayout,
    either_owned: bool,
    report: &mut ValidationReport,
) {
    let set_count = pre_rasterization
        .set_layouts()
        .len()
        .max(fragment.set_layouts().len());
    let set = |layout: &PipelineLayout, index: usize| {
        layout.set_layouts().get(index).cloned().flatten()
    };

    for index in 0..set_count {
        let (problem, vuids): (&'static str, &'static [&'static str]) =
            match (set(pre_rasterization, index), set(fragment, index)) {
                (None, None) => continue,
                (None, Some(layout))
                    if layout.stages().intersects(ShaderStages::PRE_RASTERIZATION) =>
                (
                    "is `None` in the pre-rasterization layout, but the fragment shader layout \
                    has bindings for pre-rasterization stages",
                    select_vuids(
                        either_owned,
                        &["VUID-VkGraphicsPipelineCreateInfo-flags-06756"],
                        &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06758"],
                    ),
                ),
                (Some(layout), None) if layout.stages().intersects(ShaderStages::FRAGMENT) =>
                (
                    "is `None` in the fragment shader layout, but the pre-rasterization layout \
                    has bindings for the fragment stage",
                    select_vuids(
                        either_owned,
                        &["VUID-VkGraphicsPipelineCreateInfo-flags-06756"],
                        &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06758"],
                    ),
                ),
                (Some(a), Some(b)) if !a.is_identically_defined(&b) =>
                (
                    "is not identically defined in the pre-rasterization and fragment shader \
                    layouts",
                    select_vuids(
                        either_owned,
                        &["VUID-VkGraphicsPipelineCreateInfo-flags-06679"],
                        &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06681"],
                    ),
                ),
                _ => continue,
            };

        report.push(Box::new(ValidationError {
            context: format!("layout.set_layouts[{}]", index).into(),
            problem: problem.into(),
            vuids,
            kind: DefectKind::CrossEntity,
            ..Default::default()
        }));

        // Later slots usually differ for the same reason.
        break;
    }
}

fn validate_multisample(
    fragment_shader: &SubState<FragmentShaderSubState>,
    fragment_output: &SubState<FragmentOutputSubState>,
    report: &mut ValidationReport,
) {
    let consistent = match (
        &fragment_shader.multisample_state,
        &fragment_output.multisample_state,
    ) {
        (Some(a), Some(b)) => a == b,
        (None, Some(output)) => output.sample_shading.is_none(),
        (Some(_), None) | (None, None) => true,
    };

    if consistent {
        return;
    }

    let vuids: &'static [&'static str] =
        match (fragment_shader.is_owned(), fragment_output.is_owned()) {
            (true, _) => &["VUID-VkGraphicsPipelineCreateInfo-pMultisampleState-06629"],
            (false, true) => &["VUID-VkGraphicsPipelineCreateInfo-pMultisampleState-06630"],
            (false, false) => &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06633"],
        };

    report.push(Box::new(ValidationError {
        context: "multisample_state".into(),
        problem: "the fragment shader and fragment output interface sub-states do not have \
            equal multisample states"
            .into(),
        vuids,
        kind: DefectKind::CrossEntity,
        ..Default::default()
    }));
}

fn validate_render_targets(sub_states: &SubStates, report: &mut ValidationReport) {
    fn owned_and_subpass(
        owned: bool,
        subpass: Option<&PipelineSubpassType>,
    ) -> Option<(bool, &PipelineSubpassType)> {
        subpass.map(|subpass| (owned, subpass))
    }

    let targets = [
        sub_states.pre_rasterization.as_ref().and_then(|state| {
            owned_and_subpass(state.is_owned(), state.subpass.as_ref())
        }),
        sub_states.fragment_shader.as_ref().and_then(|state| {
            owned_and_subpass(state.is_owned(), state.subpass.as_ref())
        }),
        sub_states.fragment_output.as_ref().and_then(|state| {
            owned_and_subpass(state.is_owned(), state.subpass.as_ref())
        }),
    ];
    let targets: Vec<_> = targets.into_iter().flatten().collect();

    for (index, &(a_owned, a)) in targets.iter().enumerate() {
        for &(b_owned, b) in &targets[index + 1..] {
            // Owned sub-states share the render target of the create info.
            if (a_owned && b_owned) || a.is_compatible_with(b) {
                continue;
            }

            let either_owned = a_owned || b_owned;
            let vuids = match (a, b) {
                (
                    PipelineSubpassType::BeginRendering(_),
                    PipelineSubpassType::BeginRendering(_),
                ) => select_vuids(
                    either_owned,
                    &["VUID-VkGraphicsPipelineCreateInfo-flags-06626"],
                    &["VUID-VkGraphicsPipelineCreateInfo-pLibraries-06627"],
                ),
                _ => select_vuids(
                    either_owned,
                    &["VUID-VkGraphicsPipelineCreateInfo-renderpass-06624"],
                    &["VUID-VkGraphicsPipelineCreateInfo-renderpass-06625"],
                ),
            };

            report.push(Box::new(ValidationError {
                context: "render_pass".into(),
                problem: "the sub-states of the pipeline were created for incompatible render \
                    targets"
                    .into(),
                vuids,
                kind: DefectKind::CrossEntity,
                ..Default::default()
            }));

            // One mismatch is enough to reject the pipeline.
            return;
        }
    }
}
