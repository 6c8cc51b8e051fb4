//! Legality checks for Vulkan graphics pipelines.
//!
//! This crate decides whether a `VkGraphicsPipelineCreateInfo` should be handed to the driver,
//! and whether a pipeline that was already built is still consistent with the render target
//! that is active when a draw command is recorded. It never talks to a driver: every input is a
//! plain snapshot type, with opaque handles resolved through an [`ObjectTable`].
//!
//! The two entry points are:
//!
//! - [`GraphicsPipeline::validate_new`] and [`validate_create_graphics_pipelines`] at creation
//!   time.
//! - [`command_buffer::validate_draw`] at draw time.
//!
//! Both return a [`ValidationReport`] holding zero or more [`ValidationError`]s. Every error
//! carries the VUIDs of the rules it violates, so callers can filter or escalate as they see fit.
//!
//! [`ObjectTable`]: object_table::ObjectTable
//! [`GraphicsPipeline::validate_new`]: pipeline::graphics::GraphicsPipeline::validate_new
//! [`validate_create_graphics_pipelines`]: pipeline::graphics::validate_create_graphics_pipelines

pub use ash::vk;
pub use report::{ValidationFailed, ValidationReport};
pub use version::Version;
use std::{
    borrow::Cow,
    error::Error,
    fmt::{Display, Error as FmtError, Formatter},
};

#[macro_use]
mod tests;
#[macro_use]
mod macros;
pub mod command_buffer;
pub mod descriptor_set;
pub mod device;
pub mod format;
pub mod image;
pub mod object_table;
pub mod pipeline;
pub mod render_pass;
mod report;
pub mod shader;
mod version;

/// The category of the defect that a [`ValidationError`] describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DefectKind {
    /// Fields of one descriptor are inconsistent with each other, regardless of what the device
    /// supports.
    #[default]
    Structural,

    /// Something was requested that the enabled capabilities of the device do not allow.
    Capability,

    /// Two related objects disagree on a value that must match.
    CrossEntity,

    /// A handle does not resolve to a live object.
    Resolution,
}

/// A violation of one or more valid usage rules.
#[derive(Clone, Debug, Default)]
pub struct ValidationError {
    /// The context in which the problem exists (e.g. a specific parameter).
    pub context: Cow<'static, str>,

    /// A description of the problem.
    pub problem: Cow<'static, str>,

    /// If applicable, settings that the user could enable to avoid the problem in the future.
    pub requires_one_of: RequiresOneOf,

    /// *Valid Usage IDs* (VUIDs) in the Vulkan specification that relate to the problem.
    pub vuids: &'static [&'static str],

    /// The category of the problem.
    pub kind: DefectKind,
}

impl ValidationError {
    pub(crate) fn add_context(mut self: Box<Self>, context: impl Into<Cow<'static, str>>) -> Box<Self> {
        self.prepend_context(&context.into());
        self
    }

    pub(crate) fn set_vuids(mut self: Box<Self>, vuids: &'static [&'static str]) -> Box<Self> {
        self.vuids = vuids;
        self
    }

    pub(crate) fn set_kind(mut self: Box<Self>, kind: DefectKind) -> Box<Self> {
        self.kind = kind;
        self
    }

    pub(crate) fn prepend_context(&mut self, context: &str) {
        if context.is_empty() {
            return;
        }

        if self.context.is_empty() {
            self.context = context.to_owned().into();
        } else {
            self.context = format!("{}.{}", context, self.context).into();
        }
    }

    /// Returns whether `vuid` is one of the VUIDs of this error.
    #[inline]
    pub fn has_vuid(&self, vuid: &str) -> bool {
        self.vuids.iter().any(|&v| v == vuid)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if self.context.is_empty() {
            write!(f, "{}", self.problem)?;
        } else {
            write!(f, "{}: {}", self.context, self.problem)?;
        }

        if !self.requires_one_of.is_empty() {
            if self.context.is_empty() && self.problem.is_empty() {
                write!(f, "{}", self.requires_one_of)?;
            } else {
                write!(f, " -- {}", self.requires_one_of)?;
            }
        }

        if !self.vuids.is_empty() {
            write!(f, "\n\nVulkan VUIDs:")?;

            for vuid in self.vuids {
                write!(f, "\n    {}", vuid)?;
            }
        }

        Ok(())
    }
}

impl Error for ValidationError {}

/// Used in errors to indicate a set of alternatives that needs to be available/enabled to allow
/// a given operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequiresOneOf(pub &'static [RequiresAllOf]);

impl RequiresOneOf {
    /// Returns the number of alternatives.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether there are any alternatives.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns whether at least one of the alternatives is satisfied by `device`.
    pub fn is_satisfied_by(&self, device: &device::DeviceCapabilities) -> bool {
        self.0.iter().any(|all_of| all_of.is_satisfied_by(device))
    }
}

impl Display for RequiresOneOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "requires one of: ")?;

        if let Some((first, rest)) = self.0.split_first() {
            if first.0.len() > 1 {
                write!(f, "({})", first)?;
            } else {
                write!(f, "{}", first)?;
            }

            for rest in rest {
                if first.0.len() > 1 {
                    write!(f, " or ({})", rest)?;
                } else {
                    write!(f, " or {}", rest)?;
                }
            }
        }

        Ok(())
    }
}

/// Used in errors to indicate a set of requirements that all need to be available/enabled to
/// allow a given operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequiresAllOf(pub &'static [Requires]);

impl RequiresAllOf {
    fn is_satisfied_by(&self, device: &device::DeviceCapabilities) -> bool {
        self.0.iter().all(|requires| match *requires {
            Requires::APIVersion(version) => device.api_version() >= version,
            Requires::DeviceFeature(name) => {
                device.enabled_features().get(name).unwrap_or(false)
            }
            Requires::DeviceExtension(name) => {
                device.enabled_extensions().get(name).unwrap_or(false)
            }
        })
    }
}

impl Display for RequiresAllOf {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        if let Some((first, rest)) = self.0.split_first() {
            write!(f, "{}", first)?;

            for rest in rest {
                write!(f, " + {}", rest)?;
            }
        }

        Ok(())
    }
}

/// Something that needs to be supported or enabled to allow a particular operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requires {
    APIVersion(Version),
    DeviceFeature(&'static str),
    DeviceExtension(&'static str),
}

impl Display for Requires {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Requires::APIVersion(Version { major, minor, .. }) => {
                write!(f, "Vulkan API version {}.{}", major, minor)
            }
            Requires::DeviceFeature(device_feature) => {
                write!(f, "device feature `{}`", device_feature)
            }
            Requires::DeviceExtension(device_extension) => {
                write!(f, "device extension `{}`", device_extension)
            }
        }
    }
}

/// A helper type for non-exhaustive structs.
///
/// This type cannot be constructed outside this crate. Structures with a field of this type can
/// only be constructed by calling a constructor function or `Default::default()`. The effect is
/// similar to the standard Rust `#[non_exhaustive]` attribute, except that it does not prevent
/// update syntax from being used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)] // add traits as needed
pub struct NonExhaustive(pub(crate) ());
