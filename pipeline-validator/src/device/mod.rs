//! The capabilities of the device that pipelines are validated against.
//!
//! A [`DeviceCapabilities`] stands in for a created logical device: the API version it was
//! created with, the features and extensions that were enabled on it, its limits, and the
//! format features that its physical device reports. It is never mutated by validation.
//!
//! With the `serde` feature enabled, capabilities can be loaded from and saved to JSON, which
//! makes it easy to replay validation against a captured device profile:
//!
//! ```
//! # #[cfg(feature = "serde")]
//! # {
//! use pipeline_validator::device::DeviceCapabilities;
//!
//! let device = DeviceCapabilities::from_json_str(r#"{
//!     "api_version": { "major": 1, "minor": 3, "patch": 0 },
//!     "enabled_features": { "dynamic_rendering": true, "wide_lines": true }
//! }"#).unwrap();
//!
//! assert!(device.enabled_features().wide_lines);
//! assert!(!device.enabled_features().depth_clamp);
//! # }
//! ```

pub use self::{extensions::DeviceExtensions, features::DeviceFeatures, properties::DeviceProperties};
use crate::{
    format::{Format, FormatFeatures},
    Version,
};
use foldhash::HashMap;
use thiserror::Error;

/// Generates a struct of named booleans that can also be queried by name.
macro_rules! capability_flags {
    {
        $(#[doc = $ty_doc:literal])*
        $ty:ident {
            $(
                $(#[doc = $member_doc:literal])*
                $member:ident,
            )+
        }
    } => {
        $(#[doc = $ty_doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default))]
        pub struct $ty {
            $(
                $(#[doc = $member_doc])*
                pub $member: bool,
            )+

            #[cfg_attr(feature = "serde", serde(skip))]
            pub _ne: crate::NonExhaustive,
        }

        impl Default for $ty {
            #[inline]
            fn default() -> Self {
                Self::empty()
            }
        }

        impl $ty {
            /// The names of all members, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$(stringify!($member)),+];

            #[doc = concat!("Returns a `", stringify!($ty), "` with none of the members set.")]
            #[inline]
            pub const fn empty() -> Self {
                Self {
                    $($member: false,)+
                    _ne: crate::NonExhaustive(()),
                }
            }

            #[doc = concat!("Returns a `", stringify!($ty), "` with all of the members set.")]
            #[inline]
            pub const fn all() -> Self {
                Self {
                    $($member: true,)+
                    _ne: crate::NonExhaustive(()),
                }
            }

            /// Returns the value of the member called `name`, or `None` if there is no such
            /// member.
            pub fn get(&self, name: &str) -> Option<bool> {
                match name {
                    $(stringify!($member) => Some(self.$member),)+
                    _ => None,
                }
            }

            /// Sets the member called `name`. Returns `false` if there is no such member.
            pub fn set(&mut self, name: &str, value: bool) -> bool {
                match name {
                    $(stringify!($member) => {
                        self.$member = value;
                        true
                    })+
                    _ => false,
                }
            }

            /// Returns whether every member that is set in `other` is also set in `self`.
            #[inline]
            pub const fn contains(&self, other: &Self) -> bool {
                $((self.$member || !other.$member))&&+
            }

            /// Returns the union of `self` and `other`.
            #[inline]
            pub const fn union(&self, other: &Self) -> Self {
                Self {
                    $($member: self.$member || other.$member,)+
                    _ne: crate::NonExhaustive(()),
                }
            }

            /// Returns an iterator over the names of the members that are set.
            pub fn iter_enabled(&self) -> impl Iterator<Item = &'static str> + '_ {
                [$((stringify!($member), self.$member)),+]
                    .into_iter()
                    .filter_map(|(name, value)| value.then_some(name))
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                f.debug_set().entries(self.iter_enabled()).finish()
            }
        }
    };
}

pub(crate) use capability_flags;

mod extensions;
mod features;
mod properties;

/// Everything about a device that validation may consult.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceCapabilities {
    api_version: Version,
    enabled_features: DeviceFeatures,
    enabled_extensions: DeviceExtensions,
    properties: DeviceProperties,
    format_features: HashMap<Format, FormatFeatures>,
}

impl DeviceCapabilities {
    /// Returns capabilities for a device with the given API version, and nothing enabled.
    #[inline]
    pub fn new(api_version: Version) -> Self {
        Self {
            api_version,
            ..Default::default()
        }
    }

    /// Sets the enabled features.
    #[inline]
    pub fn with_features(mut self, features: DeviceFeatures) -> Self {
        self.enabled_features = features;
        self
    }

    /// Sets the enabled extensions.
    #[inline]
    pub fn with_extensions(mut self, extensions: DeviceExtensions) -> Self {
        self.enabled_extensions = extensions;
        self
    }

    /// Sets the device limits.
    #[inline]
    pub fn with_properties(mut self, properties: DeviceProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the optimal-tiling features supported for `format`.
    #[inline]
    pub fn with_format_features(mut self, format: Format, features: FormatFeatures) -> Self {
        self.format_features.insert(format, features);
        self
    }

    /// Fills in the format feature table that a typical desktop implementation reports.
    pub fn with_common_formats(mut self) -> Self {
        let color = FormatFeatures::SAMPLED_IMAGE
            | FormatFeatures::COLOR_ATTACHMENT
            | FormatFeatures::COLOR_ATTACHMENT_BLEND
            | FormatFeatures::TRANSFER_SRC
            | FormatFeatures::TRANSFER_DST;
        let integer_color = FormatFeatures::SAMPLED_IMAGE
            | FormatFeatures::COLOR_ATTACHMENT
            | FormatFeatures::TRANSFER_SRC
            | FormatFeatures::TRANSFER_DST;
        let depth_stencil = FormatFeatures::SAMPLED_IMAGE
            | FormatFeatures::DEPTH_STENCIL_ATTACHMENT
            | FormatFeatures::TRANSFER_SRC
            | FormatFeatures::TRANSFER_DST;

        for format in [
            Format::R8G8B8A8_UNORM,
            Format::R8G8B8A8_SRGB,
            Format::B8G8R8A8_UNORM,
            Format::B8G8R8A8_SRGB,
            Format::R16G16B16A16_SFLOAT,
            Format::R32_SFLOAT,
        ] {
            self.format_features
                .insert(format, color | FormatFeatures::VERTEX_BUFFER);
        }

        for format in [Format::R8G8B8A8_UINT, Format::R32_UINT] {
            self.format_features
                .insert(format, integer_color | FormatFeatures::VERTEX_BUFFER);
        }

        for format in [
            Format::R32G32_SFLOAT,
            Format::R32G32B32_SFLOAT,
            Format::R32G32B32A32_SFLOAT,
        ] {
            self.format_features.insert(
                format,
                FormatFeatures::VERTEX_BUFFER | FormatFeatures::SAMPLED_IMAGE,
            );
        }

        for format in [
            Format::D16_UNORM,
            Format::D32_SFLOAT,
            Format::S8_UINT,
            Format::D24_UNORM_S8_UINT,
            Format::D32_SFLOAT_S8_UINT,
        ] {
            self.format_features.insert(format, depth_stencil);
        }

        self
    }

    /// Returns the API version of the device.
    #[inline]
    pub fn api_version(&self) -> Version {
        self.api_version
    }

    /// Returns the features that are enabled on the device.
    #[inline]
    pub fn enabled_features(&self) -> &DeviceFeatures {
        &self.enabled_features
    }

    /// Returns the extensions that are enabled on the device.
    #[inline]
    pub fn enabled_extensions(&self) -> &DeviceExtensions {
        &self.enabled_extensions
    }

    /// Returns the limits of the device.
    #[inline]
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// Returns the optimal-tiling features of `format`. Formats missing from the table support
    /// nothing.
    #[inline]
    pub fn format_features(&self, format: Format) -> FormatFeatures {
        self.format_features
            .get(&format)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(feature = "serde")]
impl DeviceCapabilities {
    /// Parses capabilities from a JSON document. Missing fields take their default value.
    pub fn from_json_str(json: &str) -> Result<Self, CapabilitiesError> {
        let capabilities: Self = serde_json::from_str(json)?;
        capabilities.check()?;

        Ok(capabilities)
    }

    /// Reads capabilities from a JSON document.
    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self, CapabilitiesError> {
        let capabilities: Self = serde_json::from_reader(reader)?;
        capabilities.check()?;

        Ok(capabilities)
    }

    /// Writes the capabilities as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, CapabilitiesError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check(&self) -> Result<(), CapabilitiesError> {
        if self.api_version < Version::V1_0 {
            return Err(CapabilitiesError::UnsupportedApiVersion(self.api_version));
        }

        Ok(())
    }
}

/// Error that can happen when loading [`DeviceCapabilities`].
#[derive(Debug, Error)]
pub enum CapabilitiesError {
    #[cfg(feature = "serde")]
    #[error("failed to parse device capabilities")]
    Parse(#[from] serde_json::Error),

    #[error("API version {0} is not supported")]
    UnsupportedApiVersion(Version),
}
