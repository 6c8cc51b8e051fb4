#![cfg(test)]

/// Creates the capabilities of a Vulkan 1.3 device with a typical format table, and with the
/// given features enabled on top of the ones that Vulkan 1.3 requires.
macro_rules! test_device {
    ($($feature:ident),* $(,)?) => {{
        use crate::device::{DeviceCapabilities, DeviceFeatures};

        let _ = env_logger::builder().is_test(true).try_init();

        #[allow(unused_mut)]
        let mut features = DeviceFeatures {
            dynamic_rendering: true,
            extended_dynamic_state: true,
            extended_dynamic_state2: true,
            multiview: true,
            robust_image_access: true,
            ..DeviceFeatures::empty()
        };

        $(
            features.$feature = true;
        )*

        DeviceCapabilities::new(crate::Version::V1_3)
            .with_features(features)
            .with_common_formats()
    }};
}

/// Like `test_device!`, but also enables the given device extensions.
macro_rules! test_device_with_extensions {
    ([$($feature:ident),* $(,)?], [$($extension:ident),* $(,)?]) => {{
        let device = test_device!($($feature),*);

        #[allow(unused_mut)]
        let mut extensions = *device.enabled_extensions();

        $(
            extensions.$extension = true;
        )*

        device.with_extensions(extensions)
    }};
}
