//! Resolution of opaque Vulkan handles into immutable snapshots.
//!
//! Validation never owns the objects it looks at. It asks an [`ObjectTable`] for the snapshot
//! behind each handle that a create info or render target refers to, and treats whatever it gets
//! back as valid for the duration of one call. [`ObjectRegistry`] is a thread-safe table that
//! hands out fresh handles for snapshots inserted into it.

use crate::{
    descriptor_set::DescriptorSetLayout, image::ImageView, pipeline::graphics::GraphicsPipeline,
    pipeline::layout::PipelineLayout, render_pass::RenderPass,
};
use ash::vk::{self, Handle};
use foldhash::HashMap;
use parking_lot::RwLock;
use std::{
    any::Any,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

/// A snapshot type that is referred to by a Vulkan handle.
pub trait TrackedObject: Send + Sync + 'static {
    /// The handle type that refers to objects of this type.
    type Handle: Handle + Copy;
}

impl TrackedObject for RenderPass {
    type Handle = vk::RenderPass;
}

impl TrackedObject for PipelineLayout {
    type Handle = vk::PipelineLayout;
}

impl TrackedObject for DescriptorSetLayout {
    type Handle = vk::DescriptorSetLayout;
}

impl TrackedObject for ImageView {
    type Handle = vk::ImageView;
}

impl TrackedObject for GraphicsPipeline {
    type Handle = vk::Pipeline;
}

/// Looks up the snapshot behind a handle.
pub trait ObjectTable {
    /// Returns the object that `handle` refers to, or `None` if it is null or unknown.
    fn get<T: TrackedObject>(&self, handle: T::Handle) -> Option<Arc<T>>;
}

type ObjectKey = (vk::ObjectType, u64);

/// A thread-safe [`ObjectTable`] that allocates handles for the objects inserted into it.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: RwLock<HashMap<ObjectKey, Arc<dyn Any + Send + Sync>>>,
    next_handle: AtomicU64,
}

impl ObjectRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `object` and returns a new, non-null handle for it.
    pub fn insert<T: TrackedObject>(&self, object: Arc<T>) -> T::Handle {
        let raw = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        self.objects
            .write()
            .insert((T::Handle::TYPE, raw), object as Arc<dyn Any + Send + Sync>);
        log::trace!("registered {:?} {:#x}", T::Handle::TYPE, raw);

        T::Handle::from_raw(raw)
    }

    /// Removes the object that `handle` refers to, and returns it.
    pub fn remove<T: TrackedObject>(&self, handle: T::Handle) -> Option<Arc<T>> {
        let object = self
            .objects
            .write()
            .remove(&(T::Handle::TYPE, handle.as_raw()))?;

        object.downcast::<T>().ok()
    }

    /// Returns the number of objects in the registry.
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }
}

impl ObjectTable for ObjectRegistry {
    fn get<T: TrackedObject>(&self, handle: T::Handle) -> Option<Arc<T>> {
        if handle.as_raw() == 0 {
            return None;
        }

        let object = self
            .objects
            .read()
            .get(&(T::Handle::TYPE, handle.as_raw()))
            .cloned()?;

        object.downcast::<T>().ok()
    }
}

impl<O: ObjectTable> ObjectTable for &O {
    #[inline]
    fn get<T: TrackedObject>(&self, handle: T::Handle) -> Option<Arc<T>> {
        (**self).get(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjectRegistry, ObjectTable};
    use crate::{
        format::Format,
        image::{ImageView, SampleCount},
        render_pass::RenderPass,
    };
    use ash::vk::{self, Handle};
    use std::sync::Arc;

    #[test]
    fn insert_get_remove() {
        let objects = ObjectRegistry::new();
        let view = Arc::new(ImageView::new(Format::R8G8B8A8_UNORM, SampleCount::Sample4));
        let handle = objects.insert(view.clone());

        assert!(!handle.is_null());
        assert_eq!(objects.get::<ImageView>(handle).as_deref(), Some(&*view));
        assert!(objects.get::<ImageView>(vk::ImageView::null()).is_none());

        // Same raw value, different object type.
        assert!(objects
            .get::<RenderPass>(vk::RenderPass::from_raw(handle.as_raw()))
            .is_none());

        assert!(objects.remove::<ImageView>(handle).is_some());
        assert!(objects.get::<ImageView>(handle).is_none());
        assert_eq!(objects.len(), 0);
    }

    #[test]
    fn handles_are_unique() {
        let objects = ObjectRegistry::new();
        let a = objects.insert(Arc::new(ImageView::new(
            Format::D32_SFLOAT,
            SampleCount::Sample1,
        )));
        let b = objects.insert(Arc::new(ImageView::new(
            Format::D32_SFLOAT,
            SampleCount::Sample1,
        )));

        assert_ne!(a, b);
        assert_eq!(objects.len(), 2);
    }
}
