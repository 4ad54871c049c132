//! GPU context bring-up for the wgpu draw backend.

use std::sync::Arc;

/// Shared wgpu instance, adapter, device and queue.
///
/// The quad pipeline samples a runtime-indexed texture binding array, so
/// the device is requested with the binding-array feature set and a raised
/// binding-array element limit.
pub struct GraphicsContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GraphicsContext {
    /// Texture units the device must be able to bind in one draw call.
    pub const MAX_BOUND_TEXTURES: u32 = 32;

    /// Features the slot-table binding model needs.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::TEXTURE_BINDING_ARRAY
            | wgpu::Features::SAMPLED_TEXTURE_AND_STORAGE_BUFFER_ARRAY_NON_UNIFORM_INDEXING
    }

    /// Device limits that must be raised above the defaults.
    pub fn required_limits() -> wgpu::Limits {
        let mut limits = wgpu::Limits::default();
        limits.max_binding_array_elements_per_shader_stage = Self::MAX_BOUND_TEXTURES;
        limits
    }

    /// Creates a new graphics context synchronously.
    ///
    /// See [`GraphicsContext::new`] for the asynchronous version.
    pub fn new_sync() -> Arc<Self> {
        pollster::block_on(Self::new())
    }

    /// Creates a new graphics context asynchronously.
    pub async fn new() -> Arc<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to find a suitable GPU adapter");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: Self::required_features(),
                required_limits: Self::required_limits(),
                label: None,
                ..Default::default()
            })
            .await
            .expect("Failed to create device");

        Arc::new(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}
