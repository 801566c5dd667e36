use std::sync::OnceLock;

static ACCELERATED: OnceLock<bool> = OnceLock::new();

/// Whether a hardware GPU adapter is available.
///
/// Probes a throwaway, surface-less instance once per process; backend
/// panics and software rasterizers both count as "no".
pub fn supports_accelerated_rendering() -> bool {
    *ACCELERATED.get_or_init(|| {
        let accelerated = probe();
        log::info!("Accelerated rendering available: {}", accelerated);
        accelerated
    })
}

fn probe() -> bool {
    match std::panic::catch_unwind(|| pollster::block_on(request_adapter_info())) {
        Ok(Some(info)) => {
            log::debug!("Probe adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);
            is_accelerated(info.device_type)
        }
        Ok(None) => false,
        Err(_) => {
            log::warn!("GPU probe panicked; treating as unsupported");
            false
        }
    }
}

async fn request_adapter_info() -> Option<wgpu::AdapterInfo> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });

    instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .ok()
        .map(|adapter| adapter.get_info())
}

pub fn is_accelerated(device_type: wgpu::DeviceType) -> bool {
    !matches!(device_type, wgpu::DeviceType::Cpu)
}
