//! Brings the platform up on this host, reports what was selected, pumps a
//! number of frames and tears everything down again.
//!
//! Usage: `nabu-probe [frames]`

use std::time::Duration;

use anyhow::{Context, Result};
use nabu_platform::logging::{LoggingConfig, init_logging};
use nabu_platform::{Event, EventQueue, InitOptions, Platform};

const DEFAULT_FRAMES: u32 = 120;
const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let frames = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u32>()
            .with_context(|| format!("invalid frame count {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let events = EventQueue::new();
    let options = InitOptions::default().title("nabu probe").size(640, 360);
    let mut platform =
        Platform::init(events.clone(), &options).context("platform initialization failed")?;

    log::info!(
        "backend={:?} refresh={}Hz gamemode={:?}",
        platform.backend_kind(),
        platform.refresh_rate(),
        platform.gamemode()
    );
    log::info!("surface descriptor: {:?}", platform.surface_descriptor());

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    // SAFETY: the surface is dropped below, before `deinit`.
    let surface = unsafe { platform.create_surface(&instance) }
        .context("failed to create a wgpu surface from the descriptor")?;

    match pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    })) {
        Ok(adapter) => log::info!("surface is presentable on {}", adapter.get_info().name),
        Err(e) => log::warn!("no adapter can present to the surface: {e}"),
    }

    'frames: for frame in 0..frames {
        platform.update().context("event pump failed")?;

        for event in events.drain() {
            match event {
                Event::CloseRequested => {
                    log::info!("close requested at frame {frame}");
                    break 'frames;
                }
                Event::Resized { width, height } => log::debug!("resized to {width}x{height}"),
                Event::Input(input) => log::trace!("{input:?}"),
            }
        }

        std::thread::sleep(FRAME_TIME);
    }

    drop(surface);
    platform.deinit();
    Ok(())
}
