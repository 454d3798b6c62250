use karavid::{
    BlockSurface, CancelToken, ExportDriver, FrameRgba, KaravidResult, RenderSettings, Scene,
    VideoSink, lrc,
};

/// Sink that keeps every encoded frame in memory.
#[derive(Default)]
struct CollectingSink {
    frames: Vec<FrameRgba>,
    finished: bool,
}

impl VideoSink for CollectingSink {
    fn write_frame(&mut self, frame: &FrameRgba) -> KaravidResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
    fn finish(&mut self) -> KaravidResult<()> {
        self.finished = true;
        Ok(())
    }
    fn discard(&mut self) -> KaravidResult<()> {
        self.frames.clear();
        Ok(())
    }
}

/// Makes the driver's `tracing::debug!` events visible under `--nocapture`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn settings() -> RenderSettings {
    RenderSettings {
        width: 64,
        height: 64,
        fps: 5,
        font_size: 8.0,
        line_height: 16.0,
        ..Default::default()
    }
}

#[test]
fn block_surface_export_produces_every_frame() {
    init_tracing();
    let settings = settings();
    let mut surface = BlockSurface::new(settings.clone()).unwrap();
    let scene = Scene::with_linear_wipe(lrc::sample_timeline(), settings, &surface).unwrap();

    let mut sink = CollectingSink::default();
    ExportDriver::new()
        .run(&scene, &mut surface, &mut sink, &CancelToken::new(), |_| {})
        .unwrap();

    assert!(sink.finished);
    assert_eq!(sink.frames.len() as u64, ExportDriver::frame_count(&scene));
    assert!(sink.frames.iter().all(|f| f.width == 64 && f.height == 64));
}

#[test]
fn repeated_exports_are_pixel_identical() {
    init_tracing();
    let settings = settings();
    let mut surface = BlockSurface::new(settings.clone()).unwrap();
    let scene = Scene::with_linear_wipe(lrc::sample_timeline(), settings, &surface).unwrap();

    let mut first = CollectingSink::default();
    ExportDriver::new()
        .run(&scene, &mut surface, &mut first, &CancelToken::new(), |_| {})
        .unwrap();

    let mut second = CollectingSink::default();
    ExportDriver::new()
        .run(&scene, &mut surface, &mut second, &CancelToken::new(), |_| {})
        .unwrap();

    assert_eq!(first.frames.len(), second.frames.len());
    for (a, b) in first.frames.iter().zip(&second.frames) {
        assert_eq!(a.data, b.data);
    }
}
