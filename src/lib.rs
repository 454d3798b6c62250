#![forbid(unsafe_code)]

pub mod clock;
pub mod ease;
pub mod error;
pub mod eval;
pub mod export;
pub mod highlight;
pub mod layout;
pub mod lrc;
pub mod playback;
pub mod scroll;
pub mod session;
pub mod settings;
pub mod sink;
pub mod surface;
pub mod timeline;

pub use clock::{AudioTransport, LocalClock};
pub use ease::Ease;
pub use error::{KaravidError, KaravidResult};
pub use eval::{FrameState, LineFrame, Scene};
pub use export::{CancelToken, ExportDriver, ExportOutcome, ExportProgress, FramePacer};
pub use highlight::{EasedWipe, HighlightExtent, LinearWipe, WipeEffect, highlight_extent};
pub use layout::{LineLayout, SyllableSpan, TextMeasurer};
pub use playback::{PlaybackDriver, PlaybackState};
pub use scroll::ScrollCurve;
pub use session::{Session, SessionMode};
pub use settings::RenderSettings;
pub use sink::{EncodeConfig, FfmpegSink, VideoSink, default_mp4_config, is_ffmpeg_on_path};
pub use surface::{BlockSurface, FrameRgba, RenderSurface};
pub use timeline::{Line, Syllable, Timeline};
