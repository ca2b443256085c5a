//! Capture controller state machine.
//!
//! `Idle -> Armed -> Recording -> Stopping -> Stopped`. A failed codec
//! negotiation leaves the controller `Armed` with the stream kept for the
//! next attempt. Platform callbacks re-enter through [`CaptureController::on_chunk`]
//! and [`CaptureController::on_recorder_stopped`], tagged with the session
//! they belong to.

use crate::chunks::ChunkBuffer;
use crate::codec::{self, CodecCandidate};
use crate::config::{CaptureSettings, InlineView, LookingGlassConfig};
use crate::error::{CaptureError, Result};
use crate::export::{export_filename, ExportKind};
use crate::platform::CapturePlatform;
use crate::state::{CaptureState, ControlsView, SessionId};

enum Phase<S, R> {
    Idle,
    Armed { stream: S },
    Recording { stream: S, recorder: R, session: SessionId },
    Stopping { session: SessionId },
    Stopped { session: SessionId },
}

impl<S, R> Phase<S, R> {
    fn state(&self) -> CaptureState {
        match self {
            Phase::Idle => CaptureState::Idle,
            Phase::Armed { .. } => CaptureState::Armed,
            Phase::Recording { .. } => CaptureState::Recording,
            Phase::Stopping { .. } => CaptureState::Stopping,
            Phase::Stopped { .. } => CaptureState::Stopped,
        }
    }

    fn session(&self) -> Option<SessionId> {
        match self {
            Phase::Recording { session, .. } | Phase::Stopping { session } | Phase::Stopped { session } => {
                Some(*session)
            }
            Phase::Idle | Phase::Armed { .. } => None,
        }
    }
}

/// Details of a recording that was started
#[derive(Debug, Clone, PartialEq)]
pub struct StartedRecording {
    pub session: SessionId,
    pub codec: CodecCandidate,
    /// View mode that was replaced by the quilt, if it was not already set
    pub previous_view: Option<InlineView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Started(StartedRecording),
    Stopped,
}

pub struct CaptureController<P: CapturePlatform> {
    platform: P,
    settings: CaptureSettings,
    phase: Phase<P::Stream, P::Recorder>,
    chunks: ChunkBuffer<P::Chunk>,
    next_session: u64,
}

impl<P: CapturePlatform> CaptureController<P> {
    pub fn new(platform: P, settings: CaptureSettings) -> Self {
        Self {
            platform,
            settings,
            phase: Phase::Idle,
            chunks: ChunkBuffer::new(),
            next_session: 1,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.phase.state()
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.phase.session()
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn chunks(&self) -> &ChunkBuffer<P::Chunk> {
        &self.chunks
    }

    pub fn controls(&self) -> ControlsView {
        ControlsView::for_state(self.state(), &self.settings.labels)
    }

    /// Push the current controls view to the platform
    pub fn sync_controls(&mut self) {
        let view = self.controls();
        self.platform.update_controls(&view);
    }

    /// Record button action: start when not recording, stop otherwise
    pub fn toggle(&mut self, cfg: &mut LookingGlassConfig) -> Result<ToggleOutcome> {
        if self.state() == CaptureState::Recording {
            self.stop(cfg)?;
            Ok(ToggleOutcome::Stopped)
        } else {
            self.start(cfg).map(ToggleOutcome::Started)
        }
    }

    /// Acquire the canvas capture stream. No-op when already armed.
    pub fn arm(&mut self) -> Result<()> {
        match self.phase {
            Phase::Armed { .. } => return Ok(()),
            Phase::Recording { .. } => {
                return Err(CaptureError::InvalidTransition {
                    action: "arm capture",
                    state: self.state(),
                })
            }
            Phase::Idle | Phase::Stopping { .. } | Phase::Stopped { .. } => {}
        }

        let stream = self.platform.capture_stream()?;
        log::info!("[Capture] Started stream capture from canvas");
        self.phase = Phase::Armed { stream };
        Ok(())
    }

    /// Start a new recording session.
    ///
    /// Sets `capturing`, forces the quilt view and clears any previous
    /// session's chunks before negotiating a recorder.
    pub fn start(&mut self, cfg: &mut LookingGlassConfig) -> Result<StartedRecording> {
        if self.state() == CaptureState::Recording {
            return Err(CaptureError::InvalidTransition {
                action: "start recording",
                state: self.state(),
            });
        }
        self.arm()?;

        let stream = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Armed { stream } => stream,
            other => {
                let state = other.state();
                self.phase = other;
                return Err(CaptureError::InvalidTransition {
                    action: "start recording",
                    state,
                });
            }
        };

        cfg.capturing = true;
        let previous_view = if cfg.inline_view != InlineView::Quilt {
            Some(std::mem::replace(&mut cfg.inline_view, InlineView::Quilt))
        } else {
            None
        };

        self.chunks.clear();
        let session = SessionId(self.next_session);
        self.next_session += 1;

        let platform = &mut self.platform;
        let negotiated = codec::negotiate(&self.settings.codecs, |candidate| {
            platform.create_recorder(&stream, candidate, session)
        })
        .map(|(recorder, candidate)| (recorder, candidate.clone()));

        let (recorder, codec) = match negotiated {
            Ok(found) => found,
            Err(e) => {
                log::error!("[Capture] Exception while creating MediaRecorder: {}", e);
                Self::abort_start(cfg, previous_view);
                self.phase = Phase::Armed { stream };
                self.platform.notify_user(&self.settings.unsupported_message);
                self.sync_controls();
                return Err(e);
            }
        };

        if let Err(e) = self.platform.start_recorder(&recorder, self.settings.timeslice_ms) {
            log::error!("[Capture] MediaRecorder failed to start: {}", e);
            Self::abort_start(cfg, previous_view);
            self.phase = Phase::Armed { stream };
            self.sync_controls();
            return Err(e);
        }

        log::info!(
            "[Capture] MediaRecorder started (session {}, mimeType {}, timeslice {}ms)",
            session.0,
            codec,
            self.settings.timeslice_ms
        );
        self.phase = Phase::Recording {
            stream,
            recorder,
            session,
        };
        self.sync_controls();

        Ok(StartedRecording {
            session,
            codec,
            previous_view,
        })
    }

    fn abort_start(cfg: &mut LookingGlassConfig, previous_view: Option<InlineView>) {
        cfg.capturing = false;
        if let Some(view) = previous_view {
            cfg.inline_view = view;
        }
    }

    /// Stop the running recorder and release the canvas stream.
    ///
    /// The video is assembled when the platform reports the recorder stopped.
    pub fn stop(&mut self, cfg: &mut LookingGlassConfig) -> Result<()> {
        let (stream, recorder, session) = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Recording {
                stream,
                recorder,
                session,
            } => (stream, recorder, session),
            other => {
                let state = other.state();
                self.phase = other;
                return Err(CaptureError::InvalidTransition {
                    action: "stop recording",
                    state,
                });
            }
        };

        let stopped = self.platform.stop_recorder(recorder);
        self.platform.release_stream(stream);
        cfg.capturing = false;
        self.phase = Phase::Stopping { session };
        self.sync_controls();

        log::info!(
            "[Capture] Recording stopped (session {}): {} chunks, {} bytes so far",
            session.0,
            self.chunks.len(),
            self.chunks.total_bytes()
        );
        stopped
    }

    /// Recorder delivered a chunk
    pub fn on_chunk(&mut self, session: SessionId, chunk: P::Chunk) {
        match self.phase {
            Phase::Recording { session: current, .. } | Phase::Stopping { session: current } if current == session => {
                if !self.chunks.push(chunk) {
                    log::debug!("[Capture] Dropped empty chunk");
                }
            }
            _ => {
                log::debug!("[Capture] Ignoring chunk from stale session {}", session.0);
            }
        }
    }

    /// Recorder reported it has stopped: assemble the video and show it in the preview
    pub fn on_recorder_stopped(&mut self, session: SessionId) -> Result<()> {
        match self.phase {
            Phase::Stopping { session: current } if current == session => {}
            _ => {
                log::debug!("[Capture] Ignoring stop event from session {} while {}", session.0, self.state());
                return Ok(());
            }
        }

        self.phase = Phase::Stopped { session };
        self.sync_controls();

        let video = self
            .platform
            .assemble_video(self.chunks.chunks(), &self.settings.video_mime_type)?;
        self.platform.present_video(&video)?;
        log::info!(
            "[Capture] Recorder stopped: {} chunks, {} bytes",
            self.chunks.len(),
            self.chunks.total_bytes()
        );
        Ok(())
    }

    /// Download the recorded video; returns the filename used
    pub fn export_video(&mut self, cfg: &LookingGlassConfig) -> Result<String> {
        if self.state() == CaptureState::Recording {
            return Err(CaptureError::InvalidTransition {
                action: "export video",
                state: self.state(),
            });
        }
        if self.chunks.is_empty() {
            return Err(CaptureError::NothingRecorded);
        }

        let video = self
            .platform
            .assemble_video(self.chunks.chunks(), &self.settings.video_mime_type)?;
        let filename = export_filename(cfg, ExportKind::Video);
        self.platform
            .download_video(video, &filename, self.settings.release_delay_ms)?;
        log::info!("[Capture] Video download started: {}", filename);
        Ok(filename)
    }

    /// Download the current framebuffer as a PNG; returns the filename used.
    ///
    /// `cfg.capturing` should already be set so the renderer is producing the
    /// full-resolution quilt.
    pub fn export_image(&mut self, cfg: &LookingGlassConfig) -> Result<String> {
        if !cfg.capturing {
            log::warn!("[Capture] capturing is off, the screenshot may not contain the full quilt");
        }

        let mut frame = self
            .platform
            .read_framebuffer(cfg.framebuffer_width, cfg.framebuffer_height)?;
        frame.flip_rows();
        let image = self.platform.encode_image(&frame)?;
        let filename = export_filename(cfg, ExportKind::Image);
        self.platform.download_image(image, &filename)?;
        log::info!("[Capture] Image download started: {}", filename);
        Ok(filename)
    }
}
