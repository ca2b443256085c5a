//! Integration tests for the capture controller against an in-memory platform.

use common::{
    CaptureController, CaptureError, CapturePlatform, CaptureSettings, CaptureState, CodecCandidate,
    ControlsView, Frame, InlineView, LookingGlassConfig, SessionId, ToggleOutcome,
};

#[derive(Default)]
struct MockPlatform {
    accepted: Vec<&'static str>,
    attempts: Vec<String>,
    notifications: Vec<String>,
    controls: Vec<ControlsView>,
    streams_opened: u32,
    streams_released: u32,
    timeslices: Vec<u32>,
    recorders_stopped: Vec<SessionId>,
    presented: Vec<Vec<u8>>,
    video_downloads: Vec<(String, Vec<u8>, u32)>,
    image_downloads: Vec<(String, Vec<u8>)>,
    framebuffer: Option<Vec<u8>>,
    reject_start: bool,
}

impl MockPlatform {
    fn accepting(accepted: &[&'static str]) -> Self {
        Self {
            accepted: accepted.to_vec(),
            ..Self::default()
        }
    }

    fn last_controls(&self) -> &ControlsView {
        self.controls.last().expect("controls were never updated")
    }
}

impl CapturePlatform for MockPlatform {
    type Stream = u32;
    type Recorder = (String, SessionId);
    type Chunk = Vec<u8>;
    type Video = Vec<u8>;
    type Image = Vec<u8>;

    fn capture_stream(&mut self) -> common::error::Result<u32> {
        self.streams_opened += 1;
        Ok(self.streams_opened)
    }

    fn release_stream(&mut self, _stream: u32) {
        self.streams_released += 1;
    }

    fn create_recorder(
        &mut self,
        _stream: &u32,
        codec: &CodecCandidate,
        session: SessionId,
    ) -> common::error::Result<(String, SessionId)> {
        self.attempts.push(codec.mime_type.clone());
        if self.accepted.contains(&codec.mime_type.as_str()) {
            Ok((codec.mime_type.clone(), session))
        } else {
            Err(CaptureError::Platform(format!("NotSupportedError: {}", codec)))
        }
    }

    fn start_recorder(&mut self, _recorder: &(String, SessionId), timeslice_ms: u32) -> common::error::Result<()> {
        if self.reject_start {
            return Err(CaptureError::Platform("InvalidStateError".to_string()));
        }
        self.timeslices.push(timeslice_ms);
        Ok(())
    }

    fn stop_recorder(&mut self, recorder: (String, SessionId)) -> common::error::Result<()> {
        self.recorders_stopped.push(recorder.1);
        Ok(())
    }

    fn assemble_video(&mut self, chunks: &[Vec<u8>], _mime_type: &str) -> common::error::Result<Vec<u8>> {
        Ok(chunks.concat())
    }

    fn present_video(&mut self, video: &Vec<u8>) -> common::error::Result<()> {
        self.presented.push(video.clone());
        Ok(())
    }

    fn read_framebuffer(&mut self, width: u32, height: u32) -> common::error::Result<Frame> {
        match self.framebuffer.clone() {
            Some(pixels) => Frame::new(width, height, pixels),
            None => Err(CaptureError::RenderingContextUnavailable("webgl2".to_string())),
        }
    }

    fn encode_image(&mut self, frame: &Frame) -> common::error::Result<Vec<u8>> {
        Ok(frame.rgba.clone())
    }

    fn download_video(&mut self, video: Vec<u8>, filename: &str, release_after_ms: u32) -> common::error::Result<()> {
        self.video_downloads.push((filename.to_string(), video, release_after_ms));
        Ok(())
    }

    fn download_image(&mut self, image: Vec<u8>, filename: &str) -> common::error::Result<()> {
        self.image_downloads.push((filename.to_string(), image));
        Ok(())
    }

    fn notify_user(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn update_controls(&mut self, view: &ControlsView) {
        self.controls.push(view.clone());
    }
}

fn controller(accepted: &[&'static str]) -> CaptureController<MockPlatform> {
    CaptureController::new(MockPlatform::accepting(accepted), CaptureSettings::default())
}

fn quilt_config() -> LookingGlassConfig {
    LookingGlassConfig {
        quilt_width: 4,
        quilt_height: 2,
        aspect: 1.6,
        framebuffer_width: 1,
        framebuffer_height: 2,
        ..LookingGlassConfig::default()
    }
}

fn started_session(outcome: ToggleOutcome) -> SessionId {
    match outcome {
        ToggleOutcome::Started(started) => started.session,
        ToggleOutcome::Stopped => panic!("expected recording to start"),
    }
}

#[test]
fn test_chunks_assembled_in_arrival_order() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();

    let session = started_session(ctl.toggle(&mut cfg).unwrap());
    ctl.on_chunk(session, vec![1, 2]);
    ctl.on_chunk(session, Vec::new());
    ctl.on_chunk(session, vec![3]);
    assert_eq!(ctl.toggle(&mut cfg).unwrap(), ToggleOutcome::Stopped);
    assert_eq!(ctl.state(), CaptureState::Stopping);

    // Final chunk is flushed between stop() and the stop event
    ctl.on_chunk(session, vec![4, 5]);
    ctl.on_recorder_stopped(session).unwrap();

    assert_eq!(ctl.state(), CaptureState::Stopped);
    assert_eq!(ctl.platform().presented, vec![vec![1, 2, 3, 4, 5]]);
    assert_eq!(ctl.chunks().len(), 3);
}

#[test]
fn test_start_stop_restores_controls() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();
    ctl.sync_controls();
    let initial = ctl.platform().last_controls().clone();
    assert_eq!(initial.record_label, "Record");
    assert!(!initial.download_enabled);
    assert_eq!(initial.preview_controls, None);

    ctl.toggle(&mut cfg).unwrap();
    assert!(cfg.capturing);
    let recording = ctl.platform().last_controls();
    assert_eq!(recording.record_label, "Stop Recording");
    assert!(!recording.download_enabled);
    assert_eq!(recording.preview_controls, None);

    ctl.toggle(&mut cfg).unwrap();
    assert!(!cfg.capturing);
    let stopped = ctl.platform().last_controls();
    assert_eq!(stopped.record_label, initial.record_label);
    assert!(stopped.download_enabled);
    assert_eq!(stopped.preview_controls, Some(true));
    assert_eq!(ctl.platform().streams_released, 1);
    assert_eq!(ctl.platform().timeslices, vec![100]);
}

#[test]
fn test_third_codec_accepted_without_notification() {
    let mut ctl = controller(&["video/h264"]);
    let mut cfg = quilt_config();

    match ctl.toggle(&mut cfg).unwrap() {
        ToggleOutcome::Started(started) => assert_eq!(started.codec.mime_type, "video/h264"),
        ToggleOutcome::Stopped => panic!("expected recording to start"),
    }
    assert_eq!(ctl.state(), CaptureState::Recording);
    assert_eq!(
        ctl.platform().attempts,
        vec!["video/webm", "video/webm,codecs=h264", "video/h264"]
    );
    assert!(ctl.platform().notifications.is_empty());
}

#[test]
fn test_all_codecs_rejected_leaves_clean_state() {
    let mut ctl = controller(&[]);
    let mut cfg = quilt_config();

    for attempt in 1..=2 {
        let result = ctl.toggle(&mut cfg);
        assert!(matches!(result, Err(CaptureError::Unsupported { attempts: 3 })));
        assert_eq!(ctl.state(), CaptureState::Armed);
        assert_eq!(ctl.platform().notifications.len(), attempt);
        assert!(ctl.chunks().is_empty());
        assert!(!cfg.capturing);
        assert_eq!(ctl.platform().last_controls().record_label, "Record");
    }
    assert!(ctl.platform().notifications[0].contains("MediaRecorder is not supported"));

    // Platform gains support; the armed stream is reused
    ctl.platform_mut().accepted = vec!["video/webm"];
    let session = started_session(ctl.toggle(&mut cfg).unwrap());
    assert!(ctl.chunks().is_empty());
    assert_eq!(ctl.current_session(), Some(session));
    assert_eq!(ctl.platform().streams_opened, 1);
    assert_eq!(ctl.platform().notifications.len(), 2);
}

#[test]
fn test_rejected_start_restores_view_mode() {
    let mut ctl = controller(&[]);
    let mut cfg = LookingGlassConfig {
        inline_view: InlineView::Center,
        ..quilt_config()
    };
    assert!(ctl.toggle(&mut cfg).is_err());
    assert_eq!(cfg.inline_view, InlineView::Center);
    assert!(!cfg.capturing);
}

#[test]
fn test_recorder_start_failure_restores_config() {
    let mut ctl = controller(&["video/webm"]);
    ctl.platform_mut().reject_start = true;
    let mut cfg = LookingGlassConfig {
        inline_view: InlineView::Swizzled,
        ..quilt_config()
    };

    assert!(matches!(ctl.toggle(&mut cfg), Err(CaptureError::Platform(_))));
    assert_eq!(ctl.state(), CaptureState::Armed);
    assert_eq!(ctl.current_session(), None);
    assert!(!cfg.capturing);
    assert_eq!(cfg.inline_view, InlineView::Swizzled);
    assert_eq!(ctl.platform().last_controls().record_label, "Record");
    assert!(!ctl.platform().last_controls().download_enabled);
    assert!(ctl.platform().notifications.is_empty());

    // The armed stream is reused once the recorder starts
    ctl.platform_mut().reject_start = false;
    started_session(ctl.toggle(&mut cfg).unwrap());
    assert_eq!(ctl.state(), CaptureState::Recording);
    assert_eq!(ctl.platform().streams_opened, 1);
}

#[test]
fn test_recording_forces_quilt_view() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = LookingGlassConfig {
        inline_view: InlineView::Swizzled,
        ..quilt_config()
    };
    match ctl.toggle(&mut cfg).unwrap() {
        ToggleOutcome::Started(started) => assert_eq!(started.previous_view, Some(InlineView::Swizzled)),
        ToggleOutcome::Stopped => panic!("expected recording to start"),
    }
    assert_eq!(cfg.inline_view, InlineView::Quilt);

    ctl.toggle(&mut cfg).unwrap();
    match ctl.toggle(&mut cfg).unwrap() {
        ToggleOutcome::Started(started) => assert_eq!(started.previous_view, None),
        ToggleOutcome::Stopped => panic!("expected recording to start"),
    }
}

#[test]
fn test_video_export_filename_and_payload() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();

    let session = started_session(ctl.toggle(&mut cfg).unwrap());
    ctl.on_chunk(session, vec![9, 8]);
    ctl.toggle(&mut cfg).unwrap();
    ctl.on_recorder_stopped(session).unwrap();

    let filename = ctl.export_video(&cfg).unwrap();
    assert_eq!(filename, "hologram_qs4x2a1.6.webm");
    assert_eq!(
        ctl.platform().video_downloads,
        vec![("hologram_qs4x2a1.6.webm".to_string(), vec![9, 8], 100)]
    );

    cfg.quilt_width = 5;
    assert_eq!(ctl.export_video(&cfg).unwrap(), "hologram_qs5x2a1.6.webm");
}

#[test]
fn test_new_recording_resets_unexported_buffer() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();

    let first = started_session(ctl.toggle(&mut cfg).unwrap());
    ctl.on_chunk(first, vec![1, 1, 1]);
    ctl.toggle(&mut cfg).unwrap();
    ctl.on_recorder_stopped(first).unwrap();
    assert_eq!(ctl.chunks().len(), 1);

    let second = started_session(ctl.toggle(&mut cfg).unwrap());
    assert_ne!(first, second);
    assert!(ctl.chunks().is_empty());
    assert_eq!(ctl.platform().streams_opened, 2);
}

#[test]
fn test_stale_session_callbacks_ignored() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();

    let first = started_session(ctl.toggle(&mut cfg).unwrap());
    ctl.toggle(&mut cfg).unwrap();
    // Restart before the first recorder reported its stop
    let second = started_session(ctl.toggle(&mut cfg).unwrap());

    ctl.on_chunk(first, vec![7]);
    ctl.on_recorder_stopped(first).unwrap();
    assert!(ctl.chunks().is_empty());
    assert_eq!(ctl.state(), CaptureState::Recording);
    assert!(ctl.platform().presented.is_empty());

    ctl.on_chunk(second, vec![8]);
    assert_eq!(ctl.chunks().total_bytes(), 1);
}

#[test]
fn test_stop_while_idle_is_an_error() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();
    match ctl.stop(&mut cfg) {
        Err(CaptureError::InvalidTransition { state, .. }) => assert_eq!(state, CaptureState::Idle),
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
    assert!(ctl.platform().recorders_stopped.is_empty());
}

#[test]
fn test_video_export_requires_finished_capture() {
    let mut ctl = controller(&["video/webm"]);
    let mut cfg = quilt_config();
    assert!(matches!(ctl.export_video(&cfg), Err(CaptureError::NothingRecorded)));

    let session = started_session(ctl.toggle(&mut cfg).unwrap());
    ctl.on_chunk(session, vec![1]);
    assert!(matches!(
        ctl.export_video(&cfg),
        Err(CaptureError::InvalidTransition {
            state: CaptureState::Recording,
            ..
        })
    ));
    assert!(ctl.platform().video_downloads.is_empty());
}

#[test]
fn test_image_export_flips_rows() {
    let mut ctl = controller(&[]);
    let mut cfg = quilt_config();
    cfg.capturing = true;
    ctl.platform_mut().framebuffer = Some(vec![1, 1, 1, 1, 2, 2, 2, 2]);

    let filename = ctl.export_image(&cfg).unwrap();
    assert_eq!(filename, "hologram_qs4x2a1.6.png");
    assert_eq!(
        ctl.platform().image_downloads,
        vec![(filename, vec![2, 2, 2, 2, 1, 1, 1, 1])]
    );
}

#[test]
fn test_image_export_reports_missing_context() {
    let mut ctl = controller(&[]);
    let cfg = quilt_config();
    assert!(matches!(
        ctl.export_image(&cfg),
        Err(CaptureError::RenderingContextUnavailable(_))
    ));
    assert!(ctl.platform().image_downloads.is_empty());
}

#[test]
fn test_image_export_rejects_oversized_framebuffer() {
    let mut ctl = controller(&[]);
    let cfg = LookingGlassConfig {
        framebuffer_width: u32::MAX,
        framebuffer_height: u32::MAX,
        ..quilt_config()
    };
    ctl.platform_mut().framebuffer = Some(Vec::new());

    assert!(matches!(
        ctl.export_image(&cfg),
        Err(CaptureError::FrameTooLarge { .. })
    ));
    assert!(ctl.platform().image_downloads.is_empty());
}
