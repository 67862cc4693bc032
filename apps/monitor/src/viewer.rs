use minifb::{Key, Window, WindowOptions};
use supine_base::log;
use supine_com::{ComError, FrameReceiver};
use supine_image::{decode_jpeg, RgbFrame};
use supine_pipeline::{AnalysisDispatcher, Deduplicator, PipelineConfig};
use supine_pose::{Analyzer, PoseConfig, YoloPoseDetector};
use tokio::sync::mpsc;

const DEFAULT_ADDR: &str = "127.0.0.1:12345";
const DEFAULT_MODEL: &str = "models/yolov8n-pose.onnx";

/// Convert HWC RGB buffer to packed ARGB u32 for minifb
fn rgb_to_argb(buf: &[u8], width: usize, height: usize) -> Vec<u32> {
    let mut argb = Vec::with_capacity(width * height);
    for i in 0..width * height {
        let idx = i * 3;
        let r = buf[idx] as u32;
        let g = buf[idx + 1] as u32;
        let b = buf[idx + 2] as u32;
        argb.push((r << 16) | (g << 8) | b);
    }
    argb
}

/// Receive and decode frames, forwarding them to the presentation loop.
///
/// Owns the connection. Decode failures skip the frame; a clean close ends
/// the task; any other transport error is forwarded and ends the session.
async fn receive_loop(mut receiver: FrameReceiver, tx: mpsc::Sender<Result<RgbFrame, ComError>>) {
    loop {
        let payload = match receiver.recv().await {
            Ok(payload) => payload,
            Err(ComError::ConnectionClosed) => {
                log::info!("Camera closed the stream");
                break;
            }
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                break;
            }
        };

        // Corrupt or truncated frames are skipped, the session continues
        let frame = match decode_jpeg(&payload) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("Dropping undecodable frame ({} bytes): {}", payload.len(), e);
                continue;
            }
        };

        if tx.send(Ok(frame)).await.is_err() {
            // Presentation loop is gone
            break;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    supine_base::init_stdout_logger();

    // Parse address from args or use default
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let model_path =
        std::env::var("SUPINE_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    log::info!("Supine Viewer");
    log::info!("Connecting to: {}", addr);
    let receiver = FrameReceiver::connect(&addr).await?;
    log::info!("Connected to camera");

    // Analysis worker pool; every worker owns its own detector session
    let pose_config = PoseConfig::default();
    let pipeline_config = PipelineConfig::default();
    let (mut dispatcher, mut display) = AnalysisDispatcher::spawn(&pipeline_config, || {
        let detector = YoloPoseDetector::from_file(&model_path, pose_config.clone())?;
        Ok(Analyzer::new(Box::new(detector))
            .with_keypoint_threshold(pose_config.tracking_confidence()))
    })?;
    log::info!("Pose model loaded: {}", model_path);

    // The receive loop runs as its own task so the window and the exit poll
    // stay live while the stream stalls; frames cross over a small bounded
    // channel that back-pressures the connection when analysis lags.
    let (frame_tx, mut frame_rx) = mpsc::channel::<Result<RgbFrame, ComError>>(2);
    let receive_task = tokio::spawn(receive_loop(receiver, frame_tx));

    // First decodable frame fixes the window dimensions
    log::info!("Waiting for first frame...");
    let first = match frame_rx.recv().await {
        Some(Ok(frame)) => frame,
        Some(Err(e)) => {
            display.close();
            dispatcher.shutdown();
            return Err(e.into());
        }
        None => {
            log::info!("Stream ended before the first frame");
            display.close();
            dispatcher.shutdown();
            return Ok(());
        }
    };
    let width = first.width() as usize;
    let height = first.height() as usize;
    log::info!("Received first frame: {}x{}", width, height);

    let mut window = Window::new(
        "Supine Monitor - ESC to exit",
        width,
        height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    let mut dedup = Deduplicator::new();
    dedup.accept(&first);
    dispatcher.dispatch(first).await?;

    let mut session_error: Option<ComError> = None;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        match frame_rx.try_recv() {
            Ok(Ok(frame)) => {
                if frame.width() as usize != width || frame.height() as usize != height {
                    log::warn!(
                        "Frame dimension mismatch: expected {}x{}, got {}x{}",
                        width,
                        height,
                        frame.width(),
                        frame.height()
                    );
                } else if dedup.accept(&frame) {
                    // Blocks when the analysis queue is full (backpressure).
                    // Completed frames keep rendering while the dispatch
                    // waits, so a full pipeline always drains.
                    let mut dispatch = std::pin::pin!(dispatcher.dispatch(frame));
                    let dispatched = loop {
                        tokio::select! {
                            result = &mut dispatch => break result,
                            _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => {
                                if let Some(result) = display.try_pop() {
                                    let argb = rgb_to_argb(result.frame.data(), width, height);
                                    window.update_with_buffer(&argb, width, height)?;
                                }
                            }
                        }
                    };
                    if dispatched.is_err() {
                        break;
                    }
                }
            }
            Ok(Err(e)) => {
                session_error = Some(e);
                break;
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Clean end of stream; show what has already completed
                if display.is_finished() {
                    break;
                }
            }
        }

        // Present the oldest completed analysis, if one is ready; otherwise
        // keep showing the previous frame
        if let Some(result) = display.try_pop() {
            let argb = rgb_to_argb(result.frame.data(), width, height);
            window.update_with_buffer(&argb, width, height)?;
        } else {
            window.update();
        }
    }

    log::info!("Shutting down...");
    receive_task.abort();
    let _ = receive_task.await;

    // Close the display side first so no worker stays blocked handing over
    // a completion, then drain and join the pool
    display.close();
    dispatcher.shutdown();

    match session_error {
        Some(e) => {
            log::error!("Session failed: {}", e);
            Err(e.into())
        }
        None => {
            log::info!("Exiting...");
            Ok(())
        }
    }
}
