use supine_base::log;
use supine_camera::{Camera, CameraConfig, V4l2Camera};
use supine_com::FrameListener;
use supine_image::encode_jpeg;

const DEFAULT_ADDR: &str = "0.0.0.0:12345";
const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const JPEG_QUALITY: u8 = 80;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    supine_base::init_stdout_logger();

    // Parse address from args or use default
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    log::info!("Supine Camera");
    log::info!("Binding to: {}", addr);

    // Open camera
    let config = CameraConfig::default().with_width(WIDTH).with_height(HEIGHT);
    let mut camera = V4l2Camera::new(config)?;
    log::info!("Camera opened: {}x{}", WIDTH, HEIGHT);

    // Accept the single viewer connection
    let listener = FrameListener::bind(&addr).await?;
    log::info!("Waiting for viewer on {}...", listener.local_addr());
    let mut sender = listener.accept().await?;

    log::info!("Streaming...");

    // Capture, encode, send. No buffering and no rate limiting: a slow
    // network blocks the send and back-pressures capture directly.
    loop {
        // A capture failure is fatal: the device is assumed gone
        let frame = camera.recv().await?;

        let jpeg = encode_jpeg(&frame, JPEG_QUALITY)?;

        if let Err(e) = sender.send(&jpeg).await {
            log::info!("Viewer disconnected: {}", e);
            break;
        }
    }

    // Dropping the camera stops the capture thread and releases the device
    log::info!("Exiting...");
    Ok(())
}
