//! The `run` command: stream raw positions through the pipeline and
//! print the announcements a speech driver would speak.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use guia::config::ConfigFile;
use guia::notify::NotificationQueue;
use guia::position::RawPosition;
use guia::service::GuiaService;

use crate::error::CliError;

/// How often the consumer loop polls the queue.
const DRAIN_INTERVAL: Duration = Duration::from_millis(200);

/// Grace period after the input ends, so in-flight resolutions can
/// finish and announce.
const SETTLE_PERIOD: Duration = Duration::from_secs(2);

/// Feed JSON-line positions from `input` (or stdin) into the pipeline.
pub async fn run(config: ConfigFile, input: Option<PathBuf>) -> Result<(), CliError> {
    let service = GuiaService::new(&config)?;
    let queue = service.queue().clone();

    let cancel = CancellationToken::new();
    let consumer = tokio::spawn(consumer_loop(queue, cancel.clone()));

    let feed_result = tokio::select! {
        result = feed(&service, input) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };

    // Let pending resolutions land before stopping the consumer.
    tokio::time::sleep(SETTLE_PERIOD).await;
    cancel.cancel();
    let _ = consumer.await;

    feed_result
}

/// Read and submit positions line by line.
async fn feed<C: guia::geocoder::GeocodeClient + 'static>(
    service: &GuiaService<C>,
    input: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut submitted: u64 = 0;
    let mut rejected: u64 = 0;

    match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path).await?;
            let mut lines = BufReader::new(file).lines();
            while let Some(line) = lines.next_line().await? {
                submit_line(service, &line, &mut submitted, &mut rejected);
            }
        }
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                submit_line(service, &line, &mut submitted, &mut rejected);
            }
        }
    }

    info!(submitted, rejected, "Input finished");
    Ok(())
}

fn submit_line<C: guia::geocoder::GeocodeClient + 'static>(
    service: &GuiaService<C>,
    line: &str,
    submitted: &mut u64,
    rejected: &mut u64,
) {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return;
    }

    let raw: RawPosition = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Skipping unparseable position line");
            *rejected += 1;
            return;
        }
    };

    match service.submit(&raw) {
        Ok(event) => {
            debug!(kind = event.kind(), "Reading processed");
            *submitted += 1;
        }
        Err(e) => {
            warn!(error = %e, "Reading rejected");
            *rejected += 1;
        }
    }
}

/// Drain the queue until cancelled, printing announcements in the order
/// a speech driver would speak them.
async fn consumer_loop(queue: Arc<NotificationQueue>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                drain(&queue);
                break;
            }
            _ = tokio::time::sleep(DRAIN_INTERVAL) => {
                drain(&queue);
            }
        }
    }
}

fn drain(queue: &NotificationQueue) {
    while let Some(announcement) = queue.dequeue() {
        println!(
            "[{}] (p{}) {}",
            chrono::Local::now().format("%H:%M:%S"),
            announcement.priority,
            announcement.text
        );
    }
}
