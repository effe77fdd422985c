use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use compass_core::{GeoPosition, OrientationEvent, SubscriptionRegistry};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::display_controller::Input;

/// Largest datagram accepted from a sensor bridge
const MAX_DATAGRAM: usize = 4096;

/// Sensor event as received from the platform bridge, one JSON object per
/// datagram or line, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorEvent {
    Orientation(OrientationEvent),
    /// Answer to the platform's permission prompt
    OrientationPermission { granted: bool },
    /// The device has no orientation capability
    OrientationUnavailable,
    /// The platform withdrew access mid-session
    OrientationRevoked,
    Position(GeoPosition),
    /// Geolocation error with the platform's numeric code
    PositionError { code: u16 },
    /// The device has no geolocation capability
    PositionUnavailable,
}

impl SensorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SensorEvent::Orientation(_) => "orientation",
            SensorEvent::OrientationPermission { .. } => "orientation_permission",
            SensorEvent::OrientationUnavailable => "orientation_unavailable",
            SensorEvent::OrientationRevoked => "orientation_revoked",
            SensorEvent::Position(_) => "position",
            SensorEvent::PositionError { .. } => "position_error",
            SensorEvent::PositionUnavailable => "position_unavailable",
        }
    }
}

/// What a handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Changed the display state
    Accepted,
    /// Carried no usable reading
    Dropped,
    /// Valid, but outranked by a better source
    Suppressed,
    /// Not meant for this handler, or its subscription is not active
    Ignored,
}

/// Components that consume sensor events.
///
/// Every handler sees every event and picks out the ones it cares about,
/// so the dispatch loop does not need to know which monitor wants what.
pub trait EventHandler {
    fn handle_event(&mut self, event: &SensorEvent, registry: &mut SubscriptionRegistry) -> EventOutcome;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    Empty,
    NotUtf8,
    Json(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "empty event"),
            DecodeError::NotUtf8 => write!(f, "event is not valid UTF-8"),
            DecodeError::Json(e) => write!(f, "malformed event: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}

pub fn decode_line(line: &str) -> Result<SensorEvent, DecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }
    serde_json::from_str(line).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Decode a datagram. A bridge may batch several events into one datagram,
/// one per line.
pub fn decode_datagram(bytes: &[u8]) -> Vec<Result<SensorEvent, DecodeError>> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(_) => return vec![Err(DecodeError::NotUtf8)],
    };

    let events: Vec<_> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(decode_line)
        .collect();

    if events.is_empty() {
        vec![Err(DecodeError::Empty)]
    } else {
        events
    }
}

fn to_input(decoded: Result<SensorEvent, DecodeError>) -> Input {
    match decoded {
        Ok(event) => Input::Event(event),
        Err(e) => Input::Malformed(e),
    }
}

/// Receive events over UDP until the pipeline goes away.
pub async fn read_udp_events(listen: String, tx: mpsc::Sender<Input>) -> std::io::Result<()> {
    let socket = UdpSocket::bind(&listen).await?;
    info!("Listening for sensor events on udp://{}", socket.local_addr()?);

    let mut buf = vec![0u8; MAX_DATAGRAM];
    loop {
        let (len, peer) = socket.recv_from(&mut buf).await?;
        for decoded in decode_datagram(&buf[..len]) {
            if let Err(e) = &decoded {
                debug!(%peer, "Dropping datagram: {}", e);
            }
            if tx.send(to_input(decoded)).await.is_err() {
                debug!("Pipeline closed, stopping UDP reader");
                return Ok(());
            }
        }
    }
}

/// Feed a recorded JSON-lines session into the pipeline. Blank lines and
/// lines starting with `#` are skipped.
pub async fn replay_events(path: PathBuf, interval: Duration, tx: mpsc::Sender<Input>) -> std::io::Result<()> {
    let file = tokio::fs::File::open(&path).await?;
    info!("Replaying sensor events from {}", path.display());

    let mut lines = BufReader::new(file).lines();
    let mut line_number = 0usize;
    let mut replayed = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let decoded = decode_line(trimmed);
        if let Err(e) = &decoded {
            warn!("{}:{}: {}", path.display(), line_number, e);
        }
        if tx.send(to_input(decoded)).await.is_err() {
            debug!("Pipeline closed, stopping replay");
            return Ok(());
        }
        replayed += 1;

        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    info!("Replay of {} finished after {} events", path.display(), replayed);
    Ok(())
}
