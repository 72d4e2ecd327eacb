// src/location/tracker.rs
//! Subscribing to a location source and delivering fixes in order

use super::{fix::Fix, gpsd, nmea};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
    task::JoinHandle,
};
use tokio_serial::SerialPortBuilderExt;

/// Where position reports come from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Serial { port: String, baudrate: u32 },
    Gpsd { host: String, port: u16 },
}

impl LocationSource {
    /// The source named by the config, or `None` when tracking is disabled
    pub fn from_config(config: &GameConfig) -> Result<Option<Self>> {
        match config.location_source.as_str() {
            "none" => Ok(None),
            "gpsd" => Ok(Some(Self::Gpsd {
                host: config.gpsd_host.clone().unwrap_or_else(|| "localhost".to_string()),
                port: config.gpsd_port.unwrap_or(2947),
            })),
            "serial" => {
                let port = config
                    .serial_port
                    .clone()
                    .ok_or_else(|| GameError::Config("serial source needs serial_port".to_string()))?;
                Ok(Some(Self::Serial {
                    port,
                    baudrate: config.serial_baudrate.unwrap_or(9600),
                }))
            }
            other => Err(GameError::Config(format!("Unknown location source: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationEventKind {
    Fix(Fix),
    /// The feed failed or timed out; no further events follow
    Error(String),
}

/// An event tagged with the subscription that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct LocationEvent {
    pub subscription: u64,
    pub kind: LocationEventKind,
}

/// Handle to a running feed; dropping it does not stop the feed, `cancel` does
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop delivery. No fix is sent after this returns.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

/// Starts feeds and hands out subscription ids
#[derive(Debug, Clone)]
pub struct LocationTracker {
    next_id: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<LocationEvent>,
    timeout: Duration,
}

impl LocationTracker {
    pub fn new(events: mpsc::UnboundedSender<LocationEvent>, timeout: Duration) -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            events,
            timeout,
        }
    }

    /// Connect to `source` and start forwarding fixes.
    ///
    /// Connection failures are returned directly; anything after that
    /// arrives as a [`LocationEventKind::Error`] event.
    pub async fn start(&self, source: &LocationSource) -> Result<Subscription> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancelled = Arc::new(AtomicBool::new(false));

        let task = match source {
            LocationSource::Gpsd { host, port } => {
                tracing::info!("Connecting to gpsd at {}:{}...", host, port);
                let reader = gpsd::connect_gpsd(host, *port).await?;
                self.spawn_reader(id, Arc::clone(&cancelled), reader, gpsd::parse_gpsd_json)
            }
            LocationSource::Serial { port, baudrate } => {
                tracing::info!("Opening {} at {} baud...", port, baudrate);
                let serial = tokio_serial::new(port, *baudrate)
                    .timeout(Duration::from_millis(1000))
                    .open_native_async()?;
                self.spawn_reader(id, Arc::clone(&cancelled), BufReader::new(serial), |line| {
                    Ok(nmea::parse_nmea_sentence(line))
                })
            }
        };

        Ok(Subscription { id, cancelled, task })
    }

    fn spawn_reader<R, P>(
        &self,
        id: u64,
        cancelled: Arc<AtomicBool>,
        reader: R,
        parse: P,
    ) -> JoinHandle<()>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        P: Fn(&str) -> Result<Option<Fix>> + Send + 'static,
    {
        let events = self.events.clone();
        let timeout = self.timeout;
        tokio::spawn(pump_lines(id, cancelled, reader, parse, events, timeout))
    }
}

/// Read lines until the feed ends, fails, times out or is cancelled
async fn pump_lines<R, P>(
    id: u64,
    cancelled: Arc<AtomicBool>,
    mut reader: R,
    parse: P,
    events: mpsc::UnboundedSender<LocationEvent>,
    timeout: Duration,
) where
    R: AsyncBufRead + Unpin,
    P: Fn(&str) -> Result<Option<Fix>>,
{
    let send = |kind: LocationEventKind| {
        if cancelled.load(Ordering::SeqCst) {
            return false;
        }
        events.send(LocationEvent { subscription: id, kind }).is_ok()
    };

    let mut line = String::new();
    loop {
        line.clear();
        let read = match tokio::time::timeout(timeout, reader.read_line(&mut line)).await {
            Ok(read) => read,
            Err(_) => {
                send(LocationEventKind::Error(format!(
                    "No location data within {} s",
                    timeout.as_secs_f64()
                )));
                break;
            }
        };

        match read {
            Ok(0) => {
                send(LocationEventKind::Error("Location feed closed".to_string()));
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse(line) {
                    Ok(Some(fix)) => {
                        if !send(LocationEventKind::Fix(fix)) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Skipping location line: {}", e),
                }
            }
            Err(e) => {
                send(LocationEventKind::Error(format!("Error reading location feed: {}", e)));
                break;
            }
        }
    }

    tracing::debug!("Location subscription {} finished", id);
}
