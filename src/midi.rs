use std::sync::Arc;

use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::{Error, Result};
use crate::note::{self, NoteEvent};
use crate::state::NoteState;

const CLIENT_NAME: &str = "midi-staff";

/// A selectable MIDI input port.
pub struct DeviceHandle {
    pub name: String,
    port: MidiInputPort,
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle").field("name", &self.name).finish()
    }
}

pub fn list_devices() -> Result<Vec<DeviceHandle>> {
    let midi_in = MidiInput::new(CLIENT_NAME)?;
    let devices = midi_in
        .ports()
        .into_iter()
        .map(|port| {
            let name = midi_in
                .port_name(&port)
                .unwrap_or_else(|_| "<unknown>".to_string());
            DeviceHandle { name, port }
        })
        .collect();
    Ok(devices)
}

pub fn name_matches(name: &str, pattern: &str) -> bool {
    name.to_lowercase().contains(&pattern.to_lowercase())
}

pub fn find_device(devices: &[DeviceHandle], pattern: &str) -> Option<usize> {
    devices.iter().position(|d| name_matches(&d.name, pattern))
}

/// Classifies a raw MIDI message. Anything that isn't a complete note-on or
/// note-off, or whose data bytes have the high bit set, yields `None`.
pub fn decode(message: &[u8]) -> Option<NoteEvent> {
    let &[status, key, velocity, ..] = message else {
        return None;
    };
    if key > 0x7F || velocity > 0x7F {
        return None;
    }
    let channel = status & 0x0F;

    match status & 0xF0 {
        0x90 => Some(NoteEvent::NoteOn {
            channel,
            key,
            velocity,
        }),
        0x80 => Some(NoteEvent::NoteOff { channel, key }),
        _ => None,
    }
}

/// Decodes `message` and queues the event without blocking the driver thread.
pub fn forward(message: &[u8], tx: &mpsc::Sender<NoteEvent>) {
    log::trace!("raw MIDI message: {message:02X?}");
    let Some(event) = decode(message) else {
        return;
    };
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            log::warn!("note queue full, dropping {event:?}");
        }
        Err(TrySendError::Closed(_)) => {
            log::warn!("note queue closed");
        }
    }
}

/// An open connection to one input port. Dropping it stops listening.
pub struct Listener {
    device: String,
    connection: Option<MidiInputConnection<()>>,
}

impl Listener {
    pub fn start(device: &DeviceHandle, tx: mpsc::Sender<NoteEvent>) -> Result<Self> {
        let mut midi_in = MidiInput::new(CLIENT_NAME)?;
        midi_in.ignore(Ignore::All);

        log::info!("Connecting to MIDI device: {}", device.name);
        let connection = midi_in
            .connect(
                &device.port,
                "midi-staff-read",
                move |_, message, _| forward(message, &tx),
                (),
            )
            .map_err(|e| Error::Connect {
                device: device.name.clone(),
                reason: e.to_string(),
            })?;

        log::info!("Listening for MIDI input from {}", device.name);
        Ok(Self {
            device: device.name.clone(),
            connection: Some(connection),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            log::info!("Stopped listening to {}", self.device);
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Applies queued events to `state` until every sender is gone.
pub async fn pump(mut rx: mpsc::Receiver<NoteEvent>, state: Arc<NoteState>) {
    while let Some(event) = rx.recv().await {
        match event {
            NoteEvent::NoteOn {
                channel,
                key,
                velocity,
            } if velocity > 0 => {
                log::info!("Note On: {} (channel {})", note::display_name(key), channel + 1);
            }
            NoteEvent::NoteOn { .. } => {}
            NoteEvent::NoteOff { channel, key } => {
                log::debug!("Note Off: {} (channel {})", note::display_name(key), channel + 1);
            }
        }
        state.apply(event);
    }
    log::debug!("note queue drained, pump exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::ActiveNote;

    #[test]
    fn test_decode_note_on() {
        assert_eq!(
            decode(&[0x93, 60, 100]),
            Some(NoteEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn test_decode_zero_velocity_stays_note_on() {
        assert_eq!(
            decode(&[0x90, 60, 0]),
            Some(NoteEvent::NoteOn {
                channel: 0,
                key: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn test_decode_note_off() {
        assert_eq!(
            decode(&[0x8F, 61, 64]),
            Some(NoteEvent::NoteOff {
                channel: 15,
                key: 61
            })
        );
    }

    #[test]
    fn test_decode_ignores_other_messages() {
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0x90]), None);
        assert_eq!(decode(&[0x90, 60]), None);
        assert_eq!(decode(&[0xB0, 64, 127]), None);
        assert_eq!(decode(&[0xF8]), None);
        assert_eq!(decode(&[0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7]), None);
    }

    #[test]
    fn test_decode_rejects_data_bytes_with_high_bit() {
        assert_eq!(decode(&[0x90, 0x90, 0x40]), None);
        assert_eq!(decode(&[0x90, 60, 0xFF]), None);
        assert_eq!(decode(&[0x80, 0xBC, 0]), None);
        assert_eq!(
            decode(&[0x90, 0x7F, 0x7F]),
            Some(NoteEvent::NoteOn {
                channel: 0,
                key: 127,
                velocity: 127
            })
        );
    }

    #[test]
    fn test_forward_drops_when_queue_full() {
        let (tx, mut rx) = mpsc::channel(1);
        forward(&[0x90, 60, 100], &tx);
        forward(&[0x90, 62, 100], &tx);
        forward(&[0xB0, 1, 1], &tx);
        assert_eq!(
            rx.try_recv().ok(),
            Some(NoteEvent::NoteOn {
                channel: 0,
                key: 60,
                velocity: 100
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forward_after_receiver_dropped_does_not_panic() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        forward(&[0x90, 60, 100], &tx);
    }

    #[test]
    fn test_name_matching_is_case_insensitive() {
        assert!(name_matches("Digital Piano:Digital Piano MIDI 1 24:0", "digital piano"));
        assert!(!name_matches("Midi Through Port-0", "piano"));
    }

    #[test]
    fn test_stop_is_idempotent_and_drop_is_safe() {
        let mut listener = Listener {
            device: "Digital Piano".into(),
            connection: None,
        };
        listener.stop();
        listener.stop();
        assert!(listener.connection.is_none());
        assert_eq!(listener.device(), "Digital Piano");
        drop(listener);
    }

    #[tokio::test]
    async fn test_pump_applies_events_in_order() {
        let state = Arc::new(NoteState::default());
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(pump(rx, Arc::clone(&state)));

        for message in [
            [0x90u8, 60, 100],
            [0x90, 64, 90],
            [0x80, 60, 0],
            [0x90, 67, 0],
        ] {
            forward(&message, &tx);
        }
        drop(tx);
        task.await.unwrap();

        let snap = state.snapshot();
        assert_eq!(snap.history, vec!["E4", "C4"]);
        assert_eq!(
            snap.active,
            Some(ActiveNote {
                midi: 64,
                velocity: 90
            })
        );
    }
}
