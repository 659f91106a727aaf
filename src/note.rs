/// A catalog note: display name, MIDI number and staff position
/// (0 = anchor line, positive above, negative below).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub name: &'static str,
    pub midi: u8,
    pub position: i32,
}

const fn note(name: &'static str, midi: u8, position: i32) -> Note {
    Note {
        name,
        midi,
        position,
    }
}

/// Naturals from C3 to C6, centred around middle C.
pub const NOTES: [Note; 22] = [
    note("C3", 48, -8),
    note("D3", 50, -7),
    note("E3", 52, -6),
    note("F3", 53, -5),
    note("G3", 55, -4),
    note("A3", 57, -3),
    note("B3", 59, -2),
    note("C4", 60, -1),
    note("D4", 62, 0),
    note("E4", 64, 1),
    note("F4", 65, 2),
    note("G4", 67, 3),
    note("A4", 69, 4),
    note("B4", 71, 5),
    note("C5", 72, 2),
    note("D5", 74, 3),
    note("E5", 76, 4),
    note("F5", 77, 5),
    note("G5", 79, 6),
    note("A5", 81, 7),
    note("B5", 83, 8),
    note("C6", 84, 9),
];

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Catalog entry for `midi`, or an unnamed note two semitones per staff step
/// away from middle C.
pub fn lookup(midi: u8) -> Note {
    NOTES
        .iter()
        .copied()
        .find(|n| n.midi == midi)
        .unwrap_or(Note {
            name: "",
            midi,
            position: (i32::from(midi) - 60).div_euclid(2),
        })
}

pub fn staff_position(midi: u8) -> i32 {
    lookup(midi).position
}

/// Scientific pitch name using sharps, e.g. 61 -> "C#4".
pub fn pitch_name(midi: u8) -> String {
    let octave = i32::from(midi / 12) - 1;
    format!("{}{}", PITCH_CLASSES[usize::from(midi % 12)], octave)
}

/// The catalog name when there is one, otherwise the chromatic name.
pub fn display_name(midi: u8) -> String {
    match lookup(midi).name {
        "" => pitch_name(midi),
        name => name.to_string(),
    }
}

/// The note that is currently sounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveNote {
    pub midi: u8,
    pub velocity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8 },
}
