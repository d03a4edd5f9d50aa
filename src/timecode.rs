use std::fmt;

// @module: SRT timecode conversion

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

// Offsets beyond this cannot be held in whole milliseconds
const MAX_SECONDS: f64 = 1.0e15;

// @const: Rendering of an unusable offset in annotated blocks
pub const INVALID_TIMECODE: &str = "--:--:--,---";

/// A subtitle timecode, or the marker for an offset that could not be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timecode {
    /// A valid `HH:MM:SS,mmm` offset
    At {
        hours: u64,
        minutes: u8,
        seconds: u8,
        millis: u16,
    },
    /// Offset was absent, negative, or not a finite number
    Invalid,
}

impl Timecode {
    /// Convert a fractional second offset into a timecode.
    ///
    /// Milliseconds are taken from the fractional part and rounded half away
    /// from zero; a rounded value of 1000 carries into the seconds, which in
    /// turn carry into minutes and hours.
    pub fn from_seconds(seconds: Option<f64>) -> Self {
        let Some(seconds) = seconds else {
            return Timecode::Invalid;
        };
        if !seconds.is_finite() || !(0.0..MAX_SECONDS).contains(&seconds) {
            return Timecode::Invalid;
        }

        let whole = seconds.floor();
        let millis = ((seconds - whole) * 1000.0).round() as u64;
        Self::from_millis(whole as u64 * MILLIS_PER_SECOND + millis)
    }

    /// Build a timecode from a whole number of milliseconds
    pub fn from_millis(total_ms: u64) -> Self {
        Timecode::At {
            hours: total_ms / MILLIS_PER_HOUR,
            minutes: ((total_ms % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE) as u8,
            seconds: ((total_ms % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND) as u8,
            millis: (total_ms % MILLIS_PER_SECOND) as u16,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Timecode::At { .. })
    }

    /// Total offset in milliseconds, `None` for the invalid marker
    pub fn as_millis(&self) -> Option<u64> {
        match *self {
            Timecode::At { hours, minutes, seconds, millis } => Some(
                hours * MILLIS_PER_HOUR
                    + minutes as u64 * MILLIS_PER_MINUTE
                    + seconds as u64 * MILLIS_PER_SECOND
                    + millis as u64,
            ),
            Timecode::Invalid => None,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Timecode::At { hours, minutes, seconds, millis } => {
                write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
            }
            Timecode::Invalid => f.write_str(INVALID_TIMECODE),
        }
    }
}

/// Convert a second offset straight to its SRT string, `None` when invalid
pub fn convert(seconds: Option<f64>) -> Option<String> {
    let timecode = Timecode::from_seconds(seconds);
    timecode.is_valid().then(|| timecode.to_string())
}
