//! Street View camera framing.
//!
//! Taller buildings need a wider field of view and a steeper pitch to fit in
//! the frame. The framing is a hand-tuned step function of the floor count,
//! expressed as an ordered list of rules where later matches override earlier
//! ones. Some rules set only the field of view, so the overlap between them
//! matters: 7 floors keeps the `>= 5` framing while 6 widens it.

/// Floor count assumed when the record has none.
pub const DEFAULT_FLOORS: f64 = 2.0;

/// Framing used when no rule matches.
pub const BASE_AIM: CameraAim = CameraAim { fov: 65, pitch: 10 };

/// Field of view and pitch for a Street View request, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraAim {
    pub fov: u32,
    pub pitch: u32,
}

#[derive(Debug, Clone, Copy)]
enum Floors {
    Exactly(f64),
    AtLeast(f64),
}

impl Floors {
    fn matches(self, floors: f64) -> bool {
        match self {
            Floors::Exactly(n) => floors == n,
            Floors::AtLeast(n) => floors >= n,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    when: Floors,
    fov: u32,
    pitch: Option<u32>,
}

/// Evaluated top to bottom; every matching rule is applied.
const RULES: [Rule; 6] = [
    Rule {
        when: Floors::Exactly(3.0),
        fov: 72,
        pitch: None,
    },
    Rule {
        when: Floors::Exactly(4.0),
        fov: 76,
        pitch: Some(15),
    },
    Rule {
        when: Floors::AtLeast(5.0),
        fov: 81,
        pitch: Some(20),
    },
    Rule {
        when: Floors::Exactly(6.0),
        fov: 86,
        pitch: None,
    },
    Rule {
        when: Floors::AtLeast(8.0),
        fov: 90,
        pitch: Some(25),
    },
    Rule {
        when: Floors::AtLeast(10.0),
        fov: 90,
        pitch: Some(30),
    },
];

/// Returns the camera framing for a building with `floors` floors.
///
/// A missing or zero floor count is treated as [`DEFAULT_FLOORS`].
pub fn aim_camera(floors: Option<f64>) -> CameraAim {
    let floors = floors.filter(|f| *f != 0.0).unwrap_or(DEFAULT_FLOORS);

    RULES
        .iter()
        .filter(|rule| rule.when.matches(floors))
        .fold(BASE_AIM, |aim, rule| CameraAim {
            fov: rule.fov,
            pitch: rule.pitch.unwrap_or(aim.pitch),
        })
}
