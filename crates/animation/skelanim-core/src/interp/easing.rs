//! Penner easing curves.
//!
//! Every curve maps normalized progress `t ∈ [0, 1]` to eased progress with
//! `f(0) = 0` and `f(1) = 1`. Back and elastic curves overshoot in between.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const BACK_C1: f32 = 1.701_58;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EaseFamily {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
    Back,
    Elastic,
}

impl EaseFamily {
    pub const ALL: [EaseFamily; 9] = [
        EaseFamily::Quad,
        EaseFamily::Cubic,
        EaseFamily::Quart,
        EaseFamily::Quint,
        EaseFamily::Sine,
        EaseFamily::Expo,
        EaseFamily::Circ,
        EaseFamily::Back,
        EaseFamily::Elastic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Quad => "quad",
            Self::Cubic => "cubic",
            Self::Quart => "quart",
            Self::Quint => "quint",
            Self::Sine => "sine",
            Self::Expo => "expo",
            Self::Circ => "circ",
            Self::Back => "back",
            Self::Elastic => "elastic",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Polynomial degree for the power families.
    fn power(self) -> Option<i32> {
        match self {
            Self::Quad => Some(2),
            Self::Cubic => Some(3),
            Self::Quart => Some(4),
            Self::Quint => Some(5),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EaseDirection {
    In,
    Out,
    InOut,
}

impl EaseDirection {
    pub const ALL: [EaseDirection; 3] = [EaseDirection::In, EaseDirection::Out, EaseDirection::InOut];

    pub fn name(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inout",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }
}

/// One parametric ease (`family.direction`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ease {
    pub family: EaseFamily,
    pub direction: EaseDirection,
}

impl Ease {
    pub const fn new(family: EaseFamily, direction: EaseDirection) -> Self {
        Self { family, direction }
    }

    /// Elastic has no in-out variant.
    pub fn is_supported(self) -> bool {
        !(self.family == EaseFamily::Elastic && self.direction == EaseDirection::InOut)
    }

    /// All 26 supported eases in `family × direction` order.
    pub fn all() -> impl Iterator<Item = Ease> {
        EaseFamily::ALL.into_iter().flat_map(|family| {
            EaseDirection::ALL
                .into_iter()
                .map(move |direction| Ease::new(family, direction))
                .filter(|e| e.is_supported())
        })
    }

    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        ease(self, t)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family.name(), self.direction.name())
    }
}

/// Error for names that are not a supported `family.direction` pair.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown ease '{0}'")]
pub struct UnknownEase(pub String);

impl FromStr for Ease {
    type Err = UnknownEase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let parsed = lower.split_once('.').and_then(|(family, direction)| {
            Some(Ease::new(
                EaseFamily::from_name(family)?,
                EaseDirection::from_name(direction)?,
            ))
        });
        match parsed {
            Some(e) if e.is_supported() => Ok(e),
            _ => Err(UnknownEase(s.to_string())),
        }
    }
}

/// Evaluate an ease at `t`. Unsupported pairs evaluate as linear.
pub fn ease(e: Ease, t: f32) -> f32 {
    if let Some(n) = e.family.power() {
        return match e.direction {
            EaseDirection::In => t.powi(n),
            EaseDirection::Out => 1.0 - (1.0 - t).powi(n),
            EaseDirection::InOut => {
                // 2^(n-1) scales each half back onto [0, 0.5]
                let k = (1 << (n - 1)) as f32;
                if t < 0.5 {
                    k * t.powi(n)
                } else {
                    1.0 - k * (1.0 - t).powi(n)
                }
            }
        };
    }
    match (e.family, e.direction) {
        (EaseFamily::Sine, dir) => {
            if t <= 0.0 {
                return 0.0;
            }
            if t >= 1.0 {
                return 1.0;
            }
            match dir {
                EaseDirection::In => 1.0 - (t * PI / 2.0).cos(),
                EaseDirection::Out => (t * PI / 2.0).sin(),
                EaseDirection::InOut => -((PI * t).cos() - 1.0) / 2.0,
            }
        }
        (EaseFamily::Expo, dir) => match dir {
            EaseDirection::In => {
                if t == 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * t - 10.0)
                }
            }
            EaseDirection::Out => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * t)
                }
            }
            EaseDirection::InOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        },
        (EaseFamily::Circ, dir) => {
            if t <= 0.0 {
                return 0.0;
            }
            if t >= 1.0 {
                return 1.0;
            }
            match dir {
                EaseDirection::In => 1.0 - (1.0 - t * t).sqrt(),
                EaseDirection::Out => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
                EaseDirection::InOut => {
                    if t < 0.5 {
                        (1.0 - (1.0 - 4.0 * t * t).sqrt()) / 2.0
                    } else {
                        ((1.0 - 4.0 * (t - 1.0) * (t - 1.0)).sqrt() + 1.0) / 2.0
                    }
                }
            }
        }
        (EaseFamily::Back, dir) => {
            if t <= 0.0 {
                return 0.0;
            }
            if t >= 1.0 {
                return 1.0;
            }
            match dir {
                EaseDirection::In => BACK_C3 * t * t * t - BACK_C1 * t * t,
                EaseDirection::Out => {
                    let u = t - 1.0;
                    1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
                }
                EaseDirection::InOut => {
                    if t < 0.5 {
                        ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                    } else {
                        ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2)
                            + 2.0)
                            / 2.0
                    }
                }
            }
        }
        (EaseFamily::Elastic, EaseDirection::In) => {
            if t == 0.0 {
                0.0
            } else if t == 1.0 {
                1.0
            } else {
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
            }
        }
        (EaseFamily::Elastic, EaseDirection::Out) => {
            if t == 0.0 {
                0.0
            } else if t == 1.0 {
                1.0
            } else {
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
            }
        }
        _ => t,
    }
}
