use serde::Deserialize;

/// Number of decimal places used for numeric label fields. Always within 0 to 3, values outside
/// are clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "i32")]
pub struct Rounding(u8);

impl Rounding {
    pub const MAX: u8 = 3;

    pub fn clamped(decimals: i32) -> Rounding {
        Rounding(decimals.clamp(0, Self::MAX as i32) as u8)
    }

    pub fn decimals(self) -> u8 {
        self.0
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Rounding(Self::MAX)
    }
}

impl From<i32> for Rounding {
    fn from(decimals: i32) -> Self {
        Rounding::clamped(decimals)
    }
}
