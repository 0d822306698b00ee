use crate::error::{Error, ErrorOrigin};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

///
/// Float64
///
/// Float as the in-memory evaluator and orderer see it. NaN and infinities
/// never get in, and -0.0 is folded into 0.0, so equality, hashing and
/// ordering can all work off the bit pattern.
///

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Display, Serialize)]
#[serde(transparent)]
pub struct Float64(f64);

impl Float64 {
    /// `None` for NaN and the infinities.
    #[must_use]
    pub fn try_new(v: f64) -> Option<Self> {
        v.is_finite().then(|| Self(v + 0.0))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float64 {}

impl Hash for Float64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Ord for Float64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Float64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<f64> for Float64 {
    type Error = Error;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::try_new(v).ok_or_else(|| {
            Error::validation(ErrorOrigin::Convert, format!("float {v} is not finite"))
        })
    }
}

impl From<Float64> for f64 {
    fn from(x: Float64) -> Self {
        x.0
    }
}

impl<'de> Deserialize<'de> for Float64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;

        Self::try_from(raw).map_err(de::Error::custom)
    }
}

///
/// TESTS
///
