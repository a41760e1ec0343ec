//! Physical units for dimensioned model parameters.
//!
//! Parameter values are stored as declared (`0.2 nF`) and converted to SI
//! with [`Quantity::to_si`] when they are bound into an integrator.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Physical dimension of a quantity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dimension {
    Time,
    Voltage,
    Current,
    Conductance,
    Capacitance,
    Frequency,
    Dimensionless,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Dimension::Time          => "time",
            Dimension::Voltage       => "voltage",
            Dimension::Current       => "current",
            Dimension::Conductance   => "conductance",
            Dimension::Capacitance   => "capacitance",
            Dimension::Frequency     => "frequency",
            Dimension::Dimensionless => "dimensionless",
        };
        f.write_str(s)
    }
}

/// A unit of measurement.  Parsed from / displayed as its symbol.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Unit {
    Second,
    Millisecond,
    Volt,
    Millivolt,
    Ampere,
    Nanoampere,
    Picoampere,
    Siemens,
    Microsiemens,
    Nanosiemens,
    Farad,
    Nanofarad,
    Picofarad,
    Hertz,
    Dimensionless,
}

impl Unit {
    /// Multiply a value in this unit by the factor to obtain SI.
    pub fn si_factor(self) -> f64 {
        match self {
            Unit::Second        => 1.0,
            Unit::Millisecond   => 1e-3,
            Unit::Volt          => 1.0,
            Unit::Millivolt     => 1e-3,
            Unit::Ampere        => 1.0,
            Unit::Nanoampere    => 1e-9,
            Unit::Picoampere    => 1e-12,
            Unit::Siemens       => 1.0,
            Unit::Microsiemens  => 1e-6,
            Unit::Nanosiemens   => 1e-9,
            Unit::Farad         => 1.0,
            Unit::Nanofarad     => 1e-9,
            Unit::Picofarad     => 1e-12,
            Unit::Hertz         => 1.0,
            Unit::Dimensionless => 1.0,
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Second | Unit::Millisecond => Dimension::Time,
            Unit::Volt | Unit::Millivolt => Dimension::Voltage,
            Unit::Ampere | Unit::Nanoampere | Unit::Picoampere => Dimension::Current,
            Unit::Siemens | Unit::Microsiemens | Unit::Nanosiemens => Dimension::Conductance,
            Unit::Farad | Unit::Nanofarad | Unit::Picofarad => Dimension::Capacitance,
            Unit::Hertz => Dimension::Frequency,
            Unit::Dimensionless => Dimension::Dimensionless,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Second        => "s",
            Unit::Millisecond   => "ms",
            Unit::Volt          => "V",
            Unit::Millivolt     => "mV",
            Unit::Ampere        => "A",
            Unit::Nanoampere    => "nA",
            Unit::Picoampere    => "pA",
            Unit::Siemens       => "S",
            Unit::Microsiemens  => "uS",
            Unit::Nanosiemens   => "nS",
            Unit::Farad         => "F",
            Unit::Nanofarad     => "nF",
            Unit::Picofarad     => "pF",
            Unit::Hertz         => "Hz",
            Unit::Dimensionless => "dimensionless",
        }
    }
}

impl FromStr for Unit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim() {
            "s"                        => Unit::Second,
            "ms"                       => Unit::Millisecond,
            "V"                        => Unit::Volt,
            "mV"                       => Unit::Millivolt,
            "A"                        => Unit::Ampere,
            "nA"                       => Unit::Nanoampere,
            "pA"                       => Unit::Picoampere,
            "S"                        => Unit::Siemens,
            "uS"                       => Unit::Microsiemens,
            "nS"                       => Unit::Nanosiemens,
            "F"                        => Unit::Farad,
            "nF"                       => Unit::Nanofarad,
            "pF"                       => Unit::Picofarad,
            "Hz"                       => Unit::Hertz,
            "" | "dimensionless" | "1" => Unit::Dimensionless,
            other => return Err(CoreError::UnknownUnit(other.to_owned())),
        };
        Ok(unit)
    }
}

impl TryFrom<String> for Unit {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Unit> for String {
    fn from(u: Unit) -> String {
        u.symbol().to_owned()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value with a unit.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    pub value: f64,
    pub unit:  Unit,
}

impl Quantity {
    #[inline]
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Convert to SI base units.
    #[inline]
    pub fn to_si(self) -> f64 {
        self.value * self.unit.si_factor()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
