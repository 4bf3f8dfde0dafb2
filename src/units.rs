//! This module defines the unit types used for quantities in the model and their conversions.
//!
//! Only arithmetic which makes physical sense is implemented, e.g. multiplying an [`Energy`] by a
//! [`MoneyPerEnergy`] gives [`Money`], but two amounts of [`Money`] cannot be multiplied together.
use serde::{Deserialize, Serialize};

/// The number of watts in a kilowatt
pub const WATTS_PER_KILOWATT: f64 = 1000.0;

macro_rules! unit_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
        )]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new instance of the unit type from an `f64` value
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Get the value of the unit type as an `f64`
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Round to the given number of decimal places
            pub fn round_dp(self, decimal_places: i32) -> Self {
                let factor = 10f64.powi(decimal_places);
                Self((self.0 * factor).round() / factor)
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }

        impl From<$name> for f64 {
            fn from(val: $name) -> Self {
                val.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl float_cmp::ApproxEq for $name {
            type Margin = float_cmp::F64Margin;

            fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
                self.0.approx_eq(other.0, margin)
            }
        }
    };
}

macro_rules! impl_dimensionless_ops {
    ($name:ident) => {
        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

unit_struct!(
    /// A dimensionless quantity, e.g. a rate or a proportion
    Dimensionless
);

impl Dimensionless {
    /// Raise to a floating-point power
    pub fn powf(self, rhs: f64) -> Self {
        Dimensionless(self.0.powf(rhs))
    }
}

// Base quantities
unit_struct!(
    /// An amount of money in dollars
    Money
);
unit_struct!(
    /// An amount of energy in kWh
    Energy
);
unit_struct!(
    /// Installed (DC) capacity in kW
    Capacity
);
unit_struct!(
    /// Installed (DC) capacity in W
    Watts
);

// Derived quantities
unit_struct!(
    /// A unit price of energy in $/kWh
    MoneyPerEnergy
);
unit_struct!(
    /// An installed cost in $/W
    MoneyPerWatt
);
unit_struct!(
    /// Annual energy yield per unit capacity in kWh/kW/year
    EnergyPerCapacity
);
unit_struct!(
    /// Annual cost per unit capacity in $/kW/year
    MoneyPerCapacity
);

impl_dimensionless_ops!(Money);
impl_dimensionless_ops!(MoneyPerEnergy);

impl Capacity {
    /// Convert to watts
    pub fn to_watts(self) -> Watts {
        Watts(self.0 * WATTS_PER_KILOWATT)
    }
}

// Multiplication rules
impl_mul!(MoneyPerWatt, Watts, Money);
impl_mul!(EnergyPerCapacity, Capacity, Energy);
impl_mul!(MoneyPerCapacity, Capacity, Money);
impl_mul!(Energy, MoneyPerEnergy, Money);

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_capacity_to_watts() {
        assert_eq!(Capacity(2.5).to_watts(), Watts(2500.0));
    }

    #[test]
    fn test_derived_units() {
        assert_eq!(MoneyPerWatt(2.0) * Watts(10.0), Money(20.0));
        assert_eq!(Capacity(3.0) * EnergyPerCapacity(100.0), Energy(300.0));
        assert_eq!(MoneyPerCapacity(15.0) * Capacity(10.0), Money(150.0));
        assert_eq!(Energy(14000.0) * MoneyPerEnergy(0.2), Money(2800.0));
        assert_eq!(Money(100.0) * Dimensionless(0.3), Money(30.0));
    }

    #[rstest]
    #[case(1.23456, 2, 1.23)]
    #[case(1.23556, 2, 1.24)]
    #[case(-14850.004, 2, -14850.0)]
    #[case(0.204_999_9, 4, 0.205)]
    fn test_round_dp(#[case] value: f64, #[case] decimal_places: i32, #[case] expected: f64) {
        assert_approx_eq!(
            Money,
            Money(value).round_dp(decimal_places),
            Money(expected),
            epsilon = 1e-12
        );
    }
}
