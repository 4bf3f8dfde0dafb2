//! Fixtures for tests
use crate::assumptions::EconomicAssumptions;
use crate::prices::PriceTable;
use crate::units::MoneyPerEnergy;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Assert that the result is an error of type `ModelError::InvalidInput`
macro_rules! assert_invalid_input {
    ($result:expr) => {
        let err = $result.unwrap_err();
        assert!(
            matches!(
                crate::error::model_error(&err),
                Some(crate::error::ModelError::InvalidInput(_))
            ),
            "Expected invalid input error, got: {err:?}"
        );
    };
}
pub(crate) use assert_invalid_input;

#[fixture]
pub fn assumptions() -> EconomicAssumptions {
    EconomicAssumptions::default()
}

#[fixture]
pub fn price_table() -> PriceTable {
    PriceTable::from_pairs([
        ("California", MoneyPerEnergy(0.3)),
        ("Sunland", MoneyPerEnergy(0.2)),
        ("Texas", MoneyPerEnergy(0.14)),
    ])
}
