//! Raw customer observations.

use serde::{Deserialize, Serialize};

/// One customer observation as supplied by the data source.
///
/// `customer_id` is carried through to the final label map but never enters a
/// distance computation. Only the three numeric attributes are clustered, and
/// only after normalization (see [`crate::cluster::FeatureVector`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<I> {
    /// Opaque customer identity.
    pub customer_id: I,
    /// Customer age.
    pub age: f64,
    /// Customer income.
    pub income: f64,
    /// Purchase amount.
    pub purchase_amount: f64,
}

impl<I> Record<I> {
    /// Create a record.
    pub fn new(customer_id: I, age: f64, income: f64, purchase_amount: f64) -> Self {
        Self {
            customer_id,
            age,
            income,
            purchase_amount,
        }
    }

    /// The numeric attributes in feature order `(age, income, purchase_amount)`.
    #[inline]
    pub(crate) fn features(&self) -> [f64; 3] {
        [self.age, self.income, self.purchase_amount]
    }
}
