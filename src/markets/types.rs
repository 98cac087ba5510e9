//! Request types for market creation.

use alloy::primitives::{ChainId, U256};
use bon::Builder;
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::reality::{DEFAULT_LANGUAGE, QuestionType, encode_question_text};

/// Token in a multi-scalar question template replaced by each outcome label.
pub const OUTCOME_PLACEHOLDER: &str = "[PLACEHOLDER]";

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum MarketType {
    /// One outcome out of a list wins.
    Categorical = 1,
    /// Payout is spread between two outcomes according to a numeric answer within bounds.
    Scalar = 2,
    /// One numeric answer per outcome.
    MultiScalar = 3,
}

/// User-entered parameters of a new market.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct CreateMarketRequest {
    pub market_type: MarketType,
    #[builder(into)]
    pub market_name: String,
    pub outcomes: Vec<String>,
    /// Question template for multi-scalar markets, containing [`OUTCOME_PLACEHOLDER`].
    #[builder(into, default)]
    pub outcomes_question: String,
    #[builder(default)]
    pub lower_bound: U256,
    #[builder(default)]
    pub upper_bound: U256,
    /// Unit of the scalar answer, e.g. `USD`.
    #[builder(into, default)]
    pub unit: String,
    #[builder(into)]
    pub category: String,
    /// Unix timestamp from which the questions can be answered.
    pub opening_time: u32,
    /// Chain the market is meant for; must match the client when set.
    pub chain_id: Option<ChainId>,
}

impl CreateMarketRequest {
    /// Encodes the Reality.eth questions this market is made of.
    ///
    /// # Example
    ///
    /// ```
    /// use seer_client_sdk::markets::types::{CreateMarketRequest, MarketType};
    ///
    /// let request = CreateMarketRequest::builder()
    ///     .market_type(MarketType::MultiScalar)
    ///     .market_name("Votes")
    ///     .outcomes(vec!["A".to_owned(), "B".to_owned()])
    ///     .outcomes_question("Value for [PLACEHOLDER]?")
    ///     .category("misc")
    ///     .opening_time(0)
    ///     .build();
    ///
    /// let questions = request.encoded_questions();
    /// assert!(questions[0].starts_with("Value for A?"));
    /// assert!(questions[1].starts_with("Value for B?"));
    /// ```
    #[must_use]
    pub fn encoded_questions(&self) -> Vec<String> {
        match self.market_type {
            MarketType::Categorical => vec![encode_question_text(
                QuestionType::SingleSelect,
                &self.market_name,
                &self.outcomes,
                &self.category,
                DEFAULT_LANGUAGE,
            )],
            MarketType::MultiScalar => self
                .outcomes
                .iter()
                .map(|outcome| {
                    encode_question_text(
                        QuestionType::Uint,
                        &self.outcome_question(outcome),
                        &[],
                        &self.category,
                        DEFAULT_LANGUAGE,
                    )
                })
                .collect(),
            MarketType::Scalar => vec![encode_question_text(
                QuestionType::Uint,
                &format!("{} [{}]", self.market_name, self.unit),
                &[],
                &self.category,
                DEFAULT_LANGUAGE,
            )],
        }
    }

    /// The multi-scalar template with its first placeholder replaced by `outcome`.
    #[must_use]
    pub fn outcome_question(&self, outcome: &str) -> String {
        self.outcomes_question
            .replacen(OUTCOME_PLACEHOLDER, outcome, 1)
    }
}
