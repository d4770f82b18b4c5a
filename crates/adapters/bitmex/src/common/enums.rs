// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Enumerations used by the BitMEX order endpoints.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Represents the side of an order or trade (Buy/Sell).
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum BitmexSide {
    /// Buy side of a trade or order.
    Buy,
    /// Sell side of a trade or order.
    Sell,
}

/// Represents the available order types on BitMEX.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum BitmexOrderType {
    /// Market order, executed immediately at current market price.
    Market,
    /// Limit order, executed only at specified price or better.
    Limit,
    /// Stop Market order, triggers a market order when price reaches stop price.
    Stop,
    /// Stop Limit order, triggers a limit order when price reaches stop price.
    StopLimit,
    /// Market if touched order, triggers a market order when price reaches touch price.
    MarketIfTouched,
    /// Limit if touched order, triggers a limit order when price reaches touch price.
    LimitIfTouched,
    /// Pegged order, price automatically tracks market.
    Pegged,
}

/// Represents the time in force instructions available on BitMEX.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum BitmexTimeInForce {
    Day,
    GoodTillCancel,
    ImmediateOrCancel,
    FillOrKill,
}

/// Represents the execution instructions which can be attached to an order.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    AsRefStr,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum BitmexExecInstruction {
    /// Post-only: cancel instead of taking liquidity.
    ParticipateDoNotInitiate,
    /// Reduce-only: the order can only reduce a position.
    ReduceOnly,
    /// Close: the order closes the open position.
    Close,
    /// Trigger on the last traded price.
    LastPrice,
    /// Trigger on the mark price.
    MarkPrice,
    /// Trigger on the index price.
    IndexPrice,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(BitmexOrderType::Limit, "\"Limit\"")]
    #[case(BitmexOrderType::StopLimit, "\"StopLimit\"")]
    #[case(BitmexOrderType::MarketIfTouched, "\"MarketIfTouched\"")]
    fn test_order_type_serialization(#[case] order_type: BitmexOrderType, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&order_type).unwrap(), expected);
    }

    #[rstest]
    fn test_side_from_str() {
        assert_eq!(BitmexSide::from_str("Buy").unwrap(), BitmexSide::Buy);
        assert_eq!(BitmexSide::from_str("Sell").unwrap(), BitmexSide::Sell);
        assert!(BitmexSide::from_str("Hold").is_err());
    }

    #[rstest]
    fn test_exec_instruction_as_ref() {
        assert_eq!(
            BitmexExecInstruction::ParticipateDoNotInitiate.as_ref(),
            "ParticipateDoNotInitiate"
        );
        assert_eq!(BitmexExecInstruction::ReduceOnly.as_ref(), "ReduceOnly");
    }
}
