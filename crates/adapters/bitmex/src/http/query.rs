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

//! Builder types for BitMEX REST query parameters and request bodies.
//!
//! Query parameter structs are encoded with `serde_urlencoded`; request body structs are
//! encoded as compact JSON. Both serialize field names in BitMEX casing and omit unset
//! fields.

use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::error::BitmexBuildError;
use crate::common::enums::{BitmexExecInstruction, BitmexOrderType, BitmexSide, BitmexTimeInForce};

/// Serializes a JSON filter as its compact string form, as BitMEX expects for `filter`.
fn serialize_json_string<S>(value: &Option<Value>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Serializes execution instructions as a comma separated list.
fn serialize_exec_inst<S>(
    value: &Option<Vec<BitmexExecInstruction>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(instructions) => {
            let joined = instructions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            serializer.serialize_str(&joined)
        }
        None => serializer.serialize_none(),
    }
}

fn validate_count(count: Option<u32>) -> Result<(), BitmexBuildError> {
    match count {
        Some(c) if !(1..=500).contains(&c) => Err(BitmexBuildError::InvalidCount),
        _ => Ok(()),
    }
}

/// Query parameters for `GET /order`.
///
/// # References
/// - <https://www.bitmex.com/api/explorer/#!/Order/Order_getOrders>
#[derive(Clone, Debug, Default, Deserialize, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
#[builder(build_fn(error = "BitmexBuildError", validate = "Self::validate"), derive(Debug))]
pub struct GetOrderParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Generic table filter, e.g. `{"open": true}`.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_json_string"
    )]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl GetOrderParamsBuilder {
    fn validate(&self) -> Result<(), BitmexBuildError> {
        validate_count(self.count.flatten())
    }
}

/// Query parameters for `GET /position`.
///
/// # References
/// - <https://www.bitmex.com/api/explorer/#!/Position/Position_get>
#[derive(Clone, Debug, Default, Deserialize, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
#[builder(build_fn(error = "BitmexBuildError", validate = "Self::validate"), derive(Debug))]
pub struct GetPositionParams {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_json_string"
    )]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl GetPositionParamsBuilder {
    fn validate(&self) -> Result<(), BitmexBuildError> {
        validate_count(self.count.flatten())
    }
}

/// Request body for `POST /order`.
///
/// # References
/// - <https://www.bitmex.com/api/explorer/#!/Order/Order_new>
#[derive(Clone, Debug, Default, Deserialize, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
#[builder(build_fn(error = "BitmexBuildError"), derive(Debug))]
pub struct PostOrderParams {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<BitmexSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_px: Option<f64>,
    /// Client order id; generated from the configured prefix when unset.
    #[serde(rename = "clOrdID", skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peg_offset_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ord_type: Option<BitmexOrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<BitmexTimeInForce>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_exec_inst"
    )]
    #[serde(skip_deserializing)]
    pub exec_inst: Option<Vec<BitmexExecInstruction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Request body for `PUT /order`.
///
/// Exactly one of `order_id` and `orig_cl_ord_id` identifies the order to amend.
///
/// # References
/// - <https://www.bitmex.com/api/explorer/#!/Order/Order_amend>
#[derive(Clone, Debug, Default, Deserialize, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
#[builder(build_fn(error = "BitmexBuildError", validate = "Self::validate"), derive(Debug))]
pub struct PutOrderParams {
    #[serde(rename = "orderID", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(rename = "origClOrdID", skip_serializing_if = "Option::is_none")]
    pub orig_cl_ord_id: Option<String>,
    #[serde(rename = "clOrdID", skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves_qty: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peg_offset_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl PutOrderParamsBuilder {
    fn validate(&self) -> Result<(), BitmexBuildError> {
        let has_order_id = self.order_id.as_ref().is_some_and(Option::is_some);
        let has_orig_cl_ord_id = self.orig_cl_ord_id.as_ref().is_some_and(Option::is_some);
        match (has_order_id, has_orig_cl_ord_id) {
            (true, true) => Err(BitmexBuildError::BothOrderIds),
            (false, false) => Err(BitmexBuildError::MissingOrderId),
            _ => Ok(()),
        }
    }
}

/// Request body for `DELETE /order`.
///
/// # References
/// - <https://www.bitmex.com/api/explorer/#!/Order/Order_cancel>
#[derive(Clone, Debug, Default, Deserialize, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
#[builder(build_fn(error = "BitmexBuildError", validate = "Self::validate"), derive(Debug))]
pub struct DeleteOrderParams {
    #[serde(rename = "orderID", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Vec<String>>,
    #[serde(rename = "clOrdID", skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DeleteOrderParamsBuilder {
    fn validate(&self) -> Result<(), BitmexBuildError> {
        let has_ids = |ids: &Option<Option<Vec<String>>>| {
            ids.as_ref()
                .is_some_and(|ids| ids.as_ref().is_some_and(|ids| !ids.is_empty()))
        };
        if has_ids(&self.order_id) || has_ids(&self.cl_ord_id) {
            Ok(())
        } else {
            Err(BitmexBuildError::MissingOrderId)
        }
    }
}

/// Request body for `DELETE /order/all`.
///
/// # References
/// - <https://www.bitmex.com/api/explorer/#!/Order/Order_cancelAll>
#[derive(Clone, Debug, Default, Deserialize, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default, setter(into, strip_option))]
#[builder(build_fn(error = "BitmexBuildError"), derive(Debug))]
pub struct DeleteAllOrdersParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
