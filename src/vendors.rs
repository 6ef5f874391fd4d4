// File: vendors.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde_json::{Map, Value};

use crate::verdict::VendorFinding;

/// Flatten the service's per-vendor analysis map into an ordered finding list.
///
/// Order follows the response map (serde_json is built with `preserve_order`);
/// cross-vendor order carries no meaning and is never sorted. A vendor entry
/// missing `category` defaults to `undetected`; a missing `result` stays
/// absent. Non-object entries degrade to the defaults.
pub fn extract_vendor_results(analysis: &Map<String, Value>) -> Vec<VendorFinding> {
    analysis
        .iter()
        .map(|(vendor, data)| VendorFinding {
            vendor: vendor.clone(),
            category: data
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or("undetected")
                .to_string(),
            result: data
                .get("result")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
        .collect()
}
