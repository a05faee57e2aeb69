// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Remote failure normalization.

use enrol::ServiceError;

/// Fallback text when a remote failure carries nothing displayable.
const GENERIC_REMOTE_ERROR: &str = "The remote data service reported an unspecified error";

/// Normalizes a remote failure into an operator-readable string.
///
/// Fallback chain: primary message, then nested detail fields, then the
/// serialized raw payload, then a generic fallback. The result is always
/// something a person can act on; never a bare object stringification.
#[must_use]
pub fn normalize_remote_error(error: &ServiceError) -> String {
    if let Some(message) = non_empty(error.message.as_deref()) {
        return match non_empty(error.hint.as_deref()) {
            Some(hint) => format!("{message} (hint: {hint})"),
            None => message.to_string(),
        };
    }

    if let Some(details) = non_empty(error.details.as_deref()) {
        return details.to_string();
    }

    if let Some(hint) = non_empty(error.hint.as_deref()) {
        return hint.to_string();
    }

    if let Some(payload) = &error.payload
        && let Ok(serialized) = serde_json::to_string(payload)
    {
        return serialized;
    }

    GENERIC_REMOTE_ERROR.to_string()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
