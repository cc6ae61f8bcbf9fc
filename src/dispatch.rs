//! Parameter-driven dispatch for the locations endpoint.
//!
//! Four optional parameters (state, district, block, type) select one of
//! the four store lookups. An explicit `type` names the lookup and is
//! checked against its required parameters; otherwise the lookup is
//! inferred from which parameters are present, accepting only strict
//! hierarchical prefixes. Results are wrapped in the uniform response
//! envelope; validation failures carry the exact diagnostic pair the
//! endpoint has always returned.

use crate::dataset::LocationStore;
use serde::Serialize;
use std::fmt;

// ─── Request parameters ──────────────────────────────────────────

/// Cleaned request parameters. Values are trimmed and empty strings
/// count as absent; `kind` is the explicit "type" override, lowercased.
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub state: Option<String>,
    pub district: Option<String>,
    pub block: Option<String>,
    pub kind: Option<String>,
}

impl Params {
    /// Build from raw query values.
    pub fn from_raw(
        state: Option<&str>,
        district: Option<&str>,
        block: Option<&str>,
        kind: Option<&str>,
    ) -> Self {
        Self {
            state: clean(state),
            district: clean(district),
            block: clean(block),
            kind: clean(kind).map(|k| k.to_lowercase()),
        }
    }

    /// The filters actually supplied, for echoing in envelopes.
    pub fn filters(&self) -> Filters {
        Filters {
            state: self.state.clone(),
            district: self.district.clone(),
            block: self.block.clone(),
        }
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Echo of the supplied filter parameters, in hierarchy order.
/// Serializes to `{}` when nothing was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

impl Filters {
    /// Names of the filters present, in hierarchy order.
    pub fn applied(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.state.is_some() {
            keys.push("state");
        }
        if self.district.is_some() {
            keys.push("district");
        }
        if self.block.is_some() {
            keys.push("block");
        }
        keys
    }
}

// ─── Lookup resolution ───────────────────────────────────────────

/// The store operation a request resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    States,
    Districts {
        state: String,
    },
    Blocks {
        state: String,
        district: String,
    },
    Villages {
        state: String,
        district: String,
        block: String,
    },
}

impl Lookup {
    /// Resolve cleaned parameters to a lookup, or a validation failure.
    pub fn resolve(params: &Params) -> Result<Self, DispatchError> {
        if let Some(kind) = params.kind.as_deref() {
            return Self::resolve_explicit(kind, params);
        }

        // No explicit type: infer from which parameters are present.
        // Only strict hierarchical prefixes are accepted.
        match (&params.state, &params.district, &params.block) {
            (None, None, None) => Ok(Self::States),
            (Some(s), None, None) => Ok(Self::Districts { state: s.clone() }),
            (Some(s), Some(d), None) => Ok(Self::Blocks {
                state: s.clone(),
                district: d.clone(),
            }),
            (Some(s), Some(d), Some(b)) => Ok(Self::Villages {
                state: s.clone(),
                district: d.clone(),
                block: b.clone(),
            }),
            _ => Err(DispatchError::OutOfOrder),
        }
    }

    fn resolve_explicit(kind: &str, params: &Params) -> Result<Self, DispatchError> {
        match kind {
            "states" => Ok(Self::States),
            "districts" => match &params.state {
                Some(s) => Ok(Self::Districts { state: s.clone() }),
                None => Err(DispatchError::MissingState),
            },
            "blocks" => match (&params.state, &params.district) {
                (Some(s), Some(d)) => Ok(Self::Blocks {
                    state: s.clone(),
                    district: d.clone(),
                }),
                _ => Err(DispatchError::MissingStateDistrict),
            },
            "villages" => match (&params.state, &params.district, &params.block) {
                (Some(s), Some(d), Some(b)) => Ok(Self::Villages {
                    state: s.clone(),
                    district: d.clone(),
                    block: b.clone(),
                }),
                _ => Err(DispatchError::MissingStateDistrictBlock),
            },
            _ => Err(DispatchError::InvalidType),
        }
    }

    /// Run the lookup against the store.
    pub fn run(&self, store: &LocationStore) -> Vec<String> {
        match self {
            Self::States => store.states(),
            Self::Districts { state } => store.districts(state),
            Self::Blocks { state, district } => store.blocks(state, district),
            Self::Villages {
                state,
                district,
                block,
            } => store.villages(state, district, block),
        }
    }

    /// Count line for the success envelope, echoing inputs as supplied.
    fn message(&self, count: usize) -> String {
        match self {
            Self::States => format!("Found {} states", count),
            Self::Districts { state } => format!("Found {} districts in {}", count, state),
            Self::Blocks { state, district } => {
                format!("Found {} blocks in {}, {}", count, district, state)
            }
            Self::Villages {
                state,
                district,
                block,
            } => format!("Found {} villages in {}, {}, {}", count, block, district, state),
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────

/// Why a request could not be dispatched.
///
/// Every variant except `Internal` is a client-caused validation
/// failure; `Internal` carries the filters collected before the lookup
/// failed so the error envelope can still echo them.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    MissingState,
    MissingStateDistrict,
    MissingStateDistrictBlock,
    InvalidType,
    OutOfOrder,
    Internal { error: String, filters: Filters },
}

impl DispatchError {
    /// The `error` line of the failure envelope.
    pub fn error_text(&self) -> String {
        match self {
            Self::MissingState => "State parameter is required for districts".into(),
            Self::MissingStateDistrict => {
                "Both state and district parameters are required for blocks".into()
            }
            Self::MissingStateDistrictBlock => {
                "State, district and block parameters are required for villages".into()
            }
            Self::InvalidType => "Invalid type parameter".into(),
            Self::OutOfOrder => "Invalid parameter combination".into(),
            Self::Internal { error, .. } => error.clone(),
        }
    }

    /// The `message` line of the failure envelope.
    pub fn message_text(&self) -> &'static str {
        match self {
            Self::MissingState => "Please provide state parameter",
            Self::MissingStateDistrict => "Please provide state and district parameters",
            Self::MissingStateDistrictBlock => {
                "Please provide state, district and block parameters"
            }
            Self::InvalidType => "Type must be: states, districts, blocks, or villages",
            Self::OutOfOrder => {
                "Parameters must be provided in hierarchical order: state → district → block"
            }
            Self::Internal { .. } => "Error fetching location data",
        }
    }

    /// True for client-caused failures (HTTP 400); false for internal
    /// failures (HTTP 500).
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }

    /// The failure envelope. Filters appear only on internal errors.
    pub fn envelope(&self) -> ErrorEnvelope {
        let filters = match self {
            Self::Internal { filters, .. } => Some(filters.clone()),
            _ => None,
        };
        ErrorEnvelope {
            success: false,
            error: self.error_text(),
            message: self.message_text().to_string(),
            filters,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_text())
    }
}

impl std::error::Error for DispatchError {}

// ─── Envelopes ───────────────────────────────────────────────────

/// Successful response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub success: bool,
    pub data: Vec<String>,
    pub filters: Filters,
    pub message: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub total_count: usize,
    pub filters_applied: Vec<&'static str>,
}

/// Failure response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

// ─── Dispatch ────────────────────────────────────────────────────

/// Resolve, run, and wrap a single request.
pub fn dispatch(store: &LocationStore, params: &Params) -> Result<SuccessEnvelope, DispatchError> {
    let filters = params.filters();
    let lookup = Lookup::resolve(params)?;
    let data = lookup.run(store);
    let message = lookup.message(data.len());
    let metadata = Metadata {
        total_count: data.len(),
        filters_applied: filters.applied(),
    };
    Ok(SuccessEnvelope {
        success: true,
        data,
        filters,
        message,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Block, District, State};
    use serde_json::json;

    fn sample_store() -> LocationStore {
        LocationStore::new(vec![
            State {
                name: "Odisha".into(),
                districts: vec![
                    District {
                        name: "Khordha".into(),
                        blocks: vec![Block {
                            name: "Jankia".into(),
                            villages: vec!["Badagotha".into(), "Balipatna".into()],
                        }],
                    },
                    District {
                        name: "Puri".into(),
                        blocks: vec![],
                    },
                ],
            },
            State {
                name: "Karnataka".into(),
                districts: vec![],
            },
        ])
    }

    fn params(
        state: Option<&str>,
        district: Option<&str>,
        block: Option<&str>,
        kind: Option<&str>,
    ) -> Params {
        Params::from_raw(state, district, block, kind)
    }

    #[test]
    fn test_no_params_lists_states() {
        let env = dispatch(&sample_store(), &params(None, None, None, None)).unwrap();
        assert_eq!(env.data, vec!["Odisha", "Karnataka"]);
        assert_eq!(env.message, "Found 2 states");
        assert_eq!(env.metadata.total_count, 2);
        assert!(env.metadata.filters_applied.is_empty());
        assert_eq!(env.filters, Filters::default());
    }

    #[test]
    fn test_state_only_lists_districts() {
        let env = dispatch(&sample_store(), &params(Some("odisha"), None, None, None)).unwrap();
        assert_eq!(env.data, vec!["Khordha", "Puri"]);
        assert_eq!(env.message, "Found 2 districts in odisha");
        assert_eq!(env.metadata.filters_applied, vec!["state"]);
    }

    #[test]
    fn test_state_district_lists_blocks() {
        let env = dispatch(
            &sample_store(),
            &params(Some("odisha"), Some("khordha"), None, None),
        )
        .unwrap();
        assert_eq!(env.data, vec!["Jankia"]);
        assert_eq!(env.message, "Found 1 blocks in khordha, odisha");
    }

    #[test]
    fn test_mixed_case_villages_end_to_end() {
        let env = dispatch(
            &sample_store(),
            &params(Some("odisha"), Some("KHORDHA"), Some("Jankia"), None),
        )
        .unwrap();
        assert_eq!(env.data, vec!["Badagotha", "Balipatna"]);
        assert_eq!(env.metadata.total_count, 2);
        assert_eq!(
            env.metadata.filters_applied,
            vec!["state", "district", "block"]
        );
    }

    #[test]
    fn test_district_without_state_is_hierarchy_error() {
        let err = dispatch(&sample_store(), &params(None, Some("khordha"), None, None))
            .unwrap_err();
        assert_eq!(err, DispatchError::OutOfOrder);
        assert_eq!(err.error_text(), "Invalid parameter combination");
        assert_eq!(
            err.message_text(),
            "Parameters must be provided in hierarchical order: state → district → block"
        );
    }

    #[test]
    fn test_block_without_district_is_hierarchy_error() {
        let err = dispatch(
            &sample_store(),
            &params(Some("odisha"), None, Some("jankia"), None),
        )
        .unwrap_err();
        assert_eq!(err, DispatchError::OutOfOrder);
    }

    #[test]
    fn test_explicit_type_preconditions() {
        let store = sample_store();
        assert_eq!(
            dispatch(&store, &params(None, None, None, Some("districts"))).unwrap_err(),
            DispatchError::MissingState
        );
        assert_eq!(
            dispatch(&store, &params(Some("odisha"), None, None, Some("blocks"))).unwrap_err(),
            DispatchError::MissingStateDistrict
        );
        let err = dispatch(
            &store,
            &params(Some("odisha"), Some("khordha"), None, Some("villages")),
        )
        .unwrap_err();
        assert_eq!(err, DispatchError::MissingStateDistrictBlock);
        assert_eq!(
            err.error_text(),
            "State, district and block parameters are required for villages"
        );
    }

    #[test]
    fn test_explicit_type_with_all_params() {
        let env = dispatch(
            &sample_store(),
            &params(
                Some("odisha"),
                Some("khordha"),
                Some("jankia"),
                Some("villages"),
            ),
        )
        .unwrap();
        assert_eq!(env.metadata.total_count, env.data.len());
        assert_eq!(env.data.len(), 2);
    }

    #[test]
    fn test_explicit_type_is_case_insensitive() {
        let env = dispatch(
            &sample_store(),
            &params(Some("odisha"), None, None, Some("  DISTRICTS  ")),
        )
        .unwrap();
        assert_eq!(env.data, vec!["Khordha", "Puri"]);
    }

    #[test]
    fn test_explicit_states_still_echoes_extra_filters() {
        let env = dispatch(
            &sample_store(),
            &params(Some("odisha"), None, None, Some("states")),
        )
        .unwrap();
        assert_eq!(env.data, vec!["Odisha", "Karnataka"]);
        assert_eq!(env.filters.state.as_deref(), Some("odisha"));
        assert_eq!(env.metadata.filters_applied, vec!["state"]);
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let err = dispatch(&sample_store(), &params(None, None, None, Some("cities")))
            .unwrap_err();
        assert_eq!(err, DispatchError::InvalidType);
        assert_eq!(
            err.message_text(),
            "Type must be: states, districts, blocks, or villages"
        );
    }

    #[test]
    fn test_blank_params_count_as_absent() {
        // All-whitespace values behave exactly like missing ones.
        let env = dispatch(&sample_store(), &params(Some("   "), Some(""), None, Some(" ")))
            .unwrap();
        assert_eq!(env.message, "Found 2 states");
        assert_eq!(env.filters, Filters::default());
    }

    #[test]
    fn test_unknown_state_is_success_with_empty_data() {
        let env = dispatch(&sample_store(), &params(Some("narnia"), None, None, None)).unwrap();
        assert!(env.data.is_empty());
        assert_eq!(env.message, "Found 0 districts in narnia");
        assert_eq!(env.metadata.total_count, 0);
    }

    #[test]
    fn test_success_envelope_json_shape() {
        let env = dispatch(
            &sample_store(),
            &params(Some("odisha"), Some("KHORDHA"), Some("Jankia"), None),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "success": true,
                "data": ["Badagotha", "Balipatna"],
                "filters": {
                    "state": "odisha",
                    "district": "KHORDHA",
                    "block": "Jankia"
                },
                "message": "Found 2 villages in Jankia, KHORDHA, odisha",
                "metadata": {
                    "total_count": 2,
                    "filters_applied": ["state", "district", "block"]
                }
            })
        );
    }

    #[test]
    fn test_no_params_envelope_has_empty_filters_object() {
        let env = dispatch(&sample_store(), &Params::default()).unwrap();
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(value["filters"], json!({}));
        assert_eq!(value["metadata"]["filters_applied"], json!([]));
    }

    #[test]
    fn test_validation_envelope_json_shape() {
        let err = dispatch(&sample_store(), &params(None, None, None, Some("districts")))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            serde_json::to_value(err.envelope()).unwrap(),
            json!({
                "success": false,
                "error": "State parameter is required for districts",
                "message": "Please provide state parameter"
            })
        );
    }

    #[test]
    fn test_internal_envelope_echoes_filters() {
        let err = DispatchError::Internal {
            error: "store unavailable".into(),
            filters: Filters {
                state: Some("odisha".into()),
                district: None,
                block: None,
            },
        };
        assert!(!err.is_validation());
        assert_eq!(
            serde_json::to_value(err.envelope()).unwrap(),
            json!({
                "success": false,
                "error": "store unavailable",
                "message": "Error fetching location data",
                "filters": { "state": "odisha" }
            })
        );
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let env = dispatch(&LocationStore::empty(), &Params::default()).unwrap();
        assert!(env.data.is_empty());
        assert_eq!(env.message, "Found 0 states");
    }
}
