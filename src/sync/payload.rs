//! Sync payload model and validation.
//!
//! # Responsibilities
//! - Check the structure of a fetched payload before anything trusts it
//! - Turn a valid payload into typed values for the apply pipeline
//!
//! # Rules
//! - `sync_required` must be present; its absence is invalid, not "no sync"
//! - `sync_required: false` ends validation, other fields are ignored
//! - `sync_required: true` needs `state_timestamp` and a `servers` list
//!   (possibly empty) whose entries all carry a non-empty `ip` and
//!   non-zero `vpn_port` / `gateway_port`

use serde_json::Value;
use thiserror::Error;

use crate::resilience::JsonObject;

/// One proxy backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub ip: String,
    pub vpn_port: u16,
    pub gateway_port: u16,
}

/// A change the control plane wants applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    /// Idempotency token echoed back in the acknowledgment.
    pub state_timestamp: f64,
    /// Backends in control plane order.
    pub servers: Vec<ServerEndpoint>,
}

/// A validated sync payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncPayload {
    /// `sync_required: false`.
    UpToDate,
    /// `sync_required: true`.
    Required(PendingChange),
}

/// Which invariant a payload broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("sync_required is missing")]
    MissingSyncRequired,

    #[error("sync_required is not a boolean")]
    InvalidSyncRequired,

    #[error("state_timestamp is missing")]
    MissingTimestamp,

    #[error("state_timestamp is not a number")]
    InvalidTimestamp,

    #[error("servers is missing")]
    MissingServers,

    #[error("servers is not a list")]
    ServersNotSequence,

    #[error("server #{index} is not an object")]
    ServerNotObject { index: usize },

    #[error("server #{index} has a missing or empty '{field}'")]
    InvalidServerField { index: usize, field: &'static str },
}

/// Validate and convert a raw payload.
pub fn parse_payload(raw: &JsonObject) -> Result<SyncPayload, PayloadError> {
    let sync_required = match present(raw, "sync_required") {
        None => return Err(PayloadError::MissingSyncRequired),
        Some(value) => value.as_bool().ok_or(PayloadError::InvalidSyncRequired)?,
    };
    if !sync_required {
        return Ok(SyncPayload::UpToDate);
    }

    let state_timestamp = present(raw, "state_timestamp")
        .ok_or(PayloadError::MissingTimestamp)?
        .as_f64()
        .ok_or(PayloadError::InvalidTimestamp)?;

    let servers = present(raw, "servers")
        .ok_or(PayloadError::MissingServers)?
        .as_array()
        .ok_or(PayloadError::ServersNotSequence)?
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_server(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SyncPayload::Required(PendingChange {
        state_timestamp,
        servers,
    }))
}

/// Structural check only: `true` iff [`parse_payload`] would succeed.
pub fn validate(raw: &JsonObject) -> bool {
    parse_payload(raw).is_ok()
}

// JSON null counts as absent.
fn present<'a>(object: &'a JsonObject, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn parse_server(index: usize, entry: &Value) -> Result<ServerEndpoint, PayloadError> {
    let object = entry
        .as_object()
        .ok_or(PayloadError::ServerNotObject { index })?;

    let ip = object
        .get("ip")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .ok_or(PayloadError::InvalidServerField { index, field: "ip" })?;

    Ok(ServerEndpoint {
        ip: ip.to_string(),
        vpn_port: port(object, index, "vpn_port")?,
        gateway_port: port(object, index, "gateway_port")?,
    })
}

fn port(object: &JsonObject, index: usize, field: &'static str) -> Result<u16, PayloadError> {
    object
        .get(field)
        .and_then(Value::as_u64)
        .filter(|p| *p != 0)
        .and_then(|p| u16::try_from(p).ok())
        .ok_or(PayloadError::InvalidServerField { index, field })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_not_required_ignores_other_fields() {
        let raw = object(json!({ "sync_required": false, "servers": "garbage" }));
        assert_eq!(parse_payload(&raw), Ok(SyncPayload::UpToDate));
        assert!(validate(&raw));
    }

    #[test]
    fn test_missing_sync_required() {
        let raw = object(json!({ "state_timestamp": 1.0, "servers": [] }));
        assert_eq!(parse_payload(&raw), Err(PayloadError::MissingSyncRequired));
        assert!(!validate(&raw));
    }

    #[test]
    fn test_null_sync_required_is_missing() {
        let raw = object(json!({ "sync_required": null }));
        assert_eq!(parse_payload(&raw), Err(PayloadError::MissingSyncRequired));
    }

    #[test]
    fn test_sync_required_must_be_bool() {
        let raw = object(json!({ "sync_required": "yes" }));
        assert_eq!(parse_payload(&raw), Err(PayloadError::InvalidSyncRequired));
    }

    #[test]
    fn test_valid_required_payload() {
        let raw = object(json!({
            "sync_required": true,
            "state_timestamp": 1690000000.0,
            "servers": [
                { "ip": "1.2.3.4", "vpn_port": 443, "gateway_port": 8443 },
                { "ip": "5.6.7.8", "vpn_port": 1194, "gateway_port": 9443, "extra": "ignored" }
            ]
        }));

        let SyncPayload::Required(change) = parse_payload(&raw).unwrap() else {
            panic!("expected a pending change");
        };
        assert_eq!(change.state_timestamp, 1690000000.0);
        assert_eq!(change.servers.len(), 2);
        assert_eq!(
            change.servers[1],
            ServerEndpoint {
                ip: "5.6.7.8".into(),
                vpn_port: 1194,
                gateway_port: 9443
            }
        );
    }

    #[test]
    fn test_empty_server_list_is_valid() {
        let raw = object(json!({ "sync_required": true, "state_timestamp": 2, "servers": [] }));
        let SyncPayload::Required(change) = parse_payload(&raw).unwrap() else {
            panic!("expected a pending change");
        };
        assert!(change.servers.is_empty());
        assert_eq!(change.state_timestamp, 2.0);
    }

    #[test]
    fn test_required_needs_timestamp_and_servers() {
        let raw = object(json!({ "sync_required": true, "servers": [] }));
        assert_eq!(parse_payload(&raw), Err(PayloadError::MissingTimestamp));

        let raw = object(json!({ "sync_required": true, "state_timestamp": 1.0 }));
        assert_eq!(parse_payload(&raw), Err(PayloadError::MissingServers));

        let raw = object(json!({ "sync_required": true, "state_timestamp": 1.0, "servers": {} }));
        assert_eq!(parse_payload(&raw), Err(PayloadError::ServersNotSequence));
    }

    #[test]
    fn test_missing_gateway_port() {
        let raw = object(json!({
            "sync_required": true,
            "state_timestamp": 1.0,
            "servers": [{ "ip": "1.2.3.4", "vpn_port": 443 }]
        }));
        assert_eq!(
            parse_payload(&raw),
            Err(PayloadError::InvalidServerField { index: 0, field: "gateway_port" })
        );
    }

    #[test]
    fn test_falsy_server_fields_rejected() {
        let cases = [
            (json!({ "ip": "", "vpn_port": 443, "gateway_port": 8443 }), "ip"),
            (json!({ "ip": "1.2.3.4", "vpn_port": 0, "gateway_port": 8443 }), "vpn_port"),
            (json!({ "ip": "1.2.3.4", "vpn_port": 443, "gateway_port": 70000 }), "gateway_port"),
        ];

        for (server, field) in cases {
            let raw = object(json!({
                "sync_required": true,
                "state_timestamp": 1.0,
                "servers": [{ "ip": "9.9.9.9", "vpn_port": 1, "gateway_port": 2 }, server]
            }));
            assert_eq!(
                parse_payload(&raw),
                Err(PayloadError::InvalidServerField { index: 1, field })
            );
        }
    }

    #[test]
    fn test_server_entry_must_be_object() {
        let raw = object(json!({
            "sync_required": true,
            "state_timestamp": 1.0,
            "servers": ["1.2.3.4:443"]
        }));
        assert_eq!(
            parse_payload(&raw),
            Err(PayloadError::ServerNotObject { index: 0 })
        );
    }
}
