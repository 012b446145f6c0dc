//! Typed helpers for common virtual machine operations.
//!
//! Thin mapping over the generic record primitives: power-state actions,
//! disk capacity changes, and the decimal GB/byte conversions the
//! cluster API uses for capacities.

use std::str::FromStr;

use serde_json::json;

use crate::client::Client;
use crate::endpoints;
use crate::error::{Error, InvalidInputError};
use crate::task::TaskHandle;

/// Power-state actions accepted by the `VirDomain/action` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    /// Boot the VM.
    Start,
    /// Guest-cooperative shutdown.
    Shutdown,
    /// Hard power-off.
    Stop,
    /// Guest-cooperative reboot.
    Reboot,
    /// Hard reset.
    Reset,
}

impl PowerAction {
    /// The wire name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerAction::Start => "START",
            PowerAction::Shutdown => "SHUTDOWN",
            PowerAction::Stop => "STOP",
            PowerAction::Reboot => "REBOOT",
            PowerAction::Reset => "RESET",
        }
    }
}

impl FromStr for PowerAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "START" => Ok(PowerAction::Start),
            "SHUTDOWN" => Ok(PowerAction::Shutdown),
            "STOP" => Ok(PowerAction::Stop),
            "REBOOT" => Ok(PowerAction::Reboot),
            "RESET" => Ok(PowerAction::Reset),
            other => Err(InvalidInputError::Other {
                message: format!(
                    "unknown power action '{other}' (expected START, SHUTDOWN, STOP, REBOOT or RESET)"
                ),
            }
            .into()),
        }
    }
}

/// Submit a power-state action for a VM.
///
/// Returns the task handle without waiting, like every mutation.
pub async fn power_action(
    client: &Client,
    vm_uuid: &str,
    action: PowerAction,
) -> Result<TaskHandle, Error> {
    let payload = json!([{
        "virDomainUUID": vm_uuid,
        "actionType": action.as_str(),
        "cause": "INTERNAL",
    }]);
    client
        .create_record(endpoints::VIR_DOMAIN_ACTION, &payload, None)
        .await
}

/// Change a disk's capacity, in bytes.
///
/// The cluster can only grow a disk; a shrink is rejected here, before
/// any request reaches the wire.
pub async fn resize_disk(
    client: &Client,
    disk_uuid: &str,
    current_bytes: u64,
    new_bytes: u64,
) -> Result<TaskHandle, Error> {
    if new_bytes < current_bytes {
        return Err(InvalidInputError::Capacity {
            reason: format!(
                "disk capacity can only grow: {current_bytes} -> {new_bytes} bytes is a shrink"
            ),
        }
        .into());
    }

    let path = format!("{}/{}", endpoints::VIR_DOMAIN_BLOCK_DEVICE, disk_uuid);
    client
        .update_record(&path, &json!({"capacity": new_bytes}), None)
        .await
}

/// Decimal GB/byte conversions for capacity fields.
///
/// The cluster API measures capacities in bytes; user-facing values are
/// decimal gigabytes (1 GB = 10^9 bytes).
pub mod units {
    /// Convert decimal gigabytes to bytes.
    pub fn gb_to_bytes(gb: f64) -> u64 {
        (gb * 1_000_000_000.0).round() as u64
    }

    /// Convert bytes to decimal gigabytes.
    pub fn bytes_to_gb(bytes: u64) -> f64 {
        bytes as f64 / 1_000_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_action_wire_names() {
        assert_eq!(PowerAction::Start.as_str(), "START");
        assert_eq!(PowerAction::Shutdown.as_str(), "SHUTDOWN");
        assert_eq!(PowerAction::Stop.as_str(), "STOP");
    }

    #[test]
    fn power_action_parsing_is_case_insensitive() {
        assert_eq!("start".parse::<PowerAction>().unwrap(), PowerAction::Start);
        assert_eq!("REBOOT".parse::<PowerAction>().unwrap(), PowerAction::Reboot);
        assert!("hibernate".parse::<PowerAction>().is_err());
    }

    #[test]
    fn gb_bytes_round_trip_without_precision_loss() {
        assert_eq!(units::gb_to_bytes(3.0), 3_000_000_000);
        assert_eq!(units::bytes_to_gb(3_000_000_000), 3.0);
        assert_eq!(units::gb_to_bytes(0.5), 500_000_000);
        assert_eq!(units::gb_to_bytes(units::bytes_to_gb(42_000_000_000)), 42_000_000_000);
    }
}
