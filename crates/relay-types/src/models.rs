use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How `/notify-order` picks the recipients of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// The caller names the recipient in the request body.
    Single,
    /// Every recipient seen through the webhook receives the message.
    Broadcast,
    /// A recipient configured at startup receives every message.
    Fixed,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown dispatch mode '{0}' (expected single, broadcast or fixed)")]
pub struct UnknownDispatchMode(pub String);

impl FromStr for DispatchMode {
    type Err = UnknownDispatchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "broadcast" => Ok(Self::Broadcast),
            "fixed" => Ok(Self::Fixed),
            _ => Err(UnknownDispatchMode(s.to_string())),
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Broadcast => "broadcast",
            Self::Fixed => "fixed",
        })
    }
}

/// An order as it is rendered into a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderNotification {
    /// Only the storefront's order id is known.
    Reference { order_id: String },
    /// Full checkout details submitted by the storefront.
    Details(OrderDetails),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub name: String,
    pub product: String,
    pub quantity: u32,
    pub phone: String,
    pub address: String,
    pub note: Option<String>,
    /// Link to the uploaded payment slip image.
    pub slip_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_mode_parses_case_insensitively() {
        assert_eq!("single".parse::<DispatchMode>().unwrap(), DispatchMode::Single);
        assert_eq!(" Broadcast ".parse::<DispatchMode>().unwrap(), DispatchMode::Broadcast);
        assert_eq!("FIXED".parse::<DispatchMode>().unwrap(), DispatchMode::Fixed);
        assert!("everyone".parse::<DispatchMode>().is_err());
    }

    #[test]
    fn dispatch_mode_display_matches_parse() {
        for mode in [DispatchMode::Single, DispatchMode::Broadcast, DispatchMode::Fixed] {
            assert_eq!(mode.to_string().parse::<DispatchMode>().unwrap(), mode);
        }
    }
}
