// ── Link attributes ──
//
// Medium, state, and throughput shared by client attachments and hub uplinks.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Attachment medium, derived from the owning interface's type tag.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum LinkMedium {
    Wireless,
    Wired,
    #[default]
    Unknown,
}

impl LinkMedium {
    /// Map the feed's interface type (`"WLAN"`, `"LAN"`) to a medium.
    pub fn from_feed(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("WLAN") => Self::Wireless,
            Some(t) if t.eq_ignore_ascii_case("LAN") => Self::Wired,
            _ => Self::Unknown,
        }
    }
}

/// Link connection state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum LinkState {
    Connected,
    Disconnected,
    #[default]
    Unknown,
}

impl LinkState {
    /// Map the feed's link state. A link without a state counts as disconnected.
    pub fn from_feed(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => Self::Disconnected,
            Some(s) if s.eq_ignore_ascii_case("CONNECTED") => Self::Connected,
            Some(s) if s.eq_ignore_ascii_case("DISCONNECTED") => Self::Disconnected,
            Some(_) => Self::Unknown,
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Current and maximum link rates in kbit/s. Zero means "not reported".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    pub cur_rx_kbps: u64,
    pub cur_tx_kbps: u64,
    pub max_rx_kbps: u64,
    pub max_tx_kbps: u64,
}

impl From<&fritzmesh_api::RawLink> for Throughput {
    fn from(link: &fritzmesh_api::RawLink) -> Self {
        Self {
            cur_rx_kbps: link.cur_data_rate_rx,
            cur_tx_kbps: link.cur_data_rate_tx,
            max_rx_kbps: link.max_data_rate_rx,
            max_tx_kbps: link.max_data_rate_tx,
        }
    }
}
