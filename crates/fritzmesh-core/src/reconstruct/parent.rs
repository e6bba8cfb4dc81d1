// ── Parent resolver ──
//
// Decides which end of a hub-to-hub link is upstream. Roles decide when
// they differ; two slaves fall back to an interface-naming heuristic.

use crate::model::{ChainInference, HubRole};

/// Interface-label marker that identifies the upstream-facing side of a
/// chained repeater. Matched case-insensitively.
pub const UPLINK_MARKER: &str = "uplink";

/// One endpoint of a backbone link as the resolver sees it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint<'a> {
    pub uid: &'a str,
    pub role: HubRole,
}

/// Outcome of resolving a backbone link: `child`'s parent is `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParentClaim<'a> {
    pub child: &'a str,
    pub parent: &'a str,
    /// `None` when roles alone decided.
    pub inference: Option<ChainInference>,
}

/// Resolve the parent relationship for a link owned by `owner`.
///
/// `owner_interface` is the label of the owner's interface carrying the
/// link. Returns `None` when either role is unknown, or both are master.
pub(crate) fn resolve<'a>(
    owner: Endpoint<'a>,
    peer: Endpoint<'a>,
    owner_interface: &str,
) -> Option<ParentClaim<'a>> {
    match (owner.role, peer.role) {
        (HubRole::Master, HubRole::Slave) => Some(ParentClaim {
            child: peer.uid,
            parent: owner.uid,
            inference: None,
        }),
        (HubRole::Slave, HubRole::Master) => Some(ParentClaim {
            child: owner.uid,
            parent: peer.uid,
            inference: None,
        }),
        (HubRole::Slave, HubRole::Slave) => {
            if has_uplink_marker(owner_interface) {
                // The owner is the downstream leaf advertising its uplink.
                Some(ParentClaim {
                    child: owner.uid,
                    parent: peer.uid,
                    inference: Some(ChainInference::UplinkMarker),
                })
            } else {
                Some(ParentClaim {
                    child: peer.uid,
                    parent: owner.uid,
                    inference: Some(ChainInference::Fallback),
                })
            }
        }
        _ => None,
    }
}

fn has_uplink_marker(interface_name: &str) -> bool {
    interface_name.to_lowercase().contains(UPLINK_MARKER)
}
