// ── Link graph ──
//
// Undirected multigraph of the links in the snapshot. Both endpoints
// normally carry a copy of the same link record, but only the copy listed
// by its designated first endpoint (`node_1_uid`) counts. Edges keep the
// order in which the owners enumerate them: node, then interface, then link.

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::trace;

use fritzmesh_api::{RawInterface, RawLink};

use super::index::NodeIndex;

/// Order-independent identity of a physical link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct LinkKey {
    nodes: (String, String),
    interfaces: (String, String),
}

impl LinkKey {
    fn of(link: &RawLink) -> Self {
        Self {
            nodes: ordered(link.node_1_uid.as_deref(), link.node_2_uid.as_deref()),
            interfaces: ordered(
                link.node_interface_1_uid.as_deref(),
                link.node_interface_2_uid.as_deref(),
            ),
        }
    }
}

fn ordered(a: Option<&str>, b: Option<&str>) -> (String, String) {
    let a = a.unwrap_or_default();
    let b = b.unwrap_or_default();
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}

/// One deduplicated link, oriented from its designated first endpoint.
#[derive(Debug)]
pub(crate) struct MeshLink<'a> {
    /// `node_1_uid` of the record: the endpoint that owns the link.
    pub owner: &'a str,
    /// `node_2_uid` of the record.
    pub peer: &'a str,
    /// The owner's interface carrying the link.
    pub interface: &'a RawInterface,
    pub link: &'a RawLink,
}

/// Deduplicated links in owner enumeration order.
#[derive(Debug, Default)]
pub(crate) struct LinkGraph<'a> {
    links: IndexMap<LinkKey, MeshLink<'a>>,
}

impl<'a> LinkGraph<'a> {
    /// Walk every interface of every indexed node and collect the links
    /// each node owns.
    ///
    /// Copies listed by the peer are not edges of their own. A link only
    /// the peer reported is dropped.
    pub fn build(index: &NodeIndex<'a>) -> Self {
        let mut links: IndexMap<LinkKey, MeshLink<'a>> = IndexMap::new();

        for node in index.iter() {
            for interface in &node.raw.node_interfaces {
                for link in &interface.node_links {
                    let owner = link.node_1_uid.as_deref().unwrap_or_default();
                    let peer = link.node_2_uid.as_deref().unwrap_or_default();

                    if node.uid != owner {
                        if node.uid != peer {
                            trace!(node = node.uid, owner, peer, "link listed by a non-endpoint, skipping");
                        }
                        continue;
                    }

                    match links.entry(LinkKey::of(link)) {
                        Entry::Vacant(slot) => {
                            slot.insert(MeshLink {
                                owner,
                                peer,
                                interface,
                                link,
                            });
                        }
                        Entry::Occupied(_) => {
                            trace!(owner, peer, "duplicate link copy, keeping first");
                        }
                    }
                }
            }
        }

        Self { links }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshLink<'a>> {
        self.links.values()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}
