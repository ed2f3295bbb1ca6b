//! Read-only lookup over the named group table.

use tracing::debug;

use super::named_group::{GroupCategory, NamedGroup, NAMED_GROUPS};

/// Concrete elliptic curve parameters, as held by a key exchange provider.
///
/// Only the object identifier is needed to map parameters back to a group.
pub trait CurveParameters {
    /// Dotted object identifier of the curve.
    fn object_identifier(&self) -> &str;
}

/// Catalog of negotiation groups.
///
/// Built once at startup and shared by reference (or `Arc`) with every
/// connection. Lookups are linear scans; the table is small.
#[derive(Debug, Clone)]
pub struct NamedGroupRegistry {
    groups: Vec<&'static NamedGroup>,
}

impl NamedGroupRegistry {
    /// Registry over every known group.
    pub fn standard() -> Self {
        Self {
            groups: NAMED_GROUPS.iter().collect(),
        }
    }

    /// Registry restricted to FIPS-eligible groups.
    pub fn fips() -> Self {
        Self {
            groups: NAMED_GROUPS.iter().filter(|g| g.fips).collect(),
        }
    }

    /// Find a group by wire id.
    pub fn by_id(&self, id: u16) -> Option<&'static NamedGroup> {
        self.groups.iter().copied().find(|g| g.id == id)
    }

    /// Find a group by canonical name (case-sensitive).
    pub fn by_name(&self, name: &str) -> Option<&'static NamedGroup> {
        self.groups.iter().copied().find(|g| g.name == name)
    }

    /// Find the group whose object identifier matches `params`.
    pub fn by_curve<P: CurveParameters + ?Sized>(&self, params: &P) -> Option<&'static NamedGroup> {
        let oid = params.object_identifier();
        self.groups.iter().copied().find(|g| g.oid == Some(oid))
    }

    /// Check if `id` names a group in this registry.
    pub fn contains(&self, id: u16) -> bool {
        self.by_id(id).is_some()
    }

    /// Iterate over every group in wire id order.
    pub fn iter(&self) -> impl Iterator<Item = &'static NamedGroup> + '_ {
        self.groups.iter().copied()
    }

    /// Iterate over the groups of one category.
    pub fn of_category(
        &self,
        category: GroupCategory,
    ) -> impl Iterator<Item = &'static NamedGroup> + '_ {
        self.iter().filter(move |g| g.category == category)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Pick a group for key exchange.
    ///
    /// Walks `server_preference` in order and returns the first id the client
    /// offered that this registry knows. `None` means no common group.
    pub fn select(
        &self,
        client_offered: &[u16],
        server_preference: &[u16],
    ) -> Option<&'static NamedGroup> {
        let selected = server_preference
            .iter()
            .filter(|id| client_offered.contains(id))
            .find_map(|&id| self.by_id(id));

        match selected {
            Some(g) => debug!(group = g.name, "named group selected"),
            None => debug!(?client_offered, "no common named group"),
        }
        selected
    }
}

impl Default for NamedGroupRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
