//! Named group descriptors and the fixed group table.
//!
//! Table contents follow RFC 4492 §5.1.1, RFC 7027, RFC 7748 and RFC 7919.
//! The table is versioned by [`NAMED_GROUPS_VERSION`]; entries are never
//! mutated at runtime.

use std::fmt;

/// Bumped whenever [`NAMED_GROUPS`] changes.
pub const NAMED_GROUPS_VERSION: u32 = 2;

/// Key exchange family of a named group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCategory {
    /// Elliptic curve Diffie-Hellman (including X25519/X448).
    Ecdhe,
    /// Finite field Diffie-Hellman.
    Ffdhe,
}

impl GroupCategory {
    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            GroupCategory::Ecdhe => "ECDHE",
            GroupCategory::Ffdhe => "FFDHE",
        }
    }
}

/// Immutable description of one negotiation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedGroup {
    /// Wire id carried in supported_groups and key exchange messages.
    pub id: u16,
    /// Key exchange family.
    pub category: GroupCategory,
    /// Canonical name.
    pub name: &'static str,
    /// Algorithm family used to instantiate parameters ("EC", "XDH", "DiffieHellman").
    pub algorithm: &'static str,
    /// Curve object identifier, if the group has one.
    pub oid: Option<&'static str>,
    /// Whether the group may be used in FIPS mode.
    pub fips: bool,
}

impl NamedGroup {
    /// Check if this is an elliptic curve group.
    pub fn is_ecdhe(&self) -> bool {
        self.category == GroupCategory::Ecdhe
    }

    /// Check if this is a finite field group.
    pub fn is_ffdhe(&self) -> bool {
        self.category == GroupCategory::Ffdhe
    }
}

impl fmt::Display for NamedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:04x})", self.name, self.id)
    }
}

const fn ec(id: u16, name: &'static str, oid: &'static str, fips: bool) -> NamedGroup {
    NamedGroup {
        id,
        category: GroupCategory::Ecdhe,
        name,
        algorithm: "EC",
        oid: Some(oid),
        fips,
    }
}

const fn xdh(id: u16, name: &'static str, oid: &'static str) -> NamedGroup {
    NamedGroup {
        id,
        category: GroupCategory::Ecdhe,
        name,
        algorithm: "XDH",
        oid: Some(oid),
        fips: false,
    }
}

const fn ffdhe(id: u16, name: &'static str) -> NamedGroup {
    NamedGroup {
        id,
        category: GroupCategory::Ffdhe,
        name,
        algorithm: "DiffieHellman",
        oid: None,
        fips: true,
    }
}

/// Every group this implementation knows, in wire id order.
pub static NAMED_GROUPS: [NamedGroup; 35] = [
    // Binary curves (RFC 4492)
    ec(0x0001, "sect163k1", "1.3.132.0.1", true),
    ec(0x0002, "sect163r1", "1.3.132.0.2", false),
    ec(0x0003, "sect163r2", "1.3.132.0.15", true),
    ec(0x0004, "sect193r1", "1.3.132.0.24", false),
    ec(0x0005, "sect193r2", "1.3.132.0.25", false),
    ec(0x0006, "sect233k1", "1.3.132.0.26", true),
    ec(0x0007, "sect233r1", "1.3.132.0.27", true),
    ec(0x0008, "sect239k1", "1.3.132.0.3", false),
    ec(0x0009, "sect283k1", "1.3.132.0.16", true),
    ec(0x000A, "sect283r1", "1.3.132.0.17", true),
    ec(0x000B, "sect409k1", "1.3.132.0.36", true),
    ec(0x000C, "sect409r1", "1.3.132.0.37", true),
    ec(0x000D, "sect571k1", "1.3.132.0.38", true),
    ec(0x000E, "sect571r1", "1.3.132.0.39", true),
    // Prime curves (RFC 4492)
    ec(0x000F, "secp160k1", "1.3.132.0.9", false),
    ec(0x0010, "secp160r1", "1.3.132.0.8", false),
    ec(0x0011, "secp160r2", "1.3.132.0.30", false),
    ec(0x0012, "secp192k1", "1.3.132.0.31", false),
    ec(0x0013, "secp192r1", "1.2.840.10045.3.1.1", true),
    ec(0x0014, "secp224k1", "1.3.132.0.32", false),
    ec(0x0015, "secp224r1", "1.3.132.0.33", true),
    ec(0x0016, "secp256k1", "1.3.132.0.10", false),
    ec(0x0017, "secp256r1", "1.2.840.10045.3.1.7", true),
    ec(0x0018, "secp384r1", "1.3.132.0.34", true),
    ec(0x0019, "secp521r1", "1.3.132.0.35", true),
    // Brainpool curves (RFC 7027)
    ec(0x001A, "brainpoolP256r1", "1.3.36.3.3.2.8.1.1.7", false),
    ec(0x001B, "brainpoolP384r1", "1.3.36.3.3.2.8.1.1.11", false),
    ec(0x001C, "brainpoolP512r1", "1.3.36.3.3.2.8.1.1.13", false),
    // Montgomery curves (RFC 7748)
    xdh(0x001D, "x25519", "1.3.101.110"),
    xdh(0x001E, "x448", "1.3.101.111"),
    // Finite field groups (RFC 7919)
    ffdhe(0x0100, "ffdhe2048"),
    ffdhe(0x0101, "ffdhe3072"),
    ffdhe(0x0102, "ffdhe4096"),
    ffdhe(0x0103, "ffdhe6144"),
    ffdhe(0x0104, "ffdhe8192"),
];
