//! Extension type identifiers.
//!
//! Used for lookup and display only. An id missing from the table is not an
//! error: it gets a synthesized `type_<id>` name and its extension is carried
//! as raw bytes.

use std::borrow::Cow;
use std::fmt;

/// Hello extension type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionType(pub u16);

#[allow(missing_docs)]
impl ExtensionType {
    pub const SERVER_NAME: Self = Self(0);
    pub const MAX_FRAGMENT_LENGTH: Self = Self(1);
    pub const CLIENT_CERTIFICATE_URL: Self = Self(2);
    pub const TRUSTED_CA_KEYS: Self = Self(3);
    pub const TRUNCATED_HMAC: Self = Self(4);
    pub const STATUS_REQUEST: Self = Self(5);
    pub const USER_MAPPING: Self = Self(6);
    pub const CLIENT_AUTHZ: Self = Self(7);
    pub const SERVER_AUTHZ: Self = Self(8);
    pub const CERT_TYPE: Self = Self(9);
    pub const SUPPORTED_GROUPS: Self = Self(10);
    pub const EC_POINT_FORMATS: Self = Self(11);
    pub const SRP: Self = Self(12);
    pub const SIGNATURE_ALGORITHMS: Self = Self(13);
    pub const USE_SRTP: Self = Self(14);
    pub const HEARTBEAT: Self = Self(15);
    pub const ALPN: Self = Self(16);
    pub const STATUS_REQUEST_V2: Self = Self(17);
    pub const SIGNED_CERTIFICATE_TIMESTAMP: Self = Self(18);
    pub const CLIENT_CERTIFICATE_TYPE: Self = Self(19);
    pub const SERVER_CERTIFICATE_TYPE: Self = Self(20);
    pub const PADDING: Self = Self(21);
    pub const ENCRYPT_THEN_MAC: Self = Self(22);
    pub const EXTENDED_MASTER_SECRET: Self = Self(23);
    pub const RECORD_SIZE_LIMIT: Self = Self(28);
    pub const SESSION_TICKET: Self = Self(35);
    pub const RENEGOTIATION_INFO: Self = Self(0xFF01);
}

impl ExtensionType {
    /// Wire id.
    pub fn id(self) -> u16 {
        self.0
    }

    /// Registered name, or `type_<id>` if the id is not in the table.
    pub fn name(self) -> Cow<'static, str> {
        match self.known_name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("type_{}", self.0)),
        }
    }

    /// Check if the id is in the table.
    pub fn is_known(self) -> bool {
        self.known_name().is_some()
    }

    fn known_name(self) -> Option<&'static str> {
        EXTENSION_NAMES
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|(_, name)| *name)
    }
}

const EXTENSION_NAMES: &[(u16, &str)] = &[
    (0, "server_name"),
    (1, "max_fragment_length"),
    (2, "client_certificate_url"),
    (3, "trusted_ca_keys"),
    (4, "truncated_hmac"),
    (5, "status_request"),
    (6, "user_mapping"),
    (7, "client_authz"),
    (8, "server_authz"),
    (9, "cert_type"),
    (10, "supported_groups"),
    (11, "ec_point_formats"),
    (12, "srp"),
    (13, "signature_algorithms"),
    (14, "use_srtp"),
    (15, "heartbeat"),
    (16, "application_layer_protocol_negotiation"),
    (17, "status_request_v2"),
    (18, "signed_certificate_timestamp"),
    (19, "client_certificate_type"),
    (20, "server_certificate_type"),
    (21, "padding"),
    (22, "encrypt_then_mac"),
    (23, "extended_master_secret"),
    (28, "record_size_limit"),
    (35, "session_ticket"),
    (0xFF01, "renegotiation_info"),
];

impl fmt::Display for ExtensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<u16> for ExtensionType {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl From<ExtensionType> for u16 {
    fn from(t: ExtensionType) -> u16 {
        t.0
    }
}
