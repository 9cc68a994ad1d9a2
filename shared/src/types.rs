pub type ScopeId = u32;
pub type ObjectId = u32;
pub type MapIndex = u32;
pub type Speed = u32;

/// Identifies a connection on the server. The raw value `0` is reserved to
/// mean "no owner" and never names a live connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Interprets a raw owner field, where `0` stands for "no owner"
    pub fn from_owner(value: u64) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
