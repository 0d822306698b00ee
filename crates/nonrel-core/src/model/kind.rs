use derive_more::Display;

///
/// StorageKind
///
/// Closed set of physical encodings a storage driver persists.
/// Conversion routines dispatch on this tag exhaustively.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StorageKind {
    #[display("key")]
    Key,
    #[display("string")]
    String,
    #[display("long")]
    Long,
    #[display("bool")]
    Bool,
    #[display("date")]
    Date,
    #[display("datetime")]
    DateTime,
    #[display("time")]
    Time,
    #[display("decimal")]
    Decimal,
    #[display("float")]
    Float,
    #[display("integer")]
    Integer,
    #[display("raw")]
    Raw,
    #[display("bytes")]
    Bytes,
    #[display("list")]
    List,
    #[display("set")]
    Set,
    #[display("dict")]
    Dict,
    #[display("embedded")]
    Embedded,
}

impl StorageKind {
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Dict)
    }

    /// Kinds usable as a primary key without driver-side key encoding.
    #[must_use]
    pub const fn supports_primary_key(self) -> bool {
        !matches!(
            self,
            Self::Key
                | Self::Raw
                | Self::Bytes
                | Self::List
                | Self::Set
                | Self::Dict
                | Self::Embedded
        )
    }
}
