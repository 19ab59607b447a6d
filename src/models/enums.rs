use serde::{Deserialize, Serialize};

/// Error raised when a wire string does not name a known enum variant.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {field} value: {value}")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + serde renames + std::str::FromStr
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownVariant {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Wire values follow the persistence backend's French vocabulary.
str_enum!(CaseStatus {
    Pending => "en_attente",
    Treated => "traité",
});

str_enum!(SessionStatus {
    InProgress => "in_progress",
    AwaitingDiagnosis => "awaiting_diagnosis",
    Complete => "complete",
});
