// src/params/types.rs
//! Enumerated stimulation settings and their native integer codes

use crate::config::constants::codes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a device-coded enum. Codes the device reports that are not in
/// the documented set land in `Unknown` so a read-back never loses data.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:path, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Code outside the documented set, as reported by the device
            #[serde(skip)]
            Unknown(i32),
        }

        impl $name {
            /// Field name used in validation reports
            pub const FIELD: &'static str = $field;

            /// Every documented variant, in code order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Integer code transmitted to the native module
            pub const fn code(self) -> i32 {
                match self {
                    $( $name::$variant => $code, )+
                    $name::Unknown(code) => code,
                }
            }

            /// Decode a device-reported integer
            pub const fn from_code(code: i32) -> Self {
                match code {
                    $( $code => $name::$variant, )+
                    other => $name::Unknown(other),
                }
            }

            /// Whether this value is one of the documented variants
            pub const fn is_known(self) -> bool {
                !matches!(self, $name::Unknown(_))
            }

            /// Human-readable list of legal codes, for error messages
            pub fn valid_codes() -> Vec<String> {
                vec![$(format!("{} ({})", $code, $label)),+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( $name::$variant => write!(f, $label), )+
                    $name::Unknown(code) => write!(f, "unknown({})", code),
                }
            }
        }
    };
}

coded_enum! {
    /// Pulse shape
    Mode, "mode" {
        /// Only positive or negative current is generated
        Monophasic = codes::MODE_MONOPHASIC, "monophasic",
        /// A stimulus phase followed by an opposite recovery phase
        Biphasic = codes::MODE_BIPHASIC, "biphasic",
    }
}

coded_enum! {
    /// Current direction policy
    Polarity, "polarity" {
        Positive = codes::POLARITY_POSITIVE, "positive",
        /// Reverses the polarity of every pulse
        Negative = codes::POLARITY_NEGATIVE, "negative",
        /// Each trigger reverses the previous polarity
        Alternating = codes::POLARITY_ALTERNATING, "alternating",
    }
}

coded_enum! {
    /// Where the output amplitude is controlled from
    Source, "source" {
        /// Front panel or software demand
        Internal = codes::SOURCE_INTERNAL, "internal",
        /// External analogue voltage
        External = codes::SOURCE_EXTERNAL, "external",
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Monophasic
    }
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Positive
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Internal
    }
}
