//! # Domain Models
//!
//! These structs represent the core entities of the YCBN site.
//! We use UUID v7 for time-ordered, globally unique identification.

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum stored as
/// TEXT. The strings must match the enum's serde representation.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(crate::errors::DomainError::Internal(format!(
                        "unknown {} value {:?}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

mod account;
mod catalog;
mod intake;
mod membership;
mod publication;
mod showcase;

pub use account::*;
pub use catalog::*;
pub use intake::*;
pub use membership::*;
pub use publication::*;
pub use showcase::*;
