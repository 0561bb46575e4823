//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Role and status enums travel as lowercase strings in JSON bodies and in
//! query strings. The macro keeps the two representations in one place.
//!
//! # Example
//!
//! ```rust
//! use opsdeck_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Public,
//!     Private,
//! }
//!
//! impl_wire_enum_conversions!(Visibility {
//!     Public => "public",
//!     Private => "private",
//! });
//!
//! assert_eq!(Visibility::Public.to_string(), "public");
//! assert_eq!("PRIVATE".parse::<Visibility>().unwrap(), Visibility::Private);
//! ```

/// Implements `Display`, `FromStr` and `as_str` for wire-level enums
///
/// Parsing is case-insensitive; output is always the lowercase mapping.
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of the variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::core::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::core::result::Result::Ok(Self::$variant),)+
                    _ => ::core::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        ::core::stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}
