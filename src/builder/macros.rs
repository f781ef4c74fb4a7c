//! Macros for declaring symbolic state enums.

/// Declare a state enum whose variants carry a wire-level symbolic name.
///
/// Generates the enum with serde renames, a [`State`](crate::core::State)
/// implementation, `Display` and `FromStr` (unknown names yield `None`
/// from `from_name` and an error string from `parse`). Attributes on the
/// enum and its variants pass through, so `#[derive(Default)]` with a
/// `#[default]` variant works as usual.
///
/// # Example
///
/// ```
/// use homebus::state_enum;
/// use homebus::core::State;
///
/// state_enum! {
///     pub enum ValveState {
///         Closed => "closed",
///         Open => "open",
///     }
/// }
///
/// assert_eq!(ValveState::Open.name(), "open");
/// assert_eq!("closed".parse::<ValveState>(), Ok(ValveState::Closed));
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Look up a variant by its symbolic name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($label => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s).ok_or_else(|| format!("unknown state '{}'", s))
            }
        }
    };
}
