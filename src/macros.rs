/// Declares a one-byte protocol code enum.
///
/// Every listed variant maps to a fixed code and a description. Codes not
/// listed decode to a trailing `Reserved(u8)` variant so the original value
/// survives a round trip.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $code:literal => $description:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// A code with no assigned meaning, kept verbatim.
            Reserved(u8),
        }

        impl $name {
            /// Returns the wire code.
            pub const fn id(&self) -> u8 {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Reserved(code) => *code,
                }
            }

            /// Decodes a wire code, falling back to `Reserved` for unknown values.
            pub const fn from_id(id: u8) -> Self {
                match id {
                    $( $code => Self::$variant, )+
                    other => Self::Reserved(other),
                }
            }

            /// Returns a human-readable description.
            pub const fn description(&self) -> &'static str {
                match self {
                    $( Self::$variant => $description, )+
                    Self::Reserved(_) => "Reserved",
                }
            }
        }

        impl From<u8> for $name {
            fn from(id: u8) -> Self {
                Self::from_id(id)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.id()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.description())
            }
        }
    };
}
