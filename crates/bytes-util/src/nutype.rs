/// Declares an open enum: a transparent newtype over an integer with named
/// associated constants for the known values.
///
/// Unlike a Rust `enum`, values without a name are kept as-is, so a field can
/// be decoded and re-encoded losslessly even when it carries a reserved value.
///
/// ```
/// bytes_util::nutype_enum! {
///     /// Kind of widget.
///     pub enum Widget(u8) {
///         /// A knob.
///         Knob = 1,
///         /// A lever.
///         Lever = 2,
///     }
/// }
///
/// assert_eq!(Widget::from(2), Widget::Lever);
/// assert_eq!(format!("{:?}", Widget::Knob), "Widget::Knob");
/// assert_eq!(format!("{:?}", Widget(9)), "Widget(9)");
/// ```
#[macro_export]
macro_rules! nutype_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident($type:ty) {
            $(
                $(#[$variant_attr:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        $vis struct $name(pub $type);

        impl $name {
            $(
                $(#[$variant_attr])*
                #[allow(non_upper_case_globals)]
                pub const $variant: Self = Self($value);
            )*
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match *self {
                    $(
                        Self::$variant => write!(f, "{}::{}", stringify!($name), stringify!($variant)),
                    )*
                    _ => write!(f, "{}({:?})", stringify!($name), self.0),
                }
            }
        }

        impl ::std::convert::From<$type> for $name {
            fn from(value: $type) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$name> for $type {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}
