//! Helper macro generating port error enums with snake-case constructors.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum ExampleError {
//!         Query { message: String } => "query failed: {message}",
//!     }
//! }
//! let err = ExampleError::query("boom");
//! ```

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Missing { id: i64 } => "record {id} missing",
            Query { message: String } => "query failed: {message}",
            Mixed { message: String, attempts: u32 } => "{message} after {attempts} attempts",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(SamplePortError::query("boom").to_string(), "query failed: boom");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = SamplePortError::missing(7_i64);
        assert_eq!(err, SamplePortError::Missing { id: 7 });
        assert_eq!(err.to_string(), "record 7 missing");
    }

    #[test]
    fn mixed_fields_are_ordered_as_declared() {
        let err = SamplePortError::mixed("timed out", 3_u32);
        assert_eq!(err.to_string(), "timed out after 3 attempts");
    }
}
