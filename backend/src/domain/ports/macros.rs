//! Helper macro for declaring port error enums.
//!
//! Every variant carries named fields; the macro derives `thiserror::Error`
//! and generates a snake-case constructor per variant whose parameters accept
//! anything convertible into the field type.

macro_rules! define_port_error {
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
                $variant { $($field: $ty),* },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Construct [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unreachable { host: String } => "cannot reach {host}",
            Throttled { host: String, retry_after: u32 } => "{host} throttled for {retry_after}s",
        }
    }

    #[test]
    fn constructors_convert_arguments() {
        assert_eq!(
            SamplePortError::unreachable("db").to_string(),
            "cannot reach db"
        );
        assert_eq!(
            SamplePortError::throttled("db", 5_u32),
            SamplePortError::Throttled {
                host: "db".to_owned(),
                retry_after: 5
            }
        );
    }
}
