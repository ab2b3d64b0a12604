// record
/// Implement `PropertyAccessor` for an existing struct.
///
/// Each listed field becomes a property named after the field; `=> "alias"`
/// overrides the column alias used for result mapping.
///
/// ```ignore
/// record!(User {
///     id: i64,
///     name: Option<String> => "user_name",
/// });
/// ```
#[macro_export]
macro_rules! record {
    ( $type:ty { $( $field:ident : $fty:ty $( => $alias:literal )? ),* $(,)? } ) => {
        impl $crate::traits::PropertyAccessor for $type {
            fn properties() -> &'static [$crate::traits::PropertyDescriptor] {
                const PROPERTIES: &[$crate::traits::PropertyDescriptor] = &[
                    $(
                        $crate::traits::PropertyDescriptor::new(
                            stringify!($field),
                            $crate::__record_alias!($field $(, $alias)?),
                            <$fty as $crate::traits::FieldValue>::DB_TYPE,
                        ),
                    )*
                ];

                PROPERTIES
            }

            fn get(&self, name: &str) -> Option<$crate::value::Value> {
                $(
                    if name == stringify!($field) {
                        return Some($crate::traits::FieldValue::to_value(&self.$field));
                    }
                )*

                None
            }

            fn set(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> Result<(), $crate::traits::PropertyError> {
                $(
                    if name == stringify!($field) {
                        self.$field = <$fty as $crate::traits::FieldValue>::from_value(value)
                            .map_err(|source| $crate::traits::PropertyError::Conversion {
                                property: name.to_string(),
                                source,
                            })?;

                        return Ok(());
                    }
                )*

                drop(value);
                Err($crate::traits::PropertyError::NotFound {
                    type_name: ::std::any::type_name::<Self>(),
                    property: name.to_string(),
                })
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_alias {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $alias:literal) => {
        $alias
    };
}
