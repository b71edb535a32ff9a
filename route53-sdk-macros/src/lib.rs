#[macro_export]
/// The `field_setters!` macro builds the lookup table that maps XML leaf element names to typed
/// field setters of an entity, and a `set_field` method that dispatches through it.
///
/// This macro supports the following setter kinds:
/// - `text`: stores the value as `Some(String)`
/// - `string`: stores the value as `String`
/// - `push`: appends the value to a `Vec<String>`
/// - `strip("/prefix/")`: stores the value as `Some(String)` with a leading path prefix removed
/// - `parse`: parses the value with `FromStr` into the field type
/// - `parse_opt`: parses the value with `FromStr` and stores it as `Some(..)`
///
/// # Usage
///
/// ```ignore
/// field_setters!(Entity {
///     "Id" => id: strip("/hostedzone/"),
///     "Name" => name: text,
///     "TTL" => ttl: parse
/// });
/// ```
///
/// Where:
/// - `Entity` is the struct owning the fields
/// - the string literals are XML element local names
/// - `id`, `name`, `ttl` are the fields written by each setter
///
/// The generated `set_field` returns `Ok(false)` for element names with no registered setter so
/// the caller can keep them elsewhere, and `Err(message)` when a value cannot be parsed.
macro_rules! field_setters {
    (@set $this:ident, $value:ident, $field:ident, text) => {
        $this.$field = Some($value.to_string());
    };
    (@set $this:ident, $value:ident, $field:ident, string) => {
        $this.$field = $value.to_string();
    };
    (@set $this:ident, $value:ident, $field:ident, push) => {
        $this.$field.push($value.to_string());
    };
    (@set $this:ident, $value:ident, $field:ident, strip($prefix:literal)) => {
        $this.$field = Some($value.strip_prefix($prefix).unwrap_or($value).to_string());
    };
    (@set $this:ident, $value:ident, $field:ident, parse) => {
        $this.$field = $value
            .trim()
            .parse()
            .map_err(|e| format!("{} `{}`: {}", stringify!($field), $value, e))?;
    };
    (@set $this:ident, $value:ident, $field:ident, parse_opt) => {
        $this.$field = Some(
            $value
                .trim()
                .parse()
                .map_err(|e| format!("{} `{}`: {}", stringify!($field), $value, e))?,
        );
    };

    // Main macro
    (
        $ty:ident {
            $( $elem:literal => $field:ident : $kind:ident $( ( $arg:literal ) )? ),* $(,)?
        }
    ) => {
        impl $ty {
            const FIELD_SETTERS: &'static [(
                &'static str,
                fn(&mut $ty, &str) -> ::std::result::Result<(), String>,
            )] = &[
                $(
                    ($elem, {
                        fn set(this: &mut $ty, value: &str) -> ::std::result::Result<(), String> {
                            $crate::field_setters!(@set this, value, $field, $kind $( ( $arg ) )?);
                            Ok(())
                        }
                        set
                    }),
                )*
            ];

            /// Writes `value` into the field registered for the element `name`.
            ///
            /// Returns `Ok(false)` when no setter is registered for `name`.
            pub fn set_field(&mut self, name: &str, value: &str) -> ::std::result::Result<bool, String> {
                match Self::FIELD_SETTERS.iter().find(|(elem, _)| *elem == name) {
                    Some((_, set)) => set(self, value).map(|_| true),
                    None => Ok(false),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[derive(Default)]
    struct Sample {
        id: Option<String>,
        label: String,
        ttl: u32,
        count: Option<u64>,
        items: Vec<String>,
    }

    field_setters!(Sample {
        "Id" => id: strip("/sample/"),
        "Label" => label: string,
        "TTL" => ttl: parse,
        "Count" => count: parse_opt,
        "Item" => items: push,
    });

    #[test]
    fn dispatches_known_elements() {
        let mut sample = Sample::default();
        assert_eq!(sample.set_field("Id", "/sample/S1"), Ok(true));
        assert_eq!(sample.set_field("Label", "first"), Ok(true));
        assert_eq!(sample.set_field("TTL", "300"), Ok(true));
        assert_eq!(sample.set_field("Count", "7"), Ok(true));
        assert_eq!(sample.set_field("Item", "a"), Ok(true));
        assert_eq!(sample.set_field("Item", "b"), Ok(true));

        assert_eq!(sample.id.as_deref(), Some("S1"));
        assert_eq!(sample.label, "first");
        assert_eq!(sample.ttl, 300);
        assert_eq!(sample.count, Some(7));
        assert_eq!(sample.items, vec!["a", "b"]);
    }

    #[test]
    fn reports_unknown_elements() {
        let mut sample = Sample::default();
        assert_eq!(sample.set_field("Unknown", "x"), Ok(false));
    }

    #[test]
    fn rejects_unparsable_values() {
        let mut sample = Sample::default();
        let err = sample.set_field("TTL", "soon").unwrap_err();
        assert!(err.starts_with("ttl `soon`"));
    }

    #[test]
    fn keeps_bare_values_when_prefix_is_missing() {
        let mut sample = Sample::default();
        sample.set_field("Id", "S2").unwrap();
        assert_eq!(sample.id.as_deref(), Some("S2"));
    }
}
