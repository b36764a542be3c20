//! macros used by themecap

/// if an option is enabled, perform an expression
///
/// # Examples
///
/// ```no_run
/// use themecap::opt_and;
///
/// let mut opened = false;
/// opt_and!(export.open_after, opened = true);
/// println!("opened: {}", opened);
/// ```
#[macro_export]
macro_rules! opt_and {
    ($lvl1:ident . $field:ident, $a:expr) => {
        if $crate::getopt!($lvl1.$field) {
            $a
        }
    };
}

/// implement [`Validate`](crate::config::validate::Validate) from per-field rules
///
/// each rule is `field => predicate, message`. a field may have several rules, unset fields are
/// skipped
#[macro_export]
macro_rules! validator {
    ($struct_name:ty, $( $field:ident => $requirement:expr, $err_msg:expr );* $(;)? ) => {
        impl Validate for $struct_name {
            fn validate(&self) -> Result<(), Vec<String>> {
                let mut errors: Vec<String> = Vec::new();

                $(
                    if let Some(ref value) = self.$field
                        && !($requirement)(value)
                    {
                        errors.push(format!("{}: {}", stringify!($field), $err_msg));
                    }
                )*

                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(errors)
                }
            }
        }
    };
}

/// like [`validator!`], also validating nested tables and prefixing their errors with the
/// table name
#[macro_export]
macro_rules! validator_nested {
    ($struct_name:ty,
        fields: { $( $field:ident => $requirement:expr, $err_msg:expr );* $(;)? }
        nested: { $( $nested:ident );* $(;)? }
    ) => {
        impl Validate for $struct_name {
            fn validate(&self) -> Result<(), Vec<String>> {
                let mut errors: Vec<String> = Vec::new();

                $(
                    if let Some(ref value) = self.$field
                        && !($requirement)(value)
                    {
                        errors.push(format!("{}: {}", stringify!($field), $err_msg));
                    }
                )*

                $(
                    if let Some(ref nested) = self.$nested
                        && let Err(nested_errors) = nested.validate()
                    {
                        errors.extend(
                            nested_errors
                                .into_iter()
                                .map(|err| format!("{}.{}", stringify!($nested), err)),
                        );
                    }
                )*

                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(errors)
                }
            }
        }
    };
}

/// get the current value of a given setting
///
/// falls back to the built-in default when the loaded config leaves it unset. the `raw` forms
/// return an `Option` instead, for settings without a default
#[macro_export]
macro_rules! getopt {
    () => {
        $crate::config::instance::config()
    };

    ($lvl1:ident . $field:ident) => {{
        $crate::config::instance::get_or_default(
            |c| c.$lvl1.as_ref().and_then(|sub| sub.$field.clone()),
            $crate::config::options::ThemeCap::default()
                .$lvl1
                .and_then(|sub| sub.$field)
                .expect(concat!(
                    "Default value missing for: ",
                    stringify!($lvl1),
                    ".",
                    stringify!($field)
                )),
        )
    }};

    (raw $lvl1:ident . $field:ident) => {{
        $crate::config::instance::config()
            .ok()
            .and_then(|c| c.$lvl1.as_ref().and_then(|sub| sub.$field.clone()))
    }};
}

#[cfg(test)]
mod tests {
    use crate::config::options::ThemeCap;

    /// the fallback `getopt!` uses, without touching the loaded config
    macro_rules! default_of {
        ($lvl1:ident . $field:ident) => {
            ThemeCap::default().$lvl1.and_then(|sub| sub.$field)
        };
    }

    #[test]
    fn test_every_read_option_has_a_default() {
        assert_eq!(
            default_of!(themes.names),
            Some(vec!["light".to_string(), "dark".to_string(), "blue".to_string()])
        );
        assert_eq!(default_of!(export.file_stem).as_deref(), Some("ThemeColors"));
        assert_eq!(default_of!(capture.sources).map(|s| s.len()), Some(4));

        assert!(default_of!(host.dir).is_some());
        assert!(default_of!(export.workbook).is_some());
        assert!(default_of!(export.json).is_some());
        assert!(default_of!(export.csv).is_some());
        assert!(default_of!(export.pretty_json).is_some());
        assert!(default_of!(export.open_after).is_some());
        assert!(default_of!(logging.enable).is_some());
        assert!(default_of!(logging.level).is_some());
        assert!(default_of!(logging.format).is_some());
        assert!(default_of!(logging.ansi).is_some());
        assert!(default_of!(logging.event_targets).is_some());
        assert!(default_of!(logging.line_numbers).is_some());
    }
}
