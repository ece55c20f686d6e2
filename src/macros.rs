#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! production {
    (
        name: $name:expr,
        pattern: $pat:literal,
        build: |$caps:ident| $body:expr
        $(,)?
    ) => {{
        $crate::engine::Production {
            name: $name,
            pattern: $crate::regex!($pat),
            build: |$caps| $body,
        }
    }};
}
