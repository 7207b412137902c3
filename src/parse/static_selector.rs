/// Declares a CSS selector that is parsed once, on first use.
///
/// Selector strings in this crate are literals, so a parse failure is a
/// programming error and panics.
#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: std::sync::LazyLock<scraper::Selector> = std::sync::LazyLock::new(|| {
            scraper::Selector::parse($sel)
                .unwrap_or_else(|e| panic!("error parsing static selector {}: {e:?}", $sel))
        });
    };
}
