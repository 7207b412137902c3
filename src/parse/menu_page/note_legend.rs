use std::borrow::Cow;
use std::collections::HashMap;

use scraper::ElementRef;

use crate::parse::text::collect_text;
use crate::static_selector;

/// Site-wide mapping from a dietary note's long description to its short
/// display code.
///
/// The menu page renders an item's dietary notes as icons whose `title`
/// attribute holds the long description, and a legend elsewhere on the page
/// pairs each description with a short label. The legend is built once per
/// document and handed by reference into item extraction; items copy the
/// codes they need, so the legend can be dropped once extraction finishes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NoteLegend<'a> {
    codes: HashMap<Cow<'a, str>, Cow<'a, str>>,
}

impl<'a> NoteLegend<'a> {
    /// Scans the whole page for legend rows.
    ///
    /// Rows missing their code or description element are skipped. Legend
    /// rows are unique in practice; if a description repeats anyway, the
    /// last row's code wins.
    pub fn from_html_element(element: ElementRef<'a>) -> Self {
        static_selector!(ROW_SELECTOR <- "div.site-panel__diet-pref-row");
        static_selector!(CODE_SELECTOR <- "span.site-panel__diet-pref-header-inner");
        static_selector!(DESCRIPTION_SELECTOR <- "div.site-panel__diet-pref-acc-content");

        let mut codes = HashMap::new();
        for row in element.select(&ROW_SELECTOR) {
            let Some(code) = row.select(&CODE_SELECTOR).next() else {
                continue;
            };
            let Some(description) = row.select(&DESCRIPTION_SELECTOR).next() else {
                continue;
            };
            codes.insert(collect_text(description), collect_text(code));
        }
        Self { codes }
    }

    /// Short code for `description`, if the legend has one.
    pub fn resolve(&self, description: &str) -> Option<&str> {
        self.codes.get(description).map(Cow::as_ref)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
    <div class="site-panel__daypart-legend">
      <div class="site-panel__diet-pref-row">
        <span class="site-panel__diet-pref-header-inner">V</span>
        <div class="site-panel__diet-pref-acc-content">Vegetarian</div>
      </div>
      <div class="site-panel__diet-pref-row">
        <span class="site-panel__diet-pref-header-inner">VG</span>
        <div class="site-panel__diet-pref-acc-content">Vegan</div>
      </div>
      <div class="site-panel__diet-pref-row">
        <span class="site-panel__diet-pref-header-inner">broken row, no description</span>
      </div>
    </div>
    "#;

    #[test]
    fn test_from_html_element() {
        let html = scraper::Html::parse_document(HTML);
        let legend = NoteLegend::from_html_element(html.root_element());
        assert_eq!(legend.len(), 2);
        assert_eq!(legend.resolve("Vegetarian"), Some("V"));
        assert_eq!(legend.resolve("Vegan"), Some("VG"));
        assert_eq!(legend.resolve("Contains Nuts"), None);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let html = scraper::Html::parse_document(HTML);
        let legend = NoteLegend::from_html_element(html.root_element());
        assert_eq!(legend.resolve("Vegan"), legend.resolve("Vegan"));
    }

    #[test]
    fn test_duplicate_description_keeps_last_row() {
        let html = scraper::Html::parse_document(
            r#"
            <div class="site-panel__diet-pref-row">
              <span class="site-panel__diet-pref-header-inner">first</span>
              <div class="site-panel__diet-pref-acc-content">Seafood Watch</div>
            </div>
            <div class="site-panel__diet-pref-row">
              <span class="site-panel__diet-pref-header-inner">SW</span>
              <div class="site-panel__diet-pref-acc-content">Seafood Watch</div>
            </div>
            "#,
        );
        let legend = NoteLegend::from_html_element(html.root_element());
        assert_eq!(legend.len(), 1);
        assert_eq!(legend.resolve("Seafood Watch"), Some("SW"));
    }

    #[test]
    fn test_page_without_legend() {
        let html = scraper::Html::parse_document("<section><h2>Lunch</h2></section>");
        let legend = NoteLegend::from_html_element(html.root_element());
        assert!(legend.is_empty());
    }
}
