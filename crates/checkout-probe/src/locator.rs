//! Selector abstraction for addressing storefront elements.
//!
//! A [`Selector`] names either every element matching a CSS expression or one
//! positional match of it. Drivers decide how to resolve it: the chromium
//! adapter renders DOM query expressions, the in-memory store matches the
//! CSS text directly.

use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., ".shopping_cart_badge")
    Css(String),
    /// `data-test` attribute selector
    TestId(String),
    /// The `index`-th (0-based) match of `base`
    Nth {
        /// Selector whose matches are indexed
        base: Box<Selector>,
        /// 0-based position
        index: usize,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Narrow to one positional match
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        Self::Nth {
            base: Box::new(self.base().clone()),
            index,
        }
    }

    /// Narrow to the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Selector without positional narrowing
    #[must_use]
    pub fn base(&self) -> &Self {
        match self {
            Self::Nth { base, .. } => base.base(),
            other => other,
        }
    }

    /// Positional index, if narrowed
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Nth { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Plain CSS text of the base selector
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::TestId(id) => format!("[data-test=\"{id}\"]"),
            Self::Nth { base, .. } => base.to_css(),
        }
    }

    /// JavaScript expression resolving to the element (or `null`)
    #[must_use]
    pub fn to_query(&self) -> String {
        let css = self.to_css();
        match self.index() {
            Some(i) => format!("(document.querySelectorAll({css:?})[{i}] || null)"),
            None => format!("document.querySelector({css:?})"),
        }
    }

    /// JavaScript expression resolving to an array of matched elements
    #[must_use]
    pub fn to_all_query(&self) -> String {
        let css = self.to_css();
        match self.index() {
            Some(i) => format!("Array.from(document.querySelectorAll({css:?})).slice({i}, {})", i + 1),
            None => format!("Array.from(document.querySelectorAll({css:?}))"),
        }
    }

    /// JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_all_query())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index() {
            Some(i) => write!(f, "{} >> nth={i}", self.to_css()),
            None => write!(f, "{}", self.to_css()),
        }
    }
}

impl From<&str> for Selector {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let sel = Selector::css(".shopping_cart_badge");
            assert_eq!(
                sel.to_query(),
                "document.querySelector(\".shopping_cart_badge\")"
            );
            assert_eq!(sel.index(), None);
        }

        #[test]
        fn test_test_id_renders_attribute_css() {
            let sel = Selector::test_id("error");
            assert_eq!(sel.to_css(), "[data-test=\"error\"]");
        }

        #[test]
        fn test_nth_narrowing() {
            let sel = Selector::css(".btn_inventory").nth(2);
            assert_eq!(sel.index(), Some(2));
            assert_eq!(sel.to_css(), ".btn_inventory");
            assert!(sel.to_query().contains("[2]"));
            assert!(sel.to_count_query().ends_with(".slice(2, 3).length"));
        }

        #[test]
        fn test_nth_of_nth_replaces_index() {
            let sel = Selector::css(".cart_button").nth(3).nth(0);
            assert_eq!(sel.index(), Some(0));
            assert_eq!(sel.base(), &Selector::css(".cart_button"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("#finish").to_string(), "#finish");
            assert_eq!(
                Selector::css(".cart_item").first().to_string(),
                ".cart_item >> nth=0"
            );
        }

        #[test]
        fn test_from_str() {
            let sel: Selector = "#checkout".into();
            assert_eq!(sel, Selector::css("#checkout"));
        }
    }
}
