use crate::domain::{Currency, POPULAR_INTERESTS};

pub struct CatalogController;

impl CatalogController {
    pub fn new() -> Self {
        Self
    }

    pub fn currencies(&self) -> String {
        let mut output = String::from("Supported currencies:\n\n");
        for currency in Currency::ALL {
            let default_marker = if currency == Currency::default() {
                " (default)"
            } else {
                ""
            };
            output.push_str(&format!(
                "  {}  {}  {}{}\n",
                currency.code(),
                currency.symbol(),
                currency.name(),
                default_marker
            ));
        }
        output
    }

    pub fn interests(&self) -> String {
        let mut output = String::from("Suggested interests (any free-form tag also works):\n\n");
        for interest in POPULAR_INTERESTS {
            output.push_str(&format!("  - {}\n", interest));
        }
        output
    }
}

impl Default for CatalogController {
    fn default() -> Self {
        Self::new()
    }
}
