use serde::Serialize;

use crate::overlay::encode_uri_component;

pub const DISTRICT_PAGE: &str = "bairro.html";
pub const REPORT_PAGE: &str = "relatorio.html";
/// Query parameter carrying the district display name on the detail page.
pub const DISTRICT_PARAM: &str = "district";

/// Pages the dashboard navigates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "district", rename_all = "snake_case")]
pub enum Route {
    Report,
    District(String),
}

impl Route {
    pub fn href(&self) -> String {
        match self {
            Self::Report => REPORT_PAGE.to_owned(),
            Self::District(name) => format!(
                "{DISTRICT_PAGE}?{DISTRICT_PARAM}={}",
                encode_uri_component(name)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn hrefs() {
        assert_eq!(Route::Report.href(), "relatorio.html");
        assert_eq!(
            Route::District("Vila Toninho".to_owned()).href(),
            "bairro.html?district=Vila%20Toninho"
        );
    }
}
