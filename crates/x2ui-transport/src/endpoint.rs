use url::form_urlencoded;

/// Builds event URLs under `<app_root>/events/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    root: String,
}

impl Endpoints {
    pub fn new(app_root: impl Into<String>) -> Self {
        let root: String = app_root.into();
        Self {
            root: root.trim_end_matches('/').to_owned(),
        }
    }

    #[inline]
    pub fn app_root(&self) -> &str {
        &self.root
    }

    /// Absolute URL of an event path such as `action/save`.
    pub fn url(&self, event_path: &str) -> String {
        format!("{}/events/{}", self.root, event_path.trim_start_matches('/'))
    }

    #[inline]
    pub fn action(name: &str) -> String {
        format!("action/{name}")
    }

    #[inline]
    pub fn feature(backend: &str) -> String {
        format!("feature/{backend}")
    }

    pub fn data_page(controller: &str, page: u32, order_by: &str, direction: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &page.to_string())
            .append_pair("orderby", order_by)
            .append_pair("order_direction", direction)
            .finish();
        format!("action/onDataPage/{controller}?{query}")
    }

    #[inline]
    pub fn data_size(controller: &str) -> String {
        format!("action/onDataSize/{controller}")
    }

    #[inline]
    pub fn add_new(controller: &str) -> String {
        format!("action/addnew/{controller}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_event_urls() {
        let e = Endpoints::new("http://localhost:8080/jemo/admin/");
        assert_eq!(
            e.url(&Endpoints::action("saveUser")),
            "http://localhost:8080/jemo/admin/events/action/saveUser"
        );
        assert_eq!(e.url("onListFeatures"), "http://localhost:8080/jemo/admin/events/onListFeatures");
        assert_eq!(Endpoints::feature("users"), "feature/users");
    }

    #[test]
    fn data_page_encodes_query() {
        assert_eq!(
            Endpoints::data_page("users", 1, "name", "ASC"),
            "action/onDataPage/users?page=1&orderby=name&order_direction=ASC"
        );
        assert_eq!(
            Endpoints::data_page("users", 3, "last name&co", "DESC"),
            "action/onDataPage/users?page=3&orderby=last+name%26co&order_direction=DESC"
        );
    }
}
