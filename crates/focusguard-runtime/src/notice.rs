//! Notice target: the extension page shown in place of a blocked navigation.

use url::form_urlencoded;

use crate::config::ExtensionSection;

/// Builds and recognizes `<root>/<page>?<param>=<host>` URLs.
#[derive(Debug, Clone)]
pub struct NoticeTarget {
    base: String,
    param: String,
}

impl NoticeTarget {
    pub fn new(ext: &ExtensionSection) -> Self {
        let root = ext.root.trim_end_matches('/');
        let page = ext.notice_page.trim_start_matches('/');
        Self {
            base: format!("{root}/{page}"),
            param: ext.notice_param.clone(),
        }
    }

    /// Notice URL carrying the blocked hostname (url-encoded).
    pub fn url_for(&self, hostname: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.param, hostname)
            .finish();
        format!("{}?{}", self.base, query)
    }

    /// True for the notice page itself, with or without query/fragment.
    pub fn is_notice_url(&self, url: &str) -> bool {
        match url.strip_prefix(self.base.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('?') || rest.starts_with('#'),
            None => false,
        }
    }
}
