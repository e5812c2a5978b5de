//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `site` - Page layout shared by every rendered HTML page
//! - `serve` - Dev server resources (reload.js, error.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{RELOAD_JS, ReloadVars};
//!
//! let js = RELOAD_JS.render(&ReloadVars { sse_path: "/__dev__/sse".into() });
//! ```

mod template;

pub use template::{Template, TemplateVars, substitute};

pub mod site {
    use super::{Template, TemplateVars, substitute};

    /// Variables for layout.html.
    ///
    /// Every field except `body`, `nav` and `footer` must already be
    /// HTML-escaped; those three are markup.
    pub struct LayoutVars {
        pub title: String,
        pub site_title: String,
        pub description: String,
        pub nav: String,
        pub footer: String,
        pub body: String,
    }

    impl TemplateVars for LayoutVars {
        fn apply(&self, content: &str) -> String {
            substitute(content, |key| {
                let value = match key {
                    "TITLE" => &self.title,
                    "SITE_TITLE" => &self.site_title,
                    "DESCRIPTION" => &self.description,
                    "NAV" => &self.nav,
                    "FOOTER" => &self.footer,
                    "BODY" => &self.body,
                    _ => return None,
                };
                Some(value.as_str())
            })
        }
    }

    /// Shared page layout.
    pub const LAYOUT_HTML: Template<LayoutVars> = Template::new(include_str!("site/layout.html"));
}

pub mod serve {
    use super::{Template, TemplateVars, substitute};

    /// Variables for reload.js.
    pub struct ReloadVars {
        pub sse_path: String,
    }

    impl TemplateVars for ReloadVars {
        fn apply(&self, content: &str) -> String {
            substitute(content, |key| (key == "SSE_PATH").then_some(self.sse_path.as_str()))
        }
    }

    /// Live reload client: reloads the page on every `reload` event.
    pub const RELOAD_JS: Template<ReloadVars> = Template::new(include_str!("serve/reload.js"));

    /// Variables for error.html.
    pub struct ErrorVars {
        /// Script URL of the live reload client.
        pub script_src: String,
        /// Escaped error chain.
        pub error: String,
    }

    impl TemplateVars for ErrorVars {
        fn apply(&self, content: &str) -> String {
            substitute(content, |key| match key {
                "SCRIPT_SRC" => Some(self.script_src.as_str()),
                "ERROR" => Some(self.error.as_str()),
                _ => None,
            })
        }
    }

    /// Page shown while the last rebuild is failing.
    pub const ERROR_HTML: Template<ErrorVars> = Template::new(include_str!("serve/error.html"));
}
