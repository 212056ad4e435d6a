//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary; there is no theme directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::html_escape;
use crate::helpers::display_date;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's escaping turns `/` into `&#x2F;`. Templates escape text with
        // `escape` and URLs with `escape_attr` instead.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("category.html", include_str!("site/category.html")),
            ("post.html", include_str!("site/post.html")),
            ("about.html", include_str!("site/about.html")),
            ("404.html", include_str!("site/404.html")),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
            (
                "partials/category_nav.html",
                include_str!("site/partials/category_nav.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("escape_attr", escape_attr_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format a post date string with a chrono pattern
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%Y-%m-%d".to_string(),
    };
    Ok(tera::Value::String(display_date(&s, &format)))
}

/// Tera filter: escape a URL for a quoted attribute, leaving `/` intact
fn escape_attr_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("escape_attr", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Display label of a category slug: `it-solutions` -> `it solutions`
pub fn category_label(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
    pub date_format: String,
    pub year: String,
    pub categories: Vec<CategoryLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryLink {
    pub slug: String,
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub path: String,
    pub categories: Vec<CategoryLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutData {
    pub heading: String,
    pub content: String,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteData {
        SiteData {
            title: "Notes".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "Kevin".to_string(),
            language: "en".to_string(),
            root: "/".to_string(),
            date_format: "%B %-d, %Y".to_string(),
            year: "2024".to_string(),
            categories: vec![CategoryLink {
                slug: "it-solutions".to_string(),
                label: "it solutions".to_string(),
                path: "/categories/it-solutions/".to_string(),
            }],
        }
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("it-solutions"), "it solutions");
    }

    #[test]
    fn test_render_index() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert(
            "posts",
            &vec![PostData {
                slug: "hello".to_string(),
                title: "Hello <World>".to_string(),
                date: "2024-01-05".to_string(),
                excerpt: "An intro".to_string(),
                image: None,
                path: "/posts/hello/".to_string(),
                categories: site().categories,
            }],
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(r#"href="/posts/hello/""#));
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("January 5, 2024"));
        assert!(html.contains("/categories/it-solutions/"));
    }

    #[test]
    fn test_cms_values_are_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut site = site();
        site.description = "<script>x</script>".to_string();
        site.categories = vec![CategoryLink {
            slug: "b".to_string(),
            label: "<b>bold</b>".to_string(),
            path: "/categories/b/".to_string(),
        }];
        let mut context = Context::new();
        context.insert("site", &site);
        context.insert(
            "post",
            &PostData {
                slug: "x".to_string(),
                title: "X".to_string(),
                date: String::new(),
                excerpt: String::new(),
                image: Some(r#"https://cdn.example.com/a.png" onerror="alert(1)"#.to_string()),
                path: "/posts/x/".to_string(),
                categories: site.categories.clone(),
            },
        );
        context.insert("content", "");

        let html = renderer.render("post.html", &context).unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("&lt;b&gt;bold&lt;&#x2F;b&gt;"));
        assert!(html.contains(r#"src="https://cdn.example.com/a.png&quot; onerror=&quot;alert(1)""#));
    }

    #[test]
    fn test_render_post_keeps_body_html() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert(
            "post",
            &PostData {
                slug: "hello".to_string(),
                title: "Hello".to_string(),
                date: "not a date".to_string(),
                excerpt: String::new(),
                image: Some("https://images.example.com/x.jpg".to_string()),
                path: "/posts/hello/".to_string(),
                categories: Vec::new(),
            },
        );
        context.insert("content", "<h2>Body</h2>");

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<h2>Body</h2>"));
        assert!(html.contains("not a date"));
        assert!(html.contains(r#"class="cover" src="https://images.example.com/x.jpg""#));
    }
}
