//! Content module - post models, front-matter and markdown processing

mod frontmatter;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use markdown::{html_escape, MarkdownRenderer, MORE_MARKER};
pub use post::{
    category_slug, extract_categories, normalize_image_url, slugify_category, sort_by_date_desc,
    ContentFormat, PostDetail, PostSummary,
};
