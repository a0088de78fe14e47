//! HTML views for the read-only side of the blog.
//!
//! Plain string building over a fixed layout. Entry content is the author's
//! own HTML and is emitted as-is; everything else is escaped.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::blog::Entry;
use crate::config::SiteConfig;

fn layout(site: &SiteConfig, page_title: &str, body: &str) -> String {
    let base = site.base_url();
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"alternate\" type=\"application/atom+xml\" href=\"{base}/atom/\">\n\
         <link rel=\"service\" type=\"application/atomsvc+xml\" href=\"{base}/service\">\n\
         </head>\n<body>\n<header><h1><a href=\"{base}/\">{site_title}</a></h1></header>\n\
         <main>\n{body}</main>\n<footer>{author}</footer>\n</body>\n</html>\n",
        title = escape(page_title),
        base = escape(base),
        site_title = escape(site.title.as_str()),
        body = body,
        author = escape(site.author.as_str()),
    )
}

fn article(site: &SiteConfig, entry: &Entry) -> String {
    let base = escape(site.base_url()).into_owned();
    let mut html = String::new();
    let _ = write!(
        html,
        "<article>\n<h2><a href=\"{base}/{path}\">{title}</a></h2>\n\
         <time datetime=\"{datetime}\">{date}</time>\n<div class=\"content\">{content}</div>\n",
        path = escape(entry.path().as_str()),
        title = escape(entry.title.as_str()),
        datetime = entry.published.to_rfc3339(),
        date = entry.published.format("%Y-%m-%d %H:%M"),
        content = entry.content,
    );
    if !entry.tags.is_empty() {
        html.push_str("<ul class=\"tags\">");
        for tag in &entry.tags {
            let tag = escape(tag.as_str());
            let _ = write!(html, "<li><a href=\"{base}/tag/{tag}\">{tag}</a></li>");
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</article>\n");
    html
}

/// Front page and `/page/:page`: full entries plus pager.
pub fn home(site: &SiteConfig, title: &str, entries: &[Entry], page: usize, pages: usize) -> String {
    let base = escape(site.base_url()).into_owned();
    let mut body: String = entries.iter().map(|e| article(site, e)).collect();

    body.push_str("<nav class=\"pager\">");
    if page > 1 {
        let _ = write!(body, "<a rel=\"prev\" href=\"{base}/page/{}\">newer</a>", page - 1);
    }
    if page < pages {
        let _ = write!(body, "<a rel=\"next\" href=\"{base}/page/{}\">older</a>", page + 1);
    }
    body.push_str("</nav>\n");

    layout(site, title, &body)
}

/// Tag and date archives: title links only.
pub fn list(site: &SiteConfig, title: &str, entries: &[Entry]) -> String {
    let base = escape(site.base_url()).into_owned();
    let mut body = String::from("<ul class=\"entries\">\n");
    for entry in entries {
        let _ = writeln!(
            body,
            "<li><a href=\"{base}/{path}\">{title}</a> <time>{date}</time></li>",
            path = escape(entry.path().as_str()),
            title = escape(entry.title.as_str()),
            date = entry.published.format("%Y-%m-%d"),
        );
    }
    body.push_str("</ul>\n");
    layout(site, title, &body)
}

/// A single entry.
pub fn entry(site: &SiteConfig, title: &str, entry: &Entry) -> String {
    layout(site, title, &article(site, entry))
}

/// The 404 page.
pub fn not_found(site_title: &str, request_path: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Not Found | {}</title>\n</head>\n\
         <body>\n<p>sorry, nothing found for <code>{}</code>.</p>\n</body>\n</html>\n",
        escape(site_title),
        escape(request_path),
    )
}
