//! Static HTML assembly for the simple-index pages. Pure string building: no I/O, no
//! validation; writing the result is the caller's concern.

use crate::mirror::LinkEntry;

/// The shared stylesheet of every generated page.
const PAGE_STYLE: &str = "    body{margin:40px auto;max-width:650px;line-height:1.6;font-size:18px;color:#444;padding:0 10px}\n    h1,h2,h3{line-height:1.2}\n    a { display: block; margin-bottom: 5px; }\n";

/// Extra style for the usage block on the top-level page.
const TOP_PAGE_STYLE: &str =
    "    pre { background-color: #f0f0f0; padding: 10px; border-radius: 5px; }\n";

const PAGE_FOOT: &str = "\n</body>\n</html>\n";

fn page_head(title: &str, style: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         \x20   <meta charset=\"utf-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <style>\n\
         {style}\
         \x20   </style>\n\
         \x20   <title>{title}</title>\n\
         </head>\n\
         <body>\n"
    )
}

/// Renders one anchor line of a package page. Entries carrying a digest fragment get the
/// simple-index metadata attributes and the fragment marker after the href.
fn link_line(entry: &LinkEntry) -> String {
    let href = html_escape::encode_double_quoted_attribute(&entry.href);
    let text = html_escape::encode_text(&entry.display_name);
    match &entry.digest_fragment {
        Some(fragment) => format!(
            "    <a href=\"{href}\" data-requires-python=\"\" data-yanked=\"false\" #{fragment}>{text}</a><br/>\n"
        ),
        None => format!("    <a href=\"{href}\">{text}</a><br/>\n"),
    }
}

/// Renders the page of one package: a fixed shell plus one link line per entry, in the order
/// the entries are given (the grouper sorts them by file name).
pub fn render_package_page(name: &str, entries: &[LinkEntry]) -> String {
    let name = html_escape::encode_text(name);
    let mut page = page_head(&format!("Links for {name}"), PAGE_STYLE);
    page.push_str(&format!("<h1>Links for {name}</h1>\n"));
    for entry in entries {
        page.push_str(&link_line(entry));
    }
    page.push_str(PAGE_FOOT);
    page
}

/// Renders the top-level page: the pip usage block plus one link per distinct package name,
/// alphabetically sorted. Each link carries the trailing slash clients need for relative
/// resolution.
pub fn render_top_page(package_names: &[&str], owner: &str, site: &str) -> String {
    let mut names = package_names.to_vec();
    names.sort_unstable();
    names.dedup();

    let site = html_escape::encode_text(site);
    let owner = html_escape::encode_text(owner);

    let style = format!("{PAGE_STYLE}{TOP_PAGE_STYLE}");
    let mut page = page_head(&format!("{site} wheel index"), &style);
    page.push_str(&format!(
        "    <h1>{site} wheel index</h1>\n\
         \x20   <p>Pre-compiled Python wheels, published as release assets.</p>\n\
         \x20   <p>Use this index with pip:</p>\n\
         \x20   <pre>pip install --upgrade pip \n\
         pip install --extra-index-url https://{owner}.github.io/{site}/ SomePackage</pre>\n\
         \x20   <h2>Packages</h2>\n"
    ));
    for name in names {
        let name = html_escape::encode_text(name);
        page.push_str(&format!("    <a href=\"{name}/\">{name}</a><br/>\n"));
    }
    page.push_str(PAGE_FOOT);
    page
}
