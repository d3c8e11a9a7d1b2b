// src/checker/html.rs
// =============================================================================
// This module walks a parsed HTML document and fills in the structural
// part of the report.
//
// We use the `scraper` crate which:
// - Parses HTML into a tree (html5ever underneath, so it never gives up on
//   broken markup)
// - Lets us step through nodes with first-child / next-sibling links
//
// The walk is pre-order, children left to right, done exactly once per
// analysis. It uses an explicit stack instead of recursion so that
// pathologically deep documents cannot blow the thread's stack.
//
// External links found on the way are pushed onto the link queue for the
// reachability workers. The push never waits: if the queue is full the
// link is dropped with a warning, still counted as external, just never
// checked.
// =============================================================================

use scraper::node::{Doctype, Element};
use scraper::{ElementRef, Html, Node};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};
use url::Url;

use super::form::analyze_form;
use crate::models::{
    AnalysisResult, ImageInfo, MetaTag, ScriptInfo, StylesheetInfo, UNKNOWN_HTML_VERSION,
};
use crate::validator::same_host;

// Everything the walk hands back to the aggregator
#[derive(Debug)]
pub struct WalkOutput {
    /// Report with every structural field filled in
    pub result: AnalysisResult,
    /// <a> hrefs that could not be resolved against the page URL
    pub unresolvable_links: usize,
    /// External links handed to the reachability workers
    pub queued_links: usize,
    /// External links dropped because the queue was full or closed
    pub dropped_links: usize,
}

// Parses `html` and walks it, sending external links down `links`
//
// The sender is consumed: when this function returns the link queue is
// closed, which is what tells the workers no more work is coming.
pub fn analyze_document(
    html: &str,
    base: &Url,
    result: AnalysisResult,
    links: mpsc::Sender<String>,
) -> WalkOutput {
    let document = Html::parse_document(html);
    let mut walker = DocumentWalker::new(base, result, links);
    walker.walk(&document);
    walker.finish()
}

struct DocumentWalker<'a> {
    base: &'a Url,
    result: AnalysisResult,
    links: mpsc::Sender<String>,
    title_found: bool,
    unresolvable_links: usize,
    queued_links: usize,
    dropped_links: usize,
}

impl<'a> DocumentWalker<'a> {
    fn new(base: &'a Url, result: AnalysisResult, links: mpsc::Sender<String>) -> Self {
        Self {
            base,
            result,
            links,
            title_found: false,
            unresolvable_links: 0,
            queued_links: 0,
            dropped_links: 0,
        }
    }

    fn walk(&mut self, document: &Html) {
        let mut stack = vec![document.tree.root()];

        while let Some(node) = stack.pop() {
            match node.value() {
                Node::Document => {
                    if let Some(doctype) = node.first_child().and_then(|c| c.value().as_doctype()) {
                        self.result.html_version = html_version(doctype);
                    }
                }
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(node) {
                        self.visit_element(element);
                    }
                }
                Node::Text(text) => self.visit_text(text),
                _ => {}
            }

            // Reversed so the leftmost child is popped first
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev());
        }
    }

    fn finish(self) -> WalkOutput {
        WalkOutput {
            result: self.result,
            unresolvable_links: self.unresolvable_links,
            queued_links: self.queued_links,
            dropped_links: self.dropped_links,
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        let value = element.value();

        match value.name() {
            "title" => self.visit_title(element),
            level @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => self.result.add_heading(level),
            "a" => {
                self.visit_link(value);
                self.check_skip_link(element);
            }
            "form" => {
                let form = analyze_form(element);
                if form.has_login {
                    self.result.has_login_form = true;
                }
                self.result.forms.push(form);
            }
            "img" => self.visit_image(value),
            "meta" => self.visit_meta(value),
            "script" => self.visit_script(value),
            "link" => self.visit_stylesheet(value),
            "table" => self.result.tables += 1,
            "ul" | "ol" => self.result.lists += 1,
            "button" => self.result.buttons += 1,
            "input" => self.result.inputs += 1,
            "p" => self.result.text_content.paragraphs += 1,
            "main" => {
                self.result.accessibility.has_semantic_html = true;
                self.result.text_content.has_main_content = true;
            }
            "article" | "section" | "nav" | "header" | "footer" | "aside" => {
                self.result.accessibility.has_semantic_html = true;
            }
            _ => {}
        }

        let has_aria = value
            .attrs()
            .any(|(name, val)| name.starts_with("aria-") && !val.is_empty());
        if has_aria {
            self.result.accessibility.has_aria_labels = true;
        }
    }

    // First <title> with a text child wins, later ones are ignored
    fn visit_title(&mut self, element: ElementRef<'_>) {
        if self.title_found {
            return;
        }
        if let Some(text) = element.first_child().and_then(|c| c.value().as_text()) {
            self.result.page_title = text.trim().to_string();
            self.title_found = true;
        }
    }

    fn visit_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.result.text_content.char_count += text.chars().count();
        self.result.text_content.word_count += text.split_whitespace().count();
    }

    // Classifies one <a href> as internal or external
    //
    // Skipped entirely: missing/empty href, javascript: and mailto:.
    // An href the url crate cannot resolve is tallied as unresolvable and
    // ends up in inaccessible_links.
    fn visit_link(&mut self, anchor: &Element) {
        let href = match anchor.attr("href") {
            Some(href) if !href.is_empty() => href,
            _ => return,
        };
        if href.starts_with("javascript:") || href.starts_with("mailto:") {
            return;
        }

        let absolute = match self.base.join(href) {
            Ok(url) => url,
            Err(e) => {
                debug!(href, error = %e, "unresolvable link");
                self.unresolvable_links += 1;
                return;
            }
        };

        if same_host(&absolute, self.base) {
            self.result.internal_links += 1;
        } else {
            self.result.external_links += 1;
            self.enqueue(absolute.into());
        }
    }

    fn enqueue(&mut self, url: String) {
        match self.links.try_send(url) {
            Ok(()) => self.queued_links += 1,
            Err(TrySendError::Full(url)) => {
                warn!(url = %url, "link checking queue full, skipping link");
                self.dropped_links += 1;
            }
            Err(TrySendError::Closed(url)) => {
                debug!(url = %url, "link checkers stopped, skipping link");
                self.dropped_links += 1;
            }
        }
    }

    // An in-page anchor whose text says "skip ..." or "jump ..."
    fn check_skip_link(&mut self, anchor: ElementRef<'_>) {
        let in_page = anchor
            .value()
            .attr("href")
            .is_some_and(|href| href.starts_with('#'));
        if !in_page {
            return;
        }
        let text = anchor.text().collect::<String>().trim().to_lowercase();
        if text.contains("skip") || text.contains("jump") {
            self.result.accessibility.has_skip_links = true;
        }
    }

    fn visit_image(&mut self, img: &Element) {
        let attr = |name: &str| img.attr(name).unwrap_or_default().to_string();
        let image = ImageInfo {
            src: attr("src"),
            alt: attr("alt"),
            width: attr("width"),
            height: attr("height"),
            is_external: false,
        };

        if !image.alt.is_empty() {
            self.result.accessibility.has_alt_text = true;
        }
        if image.src.is_empty() {
            return;
        }

        let is_external = self.is_external(&image.src);
        self.result.images.push(ImageInfo { is_external, ..image });
    }

    fn visit_meta(&mut self, meta: &Element) {
        let attr = |name: &str| meta.attr(name).unwrap_or_default().to_string();
        let tag = MetaTag {
            name: attr("name"),
            content: attr("content"),
            property: attr("property"),
        };
        if !tag.name.is_empty() || !tag.property.is_empty() {
            self.result.meta_tags.push(tag);
        }
    }

    // Only scripts loaded from a src are recorded
    fn visit_script(&mut self, script: &Element) {
        let src = script.attr("src").unwrap_or_default();
        if src.is_empty() {
            return;
        }
        self.result.scripts.push(ScriptInfo {
            src: src.to_string(),
            script_type: script.attr("type").unwrap_or_default().to_string(),
            is_external: self.is_external(src),
        });
    }

    fn visit_stylesheet(&mut self, link: &Element) {
        let rel = link.attr("rel").unwrap_or_default();
        let href = link.attr("href").unwrap_or_default();
        if !rel.eq_ignore_ascii_case("stylesheet") || href.is_empty() {
            return;
        }
        self.result.stylesheets.push(StylesheetInfo {
            href: href.to_string(),
            media: link.attr("media").unwrap_or_default().to_string(),
            is_external: self.is_external(href),
        });
    }

    // Resources that cannot be resolved are reported as not external
    fn is_external(&self, reference: &str) -> bool {
        match self.base.join(reference) {
            Ok(url) => !same_host(&url, self.base),
            Err(_) => false,
        }
    }
}

// Maps a doctype to a version label
//
// Examples:
//   <!DOCTYPE html>                                        -> "HTML5"
//   <!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" ...> -> "HTML 4.01"
//   <!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" ...> -> "XHTML 1.0"
fn html_version(doctype: &Doctype) -> String {
    let public_id = doctype.public_id();
    if public_id.is_empty() && doctype.system_id().is_empty() {
        return "HTML5".to_string();
    }

    // "-//W3C//DTD HTML 4.01 Transitional//EN" -> ("HTML", "4.01")
    let dtd = public_id
        .split("//")
        .find_map(|part| part.strip_prefix("DTD "))
        .unwrap_or_default();
    let mut words = dtd.split_whitespace();
    match (words.next(), words.next()) {
        (Some(kind @ ("HTML" | "XHTML")), Some(version))
            if version.chars().next().is_some_and(|c| c.is_ascii_digit()) =>
        {
            format!("{} {}", kind, version)
        }
        _ => UNKNOWN_HTML_VERSION.to_string(),
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why an explicit stack?
//    - Recursion would mirror the tree naturally, but each nesting level
//      costs a stack frame
//    - A Vec of node handles grows on the heap instead
//    - Children are pushed right-to-left so pops come out left-to-right,
//      which keeps images/forms/scripts in document order
//
// 2. Why try_send instead of send?
//    - send().await would make the walk wait for link checkers
//    - The walk should never slow down because the network is slow
//    - try_send returns the URL back to us when the queue is full
//
// 3. What does base.join() do?
//    - Resolves a relative href the way a browser would
//    - "/docs" on https://example.com/page -> https://example.com/docs
//    - Absolute hrefs come back unchanged (but normalized)
// -----------------------------------------------------------------------------
