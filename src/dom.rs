use scraper::{ElementRef, Html, Selector};

/// Selector strings in this crate are compile-time literals; a parse
/// failure is a programming error, not a runtime condition.
pub fn sel(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

/// Concatenated text of an element with runs of whitespace collapsed,
/// matching what the site renders for headings and links.
pub fn text_of(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First element matching `selector` whose text contains `needle`.
/// Stands in for the `:contains()` pseudo-class CSS itself lacks.
pub fn find_containing<'a>(
    doc: &'a Html,
    selector: &Selector,
    needle: &str,
) -> Option<ElementRef<'a>> {
    doc.select(selector).find(|el| text_of(*el).contains(needle))
}

/// First descendant of `scope` whose text contains `needle`.
pub fn child_containing<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    needle: &str,
) -> Option<ElementRef<'a>> {
    scope
        .select(selector)
        .find(|el| text_of(*el).contains(needle))
}

/// First element after `anchor` in document order that matches
/// `selector`. The page frequently puts related blocks next to each
/// other without a common parent, so sibling traversal alone is not
/// enough.
pub fn next_matching_after<'a>(
    doc: &'a Html,
    anchor: ElementRef<'_>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    let mut past_anchor = false;
    for node in doc.root_element().descendants() {
        if node.id() == anchor.id() {
            past_anchor = true;
            continue;
        }
        if !past_anchor {
            continue;
        }
        if let Some(el) = ElementRef::wrap(node) {
            if selector.matches(&el) {
                return Some(el);
            }
        }
    }
    None
}
