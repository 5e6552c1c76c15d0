use log::{debug, warn};
use scraper::Html;
use url::Url;

use crate::dom::{find_containing, next_matching_after, sel, text_of};
use crate::extract::song_number;
use crate::fetch::PageFetcher;
use crate::models::{
    DEFAULT_WEEKEND_CLOSING_SONG, DEFAULT_WEEKEND_MIDDLE_SONG, DEFAULT_WEEKEND_OPENING_SONG,
    WeekendMeeting,
};

const SITE_ROOT: &str = "https://wol.jw.org";

/// Title and link of the Watchtower study article as advertised on the
/// week page. The link may point at a table-of-contents page rather
/// than the article itself.
#[derive(Debug)]
struct StudyArticleRef {
    title: String,
    href: Option<String>,
}

/// Extracts the weekend agenda from a parsed week page.
///
/// The song numbers live on the study article page, not the week page,
/// so this parser may issue up to two further fetches: one to resolve a
/// table-of-contents link, one for the article itself. Any failure
/// along the chain leaves the songs at their documented defaults.
pub async fn parse_weekend(doc: &Html, fetcher: &PageFetcher) -> WeekendMeeting {
    debug!("Parsing weekend meeting structure");
    let mut data = WeekendMeeting::unresolved();

    if let Some(title) = public_talk_title(doc) {
        data.public_talk_title = title;
    }

    if let Some(article) = study_article_ref(doc) {
        data.watchtower_study_title = article.title;

        if let Some(href) = article.href {
            let article_url = resolve_article_link(fetcher, &href).await;
            debug!("Using study article URL: {article_url}");

            let article_html = fetcher.fetch(&article_url).await;
            if article_html.is_empty() {
                warn!("Study article page could not be fetched");
            } else {
                let songs = {
                    let article_doc = Html::parse_document(&article_html);
                    article_songs(&article_doc)
                };
                assign_songs(&mut data, &songs);
            }
        }
    } else {
        warn!("No study article reference found on week page");
    }

    apply_song_defaults(&mut data);
    data
}

/// Paragraph under the "Öffentlicher Vortrag" heading.
fn public_talk_title(doc: &Html) -> Option<String> {
    let heading = find_containing(doc, &sel("h3"), "Öffentlicher Vortrag")?;
    let container = next_matching_after(doc, heading, &sel("div"))?;
    let paragraph = container.select(&sel("p")).next()?;

    let title = text_of(paragraph);
    debug!("Public talk title: {title:?}");
    Some(title)
}

/// Two strategies, first hit wins: the "Studienartikel" block on the
/// week page, then the table-of-contents card.
fn study_article_ref(doc: &Html) -> Option<StudyArticleRef> {
    study_article_from_heading(doc).or_else(|| study_article_from_toc(doc))
}

fn study_article_from_heading(doc: &Html) -> Option<StudyArticleRef> {
    let heading = find_containing(doc, &sel("h3"), "Studienartikel")?;
    let container = next_matching_after(doc, heading, &sel("div"))?;
    let link = container.select(&sel("a.it")).next()?;

    let reference = StudyArticleRef {
        title: text_of(link),
        href: link.value().attr("href").map(str::to_string),
    };
    debug!("Study article from heading: {reference:?}");
    Some(reference)
}

fn study_article_from_toc(doc: &Html) -> Option<StudyArticleRef> {
    let toc = doc.select(&sel("div.itemData div.groupTOC")).next()?;
    let link = toc.select(&sel("a.it")).next()?;

    let reference = StudyArticleRef {
        title: text_of(link),
        href: link.value().attr("href").map(str::to_string),
    };
    debug!("Study article from TOC card: {reference:?}");
    Some(reference)
}

/// Follows a table-of-contents link one hop to the real article, when
/// the href is of that kind. Returns an absolute URL either way; when
/// the hop fails the original link is kept and the later article fetch
/// simply yields no songs.
async fn resolve_article_link(fetcher: &PageFetcher, href: &str) -> String {
    let mut link = href.to_string();

    if link.contains("/tc/") {
        let toc_url = absolutize(&link);
        debug!("Following table-of-contents link: {toc_url}");

        let toc_html = fetcher.fetch(&toc_url).await;
        if toc_html.is_empty() {
            warn!("Table-of-contents page could not be fetched");
        } else {
            let resolved = {
                let toc_doc = Html::parse_document(&toc_html);
                article_link_from_toc(&toc_doc)
            };
            match resolved {
                Some(found) => {
                    debug!("Resolved article link: {found}");
                    link = found;
                }
                None => warn!("No article link found on table-of-contents page"),
            }
        }
    }

    absolutize(&link)
}

/// Article link on a table-of-contents page: the dedicated article
/// anchor first, then any link that looks like a localized document
/// path.
fn article_link_from_toc(doc: &Html) -> Option<String> {
    let primary = doc
        .select(&sel("a.jwac"))
        .next()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| href.contains("/d/"))
        .map(str::to_string);

    primary.or_else(|| {
        doc.select(&sel("a")).find_map(|a| {
            let href = a.value().attr("href")?;
            (href.contains("/d/") && href.contains("lp-x")).then(|| href.to_string())
        })
    })
}

/// Song links on the article page in document order, from either the
/// references paragraph or the muted-text block.
fn article_songs(doc: &Html) -> Vec<u32> {
    let numbers: Vec<u32> = doc
        .select(&sel("p.pubRefs a, div.du-color--textSubdued a"))
        .filter(|a| text_of(*a).contains("LIED"))
        .map(|a| {
            let text = text_of(a);
            let number = song_number(&text);
            debug!("Song link: {text:?} -> {number}");
            number
        })
        .collect();

    debug!("Found {} song links on article page", numbers.len());
    numbers
}

/// Positional mapping: the first link opens the meeting and the last
/// one closes it. Only with three or more links is the second one the
/// middle song, and then only when it does not repeat the opener; with
/// exactly two links the second is the closing song and the middle
/// stays unresolved.
fn assign_songs(data: &mut WeekendMeeting, songs: &[u32]) {
    if let Some(&first) = songs.first() {
        data.opening_song = first;
    }
    match songs.len() {
        0 | 1 => {}
        2 => data.closing_song = songs[1],
        _ => {
            if songs[1] != data.opening_song {
                data.middle_song = songs[1];
            }
            data.closing_song = *songs.last().unwrap();
        }
    }
}

fn apply_song_defaults(data: &mut WeekendMeeting) {
    if data.opening_song == 0 {
        warn!("Weekend opening song unresolved, defaulting to {DEFAULT_WEEKEND_OPENING_SONG}");
        data.opening_song = DEFAULT_WEEKEND_OPENING_SONG;
    }
    if data.middle_song == 0 {
        warn!("Weekend middle song unresolved, defaulting to {DEFAULT_WEEKEND_MIDDLE_SONG}");
        data.middle_song = DEFAULT_WEEKEND_MIDDLE_SONG;
    }
    if data.closing_song == 0 {
        warn!("Weekend closing song unresolved, defaulting to {DEFAULT_WEEKEND_CLOSING_SONG}");
        data.closing_song = DEFAULT_WEEKEND_CLOSING_SONG;
    }
}

/// Site-relative hrefs are joined onto the site root; absolute ones
/// pass through.
fn absolutize(href: &str) -> String {
    Url::parse(SITE_ROOT)
        .ok()
        .and_then(|base| base.join(href).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| href.to_string())
}
