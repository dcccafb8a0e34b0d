// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 微博搜索结果页解析

use crate::domain::models::weibo::{ScrapedWeibo, Weibo};
use crate::domain::services::date_normalizer::standardize_date;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css}: {e:?}"))
}

static NO_RESULT: Lazy<Selector> = Lazy::new(|| selector("div.card-no-result"));
static PAGER_ITEM: Lazy<Selector> = Lazy::new(|| selector("ul.s-scroll > li"));
static NEXT_PAGE: Lazy<Selector> = Lazy::new(|| selector("a.next"));

static CARD_WRAP: Lazy<Selector> = Lazy::new(|| selector("div.card-wrap"));
static INFO: Lazy<Selector> =
    Lazy::new(|| selector("div.card > div.card-feed > div.content > div.info"));
static AVATOR: Lazy<Selector> = Lazy::new(|| selector("div.card > div.card-feed > div.avator"));
static SVG: Lazy<Selector> = Lazy::new(|| selector("svg"));
static FROM_LINK: Lazy<Selector> = Lazy::new(|| selector("div.from > a"));
static TXT: Lazy<Selector> = Lazy::new(|| selector("p.txt"));
static CONTENT_FULL: Lazy<Selector> =
    Lazy::new(|| selector(r#"p[node-type="feed_list_content_full"]"#));
static CARD_COMMENT: Lazy<Selector> = Lazy::new(|| selector("div.card-comment"));
static FORWARD: Lazy<Selector> =
    Lazy::new(|| selector(r#"div.card-act a[action-type="feed_list_forward"]"#));
static COMMENT: Lazy<Selector> =
    Lazy::new(|| selector(r#"div.card-act a[action-type="feed_list_comment"]"#));
static LIKE: Lazy<Selector> =
    Lazy::new(|| selector(r#"div.card-act a[action-type="feed_list_like"]"#));
static LIKE_BUTTON_SPAN: Lazy<Selector> = Lazy::new(|| selector("button > span"));
static LIKE_COUNT: Lazy<Selector> = Lazy::new(|| selector("span.woo-like-count"));
static PIC_LIST: Lazy<Selector> = Lazy::new(|| selector("div.media.media-piclist"));
static PIC_LIST_UL: Lazy<Selector> = Lazy::new(|| selector("ul"));
static PIC_IMG: Lazy<Selector> = Lazy::new(|| selector("li > img"));
static VIDEO_PLAYER: Lazy<Selector> = Lazy::new(|| selector("div.thumbnail video-player"));

static RETWEET_AUTHOR: Lazy<Selector> =
    Lazy::new(|| selector(r#"div[node-type="feed_list_forwardContent"] > a"#));
static RETWEET_LIKE: Lazy<Selector> =
    Lazy::new(|| selector(r#"a[action-type="feed_list_like"]"#));
static RETWEET_FROM_LINK: Lazy<Selector> = Lazy::new(|| selector("p.from > a"));
static RETWEET_ACT_ITEM: Lazy<Selector> = Lazy::new(|| selector("ul.act.s-fr > li"));

static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static WBICON: Lazy<Selector> = Lazy::new(|| selector("i.wbicon"));

static COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+.*").expect("valid count regex"));
static VIDEO_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"src:'(.*?)'").expect("valid video regex"));
static PIC_SIZE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/.*?/").expect("valid picture regex"));

const ARTICLE_PREFIX: &str = "发布了头条文章";
const FOLD_MARKER: &str = "收起全文";
const AT_USER_PREFIX: &str = "//weibo.com/n/";

/// 搜索结果页的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// 没有搜索结果
    Empty,
    /// 结果已完整展示，可直接解析并翻页
    Complete,
    /// 结果页数达到阈值，需要细分搜索条件
    Truncated,
}

/// 根据无结果提示和分页数量判断页面状态
pub fn page_state(document: &Html, further_threshold: usize) -> PageState {
    if document.select(&NO_RESULT).next().is_some() {
        return PageState::Empty;
    }
    let page_count = document.select(&PAGER_ITEM).count();
    if page_count < further_threshold {
        PageState::Complete
    } else {
        PageState::Truncated
    }
}

/// 下一页链接
pub fn next_page_href(document: &Html) -> Option<String> {
    document
        .select(&NEXT_PAGE)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// 解析页面中的全部微博
///
/// 转发微博在前，转发它的微博在后，二者都带有 keyword
pub fn parse_weibos(document: &Html, keyword: &str, now: NaiveDateTime) -> Vec<ScrapedWeibo> {
    let mut items = Vec::new();
    for card in document.select(&CARD_WRAP) {
        let Some(info) = card.select(&INFO).next() else {
            continue;
        };
        let Some(mut weibo) = parse_card(card, info, now) else {
            tracing::debug!(keyword, "跳过结构不完整的微博卡片");
            continue;
        };

        if let Some(retweet) = parse_retweet(card, now) {
            weibo.retweet_id = retweet.id.clone();
            items.push(ScrapedWeibo::new(keyword, retweet));
        }
        items.push(ScrapedWeibo::new(keyword, weibo));
    }
    items
}

fn parse_card(card: ElementRef<'_>, info: ElementRef<'_>, now: NaiveDateTime) -> Option<Weibo> {
    let id = card.value().attr("mid")?.to_string();
    let from_links: Vec<_> = card.select(&FROM_LINK).collect();
    let bid = from_links
        .first()
        .and_then(|a| a.value().attr("href"))
        .map(last_path_segment)
        .unwrap_or_default();

    let author = child_elements(info, "div")
        .nth(1)
        .and_then(|div| child_elements(div, "a").next());
    let user_id = author
        .and_then(|a| a.value().attr("href"))
        .map(last_path_segment)
        .unwrap_or_default();
    let screen_name = author
        .and_then(|a| a.value().attr("nick-name"))
        .unwrap_or_default()
        .to_string();

    let retweet_sel = card.select(&CARD_COMMENT).next();
    let mut txt_sel = card.select(&TXT).next()?;
    let content_full: Vec<_> = card.select(&CONTENT_FULL).collect();
    if !content_full.is_empty() {
        match retweet_sel {
            None => txt_sel = content_full[0],
            Some(_) if content_full.len() == 2 => txt_sel = content_full[0],
            Some(retweet) if retweet.select(&CONTENT_FULL).next().is_some() => {}
            Some(_) => txt_sel = content_full[0],
        }
    }

    let mut weibo = parse_text_block(txt_sel);
    weibo.id = id;
    weibo.bid = bid;
    weibo.user_id = user_id;
    weibo.screen_name = screen_name;

    weibo.reposts_count = extract_count(card.select(&FORWARD).next().map(own_text));
    weibo.comments_count = extract_count(card.select(&COMMENT).next().map(own_text));
    weibo.attitudes_count = extract_count(card.select(&LIKE).next().and_then(like_text));

    weibo.created_at = from_links
        .first()
        .map(|a| created_at(*a, now))
        .unwrap_or_default();
    weibo.source = from_links.get(1).map(|a| full_text(*a).trim().to_string()).unwrap_or_default();

    let pics = parse_pics(card);
    let video_url = parse_video(card);
    if retweet_sel.is_none() {
        weibo.pics = pics;
        weibo.video_url = video_url;
    }

    if let Some(avator) = card.select(&AVATOR).next() {
        let badge = avator
            .select(&SVG)
            .next()
            .and_then(|svg| svg.value().attr("id"))
            .unwrap_or_default();
        weibo.user_authentication = authentication_label(badge).to_string();
    }

    Some(weibo)
}

fn parse_retweet(card: ElementRef<'_>, now: NaiveDateTime) -> Option<Weibo> {
    let retweet_sel = card.select(&CARD_COMMENT).next()?;
    let author = retweet_sel.select(&RETWEET_AUTHOR).next()?;

    let content_full: Vec<_> = card.select(&CONTENT_FULL).collect();
    let txt_sel = if content_full.len() == 2 {
        Some(content_full[1])
    } else {
        retweet_sel
            .select(&CONTENT_FULL)
            .next()
            .or_else(|| retweet_sel.select(&TXT).next())
    };

    let mut retweet = txt_sel.map(parse_text_block).unwrap_or_default();
    retweet.id = retweet_sel
        .select(&RETWEET_LIKE)
        .next()
        .and_then(|a| a.value().attr("action-data"))
        .map(|data| data.strip_prefix("mid=").unwrap_or(data).to_string())
        .unwrap_or_default();

    let from_links: Vec<_> = retweet_sel.select(&RETWEET_FROM_LINK).collect();
    retweet.bid = from_links
        .first()
        .and_then(|a| a.value().attr("href"))
        .map(last_path_segment)
        .unwrap_or_default();
    retweet.user_id = author
        .value()
        .attr("href")
        .map(last_path_segment)
        .unwrap_or_default();
    retweet.screen_name = author.value().attr("nick-name").unwrap_or_default().to_string();

    let acts: Vec<_> = retweet_sel.select(&RETWEET_ACT_ITEM).collect();
    let act_count = |index: usize| {
        extract_count(
            acts.get(index)
                .and_then(|li| li.select(&LINK).next())
                .map(own_text),
        )
    };
    retweet.reposts_count = act_count(0);
    retweet.comments_count = act_count(1);
    retweet.attitudes_count =
        extract_count(retweet_sel.select(&LIKE_COUNT).next().map(own_text));

    retweet.created_at = from_links
        .first()
        .map(|a| created_at(*a, now))
        .unwrap_or_default();
    retweet.source = from_links
        .get(1)
        .map(|a| full_text(*a).trim().to_string())
        .unwrap_or_default();

    // media shown under a retweet belongs to the retweeted weibo
    retweet.pics = parse_pics(card);
    retweet.video_url = parse_video(card);

    Some(retweet)
}

/// 正文相关字段：text、article_url、location、at_users、topics
fn parse_text_block(txt_sel: ElementRef<'_>) -> Weibo {
    let location = location(txt_sel);
    let mut text = visible_text(txt_sel).replace(['\u{200b}', '\u{e627}'], "");
    if !location.is_empty() {
        text = text.replace(&format!("2{}", location), "");
    }
    let text: String = text.trim().chars().filter(|c| *c != ' ').collect();
    let text = text
        .trim_end()
        .strip_suffix(FOLD_MARKER)
        .map(str::to_string)
        .unwrap_or(text);

    Weibo {
        text,
        article_url: article_url(txt_sel),
        location,
        at_users: at_users(txt_sel),
        topics: topics(txt_sel),
        ..Weibo::default()
    }
}

fn article_url(txt_sel: ElementRef<'_>) -> String {
    let text: String = full_text(txt_sel)
        .chars()
        .filter(|c| !matches!(c, '\u{200b}' | '\u{e627}' | '\n' | ' '))
        .collect();
    if !text.starts_with(ARTICLE_PREFIX) {
        return String::new();
    }

    for a in txt_sel.select(&LINK) {
        if icon_text(a).as_deref() == Some("O") {
            return a
                .value()
                .attr("href")
                .filter(|href| href.starts_with("http://t.cn"))
                .unwrap_or_default()
                .to_string();
        }
    }
    String::new()
}

fn location(txt_sel: ElementRef<'_>) -> String {
    txt_sel
        .select(&LINK)
        .find(|a| icon_text(*a).as_deref() == Some("2"))
        .map(|a| full_text(a).trim().chars().skip(1).collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn at_users(txt_sel: ElementRef<'_>) -> String {
    let mut users: Vec<String> = Vec::new();
    for a in txt_sel.select(&LINK) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let href = urlencoding::decode(href)
            .map(|h| h.into_owned())
            .unwrap_or_else(|_| href.to_string());
        let text = full_text(a);
        let text = text.trim();
        if let (Some(name), Some(shown)) =
            (href.strip_prefix(AT_USER_PREFIX), text.strip_prefix('@'))
        {
            if !name.is_empty() && name == shown && !users.iter().any(|u| u == name) {
                users.push(name.to_string());
            }
        }
    }
    users.join(",")
}

fn topics(txt_sel: ElementRef<'_>) -> String {
    let mut topics: Vec<String> = Vec::new();
    for a in txt_sel.select(&LINK) {
        let text = full_text(a);
        let text = text.trim();
        if text.chars().count() > 2 && text.starts_with('#') && text.ends_with('#') {
            let topic = text[1..text.len() - 1].to_string();
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
    }
    topics.join(",")
}

fn parse_pics(card: ElementRef<'_>) -> Vec<String> {
    let Some(list) = card.select(&PIC_LIST).next() else {
        return Vec::new();
    };
    let Some(ul) = list.select(&PIC_LIST_UL).next() else {
        return Vec::new();
    };
    ul.select(&PIC_IMG)
        .filter_map(|img| img.value().attr("src"))
        .map(large_picture_url)
        .collect()
}

/// 将缩略图地址转换为大图地址
pub fn large_picture_url(src: &str) -> String {
    let without_scheme = src
        .strip_prefix("https://")
        .or_else(|| src.strip_prefix("http://"))
        .or_else(|| src.strip_prefix("//"))
        .unwrap_or(src);
    let large = PIC_SIZE_SEGMENT.replace(without_scheme, "/large/");
    format!("https://{}", large)
}

fn parse_video(card: ElementRef<'_>) -> String {
    card.select(&VIDEO_PLAYER)
        .next()
        .and_then(|player| {
            let html = player.html();
            VIDEO_SRC
                .captures(&html)
                .and_then(|c| c.get(1))
                .map(|m| format!("http:{}", m.as_str().replace("&amp;", "&")))
        })
        .unwrap_or_default()
}

fn created_at(link: ElementRef<'_>, now: NaiveDateTime) -> String {
    standardize_date(&full_text(link), now)
}

fn authentication_label(badge_id: &str) -> &'static str {
    match badge_id {
        "woo_svg_vblue" => "蓝V",
        "woo_svg_vyellow" => "黄V",
        "woo_svg_vorange" => "红V",
        "woo_svg_vgold" => "金V",
        _ => "普通用户",
    }
}

fn extract_count(text: Option<String>) -> String {
    text.as_deref()
        .and_then(|t| COUNT.find(t))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| "0".to_string())
}

fn like_text(like: ElementRef<'_>) -> Option<String> {
    like.select(&LIKE_COUNT)
        .next()
        .or_else(|| like.select(&LIKE_BUTTON_SPAN).nth(1))
        .map(own_text)
}

fn icon_text(a: ElementRef<'_>) -> Option<String> {
    a.select(&WBICON).next().map(|i| full_text(i).trim().to_string())
}

fn last_path_segment(href: &str) -> String {
    let path = href.split('?').next().unwrap_or_default();
    path.rsplit('/').next().unwrap_or_default().to_string()
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}

fn full_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// 元素自身的文本节点，不含子元素
fn own_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|node| node.value().as_text().map(|t| (**t).to_string()))
        .collect()
}

/// 元素的全部文本，跳过 "收起全文" 折叠链接
fn visible_text(el: ElementRef<'_>) -> String {
    el.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let folded = node.ancestors().any(|ancestor| {
                ElementRef::wrap(ancestor)
                    .is_some_and(|e| e.value().attr("action-type") == Some("fl_fold"))
            });
            (!folded).then(|| (**text).to_string())
        })
        .collect()
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
