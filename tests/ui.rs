use glam::Vec2;
use where_is_everybody::catalog::BookRecord;
use where_is_everybody::scene::Rect;
use where_is_everybody::ui::*;

// ── word_wrap ────────────────────────────────────────────────────────────────

#[test]
fn wrap_empty_string_returns_no_lines() {
    assert!(word_wrap("", 10).is_empty());
}

#[test]
fn wrap_blank_whitespace_returns_no_lines() {
    assert!(word_wrap("   ", 10).is_empty());
}

#[test]
fn wrap_two_words_break_at_boundary() {
    assert_eq!(word_wrap("hello world", 8), vec!["hello", "world"]);
}

#[test]
fn wrap_exactly_at_limit_keeps_on_one_line() {
    assert_eq!(word_wrap("ab cd", 5), vec!["ab cd"]);
    assert_eq!(word_wrap("ab cd", 4), vec!["ab", "cd"]);
}

#[test]
fn wrap_long_paragraph_preserves_all_words() {
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
    let lines = word_wrap(text, 12);
    assert!(lines.iter().all(|l| l.len() <= 12));
    assert_eq!(lines.join(" "), text);
}

#[test]
fn wrap_single_word_longer_than_max_gets_split() {
    assert_eq!(word_wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
}

#[test]
fn wrap_zero_max_cols_returns_empty() {
    assert!(word_wrap("anything", 0).is_empty());
}

#[test]
fn wrap_collapses_whitespace_runs_and_newlines() {
    assert_eq!(word_wrap("a   b \n\n c", 10), vec!["a b c"]);
}

#[test]
fn wrap_counts_characters_not_bytes() {
    assert_eq!(word_wrap("ééé ééé", 3), vec!["ééé", "ééé"]);
    assert_eq!(word_wrap("ääääää", 4), vec!["ääää", "ää"]);
}

// ── truncation ───────────────────────────────────────────────────────────────

#[test]
fn truncate_keeps_short_text_untouched() {
    let lines = vec!["one".to_string(), "two".to_string()];
    assert_eq!(truncate_lines(lines.clone(), 2, 10), lines);
}

#[test]
fn truncate_marks_the_cut_on_the_last_kept_line() {
    let lines: Vec<String> = ["aaaa", "bbbb", "cccc"].map(String::from).to_vec();
    assert_eq!(truncate_lines(lines, 2, 4), vec!["aaaa", "b..."]);
}

#[test]
fn truncate_to_zero_lines_is_empty() {
    assert!(truncate_lines(vec!["x".into()], 0, 10).is_empty());
}

#[test]
fn clip_only_touches_long_lines() {
    assert_eq!(clip("short", 8), "short");
    assert_eq!(clip("hello world", 8), "hello...");
    assert_eq!(clip("ab cdefgh", 6), "ab...");
}

// ── plain_text ───────────────────────────────────────────────────────────────

#[test]
fn plain_text_folds_typography_to_ascii() {
    assert_eq!(plain_text("\u{201C}Héllo\u{201D} \u{2014} it\u{2019}s\u{2026} naïve"), "\"Hello\" - it's... naive");
}

#[test]
fn plain_text_flattens_whitespace_and_drops_the_rest() {
    assert_eq!(plain_text("a\tb\nc\u{00A0}d"), "a b c d");
    assert_eq!(plain_text("日本 ok"), " ok");
    assert_eq!(plain_text("Straße, Æsop"), "Strasse, AEsop");
}

// ── rect_contains ────────────────────────────────────────────────────────────

#[test]
fn rect_contains_is_half_open() {
    assert!(rect_contains(10.0, 10.0, 100.0, 100.0, 10.0, 10.0));
    assert!(rect_contains(10.0, 10.0, 100.0, 100.0, 109.9, 109.9));
    assert!(!rect_contains(10.0, 10.0, 100.0, 100.0, 110.0, 50.0));
    assert!(!rect_contains(10.0, 10.0, 100.0, 100.0, 50.0, 110.0));
}

#[test]
fn rect_contains_zero_size_rect_never_contains() {
    assert!(!rect_contains(10.0, 10.0, 0.0, 0.0, 10.0, 10.0));
}

// ── Popup layout ─────────────────────────────────────────────────────────────

#[test]
fn popup_panel_is_centred_at_three_quarters() {
    let layout = PopupLayout::new(Vec2::new(800.0, 600.0), false);
    assert_eq!(layout.panel, Rect::new(100.0, 75.0, 600.0, 450.0));
    assert_eq!(layout.cover, None);
    assert_eq!(layout.text, Rect::new(120.0, 95.0, 560.0, 376.0));
    assert_eq!(layout.footer, Vec2::new(400.0, 491.0));
}

#[test]
fn cover_pushes_the_text_column_right() {
    let layout = PopupLayout::new(Vec2::new(800.0, 600.0), true);
    assert_eq!(layout.cover, Some(Rect::new(120.0, 95.0, 128.0, 192.0)));
    assert_eq!(layout.text.x, 268.0);
    assert_eq!(layout.text.w, 412.0);
    assert_eq!(layout.columns(8.0), 51);
    assert_eq!(layout.columns(0.0), 0);
}

#[test]
fn fit_image_keeps_aspect_and_centres() {
    let bounds = Rect::new(0.0, 0.0, 128.0, 192.0);
    assert_eq!(fit_image(&bounds, 100, 100), Rect::new(0.0, 32.0, 128.0, 128.0));
    assert_eq!(fit_image(&bounds, 64, 192), Rect::new(32.0, 0.0, 64.0, 192.0));
    assert_eq!(fit_image(&bounds, 0, 10), Rect::new(0.0, 0.0, 0.0, 0.0));
}

// ── Book text ────────────────────────────────────────────────────────────────

fn record(title: &str, authors: &[&str], description: Option<&str>) -> BookRecord {
    BookRecord {
        title: title.into(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        description: description.map(str::to_owned),
        cover_url: None,
    }
}

#[test]
fn book_text_for_a_short_record() {
    let book = record("Moby-Dick", &["Herman Melville"], Some("Call me Ishmael."));
    let text = book_text(&book, 30, 40, 5);
    assert_eq!(text.title, vec!["Moby-Dick"]);
    assert_eq!(text.byline.as_deref(), Some("by Herman Melville"));
    assert_eq!(text.description, vec!["Call me Ishmael."]);
}

#[test]
fn book_text_limits_title_to_two_lines() {
    let book = record("one two three four five six seven", &[], None);
    let text = book_text(&book, 9, 40, 5);
    assert_eq!(text.title.len(), 2);
    assert!(text.title[1].ends_with("..."));
    assert!(text.title.iter().all(|l| l.chars().count() <= 9));
}

#[test]
fn book_text_without_authors_or_description() {
    let text = book_text(&record("Anonymous", &[], None), 30, 40, 5);
    assert_eq!(text.byline, None);
    assert_eq!(text.description, vec!["No description."]);
}

#[test]
fn book_text_truncates_a_long_description() {
    let long = "word ".repeat(200);
    let text = book_text(&record("T", &["A"], Some(&long)), 30, 20, 4);
    assert_eq!(text.description.len(), 4);
    assert!(text.description[3].ends_with("..."));
    assert!(text.description.iter().all(|l| l.chars().count() <= 20));
}

#[test]
fn book_text_clips_a_long_byline() {
    let book = record("T", &["Somebody With A Remarkably Long Name", "Another Author"], None);
    let text = book_text(&book, 30, 20, 4);
    let byline = text.byline.unwrap();
    assert!(byline.chars().count() <= 20);
    assert!(byline.starts_with("by Somebody"));
    assert!(byline.ends_with("..."));
}

#[test]
fn book_text_is_plain_ascii() {
    let book = record("Les Misérables", &["Victor Hugo"], Some("\u{201C}Even the darkest night\u{2026}\u{201D}"));
    let text = book_text(&book, 30, 40, 5);
    assert_eq!(text.title, vec!["Les Miserables"]);
    assert_eq!(text.description, vec!["\"Even the darkest night...\""]);
}
