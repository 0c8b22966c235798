//! Inline emphasis markup: `<b>` and `</b>`. Every other character,
//! including unknown tags, is literal text.

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

const OPEN_BOLD: &str = "<b>";
const CLOSE_BOLD: &str = "</b>";

/// Split markup into spans. Nested `<b>` tags are counted, so an
/// unclosed tag keeps the rest of the string bold and a stray
/// `</b>` is ignored.
pub fn parse(markup: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut rest = markup;

    while !rest.is_empty() {
        let tag = if rest.starts_with(OPEN_BOLD) {
            Some((OPEN_BOLD.len(), true))
        } else if rest.starts_with(CLOSE_BOLD) {
            Some((CLOSE_BOLD.len(), false))
        } else {
            None
        };

        match tag {
            Some((len, opens)) => {
                flush(&mut spans, &mut current, depth > 0);
                if opens {
                    depth += 1;
                } else {
                    depth = depth.saturating_sub(1);
                }
                rest = &rest[len..];
            }
            None => {
                let ch = match rest.chars().next() {
                    Some(ch) => ch,
                    None => break,
                };
                current.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    flush(&mut spans, &mut current, depth > 0);
    spans
}

fn flush(spans: &mut Vec<Span>, current: &mut String, bold: bool) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    match spans.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(&text),
        _ => spans.push(Span { text, bold }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, bold: bool) -> Span {
        Span {
            text: text.to_string(),
            bold,
        }
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(
            parse("Start dev server: `npm run dev`"),
            vec![span("Start dev server: `npm run dev`", false)]
        );
    }

    #[test]
    fn bold_in_the_middle() {
        assert_eq!(
            parse("Primary user/persona: <b>Not found in repo.</b> Inferred"),
            vec![
                span("Primary user/persona: ", false),
                span("Not found in repo.", true),
                span(" Inferred", false),
            ]
        );
    }

    #[test]
    fn unclosed_bold_runs_to_end() {
        assert_eq!(
            parse("a <b>b c"),
            vec![span("a ", false), span("b c", true)]
        );
    }

    #[test]
    fn stray_close_and_unknown_tags_are_harmless() {
        assert_eq!(
            parse("x</b> <i>y</i>"),
            vec![span("x <i>y</i>", false)]
        );
    }

    #[test]
    fn nested_bold_merges() {
        assert_eq!(
            parse("<b>a<b>b</b>c</b>d"),
            vec![span("abc", true), span("d", false)]
        );
    }

    #[test]
    fn empty_markup_has_no_spans() {
        assert!(parse("").is_empty());
        assert!(parse("<b></b>").is_empty());
    }
}
