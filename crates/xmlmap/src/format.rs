//! Line-based XML re-indenter
//!
//! Works on the text alone: tags are put on their own lines and indented one
//! space per open element. Nothing is validated, so tags split across lines,
//! comments with markup inside and the like may come out misindented.

/// How a line moves the indentation depth
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Line {
    /// `<a>text</a>`: printed at the current depth
    Inline,
    /// `</a>`: closes a level before it is printed
    Close,
    /// `<a>`: opens a level after it is printed
    Open,
    /// Self-closed tags, declarations, comments, bare text
    Other,
}

/// Re-indent `xml` so each tag sits on its own line
///
/// Escaped angle brackets (`&lt;`, `&gt;`) are turned back into markup first.
/// Every output line ends with a line feed; blank lines are dropped. Running
/// the output through `beautify` again leaves it unchanged.
pub fn beautify(xml: &str) -> String {
    let xml = xml
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("><", ">\n<");

    let mut out = String::with_capacity(xml.len());
    let mut depth: isize = 0;

    for line in xml.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let kind = classify(line);
        if kind == Line::Close {
            depth -= 1;
        }
        for _ in 0..depth.max(0) {
            out.push(' ');
        }
        out.push_str(line);
        out.push('\n');
        if kind == Line::Open {
            depth += 1;
        }
    }

    out
}

fn classify(line: &str) -> Line {
    if ends_with_close_tag(line) {
        Line::Inline
    } else if line.strip_prefix("</").is_some_and(starts_with_word) {
        Line::Close
    } else if line.strip_prefix('<').is_some_and(starts_with_word) && opens_element(line) {
        Line::Open
    } else {
        Line::Other
    }
}

/// Whether the line ends in `</name...>` with something in front of it
fn ends_with_close_tag(line: &str) -> bool {
    let Some(body) = line.strip_suffix('>') else {
        return false;
    };
    // the closing tag cannot contain another '>'
    let start = body.rfind('>').map_or(0, |pos| pos + 1);
    let Some(tail) = body.get(start..) else {
        return false;
    };
    tail.match_indices("</").any(|(pos, _)| {
        start + pos > 0 && tail.get(pos + 2..).is_some_and(starts_with_word)
    })
}

/// Whether the first tag on the line is complete and not self-closed
fn opens_element(line: &str) -> bool {
    match line.find('>') {
        Some(end) => !line.get(..end).is_some_and(|tag| tag.ends_with('/')),
        None => false,
    }
}

fn starts_with_word(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c == '_' || c.is_alphanumeric())
}
