//! Minimal reader for the flat XML documents storage backends answer POST
//! uploads with, e.g.
//!
//! ```xml
//! <PostResponse><Bucket>b</Bucket><Location>https://...</Location></PostResponse>
//! <Error><Code>NoSuchBucket</Code><Message>...</Message></Error>
//! ```
//!
//! Only the direct children of the root element are exposed. Anything that is
//! not well-formed yields `None` rather than an error: callers treat an
//! unreadable body the same as a body without the element they wanted.

use xmlparser::{ElementEnd, Token, Tokenizer};

/// A direct child of the root element and its leading text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildElement {
    pub name: String,
    pub text: String,
}

/// Parses `document` and returns the root's direct children in document order.
pub fn root_children(document: &str) -> Option<Vec<ChildElement>> {
    let mut open: Vec<(&str, &str)> = Vec::new();
    let mut children: Vec<ChildElement> = Vec::new();
    // Text after a grandchild element is a tail, not the child's own text.
    let mut child_has_subelement = false;
    let mut saw_root = false;
    let mut root_closed = false;

    for token in Tokenizer::from(document) {
        match token.ok()? {
            Token::ElementStart { prefix, local, .. } => {
                if root_closed {
                    return None;
                }
                match open.len() {
                    0 => saw_root = true,
                    1 => {
                        children.push(ChildElement {
                            name: local.as_str().to_string(),
                            text: String::new(),
                        });
                        child_has_subelement = false;
                    }
                    2 => child_has_subelement = true,
                    _ => {}
                }
                open.push((prefix.as_str(), local.as_str()));
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open => {}
                ElementEnd::Empty => {
                    open.pop()?;
                    root_closed = open.is_empty();
                }
                ElementEnd::Close(prefix, local) => {
                    let (open_prefix, open_local) = open.pop()?;
                    if open_prefix != prefix.as_str() || open_local != local.as_str() {
                        return None;
                    }
                    root_closed = open.is_empty();
                }
            },
            Token::Text { text } => {
                let text = text.as_str();
                if open.is_empty() {
                    if !text.trim().is_empty() {
                        return None;
                    }
                } else if open.len() == 2 && !child_has_subelement {
                    let unescaped = unescape(text)?;
                    children.last_mut()?.text.push_str(&unescaped);
                }
            }
            Token::Cdata { text, .. } => {
                if open.is_empty() {
                    return None;
                }
                if open.len() == 2 && !child_has_subelement {
                    children.last_mut()?.text.push_str(text.as_str());
                }
            }
            _ => {}
        }
    }

    if !saw_root || !open.is_empty() {
        return None;
    }

    Some(children)
}

/// Text of the first root child named `name`, if the document is well-formed
/// and has one.
pub fn root_child_text(document: &str, name: &str) -> Option<String> {
    root_children(document)?
        .into_iter()
        .find(|child| child.name == name)
        .map(|child| child.text)
}

/// Resolves the predefined entities and character references.
fn unescape(raw: &str) -> Option<String> {
    if !raw.contains('&') {
        return Some(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find(';')?;
        let entity = &after[..end];
        let resolved = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()?
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse::<u32>().ok()?
                } else {
                    return None;
                };
                char::from_u32(code)?
            }
        };
        out.push(resolved);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}
