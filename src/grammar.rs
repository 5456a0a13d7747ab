//! Bracket-tag grammar
//!
//!     Reads the token stream produced by [lexing](crate::lexing) and recognizes the tags
//!     of a single nesting level. The grammar is the one shortcodes use:
//!
//!         [name attr=value ...]           opening tag
//!         [name attr=value ... /]         self-closing tag
//!         [/name]                         closing tag
//!         [name ...]content[/name]        paired tag
//!         [[name ...]] / [[name]..[/name]]  escaped, literal text
//!
//!     Only names accepted by the [`TagRegistry`] are tags. Everything else, including
//!     brackets that never close and closing tags with no opener, is literal text.
//!
//!     Recognition runs in two passes:
//!         1. Pieces: opening and closing tags are picked out of the tokens.
//!         2. Pairing: each opening tag is paired with the closing tag that balances it.
//!            Openers of the same name inside increase the depth. An opener with no
//!            balancing closer stands alone with no content.
//!
//!     Only the outermost tags are returned; the content of a paired tag is returned as a
//!     slice so callers can run the grammar again on it.

use crate::attributes::{parse_attributes, Attributes};
use crate::lexing::{tokenize_with_spans, Token};
use crate::registry::TagRegistry;
use std::collections::HashMap;
use std::ops::Range;

/// A recognized tag at one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcode<'a> {
    pub name: &'a str,
    /// Full text of the tag, from the opening `[` to the final `]`.
    pub raw: &'a str,
    pub span: Range<usize>,
    /// Text between the name and the closing bracket of the opening tag.
    pub attribute_text: &'a str,
    pub attributes: Attributes,
    pub content: Option<&'a str>,
    pub content_span: Option<Range<usize>>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Open {
        name: &'a str,
        span: Range<usize>,
        attribute_text: &'a str,
        self_closing: bool,
    },
    Close {
        name: &'a str,
        span: Range<usize>,
    },
}

impl<'a> Piece<'a> {
    fn name(&self) -> &'a str {
        match self {
            Piece::Open { name, .. } | Piece::Close { name, .. } => *name,
        }
    }
}

/// Parse the outermost registered tags of `source`.
pub fn parse_shortcodes<'a, R>(source: &'a str, registry: &R) -> Vec<Shortcode<'a>>
where
    R: TagRegistry + ?Sized,
{
    if !source.contains('[') {
        return Vec::new();
    }

    let tokens = tokenize_with_spans(source);
    let pieces = collect_pieces(source, &tokens, registry);
    let closers = pair_pieces(&pieces);

    let mut shortcodes = Vec::new();
    let mut p = 0;
    while p < pieces.len() {
        let Piece::Open {
            name,
            span: ref open_span,
            attribute_text,
            self_closing,
        } = pieces[p]
        else {
            // Stray closing tag.
            p += 1;
            continue;
        };

        let (span, content_span, next) = match &closers[p] {
            Some((q, close_span)) => (
                open_span.start..close_span.end,
                Some(open_span.end..close_span.start),
                q + 1,
            ),
            None => (open_span.clone(), None, p + 1),
        };
        p = next;

        if is_escaped(source, &span) {
            tracing::trace!(tag = name, start = span.start, "skipping escaped tag");
            continue;
        }

        shortcodes.push(Shortcode {
            name,
            raw: &source[span.clone()],
            attributes: parse_attributes(attribute_text),
            attribute_text,
            content: content_span.clone().map(|range| &source[range]),
            content_span,
            span,
            self_closing,
        });
    }

    shortcodes
}

/// An item wrapped in one extra pair of brackets is literal text.
fn is_escaped(source: &str, span: &Range<usize>) -> bool {
    source[..span.start].ends_with('[') && source[span.end..].starts_with(']')
}

fn collect_pieces<'a, R>(
    source: &'a str,
    tokens: &[(Token, logos::Span)],
    registry: &R,
) -> Vec<Piece<'a>>
where
    R: TagRegistry + ?Sized,
{
    let kind = |i: usize| tokens.get(i).map(|(token, _)| *token);
    let text = move |i: usize| -> &'a str { &source[tokens[i].1.clone()] };

    let mut pieces = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if kind(i) != Some(Token::OpenBracket) {
            i += 1;
            continue;
        }

        // [/name]
        if kind(i + 1) == Some(Token::Slash)
            && kind(i + 2).is_some_and(|token| token.is_name())
            && kind(i + 3) == Some(Token::CloseBracket)
            && registry.is_registered(text(i + 2))
        {
            pieces.push(Piece::Close {
                name: text(i + 2),
                span: tokens[i].1.start..tokens[i + 3].1.end,
            });
            i += 4;
            continue;
        }

        // [name ...] or [name .../]
        if kind(i + 1).is_some_and(|token| token.is_name()) && registry.is_registered(text(i + 1))
        {
            let Some(k) = (i + 2..tokens.len()).find(|&k| kind(k) == Some(Token::CloseBracket))
            else {
                // No `]` left: nothing after this point can form a tag.
                break;
            };
            let self_closing = k > i + 2 && kind(k - 1) == Some(Token::Slash);
            let attribute_end = if self_closing {
                tokens[k - 1].1.start
            } else {
                tokens[k].1.start
            };
            pieces.push(Piece::Open {
                name: text(i + 1),
                span: tokens[i].1.start..tokens[k].1.end,
                attribute_text: &source[tokens[i + 1].1.end..attribute_end],
                self_closing,
            });
            i = k + 1;
            continue;
        }

        i += 1;
    }

    pieces
}

/// For every opener, the index and span of the closer that balances it.
fn pair_pieces(pieces: &[Piece<'_>]) -> Vec<Option<(usize, Range<usize>)>> {
    let mut closers = vec![None; pieces.len()];
    let mut open: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Open {
                self_closing: false,
                ..
            } => open.entry(piece.name()).or_default().push(index),
            Piece::Open { .. } => {}
            Piece::Close { name, span } => {
                if let Some(opener) = open.get_mut(name).and_then(Vec::pop) {
                    closers[opener] = Some((index, span.clone()));
                }
            }
        }
    }

    closers
}
