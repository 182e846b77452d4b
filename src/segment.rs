//! The filter-string segmenter.
//!
//! One left-to-right scan splits the filter string into a tree of
//! [`Segment`]s joined by AND/OR, tracking quote state and paren depth.
//! Parens preceded by a filter-function keyword stay in the clause text.

use crate::error::OdataError;

/// AND/OR combinator linking sibling segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Junction {
    And,
    Or,
}

/// One node of the parsed filter tree.
///
/// A leaf carries the clause text in `expression`; a grouping node
/// carries its inner segments in `children`. A node never carries both.
/// `junction` is the combinator that preceded this node in the input,
/// `None` for the first node of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub depth: usize,
    pub junction: Option<Junction>,
    pub expression: Option<String>,
    pub children: Vec<Segment>,
}

/// Split a filter string into its segment tree.
pub fn parse(filter: &str) -> Result<Vec<Segment>, OdataError> {
    let mut scanner = Scanner {
        input: filter,
        pos: 0,
        depth: 0,
    };
    let segments = scanner.scan_group()?;
    // A '(' whose group ran off the end of the input leaves depth raised.
    if scanner.depth != 0 {
        return Err(OdataError::MismatchedParentheses);
    }
    Ok(segments)
}

struct Scanner<'a> {
    input: &'a str,
    /// Current byte offset into the input.
    pos: usize,
    /// Current grouping-paren depth, shared across nested scans.
    depth: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.pos += c.len_utf8();
        }
        c
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Whether the `(` at the current position belongs to a filter
    /// function rather than a grouping, judged by the characters
    /// immediately preceding it. `in` may be separated from its paren by
    /// one space.
    fn at_filter_function(&self) -> bool {
        let before = &self.input[..self.pos];
        before.ends_with("contains")
            || before.ends_with("startswith")
            || before.ends_with("endswith")
            || before.ends_with("in")
            || before.ends_with("in ")
    }

    /// Scan one grouping level, consuming up to and including its
    /// closing paren (or the end of input for the root level).
    fn scan_group(&mut self) -> Result<Vec<Segment>, OdataError> {
        let entry_depth = self.depth;
        let mut segments: Vec<Segment> = Vec::new();
        let mut last_junction: Option<Junction> = None;
        let mut in_quotes: Option<char> = None;
        let mut filter_function = false;
        let mut expression = String::new();

        let mut close_expression = |segments: &mut Vec<Segment>,
                                    expression: &mut String,
                                    junction: Option<Junction>| {
            let text = expression.trim();
            if !text.is_empty() {
                segments.push(Segment {
                    depth: entry_depth,
                    junction,
                    expression: Some(text.to_string()),
                    children: Vec::new(),
                });
            }
            expression.clear();
        };

        while let Some(c) = self.peek() {
            if in_quotes == Some(c) || (in_quotes.is_none() && (c == '\'' || c == '"')) {
                // Only the same quote character closes a quoted run.
                in_quotes = if in_quotes.is_some() { None } else { Some(c) };
                self.bump();
                expression.push(c);
            } else if in_quotes.is_none() && c == '(' {
                if self.at_filter_function() {
                    filter_function = true;
                    self.bump();
                    expression.push(c);
                } else {
                    self.bump();
                    self.depth += 1;
                    let junction = last_junction;
                    let children = self.scan_group()?;
                    segments.push(Segment {
                        depth: entry_depth,
                        junction,
                        expression: None,
                        children,
                    });
                }
            } else if in_quotes.is_none() && c == ')' {
                if filter_function {
                    filter_function = false;
                    self.bump();
                    expression.push(c);
                } else {
                    if self.depth == 0 {
                        // Closing paren that nothing opened.
                        return Err(OdataError::MismatchedParentheses);
                    }
                    close_expression(&mut segments, &mut expression, last_junction);
                    self.depth -= 1;
                    self.bump();
                    return Ok(segments);
                }
            } else if in_quotes.is_none() && self.rest().starts_with(" and ") {
                close_expression(&mut segments, &mut expression, last_junction);
                last_junction = Some(Junction::And);
                self.pos += " and ".len();
            } else if in_quotes.is_none() && self.rest().starts_with(" or ") {
                close_expression(&mut segments, &mut expression, last_junction);
                last_junction = Some(Junction::Or);
                self.pos += " or ".len();
            } else {
                self.bump();
                expression.push(c);
            }
        }

        // End of input. A nested scan ending here means its '(' was never
        // closed; the root scan notices via the depth counter.
        if in_quotes.is_some() {
            return Err(OdataError::MismatchedQuotes);
        }
        if self.depth != entry_depth || filter_function {
            return Err(OdataError::MismatchedParentheses);
        }
        close_expression(&mut segments, &mut expression, last_junction);
        Ok(segments)
    }
}
