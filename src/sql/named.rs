use crate::core::{BenchError, Result};

/// A query with `:name` parameters rewritten to positional `?` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    sql: String,
    names: Vec<String>,
}

impl NamedQuery {
    /// Compile `:name` parameters into `?`, recording names in order of
    /// appearance.
    ///
    /// `::` produces a literal `:`. Quoted text (`'`, `"`, `` ` ``) is copied
    /// verbatim, backslash escapes included.
    pub fn compile(sql: &str) -> Result<Self> {
        let mut out = String::with_capacity(sql.len());
        let mut names = Vec::new();
        let mut chars = sql.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '\'' | '"' | '`' => {
                    out.push(c);
                    let mut closed = false;
                    while let Some((_, q)) = chars.next() {
                        out.push(q);
                        if q == '\\' && c != '`' {
                            if let Some((_, escaped)) = chars.next() {
                                out.push(escaped);
                            }
                        } else if q == c {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        return Err(BenchError::template(format!(
                            "unterminated quote starting at byte {}",
                            pos
                        )));
                    }
                }
                ':' => match chars.peek() {
                    Some((_, ':')) => {
                        chars.next();
                        out.push(':');
                    }
                    Some((_, n)) if is_name_char(*n) => {
                        let mut name = String::new();
                        while let Some((_, n)) = chars.peek() {
                            if !is_name_char(*n) {
                                break;
                            }
                            name.push(*n);
                            chars.next();
                        }
                        out.push('?');
                        names.push(name);
                    }
                    _ => {
                        return Err(BenchError::template(format!(
                            "dangling ':' at byte {}",
                            pos
                        )));
                    }
                },
                _ => out.push(c),
            }
        }

        Ok(Self { sql: out, names })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter names in placeholder order (repeats kept)
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.sql, self.names)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}
