//! insmod-style argument line parsing
//!
//! The grammar matches what the kernel accepts on a module command line:
//! whitespace-separated `key=value` pairs, double quotes protecting
//! whitespace inside a value (`whom="hello world"`), and a bare `key`
//! meaning "set this boolean parameter to true".

use thiserror::Error;

/// One `key[=value]` pair from an argument line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub key: String,
    /// `None` for a bare key with no `=`
    pub value: Option<String>,
}

/// Error types for argument line parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CmdlineError {
    #[error("unbalanced quote in argument list")]
    UnbalancedQuote,

    #[error("argument `{token}` has an empty key")]
    EmptyKey { token: String },
}

/// Split an argument line into `key[=value]` pairs.
///
/// An empty (or all-whitespace) line yields no arguments.
pub fn parse(line: &str) -> Result<Vec<Arg>, CmdlineError> {
    let mut args = Vec::new();
    for token in tokenize(line)? {
        args.push(split_token(&token)?);
    }
    Ok(args)
}

fn tokenize(line: &str) -> Result<Vec<String>, CmdlineError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(core::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(CmdlineError::UnbalancedQuote);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn split_token(token: &str) -> Result<Arg, CmdlineError> {
    let (key, value) = match token.split_once('=') {
        Some((key, value)) => (key, Some(unquote(value).to_string())),
        None => (token, None),
    };
    if key.is_empty() {
        return Err(CmdlineError::EmptyKey {
            token: token.to_string(),
        });
    }
    Ok(Arg {
        key: key.to_string(),
        value,
    })
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> Arg {
        Arg {
            key: key.to_string(),
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn parses_plain_pairs() {
        let args = parse("whom=World loop_count=3").unwrap();
        assert_eq!(args, [pair("whom", "World"), pair("loop_count", "3")]);
    }

    #[test]
    fn empty_line_has_no_args() {
        assert_eq!(parse("").unwrap(), []);
        assert_eq!(parse("   ").unwrap(), []);
    }

    #[test]
    fn quotes_protect_whitespace() {
        let args = parse(r#"whom="hello there" loop_count=1"#).unwrap();
        assert_eq!(args, [pair("whom", "hello there"), pair("loop_count", "1")]);
    }

    #[test]
    fn bare_key_has_no_value() {
        let args = parse("verbose").unwrap();
        assert_eq!(
            args,
            [Arg {
                key: "verbose".to_string(),
                value: None,
            }]
        );
    }

    #[test]
    fn empty_value_is_kept() {
        let args = parse("whom=").unwrap();
        assert_eq!(args, [pair("whom", "")]);
    }

    #[test]
    fn unbalanced_quote_is_rejected() {
        assert_eq!(
            parse(r#"whom="hello"#),
            Err(CmdlineError::UnbalancedQuote)
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(
            parse("=3"),
            Err(CmdlineError::EmptyKey {
                token: "=3".to_string(),
            })
        );
    }

    #[test]
    fn repeated_whitespace_is_collapsed() {
        let args = parse("  a=1   b=2  ").unwrap();
        assert_eq!(args, [pair("a", "1"), pair("b", "2")]);
    }
}
