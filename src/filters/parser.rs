//! Parser for client-side result filters.
//!
//! # Syntax
//!
//! ```text
//! filter_expr  := field_filter (operator? field_filter)*
//! field_filter := field:value | field:"quoted value"
//! operator     := AND | OR (case-insensitive)
//! field        := party | has | since | vendor (case-insensitive)
//! ```
//!
//! Without an explicit operator, filters on the same field are OR'd and
//! filters on different fields are AND'd:
//!
//! ```rust
//! # use vcon_search::filters::parse_filter;
//! # use vcon_search::filters::FilterOperator;
//! let expr = parse_filter("party:alice party:bob has:summary").unwrap();
//! assert_eq!(expr.operators, vec![FilterOperator::Or, FilterOperator::And]);
//! ```

use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use super::ast::{FieldFilter, FilterExpr, FilterField, FilterOperator};

/// Sections that `has:` can test for
pub const HAS_VALUES: [&str; 4] = ["summary", "transcript", "recording", "attachment"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    FieldValue { field: String, value: String },
    And,
    Or,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let word = read_word(&mut chars);

        match word.to_uppercase().as_str() {
            "AND" => tokens.push(Token::And),
            "OR" => tokens.push(Token::Or),
            _ => {
                let (field, value) = word.split_once(':').ok_or_else(|| {
                    anyhow!("Invalid token: '{}' (expected field:value or AND/OR)", word)
                })?;

                let value = if value.starts_with('"') {
                    read_quoted_value(&mut chars, value)?
                } else {
                    value.to_string()
                };

                if field.is_empty() || value.is_empty() {
                    return Err(anyhow!("Invalid field:value format: {}", word));
                }

                tokens.push(Token::FieldValue { field: field.to_string(), value });
            }
        }
    }

    Ok(tokens)
}

fn read_word(chars: &mut Peekable<Chars>) -> String {
    let mut word = String::new();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            break;
        }
        word.push(ch);
        chars.next();
    }

    word
}

/// Finish a quoted value whose opening part (with the quote) was already read
fn read_quoted_value(chars: &mut Peekable<Chars>, initial: &str) -> Result<String> {
    let mut value = initial[1..].to_string();

    if let Some(quote_pos) = value.find('"') {
        value.truncate(quote_pos);
        return Ok(value);
    }

    for ch in chars.by_ref() {
        if ch == '"' {
            return Ok(value);
        }
        value.push(ch);
    }

    Err(anyhow!("Unterminated quoted string"))
}

fn parse_field(field: &str) -> Result<FilterField> {
    match field.to_lowercase().as_str() {
        "party" => Ok(FilterField::Party),
        "has" => Ok(FilterField::Has),
        "since" => Ok(FilterField::Since),
        "vendor" => Ok(FilterField::Vendor),
        _ => Err(anyhow!("Unknown field: '{}' (valid fields: party, has, since, vendor)", field)),
    }
}

/// Parse a filter string into a [`FilterExpr`]; empty input yields an empty expression
pub fn parse_filter(input: &str) -> Result<FilterExpr> {
    let tokens = tokenize(input).context("Failed to tokenize filter")?;

    let mut expr = FilterExpr::new();
    let mut expecting_filter = true;
    let mut last_field: Option<FilterField> = None;

    for token in tokens {
        match token {
            Token::FieldValue { field, value } => {
                let filter_field = parse_field(&field)?;
                validate_value(filter_field, &value)?;

                if !expecting_filter {
                    let implicit_op = match last_field {
                        Some(prev) if prev == filter_field => FilterOperator::Or,
                        _ => FilterOperator::And,
                    };
                    expr.add_operator(implicit_op);
                }

                expr.add_filter(FieldFilter::new(filter_field, value));
                last_field = Some(filter_field);
                expecting_filter = false;
            }
            Token::And | Token::Or => {
                if expecting_filter {
                    return Err(anyhow!("Unexpected operator (expected field:value)"));
                }
                let operator =
                    if token == Token::And { FilterOperator::And } else { FilterOperator::Or };
                expr.add_operator(operator);
                expecting_filter = true;
            }
        }
    }

    if expecting_filter && !expr.is_empty() {
        return Err(anyhow!("Filter ended with operator (expected field:value)"));
    }

    Ok(expr)
}

fn validate_value(field: FilterField, value: &str) -> Result<()> {
    match field {
        FilterField::Has => {
            let lower = value.to_lowercase();
            if HAS_VALUES.contains(&lower.as_str()) {
                Ok(())
            } else {
                Err(anyhow!("Invalid has value: '{}' (must be one of {})", value, HAS_VALUES.join(", ")))
            }
        }
        FilterField::Since => {
            if is_valid_date_format(value) {
                Ok(())
            } else {
                Err(anyhow!("Invalid date format: '{}' (expected YYYY-MM-DD)", value))
            }
        }
        FilterField::Party | FilterField::Vendor => Ok(()),
    }
}

/// Strict YYYY-MM-DD that is also a real calendar date
fn is_valid_date_format(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_with_operators() {
        let tokens = tokenize("party:alice AND has:summary").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1], Token::And);
    }

    #[test]
    fn test_tokenize_quoted_value() {
        let tokens = tokenize("party:\"Jane Doe\" has:summary").unwrap();
        assert_eq!(
            tokens[0],
            Token::FieldValue { field: "party".to_string(), value: "Jane Doe".to_string() }
        );
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let err = tokenize("party:\"Jane Doe").unwrap_err();
        assert!(err.to_string().contains("Unterminated"));
    }

    #[test]
    fn test_tokenize_invalid_token() {
        let err = tokenize("alice").unwrap_err();
        assert!(err.to_string().contains("Invalid token"));
    }

    #[test]
    fn test_tokenize_empty_field_or_value() {
        assert!(tokenize(":alice").unwrap_err().to_string().contains("Invalid field:value"));
        assert!(tokenize("party:").unwrap_err().to_string().contains("Invalid field:value"));
    }

    #[test]
    fn test_parse_field_case_insensitive() {
        assert_eq!(parse_field("PARTY").unwrap(), FilterField::Party);
        assert_eq!(parse_field("Vendor").unwrap(), FilterField::Vendor);
        assert!(parse_field("project").unwrap_err().to_string().contains("Unknown field"));
    }

    #[test]
    fn test_parse_filter_empty() {
        assert!(parse_filter("").unwrap().is_empty());
        assert!(parse_filter("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_filter_implicit_operators() {
        let expr = parse_filter("party:alice party:bob since:2024-01-01").unwrap();
        assert_eq!(expr.filters.len(), 3);
        assert_eq!(expr.operators, vec![FilterOperator::Or, FilterOperator::And]);
    }

    #[test]
    fn test_parse_filter_explicit_operator_wins() {
        let expr = parse_filter("has:summary OR vendor:openai").unwrap();
        assert_eq!(expr.operators, vec![FilterOperator::Or]);
    }

    #[test]
    fn test_parse_filter_has_values() {
        assert!(parse_filter("has:Transcript").is_ok());
        let err = parse_filter("has:video").unwrap_err();
        assert!(err.to_string().contains("Invalid has value"));
    }

    #[test]
    fn test_parse_filter_invalid_dates() {
        assert!(parse_filter("since:2024-02-30").is_err());
        assert!(parse_filter("since:2024-1-5").is_err());
        assert!(parse_filter("since:2024-02-29").is_ok());
    }

    #[test]
    fn test_parse_filter_dangling_operators() {
        let err = parse_filter("party:alice AND").unwrap_err();
        assert!(err.to_string().contains("ended with operator"));
        assert!(parse_filter("OR party:alice").is_err());
        assert!(parse_filter("party:a AND OR party:b").is_err());
    }
}
