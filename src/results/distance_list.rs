use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListSyntaxError {
    #[error("expected `[` to open the distance list")]
    MissingOpen,
    #[error("expected `]` to close the distance list")]
    MissingClose,
    #[error("empty element at position {0}")]
    EmptyElement(usize),
    #[error("`{0}` is not a decimal number")]
    InvalidNumber(String),
    #[error("`{0}` is outside the finite range")]
    OutOfRange(String),
}

/// Parses `[v1, v2, ...]` lists of decimal literals. Anything outside that
/// grammar (names, nested lists, `nan`, trailing commas) is rejected, as are
/// literals that overflow `f64`.
#[derive(Debug, Clone)]
pub struct DistanceListParser {
    number: Regex,
}

impl DistanceListParser {
    pub fn new() -> Result<Self> {
        let number = Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
            .context("failed to compile distance literal regex")?;
        Ok(Self { number })
    }

    pub fn parse(&self, text: &str) -> Result<Vec<f64>, ListSyntaxError> {
        let body = text
            .trim()
            .strip_prefix('[')
            .ok_or(ListSyntaxError::MissingOpen)?
            .strip_suffix(']')
            .ok_or(ListSyntaxError::MissingClose)?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        body.split(',')
            .enumerate()
            .map(|(position, token)| self.parse_number(position, token.trim()))
            .collect()
    }

    fn parse_number(&self, position: usize, token: &str) -> Result<f64, ListSyntaxError> {
        if token.is_empty() {
            return Err(ListSyntaxError::EmptyElement(position));
        }
        if !self.number.is_match(token) {
            return Err(ListSyntaxError::InvalidNumber(token.to_string()));
        }
        let value = token
            .parse::<f64>()
            .map_err(|_| ListSyntaxError::InvalidNumber(token.to_string()))?;
        if !value.is_finite() {
            return Err(ListSyntaxError::OutOfRange(token.to_string()));
        }
        Ok(value)
    }
}
