//! Named-field text templates.
//!
//! Search and status formats are written as `{address}, {city} {state}`:
//! `{name}` is replaced with the field of that name and `{{` / `}}` produce
//! literal braces. A numeric field may carry a fixed precision, as in
//! `{lat:.4f}`; no other format spec is accepted. A template is parsed once
//! and rendered against anything that implements [`FieldSource`].

use thiserror::Error;

/// Errors from parsing or rendering a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The template refers to a field the record does not have.
    #[error("missing field '{0}'")]
    MissingField(String),

    /// The template itself cannot be parsed.
    #[error("malformed format string '{template}': {reason}")]
    Malformed { template: String, reason: String },

    /// A fixed-precision field holds something that is not a number.
    #[error("field '{field}' is not a number: '{value}'")]
    NotNumeric { field: String, value: String },
}

/// Anything that can look up a field by name for rendering.
pub trait FieldSource {
    /// Returns the text value of `name`, or `None` if it is absent.
    fn field(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        name: String,
        precision: Option<usize>,
    },
}

/// Parses a `.Nf` spec into its precision.
fn fixed_precision(spec: &str) -> Option<usize> {
    let digits = spec.strip_prefix('.')?.strip_suffix('f')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `source` into literal text and field references.
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let malformed = |reason: &str| FormatError::Malformed {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(malformed("nested '{'")),
                            Some(ch) => name.push(ch),
                            None => return Err(malformed("unclosed '{'")),
                        }
                    }
                    let (name, precision) = match name.split_once(':') {
                        Some((name, spec)) => match fixed_precision(spec.trim()) {
                            Some(precision) => (name.trim(), Some(precision)),
                            None => return Err(malformed("only '.Nf' format specs are supported")),
                        },
                        None => (name.trim(), None),
                    };
                    if name.is_empty() {
                        return Err(malformed("empty field name"));
                    }
                    if name.contains('!') {
                        return Err(malformed("conversions are not supported"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field {
                        name: name.to_string(),
                        precision,
                    });
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(malformed("single '}' outside a field")),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The original template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the fields the template refers to, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Renders the template, failing on the first absent field.
    pub fn render<S: FieldSource + ?Sized>(&self, source: &S) -> Result<String, FormatError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { name, precision } => {
                    let value = source
                        .field(name)
                        .ok_or_else(|| FormatError::MissingField(name.clone()))?;
                    match precision {
                        Some(precision) => {
                            let number: f64 =
                                value.trim().parse().map_err(|_| FormatError::NotNumeric {
                                    field: name.clone(),
                                    value: value.clone(),
                                })?;
                            out.push_str(&format!("{:.*}", precision, number));
                        }
                        None => out.push_str(&value),
                    }
                }
            }
        }
        Ok(out)
    }
}
