use std::fmt;

/// A term as produced by the policy engine.
///
/// Numbers keep their literal text so no precision is lost between the engine and SQL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Null,
    Boolean(bool),
    Number(String),
    String(String),
    Var(String),
    /// Reference: head term followed by path segments (`data.users[_].login`).
    Ref(Vec<Term>),
    Array(Vec<Term>),
    Set(Vec<Term>),
    Object(Vec<(Term, Term)>),
    Call(Vec<Term>),
}

impl Term {
    pub fn string(s: impl Into<String>) -> Self {
        Term::String(s.into())
    }

    pub fn number(n: impl ToString) -> Self {
        Term::Number(n.to_string())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    /// Builds a reference from a head variable and string field segments.
    pub fn path<I, S>(head: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = vec![Term::var(head)];
        segments.extend(fields.into_iter().map(|f| Term::String(f.into())));
        Term::Ref(segments)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Term::Null | Term::Boolean(_) | Term::Number(_) | Term::String(_)
        )
    }
}

/// Engine-generated wildcard variables (`$01`) print as `_`.
fn is_wildcard(name: &str) -> bool {
    name.starts_with('$') || name == "_"
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Null => f.write_str("null"),
            Term::Boolean(b) => write!(f, "{b}"),
            Term::Number(n) => f.write_str(n),
            Term::String(s) => write_quoted(f, s),
            Term::Var(v) if is_wildcard(v) => f.write_str("_"),
            Term::Var(v) => f.write_str(v),
            Term::Ref(segments) => {
                let Some((head, rest)) = segments.split_first() else {
                    return Ok(());
                };
                write!(f, "{head}")?;
                for seg in rest {
                    match seg {
                        Term::String(s) if is_identifier(s) => write!(f, ".{s}")?,
                        other => write!(f, "[{other}]")?,
                    }
                }
                Ok(())
            }
            Term::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Term::Set(items) if items.is_empty() => f.write_str("set()"),
            Term::Set(items) => {
                f.write_str("{")?;
                write_list(f, items)?;
                f.write_str("}")
            }
            Term::Object(pairs) => {
                f.write_str("{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Term::Call(terms) => {
                let Some((op, args)) = terms.split_first() else {
                    return Ok(());
                };
                write!(f, "{op}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
        }
    }
}

/// One expression of a residual conjunction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Built-in call such as `eq(lhs, rhs)`.
    Call {
        negated: bool,
        operator: Term,
        operands: Vec<Term>,
    },
    /// Any other expression (guards, bare references). Never compiled.
    Term(Term),
}

impl Expr {
    pub fn call(operator: &str, operands: Vec<Term>) -> Self {
        let operator = Term::Ref(operator.split('.').map(Term::var).collect());
        Expr::Call {
            negated: false,
            operator,
            operands,
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Expr::Call {
                negated,
                operator,
                operands,
            } => Expr::Call {
                negated: !negated,
                operator,
                operands,
            },
            other => other,
        }
    }

    /// Operator name as the engine prints it (`eq`, `internal.member_2`).
    pub fn operator_name(&self) -> Option<String> {
        match self {
            Expr::Call { operator, .. } => Some(operator_text(operator)),
            Expr::Term(_) => None,
        }
    }
}

fn operator_text(operator: &Term) -> String {
    match operator {
        Term::Ref(segments) => segments
            .iter()
            .map(|s| match s {
                Term::Var(v) | Term::String(v) => v.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("."),
        other => other.to_string(),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Call {
                negated,
                operator,
                operands,
            } => {
                if *negated {
                    f.write_str("not ")?;
                }
                write!(f, "{}(", operator_text(operator))?;
                write_list(f, operands)?;
                f.write_str(")")
            }
            Expr::Term(t) => write!(f, "{t}"),
        }
    }
}

/// Expressions implicitly AND-ed together. Order is preserved in the output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conjunction {
    pub exprs: Vec<Expr>,
}

impl Conjunction {
    pub fn new(exprs: Vec<Expr>) -> Self {
        Self { exprs }
    }
}

/// Conjunctions implicitly OR-ed together: the output of one partial evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Residual {
    pub conjunctions: Vec<Conjunction>,
}

impl Residual {
    pub fn new(conjunctions: Vec<Conjunction>) -> Self {
        Self { conjunctions }
    }

    pub fn is_empty(&self) -> bool {
        self.conjunctions.is_empty()
    }
}

/// Error returned when an unknown collection declaration cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid unknown collection `{input}`: {reason}")]
pub struct ParseUnknownError {
    pub input: String,
    pub reason: &'static str,
}

/// The collection the engine left unknown, as a structured path (`data.users`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnknownCollection {
    path: Vec<String>,
}

impl UnknownCollection {
    /// Parses `data.users` or `data.users[_]`; the iteration wildcard is implied.
    pub fn parse(input: &str) -> Result<Self, ParseUnknownError> {
        let err = |reason| ParseUnknownError {
            input: input.to_string(),
            reason,
        };
        let trimmed = input.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix("[_]").unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(err("empty path"));
        }

        let path: Vec<String> = trimmed.split('.').map(str::to_string).collect();
        if path.iter().any(|seg| !is_identifier(seg)) {
            return Err(err("path segments must be identifiers"));
        }
        if path.len() < 2 {
            return Err(err("expected a collection below a root document, e.g. data.users"));
        }
        Ok(Self { path })
    }

    pub fn segments(&self) -> &[String] {
        &self.path
    }

    /// True when `term` is a reference rooted at this collection.
    pub fn is_referenced_by(&self, term: &Term) -> bool {
        let Term::Ref(segments) = term else {
            return false;
        };
        if segments.len() < self.path.len() {
            return false;
        }
        self.path
            .iter()
            .zip(segments)
            .enumerate()
            .all(|(i, (want, seg))| match seg {
                Term::Var(v) if i == 0 => v == want,
                Term::String(s) if i > 0 => s == want,
                _ => false,
            })
    }

    /// Column addressed by a reference into this collection, with the collection prefix
    /// and the iteration variable stripped. Nested fields are joined with `.`.
    pub fn column(&self, term: &Term) -> Option<String> {
        if !self.is_referenced_by(term) {
            return None;
        }
        let Term::Ref(segments) = term else {
            return None;
        };
        let rest = &segments[self.path.len()..];
        let (iter, fields) = rest.split_first()?;
        if !matches!(iter, Term::Var(_)) || fields.is_empty() {
            return None;
        }
        let fields = fields
            .iter()
            .map(|f| match f {
                Term::String(s) => Some(s.as_str()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some(fields.join("."))
    }
}

impl fmt::Display for UnknownCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join("."))
    }
}

impl std::str::FromStr for UnknownCollection {
    type Err = ParseUnknownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
