use super::{Signature, TypeExpr};
use miette::{Diagnostic, SourceSpan};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, value},
    error::ParseError,
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, Error, Diagnostic, PartialEq)]
#[error("{message}")]
#[diagnostic(code(dynaseq::type_syntax))]
pub struct TypeParseError {
    #[source_code]
    src: String,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl TypeParseError {
    fn at(input: &str, offset: usize, label: impl Into<String>) -> Self {
        // An error at end of input underlines the last character.
        let start = offset.min(input.len().saturating_sub(1));
        Self {
            src: input.to_string(),
            span: (start, input.len() - start).into(),
            help: Some(
                "expected e.g. `int`, `[]string`, `[4]int`, `map[string]int`, `*int` or `func(string, int) bool`"
                    .into(),
            ),
            message: format!("invalid type expression `{input}`"),
            label: label.into(),
        }
    }

    pub(super) fn not_a_function(input: &str, parsed: &TypeExpr) -> Self {
        let mut err = Self::at(input, 0, format!("this is `{parsed}`"));
        err.message = format!("`{input}` is not a function type");
        err.help = Some("function signatures are written `func(params) returns`".into());
        err
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl FromStr for TypeExpr {
    type Err = TypeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match all_consuming(type_expr)(input) {
            Ok((_, ty)) => Ok(ty),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                let offset = input.len() - err.input.len();
                Err(TypeParseError::at(input, offset, "unexpected input here"))
            }
            Err(nom::Err::Incomplete(_)) => {
                Err(TypeParseError::at(input, input.len(), "type expression ends early"))
            }
        }
    }
}

fn ws<'a, F, O, E>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn type_expr(input: &str) -> IResult<&str, TypeExpr> {
    ws(alt((
        func_type,
        map_type,
        slice_type,
        array_type,
        pointer_type,
        primitive,
    )))(input)
}

fn primitive(input: &str) -> IResult<&str, TypeExpr> {
    alt((
        value(TypeExpr::Any, alt((tag("interface{}"), tag("any")))),
        value(TypeExpr::Int, tag("int")),
        value(TypeExpr::Float, alt((tag("float64"), tag("float")))),
        value(TypeExpr::Bool, tag("bool")),
        value(TypeExpr::Str, tag("string")),
    ))(input)
}

fn slice_type(input: &str) -> IResult<&str, TypeExpr> {
    map(preceded(tag("[]"), type_expr), TypeExpr::slice_of)(input)
}

fn array_type(input: &str) -> IResult<&str, TypeExpr> {
    let size = map_res(digit1, |digits: &str| digits.parse::<usize>());
    map(
        pair(delimited(char('['), ws(size), char(']')), type_expr),
        |(size, elem)| TypeExpr::array_of(size, elem),
    )(input)
}

fn map_type(input: &str) -> IResult<&str, TypeExpr> {
    map(
        tuple((tag("map["), type_expr, char(']'), type_expr)),
        |(_, key, _, value)| TypeExpr::map_of(key, value),
    )(input)
}

fn pointer_type(input: &str) -> IResult<&str, TypeExpr> {
    map(preceded(char('*'), type_expr), TypeExpr::pointer_to)(input)
}

fn type_list(input: &str) -> IResult<&str, Vec<TypeExpr>> {
    delimited(
        ws(char('(')),
        separated_list0(char(','), type_expr),
        char(')'),
    )(input)
}

fn func_type(input: &str) -> IResult<&str, TypeExpr> {
    let (input, _) = tag("func")(input)?;
    let (input, params) = type_list(input)?;
    let (input, returns) = opt(alt((type_list, map(type_expr, |ty| vec![ty]))))(input)?;
    Ok((
        input,
        TypeExpr::Func(Signature::new(params, returns.unwrap_or_default())),
    ))
}
