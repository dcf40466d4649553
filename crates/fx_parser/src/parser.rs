use fx_ast::{BinOp, Binding, Expr, UnaryFn};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::multispace0,
    combinator::{map, opt},
    multi::{fold_many0, separated_list1},
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::error::ParseError;

// Parser for numeric literals (integers and decimals).
// Supports: 123, 8.2, .5, 8.
fn parse_number(input: &str) -> IResult<&str, Expr> {
    fn is_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    let (remaining, (int_part, maybe_frac)) = pair(
        take_while(is_digit),
        opt(pair(tag("."), take_while(is_digit))),
    )(input)?;

    let (int_str, frac_str) = match maybe_frac {
        Some((_, frac)) => (int_part, frac),
        None => (int_part, ""),
    };

    // Must have digits somewhere; a lone "." is not a number.
    if int_str.is_empty() && frac_str.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }

    let literal = format!("{}.{}", int_str, frac_str);
    let value: f64 = literal.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;

    Ok((remaining, Expr::num(value)))
}

// Identifiers start with a letter or underscore, then letters, digits,
// underscores.
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    let mut chars = input.chars();
    let first = chars.next();
    if !matches!(first, Some(c) if c.is_ascii_alphabetic() || c == '_') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Alpha,
        )));
    }

    let mut len = first.unwrap().len_utf8();
    for c in chars {
        if c.is_ascii_alphanumeric() || c == '_' {
            len += c.len_utf8();
        } else {
            break;
        }
    }

    Ok((&input[len..], &input[..len]))
}

fn parse_parens(input: &str) -> IResult<&str, Expr> {
    map(
        delimited(
            preceded(multispace0, tag("(")),
            parse_expr,
            preceded(multispace0, tag(")")),
        ),
        Expr::paren,
    )(input)
}

// sqrt(x): a Root node with no index.
fn parse_sqrt(input: &str) -> IResult<&str, Expr> {
    let (input, _) = tag("sqrt")(input)?;
    let (input, radicand) = delimited(
        preceded(multispace0, tag("(")),
        parse_expr,
        preceded(multispace0, tag(")")),
    )(input)?;
    Ok((input, Expr::sqrt(radicand)))
}

// root[n](x)
fn parse_root(input: &str) -> IResult<&str, Expr> {
    let (input, _) = tag("root")(input)?;
    let (input, index) = delimited(
        preceded(multispace0, tag("[")),
        parse_expr,
        preceded(multispace0, tag("]")),
    )(input)?;
    let (input, radicand) = delimited(
        preceded(multispace0, tag("(")),
        parse_expr,
        preceded(multispace0, tag(")")),
    )(input)?;
    Ok((input, Expr::root(radicand, index)))
}

// frac(x)(y)
fn parse_frac(input: &str) -> IResult<&str, Expr> {
    let (input, _) = tag("frac")(input)?;
    let (input, num) = delimited(
        preceded(multispace0, tag("(")),
        parse_expr,
        preceded(multispace0, tag(")")),
    )(input)?;
    let (input, den) = delimited(
        preceded(multispace0, tag("(")),
        parse_expr,
        preceded(multispace0, tag(")")),
    )(input)?;
    Ok((input, Expr::frac(num, den)))
}

// A named unary function: sin(x), acos(x), ...
fn parse_unary_fn(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = parse_identifier(input)?;
    let Some(func) = UnaryFn::from_name(name) else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        )));
    };
    let (rest, arg) = delimited(
        preceded(multispace0, tag("(")),
        parse_expr,
        preceded(multispace0, tag(")")),
    )(rest)?;
    Ok((rest, Expr::unary(func, arg)))
}

// One name=expr binding inside a call's brace list.
fn parse_binding(input: &str) -> IResult<&str, Binding> {
    let (input, name) = preceded(multispace0, parse_identifier)(input)?;
    let (input, _) = preceded(multispace0, tag("="))(input)?;
    let (input, expr) = parse_expr(input)?;
    Ok((input, Binding::new(name, expr)))
}

// $name or $name{a=1; b=x+1}
fn parse_call(input: &str) -> IResult<&str, Expr> {
    let (input, _) = tag("$")(input)?;
    let (input, name) = parse_identifier(input)?;
    let (input, bindings) = opt(delimited(
        preceded(multispace0, tag("{")),
        separated_list1(preceded(multispace0, tag(";")), parse_binding),
        preceded(multispace0, tag("}")),
    ))(input)?;
    Ok((input, Expr::call(name, bindings.unwrap_or_default())))
}

fn parse_variable(input: &str) -> IResult<&str, Expr> {
    map(parse_identifier, Expr::var)(input)
}

fn parse_atom(input: &str) -> IResult<&str, Expr> {
    preceded(
        multispace0,
        alt((
            parse_call,
            parse_number,
            parse_root,
            parse_sqrt,
            parse_frac,
            parse_unary_fn,
            parse_variable,
            parse_parens,
        )),
    )(input)
}

// Postfix factorial binds tightest: x^y! is x^(y!).
fn parse_factorial(input: &str) -> IResult<&str, Expr> {
    let (input, atom) = parse_atom(input)?;
    fold_many0(
        preceded(multispace0, tag("!")),
        move || atom.clone(),
        |acc, _| Expr::factorial(acc),
    )(input)
}

// Power is right associative: 2^3^4 = 2^(3^4).
fn parse_power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = parse_factorial(input)?;

    let caret = preceded(multispace0, tag::<_, _, nom::error::Error<&str>>("^"))(input);
    if let Ok((input, _)) = caret {
        let (input, exp) = parse_power_exponent(input)?;
        Ok((input, Expr::pow(base, exp)))
    } else {
        Ok((input, base))
    }
}

// Exponents allow a sign prefix (x^-2) and recurse for chained powers.
fn parse_power_exponent(input: &str) -> IResult<&str, Expr> {
    preceded(
        multispace0,
        alt((
            map(pair(tag("-"), parse_power_exponent), |(_, expr)| {
                negate(expr)
            }),
            map(pair(tag("+"), parse_power_exponent), |(_, expr)| expr),
            parse_power,
        )),
    )(input)
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Number(n) => Expr::num(-n),
        other => Expr::sub(Expr::num(0.0), other),
    }
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(
            pair(preceded(multispace0, tag("-")), parse_unary),
            |(_, expr)| negate(expr),
        ),
        parse_power,
    ))(input)
}

// Term tier: * / % mod, left associative.
fn parse_term(input: &str) -> IResult<&str, Expr> {
    let (input, init) = parse_unary(input)?;
    fold_many0(
        pair(
            preceded(
                multispace0,
                alt((tag("*"), tag("/"), tag("%"), tag("mod"))),
            ),
            parse_unary,
        ),
        move || init.clone(),
        |acc, (op, val)| match op {
            "*" => Expr::mul(acc, val),
            "/" => Expr::div(acc, val),
            "%" | "mod" => Expr::binary(BinOp::Mod, acc, val),
            _ => unreachable!(),
        },
    )(input)
}

fn parse_expr(input: &str) -> IResult<&str, Expr> {
    let (input, init) = parse_term(input)?;
    fold_many0(
        pair(preceded(multispace0, alt((tag("+"), tag("-")))), parse_term),
        move || init.clone(),
        |acc, (op, val)| match op {
            "+" => Expr::add(acc, val),
            "-" => Expr::sub(acc, val),
            _ => unreachable!(),
        },
    )(input)
}

/// Parse a complete expression; the whole input must be consumed.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let (remaining, expr) =
        parse_expr(input).map_err(|e| ParseError::Syntax(e.to_string()))?;

    let remaining = remaining.trim();
    if !remaining.is_empty() {
        return Err(ParseError::UnconsumedInput(remaining.to_string()));
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse("123").unwrap(), Expr::num(123.0));
        assert_eq!(parse("8.25").unwrap(), Expr::num(8.25));
        assert_eq!(parse(".5").unwrap(), Expr::num(0.5));
        assert_eq!(parse("8.").unwrap(), Expr::num(8.0));
        assert_eq!(parse("-3").unwrap(), Expr::num(-3.0));
        assert!(parse(".").is_err());
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse("1+2*3").unwrap(),
            Expr::add(Expr::num(1.0), Expr::mul(Expr::num(2.0), Expr::num(3.0)))
        );
        assert_eq!(
            parse("1+2^2").unwrap(),
            Expr::add(Expr::num(1.0), Expr::pow(Expr::num(2.0), Expr::num(2.0)))
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(
            parse("2^3^4").unwrap(),
            Expr::pow(Expr::num(2.0), Expr::pow(Expr::num(3.0), Expr::num(4.0)))
        );
    }

    #[test]
    fn negative_exponent() {
        assert_eq!(
            parse("x^-2").unwrap(),
            Expr::pow(Expr::var("x"), Expr::num(-2.0))
        );
    }

    #[test]
    fn parens_are_explicit_nodes() {
        assert_eq!(
            parse("(x^3)/5").unwrap(),
            Expr::div(
                Expr::paren(Expr::pow(Expr::var("x"), Expr::num(3.0))),
                Expr::num(5.0)
            )
        );
    }

    #[test]
    fn roots_and_fractions() {
        assert_eq!(
            parse("sqrt(a^2+b^2)").unwrap(),
            Expr::sqrt(Expr::add(
                Expr::pow(Expr::var("a"), Expr::num(2.0)),
                Expr::pow(Expr::var("b"), Expr::num(2.0))
            ))
        );
        assert_eq!(
            parse("root[3](y)").unwrap(),
            Expr::root(Expr::var("y"), Expr::num(3.0))
        );
        assert_eq!(
            parse("frac(XL)(2*pi*f)").unwrap(),
            Expr::frac(
                Expr::var("XL"),
                Expr::mul(Expr::mul(Expr::num(2.0), Expr::var("pi")), Expr::var("f"))
            )
        );
    }

    #[test]
    fn unary_functions_both_spellings() {
        assert_eq!(
            parse("acos(P/S)").unwrap(),
            Expr::unary(UnaryFn::Acos, Expr::div(Expr::var("P"), Expr::var("S")))
        );
        assert_eq!(parse("arccos(x)").unwrap(), parse("acos(x)").unwrap());
        assert_eq!(
            parse("ln(x)").unwrap(),
            Expr::unary(UnaryFn::Log, Expr::var("x"))
        );
    }

    #[test]
    fn factorial_postfix() {
        assert_eq!(parse("5!").unwrap(), Expr::factorial(Expr::num(5.0)));
        assert_eq!(
            parse("n!!").unwrap(),
            Expr::factorial(Expr::factorial(Expr::var("n")))
        );
        // Factorial binds tighter than power.
        assert_eq!(
            parse("x^y!").unwrap(),
            Expr::pow(Expr::var("x"), Expr::factorial(Expr::var("y")))
        );
    }

    #[test]
    fn modulus_spellings() {
        let expected = Expr::binary(BinOp::Mod, Expr::num(7.0), Expr::num(2.0));
        assert_eq!(parse("7%2").unwrap(), expected);
        assert_eq!(parse("7 mod 2").unwrap(), expected);
    }

    #[test]
    fn calls() {
        assert_eq!(parse("$area").unwrap(), Expr::call("area", vec![]));
        assert_eq!(
            parse("$area{w=3; h=a+1}").unwrap(),
            Expr::call(
                "area",
                vec![
                    Binding::new("w", Expr::num(3.0)),
                    Binding::new("h", Expr::add(Expr::var("a"), Expr::num(1.0))),
                ]
            )
        );
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(parse(" 1 + 2 * x ").unwrap(), parse("1+2*x").unwrap());
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert_eq!(
            parse("1+2 oops()").unwrap_err(),
            ParseError::UnconsumedInput("oops()".to_string())
        );
    }

    #[test]
    fn render_parse_round_trip() {
        for src in [
            "1+2*3",
            "x^2",
            "(x^3)/5",
            "sqrt(a^2+b^2)",
            "root[3](y)",
            "frac(XL)(2*pi*f)",
            "acos(P/S)",
            "5!",
            "7%2",
            "$area{w=3; h=a+1}",
        ] {
            let tree = parse(src).unwrap();
            let rendered = tree.to_string();
            assert_eq!(parse(&rendered).unwrap(), tree, "round trip of {}", src);
        }
    }
}
