// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{anyhow, bail, Result};
use authexpr::{unstable::*, ParserOptions};
use serde::{Deserialize, Serialize};
use test_generator::test_resources;

macro_rules! my_assert_eq {
    ($left:expr, $right:expr, $($arg:tt)+) => {
	match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
		    return Err(anyhow!("mismatch:\nleft  = {}\nright = {}\n{}",
		     		       &$left, &$right, format_args!($($arg)+)));
                }
            }
	}
    }
}

/// Expected tree as written in yaml:
/// a plain string is a label, `and:`/`or:` hold child lists.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(untagged)]
enum Tree {
    Label(String),
    And { and: Vec<Tree> },
    Or { or: Vec<Tree> },
}

fn match_expr(e: &Expr, t: &Tree) -> Result<()> {
    match (e, t) {
        (Expr::AccessToken(l), Tree::Label(tl)) => {
            my_assert_eq!(l, tl, "label mismatch");
        }
        (Expr::And(children), Tree::And { and: expected })
        | (Expr::Or(children), Tree::Or { or: expected }) => {
            my_assert_eq!(
                children.len(),
                expected.len(),
                "mismatch in number of children of `{e}`"
            );
            for (c, ec) in children.iter().zip(expected.iter()) {
                match_expr(c, ec)?;
            }
        }
        _ => bail!("expression `{e}` does not match {t:?}"),
    }
    Ok(())
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Case {
    pub note: String,
    pub expression: String,
    pub tree: Option<Tree>,
    pub rendered: Option<String>,
    pub options: Option<ParserOptions>,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Test {
    cases: Vec<Case>,
}

fn yaml_test_impl(file: &str) -> Result<()> {
    println!("\nrunning {}", file);

    let yaml = std::fs::read_to_string(file)?;
    let test: Test = serde_yaml::from_str(&yaml)?;

    for case in &test.cases {
        print!("case {} ", &case.note);
        let source = Source::new("case.expr".to_owned(), case.expression.clone());
        let parser = Parser::with_options(&source, case.options.unwrap_or_default());

        match (parser.parse(), &case.error) {
            (Ok(expr), None) => {
                if let Some(tree) = &case.tree {
                    match_expr(&expr, tree)?;
                }
                if let Some(rendered) = &case.rendered {
                    my_assert_eq!(expr.to_string(), *rendered, "rendering mismatch");
                }
            }
            (Ok(expr), Some(expected)) => {
                bail!("expected error `{expected}`, parsed `{expr}`")
            }
            (Err(actual), Some(expected)) => {
                let actual = source.error(&actual).to_string();
                if !actual.contains(expected.as_str()) {
                    bail!(
                        "Error message\n`{}\n`\ndoes not contain `{}`",
                        actual,
                        expected
                    );
                }
            }
            (Err(actual), None) => return Err(source.error(&actual)),
        }

        println!("passed");
    }
    println!("{} cases passed.", test.cases.len());
    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test]
fn deep_nesting_uses_no_recursion_limit() -> Result<()> {
    let depth = 10_000;
    let expr = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
    let source = Source::new("deep.expr".to_owned(), expr);
    let parsed = Parser::new(&source).parse()?;
    assert_eq!(parsed, Expr::AccessToken("a".to_owned()));
    Ok(())
}

#[test]
fn deeply_nested_groups() -> Result<()> {
    let depth = 200_000;
    let expr = format!("{}a{}", "(a & ".repeat(depth), ")".repeat(depth));
    let source = Source::new("deep.expr".to_owned(), expr);
    let parsed = Parser::new(&source).parse()?;

    // Each level holds the nested group first, then its own label.
    let mut levels = 0;
    let mut node = &parsed;
    while let Expr::And(children) = node {
        my_assert_eq!(children.len(), 2, "at level {levels}");
        my_assert_eq!(children[1], Expr::AccessToken("a".to_owned()), "at level {levels}");
        node = &children[0];
        levels += 1;
    }
    assert_eq!(levels, depth);
    assert!(parsed.evaluate(&["a"][..]));
    assert!(!parsed.evaluate(&["b"][..]));
    Ok(())
}

#[test_resources("tests/parser/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
