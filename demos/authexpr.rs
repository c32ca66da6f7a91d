// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use authexpr::unstable::{Lexer, Parser, Source, TokenKind};
use authexpr::{build_label_set, EscapeMode, ParserOptions};
use clap::{Args, Parser as ClapParser, Subcommand};

#[derive(Args)]
struct OptionArgs {
    /// Reject invalid escapes and unterminated strings.
    #[arg(long)]
    strict: bool,

    /// Maximum parenthesis nesting.
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Parser options file. json or yaml.
    #[arg(long, value_name = "options.json|options.yaml")]
    options: Option<String>,
}

impl OptionArgs {
    fn load(&self) -> Result<ParserOptions> {
        let mut options = match &self.options {
            Some(file) => {
                let contents = std::fs::read_to_string(file)
                    .with_context(|| format!("Failed to read {file}"))?;
                if file.ends_with(".json") {
                    serde_json::from_str(&contents)?
                } else if file.ends_with(".yaml") {
                    serde_yaml::from_str(&contents)?
                } else {
                    bail!("Unsupported options file `{file}`. Must be json or yaml.")
                }
            }
            None => ParserOptions::default(),
        };

        if self.strict {
            options = options.with_escape_mode(EscapeMode::Strict);
        }
        if self.max_depth.is_some() {
            options = options.with_max_depth(self.max_depth);
        }
        Ok(options)
    }
}

fn expr_lex(expression: String, options: ParserOptions, verbose: bool) -> Result<()> {
    let source = Source::new("<expression>".to_owned(), expression);

    // Create lexer.
    let mut lexer = Lexer::with_escape_mode(&source, options.escape_mode);

    // Read tokens until EOF.
    loop {
        let token = lexer.next_token().map_err(|e| source.error(&e))?;
        if token.0 == TokenKind::Eof {
            break;
        }

        if verbose {
            // Print each token's line and mark with with ^.
            println!("{}", token.1.message("", ""));
        }

        // Print the token.
        println!("{token:?}");
    }
    Ok(())
}

fn expr_parse(expression: String, options: ParserOptions, json: bool) -> Result<()> {
    let source = Source::new("<expression>".to_owned(), expression);
    let ast = Parser::with_options(&source, options)
        .parse()
        .map_err(|e| source.error(&e))?;

    if json {
        #[cfg(feature = "ast")]
        {
            println!("{}", ast.to_json_str()?);
            return Ok(());
        }
        #[cfg(not(feature = "ast"))]
        bail!("--json requires the `ast` feature");
    }

    println!("{ast}");
    println!("{ast:#?}");
    Ok(())
}

fn expr_check(expression: String, labels: String, options: ParserOptions) -> Result<bool> {
    let source = Source::new("<expression>".to_owned(), expression);
    let ast = Parser::with_options(&source, options)
        .parse()
        .map_err(|e| source.error(&e))?;

    let labels = build_label_set(&labels);
    log::info!("granted labels: {:?}", labels.keys().collect::<Vec<_>>());
    Ok(ast.evaluate(&labels))
}

#[derive(Subcommand)]
enum ExprCommand {
    /// Tokenize an expression.
    Lex {
        /// Authorization expression.
        expression: String,

        /// Verbose output.
        #[arg(long, short)]
        verbose: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Parse an expression and print its tree.
    Parse {
        /// Authorization expression.
        expression: String,

        /// Print the tree as json.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Check whether a set of labels satisfies an expression.
    Check {
        /// Authorization expression.
        expression: String,

        /// Comma separated granted labels.
        #[arg(long, short, value_name = "label1,label2")]
        labels: String,

        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: ExprCommand,
}

fn main() -> Result<()> {
    env_logger::init();
    log::debug!(
        "authexpr {} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_HASH").unwrap_or("unknown")
    );

    // Parse and dispatch command.
    let cli = Cli::parse();
    match cli.command {
        ExprCommand::Lex {
            expression,
            verbose,
            options,
        } => expr_lex(expression, options.load()?, verbose),
        ExprCommand::Parse {
            expression,
            json,
            options,
        } => expr_parse(expression, options.load()?, json),
        ExprCommand::Check {
            expression,
            labels,
            options,
        } => {
            let allowed = expr_check(expression, labels, options.load()?)?;
            println!("{}", if allowed { "allow" } else { "deny" });
            if !allowed {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
