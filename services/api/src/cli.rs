use crate::demo::{run_demo, run_offer_query, run_save};
use crate::infra::parse_decimal;
use crate::server;
use clap::{Args, Parser, Subcommand};
use credit_desk::error::AppError;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Desk",
    about = "Search, compare, and select loan offers from the command line",
    version
)]
struct Cli {
    /// Directory holding lenders.json and offers.json (overrides CREDIT_DESK_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through every search and selection operation for two sample borrowers
    Demo,
    /// Run a single catalog query and print the results
    Offers {
        #[command(subcommand)]
        command: OfferCommand,
    },
    /// Write the current catalog to the data directory
    Save,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[arg(skip)]
    pub(crate) data_dir: Option<PathBuf>,
}

/// Borrower and request shared by the borrower-aware queries.
#[derive(Args, Debug, Clone)]
pub(crate) struct BorrowerArgs {
    /// Net monthly income
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) income: Decimal,
    /// Credit score (conventionally 300-850)
    #[arg(long, default_value_t = 700)]
    pub(crate) credit_score: i32,
    /// Requested loan amount
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) amount: Decimal,
    /// Requested term in months
    #[arg(long)]
    pub(crate) term: i32,
}

#[derive(Subcommand, Debug)]
pub(crate) enum OfferCommand {
    /// Every offer in catalog order
    List,
    /// Registered lenders, optionally only those rated at least --min-rating
    Lenders {
        #[arg(long)]
        min_rating: Option<f64>,
    },
    /// Up to five eligible offers, cheapest rate first
    Best(BorrowerArgs),
    /// The single best eligible offer, honouring feature preferences
    Optimal {
        #[command(flatten)]
        borrower: BorrowerArgs,
        /// Prefer offers that allow early repayment
        #[arg(long)]
        early_repayment: bool,
        /// Prefer offers that allow a credit line increase
        #[arg(long)]
        credit_line_increase: bool,
    },
    /// Offers from one lender, cheapest rate first
    Lender { name: String },
    /// Offers of one kind (consumer, mortgage, car), cheapest rate first
    Kind { kind: String },
    /// Offers with early repayment or a credit line increase
    Flexible {
        #[arg(long, value_parser = parse_decimal)]
        min: Decimal,
    },
    /// Offers with a principal inside the range, cheapest rate first
    Range {
        #[arg(long, value_parser = parse_decimal)]
        min: Decimal,
        #[arg(long, value_parser = parse_decimal)]
        max: Decimal,
    },
    /// Offers from the best rated lenders
    TopRated {
        #[arg(long, value_parser = parse_decimal)]
        min: Decimal,
    },
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir;
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(mut args) => {
            args.data_dir = data_dir;
            server::run(args).await
        }
        Command::Demo => run_demo(data_dir),
        Command::Offers { command } => run_offer_query(data_dir, command),
        Command::Save => run_save(data_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenders_subcommand_takes_an_optional_rating_floor() {
        let cli = Cli::try_parse_from(["credit-desk-api", "offers", "lenders"]).expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Offers {
                command: OfferCommand::Lenders { min_rating: None }
            })
        ));

        let cli = Cli::try_parse_from([
            "credit-desk-api",
            "--data-dir",
            "/tmp/desk",
            "offers",
            "lenders",
            "--min-rating",
            "4.6",
        ])
        .expect("parses");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/desk")));
        match cli.command {
            Some(Command::Offers {
                command: OfferCommand::Lenders { min_rating },
            }) => assert_eq!(min_rating, Some(4.6)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
