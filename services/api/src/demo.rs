use crate::cli::{BorrowerArgs, OfferCommand};
use crate::infra::{open_offer_desk, resolve_data_dir};
use credit_desk::error::AppError;
use credit_desk::offers::eligibility;
use credit_desk::offers::{
    BorrowerProfile, JsonFileStore, LenderRating, LoanOffer, OfferDeskService, OfferQuery,
    OfferView, SelectionPreferences,
};
use rust_decimal::Decimal;
use std::path::PathBuf;

struct DemoBorrower {
    profile: BorrowerProfile,
    requested_amount: Decimal,
    term_months: i32,
    preferences: SelectionPreferences,
}

impl DemoBorrower {
    fn query(&self) -> OfferQuery {
        OfferQuery::new(
            self.profile.clone(),
            self.requested_amount,
            self.term_months,
        )
    }
}

fn demo_borrowers() -> Vec<DemoBorrower> {
    vec![
        DemoBorrower {
            profile: BorrowerProfile::new("DEMO1", Decimal::from(50_000), 750)
                .named("John", "Doe"),
            requested_amount: Decimal::from(200_000),
            term_months: 60,
            preferences: SelectionPreferences::default(),
        },
        DemoBorrower {
            profile: BorrowerProfile::new("DEMO2", Decimal::from(60_000), 800)
                .named("Jane", "Smith"),
            requested_amount: Decimal::from(300_000),
            term_months: 60,
            preferences: SelectionPreferences {
                prefer_early_repayment: true,
                prefer_credit_line_increase: true,
            },
        },
    ]
}

pub(crate) fn run_demo(data_dir: Option<PathBuf>) -> Result<(), AppError> {
    let desk = open_offer_desk(resolve_data_dir(data_dir)?);

    println!("Credit desk demo");
    println!("\nLenders");
    for lender in desk.lenders()? {
        println!("- {}", lender_line(&lender));
    }

    render_offers("Catalog", &desk.offers()?);

    for borrower in demo_borrowers() {
        render_borrower(&desk, &borrower)?;
    }

    println!("\nCatalog-wide queries");
    let min_amount = Some(Decimal::from(100_000));
    render_offers(
        "Offers from PrivatBank",
        &desk.select(|engine| engine.select_by_lender("PrivatBank"))?,
    );
    render_offers(
        "Mortgage offers",
        &desk.select(|engine| engine.select_by_kind("MORTGAGE"))?,
    );
    render_offers(
        "Lowest rates between 100000 and 500000",
        &desk.search(|engine| {
            engine.lowest_rate_in_range(min_amount, Some(Decimal::from(500_000)))
        })?,
    );
    render_offers(
        "Best rated lenders from 100000",
        &desk.search(|engine| engine.best_lender_rating(min_amount))?,
    );
    render_offers(
        "Flexible offers from 100000",
        &desk.search(|engine| engine.flexible_offers(min_amount))?,
    );
    render_offers(
        "Early repayment from 100000",
        &desk.search(|engine| engine.with_early_repayment(min_amount))?,
    );
    render_offers(
        "Credit line increase from 100000",
        &desk.search(|engine| engine.with_credit_line_increase(min_amount))?,
    );

    Ok(())
}

fn render_borrower(
    desk: &OfferDeskService<JsonFileStore>,
    borrower: &DemoBorrower,
) -> Result<(), AppError> {
    let query = borrower.query();
    let profile = &borrower.profile;

    println!(
        "\nBorrower {} ({}) | income {} | score {} | asks {} over {} months",
        profile.full_name(),
        profile.id,
        profile
            .monthly_income
            .map(|income| income.to_string())
            .unwrap_or_else(|| "n/a".to_string()),
        profile.credit_score,
        borrower.requested_amount,
        borrower.term_months
    );

    render_offers(
        "Matching offers",
        &desk.search(|engine| engine.matching_offers(&query))?,
    );
    render_offers(
        "Best offers",
        &desk.search(|engine| engine.best_offers(&query))?,
    );
    render_offers("Top 3", &desk.select(|engine| engine.top_n(&query, 3))?);

    let optimal = desk.select(|engine| engine.select_optimal(&query, borrower.preferences))?;
    render_choice(
        &format!(
            "Optimal (early repayment: {}, credit line increase: {})",
            borrower.preferences.prefer_early_repayment,
            borrower.preferences.prefer_credit_line_increase
        ),
        optimal.as_ref(),
    );
    if let Some(offer) = &optimal {
        let decision =
            eligibility::assess(profile, borrower.requested_amount, offer.monthly_payment());
        println!("  Eligibility: {}", decision.summary());
    }

    render_choice(
        "Lowest total payment",
        desk.select(|engine| engine.select_by_lowest_total_payment(&query))?
            .as_ref(),
    );
    render_choice(
        "Lowest monthly payment",
        desk.select(|engine| engine.select_by_lowest_monthly_payment(&query))?
            .as_ref(),
    );

    Ok(())
}

pub(crate) fn run_offer_query(
    data_dir: Option<PathBuf>,
    command: OfferCommand,
) -> Result<(), AppError> {
    let desk = open_offer_desk(resolve_data_dir(data_dir)?);

    match command {
        OfferCommand::List => render_offers("Catalog", &desk.offers()?),
        OfferCommand::Lenders { min_rating } => {
            let lenders = match min_rating {
                Some(min_rating) => desk.lenders_rated_at_least(min_rating)?,
                None => desk.lenders()?,
            };
            if lenders.is_empty() {
                println!("\nLenders: none");
            } else {
                println!("\nLenders");
                for lender in &lenders {
                    println!("- {}", lender_line(lender));
                }
            }
        }
        OfferCommand::Best(args) => {
            let query = borrower_query(&args);
            render_offers(
                "Best offers",
                &desk.search(|engine| engine.best_offers(&query))?,
            );
        }
        OfferCommand::Optimal {
            borrower,
            early_repayment,
            credit_line_increase,
        } => {
            let query = borrower_query(&borrower);
            let preferences = SelectionPreferences {
                prefer_early_repayment: early_repayment,
                prefer_credit_line_increase: credit_line_increase,
            };
            let chosen = desk.select(|engine| engine.select_optimal(&query, preferences))?;
            render_choice("Optimal offer", chosen.as_ref());
        }
        OfferCommand::Lender { name } => render_offers(
            &format!("Offers from {name}"),
            &desk.select(|engine| engine.select_by_lender(&name))?,
        ),
        OfferCommand::Kind { kind } => render_offers(
            &format!("{} offers", kind.to_uppercase()),
            &desk.select(|engine| engine.select_by_kind(&kind))?,
        ),
        OfferCommand::Flexible { min } => render_offers(
            &format!("Flexible offers from {min}"),
            &desk.search(|engine| engine.flexible_offers(Some(min)))?,
        ),
        OfferCommand::Range { min, max } => render_offers(
            &format!("Lowest rates between {min} and {max}"),
            &desk.search(|engine| engine.lowest_rate_in_range(Some(min), Some(max)))?,
        ),
        OfferCommand::TopRated { min } => render_offers(
            &format!("Best rated lenders from {min}"),
            &desk.search(|engine| engine.best_lender_rating(Some(min)))?,
        ),
    }

    Ok(())
}

pub(crate) fn run_save(data_dir: Option<PathBuf>) -> Result<(), AppError> {
    let data_dir = resolve_data_dir(data_dir)?;
    let desk = open_offer_desk(data_dir.clone());
    let saved = desk.persist()?;
    println!(
        "Saved {} lenders and {} offers to {}",
        saved.lenders.len(),
        saved.offers.len(),
        data_dir.display()
    );
    Ok(())
}

fn borrower_query(args: &BorrowerArgs) -> OfferQuery {
    let borrower = BorrowerProfile::new("CLI", args.income, args.credit_score);
    OfferQuery::new(borrower, args.amount, args.term)
}

fn render_offers(title: &str, offers: &[LoanOffer]) {
    if offers.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for view in OfferView::collect(offers) {
        println!("- {}", offer_line(&view));
    }
}

fn render_choice(title: &str, offer: Option<&LoanOffer>) {
    match offer {
        Some(offer) => println!("\n{title}: {}", offer_line(&OfferView::from(offer))),
        None => println!("\n{title}: no eligible offer"),
    }
}

fn lender_line(lender: &LenderRating) -> String {
    format!(
        "{} | licence {} | rating {:.1}",
        lender.name(),
        lender.license_number(),
        lender.rating()
    )
}

fn offer_line(view: &OfferView) -> String {
    let amount = |value: Option<Decimal>| {
        value
            .map(|value| value.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    };

    let mut features = Vec::new();
    if view.early_repayment_allowed {
        features.push("early repayment");
    }
    if view.credit_line_increase_allowed {
        features.push("credit line increase");
    }
    let features = if features.is_empty() {
        String::new()
    } else {
        format!(" | {}", features.join(", "))
    };

    format!(
        "{} | {} | {} ({}) | {} at {}% over {} months | monthly {} | total {} | {}{}",
        view.id,
        view.kind,
        view.lender.as_deref().unwrap_or("unknown lender"),
        view.lender_rating
            .map(|rating| format!("{rating:.1}"))
            .unwrap_or_else(|| "unrated".to_string()),
        amount(view.principal),
        amount(view.interest_rate),
        view.term_months,
        view.payments.monthly,
        view.payments.total,
        view.metric.describe(),
        features
    )
}
