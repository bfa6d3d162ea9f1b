use std::fmt::Write;

use factor_core::{Factor, FactorsCard, Rankings, Var};

pub fn render_text(rankings: &Rankings, cards: &[FactorsCard], only: Option<Var>) -> String {
    let mut out = String::new();
    for (var, factors) in rankings.iter() {
        if only.is_some_and(|only| only != var) {
            continue;
        }
        let total = cards
            .iter()
            .find(|card| card.var == var)
            .map(|card| card.display_total.as_str())
            .unwrap_or("-");
        let _ = writeln!(out, "{var} (total {total})");
        if factors.is_empty() {
            let _ = writeln!(out, "  no contributing factors");
        }
        for factor in factors {
            let _ = writeln!(out, "  {}", render_factor(factor));
        }
    }
    out
}

fn render_factor(factor: &Factor) -> String {
    let label = match factor {
        Factor::Project { .. } => "project",
        Factor::Event { .. } => "event",
        Factor::Region { .. } => "region",
        Factor::Process { .. } => "process",
        Factor::Industry { .. } => "industry",
    };
    let amount = match factor.display() {
        Some(display) => display.to_string(),
        None => format!("{:+}", factor.amount()),
    };
    match factor.intensity() {
        Some(intensity) => format!(
            "{label:<8} {:<28} {amount:>10}  [{}] {}",
            factor.name(),
            "*".repeat(intensity.band() as usize),
            intensity.describe()
        ),
        None => format!("{label:<8} {:<28} {amount:>10}", factor.name()),
    }
}
