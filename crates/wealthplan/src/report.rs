//! Plain-text tables for terminal output

use wealthplan_core::allocation::RecommendedAllocation;
use wealthplan_core::model::{
    Currency, ExpenseBreakdown, MonteCarloSummary, ProjectionWarning, SegmentOutcome, YearRecord,
};
use wealthplan_core::risk::RiskOutcome;
use wealthplan_core::Projection;

use crate::util::format::{format_brl, format_brl_short, format_percentage, format_usd};

/// Which bucket values a projection table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valuation {
    Nominal,
    Real,
}

fn money(value: f64, currency: Currency) -> String {
    match currency {
        Currency::Brl => format_brl(value),
        Currency::Usd => format_usd(value),
    }
}

fn year_label(record: &YearRecord) -> String {
    record
        .calendar_year
        .map_or_else(|| record.year.to_string(), |y| y.to_string())
}

fn row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths.iter().copied()).enumerate() {
        if i == 0 {
            line.push_str(&format!("{cell:<width$}"));
        } else {
            line.push_str(&format!("  {cell:>width$}"));
        }
    }
    line.trim_end().to_string()
}

/// Render a table with right-aligned numeric columns sized to their content
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for r in rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let head: Vec<String> = header.iter().map(|h| (*h).to_string()).collect();
    let mut out = row(&head, &widths);
    out.push('\n');
    let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');
    for r in rows {
        out.push_str(&row(r, &widths));
        out.push('\n');
    }
    out
}

pub fn projection_table(projection: &Projection, valuation: Valuation) -> String {
    let rows: Vec<Vec<String>> = projection
        .records
        .iter()
        .map(|r| {
            let buckets = match valuation {
                Valuation::Nominal => r.nominal,
                Valuation::Real => r.real,
            };
            vec![
                year_label(r),
                r.client_age.to_string(),
                format_brl_short(r.expenses.total_brl),
                format_brl_short(r.incomes.total),
                format_brl_short(r.net_cash_flow),
                format_brl_short(buckets.reserve),
                format_brl_short(buckets.liquid),
                format_brl_short(buckets.illiquid),
                format_brl_short(buckets.total),
            ]
        })
        .collect();
    table(
        &[
            "Year", "Age", "Expenses", "Incomes", "Net", "Reserve", "Liquid", "Illiquid", "Total",
        ],
        &rows,
    )
}

/// Cash-flow statement: where each year's change in wealth came from
pub fn cash_flow_table(projection: &Projection) -> String {
    let rows: Vec<Vec<String>> = projection
        .records
        .iter()
        .map(|r| {
            vec![
                year_label(r),
                format_brl_short(r.net_cash_flow),
                format_brl_short(r.financial_return),
                format_brl_short(r.illiquid_appreciation),
                format_brl_short(r.total_growth),
                format_brl_short(r.expenses.brl_only),
                format_brl_short(r.expenses.usd_converted),
            ]
        })
        .collect();
    table(
        &[
            "Year",
            "Net cash",
            "Fin. return",
            "Illiquid appr.",
            "Growth",
            "BRL spend",
            "USD spend (BRL)",
        ],
        &rows,
    )
}

pub fn expense_table(expenses: &ExpenseBreakdown) -> String {
    let mut rows: Vec<Vec<String>> = expenses
        .items
        .iter()
        .map(|item| {
            let currency = item.category.currency();
            vec![
                item.category.label().to_string(),
                currency.code().to_string(),
                money(item.native, currency),
                format_brl(item.brl),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".to_string(),
        String::new(),
        format_usd(expenses.total_usd),
        format_brl(expenses.total_brl),
    ]);
    table(&["Category", "Cur", "Native", "BRL"], &rows)
}

pub fn allocation_table(allocation: &RecommendedAllocation) -> String {
    let rows: Vec<Vec<String>> = allocation
        .domestic
        .iter()
        .map(|c| (c, Currency::Brl))
        .chain(allocation.international.iter().map(|c| (c, Currency::Usd)))
        .map(|(c, currency)| {
            vec![
                c.name.clone(),
                format!("{:.1}%", c.weight_pct),
                money(c.amount, currency),
            ]
        })
        .collect();
    let mut out = table(&["Asset class", "Weight", "Amount"], &rows);
    out.push_str(&format!(
        "Domestic {}  International {}\n",
        format_brl(allocation.domestic_total_brl),
        format_usd(allocation.international_total_usd)
    ));
    out
}

pub fn risk_summary(outcome: &RiskOutcome) -> String {
    let [loss, horizon, objective] = outcome.adjustments;
    format!(
        "Adaptive score {}  adjustments {loss:+} {horizon:+} {objective:+}\nFinal score {} ({})\n",
        outcome.adaptive_score,
        outcome.score.value(),
        outcome.profile.label()
    )
}

pub fn percentile_table(summary: &MonteCarloSummary) -> String {
    let rows: Vec<Vec<String>> = summary
        .bands
        .iter()
        .map(|b| {
            vec![
                b.year.to_string(),
                format_brl_short(b.p10),
                format_brl_short(b.p50),
                format_brl_short(b.p90),
            ]
        })
        .collect();
    let mut out = format!(
        "{} paths, seed {}, return {} / volatility {}\n",
        summary.paths,
        summary.seed,
        format_percentage(summary.expected_return),
        format_percentage(summary.volatility)
    );
    out.push_str(&table(&["Year", "P10", "P50", "P90"], &rows));
    out
}

pub fn segment_table(segment: &SegmentOutcome) -> String {
    let rows: Vec<Vec<String>> = segment
        .bands
        .iter()
        .zip(&segment.benchmark)
        .map(|(b, bench)| {
            vec![
                b.year.to_string(),
                money(b.p10, segment.currency),
                money(b.p50, segment.currency),
                money(b.p90, segment.currency),
                money(*bench, segment.currency),
            ]
        })
        .collect();
    let mut out = format!(
        "{} segment from {}, benchmark {}\n",
        segment.currency.code(),
        money(segment.initial_value, segment.currency),
        format_percentage(segment.benchmark_rate)
    );
    out.push_str(&table(&["Year", "P10", "P50", "P90", "Benchmark"], &rows));
    out
}

pub fn warnings(warnings: &[ProjectionWarning]) -> String {
    warnings.iter().map(|w| format!("warning: {w}\n")).collect()
}
