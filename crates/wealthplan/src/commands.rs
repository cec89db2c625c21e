//! Subcommand implementations
//!
//! Each command renders its output into a `String` so `main` only decides
//! where it goes.

use std::io::{BufRead, Write};
use std::path::Path;

use color_eyre::eyre::{Context, bail};
use serde::Serialize;
use wealthplan_core::expenses::baseline_costs;
use wealthplan_core::incomes::SalarySource;
use wealthplan_core::rates::profile_returns;
use wealthplan_core::risk::{
    ADAPTIVE_ROUNDS, BehavioralAnswers, InvestmentHorizon, InvestmentObjective, LossReaction,
    RiskAssessment, RiskOutcome,
};
use wealthplan_core::{
    MonteCarloConfig, Projection, ProjectionInput, StepFrequency, project, simulate_liquid,
    simulate_segments,
};

use crate::data::{HouseholdFile, PreparedRun};
use crate::report::{self, Valuation};
use crate::util::format::format_brl;
use crate::util::io::atomic_write;

#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub real: bool,
    pub cash_flow: bool,
    pub json: Option<std::path::PathBuf>,
}

/// Overrides applied on top of the file's `simulation` section
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulateOptions {
    pub paths: Option<usize>,
    pub years: Option<usize>,
    pub seed: Option<u64>,
    pub monthly: bool,
    pub segments: bool,
}

impl SimulateOptions {
    fn apply(&self, base: MonteCarloConfig) -> MonteCarloConfig {
        MonteCarloConfig {
            paths: self.paths.unwrap_or(base.paths),
            years: self.years.unwrap_or(base.years),
            seed: self.seed.unwrap_or(base.seed),
            step: if self.monthly {
                StepFrequency::Monthly
            } else {
                base.step
            },
        }
    }
}

/// Full result written by `project --json`
#[derive(Debug, Serialize)]
struct ProjectionExport<'a> {
    input: &'a ProjectionInput,
    risk_assessment: Option<&'a RiskOutcome>,
    projection: &'a Projection,
}

fn load_run(path: &Path) -> color_eyre::Result<PreparedRun> {
    let file = HouseholdFile::load(path)?;
    let run = file
        .prepare()
        .wrap_err_with(|| format!("preparing {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        horizon = run.input.household.horizon_years,
        children = run.input.household.children.len(),
        "household file loaded"
    );
    if let Some(outcome) = &run.risk {
        tracing::info!(
            adaptive = outcome.adaptive_score,
            score = outcome.score.value(),
            profile = outcome.profile.label(),
            "risk assessment finalized"
        );
    }
    Ok(run)
}

fn run_projection(run: &PreparedRun) -> color_eyre::Result<Projection> {
    let projection = project(&run.input)?;
    let last = projection.final_record().map(|r| r.nominal.total);
    tracing::info!(
        years = projection.records.len(),
        profile = projection.profile.label(),
        final_total = last.unwrap_or_default(),
        "projection finished"
    );
    for warning in &projection.warnings {
        tracing::warn!(%warning, "projection warning");
    }
    Ok(projection)
}

fn salary_line(run: &PreparedRun) -> String {
    let source = match run.input.salary.source {
        SalarySource::User => "client",
        SalarySource::Estimator => "market table",
        SalarySource::Fallback => "fallback",
        SalarySource::Missing => "missing",
    };
    format!(
        "Salary {} ({source})\n",
        format_brl(run.input.salary.amount)
    )
}

pub fn project_command(path: &Path, options: &ProjectOptions) -> color_eyre::Result<String> {
    let run = load_run(path)?;
    let projection = run_projection(&run)?;

    let mut out = String::new();
    if let Some(outcome) = &run.risk {
        out.push_str(&report::risk_summary(outcome));
    }
    out.push_str(&format!(
        "Profile {} (score {})\n",
        projection.profile.label(),
        projection.risk.value()
    ));
    out.push_str(&salary_line(&run));
    out.push('\n');

    let valuation = if options.real {
        Valuation::Real
    } else {
        Valuation::Nominal
    };
    out.push_str(&report::projection_table(&projection, valuation));
    if options.cash_flow {
        out.push('\n');
        out.push_str(&report::cash_flow_table(&projection));
    }
    out.push('\n');
    out.push_str(&report::allocation_table(&projection.allocation));
    out.push_str(&report::warnings(&projection.warnings));

    if let Some(json_path) = &options.json {
        let export = ProjectionExport {
            input: &run.input,
            risk_assessment: run.risk.as_ref(),
            projection: &projection,
        };
        let content = serde_json::to_string_pretty(&export)?;
        atomic_write(json_path, &content)
            .wrap_err_with(|| format!("writing {}", json_path.display()))?;
        tracing::info!(path = %json_path.display(), "projection exported");
        out.push_str(&format!("Exported to {}\n", json_path.display()));
    }

    Ok(out)
}

pub fn baseline_command(path: &Path) -> color_eyre::Result<String> {
    let file = HouseholdFile::load(path)?;
    let profile = file.profile()?;
    let baseline = baseline_costs(&profile, &file.premises);

    let mut out = String::from("Year-0 costs at scale 1.0\n");
    out.push_str(&report::expense_table(&baseline));

    if !file.targets.is_empty() {
        let scales = file.resolved_scales(&profile)?;
        out.push_str("\nScales from targets\n");
        for category in file.targets.keys() {
            out.push_str(&format!(
                "{:<24}{:.3}\n",
                category.label(),
                scales.get(*category)
            ));
        }
    }
    Ok(out)
}

/// Replay the questionnaire from a household file, showing each scenario
pub fn risk_command(path: &Path) -> color_eyre::Result<String> {
    let file = HouseholdFile::load(path)?;
    if let Some(score) = file.risk.score {
        return Ok(format!("Score {score} given directly; no questionnaire to replay\n"));
    }
    let Some(behavior) = file.risk.behavior else {
        bail!("{} has no risk answers or behavior section", path.display());
    };

    let mut out = String::new();
    let mut state = RiskAssessment::new();
    for (round, &comfortable) in file.risk.answers.iter().enumerate() {
        let scenario = state.next_scenario().rounded();
        out.push_str(&format!(
            "Round {}: lose {:.1}% / gain {:.1}% -> {}\n",
            round + 1,
            scenario.loss_pct,
            scenario.gain_pct,
            if comfortable { "yes" } else { "no" }
        ));
        state = state.answer(comfortable)?;
    }
    let outcome = state.finalize(&behavior)?;
    tracing::info!(score = outcome.score.value(), "risk assessment finalized");
    out.push_str(&report::risk_summary(&outcome));
    Ok(out)
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> color_eyre::Result<String> {
    write!(output, "{question} ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input ended before the questionnaire was complete");
    }
    Ok(line.trim().to_lowercase())
}

fn ask_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> color_eyre::Result<bool> {
    loop {
        match prompt(input, output, question)?.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}

fn ask_choice<R: BufRead, W: Write, T: Copy>(
    input: &mut R,
    output: &mut W,
    question: &str,
    options: [(&str, T); 4],
) -> color_eyre::Result<T> {
    writeln!(output, "{question}")?;
    for (i, (label, _)) in options.iter().enumerate() {
        writeln!(output, "  {}) {label}", i + 1)?;
    }
    loop {
        let answer = prompt(input, output, ">")?;
        if let Ok(n) = answer.parse::<usize>()
            && let Some((_, value)) = options.get(n.wrapping_sub(1))
        {
            return Ok(*value);
        }
        writeln!(output, "Please pick 1-4.")?;
    }
}

/// Run the questionnaire against a terminal (or any reader/writer pair)
pub fn interactive_risk<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> color_eyre::Result<RiskOutcome> {
    let mut state = RiskAssessment::new();
    for round in 1..=ADAPTIVE_ROUNDS {
        let scenario = state.next_scenario().rounded();
        let question = format!(
            "[{round}/{ADAPTIVE_ROUNDS}] In one year your portfolio could lose {:.1}% or gain {:.1}%. Comfortable? (y/n)",
            scenario.loss_pct, scenario.gain_pct
        );
        let comfortable = ask_yes_no(input, output, &question)?;
        state = state.answer(comfortable)?;
    }

    let loss_reaction = ask_choice(
        input,
        output,
        "If your portfolio dropped 20% in a month you would:",
        [
            ("sell everything", LossReaction::SellAll),
            ("sell part of it", LossReaction::SellPart),
            ("hold", LossReaction::Hold),
            ("buy more", LossReaction::BuyMore),
        ],
    )?;
    let horizon = ask_choice(
        input,
        output,
        "When will you need most of this money?",
        [
            ("within a year", InvestmentHorizon::UpToOneYear),
            ("in one to three years", InvestmentHorizon::OneToThreeYears),
            ("in three to five years", InvestmentHorizon::ThreeToFiveYears),
            ("in more than five years", InvestmentHorizon::OverFiveYears),
        ],
    )?;
    let objective = ask_choice(
        input,
        output,
        "Your main objective is to:",
        [
            ("preserve capital", InvestmentObjective::PreserveCapital),
            ("beat inflation", InvestmentObjective::BeatInflation),
            ("balance growth and safety", InvestmentObjective::Balanced),
            ("maximize growth", InvestmentObjective::MaximizeGrowth),
        ],
    )?;

    let outcome = state.finalize(&BehavioralAnswers {
        loss_reaction,
        horizon,
        objective,
    })?;
    tracing::info!(score = outcome.score.value(), "interactive risk assessment finalized");
    Ok(outcome)
}

pub fn simulate_command(path: &Path, options: &SimulateOptions) -> color_eyre::Result<String> {
    let run = load_run(path)?;
    let projection = run_projection(&run)?;
    let config = options.apply(run.simulation);
    let liquid = projection.initial_liquid();
    let premises = &run.input.premises;

    let dist = profile_returns(&premises.portfolios, projection.profile);
    let summary = simulate_liquid(liquid, dist, &config)?;
    tracing::info!(
        paths = config.paths,
        years = config.years,
        seed = config.seed,
        "liquid simulation finished"
    );

    let mut out = format!(
        "Liquid bucket {} ({} profile)\n",
        format_brl(liquid),
        projection.profile.label()
    );
    out.push_str(&report::percentile_table(&summary));

    if options.segments {
        let exchange_rate = projection
            .records
            .first()
            .map_or(run.input.household.macro_assumptions.exchange_rate, |r| r.exchange_rate);
        let segments = simulate_segments(
            liquid,
            exchange_rate,
            &projection.portfolio,
            &premises.benchmarks,
            &config,
        )?;
        tracing::info!(paths = config.paths, "segment simulation finished");
        out.push('\n');
        out.push_str(&report::segment_table(&segments.domestic));
        out.push('\n');
        out.push_str(&report::segment_table(&segments.international));
    }
    Ok(out)
}
