use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};
use tinyrand::{Seeded, StdRand};
use tracing::{debug, info};

use hatsim::composition::Composition;
use hatsim::hypergeom;
use hatsim::scenario::Scenario;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the scenario from
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// balls in the hat, e.g. red=5,blue=2
    #[clap(short = 'b', long)]
    balls: Option<Composition>,

    /// minimum number of balls of each label that must be drawn, e.g. red=2
    #[clap(short = 'e', long)]
    expect: Option<Composition>,

    /// number of balls drawn in each trial
    #[clap(short = 'd', long)]
    draws: Option<usize>,

    /// number of trials
    #[clap(short = 't', long)]
    trials: Option<u64>,

    /// seed for the random number generator
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// run the trials on all cores
    #[clap(short = 'p', long)]
    parallel: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        let flagged = self.balls.is_some()
            || self.expect.is_some()
            || self.draws.is_some()
            || self.trials.is_some();
        if self.file.is_none() && !flagged || self.file.is_some() && flagged {
            bail!("either the -f flag or the scenario flags (-b, -e, -d, -t) must be specified");
        }
        Ok(())
    }

    fn scenario(&self) -> anyhow::Result<Scenario> {
        let mut scenario = match &self.file {
            Some(file) => Scenario::read_json_file(file)?,
            None => Scenario {
                hat: self
                    .balls
                    .clone()
                    .ok_or(anyhow!("the balls in the hat must be specified"))?,
                expected: self.expect.clone().unwrap_or_default(),
                draws: self
                    .draws
                    .ok_or(anyhow!("the number of draws must be specified"))?,
                trials: self
                    .trials
                    .ok_or(anyhow!("the number of trials must be specified"))?,
                seed: None,
            },
        };
        if self.seed.is_some() {
            scenario.seed = self.seed;
        }
        Ok(scenario)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let scenario = args.scenario()?;
    let seed = match scenario.seed {
        Some(seed) => seed,
        None => clock_seed()?,
    };
    debug!("scenario: {scenario:?}, seed: {seed}");
    info!("composition:\n{}", Console::default().render(&tabulate(&scenario)));

    let hat = scenario.hat();
    let engine = scenario.experiment();
    let start_time = Instant::now();
    let frac = if args.parallel {
        engine.simulate_par(&hat, seed)?
    } else {
        engine.simulate(&hat, &mut StdRand::seed(seed))?
    };
    let elapsed = start_time.elapsed();
    let exact = hypergeom::probability(&scenario.hat, &scenario.expected, scenario.draws);
    info!(
        "drew {} of {} balls in {} trials in {}s",
        scenario.draws,
        hat.len(),
        frac.denominator,
        elapsed.as_millis() as f64 / 1_000.
    );
    info!(
        "probability: {:.6} ({frac}), std error: {:.6}, exact: {exact:.6}, departure: {:.6}",
        frac.quotient(),
        frac.std_error(),
        frac.quotient() - exact
    );

    Ok(())
}

fn clock_seed() -> anyhow::Result<u64> {
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(since_epoch.as_nanos() as u64)
}

fn tabulate(scenario: &Scenario) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(10))),
            Col::new(Styles::default().with(MinWidth(8))),
            Col::new(Styles::default().with(MinWidth(8))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Label".into(), "In hat".into(), "Expected".into()],
        ));

    let mut labels: Vec<_> = scenario.hat.entries().iter().map(|entry| &entry.label).collect();
    labels.extend(
        scenario
            .expected
            .entries()
            .iter()
            .map(|entry| &entry.label)
            .filter(|&label| scenario.hat.position(label).is_none()),
    );
    table.push_rows(labels.into_iter().map(|label| {
        Row::new(
            Styles::default().with(HAlign::Right),
            vec![
                label.clone().into(),
                format!("{}", scenario.hat.count(label)).into(),
                format!("{}", scenario.expected.count(label)).into(),
            ],
        )
    }));
    table
}
