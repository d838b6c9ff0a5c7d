use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mars_lander::io::{csv, json};
use mars_lander::orbital::OrbitSummary;
use mars_lander::scenario;
use mars_lander::sim::{FlightStatus, IntegratorKind, SimulationContext};
use mars_lander::SimConfig;

#[derive(Parser, Debug)]
#[command(name = "mars-lander")]
#[command(about = "Fixed-step Mars lander simulator with a descent autopilot")]
#[command(version)]
struct Args {
    /// Scenario index (0-9)
    #[arg(short, long, default_value_t = 1)]
    scenario: usize,

    /// TOML config file; missing keys use the built-in Mars defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Integration scheme
    #[arg(short, long, value_enum)]
    integrator: Option<IntegratorKind>,

    /// Force the autopilot on
    #[arg(long, conflicts_with = "no_autopilot")]
    autopilot: bool,

    /// Force the autopilot off
    #[arg(long)]
    no_autopilot: bool,

    /// Stop after this much simulated time (s)
    #[arg(long)]
    max_time: Option<f64>,

    /// Autopilot telemetry file
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Do not write autopilot telemetry
    #[arg(long, conflicts_with = "telemetry")]
    no_telemetry: bool,

    /// Write the full trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write a JSON landing summary
    #[arg(long)]
    json: Option<PathBuf>,

    /// List the canned scenarios and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(kind) = args.integrator {
        config.sim.integrator = kind;
    }
    if let Some(t) = args.max_time {
        config.sim.max_time = t;
    }
    if let Some(path) = &args.telemetry {
        config.sim.telemetry_path = Some(path.clone());
    }
    if args.no_telemetry {
        config.sim.telemetry_path = None;
    }

    if args.list {
        for sc in scenario::all(&config.planet, &config.lander) {
            println!("  {}  {}", sc.index, sc.description);
        }
        return Ok(());
    }

    let mut sc = scenario::scenario(args.scenario, &config.planet, &config.lander)?;
    if args.autopilot {
        sc.autopilot_enabled = true;
    }
    if args.no_autopilot {
        sc.autopilot_enabled = false;
    }

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let mut ctx = SimulationContext::new(&sc, config.clone())?;
    let integrator = ctx.integrator_name().to_string();
    let controller = ctx.controller_name().unwrap_or("manual").to_string();
    let record = ctx.run()?;

    let summary = json::FlightSummary::from_record(&record, &config.lander)
        .context("simulation produced no trajectory")?;
    let initial = record.trajectory.first().context("simulation produced no trajectory")?;
    let orbit = OrbitSummary::from_state(&initial.state.position, &initial.state.velocity, &config.planet);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  MARS LANDER — scenario {}: {}", sc.index, sc.description);
    println!("====================================================================");
    println!();
    println!("  Setup");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Integrator:    {:>8}       Controller:   {:>8}",
        integrator, controller
    );
    println!(
        "  Timestep:      {:>8.3} s     Max time:     {:>8.0} s",
        config.sim.dt, config.sim.max_time
    );
    println!(
        "  Kh / Kp / δ:   {:>5.3} / {:.2} / {:.2}",
        config.autopilot.kh, config.autopilot.kp, config.autopilot.deadband
    );
    println!(
        "  Start alt:     {:>8.0} m     Periapsis:    {:>8.0} m",
        initial.altitude, orbit.periapsis_altitude
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for ev in &record.events {
        println!(
            "  t={:>8.1}s   alt={:>9.0}m   vel={:>8.1}m/s   {:?}",
            ev.time,
            ev.point.altitude,
            ev.point.state.velocity.norm(),
            ev.kind
        );
    }
    println!();

    println!("  Outcome");
    println!("  ──────────────────────────────────────────────────────────────────");
    let verdict = match summary.status {
        FlightStatus::Landed => "LANDED",
        FlightStatus::Crashed => "CRASHED",
        FlightStatus::Flying => "STILL FLYING",
    };
    println!("  Result:        {}", verdict);
    println!("  Flight time:   {:>8.1} s", summary.flight_time);
    println!("  Max altitude:  {:>8.0} m", summary.max_altitude);
    println!("  Max speed:     {:>8.1} m/s", summary.max_speed);
    println!(
        "  Descent rate:  {:>8.2} m/s   Ground speed: {:>8.2} m/s",
        summary.descent_rate, summary.ground_speed
    );
    println!(
        "  Fuel used:     {:>8.1} kg    Parachute:    {}",
        summary.fuel_used_kg, summary.parachute
    );
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>10}  {:>9}  {:>8}  {:>6}  {:>6}",
        "t (s)", "alt (m)", "vr (m/s)", "speed", "fuel", "thr"
    );
    println!("  {}", "─".repeat(60));

    let sample_interval = (record.trajectory.len() / 30).max(1);
    for (i, p) in record.trajectory.iter().enumerate() {
        if i % sample_interval != 0 && i != record.trajectory.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.1}  {:>10.1}  {:>9.2}  {:>8.1}  {:>6.3}  {:>6.3}",
            p.time,
            p.altitude,
            p.state.radial_velocity(),
            p.state.velocity.norm(),
            p.state.fuel,
            p.throttle
        );
    }
    println!();
    println!(
        "  Simulation: {} steps, dt={} s",
        ctx.clock().ticks(),
        config.sim.dt
    );
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, &record.trajectory)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "trajectory written");
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &sc, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "summary written");
    }

    Ok(())
}
