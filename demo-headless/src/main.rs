use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use flash_window_core::{
    comparison_table, field_curve, process_map, Environment, GasAtmosphere, GasMixture,
    GeometrySpec, MaterialDatabase, ProcessMapPoint, Scenario, SimulationResult,
    ThresholdAssessment, Torr,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Specimen cross-section
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Foil,
    Wire,
    Tube,
}

/// Flash process window calculator
#[derive(Parser, Debug)]
#[command(name = "flash-window")]
#[command(
    about = "Predict flash onset and loss of cohesion for current-ramped metal specimens",
    long_about = None
)]
struct Args {
    /// Scenario TOML file; other flags override its values
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Material table TOML file (defaults to the built-in metals)
    #[arg(long)]
    materials: Option<PathBuf>,

    /// Material key (Ti, Ni, Cu, Al, Fe, W, Pt, Re)
    #[arg(short, long)]
    material: Option<String>,

    /// Specimen shape
    #[arg(long, value_enum)]
    shape: Option<Shape>,

    /// Foil thickness in µm
    #[arg(long)]
    thickness: Option<f64>,

    /// Foil width in mm
    #[arg(long)]
    width: Option<f64>,

    /// Wire diameter in µm
    #[arg(long)]
    diameter: Option<f64>,

    /// Tube inner diameter in mm
    #[arg(long)]
    inner_diameter: Option<f64>,

    /// Tube wall thickness in µm
    #[arg(long)]
    wall: Option<f64>,

    /// Gauge length in mm
    #[arg(short = 'L', long)]
    gauge: Option<f64>,

    /// Ramp rate in A/mm²/min
    #[arg(short, long)]
    ramp: Option<f64>,

    /// Supply current limit in A
    #[arg(long)]
    imax: Option<f64>,

    /// Voltage offset in mV
    #[arg(long)]
    voff: Option<f64>,

    /// Fixed convective coefficient in W/(m²·K)
    #[arg(long, conflicts_with = "gas")]
    h: Option<f64>,

    /// Gas mixture (argon, helium, nitrogen, air, forming-gas)
    #[arg(short, long)]
    gas: Option<String>,

    /// Chamber pressure in Torr (gas environments)
    #[arg(short, long)]
    pressure: Option<f64>,

    /// Surface emissivity override (gas environments)
    #[arg(short, long)]
    emissivity: Option<f64>,

    /// Print the material comparison table
    #[arg(short, long)]
    table: bool,

    /// Print the reference process map
    #[arg(long)]
    map: bool,

    /// Print the E(J) curve of the selected material
    #[arg(short, long)]
    curve: bool,

    /// Number of E(J) samples
    #[arg(long, default_value_t = 20)]
    samples: usize,
}

/// Convective coefficient used to place reference runs on the map when the
/// scenario runs in a gas environment
const MAP_DEFAULT_H: f64 = 8.0;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let db = match &args.materials {
        Some(path) => match MaterialDatabase::load(path) {
            Ok(db) => db,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => MaterialDatabase::builtin(),
    };

    let mut scenario = match &args.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Scenario::quick_start(),
    };
    apply_overrides(&mut scenario, &args);

    println!("=== Flash Process Window ===\n");
    println!(
        "Specimen: {} {}",
        scenario.material,
        scenario.specimen.describe()
    );
    println!(
        "Ramp: {} A/mm²/min, I_max: {} A, {}\n",
        scenario.process.ramp_rate,
        scenario.process.max_current,
        describe_environment(&scenario.process.environment)
    );

    let result = match scenario.evaluate(&db) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Available: {}", db.keys().collect::<Vec<_>>().join(", "));
            return ExitCode::FAILURE;
        }
    };
    print_result(&result);

    if args.curve {
        if let Some(material) = db.get(&scenario.material) {
            let curve = field_curve(
                &db,
                material,
                &scenario.specimen,
                &scenario.process,
                Some(args.samples),
            );
            println!("\n=== E(J) curve, {} ===", material.name);
            println!("{:>10} {:>10}", "J A/mm²", "E V/cm");
            for sample in &curve {
                let marker = if result.reaches_flash && sample.j >= result.j_flash {
                    " *"
                } else {
                    ""
                };
                println!("{:>10.2} {:>10.4}{}", sample.j, sample.e, marker);
            }
        }
    }

    if args.table {
        println!("\n=== Material comparison ===");
        println!(
            "{:<4} {:>9} {:>9} {:>9} {:>9} {:>9} {:>8}  outcome",
            "", "J_ss", "J_LOC", "E_flash", "E_max", "J_flash", "window"
        );
        for row in comparison_table(&db, &scenario.specimen, &scenario.process) {
            println!(
                "{:<4} {:>9.1} {:>9.1} {:>9.3} {:>9.3} {:>9.1} {:>7.1}%  {}{}",
                row.key,
                row.j_ss,
                row.j_loc,
                row.e_flash,
                row.e_max,
                row.j_flash,
                row.flash_window_percent,
                row.outcome.label(),
                if row.calibrated { "" } else { " (est.)" }
            );
        }
    }

    if args.map {
        let h = match scenario.process.environment {
            Environment::Fixed { h } => h,
            Environment::Gas(_) => {
                warn!("Process map uses fixed h = {} for the reference runs", MAP_DEFAULT_H);
                MAP_DEFAULT_H
            }
        };
        println!("\n=== Process map (h = {h} W/m²K) ===");
        println!("{:<12} {:>9} {:>9}  flash", "", "N_R", "E V/cm");
        for point in process_map(&db, h, Some(&result)) {
            print_map_point(&point);
        }
    }

    ExitCode::SUCCESS
}

fn apply_overrides(scenario: &mut Scenario, args: &Args) {
    if let Some(material) = &args.material {
        scenario.material.clone_from(material);
    }
    if let Some(gauge) = args.gauge {
        scenario.specimen.gauge_length_mm = gauge;
    }
    scenario.specimen.shape = resolve_shape(scenario.specimen.shape, args);

    let process = &mut scenario.process;
    if let Some(ramp) = args.ramp {
        process.ramp_rate = ramp;
    }
    if let Some(imax) = args.imax {
        process.max_current = imax;
    }
    if let Some(voff) = args.voff {
        process.voltage_offset_mv = voff;
    }

    if let Some(h) = args.h {
        process.environment = Environment::Fixed { h };
    } else if let Some(gas) = &args.gas {
        let pressure = Torr::new(args.pressure.unwrap_or(*Torr::ATMOSPHERE).max(0.0));
        let mut atm = GasAtmosphere::new(GasMixture::named(gas), pressure);
        atm.emissivity = args.emissivity;
        process.environment = Environment::Gas(atm);
    } else if let Environment::Gas(atm) = &mut process.environment {
        if let Some(p) = args.pressure {
            atm.pressure = Torr::new(p.max(0.0));
        }
        if args.emissivity.is_some() {
            atm.emissivity = args.emissivity;
        }
    } else if args.pressure.is_some() || args.emissivity.is_some() {
        warn!("--pressure and --emissivity only apply to gas environments; pass --gas");
    }
}

/// Rebuild the shape from the flags, keeping current dimensions where no flag is set
fn resolve_shape(current: GeometrySpec, args: &Args) -> GeometrySpec {
    let (mut t, mut w, mut d, mut id, mut wall) = (100.0, 6.0, 100.0, 1.0, 50.0);
    let current_kind = match current {
        GeometrySpec::Foil {
            thickness_um,
            width_mm,
        } => {
            t = thickness_um;
            w = width_mm;
            Shape::Foil
        }
        GeometrySpec::Wire { diameter_um } => {
            d = diameter_um;
            Shape::Wire
        }
        GeometrySpec::Tube {
            inner_diameter_mm,
            wall_thickness_um,
        } => {
            id = inner_diameter_mm;
            wall = wall_thickness_um;
            Shape::Tube
        }
    };

    match args.shape.unwrap_or(current_kind) {
        Shape::Foil => GeometrySpec::Foil {
            thickness_um: args.thickness.unwrap_or(t),
            width_mm: args.width.unwrap_or(w),
        },
        Shape::Wire => GeometrySpec::Wire {
            diameter_um: args.diameter.unwrap_or(d),
        },
        Shape::Tube => GeometrySpec::Tube {
            inner_diameter_mm: args.inner_diameter.unwrap_or(id),
            wall_thickness_um: args.wall.unwrap_or(wall),
        },
    }
}

fn describe_environment(env: &Environment) -> String {
    match env {
        Environment::Fixed { h } => format!("h = {h} W/m²K"),
        Environment::Gas(atm) => {
            let mut s = format!("{} at {}", atm.mixture.name, atm.pressure);
            if let Some(e) = atm.emissivity {
                let _ = write!(s, ", ε = {e}");
            }
            s
        }
    }
}

fn print_result(r: &SimulationResult) {
    println!("--- Steady state ---");
    println!(
        "J_ss: {:.2} A/mm²   J_LOC: {:.2} A/mm²{}",
        r.j_ss,
        r.j_loc,
        if r.calibrated { "" } else { " (uncalibrated, 2.8x J_ss)" }
    );
    println!("I at LOC: {:.2} A   E_max: {:.3} V/cm", r.i_loc, r.e_max);
    println!(
        "h_eff: {:.2} W/m²K   τ: {:.3} s   clip cooling: {:.1}%",
        r.h_effective, r.tau, r.clip_percent
    );

    println!("\n--- Flash ---");
    println!(
        "r: {:.0} µm   E_flash: {:.4} V/cm",
        r.coherence_length_um, r.e_flash
    );
    if r.reaches_flash {
        println!(
            "J_flash: {:.2} A/mm²   I_onset: {:.2} A   window: {:.1}%",
            r.j_flash, r.i_onset, r.flash_window_percent
        );
    }
    println!("Outcome: {}", r.outcome.label());

    println!("\n--- Ramp ---");
    println!(
        "t_ramp: {:.2} s   N_R: {:.3} ({})",
        r.ramp_time,
        r.normalized_ramp,
        r.regime.label()
    );
    match r.melt {
        Some(melt) => println!(
            "E_peak: {:.3} V/cm   melt at {:.2} s, {:.2} A ({:.2} A/mm²)",
            r.e_peak, melt.time_s, melt.current_a, melt.current_density
        ),
        None => println!("E_peak: {:.3} V/cm   no melt within 20 s", r.e_peak),
    }

    println!("\n--- Diagnostics ---");
    println!(
        "R₀: {:.4} Ω   sensitivity s₁₀: {:.3}",
        r.base_resistance, r.sensitivity_ratio
    );
    let verdict = r.assessment.describe(r.e_best(), r.e_flash);
    let tag = match r.assessment {
        ThresholdAssessment::Expected => "OK",
        ThresholdAssessment::Borderline => "~~",
        ThresholdAssessment::Below { .. } => "!!",
    };
    println!("[{tag}] {verdict}");
}

fn print_map_point(p: &ProcessMapPoint) {
    println!(
        "{:<12} {:>9.3} {:>9.3}  {}{}",
        p.label,
        p.normalized_ramp,
        p.e_max,
        if p.flash { "yes" } else { "no" },
        if p.is_design { "  <-" } else { "" }
    );
}
