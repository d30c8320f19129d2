// Demonstration: fans learning to pull walkers out of a corridor.
//
// Build/run from this repo root:
//   RUST_LOG=ventrl=debug cargo run --example grid_demo -- --preset diversifying --ticks 5000

use std::collections::BTreeMap;
use std::env;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ventrl::sensors::SensorGrid;
use ventrl::state::{CellCodec, ContentCode, OccupantKind};
use ventrl::types::{Direction, Footprint, Placement, TypeTag};
use ventrl::{generate_id, Action, ControllerConfig, Environment, Id, LearningController};

const WIDTH: u32 = 16;
const HEIGHT: u32 = 7;
const TICK_MS: f64 = 100.0;

struct Fan {
    placement: Placement,
    action: Action,
    consumed: u64,
}

/// Walkers enter on the west edge and leave through the east edge. A powered
/// fan facing a walker in its ring captures it with probability `power / 10`.
struct Corridor {
    grid: SensorGrid,
    fans: BTreeMap<Id, Fan>,
    walkers: Vec<Id>,
    escaped: u64,
    rng: StdRng,
}

impl Corridor {
    fn new(seed: u64) -> Self {
        let mut grid = SensorGrid::new(WIDTH, HEIGHT, CellCodec::default());
        let mut fans = BTreeMap::new();
        for (i, x) in [4, 8, 12].into_iter().enumerate() {
            let id = format!("fan_{}", i);
            grid.register_actuator(id.clone());
            fans.insert(
                id,
                Fan {
                    placement: Placement::new(Footprint::unit(), x, HEIGHT as i32 / 2),
                    action: Action::new(0, Direction::North),
                    consumed: 0,
                },
            );
        }
        Self {
            grid,
            fans,
            walkers: Vec::new(),
            escaped: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn captured(&self) -> u64 {
        self.fans.keys().map(|id| self.grid.capture_count(id)).sum()
    }

    fn consumed(&self) -> u64 {
        self.fans.values().map(|f| f.consumed).sum()
    }

    /// Spawns, moves and captures walkers for one tick.
    fn step(&mut self) {
        if self.rng.gen_bool(0.15) {
            let id = generate_id();
            let y = self.rng.gen_range(0..HEIGHT as i32);
            if self
                .grid
                .occupant_created(id.clone(), OccupantKind::Small, 0, y)
                .is_ok()
            {
                self.walkers.push(id);
            }
        }

        let mut gone = Vec::new();
        for id in &self.walkers {
            let Some(w) = self.grid.occupant(id).copied() else {
                gone.push(id.clone());
                continue;
            };

            let catcher = self.fans.iter().find(|(_, fan)| {
                let (dx, dy) = (w.x - fan.placement.x, w.y - fan.placement.y);
                dx.abs() <= 1
                    && dy.abs() <= 1
                    && !fan.action.is_off()
                    && fan.action.direction.faces((dx.signum(), dy.signum()))
            });
            if let Some((fan_id, fan)) = catcher {
                if self.rng.gen::<f64>() < fan.action.power as f64 / 10.0 {
                    let _ = self.grid.occupant_captured(id, fan_id);
                    gone.push(id.clone());
                    continue;
                }
            }

            if w.x + 1 >= WIDTH as i32 {
                let _ = self.grid.occupant_reached_goal(id);
                self.escaped += 1;
                gone.push(id.clone());
                continue;
            }
            let wobble = self.rng.gen_range(-1..=1);
            let y = (w.y + wobble).clamp(0, HEIGHT as i32 - 1);
            let _ = self.grid.occupant_moved(id, w.x + 1, y);
        }
        self.walkers.retain(|id| !gone.contains(id));

        for fan in self.fans.values_mut() {
            fan.consumed += fan.action.power as u64;
        }
    }
}

impl Environment for Corridor {
    fn actuators(&self) -> Vec<Id> {
        self.fans.keys().cloned().collect()
    }

    fn sample_cell(&self, x: i32, y: i32) -> ContentCode {
        self.grid.sample_cell(x, y)
    }

    fn capture_count(&self, id: &str) -> u64 {
        self.grid.capture_count(id)
    }

    fn consumption_count(&self, id: &str) -> u64 {
        self.fans.get(id).map_or(0, |f| f.consumed)
    }

    fn placement(&self, id: &str) -> Placement {
        self.fans
            .get(id)
            .map_or(Placement::new(Footprint::unit(), -10, -10), |f| f.placement)
    }

    fn type_tag(&self, _id: &str) -> TypeTag {
        TypeTag::new("fan")
    }

    fn apply_action(&mut self, id: &str, action: Action) {
        if let Some(fan) = self.fans.get_mut(id) {
            fan.action = action;
        }
    }

    fn is_selected(&self, id: &str) -> bool {
        id == "fan_0"
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let preset = arg_value(&args, "--preset").unwrap_or("td");
    let ticks: usize = arg_value(&args, "--ticks")
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let base = match preset {
        "capture" => ControllerConfig::capture_averaging(),
        "consumption" => ControllerConfig::consumption_averaging(),
        "td" => ControllerConfig::temporal_difference(),
        "diversifying" => ControllerConfig::power_diversifying(),
        other => {
            eprintln!(
                "Unknown --preset '{}'; expected 'capture', 'consumption', 'td' or 'diversifying'.",
                other
            );
            std::process::exit(2);
        }
    };
    let config = ControllerConfig { seed, ..base };

    let mut controller = match LearningController::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let mut world = Corridor::new(seed);

    tracing::info!("Running preset '{}' for {} ticks", preset, ticks);
    for _ in 0..ticks {
        world.step();
        controller.advance_ms(&mut world, TICK_MS);
    }

    println!("Preset: {} (policy {})", preset, controller.policy_name());
    println!(
        "Captured: {}  Escaped: {}  Consumed: {}",
        world.captured(),
        world.escaped,
        world.consumed()
    );
    println!("{}", controller.metrics());
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
