use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::info;

use crate::common::Coord;
use crate::map::{CellState, Map};
use crate::search::{SearchOptions, Strategy, DEFAULT_INDEX_BUCKETS};

#[derive(Parser, Debug)]
#[command(
    name = "Maze Search",
    about = "Shortest-path search on 8-connected grid mazes.",
    version = "1.0"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a maze with one or more strategies
    Search(SearchArgs),

    /// Replay a PUSH/POP script against the indexed priority queue
    Heap {
        #[arg(help = "Path to the script file")]
        script: String,

        #[arg(long, help = "Buckets in the position index", default_value_t = 19)]
        buckets: usize,
    },

    /// Replay a SET/GET/POP script against the position index
    Index {
        #[arg(help = "Path to the script file")]
        script: String,

        #[arg(long, help = "Buckets in the position index", default_value_t = 19)]
        buckets: usize,
    },
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the map file; a random map is generated when absent")]
    pub map_path: Option<String>,

    #[arg(long, help = "Rows of the random map")]
    pub rows: Option<usize>,

    #[arg(long, help = "Columns of the random map")]
    pub cols: Option<usize>,

    #[arg(long, help = "Obstacle probability of the random map")]
    pub density: Option<f64>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Start cell as x,y")]
    pub start: Option<Coord>,

    #[arg(long, help = "Goal cell as x,y; defaults to the bottom-right corner")]
    pub goal: Option<Coord>,

    #[arg(long, value_enum, value_delimiter = ',', help = "Solvers to run")]
    pub solver: Vec<Strategy>,

    #[arg(long, help = "Buckets in the A* position index")]
    pub index_buckets: Option<usize>,

    #[arg(long, help = "Path to the JSON output file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Print the grid after each search", default_value_t = false)]
    pub render: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map_path: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub density: f64,
    pub seed: u64,
    pub start: Coord,
    pub goal: Option<Coord>,
    pub solvers: Vec<Strategy>,
    pub index_buckets: usize,
    pub output_path: Option<String>,
    pub render: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: None,
            rows: 20,
            cols: 40,
            density: 0.25,
            seed: 0,
            start: Coord::new(0, 0),
            goal: None,
            solvers: vec![Strategy::AStar],
            index_buckets: DEFAULT_INDEX_BUCKETS,
            output_path: None,
            render: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn override_from_command_line(mut self, args: &SearchArgs) -> anyhow::Result<Self> {
        if let Some(map_path) = &args.map_path {
            self.map_path = Some(map_path.clone());
        }
        if let Some(rows) = args.rows {
            self.rows = rows;
        }
        if let Some(cols) = args.cols {
            self.cols = cols;
        }
        if let Some(density) = args.density {
            self.density = density;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(start) = args.start {
            self.start = start;
        }
        if args.goal.is_some() {
            self.goal = args.goal;
        }
        if !args.solver.is_empty() {
            self.solvers = args.solver.clone();
        }
        if let Some(index_buckets) = args.index_buckets {
            self.index_buckets = index_buckets;
        }
        if let Some(output_path) = &args.output_path {
            self.output_path = Some(output_path.clone());
        }
        self.render |= args.render;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..1.0).contains(&self.density) {
            return Err(anyhow!(
                "Obstacle density must be in [0, 1), got {}",
                self.density
            ));
        }
        if self.map_path.is_none() && (self.rows == 0 || self.cols == 0) {
            return Err(anyhow!(
                "Random map needs positive dimensions, got {}x{}",
                self.rows,
                self.cols
            ));
        }
        if self.index_buckets == 0 {
            return Err(anyhow!("Index bucket count must be positive"));
        }
        if self.solvers.is_empty() {
            return Err(anyhow!("At least one solver is required"));
        }
        Ok(())
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            index_buckets: self.index_buckets,
        }
    }

    /// Reads the map file, or generates a seeded random map with the
    /// endpoints kept clear.
    pub fn load_map(&self) -> anyhow::Result<Map> {
        let map = match &self.map_path {
            Some(path) => Map::from_file(path)?,
            None => {
                info!(
                    "No map file specified, generating {}x{} map with seed {}",
                    self.rows, self.cols, self.seed
                );
                let mut rng = StdRng::seed_from_u64(self.seed);
                let mut map = Map::random(self.rows, self.cols, self.density, &mut rng);
                let goal = self.goal_for(&map);
                map.mark(self.start, CellState::Free)
                    .context("start outside the random map")?;
                map.mark(goal, CellState::Free)
                    .context("goal outside the random map")?;
                map
            }
        };

        if map.height == 0 || map.width == 0 {
            return Err(anyhow!("map has no cells"));
        }
        Ok(map)
    }

    pub fn goal_for(&self, map: &Map) -> Coord {
        self.goal.unwrap_or(Coord::new(
            map.width.saturating_sub(1),
            map.height.saturating_sub(1),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        let map = config.load_map().unwrap();
        assert_eq!(map.dimensions(), (20, 40));
        assert_eq!(config.goal_for(&map), Coord::new(39, 19));
        assert_eq!(map.state_at(Coord::new(39, 19)).unwrap(), CellState::Free);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
map_path: map_file/test/wall.map
start: { x: 0, y: 1 }
goal: { x: 4, y: 1 }
solvers: [astar, bfs]
index_buckets: 7
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.start, Coord::new(0, 1));
        assert_eq!(config.goal, Some(Coord::new(4, 1)));
        assert_eq!(config.solvers, vec![Strategy::AStar, Strategy::BreadthFirst]);
        assert_eq!(config.index_buckets, 7);
        assert_eq!(config.seed, 0);

        let map = config.load_map().unwrap();
        assert_eq!(map.dimensions(), (3, 5));
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "maze_search",
            "search",
            "--rows",
            "5",
            "--cols",
            "6",
            "--start",
            "1,2",
            "--solver",
            "bfs,greedy",
            "--render",
        ]);
        let Command::Search(args) = cli.command else {
            panic!("expected search subcommand");
        };

        let config = Config::default().override_from_command_line(&args).unwrap();
        assert_eq!((config.rows, config.cols), (5, 6));
        assert_eq!(config.start, Coord::new(1, 2));
        assert_eq!(config.solvers, vec![Strategy::BreadthFirst, Strategy::Greedy]);
        assert!(config.render);
        assert_eq!(config.goal, None);
    }

    #[test]
    fn test_validation_errors() {
        let bad_density = SearchArgs {
            density: Some(1.0),
            ..Default::default()
        };
        assert!(Config::default().override_from_command_line(&bad_density).is_err());

        let bad_buckets = SearchArgs {
            index_buckets: Some(0),
            ..Default::default()
        };
        assert!(Config::default().override_from_command_line(&bad_buckets).is_err());

        let config = Config {
            solvers: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_outside_random_map() {
        let config = Config {
            rows: 3,
            cols: 3,
            start: Coord::new(5, 5),
            ..Default::default()
        };
        assert!(config.load_map().is_err());
    }
}
